//! Owned mutable page model.
//!
//! The engine operates on a DOM it owns, parsed with `scraper` and mutated
//! through the `ego_tree` arena underneath it. The host (CLI, tests, or an
//! embedding) appends fragments and the engine writes marker attributes and
//! badge elements into the same tree. Node identity (`ego_tree::NodeId`) is
//! stable across mutations, which makes it usable as a non-owning key for the
//! processed-element side table: detached nodes keep their id but hold no
//! engine-side ownership.
//!
//! All mutation operations are infallible from the caller's perspective:
//! operations on missing or non-element nodes are silent no-ops.

use ego_tree::{NodeId, NodeRef, Tree};
use scraper::{ElementRef, Html, Node, Selector};
use std::sync::LazyLock;

use crate::utils::parse_selector_unsafe;

static BODY_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("body", "page body lookup"));

// Attribute donor element; attributes are grafted onto targets from a parsed
// fragment so keys carry the exact interned names the parser produces.
static DONOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("i", "attribute donor lookup"));

/// Escapes text for inclusion in an HTML fragment.
pub fn html_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Recursively copies `src` (from another tree) under `dest`, returning the
/// id of the copied root.
fn graft(tree: &mut Tree<Node>, dest: NodeId, src: NodeRef<'_, Node>) -> Option<NodeId> {
    let new_id = {
        let mut dest_node = tree.get_mut(dest)?;
        dest_node.append(src.value().clone()).id()
    };
    for child in src.children() {
        graft(tree, new_id, child);
    }
    Some(new_id)
}

/// A product-listing page owned by the engine.
///
/// Wraps a parsed HTML document plus the page URL it was loaded from. The
/// URL's host drives site-profile resolution and is reported as the source
/// URL of every extracted product record.
pub struct PageDom {
    html: Html,
    url: String,
}

impl PageDom {
    /// Parses `html` into a page model associated with `url`.
    pub fn parse(html: &str, url: &str) -> Self {
        PageDom {
            html: Html::parse_document(html),
            url: url.to_string(),
        }
    }

    /// The URL this page was loaded from.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The host portion of the page URL, lowercased. Falls back to the raw
    /// URL string when it does not parse as an absolute URL.
    pub fn host(&self) -> String {
        url::Url::parse(&self.url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
            .unwrap_or_else(|| self.url.to_lowercase())
    }

    /// Returns the ids of all elements matching `selector`, in document order.
    pub fn select_ids(&self, selector: &Selector) -> Vec<NodeId> {
        self.html.select(selector).map(|el| el.id()).collect()
    }

    /// Returns the number of elements matching `selector`.
    pub fn count(&self, selector: &Selector) -> usize {
        self.html.select(selector).count()
    }

    /// Returns the ids of descendants of `id` matching `selector`.
    pub fn select_within(&self, id: NodeId, selector: &Selector) -> Vec<NodeId> {
        match self.element_ref(id) {
            Some(el) => el.select(selector).map(|m| m.id()).collect(),
            None => Vec::new(),
        }
    }

    /// Wraps `id` as an element reference, if it is a live element node.
    pub fn element_ref(&self, id: NodeId) -> Option<ElementRef<'_>> {
        self.html.tree.get(id).and_then(ElementRef::wrap)
    }

    /// Concatenated, trimmed text content of `id` and its descendants.
    pub fn text_of(&self, id: NodeId) -> String {
        self.element_ref(id)
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default()
    }

    /// Reads attribute `name` from element `id`.
    pub fn attr(&self, id: NodeId, name: &str) -> Option<String> {
        self.element_ref(id)
            .and_then(|el| el.value().attr(name).map(str::to_string))
    }

    /// Sets attribute `name="value"` on element `id`.
    ///
    /// Returns `false` (without raising) when the target is missing, not an
    /// element, or the attribute name is not parseable; marking detached or
    /// foreign nodes is a silent no-op by design of the processed tracker.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> bool {
        let donor = Html::parse_fragment(&format!("<i {}=\"{}\"></i>", name, html_escape(value)));
        let Some(donor_el) = donor.select(&DONOR_SELECTOR).next() else {
            return false;
        };
        let Some((key, val)) = donor_el
            .value()
            .attrs
            .iter()
            .next()
            .map(|(k, v)| (k.clone(), v.clone()))
        else {
            return false;
        };
        match self.html.tree.get_mut(id) {
            Some(mut node) => {
                if let Node::Element(el) = node.value() {
                    if let Some(existing) = el.attrs.iter_mut().find(|(k, _)| *k == key) {
                        existing.1 = val;
                    } else {
                        el.attrs.push((key, val));
                    }
                    true
                } else {
                    false
                }
            }
            None => false,
        }
    }

    /// Removes attribute `name` from element `id`, if present.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) {
        if let Some(mut node) = self.html.tree.get_mut(id) {
            if let Node::Element(el) = node.value() {
                el.attrs.retain(|(k, _)| &*k.local != name);
            }
        }
    }

    /// Returns the id of `id` itself or its nearest ancestor carrying
    /// attribute `name`.
    pub fn closest_with_attribute(&self, id: NodeId, name: &str) -> Option<NodeId> {
        let node = self.html.tree.get(id)?;
        std::iter::once(node)
            .chain(node.ancestors())
            .find_map(|n| {
                let el = ElementRef::wrap(n)?;
                el.value().attr(name).map(|_| n.id())
            })
    }

    /// Parses `html` as a fragment and appends its top-level nodes as children
    /// of `parent`. Returns the ids of the appended top-level elements.
    pub fn append_fragment(&mut self, parent: NodeId, html: &str) -> Vec<NodeId> {
        let fragment = Html::parse_fragment(html);
        let root = fragment.root_element();
        let mut added = Vec::new();
        for child in root.children() {
            let is_element = child.value().is_element();
            if let Some(id) = graft(&mut self.html.tree, parent, child) {
                if is_element {
                    added.push(id);
                }
            }
        }
        added
    }

    /// The id of the document's `<body>` element, if any.
    pub fn body_id(&self) -> Option<NodeId> {
        self.html.select(&BODY_SELECTOR).next().map(|el| el.id())
    }

    /// Appends a fragment to the document body, returning the first appended
    /// element id. Returns `None` when the document has no body.
    pub fn append_to_body(&mut self, html: &str) -> Option<NodeId> {
        let body = self.body_id()?;
        self.append_fragment(body, html).into_iter().next()
    }

    /// Replaces the children of element `id` with a single text node.
    pub fn set_text(&mut self, id: NodeId, text: &str) -> bool {
        let child_ids: Vec<NodeId> = match self.html.tree.get(id) {
            Some(node) => node.children().map(|c| c.id()).collect(),
            None => return false,
        };
        for cid in child_ids {
            self.detach(cid);
        }
        let fragment = Html::parse_fragment(&html_escape(text));
        let root = fragment.root_element();
        for child in root.children() {
            graft(&mut self.html.tree, id, child);
        }
        true
    }

    /// Detaches node `id` from the tree. Detached nodes keep their id but no
    /// longer appear in selector matches or text traversals.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(mut node) = self.html.tree.get_mut(id) {
            node.detach();
        }
    }

    /// Whether node `id` is still reachable from the document root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let root = self.html.tree.root().id();
        match self.html.tree.get(id) {
            Some(node) => id == root || node.ancestors().any(|a| a.id() == root),
            None => false,
        }
    }
}
