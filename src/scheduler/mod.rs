//! Scan scheduling and engine lifecycle.
//!
//! The [`Engine`] owns the page, the site profile, the processed-element
//! tracker, the indicator renderer, the classification client, and the state
//! bridge. It is driven three ways: page events (mutation batches and scroll
//! notifications) that schedule debounced re-scans, control messages that
//! toggle activation or override the global status, and store change
//! notifications that restyle rendered badges.
//!
//! Scans run to completion before the next one starts; there is no scan
//! overlap. A mutation or scroll event arriving while a debounce window is
//! already pending replaces the deadline rather than queueing a second scan.

use std::collections::HashSet;
use std::sync::Arc;

use ego_tree::NodeId;
use log::{debug, info};
use tokio::sync::{broadcast, mpsc};
use tokio::time::Instant;

use crate::classify::{Classifier, Status};
use crate::config::{Config, MIN_TITLE_LEN, STATUS_KEY};
use crate::error_handling::{InitializationError, ScanEvent, ScanStats};
use crate::extract::extract;
use crate::indicator::IndicatorRenderer;
use crate::initialization::init_client;
use crate::page::PageDom;
use crate::site::{resolve_profile, SiteProfile};
use crate::state::{ControlMessage, ControlResponse, StateBridge, StateStore, StoreChange};
use crate::track::ProcessedSet;
use crate::utils::parse_selector_with_fallback;

/// Externally observable engine phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Engine is deactivated; events are ignored.
    Inactive,
    /// Engine is active and waiting for events or a debounce deadline.
    ActiveIdle,
    /// A scan pass is in progress.
    ActiveScanning,
}

/// A page-level event delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    /// A batch of DOM mutations; `added_nodes` counts the nodes added across
    /// the batch. Batches that added nothing never schedule a scan.
    Mutation {
        /// Nodes added across the batch.
        added_nodes: usize,
    },
    /// The viewport scrolled (lazy-loaded content may now be present).
    Scroll,
}

// Debounce bookkeeping; present only while the engine observes events.
#[derive(Debug, Default)]
struct Observer {
    pending: Option<Instant>,
}

#[derive(Debug)]
struct EngineState {
    active: bool,
    last_status: Status,
    observer: Option<Observer>,
    scan_state: ScanState,
}

impl Default for EngineState {
    fn default() -> Self {
        EngineState {
            active: false,
            last_status: Status::Uncertain,
            observer: None,
            scan_state: ScanState::Inactive,
        }
    }
}

/// The product-discovery engine for a single page.
pub struct Engine {
    page: PageDom,
    profile: SiteProfile,
    tracker: ProcessedSet,
    renderer: IndicatorRenderer,
    classifier: Classifier,
    bridge: StateBridge,
    stats: Arc<ScanStats>,
    state: EngineState,
    store_rx: broadcast::Receiver<StoreChange>,
    mutation_debounce: std::time::Duration,
    scroll_debounce: std::time::Duration,
}

impl Engine {
    /// Creates an engine over `html` loaded from `url`, with state persisted
    /// through `store`. The site profile is resolved once from the page host.
    pub fn new(
        config: &Config,
        html: &str,
        url: &str,
        store: Arc<dyn StateStore>,
    ) -> Result<Self, InitializationError> {
        let page = PageDom::parse(html, url);
        let profile = resolve_profile(&page.host());
        info!("Resolved site profile '{}' for {}", profile.site, url);

        let stats = Arc::new(ScanStats::new());
        let client = init_client(config)?;
        let classifier = Classifier::new(
            client,
            &config.api_base,
            config.cache_capacity,
            Arc::clone(&stats),
        );
        let bridge = StateBridge::new(store, Arc::clone(&stats));
        let store_rx = bridge.subscribe();

        Ok(Engine {
            page,
            profile,
            tracker: ProcessedSet::new(),
            renderer: IndicatorRenderer::new(),
            classifier,
            bridge,
            stats,
            state: EngineState::default(),
            store_rx,
            mutation_debounce: config.mutation_debounce,
            scroll_debounce: config.scroll_debounce,
        })
    }

    /// Starts the engine: loads the persisted active flag (defaulting to
    /// active and persisting the default when absent), seeds the global
    /// status, and runs the initial scan when active.
    pub async fn start(&mut self) {
        let active = self.bridge.load_active(true).await;
        match self.bridge.load_status().await {
            Some(status) => self.state.last_status = status,
            None => self.bridge.persist_status(self.state.last_status).await,
        }
        if active {
            self.activate().await;
        } else {
            info!("Engine starting deactivated; no scan performed.");
        }
    }

    /// Activates the engine: persists the flag, scans immediately, and begins
    /// observing page events. Activating an already-active engine re-scans.
    pub async fn activate(&mut self) {
        self.state.active = true;
        self.bridge.persist_active(true).await;
        self.scan().await;
        if self.state.observer.is_none() {
            self.state.observer = Some(Observer::default());
        }
    }

    /// Deactivates the engine: persists the flag, stops observing, removes
    /// every badge and marker, and resets the processed tracker so a later
    /// activation reprocesses the page from scratch. The classification cache
    /// is retained.
    pub async fn deactivate(&mut self) {
        self.state.active = false;
        self.state.observer = None;
        self.state.scan_state = ScanState::Inactive;
        self.bridge.persist_active(false).await;
        self.renderer.remove_all(&mut self.page);
        self.tracker.clear();
        info!("Engine deactivated; indicators removed.");
    }

    /// Handles a page event by scheduling (or rescheduling) a debounced scan.
    ///
    /// Ignored entirely while inactive. Mutation batches that added no nodes
    /// are ignored. A pending deadline is replaced, not stacked: a burst of
    /// events yields one scan after the last event's window elapses.
    pub fn handle_event(&mut self, event: PageEvent) {
        if !self.state.active {
            return;
        }
        let Some(observer) = self.state.observer.as_mut() else {
            return;
        };
        let window = match event {
            PageEvent::Mutation { added_nodes: 0 } => return,
            PageEvent::Mutation { .. } => self.mutation_debounce,
            PageEvent::Scroll => self.scroll_debounce,
        };
        observer.pending = Some(Instant::now() + window);
        debug!("Scan scheduled in {:?} after {:?}", window, event);
    }

    /// The deadline of the pending debounced scan, if one is scheduled.
    pub fn pending_scan_at(&self) -> Option<Instant> {
        self.state.observer.as_ref().and_then(|o| o.pending)
    }

    /// Runs the pending scan if its deadline has passed.
    pub async fn run_due(&mut self) {
        let due = self
            .pending_scan_at()
            .is_some_and(|at| at <= Instant::now());
        if due {
            if let Some(observer) = self.state.observer.as_mut() {
                observer.pending = None;
            }
            self.scan().await;
        }
    }

    /// Scans immediately, bypassing any debounce. No-op while inactive.
    pub async fn rescan(&mut self) {
        if self.state.active {
            self.scan().await;
        }
    }

    async fn scan(&mut self) {
        self.state.scan_state = ScanState::ActiveScanning;

        let mut seen = HashSet::new();
        let mut candidates = Vec::new();
        for selector in &self.profile.product_selectors {
            for id in self.page.select_ids(selector) {
                if seen.insert(id) {
                    candidates.push(id);
                }
            }
        }
        debug!("Scan found {} candidate elements", candidates.len());

        for element in candidates {
            self.process_element(element).await;
        }

        self.state.scan_state = ScanState::ActiveIdle;
        self.stats.increment(ScanEvent::ScanExecuted);
    }

    async fn process_element(&mut self, element: NodeId) {
        if self.tracker.is_processed(&self.page, element) {
            self.stats.increment(ScanEvent::ElementSkipped);
            return;
        }

        let record = extract(&self.page, element, &self.profile, &self.stats);

        if record.title.trim().len() > MIN_TITLE_LEN {
            let classification = self.classifier.classify(&record).await;
            let status = classification.status;
            self.renderer
                .render(&mut self.page, element, status, Some(classification));
            self.bridge.increment_counter(status).await;
        } else {
            // Too little text to analyze; badge it uncertain without a call.
            self.stats.increment(ScanEvent::ShortTitleSkip);
            self.renderer
                .render(&mut self.page, element, Status::Uncertain, None);
        }

        self.tracker.mark_processed(&mut self.page, element);
        self.stats.increment(ScanEvent::ElementProcessed);
    }

    /// Handles a control-protocol message and returns its response.
    pub async fn handle_message(&mut self, message: ControlMessage) -> ControlResponse {
        match message {
            ControlMessage::GetActive => ControlResponse::Active {
                active: self.state.active,
            },
            ControlMessage::SetActive { active } => {
                if active {
                    self.activate().await;
                } else {
                    self.deactivate().await;
                }
                ControlResponse::Active { active }
            }
            ControlMessage::GetStatus => ControlResponse::Status {
                status: self.state.last_status,
            },
            ControlMessage::SetStatus { status } => {
                self.state.last_status = status;
                self.bridge.persist_status(status).await;
                if self.state.active {
                    self.renderer.update_all(&mut self.page, status);
                }
                ControlResponse::Status { status }
            }
        }
    }

    /// Drains queued store change notifications, applying status broadcasts.
    ///
    /// A status change restyles every rendered badge while active and updates
    /// the remembered status either way. Lagged receivers re-read the status
    /// from the store instead of replaying missed values.
    pub async fn apply_store_changes(&mut self) {
        loop {
            match self.store_rx.try_recv() {
                Ok(change) => self.apply_change(change),
                Err(broadcast::error::TryRecvError::Lagged(_)) => {
                    if let Some(status) = self.bridge.load_status().await {
                        self.apply_status(status);
                    }
                }
                Err(_) => break,
            }
        }
    }

    fn apply_change(&mut self, change: StoreChange) {
        if change.key == STATUS_KEY {
            if let Ok(status) = change.value.parse() {
                self.apply_status(status);
            }
        }
    }

    fn apply_status(&mut self, status: Status) {
        if status != self.state.last_status {
            debug!("External status broadcast: {status}");
        }
        self.state.last_status = status;
        if self.state.active {
            self.renderer.update_all(&mut self.page, status);
        }
    }

    /// Drives the engine until the event channel closes: debounced scans for
    /// page events, badge restyles for store broadcasts.
    pub async fn run(&mut self, mut events: mpsc::Receiver<PageEvent>) {
        let mut store_rx = std::mem::replace(&mut self.store_rx, self.bridge.subscribe());
        loop {
            let deadline = self.pending_scan_at();
            tokio::select! {
                maybe = events.recv() => match maybe {
                    Some(event) => self.handle_event(event),
                    None => break,
                },
                result = store_rx.recv() => match result {
                    Ok(change) => self.apply_change(change),
                    Err(broadcast::error::RecvError::Lagged(_)) => {
                        if let Some(status) = self.bridge.load_status().await {
                            self.apply_status(status);
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
                _ = async {
                    match deadline {
                        Some(at) => tokio::time::sleep_until(at).await,
                        None => std::future::pending().await,
                    }
                } => self.run_due().await,
            }
        }
    }

    /// Appends an HTML fragment under the first element matching
    /// `parent_selector` and reports the insertion as a mutation batch.
    /// Returns the number of top-level elements added.
    pub fn inject_fragment(&mut self, parent_selector: &str, html: &str) -> usize {
        let selector = parse_selector_with_fallback(parent_selector, "fragment injection");
        let Some(parent) = self.page.select_ids(&selector).first().copied() else {
            return 0;
        };
        let added = self.page.append_fragment(parent, html).len();
        self.handle_event(PageEvent::Mutation { added_nodes: added });
        added
    }

    /// Handles a click on a badge element: toggles its detail popover.
    pub fn click_badge(&mut self, badge: NodeId) {
        self.renderer.toggle_popover(&mut self.page, badge);
    }

    /// Handles a click outside any popover or on its close control.
    pub fn dismiss_popover(&mut self) {
        self.renderer.close_popover(&mut self.page);
    }

    /// Whether the engine is currently active.
    pub fn is_active(&self) -> bool {
        self.state.active
    }

    /// The last known global status.
    pub fn status(&self) -> Status {
        self.state.last_status
    }

    /// Current engine phase.
    pub fn scan_state(&self) -> ScanState {
        self.state.scan_state
    }

    /// The page this engine operates on.
    pub fn page(&self) -> &PageDom {
        &self.page
    }

    /// Mutable access to the page, for hosts that mutate it directly.
    pub fn page_mut(&mut self) -> &mut PageDom {
        &mut self.page
    }

    /// The resolved site profile.
    pub fn profile(&self) -> &SiteProfile {
        &self.profile
    }

    /// The indicator renderer, exposing rendered badges.
    pub fn renderer(&self) -> &IndicatorRenderer {
        &self.renderer
    }

    /// Number of elements in the processed tracker.
    pub fn processed_count(&self) -> usize {
        self.tracker.len()
    }

    /// Number of cached classification fingerprints.
    pub fn cached_fingerprints(&self) -> usize {
        self.classifier.cached_fingerprints()
    }

    /// Scan statistics counters.
    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    /// The state bridge, exposing persisted counters.
    pub fn bridge(&self) -> &StateBridge {
        &self.bridge
    }
}
