//! Change-driven highlighting.

use crate::clock::{Clock, SystemClock};
use crate::collector::{collect_leaves, highlight_leaves};
use crate::config::SchedulerConfig;
use crate::gate::FlushGate;
use crate::highlighter::clear_highlights;
use crate::pending::{InsertOutcome, PendingSet};
use phrasemark_core::dom::{
    Document, DomError, MutationRecord, NodeId, NodeKind, PassId, Subscription,
};
use phrasemark_core::types::{AppConfig, StyleMap};
use phrasemark_search::IndexCache;
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("scheduler is already active")]
    AlreadyActive,

    #[error("failed to observe document changes: {0}")]
    Subscribe(#[from] DomError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Not observing anything.
    Idle,
    /// Observing, nothing waiting.
    Observing,
    /// Inserted nodes are waiting for the gate.
    PendingAccumulating,
    /// A flush is running.
    ///
    /// A flush holds the scheduler mutably, so callers never observe this
    /// state; it exists for code reading the shared flag during a flush.
    Flushing,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Flushes that processed at least one node.
    pub flushes: usize,
    /// Highlights created, full passes included.
    pub highlighted: usize,
    /// Inserted nodes lost to a full pending set.
    pub dropped: usize,
}

/// State shared with the mutation callback.
struct Shared {
    inbox: RefCell<Inbox>,
    flushing: Cell<bool>,
    clock: Rc<dyn Clock>,
}

struct Inbox {
    pending: PendingSet,
    gate: FlushGate,
    dropped: usize,
}

impl Shared {
    fn on_mutation(&self, doc: &Document, record: &MutationRecord) {
        let mut inbox = self.inbox.borrow_mut();
        let mut accepted = false;

        for &node in &record.added {
            if is_own_highlight(doc, node) {
                continue;
            }
            accepted = true;
            if inbox.pending.insert(node) == InsertOutcome::Dropped {
                inbox.dropped += 1;
                if inbox.dropped == 1 {
                    tracing::warn!(
                        capacity = inbox.pending.capacity(),
                        "pending set full; dropping inserted nodes until next flush"
                    );
                }
            }
        }

        if accepted {
            let now = self.clock.now();
            inbox.gate.arm(now);
        }
    }
}

/// A highlight element, or text placed directly inside one.
fn is_own_highlight(doc: &Document, node: NodeId) -> bool {
    let marked = |id: NodeId| doc.element(id).is_ok_and(|e| e.is_highlight());
    match doc.kind(node) {
        Ok(NodeKind::Element(_)) => marked(node),
        Ok(NodeKind::Text(_)) => doc.parent(node).ok().flatten().is_some_and(marked),
        Err(_) => false,
    }
}

/// Marks a flush as running for as long as it lives.
///
/// `flush` takes `&mut self`, so it cannot nest; the flag is what mutation
/// callbacks holding [`Shared`] see while the flush rewrites the tree.
struct FlushGuard<'a> {
    flag: &'a Cell<bool>,
}

impl<'a> FlushGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            return None;
        }
        Some(Self { flag })
    }
}

impl Drop for FlushGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

struct Active {
    root: NodeId,
    styles: Arc<StyleMap>,
    _subscription: Subscription,
}

/// Keeps a document subtree highlighted while it changes.
///
/// Drive it from the host event loop: call [`tick`](Self::tick) when
/// [`next_deadline`](Self::next_deadline) passes (or simply on every loop
/// turn).
pub struct Scheduler {
    config: SchedulerConfig,
    shared: Rc<Shared>,
    cache: IndexCache,
    pass: PassId,
    active: Option<Active>,
    stats: SchedulerStats,
}

/// Create operations.
impl Scheduler {
    pub fn new(config: SchedulerConfig, clock: Rc<dyn Clock>) -> Self {
        let inbox = Inbox {
            pending: PendingSet::new(config.pending_capacity),
            gate: FlushGate::new(config.throttle, config.debounce),
            dropped: 0,
        };

        Self {
            config,
            shared: Rc::new(Shared {
                inbox: RefCell::new(inbox),
                flushing: Cell::new(false),
                clock,
            }),
            cache: IndexCache::new(),
            pass: PassId::default(),
            active: None,
            stats: SchedulerStats::default(),
        }
    }

    pub fn with_system_clock(config: SchedulerConfig) -> Self {
        Self::new(config, Rc::new(SystemClock))
    }
}

/// Lifecycle operations.
impl Scheduler {
    /// Highlights everything under `root`, then starts following inserts.
    ///
    /// Returns the number of highlights created by the initial pass.
    pub fn activate(
        &mut self,
        doc: &mut Document,
        root: NodeId,
        styles: Arc<StyleMap>,
    ) -> Result<usize, SchedulerError> {
        if self.active.is_some() {
            return Err(SchedulerError::AlreadyActive);
        }

        let created = self.full_pass(doc, root, &styles);

        let shared = self.shared.clone();
        let subscription =
            match doc.observe(root, move |doc, record| shared.on_mutation(doc, record)) {
                Ok(subscription) => subscription,
                Err(err) => {
                    tracing::warn!(?root, %err, "cannot observe root; staying idle");
                    self.cache.clear();
                    return Err(SchedulerError::Subscribe(err));
                }
            };

        tracing::info!(?root, phrases = styles.len(), created, "highlighting activated");
        self.active = Some(Active {
            root,
            styles,
            _subscription: subscription,
        });
        Ok(created)
    }

    /// Resolves `config` for `host` and activates with the result.
    ///
    /// When nothing is configured for the host the scheduler stays idle and
    /// `Ok(0)` is returned.
    pub fn activate_for_host(
        &mut self,
        doc: &mut Document,
        root: NodeId,
        config: &AppConfig,
        host: &str,
        system_prefers_dark: bool,
    ) -> Result<usize, SchedulerError> {
        let Some(resolved) = config.resolve(host, system_prefers_dark) else {
            tracing::info!(host, "no active configuration; highlighting suspended");
            return Ok(0);
        };
        self.activate(doc, root, resolved.styles)
    }

    /// Swaps the style map, strips existing highlights and re-runs a full
    /// pass. Returns the number of highlights created.
    pub fn reconfigure(&mut self, doc: &mut Document, styles: Arc<StyleMap>) -> usize {
        let Some(root) = self.active.as_ref().map(|a| a.root) else {
            return 0;
        };

        clear_highlights(doc, root);
        let created = self.full_pass(doc, root, &styles);

        // The full pass covered everything the clear reported.
        {
            let mut inbox = self.shared.inbox.borrow_mut();
            inbox.pending.take();
            inbox.gate.cancel();
        }

        if let Some(active) = self.active.as_mut() {
            active.styles = styles;
        }
        created
    }

    /// Stops following changes. With `clear`, also removes every highlight
    /// under the root and returns how many were removed.
    pub fn deactivate(&mut self, doc: &mut Document, clear: bool) -> usize {
        let Some(active) = self.active.take() else {
            return 0;
        };
        let root = active.root;
        drop(active);

        {
            let mut inbox = self.shared.inbox.borrow_mut();
            inbox.pending.take();
            inbox.gate.cancel();
            inbox.dropped = 0;
        }
        self.cache.clear();

        let cleared = if clear {
            clear_highlights(doc, root)
        } else {
            0
        };
        tracing::info!(?root, cleared, "highlighting deactivated");
        cleared
    }

    fn full_pass(&mut self, doc: &mut Document, root: NodeId, styles: &Arc<StyleMap>) -> usize {
        let index = self.cache.get_or_build(styles);
        self.pass = self.pass.next();

        let leaves = collect_leaves(doc, root);
        let created = highlight_leaves(doc, &leaves, &index, self.pass);

        self.stats.highlighted += created;
        tracing::debug!(pass = self.pass.get(), leaves = leaves.len(), created, "full pass");
        created
    }
}

/// Flush operations.
impl Scheduler {
    /// Flushes if the gate is due. Returns the number of highlights created.
    pub fn tick(&mut self, doc: &mut Document) -> usize {
        if self.active.is_none() {
            return 0;
        }
        let now = self.shared.clock.now();
        let due = self.shared.inbox.borrow_mut().gate.poll(now);
        if !due {
            return 0;
        }
        self.flush(doc)
    }

    /// Processes every node captured so far, regardless of the gate.
    ///
    /// Nodes inserted while the flush runs (including by the flush itself)
    /// are left for the next one.
    pub fn flush(&mut self, doc: &mut Document) -> usize {
        let Some((root, styles)) = self
            .active
            .as_ref()
            .map(|active| (active.root, active.styles.clone()))
        else {
            return 0;
        };
        let shared = self.shared.clone();
        let Some(_guard) = FlushGuard::enter(&shared.flushing) else {
            tracing::trace!("flush already running");
            return 0;
        };

        let (captured, dropped) = {
            let mut inbox = shared.inbox.borrow_mut();
            let dropped = std::mem::take(&mut inbox.dropped);
            (inbox.pending.take(), dropped)
        };
        if dropped > 0 {
            tracing::warn!(dropped, "inserted nodes were dropped from a full pending set");
            self.stats.dropped += dropped;
        }
        if captured.is_empty() {
            return 0;
        }

        let index = self.cache.get_or_build(&styles);
        self.pass = self.pass.next();

        let nodes = captured.len();
        let leaves = gather_leaves(doc, root, captured);
        let created = highlight_leaves(doc, &leaves, &index, self.pass);

        self.stats.flushes += 1;
        self.stats.highlighted += created;
        tracing::trace!(
            pass = self.pass.get(),
            nodes,
            leaves = leaves.len(),
            created,
            "flush"
        );
        created
    }
}

/// Leaves for the captured nodes still under `root`, deduplicated, in
/// capture order.
fn gather_leaves(doc: &Document, root: NodeId, captured: PendingSet) -> Vec<NodeId> {
    let mut seen = HashSet::new();
    let mut leaves = Vec::new();

    for node in captured {
        if !doc.contains(root, node) {
            continue;
        }
        let found = match doc.kind(node) {
            Ok(NodeKind::Text(_)) => vec![node],
            Ok(NodeKind::Element(_)) => collect_leaves(doc, node),
            Err(_) => continue,
        };
        leaves.extend(found.into_iter().filter(|leaf| seen.insert(*leaf)));
    }
    leaves
}

/// Queries.
impl Scheduler {
    pub fn state(&self) -> SchedulerState {
        if self.active.is_none() {
            return SchedulerState::Idle;
        }
        if self.shared.flushing.get() {
            return SchedulerState::Flushing;
        }
        let inbox = self.shared.inbox.borrow();
        if inbox.gate.is_armed() || !inbox.pending.is_empty() {
            SchedulerState::PendingAccumulating
        } else {
            SchedulerState::Observing
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// When the host should next call [`tick`](Self::tick).
    pub fn next_deadline(&self) -> Option<Instant> {
        self.active.as_ref()?;
        self.shared.inbox.borrow().gate.next_deadline()
    }

    /// Identifier of the most recent pass.
    pub fn pass(&self) -> PassId {
        self.pass
    }

    pub fn pending_len(&self) -> usize {
        self.shared.inbox.borrow().pending.len()
    }

    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }
}
