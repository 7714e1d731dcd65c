//! Incremental phrase highlighting over a live document.
//!
//! # Design
//!
//! - [`highlighter`] rewrites one text leaf at a time: matched ranges are split
//!   out in place and wrapped in marked inline elements. A leaf that vanishes
//!   mid-rewrite is abandoned for the pass, never retried.
//! - [`collector`] walks a subtree with an explicit worklist and yields the
//!   leaves worth scanning, skipping existing highlights and elements whose
//!   content must not be rewritten.
//! - [`Scheduler`] runs one full pass on activation, then only looks at nodes
//!   reported as inserted. Reported nodes accumulate in a bounded
//!   [`PendingSet`]; a [`FlushGate`] decides when to flush (throttled, plus a
//!   trailing debounce). A flush swaps the pending set out first, so
//!   insertions caused by the flush itself land in the next set.
//!
//! Everything runs on the host's single thread. Time only advances through the
//! [`Clock`] the scheduler is given, which keeps the gate testable.

mod clock;
pub mod collector;
mod config;
mod gate;
pub mod highlighter;
mod pending;
mod scheduler;

pub use clock::{Clock, ManualClock, SystemClock};
pub use collector::{collect_leaves, highlight_leaves};
pub use config::SchedulerConfig;
pub use gate::FlushGate;
pub use highlighter::{
    HIGHLIGHT_TAG, apply_highlights, clear_highlights, highlight_element, highlight_leaf,
    is_rewritable,
};
pub use pending::{InsertOutcome, PendingSet};
pub use scheduler::{Scheduler, SchedulerError, SchedulerState, SchedulerStats};
