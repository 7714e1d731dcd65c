use super::{Document, NodeId};
use std::rc::{Rc, Weak};

/// One structural change: children added to and/or removed from `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    pub target: NodeId,
    pub added: Vec<NodeId>,
    pub removed: Vec<NodeId>,
}

impl MutationRecord {
    pub(crate) fn added(target: NodeId, node: NodeId) -> Self {
        Self {
            target,
            added: vec![node],
            removed: Vec::new(),
        }
    }

    pub(crate) fn removed(target: NodeId, node: NodeId) -> Self {
        Self {
            target,
            added: Vec::new(),
            removed: vec![node],
        }
    }
}

/// Callback invoked after each structural mutation under an observed root.
pub type MutationCallback = dyn Fn(&Document, &MutationRecord);

/// RAII guard for an observer. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    _callback: Rc<MutationCallback>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

pub(crate) struct Registration {
    pub(crate) root: NodeId,
    pub(crate) callback: Weak<MutationCallback>,
}

impl Registration {
    pub(crate) fn new(root: NodeId, callback: Rc<MutationCallback>) -> (Self, Subscription) {
        let registration = Self {
            root,
            callback: Rc::downgrade(&callback),
        };
        (registration, Subscription { _callback: callback })
    }
}
