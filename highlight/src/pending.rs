use phrasemark_core::dom::NodeId;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Added,
    Duplicate,
    /// The set was full; the node will not be processed.
    Dropped,
}

/// Ordered, deduplicating, capacity-bounded set of nodes awaiting a flush.
#[derive(Debug, Clone)]
pub struct PendingSet {
    order: Vec<NodeId>,
    members: HashSet<NodeId>,
    capacity: usize,
}

impl PendingSet {
    pub fn new(capacity: usize) -> Self {
        Self {
            order: Vec::new(),
            members: HashSet::new(),
            capacity,
        }
    }

    pub fn insert(&mut self, node: NodeId) -> InsertOutcome {
        if self.members.contains(&node) {
            return InsertOutcome::Duplicate;
        }
        if self.order.len() >= self.capacity {
            return InsertOutcome::Dropped;
        }
        self.members.insert(node);
        self.order.push(node);
        InsertOutcome::Added
    }

    /// Hands the current contents over and leaves an empty set of the same
    /// capacity behind.
    pub fn take(&mut self) -> PendingSet {
        let capacity = self.capacity;
        std::mem::replace(self, PendingSet::new(capacity))
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.members.contains(&node)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.order.iter().copied()
    }
}

impl IntoIterator for PendingSet {
    type Item = NodeId;
    type IntoIter = std::vec::IntoIter<NodeId>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.into_iter()
    }
}
