//! Arena-backed host document tree.
//!
//! Design:
//! - Nodes live in a slot arena addressed by generational [`NodeId`]s. A
//!   destroyed node frees its slot and bumps the generation, so stale handles
//!   held elsewhere resolve to [`DomError::NodeGone`] instead of aliasing a
//!   new node.
//! - Detaching (`remove`) keeps the node alive, matching how live documents
//!   let scripts hold on to removed subtrees.
//! - Structural changes (children added or removed) are reported to
//!   observers synchronously, after the mutation has completed, with shared
//!   access to the document. Text edits are not structural.
//! - Observers are held weakly; the [`Subscription`] returned by `observe`
//!   owns the callback.

mod node;
mod observer;

pub use error::DomError;
pub use node::{Element, HighlightMark, InlineStyle, NodeId, NodeKind, PassId};
pub use observer::{MutationCallback, MutationRecord, Subscription};

use node::{Node, Slot};
use observer::Registration;
use std::rc::Rc;

pub mod error {
    use super::NodeId;
    use thiserror::Error;

    #[derive(Debug, Clone, PartialEq, Eq, Error)]
    pub enum DomError {
        #[error("node {0:?} no longer exists")]
        NodeGone(NodeId),

        #[error("node {0:?} has no parent")]
        Detached(NodeId),

        #[error("node {0:?} is not a text node")]
        NotText(NodeId),

        #[error("node {0:?} is not an element")]
        NotElement(NodeId),

        #[error("offset {offset} is not a char boundary within node {node:?}")]
        InvalidOffset { node: NodeId, offset: usize },

        #[error("inserting {child:?} under {parent:?} would create a cycle")]
        HierarchyRequest { parent: NodeId, child: NodeId },

        #[error("{reference:?} is not a child of {parent:?}")]
        NotAChild { parent: NodeId, reference: NodeId },

        #[error("the document root cannot be destroyed")]
        RootRemoval,
    }
}

pub struct Document {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
    observers: Vec<Registration>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Create operations.
impl Document {
    /// Creates a document whose root is an empty `body` element.
    pub fn new() -> Self {
        let mut doc = Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: NodeId {
                index: 0,
                generation: 0,
            },
            observers: Vec::new(),
        };
        doc.root = doc.alloc(NodeKind::Element(Element::new("body")));
        doc
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(NodeKind::Element(Element::new(tag)))
    }

    pub fn create_element_with(&mut self, element: Element) -> NodeId {
        self.alloc(NodeKind::Element(element))
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::Text(text.into()))
    }

    /// Creates an element and appends it to `parent`.
    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> Result<NodeId, DomError> {
        let id = self.create_element(tag);
        self.append_child(parent, id)?;
        Ok(id)
    }

    /// Creates a text node and appends it to `parent`.
    pub fn append_text(
        &mut self,
        parent: NodeId,
        text: impl Into<String>,
    ) -> Result<NodeId, DomError> {
        let id = self.create_text(text);
        self.append_child(parent, id)?;
        Ok(id)
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let node = Node {
            parent: None,
            children: Vec::new(),
            kind,
        };

        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.node = Some(node);
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                NodeId {
                    index,
                    generation: 0,
                }
            }
        }
    }
}

/// Read operations.
impl Document {
    fn node(&self, id: NodeId) -> Result<&Node, DomError> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
            .ok_or(DomError::NodeGone(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, DomError> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
            .ok_or(DomError::NodeGone(id))
    }

    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node(id).is_ok()
    }

    pub fn kind(&self, id: NodeId) -> Result<&NodeKind, DomError> {
        Ok(&self.node(id)?.kind)
    }

    pub fn element(&self, id: NodeId) -> Result<&Element, DomError> {
        self.kind(id)?
            .as_element()
            .ok_or(DomError::NotElement(id))
    }

    pub fn text(&self, id: NodeId) -> Result<&str, DomError> {
        self.kind(id)?.as_text().ok_or(DomError::NotText(id))
    }

    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>, DomError> {
        Ok(self.node(id)?.parent)
    }

    pub fn children(&self, id: NodeId) -> Result<&[NodeId], DomError> {
        Ok(&self.node(id)?.children)
    }

    pub fn next_sibling(&self, id: NodeId) -> Result<Option<NodeId>, DomError> {
        let Some(parent) = self.parent(id)? else {
            return Ok(None);
        };
        let siblings = self.children(parent)?;
        Ok(siblings
            .iter()
            .position(|&c| c == id)
            .and_then(|i| siblings.get(i + 1))
            .copied())
    }

    /// Parent chain of `id`, nearest first, excluding `id` itself.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let first = self.parent(id).ok().flatten();
        std::iter::successors(first, move |&p| self.parent(p).ok().flatten())
    }

    /// Returns true if `node` is `ancestor` or lies beneath it.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        if !self.is_alive(ancestor) || !self.is_alive(node) {
            return false;
        }
        node == ancestor || self.ancestors(node).any(|a| a == ancestor)
    }

    /// Returns true if the node is reachable from the document root.
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.contains(self.root, id)
    }

    /// Concatenated text of the subtree in document order.
    pub fn text_content(&self, id: NodeId) -> Result<String, DomError> {
        let mut out = String::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let node = self.node(current)?;
            match &node.kind {
                NodeKind::Text(text) => out.push_str(text),
                NodeKind::Element(_) => stack.extend(node.children.iter().rev()),
            }
        }
        Ok(out)
    }

    /// Number of observers whose subscription is still held.
    pub fn observer_count(&self) -> usize {
        self.observers
            .iter()
            .filter(|r| r.callback.strong_count() > 0)
            .count()
    }
}

/// Content operations.
impl Document {
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> Result<(), DomError> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Text(current) => {
                *current = text.into();
                Ok(())
            }
            NodeKind::Element(_) => Err(DomError::NotText(id)),
        }
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Element(element) => {
                element.set_attribute(name, value);
                Ok(())
            }
            NodeKind::Text(_) => Err(DomError::NotElement(id)),
        }
    }

    /// Splits a text node at a byte offset.
    ///
    /// `id` keeps the text before `offset`. The remainder moves into a new
    /// text node that is inserted right after `id` when `id` has a parent.
    pub fn split_text(&mut self, id: NodeId, offset: usize) -> Result<NodeId, DomError> {
        let text = self.text(id)?;
        if offset > text.len() || !text.is_char_boundary(offset) {
            return Err(DomError::InvalidOffset { node: id, offset });
        }
        let tail = text[offset..].to_string();

        if let NodeKind::Text(text) = &mut self.node_mut(id)?.kind {
            text.truncate(offset);
        }

        let new = self.create_text(tail);
        if let Some(parent) = self.parent(id)? {
            let next = self.next_sibling(id)?;
            self.insert_before(parent, new, next)?;
        }
        Ok(new)
    }
}

/// Structure operations.
impl Document {
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.insert_before(parent, child, None)
    }

    /// Inserts `child` before `reference` (or last when `None`), detaching it
    /// from its current parent first.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<(), DomError> {
        self.element(parent)?;
        self.node(child)?;
        if self.contains(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        if let Some(reference) = reference {
            if reference == child {
                return Ok(());
            }
            if self.parent(reference)? != Some(parent) {
                return Err(DomError::NotAChild { parent, reference });
            }
        }

        self.detach(child)?;

        let node = self.node_mut(parent)?;
        let position = match reference {
            Some(reference) => node
                .children
                .iter()
                .position(|&c| c == reference)
                .ok_or(DomError::NotAChild { parent, reference })?,
            None => node.children.len(),
        };
        node.children.insert(position, child);
        self.node_mut(child)?.parent = Some(parent);

        self.notify(MutationRecord::added(parent, child));
        Ok(())
    }

    /// Detaches a node from its parent. The node stays alive.
    pub fn remove(&mut self, id: NodeId) -> Result<(), DomError> {
        self.detach(id)
    }

    /// Puts `new` where `old` is and detaches `old`.
    pub fn replace(&mut self, old: NodeId, new: NodeId) -> Result<(), DomError> {
        let parent = self.parent(old)?.ok_or(DomError::Detached(old))?;
        self.insert_before(parent, new, Some(old))?;
        self.detach(old)
    }

    /// Detaches a node and frees its whole subtree. Outstanding handles to
    /// any freed node become gone.
    pub fn destroy(&mut self, id: NodeId) -> Result<(), DomError> {
        if id == self.root {
            return Err(DomError::RootRemoval);
        }
        self.detach(id)?;

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let slot = &mut self.slots[current.index as usize];
            if slot.generation != current.generation {
                continue;
            }
            if let Some(node) = slot.node.take() {
                stack.extend(node.children);
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(current.index);
            }
        }
        Ok(())
    }

    /// Merges adjacent text siblings and drops empty text nodes under `root`.
    pub fn normalize(&mut self, root: NodeId) -> Result<(), DomError> {
        let mut stack = vec![root];
        while let Some(current) = stack.pop() {
            let children = self.children(current)?.to_vec();
            let mut previous_text: Option<NodeId> = None;

            for child in children {
                let text = match self.kind(child)? {
                    NodeKind::Text(text) => text.clone(),
                    NodeKind::Element(_) => {
                        previous_text = None;
                        stack.push(child);
                        continue;
                    }
                };

                if text.is_empty() {
                    self.destroy(child)?;
                    continue;
                }

                match previous_text {
                    Some(previous) => {
                        if let NodeKind::Text(merged) = &mut self.node_mut(previous)?.kind {
                            merged.push_str(&text);
                        }
                        self.destroy(child)?;
                    }
                    None => previous_text = Some(child),
                }
            }
        }
        Ok(())
    }

    fn detach(&mut self, id: NodeId) -> Result<(), DomError> {
        let Some(parent) = self.node(id)?.parent else {
            return Ok(());
        };
        self.node_mut(parent)?.children.retain(|&c| c != id);
        self.node_mut(id)?.parent = None;

        self.notify(MutationRecord::removed(parent, id));
        Ok(())
    }
}

/// Observation.
impl Document {
    /// Reports structural changes whose target lies under `root` (inclusive).
    pub fn observe<F>(&mut self, root: NodeId, callback: F) -> Result<Subscription, DomError>
    where
        F: Fn(&Document, &MutationRecord) + 'static,
    {
        self.node(root)?;
        let callback: Rc<MutationCallback> = Rc::new(callback);
        let (registration, subscription) = Registration::new(root, callback);
        self.observers.push(registration);
        Ok(subscription)
    }

    fn notify(&mut self, record: MutationRecord) {
        self.observers.retain(|r| r.callback.strong_count() > 0);
        if self.observers.is_empty() {
            return;
        }

        let callbacks: Vec<Rc<MutationCallback>> = self
            .observers
            .iter()
            .filter(|r| self.contains(r.root, record.target))
            .filter_map(|r| r.callback.upgrade())
            .collect();

        for callback in callbacks {
            callback(&*self, &record);
        }
    }
}
