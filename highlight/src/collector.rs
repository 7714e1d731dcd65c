//! Enumeration of text leaves eligible for highlighting.

use crate::highlighter::highlight_leaf;
use phrasemark_core::dom::{Document, NodeId, NodeKind, PassId};
use phrasemark_search::PhraseIndex;

/// Non-blank text leaves under `root` in document order.
///
/// Subtrees rooted at a highlight or at a forbidden element are skipped. A
/// text `root` yields itself.
pub fn collect_leaves(doc: &Document, root: NodeId) -> Vec<NodeId> {
    let mut leaves = Vec::new();
    let mut stack = vec![root];

    while let Some(id) = stack.pop() {
        match doc.kind(id) {
            Ok(NodeKind::Text(text)) => {
                if !text.trim().is_empty() {
                    leaves.push(id);
                }
            }
            Ok(NodeKind::Element(element)) => {
                if element.is_highlight() || element.is_forbidden() {
                    continue;
                }
                if let Ok(children) = doc.children(id) {
                    stack.extend(children.iter().rev());
                }
            }
            Err(err) => tracing::trace!(?id, %err, "node vanished during collection"),
        }
    }

    leaves
}

/// Highlights each leaf that is still attached and not already inside a
/// highlight. Returns the total number of highlights created.
pub fn highlight_leaves(
    doc: &mut Document,
    leaves: &[NodeId],
    index: &PhraseIndex,
    pass: PassId,
) -> usize {
    let mut total = 0;
    for &leaf in leaves {
        if !doc.is_connected(leaf) {
            tracing::trace!(?leaf, "leaf detached before highlighting");
            continue;
        }
        let parent_marked = doc
            .parent(leaf)
            .ok()
            .flatten()
            .and_then(|parent| doc.element(parent).ok())
            .is_some_and(|e| e.is_highlight());
        if parent_marked {
            continue;
        }
        total += highlight_leaf(doc, leaf, index, pass);
    }
    total
}
