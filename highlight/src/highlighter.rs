//! In-place annotation of text leaves.

use phrasemark_core::dom::{
    Document, DomError, Element, HighlightMark, InlineStyle, NodeId, NodeKind, PassId,
};
use phrasemark_core::types::PhraseStyle;
use phrasemark_search::{MatchSpan, PhraseIndex, find_matches};

/// Tag of every highlight element.
pub const HIGHLIGHT_TAG: &str = "mark";

pub fn highlight_element(style: &PhraseStyle, pass: PassId) -> Element {
    Element::new(HIGHLIGHT_TAG)
        .with_style(InlineStyle {
            background: style.background,
            foreground: style.foreground,
        })
        .with_mark(HighlightMark { pass })
}

/// False when the leaf sits inside a highlight or inside an element whose
/// content must not be rewritten.
pub fn is_rewritable(doc: &Document, leaf: NodeId) -> bool {
    doc.ancestors(leaf).all(|ancestor| {
        doc.element(ancestor)
            .is_ok_and(|e| !e.is_highlight() && !e.is_forbidden())
    })
}

/// Scans one leaf and wraps its matches. Returns the number of highlights
/// created.
pub fn highlight_leaf(doc: &mut Document, leaf: NodeId, index: &PhraseIndex, pass: PassId) -> usize {
    let spans = match doc.text(leaf) {
        Ok(text) if !text.trim().is_empty() => find_matches(text, index),
        Ok(_) => return 0,
        Err(err) => {
            tracing::debug!(?leaf, %err, "skipping leaf");
            return 0;
        }
    };
    apply_highlights(doc, leaf, &spans, pass)
}

/// Wraps each span of `leaf` in a highlight element.
///
/// Spans must come from scanning the leaf's current text. They are applied
/// last to first so the offsets of the remaining ones stay valid; the
/// original node keeps the text before the first span. If the leaf or its
/// parent disappears part way, the remaining spans are abandoned for this
/// pass.
pub fn apply_highlights(
    doc: &mut Document,
    leaf: NodeId,
    spans: &[MatchSpan<'_>],
    pass: PassId,
) -> usize {
    if spans.is_empty() {
        return 0;
    }
    match doc.text(leaf) {
        Ok(text) if !text.trim().is_empty() => {}
        Ok(_) => return 0,
        Err(err) => {
            tracing::debug!(?leaf, %err, "leaf vanished before highlighting");
            return 0;
        }
    }
    if !is_rewritable(doc, leaf) {
        return 0;
    }

    let mut created = 0;
    for span in spans.iter().rev() {
        match wrap_span(doc, leaf, span, pass) {
            Ok(()) => created += 1,
            Err(err) => {
                tracing::debug!(?leaf, %err, created, "abandoning leaf after concurrent rewrite");
                break;
            }
        }
    }
    created
}

/// Moves the span's text into a new highlight placed right after what is left
/// of `leaf`.
///
/// The highlight is filled while still detached, so observers only ever see
/// the split-off tail and the finished highlight arrive under the parent.
fn wrap_span(
    doc: &mut Document,
    leaf: NodeId,
    span: &MatchSpan<'_>,
    pass: PassId,
) -> Result<(), DomError> {
    let parent = doc.parent(leaf)?.ok_or(DomError::Detached(leaf))?;
    let text = doc.text(leaf)?;
    let Some(matched) = text.get(span.start..span.end) else {
        return Err(DomError::InvalidOffset {
            node: leaf,
            offset: span.end,
        });
    };
    let matched = matched.to_string();
    let len = text.len();

    if span.end < len {
        doc.split_text(leaf, span.end)?;
    }
    let next = doc.next_sibling(leaf)?;

    let mark = doc.create_element_with(highlight_element(span.style, pass));
    if span.start > 0 {
        let prefix = doc.text(leaf)?[..span.start].to_string();
        doc.set_text(leaf, prefix)?;
        doc.append_text(mark, matched)?;
    } else {
        doc.append_child(mark, leaf)?;
    }
    doc.insert_before(parent, mark, next)
}

/// Removes every highlight under `root`, putting the highlighted text back
/// and merging the fragments. Returns the number of highlights removed.
pub fn clear_highlights(doc: &mut Document, root: NodeId) -> usize {
    let mut parents: Vec<NodeId> = Vec::new();
    let mut cleared = 0;

    for mark in collect_marks(doc, root) {
        match unwrap_mark(doc, mark) {
            Ok(parent) => {
                cleared += 1;
                if !parents.contains(&parent) {
                    parents.push(parent);
                }
            }
            Err(err) => tracing::debug!(?mark, %err, "could not unwrap highlight"),
        }
    }

    for parent in parents {
        if let Err(err) = doc.normalize(parent) {
            tracing::debug!(?parent, %err, "could not merge text after clearing");
        }
    }
    cleared
}

fn collect_marks(doc: &Document, root: NodeId) -> Vec<NodeId> {
    let mut marks = Vec::new();
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        let Ok(NodeKind::Element(element)) = doc.kind(id) else {
            continue;
        };
        if element.is_highlight() {
            marks.push(id);
        } else if let Ok(children) = doc.children(id) {
            stack.extend(children.iter().rev());
        }
    }
    marks
}

fn unwrap_mark(doc: &mut Document, mark: NodeId) -> Result<NodeId, DomError> {
    let parent = doc.parent(mark)?.ok_or(DomError::Detached(mark))?;
    for child in doc.children(mark)?.to_vec() {
        doc.insert_before(parent, child, Some(mark))?;
    }
    doc.destroy(mark)?;
    Ok(parent)
}
