use crate::index::{IndexedPhrase, PhraseIndex};
use phrasemark_core::types::PhraseStyle;

/// A matched range `[start, end)` of the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSpan<'a> {
    pub start: usize,
    pub end: usize,
    pub style: &'a PhraseStyle,
}

impl MatchSpan<'_> {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn text<'t>(&self, text: &'t str) -> &'t str {
        &text[self.start..self.end]
    }
}

/// Alphanumerics and underscore.
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Scans `text` for phrases of `index`.
///
/// At each position the phrases are tried longest first and the first that
/// matches wins; scanning resumes after the consumed range, so the returned
/// spans are sorted by `start` and never overlap. Word boundaries are only
/// enforced on a phrase edge whose own character is a word character.
pub fn find_matches<'a>(text: &str, index: &'a PhraseIndex) -> Vec<MatchSpan<'a>> {
    let mut spans = Vec::new();
    if index.is_empty() {
        return spans;
    }

    let mut pos = 0;
    while pos < text.len() {
        let found = index
            .entries()
            .iter()
            .find_map(|entry| match_at(entry, text, pos).map(|end| (entry, end)));

        match found {
            Some((entry, end)) => {
                spans.push(MatchSpan {
                    start: pos,
                    end,
                    style: entry.style(),
                });
                pos = end;
            }
            None => pos += text[pos..].chars().next().map_or(1, char::len_utf8),
        }
    }

    spans
}

/// End offset of `entry` matched at `start`, boundaries included.
fn match_at(entry: &IndexedPhrase, text: &str, start: usize) -> Option<usize> {
    let rest = &text[start..];
    let len = match entry.folded() {
        None => rest
            .starts_with(entry.phrase())
            .then_some(entry.phrase().len())?,
        Some(folded) => folded_prefix_len(rest, folded)?,
    };
    let end = start + len;

    if entry.leading_word() && !boundary_before(text, start) {
        return None;
    }
    if entry.trailing_word() && !boundary_after(text, end) {
        return None;
    }
    Some(end)
}

/// Byte length of the prefix of `text` whose per-char lowercase form equals
/// `folded`.
fn folded_prefix_len(text: &str, folded: &str) -> Option<usize> {
    let mut want = folded.chars();
    for (offset, c) in text.char_indices() {
        for lower in c.to_lowercase() {
            if want.next() != Some(lower) {
                return None;
            }
        }
        if want.as_str().is_empty() {
            return Some(offset + c.len_utf8());
        }
    }
    None
}

fn boundary_before(text: &str, pos: usize) -> bool {
    text[..pos].chars().next_back().is_none_or(|c| !is_word_char(c))
}

fn boundary_after(text: &str, pos: usize) -> bool {
    text[pos..].chars().next().is_none_or(|c| !is_word_char(c))
}
