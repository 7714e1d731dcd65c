//! Resolved phrase styles.

use super::{Color, Phrase};

/// A phrase together with the colors its highlights are drawn in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhraseStyle {
    pub phrase: Phrase,
    pub background: Color,
    pub foreground: Color,
}

impl PhraseStyle {
    pub fn new(phrase: Phrase, background: Color, foreground: Color) -> Self {
        Self {
            phrase,
            background,
            foreground,
        }
    }
}

/// Ordered phrase→style map. The first style inserted for a phrase wins.
///
/// Shared behind an `Arc`; the pointer identity of that `Arc` is what decides
/// whether a derived phrase index is still current.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleMap {
    entries: Vec<PhraseStyle>,
}

impl StyleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the phrase was already present.
    pub fn insert(&mut self, style: PhraseStyle) -> bool {
        if self.get(style.phrase.as_str()).is_some() {
            return false;
        }
        self.entries.push(style);
        true
    }

    pub fn get(&self, phrase: &str) -> Option<&PhraseStyle> {
        self.entries.iter().find(|s| s.phrase.as_str() == phrase)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PhraseStyle> + '_ {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<PhraseStyle> for StyleMap {
    fn from_iter<I: IntoIterator<Item = PhraseStyle>>(iter: I) -> Self {
        let mut map = StyleMap::new();
        for style in iter {
            map.insert(style);
        }
        map
    }
}

impl<'a> IntoIterator for &'a StyleMap {
    type Item = &'a PhraseStyle;
    type IntoIter = std::slice::Iter<'a, PhraseStyle>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
