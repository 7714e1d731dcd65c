use crate::matcher::is_word_char;
use phrasemark_core::types::{PhraseStyle, StyleMap};

/// One phrase prepared for scanning.
#[derive(Debug, Clone)]
pub struct IndexedPhrase {
    style: PhraseStyle,
    case_sensitive: bool,
    folded: Option<String>,
    char_len: usize,
    leading_word: bool,
    trailing_word: bool,
}

impl IndexedPhrase {
    fn new(style: &PhraseStyle) -> Self {
        let phrase = style.phrase.as_str();
        let case_sensitive = is_case_sensitive(phrase);

        Self {
            style: style.clone(),
            case_sensitive,
            folded: (!case_sensitive).then(|| phrase.chars().flat_map(char::to_lowercase).collect()),
            char_len: phrase.chars().count(),
            leading_word: phrase.chars().next().is_some_and(is_word_char),
            trailing_word: phrase.chars().next_back().is_some_and(is_word_char),
        }
    }

    pub fn phrase(&self) -> &str {
        self.style.phrase.as_str()
    }

    pub fn style(&self) -> &PhraseStyle {
        &self.style
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Lower-cased phrase, present only for case-insensitive phrases.
    pub fn folded(&self) -> Option<&str> {
        self.folded.as_deref()
    }

    pub fn char_len(&self) -> usize {
        self.char_len
    }

    pub(crate) fn leading_word(&self) -> bool {
        self.leading_word
    }

    pub(crate) fn trailing_word(&self) -> bool {
        self.trailing_word
    }
}

/// Phrases containing a letter, all of whose letters are uppercase, only
/// match exact case. Everything else matches case-insensitively.
fn is_case_sensitive(phrase: &str) -> bool {
    let mut letters = phrase.chars().filter(|c| c.is_alphabetic()).peekable();
    letters.peek().is_some() && letters.all(char::is_uppercase)
}

/// Read-only snapshot of a style map prepared for [`find_matches`](crate::find_matches).
#[derive(Debug, Clone, Default)]
pub struct PhraseIndex {
    entries: Vec<IndexedPhrase>,
}

impl PhraseIndex {
    pub fn build(styles: &StyleMap) -> Self {
        let mut entries: Vec<IndexedPhrase> = styles.iter().map(IndexedPhrase::new).collect();
        // Stable: equal lengths keep map order.
        entries.sort_by(|a, b| b.char_len.cmp(&a.char_len));

        tracing::trace!(phrases = entries.len(), "built phrase index");
        Self { entries }
    }

    /// Entries in match priority order.
    pub fn entries(&self) -> &[IndexedPhrase] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
