//! Phrase matching for highlighting.
//!
//! # Design
//!
//! - [`PhraseIndex`] is a read-only snapshot of a phrase→style map: phrases
//!   ordered longest first (ties keep map order), each classified as
//!   case-sensitive or not, with folded forms precomputed.
//! - [`IndexCache`] keeps one index and rebuilds it only when it is handed a
//!   different `Arc<StyleMap>`.
//! - [`find_matches`] scans left to right and takes, at each position, the
//!   longest phrase that matches there. Spans never overlap.
//!
//! Positions are UTF-8 byte offsets into the scanned text and always fall on
//! char boundaries.

mod cache;
mod index;
mod matcher;

pub use cache::IndexCache;
pub use index::{IndexedPhrase, PhraseIndex};
pub use matcher::{MatchSpan, find_matches, is_word_char};

#[cfg(test)]
mod tests;
