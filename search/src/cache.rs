use crate::index::PhraseIndex;
use phrasemark_core::types::StyleMap;
use std::sync::Arc;

/// Single-slot cache keyed by the identity of the style map `Arc`.
///
/// Handing in the same `Arc` again returns the cached index without any
/// work; any other `Arc`, even one with equal contents, rebuilds.
#[derive(Debug, Default)]
pub struct IndexCache {
    slot: Option<(Arc<StyleMap>, Arc<PhraseIndex>)>,
    builds: usize,
}

impl IndexCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_build(&mut self, styles: &Arc<StyleMap>) -> Arc<PhraseIndex> {
        if let Some((cached_styles, index)) = &self.slot {
            if Arc::ptr_eq(cached_styles, styles) {
                return index.clone();
            }
        }

        let index = Arc::new(PhraseIndex::build(styles));
        self.slot = Some((styles.clone(), index.clone()));
        self.builds += 1;
        index
    }

    /// Returns the cached index, if any.
    pub fn current(&self) -> Option<&Arc<PhraseIndex>> {
        self.slot.as_ref().map(|(_, index)| index)
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }

    /// Number of times an index has been built.
    pub fn builds(&self) -> usize {
        self.builds
    }
}
