pub(crate) mod color;
pub use color::{Color, ColorParseError};

pub(crate) mod config;
pub use config::{
    AppConfig, AppConfigError, DomainBinding, FilterMode, GroupFilter, GroupStyle, MatchBreadth,
    Palette, PaletteMode, PhraseGroup, ResolvedHighlights, SchedulerSettings,
};

pub(crate) mod phrase;
pub use phrase::{MAX_PHRASE_LENGTH, Phrase, PhraseError};

pub(crate) mod style;
pub use style::{PhraseStyle, StyleMap};
