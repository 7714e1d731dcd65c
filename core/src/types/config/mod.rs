mod app;
mod domain;
mod group;
mod scheduler;

pub use app::{AppConfig, AppConfigError, ResolvedHighlights};
pub use domain::{DomainBinding, FilterMode, GroupFilter, MatchBreadth, Palette, PaletteMode};
pub use group::{GroupStyle, PhraseGroup};
pub use scheduler::SchedulerSettings;
