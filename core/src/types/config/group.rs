use super::Palette;
use crate::types::{Color, Phrase, PhraseStyle};
use serde::{Deserialize, Serialize};

/// A named, switchable set of phrases sharing one look.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhraseGroup {
    pub name: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub phrases: Vec<Phrase>,
    #[serde(default = "GroupStyle::default_light")]
    pub light: GroupStyle,
    #[serde(default = "GroupStyle::default_dark")]
    pub dark: GroupStyle,
}

impl PhraseGroup {
    /// Styles for every phrase in this group under the given palette.
    pub fn styles(&self, palette: Palette) -> impl Iterator<Item = PhraseStyle> + '_ {
        let style = match palette {
            Palette::Light => self.light,
            Palette::Dark => self.dark,
        };
        let foreground = style.foreground();
        self.phrases
            .iter()
            .map(move |phrase| PhraseStyle::new(phrase.clone(), style.background, foreground))
    }
}

/// Colors for one palette. A missing foreground is derived from the background.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupStyle {
    pub background: Color,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground: Option<Color>,
}

impl GroupStyle {
    pub fn foreground(&self) -> Color {
        self.foreground
            .unwrap_or_else(|| self.background.readable_foreground())
    }

    fn default_light() -> Self {
        Self {
            background: Color::rgb(0xff, 0xf1, 0x76),
            foreground: None,
        }
    }

    fn default_dark() -> Self {
        Self {
            background: Color::rgb(0x8a, 0x6d, 0x00),
            foreground: None,
        }
    }
}

fn default_true() -> bool {
    true
}
