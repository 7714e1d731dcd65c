use serde::{Deserialize, Serialize};

/// Binds a host pattern to the palette and groups used on it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DomainBinding {
    pub host: String,
    #[serde(default)]
    pub breadth: MatchBreadth,
    #[serde(default)]
    pub palette: PaletteMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<GroupFilter>,
}

impl DomainBinding {
    /// `*` matches every host. Comparison ignores ASCII case.
    pub fn matches_host(&self, host: &str) -> bool {
        let pattern = self.host.trim();
        if pattern == "*" {
            return true;
        }
        if pattern.is_empty() {
            return false;
        }

        let host = host.trim().trim_end_matches('.');
        let pattern = pattern.trim_end_matches('.');
        if host.eq_ignore_ascii_case(pattern) {
            return true;
        }

        match self.breadth {
            MatchBreadth::Exact => false,
            MatchBreadth::Subdomains => {
                host.len() > pattern.len()
                    && host
                        .get(host.len() - pattern.len() - 1..)
                        .is_some_and(|suffix| {
                            suffix.starts_with('.') && suffix[1..].eq_ignore_ascii_case(pattern)
                        })
            }
        }
    }

    pub fn admits_group(&self, name: &str) -> bool {
        match &self.filter {
            None => true,
            Some(filter) => {
                let listed = filter.groups.iter().any(|g| g == name);
                match filter.mode {
                    FilterMode::Include => listed,
                    FilterMode::Exclude => !listed,
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchBreadth {
    Exact,
    #[default]
    Subdomains,
}

/// Palette preference of a binding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteMode {
    Light,
    Dark,
    #[default]
    System,
}

impl PaletteMode {
    pub fn resolve(self, system_prefers_dark: bool) -> Palette {
        match self {
            PaletteMode::Light => Palette::Light,
            PaletteMode::Dark => Palette::Dark,
            PaletteMode::System if system_prefers_dark => Palette::Dark,
            PaletteMode::System => Palette::Light,
        }
    }
}

/// Palette actually in effect on a page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Palette {
    Light,
    Dark,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupFilter {
    #[serde(default)]
    pub mode: FilterMode,
    #[serde(default)]
    pub groups: Vec<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    Include,
    Exclude,
}
