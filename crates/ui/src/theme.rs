use std::collections::BTreeMap;

/// The "eighties" palette.
const EIGHTIES: &[(&str, &str)] = &[
    ("black", "#2d2d2d"),
    ("bright-green", "#393939"),
    ("bright-yellow", "#515151"),
    ("bright-black", "#747369"),
    ("bright-blue", "#a09f93"),
    ("white", "#d3d0c8"),
    ("bright-magenta", "#e8e6df"),
    ("bright-white", "#f2f0ec"),
    ("red", "#f2777a"),
    ("bright-red", "#f99157"),
    ("yellow", "#ffcc66"),
    ("green", "#99cc99"),
    ("cyan", "#66cccc"),
    ("blue", "#6699cc"),
    ("magenta", "#cc99cc"),
    ("bright-cyan", "#d27b53"),
];

/// Maps editor colour names to CSS colours.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Theme {
    colours: BTreeMap<String, String>,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            colours: EIGHTIES
                .iter()
                .map(|(name, css)| (name.to_string(), css.to_string()))
                .collect(),
        }
    }
}

fn is_default(name: &str) -> bool {
    name.is_empty() || name == "default"
}

impl Theme {
    pub fn with_overrides(overrides: &BTreeMap<String, String>) -> Self {
        let mut theme = Self::default();
        for (name, css) in overrides {
            theme.colours.insert(name.clone(), css.clone());
        }
        theme
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.colours.get(name).map(String::as_str)
    }

    /// CSS colour for `name`.
    ///
    /// `default` (or an empty name) resolves through `fallback` when one is
    /// given and to `inherit` otherwise. Unknown names pass through, with
    /// the editor's `rgb:rrggbb` spelling rewritten to `#rrggbb`.
    pub fn resolve(&self, name: &str, fallback: Option<&str>) -> String {
        if is_default(name) {
            return match fallback {
                Some(fallback) if !is_default(fallback) => self.resolve(fallback, None),
                _ => "inherit".to_string(),
            };
        }
        if let Some(css) = self.get(name) {
            return css.to_string();
        }
        match name.strip_prefix("rgb:") {
            Some(hex) => format!("#{hex}"),
            None => name.to_string(),
        }
    }
}
