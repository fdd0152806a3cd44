use serde::{Deserialize, Serialize};

/// Colour pair plus attribute flags. Colours are editor colour names
/// (`default`, `red`, `bright-blue`, ...) or `#rrggbb` / `rgb:rrggbb` values.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Face {
    #[serde(default = "default_colour")]
    pub fg: String,
    #[serde(default = "default_colour")]
    pub bg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underline: Option<String>,
    #[serde(default)]
    pub attributes: Vec<String>,
}

fn default_colour() -> String {
    "default".to_string()
}

impl Face {
    pub fn new(fg: impl Into<String>, bg: impl Into<String>) -> Self {
        Self {
            fg: fg.into(),
            bg: bg.into(),
            underline: None,
            attributes: Vec::new(),
        }
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a == name)
    }
}

/// Run of characters sharing one face.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Atom {
    pub face: Face,
    pub contents: String,
}

impl Atom {
    pub fn new(face: Face, contents: impl Into<String>) -> Self {
        Self {
            face,
            contents: contents.into(),
        }
    }
}

pub type Line = Vec<Atom>;

/// Concatenated contents of a line.
pub fn line_text(line: &[Atom]) -> String {
    line.iter().map(|atom| atom.contents.as_str()).collect()
}

/// Number of characters on a line.
pub fn line_len(line: &[Atom]) -> usize {
    line.iter().map(|atom| atom.contents.chars().count()).sum()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub line: i64,
    pub column: i64,
}

/// Info box text. Older editors send plain strings, newer ones styled lines.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InfoText {
    Plain(String),
    Lines(Vec<Line>),
}

impl InfoText {
    pub fn to_plain(&self) -> String {
        match self {
            InfoText::Plain(text) => text.clone(),
            InfoText::Lines(lines) => lines
                .iter()
                .map(|line| line_text(line))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

impl Default for InfoText {
    fn default() -> Self {
        InfoText::Plain(String::new())
    }
}
