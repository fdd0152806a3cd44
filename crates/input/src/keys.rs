use protocol::Request;

/// Host key names that the editor spells differently.
const NAMED_KEYS: &[(&str, &str)] = &[
    ("Enter", "ret"),
    ("Tab", "tab"),
    ("Backspace", "backspace"),
    ("Delete", "del"),
    ("Escape", "esc"),
    ("ArrowUp", "up"),
    ("ArrowDown", "down"),
    ("ArrowLeft", "left"),
    ("ArrowRight", "right"),
    ("PageUp", "pageup"),
    ("PageDown", "pagedown"),
    ("Home", "home"),
    ("End", "end"),
    ("F1", "f1"),
    ("F2", "f2"),
    ("F3", "f3"),
    ("F4", "f4"),
    ("F5", "f5"),
    ("F6", "f6"),
    ("F7", "f7"),
    ("F8", "f8"),
    ("F9", "f9"),
    ("F10", "f10"),
    ("F11", "f11"),
    ("F12", "f12"),
    (">", "gt"),
    ("<", "lt"),
    ("-", "minus"),
];

pub fn named_key(key: &str) -> Option<&'static str> {
    NAMED_KEYS
        .iter()
        .find(|(host, _)| *host == key)
        .map(|(_, editor)| *editor)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub alt: bool,
    pub ctrl: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        alt: false,
        ctrl: false,
        shift: false,
    };

    pub fn ctrl() -> Self {
        Modifiers {
            ctrl: true,
            ..Self::NONE
        }
    }

    pub fn alt() -> Self {
        Modifiers {
            alt: true,
            ..Self::NONE
        }
    }

    pub fn shift() -> Self {
        Modifiers {
            shift: true,
            ..Self::NONE
        }
    }
}

fn with_modifiers(key: &str, mods: Modifiers) -> String {
    let mut s = key.to_string();
    if mods.alt {
        s.insert_str(0, "a-");
    }
    if mods.ctrl {
        s.insert_str(0, "c-");
    }
    match s.as_str() {
        "c-i" => s = "tab".to_string(),
        "c-h" => s = "backspace".to_string(),
        _ => {}
    }
    if mods.shift && s == "tab" {
        s = "s-tab".to_string();
    }
    if s.chars().count() == 1 { s } else { format!("<{s}>") }
}

/// Editor key string for a host key press, or `None` for keys the editor
/// has no name for (bare modifiers, media keys, ...).
///
/// `key` is the host's logical key name: a single character or a name such
/// as `Enter` or `ArrowLeft`.
pub fn encode_key(key: &str, mods: Modifiers) -> Option<String> {
    if let Some(named) = named_key(key) {
        return Some(with_modifiers(named, mods));
    }
    if key.chars().count() == 1 {
        return Some(with_modifiers(key, mods));
    }
    log::trace!(target: "input.keys", "ignored key {key:?}");
    None
}

pub fn key_request(key: &str, mods: Modifiers) -> Option<Request> {
    encode_key(key, mods).map(Request::Keys)
}
