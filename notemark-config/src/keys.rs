//! Keyboard shortcut normalization
//!
//! Users type shortcuts freely: `Ctrl-Shift-A`, `alt+alt+ctrl+p`, `F12+Shift`.
//! [`KeyCombo::parse`] reduces that to one canonical form, lower case and
//! `+`-joined, modifiers first in the order `ctrl`, `meta`, `shift`, `alt`.
//! Anything it cannot make sense of is rejected, never guessed at.
//!
//! `+` and `-` both separate tokens. A trailing run of separators names the
//! separator itself as the key when it is the whole input or at least two
//! characters long (`alt-shift++` is Shift+Alt+Plus); a single trailing
//! separator is just a separator.

use log::{debug, warn};
use notemark_babel::common::text::split_string;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;

const SEPARATORS: &str = "+-";

const NAMED_KEYS: &[&str] = &[
    "space",
    "tab",
    "enter",
    "return",
    "esc",
    "escape",
    "backspace",
    "del",
    "delete",
    "ins",
    "insert",
    "home",
    "end",
    "pgup",
    "pgdown",
    "pageup",
    "pagedown",
    "up",
    "down",
    "left",
    "right",
];

/// Operating system family, which decides what `meta` may be combined with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Platform {
    Darwin,
    Linux,
    Windows,
    #[default]
    Other,
}

impl Platform {
    /// The platform this binary was built for.
    pub fn current() -> Self {
        match std::env::consts::OS {
            "macos" => Platform::Darwin,
            "linux" => Platform::Linux,
            "windows" => Platform::Windows,
            _ => Platform::Other,
        }
    }

    /// Read a host platform identifier such as `darwin`, `linux2` or `win32`.
    pub fn from_identifier(identifier: &str) -> Self {
        let identifier = identifier.trim().to_ascii_lowercase();
        match identifier.as_str() {
            "darwin" | "macos" => Platform::Darwin,
            id if id.starts_with("linux") => Platform::Linux,
            "win32" | "windows" | "cygwin" => Platform::Windows,
            _ => Platform::Other,
        }
    }

    pub fn is_darwin(self) -> bool {
        self == Platform::Darwin
    }
}

/// Declaration order is the canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Modifier {
    Ctrl,
    Meta,
    Shift,
    Alt,
}

impl Modifier {
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "ctrl" => Some(Modifier::Ctrl),
            "meta" => Some(Modifier::Meta),
            "shift" => Some(Modifier::Shift),
            "alt" => Some(Modifier::Alt),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Modifier::Ctrl => "ctrl",
            Modifier::Meta => "meta",
            Modifier::Shift => "shift",
            Modifier::Alt => "alt",
        }
    }
}

/// Why a shortcut was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("empty key sequence")]
    Empty,
    #[error("token {0:?} contains whitespace")]
    Whitespace(String),
    #[error("more than one key: {first:?} and {second:?}")]
    SeveralKeys { first: String, second: String },
    #[error("modifiers without a key")]
    MissingKey,
    #[error("{0:?} is not a key")]
    UnknownKey(String),
    #[error("meta must be combined with ctrl on this platform")]
    MetaWithoutCtrl,
}

/// A validated shortcut: a set of modifiers and exactly one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    modifiers: BTreeSet<Modifier>,
    key: String,
}

impl KeyCombo {
    pub fn parse(raw: &str, platform: Platform) -> Result<Self, KeyError> {
        if raw.is_empty() {
            return Err(KeyError::Empty);
        }

        let body = raw.trim_end_matches(|c: char| SEPARATORS.contains(c));
        let trailing = &raw[body.len()..];
        let separator_key = if !trailing.is_empty() && (body.is_empty() || trailing.len() >= 2) {
            trailing.chars().next_back().map(String::from)
        } else {
            None
        };

        let mut modifiers = BTreeSet::new();
        let mut key: Option<String> = None;
        let tokens = split_string(body, SEPARATORS)
            .into_iter()
            .map(|token| {
                if token.chars().any(char::is_whitespace) {
                    Err(KeyError::Whitespace(token.to_string()))
                } else {
                    Ok(token.to_lowercase())
                }
            })
            .chain(separator_key.map(Ok));
        for token in tokens {
            let token = token?;
            if let Some(modifier) = Modifier::from_token(&token) {
                modifiers.insert(modifier);
                continue;
            }
            if let Some(first) = key.take() {
                return Err(KeyError::SeveralKeys {
                    first,
                    second: token,
                });
            }
            key = Some(token);
        }

        let key = key.ok_or(KeyError::MissingKey)?;
        if !is_legal_key(&key) {
            return Err(KeyError::UnknownKey(key));
        }
        if modifiers.contains(&Modifier::Meta)
            && !modifiers.contains(&Modifier::Ctrl)
            && !platform.is_darwin()
        {
            return Err(KeyError::MetaWithoutCtrl);
        }
        Ok(Self { modifiers, key })
    }

    pub fn modifiers(&self) -> impl Iterator<Item = Modifier> + '_ {
        self.modifiers.iter().copied()
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for modifier in &self.modifiers {
            write!(f, "{}+", modifier.as_str())?;
        }
        f.write_str(&self.key)
    }
}

fn is_legal_key(key: &str) -> bool {
    let mut chars = key.chars();
    if let (Some(only), None) = (chars.next(), chars.next()) {
        return !only.is_whitespace();
    }
    if let Some(number) = key.strip_prefix('f') {
        let digits = !number.is_empty() && number.bytes().all(|b| b.is_ascii_digit());
        if digits && !number.starts_with('0') {
            return number.parse::<u8>().is_ok_and(|n| (1..=35).contains(&n));
        }
    }
    NAMED_KEYS.contains(&key)
}

/// Canonical form of a user-typed shortcut, or `""` when there is none or it
/// is not valid.
pub fn validate_key_sequence(raw: Option<&str>, platform: Platform) -> String {
    let Some(raw) = raw else {
        return String::new();
    };
    match KeyCombo::parse(raw, platform) {
        Ok(combo) => combo.to_string(),
        Err(err) => {
            debug!("rejected key sequence {raw:?}: {err}");
            String::new()
        }
    }
}

/// Validate the user's shortcuts against the defaults.
///
/// Only actions present in `user` appear in the result. A valid shortcut is
/// stored in canonical form; an invalid one falls back to the default for that
/// action, unchanged, or is dropped when there is no default.
pub fn check_user_keybindings(
    defaults: &BTreeMap<String, String>,
    user: &BTreeMap<String, String>,
    platform: Platform,
) -> BTreeMap<String, String> {
    let mut checked = BTreeMap::new();
    for (action, raw) in user {
        match KeyCombo::parse(raw, platform) {
            Ok(combo) => {
                checked.insert(action.clone(), combo.to_string());
            }
            Err(err) => match defaults.get(action) {
                Some(default) => {
                    warn!("keybinding {action} = {raw:?} rejected ({err}), keeping {default:?}");
                    checked.insert(action.clone(), default.clone());
                }
                None => warn!("keybinding {action} = {raw:?} rejected ({err}), dropped"),
            },
        }
    }
    checked
}

/// Align user preferences with the defaults: exactly the default keys, the
/// user's value wherever the user has one.
pub fn normalize_user_prefs<V: Clone>(
    defaults: &BTreeMap<String, V>,
    user: &BTreeMap<String, V>,
) -> BTreeMap<String, V> {
    defaults
        .iter()
        .map(|(key, default)| {
            let value = user.get(key).unwrap_or(default);
            (key.clone(), value.clone())
        })
        .collect()
}
