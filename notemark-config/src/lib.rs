//! Shared preferences for notemark hosts.
//!
//! `defaults/notemark.default.toml` is embedded into every binary so that docs
//! and runtime behavior stay in sync. Hosts layer user-specific files on top of
//! those defaults via [`Loader`] before deserializing into [`NotemarkConfig`],
//! then build the process state with [`Preferences::init`].

pub mod keys;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use keys::{check_user_keybindings, normalize_user_prefs, Platform};
use log::warn;
use notemark_babel::MarkdownOptions;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/notemark.default.toml");

/// Top-level configuration consumed by notemark hosts.
#[derive(Debug, Clone, Deserialize)]
pub struct NotemarkConfig {
    pub markdown: MarkdownConfig,
    pub keybindings: Keybindings,
}

/// Mirrors the knobs exposed by the converter.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkdownConfig {
    pub keep_empty_lines: bool,
    pub put_breaks: bool,
    pub separate_definition_groups: bool,
}

impl From<MarkdownConfig> for MarkdownOptions {
    fn from(config: MarkdownConfig) -> Self {
        MarkdownOptions::from(&config)
    }
}

impl From<&MarkdownConfig> for MarkdownOptions {
    fn from(config: &MarkdownConfig) -> Self {
        MarkdownOptions {
            keep_empty_lines: config.keep_empty_lines,
            put_breaks: config.put_breaks,
            separate_definition_groups: config.separate_definition_groups,
        }
    }
}

/// Raw shortcut strings, one per editor action.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Keybindings {
    pub code: String,
    pub unordered_list: String,
    pub ordered_list: String,
    pub strikethrough: String,
    pub pre: String,
    pub horizontal_rule: String,
    pub indent: String,
    pub outdent: String,
    pub definition_list: String,
    pub table: String,
    pub keyboard: String,
    pub hyperlink: String,
    pub blockquote: String,
    pub heading: String,
    pub abbreviation: String,
    pub markdown: String,
}

impl Keybindings {
    /// Action name to raw shortcut.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        [
            ("code", &self.code),
            ("unordered_list", &self.unordered_list),
            ("ordered_list", &self.ordered_list),
            ("strikethrough", &self.strikethrough),
            ("pre", &self.pre),
            ("horizontal_rule", &self.horizontal_rule),
            ("indent", &self.indent),
            ("outdent", &self.outdent),
            ("definition_list", &self.definition_list),
            ("table", &self.table),
            ("keyboard", &self.keyboard),
            ("hyperlink", &self.hyperlink),
            ("blockquote", &self.blockquote),
            ("heading", &self.heading),
            ("abbreviation", &self.abbreviation),
            ("markdown", &self.markdown),
        ]
        .into_iter()
        .map(|(action, shortcut)| (action.to_string(), shortcut.clone()))
        .collect()
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer TOML held in memory, such as preferences read from host storage.
    pub fn with_toml(mut self, toml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(toml, FileFormat::Toml));
        self
    }

    /// Apply a single key/value override.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<NotemarkConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<NotemarkConfig, ConfigError> {
    Loader::new().build()
}

/// Process state built once from a loaded configuration.
///
/// Nothing here is global: hosts keep the value for as long as they need it
/// and drop it on shutdown.
#[derive(Debug, Clone, PartialEq)]
pub struct Preferences {
    pub markdown: MarkdownOptions,
    /// Canonical shortcut per action. Actions whose shortcut was rejected
    /// carry the built-in default.
    pub keybindings: BTreeMap<String, String>,
    pub platform: Platform,
}

impl Preferences {
    /// Build the state from a loaded configuration.
    ///
    /// The layered `[keybindings]` table always names every action; a
    /// shortcut that does not validate falls back to the built-in default.
    pub fn init(config: &NotemarkConfig, platform: Platform) -> Result<Self, ConfigError> {
        let defaults = load_defaults()?.keybindings.to_map();
        let keybindings =
            check_user_keybindings(&defaults, &config.keybindings.to_map(), platform);
        Ok(Self {
            markdown: MarkdownOptions::from(&config.markdown),
            keybindings,
            platform,
        })
    }

    /// Apply shortcuts kept by the host's own preference store.
    ///
    /// `user` may name any subset of actions. Actions it does not know are
    /// dropped, and a shortcut that does not validate keeps the current one.
    pub fn apply_user_keybindings(&mut self, user: &BTreeMap<String, String>) {
        for action in user.keys().filter(|action| !self.keybindings.contains_key(*action)) {
            warn!("unknown action {action:?} in user keybindings, dropped");
        }
        let user = normalize_user_prefs(&self.keybindings, user);
        self.keybindings = check_user_keybindings(&self.keybindings, &user, self.platform);
    }

    pub fn keybinding(&self, action: &str) -> Option<&str> {
        self.keybindings.get(action).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert!(!config.markdown.keep_empty_lines);
        assert!(!config.markdown.put_breaks);
        assert!(config.markdown.separate_definition_groups);
        assert_eq!(config.keybindings.code, "ctrl+,");
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("markdown.put_breaks", true)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert!(config.markdown.put_breaks);
    }

    #[test]
    fn markdown_config_converts_to_options() {
        let config = load_defaults().expect("defaults to deserialize");
        let options: MarkdownOptions = config.markdown.into();
        assert_eq!(options, MarkdownOptions::default());
    }

    #[test]
    fn default_keybindings_are_canonical_everywhere() {
        let defaults = load_defaults()
            .expect("defaults to deserialize")
            .keybindings
            .to_map();
        assert_eq!(defaults.len(), 16);
        for platform in [Platform::Darwin, Platform::Linux, Platform::Windows] {
            for (action, shortcut) in &defaults {
                assert_eq!(
                    &keys::validate_key_sequence(Some(shortcut), platform),
                    shortcut,
                    "{action} on {platform:?}"
                );
            }
        }
    }

    #[test]
    fn unknown_action_is_rejected() {
        let result = Loader::new()
            .with_toml("[keybindings]\nbogus = \"ctrl+b\"\n")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn user_file_layers_over_defaults() {
        let config = Loader::new()
            .with_toml("[keybindings]\nheading = \"Alt-Ctrl-2\"\n")
            .build()
            .expect("config to build");
        assert_eq!(config.keybindings.heading, "Alt-Ctrl-2");
        assert_eq!(config.keybindings.code, "ctrl+,");
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let config = Loader::new()
            .with_optional_file("does/not/exist/notemark.toml")
            .build()
            .expect("config to build");
        assert!(config.markdown.separate_definition_groups);
    }

    #[test]
    fn init_normalizes_user_keybindings() {
        let config = Loader::new()
            .with_toml("[keybindings]\nheading = \"Alt-Ctrl-2\"\ntable = \"ctrl+\"\n")
            .build()
            .expect("config to build");
        let prefs = Preferences::init(&config, Platform::Linux).expect("preferences");
        assert_eq!(prefs.keybinding("heading"), Some("ctrl+alt+2"));
        assert_eq!(prefs.keybinding("table"), Some("ctrl+shift+3"));
        assert_eq!(prefs.keybinding("code"), Some("ctrl+,"));
        assert_eq!(prefs.keybinding("bogus"), None);
        assert_eq!(prefs.keybindings.len(), 16);
    }

    #[test]
    fn applies_partial_user_keybindings() {
        let config = load_defaults().expect("defaults to deserialize");
        let mut prefs = Preferences::init(&config, Platform::Linux).expect("preferences");
        let user: BTreeMap<String, String> = [
            ("heading", "Alt-Ctrl-2"),
            ("table", "ctrl+"),
            ("bogus", "ctrl+b"),
        ]
        .into_iter()
        .map(|(action, shortcut)| (action.to_string(), shortcut.to_string()))
        .collect();

        prefs.apply_user_keybindings(&user);
        assert_eq!(prefs.keybinding("heading"), Some("ctrl+alt+2"));
        assert_eq!(prefs.keybinding("table"), Some("ctrl+shift+3"));
        assert_eq!(prefs.keybinding("code"), Some("ctrl+,"));
        assert_eq!(prefs.keybinding("bogus"), None);
        assert_eq!(prefs.keybindings.len(), 16);
    }

    #[test]
    fn meta_binding_depends_on_platform() {
        let config = Loader::new()
            .set_override("keybindings.markdown", "meta+m")
            .expect("override to apply")
            .build()
            .expect("config to build");
        let darwin = Preferences::init(&config, Platform::Darwin).expect("preferences");
        let linux = Preferences::init(&config, Platform::Linux).expect("preferences");
        assert_eq!(darwin.keybinding("markdown"), Some("meta+m"));
        assert_eq!(linux.keybinding("markdown"), Some("ctrl+shift+0"));
    }

    #[test]
    fn init_carries_markdown_options() {
        let config = Loader::new()
            .set_override("markdown.keep_empty_lines", true)
            .expect("override to apply")
            .build()
            .expect("config to build");
        let prefs = Preferences::init(&config, Platform::current()).expect("preferences");
        assert!(prefs.markdown.keep_empty_lines);
        assert!(prefs.markdown.separate_definition_groups);
    }
}
