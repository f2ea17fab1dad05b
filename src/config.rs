use std::{
    collections::BTreeMap,
    fs,
    path::PathBuf,
};

use color_eyre::{
    Result,
    eyre::{Context, ContextCompat, eyre},
};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    style::{Attribute, Color, ContentStyle},
};
use directories::ProjectDirs;
use itertools::Itertools;
use serde::{
    Deserialize,
    de::{Deserializer, Error},
};

use crate::model::FilterMode;

/// Feed served when no other url is configured
pub const DEFAULT_FEED_URL: &str = "https://rss.itunes.apple.com/api/v1/br/ios-apps/new-apps-we-love/all/100/explicit.json";

/// Main configuration struct for the application
#[derive(Clone, Deserialize)]
#[cfg_attr(test, derive(Debug, PartialEq))]
#[cfg_attr(not(test), serde(default))]
pub struct Config {
    /// Directory where the data (logs) must be stored
    pub data_dir: PathBuf,
    /// Configuration for the remote feed
    pub feed: FeedConfig,
    /// Configuration for the search bar
    pub search: SearchConfig,
    /// Configuration for the grid of apps
    pub grid: GridConfig,
    /// Configuration settings for application logging
    pub logs: LogsConfig,
    /// Configuration for the key bindings used within the TUI
    pub keybindings: KeyBindingsConfig,
    /// Configuration for the visual theme of the TUI
    pub theme: Theme,
}

/// Configuration for the remote feed
#[derive(Clone, Deserialize)]
#[cfg_attr(test, derive(Debug, PartialEq))]
#[cfg_attr(not(test), serde(default))]
pub struct FeedConfig {
    /// Url of the JSON feed to fetch
    pub url: String,
}

/// Configuration for the search bar
#[derive(Clone, Copy, Deserialize)]
#[cfg_attr(test, derive(Debug, PartialEq))]
#[cfg_attr(not(test), serde(default))]
pub struct SearchConfig {
    /// How the query is matched against the entries
    pub mode: FilterMode,
}

/// Maximum height of the artwork on each cell
pub const MAX_ARTWORK_ROWS: u16 = 64;

/// Configuration for the grid of apps
#[derive(Clone, Copy, Deserialize)]
#[cfg_attr(test, derive(Debug, PartialEq))]
#[cfg_attr(not(test), serde(default))]
pub struct GridConfig {
    /// Whether to download and display the artwork of each app
    pub artwork: bool,
    /// Height of the artwork on each cell (in rows), the width is twice as much to keep it square
    pub artwork_rows: u16,
}

/// Configuration settings for application logging
#[derive(Clone, Deserialize)]
#[cfg_attr(test, derive(Debug, PartialEq))]
#[cfg_attr(not(test), serde(default))]
pub struct LogsConfig {
    /// Whether to record logs with [`LogsConfig::filter`], instead of only warnings and errors
    pub enabled: bool,
    /// The log filter to apply, controlling which logs are recorded.
    ///
    /// This string supports the `tracing-subscriber`'s environment filter syntax.
    pub filter: String,
}

/// Configuration for the key bindings used in the Terminal User Interface (TUI)
#[derive(Clone, Deserialize)]
#[cfg_attr(test, derive(Debug, PartialEq))]
#[cfg_attr(not(test), serde(default))]
pub struct KeyBindingsConfig(
    #[serde(deserialize_with = "deserialize_bindings_with_defaults")] BTreeMap<KeyBindingAction, KeyBinding>,
);

/// Represents the distinct actions within the application that can be configured with specific key bindings
#[derive(Copy, Clone, Deserialize, PartialOrd, PartialEq, Eq, Ord, Debug)]
#[cfg_attr(test, derive(strum::EnumIter))]
#[serde(rename_all = "snake_case")]
pub enum KeyBindingAction {
    /// Cancel the active search or, if idle, exit the TUI
    Quit,
    /// Activate the search bar
    Search,
    /// Confirm the selected app
    Confirm,
    /// Fetch the feed again
    Refresh,
}

/// Represents a single logical key binding that can be triggered by one or more physical `KeyEvent`s
#[derive(Clone, Deserialize)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct KeyBinding(#[serde(deserialize_with = "deserialize_key_events")] Vec<KeyEvent>);

/// TUI theme configuration
#[derive(Clone, Deserialize)]
#[cfg_attr(test, derive(Debug, PartialEq))]
#[cfg_attr(not(test), serde(default))]
pub struct Theme {
    /// Main text, like app names and the active query
    #[serde(deserialize_with = "deserialize_style")]
    pub primary: ContentStyle,
    /// Less important text, like the idle search bar
    #[serde(deserialize_with = "deserialize_style")]
    pub secondary: ContentStyle,
    /// Highlights the parts of the text matching the query
    #[serde(deserialize_with = "deserialize_style")]
    pub accent: ContentStyle,
    /// Faded text, like the copyright line
    #[serde(deserialize_with = "deserialize_style")]
    pub muted: ContentStyle,
    /// Style for errors
    #[serde(deserialize_with = "deserialize_style")]
    pub error: ContentStyle,
    /// Optional background color for the selected cell
    #[serde(deserialize_with = "deserialize_color")]
    pub highlight: Option<Color>,
    /// Primary style applied to the selected cell
    #[serde(deserialize_with = "deserialize_style")]
    pub highlight_primary: ContentStyle,
    /// Accent style applied to the selected cell
    #[serde(deserialize_with = "deserialize_style")]
    pub highlight_accent: ContentStyle,
    /// Muted style applied to the selected cell
    #[serde(deserialize_with = "deserialize_style")]
    pub highlight_muted: ContentStyle,
}

impl GridConfig {
    /// Checks the cell geometry is within bounds
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_ARTWORK_ROWS).contains(&self.artwork_rows) {
            return Err(eyre!("grid.artwork_rows must be between 1 and {MAX_ARTWORK_ROWS}"));
        }
        Ok(())
    }
}

impl Config {
    /// Initializes the application configuration.
    ///
    /// Attempts to load the configuration from the user's config directory (`config.toml`). If the file does not exist
    /// or has missing fields, it falls back to default values.
    pub fn init(config_file: Option<PathBuf>) -> Result<Self> {
        let proj_dirs =
            ProjectDirs::from("org", "AppGrid", "App-Grid").wrap_err("Couldn't initialize project directory")?;
        let config_dir = proj_dirs.config_dir().to_path_buf();

        let config_path = config_file.unwrap_or_else(|| config_dir.join("config.toml"));
        let mut config = if config_path.exists() {
            let config_str = fs::read_to_string(&config_path)
                .wrap_err_with(|| format!("Couldn't read config file {}", config_path.display()))?;
            toml::from_str(&config_str)
                .wrap_err_with(|| format!("Couldn't parse config file {}", config_path.display()))?
        } else {
            Config::default()
        };
        if config.data_dir.as_os_str().is_empty() {
            config.data_dir = proj_dirs.data_dir().to_path_buf();
        }

        // Validate there are no conflicts on the key bindings
        let conflicts = config.keybindings.find_conflicts();
        if !conflicts.is_empty() {
            return Err(eyre!(
                "Couldn't parse config file {}\n\nThere are some key binding conflicts:\n{}",
                config_path.display(),
                conflicts
                    .into_iter()
                    .map(|(_, a)| format!("- {}", a.into_iter().map(|a| format!("{a:?}")).join(", ")))
                    .join("\n")
            ));
        }

        config
            .grid
            .validate()
            .wrap_err_with(|| format!("Couldn't parse config file {}", config_path.display()))?;

        fs::create_dir_all(&config.data_dir)
            .wrap_err_with(|| format!("Could't create data dir {}", config.data_dir.display()))?;

        Ok(config)
    }
}

impl KeyBindingsConfig {
    /// Finds the [KeyBindingAction] associated with the given [KeyEvent], if any
    pub fn get_action_matching(&self, event: &KeyEvent) -> Option<KeyBindingAction> {
        self.0
            .iter()
            .find_map(|(action, binding)| binding.matches(event).then_some(*action))
    }

    /// Finds all ambiguous key bindings where a single `KeyEvent` maps to multiple `KeyBindingAction`s
    pub fn find_conflicts(&self) -> Vec<(KeyEvent, Vec<KeyBindingAction>)> {
        self.0
            .iter()
            .flat_map(|(action, binding)| binding.0.iter().map(move |event| (*event, *action)))
            .into_group_map()
            .into_iter()
            .filter(|(_, actions)| actions.len() > 1)
            .collect()
    }
}

impl KeyBinding {
    /// Checks if a given `KeyEvent` matches any of the key events configured for this key binding, considering only the
    /// key `code` and its `modifiers`.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        self.0
            .iter()
            .any(|e| e.code == event.code && e.modifiers == event.modifiers)
    }
}

impl Theme {
    /// Primary style for the selected cell, including the background color
    pub fn highlight_primary_full(&self) -> ContentStyle {
        self.with_highlight(self.highlight_primary)
    }

    /// Accent style for the selected cell, including the background color
    pub fn highlight_accent_full(&self) -> ContentStyle {
        self.with_highlight(self.highlight_accent)
    }

    /// Muted style for the selected cell, including the background color
    pub fn highlight_muted_full(&self) -> ContentStyle {
        self.with_highlight(self.highlight_muted)
    }

    fn with_highlight(&self, mut style: ContentStyle) -> ContentStyle {
        if let Some(color) = self.highlight {
            style.background_color = Some(color);
        }
        style
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::new(),
            feed: FeedConfig::default(),
            search: SearchConfig::default(),
            grid: GridConfig::default(),
            logs: LogsConfig::default(),
            keybindings: KeyBindingsConfig::default(),
            theme: Theme::default(),
        }
    }
}
impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: String::from(DEFAULT_FEED_URL),
        }
    }
}
impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            mode: FilterMode::Fields,
        }
    }
}
impl Default for GridConfig {
    fn default() -> Self {
        Self {
            artwork: true,
            artwork_rows: 5,
        }
    }
}
impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            filter: String::from("info"),
        }
    }
}
impl Default for KeyBindingsConfig {
    fn default() -> Self {
        Self(BTreeMap::from([
            (KeyBindingAction::Quit, KeyBinding(vec![KeyEvent::from(KeyCode::Esc)])),
            (
                KeyBindingAction::Search,
                KeyBinding(vec![
                    KeyEvent::new(KeyCode::Char('f'), KeyModifiers::CONTROL),
                    KeyEvent::from(KeyCode::F(3)),
                ]),
            ),
            (
                KeyBindingAction::Confirm,
                KeyBinding(vec![KeyEvent::from(KeyCode::Enter)]),
            ),
            (
                KeyBindingAction::Refresh,
                KeyBinding(vec![
                    KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL),
                    KeyEvent::from(KeyCode::F(5)),
                ]),
            ),
        ]))
    }
}
impl Default for Theme {
    fn default() -> Self {
        let fg = |color| {
            let mut style = ContentStyle::new();
            style.foreground_color = Some(color);
            style
        };
        let mut dim = ContentStyle::new();
        dim.attributes.set(Attribute::Dim);

        Self {
            primary: ContentStyle::new(),
            secondary: dim,
            accent: fg(Color::Yellow),
            muted: fg(Color::DarkGrey),
            error: fg(Color::DarkRed),
            highlight: Some(Color::DarkGrey),
            highlight_primary: ContentStyle::new(),
            highlight_accent: fg(Color::Yellow),
            highlight_muted: fg(Color::Grey),
        }
    }
}

/// Deserializes the key bindings, actions missing on the config file keep their default binding.
///
/// Tests are stricter, every action must be bound so the default config file is known to be complete.
fn deserialize_bindings_with_defaults<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<KeyBindingAction, KeyBinding>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut bindings = BTreeMap::<KeyBindingAction, KeyBinding>::deserialize(deserializer)?;
    for (action, default_binding) in KeyBindingsConfig::default().0 {
        if cfg!(test) && !bindings.contains_key(&action) {
            return Err(D::Error::custom(format!("Missing key binding for action '{action:?}'.")));
        }
        bindings.entry(action).or_insert(default_binding);
    }
    Ok(bindings)
}

/// Deserializes a single key or a list of them
fn deserialize_key_events<'de, D>(deserializer: D) -> Result<Vec<KeyEvent>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    let events = match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(key) => parse_key_event(&key).map(|event| vec![event]),
        OneOrMany::Many(keys) => keys.iter().map(|key| parse_key_event(key)).collect(),
    };
    events.map_err(D::Error::custom)
}

/// Deserializes a string into an optional [`Color`]
fn deserialize_color<'de, D>(deserializer: D) -> Result<Option<Color>, D::Error>
where
    D: Deserializer<'de>,
{
    parse_color(&String::deserialize(deserializer)?).map_err(D::Error::custom)
}

/// Deserializes a string into a [`ContentStyle`]
fn deserialize_style<'de, D>(deserializer: D) -> Result<ContentStyle, D::Error>
where
    D: Deserializer<'de>,
{
    parse_style(&String::deserialize(deserializer)?).map_err(D::Error::custom)
}

/// Parses a key like `ctrl-r`, `shift+tab` or `f5` into a [`KeyEvent`]
fn parse_key_event(raw: &str) -> Result<KeyEvent, String> {
    let invalid = || format!("Unable to parse key binding: {raw}");
    let lower = raw.to_ascii_lowercase();

    // The last char is always part of the key, so `ctrl--` is ctrl and minus
    let (prefix, key) = match lower.char_indices().rev().skip(1).find(|(_, c)| matches!(c, '-' | '+')) {
        Some((idx, _)) => (&lower[..idx], &lower[idx + 1..]),
        None => ("", lower.as_str()),
    };
    let mut modifiers = KeyModifiers::NONE;
    for modifier in prefix.split(['-', '+']).filter(|m| !m.is_empty()) {
        modifiers |= match modifier {
            "ctrl" => KeyModifiers::CONTROL,
            "shift" => KeyModifiers::SHIFT,
            "alt" => KeyModifiers::ALT,
            _ => return Err(invalid()),
        };
    }

    let mut chars = key.chars();
    let code = match (chars.next(), chars.next()) {
        (Some(c), None) if modifiers.contains(KeyModifiers::SHIFT) => KeyCode::Char(c.to_ascii_uppercase()),
        (Some(c), None) => KeyCode::Char(c),
        _ => match key {
            "esc" => KeyCode::Esc,
            "enter" => KeyCode::Enter,
            "tab" => KeyCode::Tab,
            "backspace" => KeyCode::Backspace,
            "delete" => KeyCode::Delete,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" => KeyCode::PageUp,
            "pagedown" => KeyCode::PageDown,
            "space" | "spacebar" => KeyCode::Char(' '),
            "hyphen" | "minus" => KeyCode::Char('-'),
            function => function
                .strip_prefix('f')
                .and_then(|n| n.parse::<u8>().ok())
                .filter(|n| (1..=12).contains(n))
                .map(KeyCode::F)
                .ok_or_else(invalid)?,
        },
    };
    Ok(KeyEvent::new(code, modifiers))
}

/// Parses a string into an optional [`Color`], where `none` (or empty) means no color
fn parse_color(raw: &str) -> Result<Option<Color>, String> {
    let raw_lower = raw.to_ascii_lowercase();
    if raw_lower.is_empty() || raw_lower == "none" {
        Ok(None)
    } else {
        Ok(Some(parse_color_inner(&raw_lower)?))
    }
}

/// Parses a style made of leading attributes and an optional foreground color, like `italic dark red`
fn parse_style(raw: &str) -> Result<ContentStyle, String> {
    let raw_lower = raw.to_ascii_lowercase();
    let mut style = ContentStyle::new();
    let color = raw_lower
        .split_whitespace()
        .skip_while(|word| {
            let attribute = match *word {
                "bold" => Attribute::Bold,
                "dim" => Attribute::Dim,
                "italic" => Attribute::Italic,
                "underline" | "underlined" => Attribute::Underlined,
                _ => return false,
            };
            style.attributes.set(attribute);
            true
        })
        .join(" ");
    if !color.is_empty() && color != "default" {
        style.foreground_color = Some(parse_color_inner(&color)?);
    }
    Ok(style)
}

/// Parses the color part of a style string.
///
/// Handles named colors, rgb, hex, and ansi values.
fn parse_color_inner(raw: &str) -> Result<Color, String> {
    let invalid = || format!("Unable to parse color: {raw}");
    Ok(match raw {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "gray" | "grey" => Color::Grey,
        "dark gray" | "darkgray" | "dark grey" | "darkgrey" => Color::DarkGrey,
        "dark red" | "darkred" => Color::DarkRed,
        "dark green" | "darkgreen" => Color::DarkGreen,
        "dark yellow" | "darkyellow" => Color::DarkYellow,
        "dark blue" | "darkblue" => Color::DarkBlue,
        "dark magenta" | "darkmagenta" => Color::DarkMagenta,
        "dark cyan" | "darkcyan" => Color::DarkCyan,
        "white" => Color::White,
        rgb if rgb.starts_with("rgb(") && rgb.ends_with(')') => {
            let rgb = rgb[4..rgb.len() - 1]
                .split(',')
                .map(|c| c.trim().parse::<u8>())
                .collect::<Result<Vec<u8>, _>>()
                .map_err(|_| invalid())?;
            let [r, g, b] = rgb[..] else {
                return Err(invalid());
            };
            Color::Rgb { r, g, b }
        }
        hex if hex.starts_with('#') => {
            let hex = &hex[1..];
            if hex.len() != 6 || !hex.is_ascii() {
                return Err(invalid());
            }
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
            Color::Rgb {
                r: channel(0)?,
                g: channel(2)?,
                b: channel(4)?,
            }
        }
        c => Color::AnsiValue(c.parse::<u8>().map_err(|_| invalid())?),
    })
}

#[cfg(test)]
mod tests {
    use crossterm::style::Attributes;
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_default_config() -> Result<()> {
        let config_str = fs::read_to_string("default_config.toml").wrap_err("Couldn't read default config file")?;
        let config: Config = toml::from_str(&config_str).wrap_err("Couldn't parse default config file")?;

        assert_eq!(Config::default(), config);

        Ok(())
    }

    #[test]
    fn test_artwork_rows_bounds() {
        for artwork_rows in [1, 5, MAX_ARTWORK_ROWS] {
            let grid = GridConfig {
                artwork_rows,
                ..Default::default()
            };
            assert!(grid.validate().is_ok(), "{artwork_rows} rows");
        }
        for artwork_rows in [0, MAX_ARTWORK_ROWS + 1, u16::MAX] {
            let grid = GridConfig {
                artwork_rows,
                ..Default::default()
            };
            let err = grid.validate().unwrap_err();
            assert_eq!(err.to_string(), "grid.artwork_rows must be between 1 and 64");
        }
    }

    #[test]
    fn test_default_keybindings_complete() {
        let config = KeyBindingsConfig::default();

        for action in KeyBindingAction::iter() {
            assert!(
                config.0.contains_key(&action),
                "Missing default binding for action: {action:?}"
            );
        }
    }

    #[test]
    fn test_default_keybindings_no_conflicts() {
        let config = KeyBindingsConfig::default();

        let conflicts = config.find_conflicts();
        assert_eq!(conflicts.len(), 0, "Key binding conflicts: {conflicts:?}");
    }

    #[test]
    fn test_conflicting_keybindings_are_found() {
        let mut config = KeyBindingsConfig::default();
        config
            .0
            .insert(KeyBindingAction::Refresh, KeyBinding(vec![KeyEvent::from(KeyCode::Esc)]));

        let conflicts = config.find_conflicts();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].0, KeyEvent::from(KeyCode::Esc));
        assert_eq!(conflicts[0].1, vec![KeyBindingAction::Quit, KeyBindingAction::Refresh]);
    }

    #[test]
    fn test_get_action_matching() {
        let config = KeyBindingsConfig::default();
        assert_eq!(
            config.get_action_matching(&KeyEvent::new(KeyCode::Char('f'), KeyModifiers::CONTROL)),
            Some(KeyBindingAction::Search)
        );
        assert_eq!(
            config.get_action_matching(&KeyEvent::from(KeyCode::F(5))),
            Some(KeyBindingAction::Refresh)
        );
        assert_eq!(config.get_action_matching(&KeyEvent::from(KeyCode::Char('f'))), None);
    }

    #[test]
    fn test_keybinding_matches() {
        let binding = KeyBinding(vec![
            KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL),
            KeyEvent::from(KeyCode::Enter),
        ]);

        assert!(binding.matches(&KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL)));
        assert!(binding.matches(&KeyEvent::from(KeyCode::Enter)));
        assert!(!binding.matches(&KeyEvent::new(
            KeyCode::Char('a'),
            KeyModifiers::CONTROL | KeyModifiers::ALT
        )));
        assert!(!binding.matches(&KeyEvent::from(KeyCode::Esc)));
    }

    #[test]
    fn test_parse_keys() {
        assert_eq!(
            parse_key_event("a").unwrap(),
            KeyEvent::new(KeyCode::Char('a'), KeyModifiers::empty())
        );
        assert_eq!(
            parse_key_event("ctrl-alt-a").unwrap(),
            KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL | KeyModifiers::ALT)
        );
        assert_eq!(
            parse_key_event("shift+r").unwrap(),
            KeyEvent::new(KeyCode::Char('R'), KeyModifiers::SHIFT)
        );
        assert_eq!(
            parse_key_event("F5").unwrap(),
            KeyEvent::new(KeyCode::F(5), KeyModifiers::empty())
        );
        assert_eq!(
            parse_key_event("/").unwrap(),
            KeyEvent::new(KeyCode::Char('/'), KeyModifiers::empty())
        );
        assert_eq!(
            parse_key_event("ctrl--").unwrap(),
            KeyEvent::new(KeyCode::Char('-'), KeyModifiers::CONTROL)
        );
    }

    #[test]
    fn test_invalid_keys() {
        assert_eq!(
            parse_key_event("invalid-key"),
            Err(String::from("Unable to parse key binding: invalid-key"))
        );
        assert_eq!(parse_key_event("f13"), Err(String::from("Unable to parse key binding: f13")));
        assert_eq!(parse_key_event("meta-a"), Err(String::from("Unable to parse key binding: meta-a")));
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("none").unwrap(), None);
        assert_eq!(parse_color("red").unwrap(), Some(Color::Red));
        assert_eq!(parse_color("Dark Grey").unwrap(), Some(Color::DarkGrey));
        assert_eq!(
            parse_color("rgb(50, 25, 15)").unwrap(),
            Some(Color::Rgb { r: 50, g: 25, b: 15 })
        );
        assert_eq!(
            parse_color("#4287f5").unwrap(),
            Some(Color::Rgb { r: 66, g: 135, b: 245 })
        );
        assert_eq!(parse_color("6").unwrap(), Some(Color::AnsiValue(6)));
    }

    #[test]
    fn test_parse_color_invalid() {
        for raw in ["rgb(500, 25, 15)", "rgb(50, 25, 15, 5)", "#4287fg", "#4287f50", "1234"] {
            assert_eq!(parse_color(raw), Err(format!("Unable to parse color: {raw}")));
        }
    }

    #[test]
    fn test_parse_style() {
        assert_eq!(parse_style("").unwrap(), ContentStyle::new());
        assert_eq!(parse_style("default").unwrap(), ContentStyle::new());

        let style = parse_style("bold").unwrap();
        assert_eq!(style.foreground_color, None);
        assert!(style.attributes.has(Attribute::Bold));

        let style = parse_style("underline dim dark red").unwrap();
        assert_eq!(style.foreground_color, Some(Color::DarkRed));
        let mut expected_attributes = Attributes::none();
        expected_attributes.set(Attribute::Underlined);
        expected_attributes.set(Attribute::Dim);
        assert_eq!(style.attributes, expected_attributes);
    }
}
