//! Keybinding configuration: parse `keybinds.conf`, provide defaults, and map keys to actions.
//!
//! This module manages keyboard shortcuts for the TUI. It supports:
//! - Loading custom keybindings from a config file (`keybinds.conf`)
//! - Providing defaults if no config is present
//! - Resolving key presses (with modifiers) to semantic actions
//! - Exporting the current keymap back to a file for reference or customization

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::search::SortField;

/// Semantic keyboard actions that can be bound to key combinations.
///
/// Several key combinations can map to the same action (e.g. both `l` and
/// the Right arrow advance a page).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Exit the application.
    Quit,
    /// Leave the Users screen for the Home screen.
    Back,
    /// Activate the highlighted Home entry.
    Open,
    /// Display the help/keybindings reference.
    OpenHelp,
    /// Start editing the search term.
    StartSearch,
    NextPage,
    PreviousPage,
    SortById,
    SortByName,
    SortByEmail,
    SortByPhone,
    SortByWebsite,
    MoveUp,
    MoveDown,
    /// Ignore this key.
    Ignore,
}

impl KeyAction {
    /// Sort trigger carried by this action, if any.
    pub fn sort_field(self) -> Option<SortField> {
        match self {
            KeyAction::SortById => Some(SortField::Id),
            KeyAction::SortByName => Some(SortField::Name),
            KeyAction::SortByEmail => Some(SortField::Email),
            KeyAction::SortByPhone => Some(SortField::Phone),
            KeyAction::SortByWebsite => Some(SortField::Website),
            _ => None,
        }
    }
}

/// Manages keybinding configuration and key-to-action resolution.
#[derive(Clone, Debug)]
pub struct Keymap {
    /// Canonical mapping from (modifiers, code) to action.
    bindings: HashMap<(KeyModifiers, KeyCode), KeyAction>,
}

/// Bindings written to a fresh `keybinds.conf`, in display order.
const DEFAULT_BINDINGS: [(&str, KeyAction); 24] = [
    ("q", KeyAction::Quit),
    ("Ctrl+c", KeyAction::Quit),
    ("Esc", KeyAction::Back),
    ("b", KeyAction::Back),
    ("Enter", KeyAction::Open),
    ("?", KeyAction::OpenHelp),
    ("/", KeyAction::StartSearch),
    ("Right", KeyAction::NextPage),
    ("l", KeyAction::NextPage),
    ("n", KeyAction::NextPage),
    ("PageDown", KeyAction::NextPage),
    ("Left", KeyAction::PreviousPage),
    ("h", KeyAction::PreviousPage),
    ("p", KeyAction::PreviousPage),
    ("PageUp", KeyAction::PreviousPage),
    ("1", KeyAction::SortById),
    ("2", KeyAction::SortByName),
    ("3", KeyAction::SortByEmail),
    ("4", KeyAction::SortByPhone),
    ("5", KeyAction::SortByWebsite),
    ("Up", KeyAction::MoveUp),
    ("k", KeyAction::MoveUp),
    ("Down", KeyAction::MoveDown),
    ("j", KeyAction::MoveDown),
];

impl Keymap {
    /// Create a keymap with default keybindings.
    pub fn new_defaults() -> Self {
        let bindings = DEFAULT_BINDINGS
            .iter()
            .filter_map(|(spec, action)| parse_key(spec).map(|key| (key, *action)))
            .collect();
        Self { bindings }
    }

    /// Load a keymap from `path`, or write the defaults there if the file doesn't exist.
    pub fn load_or_init(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if path.exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        let km = Self::default();
        if let Err(err) = km.write_file(path) {
            tracing::warn!(
                path = %path.display(),
                error = %err,
                "could not write default keybinds"
            );
        }
        km
    }

    /// Load a keymap from a configuration file.
    ///
    /// The file uses `<Action> = <KeySpec>` lines; `<KeySpec> = <Action>` is
    /// accepted as well. An action named in the file keeps only the keys listed
    /// for it there; actions the file never names keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut map = Self::default();
        let mut overridden = HashSet::new();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((lhs, rhs)) = line.split_once('=') else {
                continue;
            };
            let (lhs, rhs) = (lhs.trim(), rhs.trim());
            if lhs.is_empty() || rhs.is_empty() {
                continue;
            }
            let binding = match (parse_action(lhs), parse_key(rhs)) {
                (Some(action), Some(key)) => Some((key, action)),
                _ => parse_key(lhs).zip(parse_action(rhs)),
            };
            let Some((key, action)) = binding else {
                tracing::debug!(line, "skipping unrecognised keybinding");
                continue;
            };
            if overridden.insert(action) {
                map.bindings.retain(|_, bound| *bound != action);
            }
            map.bindings.insert(key, action);
        }
        Some(map)
    }

    /// Write the default bindings to a configuration file, with a short header.
    pub fn write_file(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# userlist-tui keybindings\n");
        buf.push_str("# Format: <Action> = <KeySpec>, one line per key\n");
        buf.push_str("# An action listed here loses its built-in keys; list every key you want.\n");
        buf.push_str("# KeySpec examples: q, Ctrl+c, Enter, Esc, Up, Down, Left, Right,\n");
        buf.push_str("#   PageUp, PageDown, /, 1\n");
        buf.push_str("# Actions: Quit, Back, Open, OpenHelp, StartSearch,\n");
        buf.push_str("#   NextPage, PreviousPage,\n");
        buf.push_str("#   SortById, SortByName, SortByEmail, SortByPhone, SortByWebsite,\n");
        buf.push_str("#   MoveUp, MoveDown, Ignore\n\n");

        for (key, action) in DEFAULT_BINDINGS {
            let _ = writeln!(&mut buf, "{} = {}", format_action(action), key);
        }

        std::fs::write(path, buf)
    }

    /// Resolve a key event to its action.
    pub fn resolve(&self, key: &KeyEvent) -> Option<KeyAction> {
        // Shift is implied by the character itself ('?' vs '/').
        let mods = match key.code {
            KeyCode::Char(_) => key.modifiers.difference(KeyModifiers::SHIFT),
            _ => key.modifiers,
        };
        self.bindings.get(&(mods, key.code)).copied()
    }

    /// All keys bound to `action`, formatted and sorted.
    pub fn keys_for(&self, action: KeyAction) -> Vec<String> {
        let mut keys: Vec<String> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|((mods, code), _)| Self::format_key(*mods, *code))
            .collect();
        keys.sort();
        keys
    }

    /// Format a key (modifiers + code) into a spec like "Ctrl+c" or "PageDown".
    pub fn format_key(mods: KeyModifiers, code: KeyCode) -> String {
        use KeyCode::*;
        let base = match code {
            Enter => "Enter".to_string(),
            Esc => "Esc".to_string(),
            Tab => "Tab".to_string(),
            Backspace => "Backspace".to_string(),
            Up => "Up".to_string(),
            Down => "Down".to_string(),
            Left => "Left".to_string(),
            Right => "Right".to_string(),
            PageUp => "PageUp".to_string(),
            PageDown => "PageDown".to_string(),
            Char(c) => c.to_string(),
            _ => format!("{:?}", code),
        };
        if mods.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{}", base)
        } else {
            base
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}

fn parse_key(spec: &str) -> Option<(KeyModifiers, KeyCode)> {
    use KeyCode::*;
    let s = spec.trim();
    let (mods, rest) = match s.strip_prefix("Ctrl+") {
        Some(after) => (KeyModifiers::CONTROL, after),
        None => (KeyModifiers::NONE, s),
    };
    let code = match rest {
        "Enter" => Enter,
        "Esc" | "Escape" => Esc,
        "Tab" => Tab,
        "Backspace" => Backspace,
        "Up" => Up,
        "Down" => Down,
        "Left" => Left,
        "Right" => Right,
        "PageUp" => PageUp,
        "PageDown" => PageDown,
        _ => {
            let mut chars = rest.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Char(c),
                _ => return None,
            }
        }
    };
    Some((mods, code))
}

fn parse_action(s: &str) -> Option<KeyAction> {
    match s.trim() {
        "Quit" => Some(KeyAction::Quit),
        "Back" => Some(KeyAction::Back),
        "Open" => Some(KeyAction::Open),
        "OpenHelp" => Some(KeyAction::OpenHelp),
        "StartSearch" => Some(KeyAction::StartSearch),
        "NextPage" => Some(KeyAction::NextPage),
        "PreviousPage" => Some(KeyAction::PreviousPage),
        "SortById" => Some(KeyAction::SortById),
        "SortByName" => Some(KeyAction::SortByName),
        "SortByEmail" => Some(KeyAction::SortByEmail),
        "SortByPhone" => Some(KeyAction::SortByPhone),
        "SortByWebsite" => Some(KeyAction::SortByWebsite),
        "MoveUp" => Some(KeyAction::MoveUp),
        "MoveDown" => Some(KeyAction::MoveDown),
        "Ignore" => Some(KeyAction::Ignore),
        _ => None,
    }
}

pub fn format_action(a: KeyAction) -> &'static str {
    match a {
        KeyAction::Quit => "Quit",
        KeyAction::Back => "Back",
        KeyAction::Open => "Open",
        KeyAction::OpenHelp => "OpenHelp",
        KeyAction::StartSearch => "StartSearch",
        KeyAction::NextPage => "NextPage",
        KeyAction::PreviousPage => "PreviousPage",
        KeyAction::SortById => "SortById",
        KeyAction::SortByName => "SortByName",
        KeyAction::SortByEmail => "SortByEmail",
        KeyAction::SortByPhone => "SortByPhone",
        KeyAction::SortByWebsite => "SortByWebsite",
        KeyAction::MoveUp => "MoveUp",
        KeyAction::MoveDown => "MoveDown",
        KeyAction::Ignore => "Ignore",
    }
}
