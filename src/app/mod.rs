//! Application state types and entry glue.
//!
//! Defines enums and structs that model the TUI state, as well as helpers
//! to construct defaults and to run the application loop (re-exported as `run`).
//!
pub mod fetch;
pub mod keymap;
pub mod update;
pub mod view;

use ratatui::layout::Rect;
use ratatui::style::Color;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::search::{DEFAULT_PAGE_SIZE, SortField};
use crate::source::UserSource;

pub use view::UserListView;

/// Which screen is shown.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    /// Parent view with the entry menu.
    Home,
    Users,
}

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Help,
}

/// Lifecycle of the one fetch a mounted Users screen performs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

/// How the Users screen presents the visible rows.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ListLayout {
    /// ID, name, email, phone and website columns.
    #[default]
    Table,
    /// Name and email.
    Compact,
    /// Names only.
    Plain,
}

impl ListLayout {
    /// Columns rendered, in order. Only these act as sort triggers.
    pub fn columns(self) -> &'static [SortField] {
        match self {
            ListLayout::Table => &SortField::ALL,
            ListLayout::Compact => &[SortField::Name, SortField::Email],
            ListLayout::Plain => &[SortField::Name],
        }
    }
}

/// Per-mount knobs for the Users screen.
#[derive(Clone, Debug)]
pub struct ViewSettings {
    pub page_size: usize,
    pub layout: ListLayout,
    pub reset_page_on_search: bool,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            layout: ListLayout::Table,
            reset_page_on_search: false,
        }
    }
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub error_fg: Color,
}

impl Theme {
    /// Catppuccin Mocha theme defaults.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            muted: Color::Rgb(0x7f, 0x84, 0x9c),        // overlay1
            title: Color::Rgb(0xcb, 0xa6, 0xf7),        // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            header_bg: Color::Rgb(0x31, 0x32, 0x44),    // surface0
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),    // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
            error_fg: Color::Rgb(0xf3, 0x8b, 0xa8),     // red
        }
    }

    /// Load theme from a simple key=value file. Unknown or missing keys fall back to `mocha`.
    pub fn from_file(path: impl AsRef<Path>) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut theme = Self::mocha();

        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, val)) = line.split_once('=') else {
                continue;
            };
            let (key, val) = (key.trim(), val.trim());
            let Some(color) = Self::parse_color(val) else {
                continue;
            };
            match key {
                "text" => theme.text = color,
                "muted" => theme.muted = color,
                "title" => theme.title = color,
                "border" => theme.border = color,
                "header_bg" => theme.header_bg = color,
                "header_fg" => theme.header_fg = color,
                "status_bg" => theme.status_bg = color,
                "status_fg" => theme.status_fg = color,
                "highlight_fg" => theme.highlight_fg = color,
                "highlight_bg" => theme.highlight_bg = color,
                "error_fg" => theme.error_fg = color,
                _ => {}
            }
        }

        Some(theme)
    }

    /// Parse a color from hex ("#RRGGBB" or "RRGGBB") or "reset".
    fn parse_color(s: &str) -> Option<Color> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "reset" {
            return Some(Color::Reset);
        }
        let hex = lower.strip_prefix('#').unwrap_or(&lower);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Color::Rgb(r, g, b))
    }

    /// Persist the theme to a config file in key=value format.
    pub fn write_file(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# userlist-tui theme configuration\n");
        buf.push_str("# Colors: hex as #RRGGBB or RRGGBB, or 'reset'\n\n");

        fn color_to_str(c: Color) -> String {
            match c {
                Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
                Color::Reset => "reset".to_string(),
                // Named colors get a best-effort hex approximation
                Color::Black => "#000000".to_string(),
                Color::Red => "#FF0000".to_string(),
                Color::Green => "#00FF00".to_string(),
                Color::Yellow => "#FFFF00".to_string(),
                Color::Blue => "#0000FF".to_string(),
                Color::Magenta => "#FF00FF".to_string(),
                Color::Cyan => "#00FFFF".to_string(),
                Color::Gray => "#B3B3B3".to_string(),
                Color::DarkGray => "#4D4D4D".to_string(),
                Color::LightRed => "#FF6666".to_string(),
                Color::LightGreen => "#66FF66".to_string(),
                Color::LightYellow => "#FFFF66".to_string(),
                Color::LightBlue => "#6666FF".to_string(),
                Color::LightMagenta => "#FF66FF".to_string(),
                Color::LightCyan => "#66FFFF".to_string(),
                Color::White => "#FFFFFF".to_string(),
                Color::Indexed(_) => "reset".to_string(),
            }
        }

        let mut kv = |k: &str, v: Color| {
            let _ = writeln!(&mut buf, "{} = {}", k, color_to_str(v));
        };

        kv("text", self.text);
        kv("muted", self.muted);
        kv("title", self.title);
        kv("border", self.border);
        kv("header_bg", self.header_bg);
        kv("header_fg", self.header_fg);
        kv("status_bg", self.status_bg);
        kv("status_fg", self.status_fg);
        kv("highlight_fg", self.highlight_fg);
        kv("highlight_bg", self.highlight_bg);
        kv("error_fg", self.error_fg);

        std::fs::write(path, buf)
    }

    /// Load the theme at `path`, writing the default there first if it is missing.
    pub fn load_or_init(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if path.exists() {
            return Self::from_file(path).unwrap_or_else(Self::mocha);
        }
        let t = Self::mocha();
        if let Err(err) = t.write_file(path) {
            tracing::warn!(path = %path.display(), error = %err, "could not write default theme");
        }
        t
    }
}

/// Default directory for `theme.conf` and `keybinds.conf`.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("userlist-tui"))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Entries of the Home screen menu.
pub const HOME_ITEMS: [&str; 2] = ["Users", "Quit"];

pub struct AppState {
    pub screen: Screen,
    pub input_mode: InputMode,
    pub home_selected: usize,
    pub source: Arc<dyn UserSource>,
    pub settings: ViewSettings,
    pub view: Option<UserListView>,
    pub theme: Theme,
    pub keymap: keymap::Keymap,
    /// Header cells drawn in the last frame, used to route mouse clicks to sort triggers.
    pub header_hits: Vec<(Rect, SortField)>,
    pub help_scroll: u16,
}

impl AppState {
    pub fn new(source: Arc<dyn UserSource>, settings: ViewSettings) -> Self {
        Self {
            screen: Screen::Home,
            input_mode: InputMode::Normal,
            home_selected: 0,
            source,
            settings,
            view: None,
            theme: Theme::mocha(),
            keymap: keymap::Keymap::default(),
            header_hits: Vec::new(),
            help_scroll: 0,
        }
    }

    /// Load theme and keybindings from `config_dir`, creating defaults there when missing.
    pub fn with_config_dir(mut self, config_dir: &Path) -> Self {
        self.theme = Theme::load_or_init(config_dir.join("theme.conf"));
        self.keymap = keymap::Keymap::load_or_init(config_dir.join("keybinds.conf"));
        self
    }

    /// Enter the Users screen with fresh state and a new fetch.
    pub fn open_users(&mut self) {
        self.close_users();
        self.view = Some(UserListView::mount(self.source.clone(), &self.settings));
        self.screen = Screen::Users;
        self.input_mode = InputMode::Normal;
    }

    /// Leave the Users screen, cancelling whatever it still waits for.
    pub fn close_users(&mut self) {
        if let Some(mut view) = self.view.take() {
            view.unmount();
        }
        self.header_hits.clear();
        self.screen = Screen::Home;
        self.input_mode = InputMode::Normal;
    }

    /// Per-tick housekeeping: pick up a finished fetch.
    pub fn tick(&mut self) -> bool {
        match self.view.as_mut() {
            Some(view) => view.poll_fetch(),
            None => false,
        }
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
