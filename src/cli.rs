//! Command-line options and the wiring they drive.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::app::{ListLayout, ViewSettings, default_config_dir};
use crate::error::{Context, Result};
use crate::search::DEFAULT_PAGE_SIZE;
use crate::source::{DEFAULT_ENDPOINT, HttpUserSource, StaticUserSource, UserSource};

#[derive(Debug, Parser)]
#[command(name = "userlist-tui", version, about)]
pub struct Cli {
    /// Collection endpoint returning a JSON array of users.
    #[arg(long, env = "USERLIST_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Read users from a local JSON file instead of the endpoint.
    #[arg(long)]
    pub fixture: Option<PathBuf>,

    /// Rows per page.
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, value_parser = parse_page_size)]
    pub page_size: usize,

    #[arg(long, value_enum, default_value_t = ListLayout::Table)]
    pub layout: ListLayout,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Jump back to page 1 whenever the search term changes.
    #[arg(long)]
    pub reset_page_on_search: bool,

    /// Directory holding theme.conf and keybinds.conf.
    #[arg(long, env = "USERLIST_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Append logs to this file. Nothing is logged without it.
    #[arg(long, env = "USERLIST_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

fn parse_page_size(s: &str) -> std::result::Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("page size must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

impl Cli {
    pub fn view_settings(&self) -> ViewSettings {
        ViewSettings {
            page_size: self.page_size,
            layout: self.layout,
            reset_page_on_search: self.reset_page_on_search,
        }
    }

    /// A fixture wins over the endpoint.
    pub fn build_source(&self) -> Result<Arc<dyn UserSource>> {
        if let Some(path) = &self.fixture {
            let source = StaticUserSource::from_fixture(path)?;
            tracing::info!(path = %path.display(), count = source.records().len(), "using fixture");
            return Ok(Arc::new(source));
        }
        let source = HttpUserSource::new(&self.endpoint, Duration::from_secs(self.timeout_secs))?;
        tracing::info!(url = source.url(), "using remote endpoint");
        Ok(Arc::new(source))
    }

    /// Config directory, created if needed.
    pub fn resolve_config_dir(&self) -> Result<PathBuf> {
        let dir = self.config_dir.clone().unwrap_or_else(default_config_dir);
        std::fs::create_dir_all(&dir)
            .with_ctx(|| format!("create config dir {}", dir.display()))?;
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_five_rows_in_table_layout() {
        let cli = Cli::try_parse_from(["userlist-tui"]).unwrap();
        assert_eq!(cli.page_size, 5);
        assert_eq!(cli.layout, ListLayout::Table);
        assert!(!cli.reset_page_on_search);
        assert!(cli.fixture.is_none());
    }

    #[test]
    fn zero_page_size_is_rejected() {
        assert!(Cli::try_parse_from(["userlist-tui", "--page-size", "0"]).is_err());
    }

    #[test]
    fn parses_layout_and_flags() {
        let cli = Cli::try_parse_from([
            "userlist-tui",
            "--layout",
            "compact",
            "--page-size",
            "3",
            "--reset-page-on-search",
        ])
        .unwrap();
        let settings = cli.view_settings();
        assert_eq!(settings.layout, ListLayout::Compact);
        assert_eq!(settings.page_size, 3);
        assert!(settings.reset_page_on_search);
    }

    #[test]
    fn missing_fixture_fails_to_build_source() {
        let cli =
            Cli::try_parse_from(["userlist-tui", "--fixture", "/no/such/users.json"]).unwrap();
        let err = cli.build_source().err().expect("should fail");
        assert!(err.to_string().contains("/no/such/users.json"));
    }
}
