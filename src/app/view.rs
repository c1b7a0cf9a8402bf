//! State of one mounted Users screen.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::fetch::{FetchResult, FetchTask};
use super::{LoadState, ViewSettings};
use crate::search::{self, PageView, SortField, SortSpec, ViewQuery};
use crate::source::{UserRecord, UserSource};

/// The Users screen between mount and unmount.
///
/// `records` is set once when the fetch resolves and never touched again;
/// every visible row is derived from it through [`search::visible_page`].
pub struct UserListView {
    records: Vec<UserRecord>,
    load: LoadState,
    search_term: String,
    sort: SortSpec,
    current_page: usize,
    page_size: usize,
    reset_page_on_search: bool,
    selected_row: usize,
    token: CancellationToken,
    fetch: Option<FetchTask>,
}

impl UserListView {
    /// Fresh view in the loading state with no fetch attached.
    pub fn new(settings: &ViewSettings) -> Self {
        Self {
            records: Vec::new(),
            load: LoadState::Loading,
            search_term: String::new(),
            sort: SortSpec::default(),
            current_page: 1,
            page_size: settings.page_size.max(1),
            reset_page_on_search: settings.reset_page_on_search,
            selected_row: 0,
            token: CancellationToken::new(),
            fetch: None,
        }
    }

    /// Mount: fresh state plus one background fetch tied to this view's lifetime.
    pub fn mount(source: Arc<dyn UserSource>, settings: &ViewSettings) -> Self {
        let mut view = Self::new(settings);
        tracing::info!(origin = %source.describe(), "mounting users view");
        view.fetch = Some(FetchTask::spawn(source, view.token.clone()));
        view
    }

    /// Leave the screen. A pending fetch can no longer change this view.
    pub fn unmount(&mut self) {
        if self.fetch.is_some() {
            tracing::info!("unmounting users view with fetch still pending");
        }
        self.token.cancel();
        self.fetch = None;
    }

    pub fn is_mounted(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Pull a finished fetch, if any. Returns true when the state changed.
    pub fn poll_fetch(&mut self) -> bool {
        let Some(result) = self.fetch.as_ref().and_then(|task| task.poll()) else {
            return false;
        };
        self.fetch = None;
        self.apply_fetch_result(result)
    }

    /// Apply a fetch outcome. Ignored once unmounted or after the first outcome.
    pub fn apply_fetch_result(&mut self, result: FetchResult) -> bool {
        if !self.is_mounted() {
            tracing::debug!("ignoring fetch result for unmounted view");
            return false;
        }
        if !self.is_loading() {
            return false;
        }
        match result {
            Ok(records) => {
                tracing::info!(count = records.len(), "users loaded");
                self.records = records;
                self.load = LoadState::Ready;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to load users");
                self.load = LoadState::Failed(err.to_string());
            }
        }
        true
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.load, LoadState::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.load, LoadState::Ready)
    }

    pub fn records(&self) -> &[UserRecord] {
        &self.records
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn sort(&self) -> SortSpec {
        self.sort
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn selected_row(&self) -> usize {
        self.selected_row
    }

    pub fn query(&self) -> ViewQuery<'_> {
        ViewQuery {
            search_term: &self.search_term,
            sort: self.sort,
            page: self.current_page,
            page_size: self.page_size,
        }
    }

    pub fn page(&self) -> PageView<'_> {
        search::visible_page(&self.records, &self.query())
    }

    pub fn toggle_sort(&mut self, field: SortField) {
        self.sort = self.sort.toggled(field);
        tracing::debug!(field = field.label(), direction = ?self.sort.direction, "sort changed");
    }

    /// Advance one page when the current slice does not reach the end.
    pub fn next_page(&mut self) -> bool {
        if !self.page().has_next {
            return false;
        }
        self.current_page += 1;
        self.selected_row = 0;
        true
    }

    pub fn previous_page(&mut self) -> bool {
        if self.current_page <= 1 {
            return false;
        }
        self.current_page -= 1;
        self.selected_row = 0;
        true
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.after_search_edit();
    }

    pub fn push_search_char(&mut self, c: char) {
        self.search_term.push(c);
        self.after_search_edit();
    }

    pub fn pop_search_char(&mut self) {
        if self.search_term.pop().is_some() {
            self.after_search_edit();
        }
    }

    pub fn clear_search(&mut self) {
        if !self.search_term.is_empty() {
            self.search_term.clear();
            self.after_search_edit();
        }
    }

    fn after_search_edit(&mut self) {
        if self.reset_page_on_search {
            self.current_page = 1;
        }
        self.selected_row = 0;
    }

    pub fn move_selection_up(&mut self) {
        self.selected_row = self.selected_row.saturating_sub(1);
    }

    pub fn move_selection_down(&mut self) {
        let visible = self.page().rows.len();
        if self.selected_row + 1 < visible {
            self.selected_row += 1;
        }
    }
}

impl Drop for UserListView {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::search::SortDirection;

    fn selected_id(view: &UserListView) -> Option<u64> {
        view.page().rows.get(view.selected_row()).map(|r| r.id)
    }

    fn mk_user(id: u64, name: &str) -> UserRecord {
        UserRecord {
            id,
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: format!("555-01{id:02}"),
            website: Some(format!("{}.example.org", name.to_lowercase())),
        }
    }

    fn ready_view(settings: &ViewSettings) -> UserListView {
        let mut view = UserListView::new(settings);
        let records = (1..=7).rev().map(|i| mk_user(i, &format!("User{i}"))).collect();
        assert!(view.apply_fetch_result(Ok(records)));
        view
    }

    fn ids(view: &UserListView) -> Vec<u64> {
        view.page().rows.iter().map(|r| r.id).collect()
    }

    #[test]
    fn starts_loading_with_defaults() {
        let view = UserListView::new(&ViewSettings::default());
        assert!(view.is_loading());
        assert!(view.records().is_empty());
        assert_eq!(view.sort(), SortSpec::default());
        assert_eq!(view.current_page(), 1);
        assert_eq!(view.page_size(), 5);
        assert_eq!(view.search_term(), "");
    }

    #[test]
    fn failure_is_terminal_and_distinct_from_loading() {
        let mut view = UserListView::new(&ViewSettings::default());
        assert!(view.apply_fetch_result(Err(FetchError::Unavailable("offline".into()))));
        assert_eq!(view.load_state(), &LoadState::Failed("offline".into()));
        assert!(!view.is_loading());
        // no way back to loading or ready
        assert!(!view.apply_fetch_result(Ok(vec![mk_user(1, "Late")])));
        assert!(view.records().is_empty());
    }

    #[test]
    fn result_after_unmount_is_ignored() {
        let mut view = UserListView::new(&ViewSettings::default());
        view.unmount();
        assert!(!view.apply_fetch_result(Ok(vec![mk_user(1, "Late")])));
        assert!(view.is_loading());
        assert!(view.records().is_empty());
    }

    #[test]
    fn paging_respects_enabled_rules() {
        let mut view = ready_view(&ViewSettings::default());
        assert_eq!(ids(&view), vec![1, 2, 3, 4, 5]);
        assert!(!view.previous_page());
        assert!(view.next_page());
        assert_eq!(ids(&view), vec![6, 7]);
        assert!(!view.next_page());
        assert_eq!(view.current_page(), 2);
        assert!(view.previous_page());
        assert_eq!(view.current_page(), 1);
    }

    #[test]
    fn search_keeps_page_unless_configured() {
        let mut view = ready_view(&ViewSettings::default());
        view.next_page();
        view.set_search_term("user3");
        assert_eq!(view.current_page(), 2);
        assert!(view.page().rows.is_empty());

        let settings = ViewSettings {
            reset_page_on_search: true,
            ..ViewSettings::default()
        };
        let mut view = ready_view(&settings);
        view.next_page();
        view.push_search_char('3');
        assert_eq!(view.current_page(), 1);
        assert_eq!(ids(&view), vec![3]);
    }

    #[test]
    fn toggling_name_twice_flips_direction() {
        let mut view = ready_view(&ViewSettings::default());
        view.toggle_sort(SortField::Name);
        assert_eq!(view.sort().direction, SortDirection::Ascending);
        view.toggle_sort(SortField::Name);
        assert_eq!(view.sort().field, SortField::Name);
        assert_eq!(view.sort().direction, SortDirection::Descending);
        assert_eq!(ids(&view), vec![7, 6, 5, 4, 3]);
    }

    #[test]
    fn selection_stays_inside_visible_rows() {
        let mut view = ready_view(&ViewSettings::default());
        for _ in 0..10 {
            view.move_selection_down();
        }
        assert_eq!(view.selected_row(), 4);
        assert_eq!(selected_id(&view), Some(5));
        view.next_page();
        assert_eq!(view.selected_row(), 0);
        view.move_selection_up();
        assert_eq!(selected_id(&view), Some(6));
    }
}
