//! List processing for the Users screen: search, stable sort and pagination.
//!
//! Everything here is pure. [`visible_page`] runs the whole
//! filter → sort → page pipeline over the stored records and is what the UI
//! calls on every frame.
//!
use std::cmp::Ordering;
use std::ops::Range;

use crate::source::UserRecord;

/// Rows per page when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Attribute a table can be ordered by.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    Id,
    Name,
    Email,
    Phone,
    Website,
}

impl SortField {
    pub const ALL: [SortField; 5] = [
        SortField::Id,
        SortField::Name,
        SortField::Email,
        SortField::Phone,
        SortField::Website,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SortField::Id => "ID",
            SortField::Name => "Name",
            SortField::Email => "Email",
            SortField::Phone => "Phone",
            SortField::Website => "Website",
        }
    }

    /// Natural order of this field: numeric for the id, lexicographic otherwise.
    pub fn compare(self, a: &UserRecord, b: &UserRecord) -> Ordering {
        match self {
            SortField::Id => a.id.cmp(&b.id),
            SortField::Name => a.name.cmp(&b.name),
            SortField::Email => a.email.cmp(&b.email),
            SortField::Phone => a.phone.cmp(&b.phone),
            // None < Some(_)
            SortField::Website => a.website.cmp(&b.website),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    /// Header-click semantics: same field flips direction, another field starts ascending.
    pub fn toggled(self, field: SortField) -> Self {
        if self.field == field {
            Self {
                field,
                direction: self.direction.toggled(),
            }
        } else {
            Self {
                field,
                direction: SortDirection::Ascending,
            }
        }
    }
}

/// Inputs of one pipeline run.
#[derive(Clone, Debug)]
pub struct ViewQuery<'a> {
    pub search_term: &'a str,
    pub sort: SortSpec,
    /// 1-based.
    pub page: usize,
    pub page_size: usize,
}

impl Default for ViewQuery<'_> {
    fn default() -> Self {
        Self {
            search_term: "",
            sort: SortSpec::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Result of one pipeline run: the visible rows plus what the pager needs.
#[derive(Clone, Debug)]
pub struct PageView<'a> {
    pub rows: Vec<&'a UserRecord>,
    pub page: usize,
    pub page_size: usize,
    pub total_matches: usize,
    pub page_count: usize,
    pub has_next: bool,
    pub has_previous: bool,
}

/// True iff any text field contains `needle_lower` (already lowercased).
pub fn matches_term(record: &UserRecord, needle_lower: &str) -> bool {
    if needle_lower.is_empty() {
        return true;
    }
    record.name.to_lowercase().contains(needle_lower)
        || record.email.to_lowercase().contains(needle_lower)
        || record.phone.to_lowercase().contains(needle_lower)
        || record
            .website
            .as_deref()
            .unwrap_or("")
            .to_lowercase()
            .contains(needle_lower)
}

pub fn filter_records<'a>(records: &'a [UserRecord], term: &str) -> Vec<&'a UserRecord> {
    let q = term.to_lowercase();
    records.iter().filter(|r| matches_term(r, &q)).collect()
}

/// Stable in both directions: equal keys keep their input order.
pub fn sort_records(rows: &mut [&UserRecord], sort: SortSpec) {
    rows.sort_by(|a, b| match sort.direction {
        SortDirection::Ascending => sort.field.compare(a, b),
        SortDirection::Descending => sort.field.compare(b, a),
    });
}

/// Index range of `page` (1-based) within a sequence of `len` items.
pub fn page_bounds(page: usize, page_size: usize, len: usize) -> Range<usize> {
    let size = page_size.max(1);
    let start = page.saturating_sub(1).saturating_mul(size).min(len);
    let end = start.saturating_add(size).min(len);
    start..end
}

pub fn page_count(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1))
}

/// Run filter → sort → paginate over `records`.
pub fn visible_page<'a>(records: &'a [UserRecord], query: &ViewQuery<'_>) -> PageView<'a> {
    let mut rows = filter_records(records, query.search_term);
    sort_records(&mut rows, query.sort);

    let total = rows.len();
    let page = query.page.max(1);
    let size = query.page_size.max(1);
    let bounds = page_bounds(page, size, total);
    let has_next = page.saturating_mul(size) < total;

    PageView {
        rows: rows[bounds].to_vec(),
        page,
        page_size: size,
        total_matches: total,
        page_count: page_count(total, size),
        has_next,
        has_previous: page > 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mk_user(id: u64, name: &str, email: &str, phone: &str, website: Option<&str>) -> UserRecord {
        UserRecord {
            id,
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            website: website.map(|s| s.to_string()),
        }
    }

    fn seven() -> Vec<UserRecord> {
        vec![
            mk_user(3, "Clementine", "nathan@yesenia.net", "1-463-123-4447", Some("ramiro.info")),
            mk_user(1, "Leanne", "sincere@april.biz", "1-770-736-8031", Some("hildegard.org")),
            mk_user(7, "Kurtis", "telly.hoeger@billy.biz", "210.067.6132", Some("elvis.io")),
            mk_user(2, "Ervin", "shanna@melissa.tv", "010-692-6593", Some("anastasia.net")),
            mk_user(5, "Chelsey", "lucio@annie.ca", "(254)954-1289", Some("demarco.info")),
            mk_user(4, "Patricia", "julianne.oconner@kory.org", "493-170-9623", None),
            mk_user(6, "Dennis", "karley_dach@jasper.info", "1-477-935-8478", Some("ola.org")),
        ]
    }

    fn by(field: SortField, direction: SortDirection) -> SortSpec {
        SortSpec { field, direction }
    }

    fn ids(rows: &[&UserRecord]) -> Vec<u64> {
        rows.iter().map(|r| r.id).collect()
    }

    #[test]
    fn search_is_case_insensitive_across_text_fields() {
        let users = seven();
        assert_eq!(ids(&filter_records(&users, "LEANNE")), vec![1]);
        assert_eq!(ids(&filter_records(&users, "Melissa.TV")), vec![2]);
        assert_eq!(ids(&filter_records(&users, "954-1289")), vec![5]);
        assert_eq!(ids(&filter_records(&users, "ELVIS")), vec![7]);
    }

    #[test]
    fn search_does_not_look_at_the_id() {
        let users = vec![mk_user(42, "Ann", "ann@x.org", "555", None)];
        assert!(filter_records(&users, "42").is_empty());
    }

    #[test]
    fn empty_term_keeps_everything_in_input_order() {
        let users = seven();
        assert_eq!(ids(&filter_records(&users, "")), vec![3, 1, 7, 2, 5, 4, 6]);
    }

    #[test]
    fn missing_website_never_matches_but_sorts_first() {
        let users = seven();
        assert_eq!(ids(&filter_records(&users, "info")), vec![3, 5, 6]);

        let mut rows = filter_records(&users, "");
        sort_records(&mut rows, by(SortField::Website, SortDirection::Ascending));
        assert_eq!(rows[0].id, 4);
    }

    #[test]
    fn descending_sort_keeps_ties_in_input_order() {
        let users = vec![
            mk_user(1, "Sam", "a@x", "1", None),
            mk_user(2, "Alex", "b@x", "2", None),
            mk_user(3, "Sam", "c@x", "3", None),
            mk_user(4, "Alex", "d@x", "4", None),
        ];
        let mut rows = filter_records(&users, "");
        sort_records(&mut rows, by(SortField::Name, SortDirection::Ascending));
        assert_eq!(ids(&rows), vec![2, 4, 1, 3]);

        let mut rows = filter_records(&users, "");
        sort_records(&mut rows, by(SortField::Name, SortDirection::Descending));
        assert_eq!(ids(&rows), vec![1, 3, 2, 4]);
    }

    #[test]
    fn toggling_sort_spec_follows_header_semantics() {
        let spec = SortSpec::default();
        let by_name = spec.toggled(SortField::Name);
        assert_eq!(by_name, by(SortField::Name, SortDirection::Ascending));
        let flipped = by_name.toggled(SortField::Name);
        assert_eq!(flipped.direction, SortDirection::Descending);
        let other = flipped.toggled(SortField::Email);
        assert_eq!(other, by(SortField::Email, SortDirection::Ascending));
    }

    #[test]
    fn page_bounds_clamp_to_length() {
        assert_eq!(page_bounds(1, 5, 7), 0..5);
        assert_eq!(page_bounds(2, 5, 7), 5..7);
        assert_eq!(page_bounds(3, 5, 7), 7..7);
        assert_eq!(page_bounds(0, 5, 7), 0..5);
        assert_eq!(page_count(0, 5), 0);
        assert_eq!(page_count(10, 5), 2);
    }

    #[test]
    fn pipeline_pages_sorted_results() {
        let users = seven();
        let mut query = ViewQuery::default();
        let first = visible_page(&users, &query);
        assert_eq!(ids(&first.rows), vec![1, 2, 3, 4, 5]);
        assert!(first.has_next);
        assert!(!first.has_previous);
        assert_eq!(first.page_count, 2);

        query.page = 2;
        let second = visible_page(&users, &query);
        assert_eq!(ids(&second.rows), vec![6, 7]);
        assert!(!second.has_next);
        assert!(second.has_previous);
    }

    #[test]
    fn page_past_the_end_is_empty_with_previous_enabled() {
        let users = seven();
        let query = ViewQuery { search_term: "leanne", page: 2, ..ViewQuery::default() };
        let view = visible_page(&users, &query);
        assert!(view.rows.is_empty());
        assert_eq!(view.total_matches, 1);
        assert!(!view.has_next);
        assert!(view.has_previous);
    }
}
