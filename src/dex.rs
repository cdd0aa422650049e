//! Searchable, filterable, paginated listing of the catalog.

use schema::{CreatureRecord, CreatureType};

pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Listing state: the full record set plus the current search, type filter and page.
///
/// Changing the search text or the type filter goes back to page 1. The page
/// is always kept within `1..=total_pages` (page 1 when nothing matches).
#[derive(Debug, Clone)]
pub struct Dex {
    records: Vec<CreatureRecord>,
    search: String,
    type_filter: Option<CreatureType>,
    page: usize,
    page_size: usize,
}

/// One rendered page of the listing.
#[derive(Debug, Clone, PartialEq)]
pub struct DexPage<'a> {
    pub entries: Vec<&'a CreatureRecord>,
    pub page: usize,
    pub total_pages: usize,
    pub total_matches: usize,
    pub is_first: bool,
    pub is_last: bool,
}

impl Dex {
    pub fn new(records: Vec<CreatureRecord>, page_size: usize) -> Self {
        Self {
            records,
            search: String::new(),
            type_filter: None,
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn type_filter(&self) -> Option<CreatureType> {
        self.type_filter
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn set_search(&mut self, search: &str) {
        self.search = search.trim().to_lowercase();
        self.page = 1;
    }

    pub fn set_type_filter(&mut self, type_filter: Option<CreatureType>) {
        self.type_filter = type_filter;
        self.page = 1;
    }

    fn matches(&self, record: &CreatureRecord) -> bool {
        let name_matches =
            self.search.is_empty() || record.name.to_lowercase().contains(&self.search);
        let type_matches = match self.type_filter {
            Some(wanted) => record.types.contains(&wanted),
            None => true,
        };
        name_matches && type_matches
    }

    /// Records passing the search and type filter, in dex order.
    pub fn filtered(&self) -> Vec<&CreatureRecord> {
        self.records.iter().filter(|r| self.matches(r)).collect()
    }

    /// `ceil(matches / page_size)`. Zero when nothing matches.
    pub fn total_pages(&self) -> usize {
        self.filtered().len().div_ceil(self.page_size)
    }

    /// Jump to a page, clamped to the available range.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.total_pages().max(1));
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page + 1);
    }

    pub fn previous_page(&mut self) {
        self.set_page(self.page.saturating_sub(1));
    }

    pub fn current_page(&self) -> DexPage<'_> {
        let filtered = self.filtered();
        let total_matches = filtered.len();
        let total_pages = total_matches.div_ceil(self.page_size);
        let start = (self.page - 1) * self.page_size;
        let entries = filtered
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .collect();

        DexPage {
            entries,
            page: self.page,
            total_pages,
            total_matches,
            is_first: self.page == 1,
            is_last: self.page >= total_pages,
        }
    }
}
