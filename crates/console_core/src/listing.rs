//! List view controller: in-memory result set, client-side filtering and
//! pagination.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use shared::protocol::Resource;
use tracing::{debug, info};

use crate::{
    backend::AdminBackend,
    envelope::decode_list,
    error::ConsoleError,
    events::Notifier,
    sequence::{RequestSequence, Ticket},
};

/// Categorical filter value meaning "no constraint".
pub const ALL: &str = "all";

pub const DEFAULT_PAGE_SIZE: usize = 10;

pub trait Listable: DeserializeOwned + Clone + Send + Sync {
    const RESOURCE: Resource;

    fn id(&self) -> &str;
    /// Text fields the free-text search looks at.
    fn search_fields(&self) -> Vec<&str>;
    /// Value of a categorical field, `None` when the entity has no such field.
    fn category(&self, key: &str) -> Option<&str>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    search: String,
    categories: BTreeMap<String, String>,
}

impl FilterState {
    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn category(&self, key: &str) -> &str {
        self.categories.get(key).map(String::as_str).unwrap_or(ALL)
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    pub fn set_category(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        let key = key.into();
        if value == ALL {
            self.categories.remove(&key);
        } else {
            self.categories.insert(key, value);
        }
    }

    pub fn matches<T: Listable>(&self, item: &T) -> bool {
        let term = self.search.to_lowercase();
        if !term.is_empty()
            && !item
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&term))
        {
            return false;
        }

        self.categories
            .iter()
            .all(|(key, expected)| item.category(key) == Some(expected.as_str()))
    }
}

pub fn filter_items<'a, T: Listable>(items: &'a [T], filter: &FilterState) -> Vec<&'a T> {
    items.iter().filter(|item| filter.matches(*item)).collect()
}

pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1)).max(1)
}

pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// The `[ (page-1)*size, page*size )` window of `items`, clipped to its length.
pub fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let page_size = page_size.max(1);
    let start = page.saturating_sub(1).saturating_mul(page_size).min(items.len());
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageView<'a, T> {
    pub items: Vec<&'a T>,
    pub page: usize,
    pub total_pages: usize,
    pub total_count: usize,
    pub page_size: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

impl<T> PageView<'_, T> {
    /// The explicit "no results" state.
    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied(usize),
    /// A newer refresh was started before this one settled.
    Stale,
}

pub struct ListController<T: Listable> {
    items: Vec<T>,
    filter: FilterState,
    page: usize,
    page_size: usize,
    sequence: RequestSequence,
    notifier: Notifier,
}

impl<T: Listable> Default for ListController<T> {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl<T: Listable> ListController<T> {
    pub fn new(page_size: usize) -> Self {
        Self::with_notifier(page_size, Notifier::default())
    }

    pub fn with_notifier(page_size: usize, notifier: Notifier) -> Self {
        Self {
            items: Vec::new(),
            filter: FilterState::default(),
            page: 1,
            page_size: page_size.max(1),
            sequence: RequestSequence::default(),
            notifier,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn find(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.page = clamp_page(self.page, self.total_pages());
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.filter.set_search(term);
        self.page = 1;
    }

    pub fn set_category(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.filter.set_category(key, value);
        self.page = 1;
    }

    pub fn clear_filters(&mut self) {
        self.filter = FilterState::default();
        self.page = 1;
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 1;
    }

    /// Returns whether the page changed.
    pub fn next_page(&mut self) -> bool {
        if self.page < self.total_pages() {
            self.page += 1;
            true
        } else {
            false
        }
    }

    pub fn prev_page(&mut self) -> bool {
        if self.page > 1 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.page = clamp_page(page, self.total_pages());
    }

    pub fn filtered(&self) -> Vec<&T> {
        filter_items(&self.items, &self.filter)
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered().len(), self.page_size)
    }

    pub fn view(&self) -> PageView<'_, T> {
        let filtered = self.filtered();
        let total_count = filtered.len();
        let total_pages = total_pages(total_count, self.page_size);
        let page = clamp_page(self.page, total_pages);
        let items = page_slice(&filtered, page, self.page_size).to_vec();

        PageView {
            items,
            page,
            total_pages,
            total_count,
            page_size: self.page_size,
            has_prev: page > 1,
            has_next: page < total_pages,
        }
    }

    pub fn begin_refresh(&mut self) -> Ticket {
        self.sequence.next()
    }

    /// Applies a settled fetch. Superseded tickets are ignored; failures keep
    /// the previous result set and raise a notification.
    pub fn apply_refresh(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<T>, ConsoleError>,
    ) -> Result<RefreshOutcome, ConsoleError> {
        if !self.sequence.is_current(ticket) {
            debug!(resource = T::RESOURCE.segment, "discarding stale list response");
            return Ok(RefreshOutcome::Stale);
        }

        match result {
            Ok(items) => {
                let count = items.len();
                self.set_items(items);
                info!(resource = T::RESOURCE.segment, count, "list refreshed");
                self.notifier.list_refreshed(T::RESOURCE.segment, count);
                Ok(RefreshOutcome::Applied(count))
            }
            Err(err) => {
                self.notifier.error(&err);
                Err(err)
            }
        }
    }

    pub async fn refresh(
        &mut self,
        backend: &dyn AdminBackend,
    ) -> Result<RefreshOutcome, ConsoleError> {
        let ticket = self.begin_refresh();
        let result = match backend.get_all(T::RESOURCE).await {
            Ok(raw) => decode_list(&raw, &T::RESOURCE),
            Err(err) => Err(err),
        };
        self.apply_refresh(ticket, result)
    }
}

#[cfg(test)]
#[path = "tests/listing_tests.rs"]
mod tests;
