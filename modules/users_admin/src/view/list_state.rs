//! List-state controller for the users table.
//!
//! Owns pagination, the raw and debounced search text and the status filter.
//! Every committed change is mirrored into the shared [`Location`]; at mount
//! the location seeds the state. Loads are issued as tickets so that only the
//! most recent one can land.

use std::sync::Arc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::UsersAdminConfig;
use crate::contract::{
    error::UsersAdminError,
    model::{ListQuery, ListResult, StatusFilter},
};
use crate::view::cache::QueryCache;
use crate::view::debounce::Debouncer;
use crate::view::location::{keys, Location};
use crate::view::model::{ListView, PlaceholderRow, UserRow};

/// Handle for one issued load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    query: ListQuery,
}

impl LoadTicket {
    pub fn query(&self) -> &ListQuery {
        &self.query
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// Applied, but the page no longer existed and was pulled back to `to`.
    Clamped { from: u32, to: u32 },
    /// Superseded by a newer ticket, or the controller was torn down.
    Discarded,
}

pub struct ListController {
    location: Location,
    cache: Arc<QueryCache>,
    scope: CancellationToken,
    query: ListQuery,
    raw_search: String,
    debounce: Debouncer,
    total_pages: Option<u32>,
    generation: u64,
    loading: bool,
    last: Option<(ListQuery, ListResult)>,
    last_error: Option<UsersAdminError>,
}

impl ListController {
    /// Seed state from `location`. Values that do not parse fall back to defaults.
    pub fn mount(
        location: Location,
        cache: Arc<QueryCache>,
        config: &UsersAdminConfig,
        scope: CancellationToken,
    ) -> Self {
        let page = location
            .get(keys::PAGE)
            .and_then(|p| p.parse::<u32>().ok())
            .unwrap_or(1);
        let search = location.get(keys::QUERY).unwrap_or_default();
        let status = location
            .get(keys::STATUS)
            .map(|s| StatusFilter::parse_lenient(&s))
            .unwrap_or_default();

        let query = ListQuery::new(config.default_page_size)
            .with_page(page)
            .with_search(search.clone())
            .with_status(status);
        debug!(?query, "list controller mounted");

        Self {
            location,
            cache,
            scope,
            query,
            raw_search: search,
            debounce: Debouncer::new(config.search_debounce()),
            total_pages: None,
            generation: 0,
            loading: false,
            last: None,
            last_error: None,
        }
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    /// Text as typed, ahead of the debounce.
    pub fn raw_search_text(&self) -> &str {
        &self.raw_search
    }

    pub fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    pub fn last_result(&self) -> Option<&ListResult> {
        self.last.as_ref().map(|(_, result)| result)
    }

    pub fn last_error(&self) -> Option<&UsersAdminError> {
        self.last_error.as_ref()
    }

    pub fn is_mounted(&self) -> bool {
        !self.scope.is_cancelled()
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        if !self.is_mounted() {
            return;
        }
        let text = text.into();
        self.raw_search = text.clone();
        self.debounce.push(text, Instant::now());
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.debounce.deadline()
    }

    /// Commit the debounced search text if its deadline has passed.
    /// Returns whether the query changed.
    pub fn tick(&mut self) -> bool {
        if !self.is_mounted() {
            return false;
        }
        let Some(text) = self.debounce.poll(Instant::now()) else {
            return false;
        };
        if text == self.query.search_text {
            return false;
        }
        debug!(search = %text, "search text committed");
        self.query.search_text = text;
        self.query.page = 1;
        self.sync_location();
        true
    }

    /// Sleep until the pending debounce deadline, then [`tick`](Self::tick).
    /// Returns `false` right away when nothing is pending or on teardown.
    pub async fn wait_for_debounce(&mut self) -> bool {
        let Some(deadline) = self.next_deadline() else {
            return false;
        };
        let scope = self.scope.clone();
        tokio::select! {
            _ = scope.cancelled() => false,
            _ = tokio::time::sleep_until(deadline) => self.tick(),
        }
    }

    /// Leaves a pending search debounce untouched.
    pub fn set_status_filter(&mut self, filter: StatusFilter) -> bool {
        if !self.is_mounted() || filter == self.query.status_filter {
            return false;
        }
        self.query.status_filter = filter;
        self.query.page = 1;
        self.sync_location();
        true
    }

    /// Go to page `n`, clamped to `[1, total_pages]` once the total is known.
    pub fn set_page(&mut self, n: u32) -> bool {
        if !self.is_mounted() {
            return false;
        }
        let upper = self.total_pages.unwrap_or(u32::MAX);
        let page = n.clamp(1, upper.max(1));
        if page == self.query.page {
            return false;
        }
        self.query.page = page;
        self.sync_location();
        true
    }

    pub fn begin_load(&mut self) -> Option<LoadTicket> {
        if !self.is_mounted() {
            return None;
        }
        self.generation += 1;
        self.loading = true;
        Some(LoadTicket {
            generation: self.generation,
            query: self.query.clone(),
        })
    }

    pub fn apply_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<ListResult, UsersAdminError>,
    ) -> LoadOutcome {
        if !self.is_mounted() || ticket.generation != self.generation {
            debug!(
                ticket = ticket.generation,
                latest = self.generation,
                "discarding list load"
            );
            return LoadOutcome::Discarded;
        }
        self.loading = false;

        let result = match result {
            Ok(result) => result,
            Err(e) => {
                self.last_error = Some(e);
                return LoadOutcome::Applied;
            }
        };

        let total_pages = result.total_pages(self.query.page_size);
        self.total_pages = Some(total_pages);
        self.last_error = None;
        self.last = Some((ticket.query, result));

        if self.query.page > total_pages {
            let from = self.query.page;
            self.query.page = total_pages;
            self.sync_location();
            debug!(from, to = total_pages, "page clamped after load");
            return LoadOutcome::Clamped {
                from,
                to: total_pages,
            };
        }
        LoadOutcome::Applied
    }

    /// Load the current query through the cache. A clamped page is loaded
    /// once more so the rows match the page shown.
    pub async fn reload(&mut self) -> LoadOutcome {
        let outcome = self.load_once().await;
        if let LoadOutcome::Clamped { .. } = outcome {
            self.load_once().await;
        }
        outcome
    }

    async fn load_once(&mut self) -> LoadOutcome {
        let Some(ticket) = self.begin_load() else {
            return LoadOutcome::Discarded;
        };
        let result = self.cache.list(ticket.query()).await;
        self.apply_load(ticket, result)
    }

    /// Cancel the page scope. Later ticks and load results are no-ops.
    pub fn teardown(&mut self) {
        self.scope.cancel();
        self.debounce.cancel();
        self.loading = false;
    }

    pub fn view(&self) -> ListView {
        let total_pages = self.total_pages.unwrap_or(1);
        let mut view = ListView {
            page: self.query.page,
            total_pages,
            is_loading: self.loading,
            ..Default::default()
        };

        if let Some(e) = &self.last_error {
            view.placeholder_row = Some(PlaceholderRow::Error(e.to_string()));
            return view;
        }

        if let Some((query, result)) = &self.last {
            view.rows = result.items.iter().map(UserRow::from).collect();
            view.total_count = result.total_count;
            view.is_placeholder = query != &self.query;
            if view.rows.is_empty() && !self.loading {
                view.placeholder_row = Some(PlaceholderRow::NoResults);
            }
        }
        view
    }

    fn sync_location(&self) {
        let q = &self.query;
        self.location.update(|p| {
            p.set_or_remove(keys::PAGE, (q.page > 1).then(|| q.page.to_string()));
            p.set_or_remove(
                keys::QUERY,
                (!q.search_text.is_empty()).then(|| q.search_text.clone()),
            );
            p.set_or_remove(
                keys::STATUS,
                (q.status_filter != StatusFilter::All)
                    .then(|| q.status_filter.as_str().to_string()),
            );
        });
    }
}
