//! Browse and search state for the city table.
//!
//! Requests are split into a `begin_*` step that hands out a ticket and a
//! `finish_*` step that applies the response. Callers may hold several page
//! tickets at once; pages are committed in offset order no matter which
//! response arrives first. Search tickets carry a generation number so only
//! the response to the latest query is ever applied. A ticket that will never
//! be finished must be handed back through `abandon_*`.

use std::collections::BTreeMap;

use crate::{
    dataset::CityDataset,
    error::Result,
    model::{CityPage, CityRecord},
};

/// Handle for one in-flight page request.
#[derive(Debug, PartialEq, Eq)]
pub struct PageTicket {
    start: u64,
    rows: u64,
}

impl PageTicket {
    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn rows(&self) -> u64 {
        self.rows
    }
}

/// Handle for one in-flight search request.
#[derive(Debug, PartialEq, Eq)]
pub struct SearchTicket {
    generation: u64,
    query: String,
}

impl SearchTicket {
    /// Trimmed query to send to the dataset.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug)]
enum Slot {
    InFlight,
    Ready(CityPage),
}

#[derive(Debug)]
pub struct CityLookup {
    page_size: u64,
    cursor: u64,
    cities: Vec<CityRecord>,
    /// Reserved offsets at or past `cursor`, keyed by start offset.
    pending: BTreeMap<u64, Slot>,
    total_hits: Option<u64>,

    query: String,
    search_results: Vec<CityRecord>,
    search_generation: u64,
    search_in_flight: bool,
}

/// Hands a ticket back to the lookup if the request future is dropped before
/// its response is applied.
struct Reservation<'a, T> {
    lookup: &'a mut CityLookup,
    ticket: Option<T>,
    abandon: fn(&mut CityLookup, T),
}

impl<'a, T> Reservation<'a, T> {
    fn new(lookup: &'a mut CityLookup, ticket: T, abandon: fn(&mut CityLookup, T)) -> Self {
        Self {
            lookup,
            ticket: Some(ticket),
            abandon,
        }
    }

    fn finish(
        mut self,
        apply: fn(&mut CityLookup, T, Result<CityPage>) -> bool,
        result: Result<CityPage>,
    ) -> bool {
        match self.ticket.take() {
            Some(ticket) => apply(self.lookup, ticket, result),
            None => false,
        }
    }
}

impl<T> Drop for Reservation<'_, T> {
    fn drop(&mut self) {
        if let Some(ticket) = self.ticket.take() {
            (self.abandon)(self.lookup, ticket);
        }
    }
}

impl CityLookup {
    pub fn new(page_size: u64) -> Self {
        Self {
            page_size: page_size.max(1),
            cursor: 0,
            cities: Vec::new(),
            pending: BTreeMap::new(),
            total_hits: None,
            query: String::new(),
            search_results: Vec::new(),
            search_generation: 0,
            search_in_flight: false,
        }
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Offset of the next page to commit.
    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    /// Accumulated browse pages in dataset order.
    pub fn cities(&self) -> &[CityRecord] {
        &self.cities
    }

    pub fn search_results(&self) -> &[CityRecord] {
        &self.search_results
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn total_hits(&self) -> Option<u64> {
        self.total_hits
    }

    pub fn is_searching(&self) -> bool {
        !self.query.trim().is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.search_in_flight
            || self
                .pending
                .values()
                .any(|slot| matches!(slot, Slot::InFlight))
    }

    /// Rows the table shows: search results while a query is set, browse pages otherwise.
    pub fn visible_rows(&self) -> &[CityRecord] {
        if self.is_searching() {
            &self.search_results
        } else {
            &self.cities
        }
    }

    /// Reserve the lowest unreserved page offset at or after the cursor.
    pub fn begin_page(&mut self) -> PageTicket {
        let mut start = self.cursor;
        while self.pending.contains_key(&start) {
            start += self.page_size;
        }
        self.pending.insert(start, Slot::InFlight);

        PageTicket {
            start,
            rows: self.page_size,
        }
    }

    /// Apply a page response. Returns `true` once the page is committed.
    ///
    /// On failure the reserved offset is released and the accumulated state is
    /// left untouched. A page that arrives before the pages ahead of it is
    /// buffered and reported as `false` until those have been committed.
    pub fn finish_page(&mut self, ticket: PageTicket, result: Result<CityPage>) -> bool {
        if !matches!(self.pending.get(&ticket.start), Some(Slot::InFlight)) {
            tracing::warn!(start = ticket.start, "ignoring response for unknown page ticket");
            return false;
        }

        let page = match result {
            Ok(page) => page,
            Err(err) => {
                self.pending.remove(&ticket.start);
                tracing::warn!(start = ticket.start, error = %err, "failed to fetch city page");
                return false;
            }
        };

        self.pending.insert(ticket.start, Slot::Ready(page));
        self.commit_ready_pages();
        self.cursor > ticket.start
    }

    /// Release a page reservation whose response will never arrive.
    pub fn abandon_page(&mut self, ticket: PageTicket) {
        if matches!(self.pending.get(&ticket.start), Some(Slot::InFlight)) {
            self.pending.remove(&ticket.start);
            tracing::debug!(start = ticket.start, "abandoned city page request");
        }
    }

    fn commit_ready_pages(&mut self) {
        while matches!(self.pending.get(&self.cursor), Some(Slot::Ready(_))) {
            let Some(Slot::Ready(page)) = self.pending.remove(&self.cursor) else {
                break;
            };
            tracing::debug!(
                start = self.cursor,
                records = page.records.len(),
                "committed city page"
            );

            self.cities.extend(page.records);
            if page.total_hits.is_some() {
                self.total_hits = page.total_hits;
            }
            self.cursor += self.page_size;
        }
    }

    /// Record a new query. Returns a ticket when a search request should be issued.
    ///
    /// An empty or all-whitespace query clears the results without a request.
    /// Either way, responses to earlier queries become stale.
    pub fn begin_search(&mut self, query: &str) -> Option<SearchTicket> {
        self.query = query.to_string();
        self.search_generation += 1;

        let trimmed = query.trim();
        if trimmed.is_empty() {
            self.search_results.clear();
            self.search_in_flight = false;
            return None;
        }

        self.search_in_flight = true;
        Some(SearchTicket {
            generation: self.search_generation,
            query: trimmed.to_string(),
        })
    }

    /// Apply a search response. Returns `true` if it replaced the result set.
    pub fn finish_search(&mut self, ticket: SearchTicket, result: Result<CityPage>) -> bool {
        if ticket.generation != self.search_generation {
            tracing::debug!(query = %ticket.query, "discarding stale search response");
            return false;
        }
        self.search_in_flight = false;

        match result {
            Ok(page) => {
                self.search_results = page.records;
                true
            }
            Err(err) => {
                tracing::warn!(
                    query = %ticket.query,
                    error = %err,
                    "failed to fetch search results"
                );
                false
            }
        }
    }

    /// Give up on a search whose response will never arrive. Results are kept.
    pub fn abandon_search(&mut self, ticket: SearchTicket) {
        if ticket.generation == self.search_generation {
            self.search_in_flight = false;
            tracing::debug!(query = %ticket.query, "abandoned search request");
        }
    }

    /// Fetch and commit the next page. Returns `true` if the cursor moved past it.
    ///
    /// Dropping the returned future releases the reserved offset.
    pub async fn load_next_page(&mut self, dataset: &dyn CityDataset) -> bool {
        let ticket = self.begin_page();
        let (start, rows) = (ticket.start, ticket.rows);
        let reservation = Reservation::new(self, ticket, Self::abandon_page);

        let result = dataset.fetch_page(start, rows).await;
        reservation.finish(Self::finish_page, result)
    }

    /// Set the query and, if it is non-empty, fetch its results.
    ///
    /// Dropping the returned future leaves the previous results in place.
    pub async fn search(&mut self, dataset: &dyn CityDataset, query: &str) -> bool {
        let Some(ticket) = self.begin_search(query) else {
            return true;
        };
        let query = ticket.query.clone();
        let reservation = Reservation::new(self, ticket, Self::abandon_search);

        let result = dataset.search(&query).await;
        reservation.finish(Self::finish_search, result)
    }
}
