// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 dmail contributors

//! Inbox table state: timestamp sort, client-side pagination, row detail.
//!
//! The fetched snapshot is held in contract-reported order and never
//! reordered in place; sorting and paging are computed views over it, so a
//! re-fetch comparison still sees contract order.

use crate::models::MailMessage;

/// Page sizes offered by the table.
pub const ROWS_PER_PAGE_OPTIONS: [usize; 3] = [5, 10, 15];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    fn reversed(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

/// State of the inbox view.
#[derive(Debug, Clone)]
pub struct InboxView {
    /// Snapshot in contract order; identity is never mutated.
    entries: Vec<MailMessage>,
    sort: SortOrder,
    page: usize,
    rows_per_page: usize,
    selected: Option<usize>,
}

impl Default for InboxView {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            sort: SortOrder::Ascending,
            page: 0,
            rows_per_page: ROWS_PER_PAGE_OPTIONS[0],
            selected: None,
        }
    }
}

impl InboxView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the snapshot after a fetch; paging and selection reset.
    pub fn set_entries(&mut self, entries: Vec<MailMessage>) {
        self.entries = entries;
        self.page = 0;
        self.selected = None;
    }

    /// The underlying snapshot, still in contract order.
    pub fn entries(&self) -> &[MailMessage] {
        &self.entries
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort
    }

    /// Flip the sort direction. Only the displayed order changes.
    pub fn toggle_sort(&mut self) {
        self.sort = self.sort.reversed();
    }

    /// Entry indices in display order: sorted by timestamp, stable within
    /// equal timestamps.
    fn display_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.entries.len()).collect();
        order.sort_by_key(|&i| self.entries[i].timestamp);
        if self.sort == SortOrder::Descending {
            order.reverse();
        }
        order
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        self.entries.len().div_ceil(self.rows_per_page).max(1)
    }

    /// Move to `page`, clamped to the last page.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.min(self.page_count() - 1);
    }

    pub fn rows_per_page(&self) -> usize {
        self.rows_per_page
    }

    /// Change page size; invalid sizes are ignored. Paging restarts at the
    /// first page.
    pub fn set_rows_per_page(&mut self, rows: usize) {
        if ROWS_PER_PAGE_OPTIONS.contains(&rows) {
            self.rows_per_page = rows;
            self.page = 0;
        }
    }

    /// Rows visible on the current page, in display order.
    pub fn visible_rows(&self) -> Vec<&MailMessage> {
        self.display_order()
            .into_iter()
            .skip(self.page * self.rows_per_page)
            .take(self.rows_per_page)
            .map(|i| &self.entries[i])
            .collect()
    }

    /// Open the detail view for a row of the current page.
    pub fn select_visible_row(&mut self, row: usize) {
        self.selected = self
            .display_order()
            .into_iter()
            .skip(self.page * self.rows_per_page)
            .take(self.rows_per_page)
            .nth(row);
    }

    /// The message open in the detail view, if any.
    pub fn selected(&self) -> Option<&MailMessage> {
        self.selected.map(|i| &self.entries[i])
    }

    pub fn close_detail(&mut self) {
        self.selected = None;
    }
}
