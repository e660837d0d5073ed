use std::collections::HashMap;

use tracing::{debug, warn};

use crate::api::FetchError;
use crate::models::{FieldRange, SortState, StatementRecord};
use crate::pipeline;
use crate::schema::StatementType;

/// Which bound of the selected filter a key press moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundEdge {
    Min,
    Max,
}

/// Result of one fetch task, tagged with the generation that issued it.
#[derive(Debug)]
pub struct FetchOutcome {
    pub statement: StatementType,
    pub generation: u64,
    pub result: Result<Vec<StatementRecord>, FetchError>,
}

/// All state owned by one statement view: the loaded record set, derived
/// ranges, active filters, sort, and the cursor positions of the UI.
#[derive(Debug)]
pub struct ViewState {
    pub statement: StatementType,
    pub symbol: String,
    pub records: Vec<StatementRecord>,
    pub ranges: HashMap<String, FieldRange>,
    pub filters: HashMap<String, FieldRange>,
    pub sort: SortState,
    pub selected_filter: usize,
    pub selected_column: usize,
    pub table_offset: usize,
    pub status: String,
    pub in_flight: bool,
    generation: u64,
}

impl ViewState {
    pub fn new(statement: StatementType) -> Self {
        let ranges = statement.schema().placeholder_ranges();
        Self {
            statement,
            symbol: String::new(),
            records: Vec::new(),
            ranges: ranges.clone(),
            filters: ranges,
            sort: SortState::unsorted(),
            selected_filter: 0,
            selected_column: 0,
            table_offset: 0,
            status: "Enter a symbol and press Enter to fetch".to_string(),
            in_flight: false,
            generation: 0,
        }
    }

    pub fn has_data(&self) -> bool {
        !self.records.is_empty()
    }

    /// Mark a new fetch as issued and return its generation. Any outcome
    /// carrying an older generation will be discarded on arrival, so only
    /// the latest request's resolution can mutate this view.
    pub fn begin_fetch(&mut self) -> u64 {
        self.generation += 1;
        self.in_flight = true;
        self.status = format!("Fetching '{}'...", self.symbol);
        self.generation
    }

    /// Apply a fetch outcome, ignoring stale generations.
    ///
    /// Success with records replaces the set, re-derives ranges, seeds the
    /// filters to the full ranges, and sorts newest-first by date. An empty
    /// result or an error both reset to the placeholder defaults; neither
    /// raises a modal error, the status line is the only signal.
    pub fn apply_fetch(
        &mut self,
        generation: u64,
        result: Result<Vec<StatementRecord>, FetchError>,
    ) {
        if generation != self.generation {
            debug!(
                "discarding stale {} fetch (generation {} < {})",
                self.statement.title(),
                generation,
                self.generation
            );
            return;
        }
        self.in_flight = false;

        match result {
            Ok(records) if !records.is_empty() => {
                let count = records.len();
                self.records = records;
                self.ranges = pipeline::derive_ranges(self.statement.schema(), &self.records);
                self.filters = self.ranges.clone();
                self.sort = SortState::date_descending();
                self.table_offset = 0;
                self.status = format!("{} periods loaded", count);
            }
            Ok(_) => {
                self.reset_data();
                self.status = format!("No data for '{}'", self.symbol);
            }
            Err(err) => {
                warn!("{} fetch failed: {}", self.statement.title(), err);
                self.reset_data();
                self.status = format!("Fetch failed for '{}'", self.symbol);
            }
        }
    }

    /// Drop all records and return ranges, filters, and sort to the fixed
    /// placeholder defaults.
    fn reset_data(&mut self) {
        self.records.clear();
        self.ranges = self.statement.schema().placeholder_ranges();
        self.filters = self.ranges.clone();
        self.sort = SortState::unsorted();
        self.table_offset = 0;
    }

    /// Current display rows: the full pipeline over current state.
    pub fn visible_rows(&self) -> Vec<StatementRecord> {
        pipeline::apply(&self.records, &self.filters, &self.sort)
    }

    /// Scroll the table window by `delta` rows, clamped to the current
    /// display rows. Narrowing a filter can shrink the row count below the
    /// offset, so the renderer clamps again at draw time.
    pub fn scroll_table(&mut self, delta: i64) {
        let max = self.visible_rows().len().saturating_sub(1) as i64;
        let next = (self.table_offset as i64 + delta).clamp(0, max);
        self.table_offset = next as usize;
    }

    /// Nudge one bound of the selected filter by `steps` slider steps,
    /// clamped so the active range stays ordered and inside the derived
    /// range. Inert until data is loaded, like a disabled slider.
    pub fn adjust_filter(&mut self, edge: BoundEdge, steps: i64) {
        if !self.has_data() {
            return;
        }
        let Some(spec) = self.statement.schema().fields.get(self.selected_filter) else {
            return;
        };
        let Some(range) = self.ranges.get(spec.key).copied() else {
            return;
        };
        let Some(filter) = self.filters.get_mut(spec.key) else {
            return;
        };

        let delta = spec.step(range.min, range.max) * steps as f64;
        match edge {
            BoundEdge::Min => filter.min = (filter.min + delta).clamp(range.min, filter.max),
            BoundEdge::Max => filter.max = (filter.max + delta).clamp(filter.min, range.max),
        }
    }

    /// Widen every filter back to its full derived range (no filtering).
    pub fn reset_filters(&mut self) {
        self.filters = self.ranges.clone();
    }

    /// Header-click sort toggle on the selected column.
    pub fn toggle_sort_on_selected(&mut self) {
        if let Some(spec) = self.statement.schema().fields.get(self.selected_column) {
            self.sort.toggle(spec.key);
        }
    }

    pub fn select_next_filter(&mut self) {
        let count = self.statement.schema().fields.len();
        self.selected_filter = (self.selected_filter + 1) % count;
    }

    pub fn select_prev_filter(&mut self) {
        let count = self.statement.schema().fields.len();
        self.selected_filter = (self.selected_filter + count - 1) % count;
    }

    pub fn select_next_column(&mut self) {
        let count = self.statement.schema().fields.len();
        self.selected_column = (self.selected_column + 1) % count;
    }

    pub fn select_prev_column(&mut self) {
        let count = self.statement.schema().fields.len();
        self.selected_column = (self.selected_column + count - 1) % count;
    }
}
