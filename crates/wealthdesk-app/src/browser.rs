// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::cmp::Ordering;
use tracing::{debug, warn};

use crate::SortDirection;
use crate::schema::{Cell, Record, Schema};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortState {
    field: Option<String>,
    direction: SortDirection,
}

impl SortState {
    pub fn by(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: Some(field.into()),
            direction,
        }
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn direction(&self) -> Option<SortDirection> {
        self.field.as_ref().map(|_| self.direction)
    }

    pub fn toggled(&self, field: &str) -> Self {
        match self.field.as_deref() {
            Some(active) if active == field => Self {
                field: self.field.clone(),
                direction: self.direction.flipped(),
            },
            _ => Self::by(field, SortDirection::Asc),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    query: String,
}

impl FilterState {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn needle(&self) -> Option<String> {
        let trimmed = self.query.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_lowercase())
        }
    }

    pub fn is_active(&self) -> bool {
        self.needle().is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BrowserState {
    pub sort: SortState,
    pub filter: FilterState,
    pub page: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserCommand {
    SetFilter(String),
    ClearFilter,
    SetSort(String),
    ClearSort,
    SetPage(usize),
    NextPage,
    PrevPage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserEvent {
    FilterChanged(String),
    FilterCleared,
    SortChanged {
        field: String,
        direction: SortDirection,
    },
    SortCleared,
    PageChanged(usize),
}

impl BrowserState {
    pub fn dispatch(&mut self, command: BrowserCommand) -> Vec<BrowserEvent> {
        match command {
            BrowserCommand::SetFilter(query) => {
                if query == self.filter.query {
                    return Vec::new();
                }
                self.filter = FilterState::new(query);
                let mut events = match self.filter.needle() {
                    Some(_) => vec![BrowserEvent::FilterChanged(self.filter.query.clone())],
                    None => vec![BrowserEvent::FilterCleared],
                };
                events.extend(self.reset_page());
                events
            }
            BrowserCommand::ClearFilter => {
                if self.filter.query.is_empty() {
                    return Vec::new();
                }
                self.filter = FilterState::default();
                let mut events = vec![BrowserEvent::FilterCleared];
                events.extend(self.reset_page());
                events
            }
            BrowserCommand::SetSort(field) => {
                self.sort = self.sort.toggled(&field);
                vec![BrowserEvent::SortChanged {
                    field,
                    direction: self.sort.direction,
                }]
            }
            BrowserCommand::ClearSort => {
                if self.sort.field.is_none() {
                    return Vec::new();
                }
                self.sort = SortState::default();
                vec![BrowserEvent::SortCleared]
            }
            BrowserCommand::SetPage(page) => self.move_page(page),
            BrowserCommand::NextPage => self.move_page(self.page.saturating_add(1)),
            BrowserCommand::PrevPage => self.move_page(self.page.saturating_sub(1)),
        }
    }

    fn reset_page(&mut self) -> Option<BrowserEvent> {
        (self.page != 0).then(|| {
            self.page = 0;
            BrowserEvent::PageChanged(0)
        })
    }

    fn move_page(&mut self, page: usize) -> Vec<BrowserEvent> {
        if page == self.page {
            return Vec::new();
        }
        self.page = page;
        vec![BrowserEvent::PageChanged(page)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowAction {
    pub label: &'static str,
    pub destructive: bool,
}

impl RowAction {
    pub const fn new(label: &'static str) -> Self {
        Self {
            label,
            destructive: false,
        }
    }

    pub const fn destructive(label: &'static str) -> Self {
        Self {
            label,
            destructive: true,
        }
    }
}

pub trait ActionHandler {
    fn handle(&mut self, record_id: &str, action_label: &str) -> anyhow::Result<()>;
}

impl<F> ActionHandler for F
where
    F: FnMut(&str, &str) -> anyhow::Result<()>,
{
    fn handle(&mut self, record_id: &str, action_label: &str) -> anyhow::Result<()> {
        self(record_id, action_label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("record {record_id} not found; it may have been removed")]
    RecordNotFound { record_id: String },
    #[error("action {label:?} is not available here")]
    UnknownAction { label: String },
    #[error("{label} failed for {record_id}: {message}")]
    HandlerFailed {
        record_id: String,
        label: String,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReceipt {
    pub record_id: String,
    pub action: RowAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    NoRecords,
    NoMatches,
}

impl EmptyState {
    pub const fn message(self) -> &'static str {
        match self {
            Self::NoRecords => "nothing here yet",
            Self::NoMatches => "no rows match the filter",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserConfig {
    pub searchable: Vec<&'static str>,
    pub sortable: Vec<&'static str>,
    pub actions: Vec<RowAction>,
    pub page_size: usize,
}

impl BrowserConfig {
    pub fn from_schema(schema: &Schema) -> Self {
        Self {
            searchable: schema.searchable_fields(),
            sortable: schema.sortable_fields(),
            actions: Vec::new(),
            page_size: 0,
        }
    }

    pub fn with_actions(mut self, actions: impl IntoIterator<Item = RowAction>) -> Self {
        self.actions = actions.into_iter().collect();
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn action(&self, label: &str) -> Option<RowAction> {
        self.actions
            .iter()
            .copied()
            .find(|action| action.label.eq_ignore_ascii_case(label))
    }
}

pub fn project<R: Record>(
    records: &[R],
    searchable: &[&str],
    sortable: &[&str],
    state: &BrowserState,
) -> Vec<usize> {
    let needle = state.filter.needle();
    let mut rows = records
        .iter()
        .enumerate()
        .filter(|(_, record)| match &needle {
            Some(needle) => matches_needle(*record, searchable, needle),
            None => true,
        })
        .map(|(index, _)| index)
        .collect::<Vec<_>>();

    let Some(field) = state.sort.field() else {
        return rows;
    };
    if !sortable.contains(&field) {
        return rows;
    }
    let direction = state.sort.direction;

    let keys = records
        .iter()
        .map(|record| record.cell(field))
        .collect::<Vec<_>>();
    // Vec::sort_by is stable, so equal rows keep their input order.
    rows.sort_by(|left, right| {
        compare_cells(keys[*left].as_ref(), keys[*right].as_ref(), direction)
    });
    rows
}

fn matches_needle<R: Record>(record: &R, searchable: &[&str], needle: &str) -> bool {
    searchable.iter().any(|field| {
        record
            .cell(field)
            .map(|cell| cell.search_text().to_lowercase().contains(needle))
            .unwrap_or(false)
    })
}

fn compare_cells(left: Option<&Cell>, right: Option<&Cell>, direction: SortDirection) -> Ordering {
    let left_null = left.map(Cell::is_null).unwrap_or(true);
    let right_null = right.map(Cell::is_null).unwrap_or(true);
    match (left_null, right_null) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        (false, false) => {}
    }
    let order = match (left, right) {
        (Some(left), Some(right)) => left.cmp_value(right),
        _ => Ordering::Equal,
    };
    match direction {
        SortDirection::Asc => order,
        SortDirection::Desc => order.reverse(),
    }
}

#[derive(Debug, Clone)]
pub struct RecordBrowser<R> {
    schema: Schema,
    config: BrowserConfig,
    records: Vec<R>,
    state: BrowserState,
    visible: Vec<usize>,
}

impl<R: Record> RecordBrowser<R> {
    pub fn new(schema: Schema, records: Vec<R>) -> Self {
        Self::with_config(schema, BrowserConfig::from_schema(&schema), records)
    }

    pub fn with_config(schema: Schema, config: BrowserConfig, records: Vec<R>) -> Self {
        let mut browser = Self {
            schema,
            config,
            records,
            state: BrowserState::default(),
            visible: Vec::new(),
        };
        browser.reproject();
        browser
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    pub fn state(&self) -> &BrowserState {
        &self.state
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn replace_records(&mut self, records: Vec<R>) {
        debug!(rows = records.len(), "browser records replaced");
        self.records = records;
        self.reproject();
        self.clamp_page();
    }

    pub fn dispatch(&mut self, command: BrowserCommand) -> Vec<BrowserEvent> {
        let start = self.state.page;
        let mut events = self.state.dispatch(command);
        self.reproject();
        self.clamp_page();
        events.retain(|event| !matches!(event, BrowserEvent::PageChanged(_)));
        if self.state.page != start {
            events.push(BrowserEvent::PageChanged(self.state.page));
        }
        if !events.is_empty() {
            debug!(?events, "browser state changed");
        }
        events
    }

    pub fn set_filter(&mut self, query: impl Into<String>) -> Vec<BrowserEvent> {
        self.dispatch(BrowserCommand::SetFilter(query.into()))
    }

    pub fn set_sort(&mut self, field: impl Into<String>) -> Vec<BrowserEvent> {
        self.dispatch(BrowserCommand::SetSort(field.into()))
    }

    pub fn clear_sort(&mut self) -> Vec<BrowserEvent> {
        self.dispatch(BrowserCommand::ClearSort)
    }

    pub fn effective_sort(&self) -> Option<(&str, SortDirection)> {
        let field = self.state.sort.field()?;
        let direction = self.state.sort.direction()?;
        self.config
            .sortable
            .contains(&field)
            .then_some((field, direction))
    }

    pub fn visible_indices(&self) -> &[usize] {
        &self.visible
    }

    pub fn visible(&self) -> Vec<&R> {
        self.visible
            .iter()
            .map(|index| &self.records[*index])
            .collect()
    }

    pub fn page_count(&self) -> usize {
        page_count(self.visible_indices().len(), self.config.page_size)
    }

    pub fn visible_page(&self) -> Vec<&R> {
        let rows = self.visible();
        if self.config.page_size == 0 {
            return rows;
        }
        rows.into_iter()
            .skip(self.state.page * self.config.page_size)
            .take(self.config.page_size)
            .collect()
    }

    pub fn empty_state(&self) -> Option<EmptyState> {
        if self.records.is_empty() {
            return Some(EmptyState::NoRecords);
        }
        if self.visible_indices().is_empty() {
            return Some(EmptyState::NoMatches);
        }
        None
    }

    pub fn find(&self, record_id: &str) -> Option<&R> {
        self.records
            .iter()
            .find(|record| record.record_id() == record_id)
    }

    // Takes `&self`: an action can never change what is visible.
    pub fn invoke_action<H>(
        &self,
        record_id: &str,
        action_label: &str,
        handler: &mut H,
    ) -> Result<ActionReceipt, ActionError>
    where
        H: ActionHandler + ?Sized,
    {
        let Some(action) = self.config.action(action_label) else {
            return Err(ActionError::UnknownAction {
                label: action_label.to_owned(),
            });
        };
        if self.find(record_id).is_none() {
            warn!(record_id, action = action.label, "row action on missing record");
            return Err(ActionError::RecordNotFound {
                record_id: record_id.to_owned(),
            });
        }

        handler
            .handle(record_id, action.label)
            .map_err(|error| ActionError::HandlerFailed {
                record_id: record_id.to_owned(),
                label: action.label.to_owned(),
                message: format!("{error:#}"),
            })?;
        debug!(record_id, action = action.label, "row action handled");
        Ok(ActionReceipt {
            record_id: record_id.to_owned(),
            action,
        })
    }

    fn reproject(&mut self) {
        self.visible = project(
            &self.records,
            &self.config.searchable,
            &self.config.sortable,
            &self.state,
        );
    }

    fn clamp_page(&mut self) {
        let last = self.page_count().saturating_sub(1);
        if self.state.page > last {
            self.state.page = last;
        }
    }
}

fn page_count(rows: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    rows.div_ceil(page_size).max(1)
}

#[cfg(test)]
mod tests {
    use super::{
        ActionError, BrowserCommand, BrowserConfig, BrowserEvent, BrowserState, EmptyState,
        RecordBrowser, RowAction, SortState, project,
    };
    use crate::SortDirection;
    use crate::schema::{DynamicRecord, FieldSpec, RawRecord, Record, Schema};
    use std::collections::BTreeSet;

    const FIELDS: &[FieldSpec] = &[
        FieldSpec::text("name", "Name"),
        FieldSpec::money("aum", "AUM"),
        FieldSpec::date("joined", "Joined"),
        FieldSpec::text("city", "City").not_searchable(),
    ];
    const SCHEMA: Schema = Schema::new(FIELDS);
    const ACTIONS: [RowAction; 2] = [RowAction::new("View"), RowAction::destructive("Delete")];

    fn record(id: &str, fields: &[(&str, &str)]) -> DynamicRecord {
        SCHEMA
            .bind(RawRecord::new(id, fields.iter().copied()))
            .expect("bind test record")
    }

    fn two_clients() -> Vec<DynamicRecord> {
        vec![
            record("C1", &[("name", "Aaron"), ("aum", "10")]),
            record("C2", &[("name", "Zara"), ("aum", "2")]),
        ]
    }

    fn browser(records: Vec<DynamicRecord>) -> RecordBrowser<DynamicRecord> {
        RecordBrowser::with_config(
            SCHEMA,
            BrowserConfig::from_schema(&SCHEMA).with_actions(ACTIONS),
            records,
        )
    }

    fn ids(rows: &[&DynamicRecord]) -> Vec<String> {
        rows.iter().map(|row| row.record_id().to_owned()).collect()
    }

    fn roster(count: usize) -> Vec<DynamicRecord> {
        const NAMES: [&str; 6] = ["Aaron", "Zara", "Mali", "somchai", "ANAN", "Mali"];
        const AUMS: [&str; 5] = ["฿10", "฿2", "฿4.5M", "", "฿2"];
        const DATES: [&str; 4] = ["2024-01-05", "", "2023-12-31", "2024-01-05"];
        let mut state = 0x2545_F491_u64;
        (0..count)
            .map(|index| {
                state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
                let pick = (state >> 33) as usize;
                record(
                    &format!("R{index:03}"),
                    &[
                        ("name", NAMES[pick % NAMES.len()]),
                        ("aum", AUMS[(pick / 7) % AUMS.len()]),
                        ("joined", DATES[(pick / 11) % DATES.len()]),
                        ("city", "Bangkok"),
                    ],
                )
            })
            .collect()
    }

    #[test]
    fn numeric_sort_orders_by_value_not_text() {
        let mut browser = browser(two_clients());
        browser.set_sort("aum");
        assert_eq!(ids(&browser.visible()), vec!["C2", "C1"]);
    }

    #[test]
    fn cached_rows_follow_state_changes_and_record_swaps() {
        let mut browser = browser(two_clients());
        browser.set_sort("aum");
        browser.set_filter("a");
        assert_eq!(ids(&browser.visible()), vec!["C2", "C1"]);

        let mut swapped = two_clients();
        swapped.push(record("C3", &[("name", "Kanya"), ("aum", "1")]));
        swapped.remove(0);
        browser.replace_records(swapped);
        assert_eq!(ids(&browser.visible()), vec!["C3", "C2"]);
        assert_eq!(
            browser.visible_indices(),
            project(
                browser.records(),
                &browser.config().searchable,
                &browser.config().sortable,
                browser.state(),
            )
            .as_slice()
        );

        browser.clear_sort();
        assert_eq!(ids(&browser.visible()), vec!["C2", "C3"]);
    }

    #[test]
    fn filter_example_matches_case_insensitively() {
        let mut browser = browser(two_clients());
        browser.set_filter("zar");
        assert_eq!(ids(&browser.visible()), vec!["C2"]);

        browser.set_filter("ZAR");
        assert_eq!(ids(&browser.visible()), vec!["C2"]);
    }

    #[test]
    fn blank_and_whitespace_filters_show_everything() {
        let records = roster(40);
        let mut browser = browser(records.clone());
        for query in ["", "   ", "\t"] {
            browser.set_filter(query);
            let visible = browser.visible().into_iter().cloned().collect::<Vec<_>>();
            assert_eq!(visible, records, "query {query:?}");
        }
    }

    #[test]
    fn filtered_rows_are_a_subset_that_contains_the_query() {
        let records = roster(60);
        let mut browser = browser(records.clone());
        for query in ["a", "MAL", "chai", "zz", "10"] {
            browser.set_filter(query);
            let needle = query.to_lowercase();
            let visible = browser.visible();
            for row in &visible {
                assert!(records.contains(*row), "row {} not in input", row.record_id());
                let hit = ["name"].iter().any(|field| {
                    row.cell(field)
                        .map(|cell| cell.search_text().to_lowercase().contains(&needle))
                        .unwrap_or(false)
                });
                assert!(hit, "row {} does not contain {query:?}", row.record_id());
            }
        }
    }

    #[test]
    fn filter_ignores_non_searchable_fields() {
        let mut browser = browser(roster(10));
        browser.set_filter("bangkok");
        assert_eq!(browser.empty_state(), Some(EmptyState::NoMatches));
    }

    #[test]
    fn repeating_a_filter_is_idempotent() {
        let mut browser = browser(roster(30));
        browser.set_filter("ma");
        let first = ids(&browser.visible());
        let events = browser.set_filter("ma");
        assert!(events.is_empty());
        assert_eq!(ids(&browser.visible()), first);
    }

    #[test]
    fn filtering_never_mutates_the_collection() {
        let records = roster(25);
        let mut browser = browser(records.clone());
        browser.set_filter("zara");
        browser.set_sort("name");
        browser.set_filter("");
        assert_eq!(browser.records(), records.as_slice());
    }

    #[test]
    fn sort_is_stable_for_every_field_and_direction() {
        let records = roster(80);
        for field in ["name", "aum", "joined", "city"] {
            let mut browser = browser(records.clone());
            browser.set_sort(field);
            for _ in 0..2 {
                let visible = browser.visible();
                for pair in visible.windows(2) {
                    let left = pair[0].cell(field);
                    let right = pair[1].cell(field);
                    let equal = match (&left, &right) {
                        (Some(left), Some(right)) => {
                            (left.is_null() && right.is_null())
                                || (!left.is_null()
                                    && !right.is_null()
                                    && left.cmp_value(right).is_eq())
                        }
                        _ => false,
                    };
                    if equal {
                        assert!(
                            pair[0].record_id() < pair[1].record_id(),
                            "field {field}: {} before {}",
                            pair[0].record_id(),
                            pair[1].record_id()
                        );
                    }
                }
                browser.set_sort(field);
            }
        }
    }

    #[test]
    fn nulls_sort_last_in_both_directions() {
        let mut browser = browser(roster(30));
        browser.set_sort("aum");
        for _ in 0..2 {
            let visible = browser.visible();
            let first_null = visible
                .iter()
                .position(|row| row.cell("aum").map(|cell| cell.is_null()).unwrap_or(true));
            if let Some(first_null) = first_null {
                assert!(
                    visible[first_null..]
                        .iter()
                        .all(|row| row.cell("aum").map(|cell| cell.is_null()).unwrap_or(true))
                );
            }
            browser.set_sort("aum");
        }
    }

    #[test]
    fn sort_toggle_alternates_direction_on_same_field() {
        let mut state = SortState::default();
        let mut expected = SortDirection::Asc;
        for _ in 0..5 {
            state = state.toggled("aum");
            assert_eq!(state.direction(), Some(expected));
            expected = expected.flipped();
        }

        let switched = state.toggled("name");
        assert_eq!(switched.field(), Some("name"));
        assert_eq!(switched.direction(), Some(SortDirection::Asc));
    }

    #[test]
    fn direction_is_absent_without_a_field() {
        assert_eq!(SortState::default().direction(), None);
    }

    #[test]
    fn sort_and_filter_commute() {
        let records = roster(50);
        let mut sort_first = browser(records.clone());
        sort_first.set_sort("aum");
        sort_first.set_filter("a");

        let mut filter_first = browser(records);
        filter_first.set_filter("a");
        filter_first.set_sort("aum");

        assert_eq!(ids(&sort_first.visible()), ids(&filter_first.visible()));
    }

    #[test]
    fn unknown_sort_field_keeps_insertion_order() {
        let records = roster(20);
        let mut browser = browser(records.clone());
        browser.set_sort("favorite_color");
        let expected = records.iter().collect::<Vec<_>>();
        assert_eq!(ids(&browser.visible()), ids(&expected));
        assert_eq!(browser.effective_sort(), None);
    }

    #[test]
    fn clear_sort_restores_insertion_order() {
        let records = roster(20);
        let mut browser = browser(records.clone());
        browser.set_sort("name");
        assert_eq!(browser.clear_sort(), vec![BrowserEvent::SortCleared]);
        let expected = records.iter().collect::<Vec<_>>();
        assert_eq!(ids(&browser.visible()), ids(&expected));
        assert!(browser.clear_sort().is_empty());
    }

    #[test]
    fn dates_sort_by_value() {
        let mut browser = browser(vec![
            record("A", &[("name", "a"), ("joined", "2024-10-01")]),
            record("B", &[("name", "b"), ("joined", "2024-09-30")]),
            record("C", &[("name", "c"), ("joined", "2023-12-31")]),
        ]);
        browser.set_sort("joined");
        assert_eq!(ids(&browser.visible()), vec!["C", "B", "A"]);
        browser.set_sort("joined");
        assert_eq!(ids(&browser.visible()), vec!["A", "B", "C"]);
    }

    #[test]
    fn empty_collection_reports_empty_state() {
        let browser = browser(Vec::new());
        assert_eq!(browser.empty_state(), Some(EmptyState::NoRecords));
        assert!(browser.visible().is_empty());
    }

    #[test]
    fn invoke_action_on_missing_record_reports_not_found_once() {
        let mut browser = browser(two_clients());
        browser.set_filter("a");
        browser.set_sort("aum");
        let before_state = browser.state().clone();
        let before_visible = ids(&browser.visible());

        let mut calls = Vec::new();
        let mut handler = |id: &str, label: &str| -> anyhow::Result<()> {
            calls.push((id.to_owned(), label.to_owned()));
            Ok(())
        };
        let result = browser.invoke_action("C404", "Delete", &mut handler);

        assert_eq!(
            result,
            Err(ActionError::RecordNotFound {
                record_id: "C404".to_owned()
            })
        );
        assert!(calls.is_empty());
        assert_eq!(browser.state(), &before_state);
        assert_eq!(ids(&browser.visible()), before_visible);
    }

    #[test]
    fn invoke_action_delegates_to_handler() {
        let browser = browser(two_clients());
        let mut calls = Vec::new();
        let mut handler = |id: &str, label: &str| -> anyhow::Result<()> {
            calls.push(format!("{label}:{id}"));
            Ok(())
        };

        let receipt = browser
            .invoke_action("C2", "delete", &mut handler)
            .expect("action should run");
        assert_eq!(receipt.record_id, "C2");
        assert!(receipt.action.destructive);
        assert_eq!(calls, vec!["Delete:C2".to_owned()]);
    }

    #[test]
    fn invoke_action_surfaces_unknown_labels_and_handler_errors() {
        let browser = browser(two_clients());
        let mut ok = |_: &str, _: &str| -> anyhow::Result<()> { Ok(()) };
        assert!(matches!(
            browser.invoke_action("C1", "Archive", &mut ok),
            Err(ActionError::UnknownAction { .. })
        ));

        let mut failing =
            |_: &str, _: &str| -> anyhow::Result<()> { Err(anyhow::anyhow!("store offline")) };
        let error = browser
            .invoke_action("C1", "View", &mut failing)
            .expect_err("handler failure should surface");
        assert!(error.to_string().contains("store offline"));
    }

    #[test]
    fn paging_slices_and_clamps() {
        let records = roster(23);
        let mut browser = RecordBrowser::with_config(
            SCHEMA,
            BrowserConfig::from_schema(&SCHEMA).with_page_size(10),
            records,
        );
        assert_eq!(browser.page_count(), 3);
        assert_eq!(browser.visible_page().len(), 10);

        browser.dispatch(BrowserCommand::SetPage(2));
        assert_eq!(browser.visible_page().len(), 3);

        let events = browser.dispatch(BrowserCommand::NextPage);
        assert!(events.is_empty());
        assert_eq!(browser.state().page, 2);

        browser.replace_records(roster(5));
        assert_eq!(browser.state().page, 0);
        assert_eq!(browser.visible_page().len(), 5);
    }

    #[test]
    fn filter_change_resets_page() {
        let mut state = BrowserState {
            page: 3,
            ..BrowserState::default()
        };
        let events = state.dispatch(BrowserCommand::SetFilter("ma".to_owned()));
        assert_eq!(
            events,
            vec![
                BrowserEvent::FilterChanged("ma".to_owned()),
                BrowserEvent::PageChanged(0)
            ]
        );
        assert_eq!(state.page, 0);
    }

    #[test]
    fn replace_records_keeps_sort_and_filter() {
        let mut browser = browser(two_clients());
        browser.set_filter("a");
        browser.set_sort("aum");
        browser.replace_records(vec![
            record("C3", &[("name", "Mana"), ("aum", "฿1k")]),
            record("C2", &[("name", "Zara"), ("aum", "2")]),
        ]);
        assert_eq!(ids(&browser.visible()), vec!["C2", "C3"]);
        let seen = browser
            .visible()
            .iter()
            .map(|row| row.record_id().to_owned())
            .collect::<BTreeSet<_>>();
        assert!(!seen.contains("C1"));
    }
}
