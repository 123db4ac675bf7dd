// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use time::Date;

use crate::values::{
    ValueError, format_compact_money, format_date, parse_optional_date, parse_optional_money,
    parse_optional_number,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Money,
    Number,
    Date,
    Category(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub searchable: bool,
    pub sortable: bool,
}

impl FieldSpec {
    pub const fn text(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Text,
            searchable: true,
            sortable: true,
        }
    }

    pub const fn money(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Money,
            searchable: false,
            sortable: true,
        }
    }

    pub const fn number(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Number,
            searchable: false,
            sortable: true,
        }
    }

    pub const fn date(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Date,
            searchable: false,
            sortable: true,
        }
    }

    pub const fn category(
        name: &'static str,
        label: &'static str,
        values: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Category(values),
            searchable: true,
            sortable: true,
        }
    }

    pub const fn not_searchable(self) -> Self {
        Self {
            searchable: false,
            ..self
        }
    }

    pub const fn not_sortable(self) -> Self {
        Self {
            sortable: false,
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    fields: &'static [FieldSpec],
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("record is missing an id")]
    MissingId,
    #[error("record {id}: unknown field `{field}`")]
    UnknownField { id: String, field: String },
    #[error("record {id}: field `{field}` is required")]
    MissingField { id: String, field: &'static str },
    #[error("record {id}: field `{field}` value {value:?} is invalid ({reason})")]
    InvalidValue {
        id: String,
        field: &'static str,
        value: String,
        reason: String,
    },
    #[error("duplicate record id {0}")]
    DuplicateId(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawRecord {
    pub id: String,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl RawRecord {
    pub fn new<I, K, V>(id: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            id: id.into(),
            fields: fields
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
            tags: Vec::new(),
        }
    }
}

impl Schema {
    pub const fn new(fields: &'static [FieldSpec]) -> Self {
        Self { fields }
    }

    pub const fn fields(&self) -> &'static [FieldSpec] {
        self.fields
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|spec| spec.name == name)
    }

    pub fn searchable_fields(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|spec| spec.searchable)
            .map(|spec| spec.name)
            .collect()
    }

    pub fn sortable_fields(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|spec| spec.sortable)
            .map(|spec| spec.name)
            .collect()
    }

    pub fn bind(&self, raw: RawRecord) -> Result<DynamicRecord, SchemaError> {
        let id = raw.id.trim().to_owned();
        if id.is_empty() {
            return Err(SchemaError::MissingId);
        }

        if let Some(unknown) = raw.fields.keys().find(|name| self.field(name).is_none()) {
            return Err(SchemaError::UnknownField {
                id,
                field: unknown.clone(),
            });
        }

        let mut cells = BTreeMap::new();
        for spec in self.fields {
            let value = raw.fields.get(spec.name).map(String::as_str);
            let cell = bind_cell(&id, spec, value)?;
            cells.insert(spec.name, cell);
        }

        Ok(DynamicRecord {
            id,
            cells,
            tags: raw.tags,
        })
    }

    pub fn bind_all<I>(&self, rows: I) -> Result<Vec<DynamicRecord>, SchemaError>
    where
        I: IntoIterator<Item = RawRecord>,
    {
        let mut seen = BTreeSet::new();
        let mut records = Vec::new();
        for raw in rows {
            let record = self.bind(raw)?;
            if !seen.insert(record.id.clone()) {
                return Err(SchemaError::DuplicateId(record.id));
            }
            records.push(record);
        }
        Ok(records)
    }
}

fn bind_cell(id: &str, spec: &'static FieldSpec, value: Option<&str>) -> Result<Cell, SchemaError> {
    let invalid = |raw: &str, error: ValueError| SchemaError::InvalidValue {
        id: id.to_owned(),
        field: spec.name,
        value: raw.to_owned(),
        reason: error.to_string(),
    };
    let raw = value.unwrap_or("");

    match spec.kind {
        FieldKind::Text => Ok(Cell::Text(raw.trim().to_owned())),
        FieldKind::Money => parse_optional_money(raw)
            .map(Cell::Money)
            .map_err(|error| invalid(raw, error)),
        FieldKind::Number => parse_optional_number(raw)
            .map(Cell::Number)
            .map_err(|error| invalid(raw, error)),
        FieldKind::Date => parse_optional_date(raw)
            .map(Cell::Date)
            .map_err(|error| invalid(raw, error)),
        FieldKind::Category(allowed) => {
            let label = raw.trim();
            if label.is_empty() {
                return Err(SchemaError::MissingField {
                    id: id.to_owned(),
                    field: spec.name,
                });
            }
            if allowed.is_empty() {
                return Ok(Cell::Category(label.to_owned()));
            }
            allowed
                .iter()
                .find(|candidate| candidate.eq_ignore_ascii_case(label))
                .map(|candidate| Cell::Category((*candidate).to_owned()))
                .ok_or_else(|| SchemaError::InvalidValue {
                    id: id.to_owned(),
                    field: spec.name,
                    value: label.to_owned(),
                    reason: format!("expected one of: {}", allowed.join(", ")),
                })
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Money(Option<i64>),
    Number(Option<f64>),
    Date(Option<Date>),
    Category(String),
}

impl Cell {
    pub fn display(&self, currency_symbol: &str) -> String {
        match self {
            Self::Text(value) | Self::Category(value) => value.clone(),
            Self::Money(Some(minor)) => format_compact_money(*minor, currency_symbol),
            Self::Number(Some(value)) => format_number(*value),
            Self::Date(value) => format_date(*value),
            Self::Money(None) | Self::Number(None) => String::new(),
        }
    }

    pub fn search_text(&self) -> String {
        match self {
            Self::Money(Some(minor)) => format_number(*minor as f64 / 100.0),
            other => other.display(""),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Money(None) | Self::Number(None) | Self::Date(None))
    }

    // Text and categories compare case-insensitively by code point, with no locale
    // collation.
    pub fn cmp_value(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Money(left), Self::Money(right)) => left.cmp(right),
            (Self::Number(left), Self::Number(right)) => match (left, right) {
                (Some(left), Some(right)) => left.total_cmp(right),
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            (Self::Date(left), Self::Date(right)) => left.cmp(right),
            (Self::Text(left), Self::Text(right))
            | (Self::Category(left), Self::Category(right)) => {
                left.to_lowercase().cmp(&right.to_lowercase())
            }
            _ => self.search_text().cmp(&other.search_text()),
        }
    }
}

fn format_number(value: f64) -> String {
    if value.fract().abs() < f64::EPSILON {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    Positive,
    Neutral,
    Warning,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub label: String,
    pub tone: BadgeTone,
}

impl Badge {
    pub fn new(label: impl Into<String>, tone: BadgeTone) -> Self {
        Self {
            label: label.into(),
            tone,
        }
    }
}

pub trait Record {
    fn record_id(&self) -> &str;

    fn cell(&self, field: &str) -> Option<Cell>;

    fn badges(&self) -> Vec<Badge> {
        Vec::new()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DynamicRecord {
    id: String,
    cells: BTreeMap<&'static str, Cell>,
    tags: Vec<String>,
}

impl DynamicRecord {
    pub fn tags(&self) -> &[String] {
        &self.tags
    }
}

impl Record for DynamicRecord {
    fn record_id(&self) -> &str {
        &self.id
    }

    fn cell(&self, field: &str) -> Option<Cell> {
        self.cells.get(field).cloned()
    }

    fn badges(&self) -> Vec<Badge> {
        self.tags
            .iter()
            .map(|tag| Badge::new(tag.clone(), BadgeTone::Neutral))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{Cell, FieldSpec, RawRecord, Record, Schema, SchemaError};
    use std::cmp::Ordering;

    const STATUSES: &[&str] = &["active", "prospect"];
    const FIELDS: &[FieldSpec] = &[
        FieldSpec::text("name", "Name"),
        FieldSpec::money("aum", "AUM"),
        FieldSpec::date("joined", "Joined"),
        FieldSpec::number("score", "Score"),
        FieldSpec::category("status", "Status", STATUSES),
    ];
    const SCHEMA: Schema = Schema::new(FIELDS);

    fn raw(id: &str, fields: &[(&str, &str)]) -> RawRecord {
        RawRecord::new(id, fields.iter().copied())
    }

    #[test]
    fn bind_types_every_field() {
        let record = SCHEMA
            .bind(raw(
                "C1",
                &[
                    ("name", " Aaron "),
                    ("aum", "฿4.5M"),
                    ("joined", "2024-02-01"),
                    ("status", "Active"),
                ],
            ))
            .expect("bind record");

        assert_eq!(record.record_id(), "C1");
        assert_eq!(record.cell("name"), Some(Cell::Text("Aaron".to_owned())));
        assert_eq!(record.cell("aum"), Some(Cell::Money(Some(450_000_000))));
        assert_eq!(record.cell("score"), Some(Cell::Number(None)));
        assert_eq!(
            record.cell("status"),
            Some(Cell::Category("active".to_owned()))
        );
        assert_eq!(record.cell("missing"), None);
    }

    #[test]
    fn bind_rejects_unknown_fields_and_bad_values() {
        let unknown = SCHEMA
            .bind(raw("C1", &[("status", "active"), ("nickname", "A")]))
            .expect_err("unknown field should fail");
        assert!(matches!(unknown, SchemaError::UnknownField { .. }));

        let bad_money = SCHEMA
            .bind(raw("C1", &[("status", "active"), ("aum", "lots")]))
            .expect_err("bad money should fail");
        assert!(bad_money.to_string().contains("aum"));

        let bad_category = SCHEMA
            .bind(raw("C1", &[("status", "archived")]))
            .expect_err("bad category should fail");
        assert!(bad_category.to_string().contains("active, prospect"));

        let missing_category = SCHEMA
            .bind(raw("C1", &[]))
            .expect_err("missing category should fail");
        assert!(matches!(missing_category, SchemaError::MissingField { .. }));
    }

    #[test]
    fn bind_requires_an_id() {
        let error = SCHEMA
            .bind(raw("  ", &[("status", "active")]))
            .expect_err("blank id should fail");
        assert_eq!(error, SchemaError::MissingId);
    }

    #[test]
    fn bind_all_rejects_duplicate_ids() {
        let rows = vec![
            raw("C1", &[("status", "active")]),
            raw("C1", &[("status", "prospect")]),
        ];
        let error = SCHEMA.bind_all(rows).expect_err("duplicate should fail");
        assert_eq!(error, SchemaError::DuplicateId("C1".to_owned()));
    }

    #[test]
    fn schema_reports_searchable_and_sortable_fields() {
        assert_eq!(SCHEMA.searchable_fields(), vec!["name", "status"]);
        assert_eq!(
            SCHEMA.sortable_fields(),
            vec!["name", "aum", "joined", "score", "status"]
        );
    }

    #[test]
    fn money_cells_compare_numerically() {
        let ten = Cell::Money(Some(1_000));
        let two = Cell::Money(Some(200));
        assert_eq!(two.cmp_value(&ten), Ordering::Less);
        assert_eq!(ten.display("฿"), "฿10.00");
        assert_eq!(ten.search_text(), "10");
    }

    #[test]
    fn text_cells_compare_case_insensitively() {
        let lower = Cell::Text("aaron".to_owned());
        let upper = Cell::Text("Zara".to_owned());
        assert_eq!(lower.cmp_value(&upper), Ordering::Less);
        assert_eq!(
            Cell::Text("Abc".to_owned()).cmp_value(&Cell::Text("abc".to_owned())),
            Ordering::Equal
        );
        assert_eq!(
            Cell::Category("B".to_owned()).cmp_value(&Cell::Category("a".to_owned())),
            Ordering::Greater
        );

        let mut labels = ["b", "B", "a"].map(|label| Cell::Text(label.to_owned()));
        labels.sort_by(Cell::cmp_value);
        let sorted = labels.map(|cell| cell.display(""));
        assert_eq!(sorted, ["a", "b", "B"]);
    }
}
