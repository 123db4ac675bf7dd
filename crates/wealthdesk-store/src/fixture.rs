// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use time::Date;
use tracing::{debug, warn};
use wealthdesk_app::{
    AccountSettings, Appointment, AppointmentId, AppointmentKind, Cell, Client, ClientId,
    ClientStatus, DynamicRecord, Plan, PlanId, PlanKind, PlanStatus, RawRecord, Record, Report,
    ReportId, ReportKind, ReportStatus, RiskProfile, Schema, SchemaError, ServiceTier,
    parse_time,
};

type JsonRow = BTreeMap<String, Value>;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FixtureDocument {
    #[serde(default)]
    clients: Vec<JsonRow>,
    #[serde(default)]
    reports: Vec<JsonRow>,
    #[serde(default)]
    plans: Vec<JsonRow>,
    #[serde(default)]
    appointments: Vec<JsonRow>,
    #[serde(default)]
    settings: Option<AccountSettings>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FixtureData {
    pub clients: Vec<Client>,
    pub reports: Vec<Report>,
    pub plans: Vec<Plan>,
    pub appointments: Vec<Appointment>,
    pub settings: Option<AccountSettings>,
}

pub fn parse_fixture(json: &str) -> Result<FixtureData> {
    let document: FixtureDocument =
        serde_json::from_str(json).context("fixture is not valid JSON of the expected shape")?;

    let clients = bind_section("clients", Client::SCHEMA, document.clients, &["phone"])?
        .into_iter()
        .map(|(record, extras)| client_from_record(&record, extras))
        .collect::<Result<Vec<_>, _>>()
        .inspect_err(|error| warn!(section = "clients", %error, "fixture rows rejected"))
        .context("clients section")?;
    let reports = bind_section("reports", Report::SCHEMA, document.reports, &[])?
        .into_iter()
        .map(|(record, _)| report_from_record(&record))
        .collect::<Result<Vec<_>, _>>()
        .inspect_err(|error| warn!(section = "reports", %error, "fixture rows rejected"))
        .context("reports section")?;
    let plans = bind_section("plans", Plan::SCHEMA, document.plans, &[])?
        .into_iter()
        .map(|(record, _)| plan_from_record(&record))
        .collect::<Result<Vec<_>, _>>()
        .inspect_err(|error| warn!(section = "plans", %error, "fixture rows rejected"))
        .context("plans section")?;
    let appointments = bind_section("appointments", Appointment::SCHEMA, document.appointments, &[])?
        .into_iter()
        .map(|(record, _)| appointment_from_record(&record))
        .collect::<Result<Vec<_>, _>>()
        .inspect_err(|error| warn!(section = "appointments", %error, "fixture rows rejected"))
        .context("appointments section")?;

    debug!(
        clients = clients.len(),
        reports = reports.len(),
        plans = plans.len(),
        appointments = appointments.len(),
        "fixture parsed"
    );
    Ok(FixtureData {
        clients,
        reports,
        plans,
        appointments,
        settings: document.settings,
    })
}

fn bind_section(
    section: &'static str,
    schema: Schema,
    rows: Vec<JsonRow>,
    side_columns: &[&str],
) -> Result<Vec<(DynamicRecord, BTreeMap<String, String>)>> {
    let mut raws = Vec::with_capacity(rows.len());
    let mut extras = Vec::with_capacity(rows.len());
    for (index, row) in rows.into_iter().enumerate() {
        let mut fields = BTreeMap::new();
        let mut side = BTreeMap::new();
        let mut id = String::new();
        for (key, value) in row {
            let text = scalar_text(&value).with_context(|| {
                format!("{section} row {}: field `{key}` must be a string or number", index + 1)
            })?;
            if key == "id" {
                id = text;
            } else if side_columns.iter().any(|column| *column == key) {
                side.insert(key, text);
            } else {
                fields.insert(key, text);
            }
        }
        raws.push(RawRecord {
            id,
            fields,
            tags: Vec::new(),
        });
        extras.push(side);
    }

    let records = schema
        .bind_all(raws)
        .inspect_err(|error| warn!(section, %error, "fixture rows rejected"))
        .with_context(|| format!("{section} section"))?;
    Ok(records.into_iter().zip(extras).collect())
}

fn scalar_text(value: &Value) -> Result<String> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        Value::Null => Ok(String::new()),
        Value::Array(_) | Value::Object(_) => bail!("nested values are not supported"),
    }
}

fn text(record: &DynamicRecord, field: &'static str) -> String {
    match record.cell(field) {
        Some(Cell::Text(value) | Cell::Category(value)) => value,
        _ => String::new(),
    }
}

fn required_text(record: &DynamicRecord, field: &'static str) -> Result<String, SchemaError> {
    let value = text(record, field);
    if value.is_empty() {
        return Err(missing(record, field));
    }
    Ok(value)
}

fn money(record: &DynamicRecord, field: &'static str) -> Option<i64> {
    match record.cell(field) {
        Some(Cell::Money(value)) => value,
        _ => None,
    }
}

fn number(record: &DynamicRecord, field: &'static str) -> Option<f64> {
    match record.cell(field) {
        Some(Cell::Number(value)) => value,
        _ => None,
    }
}

fn date(record: &DynamicRecord, field: &'static str) -> Option<Date> {
    match record.cell(field) {
        Some(Cell::Date(value)) => value,
        _ => None,
    }
}

fn required_date(record: &DynamicRecord, field: &'static str) -> Result<Date, SchemaError> {
    date(record, field).ok_or_else(|| missing(record, field))
}

fn label<T>(
    record: &DynamicRecord,
    field: &'static str,
    parse: fn(&str) -> Option<T>,
) -> Result<T, SchemaError> {
    let value = required_text(record, field)?;
    parse(&value).ok_or_else(|| invalid(record, field, &value, "unknown label".to_owned()))
}

fn missing(record: &DynamicRecord, field: &'static str) -> SchemaError {
    SchemaError::MissingField {
        id: record.record_id().to_owned(),
        field,
    }
}

fn invalid(record: &DynamicRecord, field: &'static str, value: &str, reason: String) -> SchemaError {
    SchemaError::InvalidValue {
        id: record.record_id().to_owned(),
        field,
        value: value.to_owned(),
        reason,
    }
}

fn client_from_record(
    record: &DynamicRecord,
    mut extras: BTreeMap<String, String>,
) -> Result<Client, SchemaError> {
    Ok(Client {
        id: ClientId::new(record.record_id()),
        name: required_text(record, "name")?,
        email: text(record, "email"),
        phone: extras.remove("phone").unwrap_or_default().trim().to_owned(),
        advisor: text(record, "advisor"),
        aum_minor: money(record, "aum"),
        risk: label(record, "risk", RiskProfile::parse)?,
        status: label(record, "status", ClientStatus::parse)?,
        tier: label(record, "tier", ServiceTier::parse)?,
        joined_on: required_date(record, "joined")?,
        last_review: date(record, "last_review"),
    })
}

fn report_from_record(record: &DynamicRecord) -> Result<Report, SchemaError> {
    Ok(Report {
        id: ReportId::new(record.record_id()),
        title: required_text(record, "title")?,
        kind: label(record, "kind", ReportKind::parse)?,
        client_name: text(record, "client"),
        period: text(record, "period"),
        generated_on: required_date(record, "generated")?,
        status: label(record, "status", ReportStatus::parse)?,
        size_bytes: size_bytes(record)?,
    })
}

fn size_bytes(record: &DynamicRecord) -> Result<Option<i64>, SchemaError> {
    let Some(kb) = number(record, "size_kb") else {
        return Ok(None);
    };
    let bytes = (kb * 1024.0).round();
    if !bytes.is_finite() || bytes < 0.0 || bytes >= i64::MAX as f64 {
        return Err(invalid(
            record,
            "size_kb",
            &kb.to_string(),
            "expected a non-negative size".to_owned(),
        ));
    }
    Ok(Some(bytes as i64))
}

// `progress` is derived from target and current; an imported value is ignored.
fn plan_from_record(record: &DynamicRecord) -> Result<Plan, SchemaError> {
    Ok(Plan {
        id: PlanId::new(record.record_id()),
        name: required_text(record, "name")?,
        client_name: text(record, "client"),
        kind: label(record, "kind", PlanKind::parse)?,
        target_minor: money(record, "target"),
        current_minor: money(record, "current"),
        status: label(record, "status", PlanStatus::parse)?,
        review_on: date(record, "review"),
    })
}

fn appointment_from_record(record: &DynamicRecord) -> Result<Appointment, SchemaError> {
    let start_text = required_text(record, "start")?;
    let start = parse_time(&start_text)
        .map_err(|error| invalid(record, "start", &start_text, error.to_string()))?;
    let minutes = number(record, "duration").ok_or_else(|| missing(record, "duration"))?;
    if minutes.fract() != 0.0 || !(1.0..=f64::from(u16::MAX)).contains(&minutes) {
        return Err(invalid(
            record,
            "duration",
            &minutes.to_string(),
            "expected whole minutes".to_owned(),
        ));
    }

    Ok(Appointment {
        id: AppointmentId::new(record.record_id()),
        title: required_text(record, "title")?,
        client_name: required_text(record, "client")?,
        date: required_date(record, "date")?,
        start,
        duration_minutes: minutes as u16,
        kind: label(record, "kind", AppointmentKind::parse)?,
    })
}

#[cfg(test)]
mod tests {
    use super::parse_fixture;
    use wealthdesk_app::{ClientStatus, RiskProfile};

    #[test]
    fn parses_display_strings() {
        let data = parse_fixture(
            r#"{
                "clients": [
                    {"id": "C1", "name": "Aaron", "aum": "฿10", "risk": "Growth",
                     "status": "active", "tier": "basic", "joined": "2024-01-02",
                     "phone": "+66 81 000 0000"},
                    {"id": "C2", "name": "Zara", "aum": "฿4.5M", "risk": "conservative",
                     "status": "prospect", "tier": "private", "joined": "2023-05-06"}
                ],
                "appointments": [
                    {"id": "A1", "title": "Review", "client": "Zara", "date": "2026-10-20",
                     "start": "09:30", "duration": 45, "kind": "review"}
                ]
            }"#,
        )
        .expect("fixture should parse");

        assert_eq!(data.clients.len(), 2);
        assert_eq!(data.clients[0].aum_minor, Some(1_000));
        assert_eq!(data.clients[0].phone, "+66 81 000 0000");
        assert_eq!(data.clients[0].risk, RiskProfile::Growth);
        assert_eq!(data.clients[1].aum_minor, Some(450_000_000));
        assert_eq!(data.clients[1].status, ClientStatus::Prospect);
        assert_eq!(data.appointments[0].duration_minutes, 45);
        assert!(data.reports.is_empty());
        assert!(data.settings.is_none());
    }

    #[test]
    fn rejects_unknown_sections_and_columns() {
        let section = parse_fixture(r#"{"vendors": []}"#).expect_err("unknown section");
        assert!(format!("{section:#}").contains("vendors"));

        let column = parse_fixture(
            r#"{"clients": [{"id": "C1", "name": "A", "risk": "growth", "status": "active",
                "tier": "basic", "joined": "2024-01-01", "nickname": "ace"}]}"#,
        )
        .expect_err("unknown column");
        let message = format!("{column:#}");
        assert!(message.contains("clients section"), "{message}");
        assert!(message.contains("nickname"), "{message}");
    }

    #[test]
    fn rejects_bad_values_with_row_context() {
        let bad_money = parse_fixture(
            r#"{"clients": [{"id": "C9", "name": "A", "aum": "lots", "risk": "growth",
                "status": "active", "tier": "basic", "joined": "2024-01-01"}]}"#,
        )
        .expect_err("bad money");
        let message = format!("{bad_money:#}");
        assert!(message.contains("C9"), "{message}");
        assert!(message.contains("aum"), "{message}");

        let missing_join = parse_fixture(
            r#"{"clients": [{"id": "C9", "name": "A", "risk": "growth",
                "status": "active", "tier": "basic"}]}"#,
        )
        .expect_err("missing joined date");
        assert!(format!("{missing_join:#}").contains("joined"));

        let bad_time = parse_fixture(
            r#"{"appointments": [{"id": "A1", "title": "Call", "client": "Zara",
                "date": "2026-10-20", "start": "9am", "duration": 30, "kind": "call"}]}"#,
        )
        .expect_err("bad start time");
        assert!(format!("{bad_time:#}").contains("start"));

        let nested = parse_fixture(r#"{"plans": [{"id": "P1", "name": ["x"]}]}"#)
            .expect_err("nested value");
        assert!(format!("{nested:#}").contains("plans row 1"));

        for size in ["-5", "1e300"] {
            let bad_size = parse_fixture(&format!(
                r#"{{"reports": [{{"id": "R7", "title": "Q3", "kind": "tax",
                    "generated": "2026-07-01", "status": "ready", "size_kb": {size}}}]}}"#
            ))
            .expect_err("bad report size");
            let message = format!("{bad_size:#}");
            assert!(message.contains("R7"), "{message}");
            assert!(message.contains("non-negative size"), "{message}");
        }

        let sized = parse_fixture(
            r#"{"reports": [{"id": "R8", "title": "Q4", "kind": "tax",
                "generated": "2026-10-01", "status": "ready", "size_kb": 2}]}"#,
        )
        .expect("valid report size");
        assert_eq!(sized.reports[0].size_bytes, Some(2048));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let error = parse_fixture(
            r#"{"reports": [
                {"id": "R1", "title": "Q1", "kind": "tax", "generated": "2026-01-01", "status": "ready"},
                {"id": "R1", "title": "Q2", "kind": "tax", "generated": "2026-04-01", "status": "ready"}
            ]}"#,
        )
        .expect_err("duplicate id");
        assert!(format!("{error:#}").contains("duplicate record id R1"));
    }

    #[test]
    fn settings_block_fills_defaults() {
        let data = parse_fixture(r#"{"settings": {"display_name": "Nok", "currency_symbol": "$"}}"#)
            .expect("settings fixture");
        let settings = data.settings.expect("settings present");
        assert_eq!(settings.display_name, "Nok");
        assert_eq!(settings.currency_symbol, "$");
        assert_eq!(settings.time_zone, "Asia/Bangkok");
    }
}
