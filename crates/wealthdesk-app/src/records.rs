// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::schema::{Badge, BadgeTone, Cell, FieldSpec, Record, Schema};
use crate::values::format_time;
use crate::{
    Appointment, AppointmentKind, Client, ClientStatus, Plan, PlanStatus, Report, ReportStatus,
    RiskProfile, ServiceTier,
};

const CLIENT_STATUS_LABELS: &[&str] = &["active", "prospect", "inactive"];
const RISK_LABELS: &[&str] = &["conservative", "moderate", "balanced", "growth", "aggressive"];
const TIER_LABELS: &[&str] = &["basic", "premium", "private"];
const REPORT_KIND_LABELS: &[&str] = &["performance", "allocation", "tax", "compliance"];
const REPORT_STATUS_LABELS: &[&str] = &["ready", "processing", "failed"];
const PLAN_KIND_LABELS: &[&str] = &["retirement", "education", "estate", "investment"];
const PLAN_STATUS_LABELS: &[&str] = &["on_track", "at_risk", "off_track", "completed"];
const APPOINTMENT_KIND_LABELS: &[&str] = &["review", "onboarding", "call", "meeting"];

const CLIENT_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("id", "ID").not_searchable(),
    FieldSpec::text("name", "Client"),
    FieldSpec::text("email", "Email"),
    FieldSpec::text("advisor", "Advisor"),
    FieldSpec::money("aum", "AUM"),
    FieldSpec::category("risk", "Risk", RISK_LABELS),
    FieldSpec::category("status", "Status", CLIENT_STATUS_LABELS),
    FieldSpec::category("tier", "Tier", TIER_LABELS),
    FieldSpec::date("joined", "Joined"),
    FieldSpec::date("last_review", "Last review"),
];

const REPORT_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("id", "ID").not_searchable(),
    FieldSpec::text("title", "Report"),
    FieldSpec::category("kind", "Type", REPORT_KIND_LABELS),
    FieldSpec::text("client", "Client"),
    FieldSpec::text("period", "Period").not_sortable(),
    FieldSpec::date("generated", "Generated"),
    FieldSpec::category("status", "Status", REPORT_STATUS_LABELS),
    FieldSpec::number("size_kb", "Size (KB)"),
];

const PLAN_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("id", "ID").not_searchable(),
    FieldSpec::text("name", "Plan"),
    FieldSpec::text("client", "Client"),
    FieldSpec::category("kind", "Type", PLAN_KIND_LABELS),
    FieldSpec::money("target", "Target"),
    FieldSpec::money("current", "Current"),
    FieldSpec::number("progress", "Progress %"),
    FieldSpec::category("status", "Status", PLAN_STATUS_LABELS),
    FieldSpec::date("review", "Review"),
];

// `start` is HH:MM, so text order is time order.
const APPOINTMENT_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("id", "ID").not_searchable(),
    FieldSpec::text("title", "Appointment"),
    FieldSpec::text("client", "Client"),
    FieldSpec::date("date", "Date"),
    FieldSpec::text("start", "Start").not_searchable(),
    FieldSpec::number("duration", "Minutes"),
    FieldSpec::category("kind", "Type", APPOINTMENT_KIND_LABELS),
];

impl Client {
    pub const SCHEMA: Schema = Schema::new(CLIENT_FIELDS);
}

impl Report {
    pub const SCHEMA: Schema = Schema::new(REPORT_FIELDS);
}

impl Plan {
    pub const SCHEMA: Schema = Schema::new(PLAN_FIELDS);
}

impl Appointment {
    pub const SCHEMA: Schema = Schema::new(APPOINTMENT_FIELDS);
}

impl Record for Client {
    fn record_id(&self) -> &str {
        self.id.as_str()
    }

    fn cell(&self, field: &str) -> Option<Cell> {
        let cell = match field {
            "id" => Cell::Text(self.id.to_string()),
            "name" => Cell::Text(self.name.clone()),
            "email" => Cell::Text(self.email.clone()),
            "advisor" => Cell::Text(self.advisor.clone()),
            "aum" => Cell::Money(self.aum_minor),
            "risk" => Cell::Category(self.risk.as_str().to_owned()),
            "status" => Cell::Category(self.status.as_str().to_owned()),
            "tier" => Cell::Category(self.tier.as_str().to_owned()),
            "joined" => Cell::Date(Some(self.joined_on)),
            "last_review" => Cell::Date(self.last_review),
            _ => return None,
        };
        Some(cell)
    }

    fn badges(&self) -> Vec<Badge> {
        let status_tone = match self.status {
            ClientStatus::Active => BadgeTone::Positive,
            ClientStatus::Prospect => BadgeTone::Neutral,
            ClientStatus::Inactive => BadgeTone::Warning,
        };
        let tier_tone = match self.tier {
            ServiceTier::Private => BadgeTone::Positive,
            ServiceTier::Premium | ServiceTier::Basic => BadgeTone::Neutral,
        };
        let mut badges = vec![
            Badge::new(self.status.as_str(), status_tone),
            Badge::new(self.tier.as_str(), tier_tone),
        ];
        if self.risk == RiskProfile::Aggressive {
            badges.push(Badge::new("high risk", BadgeTone::Warning));
        }
        badges
    }
}

impl Record for Report {
    fn record_id(&self) -> &str {
        self.id.as_str()
    }

    fn cell(&self, field: &str) -> Option<Cell> {
        let cell = match field {
            "id" => Cell::Text(self.id.to_string()),
            "title" => Cell::Text(self.title.clone()),
            "kind" => Cell::Category(self.kind.as_str().to_owned()),
            "client" => Cell::Text(self.client_name.clone()),
            "period" => Cell::Text(self.period.clone()),
            "generated" => Cell::Date(Some(self.generated_on)),
            "status" => Cell::Category(self.status.as_str().to_owned()),
            "size_kb" => Cell::Number(self.size_bytes.map(|bytes| (bytes as f64 / 1024.0).round())),
            _ => return None,
        };
        Some(cell)
    }

    fn badges(&self) -> Vec<Badge> {
        let tone = match self.status {
            ReportStatus::Ready => BadgeTone::Positive,
            ReportStatus::Processing => BadgeTone::Neutral,
            ReportStatus::Failed => BadgeTone::Negative,
        };
        vec![Badge::new(self.status.as_str(), tone)]
    }
}

impl Record for Plan {
    fn record_id(&self) -> &str {
        self.id.as_str()
    }

    fn cell(&self, field: &str) -> Option<Cell> {
        let cell = match field {
            "id" => Cell::Text(self.id.to_string()),
            "name" => Cell::Text(self.name.clone()),
            "client" => Cell::Text(self.client_name.clone()),
            "kind" => Cell::Category(self.kind.as_str().to_owned()),
            "target" => Cell::Money(self.target_minor),
            "current" => Cell::Money(self.current_minor),
            "progress" => Cell::Number(self.progress_percent().map(|pct| pct.round())),
            "status" => Cell::Category(self.status.as_str().to_owned()),
            "review" => Cell::Date(self.review_on),
            _ => return None,
        };
        Some(cell)
    }

    fn badges(&self) -> Vec<Badge> {
        let tone = match self.status {
            PlanStatus::OnTrack | PlanStatus::Completed => BadgeTone::Positive,
            PlanStatus::AtRisk => BadgeTone::Warning,
            PlanStatus::OffTrack => BadgeTone::Negative,
        };
        vec![Badge::new(self.status.as_str(), tone)]
    }
}

impl Record for Appointment {
    fn record_id(&self) -> &str {
        self.id.as_str()
    }

    fn cell(&self, field: &str) -> Option<Cell> {
        let cell = match field {
            "id" => Cell::Text(self.id.to_string()),
            "title" => Cell::Text(self.title.clone()),
            "client" => Cell::Text(self.client_name.clone()),
            "date" => Cell::Date(Some(self.date)),
            "start" => Cell::Text(format_time(self.start)),
            "duration" => Cell::Number(Some(f64::from(self.duration_minutes))),
            "kind" => Cell::Category(self.kind.as_str().to_owned()),
            _ => return None,
        };
        Some(cell)
    }

    fn badges(&self) -> Vec<Badge> {
        let tone = match self.kind {
            AppointmentKind::Onboarding => BadgeTone::Positive,
            AppointmentKind::Review | AppointmentKind::Call | AppointmentKind::Meeting => {
                BadgeTone::Neutral
            }
        };
        vec![Badge::new(self.kind.as_str(), tone)]
    }
}

#[cfg(test)]
mod tests {
    use crate::schema::{Cell, Record};
    use crate::{
        Client, ClientId, ClientStatus, Plan, PlanId, PlanKind, PlanStatus, Report, ReportId,
        ReportKind, ReportStatus, RiskProfile, ServiceTier,
    };
    use time::{Date, Month};

    fn sample_client() -> Client {
        Client {
            id: ClientId::from("C1"),
            name: "Aaron Wattana".to_owned(),
            email: "aaron@example.com".to_owned(),
            phone: String::new(),
            advisor: "Nok".to_owned(),
            aum_minor: Some(450_000_000),
            risk: RiskProfile::Aggressive,
            status: ClientStatus::Active,
            tier: ServiceTier::Private,
            joined_on: Date::from_calendar_date(2021, Month::March, 4).expect("valid date"),
            last_review: None,
        }
    }

    #[test]
    fn every_schema_field_resolves_to_a_cell() {
        let client = sample_client();
        for spec in Client::SCHEMA.fields() {
            assert!(client.cell(spec.name).is_some(), "client field {}", spec.name);
        }

        let report = Report {
            id: ReportId::from("R1"),
            title: "Q1 performance".to_owned(),
            kind: ReportKind::Performance,
            client_name: "Aaron Wattana".to_owned(),
            period: "Q1 2026".to_owned(),
            generated_on: Date::from_calendar_date(2026, Month::April, 2).expect("valid date"),
            status: ReportStatus::Ready,
            size_bytes: Some(2048),
        };
        for spec in Report::SCHEMA.fields() {
            assert!(report.cell(spec.name).is_some(), "report field {}", spec.name);
        }
        assert_eq!(report.cell("size_kb"), Some(Cell::Number(Some(2.0))));

        let plan = Plan {
            id: PlanId::from("P1"),
            name: "Retire at 55".to_owned(),
            client_name: "Aaron Wattana".to_owned(),
            kind: PlanKind::Retirement,
            target_minor: Some(1_000_000),
            current_minor: Some(333_333),
            status: PlanStatus::AtRisk,
            review_on: None,
        };
        for spec in Plan::SCHEMA.fields() {
            assert!(plan.cell(spec.name).is_some(), "plan field {}", spec.name);
        }
        assert_eq!(plan.cell("progress"), Some(Cell::Number(Some(33.0))));
        assert_eq!(plan.cell("review"), Some(Cell::Date(None)));
    }

    #[test]
    fn client_badges_reflect_status_tier_and_risk() {
        let labels = sample_client()
            .badges()
            .into_iter()
            .map(|badge| badge.label)
            .collect::<Vec<_>>();
        assert_eq!(labels, vec!["active", "private", "high risk"]);
    }

    #[test]
    fn id_is_not_searchable_but_name_is() {
        let searchable = Client::SCHEMA.searchable_fields();
        assert!(!searchable.contains(&"id"));
        assert!(searchable.contains(&"name"));
        assert!(!Report::SCHEMA.sortable_fields().contains(&"period"));
    }
}
