// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use serde_json::{Map, Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use time::macros::date;
use time::{Date, Duration, Time};
use wealthdesk_app::{
    Appointment, AppointmentId, AppointmentKind, Client, ClientId, ClientStatus, Plan, PlanId,
    PlanKind, PlanStatus, Report, ReportId, ReportKind, ReportStatus, RiskProfile, ServiceTier,
    format_compact_money, format_date, format_money, format_time,
};

const FIRST_NAMES: [&str; 16] = [
    "Somchai", "Malee", "Anan", "Kanya", "Niran", "Pim", "Arthit", "Siriporn", "Thanawat", "Ploy",
    "Krit", "Nok", "Wichai", "Dao", "Preecha", "Suda",
];
const LAST_NAMES: [&str; 12] = [
    "Srisuk",
    "Wattana",
    "Chaiyo",
    "Boonmee",
    "Thongchai",
    "Rattanakorn",
    "Sukjai",
    "Phromma",
    "Kaewmanee",
    "Saelim",
    "Jaidee",
    "Intharasuk",
];
const ADVISORS: [&str; 4] = [
    "Nok Srisuk",
    "Arthit Boonmee",
    "Ploy Kaewmanee",
    "Krit Saelim",
];
const PLAN_GOALS: [&str; 8] = [
    "Retire at 55",
    "University fund",
    "Condo down payment",
    "Legacy trust",
    "Income ladder",
    "Sabbatical year",
    "Family office",
    "Healthcare reserve",
];
const APPOINTMENT_MINUTES: [u16; 4] = [30, 45, 60, 90];

pub const REFERENCE_TODAY: Date = date!(2026 - 10 - 19);

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Roster {
    pub clients: Vec<Client>,
    pub reports: Vec<Report>,
    pub plans: Vec<Plan>,
    pub appointments: Vec<Appointment>,
}

#[derive(Debug, Clone)]
pub struct AdvisoryFaker {
    rng: DeterministicRng,
}

impl AdvisoryFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
        }
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn client(&mut self, index: usize, today: Date) -> Client {
        let first = self.pick(&FIRST_NAMES);
        let last = self.pick(&LAST_NAMES);
        let joined_on = today - Duration::days(self.int_range_i64(30, 3_650));
        let last_review = self
            .rng
            .bool()
            .then(|| today - Duration::days(self.int_range_i64(1, 360)));
        // Whole hundred-thousands below one billion survive compact formatting.
        let aum_minor = (self.int_n(10) != 0).then(|| self.int_range_i64(1, 2_000) * 10_000_000);

        Client {
            id: ClientId::new(format!("C{index:03}")),
            name: format!("{first} {last}"),
            email: format!(
                "{}.{}@example.co.th",
                first.to_ascii_lowercase(),
                last.to_ascii_lowercase()
            ),
            phone: format!(
                "+66 8{} {:03} {:04}",
                self.int_n(10),
                self.int_n(1_000),
                self.int_n(10_000)
            ),
            advisor: self.pick(&ADVISORS).to_owned(),
            aum_minor,
            risk: self.pick_from(RiskProfile::ALL),
            status: self.pick_from(ClientStatus::ALL),
            tier: self.pick_from(ServiceTier::ALL),
            joined_on,
            last_review,
        }
    }

    pub fn report(&mut self, index: usize, client_name: &str, today: Date) -> Report {
        let kind = self.pick_from(ReportKind::ALL);
        let quarter = self.int_range_i64(1, 4);
        let year = today.year() - self.int_n(2) as i32;
        let status = self.pick_from(ReportStatus::ALL);
        let size_bytes = (status == ReportStatus::Ready).then(|| self.int_range_i64(40, 4_000) * 1024);
        Report {
            id: ReportId::new(format!("R{index:03}")),
            title: format!("{} review", capitalize(kind.as_str())),
            kind,
            client_name: client_name.to_owned(),
            period: format!("Q{quarter} {year}"),
            generated_on: today - Duration::days(self.int_range_i64(0, 400)),
            status,
            size_bytes,
        }
    }

    pub fn plan(&mut self, index: usize, client_name: &str, today: Date) -> Plan {
        let target = self.int_range_i64(5, 500) * 10_000_000;
        let current = target / 100 * self.int_range_i64(0, 120);
        Plan {
            id: PlanId::new(format!("P{index:03}")),
            name: self.pick(&PLAN_GOALS).to_owned(),
            client_name: client_name.to_owned(),
            kind: self.pick_from(PlanKind::ALL),
            target_minor: Some(target),
            current_minor: Some(current),
            status: self.pick_from(PlanStatus::ALL),
            review_on: self
                .rng
                .bool()
                .then(|| today + Duration::days(self.int_range_i64(1, 180))),
        }
    }

    pub fn appointment(&mut self, index: usize, client_name: &str, today: Date) -> Appointment {
        let kind = self.pick_from(AppointmentKind::ALL);
        let title = match kind {
            AppointmentKind::Review => "Portfolio review",
            AppointmentKind::Onboarding => "Onboarding session",
            AppointmentKind::Call => "Check-in call",
            AppointmentKind::Meeting => "Planning meeting",
        };
        let hour = self.int_range_i64(9, 16) as u8;
        let minute = if self.rng.bool() { 30 } else { 0 };
        Appointment {
            id: AppointmentId::new(format!("A{index:03}")),
            title: title.to_owned(),
            client_name: client_name.to_owned(),
            date: today + Duration::days(self.int_range_i64(-10, 30)),
            start: Time::from_hms(hour, minute, 0).expect("valid appointment time"),
            duration_minutes: APPOINTMENT_MINUTES[self.int_n(APPOINTMENT_MINUTES.len())],
            kind,
        }
    }

    pub fn roster(&mut self, clients: usize, today: Date) -> Roster {
        let mut roster = Roster::default();
        for index in 1..=clients {
            roster.clients.push(self.client(index, today));
        }
        let names = roster
            .clients
            .iter()
            .map(|client| client.name.clone())
            .collect::<Vec<_>>();
        if names.is_empty() {
            return roster;
        }
        for index in 1..=clients {
            let name = names[self.int_n(names.len())].clone();
            roster.reports.push(self.report(index, &name, today));
            let name = names[self.int_n(names.len())].clone();
            roster.plans.push(self.plan(index, &name, today));
            let name = names[self.int_n(names.len())].clone();
            roster.appointments.push(self.appointment(index, &name, today));
        }
        roster
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn pick_from<T: Copy>(&mut self, items: &[T]) -> T {
        items[self.rng.int_n(items.len())]
    }

    fn int_range_i64(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = max - min + 1;
        min + (self.rng.next_u64() % (span as u64)) as i64
    }
}

pub fn fixture_json(roster: &Roster, currency_symbol: &str) -> Value {
    let clients = roster
        .clients
        .iter()
        .map(|client| {
            row([
                ("id", client.id.to_string()),
                ("name", client.name.clone()),
                ("email", client.email.clone()),
                ("phone", client.phone.clone()),
                ("advisor", client.advisor.clone()),
                (
                    "aum",
                    client
                        .aum_minor
                        .map(|minor| format_compact_money(minor, currency_symbol))
                        .unwrap_or_default(),
                ),
                ("risk", client.risk.as_str().to_owned()),
                ("status", client.status.as_str().to_owned()),
                ("tier", client.tier.as_str().to_owned()),
                ("joined", format_date(Some(client.joined_on))),
                ("last_review", format_date(client.last_review)),
            ])
        })
        .collect::<Vec<_>>();
    let reports = roster
        .reports
        .iter()
        .map(|report| {
            row([
                ("id", report.id.to_string()),
                ("title", report.title.clone()),
                ("kind", report.kind.as_str().to_owned()),
                ("client", report.client_name.clone()),
                ("period", report.period.clone()),
                ("generated", format_date(Some(report.generated_on))),
                ("status", report.status.as_str().to_owned()),
                (
                    "size_kb",
                    report
                        .size_bytes
                        .map(|bytes| (bytes / 1024).to_string())
                        .unwrap_or_default(),
                ),
            ])
        })
        .collect::<Vec<_>>();
    let plans = roster
        .plans
        .iter()
        .map(|plan| {
            let money = |value: Option<i64>| {
                value
                    .map(|minor| format_money(minor, currency_symbol))
                    .unwrap_or_default()
            };
            row([
                ("id", plan.id.to_string()),
                ("name", plan.name.clone()),
                ("client", plan.client_name.clone()),
                ("kind", plan.kind.as_str().to_owned()),
                ("target", money(plan.target_minor)),
                ("current", money(plan.current_minor)),
                ("status", plan.status.as_str().to_owned()),
                ("review", format_date(plan.review_on)),
            ])
        })
        .collect::<Vec<_>>();
    let appointments = roster
        .appointments
        .iter()
        .map(|appointment| {
            row([
                ("id", appointment.id.to_string()),
                ("title", appointment.title.clone()),
                ("client", appointment.client_name.clone()),
                ("date", format_date(Some(appointment.date))),
                ("start", format_time(appointment.start)),
                ("duration", appointment.duration_minutes.to_string()),
                ("kind", appointment.kind.as_str().to_owned()),
            ])
        })
        .collect::<Vec<_>>();

    json!({
        "clients": clients,
        "reports": reports,
        "plans": plans,
        "appointments": appointments,
    })
}

fn row<const N: usize>(fields: [(&str, String); N]) -> Value {
    let mut object = Map::new();
    for (key, value) in fields {
        object.insert(key.to_owned(), Value::String(value));
    }
    Value::Object(object)
}

pub fn temp_fixture_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let path = dir.path().join("fixture.json");
    Ok((dir, path))
}

pub fn write_fixture(path: &Path, fixture: &Value) -> Result<()> {
    let text = serde_json::to_string_pretty(fixture).context("encode fixture")?;
    fs::write(path, text).with_context(|| format!("write fixture {}", path.display()))
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{AdvisoryFaker, REFERENCE_TODAY, fixture_json, temp_fixture_path, write_fixture};
    use std::collections::BTreeSet;
    use wealthdesk_app::parse_money;

    #[test]
    fn new_deterministic_seed() {
        let mut left = AdvisoryFaker::new(42);
        let mut right = AdvisoryFaker::new(42);
        assert_eq!(
            left.roster(5, REFERENCE_TODAY),
            right.roster(5, REFERENCE_TODAY)
        );
    }

    #[test]
    fn different_seeds_diverge() {
        let left = AdvisoryFaker::new(1).roster(8, REFERENCE_TODAY);
        let right = AdvisoryFaker::new(2).roster(8, REFERENCE_TODAY);
        assert_ne!(left, right);
    }

    #[test]
    fn roster_ids_are_unique_and_links_resolve() {
        let roster = AdvisoryFaker::new(7).roster(25, REFERENCE_TODAY);
        let ids = roster
            .clients
            .iter()
            .map(|client| client.id.as_str())
            .collect::<BTreeSet<_>>();
        assert_eq!(ids.len(), 25);

        let names = roster
            .clients
            .iter()
            .map(|client| client.name.as_str())
            .collect::<BTreeSet<_>>();
        for plan in &roster.plans {
            assert!(names.contains(plan.client_name.as_str()));
        }
        assert_eq!(roster.appointments.len(), 25);
    }

    #[test]
    fn client_values_are_plausible() {
        let mut faker = AdvisoryFaker::new(3);
        for index in 1..=50 {
            let client = faker.client(index, REFERENCE_TODAY);
            assert!(client.email.contains('@'));
            assert!(client.joined_on < REFERENCE_TODAY);
            if let Some(aum) = client.aum_minor {
                assert!(aum > 0 && aum < 100_000_000_000, "aum {aum}");
            }
        }
    }

    #[test]
    fn appointments_fall_inside_working_hours() {
        let mut faker = AdvisoryFaker::new(5);
        for index in 1..=50 {
            let appointment = faker.appointment(index, "Malee Srisuk", REFERENCE_TODAY);
            assert!((9..=16).contains(&appointment.start.hour()));
            assert!([30, 45, 60, 90].contains(&appointment.duration_minutes));
        }
    }

    #[test]
    fn fixture_money_is_display_formatted_and_exact() {
        let roster = AdvisoryFaker::new(11).roster(30, REFERENCE_TODAY);
        let fixture = fixture_json(&roster, "฿");
        let clients = fixture["clients"].as_array().expect("clients array");
        for (value, client) in clients.iter().zip(&roster.clients) {
            let aum = value["aum"].as_str().expect("aum string");
            match client.aum_minor {
                Some(minor) => {
                    assert!(aum.starts_with('฿'), "{aum}");
                    assert_eq!(parse_money(aum).expect("parse aum"), minor);
                }
                None => assert!(aum.is_empty()),
            }
        }
    }

    #[test]
    fn write_fixture_creates_file() -> anyhow::Result<()> {
        let (_dir, path) = temp_fixture_path()?;
        let roster = AdvisoryFaker::new(9).roster(2, REFERENCE_TODAY);
        write_fixture(&path, &fixture_json(&roster, "$"))?;
        let text = std::fs::read_to_string(&path)?;
        assert!(text.contains("\"appointments\""));
        Ok(())
    }
}
