// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use time::{Date, Duration, Time};
use wealthdesk_app::{
    AccountSettings, Appointment, AppointmentId, AppointmentKind, Client, ClientId, ClientStatus,
    Plan, PlanId, PlanKind, PlanStatus, Report, ReportId, ReportKind, ReportStatus, RiskProfile,
    ServiceTier,
};

use crate::fixture::FixtureData;

const BAHT: i64 = 100;

// (id, name, email, advisor, aum in baht, risk, status, tier, joined days ago)
type ClientRow = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    Option<i64>,
    RiskProfile,
    ClientStatus,
    ServiceTier,
    i64,
);

const CLIENTS: [ClientRow; 8] = [
    ("C001", "Somchai Wattana", "somchai.w@example.co.th", "Nok Srisuk", Some(45_000_000), RiskProfile::Balanced, ClientStatus::Active, ServiceTier::Private, 2_100),
    ("C002", "Malee Chaiyo", "malee@example.co.th", "Nok Srisuk", Some(12_500_000), RiskProfile::Conservative, ClientStatus::Active, ServiceTier::Premium, 1_450),
    ("C003", "Anan Boonmee", "anan.b@example.co.th", "Arthit Boonmee", Some(3_200_000), RiskProfile::Growth, ClientStatus::Active, ServiceTier::Basic, 800),
    ("C004", "Kanya Rattanakorn", "kanya.r@example.co.th", "Ploy Kaewmanee", Some(88_000_000), RiskProfile::Aggressive, ClientStatus::Active, ServiceTier::Private, 3_000),
    ("C005", "Niran Sukjai", "niran@example.co.th", "Arthit Boonmee", None, RiskProfile::Moderate, ClientStatus::Prospect, ServiceTier::Basic, 20),
    ("C006", "Pim Thongchai", "pim.t@example.co.th", "Ploy Kaewmanee", Some(7_750_000), RiskProfile::Moderate, ClientStatus::Inactive, ServiceTier::Premium, 2_700),
    ("C007", "Thanawat Jaidee", "thanawat@example.co.th", "Krit Saelim", Some(21_000_000), RiskProfile::Growth, ClientStatus::Active, ServiceTier::Premium, 600),
    ("C008", "Siriporn Phromma", "siriporn.p@example.co.th", "Krit Saelim", Some(950_000), RiskProfile::Conservative, ClientStatus::Prospect, ServiceTier::Basic, 45),
];

pub fn roster(today: Date) -> FixtureData {
    let days = |offset: i64| today.checked_add(Duration::days(offset)).unwrap_or(today);
    let at = |hour: u8, minute: u8| Time::from_hms(hour, minute, 0).unwrap_or(Time::MIDNIGHT);

    let clients = CLIENTS
        .iter()
        .enumerate()
        .map(
            |(index, &(id, name, email, advisor, aum, risk, status, tier, joined))| Client {
                id: ClientId::from(id),
                name: name.to_owned(),
                email: email.to_owned(),
                phone: format!("+66 81 555 {:04}", 1_000 + index * 37),
                advisor: advisor.to_owned(),
                aum_minor: aum.map(|baht| baht * BAHT),
                risk,
                status,
                tier,
                joined_on: days(-joined),
                last_review: (status == ClientStatus::Active).then(|| days(-(30 + index as i64 * 21))),
            },
        )
        .collect();

    let report = |id: &str, title: &str, kind, client: &str, period: &str, age: i64, status, kb: Option<i64>| Report {
        id: ReportId::from(id),
        title: title.to_owned(),
        kind,
        client_name: client.to_owned(),
        period: period.to_owned(),
        generated_on: days(-age),
        status,
        size_bytes: kb.map(|kb| kb * 1024),
    };
    let reports = vec![
        report("R001", "Quarterly performance", ReportKind::Performance, "Somchai Wattana", "Q3 2026", 12, ReportStatus::Ready, Some(842)),
        report("R002", "Asset allocation", ReportKind::Allocation, "Kanya Rattanakorn", "Q3 2026", 9, ReportStatus::Ready, Some(1_310)),
        report("R003", "Tax summary", ReportKind::Tax, "Malee Chaiyo", "FY 2025", 160, ReportStatus::Ready, Some(96)),
        report("R004", "Suitability review", ReportKind::Compliance, "Anan Boonmee", "2026", 2, ReportStatus::Processing, None),
        report("R005", "Quarterly performance", ReportKind::Performance, "Thanawat Jaidee", "Q3 2026", 1, ReportStatus::Failed, None),
        report("R006", "Asset allocation", ReportKind::Allocation, "Pim Thongchai", "Q2 2026", 95, ReportStatus::Ready, Some(517)),
    ];

    let plan = |id: &str, name: &str, client: &str, kind, target: i64, current: i64, status, review: Option<i64>| Plan {
        id: PlanId::from(id),
        name: name.to_owned(),
        client_name: client.to_owned(),
        kind,
        target_minor: Some(target * BAHT),
        current_minor: Some(current * BAHT),
        status,
        review_on: review.map(days),
    };
    let plans = vec![
        plan("P001", "Retire at 55", "Somchai Wattana", PlanKind::Retirement, 60_000_000, 41_000_000, PlanStatus::OnTrack, Some(40)),
        plan("P002", "University fund", "Malee Chaiyo", PlanKind::Education, 4_000_000, 1_100_000, PlanStatus::AtRisk, Some(12)),
        plan("P003", "Legacy trust", "Kanya Rattanakorn", PlanKind::Estate, 150_000_000, 88_000_000, PlanStatus::OnTrack, None),
        plan("P004", "Condo down payment", "Anan Boonmee", PlanKind::Investment, 2_500_000, 400_000, PlanStatus::OffTrack, Some(5)),
        plan("P005", "Healthcare reserve", "Pim Thongchai", PlanKind::Investment, 3_000_000, 3_000_000, PlanStatus::Completed, None),
    ];

    let appointment = |id: &str, title: &str, client: &str, offset: i64, start: Time, minutes: u16, kind| Appointment {
        id: AppointmentId::from(id),
        title: title.to_owned(),
        client_name: client.to_owned(),
        date: days(offset),
        start,
        duration_minutes: minutes,
        kind,
    };
    let appointments = vec![
        appointment("A001", "Portfolio review", "Somchai Wattana", 0, at(10, 0), 60, AppointmentKind::Review),
        appointment("A002", "Check-in call", "Malee Chaiyo", 0, at(14, 30), 30, AppointmentKind::Call),
        appointment("A003", "Onboarding session", "Niran Sukjai", 2, at(9, 30), 90, AppointmentKind::Onboarding),
        appointment("A004", "Planning meeting", "Kanya Rattanakorn", 6, at(13, 0), 60, AppointmentKind::Meeting),
        appointment("A005", "Portfolio review", "Thanawat Jaidee", 17, at(11, 0), 45, AppointmentKind::Review),
        appointment("A006", "Check-in call", "Anan Boonmee", -4, at(16, 0), 30, AppointmentKind::Call),
    ];

    FixtureData {
        clients,
        reports,
        plans,
        appointments,
        settings: Some(AccountSettings {
            display_name: "Nok Srisuk".to_owned(),
            email: "nok@wealthdesk.example".to_owned(),
            ..AccountSettings::default()
        }),
    }
}
