// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use time::{Date, Duration};

use crate::{Appointment, Client, ClientStatus, Plan, PlanStatus, RiskProfile};

pub const DEFAULT_UPCOMING_DAYS: i64 = 14;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskExposure {
    pub risk: RiskProfile,
    pub aum_minor: i64,
    pub clients: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DashboardSummary {
    pub total_aum_minor: i64,
    pub active_clients: usize,
    pub prospect_clients: usize,
    pub inactive_clients: usize,
    pub aum_by_risk: Vec<RiskExposure>,
    pub plans_needing_attention: Vec<Plan>,
    pub upcoming: Vec<Appointment>,
}

impl DashboardSummary {
    pub fn compute(
        clients: &[Client],
        plans: &[Plan],
        appointments: &[Appointment],
        today: Date,
        upcoming_days: i64,
    ) -> Self {
        let mut summary = Self::default();
        for client in clients {
            let aum = client.aum_minor.unwrap_or(0);
            summary.total_aum_minor = summary.total_aum_minor.saturating_add(aum);
            match client.status {
                ClientStatus::Active => summary.active_clients += 1,
                ClientStatus::Prospect => summary.prospect_clients += 1,
                ClientStatus::Inactive => summary.inactive_clients += 1,
            }
        }

        summary.aum_by_risk = RiskProfile::ALL
            .iter()
            .filter_map(|risk| {
                let members = clients
                    .iter()
                    .filter(|client| client.risk == *risk)
                    .collect::<Vec<_>>();
                if members.is_empty() {
                    return None;
                }
                Some(RiskExposure {
                    risk: *risk,
                    aum_minor: members
                        .iter()
                        .map(|client| client.aum_minor.unwrap_or(0))
                        .fold(0_i64, i64::saturating_add),
                    clients: members.len(),
                })
            })
            .collect();
        // Stable, so equal exposures keep risk-profile order.
        summary
            .aum_by_risk
            .sort_by(|left, right| right.aum_minor.cmp(&left.aum_minor));

        summary.plans_needing_attention = plans
            .iter()
            .filter(|plan| matches!(plan.status, PlanStatus::AtRisk | PlanStatus::OffTrack))
            .cloned()
            .collect();

        let horizon = today
            .checked_add(Duration::days(upcoming_days.max(0)))
            .unwrap_or(Date::MAX);
        let mut upcoming = appointments
            .iter()
            .filter(|appointment| appointment.date >= today && appointment.date <= horizon)
            .cloned()
            .collect::<Vec<_>>();
        upcoming.sort_by_key(|appointment| (appointment.date, appointment.start));
        summary.upcoming = upcoming;

        summary
    }

    pub fn client_count(&self) -> usize {
        self.active_clients + self.prospect_clients + self.inactive_clients
    }
}
