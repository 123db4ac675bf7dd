// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod demo;
mod fixture;

pub use fixture::{FixtureData, parse_fixture};

use anyhow::{Context, Result, anyhow, bail};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use time::{Date, OffsetDateTime};
use tracing::{debug, info};
use wealthdesk_app::{
    AccountSettings, Appointment, AppointmentFormInput, AppointmentId, Client, ClientFormInput,
    ClientId, Plan, PlanId, Report, ReportId, SettingsFormInput,
};

pub const APP_NAME: &str = "wealthdesk";
pub const MAX_FIXTURE_SIZE: u64 = 16 << 20;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Store {
    clients: Vec<Client>,
    reports: Vec<Report>,
    plans: Vec<Plan>,
    appointments: Vec<Appointment>,
    settings: AccountSettings,
    revision: u64,
}

impl Store {
    pub fn open_demo() -> Self {
        Self::open_demo_at(OffsetDateTime::now_utc().date())
    }

    pub fn open_demo_at(today: Date) -> Self {
        Self::from_data(demo::roster(today))
    }

    pub fn load_fixture(path: &Path) -> Result<Self> {
        validate_fixture_path(&path.to_string_lossy())?;
        let metadata =
            fs::metadata(path).with_context(|| format!("read fixture {}", path.display()))?;
        if metadata.len() > MAX_FIXTURE_SIZE {
            bail!(
                "fixture {} is {} bytes; the limit is {MAX_FIXTURE_SIZE} -- split the export and retry",
                path.display(),
                metadata.len()
            );
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("read fixture {}", path.display()))?;
        let store = Self::from_fixture_json(&text)
            .with_context(|| format!("load fixture {}", path.display()))?;
        info!(
            path = %path.display(),
            clients = store.clients.len(),
            reports = store.reports.len(),
            plans = store.plans.len(),
            appointments = store.appointments.len(),
            "fixture loaded"
        );
        Ok(store)
    }

    pub fn from_fixture_json(json: &str) -> Result<Self> {
        Ok(Self::from_data(parse_fixture(json)?))
    }

    pub fn from_data(data: FixtureData) -> Self {
        Self {
            clients: data.clients,
            reports: data.reports,
            plans: data.plans,
            appointments: data.appointments,
            settings: data.settings.unwrap_or_default(),
            revision: 0,
        }
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn list_clients(&self) -> Vec<Client> {
        self.clients.clone()
    }

    pub fn list_reports(&self) -> Vec<Report> {
        self.reports.clone()
    }

    pub fn list_plans(&self) -> Vec<Plan> {
        self.plans.clone()
    }

    pub fn list_appointments(&self) -> Vec<Appointment> {
        self.appointments.clone()
    }

    pub fn settings(&self) -> AccountSettings {
        self.settings.clone()
    }

    pub fn create_client(&mut self, input: &ClientFormInput) -> Result<ClientId> {
        input.validate()?;
        let id = ClientId::new(next_id('C', self.clients.iter().map(|c| c.id.as_str())));
        self.clients.push(Client {
            id: id.clone(),
            name: input.name.trim().to_owned(),
            email: input.email.trim().to_owned(),
            phone: input.phone.trim().to_owned(),
            advisor: input.advisor.trim().to_owned(),
            aum_minor: input.aum_minor,
            risk: input.risk,
            status: input.status,
            tier: input.tier,
            joined_on: input.joined_on,
            last_review: None,
        });
        self.bump("create client");
        Ok(id)
    }

    pub fn delete_client(&mut self, client_id: &ClientId) -> Result<()> {
        let before = self.clients.len();
        self.clients.retain(|client| client.id != *client_id);
        if self.clients.len() == before {
            bail!("client {client_id} not found -- it may already be deleted");
        }
        self.bump("delete client");
        Ok(())
    }

    pub fn delete_report(&mut self, report_id: &ReportId) -> Result<()> {
        let before = self.reports.len();
        self.reports.retain(|report| report.id != *report_id);
        if self.reports.len() == before {
            bail!("report {report_id} not found -- it may already be deleted");
        }
        self.bump("delete report");
        Ok(())
    }

    pub fn delete_plan(&mut self, plan_id: &PlanId) -> Result<()> {
        let before = self.plans.len();
        self.plans.retain(|plan| plan.id != *plan_id);
        if self.plans.len() == before {
            bail!("plan {plan_id} not found -- it may already be deleted");
        }
        self.bump("delete plan");
        Ok(())
    }

    pub fn create_appointment(&mut self, input: &AppointmentFormInput) -> Result<AppointmentId> {
        input.validate()?;
        let id = AppointmentId::new(next_id(
            'A',
            self.appointments.iter().map(|a| a.id.as_str()),
        ));
        self.appointments.push(Appointment {
            id: id.clone(),
            title: input.title.trim().to_owned(),
            client_name: input.client_name.trim().to_owned(),
            date: input.date,
            start: input.start,
            duration_minutes: input.duration_minutes,
            kind: input.kind,
        });
        self.bump("create appointment");
        Ok(id)
    }

    pub fn save_settings(&mut self, input: SettingsFormInput) -> Result<()> {
        input.validate()?;
        self.settings = input.into_settings();
        self.bump("save settings");
        Ok(())
    }

    fn bump(&mut self, change: &str) {
        self.revision += 1;
        debug!(revision = self.revision, change, "store changed");
    }
}

fn next_id<'a>(prefix: char, existing: impl Iterator<Item = &'a str>) -> String {
    let highest = existing
        .filter_map(|id| id.strip_prefix(prefix))
        .filter_map(|digits| digits.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    format!("{prefix}{:03}", highest + 1)
}

pub fn validate_fixture_path(path: &str) -> Result<()> {
    if path.trim().is_empty() {
        bail!("fixture path is empty -- pass a JSON file path");
    }
    if path.contains("://") || path.starts_with("file:") {
        bail!("fixture path {path:?} looks like a URI -- pass a local file path instead");
    }
    Ok(())
}

pub fn default_data_dir() -> Result<PathBuf> {
    if let Some(override_path) = env::var_os("WEALTHDESK_DATA_DIR") {
        return Ok(PathBuf::from(override_path));
    }

    let data_root = dirs::data_local_dir().ok_or_else(|| {
        anyhow!("cannot resolve data directory; set WEALTHDESK_DATA_DIR to a writable directory")
    })?;
    Ok(data_root.join(APP_NAME))
}

#[cfg(test)]
mod tests {
    use super::next_id;

    #[test]
    fn next_id_skips_past_highest() {
        assert_eq!(next_id('C', ["C001", "C007", "C003"].into_iter()), "C008");
        assert_eq!(next_id('C', std::iter::empty()), "C001");
        assert_eq!(next_id('A', ["C999", "A002", "Axyz"].into_iter()), "A003");
    }
}
