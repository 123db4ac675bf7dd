// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use tracing::info;
use wealthdesk_app::{
    AccountSettings, Appointment, Client, ClientId, FormPayload, Plan, PlanId, Report, ReportId,
    TabKind,
};
use wealthdesk_store::Store;

const DELETE_ACTION: &str = "Delete";

pub struct StoreRuntime {
    store: Store,
}

impl StoreRuntime {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    #[cfg(test)]
    fn store(&self) -> &Store {
        &self.store
    }
}

impl wealthdesk_tui::AppRuntime for StoreRuntime {
    fn revision(&mut self) -> Result<u64> {
        Ok(self.store.revision())
    }

    fn load_clients(&mut self) -> Result<Vec<Client>> {
        Ok(self.store.list_clients())
    }

    fn load_reports(&mut self) -> Result<Vec<Report>> {
        Ok(self.store.list_reports())
    }

    fn load_plans(&mut self) -> Result<Vec<Plan>> {
        Ok(self.store.list_plans())
    }

    fn load_appointments(&mut self) -> Result<Vec<Appointment>> {
        Ok(self.store.list_appointments())
    }

    fn load_settings(&mut self) -> Result<AccountSettings> {
        Ok(self.store.settings())
    }

    fn apply_action(&mut self, tab: TabKind, record_id: &str, action: &str) -> Result<()> {
        if action != DELETE_ACTION {
            bail!(
                "action {action:?} does not change {} -- only Delete is stored",
                tab.label()
            );
        }
        match tab {
            TabKind::Clients => self.store.delete_client(&ClientId::from(record_id))?,
            TabKind::Reports => self.store.delete_report(&ReportId::from(record_id))?,
            TabKind::Plans => self.store.delete_plan(&PlanId::from(record_id))?,
            TabKind::Dashboard | TabKind::Calendar | TabKind::Settings => {
                bail!("{} has no rows to delete", tab.label());
            }
        }
        info!(tab = tab.label(), record_id, "row deleted");
        Ok(())
    }

    fn submit_form(&mut self, payload: &FormPayload) -> Result<()> {
        payload.validate()?;

        match payload {
            FormPayload::Client(input) => {
                let id = self.store.create_client(input)?;
                info!(%id, "client created");
            }
            FormPayload::Appointment(input) => {
                let id = self.store.create_appointment(input)?;
                info!(%id, "appointment created");
            }
            FormPayload::Settings(input) => {
                self.store.save_settings(input.clone())?;
                info!("account settings saved");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::StoreRuntime;
    use anyhow::Result;
    use time::macros::time;
    use wealthdesk_app::{
        AppointmentFormInput, AppointmentKind, FormPayload, SettingsFormInput, TabKind,
    };
    use wealthdesk_store::Store;
    use wealthdesk_testkit::REFERENCE_TODAY;
    use wealthdesk_tui::AppRuntime;

    fn runtime() -> StoreRuntime {
        StoreRuntime::new(Store::open_demo_at(REFERENCE_TODAY))
    }

    #[test]
    fn delete_routes_to_the_tab_collection() -> Result<()> {
        let mut runtime = runtime();
        runtime.apply_action(TabKind::Reports, "R002", "Delete")?;
        runtime.apply_action(TabKind::Plans, "P001", "Delete")?;
        runtime.apply_action(TabKind::Clients, "C003", "Delete")?;

        assert_eq!(runtime.revision()?, 3);
        assert!(runtime.load_reports()?.iter().all(|r| r.id.as_str() != "R002"));
        assert!(runtime.load_plans()?.iter().all(|p| p.id.as_str() != "P001"));
        assert!(runtime.load_clients()?.iter().all(|c| c.id.as_str() != "C003"));
        Ok(())
    }

    #[test]
    fn non_mutating_or_misplaced_actions_fail_without_changes() {
        let mut runtime = runtime();
        let error = runtime
            .apply_action(TabKind::Clients, "C001", "View")
            .expect_err("view is not stored");
        assert!(error.to_string().contains("only Delete"));

        assert!(runtime.apply_action(TabKind::Calendar, "A001", "Delete").is_err());
        assert!(runtime.apply_action(TabKind::Clients, "C999", "Delete").is_err());
        assert_eq!(runtime.store().revision(), 0);
    }

    #[test]
    fn submit_form_persists_each_kind() -> Result<()> {
        let mut runtime = runtime();
        runtime.submit_form(&FormPayload::Appointment(AppointmentFormInput {
            title: "Rebalance call".to_owned(),
            client_name: "Malee Chaiyo".to_owned(),
            date: REFERENCE_TODAY,
            start: time!(16:30),
            duration_minutes: 30,
            kind: AppointmentKind::Call,
        }))?;
        assert_eq!(runtime.load_appointments()?.len(), 7);

        let mut settings = SettingsFormInput::from_settings(&runtime.load_settings()?);
        settings.notifications.sms = true;
        runtime.submit_form(&FormPayload::Settings(settings))?;
        assert!(runtime.load_settings()?.notifications.sms);
        assert_eq!(runtime.revision()?, 2);
        Ok(())
    }

    #[test]
    fn invalid_payload_is_rejected_before_the_store() -> Result<()> {
        let mut runtime = runtime();
        let mut settings = SettingsFormInput::from_settings(&runtime.load_settings()?);
        settings.email = "not-an-email".to_owned();
        assert!(runtime.submit_form(&FormPayload::Settings(settings)).is_err());
        assert_eq!(runtime.revision()?, 0);
        Ok(())
    }
}
