// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use time::{Date, Time};

use crate::{
    AccountSettings, AppointmentKind, ClientStatus, FormKind, NotificationPrefs, RiskProfile,
    ServiceTier,
};

pub const MIN_APPOINTMENT_MINUTES: u16 = 15;
pub const MAX_APPOINTMENT_MINUTES: u16 = 480;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientFormInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub advisor: String,
    pub aum_minor: Option<i64>,
    pub risk: RiskProfile,
    pub status: ClientStatus,
    pub tier: ServiceTier,
    pub joined_on: Date,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentFormInput {
    pub title: String,
    pub client_name: String,
    pub date: Date,
    pub start: Time,
    pub duration_minutes: u16,
    pub kind: AppointmentKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsFormInput {
    pub display_name: String,
    pub email: String,
    pub phone: String,
    pub time_zone: String,
    pub currency_symbol: String,
    pub notifications: NotificationPrefs,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPayload {
    Client(ClientFormInput),
    Appointment(AppointmentFormInput),
    Settings(SettingsFormInput),
}

impl FormPayload {
    pub fn kind(&self) -> FormKind {
        match self {
            Self::Client(_) => FormKind::Client,
            Self::Appointment(_) => FormKind::Appointment,
            Self::Settings(_) => FormKind::Settings,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Client(client) => client.validate(),
            Self::Appointment(appointment) => appointment.validate(),
            Self::Settings(settings) => settings.validate(),
        }
    }
}

impl ClientFormInput {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("client name is required -- enter a name and retry");
        }
        if !self.email.trim().is_empty() && !is_plausible_email(&self.email) {
            bail!(
                "client email {:?} looks wrong -- use the form name@domain.tld",
                self.email.trim()
            );
        }
        if let Some(aum) = self.aum_minor
            && aum < 0
        {
            bail!("client AUM cannot be negative");
        }
        Ok(())
    }
}

impl AppointmentFormInput {
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            bail!("appointment title is required -- enter a title and retry");
        }
        if self.client_name.trim().is_empty() {
            bail!("appointment client is required -- enter a client name and retry");
        }
        if !(MIN_APPOINTMENT_MINUTES..=MAX_APPOINTMENT_MINUTES).contains(&self.duration_minutes) {
            bail!(
                "appointment duration must be {MIN_APPOINTMENT_MINUTES}-{MAX_APPOINTMENT_MINUTES} minutes, got {}",
                self.duration_minutes
            );
        }
        Ok(())
    }
}

impl SettingsFormInput {
    pub fn from_settings(settings: &AccountSettings) -> Self {
        Self {
            display_name: settings.display_name.clone(),
            email: settings.email.clone(),
            phone: settings.phone.clone(),
            time_zone: settings.time_zone.clone(),
            currency_symbol: settings.currency_symbol.clone(),
            notifications: settings.notifications.clone(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.display_name.trim().is_empty() {
            bail!("display name is required -- enter your name and retry");
        }
        if !is_plausible_email(&self.email) {
            bail!(
                "account email {:?} looks wrong -- use the form name@domain.tld",
                self.email.trim()
            );
        }
        if self.time_zone.trim().is_empty() {
            bail!("time zone is required, for example Asia/Bangkok");
        }
        if self.currency_symbol.trim().is_empty() {
            bail!("currency symbol is required, for example ฿ or $");
        }
        Ok(())
    }

    pub fn into_settings(self) -> AccountSettings {
        AccountSettings {
            display_name: self.display_name.trim().to_owned(),
            email: self.email.trim().to_owned(),
            phone: self.phone.trim().to_owned(),
            time_zone: self.time_zone.trim().to_owned(),
            currency_symbol: self.currency_symbol.trim().to_owned(),
            notifications: self.notifications,
        }
    }
}

pub fn is_plausible_email(value: &str) -> bool {
    let value = value.trim();
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && !host.starts_with('.') && !tld.is_empty()
}
