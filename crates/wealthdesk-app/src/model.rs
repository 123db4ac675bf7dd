// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use time::{Date, Time};

use crate::ids::*;

macro_rules! labeled_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }

            pub fn parse(value: &str) -> Option<Self> {
                let value = value.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|candidate| candidate.as_str().eq_ignore_ascii_case(value))
            }
        }
    };
}

labeled_enum!(ClientStatus {
    Active => "active",
    Prospect => "prospect",
    Inactive => "inactive",
});

labeled_enum!(RiskProfile {
    Conservative => "conservative",
    Moderate => "moderate",
    Balanced => "balanced",
    Growth => "growth",
    Aggressive => "aggressive",
});

labeled_enum!(ServiceTier {
    Basic => "basic",
    Premium => "premium",
    Private => "private",
});

labeled_enum!(ReportKind {
    Performance => "performance",
    Allocation => "allocation",
    Tax => "tax",
    Compliance => "compliance",
});

labeled_enum!(ReportStatus {
    Ready => "ready",
    Processing => "processing",
    Failed => "failed",
});

labeled_enum!(PlanKind {
    Retirement => "retirement",
    Education => "education",
    Estate => "estate",
    Investment => "investment",
});

labeled_enum!(PlanStatus {
    OnTrack => "on_track",
    AtRisk => "at_risk",
    OffTrack => "off_track",
    Completed => "completed",
});

labeled_enum!(AppointmentKind {
    Review => "review",
    Onboarding => "onboarding",
    Call => "call",
    Meeting => "meeting",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TabKind {
    Dashboard,
    Clients,
    Reports,
    Plans,
    Calendar,
    Settings,
}

impl TabKind {
    pub const ALL: [Self; 6] = [
        Self::Dashboard,
        Self::Clients,
        Self::Reports,
        Self::Plans,
        Self::Calendar,
        Self::Settings,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Clients => "clients",
            Self::Reports => "reports",
            Self::Plans => "plans",
            Self::Calendar => "calendar",
            Self::Settings => "settings",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|tab| tab.label().eq_ignore_ascii_case(value.trim()))
    }

    pub const fn is_table(self) -> bool {
        matches!(self, Self::Clients | Self::Reports | Self::Plans)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormKind {
    Client,
    Appointment,
    Settings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppMode {
    Nav,
    Filter,
    Form(FormKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sunday" | "sun" => Some(Self::Sunday),
            "monday" | "mon" => Some(Self::Monday),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub advisor: String,
    pub aum_minor: Option<i64>,
    pub risk: RiskProfile,
    pub status: ClientStatus,
    pub tier: ServiceTier,
    pub joined_on: Date,
    pub last_review: Option<Date>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportId,
    pub title: String,
    pub kind: ReportKind,
    pub client_name: String,
    pub period: String,
    pub generated_on: Date,
    pub status: ReportStatus,
    pub size_bytes: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub id: PlanId,
    pub name: String,
    pub client_name: String,
    pub kind: PlanKind,
    pub target_minor: Option<i64>,
    pub current_minor: Option<i64>,
    pub status: PlanStatus,
    pub review_on: Option<Date>,
}

impl Plan {
    pub fn progress_percent(&self) -> Option<f64> {
        let target = self.target_minor.filter(|target| *target > 0)?;
        let current = self.current_minor.unwrap_or(0);
        Some(((current as f64 / target as f64) * 100.0).clamp(0.0, 100.0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub title: String,
    pub client_name: String,
    pub date: Date,
    pub start: Time,
    pub duration_minutes: u16,
    pub kind: AppointmentKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationPrefs {
    pub email: bool,
    pub sms: bool,
    pub weekly_digest: bool,
}

impl Default for NotificationPrefs {
    fn default() -> Self {
        Self {
            email: true,
            sms: false,
            weekly_digest: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountSettings {
    pub display_name: String,
    pub email: String,
    pub phone: String,
    pub time_zone: String,
    pub currency_symbol: String,
    pub notifications: NotificationPrefs,
}

impl Default for AccountSettings {
    fn default() -> Self {
        Self {
            display_name: String::new(),
            email: String::new(),
            phone: String::new(),
            time_zone: "Asia/Bangkok".to_owned(),
            currency_symbol: crate::values::DEFAULT_CURRENCY_SYMBOL.to_owned(),
            notifications: NotificationPrefs::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ClientStatus, Plan, PlanKind, PlanStatus, SortDirection, TabKind};
    use crate::PlanId;

    #[test]
    fn labeled_enums_parse_case_insensitively() {
        assert_eq!(ClientStatus::parse("Active"), Some(ClientStatus::Active));
        assert_eq!(PlanStatus::parse(" at_risk "), Some(PlanStatus::AtRisk));
        assert_eq!(ClientStatus::parse("archived"), None);
    }

    #[test]
    fn tab_parse_matches_labels() {
        for tab in TabKind::ALL {
            assert_eq!(TabKind::parse(tab.label()), Some(tab));
        }
        assert_eq!(TabKind::parse("nope"), None);
    }

    #[test]
    fn sort_direction_flips() {
        assert_eq!(SortDirection::Asc.flipped(), SortDirection::Desc);
        assert_eq!(SortDirection::Desc.flipped(), SortDirection::Asc);
    }

    #[test]
    fn plan_progress_is_capped_and_needs_target() {
        let mut plan = Plan {
            id: PlanId::from("P1"),
            name: "Retire at 55".to_owned(),
            client_name: "Aaron".to_owned(),
            kind: PlanKind::Retirement,
            target_minor: Some(1_000),
            current_minor: Some(250),
            status: PlanStatus::OnTrack,
            review_on: None,
        };
        assert_eq!(plan.progress_percent(), Some(25.0));

        plan.current_minor = Some(5_000);
        assert_eq!(plan.progress_percent(), Some(100.0));

        plan.target_minor = None;
        assert_eq!(plan.progress_percent(), None);
    }
}
