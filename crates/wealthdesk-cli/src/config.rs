// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use time::Date;
use wealthdesk_app::{DEFAULT_CURRENCY_SYMBOL, TabKind, WeekStart};
use wealthdesk_tui::{DEFAULT_PAGE_SIZE, UiOptions};

use crate::logging;

const CONFIG_VERSION: i64 = 1;
const MAX_PAGE_SIZE: usize = 500;
const DEFAULT_SUBMIT_DELAY: &str = "1500ms";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub data: Data,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub forms: Forms,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            data: Data::default(),
            ui: Ui::default(),
            forms: Forms::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Data {
    pub fixture_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub start_tab: Option<String>,
    pub page_size: Option<usize>,
    pub week_start: Option<String>,
    pub currency_symbol: Option<String>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            start_tab: Some("dashboard".to_owned()),
            page_size: Some(DEFAULT_PAGE_SIZE),
            week_start: Some("sunday".to_owned()),
            currency_symbol: Some(DEFAULT_CURRENCY_SYMBOL.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Forms {
    pub submit_delay: Option<String>,
}

impl Default for Forms {
    fn default() -> Self {
        Self {
            submit_delay: Some(DEFAULT_SUBMIT_DELAY.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub level: Option<String>,
    pub dir: Option<String>,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            level: Some(DEFAULT_LOG_LEVEL.to_owned()),
            dir: None,
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("WEALTHDESK_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!(
                "cannot resolve config directory; set WEALTHDESK_CONFIG_PATH to the config file"
            )
        })?;

        let app_dir = config_root.join(wealthdesk_store::APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and keep values under [data], [ui], [forms], and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1. Regenerate it with --print-example-config",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(fixture_path) = &self.data.fixture_path {
            wealthdesk_store::validate_fixture_path(fixture_path)
                .with_context(|| format!("data.fixture_path in {}", path.display()))?;
        }

        if let Some(tab) = &self.ui.start_tab
            && TabKind::parse(tab).is_none()
        {
            bail!(
                "ui.start_tab {tab:?} in {} is not a tab; use dashboard, clients, reports, plans, calendar, or settings",
                path.display()
            );
        }

        if let Some(page_size) = self.ui.page_size
            && !(1..=MAX_PAGE_SIZE).contains(&page_size)
        {
            bail!(
                "ui.page_size in {} must be between 1 and {MAX_PAGE_SIZE}, got {page_size}",
                path.display()
            );
        }

        if let Some(week_start) = &self.ui.week_start
            && WeekStart::parse(week_start).is_none()
        {
            bail!(
                "ui.week_start {week_start:?} in {} must be sunday or monday",
                path.display()
            );
        }

        if let Some(symbol) = &self.ui.currency_symbol
            && symbol.trim().is_empty()
        {
            bail!(
                "ui.currency_symbol in {} is blank; remove the key to use {DEFAULT_CURRENCY_SYMBOL}",
                path.display()
            );
        }

        if let Some(delay) = &self.forms.submit_delay {
            parse_duration(delay)
                .with_context(|| format!("forms.submit_delay in {}", path.display()))?;
        }

        if let Some(level) = &self.log.level {
            logging::level_filter(level)
                .with_context(|| format!("log.level in {}", path.display()))?;
        }

        Ok(())
    }

    pub fn fixture_path(&self) -> Option<PathBuf> {
        self.data.fixture_path.as_deref().map(PathBuf::from)
    }

    pub fn start_tab(&self) -> TabKind {
        self.ui
            .start_tab
            .as_deref()
            .and_then(TabKind::parse)
            .unwrap_or(TabKind::Dashboard)
    }

    pub fn page_size(&self) -> usize {
        self.ui.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn week_start(&self) -> WeekStart {
        self.ui
            .week_start
            .as_deref()
            .and_then(WeekStart::parse)
            .unwrap_or_default()
    }

    pub fn currency_symbol(&self) -> &str {
        self.ui
            .currency_symbol
            .as_deref()
            .unwrap_or(DEFAULT_CURRENCY_SYMBOL)
    }

    pub fn submit_delay(&self) -> Result<Duration> {
        parse_duration(
            self.forms
                .submit_delay
                .as_deref()
                .unwrap_or(DEFAULT_SUBMIT_DELAY),
        )
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_dir(&self) -> Result<PathBuf> {
        match &self.log.dir {
            Some(dir) => Ok(PathBuf::from(dir)),
            None => Ok(wealthdesk_store::default_data_dir()?.join("logs")),
        }
    }

    pub fn ui_options(&self, today: Date) -> Result<UiOptions> {
        let mut options = UiOptions::new(today);
        options.page_size = self.page_size();
        options.week_start = self.week_start();
        options.currency_symbol = self.currency_symbol().to_owned();
        options.submit_delay = self.submit_delay()?;
        Ok(options)
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# wealthdesk config\n# Place this file at: {}\n\nversion = 1\n\n[data]\n# Optional. Without it the built-in demo roster is loaded.\n# fixture_path = \"/absolute/path/to/advisory.json\"\n\n[ui]\nstart_tab = \"dashboard\"\npage_size = {DEFAULT_PAGE_SIZE}\nweek_start = \"sunday\"\n# Used when the account settings leave the symbol blank.\ncurrency_symbol = \"{DEFAULT_CURRENCY_SYMBOL}\"\n\n[forms]\nsubmit_delay = \"{DEFAULT_SUBMIT_DELAY}\"\n\n[log]\n# Any tracing filter directive; RUST_LOG overrides it.\nlevel = \"{DEFAULT_LOG_LEVEL}\"\n# Optional. Default is the platform data dir (for example ~/.local/share/wealthdesk/logs)\n# dir = \"/absolute/path/to/logs\"\n",
            path.display(),
        )
    }
}

fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_secs(mins * 60));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 1500ms or 2s)")
}
