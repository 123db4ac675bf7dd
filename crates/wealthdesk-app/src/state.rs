// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{AppMode, FormKind, TabKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub mode: AppMode,
    pub active_tab: TabKind,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            mode: AppMode::Nav,
            active_tab: TabKind::Dashboard,
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    NextTab,
    PrevTab,
    SelectTab(TabKind),
    EnterFilter,
    ExitToNav,
    OpenForm(FormKind),
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    ModeChanged(AppMode),
    TabChanged(TabKind),
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::NextTab => self.rotate_tab(1),
            AppCommand::PrevTab => self.rotate_tab(-1),
            AppCommand::SelectTab(tab) => self.switch_tab(tab),
            AppCommand::EnterFilter => {
                if !self.active_tab.is_table() {
                    return vec![self.set_status("nothing to filter here")];
                }
                self.mode = AppMode::Filter;
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::ExitToNav => {
                if self.mode == AppMode::Nav {
                    return Vec::new();
                }
                self.mode = AppMode::Nav;
                vec![AppEvent::ModeChanged(self.mode), self.set_status("nav")]
            }
            AppCommand::OpenForm(kind) => {
                self.mode = AppMode::Form(kind);
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::SetStatus(message) => vec![self.set_status(&message)],
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    fn rotate_tab(&mut self, delta: isize) -> Vec<AppEvent> {
        let tabs = TabKind::ALL;
        let current = tabs
            .iter()
            .position(|tab| *tab == self.active_tab)
            .unwrap_or(0) as isize;
        let len = tabs.len() as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.switch_tab(tabs[next])
    }

    // Leaving a tab unmounts whatever form or filter prompt it had open.
    fn switch_tab(&mut self, tab: TabKind) -> Vec<AppEvent> {
        if tab == self.active_tab {
            return Vec::new();
        }
        let mut events = Vec::new();
        if self.mode != AppMode::Nav {
            self.mode = AppMode::Nav;
            events.push(AppEvent::ModeChanged(self.mode));
        }
        self.active_tab = tab;
        events.push(AppEvent::TabChanged(tab));
        events
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::{AppCommand, AppEvent, AppState};
    use crate::{AppMode, FormKind, TabKind};

    #[test]
    fn tab_rotation_wraps() {
        let mut state = AppState {
            active_tab: TabKind::Settings,
            ..AppState::default()
        };

        let events = state.dispatch(AppCommand::NextTab);
        assert_eq!(state.active_tab, TabKind::Dashboard);
        assert_eq!(events, vec![AppEvent::TabChanged(TabKind::Dashboard)]);

        state.dispatch(AppCommand::PrevTab);
        assert_eq!(state.active_tab, TabKind::Settings);
    }

    #[test]
    fn switching_tabs_closes_open_form() {
        let mut state = AppState {
            active_tab: TabKind::Settings,
            ..AppState::default()
        };
        state.dispatch(AppCommand::OpenForm(FormKind::Settings));

        let events = state.dispatch(AppCommand::SelectTab(TabKind::Clients));
        assert_eq!(
            events,
            vec![
                AppEvent::ModeChanged(AppMode::Nav),
                AppEvent::TabChanged(TabKind::Clients),
            ],
        );
        assert_eq!(state.mode, AppMode::Nav);
    }

    #[test]
    fn selecting_current_tab_is_a_no_op() {
        let mut state = AppState::default();
        assert!(state.dispatch(AppCommand::SelectTab(TabKind::Dashboard)).is_empty());
    }

    #[test]
    fn filter_mode_only_on_table_tabs() {
        let mut state = AppState::default();
        let events = state.dispatch(AppCommand::EnterFilter);
        assert_eq!(state.mode, AppMode::Nav);
        assert_eq!(
            events,
            vec![AppEvent::StatusUpdated("nothing to filter here".to_owned())]
        );

        state.dispatch(AppCommand::SelectTab(TabKind::Reports));
        state.dispatch(AppCommand::EnterFilter);
        assert_eq!(state.mode, AppMode::Filter);
    }

    #[test]
    fn mode_transitions() {
        let mut state = AppState::default();

        state.dispatch(AppCommand::OpenForm(FormKind::Client));
        assert_eq!(state.mode, AppMode::Form(FormKind::Client));

        let events = state.dispatch(AppCommand::ExitToNav);
        assert_eq!(state.mode, AppMode::Nav);
        assert_eq!(
            events,
            vec![
                AppEvent::ModeChanged(AppMode::Nav),
                AppEvent::StatusUpdated("nav".to_owned()),
            ],
        );
        assert!(state.dispatch(AppCommand::ExitToNav).is_empty());
    }

    #[test]
    fn status_set_and_clear() {
        let mut state = AppState::default();
        state.dispatch(AppCommand::SetStatus("saved".to_owned()));
        assert_eq!(state.status_line.as_deref(), Some("saved"));

        let events = state.dispatch(AppCommand::ClearStatus);
        assert_eq!(events, vec![AppEvent::StatusCleared]);
        assert_eq!(state.status_line, None);
    }
}
