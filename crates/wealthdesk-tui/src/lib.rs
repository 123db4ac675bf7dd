// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs};
use std::io;
use std::iter;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use time::Date;
use tracing::{debug, warn};
use wealthdesk_app::{
    AccountSettings, ActionError, ActionHandler, ActionReceipt, AppCommand, AppEvent, AppMode,
    AppState, Appointment, AppointmentFormInput, AppointmentKind, Badge, BadgeTone,
    BrowserCommand, BrowserConfig, BrowserEvent, Client, ClientFormInput, ClientStatus,
    DEFAULT_CURRENCY_SYMBOL, DEFAULT_SUBMIT_DELAY, DEFAULT_UPCOMING_DAYS, DashboardSummary,
    EmptyState, FieldSpec, FormKind, FormPayload, MonthGrid, NotificationPrefs, Plan, Record,
    RecordBrowser, Report, RiskProfile, RowAction, Schema, ServiceTier, SettingsFormInput,
    SortDirection, SubmissionSlot, SubmissionToken, TabKind, WeekStart, add_months,
    bucket_appointments, format_compact_money, format_date, format_time, parse_date,
    parse_optional_date, parse_optional_money, parse_time,
};

const STATUS_CLEAR_DELAY: Duration = Duration::from_secs(4);
const POLL_INTERVAL: Duration = Duration::from_millis(120);
pub const DEFAULT_PAGE_SIZE: usize = 20;
const VIEW_ACTION: &str = "View";
const DELETE_ACTION: &str = "Delete";
const TABLE_ACTIONS: [RowAction; 2] = [
    RowAction::new(VIEW_ACTION),
    RowAction::destructive(DELETE_ACTION),
];
const FILTER_MARK: &str = "▼";
const SORT_MARK_ASC: &str = "↑";
const SORT_MARK_DESC: &str = "↓";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiOptions {
    pub today: Date,
    pub page_size: usize,
    pub week_start: WeekStart,
    pub currency_symbol: String,
    pub submit_delay: Duration,
    pub upcoming_days: i64,
}

impl UiOptions {
    pub fn new(today: Date) -> Self {
        Self {
            today,
            page_size: DEFAULT_PAGE_SIZE,
            week_start: WeekStart::default(),
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_owned(),
            submit_delay: DEFAULT_SUBMIT_DELAY,
            upcoming_days: DEFAULT_UPCOMING_DAYS,
        }
    }
}

pub trait AppRuntime {
    fn revision(&mut self) -> Result<u64>;
    fn load_clients(&mut self) -> Result<Vec<Client>>;
    fn load_reports(&mut self) -> Result<Vec<Report>>;
    fn load_plans(&mut self) -> Result<Vec<Plan>>;
    fn load_appointments(&mut self) -> Result<Vec<Appointment>>;
    fn load_settings(&mut self) -> Result<AccountSettings>;
    fn apply_action(&mut self, tab: TabKind, record_id: &str, action: &str) -> Result<()>;
    fn submit_form(&mut self, payload: &FormPayload) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
    SubmissionReady { token: SubmissionToken },
}

#[derive(Debug, Clone, PartialEq)]
struct RowView {
    cells: Vec<String>,
    badges: Vec<Badge>,
}

trait TablePane {
    fn fields(&self) -> &'static [FieldSpec];
    fn apply(&mut self, command: BrowserCommand) -> Vec<BrowserEvent>;
    fn query(&self) -> &str;
    fn sort(&self) -> Option<(&str, SortDirection)>;
    fn page(&self) -> usize;
    fn pages(&self) -> usize;
    fn page_len(&self) -> usize;
    fn total(&self) -> usize;
    fn visible_count(&self) -> usize;
    fn empty(&self) -> Option<EmptyState>;
    fn record_id_at(&self, row: usize) -> Option<String>;
    fn page_rows(&self, currency_symbol: &str) -> Vec<RowView>;
    fn detail(&self, record_id: &str, currency_symbol: &str) -> Option<String>;
    fn invoke(
        &self,
        record_id: &str,
        label: &str,
        handler: &mut dyn ActionHandler,
    ) -> Result<ActionReceipt, ActionError>;
}

impl<R: Record> TablePane for RecordBrowser<R> {
    fn fields(&self) -> &'static [FieldSpec] {
        self.schema().fields()
    }

    fn apply(&mut self, command: BrowserCommand) -> Vec<BrowserEvent> {
        self.dispatch(command)
    }

    fn query(&self) -> &str {
        self.state().filter.query()
    }

    fn sort(&self) -> Option<(&str, SortDirection)> {
        self.effective_sort()
    }

    fn page(&self) -> usize {
        self.state().page
    }

    fn pages(&self) -> usize {
        self.page_count()
    }

    fn page_len(&self) -> usize {
        self.visible_page().len()
    }

    fn total(&self) -> usize {
        self.records().len()
    }

    fn visible_count(&self) -> usize {
        self.visible_indices().len()
    }

    fn empty(&self) -> Option<EmptyState> {
        self.empty_state()
    }

    fn record_id_at(&self, row: usize) -> Option<String> {
        self.visible_page()
            .get(row)
            .map(|record| record.record_id().to_owned())
    }

    fn page_rows(&self, currency_symbol: &str) -> Vec<RowView> {
        let fields = self.schema().fields();
        self.visible_page()
            .into_iter()
            .map(|record| RowView {
                cells: fields
                    .iter()
                    .map(|spec| {
                        record
                            .cell(spec.name)
                            .map(|cell| cell.display(currency_symbol))
                            .unwrap_or_default()
                    })
                    .collect(),
                badges: record.badges(),
            })
            .collect()
    }

    fn detail(&self, record_id: &str, currency_symbol: &str) -> Option<String> {
        let record = self.find(record_id)?;
        let parts = self
            .schema()
            .fields()
            .iter()
            .filter_map(|spec| {
                let text = record.cell(spec.name)?.display(currency_symbol);
                (!text.is_empty()).then(|| format!("{}: {text}", spec.label.to_lowercase()))
            })
            .collect::<Vec<_>>();
        Some(parts.join(" | "))
    }

    fn invoke(
        &self,
        record_id: &str,
        label: &str,
        handler: &mut dyn ActionHandler,
    ) -> Result<ActionReceipt, ActionError> {
        self.invoke_action(record_id, label, handler)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct TableCursor {
    row: usize,
    column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct TableCursors {
    clients: TableCursor,
    reports: TableCursor,
    plans: TableCursor,
}

impl TableCursors {
    fn get(&self, tab: TabKind) -> Option<TableCursor> {
        match tab {
            TabKind::Clients => Some(self.clients),
            TabKind::Reports => Some(self.reports),
            TabKind::Plans => Some(self.plans),
            TabKind::Dashboard | TabKind::Calendar | TabKind::Settings => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TableCommand {
    MoveRow(isize),
    MoveColumn(isize),
    JumpFirstRow,
    JumpLastRow,
    CycleSort,
    ClearSort,
    NextPage,
    PrevPage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TableEvent {
    CursorUpdated,
    Status(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormChoiceKind {
    Risk,
    ClientStatus,
    Tier,
    AppointmentKind,
    Toggle,
}

impl FormChoiceKind {
    fn options(self) -> Vec<&'static str> {
        match self {
            Self::Risk => RiskProfile::ALL.iter().map(|value| value.as_str()).collect(),
            Self::ClientStatus => ClientStatus::ALL
                .iter()
                .map(|value| value.as_str())
                .collect(),
            Self::Tier => ServiceTier::ALL.iter().map(|value| value.as_str()).collect(),
            Self::AppointmentKind => AppointmentKind::ALL
                .iter()
                .map(|value| value.as_str())
                .collect(),
            Self::Toggle => vec!["yes", "no"],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FormFieldSpec {
    label: &'static str,
    choice: Option<FormChoiceKind>,
}

impl FormFieldSpec {
    const fn text(label: &'static str) -> Self {
        Self {
            label,
            choice: None,
        }
    }

    const fn choice(label: &'static str, kind: FormChoiceKind) -> Self {
        Self {
            label,
            choice: Some(kind),
        }
    }
}

const CLIENT_FORM: [FormFieldSpec; 9] = [
    FormFieldSpec::text("name"),
    FormFieldSpec::text("email"),
    FormFieldSpec::text("phone"),
    FormFieldSpec::text("advisor"),
    FormFieldSpec::text("AUM"),
    FormFieldSpec::choice("risk", FormChoiceKind::Risk),
    FormFieldSpec::choice("status", FormChoiceKind::ClientStatus),
    FormFieldSpec::choice("tier", FormChoiceKind::Tier),
    FormFieldSpec::text("joined"),
];

const APPOINTMENT_FORM: [FormFieldSpec; 6] = [
    FormFieldSpec::text("title"),
    FormFieldSpec::text("client"),
    FormFieldSpec::text("date"),
    FormFieldSpec::text("start"),
    FormFieldSpec::text("minutes"),
    FormFieldSpec::choice("kind", FormChoiceKind::AppointmentKind),
];

const SETTINGS_FORM: [FormFieldSpec; 8] = [
    FormFieldSpec::text("display name"),
    FormFieldSpec::text("email"),
    FormFieldSpec::text("phone"),
    FormFieldSpec::text("time zone"),
    FormFieldSpec::text("currency"),
    FormFieldSpec::choice("email alerts", FormChoiceKind::Toggle),
    FormFieldSpec::choice("sms alerts", FormChoiceKind::Toggle),
    FormFieldSpec::choice("weekly digest", FormChoiceKind::Toggle),
];

#[derive(Debug, Clone, PartialEq, Eq)]
struct FormUiState {
    kind: FormKind,
    values: Vec<String>,
    field_index: usize,
    submitting: Option<FormPayload>,
}

struct ViewData {
    options: UiOptions,
    revision: Option<u64>,
    clients: RecordBrowser<Client>,
    reports: RecordBrowser<Report>,
    plans: RecordBrowser<Plan>,
    appointments: Vec<Appointment>,
    settings: AccountSettings,
    summary: DashboardSummary,
    cursors: TableCursors,
    calendar_day: Date,
    form: Option<FormUiState>,
    submission: SubmissionSlot,
    armed_delete: Option<(TabKind, String)>,
    help_visible: bool,
    status_token: u64,
}

impl ViewData {
    fn new(options: UiOptions) -> Self {
        let config = |schema: &Schema| {
            BrowserConfig::from_schema(schema)
                .with_actions(TABLE_ACTIONS)
                .with_page_size(options.page_size)
        };
        Self {
            clients: RecordBrowser::with_config(
                Client::SCHEMA,
                config(&Client::SCHEMA),
                Vec::new(),
            ),
            reports: RecordBrowser::with_config(
                Report::SCHEMA,
                config(&Report::SCHEMA),
                Vec::new(),
            ),
            plans: RecordBrowser::with_config(Plan::SCHEMA, config(&Plan::SCHEMA), Vec::new()),
            revision: None,
            appointments: Vec::new(),
            settings: AccountSettings::default(),
            summary: DashboardSummary::default(),
            cursors: TableCursors::default(),
            calendar_day: options.today,
            form: None,
            submission: SubmissionSlot::default(),
            armed_delete: None,
            help_visible: false,
            status_token: 0,
            options,
        }
    }

    fn currency_symbol(&self) -> &str {
        let symbol = self.settings.currency_symbol.trim();
        if symbol.is_empty() {
            &self.options.currency_symbol
        } else {
            symbol
        }
    }
}

pub fn run_app<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    options: UiOptions,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::new(options);
    let (internal_tx, internal_rx) = mpsc::channel();

    if let Err(error) = refresh_view_data(runtime, &mut view_data) {
        state.dispatch(AppCommand::SetStatus(format!("load failed: {error:#}")));
    }

    let mut result = Ok(());
    loop {
        process_internal_events(state, runtime, &mut view_data, &internal_tx, &internal_rx);
        if let Err(error) = refresh_if_stale(runtime, &mut view_data) {
            emit_status(
                state,
                &mut view_data,
                &internal_tx,
                format!("reload failed: {error:#}"),
            );
        }

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = match event::poll(POLL_INTERVAL).context("poll event") {
            Ok(has_event) => has_event,
            Err(error) => {
                result = Err(error);
                break;
            }
        };
        if has_event {
            match event::read().context("read event") {
                Ok(Event::Key(key)) => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Ok(_) => {}
                Err(error) => {
                    result = Err(error);
                    break;
                }
            }
        }
    }

    view_data.submission.cancel();
    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        handle_internal_event(state, runtime, view_data, tx, event);
    }
}

fn handle_internal_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    event: InternalEvent,
) {
    match event {
        InternalEvent::ClearStatus { token } if token == view_data.status_token => {
            state.dispatch(AppCommand::ClearStatus);
        }
        InternalEvent::ClearStatus { .. } => {}
        InternalEvent::SubmissionReady { token } => {
            finish_submission(state, runtime, view_data, tx, token);
        }
    }
}

fn finish_submission<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    token: SubmissionToken,
) {
    if !view_data.submission.complete(token) {
        return;
    }
    let Some(payload) = view_data
        .form
        .as_mut()
        .and_then(|form| form.submitting.take())
    else {
        debug!(token = token.get(), "submission finished with no form open");
        return;
    };

    match runtime.submit_form(&payload) {
        Ok(()) => {
            dispatch_app(state, view_data, tx, AppCommand::ExitToNav);
            reload_with_status(
                state,
                runtime,
                view_data,
                tx,
                format!("{} saved", form_kind_label(payload.kind())),
            );
        }
        Err(error) => {
            emit_status(state, view_data, tx, format!("save failed: {error:#}"));
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_DELAY);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn dispatch_app(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    command: AppCommand,
) {
    let previous_tab = state.active_tab;
    let events = state.dispatch(command);
    for event in &events {
        match event {
            AppEvent::TabChanged(_) => {
                reset_table(view_data, previous_tab);
                view_data.armed_delete = None;
                unmount_form(view_data);
            }
            AppEvent::ModeChanged(AppMode::Nav) => unmount_form(view_data),
            _ => {}
        }
    }
    if events
        .iter()
        .any(|event| matches!(event, AppEvent::StatusUpdated(_)))
    {
        view_data.status_token = view_data.status_token.saturating_add(1);
        schedule_status_clear(internal_tx, view_data.status_token);
    }
}

fn unmount_form(view_data: &mut ViewData) {
    if view_data.submission.cancel() {
        debug!("pending save discarded on unmount");
    }
    view_data.form = None;
}

fn reset_table(view_data: &mut ViewData, tab: TabKind) {
    if let Some((pane, cursor)) = table_parts(view_data, tab) {
        pane.apply(BrowserCommand::ClearFilter);
        pane.apply(BrowserCommand::ClearSort);
        pane.apply(BrowserCommand::SetPage(0));
        *cursor = TableCursor::default();
    }
}

fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if view_data.help_visible {
        if key.code == KeyCode::Esc || key.code == KeyCode::Char('?') {
            view_data.help_visible = false;
        }
        return false;
    }

    match state.mode {
        AppMode::Filter => {
            handle_filter_key(state, view_data, internal_tx, key);
            return false;
        }
        AppMode::Form(_) => {
            handle_form_key(state, view_data, internal_tx, key);
            return false;
        }
        AppMode::Nav => {}
    }

    let armed = view_data.armed_delete.take();
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) => return true,
        (KeyCode::Tab, _) | (KeyCode::Char('f'), KeyModifiers::NONE) => {
            dispatch_app(state, view_data, internal_tx, AppCommand::NextTab);
        }
        (KeyCode::BackTab, _) | (KeyCode::Char('b'), KeyModifiers::NONE) => {
            dispatch_app(state, view_data, internal_tx, AppCommand::PrevTab);
        }
        (KeyCode::Char(ch), KeyModifiers::NONE) if ('1'..='6').contains(&ch) => {
            let index = usize::from(ch as u8 - b'1');
            if let Some(tab) = TabKind::ALL.get(index) {
                dispatch_app(state, view_data, internal_tx, AppCommand::SelectTab(*tab));
            }
        }
        (KeyCode::Char('?'), _) => view_data.help_visible = true,
        (KeyCode::Char('/'), _) => {
            dispatch_app(state, view_data, internal_tx, AppCommand::EnterFilter);
        }
        (KeyCode::Char('r'), KeyModifiers::NONE) => {
            reload_with_status(state, runtime, view_data, internal_tx, "reloaded".to_owned());
        }
        (KeyCode::Esc, _) => {
            state.dispatch(AppCommand::ClearStatus);
        }
        _ => match state.active_tab {
            tab if tab.is_table() => {
                handle_table_key(state, runtime, view_data, internal_tx, key, tab, armed);
            }
            TabKind::Calendar => handle_calendar_key(state, view_data, internal_tx, key),
            TabKind::Settings => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char('e')) {
                    open_form(state, view_data, internal_tx, FormKind::Settings);
                }
            }
            _ => {}
        },
    }
    false
}

fn handle_table_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
    tab: TabKind,
    armed: Option<(TabKind, String)>,
) {
    let command = match (key.code, key.modifiers) {
        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => TableCommand::MoveRow(1),
        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => TableCommand::MoveRow(-1),
        (KeyCode::Char('h'), _) | (KeyCode::Left, _) => TableCommand::MoveColumn(-1),
        (KeyCode::Char('l'), _) | (KeyCode::Right, _) => TableCommand::MoveColumn(1),
        (KeyCode::Char('g'), _) => TableCommand::JumpFirstRow,
        (KeyCode::Char('G'), _) => TableCommand::JumpLastRow,
        (KeyCode::Char('s'), KeyModifiers::NONE) => TableCommand::CycleSort,
        (KeyCode::Char('S'), _) => TableCommand::ClearSort,
        (KeyCode::Char('n'), KeyModifiers::NONE) | (KeyCode::PageDown, _) => {
            TableCommand::NextPage
        }
        (KeyCode::Char('p'), KeyModifiers::NONE) | (KeyCode::PageUp, _) => {
            TableCommand::PrevPage
        }
        (KeyCode::Enter, _) => {
            match selected_record_id(view_data, tab) {
                Some(record_id) => run_row_action(
                    state,
                    runtime,
                    view_data,
                    internal_tx,
                    tab,
                    &record_id,
                    VIEW_ACTION,
                ),
                None => emit_status(state, view_data, internal_tx, "no row selected"),
            }
            return;
        }
        (KeyCode::Char('d'), KeyModifiers::NONE) => {
            delete_selected(state, runtime, view_data, internal_tx, tab, armed);
            return;
        }
        (KeyCode::Char('a'), KeyModifiers::NONE) => {
            if tab == TabKind::Clients {
                open_form(state, view_data, internal_tx, FormKind::Client);
            } else {
                emit_status(state, view_data, internal_tx, "nothing to add here");
            }
            return;
        }
        _ => return,
    };

    if let TableEvent::Status(message) = apply_table_command(view_data, tab, command) {
        emit_status(state, view_data, internal_tx, message);
    }
}

fn delete_selected<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    tab: TabKind,
    armed: Option<(TabKind, String)>,
) {
    let Some(record_id) = selected_record_id(view_data, tab) else {
        emit_status(state, view_data, internal_tx, "no row selected");
        return;
    };
    if armed.as_ref() == Some(&(tab, record_id.clone())) {
        run_row_action(
            state,
            runtime,
            view_data,
            internal_tx,
            tab,
            &record_id,
            DELETE_ACTION,
        );
        return;
    }
    view_data.armed_delete = Some((tab, record_id.clone()));
    emit_status(
        state,
        view_data,
        internal_tx,
        format!("press d again to delete {record_id}"),
    );
}

fn run_row_action<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    tab: TabKind,
    record_id: &str,
    label: &str,
) {
    let currency_symbol = view_data.currency_symbol().to_owned();
    let Some(pane) = table_pane(view_data, tab) else {
        return;
    };
    let detail = pane.detail(record_id, &currency_symbol);
    let mut handler = |id: &str, action: &str| -> Result<()> {
        if action == DELETE_ACTION {
            runtime.apply_action(tab, id, action)
        } else {
            Ok(())
        }
    };
    let result = pane.invoke(record_id, label, &mut handler);

    match result {
        Ok(receipt) if receipt.action.destructive => {
            reload_with_status(
                state,
                runtime,
                view_data,
                internal_tx,
                format!("{} deleted", receipt.record_id),
            );
        }
        Ok(receipt) => {
            let message = detail.unwrap_or(receipt.record_id);
            emit_status(state, view_data, internal_tx, message);
        }
        Err(ActionError::RecordNotFound { record_id }) => {
            reload_with_status(
                state,
                runtime,
                view_data,
                internal_tx,
                format!("{record_id} no longer exists; view reloaded"),
            );
        }
        Err(error) => {
            warn!(%error, tab = tab.label(), "row action failed");
            emit_status(state, view_data, internal_tx, error.to_string());
        }
    }
}

fn handle_filter_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let tab = state.active_tab;
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => {
            set_table_filter(view_data, tab, None);
            dispatch_app(state, view_data, internal_tx, AppCommand::ExitToNav);
            emit_status(state, view_data, internal_tx, "filter cleared");
        }
        (KeyCode::Enter, _) => {
            dispatch_app(state, view_data, internal_tx, AppCommand::ExitToNav);
            let message = filter_summary(view_data, tab);
            emit_status(state, view_data, internal_tx, message);
        }
        (KeyCode::Backspace, _) => {
            let mut query = current_query(view_data, tab);
            query.pop();
            set_table_filter(view_data, tab, Some(query));
        }
        (KeyCode::Char(ch), modifiers) if !modifiers.contains(KeyModifiers::CONTROL) => {
            let mut query = current_query(view_data, tab);
            query.push(ch);
            set_table_filter(view_data, tab, Some(query));
        }
        _ => {}
    }
}

fn current_query(view_data: &ViewData, tab: TabKind) -> String {
    table_pane(view_data, tab)
        .map(|pane| pane.query().to_owned())
        .unwrap_or_default()
}

fn set_table_filter(view_data: &mut ViewData, tab: TabKind, query: Option<String>) {
    let Some((pane, cursor)) = table_parts(view_data, tab) else {
        return;
    };
    match query {
        Some(query) => pane.apply(BrowserCommand::SetFilter(query)),
        None => pane.apply(BrowserCommand::ClearFilter),
    };
    cursor.row = 0;
}

fn filter_summary(view_data: &ViewData, tab: TabKind) -> String {
    let Some(pane) = table_pane(view_data, tab) else {
        return "nav".to_owned();
    };
    let query = pane.query().trim();
    if query.is_empty() {
        return "filter cleared".to_owned();
    }
    format!(
        "{} of {} rows match {query:?}",
        pane.visible_count(),
        pane.total()
    )
}

fn handle_calendar_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let day = view_data.calendar_day;
    let target = match (key.code, key.modifiers) {
        (KeyCode::Char('h'), _) | (KeyCode::Left, _) => shift_days(day, -1),
        (KeyCode::Char('l'), _) | (KeyCode::Right, _) => shift_days(day, 1),
        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => shift_days(day, -7),
        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => shift_days(day, 7),
        (KeyCode::Char('['), _) => Some(add_months(day, -1)),
        (KeyCode::Char(']'), _) => Some(add_months(day, 1)),
        (KeyCode::Char('t'), KeyModifiers::NONE) => Some(view_data.options.today),
        (KeyCode::Char('a'), KeyModifiers::NONE) => {
            open_form(state, view_data, internal_tx, FormKind::Appointment);
            return;
        }
        _ => return,
    };
    if let Some(target) = target {
        view_data.calendar_day = target;
    }
}

fn shift_days(date: Date, days: i64) -> Option<Date> {
    date.checked_add(time::Duration::days(days))
}

fn open_form(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    kind: FormKind,
) {
    let values = form_values(kind, view_data);
    view_data.form = Some(FormUiState {
        kind,
        values,
        field_index: 0,
        submitting: None,
    });
    dispatch_app(state, view_data, internal_tx, AppCommand::OpenForm(kind));
}

fn handle_form_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Esc => {
            let discarded = view_data.submission.is_pending();
            dispatch_app(state, view_data, internal_tx, AppCommand::ExitToNav);
            let message = if discarded {
                "form closed; pending save discarded"
            } else {
                "form closed"
            };
            emit_status(state, view_data, internal_tx, message);
            return;
        }
        KeyCode::Enter => {
            submit_form(state, view_data, internal_tx);
            return;
        }
        _ => {}
    }

    let status = {
        let Some(form) = view_data.form.as_mut() else {
            return;
        };
        let field_count = form_field_specs(form.kind).len();
        match (key.code, key.modifiers) {
            (KeyCode::Tab, _) | (KeyCode::Down, _) => {
                form.field_index = (form.field_index + 1) % field_count;
                None
            }
            (KeyCode::BackTab, _) | (KeyCode::Up, _) => {
                form.field_index = (form.field_index + field_count - 1) % field_count;
                None
            }
            _ if form.submitting.is_some() => {
                Some("saving; esc discards the pending save".to_owned())
            }
            (KeyCode::Char(' '), _) if is_choice_field(form) => cycle_form_choice(form),
            (KeyCode::Backspace, _) => {
                if let Some(value) = form.values.get_mut(form.field_index) {
                    value.pop();
                }
                None
            }
            (KeyCode::Char(ch), modifiers) if !modifiers.contains(KeyModifiers::CONTROL) => {
                if is_choice_field(form) {
                    Some("space cycles the choices".to_owned())
                } else {
                    if let Some(value) = form.values.get_mut(form.field_index) {
                        value.push(ch);
                    }
                    None
                }
            }
            _ => None,
        }
    };
    if let Some(status) = status {
        emit_status(state, view_data, internal_tx, status);
    }
}

fn submit_form(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let Some(form) = view_data.form.as_ref() else {
        return;
    };
    if form.submitting.is_some() {
        emit_status(state, view_data, internal_tx, "already saving");
        return;
    }
    let payload = match form_payload(form, view_data.options.today)
        .and_then(|payload| payload.validate().map(|()| payload))
    {
        Ok(payload) => payload,
        Err(error) => {
            emit_status(
                state,
                view_data,
                internal_tx,
                format!("form invalid: {error:#}"),
            );
            return;
        }
    };

    let sender = internal_tx.clone();
    let delay = view_data.options.submit_delay;
    let started = view_data.submission.begin(delay, move |token| {
        let _ = sender.send(InternalEvent::SubmissionReady { token });
    });
    match started {
        Ok(_) => {
            if let Some(form) = view_data.form.as_mut() {
                form.submitting = Some(payload);
            }
            emit_status(state, view_data, internal_tx, "saving...");
        }
        Err(error) => {
            emit_status(
                state,
                view_data,
                internal_tx,
                format!("save failed: {error:#}"),
            );
        }
    }
}

fn form_field_specs(kind: FormKind) -> &'static [FormFieldSpec] {
    match kind {
        FormKind::Client => &CLIENT_FORM,
        FormKind::Appointment => &APPOINTMENT_FORM,
        FormKind::Settings => &SETTINGS_FORM,
    }
}

fn is_choice_field(form: &FormUiState) -> bool {
    form_field_specs(form.kind)
        .get(form.field_index)
        .is_some_and(|spec| spec.choice.is_some())
}

fn cycle_form_choice(form: &mut FormUiState) -> Option<String> {
    let spec = form_field_specs(form.kind).get(form.field_index)?;
    let options = spec.choice?.options();
    let value = form.values.get_mut(form.field_index)?;
    let next = options
        .iter()
        .position(|option| option.eq_ignore_ascii_case(value))
        .map_or(0, |position| (position + 1) % options.len());
    *value = options.get(next)?.to_string();
    Some(format!("{}: {value}", spec.label))
}

fn yes_no(flag: bool) -> String {
    if flag { "yes" } else { "no" }.to_owned()
}

fn form_values(kind: FormKind, view_data: &ViewData) -> Vec<String> {
    match kind {
        FormKind::Client => vec![
            String::new(),
            String::new(),
            String::new(),
            view_data.settings.display_name.clone(),
            String::new(),
            RiskProfile::Balanced.as_str().to_owned(),
            ClientStatus::Prospect.as_str().to_owned(),
            ServiceTier::Basic.as_str().to_owned(),
            format_date(Some(view_data.options.today)),
        ],
        FormKind::Appointment => vec![
            String::new(),
            String::new(),
            format_date(Some(view_data.calendar_day)),
            "09:00".to_owned(),
            "60".to_owned(),
            AppointmentKind::Meeting.as_str().to_owned(),
        ],
        FormKind::Settings => {
            let settings = &view_data.settings;
            vec![
                settings.display_name.clone(),
                settings.email.clone(),
                settings.phone.clone(),
                settings.time_zone.clone(),
                settings.currency_symbol.clone(),
                yes_no(settings.notifications.email),
                yes_no(settings.notifications.sms),
                yes_no(settings.notifications.weekly_digest),
            ]
        }
    }
}

fn parse_choice<T>(parse: fn(&str) -> Option<T>, value: &str, field: &str) -> Result<T> {
    parse(value).ok_or_else(|| {
        anyhow!("{field} {value:?} is not a known choice -- press space to cycle options")
    })
}

fn form_payload(form: &FormUiState, today: Date) -> Result<FormPayload> {
    let value = |index: usize| {
        form.values
            .get(index)
            .map(String::as_str)
            .unwrap_or_default()
    };
    match form.kind {
        FormKind::Client => Ok(FormPayload::Client(ClientFormInput {
            name: value(0).to_owned(),
            email: value(1).to_owned(),
            phone: value(2).to_owned(),
            advisor: value(3).to_owned(),
            aum_minor: parse_optional_money(value(4))
                .with_context(|| format!("AUM {:?}", value(4)))?,
            risk: parse_choice(RiskProfile::parse, value(5), "risk")?,
            status: parse_choice(ClientStatus::parse, value(6), "status")?,
            tier: parse_choice(ServiceTier::parse, value(7), "tier")?,
            joined_on: parse_optional_date(value(8))
                .with_context(|| format!("joined date {:?}", value(8)))?
                .unwrap_or(today),
        })),
        FormKind::Appointment => Ok(FormPayload::Appointment(AppointmentFormInput {
            title: value(0).to_owned(),
            client_name: value(1).to_owned(),
            date: parse_date(value(2)).with_context(|| format!("date {:?}", value(2)))?,
            start: parse_time(value(3)).with_context(|| format!("start {:?}", value(3)))?,
            duration_minutes: value(4).trim().parse::<u16>().with_context(|| {
                format!("minutes {:?} must be a whole number", value(4))
            })?,
            kind: parse_choice(AppointmentKind::parse, value(5), "kind")?,
        })),
        FormKind::Settings => Ok(FormPayload::Settings(SettingsFormInput {
            display_name: value(0).to_owned(),
            email: value(1).to_owned(),
            phone: value(2).to_owned(),
            time_zone: value(3).to_owned(),
            currency_symbol: value(4).to_owned(),
            notifications: NotificationPrefs {
                email: value(5) == "yes",
                sms: value(6) == "yes",
                weekly_digest: value(7) == "yes",
            },
        })),
    }
}

fn form_kind_label(kind: FormKind) -> &'static str {
    match kind {
        FormKind::Client => "client",
        FormKind::Appointment => "appointment",
        FormKind::Settings => "settings",
    }
}

fn form_title(kind: FormKind) -> &'static str {
    match kind {
        FormKind::Client => "new client",
        FormKind::Appointment => "new appointment",
        FormKind::Settings => "account settings",
    }
}

fn table_pane(view_data: &ViewData, tab: TabKind) -> Option<&dyn TablePane> {
    match tab {
        TabKind::Clients => Some(&view_data.clients as &dyn TablePane),
        TabKind::Reports => Some(&view_data.reports as &dyn TablePane),
        TabKind::Plans => Some(&view_data.plans as &dyn TablePane),
        TabKind::Dashboard | TabKind::Calendar | TabKind::Settings => None,
    }
}

fn table_parts(
    view_data: &mut ViewData,
    tab: TabKind,
) -> Option<(&mut dyn TablePane, &mut TableCursor)> {
    match tab {
        TabKind::Clients => Some((
            &mut view_data.clients as &mut dyn TablePane,
            &mut view_data.cursors.clients,
        )),
        TabKind::Reports => Some((
            &mut view_data.reports as &mut dyn TablePane,
            &mut view_data.cursors.reports,
        )),
        TabKind::Plans => Some((
            &mut view_data.plans as &mut dyn TablePane,
            &mut view_data.cursors.plans,
        )),
        TabKind::Dashboard | TabKind::Calendar | TabKind::Settings => None,
    }
}

fn selected_record_id(view_data: &ViewData, tab: TabKind) -> Option<String> {
    let cursor = view_data.cursors.get(tab)?;
    table_pane(view_data, tab)?.record_id_at(cursor.row)
}

fn apply_table_command(view_data: &mut ViewData, tab: TabKind, command: TableCommand) -> TableEvent {
    let Some((pane, cursor)) = table_parts(view_data, tab) else {
        return TableEvent::CursorUpdated;
    };
    let event = match command {
        TableCommand::MoveRow(delta) => {
            cursor.row = offset_index(cursor.row, delta, pane.page_len());
            TableEvent::CursorUpdated
        }
        TableCommand::MoveColumn(delta) => {
            cursor.column = offset_index(cursor.column, delta, pane.fields().len());
            TableEvent::CursorUpdated
        }
        TableCommand::JumpFirstRow => {
            cursor.row = 0;
            TableEvent::CursorUpdated
        }
        TableCommand::JumpLastRow => {
            cursor.row = pane.page_len().saturating_sub(1);
            TableEvent::CursorUpdated
        }
        TableCommand::CycleSort => cycle_sort(pane, cursor.column),
        TableCommand::ClearSort => {
            if pane
                .apply(BrowserCommand::ClearSort)
                .contains(&BrowserEvent::SortCleared)
            {
                TableEvent::Status("sort cleared".to_owned())
            } else {
                TableEvent::Status("no sort to clear".to_owned())
            }
        }
        TableCommand::NextPage => {
            cursor.row = 0;
            change_page(pane, BrowserCommand::NextPage, "already on the last page")
        }
        TableCommand::PrevPage => {
            cursor.row = 0;
            change_page(pane, BrowserCommand::PrevPage, "already on the first page")
        }
    };
    clamp_cursor(&*pane, cursor);
    event
}

fn cycle_sort(pane: &mut dyn TablePane, column: usize) -> TableEvent {
    let Some(spec) = pane.fields().get(column) else {
        return TableEvent::CursorUpdated;
    };
    if !spec.sortable {
        return TableEvent::Status(format!("{} is not sortable", spec.label));
    }
    let events = pane.apply(BrowserCommand::SetSort(spec.name.to_owned()));
    let direction = events.iter().find_map(|event| match event {
        BrowserEvent::SortChanged { direction, .. } => Some(*direction),
        _ => None,
    });
    match direction {
        Some(direction) => {
            TableEvent::Status(format!("sorted by {} {}", spec.label, direction.label()))
        }
        None => TableEvent::CursorUpdated,
    }
}

fn change_page(pane: &mut dyn TablePane, command: BrowserCommand, boundary: &str) -> TableEvent {
    let events = pane.apply(command);
    if events
        .iter()
        .any(|event| matches!(event, BrowserEvent::PageChanged(_)))
    {
        TableEvent::Status(format!("page {}/{}", pane.page() + 1, pane.pages()))
    } else {
        TableEvent::Status(boundary.to_owned())
    }
}

fn offset_index(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    current.saturating_add_signed(delta).min(len - 1)
}

fn clamp_cursor(pane: &dyn TablePane, cursor: &mut TableCursor) {
    cursor.row = cursor.row.min(pane.page_len().saturating_sub(1));
    cursor.column = cursor.column.min(pane.fields().len().saturating_sub(1));
}

fn clamp_table_cursors(view_data: &mut ViewData) {
    for tab in [TabKind::Clients, TabKind::Reports, TabKind::Plans] {
        if let Some((pane, cursor)) = table_parts(view_data, tab) {
            clamp_cursor(&*pane, cursor);
        }
    }
}

fn refresh_view_data<R: AppRuntime>(runtime: &mut R, view_data: &mut ViewData) -> Result<()> {
    let clients = runtime.load_clients().context("load clients")?;
    let reports = runtime.load_reports().context("load reports")?;
    let plans = runtime.load_plans().context("load plans")?;
    let appointments = runtime.load_appointments().context("load appointments")?;
    let settings = runtime.load_settings().context("load settings")?;

    view_data.summary = DashboardSummary::compute(
        &clients,
        &plans,
        &appointments,
        view_data.options.today,
        view_data.options.upcoming_days,
    );
    view_data.clients.replace_records(clients);
    view_data.reports.replace_records(reports);
    view_data.plans.replace_records(plans);
    view_data.appointments = appointments;
    view_data.settings = settings;
    view_data.revision = Some(runtime.revision()?);
    clamp_table_cursors(view_data);
    Ok(())
}

fn refresh_if_stale<R: AppRuntime>(runtime: &mut R, view_data: &mut ViewData) -> Result<()> {
    let revision = runtime.revision()?;
    if view_data.revision != Some(revision) {
        debug!(revision, "store revision moved; re-fetching");
        refresh_view_data(runtime, view_data)?;
    }
    Ok(())
}

fn reload_with_status<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: String,
) {
    match refresh_view_data(runtime, view_data) {
        Ok(()) => emit_status(state, view_data, internal_tx, message),
        Err(error) => emit_status(
            state,
            view_data,
            internal_tx,
            format!("reload failed: {error:#}"),
        ),
    }
}

fn tab_title(tab: TabKind, view_data: &ViewData) -> String {
    let filtered = table_pane(view_data, tab).is_some_and(|pane| !pane.query().trim().is_empty());
    if filtered {
        format!(" {} {FILTER_MARK} ", tab.label())
    } else {
        format!(" {} ", tab.label())
    }
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let selected = TabKind::ALL
        .iter()
        .position(|tab| *tab == state.active_tab)
        .unwrap_or(0);
    let tab_titles = TabKind::ALL
        .iter()
        .map(|tab| tab_title(*tab, view_data))
        .collect::<Vec<String>>();
    let tabs = Tabs::new(tab_titles)
        .block(Block::default().title("wealthdesk").borders(Borders::ALL))
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .select(selected);
    frame.render_widget(tabs, layout[0]);

    match state.active_tab {
        TabKind::Dashboard => {
            let body = Paragraph::new(render_dashboard_text(
                &view_data.summary,
                view_data.currency_symbol(),
                view_data.options.upcoming_days,
            ))
            .block(Block::default().borders(Borders::ALL).title("dashboard"));
            frame.render_widget(body, layout[1]);
        }
        TabKind::Calendar => {
            let body = Paragraph::new(render_calendar_view(view_data))
                .block(Block::default().borders(Borders::ALL).title("calendar"));
            frame.render_widget(body, layout[1]);
        }
        TabKind::Settings => {
            let body = Paragraph::new(render_settings_text(&view_data.settings))
                .block(Block::default().borders(Borders::ALL).title("settings"));
            frame.render_widget(body, layout[1]);
        }
        tab => render_table(frame, layout[1], tab, view_data),
    }

    let status_widget = Paragraph::new(status_text(state))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status_widget, layout[2]);

    if let Some(form) = &view_data.form {
        let area = centered_rect(60, 60, frame.area());
        frame.render_widget(Clear, area);
        let overlay = Paragraph::new(render_form_text(form)).block(
            Block::default()
                .title(form_title(form.kind))
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(overlay, area);
    }

    if view_data.help_visible {
        let area = centered_rect(80, 60, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn render_table(frame: &mut ratatui::Frame<'_>, area: Rect, tab: TabKind, view_data: &ViewData) {
    let (Some(pane), Some(cursor)) = (table_pane(view_data, tab), view_data.cursors.get(tab))
    else {
        return;
    };
    let title = table_title(tab, pane);
    if let Some(empty) = pane.empty() {
        let widget = Paragraph::new(empty.message())
            .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(widget, area);
        return;
    }

    let fields = pane.fields();
    let sort = pane.sort();
    let header = Row::new(
        fields
            .iter()
            .map(|spec| header_label(spec, sort))
            .chain(iter::once("flags".to_owned()))
            .map(|label| {
                Cell::from(label).style(
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )
            }),
    );

    let rows = pane
        .page_rows(view_data.currency_symbol())
        .into_iter()
        .enumerate()
        .map(|(row_index, row)| {
            let selected_row = row_index == cursor.row;
            let mut cells = row
                .cells
                .into_iter()
                .enumerate()
                .map(|(column_index, text)| {
                    let mut style = Style::default();
                    if selected_row {
                        style = style.bg(Color::DarkGray);
                    }
                    if selected_row && column_index == cursor.column {
                        style = Style::default()
                            .fg(Color::Black)
                            .bg(Color::Cyan)
                            .add_modifier(Modifier::BOLD);
                    }
                    Cell::from(text).style(style)
                })
                .collect::<Vec<_>>();
            cells.push(badge_cell(&row.badges));
            Row::new(cells)
        });

    let widths = vec![Constraint::Min(6); fields.len() + 1];
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(table, area);
}

fn header_label(spec: &FieldSpec, sort: Option<(&str, SortDirection)>) -> String {
    match sort {
        Some((field, direction)) if field == spec.name => {
            let mark = match direction {
                SortDirection::Asc => SORT_MARK_ASC,
                SortDirection::Desc => SORT_MARK_DESC,
            };
            format!("{} {mark}", spec.label)
        }
        _ => spec.label.to_owned(),
    }
}

fn badge_cell(badges: &[Badge]) -> Cell<'static> {
    let label = badges
        .iter()
        .map(|badge| badge.label.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let color = badges
        .first()
        .map_or(Color::Gray, |badge| tone_color(badge.tone));
    Cell::from(label).style(Style::default().fg(color))
}

fn tone_color(tone: BadgeTone) -> Color {
    match tone {
        BadgeTone::Positive => Color::Green,
        BadgeTone::Neutral => Color::Gray,
        BadgeTone::Warning => Color::Yellow,
        BadgeTone::Negative => Color::Red,
    }
}

fn table_title(tab: TabKind, pane: &dyn TablePane) -> String {
    let mut title = format!("{} {}/{}", tab.label(), pane.visible_count(), pane.total());
    if let Some((field, direction)) = pane.sort() {
        title.push_str(&format!(" | sort {field} {}", direction.label()));
    }
    let query = pane.query();
    if !query.trim().is_empty() {
        title.push_str(&format!(" | filter {query:?}"));
    }
    if pane.pages() > 1 {
        title.push_str(&format!(" | page {}/{}", pane.page() + 1, pane.pages()));
    }
    title
}

fn render_dashboard_text(
    summary: &DashboardSummary,
    currency_symbol: &str,
    upcoming_days: i64,
) -> String {
    let mut lines = vec![
        format!(
            "AUM under advice: {}",
            format_compact_money(summary.total_aum_minor, currency_symbol)
        ),
        format!(
            "clients: {} active | {} prospect | {} inactive",
            summary.active_clients, summary.prospect_clients, summary.inactive_clients
        ),
        String::new(),
        "AUM by risk profile".to_owned(),
    ];
    if summary.aum_by_risk.is_empty() {
        lines.push("  none".to_owned());
    }
    for exposure in &summary.aum_by_risk {
        lines.push(format!(
            "  {:<13} {:>10}  {} clients",
            exposure.risk.as_str(),
            format_compact_money(exposure.aum_minor, currency_symbol),
            exposure.clients
        ));
    }

    lines.push(String::new());
    lines.push("plans needing attention".to_owned());
    if summary.plans_needing_attention.is_empty() {
        lines.push("  none".to_owned());
    }
    for plan in &summary.plans_needing_attention {
        lines.push(format!(
            "  {} ({}) {}",
            plan.name,
            plan.client_name,
            plan.status.as_str()
        ));
    }

    lines.push(String::new());
    lines.push(format!("upcoming, next {upcoming_days} days"));
    if summary.upcoming.is_empty() {
        lines.push("  none".to_owned());
    }
    for appointment in &summary.upcoming {
        lines.push(format!(
            "  {} {} {} - {}",
            format_date(Some(appointment.date)),
            format_time(appointment.start),
            appointment.title,
            appointment.client_name
        ));
    }
    lines.join("\n")
}

fn render_calendar_view(view_data: &ViewData) -> String {
    match MonthGrid::containing(
        view_data.calendar_day,
        view_data.options.week_start,
        view_data.options.today,
    ) {
        Some(grid) => render_calendar_text(&grid, &view_data.appointments, view_data.calendar_day),
        None => "calendar unavailable for this date".to_owned(),
    }
}

fn render_calendar_text(grid: &MonthGrid, appointments: &[Appointment], selected: Date) -> String {
    let buckets = bucket_appointments(grid, appointments);
    let mut lines = vec![
        grid.title(),
        String::new(),
        grid.weekday_labels()
            .iter()
            .map(|label| format!(" {label:<4} "))
            .collect::<String>()
            .trim_end()
            .to_owned(),
    ];
    for week in grid.weeks() {
        let line = week
            .iter()
            .map(|cell| {
                let day = if cell.in_month {
                    format!("{:>2}", cell.date.day())
                } else {
                    "··".to_owned()
                };
                let mark = if cell.today {
                    '*'
                } else if buckets.contains_key(&cell.date) {
                    '•'
                } else {
                    ' '
                };
                let (open, close) = if cell.date == selected {
                    ('[', ']')
                } else {
                    (' ', ' ')
                };
                format!("{open}{day}{mark}{close} ")
            })
            .collect::<String>();
        lines.push(line.trim_end().to_owned());
    }

    lines.push(String::new());
    lines.push(format!("agenda {}", format_date(Some(selected))));
    match buckets.get(&selected) {
        Some(day) => {
            for appointment in day {
                lines.push(format!(
                    "  {} {}m {} - {} ({})",
                    format_time(appointment.start),
                    appointment.duration_minutes,
                    appointment.title,
                    appointment.client_name,
                    appointment.kind.as_str()
                ));
            }
        }
        None => lines.push("  no appointments".to_owned()),
    }
    lines.join("\n")
}

fn render_settings_text(settings: &AccountSettings) -> String {
    let value = |text: &str| {
        if text.trim().is_empty() {
            "-".to_owned()
        } else {
            text.to_owned()
        }
    };
    let on = |flag: bool| if flag { "on" } else { "off" };
    [
        format!("display name:  {}", value(&settings.display_name)),
        format!("email:         {}", value(&settings.email)),
        format!("phone:         {}", value(&settings.phone)),
        format!("time zone:     {}", value(&settings.time_zone)),
        format!("currency:      {}", value(&settings.currency_symbol)),
        format!("email alerts:  {}", on(settings.notifications.email)),
        format!("sms alerts:    {}", on(settings.notifications.sms)),
        format!("weekly digest: {}", on(settings.notifications.weekly_digest)),
        String::new(),
        "enter or e to edit".to_owned(),
    ]
    .join("\n")
}

fn render_form_text(form: &FormUiState) -> String {
    let mut lines = form_field_specs(form.kind)
        .iter()
        .enumerate()
        .map(|(index, spec)| {
            let focused = index == form.field_index;
            let cursor = if focused { ">" } else { " " };
            let value = form
                .values
                .get(index)
                .map(String::as_str)
                .unwrap_or_default();
            let hint = if focused && spec.choice.is_some() {
                "  (space cycles)"
            } else {
                ""
            };
            format!("{cursor} {:<14} {value}{hint}", format!("{}:", spec.label))
        })
        .collect::<Vec<_>>();
    lines.push(String::new());
    lines.push(if form.submitting.is_some() {
        "saving... esc discards".to_owned()
    } else {
        "enter save | tab next field | esc cancel".to_owned()
    });
    lines.join("\n")
}

fn status_text(state: &AppState) -> String {
    let (mode, hints) = match state.mode {
        AppMode::Nav => ("NAV", nav_hints(state.active_tab)),
        AppMode::Filter => ("FILTER", "type to filter | enter keep | esc clear"),
        AppMode::Form(_) => (
            "FORM",
            "tab/shift+tab field | space cycle | enter save | esc cancel",
        ),
    };
    match &state.status_line {
        Some(status) => format!("{mode} | {status} | {hints}"),
        None => format!("{mode} | {hints}"),
    }
}

fn nav_hints(tab: TabKind) -> &'static str {
    match tab {
        TabKind::Dashboard => "f/b or 1-6 tabs | r reload | ? help | q quit",
        TabKind::Clients => {
            "j/k/h/l | s/S sort | / filter | n/p page | enter view | d delete | a add | ? help"
        }
        TabKind::Reports | TabKind::Plans => {
            "j/k/h/l | s/S sort | / filter | n/p page | enter view | d delete | ? help"
        }
        TabKind::Calendar => "h/l day | j/k week | [/] month | t today | a add | ? help",
        TabKind::Settings => "enter edit | f/b tabs | ? help | q quit",
    }
}

fn help_overlay_text() -> &'static str {
    "global: ctrl+q quit | q quit (nav) | f/b or tab/shift+tab tabs | 1-6 jump to tab | r reload | ? help\n\
tables: j/k rows | h/l columns | g/G first/last | s sort column (again flips) | S clear sort\n\
tables: / filter | n/p or pgdn/pgup page | enter view | d d delete | a add client\n\
filter: type to narrow | backspace | enter keep | esc clear\n\
calendar: h/l day | j/k week | [/] month | t today | a add appointment\n\
settings: enter or e edit\n\
form: tab/shift+tab field | space cycle choice | enter save | esc cancel (discards a pending save)"
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
