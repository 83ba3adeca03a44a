mod scenario;
mod snapshot;
mod stage;
mod stages;
pub mod ui;
mod widgets;

pub use scenario::{confirmation_target, FIELD_TOKEN, Layout, Scenario};
pub use snapshot::{Snapshot, TERMINAL_STAGE_VALUE};
pub use stage::{Stage, StageIndex};
pub use stages::StageSet;
pub use widgets::StatusBarState;

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::client::{ObjectMetadata, PicklistEntry, PlatformClient, RecordData};
use crate::config::PathConfig;
use crate::error::{StagePathError, GENERIC_ERROR};
use crate::ui::Theme;

/// Result of one asynchronous load or write, tagged with the configuration
/// epoch that spawned it. Stale epochs are discarded on arrival.
#[derive(Debug)]
pub enum DataEvent {
    Record(u64, Result<RecordData, String>),
    Metadata(u64, Result<ObjectMetadata, String>),
    Picklist(u64, Result<Vec<PicklistEntry>, String>),
    UpdateDone(u64, Result<(), String>),
}

/// Actions the app hands back to the main loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathAction {
    /// Confirm the pending action (dispatch the field update)
    Confirm,
    /// Drop loaded data and re-fetch everything
    Reload,
    /// Leave the application
    Quit,
}

/// Message displayed to the user
pub struct Message {
    pub text: String,
    pub is_error: bool,
}

impl Message {
    fn info(text: String) -> Self {
        Self {
            text,
            is_error: false,
        }
    }

    fn error(text: String) -> Self {
        Self {
            text,
            is_error: true,
        }
    }
}

const SPINNER_FRAMES: [char; 4] = ['|', '/', '-', '\\'];

/// Main path component state.
///
/// The three loads (record, object metadata, picklist values) may finish in
/// any order; scenario resolution only runs once all three have delivered for
/// the current epoch. The active scenario is always derived from a fresh
/// snapshot, never cached.
pub struct PathApp {
    pub config: PathConfig,
    pub theme: Theme,

    client: Arc<dyn PlatformClient>,
    tx: mpsc::UnboundedSender<DataEvent>,
    epoch: u64,

    // Loaded data for the current epoch
    record: Option<RecordData>,
    metadata: Option<ObjectMetadata>,
    stages: Option<StageSet>,
    picklist_requested: bool,

    // Interaction state
    pub selected_value: Option<String>,
    pub cursor: usize,
    pub is_updating: bool,
    pub halted: bool,

    // UI state
    pub message: Option<Message>,
    pub show_help: bool,
    pub status_bar: StatusBarState,
    spinner_frame: usize,
}

impl PathApp {
    pub fn new(
        config: PathConfig,
        client: Arc<dyn PlatformClient>,
    ) -> (Self, mpsc::UnboundedReceiver<DataEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();

        let app = Self {
            config,
            theme: Theme::default(),
            client,
            tx,
            epoch: 0,
            record: None,
            metadata: None,
            stages: None,
            picklist_requested: false,
            selected_value: None,
            cursor: 0,
            is_updating: false,
            halted: false,
            message: None,
            show_help: false,
            status_bar: StatusBarState::loading(),
            spinner_frame: 0,
        };

        (app, rx)
    }

    /// Invalidate everything in flight and re-fetch record and metadata.
    ///
    /// The picklist load follows once a record type can be resolved.
    pub fn reload(&mut self) {
        self.epoch += 1;
        self.record = None;
        self.metadata = None;
        self.stages = None;
        self.picklist_requested = false;
        self.selected_value = None;
        self.halted = false;
        self.message = None;
        self.status_bar = StatusBarState::loading();

        debug!("Reload: epoch {}", self.epoch);
        self.spawn_record_fetch();
        self.spawn_metadata_fetch();
    }

    fn spawn_record_fetch(&self) {
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        let epoch = self.epoch;
        let record_id = self.config.record_id.clone();
        let fields = vec![self.config.field_api_name().to_string()];

        tokio::spawn(async move {
            let result = client
                .fetch_record(&record_id, &fields)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(DataEvent::Record(epoch, result));
        });
    }

    fn spawn_metadata_fetch(&self) {
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        let epoch = self.epoch;
        let object = self.config.object_api_name.clone();

        tokio::spawn(async move {
            let result = client
                .fetch_object_metadata(&object)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(DataEvent::Metadata(epoch, result));
        });
    }

    fn spawn_picklist_fetch(&mut self) {
        // Needs a record type: the record's own, else the object default
        let (Some(record), Some(metadata)) = (self.record.as_ref(), self.metadata.as_ref())
        else {
            return;
        };
        if self.picklist_requested {
            return;
        }
        self.picklist_requested = true;

        let record_type_id = record
            .record_type_id
            .clone()
            .unwrap_or_else(|| metadata.default_record_type_id.clone());
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        let epoch = self.epoch;
        let object = self.config.object_api_name.clone();
        let field = self.config.field_api_name().to_string();

        tokio::spawn(async move {
            let result = client
                .fetch_picklist_values(&object, &record_type_id, &field)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(DataEvent::Picklist(epoch, result));
        });
    }

    /// Apply one asynchronous result. Results tagged with a stale epoch are
    /// dropped so a late response cannot overwrite current state.
    pub fn apply_event(&mut self, event: DataEvent) {
        match event {
            DataEvent::Record(epoch, result) => {
                if epoch != self.epoch {
                    debug!("Discarding stale record result (epoch {})", epoch);
                    return;
                }
                match result {
                    Ok(data) => {
                        self.record = Some(data);
                        self.spawn_picklist_fetch();
                    }
                    Err(detail) => self.fail_load("record", detail),
                }
            }
            DataEvent::Metadata(epoch, result) => {
                if epoch != self.epoch {
                    debug!("Discarding stale metadata result (epoch {})", epoch);
                    return;
                }
                match result {
                    Ok(data) => {
                        self.metadata = Some(data);
                        self.spawn_picklist_fetch();
                    }
                    Err(detail) => self.fail_load("object metadata", detail),
                }
            }
            DataEvent::Picklist(epoch, result) => {
                if epoch != self.epoch {
                    debug!("Discarding stale picklist result (epoch {})", epoch);
                    return;
                }
                match result {
                    Ok(entries) => self.install_picklist(&entries),
                    Err(detail) => self.fail_load("picklist values", detail),
                }
            }
            DataEvent::UpdateDone(epoch, result) => {
                // Always release the guard, even for a stale epoch
                self.is_updating = false;
                match result {
                    Ok(()) => {
                        if epoch == self.epoch {
                            self.reload();
                        }
                    }
                    Err(detail) => {
                        // No rollback of the optimistic reset; the next
                        // refresh converges state
                        let text = if detail.trim().is_empty() {
                            GENERIC_ERROR.to_string()
                        } else {
                            StagePathError::Update(detail).to_string()
                        };
                        warn!("Update failed: {}", text);
                        self.message = Some(Message::error(text));
                    }
                }
            }
        }
        self.update_status_bar();
    }

    fn install_picklist(&mut self, entries: &[PicklistEntry]) {
        if entries.is_empty() {
            let err = StagePathError::UnavailablePicklistField(
                self.config.field_api_name().to_string(),
            );
            warn!("{}", err);
            self.message = Some(Message::error(err.to_string()));
            self.halted = true;
            return;
        }

        let set = StageSet::from_picklist(entries, &self.config);
        if let Err(err) = set.validate() {
            warn!("{}", err);
            self.message = Some(Message::error(err.to_string()));
            self.halted = true;
        }
        self.stages = Some(set);
        self.cursor = self.initial_cursor();
    }

    fn initial_cursor(&self) -> usize {
        let current = self.current_value();
        self.display_path()
            .iter()
            .position(|stage| stage.equals(current.as_deref()))
            .unwrap_or(0)
    }

    fn fail_load(&mut self, kind: &'static str, detail: String) {
        // Generic fallback only when the failure carries no detail
        let text = if detail.trim().is_empty() {
            GENERIC_ERROR.to_string()
        } else {
            StagePathError::DataLoad { kind, detail }.to_string()
        };
        warn!("Load failed: {}", text);
        self.message = Some(Message::error(text));
        self.halted = true;
    }

    /// All three loads have delivered and nothing halted interaction
    pub fn is_ready(&self) -> bool {
        self.record.is_some() && self.metadata.is_some() && self.stages.is_some() && !self.halted
    }

    pub fn is_loading(&self) -> bool {
        !self.is_ready() && !self.halted
    }

    /// The record's stored value for the tracked field
    pub fn current_value(&self) -> Option<String> {
        self.record
            .as_ref()
            .and_then(|record| record.field(self.config.field_api_name()))
            .map(str::to_string)
    }

    /// Fresh snapshot of the progression; None until the barrier is met
    pub fn snapshot(&self) -> Option<Snapshot> {
        if !self.is_ready() {
            return None;
        }
        let stages = self.stages.as_ref()?;
        let current = self.current_value();
        Some(Snapshot::new(
            stages.is_closed(current.as_deref()),
            self.selected_value.clone(),
            current,
        ))
    }

    /// The active scenario, derived on every call
    pub fn scenario(&self) -> Option<Scenario> {
        self.snapshot().as_ref().and_then(Scenario::resolve)
    }

    pub fn display_path(&self) -> Vec<Stage> {
        match self.stages.as_ref() {
            Some(stages) => stages.display_path(self.current_value().as_deref()),
            None => Vec::new(),
        }
    }

    /// Stage matching the record's value, placeholder when nothing matches
    pub fn current_stage(&self) -> Stage {
        match self.stages.as_ref() {
            Some(stages) => stages.current_stage(self.current_value().as_deref()),
            None => Stage::missing(),
        }
    }

    /// Human-readable label of the tracked field
    pub fn field_label(&self) -> String {
        let api_name = self.config.field_api_name();
        match self.metadata.as_ref() {
            Some(metadata) => metadata.field_label(api_name).to_string(),
            None => api_name.to_string(),
        }
    }

    /// Caption for the action button; None when hidden or no scenario applies
    pub fn action_caption(&self) -> Option<String> {
        if self.config.hide_update_button {
            return None;
        }
        let scenario = self.scenario()?;
        Some(scenario.layout().render_action_caption(&self.field_label()))
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<PathAction> {
        // Clear message on any key (unless an update is running)
        if self.message.is_some() && !self.is_updating {
            self.message = None;
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?')) {
                self.show_help = false;
            }
            self.update_status_bar();
            return None;
        }

        let result = match key.code {
            KeyCode::Char('q') => Some(PathAction::Quit),
            KeyCode::Esc => {
                if self.selected_value.is_some() {
                    self.selected_value = None;
                    None
                } else {
                    Some(PathAction::Quit)
                }
            }
            KeyCode::Char('?') | KeyCode::F(1) => {
                self.show_help = true;
                None
            }
            KeyCode::Char('r') => Some(PathAction::Reload),

            // Cursor movement along the path
            KeyCode::Char('h') | KeyCode::Left => {
                self.move_cursor_left();
                None
            }
            KeyCode::Char('l') | KeyCode::Right => {
                self.move_cursor_right();
                None
            }

            // Quick jump by number
            KeyCode::Char(c) if c.is_ascii_digit() => {
                if let Some(idx) = c.to_digit(10).map(|n| n as usize) {
                    if idx >= 1 && idx <= self.display_path().len() {
                        self.cursor = idx - 1;
                    }
                }
                None
            }

            // Select the stage under the cursor
            KeyCode::Char(' ') => {
                self.select_stage_under_cursor();
                None
            }

            // Confirm the pending action
            KeyCode::Enter => Some(PathAction::Confirm),

            _ => None,
        };

        self.update_status_bar();
        result
    }

    fn move_cursor_left(&mut self) {
        if self.is_ready() && self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    fn move_cursor_right(&mut self) {
        let len = self.display_path().len();
        if self.is_ready() && len > 0 && self.cursor < len - 1 {
            self.cursor += 1;
        }
    }

    /// Clicking a stage. The terminal entry always selects the sentinel, a
    /// real stage selects its value; clicking the selected stage again
    /// deselects it.
    fn select_stage_under_cursor(&mut self) {
        if !self.is_ready() || self.halted {
            return;
        }
        let path = self.display_path();
        let Some(stage) = path.get(self.cursor) else {
            return;
        };

        let clicked = if self.cursor == path.len() - 1 {
            Some(TERMINAL_STAGE_VALUE.to_string())
        } else {
            stage.value().map(str::to_string)
        };

        if clicked == self.selected_value {
            self.selected_value = None;
        } else {
            self.selected_value = clicked;
        }
    }

    /// Produce the single field update for the active scenario.
    ///
    /// The local selection is reset immediately on dispatch; the refresh after
    /// the write converges state. A second confirmation while one is in
    /// flight is rejected.
    pub fn dispatch_update(&mut self) {
        if self.config.hide_update_button || self.halted {
            return;
        }
        if self.is_updating {
            self.message = Some(Message::info("An update is already in flight".to_string()));
            return;
        }
        let Some(snapshot) = self.snapshot() else {
            return;
        };
        let Some(scenario) = Scenario::resolve(&snapshot) else {
            return;
        };
        let Some(stages) = self.stages.as_ref() else {
            return;
        };
        let Some(target) = confirmation_target(scenario, &snapshot, stages) else {
            return;
        };

        // Optimistic reset before the write resolves
        self.selected_value = None;
        self.is_updating = true;
        self.update_status_bar();

        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        let epoch = self.epoch;
        let record_id = self.config.record_id.clone();
        let field = self.config.field_api_name().to_string();

        info!("Updating {}.{} -> {}", record_id, field, target);
        tokio::spawn(async move {
            let result = client
                .update_record(&record_id, &field, &target)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(DataEvent::UpdateDone(epoch, result));
        });
    }

    pub fn tick(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }

    pub fn spinner_char(&self) -> char {
        SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()]
    }

    fn update_status_bar(&mut self) {
        self.status_bar = if self.show_help {
            StatusBarState::help()
        } else if self.is_updating {
            StatusBarState::updating()
        } else if self.halted {
            StatusBarState::halted()
        } else if !self.is_ready() {
            StatusBarState::loading()
        } else if self.selected_value.is_some() {
            StatusBarState::stage_selected()
        } else if self.scenario().is_none() {
            StatusBarState::closed()
        } else {
            StatusBarState::browsing()
        };
    }
}
