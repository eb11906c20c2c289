use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use jiff::Timestamp;
use propcalc_core::CalculatorType;
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Direction, Layout},
    widgets::ListState,
};
use web_time::Instant;

use crate::bridge::FormBridge;
use crate::config::AppConfig;
use crate::controller::{ComparisonController, ExportFile};
use crate::form::FormState;
use crate::platform::{BackgroundPersistence, FilePersistence};
use crate::ui::{self, ComparisonPanel};

/// Longest wait for input before timers are re-checked
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Longest scenario name accepted by the prompt
const MAX_NAME_LEN: usize = 40;

pub struct App {
    controller: ComparisonController<BackgroundPersistence, FormState>,
    comparison_panel: ComparisonPanel,
    list_state: ListState,
    /// Text typed into the name prompt while it is open
    naming: Option<String>,
    data_dir: PathBuf,
    exit: bool,
}

impl App {
    pub fn new(data_dir: PathBuf, config: &AppConfig, calculator: CalculatorType) -> Self {
        let persistence = BackgroundPersistence::new(FilePersistence::new(&data_dir));
        let controller =
            ComparisonController::new(persistence, FormState::new(calculator), config);

        let mut app = Self {
            controller,
            comparison_panel: ComparisonPanel::default(),
            list_state: ListState::default(),
            naming: None,
            data_dir,
            exit: false,
        };
        app.sync_view();
        app
    }

    /// runs the application's main loop until the user quits
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        while !self.exit {
            terminal.draw(|frame| self.draw(frame))?;

            let timeout = self
                .controller
                .next_deadline(Instant::now())
                .map_or(IDLE_POLL, |due| due.min(IDLE_POLL));
            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key, Instant::now());
                    }
                }
            }

            if self.controller.tick(Instant::now()) {
                self.sync_view();
            }
        }
        Ok(())
    }

    /// Write pending scenarios and stop the persistence worker
    pub fn shutdown(self) {
        self.controller.teardown();
    }

    fn draw(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(2)])
            .split(frame.area());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(chunks[0]);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(12), Constraint::Length(6)])
            .split(columns[0]);

        ui::form_panel::render(
            frame,
            left[0],
            self.controller.form(),
            self.controller.preview(),
            self.naming.is_none() && !self.controller.clear_pending(),
        );
        let store = self.controller.store();
        ui::scenario_list::render(
            frame,
            left[1],
            store.list(),
            store.config().max_scenarios,
            &mut self.list_state,
        );
        self.comparison_panel.render(frame, columns[1]);
        ui::status_bar::render(frame, chunks[1], self.controller.notification());

        if self.controller.clear_pending() {
            let message = format!("Remove all {} scenarios?", store.len());
            ui::modal::render_confirm(frame, frame.area(), "Clear all", &message);
        } else if let Some(name) = &self.naming {
            ui::modal::render_name_prompt(frame, frame.area(), name);
        }
    }

    /// Bring the retained comparison and the list selection up to date
    fn sync_view(&mut self) {
        self.controller.present(&mut self.comparison_panel);

        let len = self.controller.store().len();
        let selected = match self.list_state.selected() {
            _ if len == 0 => None,
            Some(i) => Some(i.min(len - 1)),
            None => Some(0),
        };
        self.list_state.select(selected);
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if ctrl && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('c')) {
            self.exit = true;
            return;
        }

        if self.controller.clear_pending() {
            self.handle_confirm_key(key);
        } else if self.naming.is_some() {
            self.handle_name_key(key);
        } else if ctrl {
            self.handle_command_key(key);
        } else {
            self.handle_form_key(key, now);
        }
        self.sync_view();
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => self.controller.confirm_clear(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.controller.cancel_clear()
            }
            _ => {}
        }
    }

    fn handle_name_key(&mut self, key: KeyEvent) {
        let Some(name) = self.naming.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Enter => {
                let name = std::mem::take(name);
                self.naming = None;
                if self.controller.add_current(&name).is_some() {
                    self.list_state.select(Some(self.controller.store().len() - 1));
                }
            }
            KeyCode::Esc => self.naming = None,
            KeyCode::Backspace => {
                name.pop();
            }
            KeyCode::Char(c) if name.chars().count() < MAX_NAME_LEN => name.push(c),
            _ => {}
        }
    }

    fn handle_command_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('t') => {
                self.controller.form_mut().cycle_calculator();
                self.controller.refresh_preview();
                tracing::debug!(
                    calculator = %self.controller.form().calculator_type(),
                    "Switched calculator"
                );
            }
            KeyCode::Char('l') => {
                self.controller.request_clear();
            }
            KeyCode::Char('e') => {
                let file = self.controller.export_json(Timestamp::now());
                self.write_export(file);
            }
            KeyCode::Char('x') => {
                let file = self.controller.export_csv(Timestamp::now());
                self.write_export(file);
            }
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Tab => self.controller.form_mut().focus_next(),
            KeyCode::BackTab => self.controller.form_mut().focus_prev(),
            KeyCode::Up => self.list_state.select_previous(),
            KeyCode::Down => self.list_state.select_next(),
            KeyCode::Enter => self.naming = Some(String::new()),
            KeyCode::Delete => {
                let selected = self
                    .list_state
                    .selected()
                    .and_then(|i| self.controller.store().list().get(i))
                    .map(|s| s.id);
                if let Some(id) = selected {
                    self.controller.remove(id);
                }
            }
            KeyCode::Esc => {
                self.controller.dismiss_notification();
            }
            KeyCode::Backspace => {
                if self.controller.form_mut().backspace() {
                    self.controller.field_edited(now);
                }
            }
            KeyCode::Char(c) => {
                if self.controller.form_mut().input_char(c) {
                    self.controller.field_edited(now);
                }
            }
            _ => {}
        }
    }

    fn write_export(&mut self, file: Option<ExportFile>) {
        let Some(file) = file else {
            return;
        };
        let path = self.data_dir.join(&file.file_name);
        match std::fs::write(&path, &file.contents) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "Exported comparison");
                self.controller.export_written(&path.display().to_string());
            }
            Err(e) => self.controller.export_failed(&e),
        }
    }
}
