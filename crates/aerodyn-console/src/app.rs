//! Control tower state and event loop.
//!
//! An interactive TUI that mirrors the old browser dashboard: edit the
//! simulation levers on the left, watch the chart, KPIs and analysis update
//! live, and submit free-text reconfiguration prompts to the model factory.

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, style::Color, Terminal};
use tokio::sync::mpsc;

use aerodyn_client::{
    ApiClient, ClientConfig, ClientError, Orchestrator, ReconfigureController, RefreshOutcome,
};
use aerodyn_protocol::{ReconfigureResponse, SimulationParams};
use aerodyn_state::DashboardView;

use crate::config::ConsoleConfig;

/// Which pane owns keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Params,
    Prompt,
}

/// Result of a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Exit,
}

/// Completed background work, drained once per tick.
enum AppEvent {
    SimulationReady(Result<RefreshOutcome, ClientError>),
    ReconfigureDone(Result<ReconfigureResponse, ClientError>),
}

/// The editable lever form. Values are kept as strings while editing;
/// `to_params` parses, fills empty fields with defaults, and clamps.
#[derive(Debug, Clone)]
pub struct ParamsForm {
    values: [String; 6],
    pub selected: usize,
}

pub const PARAM_NAMES: [&str; 6] = ["S0", "beta", "sigma", "capacity", "gamma", "t_max"];

impl Default for ParamsForm {
    fn default() -> Self {
        let defaults = SimulationParams::default();
        Self {
            values: [
                defaults.s0.to_string(),
                defaults.beta.to_string(),
                defaults.sigma.to_string(),
                defaults.capacity.to_string(),
                defaults.gamma.to_string(),
                defaults.t_max.to_string(),
            ],
            selected: 0,
        }
    }
}

impl ParamsForm {
    pub fn value(&self, idx: usize) -> &str {
        &self.values[idx]
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % self.values.len();
    }

    pub fn select_prev(&mut self) {
        self.selected = (self.selected + self.values.len() - 1) % self.values.len();
    }

    /// Append a character to the selected field. Only digits and a decimal
    /// point are accepted; everything else is ignored.
    pub fn push_char(&mut self, c: char) -> bool {
        if !(c.is_ascii_digit() || c == '.') {
            return false;
        }
        self.values[self.selected].push(c);
        true
    }

    pub fn backspace(&mut self) -> bool {
        self.values[self.selected].pop().is_some()
    }

    /// Parse the form into validated simulation params. Empty fields fall
    /// back to the lever's default; unparsable text is an error rather than
    /// a NaN on the wire.
    pub fn to_params(&self) -> Result<SimulationParams, String> {
        let defaults = SimulationParams::default();
        let params = SimulationParams {
            s0: parse_u32(&self.values[0], "S0", defaults.s0)?,
            beta: parse_f64(&self.values[1], "beta", defaults.beta)?,
            sigma: parse_f64(&self.values[2], "sigma", defaults.sigma)?,
            capacity: parse_u32(&self.values[3], "capacity", defaults.capacity)?,
            gamma: parse_f64(&self.values[4], "gamma", defaults.gamma)?,
            t_max: parse_u32(&self.values[5], "t_max", defaults.t_max)?,
        };
        params.validated().map_err(|e| e.to_string())
    }
}

fn parse_f64(raw: &str, name: &str, default: f64) -> Result<f64, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(default);
    }
    trimmed
        .parse::<f64>()
        .map_err(|_| format!("{name} is not a number: {trimmed:?}"))
}

fn parse_u32(raw: &str, name: &str, default: u32) -> Result<u32, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(default);
    }
    trimmed
        .parse::<u32>()
        .map_err(|_| format!("{name} is not a whole number: {trimmed:?}"))
}

/// The control tower TUI state.
pub struct ControlTower {
    orchestrator: Arc<Orchestrator>,
    pub view: DashboardView,
    pub controller: ReconfigureController,
    pub form: ParamsForm,
    /// Params of the most recent applied response; drives the capacity
    /// guide line and the KPI panel header.
    pub applied_params: SimulationParams,
    pub prompt: String,
    pub prompt_cursor: usize,
    pub focus: Focus,
    pub messages: Vec<(chrono::DateTime<chrono::Utc>, String, Color)>,
    pub last_error: Option<String>,
    pub endpoint: String,
    tick: Duration,
    events_tx: mpsc::UnboundedSender<AppEvent>,
    events_rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl ControlTower {
    pub fn new(config: &ConsoleConfig) -> anyhow::Result<Self> {
        let client = ApiClient::new(&ClientConfig {
            base_url: config.endpoint.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        })?;
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let mut tower = Self {
            orchestrator: Arc::new(Orchestrator::new(client)),
            view: DashboardView::new(),
            controller: ReconfigureController::new(),
            form: ParamsForm::default(),
            applied_params: SimulationParams::default(),
            prompt: String::new(),
            prompt_cursor: 0,
            focus: Focus::Params,
            messages: Vec::new(),
            last_error: None,
            endpoint: config.endpoint.clone(),
            tick: Duration::from_millis(config.tick_ms),
            events_tx,
            events_rx,
        };
        tower.push_message(
            "AeroDyn Control Tower ready. Tab switches panes, Enter submits a prompt.",
            Color::Cyan,
        );
        tower.push_message(
            "Commands: /help, /refresh, /drop <field>, /quit",
            Color::DarkGray,
        );
        Ok(tower)
    }

    pub fn push_message(&mut self, msg: &str, color: Color) {
        self.messages
            .push((chrono::Utc::now(), msg.to_string(), color));
        // Cap at 500 messages.
        if self.messages.len() > 500 {
            self.messages.remove(0);
        }
    }

    /// Start one simulation cycle with the current form values.
    /// Overlapping cycles are fine; the fence drops whichever finishes late.
    pub fn schedule_refresh(&mut self) {
        let params = match self.form.to_params() {
            Ok(params) => params,
            Err(err) => {
                self.push_message(&format!("Invalid levers: {err}"), Color::Red);
                return;
            }
        };

        let orchestrator = self.orchestrator.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let outcome = orchestrator.refresh(&params).await;
            let _ = tx.send(AppEvent::SimulationReady(outcome));
        });
    }

    /// Submit the prompt field as a reconfiguration request.
    fn submit_prompt(&mut self) {
        let prompt = self.prompt.trim().to_string();
        if prompt.is_empty() {
            return;
        }
        if !self.controller.begin() {
            self.push_message("A reconfiguration is already in flight.", Color::Yellow);
            return;
        }

        self.push_message(&format!("Reconfiguring: {prompt}"), Color::Cyan);
        let orchestrator = self.orchestrator.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = orchestrator.submit_prompt(&prompt).await;
            let _ = tx.send(AppEvent::ReconfigureDone(result));
        });
    }

    /// Drain completed background work and advance timed transitions.
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                AppEvent::SimulationReady(outcome) => match outcome {
                    Ok(RefreshOutcome::Applied { params, response }) => {
                        self.view.apply(&response, &params);
                        self.applied_params = params;
                        self.last_error = None;
                    }
                    Ok(RefreshOutcome::Stale) => {
                        tracing::debug!("stale simulation response discarded");
                    }
                    Err(err) => {
                        let text = format!("Simulation request failed: {err}");
                        self.push_message(&text, Color::Red);
                        self.last_error = Some(err.to_string());
                    }
                },
                AppEvent::ReconfigureDone(result) => self.finish_reconfigure(result),
            }
        }
        self.controller.tick(Instant::now());
    }

    fn finish_reconfigure(&mut self, result: Result<ReconfigureResponse, ClientError>) {
        let now = Instant::now();
        match result {
            Ok(response) if response.is_success() => {
                if let Some(log) = &response.log {
                    self.push_message(&format!("[{}] {}", log.time, log.change), Color::Green);
                } else {
                    self.push_message("System updated.", Color::Green);
                }
                self.controller.complete_success(response.log, now);
                self.prompt.clear();
                self.prompt_cursor = 0;
                // One full refresh so the new model shows up everywhere.
                self.schedule_refresh();
            }
            Ok(response) => {
                let message = response.error_message();
                self.push_message(&format!("Reconfiguration rejected: {message}"), Color::Red);
                self.controller.complete_failure(message, now);
            }
            Err(err) => {
                self.push_message(&format!("Reconfiguration failed: {err}"), Color::Red);
                self.controller.complete_failure(err.to_string(), now);
            }
        }
    }

    fn process_command(&mut self, cmd: &str) -> KeyOutcome {
        let parts: Vec<&str> = cmd.splitn(2, ' ').collect();
        match parts[0] {
            "/help" => {
                self.push_message("Available commands:", Color::Cyan);
                self.push_message("  <text>          - Submit a reconfiguration prompt", Color::White);
                self.push_message("  /refresh        - Re-run the simulation", Color::White);
                self.push_message("  /drop <field>   - Release a removed variable's color", Color::White);
                self.push_message("  /help           - Show this help message", Color::White);
                self.push_message("  /quit           - Exit the control tower", Color::White);
            }
            "/refresh" => self.schedule_refresh(),
            "/drop" => {
                let field = parts.get(1).copied().unwrap_or("").trim();
                if field.is_empty() {
                    self.push_message("Usage: /drop <field>", Color::Yellow);
                } else if self.view.drop_field(field) {
                    self.push_message(&format!("Released color for '{field}'."), Color::Green);
                } else {
                    self.push_message(&format!("No color assigned to '{field}'."), Color::Yellow);
                }
            }
            "/quit" | "/exit" | "/q" => return KeyOutcome::Exit,
            other => {
                self.push_message(
                    &format!("Unknown command: {other}. Type /help for available commands."),
                    Color::Red,
                );
            }
        }
        KeyOutcome::Continue
    }

    /// Handle Enter in the prompt pane: slash commands run locally,
    /// everything else goes to the model factory.
    fn process_prompt(&mut self) -> KeyOutcome {
        let input = self.prompt.trim().to_string();
        if input.is_empty() {
            return KeyOutcome::Continue;
        }
        if input.starts_with('/') {
            self.prompt.clear();
            self.prompt_cursor = 0;
            return self.process_command(&input);
        }
        self.submit_prompt();
        KeyOutcome::Continue
    }

    /// Handle one key press.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> KeyOutcome {
        if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            return KeyOutcome::Exit;
        }
        if code == KeyCode::Tab {
            self.focus = match self.focus {
                Focus::Params => Focus::Prompt,
                Focus::Prompt => Focus::Params,
            };
            return KeyOutcome::Continue;
        }

        match self.focus {
            Focus::Params => match code {
                KeyCode::Up => self.form.select_prev(),
                KeyCode::Down => self.form.select_next(),
                KeyCode::Char(c) => {
                    // Every accepted edit fires a new cycle, like the old
                    // per-keystroke input listeners.
                    if self.form.push_char(c) {
                        self.schedule_refresh();
                    }
                }
                KeyCode::Backspace => {
                    if self.form.backspace() {
                        self.schedule_refresh();
                    }
                }
                _ => {}
            },
            Focus::Prompt => match code {
                KeyCode::Enter => return self.process_prompt(),
                KeyCode::Char(c) => {
                    self.prompt.insert(self.prompt_cursor, c);
                    self.prompt_cursor += 1;
                }
                KeyCode::Backspace => {
                    if self.prompt_cursor > 0 {
                        self.prompt.remove(self.prompt_cursor - 1);
                        self.prompt_cursor -= 1;
                    }
                }
                KeyCode::Delete => {
                    if self.prompt_cursor < self.prompt.len() {
                        self.prompt.remove(self.prompt_cursor);
                    }
                }
                KeyCode::Left => self.prompt_cursor = self.prompt_cursor.saturating_sub(1),
                KeyCode::Right => {
                    if self.prompt_cursor < self.prompt.len() {
                        self.prompt_cursor += 1;
                    }
                }
                KeyCode::Home => self.prompt_cursor = 0,
                KeyCode::End => self.prompt_cursor = self.prompt.len(),
                _ => {}
            },
        }
        KeyOutcome::Continue
    }
}

/// Set up the terminal for TUI rendering.
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to its original state.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the control tower event loop until the operator quits.
pub async fn run_console(config: &ConsoleConfig) -> anyhow::Result<()> {
    use std::io::IsTerminal;
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        return Err(anyhow::anyhow!("The control tower requires a terminal (TTY)."));
    }

    // Set up panic hook to restore the terminal.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let mut terminal = setup_terminal()?;
    let mut tower = ControlTower::new(config)?;
    let tick = tower.tick;

    // First cycle on startup, like the old onload handler.
    tower.schedule_refresh();

    loop {
        tower.drain_events();

        terminal.draw(|frame| crate::ui::render(frame, &tower))?;

        if event::poll(tick)? {
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press
                    && tower.handle_key(key_event.code, key_event.modifiers) == KeyOutcome::Exit
                {
                    break;
                }
            }
        }
    }

    restore_terminal(&mut terminal)?;
    Ok(())
}
