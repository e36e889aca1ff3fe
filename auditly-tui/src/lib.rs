mod screens;

use anyhow::Result;
use auditly_client::{AuditClient, AuditError, AuditReport};
use auditly_core::config::Config;
use auditly_core::export::export_pdf;
use auditly_core::view::{Route, SubmissionForm, Ticket};
use chrono::{DateTime, Local};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

/// Messages sent back from audit tasks to the UI loop.
#[derive(Debug)]
pub enum AuditMessage {
    Finished {
        ticket: Ticket,
        url: String,
        outcome: Result<AuditReport, AuditError>,
    },
}

pub struct App {
    route: Route,
    form: SubmissionForm,
    cursor_position: usize,
    status: Option<String>,
    // Stamped once per result so repeated exports match
    results_at: Option<DateTime<Local>>,
    scroll_offset: usize,
    tick: usize,
    should_quit: bool,
    config: Config,
    client: AuditClient,
    runtime: Handle,
    tx: mpsc::UnboundedSender<AuditMessage>,
    rx: mpsc::UnboundedReceiver<AuditMessage>,
}

impl App {
    pub fn new(config: Config, runtime: Handle) -> Result<Self> {
        let client = AuditClient::new(config.endpoint.clone())?;
        let (tx, rx) = mpsc::unbounded_channel();

        Ok(Self {
            route: Route::Submission,
            form: SubmissionForm::new(),
            cursor_position: 0,
            status: None,
            results_at: None,
            scroll_offset: 0,
            tick: 0,
            should_quit: false,
            config,
            client,
            runtime,
            tx,
            rx,
        })
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn form(&self) -> &SubmissionForm {
        &self.form
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Drain finished audits without blocking.
    pub fn process_messages(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                AuditMessage::Finished {
                    ticket,
                    url,
                    outcome,
                } => {
                    let handoff = self.form.complete(ticket, url, outcome);
                    if handoff.is_some() {
                        self.route = Route::results(
                            handoff,
                            &self.config.policy,
                            &self.config.screenshot_base(),
                        );
                        self.scroll_offset = 0;
                        self.status = None;
                        self.results_at = Some(Local::now());
                    }
                }
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if self.route.is_submission() {
            self.handle_submission_key(key.code);
        } else {
            self.handle_results_key(key.code);
        }
    }

    fn handle_submission_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char(c) => {
                let idx = self.byte_index();
                self.form.input.insert(idx, c);
                self.cursor_position += 1;
            }
            KeyCode::Backspace => {
                if self.cursor_position > 0 {
                    self.cursor_position -= 1;
                    let idx = self.byte_index();
                    self.form.input.remove(idx);
                }
            }
            KeyCode::Delete => {
                if self.cursor_position < self.form.input.chars().count() {
                    let idx = self.byte_index();
                    self.form.input.remove(idx);
                }
            }
            KeyCode::Left => {
                self.cursor_position = self.cursor_position.saturating_sub(1);
            }
            KeyCode::Right => {
                if self.cursor_position < self.form.input.chars().count() {
                    self.cursor_position += 1;
                }
            }
            KeyCode::Home => {
                self.cursor_position = 0;
            }
            KeyCode::End => {
                self.cursor_position = self.form.input.chars().count();
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Esc => {
                if self.form.is_loading() {
                    // Stop waiting; its answer still blocks the next submit
                    self.form.abandon();
                } else {
                    self.should_quit = true;
                }
            }
            _ => {}
        }
    }

    fn handle_results_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('n') | KeyCode::Backspace => self.new_audit(),
            KeyCode::Char('d') => self.download_pdf(),
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Up => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
            }
            KeyCode::Down => {
                self.scroll_offset += 1;
            }
            KeyCode::PageUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(10);
            }
            KeyCode::PageDown => {
                self.scroll_offset += 10;
            }
            KeyCode::Home => {
                self.scroll_offset = 0;
            }
            _ => {}
        }
    }

    fn submit(&mut self) {
        let Ok(Some((ticket, request))) = self.form.submit() else {
            return;
        };

        let client = self.client.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let outcome = client.submit_audit(&request.url).await;
            // The receiver is gone only when the UI has exited
            let _ = tx.send(AuditMessage::Finished {
                ticket,
                url: request.url,
                outcome,
            });
        });
    }

    fn new_audit(&mut self) {
        self.route.new_audit();
        self.form.reset();
        self.cursor_position = 0;
        self.scroll_offset = 0;
        self.status = None;
        self.results_at = None;
    }

    fn download_pdf(&mut self) {
        let Route::Results(ref view) = self.route else {
            return;
        };

        let generated_at = *self.results_at.get_or_insert_with(Local::now);
        let context = view.export_context(generated_at);
        self.status = Some(match export_pdf(&context, &self.config.output_dir) {
            Ok(path) => format!("✓ Saved PDF to {}", path.display()),
            Err(e) => format!("✗ Export failed: {}", e),
        });
    }

    fn byte_index(&self) -> usize {
        self.form
            .input
            .char_indices()
            .nth(self.cursor_position)
            .map_or(self.form.input.len(), |(idx, _)| idx)
    }
}

/// Run the interactive UI until the user quits.
///
/// Blocking: call it from a blocking thread and pass the runtime audit
/// requests should be spawned on.
pub fn run(config: Config, runtime: Handle) -> Result<()> {
    let mut app = App::new(config, runtime)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        app.process_messages();
        app.tick = app.tick.wrapping_add(1);

        terminal.draw(|f| screens::draw(f, app))?;

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
        {
            app.handle_key(key);
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
