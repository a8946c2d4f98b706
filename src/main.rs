use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use serde_json::{json, Value};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tui_textarea::TextArea;

use riddle_hunt::answer::{AnswerEngine, NextRiddle};
use riddle_hunt::api::{self, SaveMode, Status};
use riddle_hunt::config::{HuntConfig, DEFAULT_CONFIG_FILE};
use riddle_hunt::content::sounds::{list_sounds, missing_sounds};
use riddle_hunt::content::{ContentStore, ContentView};
use riddle_hunt::geo::Coordinate;
use riddle_hunt::translate::{Credentials, TranslationGateway};

#[derive(Parser, Debug)]
#[command(name = "riddle-hunt", about = "A location riddle treasure hunt for the terminal")]
struct Cli {
    /// Configuration file (TOML). Missing file means defaults.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Directory holding game_content.json; overrides the config file.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Open the content editor instead of the title screen.
    #[arg(long)]
    edit: bool,
}

enum GameState {
    TitleScreen,
    Playing,
    RiddleSolved,
    Finished,
    Editing,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum MenuOption {
    Play,
    Edit,
    Quit,
}

impl MenuOption {
    fn next(self) -> Self {
        match self {
            MenuOption::Play => MenuOption::Edit,
            MenuOption::Edit => MenuOption::Quit,
            MenuOption::Quit => MenuOption::Play,
        }
    }

    fn prev(self) -> Self {
        match self {
            MenuOption::Play => MenuOption::Quit,
            MenuOption::Edit => MenuOption::Play,
            MenuOption::Quit => MenuOption::Edit,
        }
    }
}

struct App<'a> {
    config: HuntConfig,
    engine: AnswerEngine,
    gateway: TranslationGateway,
    view: Arc<ContentView>,
    current_riddle: usize,
    riddle_text: String,
    translated: Option<String>,
    show_translation: bool,
    pending: Option<NextRiddle>,
    input: TextArea<'a>,
    editor: TextArea<'a>,
    message: String,
    message_style: Style,
    message_scroll: u16,
    state: GameState,
    menu_selection: MenuOption,
    misses_riddle: u32,
    misses_total: u32,
    command_mode: bool,
    command_buffer: String,
}

fn coordinate_input<'a>() -> TextArea<'a> {
    let mut input = TextArea::default();
    input.set_block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Your location [ENTER: Check | F2: Translate | :q Quit] "),
    );
    input.set_placeholder_text("lat, lng  e.g. 32.0853, 34.7818");
    input.set_cursor_line_style(Style::default());
    input
}

fn content_editor<'a>(view: &ContentView) -> TextArea<'a> {
    let text = serde_json::to_string_pretty(&view.content).unwrap_or_default();
    let mut editor = TextArea::from(text.lines());
    editor.set_block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Game Content [F5: Save | Esc: Menu | :q Quit] "),
    );
    editor.set_line_number_style(Style::default().fg(Color::DarkGray));
    editor
}

impl<'a> App<'a> {
    fn new(config: HuntConfig, engine: AnswerEngine, gateway: TranslationGateway) -> Self {
        let view = engine.store().snapshot();
        let editor = content_editor(&view);

        App {
            config,
            engine,
            gateway,
            view,
            current_riddle: 0,
            riddle_text: String::new(),
            translated: None,
            show_translation: false,
            pending: None,
            input: coordinate_input(),
            editor,
            message: String::new(),
            message_style: Style::default().fg(Color::Yellow),
            message_scroll: 0,
            state: GameState::TitleScreen,
            menu_selection: MenuOption::Play,
            misses_riddle: 0,
            misses_total: 0,
            command_mode: false,
            command_buffer: String::new(),
        }
    }

    fn set_message(&mut self, message: impl Into<String>, color: Color) {
        self.message = message.into();
        self.message_style = Style::default().fg(color);
        self.message_scroll = 0;
    }

    fn start_game(&mut self) {
        self.view = self.engine.store().snapshot();
        let Some(first) = self.view.riddles().first() else {
            self.set_message(
                "No riddles yet. Open the editor and add some first.",
                Color::Magenta,
            );
            return;
        };

        self.riddle_text = first.text.clone();
        self.current_riddle = first.id;
        self.misses_riddle = 0;
        self.misses_total = 0;
        self.reset_riddle();
        self.state = GameState::Playing;
        self.set_message("Read the riddle and send the location it points to.", Color::Yellow);
    }

    fn reset_riddle(&mut self) {
        self.input = coordinate_input();
        self.translated = None;
        self.show_translation = false;
        self.pending = None;
    }

    fn open_editor(&mut self) {
        self.view = self.engine.store().snapshot();
        self.editor = content_editor(&self.view);
        self.state = GameState::Editing;
        self.set_message(
            "Edit the JSON document. Riddle ids are renumbered on save. F5 saves; ':' on an empty line starts a command.",
            Color::Yellow,
        );
    }

    fn advance_riddle(&mut self) {
        if let Some(next) = self.pending.take() {
            self.current_riddle = next.id;
            self.riddle_text = next.text;
            self.misses_riddle = 0;
            self.reset_riddle();
            self.state = GameState::Playing;
            self.set_message("On to the next riddle!", Color::Yellow);
        }
    }

    fn submit_guess(&mut self) {
        let typed = self.input.lines().join(" ");
        let at: Coordinate = match typed.parse() {
            Ok(at) => at,
            Err(e) => {
                self.set_message(format!("Could not read that location: {}", e), Color::Magenta);
                return;
            }
        };

        let payload = json!({
            "riddle_id": self.current_riddle,
            "lat": at.lat,
            "lng": at.lng,
        });
        let response = api::check_answer(&self.engine, &payload);
        let body = response.body;

        if response.status != Status::Ok {
            self.set_message(format!("System error: {}", body.message), Color::Magenta);
            return;
        }

        if !body.correct {
            self.misses_riddle += 1;
            self.misses_total += 1;
            self.set_message(body.message, Color::Red);
            return;
        }

        if body.finished {
            self.view = self.engine.store().snapshot();
            self.state = GameState::Finished;
            self.message = format!(
                "=== {} ===\n\n{}\n\nRiddles solved: {}   Misses: {}\n\nPress any key to return to the menu...",
                self.view.landing().ending_title,
                body.message,
                self.current_riddle + 1,
                self.misses_total,
            );
            self.message_style = Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD);
            self.message_scroll = 0;
            return;
        }

        self.pending = body.next_riddle;
        self.state = GameState::RiddleSolved;
        let sound = body
            .sound
            .filter(|s| !s.is_empty())
            .map(|s| format!("  ♪ {}", s))
            .unwrap_or_default();
        self.set_message(
            format!("*** {} ***{}  [ Press ENTER ]", body.message, sound),
            Color::Green,
        );
    }

    fn toggle_translation(&mut self) {
        if self.show_translation {
            self.show_translation = false;
            return;
        }
        if !self.gateway.is_enabled() {
            self.set_message(
                "Translation is not configured (no translation key).",
                Color::DarkGray,
            );
            return;
        }

        if self.translated.is_none() {
            let payload = json!({
                "texts": [self.riddle_text],
                "target": self.config.translation.target_lang,
            });
            let response =
                api::translate_texts(&self.gateway, &payload, self.config.translation.max_texts);
            self.translated = response
                .body
                .translations
                .and_then(|t| t.into_iter().next());
        }
        self.show_translation = true;
    }

    fn save_content(&mut self) {
        let text = self.editor.lines().join("\n");
        let payload: Value = match serde_json::from_str(&text) {
            Ok(payload) => payload,
            Err(e) => {
                self.set_message(format!("Not valid JSON: {}", e), Color::Red);
                return;
            }
        };

        let response = api::save_content(self.engine.store(), &payload, SaveMode::Unified);
        match response.status {
            Status::Ok => {
                self.view = self.engine.store().snapshot();
                self.editor = content_editor(&self.view);

                let available = list_sounds(&self.config.sounds_path()).unwrap_or_default();
                let missing = missing_sounds(self.view.landing(), &available);
                let warning = if missing.is_empty() {
                    String::new()
                } else {
                    format!("\n\nSounds not found in the library: {}", missing.join(", "))
                };
                self.set_message(
                    format!(
                        "Saved {} riddles and {} success messages.{}",
                        self.view.riddles().len(),
                        self.view.landing().success_messages.len(),
                        warning
                    ),
                    Color::Green,
                );
            }
            Status::ClientError => {
                let error = response.body.error.unwrap_or_default();
                self.set_message(format!("Rejected: {}", error), Color::Red);
            }
            Status::ServerError => {
                let error = response.body.error.unwrap_or_default();
                self.set_message(format!("Could not save: {}", error), Color::Magenta);
            }
        }
    }

    fn riddle_panel_text(&self) -> String {
        match (&self.translated, self.show_translation) {
            (Some(translated), true) => format!("{}\n\n[{}]", translated, self.config.translation.target_lang),
            _ => self.riddle_text.clone(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = HuntConfig::load(&cli.config)?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    let _guard = setup_logging(&config.log_path())?;

    let store = Arc::new(ContentStore::open(&config.data_dir));
    let credentials = Credentials::load(&config.credentials_path());
    let gateway = TranslationGateway::from_config(&config.translation, &credentials);
    let engine = AnswerEngine::new(store);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, engine, gateway);
    if cli.edit {
        app.open_editor();
    }

    let result = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    result
}

fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| draw_ui(f, app))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        if app.handle_key(key) {
            return Ok(());
        }
    }
}

impl App<'_> {
    /// Applies one key press. Returns `true` when the user asked to quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match self.state {
            GameState::TitleScreen => {
                match key.code {
                    KeyCode::Down | KeyCode::Char('j') => {
                        self.menu_selection = self.menu_selection.next();
                    }
                    KeyCode::Up | KeyCode::Char('k') => {
                        self.menu_selection = self.menu_selection.prev();
                    }
                    KeyCode::Enter => match self.menu_selection {
                        MenuOption::Play => self.start_game(),
                        MenuOption::Edit => self.open_editor(),
                        MenuOption::Quit => return true,
                    },
                    KeyCode::Char('q') => return true,
                    _ => {}
                }
                return false;
            }
            GameState::RiddleSolved => {
                if key.code == KeyCode::Enter {
                    self.advance_riddle();
                }
                return false;
            }
            GameState::Finished => {
                self.state = GameState::TitleScreen;
                self.message.clear();
                return false;
            }
            GameState::Playing | GameState::Editing => {}
        }

        // Command mode handling (vim-style :q)
        if self.command_mode {
            match key.code {
                KeyCode::Esc => {
                    self.command_mode = false;
                    self.command_buffer.clear();
                }
                KeyCode::Enter => {
                    let editing = is_editing(self);
                    let command = std::mem::take(&mut self.command_buffer);
                    self.command_mode = false;
                    match command.as_str() {
                        "q" | "quit" => return true,
                        "w" if editing => self.save_content(),
                        "w" => self.set_message("Progress lives only in this session.", Color::Yellow),
                        "menu" => self.state = GameState::TitleScreen,
                        "help" => self.set_message(
                            "Commands: :q (quit), :menu (title screen), :w (save content in the editor)",
                            Color::Cyan,
                        ),
                        "" => {}
                        other => {
                            let message = format!("Unknown command: {}", other);
                            self.set_message(message, Color::Red);
                        }
                    }
                }
                KeyCode::Backspace => {
                    self.command_buffer.pop();
                    if self.command_buffer.is_empty() {
                        self.command_mode = false;
                    }
                }
                KeyCode::Char(c) => {
                    self.command_buffer.push(c);
                }
                _ => {}
            }
            return false;
        }

        match (key.code, key.modifiers) {
            (KeyCode::Char(':'), KeyModifiers::NONE | KeyModifiers::SHIFT) if self.command_key_allowed() => {
                self.command_mode = true;
                self.command_buffer.clear();
            }
            (KeyCode::Esc, _) => {
                if is_editing(self) {
                    self.state = GameState::TitleScreen;
                    self.message.clear();
                } else {
                    self.set_message("Type :q to quit or :menu for the title screen", Color::DarkGray);
                }
            }
            (KeyCode::PageDown, _) => {
                let lines = self.message.lines().count() as u16;
                if self.message_scroll < lines.saturating_sub(5) {
                    self.message_scroll += 3;
                }
            }
            (KeyCode::PageUp, _) => {
                self.message_scroll = self.message_scroll.saturating_sub(3);
            }
            (KeyCode::F(5), _) | (KeyCode::Char('s'), KeyModifiers::CONTROL) if is_editing(self) => {
                self.save_content();
            }
            (KeyCode::F(5), _) | (KeyCode::Enter, _) if !is_editing(self) => {
                self.submit_guess();
            }
            (KeyCode::F(2), _) if !is_editing(self) => {
                self.toggle_translation();
            }
            _ => {
                if is_editing(self) {
                    self.editor.input(key);
                } else {
                    self.input.input(key);
                }
            }
        }
        false
    }

    /// `:` opens a command on a blank guess, or at the start of an empty
    /// editor line. Anywhere else it is text (JSON needs it).
    fn command_key_allowed(&self) -> bool {
        if !is_editing(self) {
            return is_blank(&self.input);
        }
        let (row, col) = self.editor.cursor();
        col == 0 && self.editor.lines().get(row).is_some_and(|line| line.is_empty())
    }
}

fn is_editing(app: &App) -> bool {
    matches!(app.state, GameState::Editing)
}

fn is_blank(input: &TextArea) -> bool {
    input.lines().iter().all(|l| l.trim().is_empty())
}

/// Logs go to a file: the terminal belongs to the UI.
fn setup_logging(log_dir: &Path) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;
    let file_appender = tracing_appender::rolling::never(log_dir, "riddle-hunt.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    tracing::info!("Logging to {}/riddle-hunt.log", log_dir.display());
    Ok(guard)
}

fn draw_ui(f: &mut Frame, app: &App) {
    if matches!(app.state, GameState::TitleScreen) {
        draw_title_screen(f, app);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(9),
        ])
        .split(f.area());

    // Status bar
    let progress = if is_editing(app) {
        " Editor ".to_string()
    } else {
        format!(
            " Riddle {}/{} ",
            app.current_riddle + 1,
            app.view.riddles().len()
        )
    };
    let status = Line::from(vec![
        Span::styled(
            " RIDDLE HUNT ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        ),
        Span::raw("  "),
        Span::styled(
            format!(" {} ", app.view.landing().headline),
            Style::default().fg(Color::White).bg(Color::DarkGray),
        ),
        Span::raw("  "),
        Span::styled(progress, Style::default().fg(Color::Cyan)),
        Span::raw("  "),
        Span::styled(
            format!(" Misses: {} ", app.misses_riddle),
            Style::default().fg(if app.misses_riddle == 0 {
                Color::Green
            } else if app.misses_riddle < 3 {
                Color::Yellow
            } else {
                Color::Red
            }),
        ),
    ]);
    let status_block = Paragraph::new(status).block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(status_block, chunks[0]);

    if is_editing(app) {
        f.render_widget(&app.editor, chunks[1]);
    } else {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(3)])
            .split(chunks[1]);

        let title = if app.show_translation && app.translated.is_some() {
            " The Riddle (translated) "
        } else {
            " The Riddle "
        };
        let riddle = Paragraph::new(app.riddle_panel_text())
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: false })
            .style(Style::default().fg(Color::White));
        f.render_widget(riddle, main_chunks[0]);
        f.render_widget(&app.input, main_chunks[1]);
    }

    // Message area
    let message_content = if app.command_mode {
        format!(":{}", app.command_buffer)
    } else {
        app.message.clone()
    };
    let (message_style, message_title) = if app.command_mode {
        (Style::default().fg(Color::White).bg(Color::DarkGray), " Command ")
    } else {
        match app.state {
            GameState::RiddleSolved => (
                Style::default().fg(Color::Black).bg(Color::Green),
                " FOUND IT! ",
            ),
            GameState::Finished => (
                Style::default().fg(Color::Black).bg(Color::Yellow),
                " TREASURE! ",
            ),
            GameState::Editing => (app.message_style, " Editor "),
            GameState::Playing | GameState::TitleScreen => (app.message_style, " The Trail "),
        }
    };
    let scroll_indicator = if app.message.lines().count() > 7 {
        format!("{} [PgUp/PgDn to scroll]", message_title)
    } else {
        message_title.to_string()
    };
    let message = Paragraph::new(message_content)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(scroll_indicator),
        )
        .wrap(Wrap { trim: false })
        .style(message_style)
        .scroll((app.message_scroll, 0));
    f.render_widget(message, chunks[2]);
}

fn draw_title_screen(f: &mut Frame, app: &App) {
    let area = f.area();
    let landing = app.view.landing();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(6),
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);

    let headline = Paragraph::new(format!("\n{}", landing.headline))
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(headline, chunks[0]);

    let subtitle = Paragraph::new(landing.subtitle.as_str())
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(subtitle, chunks[1]);

    let options = [
        (MenuOption::Play, "  PLAY  "),
        (MenuOption::Edit, "  EDIT CONTENT  "),
        (MenuOption::Quit, "  QUIT  "),
    ];
    for (i, (option, label)) in options.iter().enumerate() {
        let style = if *option == app.menu_selection {
            Style::default().fg(Color::Black).bg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        let item = Paragraph::new(*label)
            .style(style)
            .alignment(Alignment::Center);
        f.render_widget(item, chunks[2 + i]);
    }

    let notice = Paragraph::new(app.message.as_str())
        .style(app.message_style)
        .alignment(Alignment::Center);
    f.render_widget(notice, chunks[5]);

    let help = Paragraph::new("↑/↓ to select  •  ENTER to confirm  •  q to quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(help, chunks[6]);
}
