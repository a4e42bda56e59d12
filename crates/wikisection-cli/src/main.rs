use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{error, info};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use std::{
    env,
    fs::File,
    io::{Stdout, stdout},
    path::PathBuf,
    process,
};
use wikisection_config::Config;
use wikisection_engine::{DirectorySource, Page, PageSource, invariants, outline};

struct App {
    source: DirectorySource,
    settings: Config,
    titles: Vec<String>,
    page_list_state: ListState,
    selected_page: Option<Page>,
    /// Text the selected page was loaded from, to tell whether it changed.
    loaded_text: String,
    current_content: Vec<String>,
    status: String,
}

impl App {
    fn new(settings: Config) -> Result<Self> {
        let source = DirectorySource::new(&settings.pages_path)?;
        let titles = source.index()?.titles().map(str::to_string).collect();

        let mut app = Self {
            source,
            settings,
            titles,
            page_list_state: ListState::default(),
            selected_page: None,
            loaded_text: String::new(),
            current_content: Vec::new(),
            status: String::new(),
        };

        // Select first page if available
        if !app.titles.is_empty() {
            app.page_list_state.select(Some(0));
            app.load_selected_page();
        }

        Ok(app)
    }

    fn next_page(&mut self) {
        if self.titles.is_empty() {
            return;
        }
        let i = match self.page_list_state.selected() {
            Some(i) => (i + 1) % self.titles.len(),
            None => 0,
        };
        self.page_list_state.select(Some(i));
        self.load_selected_page();
    }

    fn previous_page(&mut self) {
        if self.titles.is_empty() {
            return;
        }
        let i = match self.page_list_state.selected() {
            Some(0) | None => self.titles.len() - 1,
            Some(i) => i - 1,
        };
        self.page_list_state.select(Some(i));
        self.load_selected_page();
    }

    fn selected_title(&self) -> Option<&str> {
        self.page_list_state
            .selected()
            .and_then(|index| self.titles.get(index))
            .map(String::as_str)
    }

    fn load_selected_page(&mut self) {
        let Some(title) = self.selected_title().map(str::to_string) else {
            return;
        };

        let parsed = self.source.fetch(&title).map_err(anyhow::Error::from).and_then(|fetched| {
            let text = fetched.text.clone();
            let (page, _) = if self.settings.dictionary_fields {
                fetched.parse_entry()?
            } else {
                fetched.parse()?
            };
            Ok((page, text))
        });

        match parsed {
            Ok((page, text)) => {
                self.loaded_text = text;
                self.selected_page = Some(page);
                self.status = String::new();
            }
            Err(e) => {
                error!("failed to load {title:?}: {e}");
                self.selected_page = None;
                self.loaded_text.clear();
                self.status = format!("Error loading page: {e}");
            }
        }
        self.refresh_content();
    }

    fn normalize_selected_page(&mut self) {
        if let Some(page) = self.selected_page.as_mut() {
            page.normalize_levels();
            self.status = "Levels normalized (not saved)".to_string();
            self.refresh_content();
        }
    }

    fn write_selected_page(&mut self) {
        let Some(page) = self.selected_page.as_mut() else {
            return;
        };
        if self.settings.normalize_levels {
            page.normalize_levels();
        }
        let text = page.to_string();
        match self.source.save(page.title(), &text) {
            Ok(()) => {
                info!("wrote {:?}", page.title());
                self.status = format!("Wrote {}", page.title());
                self.loaded_text = text;
            }
            Err(e) => {
                error!("failed to write {:?}: {e}", page.title());
                self.status = format!("Error writing page: {e}");
            }
        }
        self.refresh_content();
    }

    fn refresh_content(&mut self) {
        let Some(page) = &self.selected_page else {
            self.current_content = Vec::new();
            return;
        };

        let mut lines: Vec<String> = outline::render(page).lines().map(str::to_string).collect();
        if lines.is_empty() {
            lines.push("(no sections)".to_string());
        }
        lines.push(String::new());

        let changed = page.to_string() != self.loaded_text;
        lines.push(format!(
            "Text: {}",
            if changed { "modified" } else { "unchanged" }
        ));
        let violations = invariants::check(page);
        if violations.is_empty() {
            lines.push("Tree: consistent".to_string());
        } else {
            lines.push(format!("Tree: {} problem(s)", violations.len()));
            lines.extend(violations.iter().map(|v| format!("  {v}")));
        }

        self.current_content = lines;
    }
}

/// Where log output goes while the terminal UI owns the screen.
fn log_path() -> PathBuf {
    env::temp_dir().join("wikisection-cli.log")
}

/// Logger configured from `RUST_LOG` that writes to `file` instead of stderr,
/// so records never land on the alternate screen.
fn logger_builder(file: File) -> env_logger::Builder {
    let mut builder = env_logger::Builder::from_default_env();
    builder.target(env_logger::Target::Pipe(Box::new(file)));
    builder
}

fn main() -> Result<()> {
    logger_builder(File::create(log_path())?).init();

    // Determine pages path from CLI args or config file
    let args: Vec<String> = env::args().collect();
    let config_path = Config::config_path();

    let settings;
    let from_config;

    if args.len() == 2 {
        // CLI argument provided - use it, keeping other settings from config
        let pages_path = PathBuf::from(&args[1]);
        settings = match Config::load() {
            Ok(Some(config)) => Config {
                pages_path,
                ..config
            },
            _ => Config::new(pages_path),
        };
        from_config = false;
    } else if args.len() == 1 {
        // No CLI argument - try config file
        match Config::load() {
            Ok(Some(config)) => {
                settings = config;
                from_config = true;
            }
            Ok(None) => {
                eprintln!("Error: No pages path provided and no config file found");
                eprintln!("Usage: {} <pages-folder-path>", args[0]);
                eprintln!("Or create a config file at {}", config_path.display());
                process::exit(1);
            }
            Err(e) => {
                eprintln!("Error: Failed to load config file: {e}");
                eprintln!("Usage: {} <pages-folder-path>", args[0]);
                process::exit(1);
            }
        }
    } else {
        eprintln!("Usage: {} [pages-folder-path]", args[0]);
        process::exit(1);
    };

    // Validate pages directory using engine
    if let Err(e) = wikisection_engine::validate_pages_dir(&settings.pages_path) {
        let source = if from_config {
            format!(" from config file '{}'", config_path.display())
        } else {
            String::new()
        };
        eprintln!(
            "Error: Pages path '{}'{} is invalid: {e}",
            settings.pages_path.display(),
            source
        );
        process::exit(1);
    }
    info!("browsing pages in {}", settings.pages_path.display());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app
    let res = App::new(settings).and_then(|mut app| run_app(&mut terminal, &mut app));

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.next_page(),
                KeyCode::Up | KeyCode::Char('k') => app.previous_page(),
                KeyCode::Char('n') => app.normalize_selected_page(),
                KeyCode::Char('w') => app.write_selected_page(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)].as_ref())
        .split(f.area());

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .margin(1)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)].as_ref())
        .split(rows[0]);

    // Page list panel
    let page_items: Vec<ListItem> = app
        .titles
        .iter()
        .map(|title| ListItem::new(vec![Line::from(vec![Span::raw(title.clone())])]))
        .collect();

    let pages_list = List::new(page_items)
        .block(Block::default().borders(Borders::ALL).title("Pages"))
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));

    f.render_stateful_widget(pages_list, chunks[0], &mut app.page_list_state);

    // Outline panel
    let content_text = if app.current_content.is_empty() {
        vec![Line::from("Select a page to view its outline")]
    } else {
        app.current_content
            .iter()
            .map(|line| Line::from(vec![Span::raw(line.clone())]))
            .collect()
    };

    let title = app.selected_title().unwrap_or("Outline").to_string();
    let content = Paragraph::new(content_text)
        .block(Block::default().borders(Borders::ALL).title(title));

    f.render_widget(content, chunks[1]);

    // Status and instructions
    let help_text = Line::from(vec![
        Span::raw("q: Quit | "),
        Span::raw("↑/k: Previous | "),
        Span::raw("↓/j: Next | "),
        Span::raw("n: Normalize levels | "),
        Span::raw("w: Write page"),
    ]);
    let status_text = Line::from(Span::styled(
        app.status.clone(),
        Style::default().fg(Color::Cyan),
    ));

    let help = Paragraph::new(vec![status_text, help_text]).block(Block::default());
    f.render_widget(help, rows[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::{Level, Log, Record};

    #[test]
    fn test_logger_writes_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cli.log");
        let logger = logger_builder(File::create(&path).unwrap()).build();

        logger.log(
            &Record::builder()
                .args(format_args!("failed to load \"kot\""))
                .level(Level::Error)
                .target("wikisection_cli")
                .build(),
        );
        logger.flush();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("failed to load \"kot\""));
    }
}
