mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use crossterm::{
    event::{KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::Duration,
};

use tappa::{
    config::{ConfigStore, FileConfigStore},
    history::{FileHistoryStore, HistoryStore, Record},
    passage::{Corpus, PassageSet},
    runtime::{dispatch, AppEvent, EventQueue},
    session::{Phase, Session},
};

/// minimal timed typing test tui
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A minimal timed typing test: type a passage against the clock, watch words-per-minute and accuracy live, and review every past attempt from the persisted history."
)]
pub struct Cli {
    /// number of seconds to run the test
    #[clap(short = 's', long)]
    seconds: Option<u32>,

    /// custom passage to type instead of a built-in one
    #[clap(short = 'p', long)]
    passage: Option<String>,

    /// built-in passage set to draw from
    #[clap(short = 'l', long, value_enum)]
    passage_set: Option<PassageSet>,

    /// print recorded attempts, most recent first, and exit
    #[clap(long)]
    history: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Typing,
    Results,
}

#[derive(Debug)]
pub struct App {
    pub session: Session,
    /// The input surface's buffer; submitted wholesale to the session on
    /// every edit
    pub input_buffer: String,
    pub screen: Screen,
    pub history: Vec<Record>,
    corpus: Option<Corpus>,
    custom_passage: Option<String>,
    store: FileHistoryStore,
}

impl App {
    pub fn new(
        time_limit_secs: u32,
        set: PassageSet,
        custom_passage: Option<String>,
        store: FileHistoryStore,
    ) -> Self {
        let corpus = if custom_passage.is_none() {
            Some(Corpus::new(set))
        } else {
            None
        };

        Self {
            session: Session::new(time_limit_secs),
            input_buffer: String::new(),
            screen: Screen::Typing,
            history: store.read_all(),
            corpus,
            custom_passage,
            store,
        }
    }

    fn next_passage(&self) -> String {
        match (&self.custom_passage, &self.corpus) {
            (Some(passage), _) => passage.clone(),
            (None, Some(corpus)) => corpus.pick(),
            (None, None) => String::new(),
        }
    }

    /// Begins a fresh session; safe to call from Idle or Results
    pub fn begin_session(&mut self) {
        let passage = self.next_passage();
        self.input_buffer.clear();
        self.session.start(passage);
        self.screen = Screen::Typing;
    }

    /// Feeds one event through the dispatcher and reacts to completion
    pub fn apply(&mut self, event: &AppEvent) {
        if let Some(record) = dispatch(&mut self.session, &mut self.input_buffer, event) {
            self.finish(record);
        }
    }

    fn finish(&mut self, record: Record) {
        // The terminal is in raw mode here, so a failed append degrades
        // silently; the in-memory history still shows the attempt.
        let _ = self.store.append(&record);
        self.history.push(record);
        self.screen = Screen::Results;
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if cli.history {
        print_history(&FileHistoryStore::new());
        return Ok(());
    }

    let config = FileConfigStore::new().load();
    let seconds = cli.seconds.unwrap_or(config.number_of_secs);
    let set = cli.passage_set.unwrap_or_else(|| {
        PassageSet::from_str(&config.passage_set, true).unwrap_or(PassageSet::Quotes)
    });

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(seconds, set, cli.passage.clone(), FileHistoryStore::new());
    let res = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    res
}

fn print_history(store: &FileHistoryStore) {
    let records = store.read_all();
    if records.is_empty() {
        println!("no attempts recorded yet");
        return;
    }

    // read_all is oldest first; reading back, the latest attempt matters most
    for record in records.iter().rev() {
        println!(
            "{}  {:>3} wpm  {:>3}% acc  {:>3}s  ({} correct / {} incorrect)",
            record.date.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M"),
            record.wpm,
            record.accuracy,
            record.time_taken,
            record.correct_chars,
            record.incorrect_chars,
        );
    }
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    let queue = EventQueue::spawn(Duration::from_secs(1));

    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        let event = match queue.next() {
            Some(event) => event,
            None => break,
        };

        // Navigation keys are routed here; typing keys and clock ticks go
        // through the dispatcher onto the session.
        if let AppEvent::Key(key) = &event {
            match key.code {
                KeyCode::Esc => break,
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
                KeyCode::Enter => {
                    if app.session.phase != Phase::Running {
                        app.begin_session();
                    }
                    continue;
                }
                KeyCode::Char(c) if app.screen == Screen::Results => {
                    if c == 'r' || c == 'n' {
                        app.begin_session();
                    }
                    continue;
                }
                _ => {}
            }
        }

        app.apply(&event);
    }

    Ok(())
}
