mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use rand::seq::SliceRandom;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use spelldrill::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    controller::{Publisher, SessionController},
    definition::DictionaryApi,
    error::PracticeError,
    logging,
    runtime::{AppEvent, AppEventSource, CrosstermEventSource, FixedTicker, Runner, Ticker},
    session::Timing,
    source::{Catalog, CatalogError, TopicLookup, WordSource},
    speech::{CommandSpeaker, MuteSpeaker, Speaker},
    submission::{SharedSubmission, SubmissionSource},
    view::SessionView,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    sync::Arc,
    time::Duration,
};
use tracing::{info, warn};

const TICK_RATE_MS: u64 = 100;

/// listen-and-spell vocabulary practice
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Hear a word, type its spelling before the time runs out, and keep score. Words come from a topic lookup or from curated word lists, with dictionary definitions for the latter."
)]
pub struct Cli {
    /// topic or seed word to fetch related words for
    topic: Option<String>,

    /// JSON file mapping sublist names to word lists
    #[clap(short = 'c', long, conflicts_with = "builtin")]
    catalog: Option<PathBuf>,

    /// practice one of the bundled word lists
    #[clap(short = 'b', long, value_enum)]
    builtin: Option<BuiltinCatalog>,

    /// seconds allowed to type each word
    #[clap(long)]
    answer_secs: Option<f64>,

    /// seconds to pause between words
    #[clap(long)]
    pause_secs: Option<f64>,

    /// speech rate in words per minute
    #[clap(short = 'r', long)]
    rate: Option<u32>,

    /// maximum number of words fetched for a topic
    #[clap(short = 'w', long)]
    max_words: Option<usize>,

    /// skip dictionary definitions in word-list mode
    #[clap(long)]
    no_definitions: bool,

    /// shuffle the word list before practicing
    #[clap(long)]
    shuffle: bool,

    /// do not speak; useful without a speech program installed
    #[clap(long)]
    mute: bool,

    /// store the effective settings as the new defaults
    #[clap(long)]
    save_config: bool,
}

#[derive(Debug, Copy, Clone, ValueEnum, strum_macros::Display)]
pub enum BuiltinCatalog {
    Awl,
}

impl BuiltinCatalog {
    fn load(&self) -> Result<Catalog, CatalogError> {
        Catalog::builtin(&self.to_string().to_lowercase())
    }
}

impl Cli {
    /// Layers command line overrides on top of stored settings
    fn apply(&self, mut cfg: Config) -> Config {
        if let Some(secs) = self.answer_secs {
            cfg.answer_window_secs = secs;
        }
        if let Some(secs) = self.pause_secs {
            cfg.pause_secs = secs;
        }
        if let Some(rate) = self.rate {
            cfg.speech_rate = rate;
        }
        if let Some(max) = self.max_words {
            cfg.topic_max_results = max;
        }
        if self.no_definitions {
            cfg.definitions = false;
        }
        if self.shuffle {
            cfg.shuffle = true;
        }
        cfg
    }

    fn load_catalog(&self) -> Result<Option<Catalog>, CatalogError> {
        match (&self.catalog, self.builtin) {
            (Some(path), _) => Catalog::from_path(path).map(Some),
            (None, Some(builtin)) => builtin.load().map(Some),
            (None, None) => Ok(None),
        }
    }
}

fn build_speaker(cli: &Cli, config: &Config) -> Arc<dyn Speaker> {
    if cli.mute {
        return Arc::new(MuteSpeaker);
    }
    match config
        .speech_command
        .as_deref()
        .and_then(CommandSpeaker::from_argv)
    {
        Some(speaker) => Arc::new(speaker),
        None => Arc::new(CommandSpeaker::system(config.speech_rate)),
    }
}

/// Where the session's words come from
#[derive(Debug)]
pub enum Source {
    Topic(TopicLookup),
    Catalog {
        catalog: Catalog,
        labels: Vec<String>,
        selected: usize,
    },
}

impl Source {
    fn catalog(catalog: Catalog) -> Self {
        let labels = catalog.labels();
        Source::Catalog {
            catalog,
            labels,
            selected: 0,
        }
    }

    /// The highlighted selector entry, if this is a catalog source.
    pub fn selected_label(&self) -> Option<&str> {
        match self {
            Source::Catalog {
                labels, selected, ..
            } => labels.get(*selected).map(String::as_str),
            Source::Topic(_) => None,
        }
    }

    fn words(&self, topic: &str) -> Result<Vec<String>, PracticeError> {
        match self {
            Source::Topic(lookup) => lookup.words(topic),
            Source::Catalog { catalog, .. } => {
                let key = self
                    .selected_label()
                    .and_then(|label| catalog.key_for_label(label))
                    .unwrap_or_default();
                catalog.words(key)
            }
        }
    }

    fn select_previous(&mut self) {
        if let Source::Catalog { selected, .. } = self {
            *selected = selected.saturating_sub(1);
        }
    }

    fn select_next(&mut self) {
        if let Source::Catalog {
            labels, selected, ..
        } = self
        {
            if *selected + 1 < labels.len() {
                *selected += 1;
            }
        }
    }
}

pub struct App {
    pub source: Source,
    pub topic: String,
    pub view: SessionView,
    pub submission: SharedSubmission,
    pub shuffle: bool,
    controller: SessionController,
}

impl App {
    pub fn new(
        cli: &Cli,
        config: &Config,
        catalog: Option<Catalog>,
        publisher: Arc<dyn Publisher>,
    ) -> Self {
        let submission = SharedSubmission::new();
        let mut controller = SessionController::new(
            build_speaker(cli, config),
            Arc::new(submission.clone()),
            publisher,
            Timing::from(config),
        );

        let source = match catalog {
            Some(catalog) => {
                if config.definitions {
                    match DictionaryApi::new() {
                        Ok(api) => controller = controller.with_definitions(Arc::new(api)),
                        Err(e) => warn!(error = %e, "definitions disabled"),
                    }
                }
                Source::catalog(catalog)
            }
            None => Source::Topic(TopicLookup::new(config.topic_max_results)),
        };

        Self {
            source,
            topic: cli.topic.clone().unwrap_or_default(),
            view: SessionView::default(),
            submission,
            shuffle: config.shuffle,
            controller,
        }
    }

    pub fn is_running(&self) -> bool {
        self.controller.is_running()
    }

    pub fn has_definitions(&self) -> bool {
        self.controller.has_definitions()
    }

    /// Loads words from the current source and hands them to the controller.
    ///
    /// A topic lookup is a blocking HTTP call on the UI thread, so the screen
    /// does not redraw until the word-association service answers.
    pub fn start(&mut self) {
        let mut words = match self.source.words(&self.topic) {
            Ok(words) => words,
            Err(e) => {
                info!(error = %e, "session not started");
                self.view.notice(&e);
                return;
            }
        };
        if self.shuffle {
            words.shuffle(&mut rand::thread_rng());
        }

        self.submission.clear();
        let total = words.len();
        match self.controller.start(words) {
            Ok(id) => self.view.begin(id, total),
            Err(e) => self.view.notice(&e),
        }
    }

    pub fn stop(&mut self) {
        if self.is_running() {
            self.controller.stop();
            self.view.stopping();
        }
    }

    /// Handles one key press. Returns true when the app should quit.
    pub fn on_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }

        if self.is_running() {
            match key.code {
                KeyCode::Esc => self.stop(),
                KeyCode::Backspace => self.submission.backspace(),
                KeyCode::Char(c) => self.submission.push(c),
                _ => {}
            }
            return false;
        }

        match key.code {
            KeyCode::Esc => return true,
            KeyCode::Enter => self.start(),
            KeyCode::Up => self.source.select_previous(),
            KeyCode::Down => self.source.select_next(),
            KeyCode::Backspace => {
                if let Source::Topic(_) = self.source {
                    self.topic.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Source::Topic(_) = self.source {
                    self.topic.push(c);
                }
            }
            _ => {}
        }
        false
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let store = FileConfigStore::new();
    let config = cli.apply(store.load());
    if cli.save_config {
        store.save(&config)?;
    }

    let catalog = match cli.load_catalog() {
        Ok(catalog) => catalog,
        Err(e) => {
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::Io, e.to_string()).exit();
        }
    };

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Err(e) = logging::init(&AppDirs::log_path()) {
        eprintln!("logging disabled: {e}");
    }
    info!(?config, "starting");

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );
    let publisher = Arc::new(runner.source().publisher());
    let mut app = App::new(&cli, &config, catalog, publisher);
    let result = run(&mut terminal, &runner, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // joins a running worker
    drop(app);
    result
}

fn run<B: Backend, E: AppEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    runner: &Runner<E, T>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        match runner.step() {
            AppEvent::Tick | AppEvent::Resize => {}
            AppEvent::Session(event) => app.view.apply(event),
            AppEvent::Key(key) => {
                if app.on_key(key) {
                    break;
                }
            }
        }
    }
    Ok(())
}
