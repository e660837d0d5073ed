use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use crate::api::{StatementClient, StatementProvider};
use crate::models::Config;
use crate::schema::StatementType;

use super::state::{BoundEdge, FetchOutcome, ViewState};
use super::view;

/// Rows moved per PageUp/PageDown press.
const TABLE_PAGE: i64 = 10;

/// Whether key presses edit the symbol buffer or drive the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    EditingSymbol,
}

/// The TUI application: one view per statement type behind a tab bar,
/// sharing a single HTTP client and a channel for fetch results.
pub struct App {
    client: Arc<StatementClient>,
    views: Vec<ViewState>,
    pub selected_tab: usize,
    pub input_mode: InputMode,
    pub should_quit: bool,
    outcome_tx: mpsc::Sender<FetchOutcome>,
    outcome_rx: mpsc::Receiver<FetchOutcome>,
}

impl App {
    pub fn new(client: StatementClient, initial_symbol: Option<String>) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::channel::<FetchOutcome>(16);

        let mut views: Vec<ViewState> =
            StatementType::ALL.iter().map(|s| ViewState::new(*s)).collect();
        if let Some(symbol) = initial_symbol {
            for view in &mut views {
                view.symbol = symbol.clone();
            }
        }

        Self {
            client: Arc::new(client),
            views,
            selected_tab: 0,
            input_mode: InputMode::Normal,
            should_quit: false,
            outcome_tx,
            outcome_rx,
        }
    }

    pub fn current_view(&self) -> &ViewState {
        &self.views[self.selected_tab]
    }

    pub fn current_view_mut(&mut self) -> &mut ViewState {
        &mut self.views[self.selected_tab]
    }

    fn view_mut_for(&mut self, statement: StatementType) -> &mut ViewState {
        self.views
            .iter_mut()
            .find(|view| view.statement == statement)
            .expect("one view exists per statement type")
    }

    /// Issue a fetch for the current view's symbol on a background task.
    /// The task reports back through the outcome channel tagged with the
    /// issuing generation; overlapping fetches are never cancelled, stale
    /// results are simply discarded on arrival.
    pub fn spawn_fetch(&mut self) {
        let statement = self.current_view().statement;
        let view = self.current_view_mut();
        let generation = view.begin_fetch();
        let symbol = view.symbol.clone();

        let client = Arc::clone(&self.client);
        let tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let result = client.fetch(statement, &symbol).await;
            let _ = tx
                .send(FetchOutcome {
                    statement,
                    generation,
                    result,
                })
                .await;
        });
    }

    /// Route settled fetches into their owning views.
    pub fn drain_outcomes(&mut self) {
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.view_mut_for(outcome.statement)
                .apply_fetch(outcome.generation, outcome.result);
        }
    }

    pub fn handle_key(&mut self, key: KeyCode) {
        match self.input_mode {
            InputMode::EditingSymbol => self.handle_symbol_key(key),
            InputMode::Normal => self.handle_normal_key(key),
        }
    }

    fn handle_symbol_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                self.spawn_fetch();
            }
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Backspace => {
                self.current_view_mut().symbol.pop();
            }
            KeyCode::Char(c) => {
                self.current_view_mut().symbol.push(c);
            }
            _ => {}
        }
    }

    fn handle_normal_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Tab => {
                self.selected_tab = (self.selected_tab + 1) % self.views.len();
            }
            KeyCode::BackTab => {
                self.selected_tab =
                    (self.selected_tab + self.views.len() - 1) % self.views.len();
            }
            KeyCode::Char('e') | KeyCode::Char('/') => {
                self.input_mode = InputMode::EditingSymbol;
            }
            KeyCode::Char('f') => self.spawn_fetch(),
            KeyCode::Up => self.current_view_mut().select_prev_filter(),
            KeyCode::Down => self.current_view_mut().select_next_filter(),
            KeyCode::Char('[') => self.current_view_mut().adjust_filter(BoundEdge::Min, -1),
            KeyCode::Char(']') => self.current_view_mut().adjust_filter(BoundEdge::Min, 1),
            KeyCode::Char('{') => self.current_view_mut().adjust_filter(BoundEdge::Max, -1),
            KeyCode::Char('}') => self.current_view_mut().adjust_filter(BoundEdge::Max, 1),
            KeyCode::Char('r') => self.current_view_mut().reset_filters(),
            KeyCode::PageDown => self.current_view_mut().scroll_table(TABLE_PAGE),
            KeyCode::PageUp => self.current_view_mut().scroll_table(-TABLE_PAGE),
            KeyCode::Left => self.current_view_mut().select_prev_column(),
            KeyCode::Right => self.current_view_mut().select_next_column(),
            KeyCode::Enter | KeyCode::Char('s') => {
                self.current_view_mut().toggle_sort_on_selected()
            }
            _ => {}
        }
    }
}

/// Run the TUI until the user quits.
pub async fn run(config: Config, initial_symbol: Option<String>) -> Result<()> {
    let client = StatementClient::new(&config)?;
    let fetch_on_start = initial_symbol.is_some();
    let mut app = App::new(client, initial_symbol);
    if fetch_on_start {
        app.spawn_fetch();
    }

    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app).await;

    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| view::draw(f, app))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press {
                    app.handle_key(key_event.code);
                }
            }
        }

        app.drain_outcomes();

        if app.should_quit {
            return Ok(());
        }
    }
}
