use async_trait::async_trait;
use color_eyre::Result;
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    backend::FromCrossterm,
    layout::{Alignment, Constraint, Layout, Position, Rect},
    style::Style,
    widgets::Paragraph,
};
use tokio::{sync::watch, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use super::Component;
use crate::{
    app::Action,
    config::{Config, Theme},
    model::{AppEntry, FilterMode, filter_entries},
    process::ProcessOutput,
    service::{ArtworkState, FeedService},
    store::FeedSnapshot,
    widgets::{AppCell, GRID_COLUMNS, GridLayout, LoadingSpinner, SearchBar, scroll_to_selection},
};

const LOADING_MESSAGE: &str = "Loading apps";
const EMPTY_FEED_MESSAGE: &str = "There are no apps to display";

/// A component displaying the apps of the feed in a searchable grid
pub struct FeedGridComponent {
    /// The visual theme for styling the component
    theme: Theme,
    /// Service to fetch the feed and the artwork
    service: FeedService,
    /// Geometry of the grid cells
    layout: GridLayout,
    /// How the query is matched against the entries
    mode: FilterMode,
    /// Token bound to the lifetime of the component, cancelled on unmount
    cancellation_token: CancellationToken,
    /// Receives every replacement of the published entries
    receiver: watch::Receiver<FeedSnapshot>,
    /// Latest entries seen from the store
    entries: FeedSnapshot,
    /// The fetch in progress, if any
    fetch_task: Option<JoinHandle<bool>>,
    search: SearchBar<'static>,
    spinner: LoadingSpinner<'static>,
    /// Index of the selected entry, within the filtered ones
    selected: usize,
    /// First grid row being displayed
    scroll_row: usize,
    /// Areas from the last render, used for mouse hit-testing
    search_area: Rect,
    cell_areas: Vec<(usize, Rect)>,
}

impl FeedGridComponent {
    /// Creates a new [`FeedGridComponent`], the feed is not fetched until the component is mounted
    pub fn new(
        service: FeedService,
        config: Config,
        query: impl Into<String>,
        mode: FilterMode,
        cancellation_token: CancellationToken,
    ) -> Self {
        let artwork_rows = if service.artwork().is_enabled() {
            config.grid.artwork_rows
        } else {
            0
        };
        let receiver = service.store().subscribe();
        let entries = receiver.borrow().clone();
        Self {
            search: SearchBar::new(&config.theme).with_query(query),
            spinner: LoadingSpinner::new(&config.theme).with_message(LOADING_MESSAGE),
            theme: config.theme,
            service,
            layout: GridLayout::new(artwork_rows),
            mode,
            cancellation_token: cancellation_token.child_token(),
            receiver,
            entries,
            fetch_task: None,
            selected: 0,
            scroll_row: 0,
            search_area: Rect::default(),
            cell_areas: Vec::new(),
        }
    }

    /// Retrieves the entries matching the current query, in feed order
    pub(crate) fn visible_entries(&self) -> Vec<&AppEntry> {
        filter_entries(&self.entries, self.search.query(), self.mode)
    }

    /// Whether a fetch is still in progress
    fn is_loading(&self) -> bool {
        self.fetch_task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Picks up the latest entries published on the store, if they changed
    fn sync_entries(&mut self) {
        if self.receiver.has_changed().unwrap_or(false) {
            self.entries = self.receiver.borrow_and_update().clone();
            tracing::debug!("Received {} entries from the store", self.entries.len());
            self.clamp_selection();
        }
    }

    /// Spawns a new fetch of the feed, unless there's one already in progress
    fn spawn_fetch(&mut self) {
        if self.is_loading() {
            tracing::debug!("Skipping refresh, the feed is already being fetched");
            return;
        }
        self.fetch_task = Some(self.service.spawn_refresh(self.cancellation_token.clone()));
    }

    fn reset_selection(&mut self) {
        self.selected = 0;
        self.scroll_row = 0;
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_entries().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    fn select(&mut self, index: usize) {
        let len = self.visible_entries().len();
        if len > 0 {
            self.selected = index.min(len - 1);
        }
    }

    /// Renders a single line of text in the middle of the area
    fn render_message(&self, frame: &mut Frame, area: Rect, message: String) {
        let line_area = Rect {
            y: area.y + area.height.saturating_sub(1) / 2,
            height: area.height.min(1),
            ..area
        };
        let style = Style::from_crossterm(self.theme.muted);
        frame.render_widget(
            Paragraph::new(message).style(style).alignment(Alignment::Center),
            line_area,
        );
    }
}

#[async_trait]
impl Component for FeedGridComponent {
    fn name(&self) -> &'static str {
        "FeedGridComponent"
    }

    #[instrument(skip_all)]
    async fn init_and_peek(&mut self) -> Result<Action> {
        tracing::info!("Mounting the grid, fetching the feed");
        self.spawn_fetch();
        Ok(Action::NoOp)
    }

    fn unmount(&mut self) {
        tracing::debug!("Unmounting the grid, cancelling background tasks");
        self.cancellation_token.cancel();
    }

    #[instrument(skip_all)]
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.sync_entries();

        let [search_area, grid_area] = Layout::vertical([Constraint::Length(3), Constraint::Min(1)]).areas(area);
        self.search_area = search_area;
        frame.render_widget(&self.search, search_area);

        let query = self.search.query();
        let entries = filter_entries(&self.entries, query, self.mode);
        if entries.is_empty() {
            self.cell_areas.clear();
            if self.is_loading() {
                self.spinner.render_in(frame, grid_area);
            } else if self.entries.is_empty() {
                self.render_message(frame, grid_area, EMPTY_FEED_MESSAGE.to_owned());
            } else {
                self.render_message(frame, grid_area, format!("No apps matching '{query}'"));
            }
            return;
        }

        // Keep the selection within the grid and visible
        let selected = self.selected.min(entries.len() - 1);
        let visible_rows = self.layout.visible_rows(grid_area.height);
        let total_rows = GridLayout::total_rows(entries.len());
        let scroll_row = scroll_to_selection(selected, self.scroll_row, visible_rows)
            .min(total_rows.saturating_sub(visible_rows));

        let cell_areas = self.layout.cell_areas(grid_area, entries.len(), scroll_row);
        let artwork = self.service.artwork();
        let artwork_rows = self.layout.artwork_rows();
        let spinner = self.spinner.current_char();
        for &(index, cell_area) in &cell_areas {
            let entry = entries[index];
            let cell = AppCell::new(entry, query, &self.theme, index == selected);
            if artwork.is_enabled() {
                // Artwork is only requested once the cell is realized
                let state: ArtworkState = artwork.request(&entry.artwork_url, &self.cancellation_token);
                frame.render_widget(cell.artwork(&state, artwork_rows, spinner), cell_area);
            } else {
                frame.render_widget(cell, cell_area);
            }
        }

        self.selected = selected;
        self.scroll_row = scroll_row;
        self.cell_areas = cell_areas;
    }

    fn tick(&mut self) -> Result<Action> {
        self.spinner.tick();
        if self.fetch_task.as_ref().is_some_and(JoinHandle::is_finished) {
            self.fetch_task = None;
        }
        self.sync_entries();
        Ok(Action::NoOp)
    }

    fn exit(&mut self) -> Result<Option<ProcessOutput>> {
        if self.search.is_active() {
            tracing::debug!("Cancelling the search: user request");
            self.search.cancel();
            self.reset_selection();
            Ok(None)
        } else {
            tracing::info!("User requested to exit");
            Ok(Some(ProcessOutput::success()))
        }
    }

    fn process_mouse_event(&mut self, mouse: MouseEvent) -> Result<Action> {
        match mouse.kind {
            MouseEventKind::ScrollDown => self.move_down(),
            MouseEventKind::ScrollUp => self.move_up(),
            MouseEventKind::Down(MouseButton::Left) => {
                let position = Position::new(mouse.column, mouse.row);
                if self.search_area.contains(position) {
                    self.search.activate();
                } else if let Some(index) = self
                    .cell_areas
                    .iter()
                    .find_map(|(index, area)| area.contains(position).then_some(*index))
                {
                    self.select(index);
                }
                Ok(Action::NoOp)
            }
            _ => Ok(Action::NoOp),
        }
    }

    fn move_up(&mut self) -> Result<Action> {
        if self.selected >= GRID_COLUMNS {
            self.selected -= GRID_COLUMNS;
        }
        Ok(Action::NoOp)
    }

    fn move_down(&mut self) -> Result<Action> {
        let len = self.visible_entries().len();
        if len > 0 && self.selected / GRID_COLUMNS < (len - 1) / GRID_COLUMNS {
            self.selected = (self.selected + GRID_COLUMNS).min(len - 1);
        }
        Ok(Action::NoOp)
    }

    fn move_left(&mut self, word: bool) -> Result<Action> {
        if self.search.is_active() {
            self.search.move_cursor_left(word);
        } else {
            self.selected = self.selected.saturating_sub(1);
        }
        Ok(Action::NoOp)
    }

    fn move_right(&mut self, word: bool) -> Result<Action> {
        if self.search.is_active() {
            self.search.move_cursor_right(word);
        } else {
            self.select(self.selected + 1);
        }
        Ok(Action::NoOp)
    }

    fn move_home(&mut self) -> Result<Action> {
        if self.search.is_active() {
            self.search.move_home();
        } else {
            self.reset_selection();
        }
        Ok(Action::NoOp)
    }

    fn move_end(&mut self) -> Result<Action> {
        if self.search.is_active() {
            self.search.move_end();
        } else {
            self.select(usize::MAX);
        }
        Ok(Action::NoOp)
    }

    fn insert_text(&mut self, text: String) -> Result<Action> {
        if self.search.insert_str(text) {
            self.reset_selection();
        }
        Ok(Action::NoOp)
    }

    fn insert_char(&mut self, c: char) -> Result<Action> {
        if self.search.insert_char(c) {
            self.reset_selection();
        }
        Ok(Action::NoOp)
    }

    fn delete(&mut self, backspace: bool, word: bool) -> Result<Action> {
        if self.search.delete(backspace, word) {
            self.reset_selection();
        }
        Ok(Action::NoOp)
    }

    fn activate_search(&mut self) -> Result<Action> {
        self.search.activate();
        Ok(Action::NoOp)
    }

    #[instrument(skip_all)]
    async fn selection_confirm(&mut self) -> Result<Action> {
        let selected = self.visible_entries().get(self.selected).map(|entry| entry.to_string());
        Ok(match selected {
            Some(entry) => {
                tracing::info!("Selected app: {entry}");
                Action::Quit(ProcessOutput::success().stdout(entry))
            }
            None => Action::NoOp,
        })
    }

    fn refresh(&mut self) -> Result<Action> {
        tracing::info!("Refreshing the feed: user request");
        self.spawn_fetch();
        Ok(Action::NoOp)
    }
}

impl Drop for FeedGridComponent {
    fn drop(&mut self) {
        self.cancellation_token.cancel();
    }
}
