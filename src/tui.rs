use std::{
    io::{self, Stdout, stdout},
    time::Duration,
};

use color_eyre::Result;
use crossterm::{
    cursor,
    event::{
        DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
        Event as CrosstermEvent, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent,
    },
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures_util::StreamExt;
use ratatui::{CompletedFrame, Frame, Terminal, backend::CrosstermBackend, layout::Rect};
use tokio::{
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};
use tokio_util::sync::CancellationToken;
use tracing::instrument;

/// Ticks per second, driving the spinners and picking up background results
const TICK_RATE: f64 = 10.0;
/// Renders per second
const FRAME_RATE: f64 = 30.0;

/// Events that can occur within the TUI application
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A periodic tick event, driving animations and picking up background results
    Tick,
    /// A periodic render event, suggesting the UI should be redrawn
    Render,
    /// Text was pasted into the terminal (requires paste mode)
    Paste(String),
    /// A key was pressed
    Key(KeyEvent),
    /// A mouse event occurred (requires mouse capture)
    Mouse(MouseEvent),
    /// The terminal window was resized (columns and rows)
    Resize(u16, u16),
}

/// Owns the terminal while the grid is displayed on the alternate screen.
///
/// Terminal events are read on a background task and forwarded, along with ticks and renders, through a channel.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    events: UnboundedReceiver<Event>,
    sender: UnboundedSender<Event>,
    reader: Option<JoinHandle<()>>,
    reader_token: CancellationToken,
    cancellation_token: CancellationToken,
    mouse: bool,
    paste: bool,
    entered: bool,
}

impl Tui {
    /// Constructs a new terminal ui, mouse capture and bracketed paste are disabled by default
    pub fn new(cancellation_token: CancellationToken) -> Result<Self> {
        let (sender, events) = mpsc::unbounded_channel();
        Ok(Self {
            terminal: Terminal::new(CrosstermBackend::new(stdout()))?,
            events,
            sender,
            reader: None,
            reader_token: cancellation_token.child_token(),
            cancellation_token,
            mouse: false,
            paste: false,
            entered: false,
        })
    }

    /// Enables or disables mouse event capture, must be set before entering
    pub fn mouse(mut self, mouse: bool) -> Self {
        self.mouse = mouse;
        self
    }

    /// Enables or disables bracketed paste mode, must be set before entering
    pub fn paste(mut self, paste: bool) -> Self {
        self.paste = paste;
        self
    }

    /// Waits for the next event, `None` once the event reader has stopped
    pub async fn next_event(&mut self) -> Option<Event> {
        self.events.recv().await
    }

    /// Switches to the alternate screen in raw mode and starts reading events
    pub fn enter(&mut self) -> Result<()> {
        if self.entered {
            return Ok(());
        }
        tracing::trace!(mouse = self.mouse, paste = self.paste, "Entering the alternate screen");

        terminal::enable_raw_mode()?;
        self.entered = true;
        let out = self.terminal.backend_mut();
        crossterm::execute!(out, EnterAlternateScreen, cursor::Hide)?;
        if self.mouse {
            crossterm::execute!(out, EnableMouseCapture)?;
        }
        if self.paste {
            crossterm::execute!(out, EnableBracketedPaste)?;
        }
        self.terminal.clear()?;

        self.reader = Some(tokio::spawn(read_events(
            self.sender.clone(),
            self.reader_token.clone(),
            self.cancellation_token.clone(),
        )));
        Ok(())
    }

    /// Draws a frame, the callback receives the frame along with the full area of the terminal
    pub fn render<F>(&mut self, render_callback: F) -> io::Result<CompletedFrame<'_>>
    where
        F: FnOnce(&mut Frame, Rect),
    {
        if !self.entered {
            return Err(io::Error::other("Cannot render before entering the alternate screen"));
        }
        self.terminal.draw(|frame| {
            let area = frame.area();
            render_callback(frame, area);
        })
    }

    /// Stops reading events and gives the terminal back
    pub fn exit(mut self) -> Result<()> {
        self.stop_reader();
        self.restore()
    }

    fn stop_reader(&mut self) {
        self.reader_token.cancel();
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
    }

    fn restore(&mut self) -> Result<()> {
        if !self.entered {
            return Ok(());
        }
        self.entered = false;
        tracing::trace!("Leaving the alternate screen");

        let out = self.terminal.backend_mut();
        if self.paste {
            crossterm::execute!(out, DisableBracketedPaste)?;
        }
        if self.mouse {
            crossterm::execute!(out, DisableMouseCapture)?;
        }
        crossterm::execute!(out, LeaveAlternateScreen, cursor::Show)?;
        terminal::disable_raw_mode()?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        self.stop_reader();
        if let Err(err) = self.restore() {
            tracing::error!("Failed to restore the terminal: {err:?}");
        }
    }
}

/// Forwards terminal events, ticks and renders until cancelled or the receiver is dropped
#[instrument(skip_all)]
async fn read_events(sender: UnboundedSender<Event>, reader_token: CancellationToken, app_token: CancellationToken) {
    let mut terminal_events = EventStream::new();
    let mut ticks = interval(Duration::from_secs_f64(1.0 / TICK_RATE));
    let mut renders = interval(Duration::from_secs_f64(1.0 / FRAME_RATE));
    ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
    renders.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        let event = tokio::select! {
            biased;
            _ = reader_token.cancelled() => break,
            maybe_event = terminal_events.next() => match maybe_event {
                Some(Ok(event)) => match translate(event) {
                    Translated::Event(event) => event,
                    Translated::Ignored => continue,
                    Translated::Interrupt => {
                        // Raw mode swallows SIGINT, so ctrl-c arrives as a key instead
                        tracing::debug!("Ctrl+C pressed, cancelling");
                        app_token.cancel();
                        break;
                    }
                },
                Some(Err(err)) => {
                    tracing::error!("Couldn't read terminal events: {err}");
                    break;
                }
                None => break,
            },
            _ = ticks.tick() => Event::Tick,
            _ = renders.tick() => Event::Render,
        };
        if sender.send(event).is_err() {
            break;
        }
    }
    tracing::trace!("Event reader stopped");
}

enum Translated {
    Event(Event),
    Ignored,
    Interrupt,
}

fn translate(event: CrosstermEvent) -> Translated {
    match event {
        CrosstermEvent::Key(KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            ..
        }) => Translated::Interrupt,
        // Releases and repeats are only reported by some terminals
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Translated::Event(Event::Key(key)),
        CrosstermEvent::Mouse(mouse) => Translated::Event(Event::Mouse(mouse)),
        CrosstermEvent::Resize(columns, rows) => Translated::Event(Event::Resize(columns, rows)),
        CrosstermEvent::Paste(text) => Translated::Event(Event::Paste(text)),
        _ => Translated::Ignored,
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEventState, MouseEventKind};
    use pretty_assertions::assert_eq;

    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers, kind: KeyEventKind) -> CrosstermEvent {
        CrosstermEvent::Key(KeyEvent {
            code,
            modifiers,
            kind,
            state: KeyEventState::NONE,
        })
    }

    fn translated(event: CrosstermEvent) -> Option<Event> {
        match translate(event) {
            Translated::Event(event) => Some(event),
            _ => None,
        }
    }

    #[test]
    fn test_ctrl_c_interrupts() {
        let event = key(KeyCode::Char('c'), KeyModifiers::CONTROL, KeyEventKind::Press);
        assert!(matches!(translate(event), Translated::Interrupt));
    }

    #[test]
    fn test_only_key_presses_are_forwarded() {
        let press = key(KeyCode::Char('x'), KeyModifiers::NONE, KeyEventKind::Press);
        let release = key(KeyCode::Char('x'), KeyModifiers::NONE, KeyEventKind::Release);
        assert_eq!(
            translated(press),
            Some(Event::Key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE)))
        );
        assert!(matches!(translate(release), Translated::Ignored));
    }

    #[test]
    fn test_other_events_are_forwarded() {
        assert_eq!(translated(CrosstermEvent::Resize(80, 24)), Some(Event::Resize(80, 24)));
        assert_eq!(
            translated(CrosstermEvent::Paste(String::from("notes"))),
            Some(Event::Paste(String::from("notes")))
        );
        let mouse = MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 1,
            row: 2,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(translated(CrosstermEvent::Mouse(mouse)), Some(Event::Mouse(mouse)));
        assert!(matches!(translate(CrosstermEvent::FocusGained), Translated::Ignored));
    }
}
