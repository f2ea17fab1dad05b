use color_eyre::Result;
use crossterm::event::MouseEventKind;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::{
    cli::CliProcess,
    component::{Component, EmptyComponent},
    config::{Config, KeyBindingsConfig},
    process::{InteractiveProcess, Process, ProcessOutput},
    service::FeedService,
    tui::{Event, Tui},
};

/// What the app must do after a component handled an event
#[derive(Default)]
pub enum Action {
    /// Keep running
    #[default]
    NoOp,
    /// Leave the TUI with the given output
    Quit(ProcessOutput),
}

/// Runs a single process to completion, either printing its output or hosting its component on the TUI
pub struct App {
    cancellation_token: CancellationToken,
    active_component: Box<dyn Component>,
}
impl App {
    /// Builds the app, the token stops it from anywhere
    pub fn new(cancellation_token: CancellationToken) -> Result<Self> {
        Ok(Self {
            cancellation_token,
            active_component: Box::new(EmptyComponent),
        })
    }

    /// Runs the given process, returning its [ProcessOutput]
    #[instrument(skip_all)]
    pub async fn run(self, config: Config, service: FeedService, process: CliProcess) -> Result<ProcessOutput> {
        match process {
            CliProcess::Browse(browse) => {
                tracing::info!("Running 'browse' process");
                tracing::debug!("Options: {:?}", browse);
                self.run_interactive(browse, config, service).await
            }
            CliProcess::List(list) => {
                tracing::info!("Running 'list' process");
                tracing::debug!("Options: {:?}", list);
                self.run_non_interactive(list, config, service).await
            }
        }
    }

    /// Runs a process that doesn't need the terminal
    async fn run_non_interactive(
        self,
        process: impl Process,
        config: Config,
        service: FeedService,
    ) -> Result<ProcessOutput> {
        process.execute(config, service, self.cancellation_token).await
    }

    /// Runs a process on the alternate screen, unmounting its component once it's done
    async fn run_interactive(
        mut self,
        process: impl InteractiveProcess,
        config: Config,
        service: FeedService,
    ) -> Result<ProcessOutput> {
        // Mount the component before taking over the terminal
        let keybindings = config.keybindings.clone();
        self.active_component = process.into_component(config, service, self.cancellation_token.clone())?;

        let peek_action = self.active_component.init_and_peek().await?;
        let output = if let Action::Quit(output) = peek_action {
            tracing::debug!("A result was received from `init_and_peek`, returning it");
            output
        } else {
            let mut tui = Tui::new(self.cancellation_token.clone())?.paste(true).mouse(true);
            tracing::debug!("Displaying full-screen {} interactively", self.active_component.name());
            tui.enter()?;
            let res = self.main_loop(&mut tui, &keybindings).await;
            tui.exit()?;
            res?
        };

        self.active_component.unmount();
        Ok(output)
    }

    /// Feeds TUI events to the component until it quits or the token is cancelled
    async fn main_loop(&mut self, tui: &mut Tui, keybindings: &KeyBindingsConfig) -> Result<ProcessOutput> {
        loop {
            tokio::select! {
                biased;
                _ = self.cancellation_token.cancelled() => {
                    tracing::info!("Cancellation token received, exiting TUI loop");
                    return Ok(ProcessOutput::fail());
                }
                maybe_event = tui.next_event() => {
                    let Some(tui_event) = maybe_event else {
                        tracing::error!("TUI closed unexpectedly, no event received");
                        return Ok(ProcessOutput::success());
                    };
                    if let Action::Quit(output) = self.handle_tui_event(tui_event, tui, keybindings).await? {
                        return Ok(output);
                    }
                }
            }
        }
    }

    /// Routes a single event to the matching hook of the component
    #[instrument(skip_all)]
    async fn handle_tui_event(
        &mut self,
        event: Event,
        tui: &mut Tui,
        keybindings: &KeyBindingsConfig,
    ) -> Result<Action> {
        if event != Event::Tick
            && event != Event::Render
            && !matches!(event, Event::Mouse(m) if m.kind == MouseEventKind::Moved)
        {
            tracing::trace!("{event:?}");
        }
        let ac = &mut self.active_component;
        Ok(match event {
            Event::Render => {
                tui.render(|frame, area| ac.render(frame, area))?;
                Action::NoOp
            }
            Event::Tick => ac.tick()?,
            // The next render picks up the new size
            Event::Resize(_, _) => Action::NoOp,
            Event::Paste(content) => ac.process_paste_event(content)?,
            Event::Key(key) => ac.process_key_event(keybindings, key).await?,
            Event::Mouse(mouse) => ac.process_mouse_event(mouse)?,
        })
    }
}
