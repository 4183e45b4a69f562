//! Terminal host
//!
//! Owns the controller and everything it talks to: the headless media
//! element, the playtime reporter and the settle timers. Events from stdin,
//! the media element and timers are fed through one channel so the
//! controller only ever sees one event at a time.

use crate::commands::{self, Command, HELP};
use crate::config::AppConfig;
use crate::error::Result;
use crate::media::HeadlessMedia;
use std::io::Write;
use std::time::Duration;
use story_playback::{
    apply_media_effect, Direction, Effect, HitTarget, PlaybackPhase, PlayerController,
    PlayerEvent, Point, Slide, ViewMode, NO_TITLE_PLACEHOLDER,
};
use story_server_client::{PlaytimeReporter, StoryServerClient};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// How often the media clock advances
const TICK: Duration = Duration::from_secs(1);

/// Simulated swipe: 120 units in 150ms, well inside the thresholds
const SWIPE_DISTANCE: f32 = 120.0;
const SWIPE_TIME: Duration = Duration::from_millis(150);

pub struct Host<W: Write> {
    controller: PlayerController,
    media: HeadlessMedia,
    client: StoryServerClient,
    reporter: PlaytimeReporter,
    epoch: Instant,
    events_tx: UnboundedSender<PlayerEvent>,
    events_rx: UnboundedReceiver<PlayerEvent>,
    reports: Vec<JoinHandle<()>>,
    progress: Option<(String, String)>,
    out: W,
}

impl<W: Write> Host<W> {
    pub fn new(config: &AppConfig, client: StoryServerClient, out: W) -> Self {
        let (events_tx, events_rx) = unbounded_channel();
        let media = HeadlessMedia::new(
            events_tx.clone(),
            Duration::from_secs(config.player.story_seconds),
        );

        Self {
            controller: PlayerController::new(config.player_config()),
            media,
            reporter: PlaytimeReporter::new(client.clone()),
            client,
            epoch: Instant::now(),
            events_tx,
            events_rx,
            reports: Vec::new(),
            progress: None,
            out,
        }
    }

    pub fn controller(&self) -> &PlayerController {
        &self.controller
    }

    pub fn media(&self) -> &HeadlessMedia {
        &self.media
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Theme the "story" command acts on: focused slide or selected card
    pub fn active_theme_index(&self) -> Option<usize> {
        let session = self.controller.session();
        match self.controller.config().view_mode {
            ViewMode::Carousel => session.current_theme_index(),
            ViewMode::Grid => session
                .selected_theme()
                .and_then(|theme| self.controller.catalog().position(theme)),
        }
    }

    /// Time since the host started
    pub fn now(&self) -> Duration {
        self.epoch.elapsed()
    }

    /// Apply initial state and fetch the catalog
    pub async fn start(&mut self) -> Result<()> {
        let now = self.now();
        for effect in self.controller.startup() {
            self.execute(effect, now)?;
        }
        self.load_catalog().await
    }

    /// Fetch the catalog; a failure leaves the player empty
    pub async fn load_catalog(&mut self) -> Result<()> {
        match self.client.catalog().fetch_themes().await {
            Ok(catalog) => self.dispatch(PlayerEvent::CatalogLoaded(catalog)),
            Err(e) => {
                writeln!(self.out, "! Themen konnten nicht geladen werden: {e}")?;
                self.dispatch(PlayerEvent::CatalogFailed {
                    message: e.to_string(),
                })
            }
        }
    }

    /// Feed one event to the controller and execute its effects
    pub fn dispatch(&mut self, event: PlayerEvent) -> Result<()> {
        let now = self.now();
        let effects = self.controller.handle(event, now);
        for effect in effects {
            self.execute(effect, now)?;
        }
        Ok(())
    }

    /// Dispatch everything queued by the media element and timers
    ///
    /// Returns the number of events handled.
    pub fn pump(&mut self) -> Result<usize> {
        let mut handled = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.dispatch(event)?;
            handled += 1;
        }
        Ok(handled)
    }

    /// Advance the media clock and handle what it reports
    pub fn tick(&mut self, elapsed: Duration) -> Result<()> {
        self.media.advance(elapsed);
        self.pump().map(|_| ())
    }

    /// Run one terminal command; `false` means quit
    pub fn command(&mut self, command: Command) -> Result<bool> {
        match command {
            Command::Event(event) => self.dispatch(event)?,
            Command::Swipe(direction) => self.swipe(direction)?,
            Command::List => self.print_catalog()?,
            Command::Status => self.print_status()?,
            Command::Help => writeln!(self.out, "{HELP}")?,
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }

    /// Interactive loop until end of input or `quit`
    pub async fn run<R>(&mut self, input: R) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        let mut ticker = tokio::time::interval(TICK);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last_tick = Instant::now();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        debug!("Input closed");
                        break;
                    };
                    match commands::parse(&line, self.active_theme_index()) {
                        Ok(Some(command)) => {
                            if !self.command(command)? {
                                break;
                            }
                        }
                        Ok(None) => {}
                        Err(e) => writeln!(self.out, "{e} (type 'help')")?,
                    }
                }
                Some(event) = self.events_rx.recv() => {
                    self.dispatch(event)?;
                }
                _ = ticker.tick() => {
                    let elapsed = last_tick.elapsed();
                    last_tick = Instant::now();
                    self.tick(elapsed)?;
                }
            }
        }

        Ok(())
    }

    /// Flush the running playtime and wait for pending reports
    pub async fn shutdown(mut self) -> Result<()> {
        self.dispatch(PlayerEvent::Unload)?;

        for handle in self.reports.drain(..) {
            if let Err(e) = handle.await {
                warn!(error = %e, "Playtime report task failed");
            }
        }

        info!("Player stopped");
        Ok(())
    }

    fn swipe(&mut self, direction: Direction) -> Result<()> {
        let end = self.now();
        let start = end.saturating_sub(SWIPE_TIME);
        let origin = Point::new(200.0, 100.0);
        let dx = match direction {
            Direction::Next => -SWIPE_DISTANCE,
            Direction::Previous => SWIPE_DISTANCE,
        };

        let effects = self.controller.handle(
            PlayerEvent::GestureStarted {
                point: origin,
                target: HitTarget::Surface,
            },
            start,
        );
        for effect in effects {
            self.execute(effect, start)?;
        }

        let effects = self.controller.handle(
            PlayerEvent::GestureEnded {
                point: Point::new(origin.x + dx, origin.y),
            },
            end,
        );
        for effect in effects {
            self.execute(effect, end)?;
        }
        Ok(())
    }

    fn execute(&mut self, effect: Effect, now: Duration) -> Result<()> {
        if effect.is_media() {
            let effect = match effect {
                Effect::LoadSource { url } => Effect::LoadSource {
                    url: format!("{}{}", self.client.url(), url),
                },
                other => other,
            };
            if let Err(e) = apply_media_effect(&mut self.media, &effect) {
                // Routed back like an element error event
                let _ = self.events_tx.send(PlayerEvent::MediaFailed {
                    message: e.to_string(),
                });
            }
            return Ok(());
        }

        match effect {
            Effect::RenderSlides(slides) => self.print_slides(&slides)?,
            Effect::HighlightTheme(Some(theme)) => writeln!(self.out, "* {theme}")?,
            Effect::HighlightTheme(None) => writeln!(self.out, "* -")?,
            Effect::SetTitle(title) => {
                let title = title.as_deref().unwrap_or(NO_TITLE_PLACEHOLDER);
                writeln!(self.out, "♪ {title}")?;
            }
            Effect::SetPlayIcon { playing } => {
                writeln!(self.out, "{}", if playing { "▶" } else { "⏸" })?;
            }
            Effect::SetMuteIcon { muted } => {
                writeln!(self.out, "{}", if muted { "🔇" } else { "🔊" })?;
            }
            Effect::Progress {
                current, total, ..
            } => self.progress = Some((current, total)),
            Effect::ScheduleSettle { after } => self.schedule_settle(after),
            Effect::ReportPlaytime(report) => {
                self.reports.retain(|handle| !handle.is_finished());
                self.reports.push(self.reporter.report(report));
            }
            Effect::ShowError(message) => writeln!(self.out, "! {message}")?,
            other => debug!(effect = ?other, at = ?now, "View effect"),
        }
        Ok(())
    }

    fn schedule_settle(&self, after: Duration) {
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            let _ = events.send(PlayerEvent::TransitionSettled);
        });
    }

    fn print_slides(&mut self, slides: &[Slide]) -> Result<()> {
        let themes: Vec<String> = slides
            .iter()
            .filter(|slide| !slide.is_clone)
            .enumerate()
            .map(|(i, slide)| format!("{}. {} {}", i + 1, slide.emoji, slide.theme))
            .collect();

        if themes.is_empty() {
            writeln!(self.out, "Keine Themen")?;
        } else {
            writeln!(self.out, "{}", themes.join("   "))?;
        }
        Ok(())
    }

    fn print_catalog(&mut self) -> Result<()> {
        let focused = self.active_theme_index();
        let catalog = self.controller.catalog();

        let mut listing = String::new();
        for (index, theme) in catalog.theme_names().iter().enumerate() {
            let marker = if focused == Some(index) { '>' } else { ' ' };
            listing.push_str(&format!("{marker} {}. {theme}\n", index + 1));
            for story in catalog.stories(theme).unwrap_or_default() {
                listing.push_str(&format!("      - {}\n", story.title));
            }
        }

        write!(self.out, "{listing}")?;
        Ok(())
    }

    fn print_status(&mut self) -> Result<()> {
        let session = self.controller.session();
        let phase = match session.phase() {
            PlaybackPhase::Idle => "idle",
            PlaybackPhase::Paused => "paused",
            PlaybackPhase::Playing => "playing",
        };
        let theme = session
            .current_story()
            .map(|story| story.theme.clone())
            .unwrap_or_else(|| "-".to_string());
        let title = session
            .current_story_title()
            .unwrap_or(NO_TITLE_PLACEHOLDER)
            .to_string();
        let volume = session.volume();
        let volume = if volume.is_muted() {
            "muted".to_string()
        } else {
            format!("{}%", volume.level())
        };

        writeln!(self.out, "[{phase}] {theme}: {title}  volume {volume}")?;
        if let Some((current, total)) = &self.progress {
            writeln!(self.out, "{current} / {total}")?;
        }
        Ok(())
    }
}
