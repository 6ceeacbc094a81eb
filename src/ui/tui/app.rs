//! Interactive application state and rendering.
//!
//! The app never writes session state itself; every edit goes through the
//! controller and the next `sync` picks up a fresh snapshot. New results are
//! first drawn hidden, and the entrance animation starts once the scheduler
//! reports that a frame containing them has been committed.

use std::time::{Duration, Instant};

use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use tokio::sync::mpsc;

use super::keys::{hint, map_key, Action};
use crate::animator::{AnimationScheduler, EntranceAnimation, LineFrame, StaggerTiming, Tweenable};
use crate::controller::{ControllerEvent, TranslationController, TranslationState};
use crate::error::SlangResult;
use crate::ui::colors::Theme;

const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Display options for the interactive UI.
#[derive(Debug, Clone)]
pub struct UiOptions {
    /// Whether results animate in
    pub animate: bool,
    /// Entrance animation timing
    pub timing: StaggerTiming,
    /// Delay between the first committed frame and the animation start
    pub settle: Duration,
    /// Color theme
    pub theme: Theme,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            animate: true,
            timing: StaggerTiming::default(),
            settle: Duration::from_millis(50),
            theme: Theme::default(),
        }
    }
}

/// The interactive application.
pub struct App {
    controller: TranslationController,
    events: mpsc::UnboundedReceiver<ControllerEvent>,
    state: TranslationState,
    revision: u64,
    animation: EntranceAnimation,
    scheduler: AnimationScheduler,
    panel_cursor: usize,
    notice: Option<String>,
    options: UiOptions,
    started: Instant,
    quit: bool,
}

impl App {
    /// Create the app around a controller and its event receiver.
    pub fn new(
        controller: TranslationController,
        events: mpsc::UnboundedReceiver<ControllerEvent>,
        options: UiOptions,
    ) -> Self {
        let (state, revision) = controller.snapshot_with_revision();
        let panel_cursor = controller
            .catalog()
            .position(&state.selected_level_id)
            .unwrap_or(0);
        Self {
            animation: EntranceAnimation::new(options.timing),
            scheduler: AnimationScheduler::new(options.settle),
            controller,
            events,
            state,
            revision,
            panel_cursor,
            notice: None,
            options,
            started: Instant::now(),
            quit: false,
        }
    }

    /// Latest snapshot of the session.
    pub fn state(&self) -> &TranslationState {
        &self.state
    }

    /// Message shown in the status line, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Whether the user asked to leave.
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Whether a new result is waiting to be animated.
    pub fn animation_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// Drain controller events and take a fresh snapshot.
    pub fn sync(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            if let ControllerEvent::TranslationReady { revision, .. } = event {
                if self.options.animate {
                    self.animation.stop();
                    self.scheduler.request(revision);
                }
            }
        }
        let (state, revision) = self.controller.snapshot_with_revision();
        if !state.panel_open {
            if let Some(position) = self.controller.catalog().position(&state.selected_level_id) {
                self.panel_cursor = position;
            }
        }
        self.state = state;
        self.revision = revision;
    }

    /// Handle a key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        let action = map_key(key, self.state.panel_open);
        self.apply(action);
    }

    /// Perform an action.
    pub fn apply(&mut self, action: Action) {
        self.notice = None;
        if let Err(err) = self.dispatch(action) {
            if err.is_surfaced() {
                self.notice = Some(err.to_string());
            }
        }
        self.sync();
    }

    fn dispatch(&mut self, action: Action) -> SlangResult<()> {
        match action {
            Action::Insert(c) => {
                let mut text = self.state.input_text.clone();
                text.push(c);
                self.controller.set_input_text(text);
            }
            Action::Backspace => {
                let mut text = self.state.input_text.clone();
                text.pop();
                self.controller.set_input_text(text);
            }
            Action::ClearInput => self.controller.set_input_text(String::new()),
            Action::Translate => self.controller.translate(false).map(drop)?,
            Action::NextLevel => self.controller.select_next_level().map(drop)?,
            Action::PreviousLevel => self.controller.select_previous_level().map(drop)?,
            Action::TogglePanel => self.controller.toggle_panel(),
            Action::PanelUp => {
                let len = self.controller.catalog().len().max(1);
                self.panel_cursor = (self.panel_cursor + len - 1) % len;
            }
            Action::PanelDown => {
                let len = self.controller.catalog().len().max(1);
                self.panel_cursor = (self.panel_cursor + 1) % len;
            }
            Action::PanelSelect => {
                let id = self
                    .controller
                    .catalog()
                    .levels()
                    .get(self.panel_cursor)
                    .map(|level| level.id.clone());
                if let Some(id) = id {
                    if !self.state.has_input() {
                        self.controller.close_panel();
                    }
                    self.controller.select_level(&id).map(drop)?;
                }
            }
            Action::Copy => self.controller.copy_result()?,
            Action::Replay => {
                if !self.options.animate {
                    self.notice = Some("Animations are disabled".to_string());
                } else if self.state.result_lines().is_empty()
                    || !self.animation.replay(Instant::now())
                {
                    self.notice = Some("Nothing to replay".to_string());
                }
            }
            Action::Quit => self.quit = true,
            Action::Ignore => {}
        }
        Ok(())
    }

    /// Report that a frame has been drawn. Starts the animation when due.
    pub fn on_frame_committed(&mut self, now: Instant) {
        if !self.options.animate {
            return;
        }
        let lines = self.state.result_lines().len();
        if let Some(count) = self.scheduler.on_frame_committed(self.revision, lines, now) {
            self.animation.play(count, now);
        }
    }

    fn line_frame(&self, index: usize, now: Instant) -> LineFrame {
        if self.scheduler.pending_revision() == Some(self.revision) {
            LineFrame::hidden(self.options.timing.offset)
        } else {
            self.animation.frame_for(index, now)
        }
    }

    /// Render the current state.
    pub fn render(&self, frame: &mut Frame) {
        self.render_at(frame, Instant::now());
    }

    /// Render the current state as seen at `now`.
    pub fn render_at(&self, frame: &mut Frame, now: Instant) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(1), // Title and status
                Constraint::Length(5), // Input
                Constraint::Length(1), // Levels
                Constraint::Min(3),    // Result
                Constraint::Length(1), // Hints
            ])
            .split(area);

        self.render_title(frame, chunks[0], now);
        self.render_input(frame, chunks[1]);
        self.render_levels(frame, chunks[2]);
        self.render_result(frame, chunks[3], now);
        self.render_footer(frame, chunks[4]);

        if self.state.panel_open {
            self.render_panel(frame, area);
        }
    }

    fn render_title(&self, frame: &mut Frame, area: Rect, now: Instant) {
        let theme = &self.options.theme;
        let mut spans = vec![Span::styled(
            "slangify",
            Style::default()
                .fg(Theme::tui(theme.accent))
                .add_modifier(Modifier::BOLD),
        )];
        if self.state.loading {
            let tick = now.saturating_duration_since(self.started).as_millis() / 80;
            let spinner = SPINNER[(tick as usize) % SPINNER.len()];
            spans.push(Span::styled(
                format!("  {} translating…", spinner),
                Style::default().fg(Theme::tui(theme.loading)),
            ));
        }
        if self.state.copied {
            spans.push(Span::styled(
                "  ✓ copied",
                Style::default().fg(Theme::tui(theme.success)),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_input(&self, frame: &mut Frame, area: Rect) {
        let theme = &self.options.theme;
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Text ")
            .border_style(Style::default().fg(Theme::tui(theme.muted)));
        let text = if self.state.input_text.is_empty() {
            Line::from(Span::styled(
                "Type something to slangify…",
                Style::default().fg(Theme::tui(theme.muted)),
            ))
        } else {
            Line::from(format!("{}▏", self.state.input_text))
        };
        frame.render_widget(
            Paragraph::new(text).block(block).wrap(Wrap { trim: false }),
            area,
        );
    }

    fn render_levels(&self, frame: &mut Frame, area: Rect) {
        let theme = &self.options.theme;
        let mut spans = vec![Span::styled(
            "Level: ",
            Style::default().fg(Theme::tui(theme.muted)),
        )];
        for level in self.controller.catalog().levels() {
            let style = if level.id == self.state.selected_level_id {
                Style::default()
                    .fg(Theme::tui(theme.background))
                    .bg(Theme::tui(theme.accent))
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Theme::tui(theme.text))
            };
            spans.push(Span::styled(format!(" {} ", level.label), style));
            spans.push(Span::raw(" "));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_result(&self, frame: &mut Frame, area: Rect, now: Instant) {
        let theme = &self.options.theme;
        let title = match self.controller.selected_level() {
            Some(level) => format!(" Result ({}) ", level.label),
            None => " Result ".to_string(),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(Theme::tui(theme.muted)));

        let lines: Vec<Line> = if let Some(error) = &self.state.error {
            vec![Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Theme::tui(theme.error)),
            ))]
        } else if self.state.translated_text.is_some() {
            self.state
                .result_lines()
                .iter()
                .enumerate()
                .map(|(index, line)| {
                    let line_frame = self.line_frame(index, now);
                    let color = theme.background.lerp(&theme.text, line_frame.opacity);
                    let padding = line_frame.offset.round().max(0.0) as usize;
                    Line::from(vec![
                        Span::raw(" ".repeat(padding)),
                        Span::styled(line.to_string(), Style::default().fg(Theme::tui(color))),
                    ])
                })
                .collect()
        } else {
            vec![Line::from(Span::styled(
                "Your translation will appear here.",
                Style::default().fg(Theme::tui(theme.muted)),
            ))]
        };

        frame.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
            area,
        );
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let theme = &self.options.theme;
        let notice = self
            .notice
            .as_deref()
            .filter(|notice| self.state.error.as_deref() != Some(*notice));
        let line = match notice {
            Some(notice) => Line::from(Span::styled(
                format!(" {}", notice),
                Style::default().fg(Theme::tui(theme.error)),
            )),
            None => Line::from(Span::styled(
                hint(self.state.panel_open),
                Style::default().fg(Theme::tui(theme.muted)),
            )),
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_panel(&self, frame: &mut Frame, area: Rect) {
        let theme = &self.options.theme;
        let levels = self.controller.catalog().levels();
        let width = 40_u16.min(area.width.saturating_sub(4));
        let height = (levels.len() as u16 + 2).min(area.height.saturating_sub(2));
        let panel_area = Rect {
            x: area.x + (area.width.saturating_sub(width)) / 2,
            y: area.y + (area.height.saturating_sub(height)) / 2,
            width,
            height,
        };

        let lines: Vec<Line> = levels
            .iter()
            .enumerate()
            .map(|(index, level)| {
                let cursor = if index == self.panel_cursor { "›" } else { " " };
                let marker = if level.id == self.state.selected_level_id {
                    "●"
                } else {
                    "○"
                };
                let style = if index == self.panel_cursor {
                    Style::default()
                        .fg(Theme::tui(theme.accent))
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Theme::tui(theme.text))
                };
                Line::from(Span::styled(
                    format!("{} {} {}", cursor, marker, level.label),
                    style,
                ))
            })
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Slang level ")
            .border_style(Style::default().fg(Theme::tui(theme.accent)));
        frame.render_widget(Clear, panel_area);
        frame.render_widget(Paragraph::new(lines).block(block), panel_area);
    }
}
