use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
    PushKeyboardEnhancementFlags,
};
use ratatui::DefaultTerminal;
use rosetris_engine::{Direction, GameSession};

use crate::ui::widgets::SessionScreen;

/// Poll interval while no gravity is scheduled (menu, pause, game over).
const IDLE_POLL: Duration = Duration::from_millis(250);

pub(crate) struct PlayApp {
    session: GameSession,
    release_events: bool,
    exiting: bool,
}

impl PlayApp {
    pub(crate) fn new(session: GameSession) -> Self {
        Self {
            session,
            release_events: false,
            exiting: false,
        }
    }

    /// Drives the terminal event loop.
    ///
    /// Gravity and input are serialized here: the loop sleeps until either a
    /// key arrives or the session's fall interval elapses, so soft drop and
    /// level-ups change the cadence at the next tick boundary and no tick
    /// fires while the session is paused or at rest.
    pub(crate) fn run(&mut self, terminal: &mut DefaultTerminal) -> anyhow::Result<()> {
        self.release_events = crossterm::terminal::supports_keyboard_enhancement().unwrap_or(false);
        if self.release_events {
            crossterm::execute!(
                io::stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }
        let result = self.event_loop(terminal);
        if self.release_events {
            let _ = crossterm::execute!(io::stdout(), PopKeyboardEnhancementFlags);
        }
        result
    }

    fn event_loop(&mut self, terminal: &mut DefaultTerminal) -> anyhow::Result<()> {
        let mut next_tick = Instant::now() + self.session.fall_interval();
        loop {
            terminal.draw(|frame| {
                frame.render_widget(SessionScreen::new(&self.session), frame.area());
            })?;
            if self.exiting {
                return Ok(());
            }

            if !self.session.is_running() {
                // No gravity outside Running; keep re-arming the clock so a
                // resume grants one full interval.
                next_tick = Instant::now() + self.session.fall_interval();
                if event::poll(IDLE_POLL)? {
                    self.handle_event(&event::read()?);
                }
                continue;
            }

            let timeout = next_tick.saturating_duration_since(Instant::now());
            if event::poll(timeout)? {
                self.handle_event(&event::read()?);
                // A command may have shortened the interval (soft drop);
                // lengthening waits for the boundary.
                next_tick = next_tick.min(Instant::now() + self.session.fall_interval());
            } else {
                self.session.tick();
                next_tick = Instant::now() + self.session.fall_interval();
            }
        }
    }

    fn handle_event(&mut self, event: &Event) {
        let Some(key) = event.as_key_event() else {
            return;
        };
        if key.kind == KeyEventKind::Release {
            if matches!(key.code, KeyCode::Down | KeyCode::Char('s')) {
                self.session.set_fast_fall(false);
            }
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.exiting = true,
            KeyCode::Left | KeyCode::Char('a') => self.session.move_side(Direction::Left),
            KeyCode::Right | KeyCode::Char('d') => self.session.move_side(Direction::Right),
            KeyCode::Up | KeyCode::Char('w') => self.session.rotate(),
            KeyCode::Down | KeyCode::Char('s') => {
                if self.release_events {
                    self.session.set_fast_fall(true);
                } else {
                    // Without key release reporting a press advances one
                    // gravity step instead of latching soft drop.
                    self.session.tick();
                }
            }
            KeyCode::Char('h') => self.session.hold(),
            KeyCode::Char('p') => {
                if self.session.is_running() {
                    self.session.pause();
                } else {
                    self.session.resume();
                }
            }
            KeyCode::Enter => {
                if self.session.is_game_over() {
                    self.session.reset();
                } else {
                    self.session.start();
                }
            }
            KeyCode::Char('r') => self.session.reset(),
            _ => {}
        }
    }
}
