//! Terminal host: owns the screen, maps input to game commands and runs the
//! frame loop.

use std::io::{self, Stdout, Write, stdout};
use std::time::Duration;

use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute, terminal,
};
use tracing::info;

use crate::audio::Audio;
use crate::clock::FrameClock;
use crate::config::GameConfig;
use crate::error::Result;
use crate::hud;
use crate::raster::Canvas;
use crate::render;
use crate::session::{Game, State, Transition};
use crate::surface::Surface;
use crate::world::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostAction {
    Flap,
    Start,
    Reset,
    Quit,
    /// New terminal size in cells.
    Resize(u16, u16),
}

pub fn map_event(event: &Event) -> Option<HostAction> {
    match event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) => match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                Some(HostAction::Quit)
            }
            KeyCode::Char(' ' | 'w' | 'W') | KeyCode::Up => Some(HostAction::Flap),
            KeyCode::Enter | KeyCode::Char('s' | 'S') => Some(HostAction::Start),
            KeyCode::Char('r' | 'R') => Some(HostAction::Reset),
            KeyCode::Char('q' | 'Q') | KeyCode::Esc => Some(HostAction::Quit),
            _ => None,
        },
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            ..
        }) => Some(HostAction::Flap),
        Event::Resize(cols, rows) => Some(HostAction::Resize(*cols, *rows)),
        _ => None,
    }
}

/// Runs the game until the player quits. The terminal is restored on every
/// exit path.
pub fn run(config: GameConfig, seed: u64, muted: bool) -> Result<()> {
    let mut out = stdout();
    let result = setup(&mut out)
        .map_err(Into::into)
        .and_then(|()| run_loop(&mut out, config, seed, muted));
    let restored = teardown(&mut out);
    result.and(restored.map_err(Into::into))
}

fn setup(out: &mut Stdout) -> io::Result<()> {
    terminal::enable_raw_mode()?;
    execute!(
        out,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        terminal::DisableLineWrap,
        EnableMouseCapture,
    )
}

fn teardown(out: &mut Stdout) -> io::Result<()> {
    execute!(
        out,
        DisableMouseCapture,
        terminal::LeaveAlternateScreen,
        cursor::Show,
        terminal::EnableLineWrap,
    )?;
    terminal::disable_raw_mode()
}

fn run_loop(out: &mut impl Write, config: GameConfig, seed: u64, muted: bool) -> Result<()> {
    let logical_height = config.host.logical_height;
    let fps = config.host.fps;

    let (cols, rows) = terminal::size()?;
    let mut canvas = Canvas::new(cols as usize, rows as usize * 2, logical_height);
    let (w, h) = canvas.size();
    let mut game = Game::seeded(config, Viewport::new(w, h), seed);
    let audio = Audio::new(muted);
    let mut clock = FrameClock::new(fps);
    info!(
        seed,
        fps,
        frame_ms = clock.frame_duration().as_millis() as u64,
        audio = audio.is_enabled(),
        "Terminal host ready"
    );

    let mut dirty = true;
    loop {
        let now = clock.begin();

        while event::poll(Duration::ZERO)? {
            let Some(action) = map_event(&event::read()?) else {
                continue;
            };
            let transition = match action {
                HostAction::Quit => return Ok(()),
                HostAction::Flap => game.flap(),
                HostAction::Start => game.start(),
                HostAction::Reset => game.reset(),
                HostAction::Resize(cols, rows) => {
                    canvas.resize(cols as usize, rows as usize * 2, logical_height);
                    let (w, h) = canvas.size();
                    game.resize(Viewport::new(w, h));
                    dirty = true;
                    continue;
                }
            };
            if matches!(transition, Transition::Started | Transition::Flapped) {
                audio.play_flap();
            }
            dirty |= transition != Transition::Ignored;
        }

        if game.is_running() {
            if game.frame(&mut canvas, now).is_some_and(|o| o.game_over) {
                audio.play_death();
            }
            draw_overlay(&mut canvas, &game);
            canvas.present(out)?;
        } else if dirty {
            render::render(&game, &mut canvas, now);
            draw_overlay(&mut canvas, &game);
            canvas.present(out)?;
            dirty = false;
        }

        clock.pace();
    }
}

fn draw_overlay<R>(canvas: &mut Canvas, game: &Game<R>) {
    match game.state() {
        State::NotStarted => hud::draw_start_screen(canvas, &game.config().theme, game.high_score()),
        State::Playing => hud::draw_score(canvas, game.score()),
        State::Over => hud::draw_game_over(
            canvas,
            game.score(),
            game.high_score(),
            game.pipes_cleared(),
        ),
    }
}
