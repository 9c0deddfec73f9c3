//! Session controller: owns the whole game state and the
//! NotStarted -> Playing -> Over state machine.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::config::GameConfig;
use crate::daycycle::DayCycle;
use crate::render;
use crate::surface::Surface;
use crate::world::{StepEvents, Viewport, World};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    NotStarted,
    Playing,
    Over,
}

/// Result of a command, so hosts can react (sounds, overlays).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Started,
    Flapped,
    Reset,
    /// The command does not apply in the current state.
    Ignored,
}

/// What one tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub events: StepEvents,
    /// The session moved to `Over` during this tick.
    pub game_over: bool,
    /// The time-of-day cycle committed a new phase.
    pub phase_changed: bool,
}

pub struct Game<R = StdRng> {
    config: GameConfig,
    rng: R,
    viewport: Viewport,
    state: State,
    world: World,
    cycle: DayCycle,
    distance: f64,
    score: u32,
    high_score: u32,
    pipes_cleared: u32,
}

impl Game<StdRng> {
    /// Game with a reproducible obstacle sequence.
    pub fn seeded(config: GameConfig, viewport: Viewport, seed: u64) -> Self {
        Game::new(config, viewport, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Game<R> {
    pub fn new(config: GameConfig, viewport: Viewport, rng: R) -> Self {
        let world = World::new(&config.physics, viewport);
        let cycle = DayCycle::new(config.physics.transition_speed);
        Self {
            config,
            rng,
            viewport,
            state: State::NotStarted,
            world,
            cycle,
            distance: 0.0,
            score: 0,
            high_score: 0,
            pipes_cleared: 0,
        }
    }

    /// Begins a fresh run. Only valid from `NotStarted`.
    pub fn start(&mut self) -> Transition {
        if self.state != State::NotStarted {
            return Transition::Ignored;
        }
        self.clear_run();
        self.state = State::Playing;
        info!(
            width = self.viewport.width,
            height = self.viewport.height,
            "Session started"
        );
        Transition::Started
    }

    /// Sets the bird's velocity to the jump value. Before the first start
    /// this starts the game instead.
    pub fn flap(&mut self) -> Transition {
        match self.state {
            State::NotStarted => self.start(),
            State::Playing => {
                self.world.bird.flap(&self.config.physics);
                Transition::Flapped
            }
            State::Over => Transition::Ignored,
        }
    }

    /// Back to the start screen. The high score survives, the day cycle
    /// returns to morning.
    pub fn reset(&mut self) -> Transition {
        if self.state == State::NotStarted {
            return Transition::Ignored;
        }
        self.clear_run();
        self.cycle.reset();
        self.state = State::NotStarted;
        info!(high_score = self.high_score, "Session reset");
        Transition::Reset
    }

    /// Records a new surface size. While waiting to start, the bird is kept
    /// vertically centered.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if self.state == State::NotStarted {
            self.world.bird.y = viewport.height / 2.0;
        }
    }

    /// Advances the simulation by one tick. Returns `None` without touching
    /// anything unless the session is `Playing`.
    pub fn step(&mut self, viewport: Viewport) -> Option<TickOutcome> {
        if self.state != State::Playing {
            return None;
        }
        self.viewport = viewport;
        let physics = self.config.physics.clone();

        let phase_changed = self.cycle.advance();

        let mut events = self
            .world
            .advance_pipes(&physics, viewport, &mut self.rng);
        self.pipes_cleared += events.pipes_passed;
        let mut game_over = events.hit_pipe && self.end();

        if self.state == State::Playing {
            self.distance += physics.pipe_speed;
            self.score = (self.distance / physics.score_divisor).floor() as u32;
            self.high_score = self.high_score.max(self.score);
        }

        if self.world.advance_bird(&physics, viewport) {
            events.hit_ground = true;
            game_over |= self.end();
        }

        Some(TickOutcome {
            events,
            game_over,
            phase_changed,
        })
    }

    /// One scheduled frame: simulate, then paint onto `surface`. Does nothing
    /// while the loop is stopped.
    pub fn frame<S: Surface>(&mut self, surface: &mut S, clock: Duration) -> Option<TickOutcome> {
        let (width, height) = surface.size();
        let outcome = self.step(Viewport::new(width, height))?;
        render::render(self, surface, clock);
        Some(outcome)
    }

    /// Moves to `Over`. Returns `false` if the session had already ended.
    fn end(&mut self) -> bool {
        if self.state == State::Over {
            return false;
        }
        self.state = State::Over;
        self.high_score = self.high_score.max(self.score);
        info!(
            score = self.score,
            high_score = self.high_score,
            pipes_cleared = self.pipes_cleared,
            "Game over"
        );
        true
    }

    fn clear_run(&mut self) {
        self.world = World::new(&self.config.physics, self.viewport);
        self.distance = 0.0;
        self.score = 0;
        self.pipes_cleared = 0;
    }
}

impl<R> Game<R> {
    pub fn state(&self) -> State {
        self.state
    }

    /// The scheduler ticks only while this is `true`.
    pub fn is_running(&self) -> bool {
        self.state == State::Playing
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn pipes_cleared(&self) -> u32 {
        self.pipes_cleared
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn cycle(&self) -> &DayCycle {
        &self.cycle
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
}
