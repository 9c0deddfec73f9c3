//! Entity simulation: the bird, the pipes, and the collisions between them.

use rand::Rng;
use tracing::trace;

use crate::config::Physics;

/// Drawable area in logical pixels. Re-read every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    /// Horizontal center, fixed for the whole session.
    pub x: f64,
    /// Vertical center.
    pub y: f64,
    /// Positive is downward.
    pub velocity: f64,
    pub radius: f64,
}

impl Bird {
    pub fn new(physics: &Physics, viewport: Viewport) -> Self {
        Self {
            x: physics.bird_x,
            y: viewport.height / 2.0,
            velocity: 0.0,
            radius: physics.bird_radius,
        }
    }

    pub fn flap(&mut self, physics: &Physics) {
        self.velocity = physics.jump_strength;
    }

    /// Applies one tick of gravity and the screen bounds. Returns `true` when
    /// the bird hit the ground.
    fn integrate(&mut self, physics: &Physics, ground_y: f64) -> bool {
        self.velocity += physics.gravity;
        self.y += self.velocity;

        let mut grounded = false;
        if self.y + self.radius > ground_y {
            self.y = ground_y - self.radius;
            grounded = true;
        }
        // Pinned at the ceiling, velocity is kept so the bird stalls and falls.
        if self.y - self.radius < 0.0 {
            self.y = self.radius;
        }

        debug_assert!(
            self.y.is_finite() && self.velocity.is_finite(),
            "bird state diverged: y={} v={}",
            self.y,
            self.velocity
        );
        grounded
    }
}

/// One pipe pair. The top segment spans `0..gap_top`, the bottom segment
/// starts at `gap_top + pipe_gap`.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    /// Left edge.
    pub x: f64,
    pub gap_top: f64,
    /// Set once the pipe's right edge has passed the bird.
    pub scored: bool,
}

impl Pipe {
    pub fn gap_bottom(&self, physics: &Physics) -> f64 {
        self.gap_top + physics.pipe_gap
    }

    pub fn right(&self, physics: &Physics) -> f64 {
        self.x + physics.pipe_width
    }

    /// Box-vs-box test, the bird treated as a square of its radius.
    pub fn hits(&self, bird: &Bird, physics: &Physics) -> bool {
        let overlaps_x = bird.x + bird.radius > self.x && bird.x - bird.radius < self.right(physics);
        let outside_gap =
            bird.y - bird.radius < self.gap_top || bird.y + bird.radius > self.gap_bottom(physics);
        overlaps_x && outside_gap
    }
}

/// What happened to the world during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepEvents {
    /// The bird touched a pipe.
    pub hit_pipe: bool,
    /// The bird touched the ground.
    pub hit_ground: bool,
    /// Pipes whose right edge passed the bird this tick.
    pub pipes_passed: u32,
}

impl StepEvents {
    pub fn collided(&self) -> bool {
        self.hit_pipe || self.hit_ground
    }
}

#[derive(Debug, Clone)]
pub struct World {
    pub bird: Bird,
    /// Oldest (leftmost) first.
    pub pipes: Vec<Pipe>,
}

impl World {
    pub fn new(physics: &Physics, viewport: Viewport) -> Self {
        Self {
            bird: Bird::new(physics, viewport),
            pipes: Vec::new(),
        }
    }

    /// Spawns, scrolls, culls and tests the pipes. The bird is not moved.
    pub fn advance_pipes<R: Rng>(
        &mut self,
        physics: &Physics,
        viewport: Viewport,
        rng: &mut R,
    ) -> StepEvents {
        let spawn_due = self
            .pipes
            .last()
            .is_none_or(|p| p.x < viewport.width - physics.pipe_spacing);
        if spawn_due {
            let gap_top = random_gap_top(physics, viewport, rng);
            trace!(x = viewport.width, gap_top, "Spawning pipe");
            self.pipes.push(Pipe {
                x: viewport.width,
                gap_top,
                scored: false,
            });
        }

        for pipe in &mut self.pipes {
            pipe.x -= physics.pipe_speed;
        }
        self.pipes.retain(|p| p.right(physics) >= 0.0);

        let mut events = StepEvents::default();
        for pipe in &mut self.pipes {
            if pipe.hits(&self.bird, physics) {
                events.hit_pipe = true;
            }
            if !pipe.scored && pipe.right(physics) < self.bird.x {
                pipe.scored = true;
                events.pipes_passed += 1;
            }
        }
        events
    }

    /// Applies gravity and bounds to the bird. Returns `true` on ground contact.
    pub fn advance_bird(&mut self, physics: &Physics, viewport: Viewport) -> bool {
        self.bird.integrate(physics, physics.ground_y(viewport.height))
    }
}

/// Uniform in `[margin, height - gap - ground - margin)`, pinned to the
/// margin when the viewport is too short for any range.
fn random_gap_top<R: Rng>(physics: &Physics, viewport: Viewport, rng: &mut R) -> f64 {
    let lo = physics.gap_margin;
    let hi = physics.ground_y(viewport.height) - physics.pipe_gap - physics.gap_margin;
    if hi > lo {
        rng.random_range(lo..hi)
    } else {
        lo
    }
}
