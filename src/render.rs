//! Scene renderer. Paints back to front: sky, pipes, ground, bird.
//!
//! Everything here reads game state and issues draw calls; nothing is
//! mutated. The only outside input is the wall clock, used for the wing
//! beat and the star twinkle.

use std::time::Duration;

use crate::color::Rgb;
use crate::config::{Physics, Theme};
use crate::daycycle::{Phase, SkyPalette};
use crate::session::Game;
use crate::surface::{Paint, Shape, Stop, Surface, pt, stop};
use crate::world::{Bird, Pipe};

const SUN_RADIUS: f64 = 40.0;
const SUN_GLOW_ALPHA: f64 = 0xAA as f64 / 255.0;
const STAR_COUNT: usize = 50;
const CLOUD_ALPHA: f64 = 0.6;
const CAP_HEIGHT: f64 = 35.0;
const CAP_OVERHANG: f64 = 5.0;
const HIGHLIGHT_ALPHA: f64 = 0.2;
const OUTLINE_ALPHA: f64 = 0.3;
const SHADOW_ALPHA: f64 = 0.2;
/// Radians of nose tilt per unit of vertical velocity.
const TILT_PER_VELOCITY: f64 = 0.05;

pub fn render<R, S: Surface>(game: &Game<R>, surface: &mut S, clock: Duration) {
    let physics = &game.config().physics;
    let theme = &game.config().theme;
    let cycle = game.cycle();

    draw_sky(surface, &cycle.palette(), cycle.current(), clock);
    for pipe in &game.world().pipes {
        draw_pipe(surface, pipe, physics, theme);
    }
    draw_ground(surface, physics, theme);
    draw_bird(surface, &game.world().bird, theme, clock);
}

pub fn draw_sky<S: Surface>(surface: &mut S, palette: &SkyPalette, phase: Phase, clock: Duration) {
    let (w, h) = surface.size();
    surface.fill(
        &Shape::rect(0.0, 0.0, w, h),
        &Paint::Linear {
            from: pt(0.0, 0.0),
            to: pt(0.0, h),
            stops: vec![stop(0.0, palette.top), stop(1.0, palette.bottom)],
        },
    );

    let sun = pt(w * 0.8, h * 0.2);
    surface.fill(
        &Shape::circle(sun, SUN_RADIUS * 2.0),
        &Paint::Radial {
            center: sun,
            inner: SUN_RADIUS * 0.5,
            outer: SUN_RADIUS * 2.0,
            stops: vec![
                Stop {
                    offset: 0.0,
                    color: palette.sun,
                    alpha: SUN_GLOW_ALPHA,
                },
                Stop {
                    offset: 1.0,
                    color: palette.sun,
                    alpha: 0.0,
                },
            ],
        },
    );
    surface.fill(&Shape::circle(sun, SUN_RADIUS), &Paint::solid(palette.sun));

    if phase == Phase::Night {
        let decisecond = clock.as_millis() as u64 / 100;
        let white = Paint::solid(Rgb::WHITE);
        for i in 0..STAR_COUNT {
            let x = (i as f64 * 137.5) % w;
            let y = (i as f64 * 73.3) % (h * 0.6);
            let size = twinkle(i as u64, decisecond) * 2.0;
            surface.fill(&Shape::circle(pt(x, y), size), &white);
        }
    } else {
        let cloud = Paint::translucent(Rgb::WHITE, CLOUD_ALPHA);
        for (fx, fy, size) in [(0.2, 0.15, 60.0), (0.6, 0.25, 50.0), (0.4, 0.35, 55.0)] {
            surface.fill(&cloud_shape(w * fx, h * fy, size), &cloud);
        }
    }
}

/// Pseudo-random `[0, 1)` per star and decisecond, stable within a frame.
fn twinkle(star: u64, decisecond: u64) -> f64 {
    let x = (star ^ decisecond.rotate_left(17))
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    let bits = (x >> 33) ^ x;
    (bits % 1000) as f64 / 1000.0
}

fn cloud_shape(x: f64, y: f64, size: f64) -> Shape {
    Shape::Union(vec![
        Shape::circle(pt(x, y), size * 0.5),
        Shape::circle(pt(x + size * 0.4, y), size * 0.6),
        Shape::circle(pt(x + size * 0.8, y), size * 0.5),
        Shape::circle(pt(x + size * 0.4, y - size * 0.3), size * 0.5),
    ])
}

pub fn draw_pipe<S: Surface>(surface: &mut S, pipe: &Pipe, physics: &Physics, theme: &Theme) {
    let (_, h) = surface.size();
    let ground_y = physics.ground_y(h);
    let width = physics.pipe_width;
    let gap_bottom = pipe.gap_bottom(physics);
    let bottom_len = ground_y - gap_bottom;

    let body = Paint::Linear {
        from: pt(pipe.x, 0.0),
        to: pt(pipe.x + width, 0.0),
        stops: vec![
            stop(0.0, theme.pipe),
            stop(0.5, theme.pipe.adjust(20)),
            stop(1.0, theme.pipe),
        ],
    };
    surface.fill(&Shape::rect(pipe.x, 0.0, width, pipe.gap_top), &body);
    surface.fill(&Shape::rect(pipe.x, gap_bottom, width, bottom_len), &body);

    let cap = Paint::solid(theme.pipe.adjust(-30));
    let cap_width = width + CAP_OVERHANG * 2.0;
    surface.fill(
        &Shape::rect(
            pipe.x - CAP_OVERHANG,
            pipe.gap_top - CAP_HEIGHT,
            cap_width,
            CAP_HEIGHT,
        ),
        &cap,
    );
    surface.fill(
        &Shape::rect(pipe.x - CAP_OVERHANG, gap_bottom, cap_width, CAP_HEIGHT),
        &cap,
    );

    let highlight = Paint::translucent(Rgb::WHITE, HIGHLIGHT_ALPHA);
    surface.fill(&Shape::rect(pipe.x + 5.0, 0.0, 8.0, pipe.gap_top), &highlight);
    surface.fill(
        &Shape::rect(pipe.x + 5.0, gap_bottom, 8.0, bottom_len),
        &highlight,
    );
}

pub fn draw_ground<S: Surface>(surface: &mut S, physics: &Physics, theme: &Theme) {
    let (w, h) = surface.size();
    let gy = physics.ground_y(h);
    let depth = physics.ground_height;
    let base = theme.ground;

    surface.fill(
        &Shape::rect(0.0, gy, w, depth),
        &Paint::Linear {
            from: pt(0.0, gy),
            to: pt(0.0, gy + depth),
            stops: vec![stop(0.0, base.adjust(30)), stop(1.0, base.adjust(-20))],
        },
    );

    let grass = Paint::solid(base.adjust(40));
    for i in (0..w.max(0.0).ceil() as usize).step_by(15) {
        let x = i as f64;
        let blade = 10.0 + (x * 0.1).sin() * 5.0;
        surface.fill(&Shape::rect(x, gy - blade, 8.0, blade), &grass);
    }

    let seams = Paint::solid(base.adjust(-30));
    for i in (0..w.max(0.0).ceil() as usize).step_by(40) {
        surface.fill(&Shape::rect(i as f64, gy + 10.0, 2.0, depth - 10.0), &seams);
    }
    let mut y = gy + 20.0;
    while y < gy + depth {
        for i in (0..w.max(0.0).ceil() as usize).step_by(40) {
            surface.fill(&Shape::rect(i as f64 + 10.0, y, 20.0, 2.0), &seams);
        }
        y += 20.0;
    }
}

pub fn draw_bird<S: Surface>(surface: &mut S, bird: &Bird, theme: &Theme, clock: Duration) {
    let r = bird.radius;
    let outline = Paint::translucent(Rgb::BLACK, OUTLINE_ALPHA);

    surface.save();
    surface.translate(bird.x, bird.y);
    surface.rotate(bird.velocity * TILT_PER_VELOCITY);

    surface.fill(
        &Shape::ellipse(pt(2.0, 3.0), r, r * 0.8, 0.0),
        &Paint::translucent(Rgb::BLACK, SHADOW_ALPHA),
    );

    let body = Shape::ellipse(pt(0.0, 0.0), r, r * 0.8, 0.0);
    surface.fill(
        &body,
        &Paint::Radial {
            center: pt(-5.0, -5.0),
            inner: 0.0,
            outer: r,
            stops: vec![stop(0.0, theme.bird.adjust(40)), stop(1.0, theme.bird)],
        },
    );
    surface.stroke(&body, 2.0, &outline);

    let wing_beat = (clock.as_millis() as f64 / 100.0).sin() * 0.5;
    let wing = Shape::ellipse(pt(-5.0, 5.0), 12.0, 8.0, wing_beat);
    surface.fill(&wing, &Paint::solid(theme.bird.adjust(-30)));
    surface.stroke(&wing, 1.0, &outline);

    surface.fill(&Shape::circle(pt(8.0, -5.0), 7.0), &Paint::solid(Rgb::WHITE));
    surface.fill(&Shape::circle(pt(10.0, -5.0), 4.0), &Paint::solid(Rgb::BLACK));
    surface.fill(&Shape::circle(pt(11.0, -6.0), 2.0), &Paint::solid(Rgb::WHITE));

    surface.fill(
        &Shape::Polygon(vec![pt(15.0, -2.0), pt(28.0, 0.0), pt(15.0, 2.0)]),
        &Paint::solid(theme.beak),
    );
    surface.fill(
        &Shape::Polygon(vec![
            pt(-r, -5.0),
            pt(-r - 10.0, -8.0),
            pt(-r - 8.0, 0.0),
            pt(-r - 10.0, 8.0),
            pt(-r, 5.0),
        ]),
        &Paint::solid(theme.bird),
    );

    surface.restore();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCall, DrawList};

    #[test]
    fn test_day_sky_draws_clouds_not_stars() {
        let mut list = DrawList::new(800.0, 600.0);
        draw_sky(&mut list, &Phase::Morning.palette(), Phase::Morning, Duration::ZERO);
        // gradient + glow + sun + 3 clouds
        assert_eq!(list.fills().count(), 6);
        assert!(list
            .fills()
            .any(|(s, _)| matches!(s, Shape::Union(parts) if parts.len() == 4)));
    }

    #[test]
    fn test_night_sky_draws_stars() {
        let mut list = DrawList::new(800.0, 600.0);
        draw_sky(&mut list, &Phase::Night.palette(), Phase::Night, Duration::from_millis(1234));
        assert_eq!(list.fills().count(), 3 + STAR_COUNT);
        for (shape, _) in list.fills().skip(3) {
            let Shape::Ellipse { center, rx, .. } = shape else {
                panic!("star should be a circle");
            };
            assert!(center.x < 800.0 && center.y < 360.0);
            assert!((0.0..2.0).contains(rx));
        }
    }

    #[test]
    fn test_twinkle_is_deterministic() {
        assert_eq!(twinkle(3, 10), twinkle(3, 10));
        assert!((0.0..1.0).contains(&twinkle(49, u64::MAX)));
    }

    #[test]
    fn test_pipe_segments_meet_gap_and_ground() {
        let physics = Physics::default();
        let mut list = DrawList::new(800.0, 600.0);
        let pipe = Pipe {
            x: 300.0,
            gap_top: 150.0,
            scored: false,
        };
        draw_pipe(&mut list, &pipe, &physics, &Theme::default());
        let rects: Vec<_> = list
            .fills()
            .filter_map(|(s, _)| match s {
                Shape::Rect(r) => Some(*r),
                _ => None,
            })
            .collect();
        assert_eq!(rects.len(), 6);
        assert_eq!((rects[0].y, rects[0].h), (0.0, 150.0));
        assert_eq!((rects[1].y, rects[1].y + rects[1].h), (350.0, 500.0));
        assert_eq!(rects[2].y + rects[2].h, 150.0);
        assert_eq!(rects[3].y, 350.0);
    }

    #[test]
    fn test_bird_is_drawn_in_balanced_local_space() {
        let mut list = DrawList::new(800.0, 600.0);
        let bird = Bird {
            x: 100.0,
            y: 250.0,
            velocity: 4.0,
            radius: 20.0,
        };
        draw_bird(&mut list, &bird, &Theme::default(), Duration::ZERO);
        assert_eq!(list.calls[0], DrawCall::Save);
        assert_eq!(list.calls[1], DrawCall::Translate(100.0, 250.0));
        assert_eq!(list.calls[2], DrawCall::Rotate(0.2));
        assert_eq!(list.calls.last(), Some(&DrawCall::Restore));
        assert_eq!(list.depth(), 0);
    }

    #[test]
    fn test_ground_texture_is_position_deterministic() {
        let physics = Physics::default();
        let theme = Theme::default();
        let mut a = DrawList::new(640.0, 480.0);
        let mut b = DrawList::new(640.0, 480.0);
        draw_ground(&mut a, &physics, &theme);
        draw_ground(&mut b, &physics, &theme);
        assert_eq!(a.calls, b.calls);
        // band + 43 blades + 16 seams + 4 rows of 16 bricks
        assert_eq!(a.fills().count(), 1 + 43 + 16 + 4 * 16);
    }
}
