//! Integration test: scene rendering
//!
//! Renders real game frames onto the recording surface and onto the
//! software canvas.

use std::time::Duration;

use bird_flop::surface::Rect;
use bird_flop::{Canvas, DrawCall, DrawList, Game, GameConfig, Paint, Shape, Surface, Viewport};

fn fill_rect(call: &DrawCall) -> Option<Rect> {
    match call {
        DrawCall::Fill(Shape::Rect(r), _) => Some(*r),
        _ => None,
    }
}

// =============================================================================
// Draw order
// =============================================================================

#[test]
fn test_first_frame_draw_order() {
    let mut list = DrawList::new(800.0, 600.0);
    let mut game = Game::seeded(GameConfig::default(), Viewport::new(800.0, 600.0), 21);
    game.start();
    game.frame(&mut list, Duration::ZERO).unwrap();
    let calls = &list.calls;

    // Sky: full-surface vertical gradient, then glow, sun and three clouds.
    match &calls[0] {
        DrawCall::Fill(Shape::Rect(r), Paint::Linear { .. }) => {
            assert_eq!((r.x, r.y, r.w, r.h), (0.0, 0.0, 800.0, 600.0));
        }
        other => panic!("expected sky gradient, got {other:?}"),
    }

    // The one pipe spawned this tick: two bodies, two caps, two highlights.
    assert_eq!(game.world().pipes.len(), 1);
    for call in &calls[6..12] {
        let r = fill_rect(call).expect("pipe segment");
        assert!(r.x >= 790.0, "pipe segment at {}", r.x);
    }

    // Ground band starts right after the pipe.
    let ground = fill_rect(&calls[12]).expect("ground band");
    assert_eq!((ground.y, ground.w, ground.h), (500.0, 800.0, 100.0));

    // Bird last, inside its own save/restore.
    let save = calls
        .iter()
        .position(|c| *c == DrawCall::Save)
        .expect("bird save");
    assert!(save > 12);
    assert_eq!(calls[save + 1], DrawCall::Translate(100.0, 300.5));
    assert_eq!(calls.last(), Some(&DrawCall::Restore));
    assert_eq!(list.depth(), 0);
    assert_eq!(list.max_depth(), 1);
}

#[test]
fn test_pipes_render_between_sky_and_ground() {
    let mut list = DrawList::new(800.0, 600.0);
    let mut config = GameConfig::default();
    config.physics.pipe_spacing = 0.0;
    let mut game = Game::seeded(config, Viewport::new(800.0, 600.0), 5);
    game.start();
    for _ in 0..4 {
        list.clear();
        game.frame(&mut list, Duration::ZERO).unwrap();
    }
    let pipes = game.world().pipes.len();
    assert_eq!(pipes, 4);
    let ground = fill_rect(&list.calls[6 + pipes * 6]).expect("ground band");
    assert_eq!(ground.y, 500.0);
}

#[test]
fn test_frame_follows_surface_resize() {
    let mut list = DrawList::new(800.0, 600.0);
    let mut game = Game::seeded(GameConfig::default(), Viewport::new(800.0, 600.0), 13);
    game.start();
    game.frame(&mut list, Duration::ZERO).unwrap();

    list.clear();
    list.resize(640.0, 480.0);
    game.frame(&mut list, Duration::ZERO).unwrap();
    assert_eq!(game.viewport(), Viewport::new(640.0, 480.0));

    let sky = fill_rect(&list.calls[0]).expect("sky gradient");
    assert_eq!((sky.w, sky.h), (640.0, 480.0));
    // The ground line moves with the new height.
    let ground = list
        .calls
        .iter()
        .filter_map(fill_rect)
        .find(|r| r.w == 640.0 && r.h == 100.0)
        .expect("ground band");
    assert_eq!(ground.y, 380.0);
}

// =============================================================================
// Rasterized output
// =============================================================================

#[test]
fn test_canvas_frame_paints_scene() {
    let config = GameConfig::default();
    let mut canvas = Canvas::new(80, 48, config.host.logical_height);
    let (w, h) = canvas.size();
    assert!((h - 600.0).abs() < 1e-9);
    assert!((w - 1000.0).abs() < 1e-9);

    let game = Game::seeded(config, Viewport::new(w, h), 3);
    bird_flop::render::render(&game, &mut canvas, Duration::ZERO);

    let sky = canvas.get(40, 0);
    let ground = canvas.get(40, 47);
    let bird = canvas.get(8, 24);
    assert_ne!(sky, ground);
    // Morning sky is warm at the top, the bird is yellow, both differ from
    // the blue-ish mid sky.
    assert!(sky.0 > 200, "sky {sky}");
    assert!(bird.0 > 100 && bird.2 < 100, "bird {bird}");
    assert!(ground.2 < 100, "ground {ground}");
}

#[test]
fn test_canvas_presents_half_blocks() {
    let config = GameConfig::default();
    let mut canvas = Canvas::new(10, 8, config.host.logical_height);
    let (w, h) = canvas.size();
    let game = Game::seeded(config, Viewport::new(w, h), 3);
    bird_flop::render::render(&game, &mut canvas, Duration::ZERO);

    let mut out = Vec::new();
    canvas.present(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    // One glyph per cell: a half block, or a space where both halves match.
    let cells = text.matches('▀').count() + text.matches(' ').count();
    assert_eq!(cells, 10 * 4);
    assert_eq!(text.matches("\r\n").count(), 3);
}
