//! Score and overlays, drawn straight onto the canvas in device pixels
//! with a 3x5 bitmap font.

use crate::color::Rgb;
use crate::config::Theme;
use crate::raster::Canvas;

const SHADOW: Rgb = Rgb(30, 30, 30);
const PANEL_EDGE: Rgb = Rgb(210, 185, 110);
const PANEL_FILL: Rgb = Rgb(220, 195, 120);
const GOLD: Rgb = Rgb(245, 200, 66);

const GLYPH_W: i32 = 3;
const GLYPH_H: i32 = 5;
/// Horizontal advance per character at scale 1.
const ADVANCE: i32 = GLYPH_W + 1;

#[rustfmt::skip]
const DIGITS: [[u8; 15]; 10] = [
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // 0
    [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1], // 1
    [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1], // 2
    [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1], // 3
    [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1], // 4
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1], // 5
    [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1], // 6
    [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0], // 7
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1], // 8
    [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1], // 9
];

#[rustfmt::skip]
const LETTERS: [[u8; 15]; 26] = [
    [0,1,0, 1,0,1, 1,1,1, 1,0,1, 1,0,1], // A
    [1,1,0, 1,0,1, 1,1,0, 1,0,1, 1,1,0], // B
    [0,1,1, 1,0,0, 1,0,0, 1,0,0, 0,1,1], // C
    [1,1,0, 1,0,1, 1,0,1, 1,0,1, 1,1,0], // D
    [1,1,1, 1,0,0, 1,1,0, 1,0,0, 1,1,1], // E
    [1,1,1, 1,0,0, 1,1,0, 1,0,0, 1,0,0], // F
    [0,1,1, 1,0,0, 1,0,1, 1,0,1, 0,1,1], // G
    [1,0,1, 1,0,1, 1,1,1, 1,0,1, 1,0,1], // H
    [1,1,1, 0,1,0, 0,1,0, 0,1,0, 1,1,1], // I
    [0,0,1, 0,0,1, 0,0,1, 1,0,1, 0,1,0], // J
    [1,0,1, 1,0,1, 1,1,0, 1,0,1, 1,0,1], // K
    [1,0,0, 1,0,0, 1,0,0, 1,0,0, 1,1,1], // L
    [1,0,1, 1,1,1, 1,1,1, 1,0,1, 1,0,1], // M
    [1,1,0, 1,0,1, 1,0,1, 1,0,1, 1,0,1], // N
    [0,1,0, 1,0,1, 1,0,1, 1,0,1, 0,1,0], // O
    [1,1,0, 1,0,1, 1,1,0, 1,0,0, 1,0,0], // P
    [0,1,0, 1,0,1, 1,0,1, 1,1,0, 0,1,1], // Q
    [1,1,0, 1,0,1, 1,1,0, 1,0,1, 1,0,1], // R
    [0,1,1, 1,0,0, 0,1,0, 0,0,1, 1,1,0], // S
    [1,1,1, 0,1,0, 0,1,0, 0,1,0, 0,1,0], // T
    [1,0,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // U
    [1,0,1, 1,0,1, 1,0,1, 1,0,1, 0,1,0], // V
    [1,0,1, 1,0,1, 1,1,1, 1,1,1, 1,0,1], // W
    [1,0,1, 1,0,1, 0,1,0, 1,0,1, 1,0,1], // X
    [1,0,1, 1,0,1, 0,1,0, 0,1,0, 0,1,0], // Y
    [1,1,1, 0,0,1, 0,1,0, 1,0,0, 1,1,1], // Z
];

#[rustfmt::skip]
fn glyph(ch: char) -> Option<[u8; 15]> {
    let ch = ch.to_ascii_uppercase();
    match ch {
        '0'..='9' => Some(DIGITS[ch as usize - '0' as usize]),
        'A'..='Z' => Some(LETTERS[ch as usize - 'A' as usize]),
        '!' => Some([0,1,0, 0,1,0, 0,1,0, 0,0,0, 0,1,0]),
        ',' => Some([0,0,0, 0,0,0, 0,0,0, 0,1,0, 1,0,0]),
        '.' => Some([0,0,0, 0,0,0, 0,0,0, 0,0,0, 0,1,0]),
        ':' => Some([0,0,0, 0,1,0, 0,0,0, 0,1,0, 0,0,0]),
        '-' => Some([0,0,0, 0,0,0, 1,1,1, 0,0,0, 0,0,0]),
        _ => None,
    }
}

/// Width in device pixels of `text` at `scale`.
pub fn text_width(text: &str, scale: i32) -> i32 {
    let n = text.chars().count() as i32;
    if n == 0 { 0 } else { (n * ADVANCE - 1) * scale }
}

/// Draws `text` with its top-left at `(x, y)`. Unknown characters leave a gap.
pub fn draw_text(buf: &mut Canvas, x: i32, y: i32, text: &str, fg: Rgb, scale: i32) {
    // Shadow pass first so neighbouring glyphs never overdraw each other.
    for pass in [Some(SHADOW), None] {
        for (i, ch) in text.chars().enumerate() {
            let Some(bits) = glyph(ch) else { continue };
            let gx = x + i as i32 * ADVANCE * scale;
            for row in 0..GLYPH_H {
                for col in 0..GLYPH_W {
                    if bits[(row * GLYPH_W + col) as usize] == 1 {
                        let px = gx + col * scale;
                        let py = y + row * scale;
                        match pass {
                            Some(shadow) => buf.fill_rect(px + 1, py + 1, scale, scale, shadow),
                            None => buf.fill_rect(px, py, scale, scale, fg),
                        }
                    }
                }
            }
        }
    }
}

/// Centers `text` on column `cx`, shrinking to scale 1 if it would not fit.
pub fn draw_text_centered(buf: &mut Canvas, cx: i32, y: i32, text: &str, fg: Rgb, scale: i32) {
    let scale = if text_width(text, scale) + 2 > buf.width() as i32 { 1 } else { scale };
    draw_text(buf, cx - text_width(text, scale) / 2, y, text, fg, scale);
}

/// Greedy word wrap so every line is at most `max_width` pixels at scale 1.
/// A single word wider than that keeps a line of its own.
pub fn wrap_text(text: &str, max_width: i32) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && text_width(&format!("{line} {word}"), 1) > max_width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Like [`draw_text_centered`], but wraps onto further lines when the text
/// is wider than the canvas, keeping a one pixel margin on each side.
/// Returns the y just below the last line.
pub fn draw_block_centered(
    buf: &mut Canvas,
    cx: i32,
    y: i32,
    text: &str,
    fg: Rgb,
    scale: i32,
) -> i32 {
    let width = buf.width() as i32;
    if text_width(text, scale) + 2 <= width {
        draw_text(buf, cx - text_width(text, scale) / 2, y, text, fg, scale);
        return y + (GLYPH_H + 2) * scale;
    }
    let mut y = y;
    for line in wrap_text(text, width - 2) {
        draw_text(buf, cx - text_width(&line, 1) / 2, y, &line, fg, 1);
        y += GLYPH_H + 2;
    }
    y
}

pub fn draw_number(buf: &mut Canvas, cx: i32, y: i32, n: u32, fg: Rgb) {
    draw_text_centered(buf, cx, y, &n.to_string(), fg, 1);
}

/// Running score at the top of the screen.
pub fn draw_score(buf: &mut Canvas, score: u32) {
    draw_number(buf, buf.width() as i32 / 2, 4, score, Rgb::WHITE);
}

pub fn draw_start_screen(buf: &mut Canvas, theme: &Theme, high_score: u32) {
    let cx = buf.width() as i32 / 2;
    let cy = buf.height() as i32 / 4;

    let y = draw_block_centered(buf, cx, cy, &theme.title, theme.bird, 2);
    let y = draw_block_centered(buf, cx, y + 2, &theme.instruction, Rgb::WHITE, 1);
    let y = draw_block_centered(buf, cx, y + 1, "ENTER TO START", Rgb::WHITE, 1);
    if high_score > 0 {
        draw_block_centered(buf, cx, y + 3, &format!("BEST {high_score}"), GOLD, 1);
    }
}

pub fn draw_game_over(buf: &mut Canvas, score: u32, best: u32, pipes: u32) {
    let cx = buf.width() as i32 / 2;
    let cy = buf.height() as i32 / 2;
    let panel_w = 48;
    let panel_h = 40;

    buf.dim();

    let px = cx - panel_w / 2;
    let py = cy - panel_h / 2;
    buf.fill_rect(px - 1, py - 1, panel_w + 2, panel_h + 2, SHADOW);
    buf.fill_rect(px, py, panel_w, panel_h, PANEL_EDGE);
    buf.fill_rect(px + 1, py + 1, panel_w - 2, panel_h - 2, PANEL_FILL);

    draw_text_centered(buf, cx, py + 3, "GAME OVER", Rgb::WHITE, 1);
    draw_text_centered(buf, cx, py + 11, &format!("SCORE {score}"), Rgb::WHITE, 1);
    draw_text_centered(buf, cx, py + 18, &format!("BEST {best}"), GOLD, 1);
    draw_text_centered(buf, cx, py + 25, &format!("PIPES {pipes}"), Rgb::WHITE, 1);
    draw_text_centered(buf, cx, py + 32, "R: RESTART", Rgb::WHITE, 1);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(buf: &Canvas, color: Rgb) -> usize {
        (0..buf.height())
            .flat_map(|y| (0..buf.width()).map(move |x| (x, y)))
            .filter(|&(x, y)| buf.get(x, y) == color)
            .count()
    }

    #[test]
    fn test_text_width() {
        assert_eq!(text_width("", 1), 0);
        assert_eq!(text_width("8", 1), 3);
        assert_eq!(text_width("12", 1), 7);
        assert_eq!(text_width("12", 2), 14);
    }

    #[test]
    fn test_glyph_lookup_is_case_insensitive() {
        assert_eq!(glyph('a'), glyph('A'));
        assert_eq!(glyph('7'), Some(DIGITS[7]));
        assert!(glyph('~').is_none());
    }

    #[test]
    fn test_digit_pixels() {
        let mut buf = Canvas::new(20, 10, 10.0);
        draw_text(&mut buf, 0, 0, "8", Rgb::WHITE, 1);
        // An 8 lights 13 of its 15 cells.
        assert_eq!(lit(&buf, Rgb::WHITE), 13);
        assert_eq!(buf.get(1, 1), SHADOW);
    }

    #[test]
    fn test_scaled_text() {
        let mut buf = Canvas::new(20, 20, 20.0);
        draw_text(&mut buf, 0, 0, "1", Rgb::WHITE, 2);
        assert_eq!(lit(&buf, Rgb::WHITE), 7 * 4);
    }

    #[test]
    fn test_wrap_keeps_lines_inside_width() {
        let text = "Click, tap, or press SPACE to flap!";
        assert_eq!(text_width(text, 1), 139);
        let lines = wrap_text(text, 80);
        assert_eq!(lines, vec!["Click, tap, or press", "SPACE to flap!"]);
        assert!(lines.iter().all(|l| text_width(l, 1) <= 80));
        assert_eq!(wrap_text("", 80), Vec::<String>::new());
    }

    #[test]
    fn test_start_screen_fits_narrow_terminal() {
        let theme = Theme::default();
        let mut buf = Canvas::new(80, 48, 600.0);
        draw_start_screen(&mut buf, &theme, 0);
        // Nothing is cut at the edges: the outermost columns stay blank.
        for y in 0..buf.height() {
            assert_eq!(buf.get(0, y), Rgb::BLACK);
            assert_eq!(buf.get(79, y), Rgb::BLACK);
        }
        assert!(lit(&buf, Rgb::WHITE) > 0);
    }

    #[test]
    fn test_block_wraps_when_too_wide() {
        let mut buf = Canvas::new(80, 48, 600.0);
        let text = "Click, tap, or press SPACE to flap!";
        let below = draw_block_centered(&mut buf, 40, 0, text, Rgb::WHITE, 1);
        // "Click, tap, or" / "press SPACE to" / "flap!"
        assert_eq!(below, 3 * (GLYPH_H + 2));
        let below = draw_block_centered(&mut buf, 40, 20, "HI", Rgb::WHITE, 2);
        assert_eq!(below, 20 + 2 * (GLYPH_H + 2));
    }

    #[test]
    fn test_game_over_panel_draws_over_dimmed_scene() {
        let mut buf = Canvas::new(120, 80, 600.0);
        buf.fill_rect(0, 0, 120, 80, Rgb(200, 200, 200));
        draw_game_over(&mut buf, 12, 40, 3);
        assert_eq!(buf.get(0, 0), Rgb(100, 100, 100));
        assert!(lit(&buf, GOLD) > 0);
        assert!(lit(&buf, PANEL_FILL) > 0);
    }
}
