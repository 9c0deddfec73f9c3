//! Software rasterizer for the terminal.
//!
//! The canvas is a grid of `cols x rows*2` device pixels. Each terminal cell
//! shows two stacked pixels with the upper half block glyph: foreground is
//! the top pixel, background the bottom one.

use std::io::{self, Write};

use crossterm::{
    cursor, queue,
    style::{self, Color as CColor},
};

use crate::color::Rgb;
use crate::surface::{Paint, Point, Shape, Surface, Transform, pt};

const UPPER_HALF: char = '\u{2580}'; // ▀

pub struct Canvas {
    w: usize,
    h: usize,
    px: Vec<Rgb>,
    /// Device pixels per logical pixel.
    scale: f64,
    current: Transform,
    stack: Vec<Transform>,
}

impl Canvas {
    /// A canvas of `w x h` device pixels whose logical height is
    /// `logical_height`.
    pub fn new(w: usize, h: usize, logical_height: f64) -> Self {
        let mut canvas = Self {
            w,
            h,
            px: vec![Rgb::BLACK; w * h],
            scale: 1.0,
            current: Transform::IDENTITY,
            stack: Vec::new(),
        };
        canvas.rescale(logical_height);
        canvas
    }

    pub fn resize(&mut self, w: usize, h: usize, logical_height: f64) {
        self.w = w;
        self.h = h;
        self.px.resize(w * h, Rgb::BLACK);
        self.rescale(logical_height);
    }

    fn rescale(&mut self, logical_height: f64) {
        self.scale = if logical_height > 0.0 && self.h > 0 {
            self.h as f64 / logical_height
        } else {
            1.0
        };
        self.stack.clear();
        self.current = Transform::scale(self.scale);
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    /// Device-space rectangle, no transform or blending.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, c);
            }
        }
    }

    /// Halves every channel, for modal overlays.
    pub fn dim(&mut self) {
        for p in &mut self.px {
            *p = Rgb(p.0 / 2, p.1 / 2, p.2 / 2);
        }
    }

    fn blend(&mut self, x: usize, y: usize, c: Rgb, alpha: f64) {
        if alpha <= 0.0 {
            return;
        }
        let i = y * self.w + x;
        self.px[i] = if alpha >= 1.0 {
            c
        } else {
            self.px[i].lerp(c, alpha)
        };
    }

    /// Visits every device pixel whose center lies in the device-space image
    /// of `bounds`, handing the covering callback the local-space point.
    fn scan(&mut self, shape: &Shape, mut paint_at: impl FnMut(Point) -> Option<(Rgb, f64)>) {
        let Some(inv) = self.current.inverse() else {
            return;
        };
        let b = shape.bounds();
        let corners = [
            pt(b.x, b.y),
            pt(b.x + b.w, b.y),
            pt(b.x, b.y + b.h),
            pt(b.x + b.w, b.y + b.h),
        ]
        .map(|p| self.current.apply(p));

        let x0 = corners.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let x1 = corners.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        let y0 = corners.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let y1 = corners.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) {
            return;
        }

        let xs = (x0.floor().max(0.0) as usize)..(x1.ceil().clamp(0.0, self.w as f64) as usize);
        let ys = (y0.floor().max(0.0) as usize)..(y1.ceil().clamp(0.0, self.h as f64) as usize);
        for y in ys {
            for x in xs.clone() {
                let local = inv.apply(pt(x as f64 + 0.5, y as f64 + 0.5));
                if let Some((c, a)) = paint_at(local) {
                    self.blend(x, y, c, a);
                }
            }
        }
    }

    /// Local units covered by one device pixel under the current transform.
    fn local_pixel(&self) -> f64 {
        let det = (self.current.a * self.current.d - self.current.b * self.current.c).abs();
        if det > 0.0 { 1.0 / det.sqrt() } else { 0.0 }
    }

    /// Writes the whole canvas to the terminal.
    pub fn present(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut prev_fg: Option<Rgb> = None;
        let mut prev_bg: Option<Rgb> = None;

        for row in 0..rows {
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);

                if prev_bg != Some(bot) {
                    queue!(out, style::SetBackgroundColor(term_color(bot)))?;
                    prev_bg = Some(bot);
                }
                if top == bot {
                    queue!(out, style::Print(' '))?;
                } else {
                    if prev_fg != Some(top) {
                        queue!(out, style::SetForegroundColor(term_color(top)))?;
                        prev_fg = Some(top);
                    }
                    queue!(out, style::Print(UPPER_HALF))?;
                }
            }
            if row + 1 < rows {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                prev_fg = None;
                prev_bg = None;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

fn term_color(c: Rgb) -> CColor {
    CColor::Rgb {
        r: c.0,
        g: c.1,
        b: c.2,
    }
}

impl Surface for Canvas {
    fn size(&self) -> (f64, f64) {
        (self.w as f64 / self.scale, self.h as f64 / self.scale)
    }

    fn save(&mut self) {
        self.stack.push(self.current);
    }

    fn restore(&mut self) {
        if let Some(t) = self.stack.pop() {
            self.current = t;
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.current = self.current.translated(dx, dy);
    }

    fn rotate(&mut self, radians: f64) {
        self.current = self.current.rotated(radians);
    }

    fn fill(&mut self, shape: &Shape, paint: &Paint) {
        self.scan(shape, |p| shape.contains(p).then(|| paint.sample(p)));
    }

    fn stroke(&mut self, shape: &Shape, width: f64, paint: &Paint) {
        // Never thinner than one device pixel, or the outline drops out.
        let half = (width / 2.0).max(self.local_pixel() / 2.0);
        let outer = match shape {
            Shape::Ellipse {
                center,
                rx,
                ry,
                rotation,
            } => Shape::ellipse(*center, rx + half, ry + half, *rotation),
            Shape::Rect(r) => Shape::rect(r.x - half, r.y - half, r.w + half * 2.0, r.h + half * 2.0),
            other => other.clone(),
        };
        self.scan(&outer, |p| {
            (shape.edge_distance(p) <= half).then(|| paint.sample(p))
        });
    }
}
