//! 2D drawing interface the scene renderer paints onto.
//!
//! Coordinates are logical pixels, y pointing down. Transforms follow the
//! usual canvas convention: `translate`/`rotate` post-multiply the current
//! matrix, and `save`/`restore` push and pop it.

use crate::color::Rgb;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

pub const fn pt(x: f64, y: f64) -> Point {
    Point { x, y }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.w && p.y >= self.y && p.y < self.y + self.h
    }

    fn union(&self, other: &Rect) -> Rect {
        let x0 = self.x.min(other.x);
        let y0 = self.y.min(other.y);
        let x1 = (self.x + self.w).max(other.x + other.w);
        let y1 = (self.y + self.h).max(other.y + other.h);
        Rect::new(x0, y0, x1 - x0, y1 - y0)
    }
}

/// Fillable geometry, expressed in the surface's current local space.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect(Rect),
    Ellipse {
        center: Point,
        rx: f64,
        ry: f64,
        rotation: f64,
    },
    Polygon(Vec<Point>),
    /// Several sub-shapes filled as one region, so translucent overlaps do
    /// not compound.
    Union(Vec<Shape>),
}

impl Shape {
    pub fn rect(x: f64, y: f64, w: f64, h: f64) -> Shape {
        Shape::Rect(Rect::new(x, y, w, h))
    }

    pub fn circle(center: Point, r: f64) -> Shape {
        Shape::Ellipse {
            center,
            rx: r,
            ry: r,
            rotation: 0.0,
        }
    }

    pub fn ellipse(center: Point, rx: f64, ry: f64, rotation: f64) -> Shape {
        Shape::Ellipse {
            center,
            rx,
            ry,
            rotation,
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        match self {
            Shape::Rect(r) => r.contains(p),
            Shape::Ellipse {
                center,
                rx,
                ry,
                rotation,
            } => {
                let (u, v) = ellipse_local(p, *center, *rotation);
                *rx > 0.0 && *ry > 0.0 && (u / rx).powi(2) + (v / ry).powi(2) <= 1.0
            }
            Shape::Polygon(pts) => polygon_contains(pts, p),
            Shape::Union(parts) => parts.iter().any(|s| s.contains(p)),
        }
    }

    /// Approximate distance from `p` to the shape's outline.
    pub fn edge_distance(&self, p: Point) -> f64 {
        match self {
            Shape::Rect(r) => {
                let corners = [
                    pt(r.x, r.y),
                    pt(r.x + r.w, r.y),
                    pt(r.x + r.w, r.y + r.h),
                    pt(r.x, r.y + r.h),
                ];
                polygon_edge_distance(&corners, p)
            }
            Shape::Ellipse {
                center,
                rx,
                ry,
                rotation,
            } => {
                if *rx <= 0.0 || *ry <= 0.0 {
                    return f64::INFINITY;
                }
                let (u, v) = ellipse_local(p, *center, *rotation);
                let rho = ((u / rx).powi(2) + (v / ry).powi(2)).sqrt();
                (rho - 1.0).abs() * rx.min(*ry)
            }
            Shape::Polygon(pts) => polygon_edge_distance(pts, p),
            Shape::Union(parts) => parts
                .iter()
                .map(|s| s.edge_distance(p))
                .fold(f64::INFINITY, f64::min),
        }
    }

    /// Axis-aligned bounds in local space.
    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Rect(r) => *r,
            Shape::Ellipse {
                center, rx, ry, ..
            } => {
                // Rotation-independent: the larger radius bounds every orientation.
                let r = rx.max(*ry);
                Rect::new(center.x - r, center.y - r, r * 2.0, r * 2.0)
            }
            Shape::Polygon(pts) => {
                let (mut x0, mut y0) = (f64::INFINITY, f64::INFINITY);
                let (mut x1, mut y1) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
                for q in pts {
                    x0 = x0.min(q.x);
                    y0 = y0.min(q.y);
                    x1 = x1.max(q.x);
                    y1 = y1.max(q.y);
                }
                if pts.is_empty() {
                    Rect::new(0.0, 0.0, 0.0, 0.0)
                } else {
                    Rect::new(x0, y0, x1 - x0, y1 - y0)
                }
            }
            Shape::Union(parts) => parts
                .iter()
                .map(Shape::bounds)
                .reduce(|a, b| a.union(&b))
                .unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0)),
        }
    }
}

fn ellipse_local(p: Point, center: Point, rotation: f64) -> (f64, f64) {
    let dx = p.x - center.x;
    let dy = p.y - center.y;
    let (s, c) = rotation.sin_cos();
    (dx * c + dy * s, -dx * s + dy * c)
}

// Even-odd ray casting.
fn polygon_contains(pts: &[Point], p: Point) -> bool {
    let mut inside = false;
    let n = pts.len();
    for i in 0..n {
        let a = pts[i];
        let b = pts[(i + n - 1) % n];
        if (a.y > p.y) != (b.y > p.y) {
            let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x {
                inside = !inside;
            }
        }
    }
    inside
}

fn polygon_edge_distance(pts: &[Point], p: Point) -> f64 {
    let n = pts.len();
    (0..n)
        .map(|i| segment_distance(pts[i], pts[(i + 1) % n], p))
        .fold(f64::INFINITY, f64::min)
}

fn segment_distance(a: Point, b: Point, p: Point) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len2 = dx * dx + dy * dy;
    let t = if len2 > 0.0 {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (cx, cy) = (a.x + dx * t, a.y + dy * t);
    ((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt()
}

/// A gradient color stop. `offset` is in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stop {
    pub offset: f64,
    pub color: Rgb,
    pub alpha: f64,
}

pub const fn stop(offset: f64, color: Rgb) -> Stop {
    Stop {
        offset,
        color,
        alpha: 1.0,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid {
        color: Rgb,
        alpha: f64,
    },
    /// Gradient along the segment `from -> to`, clamped past either end.
    Linear {
        from: Point,
        to: Point,
        stops: Vec<Stop>,
    },
    /// Concentric gradient from `inner` to `outer` radius around `center`.
    Radial {
        center: Point,
        inner: f64,
        outer: f64,
        stops: Vec<Stop>,
    },
}

impl Paint {
    pub fn solid(color: Rgb) -> Paint {
        Paint::Solid { color, alpha: 1.0 }
    }

    pub fn translucent(color: Rgb, alpha: f64) -> Paint {
        Paint::Solid { color, alpha }
    }

    /// Color and alpha at local point `p`.
    pub fn sample(&self, p: Point) -> (Rgb, f64) {
        match self {
            Paint::Solid { color, alpha } => (*color, *alpha),
            Paint::Linear { from, to, stops } => {
                let (dx, dy) = (to.x - from.x, to.y - from.y);
                let len2 = dx * dx + dy * dy;
                let t = if len2 > 0.0 {
                    ((p.x - from.x) * dx + (p.y - from.y) * dy) / len2
                } else {
                    0.0
                };
                sample_stops(stops, t)
            }
            Paint::Radial {
                center,
                inner,
                outer,
                stops,
            } => {
                let d = ((p.x - center.x).powi(2) + (p.y - center.y).powi(2)).sqrt();
                let span = outer - inner;
                let t = if span > 0.0 { (d - inner) / span } else { 1.0 };
                sample_stops(stops, t)
            }
        }
    }
}

fn sample_stops(stops: &[Stop], t: f64) -> (Rgb, f64) {
    let t = t.clamp(0.0, 1.0);
    let Some(first) = stops.first() else {
        return (Rgb::BLACK, 0.0);
    };
    if t <= first.offset {
        return (first.color, first.alpha);
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = b.offset - a.offset;
            let k = if span > 0.0 { (t - a.offset) / span } else { 1.0 };
            return (a.color.lerp(b.color, k), a.alpha + (b.alpha - a.alpha) * k);
        }
    }
    let last = stops[stops.len() - 1];
    (last.color, last.alpha)
}

/// Affine matrix `[a c e; b d f]`, mapping local to device space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn scale(s: f64) -> Transform {
        Transform {
            a: s,
            d: s,
            ..Transform::IDENTITY
        }
    }

    /// `self * other`: `other` is applied first.
    pub fn then(&self, o: &Transform) -> Transform {
        Transform {
            a: self.a * o.a + self.c * o.b,
            b: self.b * o.a + self.d * o.b,
            c: self.a * o.c + self.c * o.d,
            d: self.b * o.c + self.d * o.d,
            e: self.a * o.e + self.c * o.f + self.e,
            f: self.b * o.e + self.d * o.f + self.f,
        }
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Transform {
        self.then(&Transform {
            e: dx,
            f: dy,
            ..Transform::IDENTITY
        })
    }

    pub fn rotated(&self, radians: f64) -> Transform {
        let (s, c) = radians.sin_cos();
        self.then(&Transform {
            a: c,
            b: s,
            c: -s,
            d: c,
            e: 0.0,
            f: 0.0,
        })
    }

    pub fn apply(&self, p: Point) -> Point {
        pt(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    pub fn inverse(&self) -> Option<Transform> {
        let det = self.a * self.d - self.b * self.c;
        if det.abs() < f64::EPSILON {
            return None;
        }
        let inv = 1.0 / det;
        Some(Transform {
            a: self.d * inv,
            b: -self.b * inv,
            c: -self.c * inv,
            d: self.a * inv,
            e: (self.c * self.f - self.d * self.e) * inv,
            f: (self.b * self.e - self.a * self.f) * inv,
        })
    }
}

/// Anything the scene can be painted onto.
pub trait Surface {
    /// Logical width and height. Read again on every frame.
    fn size(&self) -> (f64, f64);

    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, dx: f64, dy: f64);
    fn rotate(&mut self, radians: f64);

    fn fill(&mut self, shape: &Shape, paint: &Paint);
    fn stroke(&mut self, shape: &Shape, width: f64, paint: &Paint);
}

/// One recorded call on a [`DrawList`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Save,
    Restore,
    Translate(f64, f64),
    Rotate(f64),
    Fill(Shape, Paint),
    Stroke(Shape, f64, Paint),
}

/// Surface that records calls instead of painting. Used for headless runs
/// and for asserting on what the renderer issued.
#[derive(Debug, Clone)]
pub struct DrawList {
    width: f64,
    height: f64,
    pub calls: Vec<DrawCall>,
    depth: usize,
    max_depth: usize,
}

impl DrawList {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            calls: Vec::new(),
            depth: 0,
            max_depth: 0,
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn clear(&mut self) {
        self.calls.clear();
        self.depth = 0;
        self.max_depth = 0;
    }

    /// Current save/restore nesting; zero when the renderer is balanced.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn fills(&self) -> impl Iterator<Item = (&Shape, &Paint)> {
        self.calls.iter().filter_map(|c| match c {
            DrawCall::Fill(s, p) => Some((s, p)),
            _ => None,
        })
    }
}

impl Surface for DrawList {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn save(&mut self) {
        self.depth += 1;
        self.max_depth = self.max_depth.max(self.depth);
        self.calls.push(DrawCall::Save);
    }

    fn restore(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.calls.push(DrawCall::Restore);
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.calls.push(DrawCall::Translate(dx, dy));
    }

    fn rotate(&mut self, radians: f64) {
        self.calls.push(DrawCall::Rotate(radians));
    }

    fn fill(&mut self, shape: &Shape, paint: &Paint) {
        self.calls.push(DrawCall::Fill(shape.clone(), paint.clone()));
    }

    fn stroke(&mut self, shape: &Shape, width: f64, paint: &Paint) {
        self.calls
            .push(DrawCall::Stroke(shape.clone(), width, paint.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn test_transform_translate_then_rotate() {
        let t = Transform::IDENTITY.translated(10.0, 20.0).rotated(std::f64::consts::FRAC_PI_2);
        // Local +x maps to device +y after a quarter turn.
        assert!(close(t.apply(pt(1.0, 0.0)), pt(10.0, 21.0)));
        let inv = t.inverse().unwrap();
        assert!(close(inv.apply(pt(10.0, 21.0)), pt(1.0, 0.0)));
    }

    #[test]
    fn test_scale_inverse() {
        let t = Transform::scale(0.25).translated(100.0, 0.0);
        assert!(close(t.apply(pt(0.0, 0.0)), pt(25.0, 0.0)));
        assert!(Transform::scale(0.0).inverse().is_none());
    }

    #[test]
    fn test_rotated_ellipse_contains() {
        let e = Shape::ellipse(pt(0.0, 0.0), 10.0, 2.0, std::f64::consts::FRAC_PI_2);
        assert!(e.contains(pt(0.0, 9.0)));
        assert!(!e.contains(pt(9.0, 0.0)));
    }

    #[test]
    fn test_polygon_contains() {
        let tri = Shape::Polygon(vec![pt(0.0, 0.0), pt(10.0, 0.0), pt(0.0, 10.0)]);
        assert!(tri.contains(pt(2.0, 2.0)));
        assert!(!tri.contains(pt(8.0, 8.0)));
    }

    #[test]
    fn test_union_bounds_and_contains() {
        let u = Shape::Union(vec![
            Shape::circle(pt(0.0, 0.0), 5.0),
            Shape::circle(pt(20.0, 0.0), 5.0),
        ]);
        assert!(u.contains(pt(20.0, 1.0)));
        assert!(!u.contains(pt(10.0, 0.0)));
        assert_eq!(u.bounds(), Rect::new(-5.0, -5.0, 30.0, 10.0));
    }

    #[test]
    fn test_edge_distance() {
        let r = Shape::rect(0.0, 0.0, 10.0, 10.0);
        assert!((r.edge_distance(pt(5.0, 1.0)) - 1.0).abs() < 1e-9);
        let c = Shape::circle(pt(0.0, 0.0), 10.0);
        assert!((c.edge_distance(pt(9.0, 0.0)) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_linear_gradient_sampling() {
        let paint = Paint::Linear {
            from: pt(0.0, 0.0),
            to: pt(0.0, 100.0),
            stops: vec![stop(0.0, Rgb(0, 0, 0)), stop(1.0, Rgb(200, 100, 50))],
        };
        assert_eq!(paint.sample(pt(5.0, -10.0)).0, Rgb(0, 0, 0));
        assert_eq!(paint.sample(pt(5.0, 50.0)).0, Rgb(100, 50, 25));
        assert_eq!(paint.sample(pt(5.0, 400.0)).0, Rgb(200, 100, 50));
    }

    #[test]
    fn test_radial_gradient_alpha() {
        let paint = Paint::Radial {
            center: pt(0.0, 0.0),
            inner: 10.0,
            outer: 30.0,
            stops: vec![
                Stop { offset: 0.0, color: Rgb::WHITE, alpha: 0.8 },
                Stop { offset: 1.0, color: Rgb::WHITE, alpha: 0.0 },
            ],
        };
        assert!((paint.sample(pt(5.0, 0.0)).1 - 0.8).abs() < 1e-9);
        assert!((paint.sample(pt(20.0, 0.0)).1 - 0.4).abs() < 1e-9);
        assert!(paint.sample(pt(40.0, 0.0)).1.abs() < 1e-9);
    }

    #[test]
    fn test_draw_list_tracks_depth() {
        let mut list = DrawList::new(800.0, 600.0);
        list.save();
        list.translate(1.0, 2.0);
        list.save();
        list.restore();
        assert_eq!(list.depth(), 1);
        list.restore();
        assert_eq!(list.depth(), 0);
        assert_eq!(list.max_depth(), 2);
        assert_eq!(list.size(), (800.0, 600.0));
    }
}
