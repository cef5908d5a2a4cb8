//! Geometry primitives - Point, Rect, IRect, Matrix, Quad
//!
//! These cross the shim by copy; each converts losslessly to and from its
//! `#[repr(C)]` mirror in the sys crate.

use mupdf_shim_sys as sys;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn transform(&self, m: &Matrix) -> Self {
        Self {
            x: self.x * m.a + self.y * m.c + m.e,
            y: self.x * m.b + self.y * m.d + m.f,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Default for Rect {
    fn default() -> Self {
        Self::EMPTY
    }
}

// Native "infinite" bounds are the largest floats that survive a round
// trip through int.
const MIN_INF: f32 = -2_147_483_648.0;
const MAX_INF: f32 = 2_147_483_520.0;

impl Rect {
    /// The native empty rectangle: the infinite one turned inside out, so
    /// that a union with anything yields the other operand.
    pub const EMPTY: Rect = Rect {
        x0: MAX_INF,
        y0: MAX_INF,
        x1: MIN_INF,
        y1: MIN_INF,
    };
    pub const INFINITE: Rect = Rect {
        x0: MIN_INF,
        y0: MIN_INF,
        x1: MAX_INF,
        y1: MAX_INF,
    };
    pub const UNIT: Rect = Rect {
        x0: 0.0,
        y0: 0.0,
        x1: 1.0,
        y1: 1.0,
    };

    #[inline]
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }

    #[inline]
    pub fn is_infinite(&self) -> bool {
        self.x0 <= MIN_INF && self.y0 <= MIN_INF && self.x1 >= MAX_INF && self.y1 >= MAX_INF
    }

    #[inline]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }

    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Rect {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    pub fn intersect(&self, other: &Rect) -> Rect {
        let r = Rect {
            x0: self.x0.max(other.x0),
            y0: self.y0.max(other.y0),
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
        };
        if r.is_empty() { Rect::EMPTY } else { r }
    }

    /// Transform rectangle by a matrix, returning the bounding box of the corners
    pub fn transform(&self, m: &Matrix) -> Rect {
        if self.is_empty() || self.is_infinite() {
            return *self;
        }
        let corners = [
            Point::new(self.x0, self.y0).transform(m),
            Point::new(self.x1, self.y0).transform(m),
            Point::new(self.x0, self.y1).transform(m),
            Point::new(self.x1, self.y1).transform(m),
        ];
        let mut r = Rect::new(corners[0].x, corners[0].y, corners[0].x, corners[0].y);
        for p in &corners[1..] {
            r.x0 = r.x0.min(p.x);
            r.y0 = r.y0.min(p.y);
            r.x1 = r.x1.max(p.x);
            r.y1 = r.y1.max(p.y);
        }
        r
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IRect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl IRect {
    #[inline]
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.x1 - self.x0
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.y1 - self.y0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }
}

impl From<Rect> for IRect {
    #[allow(clippy::cast_possible_truncation)]
    fn from(r: Rect) -> Self {
        IRect {
            x0: r.x0.floor() as i32,
            y0: r.y0.floor() as i32,
            x1: r.x1.ceil() as i32,
            y1: r.y1.ceil() as i32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Matrix {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    #[inline]
    pub fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    #[inline]
    pub fn translate(tx: f32, ty: f32) -> Self {
        Self {
            e: tx,
            f: ty,
            ..Self::IDENTITY
        }
    }

    #[inline]
    pub fn scale(sx: f32, sy: f32) -> Self {
        Self {
            a: sx,
            d: sy,
            ..Self::IDENTITY
        }
    }

    /// Rotation by `degrees`, snapping the quarter turns to exact values.
    pub fn rotate(degrees: f32) -> Self {
        let mut degrees = degrees % 360.0;
        if degrees < 0.0 {
            degrees += 360.0;
        }
        let (s, c) = if degrees == 0.0 {
            (0.0, 1.0)
        } else if (degrees - 90.0).abs() < f32::EPSILON {
            (1.0, 0.0)
        } else if (degrees - 180.0).abs() < f32::EPSILON {
            (0.0, -1.0)
        } else if (degrees - 270.0).abs() < f32::EPSILON {
            (-1.0, 0.0)
        } else {
            degrees.to_radians().sin_cos()
        };
        Self {
            a: c,
            b: s,
            c: -s,
            d: c,
            e: 0.0,
            f: 0.0,
        }
    }

    #[inline]
    pub fn concat(&self, m: &Matrix) -> Self {
        Self {
            a: self.a * m.a + self.b * m.c,
            b: self.a * m.b + self.b * m.d,
            c: self.c * m.a + self.d * m.c,
            d: self.c * m.b + self.d * m.d,
            e: self.e * m.a + self.f * m.c + m.e,
            f: self.e * m.b + self.f * m.d + m.f,
        }
    }

    #[inline]
    pub fn transform_point(&self, p: Point) -> Point {
        p.transform(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Quad {
    pub ul: Point,
    pub ur: Point,
    pub ll: Point,
    pub lr: Point,
}

impl Quad {
    #[inline]
    pub fn from_rect(r: &Rect) -> Self {
        Self {
            ul: Point::new(r.x0, r.y0),
            ur: Point::new(r.x1, r.y0),
            ll: Point::new(r.x0, r.y1),
            lr: Point::new(r.x1, r.y1),
        }
    }

    pub fn bounds(&self) -> Rect {
        let xs = [self.ul.x, self.ur.x, self.ll.x, self.lr.x];
        let ys = [self.ul.y, self.ur.y, self.ll.y, self.lr.y];
        Rect {
            x0: xs.iter().copied().fold(f32::INFINITY, f32::min),
            y0: ys.iter().copied().fold(f32::INFINITY, f32::min),
            x1: xs.iter().copied().fold(f32::NEG_INFINITY, f32::max),
            y1: ys.iter().copied().fold(f32::NEG_INFINITY, f32::max),
        }
    }

    #[inline]
    pub fn transform(&self, m: &Matrix) -> Self {
        Self {
            ul: self.ul.transform(m),
            ur: self.ur.transform(m),
            ll: self.ll.transform(m),
            lr: self.lr.transform(m),
        }
    }
}

impl From<sys::FzPoint> for Point {
    fn from(p: sys::FzPoint) -> Self {
        Point { x: p.x, y: p.y }
    }
}

impl From<Point> for sys::FzPoint {
    fn from(p: Point) -> Self {
        sys::FzPoint { x: p.x, y: p.y }
    }
}

impl From<sys::FzRect> for Rect {
    fn from(r: sys::FzRect) -> Self {
        Rect::new(r.x0, r.y0, r.x1, r.y1)
    }
}

impl From<Rect> for sys::FzRect {
    fn from(r: Rect) -> Self {
        sys::FzRect {
            x0: r.x0,
            y0: r.y0,
            x1: r.x1,
            y1: r.y1,
        }
    }
}

impl From<sys::FzIRect> for IRect {
    fn from(r: sys::FzIRect) -> Self {
        IRect::new(r.x0, r.y0, r.x1, r.y1)
    }
}

impl From<IRect> for sys::FzIRect {
    fn from(r: IRect) -> Self {
        sys::FzIRect {
            x0: r.x0,
            y0: r.y0,
            x1: r.x1,
            y1: r.y1,
        }
    }
}

impl From<sys::FzMatrix> for Matrix {
    fn from(m: sys::FzMatrix) -> Self {
        Matrix::new(m.a, m.b, m.c, m.d, m.e, m.f)
    }
}

impl From<Matrix> for sys::FzMatrix {
    fn from(m: Matrix) -> Self {
        sys::FzMatrix {
            a: m.a,
            b: m.b,
            c: m.c,
            d: m.d,
            e: m.e,
            f: m.f,
        }
    }
}

impl From<sys::FzQuad> for Quad {
    fn from(q: sys::FzQuad) -> Self {
        Quad {
            ul: q.ul.into(),
            ur: q.ur.into(),
            ll: q.ll.into(),
            lr: q.lr.into(),
        }
    }
}

impl From<Quad> for sys::FzQuad {
    fn from(q: Quad) -> Self {
        sys::FzQuad {
            ul: q.ul.into(),
            ur: q.ur.into(),
            ll: q.ll.into(),
            lr: q.lr.into(),
        }
    }
}
