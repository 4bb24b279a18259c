use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.w && p.y >= self.y && p.y < self.y + self.h
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.w, self.h)
    }
}

/// The visible area a view renders into, in host units (CSS pixels in the
/// browser, cells in the terminal).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    /// Device pixel ratio. Renderers that work in physical pixels multiply by this.
    pub dpr: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            dpr: 1.0,
        }
    }

    /// Convert viewport-height units (`vh`) to host units.
    pub fn vh(&self, value: f64) -> f64 {
        value * self.height / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_contains_is_half_open() {
        let r = Rect::new(0.0, 0.0, 10.0, 5.0);
        assert!(r.contains(Point::new(0.0, 0.0)));
        assert!(r.contains(Point::new(9.9, 4.9)));
        assert!(!r.contains(Point::new(10.0, 2.0)));
        assert!(!r.contains(Point::new(2.0, 5.0)));
    }

    #[test]
    fn vh_scales_with_height() {
        let vp = Viewport::new(1280.0, 800.0);
        assert!((vp.vh(100.0) - 800.0).abs() < f64::EPSILON);
        assert!((vp.vh(250.0) - 2000.0).abs() < f64::EPSILON);
    }
}
