use orbitctl::geometry::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Height of the menubar strip along the top edge.
pub const MENUBAR_HEIGHT: f64 = 28.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1920.0,
            height: 1080.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Area a fullscreen window fills: everything below the menubar.
    pub fn work_area(&self) -> Rect {
        Rect::new(
            0.0,
            MENUBAR_HEIGHT,
            self.width,
            (self.height - MENUBAR_HEIGHT).max(0.0),
        )
    }

    /// Pulls `p` inwards until a circle of `radius` around it fits. Viewports narrower than the
    /// circle centre it on that axis.
    pub fn clamp_center(&self, p: Point, radius: f64) -> Point {
        let axis = |v: f64, extent: f64| {
            if extent <= 2.0 * radius {
                extent / 2.0
            } else {
                v.clamp(radius, extent - radius)
            }
        };
        Point::new(axis(p.x, self.width), axis(p.y, self.height))
    }
}
