use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, TAU};
use std::ops::{Add, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Point at `radius` from `self` along the canvas angle `angle` (0 = east, y grows down).
    pub fn polar(&self, angle: f64, radius: f64) -> Self {
        Self::new(self.x + radius * angle.cos(), self.y + radius * angle.sin())
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
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

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Edges are inclusive so that handles on the boundary stay hittable.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    pub fn inflate(&self, by: f64) -> Self {
        Self::new(self.x - by, self.y - by, self.w + 2.0 * by, self.h + 2.0 * by)
    }
}

/// Maps any angle into `[0, 2π)`.
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid rounds tiny negative inputs up to exactly TAU
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Clockwise angle of `offset` measured from the top of the screen, in `[0, 2π)`.
pub fn bearing(offset: Point) -> f64 {
    normalize_angle(offset.y.atan2(offset.x) + FRAC_PI_2)
}

pub fn sector_width(n: usize) -> f64 {
    TAU / n.max(1) as f64
}

/// Canvas angle of the centre of slice `index`; slice 0 sits at the top.
pub fn slice_angle(index: usize, n: usize) -> f64 {
    index as f64 * sector_width(n) - FRAC_PI_2
}

/// Canvas angles bounding slice `index`, clockwise from start to end.
pub fn slice_bounds(index: usize, n: usize) -> (f64, f64) {
    let half = sector_width(n) / 2.0;
    let mid = slice_angle(index, n);
    (mid - half, mid + half)
}

/// Slice containing the clockwise-from-top `bearing` on a ring of `n` equal sectors.
pub fn slice_index(bearing: f64, n: usize) -> Option<usize> {
    if n == 0 {
        return None;
    }
    let width = sector_width(n);
    let shifted = normalize_angle(bearing + width / 2.0);
    Some((shifted / width).floor() as usize % n)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingHit {
    /// Inside the central hub.
    Center,
    Slice(usize),
    /// Inside the annulus of a ring that has no slices.
    Empty,
    Outside,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ring {
    pub center_radius: f64,
    pub outer_radius: f64,
}

impl Ring {
    pub fn new(center_radius: f64, outer_radius: f64) -> Self {
        Self {
            center_radius,
            outer_radius,
        }
    }

    /// Classifies a pointer given relative to the ring centre.
    pub fn hit(&self, offset: Point, n: usize) -> RingHit {
        let d = offset.length();
        if d < self.center_radius {
            RingHit::Center
        } else if d > self.outer_radius {
            RingHit::Outside
        } else {
            slice_index(bearing(offset), n).map_or(RingHit::Empty, RingHit::Slice)
        }
    }
}
