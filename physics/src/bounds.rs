use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub mins: Vec2,
    pub maxs: Vec2,
}

impl Bounds {
    /// An inverted box that any point expands into.
    pub fn new() -> Bounds {
        Bounds {
            mins: Vec2::splat(f32::MAX),
            maxs: Vec2::splat(-f32::MAX),
        }
    }

    pub fn from_points(pts: &[Vec2]) -> Self {
        pts.iter().fold(Bounds::new(), |acc, pt| acc + *pt)
    }

    pub fn from_circle(center: Vec2, radius: f32) -> Self {
        Bounds {
            mins: center - Vec2::splat(radius),
            maxs: center + Vec2::splat(radius),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.maxs.cmplt(self.mins).any()
    }

    pub fn expand_by_point(&mut self, pt: Vec2) {
        self.add_assign(pt);
    }

    pub fn expand(&self, radius: f32) -> Self {
        Bounds {
            mins: self.mins - Vec2::splat(radius),
            maxs: self.maxs + Vec2::splat(radius),
        }
    }

    pub fn merge(&self, rhs: &Self) -> Self {
        Bounds {
            mins: self.mins.min(rhs.mins),
            maxs: self.maxs.max(rhs.maxs),
        }
    }

    pub fn intersects(&self, rhs: &Self) -> bool {
        !(self.maxs.cmplt(rhs.mins).any() || rhs.maxs.cmplt(self.mins).any())
    }

    pub fn contains(&self, rhs: &Self) -> bool {
        self.mins.cmple(rhs.mins).all() && rhs.maxs.cmple(self.maxs).all()
    }

    pub fn contains_point(&self, pt: Vec2) -> bool {
        self.mins.cmple(pt).all() && pt.cmple(self.maxs).all()
    }

    pub fn width(&self) -> Vec2 {
        self.maxs - self.mins
    }

    pub fn center(&self) -> Vec2 {
        (self.mins + self.maxs) * 0.5
    }

    pub fn area(&self) -> f32 {
        let w = self.width();
        w.x * w.y
    }
}

impl Default for Bounds {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Add<Vec2> for Bounds {
    type Output = Self;
    fn add(self, pt: Vec2) -> Self::Output {
        Bounds {
            mins: Vec2::select(pt.cmplt(self.mins), pt, self.mins),
            maxs: Vec2::select(pt.cmpgt(self.maxs), pt, self.maxs),
        }
    }
}

impl AddAssign<Vec2> for Bounds {
    fn add_assign(&mut self, pt: Vec2) {
        self.mins = Vec2::select(pt.cmplt(self.mins), pt, self.mins);
        self.maxs = Vec2::select(pt.cmpgt(self.maxs), pt, self.maxs);
    }
}
