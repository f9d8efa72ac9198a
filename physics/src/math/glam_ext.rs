use glam::Vec2;

pub trait Vec2Ext {
    /// Clockwise perpendicular, the outward normal of a counter-clockwise edge.
    fn rperp(self) -> Vec2;
}

impl Vec2Ext for Vec2 {
    #[inline]
    fn rperp(self) -> Vec2 {
        Vec2::new(self.y, -self.x)
    }
}
