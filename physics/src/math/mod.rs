pub mod glam_ext;
pub mod hull;
pub mod mass;

use glam::Vec2;

pub use glam_ext::Vec2Ext;

/// Rigid 2D transform applied to shape geometry.
pub type Transform = glam::Affine2;

/// Distances below this are treated as zero when deriving a gradient.
pub(crate) const MAGIC_EPSILON: f32 = 1e-5;

pub fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let delta = a - b;
    let length_sq = delta.length_squared();
    if length_sq == 0.0 {
        return a;
    }
    let t = (delta.dot(p - b) / length_sq).clamp(0.0, 1.0);
    b + delta * t
}
