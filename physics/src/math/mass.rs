use glam::Vec2;
use std::f32::consts::PI;

pub fn area_for_circle(r1: f32, r2: f32) -> f32 {
    PI * (r1 * r1 - r2 * r2).abs()
}

pub fn moment_for_circle(m: f32, r1: f32, r2: f32, offset: Vec2) -> f32 {
    m * (0.5 * (r1 * r1 + r2 * r2) + offset.length_squared())
}

pub fn area_for_segment(a: Vec2, b: Vec2, r: f32) -> f32 {
    r * (PI * r + 2.0 * a.distance(b))
}

pub fn moment_for_segment(m: f32, a: Vec2, b: Vec2, r: f32) -> f32 {
    let offset = a.lerp(b, 0.5);

    // capsule approximated as a box
    let length = b.distance(a) + 2.0 * r;
    m * ((length * length + 4.0 * r * r) / 12.0 + offset.length_squared())
}

pub fn moment_for_box(m: f32, width: f32, height: f32) -> f32 {
    m * (width * width + height * height) / 12.0
}

pub fn area_for_poly(verts: &[Vec2], r: f32) -> f32 {
    let mut area = 0.0;
    let mut perimeter = 0.0;
    for (i, &v1) in verts.iter().enumerate() {
        let v2 = verts[(i + 1) % verts.len()];
        area += v1.perp_dot(v2);
        perimeter += v1.distance(v2);
    }
    r * (PI * r.abs() + perimeter) + area / 2.0
}

pub fn centroid_for_poly(verts: &[Vec2]) -> Vec2 {
    let mut sum = 0.0;
    let mut vsum = Vec2::ZERO;
    for (i, &v1) in verts.iter().enumerate() {
        let v2 = verts[(i + 1) % verts.len()];
        let cross = v1.perp_dot(v2);
        sum += cross;
        vsum += (v1 + v2) * cross;
    }

    if sum == 0.0 {
        // degenerate polygon (a point or a line), fall back to the vertex average
        return verts.iter().copied().sum::<Vec2>() / verts.len().max(1) as f32;
    }
    vsum / (3.0 * sum)
}

pub fn moment_for_poly(m: f32, verts: &[Vec2], offset: Vec2, r: f32) -> f32 {
    match verts {
        [] => 0.0,
        [v] => moment_for_circle(m, 0.0, r, *v + offset),
        [a, b] => moment_for_segment(m, *a + offset, *b + offset, r),
        _ => {
            let mut sum1 = 0.0;
            let mut sum2 = 0.0;
            for (i, &v) in verts.iter().enumerate() {
                let v1 = v + offset;
                let v2 = verts[(i + 1) % verts.len()] + offset;

                let a = v2.perp_dot(v1);
                let b = v1.dot(v1) + v1.dot(v2) + v2.dot(v2);

                sum1 += a * b;
                sum2 += a;
            }
            (m * sum1) / (6.0 * sum2)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use glam::Vec2;

    const SQUARE: [Vec2; 4] = [
        Vec2::new(-1.0, -1.0),
        Vec2::new(1.0, -1.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(-1.0, 1.0),
    ];

    #[test]
    fn test_square_mass_properties() {
        assert_eq!(4.0, area_for_poly(&SQUARE, 0.0));
        assert_eq!(Vec2::ZERO, centroid_for_poly(&SQUARE));

        // a solid square matches the box formula
        let moment = moment_for_poly(1.0, &SQUARE, Vec2::ZERO, 0.0);
        assert!((moment - moment_for_box(1.0, 2.0, 2.0)).abs() < 1e-5);
    }

    #[test]
    fn test_offset_centroid() {
        let shifted: Vec<Vec2> = SQUARE.iter().map(|v| *v + Vec2::new(3.0, 2.0)).collect();
        assert!(centroid_for_poly(&shifted).abs_diff_eq(Vec2::new(3.0, 2.0), 1e-5));
    }

    #[test]
    fn test_circle_and_segment() {
        assert!((area_for_circle(0.0, 2.0) - 4.0 * PI).abs() < 1e-5);
        assert_eq!(0.5, moment_for_circle(1.0, 0.0, 1.0, Vec2::ZERO));
        let a = Vec2::new(-1.0, 0.0);
        let b = Vec2::new(1.0, 0.0);
        assert_eq!(0.0, area_for_segment(a, b, 0.0));
        assert!((area_for_segment(a, b, 1.0) - (PI + 4.0)).abs() < 1e-5);
    }
}
