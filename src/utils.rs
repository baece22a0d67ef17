use glam::Vec2;

// --- Helper Functions ---

/// Rotates `point` around `center` by a unit-length `rotation` vector
/// (as produced by `Vec2::from_angle`).
#[inline]
pub fn rotate_about(center: Vec2, rotation: Vec2, point: Vec2) -> Vec2 {
    center + rotation.rotate(point - center)
}

/// Mean of the given positions, `None` when there are none.
pub fn centroid(positions: impl IntoIterator<Item = Vec2>) -> Option<Vec2> {
    let (sum, count) = positions
        .into_iter()
        .fold((Vec2::ZERO, 0u32), |(sum, count), pos| (sum + pos, count + 1));
    (count > 0).then(|| sum / count as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn quarter_turn_about_center() {
        let rotated = rotate_about(Vec2::new(1.0, 1.0), Vec2::from_angle(FRAC_PI_2), Vec2::new(2.0, 1.0));
        assert!((rotated - Vec2::new(1.0, 2.0)).length() < 1e-5);
    }

    #[test]
    fn centroid_of_nothing_is_none() {
        assert_eq!(centroid(std::iter::empty()), None);
        assert_eq!(
            centroid([Vec2::new(0.0, 0.0), Vec2::new(2.0, 4.0)]),
            Some(Vec2::new(1.0, 2.0))
        );
    }
}
