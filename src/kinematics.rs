//! Angle helpers shared by every archetype that steers a turret.
//!
//! All angles are in radians, measured atan2-style in a y-down world, so
//! positive rotation turns clockwise on screen.

use std::f64::consts::{FRAC_PI_4, PI, TAU};

use cgmath::Vector2;

/// Wrap the angle value in (-pi, pi]
pub fn wrap_angle(x: f64) -> f64 {
    let wrapped = x.rem_euclid(TAU);
    if PI < wrapped {
        wrapped - TAU
    } else {
        wrapped
    }
}

/// Signed difference `a - b`, taking the short way around the circle.
pub fn angle_difference(a: f64, b: f64) -> f64 {
    wrap_angle(a - b)
}

/// Shift `target` by a whole number of turns so that rotating from `current` to the result
/// takes the shortest path, i.e. `|result - current| <= pi`.
///
/// An already normalized `target` is returned untouched.
pub fn normalize_angle_to_target(target: f64, current: f64) -> f64 {
    let delta = target - current;
    if delta.abs() <= PI {
        return target;
    }
    let turns = (delta / TAU).round();
    let shifted = target - turns * TAU;
    // Rounding can land exactly on the far side of the half turn.
    if shifted - current < -PI {
        shifted + TAU
    } else if PI < shifted - current {
        shifted - TAU
    } else {
        shifted
    }
}

/// Heading from `from` towards `to`.
pub fn heading_to(from: [f64; 2], to: [f64; 2]) -> f64 {
    let delta = Vector2::from(to) - Vector2::from(from);
    delta.y.atan2(delta.x)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compass {
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
    North,
    NorthEast,
}

impl Compass {
    pub const ALL: [Compass; 8] = [
        Compass::East,
        Compass::SouthEast,
        Compass::South,
        Compass::SouthWest,
        Compass::West,
        Compass::NorthWest,
        Compass::North,
        Compass::NorthEast,
    ];

    /// South is +y because the world is y-down.
    pub fn angle(&self) -> f64 {
        match self {
            Self::East => 0.,
            Self::SouthEast => FRAC_PI_4,
            Self::South => 2. * FRAC_PI_4,
            Self::SouthWest => 3. * FRAC_PI_4,
            Self::West => PI,
            Self::NorthWest => 5. * FRAC_PI_4,
            Self::North => 6. * FRAC_PI_4,
            Self::NorthEast => 7. * FRAC_PI_4,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_angle_difference_range() {
        assert_eq!(angle_difference(PI, 0.), PI);
        assert_eq!(angle_difference(-PI, 0.), PI);
        assert!((angle_difference(0.1, TAU - 0.1) - 0.2).abs() < 1e-12);
        assert!((angle_difference(TAU - 0.1, 0.1) + 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_shortest_path() {
        let r = normalize_angle_to_target(7. * FRAC_PI_4, 0.);
        assert!((r + FRAC_PI_4).abs() < 1e-12);
        let r = normalize_angle_to_target(0.1, 20. * PI);
        assert!((r - (20. * PI + 0.1)).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_idempotent_at_half_turn() {
        assert_eq!(normalize_angle_to_target(PI, 0.), PI);
        assert_eq!(normalize_angle_to_target(-PI, 0.), -PI);
    }

    #[test]
    fn test_compass_table() {
        let angles: Vec<f64> = Compass::ALL.iter().map(Compass::angle).collect();
        for (i, angle) in angles.iter().enumerate() {
            assert!((angle - i as f64 * FRAC_PI_4).abs() < 1e-12);
        }
        assert!((Compass::North.angle() - 3. * PI / 2.).abs() < 1e-12);
    }

    #[test]
    fn test_heading_to_y_down() {
        assert!((heading_to([0., 0.], [0., 1.]) - PI / 2.).abs() < 1e-12);
        assert!((heading_to([1., 1.], [0., 1.]) - PI).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn normalized_angle_is_congruent_and_close(target in -100.0f64..100.0, current in -100.0f64..100.0) {
            let r = normalize_angle_to_target(target, current);
            prop_assert!((r - current).abs() <= PI + 1e-9);
            let turns = (r - target) / TAU;
            prop_assert!((turns - turns.round()).abs() < 1e-9);
        }

        #[test]
        fn normalize_is_idempotent(target in -100.0f64..100.0, current in -100.0f64..100.0) {
            let once = normalize_angle_to_target(target, current);
            prop_assert_eq!(normalize_angle_to_target(once, current), once);
        }

        #[test]
        fn difference_is_half_open(a in -50.0f64..50.0, b in -50.0f64..50.0) {
            let d = angle_difference(a, b);
            prop_assert!(-PI < d && d <= PI);
        }
    }
}
