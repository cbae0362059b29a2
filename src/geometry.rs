use glam::DVec2;

/// Averaging an empty sample set has no defined result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot average an empty set of vectors")]
pub struct EmptyInputError;

/// Vector of the given length pointing at `angle` radians.
pub fn from_polar(magnitude: f64, angle: f64) -> DVec2 {
    DVec2::new(angle.cos() * magnitude, angle.sin() * magnitude)
}

/// Componentwise mean of `samples`.
pub fn average<'a>(samples: impl IntoIterator<Item = &'a DVec2>) -> Result<DVec2, EmptyInputError> {
    let mut sum = DVec2::ZERO;
    let mut count = 0usize;
    for s in samples {
        sum += *s;
        count += 1;
    }
    if count == 0 {
        return Err(EmptyInputError);
    }
    Ok(sum / count as f64)
}

/// Componentwise clamp. Unlike `DVec2::clamp` this does not assert `min <= max`.
pub fn clamp(value: DVec2, min: DVec2, max: DVec2) -> DVec2 {
    value.max(min).min(max)
}

/// Angle of `v` in radians, as `atan2(y, x)`.
pub fn angle(v: DVec2) -> f64 {
    v.y.atan2(v.x)
}

/// Sign of `x` as -1, 0 or 1.
pub fn signum(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Axis-aligned box, top-left anchored.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub min: DVec2,
    pub size: DVec2,
}

impl Rect {
    pub fn new(min: DVec2, size: DVec2) -> Self {
        Self { min, size }
    }

    pub fn max(&self) -> DVec2 {
        self.min + self.size
    }

    pub fn center(&self) -> DVec2 {
        self.min + self.size * 0.5
    }

    /// True when both boxes have area and overlap. Touching edges do not count.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.size.x <= 0.0 || self.size.y <= 0.0 || other.size.x <= 0.0 || other.size.y <= 0.0 {
            return false;
        }
        let (a_max, b_max) = (self.max(), other.max());
        self.min.x < b_max.x && other.min.x < a_max.x && self.min.y < b_max.y && other.min.y < a_max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn polar_components() {
        let v = from_polar(2.0, std::f64::consts::FRAC_PI_2);
        assert_relative_eq!(v.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(v.y, 2.0);
    }

    #[test]
    fn average_of_samples() {
        let samples = [DVec2::new(1.0, 2.0), DVec2::new(3.0, -2.0)];
        assert_eq!(average(&samples), Ok(DVec2::new(2.0, 0.0)));
    }

    #[test]
    fn average_of_nothing_is_an_error() {
        let empty: [DVec2; 0] = [];
        assert_eq!(average(&empty), Err(EmptyInputError));
    }

    #[test]
    fn clamp_is_componentwise() {
        let v = clamp(DVec2::new(-5.0, 5.0), DVec2::new(-1.0, -1.0), DVec2::new(1.0, 1.0));
        assert_eq!(v, DVec2::new(-1.0, 1.0));
    }

    #[test]
    fn rect_overlap() {
        let a = Rect::new(DVec2::ZERO, DVec2::splat(10.0));
        let b = Rect::new(DVec2::splat(5.0), DVec2::splat(10.0));
        let touching = Rect::new(DVec2::new(10.0, 0.0), DVec2::splat(10.0));
        let flat = Rect::new(DVec2::splat(2.0), DVec2::new(0.0, 4.0));
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&touching));
        assert!(!a.intersects(&flat));
    }

    #[test]
    fn signum_of_zero_is_zero() {
        assert_eq!(signum(0.0), 0.0);
        assert_eq!(signum(-0.001), -1.0);
        assert_eq!(signum(3.0), 1.0);
    }
}
