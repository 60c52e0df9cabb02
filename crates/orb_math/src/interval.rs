/// A closed range of ray parameters `[min, max]`.
///
/// Intersection routines take an interval instead of a `t_min`/`t_max` pair and
/// shrink its upper end as closer hits are found.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Interval from `min` up to positive infinity.
    pub fn from_min(min: f32) -> Self {
        Self::new(min, f32::INFINITY)
    }

    /// Returns true if x is strictly within the interval (min, max) (exclusive).
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    /// Same lower bound, new upper bound.
    pub fn with_max(&self, max: f32) -> Interval {
        Interval::new(self.min, max)
    }

    /// Clamps x to be within the interval [min, max].
    pub fn clamp(&self, x: f32) -> f32 {
        x.clamp(self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_surrounds_is_exclusive() {
        let interval = Interval::new(0.001, 10.0);

        assert!(!interval.surrounds(0.001));
        assert!(!interval.surrounds(10.0));
        assert!(interval.surrounds(4.0));
        assert!(!interval.surrounds(-1.0));
    }

    #[test]
    fn test_interval_with_max() {
        let interval = Interval::from_min(0.001).with_max(4.0);
        assert_eq!(interval, Interval::new(0.001, 4.0));
        assert_eq!(interval.max, 4.0);
    }

    #[test]
    fn test_interval_clamp() {
        let interval = Interval::new(0.0, 0.999);

        assert_eq!(interval.clamp(-5.0), 0.0);
        assert_eq!(interval.clamp(0.5), 0.5);
        assert_eq!(interval.clamp(2.0), 0.999);
    }
}
