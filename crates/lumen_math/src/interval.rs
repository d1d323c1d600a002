/// A range of real values.
///
/// Used both for the admissible ray parameter `t` of an intersection query
/// and for clamping color channels before quantization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    /// An empty interval (min > max, contains nothing).
    pub const EMPTY: Interval = Interval {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };

    /// A universe interval (contains everything).
    pub const UNIVERSE: Interval = Interval {
        min: f64::NEG_INFINITY,
        max: f64::INFINITY,
    };

    /// Create a new interval given min and max values.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns the size of the interval (max - min).
    pub fn size(&self) -> f64 {
        self.max - self.min
    }

    /// Returns true if x is within the interval [min, max] (inclusive).
    pub fn contains(&self, x: f64) -> bool {
        self.min <= x && x <= self.max
    }

    /// Returns true if x is strictly within the interval (min, max) (exclusive).
    ///
    /// Intersection tests use this so that a hit sitting exactly on the lower
    /// bound (the origin of a freshly scattered ray) is rejected.
    pub fn surrounds(&self, x: f64) -> bool {
        self.min < x && x < self.max
    }

    /// Clamps x to be within the interval [min, max].
    pub fn clamp(&self, x: f64) -> f64 {
        if x < self.min {
            self.min
        } else if x > self.max {
            self.max
        } else {
            x
        }
    }

    /// Same interval with the upper bound replaced.
    pub fn with_max(&self, max: f64) -> Interval {
        Interval::new(self.min, max)
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_creation() {
        let interval = Interval::new(0.0, 10.0);
        assert_eq!(interval.min, 0.0);
        assert_eq!(interval.max, 10.0);
    }

    #[test]
    fn test_interval_size() {
        assert_eq!(Interval::new(2.0, 7.0).size(), 5.0);
        assert_eq!(Interval::new(-5.0, 5.0).size(), 10.0);
    }

    #[test]
    fn test_interval_contains() {
        let interval = Interval::new(-10.0, 10.0);

        // Inclusive bounds
        assert!(interval.contains(10.0));
        assert!(interval.contains(-10.0));
        assert!(interval.contains(0.0));

        assert!(!interval.contains(-10.1));
        assert!(!interval.contains(10.1));
    }

    #[test]
    fn test_interval_surrounds() {
        let interval = Interval::new(-10.0, 10.0);

        // Exclusive bounds - endpoints NOT included
        assert!(!interval.surrounds(10.0));
        assert!(!interval.surrounds(-10.0));

        assert!(interval.surrounds(0.0));
        assert!(interval.surrounds(9.9));
        assert!(!interval.surrounds(10.1));
    }

    #[test]
    fn test_interval_clamp() {
        let interval = Interval::new(-10.0, 10.0);

        assert_eq!(interval.clamp(11.0), 10.0);
        assert_eq!(interval.clamp(-15.0), -10.0);
        assert_eq!(interval.clamp(5.0), 5.0);
        assert_eq!(interval.clamp(10.0), 10.0);
    }

    #[test]
    fn test_interval_with_max() {
        let interval = Interval::new(0.001, f64::INFINITY).with_max(3.0);
        assert_eq!(interval, Interval::new(0.001, 3.0));
    }

    #[test]
    fn test_interval_empty() {
        let empty = Interval::EMPTY;

        assert!(empty.min > empty.max);
        assert_eq!(empty.size(), f64::NEG_INFINITY);
        assert!(!empty.contains(0.0));
        assert!(!empty.surrounds(0.0));
        assert_eq!(Interval::default(), empty);
    }

    #[test]
    fn test_interval_universe() {
        let universe = Interval::UNIVERSE;

        assert!(universe.contains(0.0));
        assert!(universe.contains(1e300));
        assert!(universe.surrounds(-1e300));
        assert_eq!(universe.size(), f64::INFINITY);
    }
}
