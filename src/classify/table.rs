//! Breakpoint Tables
//!
//! Every discrete scale is an ordered list of upper bounds. The same table
//! drives Rust-side classification and the renderer case expressions, so
//! map paint, legend and tooltip can never disagree.

use serde::{Deserialize, Serialize};

/// How an upper bound is compared against the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundConvention {
    /// `value <= bound` selects the class
    #[default]
    Inclusive,
    /// `value < bound` selects the class
    Strict,
}

impl BoundConvention {
    pub fn admits(&self, value: f64, bound: f64) -> bool {
        match self {
            BoundConvention::Inclusive => value <= bound,
            BoundConvention::Strict => value < bound,
        }
    }

    /// Comparison operator name in renderer expressions.
    pub fn operator(&self) -> &'static str {
        match self {
            BoundConvention::Inclusive => "<=",
            BoundConvention::Strict => "<",
        }
    }
}

/// Ordered `(upper_bound, class)` pairs, an overflow class for values above
/// the last bound and a class for NaN input.
#[derive(Debug)]
pub struct ClassTable<T: 'static> {
    pub stops: &'static [(f64, T)],
    pub overflow: T,
    pub nan: T,
}

impl<T: Copy> ClassTable<T> {
    /// First bound that admits `value` wins.
    pub fn classify(&self, value: f64, convention: BoundConvention) -> T {
        if value.is_nan() {
            return self.nan;
        }
        self.stops
            .iter()
            .find(|(bound, _)| convention.admits(value, *bound))
            .map(|(_, class)| *class)
            .unwrap_or(self.overflow)
    }

    pub fn bounds(&self) -> impl Iterator<Item = f64> + '_ {
        self.stops.iter().map(|(b, _)| *b)
    }

    /// Classes in ascending order, overflow last.
    pub fn classes(&self) -> impl Iterator<Item = T> + '_ {
        self.stops.iter().map(|(_, c)| *c).chain(std::iter::once(self.overflow))
    }

    /// `(lower, upper, class)` for each class; `None` means unbounded.
    pub fn ranges(&self) -> Vec<(Option<f64>, Option<f64>, T)> {
        let mut out = Vec::with_capacity(self.stops.len() + 1);
        let mut lower = None;
        for (bound, class) in self.stops {
            out.push((lower, Some(*bound), *class));
            lower = Some(*bound);
        }
        out.push((lower, None, self.overflow));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static TABLE: ClassTable<u8> = ClassTable { stops: &[(0.0, 0), (1.0, 1)], overflow: 2, nan: 9 };

    #[test]
    fn test_inclusive_vs_strict_at_boundary() {
        assert_eq!(TABLE.classify(1.0, BoundConvention::Inclusive), 1);
        assert_eq!(TABLE.classify(1.0, BoundConvention::Strict), 2);
        assert_eq!(TABLE.classify(0.5, BoundConvention::Strict), 1);
    }

    #[test]
    fn test_nan_and_overflow() {
        assert_eq!(TABLE.classify(f64::NAN, BoundConvention::Inclusive), 9);
        assert_eq!(TABLE.classify(f64::INFINITY, BoundConvention::Inclusive), 2);
        assert_eq!(TABLE.classify(f64::NEG_INFINITY, BoundConvention::Inclusive), 0);
    }

    #[test]
    fn test_ranges_cover_the_line() {
        let ranges = TABLE.ranges();
        assert_eq!(ranges.len(), 3);
        assert_eq!(ranges[0], (None, Some(0.0), 0));
        assert_eq!(ranges[2], (Some(1.0), None, 2));
        assert_eq!(TABLE.classes().collect::<Vec<_>>(), vec![0, 1, 2]);
    }
}
