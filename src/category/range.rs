//! Closed numeric intervals with containment-aware comparison.
//!
//! LOCC outlines subdivide a class into numeric spans such as `1-278.5`.
//! Lookup treats two spans as the same bucket when one encloses the other,
//! which is not a true equivalence relation. The comparisons are therefore
//! plain functions rather than `Ord`/`PartialEq` impls, so a `Range` is never
//! accidentally used as a key in a structure that assumes transitivity.

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;

static RE_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+(?:\.\d+)?)-(\d+(?:\.\d+)?)$").unwrap());

static RE_POINT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+(?:\.\d+)?$").unwrap());

/// A closed interval `[min, max]` with `min <= max`.
#[derive(Debug, Clone, Copy)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    /// Build a range, returning `None` when the bounds are inverted or not finite.
    pub fn new(min: f64, max: f64) -> Option<Self> {
        (min.is_finite() && max.is_finite() && min <= max).then_some(Self { min, max })
    }

    /// A degenerate range covering a single class number.
    pub fn point(value: f64) -> Option<Self> {
        Self::new(value, value)
    }

    /// Parse `"<num>-<num>"` or `"<num>"`.
    ///
    /// Returns `None` for anything else; the caller decides whether that is
    /// worth logging.
    pub fn parse(text: &str) -> Option<Self> {
        if let Some(caps) = RE_SPAN.captures(text) {
            let min = caps[1].parse().ok()?;
            let max = caps[2].parse().ok()?;
            Self::new(min, max)
        } else if RE_POINT.is_match(text) {
            Self::point(text.parse().ok()?)
        } else {
            None
        }
    }

    /// True when `self` lies entirely inside `other` (bounds inclusive).
    pub fn within(&self, other: &Range) -> bool {
        self.min >= other.min && self.max <= other.max
    }

    /// Containment-equality: one interval contains the other.
    pub fn containment_eq(&self, other: &Range) -> bool {
        self.within(other) || other.within(self)
    }

    /// Identical bounds.
    pub fn same_bounds(&self, other: &Range) -> bool {
        self.min == other.min && self.max == other.max
    }

    /// Search ordering: `Equal` on containment, otherwise by `max`, then `min`.
    pub fn containment_cmp(&self, other: &Range) -> Ordering {
        if self.containment_eq(other) {
            return Ordering::Equal;
        }
        self.max
            .total_cmp(&other.max)
            .then_with(|| self.min.total_cmp(&other.min))
    }

    /// Strict lexicographic `(min, max)` ordering used to keep siblings sorted.
    pub fn structural_cmp(&self, other: &Range) -> Ordering {
        self.min
            .total_cmp(&other.min)
            .then_with(|| self.max.total_cmp(&other.max))
    }
}

impl std::fmt::Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.min == self.max {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{}-{}", self.min, self.max)
        }
    }
}
