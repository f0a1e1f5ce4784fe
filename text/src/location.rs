use serde::{Deserialize, Serialize};
use std::fmt;

/// A `(line, column)` position in a [`crate::TextStore`].
///
/// Columns count chars. A column of `-1` sits before the first char of the
/// line, which is how the point names the start of a line: the point always
/// refers to the char *after which* the next insertion lands.
///
/// Ordering compares the line first, then the column.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Location {
    pub line: usize,
    pub column: isize,
}

impl Location {
    /// Before the first char of the buffer.
    pub const START: Location = Location {
        line: 0,
        column: -1,
    };

    pub const fn new(line: usize, column: isize) -> Self {
        Self { line, column }
    }

    /// The start of `line`, in point form.
    pub const fn line_start(line: usize) -> Self {
        Self { line, column: -1 }
    }

    pub fn is_before(&self, other: &Location) -> bool {
        self < other
    }

    pub fn is_after(&self, other: &Location) -> bool {
        self > other
    }

    /// Returns the two locations in document order.
    pub fn ordered(a: Location, b: Location) -> (Location, Location) {
        if b < a {
            (b, a)
        } else {
            (a, b)
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::Location;

    #[test]
    fn orders_by_line_then_column() {
        let mut locations = vec![
            Location::new(1, 0),
            Location::new(0, 5),
            Location::START,
            Location::new(1, -1),
        ];
        locations.sort();
        assert_eq!(
            locations,
            vec![
                Location::START,
                Location::new(0, 5),
                Location::new(1, -1),
                Location::new(1, 0),
            ]
        );
    }

    #[test]
    fn ordered_swaps_when_reversed() {
        let a = Location::new(3, 2);
        let b = Location::new(1, 7);
        assert_eq!(Location::ordered(a, b), (b, a));
        assert!(b.is_before(&a));
        assert!(a.is_after(&b));
    }

    #[test]
    fn displays_one_based() {
        assert_eq!(Location::START.to_string(), "1:0");
        assert_eq!(Location::new(2, 4).to_string(), "3:5");
    }
}
