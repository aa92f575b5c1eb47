use serde::{Deserialize, Serialize};

/// Integer position in field coordinates.
///
/// `x` grows to the right, `y` grows downward; `y = 0` is the spawn row.
/// Positions may lie outside the field while a move is being validated.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    derive_more::Add,
    derive_more::Sub,
)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ZERO: Self = Self::new(0, 0);
    pub const LEFT: Self = Self::new(-1, 0);
    pub const RIGHT: Self = Self::new(1, 0);
    pub const DOWN: Self = Self::new(0, 1);

    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Width and height of a playing field, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[display("{width}x{height}")]
pub struct FieldSize {
    pub width: u16,
    pub height: u16,
}

impl FieldSize {
    #[must_use]
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn width(self) -> usize {
        usize::from(self.width)
    }

    #[must_use]
    pub fn height(self) -> usize {
        usize::from(self.height)
    }

    #[must_use]
    pub fn area(self) -> usize {
        self.width() * self.height()
    }

    /// Returns whether `point` lies on the grid.
    #[must_use]
    pub fn contains(self, point: Point) -> bool {
        (0..i32::from(self.width)).contains(&point.x)
            && (0..i32::from(self.height)).contains(&point.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_arithmetic() {
        let p = Point::new(3, 5);
        assert_eq!(p + Point::LEFT, Point::new(2, 5));
        assert_eq!(p + Point::DOWN - Point::DOWN, p);
        assert_eq!(p - p, Point::ZERO);
    }

    #[test]
    fn test_field_size_contains() {
        let size = FieldSize::new(10, 20);
        assert!(size.contains(Point::new(0, 0)));
        assert!(size.contains(Point::new(9, 19)));
        assert!(!size.contains(Point::new(-1, 0)));
        assert!(!size.contains(Point::new(10, 0)));
        assert!(!size.contains(Point::new(0, 20)));
        assert_eq!(size.area(), 200);
        assert_eq!(size.to_string(), "10x20");
    }
}
