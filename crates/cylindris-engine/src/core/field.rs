use std::fmt;

use super::{
    cell::Cell,
    point::{FieldSize, Point},
};

/// Grid of locked blocks.
///
/// Cells are addressed by [`Point`]; `y = 0` is the top (spawn) row and
/// `y = height - 1` is the floor. Off-grid reads return `None` and off-grid
/// writes are ignored, so callers can test candidate positions freely.
///
/// # Example
///
/// ```
/// use cylindris_engine::{Cell, Field, FieldSize, Point};
///
/// let mut field = Field::new(FieldSize::new(4, 3));
/// for x in 0..4 {
///     field.set(Point::new(x, 2), Cell::Dark);
/// }
/// assert!(field.is_row_full(2));
///
/// let removed = field.eliminate_rows(Field::is_row_full);
/// assert_eq!(removed, 1);
/// assert_eq!(field.occupied_count(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    size: FieldSize,
    cells: Vec<Cell>,
}

impl Field {
    #[must_use]
    pub fn new(size: FieldSize) -> Self {
        Self {
            size,
            cells: vec![Cell::Empty; size.area()],
        }
    }

    #[must_use]
    pub fn size(&self) -> FieldSize {
        self.size
    }

    #[must_use]
    pub fn get(&self, point: Point) -> Option<Cell> {
        self.offset(point).map(|i| self.cells[i])
    }

    /// Writes `cell` at `point`, returning `false` if `point` is off the grid.
    pub fn set(&mut self, point: Point, cell: Cell) -> bool {
        let Some(i) = self.offset(point) else {
            return false;
        };
        self.cells[i] = cell;
        true
    }

    /// Returns row `y` (0 = top).
    ///
    /// # Panics
    ///
    /// Panics if `y` is not less than the field height.
    #[must_use]
    pub fn row(&self, y: usize) -> &[Cell] {
        let width = self.size.width();
        &self.cells[y * width..][..width]
    }

    /// Iterates rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.size.width().max(1))
    }

    /// A row is full when none of its cells is empty.
    #[must_use]
    pub fn is_row_full(&self, y: usize) -> bool {
        self.row(y).iter().all(|cell| !cell.is_empty())
    }

    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_empty()).count()
    }

    /// Removes every row selected by `should_eliminate` and returns how many were removed.
    ///
    /// The predicate always sees the field as it was before elimination. Rows
    /// are scanned bottom to top and survivors are copied bottom-aligned into a
    /// fresh grid, so the remaining blocks fall down and the top is refilled
    /// with empty rows.
    pub fn eliminate_rows<F>(&mut self, should_eliminate: F) -> usize
    where
        F: Fn(&Field, usize) -> bool,
    {
        let height = self.size.height();
        let mut compacted = Field::new(self.size);
        let mut kept = 0;
        for y in (0..height).rev() {
            if should_eliminate(self, y) {
                continue;
            }
            kept += 1;
            let target = height - kept;
            let width = self.size.width();
            compacted.cells[target * width..][..width].copy_from_slice(self.row(y));
        }
        *self = compacted;
        height - kept
    }

    fn offset(&self, point: Point) -> Option<usize> {
        if !self.size.contains(point) {
            return None;
        }
        let x = usize::try_from(point.x).ok()?;
        let y = usize::try_from(point.y).ok()?;
        Some(y * self.size.width() + x)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for cell in row {
                write!(f, "{}", cell.as_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_row(field: &mut Field, y: i32) {
        for x in 0..i32::from(field.size().width) {
            field.set(Point::new(x, y), Cell::Dark);
        }
    }

    #[test]
    fn test_new_field_is_empty() {
        let field = Field::new(FieldSize::new(10, 20));
        assert_eq!(field.size(), FieldSize::new(10, 20));
        assert_eq!(field.rows().count(), 20);
        assert!(field.rows().all(|row| row.len() == 10));
        assert_eq!(field.occupied_count(), 0);
    }

    #[test]
    fn test_get_and_set_off_grid() {
        let mut field = Field::new(FieldSize::new(3, 2));
        assert!(field.set(Point::new(2, 1), Cell::Light));
        assert_eq!(field.get(Point::new(2, 1)), Some(Cell::Light));
        assert!(!field.set(Point::new(3, 0), Cell::Dark));
        assert!(!field.set(Point::new(-1, 0), Cell::Dark));
        assert!(!field.set(Point::new(0, 2), Cell::Dark));
        assert_eq!(field.get(Point::new(0, -1)), None);
        assert_eq!(field.occupied_count(), 1);
    }

    #[test]
    fn test_is_row_full() {
        let mut field = Field::new(FieldSize::new(4, 3));
        fill_row(&mut field, 1);
        assert!(field.is_row_full(1));
        assert!(!field.is_row_full(0));
        field.set(Point::new(3, 1), Cell::Empty);
        assert!(!field.is_row_full(1));
    }

    #[test]
    fn test_eliminate_bottom_row() {
        let mut field = Field::new(FieldSize::new(10, 20));
        fill_row(&mut field, 19);
        let removed = field.eliminate_rows(Field::is_row_full);
        assert_eq!(removed, 1);
        assert_eq!(field, Field::new(FieldSize::new(10, 20)));
    }

    #[test]
    fn test_eliminate_compacts_survivors_downward() {
        let mut field = Field::new(FieldSize::new(4, 5));
        field.set(Point::new(0, 1), Cell::Dark);
        fill_row(&mut field, 2);
        field.set(Point::new(3, 3), Cell::Light);
        fill_row(&mut field, 4);

        let removed = field.eliminate_rows(Field::is_row_full);
        assert_eq!(removed, 2);
        assert_eq!(field.to_string(), "....\n....\n....\n#...\n...o\n");
    }

    #[test]
    fn test_eliminate_nothing_keeps_field() {
        let mut field = Field::new(FieldSize::new(4, 3));
        field.set(Point::new(1, 2), Cell::Dark);
        let before = field.clone();
        assert_eq!(field.eliminate_rows(Field::is_row_full), 0);
        assert_eq!(field, before);
    }

    #[test]
    fn test_predicate_sees_original_rows() {
        let mut field = Field::new(FieldSize::new(2, 4));
        fill_row(&mut field, 2);
        fill_row(&mut field, 3);
        let removed = field.eliminate_rows(|f, y| {
            f.is_row_full(y) && y > 0 && f.is_row_full(y - 1)
        });
        assert_eq!(removed, 1);
        assert_eq!(field.occupied_count(), 2);
        assert!(field.is_row_full(3));
    }

    #[test]
    fn test_display() {
        let mut field = Field::new(FieldSize::new(3, 2));
        field.set(Point::new(0, 0), Cell::Dark);
        field.set(Point::new(2, 1), Cell::Light);
        assert_eq!(field.to_string(), "#..\n..o\n");
    }
}
