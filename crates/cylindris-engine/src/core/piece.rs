use std::iter;

use arrayvec::ArrayVec;

use super::{cell::Cell, point::Point};
use crate::TemplateError;

/// Largest side length a piece template may have.
pub const MAX_PIECE_DIMENSION: u8 = 4;

const MAX_PIECE_CELLS: usize = 16;

/// Static, authored description of a piece shape.
///
/// `pattern` is read row-major within a `width × height` box; `#` marks a
/// filled cell and any other character an empty one.
///
/// # Example
///
/// ```
/// use cylindris_engine::{Piece, PieceTemplate};
///
/// const T: PieceTemplate = PieceTemplate::new(3, 2, "_#_###");
///
/// let piece = Piece::from_template(&T).unwrap();
/// assert_eq!(piece.dimension(), 3);
/// assert_eq!(piece.occupied_cells().count(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceTemplate {
    width: u8,
    height: u8,
    pattern: &'static str,
}

impl PieceTemplate {
    #[must_use]
    pub const fn new(width: u8, height: u8, pattern: &'static str) -> Self {
        Self {
            width,
            height,
            pattern,
        }
    }

    #[must_use]
    pub const fn width(&self) -> u8 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u8 {
        self.height
    }

    #[must_use]
    pub const fn pattern(&self) -> &'static str {
        self.pattern
    }
}

/// A piece shape padded to a square, together with its anchor in the field.
///
/// The shape is stored as a `dimension × dimension` grid so that rotation is a
/// plain index transform. Rotations return new pieces; only [`Piece::translate`]
/// mutates in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    cells: ArrayVec<Cell, MAX_PIECE_CELLS>,
    dimension: u8,
    logical_width: u8,
    logical_height: u8,
    anchor: Point,
}

impl Piece {
    /// Builds a piece anchored at the origin from a template.
    pub fn from_template(template: &PieceTemplate) -> Result<Self, TemplateError> {
        let PieceTemplate {
            width,
            height,
            pattern,
        } = *template;

        let valid_side = 1..=MAX_PIECE_DIMENSION;
        if !valid_side.contains(&width) || !valid_side.contains(&height) {
            return Err(TemplateError::InvalidSize { width, height });
        }

        let expected = usize::from(width) * usize::from(height);
        let actual = pattern.chars().count();
        if actual != expected {
            return Err(TemplateError::PatternLength {
                width,
                height,
                expected,
                actual,
            });
        }

        let dimension = width.max(height);
        let side = usize::from(dimension);
        let mut cells: ArrayVec<Cell, MAX_PIECE_CELLS> =
            iter::repeat_n(Cell::Empty, side * side).collect();
        for (index, ch) in pattern.chars().enumerate() {
            if ch != '#' {
                continue;
            }
            let col = index % usize::from(width);
            let row = index / usize::from(width);
            cells[row * side + col] = Cell::for_template_index(index);
        }

        if cells.iter().all(|cell| cell.is_empty()) {
            return Err(TemplateError::NoFilledCells);
        }

        Ok(Self {
            cells,
            dimension,
            logical_width: width,
            logical_height: height,
            anchor: Point::ZERO,
        })
    }

    /// Side length of the square shape grid.
    #[must_use]
    pub fn dimension(&self) -> usize {
        usize::from(self.dimension)
    }

    pub(crate) fn side(&self) -> u8 {
        self.dimension
    }

    #[must_use]
    pub fn logical_width(&self) -> usize {
        usize::from(self.logical_width)
    }

    #[must_use]
    pub fn logical_height(&self) -> usize {
        usize::from(self.logical_height)
    }

    /// Field position of the shape's local origin (its top-left corner).
    #[must_use]
    pub fn anchor(&self) -> Point {
        self.anchor
    }

    /// Returns the shape cell at local `(col, row)`.
    ///
    /// Positions outside the square are reported as empty.
    #[must_use]
    pub fn cell(&self, col: usize, row: usize) -> Cell {
        let side = self.dimension();
        if col >= side || row >= side {
            return Cell::Empty;
        }
        self.cells[row * side + col]
    }

    /// Iterates the filled cells as local offsets from the anchor.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (Point, Cell)> + '_ {
        (0..self.dimension)
            .flat_map(move |row| (0..self.dimension).map(move |col| (col, row)))
            .filter_map(move |(col, row)| {
                let cell = self.local(col, row);
                (!cell.is_empty()).then_some((Point::new(i32::from(col), i32::from(row)), cell))
            })
    }

    /// Iterates the filled cells at their unmapped field positions.
    pub fn world_cells(&self) -> impl Iterator<Item = (Point, Cell)> + '_ {
        self.occupied_cells()
            .map(move |(offset, cell)| (self.anchor + offset, cell))
    }

    /// Returns a copy of this piece anchored at `anchor`.
    #[must_use]
    pub fn placed_at(&self, anchor: Point) -> Self {
        Self {
            anchor,
            ..self.clone()
        }
    }

    /// Moves the anchor by `offset`.
    pub fn translate(&mut self, offset: Point) {
        self.anchor = self.anchor + offset;
    }

    /// Returns the piece rotated a quarter turn clockwise around its square.
    #[must_use]
    pub fn rotated_cw(&self) -> Self {
        let last = self.dimension - 1;
        self.remapped(|i, j| (last - j, i))
    }

    /// Returns the piece rotated a quarter turn counter-clockwise around its square.
    #[must_use]
    pub fn rotated_ccw(&self) -> Self {
        let last = self.dimension - 1;
        self.remapped(|i, j| (j, last - i))
    }

    /// Builds a piece whose cell `(i, j)` is taken from `source(i, j)` of `self`.
    fn remapped(&self, source: impl Fn(u8, u8) -> (u8, u8)) -> Self {
        let mut cells = self.cells.clone();
        for j in 0..self.dimension {
            for i in 0..self.dimension {
                let (si, sj) = source(i, j);
                cells[self.index(i, j)] = self.local(si, sj);
            }
        }
        Self {
            cells,
            dimension: self.dimension,
            logical_width: self.logical_height,
            logical_height: self.logical_width,
            anchor: self.anchor,
        }
    }

    fn index(&self, col: u8, row: u8) -> usize {
        usize::from(row) * self.dimension() + usize::from(col)
    }

    fn local(&self, col: u8, row: u8) -> Cell {
        self.cells[self.index(col, row)]
    }
}
