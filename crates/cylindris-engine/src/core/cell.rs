/// Content of a single field or piece cell.
///
/// Filled cells come in two shades purely for display; the simulation only
/// distinguishes empty from non-empty. The numeric tags match the values the
/// renderer palette is indexed by (tag `1` is the background and never stored).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Cell {
    /// No block.
    #[default]
    Empty = 0,
    /// Filled block, darker shade.
    Dark = 2,
    /// Filled block, lighter shade.
    Light = 3,
}

impl Cell {
    /// Shade for the `index`-th character of a piece template.
    ///
    /// Even indices are dark, odd indices are light.
    #[must_use]
    pub const fn for_template_index(index: usize) -> Self {
        if index % 2 == 0 { Cell::Dark } else { Cell::Light }
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    #[must_use]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Dark => '#',
            Cell::Light => 'o',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_index_alternates_shades() {
        assert_eq!(Cell::for_template_index(0), Cell::Dark);
        assert_eq!(Cell::for_template_index(1), Cell::Light);
        assert_eq!(Cell::for_template_index(6), Cell::Dark);
        assert_eq!(Cell::for_template_index(7), Cell::Light);
    }

    #[test]
    fn test_tags() {
        assert_eq!(Cell::Empty.tag(), 0);
        assert_eq!(Cell::Dark.tag(), 2);
        assert_eq!(Cell::Light.tag(), 3);
        assert!(Cell::Empty.is_empty());
        assert!(!Cell::Dark.is_empty());
        assert!(!Cell::Light.is_empty());
    }
}
