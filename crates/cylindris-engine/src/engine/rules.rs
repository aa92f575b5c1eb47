use crate::{
    RuleSetError,
    core::{Field, FieldSize, Piece, PieceTemplate, Point},
};

use super::spawn_table::SpawnTable;

/// Pieces shared by both variants, index-aligned with the spawn weights.
const CLASSIC_TEMPLATES: [PieceTemplate; 7] = [
    // O
    PieceTemplate::new(2, 2, "####"),
    // Z
    PieceTemplate::new(3, 2, "##__##"),
    // S
    PieceTemplate::new(3, 2, "_####_"),
    // L
    PieceTemplate::new(3, 2, "__####"),
    // J; the source data repeats L here, which would draw L 30% of the time
    PieceTemplate::new(3, 2, "#__###"),
    // I
    PieceTemplate::new(4, 1, "####"),
    // T
    PieceTemplate::new(3, 2, "_#_###"),
];

const CLASSIC_WEIGHTS: [f64; 7] = [10.0, 15.0, 15.0, 15.0, 15.0, 10.0, 20.0];

/// Extra pieces appended to the classic set in the cylinder variant.
const CYLINDER_EXTRA_TEMPLATES: [PieceTemplate; 3] = [
    // plus
    PieceTemplate::new(3, 3, "_#_###_#_"),
    // U
    PieceTemplate::new(3, 2, "####_#"),
    // staircase
    PieceTemplate::new(3, 3, "#__##__##"),
];

const CYLINDER_WEIGHTS: [f64; 10] = [10.0, 15.0, 15.0, 15.0, 15.0, 10.0, 5.0, 5.0, 5.0, 5.0];

/// How positions relate to the field's edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum Topology {
    /// Every edge is a wall.
    Bounded,
    /// Left and right edges are joined; only the top and bottom are walls.
    Cylinder,
}

impl Topology {
    /// Maps a position onto the grid before any cell lookup.
    ///
    /// In a cylinder, columns wrap around: `-1` becomes `width - 1` and
    /// `width` becomes `0`.
    #[must_use]
    pub fn map_to_field(self, point: Point, size: FieldSize) -> Point {
        match self {
            Topology::Bounded => point,
            Topology::Cylinder => Point::new(point.x.rem_euclid(i32::from(size.width)), point.y),
        }
    }

    /// Returns whether `point` crosses one of the hard walls of this topology.
    #[must_use]
    pub fn is_out_of_bounds(self, point: Point, size: FieldSize) -> bool {
        let vertical = point.y < 0 || point.y >= i32::from(size.height);
        match self {
            Topology::Bounded => vertical || point.x < 0 || point.x >= i32::from(size.width),
            Topology::Cylinder => vertical,
        }
    }
}

/// Which full rows are removed during elimination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum ClearRule {
    /// Every full row.
    FullRows,
    /// Full rows that touch another full row above or below; a lone full
    /// row stays.
    StackedFullRows,
}

impl ClearRule {
    #[must_use]
    pub fn should_eliminate(self, field: &Field, y: usize) -> bool {
        if !field.is_row_full(y) {
            return false;
        }
        match self {
            ClearRule::FullRows => true,
            ClearRule::StackedFullRows => {
                let above = y > 0 && field.is_row_full(y - 1);
                let below = y + 1 < field.size().height() && field.is_row_full(y + 1);
                above || below
            }
        }
    }
}

/// Everything that distinguishes one game variant from another.
///
/// Templates and spawn weights are index-aligned: weight `i` is the chance of
/// spawning template `i`.
#[derive(Debug, Clone)]
pub struct RuleSet {
    name: String,
    field_size: FieldSize,
    templates: Vec<Piece>,
    spawn_table: SpawnTable,
    topology: Topology,
    clear_rule: ClearRule,
}

impl RuleSet {
    /// Validates and assembles a rule set.
    ///
    /// Fails when a template is malformed, the weights do not form a
    /// distribution or do not line up with the templates, or a template is not
    /// narrower than the field (spawn columns are drawn from
    /// `[0, width - dimension)`).
    pub fn new(
        name: impl Into<String>,
        field_size: FieldSize,
        templates: &[PieceTemplate],
        weights: &[f64],
        topology: Topology,
        clear_rule: ClearRule,
    ) -> Result<Self, RuleSetError> {
        if field_size.width == 0 || field_size.height == 0 {
            return Err(RuleSetError::EmptyField {
                width: field_size.width,
                height: field_size.height,
            });
        }
        if templates.len() != weights.len() {
            return Err(RuleSetError::MisalignedWeights {
                templates: templates.len(),
                weights: weights.len(),
            });
        }

        let templates = templates
            .iter()
            .enumerate()
            .map(|(index, template)| {
                let piece = Piece::from_template(template)
                    .map_err(|source| RuleSetError::Template { index, source })?;
                if piece.dimension() >= field_size.width() {
                    return Err(RuleSetError::TemplateTooWide {
                        index,
                        dimension: piece.dimension(),
                        width: field_size.width,
                    });
                }
                Ok(piece)
            })
            .collect::<Result<Vec<_>, _>>()?;
        let spawn_table = SpawnTable::new(weights).map_err(RuleSetError::SpawnTable)?;

        Ok(Self {
            name: name.into(),
            field_size,
            templates,
            spawn_table,
            topology,
            clear_rule,
        })
    }

    /// 10×20 walled field, seven pieces, every full row is cleared.
    ///
    /// # Panics
    ///
    /// Never in practice; the built-in data is valid.
    #[must_use]
    pub fn classic() -> Self {
        Self::new(
            "classic",
            FieldSize::new(10, 20),
            &CLASSIC_TEMPLATES,
            &CLASSIC_WEIGHTS,
            Topology::Bounded,
            ClearRule::FullRows,
        )
        .expect("classic rule set should be valid")
    }

    /// 12×20 field wrapping horizontally, ten pieces, only stacked full rows
    /// are cleared.
    ///
    /// # Panics
    ///
    /// Never in practice; the built-in data is valid.
    #[must_use]
    pub fn cylinder() -> Self {
        let templates: Vec<_> = CLASSIC_TEMPLATES
            .iter()
            .chain(&CYLINDER_EXTRA_TEMPLATES)
            .copied()
            .collect();
        Self::new(
            "cylinder",
            FieldSize::new(12, 20),
            &templates,
            &CYLINDER_WEIGHTS,
            Topology::Cylinder,
            ClearRule::StackedFullRows,
        )
        .expect("cylinder rule set should be valid")
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn field_size(&self) -> FieldSize {
        self.field_size
    }

    /// Piece prototypes, anchored at the origin.
    #[must_use]
    pub fn templates(&self) -> &[Piece] {
        &self.templates
    }

    #[must_use]
    pub fn spawn_table(&self) -> &SpawnTable {
        &self.spawn_table
    }

    #[must_use]
    pub fn topology(&self) -> Topology {
        self.topology
    }

    #[must_use]
    pub fn clear_rule(&self) -> ClearRule {
        self.clear_rule
    }
}

/// Built-in variants, selectable by name (case-insensitive).
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    derive_more::Display,
    derive_more::FromStr,
    derive_more::IsVariant,
)]
pub enum ModeKind {
    #[default]
    Classic,
    Cylinder,
}

impl ModeKind {
    pub const ALL: [ModeKind; 2] = [ModeKind::Classic, ModeKind::Cylinder];

    #[must_use]
    pub fn rules(self) -> RuleSet {
        match self {
            ModeKind::Classic => RuleSet::classic(),
            ModeKind::Cylinder => RuleSet::cylinder(),
        }
    }
}
