use crate::core::{Field, FieldSize, Piece, Point};

use super::{
    command::{Command, Rotation},
    piece_generator::{PieceGenerator, PieceSeed},
    rules::RuleSet,
};

/// What a single [`GameMode::tick`] did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    /// Gravity locked the falling piece into the field.
    pub locked: bool,
    /// A new piece entered the field.
    pub spawned: bool,
    /// Number of rows removed by elimination.
    pub cleared_rows: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MoveOutcome {
    Moved,
    Blocked,
    Locked,
    NoPiece,
}

/// Movement-and-locking state machine for one variant.
///
/// Owns the locked field, the falling piece and the game-over flag. Every
/// mutation that would leave the falling piece stuck or out of bounds is
/// either rejected or resolved by locking it. If row elimination drops locked
/// blocks into the falling piece, the game ends as for a blocked spawn. So
/// between calls the active piece (if any) always sits at a legal position.
///
/// Once the game is over, [`process_command`](Self::process_command) and
/// [`tick`](Self::tick) are no-ops until [`init`](Self::init) is called.
#[derive(Debug, Clone)]
pub struct GameMode {
    rules: RuleSet,
    field: Field,
    active_piece: Option<Piece>,
    game_over: bool,
    generator: PieceGenerator,
}

impl GameMode {
    /// Starts a game with a randomly seeded piece generator.
    #[must_use]
    pub fn new(rules: RuleSet) -> Self {
        Self::with_generator(rules, PieceGenerator::new())
    }

    #[must_use]
    pub fn with_seed(rules: RuleSet, seed: PieceSeed) -> Self {
        Self::with_generator(rules, PieceGenerator::with_seed(seed))
    }

    fn with_generator(rules: RuleSet, generator: PieceGenerator) -> Self {
        Self {
            field: Field::new(rules.field_size()),
            rules,
            active_piece: None,
            game_over: false,
            generator,
        }
    }

    /// Clears the field, drops the falling piece and the game-over flag.
    ///
    /// The piece generator keeps its state, so a restarted game continues the
    /// same random sequence.
    pub fn init(&mut self) {
        self.field = Field::new(self.rules.field_size());
        self.active_piece = None;
        self.game_over = false;
    }

    /// Snapshot of the locked field with the falling piece drawn in.
    #[must_use]
    pub fn field(&self) -> Field {
        let mut field = self.field.clone();
        if let Some(piece) = &self.active_piece {
            Self::stamp(&self.rules, &mut field, piece);
        }
        field
    }

    /// The field without the falling piece.
    #[must_use]
    pub fn locked_field(&self) -> &Field {
        &self.field
    }

    #[must_use]
    pub fn active_piece(&self) -> Option<&Piece> {
        self.active_piece.as_ref()
    }

    #[must_use]
    pub fn field_size(&self) -> FieldSize {
        self.rules.field_size()
    }

    #[must_use]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Applies one player command to the falling piece.
    ///
    /// Blocked moves and rotations are silently dropped. A move that makes the
    /// piece stuck locks it, whatever its direction. [`Command::Jammed`] and
    /// [`Command::None`] do nothing.
    pub fn process_command(&mut self, command: Command) {
        if self.game_over {
            return;
        }
        if let Some(offset) = command.offset() {
            _ = self.try_move(offset);
        } else if let Some(rotation) = command.rotation() {
            _ = self.try_rotate(rotation);
        }
    }

    /// Advances the game by one step: gravity, then spawn, then row
    /// elimination.
    ///
    /// A piece locked by gravity is replaced within the same tick, and rows it
    /// completed are eliminated in that tick too.
    pub fn tick(&mut self) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        if self.game_over {
            return outcome;
        }

        outcome.locked = self.try_move(Point::DOWN) == MoveOutcome::Locked;
        if self.active_piece.is_none() {
            outcome.spawned = self.spawn_piece();
        }
        outcome.cleared_rows = self.eliminate_rows();
        if outcome.cleared_rows > 0 {
            self.reconcile_active_piece();
        }
        outcome
    }

    fn try_move(&mut self, offset: Point) -> MoveOutcome {
        let Some(mut piece) = self.active_piece.take() else {
            return MoveOutcome::NoPiece;
        };

        piece.translate(offset);
        if self.is_stuck(&piece) {
            piece.translate(Point::ZERO - offset);
            self.lock(&piece);
            return MoveOutcome::Locked;
        }
        if self.is_out_of_bounds(&piece) {
            piece.translate(Point::ZERO - offset);
            tracing::trace!(?offset, "move rejected");
            self.active_piece = Some(piece);
            return MoveOutcome::Blocked;
        }

        let anchor = self.normalize(piece.anchor());
        self.active_piece = Some(piece.placed_at(anchor));
        MoveOutcome::Moved
    }

    fn try_rotate(&mut self, rotation: Rotation) -> MoveOutcome {
        let Some(piece) = &self.active_piece else {
            return MoveOutcome::NoPiece;
        };

        let candidate = match rotation {
            Rotation::Clockwise => piece.rotated_cw(),
            Rotation::CounterClockwise => piece.rotated_ccw(),
        };
        if self.is_stuck(&candidate) || self.is_out_of_bounds(&candidate) {
            tracing::trace!(?rotation, "rotation rejected");
            return MoveOutcome::Blocked;
        }
        self.active_piece = Some(candidate);
        MoveOutcome::Moved
    }

    /// Places a freshly drawn piece on the top row. Returns `false` and ends
    /// the game when the new piece is immediately stuck.
    fn spawn_piece(&mut self) -> bool {
        if self.active_piece.is_some() {
            return false;
        }

        let index = self.generator.next_template(self.rules.spawn_table());
        let template = &self.rules.templates()[index];
        let size = self.rules.field_size();
        let upper = size.width.saturating_sub(u16::from(template.side()));
        let x = self.generator.spawn_x(upper);
        let piece = template.placed_at(Point::new(x, 0));

        if self.is_stuck(&piece) {
            tracing::debug!(index, x, "spawned piece is stuck, game over");
            self.game_over = true;
            return false;
        }
        tracing::trace!(index, x, "spawned piece");
        self.active_piece = Some(piece);
        true
    }

    fn eliminate_rows(&mut self) -> usize {
        let rule = self.rules.clear_rule();
        let cleared = self
            .field
            .eliminate_rows(|field, y| rule.should_eliminate(field, y));
        if cleared > 0 {
            tracing::debug!(cleared, "eliminated rows");
        }
        cleared
    }

    /// Compaction moves locked blocks but not the falling piece, which may now
    /// overlap them. Such a piece can no longer be placed anywhere legal.
    fn reconcile_active_piece(&mut self) {
        if self
            .active_piece
            .as_ref()
            .is_some_and(|piece| self.is_stuck(piece))
        {
            tracing::debug!("rows dropped into the falling piece, game over");
            self.active_piece = None;
            self.game_over = true;
        }
    }

    /// A piece is stuck when a filled cell overlaps a locked block or reaches
    /// the floor.
    fn is_stuck(&self, piece: &Piece) -> bool {
        let size = self.rules.field_size();
        let height = i32::from(size.height);
        piece.world_cells().any(|(point, _)| {
            let mapped = self.rules.topology().map_to_field(point, size);
            if mapped.y >= height {
                return true;
            }
            self.field.get(mapped).is_some_and(|cell| !cell.is_empty())
        })
    }

    fn is_out_of_bounds(&self, piece: &Piece) -> bool {
        let size = self.rules.field_size();
        let topology = self.rules.topology();
        piece
            .world_cells()
            .any(|(point, _)| topology.is_out_of_bounds(point, size))
    }

    fn normalize(&self, anchor: Point) -> Point {
        self.rules
            .topology()
            .map_to_field(anchor, self.rules.field_size())
    }

    fn lock(&mut self, piece: &Piece) {
        Self::stamp(&self.rules, &mut self.field, piece);
        tracing::debug!(anchor = ?piece.anchor(), "locked piece");
    }

    fn stamp(rules: &RuleSet, field: &mut Field, piece: &Piece) {
        let size = rules.field_size();
        let topology = rules.topology();
        for (point, cell) in piece.world_cells() {
            field.set(topology.map_to_field(point, size), cell);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ClearRule, ModeKind, Topology,
        core::{Cell, PieceTemplate},
    };

    const O: usize = 0;
    const I: usize = 5;

    fn mode(kind: ModeKind) -> GameMode {
        GameMode::with_seed(kind.rules(), PieceSeed::from(0x5eed))
    }

    fn place(mode: &mut GameMode, template: usize, anchor: Point) {
        let piece = mode.rules.templates()[template].placed_at(anchor);
        mode.active_piece = Some(piece);
    }

    fn fill_row(mode: &mut GameMode, y: i32, skip: &[i32]) {
        for x in 0..i32::from(mode.field_size().width) {
            if !skip.contains(&x) {
                mode.field.set(Point::new(x, y), Cell::Dark);
            }
        }
    }

    fn anchor(mode: &GameMode) -> Point {
        mode.active_piece().unwrap().anchor()
    }

    #[test]
    fn test_new_game_is_empty() {
        let mode = mode(ModeKind::Classic);
        assert!(!mode.is_game_over());
        assert!(mode.active_piece().is_none());
        assert_eq!(mode.field_size(), FieldSize::new(10, 20));
        assert_eq!(mode.field().occupied_count(), 0);
    }

    #[test]
    fn test_every_template_spawns_at_origin_on_empty_field() {
        for kind in ModeKind::ALL {
            let mode = mode(kind);
            for template in mode.rules().templates() {
                let piece = template.placed_at(Point::ZERO);
                assert!(!mode.is_stuck(&piece));
                assert!(!mode.is_out_of_bounds(&piece));
            }
        }
    }

    #[test]
    fn test_spawns_land_inside_empty_field() {
        for kind in ModeKind::ALL {
            for seed in 0..200 {
                let mut mode = GameMode::with_seed(kind.rules(), PieceSeed::from(seed));
                assert!(mode.tick().spawned);
                assert!(!mode.is_game_over());

                let piece = mode.active_piece().unwrap();
                assert_eq!(piece.anchor().y, 0);
                let x = usize::try_from(piece.anchor().x).unwrap();
                assert!(x + piece.dimension() < mode.field_size().width());
            }
        }
    }

    #[test]
    fn test_field_snapshot_is_pure() {
        let mut mode = mode(ModeKind::Classic);
        mode.tick();
        let first = mode.field();
        let second = mode.field();
        assert_eq!(first, second);
        assert_eq!(first.occupied_count(), 4);
        assert_eq!(mode.locked_field().occupied_count(), 0);
    }

    #[test]
    fn test_move_down_locks_at_floor() {
        let mut mode = mode(ModeKind::Classic);
        place(&mut mode, O, Point::new(4, 0));
        let dimension = mode.active_piece().unwrap().dimension();

        let mut moves = 0;
        while mode.active_piece().is_some() {
            mode.process_command(Command::MoveDown);
            if mode.active_piece().is_some() {
                moves += 1;
            }
        }
        assert_eq!(moves, mode.field_size().height() - dimension);

        let field = mode.locked_field();
        for (x, y) in [(4, 18), (5, 18), (4, 19), (5, 19)] {
            assert!(!field.get(Point::new(x, y)).unwrap().is_empty());
        }
        assert_eq!(field.occupied_count(), 4);
    }

    #[test]
    fn test_side_move_into_block_locks() {
        let mut mode = mode(ModeKind::Classic);
        place(&mut mode, O, Point::new(3, 5));
        mode.field.set(Point::new(2, 5), Cell::Light);

        mode.process_command(Command::MoveLeft);
        assert!(mode.active_piece().is_none());
        let field = mode.locked_field();
        for (x, y) in [(3, 5), (4, 5), (3, 6), (4, 6)] {
            assert!(!field.get(Point::new(x, y)).unwrap().is_empty());
        }
    }

    #[test]
    fn test_wall_blocks_without_locking() {
        let mut mode = mode(ModeKind::Classic);
        place(&mut mode, O, Point::new(0, 5));
        mode.process_command(Command::MoveLeft);
        assert_eq!(anchor(&mode), Point::new(0, 5));

        place(&mut mode, O, Point::new(8, 5));
        mode.process_command(Command::MoveRight);
        assert_eq!(anchor(&mode), Point::new(8, 5));
        assert_eq!(mode.locked_field().occupied_count(), 0);
    }

    #[test]
    fn test_rotation_against_wall() {
        let vertical_i = |mode: &mut GameMode| {
            place(mode, I, Point::new(9, 5));
            let piece = mode.active_piece.take().unwrap().rotated_cw();
            assert_eq!(piece.world_cells().map(|(p, _)| p.x).max(), Some(9));
            mode.active_piece = Some(piece);
        };

        let mut classic = mode(ModeKind::Classic);
        vertical_i(&mut classic);
        let before = classic.active_piece().cloned();
        classic.process_command(Command::RotateCw);
        assert_eq!(classic.active_piece().cloned(), before);

        let mut cylinder = mode(ModeKind::Cylinder);
        vertical_i(&mut cylinder);
        let expected = cylinder.active_piece().unwrap().rotated_cw();
        cylinder.process_command(Command::RotateCw);
        assert_eq!(cylinder.active_piece(), Some(&expected));
    }

    #[test]
    fn test_rotation_into_block_is_rejected() {
        let mut mode = mode(ModeKind::Classic);
        place(&mut mode, I, Point::new(3, 5));
        let candidate = mode.active_piece().unwrap().rotated_cw();
        let (blocker, _) = candidate
            .world_cells()
            .find(|(p, _)| p.y != 5)
            .unwrap();
        mode.field.set(blocker, Cell::Dark);

        let before = mode.active_piece().cloned();
        mode.process_command(Command::RotateCw);
        assert_eq!(mode.active_piece().cloned(), before);
        assert_eq!(mode.locked_field().occupied_count(), 1);
    }

    #[test]
    fn test_jammed_and_none_change_nothing() {
        let mut mode = mode(ModeKind::Classic);
        mode.tick();
        let before = mode.active_piece().cloned();
        mode.process_command(Command::Jammed);
        assert_eq!(mode.active_piece().cloned(), before);
        mode.process_command(Command::None);
        assert_eq!(mode.active_piece().cloned(), before);
    }

    #[test]
    fn test_classic_clears_single_full_row() {
        let mut mode = mode(ModeKind::Classic);
        fill_row(&mut mode, 19, &[]);
        let outcome = mode.tick();
        assert_eq!(outcome.cleared_rows, 1);
        assert_eq!(mode.locked_field().occupied_count(), 0);
    }

    #[test]
    fn test_cylinder_keeps_isolated_full_row() {
        let mut mode = mode(ModeKind::Cylinder);
        fill_row(&mut mode, 19, &[]);
        assert_eq!(mode.tick().cleared_rows, 0);
        assert!(mode.locked_field().is_row_full(19));

        fill_row(&mut mode, 18, &[]);
        assert_eq!(mode.tick().cleared_rows, 2);
        assert_eq!(mode.locked_field().occupied_count(), 0);
    }

    #[test]
    fn test_cylinder_wraps_horizontally() {
        let mut mode = mode(ModeKind::Cylinder);
        place(&mut mode, O, Point::new(0, 5));
        mode.process_command(Command::MoveLeft);
        assert_eq!(anchor(&mode), Point::new(11, 5));

        let field = mode.field();
        for (x, y) in [(11, 5), (0, 5), (11, 6), (0, 6)] {
            assert!(!field.get(Point::new(x, y)).unwrap().is_empty());
        }

        mode.process_command(Command::MoveRight);
        assert_eq!(anchor(&mode), Point::new(0, 5));
        for _ in 0..30 {
            mode.process_command(Command::MoveRight);
        }
        assert_eq!(anchor(&mode), Point::new(6, 5));
    }

    #[test]
    fn test_cylinder_collides_across_seam() {
        let mut mode = mode(ModeKind::Cylinder);
        place(&mut mode, O, Point::new(0, 5));
        mode.field.set(Point::new(11, 6), Cell::Dark);
        mode.process_command(Command::MoveLeft);
        assert!(mode.active_piece().is_none());
        assert!(!mode.locked_field().get(Point::new(0, 5)).unwrap().is_empty());
    }

    #[test]
    fn test_lock_spawn_and_clear_in_one_tick() {
        let mut mode = mode(ModeKind::Classic);
        fill_row(&mut mode, 19, &[0, 1]);
        place(&mut mode, O, Point::new(0, 18));

        let outcome = mode.tick();
        assert_eq!(
            outcome,
            TickOutcome {
                locked: true,
                spawned: true,
                cleared_rows: 1,
            }
        );
        let field = mode.locked_field();
        assert_eq!(field.occupied_count(), 2);
        assert!(!field.get(Point::new(0, 19)).unwrap().is_empty());
        assert!(!field.get(Point::new(1, 19)).unwrap().is_empty());
    }

    #[test]
    fn test_elimination_into_falling_piece_ends_game() {
        let t_only = RuleSet::new(
            "t-only",
            FieldSize::new(4, 20),
            &[PieceTemplate::new(3, 2, "_#_###")],
            &[1.0],
            Topology::Bounded,
            ClearRule::FullRows,
        )
        .unwrap();
        let mut mode = GameMode::with_seed(t_only, PieceSeed::from(1));
        // T always spawns at (0, 0); (0, 0) is one of its empty cells.
        mode.field.set(Point::new(0, 0), Cell::Light);
        fill_row(&mut mode, 19, &[]);

        let outcome = mode.tick();
        assert!(outcome.spawned);
        assert_eq!(outcome.cleared_rows, 1);

        let locked = mode.locked_field();
        assert_eq!(locked.get(Point::new(0, 1)), Some(Cell::Light));
        if let Some(piece) = mode.active_piece() {
            assert!(
                piece
                    .world_cells()
                    .all(|(p, _)| locked.get(p).is_none_or(Cell::is_empty))
            );
        }
        assert!(mode.is_game_over());
        assert!(mode.active_piece().is_none());
    }

    #[test]
    fn test_clear_below_falling_piece_keeps_playing() {
        let mut mode = mode(ModeKind::Classic);
        place(&mut mode, O, Point::new(4, 0));
        fill_row(&mut mode, 19, &[]);

        let outcome = mode.tick();
        assert_eq!(outcome.cleared_rows, 1);
        assert!(!mode.is_game_over());
        assert_eq!(anchor(&mode), Point::new(4, 1));
    }

    #[test]
    fn test_blocked_spawn_ends_game() {
        let mut mode = mode(ModeKind::Classic);
        fill_row(&mut mode, 0, &[9]);

        let outcome = mode.tick();
        assert!(!outcome.spawned);
        assert!(mode.is_game_over());
        assert!(mode.active_piece().is_none());

        let snapshot = mode.field();
        assert_eq!(mode.tick(), TickOutcome::default());
        mode.process_command(Command::MoveDown);
        assert_eq!(mode.field(), snapshot);

        mode.init();
        assert!(!mode.is_game_over());
        assert_eq!(mode.field().occupied_count(), 0);
        assert!(mode.tick().spawned);
    }

    #[test]
    fn test_same_seed_same_game() {
        let mut a = mode(ModeKind::Cylinder);
        let mut b = mode(ModeKind::Cylinder);
        let script = [
            Command::MoveLeft,
            Command::RotateCw,
            Command::MoveDown,
            Command::RotateCcw,
            Command::MoveRight,
        ];
        for command in script.iter().cycle().take(300) {
            a.process_command(*command);
            b.process_command(*command);
            assert_eq!(a.tick(), b.tick());
            assert_eq!(a.field(), b.field());
        }
    }
}
