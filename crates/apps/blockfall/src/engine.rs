//! Falling-block puzzle state machine.
//!
//! The board mutates only when a piece locks; the active piece moves through
//! the move/rotate/gravity operations below. An external scheduler drives
//! [`BlockfallGame::tick`] with elapsed wall-clock time; the engine owns the
//! drop-interval accumulator so pausing freezes gravity without touching the
//! scheduler.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

pub const COLS: usize = 12;
pub const ROWS: usize = 20;

const BASE_DROP_INTERVAL_MS: f64 = 800.0;
const DROP_INTERVAL_STEP_MS: f64 = 50.0;
const MIN_DROP_INTERVAL_MS: f64 = 100.0;
const LINES_PER_LEVEL: u32 = 10;
const LINE_CLEAR_SCORE_UNIT: u32 = 100;

/// Wall-kick offsets tried in strict priority order: in-place first, then
/// single-cell horizontal kicks, double-cell kicks for the wide I piece, and
/// finally one cell up for rotations against the floor.
const KICK_OFFSETS: [(i32, i32); 6] = [(0, 0), (-1, 0), (1, 0), (-2, 0), (2, 0), (0, -1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    pub fn base_shape(self) -> Vec<Vec<bool>> {
        let cells: &[&[u8]] = match self {
            Self::I => &[&[1, 1, 1, 1]],
            Self::O => &[&[1, 1], &[1, 1]],
            Self::T => &[&[0, 1, 0], &[1, 1, 1]],
            Self::S => &[&[0, 1, 1], &[1, 1, 0]],
            Self::Z => &[&[1, 1, 0], &[0, 1, 1]],
            Self::J => &[&[1, 0, 0], &[1, 1, 1]],
            Self::L => &[&[0, 0, 1], &[1, 1, 1]],
        };
        cells
            .iter()
            .map(|row| row.iter().map(|cell| *cell != 0).collect())
            .collect()
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::I => "#0ff",
            Self::O => "#ff0",
            Self::T => "#f0f",
            Self::S => "#0f0",
            Self::Z => "#f00",
            Self::J => "#00f",
            Self::L => "#f80",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    pub kind: PieceKind,
    pub shape: Vec<Vec<bool>>,
    /// Top-left anchor column; may sit outside the board mid-kick.
    pub x: i32,
    /// Top-left anchor row; negative while the piece is still above the board.
    pub y: i32,
}

fn spawn_piece(kind: PieceKind) -> Piece {
    let shape = kind.base_shape();
    let x = ((COLS - shape[0].len()) / 2) as i32;
    Piece {
        kind,
        shape,
        x,
        y: 0,
    }
}

fn random_kind(rng: &mut StdRng) -> PieceKind {
    *PieceKind::ALL
        .choose(rng)
        .expect("piece table is non-empty")
}

#[derive(Debug, Clone)]
pub struct BlockfallGame {
    board: Vec<Vec<Option<PieceKind>>>,
    piece: Piece,
    next: PieceKind,
    score: u32,
    level: u32,
    lines: u32,
    paused: bool,
    game_over: bool,
    drop_accumulator_ms: f64,
    drop_interval_ms: f64,
    rng: StdRng,
}

impl BlockfallGame {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Deterministic constructor for tests and replays.
    pub fn from_rng(mut rng: StdRng) -> Self {
        let current = random_kind(&mut rng);
        let next = random_kind(&mut rng);
        Self {
            board: vec![vec![None; COLS]; ROWS],
            piece: spawn_piece(current),
            next,
            score: 0,
            level: 1,
            lines: 0,
            paused: false,
            game_over: false,
            drop_accumulator_ms: 0.0,
            drop_interval_ms: BASE_DROP_INTERVAL_MS,
            rng,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn next_kind(&self) -> PieceKind {
        self.next
    }

    pub fn drop_interval_ms(&self) -> f64 {
        self.drop_interval_ms
    }

    /// Color for a board cell as rendered: the active piece overlays the
    /// merged board.
    pub fn cell_color(&self, row: usize, col: usize) -> Option<&'static str> {
        for (sy, shape_row) in self.piece.shape.iter().enumerate() {
            for (sx, filled) in shape_row.iter().enumerate() {
                if *filled
                    && self.piece.y + sy as i32 == row as i32
                    && self.piece.x + sx as i32 == col as i32
                {
                    return Some(self.piece.kind.color());
                }
            }
        }
        self.board[row][col].map(PieceKind::color)
    }

    /// Tests whether the active piece, translated by `(dx, dy)` (optionally
    /// with a hypothetical `shape`), hits a wall, the floor, or a merged
    /// cell. Rows above the visible board never collide against the board.
    pub fn collides(&self, dx: i32, dy: i32, shape: Option<&[Vec<bool>]>) -> bool {
        let shape = shape.unwrap_or(self.piece.shape.as_slice());
        for (sy, shape_row) in shape.iter().enumerate() {
            for (sx, filled) in shape_row.iter().enumerate() {
                if !*filled {
                    continue;
                }
                let nx = self.piece.x + sx as i32 + dx;
                let ny = self.piece.y + sy as i32 + dy;
                if nx < 0 || nx >= COLS as i32 {
                    return true;
                }
                if ny >= ROWS as i32 {
                    return true;
                }
                if ny >= 0 && self.board[ny as usize][nx as usize].is_some() {
                    return true;
                }
            }
        }
        false
    }

    /// Rotates the active piece 90 degrees clockwise, resolving collisions
    /// through the wall-kick table. Returns whether the rotation applied.
    pub fn rotate(&mut self) -> bool {
        if self.game_over || self.paused {
            return false;
        }
        let rows = self.piece.shape.len();
        let cols = self.piece.shape[0].len();
        let rotated: Vec<Vec<bool>> = (0..cols)
            .map(|col| (0..rows).rev().map(|row| self.piece.shape[row][col]).collect())
            .collect();

        for (kick_x, kick_y) in KICK_OFFSETS {
            if !self.collides(kick_x, kick_y, Some(&rotated)) {
                self.piece.shape = rotated;
                self.piece.x += kick_x;
                self.piece.y += kick_y;
                return true;
            }
        }
        false
    }

    pub fn move_left(&mut self) -> bool {
        if self.game_over || self.paused || self.collides(-1, 0, None) {
            return false;
        }
        self.piece.x -= 1;
        true
    }

    pub fn move_right(&mut self) -> bool {
        if self.game_over || self.paused || self.collides(1, 0, None) {
            return false;
        }
        self.piece.x += 1;
        true
    }

    /// One gravity step on player input; resets the drop timer so the next
    /// automatic step starts a full interval later.
    pub fn soft_drop(&mut self) {
        if self.game_over || self.paused {
            return;
        }
        self.gravity_step();
        self.drop_accumulator_ms = 0.0;
    }

    /// Drops the piece straight to its resting row and locks it.
    pub fn hard_drop(&mut self) {
        if self.game_over || self.paused {
            return;
        }
        while !self.collides(0, 1, None) {
            self.piece.y += 1;
        }
        self.lock_piece();
        self.drop_accumulator_ms = 0.0;
    }

    /// Advances the drop timer; performs one gravity step each time the
    /// accumulator crosses the current drop interval.
    pub fn tick(&mut self, elapsed_ms: f64) {
        if self.game_over || self.paused {
            return;
        }
        self.drop_accumulator_ms += elapsed_ms.max(0.0);
        if self.drop_accumulator_ms > self.drop_interval_ms {
            self.gravity_step();
            self.drop_accumulator_ms = 0.0;
        }
    }

    pub fn toggle_pause(&mut self) {
        if !self.game_over {
            self.paused = !self.paused;
        }
    }

    pub fn pause(&mut self) {
        if !self.game_over {
            self.paused = true;
        }
    }

    pub fn restart(&mut self) {
        self.board = vec![vec![None; COLS]; ROWS];
        self.score = 0;
        self.level = 1;
        self.lines = 0;
        self.paused = false;
        self.game_over = false;
        self.drop_accumulator_ms = 0.0;
        self.drop_interval_ms = BASE_DROP_INTERVAL_MS;
        let current = random_kind(&mut self.rng);
        self.next = random_kind(&mut self.rng);
        self.piece = spawn_piece(current);
    }

    fn gravity_step(&mut self) {
        if !self.collides(0, 1, None) {
            self.piece.y += 1;
        } else {
            self.lock_piece();
        }
    }

    /// Merges the active piece into the board, clears completed rows, and
    /// spawns the pre-generated next piece. A colliding spawn ends the game.
    fn lock_piece(&mut self) {
        for (sy, shape_row) in self.piece.shape.iter().enumerate() {
            for (sx, filled) in shape_row.iter().enumerate() {
                if !*filled {
                    continue;
                }
                let ny = self.piece.y + sy as i32;
                let nx = self.piece.x + sx as i32;
                if (0..ROWS as i32).contains(&ny) && (0..COLS as i32).contains(&nx) {
                    self.board[ny as usize][nx as usize] = Some(self.piece.kind);
                }
            }
        }

        self.clear_lines();

        let kind = self.next;
        self.next = random_kind(&mut self.rng);
        self.piece = spawn_piece(kind);
        if self.collides(0, 0, None) {
            self.game_over = true;
        }
    }

    /// Removes full rows bottom-to-top, re-examining the same index after
    /// each removal so rows shifted down are caught in the same pass.
    fn clear_lines(&mut self) -> u32 {
        let mut cleared = 0u32;
        let mut y = ROWS as i32 - 1;
        while y >= 0 {
            if self.board[y as usize].iter().all(|cell| cell.is_some()) {
                self.board.remove(y as usize);
                self.board.insert(0, vec![None; COLS]);
                cleared += 1;
            } else {
                y -= 1;
            }
        }

        if cleared > 0 {
            self.lines += cleared;
            self.score += cleared * cleared * LINE_CLEAR_SCORE_UNIT;
            self.level = self.lines / LINES_PER_LEVEL + 1;
            self.drop_interval_ms = (BASE_DROP_INTERVAL_MS
                - self.level as f64 * DROP_INTERVAL_STEP_MS)
                .max(MIN_DROP_INTERVAL_MS);
        }
        cleared
    }
}

impl Default for BlockfallGame {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn game() -> BlockfallGame {
        BlockfallGame::from_rng(StdRng::seed_from_u64(7))
    }

    fn place(game: &mut BlockfallGame, kind: PieceKind, x: i32, y: i32) {
        game.piece = Piece {
            kind,
            shape: kind.base_shape(),
            x,
            y,
        };
    }

    #[test]
    fn pieces_spawn_centered_at_the_top() {
        let mut game = game();
        game.piece = spawn_piece(PieceKind::I);
        assert_eq!((game.piece.x, game.piece.y), (4, 0));

        game.piece = spawn_piece(PieceKind::T);
        assert_eq!((game.piece.x, game.piece.y), (4, 0));

        game.piece = spawn_piece(PieceKind::O);
        assert_eq!((game.piece.x, game.piece.y), (5, 0));
    }

    #[test]
    fn collision_detects_walls_floor_and_merged_cells() {
        let mut game = game();
        place(&mut game, PieceKind::O, 0, 0);
        assert!(game.collides(-1, 0, None), "left wall");

        place(&mut game, PieceKind::O, (COLS - 2) as i32, 0);
        assert!(game.collides(1, 0, None), "right wall");

        place(&mut game, PieceKind::O, 0, (ROWS - 2) as i32);
        assert!(game.collides(0, 1, None), "floor");

        game.board[10][3] = Some(PieceKind::I);
        place(&mut game, PieceKind::O, 3, 8);
        assert!(game.collides(0, 1, None), "merged cell");
        assert!(!game.collides(0, 0, None));
    }

    #[test]
    fn cells_above_the_board_never_collide_against_it() {
        let mut game = game();
        place(&mut game, PieceKind::T, 5, -1);
        assert!(!game.collides(0, 0, None));
    }

    #[test]
    fn rotation_is_clockwise_transpose_and_reverse() {
        let mut game = game();
        place(&mut game, PieceKind::T, 5, 5);
        assert!(game.rotate());
        let expected = vec![
            vec![true, false],
            vec![true, true],
            vec![true, false],
        ];
        assert_eq!(game.piece.shape, expected);
        assert_eq!((game.piece.x, game.piece.y), (5, 5));
    }

    #[test]
    fn rotation_selects_the_first_collision_free_kick_in_order() {
        let mut game = game();
        place(&mut game, PieceKind::T, 5, 5);
        // The rotated T occupies column x..x+1: (y..y+2, x) and (y+1, x+1).
        // Block the in-place attempt and the left kick; only (+1, 0) fits.
        game.board[5][5] = Some(PieceKind::I);
        game.board[7][4] = Some(PieceKind::I);

        assert!(game.rotate());
        assert_eq!((game.piece.x, game.piece.y), (6, 5));
    }

    #[test]
    fn blocked_rotation_leaves_the_piece_unchanged() {
        let mut game = game();
        place(&mut game, PieceKind::T, 5, 5);
        let before = game.piece.clone();
        // Every kick lands a cell on an occupied neighbor.
        for col in 2..10 {
            game.board[5][col] = Some(PieceKind::I);
            game.board[6][col] = Some(PieceKind::I);
            game.board[4][col] = Some(PieceKind::I);
        }

        assert!(!game.rotate());
        assert_eq!(game.piece, before);
    }

    #[test]
    fn floor_kick_lifts_a_rotation_against_the_bottom() {
        let mut game = game();
        // A two-row T resting on the floor rotates into a three-row shape;
        // every horizontal kick still hits the floor, so (0, -1) must apply.
        place(&mut game, PieceKind::T, 5, (ROWS - 2) as i32);

        assert!(game.rotate());
        assert_eq!(game.piece.y, (ROWS - 3) as i32);
        assert_eq!(game.piece.x, 5);
        assert_eq!(game.piece.shape.len(), 3);
    }

    #[test]
    fn locking_merges_clears_and_spawns_the_pregenerated_next_piece() {
        let mut game = game();
        let expected_next = game.next_kind();
        place(&mut game, PieceKind::O, 0, (ROWS - 2) as i32);

        game.soft_drop();

        assert_eq!(game.board[ROWS - 1][0], Some(PieceKind::O));
        assert_eq!(game.board[ROWS - 1][1], Some(PieceKind::O));
        assert_eq!(game.board[ROWS - 2][0], Some(PieceKind::O));
        assert_eq!(game.piece.kind, expected_next);
        assert_eq!(game.piece.y, 0);
        assert!(!game.is_game_over());
    }

    #[test]
    fn hard_drop_locks_at_the_resting_row() {
        let mut game = game();
        place(&mut game, PieceKind::O, 4, 0);
        game.hard_drop();
        assert_eq!(game.board[ROWS - 1][4], Some(PieceKind::O));
        assert_eq!(game.board[ROWS - 2][5], Some(PieceKind::O));
    }

    #[test]
    fn clearing_a_shifted_down_row_happens_in_the_same_pass() {
        let mut game = game();
        // Two full bottom rows plus a marker above them.
        for col in 0..COLS {
            game.board[ROWS - 1][col] = Some(PieceKind::I);
            game.board[ROWS - 2][col] = Some(PieceKind::J);
        }
        game.board[ROWS - 3][0] = Some(PieceKind::L);

        let cleared = game.clear_lines();

        assert_eq!(cleared, 2);
        assert_eq!(game.lines(), 2);
        assert_eq!(game.score(), 400, "2 lines score 2*2*100");
        assert_eq!(game.level(), 1);
        assert_eq!(game.board[ROWS - 1][0], Some(PieceKind::L), "marker fell");
        assert!(game.board[ROWS - 2].iter().all(|c| c.is_none()));
    }

    #[test]
    fn single_line_scores_one_hundred() {
        let mut game = game();
        for col in 0..COLS {
            game.board[ROWS - 1][col] = Some(PieceKind::I);
        }
        assert_eq!(game.clear_lines(), 1);
        assert_eq!(game.score(), 100);
    }

    #[test]
    fn tenth_cumulative_line_raises_the_level_and_speeds_the_drop() {
        let mut game = game();
        game.lines = 9;
        for col in 0..COLS {
            game.board[ROWS - 1][col] = Some(PieceKind::I);
        }

        game.clear_lines();

        assert_eq!(game.lines(), 10);
        assert_eq!(game.level(), 2);
        assert_eq!(game.drop_interval_ms(), 700.0);
    }

    #[test]
    fn drop_interval_never_goes_below_the_floor() {
        let mut game = game();
        game.lines = 200;
        for col in 0..COLS {
            game.board[ROWS - 1][col] = Some(PieceKind::I);
        }

        game.clear_lines();

        assert_eq!(game.level(), 21);
        assert_eq!(game.drop_interval_ms(), MIN_DROP_INTERVAL_MS);
    }

    #[test]
    fn tick_descends_only_after_the_interval_accumulates() {
        let mut game = game();
        place(&mut game, PieceKind::T, 4, 2);

        game.tick(500.0);
        assert_eq!(game.piece.y, 2);

        game.tick(301.0);
        assert_eq!(game.piece.y, 3, "accumulator crossed 800ms");

        game.tick(799.0);
        assert_eq!(game.piece.y, 3, "accumulator was reset");
    }

    #[test]
    fn pause_freezes_gravity_and_input_but_not_state_reads() {
        let mut game = game();
        place(&mut game, PieceKind::T, 4, 2);
        game.toggle_pause();

        game.tick(10_000.0);
        assert!(!game.move_left());
        assert!(!game.rotate());
        game.soft_drop();
        assert_eq!(game.piece.y, 2);
        assert_eq!(game.piece.x, 4);

        game.toggle_pause();
        game.tick(801.0);
        assert_eq!(game.piece.y, 3);
    }

    #[test]
    fn blocked_spawn_after_lock_ends_the_game() {
        let mut game = game();
        // Near-full top rows (one gap keeps them from clearing) block the
        // spawn cell of every piece kind.
        for col in 1..COLS {
            game.board[0][col] = Some(PieceKind::I);
            game.board[1][col] = Some(PieceKind::I);
        }
        place(&mut game, PieceKind::I, 0, (ROWS - 1) as i32);

        game.soft_drop();

        assert!(game.is_game_over());
        // Game over freezes everything except restart.
        let y = game.piece.y;
        game.soft_drop();
        game.hard_drop();
        assert!(!game.move_right());
        assert_eq!(game.piece.y, y);

        game.restart();
        assert!(!game.is_game_over());
        assert_eq!(game.score(), 0);
        assert_eq!(game.level(), 1);
        assert!(game.board.iter().flatten().all(|c| c.is_none()));
    }
}
