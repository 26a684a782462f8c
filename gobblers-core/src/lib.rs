//! Bit-packed positions and rules for the Gobblet Gobblers family of 3x3
//! nesting-piece games, in the form consumed by the retrograde solver.
//!
//! # Board Encoding (54 bits)
//!
//! ```text
//! Bits 0-53: Board state (9 squares x 6 bits per square)
//! Bits 54-63: Zero here; the solver packs the solved value on top.
//!
//! Each square (6 bits) is indexed by SIZE, not stack position:
//!   Bits 0-1: Small piece   (00=absent, 01=side to move, 10=opponent)
//!   Bits 2-3: Medium piece
//!   Bits 4-5: Large piece
//!
//! Square indices (row-major order):
//!   (0,0)=0  (0,1)=1  (0,2)=2
//!   (1,0)=3  (1,1)=4  (1,2)=5
//!   (2,0)=6  (2,1)=7  (2,2)=8
//! ```
//!
//! Ownership is relative to the side to move, never absolute: `01` always
//! means "mine" and `10` "theirs". Advancing a position therefore means
//! applying a move and then [`Board::swapped`], which exchanges every `01`
//! and `10` field so the resulting word is again from the mover's point of
//! view. Together with [`Board::canonical`], which reduces a word to the
//! minimum over its eight dihedral symmetries, this cuts the state space by
//! roughly 16x.
//!
//! The field value `11` is never produced by legal play; the solver's hash
//! table uses `0x3` (both bits of square 0's small field) as its empty-slot
//! sentinel.

use std::collections::{BTreeSet, HashSet};

use thiserror::Error;

/// Game value for the side to move: it has a visible three-in-a-row.
pub const WIN: i8 = 1;
/// Game value when neither player can force a result.
pub const DRAW: i8 = 0;
/// Game value for the side to move: the opponent has a visible line.
pub const LOSS: i8 = -1;

/// Owner of a piece, relative to the side to move.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[repr(u8)]
pub enum Owner {
    /// The player whose turn it is (`01` field value).
    Mover = 1,
    /// The waiting player (`10` field value).
    Opponent = 2,
}

impl Owner {
    /// Convert a 2-bit field value to an owner.
    #[inline]
    pub fn from_bits(bits: u8) -> Option<Owner> {
        match bits {
            1 => Some(Owner::Mover),
            2 => Some(Owner::Opponent),
            _ => None,
        }
    }
}

/// Piece size.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Size {
    Small = 0,
    Medium = 1,
    Large = 2,
}

impl Size {
    /// Convert from index (0, 1, 2) to Size.
    #[inline]
    pub fn from_index(idx: usize) -> Option<Size> {
        match idx {
            0 => Some(Size::Small),
            1 => Some(Size::Medium),
            2 => Some(Size::Large),
            _ => None,
        }
    }

    /// All sizes, smallest first.
    pub fn all() -> impl Iterator<Item = Size> {
        [Size::Small, Size::Medium, Size::Large].into_iter()
    }
}

/// Position on the 3x3 board (0-8, row-major).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct Pos(pub u8);

impl Pos {
    /// Iterate over all 9 positions.
    pub fn all() -> impl Iterator<Item = Pos> {
        (0..9).map(Pos)
    }
}

/// A move by the side to move.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Move {
    /// Place a fresh piece from the off-board pool.
    Place { size: Size, to: Pos },
    /// Relocate the top piece of `from` to `to`.
    Slide { from: Pos, to: Pos },
}

impl Move {
    /// Decode the interactive `(start, end)` convention: `start` in 0-8
    /// relocates the top piece of that square, `start` in -3..=-1 places a
    /// fresh piece of size `-start`.
    pub fn from_pair(start: i32, end: i32) -> Option<Move> {
        if !(0..9).contains(&end) {
            return None;
        }
        let to = Pos(end as u8);
        match start {
            0..=8 => Some(Move::Slide {
                from: Pos(start as u8),
                to,
            }),
            -3..=-1 => Size::from_index((-start - 1) as usize).map(|size| Move::Place { size, to }),
            _ => None,
        }
    }

    /// Encode as the interactive `(start, end)` pair.
    pub fn to_pair(self) -> (i32, i32) {
        match self {
            Move::Place { size, to } => (-(size as i32) - 1, to.0 as i32),
            Move::Slide { from, to } => (from.0 as i32, to.0 as i32),
        }
    }
}

/// Compact board state - fits in a single u64.
///
/// See the crate documentation for the encoding. The word is always read
/// from the perspective of the side to move; every board stored by the
/// solver is additionally canonical under [`Board::canonical`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Board(pub u64);

impl Board {
    /// Bits per square (3 sizes x 2 bits each).
    const CELL_BITS: u32 = 6;
    /// Mask for a single square (0b111111).
    const CELL_MASK: u64 = 0x3f;

    /// Mask of every `10` (opponent) bit across the 27 fields.
    const OPPONENT_BITS: u64 = 0x2aaaaaaaaaaaaa;
    /// Mask of every `01` (mover) bit across the 27 fields.
    const MOVER_BITS: u64 = 0x15555555555555;

    /// The 8 winning lines: 3 rows, 3 columns, 2 diagonals.
    const LINES: [[Pos; 3]; 8] = [
        [Pos(0), Pos(1), Pos(2)],
        [Pos(3), Pos(4), Pos(5)],
        [Pos(6), Pos(7), Pos(8)],
        [Pos(0), Pos(3), Pos(6)],
        [Pos(1), Pos(4), Pos(7)],
        [Pos(2), Pos(5), Pos(8)],
        [Pos(0), Pos(4), Pos(8)],
        [Pos(2), Pos(4), Pos(6)],
    ];

    /// The initial position: an empty board.
    #[inline]
    pub fn new() -> Board {
        Board(0)
    }

    /// Get the 6 bits for the square at the given position.
    #[inline]
    pub fn cell(&self, pos: Pos) -> u64 {
        (self.0 >> (pos.0 as u32 * Self::CELL_BITS)) & Self::CELL_MASK
    }

    /// Return a copy of this board with one piece field set.
    ///
    /// This is a raw constructor for building positions directly; it does
    /// not check reachability.
    pub fn with_piece(self, pos: Pos, owner: Owner, size: Size) -> Board {
        let shift = pos.0 as u32 * Self::CELL_BITS + 2 * size as u32;
        Board((self.0 & !(0x3 << shift)) | ((owner as u64) << shift))
    }

    /// Get the top (visible) piece at a position, scanning the size fields
    /// from smallest upward. Returns None if the square is empty.
    pub fn top(&self, pos: Pos) -> Option<(Owner, Size)> {
        let mut pieces = self.cell(pos);
        if pieces == 0 {
            return None;
        }
        let mut idx = 0;
        while pieces > 0x3 {
            idx += 1;
            pieces >>= 2;
        }
        Some((Owner::from_bits(pieces as u8)?, Size::from_index(idx)?))
    }

    /// Check whether a piece of the given size may land on this square:
    /// every piece already present must be strictly smaller.
    #[inline]
    pub fn can_place(&self, size: Size, pos: Pos) -> bool {
        (1u64 << (2 * size as u32)) > self.cell(pos)
    }

    /// Count pieces of each size on the board for one owner, including
    /// covered pieces. Returns `[small, medium, large]`.
    pub fn placed(&self, owner: Owner) -> [u8; 3] {
        let mut counts = [0u8; 3];
        for pos in Pos::all() {
            let mut cell = self.cell(pos);
            let mut idx = 0;
            while cell != 0 {
                if cell & 0x3 == owner as u64 {
                    counts[idx] += 1;
                }
                idx += 1;
                cell >>= 2;
            }
        }
        counts
    }

    /// Apply a move for the side to move, returning the successor in the
    /// same frame (no swap). Moves toggle single bits: placing onto one's
    /// own piece of the same size removes it, which is how unmoves take a
    /// piece back into the pool.
    pub fn apply(self, mov: Move) -> Board {
        match mov {
            Move::Place { size, to } => {
                Board(self.0 ^ (1u64 << (to.0 as u32 * Self::CELL_BITS + 2 * size as u32)))
            }
            Move::Slide { from, to } => {
                let (_, size) = self.top(from).expect("no piece on source square");
                let lift = 1u64 << (from.0 as u32 * Self::CELL_BITS + 2 * size as u32);
                let drop = 1u64 << (to.0 as u32 * Self::CELL_BITS + 2 * size as u32);
                Board(self.0 ^ lift ^ drop)
            }
        }
    }

    /// Return value for the side to move if the game is over, otherwise
    /// [`DRAW`].
    ///
    /// The mover's lines are checked first: uncovering your own completed
    /// line wins immediately, even if the same move also completed a line
    /// for the opponent.
    pub fn terminal_value(&self) -> i8 {
        let mut value = DRAW;
        for line in &Self::LINES {
            let mut line_owner = 0u64;
            for &pos in line {
                let mut pieces = self.cell(pos);
                while pieces > 0x3 {
                    pieces >>= 2;
                }
                if pieces == 0 || (line_owner != 0 && pieces != line_owner) {
                    line_owner = 0;
                    break;
                }
                line_owner = pieces;
            }
            if line_owner == Owner::Mover as u64 {
                return WIN;
            }
            if line_owner == Owner::Opponent as u64 {
                value = LOSS;
            }
        }
        value
    }

    // ========== Symmetry ==========

    /// Exchange the two players across all 27 fields, so the word is read
    /// from the other side's point of view.
    #[inline]
    pub fn swapped(self) -> Board {
        Board(((self.0 & Self::OPPONENT_BITS) >> 1) | ((self.0 & Self::MOVER_BITS) << 1))
    }

    /// Mirror the board vertically, exchanging the top and bottom rows.
    #[inline]
    pub fn flip_ud(self) -> Board {
        Board(((self.0 << 36) & 0x3ffff000000000) | (self.0 & 0xffffc0000) | (self.0 >> 36))
    }

    /// Mirror the board about the anti-diagonal.
    #[inline]
    pub fn antitranspose(self) -> Board {
        Board(
            ((self.0 << 48) & 0x3f000000000000)
                | ((self.0 << 24) & 0xfc0fc0000000)
                | (self.0 & 0x3f03f03f000)
                | ((self.0 >> 24) & 0xfc0fc0)
                | (self.0 >> 48),
        )
    }

    /// All 8 dihedral images of this board, visited by alternating the two
    /// generating reflections.
    pub fn orbit(self) -> [Board; 8] {
        let mut orbit = [self; 8];
        let mut s = self;
        for (i, slot) in orbit.iter_mut().enumerate().skip(1) {
            s = if i % 2 == 1 {
                s.flip_ud()
            } else {
                s.antitranspose()
            };
            *slot = s;
        }
        orbit
    }

    /// Reduce to the canonical representative: the minimum word over the
    /// 8-element dihedral orbit.
    pub fn canonical(self) -> Board {
        let mut s = self;
        let mut min = s;
        for i in 0..7 {
            s = if i % 2 == 0 {
                s.flip_ud()
            } else {
                s.antitranspose()
            };
            if s.0 < min.0 {
                min = s;
            }
        }
        min
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

// ========== Rules ==========

/// Requested rule triple lies outside the encodable range.
///
/// The 2-bit-per-size square encoding admits at most two pieces of each
/// size per player when all three sizes are in play.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported rule variant: num_sizes={num_sizes}, num_per_size={num_per_size}")]
pub struct RulesError {
    pub num_sizes: u8,
    pub num_per_size: u8,
}

/// A rule variant: how many piece sizes exist, how many pieces of each size
/// each player owns, and whether pieces already on the board may be moved.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Rules {
    num_sizes: u8,
    num_per_size: u8,
    allow_move: bool,
}

impl Rules {
    /// Validate and construct a rule triple.
    ///
    /// Admitted: `num_sizes` in 1..=3 and `num_per_size` in 1..=9, tightened
    /// to 1..=2 when all three sizes are in play.
    pub fn new(num_sizes: u8, num_per_size: u8, allow_move: bool) -> Result<Rules, RulesError> {
        let per_size_cap = if num_sizes < 3 { 9 } else { 2 };
        if !(1..=3).contains(&num_sizes) || !(1..=per_size_cap).contains(&num_per_size) {
            return Err(RulesError {
                num_sizes,
                num_per_size,
            });
        }
        Ok(Rules {
            num_sizes,
            num_per_size,
            allow_move,
        })
    }

    #[inline]
    pub fn num_sizes(&self) -> u8 {
        self.num_sizes
    }

    #[inline]
    pub fn num_per_size(&self) -> u8 {
        self.num_per_size
    }

    #[inline]
    pub fn allow_move(&self) -> bool {
        self.allow_move
    }

    /// The sizes in play under this variant, smallest first.
    pub fn sizes(&self) -> impl Iterator<Item = Size> {
        Size::all().take(self.num_sizes as usize)
    }

    /// Legal moves for the side to move, ignoring whether the position is
    /// already terminal.
    ///
    /// Moves whose successors coincide up to symmetry are collapsed to one
    /// representative, so the listed moves' canonical-swapped successors
    /// are pairwise distinct. Relocations are emitted before placements,
    /// both in square order; the emission order feeds the search queue and
    /// is part of the cache determinism contract.
    pub fn moves(&self, board: Board) -> Vec<Move> {
        let mut moves = Vec::new();
        let mut seen = HashSet::new();

        if self.allow_move {
            for from in Pos::all() {
                let Some((Owner::Mover, size)) = board.top(from) else {
                    continue;
                };
                for to in Pos::all() {
                    // The source square itself fails the strictly-smaller
                    // test against the piece being lifted.
                    if board.can_place(size, to) {
                        let mov = Move::Slide { from, to };
                        if seen.insert(board.apply(mov).swapped().canonical()) {
                            moves.push(mov);
                        }
                    }
                }
            }
        }

        let placed = board.placed(Owner::Mover);
        for size in self.sizes() {
            if placed[size as usize] < self.num_per_size {
                for to in Pos::all() {
                    if board.can_place(size, to) {
                        let mov = Move::Place { size, to };
                        if seen.insert(board.apply(mov).swapped().canonical()) {
                            moves.push(mov);
                        }
                    }
                }
            }
        }

        moves
    }

    /// Canonical positions from which the other side could have reached
    /// `board` in one move.
    ///
    /// Predecessors that are themselves terminal are rejected: a finished
    /// game has no successors to come back from. The result is sorted,
    /// which keeps backward propagation deterministic.
    pub fn unmoves(&self, board: Board) -> BTreeSet<Board> {
        let mut unmoves = BTreeSet::new();
        // Work in the frame of the player who just moved.
        let s = board.swapped();
        for end in Pos::all() {
            let Some((Owner::Mover, size)) = s.top(end) else {
                continue;
            };
            if self.allow_move {
                // Lift the piece back onto any square it could have come
                // from.
                for start in Pos::all() {
                    if s.can_place(size, start) {
                        let prev = s.apply(Move::Slide {
                            from: end,
                            to: start,
                        });
                        if prev.terminal_value() == DRAW {
                            unmoves.insert(prev.canonical());
                        }
                    }
                }
            }
            // Take the piece back into the pool; placing onto one's own
            // piece of the same size cancels it under the XOR move rule.
            let prev = s.apply(Move::Place { size, to: end });
            if prev.terminal_value() == DRAW {
                unmoves.insert(prev.canonical());
            }
        }
        unmoves
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    /// Position mapping for each of the 8 dihedral transformations, as
    /// new_pos -> old_pos tables. Used to cross-check the mask-and-shift
    /// implementations.
    const TRANSFORMS: [[u8; 9]; 8] = [
        [0, 1, 2, 3, 4, 5, 6, 7, 8], // identity
        [6, 3, 0, 7, 4, 1, 8, 5, 2], // rotate 90 clockwise
        [8, 7, 6, 5, 4, 3, 2, 1, 0], // rotate 180
        [2, 5, 8, 1, 4, 7, 0, 3, 6], // rotate 270 clockwise
        [2, 1, 0, 5, 4, 3, 8, 7, 6], // reflect left-right
        [6, 7, 8, 3, 4, 5, 0, 1, 2], // reflect top-bottom
        [0, 3, 6, 1, 4, 7, 2, 5, 8], // reflect main diagonal
        [8, 5, 2, 7, 4, 1, 6, 3, 0], // reflect anti-diagonal
    ];

    fn remap(board: Board, mapping: &[u8; 9]) -> Board {
        let mut result = 0u64;
        for (new_pos, &old_pos) in mapping.iter().enumerate() {
            result |= board.cell(Pos(old_pos)) << (new_pos as u32 * 6);
        }
        Board(result)
    }

    fn random_position(rules: &Rules, rng: &mut impl rand::Rng, max_plies: usize) -> Board {
        let mut board = Board::new();
        for _ in 0..max_plies {
            if board.terminal_value() != DRAW {
                break;
            }
            let moves = rules.moves(board);
            if moves.is_empty() {
                break;
            }
            let mov = moves[rng.random_range(0..moves.len())];
            board = board.apply(mov).swapped().canonical();
        }
        board
    }

    #[test]
    fn test_empty_board() {
        let board = Board::new();
        for pos in Pos::all() {
            assert_eq!(board.cell(pos), 0);
            assert_eq!(board.top(pos), None);
        }
        assert_eq!(board.terminal_value(), DRAW);
        assert_eq!(board.canonical(), board);
    }

    #[test]
    fn test_top_piece_is_largest() {
        let board = Board::new()
            .with_piece(Pos(4), Owner::Mover, Size::Small)
            .with_piece(Pos(4), Owner::Opponent, Size::Medium)
            .with_piece(Pos(4), Owner::Mover, Size::Large);
        assert_eq!(board.top(Pos(4)), Some((Owner::Mover, Size::Large)));
        // Covered pieces stay physically present in the square's fields.
        assert_eq!(board.cell(Pos(4)), 0b01_10_01);
    }

    #[test]
    fn test_can_place_strictly_larger() {
        let board = Board::new().with_piece(Pos(0), Owner::Opponent, Size::Medium);
        assert!(!board.can_place(Size::Small, Pos(0)));
        assert!(!board.can_place(Size::Medium, Pos(0)));
        assert!(board.can_place(Size::Large, Pos(0)));
        assert!(board.can_place(Size::Small, Pos(1)));
    }

    #[test]
    fn test_apply_place_toggles() {
        let board = Board::new();
        let mov = Move::Place {
            size: Size::Medium,
            to: Pos(4),
        };
        let placed = board.apply(mov);
        assert_eq!(placed.top(Pos(4)), Some((Owner::Mover, Size::Medium)));
        // Placing onto one's own piece of the same size cancels it.
        assert_eq!(placed.apply(mov), board);
    }

    #[test]
    fn test_apply_slide_reveals_cover() {
        let board = Board::new()
            .with_piece(Pos(0), Owner::Opponent, Size::Small)
            .with_piece(Pos(0), Owner::Mover, Size::Large);
        let slid = board.apply(Move::Slide {
            from: Pos(0),
            to: Pos(8),
        });
        assert_eq!(slid.top(Pos(0)), Some((Owner::Opponent, Size::Small)));
        assert_eq!(slid.top(Pos(8)), Some((Owner::Mover, Size::Large)));
    }

    #[test]
    fn test_swap_involution() {
        let board = Board::new()
            .with_piece(Pos(0), Owner::Mover, Size::Small)
            .with_piece(Pos(5), Owner::Opponent, Size::Large);
        assert_eq!(board.swapped().swapped(), board);
        assert_eq!(
            board.swapped().top(Pos(0)),
            Some((Owner::Opponent, Size::Small))
        );
        assert_eq!(
            board.swapped().top(Pos(5)),
            Some((Owner::Mover, Size::Large))
        );
    }

    #[test]
    fn test_flip_ud_matches_table() {
        let board = Board::new()
            .with_piece(Pos(0), Owner::Mover, Size::Small)
            .with_piece(Pos(4), Owner::Opponent, Size::Medium)
            .with_piece(Pos(2), Owner::Mover, Size::Large);
        assert_eq!(board.flip_ud(), remap(board, &TRANSFORMS[5]));
        assert_eq!(board.flip_ud().flip_ud(), board);
    }

    #[test]
    fn test_antitranspose_matches_table() {
        let board = Board::new()
            .with_piece(Pos(0), Owner::Mover, Size::Small)
            .with_piece(Pos(3), Owner::Opponent, Size::Medium)
            .with_piece(Pos(7), Owner::Mover, Size::Large);
        assert_eq!(board.antitranspose(), remap(board, &TRANSFORMS[7]));
        assert_eq!(board.antitranspose().antitranspose(), board);
    }

    #[test]
    fn test_orbit_is_the_dihedral_group() {
        let board = Board::new()
            .with_piece(Pos(0), Owner::Mover, Size::Small)
            .with_piece(Pos(1), Owner::Opponent, Size::Medium)
            .with_piece(Pos(5), Owner::Mover, Size::Large);
        let mut from_generators: Vec<u64> = board.orbit().iter().map(|b| b.0).collect();
        let mut from_tables: Vec<u64> = TRANSFORMS.iter().map(|t| remap(board, t).0).collect();
        from_generators.sort_unstable();
        from_tables.sort_unstable();
        assert_eq!(from_generators, from_tables);
    }

    #[test]
    fn test_canonical_is_orbit_minimum() {
        let mut rng = rand::rng();
        let rules = Rules::new(3, 2, true).unwrap();
        for _ in 0..50 {
            let board = random_position(&rules, &mut rng, 6);
            let min = board.orbit().iter().map(|b| b.0).min().unwrap();
            assert_eq!(board.canonical().0, min);
            // Idempotent, and identical across the whole orbit.
            assert_eq!(board.canonical().canonical(), board.canonical());
            for image in board.orbit() {
                assert_eq!(image.canonical(), board.canonical());
            }
        }
    }

    #[test]
    fn test_corner_placements_share_canonical() {
        let canonicals: Vec<Board> = [Pos(0), Pos(2), Pos(6), Pos(8)]
            .into_iter()
            .map(|pos| {
                Board::new()
                    .with_piece(pos, Owner::Mover, Size::Small)
                    .canonical()
            })
            .collect();
        for c in &canonicals[1..] {
            assert_eq!(*c, canonicals[0]);
        }
    }

    #[test]
    fn test_terminal_all_lines() {
        for line in &Board::LINES {
            let mut mine = Board::new();
            let mut theirs = Board::new();
            for &pos in line {
                mine = mine.with_piece(pos, Owner::Mover, Size::Small);
                theirs = theirs.with_piece(pos, Owner::Opponent, Size::Small);
            }
            assert_eq!(mine.terminal_value(), WIN, "line {:?}", line);
            assert_eq!(theirs.terminal_value(), LOSS, "line {:?}", line);
        }
    }

    #[test]
    fn test_terminal_mover_line_takes_priority() {
        // Both sides have a visible line; the mover's counts first.
        let board = Board::new()
            .with_piece(Pos(0), Owner::Opponent, Size::Small)
            .with_piece(Pos(1), Owner::Opponent, Size::Small)
            .with_piece(Pos(2), Owner::Opponent, Size::Small)
            .with_piece(Pos(6), Owner::Mover, Size::Small)
            .with_piece(Pos(7), Owner::Mover, Size::Small)
            .with_piece(Pos(8), Owner::Mover, Size::Small);
        assert_eq!(board.terminal_value(), WIN);
    }

    #[test]
    fn test_terminal_covered_piece_does_not_count() {
        let board = Board::new()
            .with_piece(Pos(0), Owner::Mover, Size::Small)
            .with_piece(Pos(1), Owner::Mover, Size::Small)
            .with_piece(Pos(2), Owner::Mover, Size::Small)
            .with_piece(Pos(2), Owner::Opponent, Size::Large);
        assert_eq!(board.terminal_value(), DRAW);
    }

    #[test]
    fn test_rules_admission() {
        assert!(Rules::new(1, 5, false).is_ok());
        assert!(Rules::new(2, 9, true).is_ok());
        assert!(Rules::new(3, 2, true).is_ok());
        assert!(Rules::new(0, 1, false).is_err());
        assert!(Rules::new(4, 1, false).is_err());
        assert!(Rules::new(3, 3, true).is_err());
        assert!(Rules::new(2, 10, false).is_err());
        assert!(Rules::new(1, 0, true).is_err());
    }

    #[test]
    fn test_initial_moves_collapse_under_symmetry() {
        // Placements to the 9 squares collapse to corner/edge/center.
        let gobblers = Rules::new(3, 2, true).unwrap();
        assert_eq!(gobblers.moves(Board::new()).len(), 9);
        let tic_tac_toe = Rules::new(1, 5, false).unwrap();
        assert_eq!(tic_tac_toe.moves(Board::new()).len(), 3);
    }

    #[test]
    fn test_pool_exhaustion_stops_placements() {
        let rules = Rules::new(1, 1, false).unwrap();
        let board = Board::new().with_piece(Pos(4), Owner::Mover, Size::Small);
        assert!(rules.moves(board).is_empty());
    }

    #[test]
    fn test_relocation_requires_allow_move() {
        let board = Board::new().with_piece(Pos(4), Owner::Mover, Size::Small);
        let frozen = Rules::new(1, 1, false).unwrap();
        let mobile = Rules::new(1, 1, true).unwrap();
        assert!(frozen.moves(board).is_empty());
        assert!(!mobile.moves(board).is_empty());
        assert!(mobile
            .moves(board)
            .iter()
            .all(|m| matches!(m, Move::Slide { .. })));
    }

    #[test]
    fn test_move_pair_roundtrip() {
        let moves = [
            Move::Place {
                size: Size::Small,
                to: Pos(4),
            },
            Move::Place {
                size: Size::Large,
                to: Pos(0),
            },
            Move::Slide {
                from: Pos(0),
                to: Pos(8),
            },
        ];
        for mov in moves {
            let (start, end) = mov.to_pair();
            assert_eq!(Move::from_pair(start, end), Some(mov));
        }
        assert_eq!(Move::from_pair(-4, 0), None);
        assert_eq!(Move::from_pair(9, 0), None);
        assert_eq!(Move::from_pair(0, 9), None);
    }

    #[test]
    fn test_move_unmove_inverse_fuzz() {
        let mut rng = rand::rng();
        for rules in [
            Rules::new(3, 2, true).unwrap(),
            Rules::new(2, 2, false).unwrap(),
        ] {
            for _ in 0..50 {
                let mut board = Board::new();
                for _ in 0..8 {
                    if board.terminal_value() != DRAW {
                        break;
                    }
                    let moves = rules.moves(board);
                    if moves.is_empty() {
                        break;
                    }

                    // Successors listed for a position are pairwise
                    // distinct up to symmetry.
                    let successors: HashSet<Board> = moves
                        .iter()
                        .map(|&m| board.apply(m).swapped().canonical())
                        .collect();
                    assert_eq!(successors.len(), moves.len());

                    let mov = moves[rng.random_range(0..moves.len())];
                    let next = board.apply(mov).swapped().canonical();
                    let unmoves = rules.unmoves(next);
                    assert!(
                        unmoves.contains(&board),
                        "{:?} missing from unmoves of {:?} after {:?}",
                        board,
                        next,
                        mov
                    );
                    for prev in &unmoves {
                        assert_eq!(prev.terminal_value(), DRAW);
                        assert_eq!(*prev, prev.canonical());
                    }
                    board = next;
                }
            }
        }
    }
}
