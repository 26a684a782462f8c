//! The solved-value encoding in the upper 10 bits of a state word.
//!
//! ```text
//! 01########  win for the side to move in # moves
//! 10########  draw, # holding -(m+1) where m counts unresolved moves
//! 11########  loss in # moves, # holding -(#+1) in two's complement
//! ```
//!
//! The bit patterns are chosen so that unsigned comparison of whole words
//! ranks successors for the player choosing between them: a successor lost
//! by its own mover (our win) compares above a draw, which compares above
//! a successor won by its mover (our loss); within wins the fastest comes
//! first, within losses the slowest. [`crate::solver::Solver::best_move`]
//! is a plain maximum over successor words because of this.

use gobblers_core::{LOSS, WIN};

/// Value decoded from a word carrying no solution (key-only entries and
/// the empty-slot sentinel both yield this).
pub const UNSOLVED: i8 = 2;

/// Pack a win/loss/draw value and its move count into the upper 10 bits.
///
/// For [`WIN`] and [`LOSS`], `moves` is the distance to the forced result;
/// for [`gobblers_core::DRAW`] it is the number of not-yet-resolved
/// outgoing moves. The count field is 8 bits read back through sign
/// extension, so `moves` must stay below 128; move counts and distances in
/// the admitted rule sets do.
pub fn pack(value: i8, moves: u64) -> u64 {
    let sign = if value == LOSS { 0 } else { 1u64 << 62 };
    let field = if value == WIN {
        moves
    } else {
        (moves + 1).wrapping_neg()
    };
    sign ^ (field << 54)
}

/// Decode a word's value: +1 win, 0 draw, -1 loss, [`UNSOLVED`] otherwise.
#[inline]
pub fn unpack_value(word: u64) -> i8 {
    2 - (word >> 62) as i8
}

/// Decode a word's move count: the distance for win/loss words, the
/// residual unresolved-move count for draws.
#[inline]
pub fn unpack_moves(word: u64) -> u64 {
    // Drop the two value bits, then sign-extend the 8-bit count field.
    let moves = ((word << 2) as i64) >> 56;
    if moves < 0 {
        (-moves - 1) as u64
    } else {
        moves as u64
    }
}
