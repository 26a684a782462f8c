//! Two-phase retrograde solver and the query interface over its table.

use std::collections::VecDeque;
use std::io;
use std::path::Path;
use std::time::Instant;

use log::{info, warn};

use gobblers_core::{Board, Move, Rules, DRAW, LOSS, WIN};

use crate::cache;
use crate::packed::{pack, unpack_moves, unpack_value};
use crate::stats::SolverStats;
use crate::table::{StateTable, DEFAULT_EXP, EMPTY};

/// A solved rule variant: every reachable canonical position together with
/// its game-theoretic value and distance, held in one flat table.
///
/// After construction the table is read-only; queries are lookups plus
/// local move generation.
pub struct Solver {
    rules: Rules,
    table: StateTable,
    stats: SolverStats,
}

impl Solver {
    /// Create an unsolved solver backed by a fresh table of `2^exp` slots.
    pub fn new(rules: Rules, exp: u32) -> Solver {
        Solver {
            rules,
            table: StateTable::new(exp),
            stats: SolverStats::default(),
        }
    }

    /// Construct or load the solution for `rules`, with the default table
    /// size and the cache file in the current directory.
    pub fn init(rules: Rules) -> Solver {
        Self::init_at(rules, DEFAULT_EXP, Path::new("."))
    }

    /// Construct or load the solution, keeping the cache file under
    /// `cache_dir`.
    ///
    /// A missing or malformed cache is not an error: the variant is solved
    /// from scratch and a fresh cache written. A failed write is logged
    /// and otherwise ignored.
    pub fn init_at(rules: Rules, exp: u32, cache_dir: &Path) -> Solver {
        let path = cache_dir.join(cache::filename(rules));
        match cache::load(&path, exp) {
            Ok(table) => {
                info!("loaded {} states from {}", table.len(), path.display());
                return Solver {
                    rules,
                    table,
                    stats: SolverStats::default(),
                };
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => warn!("ignoring cache {}: {}", path.display(), err),
        }

        let mut solver = Solver::new(rules, exp);
        solver.solve();
        if let Err(err) = cache::save(&path, &solver.table) {
            warn!("could not write cache {}: {}", path.display(), err);
        }
        solver
    }

    /// Solve the game: forward reachability search, then backward value
    /// propagation. Expects the fresh table of [`Solver::new`].
    pub fn solve(&mut self) {
        let solved = self.search();
        self.propagate(solved);
        info!("{}", self.stats.summary());
    }

    /// Phase 1: breadth-first search of every canonical state reachable
    /// from the initial position.
    ///
    /// Terminal states are stored as win or loss in 0 moves and returned
    /// as the seed queue for phase 2; every other state is stored as a
    /// tentative draw carrying its symmetry-deduped move count.
    fn search(&mut self) -> VecDeque<u64> {
        let started = Instant::now();
        let mut solved = VecDeque::new();
        let mut queue = VecDeque::new();

        let initial = Board::new().0;
        let slot = self.table.slot_of(initial);
        self.table.store(slot, initial);
        queue.push_back(initial);

        while let Some(current) = queue.pop_front() {
            self.stats.reachable_states += 1;
            let slot = self.table.slot_of(current);
            let value = Board(current).terminal_value();
            if value != DRAW {
                self.table.store(slot, current | pack(value, 0));
                solved.push_back(current);
                self.stats.terminal_states += 1;
                continue;
            }
            let moves = self.rules.moves(Board(current));
            self.table
                .store(slot, current | pack(DRAW, moves.len() as u64));
            for mov in moves {
                let next = Board(current).apply(mov).swapped().canonical().0;
                // Looking the successor up before queueing trades a probe
                // for the memory duplicate queue entries would cost.
                let next_slot = self.table.slot_of(next);
                if self.table.word(next_slot) == EMPTY {
                    self.table.store(next_slot, next);
                    queue.push_back(next);
                }
            }
        }

        self.stats.search_time = started.elapsed();
        info!(
            "searched {} states in {:.2}s",
            self.stats.reachable_states,
            self.stats.search_time.as_secs_f64()
        );
        solved
    }

    /// Phase 2: backward breadth-first propagation from the solved queue.
    ///
    /// A predecessor of a lost state wins by moving into it; the first
    /// time that happens fixes its (minimal) distance, since the queue is
    /// processed in order of increasing depth. A predecessor all of whose
    /// moves reach won states is lost, detected when its remaining-move
    /// counter hits zero; the successor that zeroes it is the deepest, so
    /// the loss distance is maximal. States never solved here stay draws.
    fn propagate(&mut self, mut solved: VecDeque<u64>) {
        let started = Instant::now();

        while let Some(current) = solved.pop_front() {
            let word = self.table.get(current);
            let depth = unpack_moves(word);
            let mover_wins = unpack_value(word) == WIN;
            for prev in self.rules.unmoves(Board(current)) {
                let slot = self.table.slot_of(prev.0);
                let prev_word = self.table.word(slot);
                if unpack_value(prev_word) != DRAW {
                    // Already solved, or not reachable at all.
                    continue;
                }
                if mover_wins {
                    // The move into `current` hands the opponent a win;
                    // burn one of the predecessor's remaining moves.
                    let remaining = unpack_moves(prev_word) - 1;
                    if remaining != 0 {
                        self.table.store(slot, prev.0 | pack(DRAW, remaining));
                    } else {
                        self.table.store(slot, prev.0 | pack(LOSS, depth + 1));
                        solved.push_back(prev.0);
                        self.stats.solved_states += 1;
                    }
                } else {
                    // `current` is lost for its mover, so moving into it
                    // wins for the predecessor.
                    self.table.store(slot, prev.0 | pack(WIN, depth + 1));
                    solved.push_back(prev.0);
                    self.stats.solved_states += 1;
                }
            }
        }

        self.stats.propagate_time = started.elapsed();
        info!(
            "propagated {} win/loss states in {:.2}s",
            self.stats.solved_states,
            self.stats.propagate_time.as_secs_f64()
        );
    }

    // ========== Queries ==========

    /// The stored word for a position. The board is canonicalized first;
    /// it is already in to-move frame, so no swap is involved.
    pub fn lookup(&self, board: Board) -> u64 {
        self.table.get(board.canonical().0)
    }

    /// Game value and distance for the side to move.
    ///
    /// [`WIN`]/[`LOSS`] come with the number of moves to the forced result
    /// under optimal play. [`DRAW`] carries the residual unresolved-move
    /// count, which is not a forced result; 0 there means the game is over
    /// drawn. A position missing from the table decodes to
    /// [`crate::packed::UNSOLVED`].
    pub fn value_and_depth(&self, board: Board) -> (i8, u64) {
        let word = self.lookup(board);
        (unpack_value(word), unpack_moves(word))
    }

    /// The optimal move: the one whose stored successor word is maximum.
    ///
    /// The packed encoding orders successor words from fastest forced win
    /// down to fastest forced loss (see [`crate::packed`]), so one
    /// unsigned comparison per move suffices. Ties break toward the move
    /// enumerated first, which keeps the choice deterministic. Returns
    /// None when the position has no moves.
    pub fn best_move(&self, board: Board) -> Option<Move> {
        let mut best = None;
        let mut best_word = 0;
        for mov in self.rules.moves(board) {
            let word = self.table.get(board.apply(mov).swapped().canonical().0);
            if word > best_word {
                best_word = word;
                best = Some(mov);
            }
        }
        best
    }

    /// Legal moves for the side to move, deduplicated up to symmetry.
    pub fn legal_moves(&self, board: Board) -> Vec<Move> {
        self.rules.moves(board)
    }

    /// Terminal value of a position, computed without consulting the table.
    pub fn terminal_value(&self, board: Board) -> i8 {
        board.terminal_value()
    }

    /// The rule triple this solver was built for.
    pub fn rules(&self) -> Rules {
        self.rules
    }

    /// The underlying state table.
    pub fn table(&self) -> &StateTable {
        &self.table
    }

    /// Statistics from the solve run (zeroed when loaded from cache).
    pub fn stats(&self) -> &SolverStats {
        &self.stats
    }
}
