//! Interactive front-end: prompts for a rule variant, solves or loads it,
//! then plays the game against the solved table.

use std::io::{self, BufRead, Write};

use gobblers_core::{Board, Move, Owner, Pos, Rules, DRAW, WIN};
use gobblers_solver::Solver;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let stdin = io::stdin();
    let mut input = stdin.lock();

    let Some(rules) = prompt_rules(&mut input) else {
        return;
    };
    let solver = Solver::init(rules);
    play(&solver, &mut input);
}

/// Keep prompting until an admissible rule triple is entered. Returns None
/// at end of input.
fn prompt_rules(input: &mut impl BufRead) -> Option<Rules> {
    loop {
        let fields = prompt(input, "Enter rules (num_sizes num_per_size allow_move): ")?;
        let &[num_sizes, num_per_size, allow_move] = &fields[..] else {
            println!("Rule variant not supported.");
            continue;
        };
        let triple = (u8::try_from(num_sizes), u8::try_from(num_per_size));
        if let (Ok(num_sizes), Ok(num_per_size)) = triple {
            if let Ok(rules) = Rules::new(num_sizes, num_per_size, allow_move != 0) {
                return Some(rules);
            }
        }
        println!("Rule variant not supported.");
    }
}

enum Action {
    Play(Move),
    Rewind,
}

/// Game loop over a move history, with best-move hints and rewind.
fn play(solver: &Solver, input: &mut impl BufRead) {
    let mut history = vec![Board::new()];
    let mut turn = 1;
    loop {
        let board = *history.last().expect("history never empties");
        // Render from player 1's perspective, so X is always player 1.
        let shown = if turn == 1 { board } else { board.swapped() };
        println!("{}", render(shown));

        let (value, depth) = solver.value_and_depth(board);
        if depth == 0 {
            // Terminal win/loss, or a full board with nothing to play.
            if value == DRAW {
                println!("Game ends in a draw.");
            } else {
                let winner = if value == WIN { turn } else { 3 - turn };
                println!("Player {winner} wins.");
            }
            return;
        }

        let Some(action) = prompt_action(solver, board, turn, value, depth, input) else {
            return;
        };
        match action {
            Action::Rewind => {
                if history.len() > 1 {
                    history.pop();
                    turn = 3 - turn;
                }
            }
            Action::Play(mov) => {
                history.push(board.apply(mov).swapped());
                turn = 3 - turn;
            }
        }
    }
}

/// Prompt until the player enters a legal move or asks to rewind. `(0 0)`
/// restates the position's value and the oracle's move. Returns None at
/// end of input.
fn prompt_action(
    solver: &Solver,
    board: Board,
    turn: i32,
    value: i8,
    depth: u64,
    input: &mut impl BufRead,
) -> Option<Action> {
    loop {
        let fields = prompt(
            input,
            &format!(
                "Player {turn}, enter move (-size | start, end), \
                 (0 0) for best move, or (-1 -1) to undo: "
            ),
        )?;
        let &[start, end] = &fields[..] else {
            println!("Enter two numbers.");
            continue;
        };
        if (start, end) == (-1, -1) {
            return Some(Action::Rewind);
        }
        if (start, end) == (0, 0) {
            match value {
                WIN => print!("Win in {depth} moves"),
                DRAW => print!("Draw"),
                _ => print!("Lose in {depth} moves"),
            }
            match solver.best_move(board) {
                Some(best) => {
                    let (s, e) = best.to_pair();
                    println!(" with ({s}, {e}).");
                }
                None => println!(" with no move available."),
            }
            continue;
        }
        match Move::from_pair(start, end) {
            Some(mov) if is_legal(solver.rules(), board, mov) => return Some(Action::Play(mov)),
            _ => println!("Illegal move."),
        }
    }
}

/// Validate a move against the position. This does not collapse symmetric
/// duplicates, so any legal entry is accepted even where the oracle's move
/// list would merge it with an equivalent one.
fn is_legal(rules: Rules, board: Board, mov: Move) -> bool {
    match mov {
        Move::Place { size, to } => {
            (size as u8) < rules.num_sizes()
                && board.placed(Owner::Mover)[size as usize] < rules.num_per_size()
                && board.can_place(size, to)
        }
        Move::Slide { from, to } => {
            rules.allow_move()
                && matches!(board.top(from),
                    Some((Owner::Mover, size)) if board.can_place(size, to))
        }
    }
}

/// Print a prompt and read one line, parsing whitespace-separated integers
/// and skipping anything unparseable. Returns None at end of input.
fn prompt(input: &mut impl BufRead, text: &str) -> Option<Vec<i32>> {
    print!("{text}");
    io::stdout().flush().ok();
    let mut line = String::new();
    if input.read_line(&mut line).ok()? == 0 {
        return None;
    }
    Some(
        line.split_whitespace()
            .filter_map(|token| token.parse().ok())
            .collect(),
    )
}

/// Draw the visible board: X for player 1, O for player 2, with the top
/// piece's size as a digit and square indices under each cell.
fn render(board: Board) -> String {
    let mut out = String::new();
    for row in 0..3u8 {
        out.push_str("      |      |\n");
        for col in 0..3u8 {
            let (mark, digit) = match board.top(Pos(3 * row + col)) {
                Some((Owner::Mover, size)) => ('X', char::from(b'1' + size as u8)),
                Some((Owner::Opponent, size)) => ('O', char::from(b'1' + size as u8)),
                None => (' ', ' '),
            };
            out.push_str(&format!("  {mark}{digit}"));
            if col < 2 {
                out.push_str("  |");
            }
        }
        out.push('\n');
        for col in 0..3u8 {
            out.push_str(&format!("     {}", 3 * row + col));
            if col < 2 {
                out.push('|');
            }
        }
        out.push('\n');
        if row < 2 {
            out.push_str("------|------|------\n");
        }
    }
    out
}
