use std::{fmt, hash::Hash, iter};

use crate::{
    GameEngine, GameState, IllegalMoveError, Player,
    player::{cell_feature, cell_symbol},
};

pub const TICTACTOE_CELLS: usize = 9;

/// Every winning line of the board: rows, columns, then both diagonals.
pub const TICTACTOE_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// A tic-tac-toe position.
///
/// Cells are indexed `0..9` in row-major order; the move identifier is the cell index.
/// Equality and hashing only consider the board and the player to move, not the move that
/// led here.
#[derive(Debug, Clone, Copy)]
pub struct TicTacToeState {
    board: [Option<Player>; TICTACTOE_CELLS],
    player: Player,
    last_move: Option<usize>,
}

impl Default for TicTacToeState {
    fn default() -> Self {
        Self::new()
    }
}

impl TicTacToeState {
    /// Empty board, first player to move.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_board([None; TICTACTOE_CELLS], Player::First)
    }

    #[must_use]
    pub const fn with_board(board: [Option<Player>; TICTACTOE_CELLS], player: Player) -> Self {
        Self {
            board,
            player,
            last_move: None,
        }
    }

    #[must_use]
    pub fn board(&self) -> &[Option<Player>; TICTACTOE_CELLS] {
        &self.board
    }

    #[must_use]
    pub fn cell(&self, index: usize) -> Option<Player> {
        self.board[index]
    }

    #[must_use]
    pub fn is_legal_move(&self, cell: usize) -> bool {
        cell < TICTACTOE_CELLS && self.board[cell].is_none()
    }

    /// Returns the position after the player to move occupies `cell`.
    ///
    /// The caller is responsible for checking [`is_legal_move`](Self::is_legal_move).
    #[must_use]
    pub fn after_move(&self, cell: usize) -> Self {
        let mut board = self.board;
        board[cell] = Some(self.player);
        Self {
            board,
            player: self.player.opponent(),
            last_move: Some(cell),
        }
    }
}

impl PartialEq for TicTacToeState {
    fn eq(&self, other: &Self) -> bool {
        self.board == other.board && self.player == other.player
    }
}

impl Eq for TicTacToeState {}

impl Hash for TicTacToeState {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.board.hash(state);
        self.player.hash(state);
    }
}

impl GameState for TicTacToeState {
    type Move = usize;

    const FEATURE_COUNT: usize = 1 + TICTACTOE_CELLS;

    fn player(&self) -> Player {
        self.player
    }

    fn last_move(&self) -> Option<usize> {
        self.last_move
    }

    fn possible_next_states(&self) -> impl Iterator<Item = Self> + '_ {
        (0..TICTACTOE_CELLS)
            .filter(move |cell| self.board[*cell].is_none())
            .map(move |cell| self.after_move(cell))
    }

    fn has_won(&self, player: Player) -> bool {
        TICTACTOE_LINES
            .iter()
            .any(|line| line.iter().all(|cell| self.board[*cell] == Some(player)))
    }

    fn is_tie(&self) -> bool {
        self.board.iter().all(Option::is_some)
            && !Player::ALL.into_iter().any(|player| self.has_won(player))
    }

    fn features(&self) -> impl Iterator<Item = f32> + '_ {
        iter::once(self.player.feature_value()).chain(self.board.iter().copied().map(cell_feature))
    }
}

impl fmt::Display for TicTacToeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, cells) in self.board.chunks(3).enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                match cell {
                    Some(_) => write!(f, " {}", cell_symbol(*cell))?,
                    None => write!(f, " {}", row * 3 + col)?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// A tic-tac-toe game in progress.
#[derive(Debug, Clone, Default)]
pub struct TicTacToe {
    state: TicTacToeState,
    turn: usize,
}

impl TicTacToe {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl GameEngine for TicTacToe {
    type State = TicTacToeState;

    fn state(&self) -> &TicTacToeState {
        &self.state
    }

    fn turn(&self) -> usize {
        self.turn
    }

    fn play(&mut self, cell: usize) -> Result<(), IllegalMoveError> {
        if self.is_over() || !self.state.is_legal_move(cell) {
            return Err(IllegalMoveError::new(self.state.player, cell));
        }
        self.state = self.state.after_move(cell);
        self.turn += 1;
        Ok(())
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::Outcome;

    use super::*;

    /// Builds a position from a 9-character layout (`X`, `O`, `.`), whitespace ignored.
    fn state_from(layout: &str, player: Player) -> TicTacToeState {
        let cells: Vec<Option<Player>> = layout
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| match c {
                'X' => Some(Player::First),
                'O' => Some(Player::Second),
                '.' => None,
                _ => panic!("invalid cell {c:?}"),
            })
            .collect();
        TicTacToeState::with_board(cells.try_into().unwrap(), player)
    }

    fn next_moves(state: &TicTacToeState) -> Vec<usize> {
        state
            .possible_next_states()
            .map(|s| s.last_move().unwrap())
            .collect()
    }

    #[test]
    fn test_possible_next_states_empty_board() {
        let state = TicTacToeState::new();
        let before = state;

        let moves = next_moves(&state);
        assert_eq!(moves, (0..9).collect::<Vec<_>>());
        let unique: HashSet<_> = moves.iter().collect();
        assert_eq!(unique.len(), 9);

        // full enumeration leaves the origin untouched
        assert_eq!(state.board(), before.board());
        assert_eq!(state.player(), before.player());
        assert!(state.board().iter().all(Option::is_none));
    }

    #[test]
    fn test_successors_do_not_alias() {
        let state = TicTacToeState::new();
        let children: Vec<_> = state.possible_next_states().collect();
        for (i, child) in children.iter().enumerate() {
            let occupied: Vec<_> = (0..9).filter(|c| child.cell(*c).is_some()).collect();
            assert_eq!(occupied, vec![i]);
            assert_eq!(child.player(), Player::Second);
            assert_eq!(child.next_player(), Player::First);
        }
    }

    #[test]
    fn test_possible_next_states_full_board() {
        let state = state_from("XXX XXX XXX", Player::First);
        assert_eq!(state.possible_next_states().count(), 0);
    }

    #[test]
    fn test_possible_next_states_with_winner() {
        let state = state_from("XXX ... ...", Player::First);
        assert_eq!(next_moves(&state), vec![3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_possible_next_states_partial() {
        let state = state_from("X.X .O. XO.", Player::First);
        assert_eq!(next_moves(&state), vec![1, 3, 5, 8]);
    }

    #[test]
    fn test_is_tie() {
        assert!(state_from("XOX OXO OXO", Player::First).is_tie());
        assert!(!state_from("XOX OXO XOX", Player::First).is_tie());
        assert!(!state_from("XO. OXO .O.", Player::First).is_tie());
        assert!(!TicTacToeState::new().is_tie());
    }

    #[test]
    fn test_has_won() {
        assert!(state_from("X.. .X. ..X", Player::First).has_won(Player::First));
        assert!(state_from("..O .O. O..", Player::First).has_won(Player::Second));
        assert!(!state_from("..O .O. O..", Player::First).has_won(Player::First));
        assert!(state_from("XXX OOX O..", Player::First).has_won(Player::First));
        assert!(state_from("OXX XXX O..", Player::First).has_won(Player::First));
        assert!(state_from("OX. XOX XXX", Player::First).has_won(Player::First));
        assert!(state_from("OX. OOX OXX", Player::First).has_won(Player::Second));
        assert!(!state_from("OXO X.X O.O", Player::First).has_won(Player::Second));
    }

    #[test]
    fn test_terminal_flags_are_exclusive() {
        // Enumerate every reachable position and check the terminal invariants.
        let mut stack = vec![TicTacToeState::new()];
        let mut seen = HashSet::new();
        while let Some(state) = stack.pop() {
            if !seen.insert(state) {
                continue;
            }
            let won0 = state.has_won(Player::First);
            let won1 = state.has_won(Player::Second);
            let tie = state.is_tie();
            assert!(!(won0 && won1), "{state}");
            assert!(!(tie && (won0 || won1)), "{state}");
            if state.board().iter().all(Option::is_some) {
                assert!(tie || won0 || won1, "{state}");
            }
            if !state.is_terminal() {
                stack.extend(state.possible_next_states());
            }
        }
        // 5478 legal positions in tic-tac-toe
        assert_eq!(seen.len(), 5478);
    }

    #[test]
    fn test_features() {
        let state = state_from("X.. .O. ...", Player::First);
        let features: Vec<f32> = state.features().collect();
        assert_eq!(features.len(), TicTacToeState::FEATURE_COUNT);
        assert_eq!(
            features,
            vec![0.0, 0.0, -1.0, -1.0, -1.0, 1.0, -1.0, -1.0, -1.0, -1.0]
        );
    }

    #[test]
    fn test_equality_ignores_last_move() {
        let a = TicTacToeState::new().after_move(0).after_move(4);
        let b = state_from("X.. .O. ...", Player::First);
        assert_eq!(a, b);
        assert_ne!(a.last_move(), b.last_move());
    }

    #[test]
    fn test_engine_rejects_illegal_moves() {
        let mut game = TicTacToe::new();
        game.play(4).unwrap();
        assert!(game.play(4).is_err());
        assert!(game.play(9).is_err());
        assert_eq!(game.turn(), 1);
        assert_eq!(game.current_player(), Player::Second);
    }

    #[test]
    fn test_engine_game_over() {
        let mut game = TicTacToe::new();
        for cell in [4, 0, 2, 6, 3, 5, 1, 7, 8] {
            game.algo_play(cell).unwrap();
        }
        assert!(game.is_over());
        assert_eq!(game.winner(), Some(Outcome::Tie));
        assert!(game.play(0).is_err());

        game.reset();
        assert_eq!(game.turn(), 0);
        assert_eq!(game.winner(), None);
    }
}
