use std::{fmt, hash::Hash, iter};

use crate::{
    GameEngine, GameState, IllegalMoveError, Player,
    player::{cell_feature, cell_symbol},
};

pub const CONNECT4_ROWS: usize = 6;
pub const CONNECT4_COLS: usize = 7;

const CONNECT: isize = 4;
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

type Grid = [[Option<Player>; CONNECT4_COLS]; CONNECT4_ROWS];

/// A four-in-a-row position.
///
/// Row `0` is the top of the board; discs fall to the lowest empty row of the chosen
/// column. The move identifier is the column index.
#[derive(Debug, Clone, Copy)]
pub struct Connect4State {
    board: Grid,
    player: Player,
    last_move: Option<usize>,
}

impl Default for Connect4State {
    fn default() -> Self {
        Self::new()
    }
}

impl Connect4State {
    #[must_use]
    pub const fn new() -> Self {
        Self::with_board([[None; CONNECT4_COLS]; CONNECT4_ROWS], Player::First)
    }

    #[must_use]
    pub const fn with_board(board: Grid, player: Player) -> Self {
        Self {
            board,
            player,
            last_move: None,
        }
    }

    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Option<Player> {
        self.board[row][col]
    }

    /// Row a disc dropped into `col` would land on, `None` if the column is full.
    #[must_use]
    pub fn landing_row(&self, col: usize) -> Option<usize> {
        (0..CONNECT4_ROWS).rev().find(|row| self.board[*row][col].is_none())
    }

    #[must_use]
    pub fn is_legal_move(&self, col: usize) -> bool {
        col < CONNECT4_COLS && self.board[0][col].is_none()
    }

    /// Returns the position after the player to move drops a disc into `col`.
    ///
    /// Returns `None` if the column is full.
    #[must_use]
    pub fn after_move(&self, col: usize) -> Option<Self> {
        let row = self.landing_row(col)?;
        let mut board = self.board;
        board[row][col] = Some(self.player);
        Some(Self {
            board,
            player: self.player.opponent(),
            last_move: Some(col),
        })
    }

    fn line_from(&self, row: usize, col: usize, (dr, dc): (isize, isize), player: Player) -> bool {
        (0..CONNECT).all(|i| {
            let (Some(r), Some(c)) = (row.checked_add_signed(dr * i), col.checked_add_signed(dc * i))
            else {
                return false;
            };
            r < CONNECT4_ROWS && c < CONNECT4_COLS && self.board[r][c] == Some(player)
        })
    }
}

impl PartialEq for Connect4State {
    fn eq(&self, other: &Self) -> bool {
        self.board == other.board && self.player == other.player
    }
}

impl Eq for Connect4State {}

impl Hash for Connect4State {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.board.hash(state);
        self.player.hash(state);
    }
}

impl GameState for Connect4State {
    type Move = usize;

    const FEATURE_COUNT: usize = 1 + CONNECT4_ROWS * CONNECT4_COLS;

    fn player(&self) -> Player {
        self.player
    }

    fn last_move(&self) -> Option<usize> {
        self.last_move
    }

    fn possible_next_states(&self) -> impl Iterator<Item = Self> + '_ {
        (0..CONNECT4_COLS).filter_map(move |col| self.after_move(col))
    }

    fn has_won(&self, player: Player) -> bool {
        (0..CONNECT4_ROWS).any(|row| {
            (0..CONNECT4_COLS).any(|col| {
                DIRECTIONS
                    .into_iter()
                    .any(|dir| self.line_from(row, col, dir, player))
            })
        })
    }

    fn is_tie(&self) -> bool {
        self.board[0].iter().all(Option::is_some)
            && !Player::ALL.into_iter().any(|player| self.has_won(player))
    }

    fn features(&self) -> impl Iterator<Item = f32> + '_ {
        iter::once(self.player.feature_value())
            .chain(self.board.iter().flatten().copied().map(cell_feature))
    }
}

impl fmt::Display for Connect4State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.board {
            for cell in row {
                write!(f, " {}", cell_symbol(*cell))?;
            }
            writeln!(f)?;
        }
        for col in 0..CONNECT4_COLS {
            write!(f, " {col}")?;
        }
        writeln!(f)
    }
}

/// A four-in-a-row game in progress.
#[derive(Debug, Clone, Default)]
pub struct Connect4 {
    state: Connect4State,
    turn: usize,
}

impl Connect4 {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl GameEngine for Connect4 {
    type State = Connect4State;

    fn state(&self) -> &Connect4State {
        &self.state
    }

    fn turn(&self) -> usize {
        self.turn
    }

    fn play(&mut self, col: usize) -> Result<(), IllegalMoveError> {
        let next = (!self.is_over() && self.state.is_legal_move(col))
            .then(|| self.state.after_move(col))
            .flatten()
            .ok_or_else(|| IllegalMoveError::new(self.state.player, col))?;
        self.state = next;
        self.turn += 1;
        Ok(())
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use crate::Outcome;

    use super::*;

    fn play_all(columns: &[usize]) -> Connect4 {
        let mut game = Connect4::new();
        for col in columns {
            game.play(*col).unwrap();
        }
        game
    }

    #[test]
    fn test_discs_fall_to_the_bottom() {
        let game = play_all(&[3, 3, 3]);
        let state = game.state();
        assert_eq!(state.cell(5, 3), Some(Player::First));
        assert_eq!(state.cell(4, 3), Some(Player::Second));
        assert_eq!(state.cell(3, 3), Some(Player::First));
        assert_eq!(state.cell(2, 3), None);
        assert_eq!(state.landing_row(3), Some(2));
    }

    #[test]
    fn test_possible_next_states_skip_full_columns() {
        let game = play_all(&[0, 0, 0, 0, 0, 0]);
        let moves: Vec<_> = game
            .state()
            .possible_next_states()
            .map(|s| s.last_move().unwrap())
            .collect();
        assert_eq!(moves, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_enumeration_leaves_origin_untouched() {
        let game = play_all(&[3, 2]);
        let before = *game.state();
        for child in game.state().possible_next_states() {
            assert_ne!(child, before);
        }
        assert_eq!(*game.state(), before);
        assert_eq!(game.state().landing_row(3), Some(4));
    }

    #[test]
    fn test_horizontal_win() {
        let game = play_all(&[0, 0, 1, 1, 2, 2, 3]);
        assert_eq!(game.winner(), Some(Outcome::Win(Player::First)));
    }

    #[test]
    fn test_vertical_win() {
        let game = play_all(&[0, 1, 0, 1, 0, 1, 6, 1]);
        assert_eq!(game.winner(), Some(Outcome::Win(Player::Second)));
    }

    #[test]
    fn test_diagonal_wins() {
        // rising diagonal for the first player: (5,0) (4,1) (3,2) (2,3)
        let game = play_all(&[0, 1, 1, 2, 2, 3, 2, 3, 3, 6, 3]);
        assert_eq!(game.winner(), Some(Outcome::Win(Player::First)));

        // falling diagonal for the first player: (2,3) (3,4) (4,5) (5,6)
        let game = play_all(&[6, 5, 5, 4, 4, 3, 4, 3, 3, 0, 3]);
        assert_eq!(game.winner(), Some(Outcome::Win(Player::First)));
    }

    #[test]
    fn test_tie_on_full_board() {
        // Column colour offsets 0,0,1,1,0,0,1 never line up four in any direction.
        let shift = [0, 0, 1, 1, 0, 0, 1];
        let mut board = [[None; CONNECT4_COLS]; CONNECT4_ROWS];
        for (r, row) in board.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = Some(Player::ALL[(r + shift[c]) % 2]);
            }
        }
        let state = Connect4State::with_board(board, Player::First);
        assert!(!state.has_won(Player::First));
        assert!(!state.has_won(Player::Second));
        assert!(state.is_tie());
        assert_eq!(state.outcome(), Some(Outcome::Tie));
        assert_eq!(state.possible_next_states().count(), 0);
    }

    #[test]
    fn test_partial_board_is_not_tie() {
        let game = play_all(&[0, 1, 2]);
        assert!(!game.state().is_tie());
        assert!(!game.is_over());
    }

    #[test]
    fn test_engine_rejects_full_column() {
        let mut game = play_all(&[0, 0, 0, 0, 0, 0]);
        assert!(game.play(0).is_err());
        assert!(game.play(7).is_err());
        assert_eq!(game.turn(), 6);
    }

    #[test]
    fn test_features() {
        let game = play_all(&[3]);
        let features: Vec<f32> = game.state().features().collect();
        assert_eq!(features.len(), Connect4State::FEATURE_COUNT);
        assert_eq!(features[0], Player::Second.feature_value());
        assert_eq!(features[1 + 5 * CONNECT4_COLS + 3], 0.0);
        assert_eq!(features.iter().filter(|v| **v == -1.0).count(), 41);
    }
}
