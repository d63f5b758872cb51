use serde::{Deserialize, Serialize};

/// One of the two sides of a game.
///
/// The first player always moves first from the initial position. In feature vectors the
/// players are encoded by their [`index`](Self::index) (`0` and `1`), and empty cells
/// by `-1`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display, Serialize, Deserialize,
)]
pub enum Player {
    #[display("0")]
    First,
    #[display("1")]
    Second,
}

impl Player {
    pub const ALL: [Self; 2] = [Self::First, Self::Second];

    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
        }
    }

    /// Board symbol used by the text renderings of the games.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::First => 'X',
            Self::Second => 'O',
        }
    }

    #[must_use]
    pub const fn feature_value(self) -> f32 {
        match self {
            Self::First => 0.0,
            Self::Second => 1.0,
        }
    }
}

/// Feature value of a board cell: the owner's index, or `-1` when empty.
#[must_use]
pub const fn cell_feature(cell: Option<Player>) -> f32 {
    match cell {
        Some(player) => player.feature_value(),
        None => -1.0,
    }
}

pub(crate) const fn cell_symbol(cell: Option<Player>) -> char {
    match cell {
        Some(player) => player.symbol(),
        None => '.',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent_is_involution() {
        for player in Player::ALL {
            assert_ne!(player.opponent(), player);
            assert_eq!(player.opponent().opponent(), player);
        }
    }

    #[test]
    fn test_feature_encoding() {
        assert_eq!(cell_feature(None), -1.0);
        assert_eq!(cell_feature(Some(Player::First)), 0.0);
        assert_eq!(cell_feature(Some(Player::Second)), 1.0);
    }

    #[test]
    fn test_serde_roundtrip() {
        let json = serde_json::to_string(&Player::Second).unwrap();
        assert_eq!(serde_json::from_str::<Player>(&json).unwrap(), Player::Second);
    }
}
