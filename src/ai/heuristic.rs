use crate::game::{Board, GameState, Move, Player, COLS};

use super::agent::Agent;

/// Column preferred when nothing tactical is on the board.
pub const CENTER_COLUMN: usize = COLS / 2;

/// Pick a column for `me` with a one-move lookahead.
///
/// In order: a column that wins now, a column that stops the opponent from
/// winning next move, else the valid column nearest the centre (lower index
/// on ties). Returns `None` only for a full board.
pub fn choose_move(board: &Board, me: Player) -> Option<usize> {
    let mut columns = board.valid_columns();
    if columns.is_empty() {
        return None;
    }

    // win now
    if let Some(col) = winning_column(board, &columns, me) {
        return Some(col);
    }

    // block opponent
    if let Some(col) = winning_column(board, &columns, me.other()) {
        return Some(col);
    }

    // prefer center; stable sort keeps ascending order on ties
    columns.sort_by_key(|&col| col.abs_diff(CENTER_COLUMN));
    columns.first().copied()
}

/// First column (in the given order) where `player` would complete four.
fn winning_column(board: &Board, columns: &[usize], player: Player) -> Option<usize> {
    columns
        .iter()
        .copied()
        .find(|&col| wins_if_played(board, col, player))
}

/// Would dropping `player`'s disc in `col` win immediately?
pub fn wins_if_played(board: &Board, col: usize, player: Player) -> bool {
    match board.drop_in_column(col, player) {
        Ok((next, row)) => next.check_win(Move { row, col, player }).is_some(),
        Err(_) => false,
    }
}

/// The fixed-priority one-ply opponent.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicAgent;

impl HeuristicAgent {
    pub fn new() -> Self {
        HeuristicAgent
    }
}

impl Agent for HeuristicAgent {
    fn select_action(&mut self, state: &GameState) -> Option<usize> {
        if state.is_terminal() {
            return None;
        }
        choose_move(state.board(), state.current_player())
    }

    fn name(&self) -> &str {
        "Heuristic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::ROWS;

    const R: Player = Player::First;
    const B: Player = Player::Second;

    fn board_from(drops: &[(usize, Player)]) -> Board {
        drops.iter().fold(Board::new(), |board, &(col, player)| {
            board.drop_in_column(col, player).unwrap().0
        })
    }

    #[test]
    fn test_empty_board_prefers_center() {
        assert_eq!(choose_move(&Board::new(), R), Some(3));
        assert_eq!(choose_move(&Board::new(), B), Some(3));
    }

    #[test]
    fn test_center_ties_go_to_lower_column() {
        // Fill the centre column without creating any threat
        let drops: Vec<(usize, Player)> = (0..ROWS)
            .map(|i| (3, if i % 2 == 0 { R } else { B }))
            .collect();
        let board = board_from(&drops);
        assert_eq!(choose_move(&board, R), Some(2));

        let board = board_from(
            &drops
                .iter()
                .copied()
                .chain((0..ROWS).map(|i| (2, if i % 2 == 0 { B } else { R })))
                .collect::<Vec<_>>(),
        );
        assert_eq!(choose_move(&board, R), Some(4));
    }

    #[test]
    fn test_win_takes_priority_over_block() {
        // Second can win vertically at column 5; First threatens column 1
        let board = board_from(&[(2, R), (3, R), (4, R), (5, B), (5, B), (5, B)]);
        assert!(wins_if_played(&board, 1, R));
        assert!(wins_if_played(&board, 5, B));

        assert_eq!(choose_move(&board, B), Some(5));
    }

    #[test]
    fn test_blocks_opponent_win() {
        let board = board_from(&[(2, R), (3, R), (4, R), (5, B), (5, B)]);
        // Both ends of the open three win for First; the lower column is taken
        let board_open = board_from(&[(2, R), (3, R), (4, R), (6, B), (6, B)]);

        assert_eq!(choose_move(&board, B), Some(1));
        assert_eq!(choose_move(&board_open, B), Some(1));
    }

    #[test]
    fn test_takes_own_win_as_first_player() {
        let board = board_from(&[(0, R), (0, R), (0, R), (6, B), (6, B)]);
        assert_eq!(choose_move(&board, R), Some(0));
    }

    #[test]
    fn test_lowest_winning_column_chosen() {
        // Open three on the bottom row: columns 1 and 5 both win
        let board = board_from(&[(2, B), (3, B), (4, B)]);
        assert_eq!(choose_move(&board, B), Some(1));
    }

    #[test]
    fn test_full_board_has_no_move() {
        let mut board = Board::new();
        for col in 0..COLS {
            for i in 0..ROWS {
                board = board
                    .drop_in_column(col, if (i + col / 2) % 2 == 0 { R } else { B })
                    .unwrap()
                    .0;
            }
        }
        assert!(board.is_full());
        assert_eq!(choose_move(&board, R), None);
    }

    #[test]
    fn test_wins_if_played_on_full_column() {
        let board = board_from(&[(0, R), (0, B), (0, R), (0, B), (0, R), (0, B)]);
        assert!(!wins_if_played(&board, 0, R));
        assert!(!wins_if_played(&board, 9, R));
    }

    #[test]
    fn test_agent_plays_for_side_to_move() {
        let mut agent = HeuristicAgent::new();
        // First stacks column 0 three times; Second must block
        let mut state = GameState::initial();
        for col in [0, 6, 0, 6, 0] {
            state = state.apply_move(col).unwrap();
        }
        assert_eq!(state.current_player(), Player::Second);
        assert_eq!(agent.select_action(&state), Some(0));
        assert_eq!(agent.name(), "Heuristic");
    }

    #[test]
    fn test_agent_returns_none_when_terminal() {
        let mut agent = HeuristicAgent::new();
        let mut state = GameState::initial();
        for col in [3, 4, 3, 4, 3, 4, 3] {
            state = state.apply_move(col).unwrap();
        }
        assert!(state.is_terminal());
        assert_eq!(agent.select_action(&state), None);
    }
}
