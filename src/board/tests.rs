use super::*;

#[test]
fn test_player_opponent() {
    assert_eq!(Player::P1.opponent(), Player::P2);
    assert_eq!(Player::P2.opponent(), Player::P1);
    assert_eq!(Player::P1.mark().owner(), Some(Player::P1));
    assert_eq!(Mark::Free.owner(), None);
}

#[test]
fn test_board_dimensions_validated() {
    assert!(Board::new(3, 3, 3).is_ok());
    assert!(Board::new(1, 5, 5).is_ok());
    assert_eq!(
        Board::new(0, 3, 3),
        Err(BoardError::InvalidDimensions { rows: 0, cols: 3, k: 3 })
    );
    assert!(Board::new(3, 3, 0).is_err());
    assert!(Board::new(3, 3, 4).is_err());
}

#[test]
fn test_sides_alternate() {
    let mut board = Board::new(3, 3, 3).unwrap();
    assert_eq!(board.current_player(), Player::P1);
    board.mark(0, 0).unwrap();
    assert_eq!(board.current_player(), Player::P2);
    board.mark(1, 1).unwrap();
    assert_eq!(board.cell_state_at(0, 0), Mark::P1);
    assert_eq!(board.cell_state_at(1, 1), Mark::P2);
    assert_eq!(
        board.marked_cells(),
        &[Cell::new(0, 0, Mark::P1), Cell::new(1, 1, Mark::P2)]
    );
}

#[test]
fn test_mark_errors() {
    let mut board = Board::new(3, 3, 3).unwrap();
    assert_eq!(
        board.mark(3, 0),
        Err(BoardError::OutOfBounds { row: 3, col: 0 })
    );
    assert_eq!(
        board.mark(-1, 0),
        Err(BoardError::OutOfBounds { row: -1, col: 0 })
    );
    board.mark(1, 1).unwrap();
    assert_eq!(board.mark(1, 1), Err(BoardError::Occupied { row: 1, col: 1 }));
    assert_eq!(board.unmark(), Ok(Cell::new(1, 1, Mark::P1)));
    assert_eq!(board.unmark(), Err(BoardError::EmptyHistory));
}

#[test]
fn test_win_then_unmark_reopens() {
    let mut board = Board::new(3, 3, 3).unwrap();
    for (r, c) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
        board.mark(r, c).unwrap();
    }
    assert_eq!(board.mark(0, 2), Ok(GameState::WinP1));
    assert_eq!(board.state().winner(), Some(Player::P1));
    assert_eq!(board.mark(2, 2), Err(BoardError::GameOver));

    board.unmark().unwrap();
    assert_eq!(board.state(), GameState::Open);
    assert_eq!(board.cell_state_at(0, 2), Mark::Free);
    assert_eq!(board.current_player(), Player::P1);
}

#[test]
fn test_draw_detected() {
    // X O X / X O O / O X X
    let mut board = Board::new(3, 3, 3).unwrap();
    let moves = [(0, 0), (0, 1), (0, 2), (1, 1), (1, 0), (1, 2), (2, 1), (2, 0)];
    for (r, c) in moves {
        assert_eq!(board.mark(r, c), Ok(GameState::Open));
    }
    assert_eq!(board.mark(2, 2), Ok(GameState::Draw));
    assert!(board.free_cells().is_empty());
}

#[test]
fn test_free_cells_row_major() {
    let mut board = Board::new(2, 2, 2).unwrap();
    board.mark(0, 1).unwrap();
    assert_eq!(
        board.free_cells(),
        vec![Cell::free(0, 0), Cell::free(1, 0), Cell::free(1, 1)]
    );
    assert_eq!(board.free_count(), 3);
}

#[test]
fn test_contour() {
    let mut board = Board::new(5, 5, 4).unwrap();
    assert!(board.contour().is_empty());

    board.mark(0, 0).unwrap();
    assert_eq!(
        board.contour(),
        vec![Cell::free(0, 1), Cell::free(1, 0), Cell::free(1, 1)]
    );

    board.mark(2, 2).unwrap();
    let contour = board.contour();
    assert_eq!(contour.len(), 3 + 8 - 1); // (1,1) shared
    assert!(contour.iter().all(|c| board.cell_state_at(c.row, c.col) == Mark::Free));
}

#[test]
fn test_out_of_bounds_reads_free() {
    let board = Board::new(3, 4, 3).unwrap();
    assert!(!board.in_bounds(3, 0));
    assert!(!board.in_bounds(0, 4));
    assert!(board.in_bounds(2, 3));
    assert_eq!(board.cell_state_at(-1, -1), Mark::Free);
    assert_eq!(board.index_of(2, 3), Some(11));
    assert_eq!(board.index_of(2, 4), None);
}
