use super::*;
use std::str::FromStr;

fn mv(from: Square, to: Square) -> ChessMove {
    ChessMove::new(from, to, None)
}

fn board(fen: &str) -> Board {
    Board::from_str(fen).unwrap()
}

#[test]
fn test_try_move_records_history() {
    let mut session = GameSession::new();
    assert!(session.try_move(mv(Square::E2, Square::E4)));

    assert_eq!(session.moves().len(), 1);
    assert_eq!(session.moves()[0].san, "e4");
    assert_eq!(session.moves()[0].uci, "e2e4");
    assert_eq!(session.last_move(), Some((Square::E2, Square::E4)));
    assert_eq!(session.side_to_move(), Color::Black);
}

#[test]
fn test_try_move_rejects_illegal() {
    let mut session = GameSession::new();
    assert!(!session.try_move(mv(Square::E2, Square::E5)));
    assert!(session.moves().is_empty());
    assert_eq!(session.last_move(), None);
    assert_eq!(session.side_to_move(), Color::White);
}

#[test]
fn test_move_number_counts_full_moves() {
    let mut session = GameSession::new();
    assert_eq!(session.move_number(), 1);
    session.try_move(mv(Square::E2, Square::E4));
    assert_eq!(session.move_number(), 1);
    session.try_move(mv(Square::E7, Square::E5));
    assert_eq!(session.move_number(), 2);
    session.try_move(mv(Square::G1, Square::F3));
    assert_eq!(session.move_number(), 2);
}

#[test]
fn test_legal_targets_from_start() {
    let session = GameSession::new();
    let targets = session.legal_targets(Square::E2);
    assert_eq!(targets.len(), 2);
    assert!(targets.contains(&Square::E3));
    assert!(targets.contains(&Square::E4));
    assert!(session.legal_targets(Square::E1).is_empty());
}

#[test]
fn test_find_move_defaults_promotion_to_queen() {
    let session = GameSession::from_board(board("8/P7/8/8/8/8/8/k1K5 w - - 0 1"));

    let found = session.find_move(Square::A7, Square::A8, None).unwrap();
    assert_eq!(found.get_promotion(), Some(Piece::Queen));

    let knight = session
        .find_move(Square::A7, Square::A8, Some(Piece::Knight))
        .unwrap();
    assert_eq!(knight.get_promotion(), Some(Piece::Knight));
}

#[test]
fn test_uci_formatting() {
    assert_eq!(uci(mv(Square::E2, Square::E4)), "e2e4");
    assert_eq!(
        uci(ChessMove::new(Square::A7, Square::A8, Some(Piece::Queen))),
        "a7a8q"
    );
    assert_eq!(
        uci(ChessMove::new(Square::A7, Square::A8, Some(Piece::Knight))),
        "a7a8n"
    );
}

#[test]
fn test_san_castling() {
    let fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";

    let mut session = GameSession::from_board(board(fen));
    assert!(session.try_move(mv(Square::E1, Square::G1)));
    assert_eq!(session.moves()[0].san, "O-O");

    let mut session = GameSession::from_board(board(fen));
    assert!(session.try_move(mv(Square::E1, Square::C1)));
    assert_eq!(session.moves()[0].san, "O-O-O");
}

#[test]
fn test_san_captures_and_promotion() {
    // En passant: the target square is empty but the pawn changes file.
    let mut session = GameSession::from_board(board(
        "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3",
    ));
    assert!(session.try_move(mv(Square::E5, Square::D6)));
    assert_eq!(session.moves()[0].san, "exd6");

    let mut session = GameSession::from_board(board("8/P7/8/8/8/8/8/k1K5 w - - 0 1"));
    assert!(session.try_move(ChessMove::new(Square::A7, Square::A8, Some(Piece::Queen))));
    assert_eq!(session.moves()[0].san, "a8=Q");
}

#[test]
fn test_move_text_numbering() {
    let mut session = GameSession::new();
    session.try_move(mv(Square::E2, Square::E4));
    session.try_move(mv(Square::E7, Square::E5));
    session.try_move(mv(Square::G1, Square::F3));
    assert_eq!(session.move_text(), "1. e4 e5 2. Nf3");
}

#[test]
fn test_evaluate_end_checkmate() {
    let mut session = GameSession::new();
    session.try_move(mv(Square::F2, Square::F3));
    session.try_move(mv(Square::E7, Square::E5));
    session.try_move(mv(Square::G2, Square::G4));
    assert_eq!(session.evaluate_end(), None);
    session.try_move(mv(Square::D8, Square::H4));

    assert!(session.in_check());
    assert_eq!(
        session.evaluate_end(),
        Some(GameOver::Checkmate {
            winner: Color::Black
        })
    );
}

#[test]
fn test_evaluate_end_stalemate() {
    let mut session = GameSession::from_board(board("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1"));
    assert_eq!(session.evaluate_end(), Some(GameOver::Stalemate));
}

#[test]
fn test_evaluate_end_insufficient_material() {
    let mut session = GameSession::from_board(board("k7/8/8/8/8/8/8/KB6 w - - 0 1"));
    assert_eq!(session.evaluate_end(), Some(GameOver::InsufficientMaterial));

    // Two minor pieces can still mate in principle, play continues.
    let mut session = GameSession::from_board(board("kb6/8/8/8/8/8/8/KB6 w - - 0 1"));
    assert_eq!(session.evaluate_end(), None);
}

#[test]
fn test_evaluate_end_threefold_repetition() {
    let mut session = GameSession::new();
    // Knight shuffle: the starting position recurs after every fourth move.
    for _ in 0..2 {
        session.try_move(mv(Square::G1, Square::F3));
        session.try_move(mv(Square::G8, Square::F6));
        session.try_move(mv(Square::F3, Square::G1));
        session.try_move(mv(Square::F6, Square::G8));
    }
    assert_eq!(session.evaluate_end(), Some(GameOver::DrawByRule));
}

#[test]
fn test_game_over_display() {
    assert_eq!(
        GameOver::Checkmate {
            winner: Color::White
        }
        .to_string(),
        "Checkmate! White wins"
    );
    assert_eq!(
        GameOver::TimeForfeit {
            winner: Color::Black
        }
        .to_string(),
        "Black wins on time"
    );
    assert_eq!(
        GameOver::Resignation {
            winner: Color::White
        }
        .to_string(),
        "White wins by resignation"
    );
    assert_eq!(GameOver::Stalemate.to_string(), "Draw by stalemate");
}
