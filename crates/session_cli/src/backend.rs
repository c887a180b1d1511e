//! Built-in stand-in for the external search collaborator.
//!
//! One-ply material greed: take the biggest hanging piece, otherwise play a
//! random legal move. Deliberately weak; the point of the binary is to drive
//! the session core, not to play well.

use std::str::FromStr;

use async_trait::async_trait;
use chess::{Board, ChessMove, MoveGen, Piece};
use rand::seq::SliceRandom;
use session_core::{uci, EngineSpawner, SearchBackend, SearchError, SearchLimits};

fn piece_value(piece: Piece) -> i32 {
    match piece {
        Piece::Pawn => 100,
        Piece::Knight => 320,
        Piece::Bishop => 330,
        Piece::Rook => 500,
        Piece::Queen => 900,
        Piece::King => 20_000,
    }
}

fn capture_value(board: &Board, mv: ChessMove) -> i32 {
    match board.piece_on(mv.get_dest()) {
        Some(piece) => piece_value(piece),
        // Diagonal pawn move to an empty square is en passant
        None if board.piece_on(mv.get_source()) == Some(Piece::Pawn)
            && mv.get_source().get_file() != mv.get_dest().get_file() =>
        {
            piece_value(Piece::Pawn)
        }
        None => 0,
    }
}

pub struct GreedyMaterialBackend;

#[async_trait]
impl SearchBackend for GreedyMaterialBackend {
    async fn ready(&mut self) -> Result<(), SearchError> {
        Ok(())
    }

    async fn best_move(&mut self, fen: &str, _limits: SearchLimits) -> Result<String, SearchError> {
        let board = Board::from_str(fen)
            .map_err(|e| SearchError::Failed(format!("bad position {:?}: {}", fen, e)))?;
        let legal: Vec<ChessMove> = MoveGen::new_legal(&board).collect();

        let best_capture = legal
            .iter()
            .copied()
            .map(|mv| (capture_value(&board, mv), mv))
            .filter(|(value, _)| *value > 0)
            .max_by_key(|(value, _)| *value);

        let chosen = match best_capture {
            Some((_, mv)) => Some(mv),
            None => legal.choose(&mut rand::thread_rng()).copied(),
        };

        chosen
            .map(uci)
            .ok_or_else(|| SearchError::Failed("no legal moves".to_string()))
    }
}

pub struct GreedyMaterialSpawner;

impl EngineSpawner for GreedyMaterialSpawner {
    fn spawn_backend(&self) -> Box<dyn SearchBackend> {
        Box::new(GreedyMaterialBackend)
    }
}
