//! Game session state.
//!
//! Wraps the rules-engine collaborator (`chess::Game`) together with the
//! per-session bookkeeping the presentation layer needs: move history with
//! SAN, the last applied move for highlighting, and end-of-game evaluation.
//! Legality itself is never computed here; every move is submitted to the
//! rules engine and accepted or rejected by it.

use chess::{Board, BoardStatus, ChessMove, Color, File, Game, MoveGen, Piece, Square};

/// Why a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOver {
    Checkmate { winner: Color },
    Stalemate,
    /// Fifty-move rule or threefold repetition, declared via the rules engine
    DrawByRule,
    InsufficientMaterial,
    TimeForfeit { winner: Color },
    Resignation { winner: Color },
}

impl std::fmt::Display for GameOver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let side = |c: Color| if c == Color::White { "White" } else { "Black" };
        match self {
            GameOver::Checkmate { winner } => write!(f, "Checkmate! {} wins", side(*winner)),
            GameOver::Stalemate => write!(f, "Draw by stalemate"),
            GameOver::DrawByRule => write!(f, "Draw"),
            GameOver::InsufficientMaterial => write!(f, "Draw by insufficient material"),
            GameOver::TimeForfeit { winner } => {
                write!(f, "{} wins on time", side(*winner))
            }
            GameOver::Resignation { winner } => {
                write!(f, "{} wins by resignation", side(*winner))
            }
        }
    }
}

/// A recorded move in both SAN and coordinate notation.
#[derive(Debug, Clone)]
pub struct MoveRecord {
    pub san: String,
    pub uci: String,
}

/// Compact coordinate form of a move (`"e2e4"`, `"e7e8q"`).
pub fn uci(mv: ChessMove) -> String {
    let mut s = format!("{}{}", mv.get_source(), mv.get_dest());
    if let Some(promo) = mv.get_promotion() {
        s.push(piece_letter(promo).to_ascii_lowercase());
    }
    s
}

fn piece_letter(piece: Piece) -> char {
    match piece {
        Piece::Pawn => 'P',
        Piece::Knight => 'N',
        Piece::Bishop => 'B',
        Piece::Rook => 'R',
        Piece::Queen => 'Q',
        Piece::King => 'K',
    }
}

/// The active game: position handle plus applied-move bookkeeping.
#[derive(Debug)]
pub struct GameSession {
    game: Game,
    moves: Vec<MoveRecord>,
    last_move: Option<(Square, Square)>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    pub fn new() -> Self {
        Self {
            game: Game::new(),
            moves: Vec::new(),
            last_move: None,
        }
    }

    /// Start from an arbitrary position (test setups).
    pub fn from_board(board: Board) -> Self {
        Self {
            game: Game::new_with_board(board),
            moves: Vec::new(),
            last_move: None,
        }
    }

    /// Current position snapshot.
    pub fn board(&self) -> Board {
        self.game.current_position()
    }

    pub fn side_to_move(&self) -> Color {
        self.game.side_to_move()
    }

    pub fn fen(&self) -> String {
        self.board().to_string()
    }

    pub fn last_move(&self) -> Option<(Square, Square)> {
        self.last_move
    }

    pub fn moves(&self) -> &[MoveRecord] {
        &self.moves
    }

    /// Full-move number of the move about to be played (from 1).
    pub fn move_number(&self) -> u32 {
        self.moves.len() as u32 / 2 + 1
    }

    pub fn in_check(&self) -> bool {
        self.board().checkers().popcnt() > 0
    }

    /// Submit a move to the rules engine. On success the move is recorded as
    /// the last move and appended to history; on rejection nothing changes.
    pub fn try_move(&mut self, mv: ChessMove) -> bool {
        let san = self.generate_san(mv);
        if !self.game.make_move(mv) {
            return false;
        }
        self.moves.push(MoveRecord { san, uci: uci(mv) });
        self.last_move = Some((mv.get_source(), mv.get_dest()));
        true
    }

    /// Destination squares reachable from `from`, for selection hints.
    pub fn legal_targets(&self, from: Square) -> Vec<Square> {
        let board = self.board();
        MoveGen::new_legal(&board)
            .filter(|m| m.get_source() == from)
            .map(|m| m.get_dest())
            .collect()
    }

    /// Find the legal move matching a from/to pair.
    ///
    /// With no explicit promotion choice, promotions default to a queen.
    pub fn find_move(
        &self,
        from: Square,
        to: Square,
        promotion: Option<Piece>,
    ) -> Option<ChessMove> {
        let board = self.board();
        MoveGen::new_legal(&board).find(|m| {
            m.get_source() == from
                && m.get_dest() == to
                && match promotion {
                    Some(p) => m.get_promotion() == Some(p),
                    None => {
                        m.get_promotion().is_none() || m.get_promotion() == Some(Piece::Queen)
                    }
                }
        })
    }

    /// Evaluate whether the game has ended, querying the rules engine.
    ///
    /// Draws by rule are declared on the spot, freezing the rules engine's
    /// own result.
    pub fn evaluate_end(&mut self) -> Option<GameOver> {
        let board = self.board();
        match board.status() {
            BoardStatus::Checkmate => {
                return Some(GameOver::Checkmate {
                    winner: !board.side_to_move(),
                })
            }
            BoardStatus::Stalemate => return Some(GameOver::Stalemate),
            BoardStatus::Ongoing => {}
        }

        if self.game.can_declare_draw() {
            self.game.declare_draw();
            return Some(GameOver::DrawByRule);
        }

        if insufficient_material(&board) {
            return Some(GameOver::InsufficientMaterial);
        }

        None
    }

    /// Export the applied moves in portable text form.
    pub fn move_text(&self) -> String {
        let mut out = String::new();
        for (i, chunk) in self.moves.chunks(2).enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push_str(&format!("{}. {}", i + 1, chunk[0].san));
            if let Some(black) = chunk.get(1) {
                out.push(' ');
                out.push_str(&black.san);
            }
        }
        out
    }

    /// Generate SAN notation for a move against the current position.
    fn generate_san(&self, mv: ChessMove) -> String {
        let board = self.board();
        let from = mv.get_source();
        let to = mv.get_dest();

        let piece = match board.piece_on(from) {
            Some(p) => p,
            None => return format!("{}{}", from, to),
        };

        // Castling: king moving two files
        if piece == Piece::King {
            let from_file = from.get_file().to_index() as i8;
            let to_file = to.get_file().to_index() as i8;
            if (from_file - to_file).abs() == 2 {
                return if to_file > from_file {
                    "O-O".to_string()
                } else {
                    "O-O-O".to_string()
                };
            }
        }

        let mut san = String::new();
        if piece != Piece::Pawn {
            san.push(piece_letter(piece));
        }

        // Capture indicator (diagonal pawn move to an empty square is en passant)
        let is_capture = board.piece_on(to).is_some()
            || (piece == Piece::Pawn && from.get_file() != to.get_file());
        if is_capture {
            if piece == Piece::Pawn {
                san.push(file_char(from.get_file()));
            }
            san.push('x');
        }

        san.push_str(&to.to_string());

        if let Some(promo) = mv.get_promotion() {
            san.push('=');
            san.push(piece_letter(promo));
        }

        san
    }
}

fn file_char(file: File) -> char {
    (b'a' + file.to_index() as u8) as char
}

/// Only kings, or kings plus a single minor piece, cannot force mate.
fn insufficient_material(board: &Board) -> bool {
    let total = board.combined().popcnt();
    if total > 3 {
        return false;
    }
    if total == 2 {
        return true;
    }
    let minors = board.pieces(Piece::Bishop) | board.pieces(Piece::Knight);
    minors.popcnt() == 1
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod session_tests;
