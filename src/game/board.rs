use crate::game::{Color, Move, Piece, PieceType, Position};

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (-1, 2),
    (-2, 1),
    (1, -2),
    (2, -1),
    (-1, -2),
    (-2, -1),
];

const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

const ORTHOGONALS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

/// Wire form of the board: `[rank][file]`, each square a piece code or empty.
pub type WireBoard = [[Option<String>; 8]; 8];

/// The two squares touched by a tentative move, as they were before it.
struct Snapshot {
    from: (Position, Option<Piece>),
    to: (Position, Option<Piece>),
}

/// The rules engine: piece placement plus the side to move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    squares: [Option<Piece>; 64],
    turn: Color,
}

impl Board {
    /// Standard starting position, white to move.
    pub fn initial() -> Self {
        let mut board = Self::empty(Color::White);
        for color in [Color::White, Color::Black] {
            for (file, kind) in BACK_RANK.iter().enumerate() {
                board.squares[usize::from(color.back_rank()) * 8 + file] =
                    Some(Piece::new(color, *kind));
                board.squares[usize::from(color.pawn_start_rank()) * 8 + file] =
                    Some(Piece::new(color, PieceType::Pawn));
            }
        }
        board
    }

    /// A board with no pieces, for composing positions.
    pub fn empty(turn: Color) -> Self {
        Self {
            squares: [None; 64],
            turn,
        }
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn get(&self, position: Position) -> Option<Piece> {
        self.squares[position.index()]
    }

    pub fn set(&mut self, position: Position, piece: Option<Piece>) {
        self.squares[position.index()] = piece;
    }

    pub fn to_wire(&self) -> WireBoard {
        std::array::from_fn(|rank| {
            std::array::from_fn(|file| self.squares[rank * 8 + file].map(Piece::code))
        })
    }

    /// Validate `mv` for the side to move and play it.
    ///
    /// Returns `false` and leaves the board untouched when the move is not
    /// allowed. On success the turn passes to the other side.
    pub fn apply_move_if_legal(&mut self, mv: &Move) -> bool {
        let piece = match self.get(mv.from) {
            Some(piece) if piece.color() == self.turn => piece,
            _ => return false,
        };

        if !self.is_pseudo_legal(mv, piece) {
            return false;
        }

        let snapshot = self.snapshot(mv);
        self.set(mv.to, Some(piece.mark_moved()));
        self.set(mv.from, None);

        if self.is_king_in_check(self.turn) {
            self.restore(snapshot);
            return false;
        }

        if piece.kind() == PieceType::Pawn && mv.to.rank() == piece.color().promotion_rank() {
            let promoted = mv
                .promotion
                .filter(|kind| kind.is_promotion_target())
                .unwrap_or(PieceType::Queen);
            self.set(mv.to, Some(Piece::new(piece.color(), promoted).mark_moved()));
        }

        self.turn = self.turn.opposite();
        true
    }

    /// Whether `color`'s king stands on a square attacked by the other side.
    ///
    /// A side with no king on the board is never in check.
    pub fn is_king_in_check(&self, color: Color) -> bool {
        match self.find_king(color) {
            Some(king) => self.is_square_attacked(king, color.opposite()),
            None => false,
        }
    }

    fn snapshot(&self, mv: &Move) -> Snapshot {
        Snapshot {
            from: (mv.from, self.get(mv.from)),
            to: (mv.to, self.get(mv.to)),
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.set(snapshot.to.0, snapshot.to.1);
        self.set(snapshot.from.0, snapshot.from.1);
    }

    fn find_king(&self, color: Color) -> Option<Position> {
        self.squares
            .iter()
            .position(|square| {
                matches!(square, Some(p) if p.kind() == PieceType::King && p.color() == color)
            })
            .map(Position::from_index)
    }

    fn is_pseudo_legal(&self, mv: &Move, piece: Piece) -> bool {
        let (from, to) = (mv.from, mv.to);
        if from == to {
            return false;
        }
        let dest = self.get(to);
        if matches!(dest, Some(d) if d.color() == piece.color()) {
            return false;
        }

        let df = to.file() as i8 - from.file() as i8;
        let dr = to.rank() as i8 - from.rank() as i8;
        let (af, ar) = (df.abs(), dr.abs());
        let step = (df.signum(), dr.signum());

        match piece.kind() {
            PieceType::Pawn => {
                let dir = piece.color().pawn_direction();
                if df == 0 && dest.is_none() {
                    if dr == dir {
                        return true;
                    }
                    if dr == 2 * dir && from.rank() == piece.color().pawn_start_rank() {
                        return from.offset(0, dir).is_some_and(|mid| self.get(mid).is_none());
                    }
                }
                // Diagonal steps are captures only; the destination is known not to be ours.
                af == 1 && dr == dir && dest.is_some()
            }
            PieceType::Knight => (af == 1 && ar == 2) || (af == 2 && ar == 1),
            PieceType::Bishop => af == ar && self.path_clear(from, to, step),
            PieceType::Rook => (df == 0 || dr == 0) && self.path_clear(from, to, step),
            PieceType::Queen => {
                (af == ar || df == 0 || dr == 0) && self.path_clear(from, to, step)
            }
            PieceType::King => af <= 1 && ar <= 1,
        }
    }

    /// Every square strictly between `from` and `to` along `step` is empty.
    fn path_clear(&self, from: Position, to: Position, step: (i8, i8)) -> bool {
        let mut current = from.offset(step.0, step.1);
        while let Some(square) = current {
            if square == to {
                return true;
            }
            if self.get(square).is_some() {
                return false;
            }
            current = square.offset(step.0, step.1);
        }
        false
    }

    fn holds(&self, square: Option<Position>, color: Color, kinds: &[PieceType]) -> bool {
        match square.and_then(|s| self.get(s)) {
            Some(piece) => piece.color() == color && kinds.contains(&piece.kind()),
            None => false,
        }
    }

    /// First piece met walking from `origin` (exclusive) along `dir`.
    fn first_along(&self, origin: Position, dir: (i8, i8)) -> Option<Position> {
        let mut current = origin.offset(dir.0, dir.1);
        while let Some(square) = current {
            if self.get(square).is_some() {
                return Some(square);
            }
            current = square.offset(dir.0, dir.1);
        }
        None
    }

    fn is_square_attacked(&self, target: Position, by: Color) -> bool {
        // A pawn of `by` attacks `target` from one rank behind it, one file to either side.
        let behind = -by.pawn_direction();
        if [-1, 1]
            .iter()
            .any(|&df| self.holds(target.offset(df, behind), by, &[PieceType::Pawn]))
        {
            return true;
        }

        if KNIGHT_OFFSETS
            .iter()
            .any(|&(df, dr)| self.holds(target.offset(df, dr), by, &[PieceType::Knight]))
        {
            return true;
        }

        let diagonal = [PieceType::Bishop, PieceType::Queen];
        if DIAGONALS
            .iter()
            .any(|&dir| self.holds(self.first_along(target, dir), by, &diagonal))
        {
            return true;
        }

        let straight = [PieceType::Rook, PieceType::Queen];
        if ORTHOGONALS
            .iter()
            .any(|&dir| self.holds(self.first_along(target, dir), by, &straight))
        {
            return true;
        }

        DIAGONALS
            .iter()
            .chain(ORTHOGONALS.iter())
            .any(|&(df, dr)| self.holds(target.offset(df, dr), by, &[PieceType::King]))
    }
}
