use log::{debug, info};
use uuid::Uuid;

use crate::error::RoomError;
use crate::game::{Board, Color, Move, PieceType, Position};
use crate::models::{ClientMessage, Role, ServerMessage};

pub type SessionId = Uuid;

/// A payload addressed to one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    pub to: SessionId,
    pub message: ServerMessage,
}

#[derive(Debug, Clone)]
struct Participant {
    session: SessionId,
    role: Role,
    name: Option<String>,
}

/// Turn arbitration for one room.
///
/// Every operation returns the payloads it produced, in delivery order. The
/// owner is responsible for running operations one at a time.
#[derive(Debug)]
pub struct GameRoom {
    id: String,
    board: Board,
    participants: Vec<Participant>,
}

impl GameRoom {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            board: Board::initial(),
            participants: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    /// Role of `session`; unknown sessions are treated as spectators.
    pub fn role_of(&self, session: SessionId) -> Role {
        self.participant(session).map_or(Role::Spectator, |p| p.role)
    }

    pub fn join(&mut self, session: SessionId) -> Vec<Outbound> {
        if self.participant(session).is_none() {
            let role = [Color::White, Color::Black]
                .into_iter()
                .map(Role::from)
                .find(|role| !self.is_taken(*role))
                .unwrap_or(Role::Spectator);
            info!("Session {} joined room {} as {}", session, self.id, role);
            self.participants.push(Participant {
                session,
                role,
                name: None,
            });
        }

        let mut out = vec![self.state_for(session, format!("Welcome to room {}.", self.id))];
        out.extend(self.broadcast_info(format!("{} joined.", self.display_name(session))));
        out
    }

    pub fn leave(&mut self, session: SessionId) -> Vec<Outbound> {
        let name = match self.participants.iter().position(|p| p.session == session) {
            Some(index) => {
                let gone = self.participants.remove(index);
                info!("Session {} left room {} ({})", session, self.id, gone.role);
                gone.name
            }
            None => None,
        };
        let who = name.unwrap_or_else(|| "A player".to_string());
        self.broadcast_info(format!("{who} left."))
    }

    pub fn set_name(&mut self, session: SessionId, name: impl Into<String>) -> Vec<Outbound> {
        if let Some(participant) = self.participants.iter_mut().find(|p| p.session == session) {
            participant.name = Some(name.into());
        }
        self.broadcast_info(format!("{} is here.", self.display_name(session)))
    }

    /// Dispatch one client action.
    pub fn handle_message(&mut self, session: SessionId, msg: ClientMessage) -> Vec<Outbound> {
        match msg.message_type.as_str() {
            "join" => {
                let mut out = match msg.name {
                    Some(name) => self.set_name(session, name),
                    None => Vec::new(),
                };
                out.push(self.state_for(session, format!("Joined room {}.", self.id)));
                out
            }
            "move" => match self.try_move(session, &msg) {
                Ok(annotation) => self.broadcast_state(annotation),
                Err(err) => {
                    debug!("Rejected move from {} in room {}: {}", session, self.id, err);
                    vec![Self::error_to(session, &err)]
                }
            },
            other => {
                let err = RoomError::UnknownMessageType(other.to_string());
                vec![Self::error_to(session, &err)]
            }
        }
    }

    fn try_move(&mut self, session: SessionId, msg: &ClientMessage) -> Result<String, RoomError> {
        let (from, to) = match (msg.from.as_deref(), msg.to.as_deref()) {
            (Some(from), Some(to)) => (from, to),
            _ => return Err(RoomError::InvalidMoveMessage),
        };
        let player = self.role_of(session).color().ok_or(RoomError::SpectatorMove)?;
        if self.board.turn() != player {
            return Err(RoomError::NotYourTurn);
        }

        let promotion = msg
            .promotion
            .as_deref()
            .and_then(PieceType::from_promotion_name);
        let mv = Move::with_promotion(
            Position::from_algebraic(from)?,
            Position::from_algebraic(to)?,
            promotion,
        );
        if !self.board.apply_move_if_legal(&mv) {
            return Err(RoomError::IllegalMove);
        }

        info!("Room {}: {} played {}", self.id, player, mv);
        Ok(format!("{} played {}-{}.", self.display_name(session), from, to))
    }

    fn participant(&self, session: SessionId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.session == session)
    }

    fn is_taken(&self, role: Role) -> bool {
        self.participants.iter().any(|p| p.role == role)
    }

    fn display_name(&self, session: SessionId) -> String {
        let participant = self.participant(session);
        let name = participant
            .and_then(|p| p.name.as_deref())
            .filter(|n| !n.trim().is_empty())
            .unwrap_or("Player");
        let role = participant.map_or(Role::Spectator, |p| p.role);
        format!("{name} ({role})")
    }

    fn state_for(&self, session: SessionId, message: String) -> Outbound {
        Outbound {
            to: session,
            message: ServerMessage::State {
                board: self.board.to_wire(),
                turn: self.board.turn(),
                role: self.role_of(session),
                message,
            },
        }
    }

    fn error_to(session: SessionId, err: &RoomError) -> Outbound {
        Outbound {
            to: session,
            message: ServerMessage::error(err.to_string()),
        }
    }

    fn broadcast_info(&self, message: String) -> Vec<Outbound> {
        self.participants
            .iter()
            .map(|p| Outbound {
                to: p.session,
                message: ServerMessage::info(message.clone()),
            })
            .collect()
    }

    fn broadcast_state(&self, message: String) -> Vec<Outbound> {
        self.participants
            .iter()
            .map(|p| self.state_for(p.session, message.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn move_msg(from: &str, to: &str) -> ClientMessage {
        ClientMessage {
            message_type: "move".to_string(),
            from: Some(from.to_string()),
            to: Some(to.to_string()),
            ..Default::default()
        }
    }

    fn messages_for(out: &[Outbound], session: SessionId) -> Vec<&ServerMessage> {
        out.iter()
            .filter(|o| o.to == session)
            .map(|o| &o.message)
            .collect()
    }

    fn only_error(out: &[Outbound], session: SessionId) -> String {
        assert_eq!(out.len(), 1, "expected a single reply, got {out:?}");
        assert_eq!(out[0].to, session);
        match &out[0].message {
            ServerMessage::Error { message } => message.clone(),
            other => panic!("expected error, got {other:?}"),
        }
    }

    fn seated_room() -> (GameRoom, SessionId, SessionId) {
        let mut room = GameRoom::new("lobby");
        let white = Uuid::new_v4();
        let black = Uuid::new_v4();
        room.join(white);
        room.join(black);
        (room, white, black)
    }

    #[test]
    fn seats_white_then_black_then_spectators() {
        let (mut room, white, black) = seated_room();
        let third = Uuid::new_v4();
        let fourth = Uuid::new_v4();
        room.join(third);
        room.join(fourth);

        assert_eq!(room.role_of(white), Role::White);
        assert_eq!(room.role_of(black), Role::Black);
        assert_eq!(room.role_of(third), Role::Spectator);
        assert_eq!(room.role_of(fourth), Role::Spectator);
        assert_eq!(room.participant_count(), 4);
    }

    #[test]
    fn join_sends_snapshot_then_broadcasts_notice() {
        let mut room = GameRoom::new("r1");
        let first = Uuid::new_v4();
        room.join(first);

        let second = Uuid::new_v4();
        let out = room.join(second);
        assert_eq!(out.len(), 3);

        match &out[0].message {
            ServerMessage::State {
                turn, role, message, ..
            } => {
                assert_eq!(out[0].to, second);
                assert_eq!(*turn, Color::White);
                assert_eq!(*role, Role::Black);
                assert_eq!(message, "Welcome to room r1.");
            }
            other => panic!("expected state, got {other:?}"),
        }
        for session in [first, second] {
            assert_eq!(
                messages_for(&out[1..], session),
                vec![&ServerMessage::info("Player (BLACK) joined.")]
            );
        }
    }

    #[test]
    fn rejoining_keeps_the_seat() {
        let (mut room, white, _) = seated_room();
        room.join(white);
        assert_eq!(room.role_of(white), Role::White);
        assert_eq!(room.participant_count(), 2);
    }

    #[test]
    fn vacated_color_is_reassigned() {
        let (mut room, white, black) = seated_room();
        let spectator = Uuid::new_v4();
        room.join(spectator);

        let out = room.leave(white);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|o| o.message == ServerMessage::info("A player left.")));
        assert!(messages_for(&out, white).is_empty());

        let newcomer = Uuid::new_v4();
        room.join(newcomer);
        assert_eq!(room.role_of(newcomer), Role::White);
        assert_eq!(room.role_of(black), Role::Black);
        assert_eq!(room.role_of(spectator), Role::Spectator);
    }

    #[test]
    fn leave_announces_the_name() {
        let (mut room, white, _) = seated_room();
        room.set_name(white, "Ada");
        let out = room.leave(white);
        assert_eq!(out[0].message, ServerMessage::info("Ada left."));
    }

    #[test]
    fn rename_broadcasts_and_resends_snapshot() {
        let (mut room, white, black) = seated_room();
        let out = room.handle_message(
            black,
            ClientMessage {
                message_type: "join".to_string(),
                name: Some("Bob".to_string()),
                ..Default::default()
            },
        );

        assert_eq!(out.len(), 3);
        assert_eq!(
            messages_for(&out, white),
            vec![&ServerMessage::info("Bob (BLACK) is here.")]
        );
        let own = messages_for(&out, black);
        assert_eq!(own[0], &ServerMessage::info("Bob (BLACK) is here."));
        assert!(matches!(
            own[1],
            ServerMessage::State { role: Role::Black, message, .. } if message == "Joined room lobby."
        ));
    }

    #[test]
    fn name_from_unseated_session_is_not_recorded() {
        let (mut room, white, _) = seated_room();
        let stranger = Uuid::new_v4();

        let out = room.set_name(stranger, "Eve");
        assert_eq!(out.len(), 2);
        assert!(messages_for(&out, stranger).is_empty());
        assert!(out
            .iter()
            .all(|o| o.message == ServerMessage::info("Player (Spectator) is here.")));
        assert_eq!(room.participant_count(), 2);

        room.join(stranger);
        let out = room.leave(stranger);
        assert_eq!(messages_for(&out, white), vec![&ServerMessage::info("A player left.")]);
    }

    #[test]
    fn blank_name_displays_as_player() {
        let (mut room, white, _) = seated_room();
        let out = room.set_name(white, "   ");
        assert_eq!(out[0].message, ServerMessage::info("Player (WHITE) is here."));
    }

    #[test]
    fn legal_move_is_broadcast_to_everyone() {
        let (mut room, white, black) = seated_room();
        let spectator = Uuid::new_v4();
        room.join(spectator);
        room.set_name(white, "Ada");

        let out = room.handle_message(white, move_msg("e2", "e4"));
        assert_eq!(out.len(), 3);
        for (session, expected_role) in [
            (white, Role::White),
            (black, Role::Black),
            (spectator, Role::Spectator),
        ] {
            match messages_for(&out, session).as_slice() {
                [ServerMessage::State {
                    board,
                    turn,
                    role,
                    message,
                }] => {
                    assert_eq!(*turn, Color::Black);
                    assert_eq!(*role, expected_role);
                    assert_eq!(message, "Ada (WHITE) played e2-e4.");
                    assert_eq!(board[3][4].as_deref(), Some("wP"));
                    assert_eq!(board[1][4], None);
                }
                other => panic!("unexpected delivery {other:?}"),
            }
        }
        assert_eq!(room.board().turn(), Color::Black);
    }

    #[test]
    fn out_of_turn_move_is_rejected() {
        let (mut room, white, black) = seated_room();
        let before = room.board().clone();

        let out = room.handle_message(black, move_msg("e7", "e5"));
        assert_eq!(only_error(&out, black), "Not your turn.");
        assert_eq!(room.board(), &before);

        room.handle_message(white, move_msg("e2", "e4"));
        let out = room.handle_message(black, move_msg("e7", "e5"));
        assert_eq!(out.len(), 2);
        assert_eq!(room.board().turn(), Color::White);
    }

    #[test]
    fn spectator_cannot_move() {
        let (mut room, _, _) = seated_room();
        let spectator = Uuid::new_v4();
        room.join(spectator);
        let before = room.board().clone();

        let out = room.handle_message(spectator, move_msg("e2", "e4"));
        assert_eq!(only_error(&out, spectator), "Spectators cannot move.");
        assert_eq!(room.board(), &before);
    }

    #[test]
    fn illegal_and_malformed_moves_are_rejected() {
        let (mut room, white, _) = seated_room();
        let before = room.board().clone();

        let out = room.handle_message(white, move_msg("e2", "e5"));
        assert_eq!(only_error(&out, white), "Illegal move.");

        let out = room.handle_message(white, move_msg("e2", "z9"));
        assert_eq!(only_error(&out, white), "Invalid square: z9");

        let mut missing = move_msg("e2", "e4");
        missing.to = None;
        let out = room.handle_message(white, missing);
        assert_eq!(only_error(&out, white), "Invalid move message");

        assert_eq!(room.board(), &before);
    }

    #[test]
    fn unknown_message_type_is_named() {
        let (mut room, white, _) = seated_room();
        let out = room.handle_message(
            white,
            ClientMessage {
                message_type: "resign".to_string(),
                ..Default::default()
            },
        );
        assert_eq!(only_error(&out, white), "Unknown message type: resign");
    }

    #[test]
    fn unparsable_promotion_defaults_to_queen() {
        let (mut room, white, black) = seated_room();
        let script = [
            (white, "a2", "a4"),
            (black, "b7", "b5"),
            (white, "a4", "b5"),
            (black, "h7", "h6"),
            (white, "b5", "b6"),
            (black, "h6", "h5"),
            (white, "b6", "a7"),
            (black, "h5", "h4"),
        ];
        for (session, from, to) in script {
            let out = room.handle_message(session, move_msg(from, to));
            assert!(
                matches!(out[0].message, ServerMessage::State { .. }),
                "{from}-{to} failed: {out:?}"
            );
        }

        let mut promote = move_msg("a7", "b8");
        promote.promotion = Some("dragon".to_string());
        room.handle_message(white, promote);
        let b8 = Position::from_algebraic("b8").unwrap();
        assert_eq!(room.board().get(b8).unwrap().code(), "wQ");
    }

    #[test]
    fn requested_promotion_is_used() {
        let (mut room, white, black) = seated_room();
        let script = [
            (white, "h2", "h4"),
            (black, "g7", "g5"),
            (white, "h4", "g5"),
            (black, "a7", "a6"),
            (white, "g5", "g6"),
            (black, "a6", "a5"),
            (white, "g6", "h7"),
            (black, "a5", "a4"),
        ];
        for (session, from, to) in script {
            room.handle_message(session, move_msg(from, to));
        }
        let mut promote = move_msg("h7", "g8");
        promote.promotion = Some("knight".to_string());
        room.handle_message(white, promote);
        let g8 = Position::from_algebraic("g8").unwrap();
        assert_eq!(room.board().get(g8).unwrap().code(), "wN");
        assert_eq!(room.board().turn(), Color::Black);
    }
}
