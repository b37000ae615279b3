use actix::prelude::*;
use log::{debug, info};
use std::collections::HashMap;

use crate::game::Board;
use crate::models::{ClientMessage, Role, ServerMessage};
use crate::room::{GameRoom, Outbound, SessionId};

/// A session entering the room, with the address its payloads go to.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Join {
    pub session: SessionId,
    pub recipient: Recipient<ServerMessage>,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct Leave {
    pub session: SessionId,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct SetName {
    pub session: SessionId,
    pub name: String,
}

/// A decoded client frame.
#[derive(Message)]
#[rtype(result = "()")]
pub struct ClientAction {
    pub session: SessionId,
    pub message: ClientMessage,
}

/// Read-only view of the room, mainly for diagnostics.
#[derive(Message)]
#[rtype(result = "RoomSnapshot")]
pub struct GetSnapshot;

#[derive(Debug, Clone)]
pub struct RoomSnapshot {
    pub board: Board,
    pub participants: usize,
    pub roles: Vec<(SessionId, Role)>,
}

/// Owns one [`GameRoom`]. The mailbox runs room operations strictly one at a
/// time; payloads are pushed to session mailboxes and never awaited here.
pub struct RoomActor {
    room: GameRoom,
    sessions: HashMap<SessionId, Recipient<ServerMessage>>,
}

impl RoomActor {
    pub fn new(room: GameRoom) -> Self {
        Self {
            room,
            sessions: HashMap::new(),
        }
    }

    fn deliver(&self, outbound: Vec<Outbound>) {
        for Outbound { to, message } in outbound {
            match self.sessions.get(&to) {
                Some(recipient) if recipient.connected() => recipient.do_send(message),
                Some(_) => debug!("Session {} is gone, dropping {:?}", to, message.message()),
                None => debug!("No recipient for session {} in room {}", to, self.room.id()),
            }
        }
    }
}

impl Actor for RoomActor {
    type Context = Context<Self>;

    fn started(&mut self, _: &mut Self::Context) {
        info!("Room {} started", self.room.id());
    }
}

impl Handler<Join> for RoomActor {
    type Result = ();

    fn handle(&mut self, msg: Join, _: &mut Self::Context) {
        self.sessions.insert(msg.session, msg.recipient);
        let outbound = self.room.join(msg.session);
        self.deliver(outbound);
    }
}

impl Handler<Leave> for RoomActor {
    type Result = ();

    fn handle(&mut self, msg: Leave, _: &mut Self::Context) {
        self.sessions.remove(&msg.session);
        let outbound = self.room.leave(msg.session);
        self.deliver(outbound);
    }
}

impl Handler<SetName> for RoomActor {
    type Result = ();

    fn handle(&mut self, msg: SetName, _: &mut Self::Context) {
        let outbound = self.room.set_name(msg.session, msg.name);
        self.deliver(outbound);
    }
}

impl Handler<ClientAction> for RoomActor {
    type Result = ();

    fn handle(&mut self, msg: ClientAction, _: &mut Self::Context) {
        let outbound = self.room.handle_message(msg.session, msg.message);
        self.deliver(outbound);
    }
}

impl Handler<GetSnapshot> for RoomActor {
    type Result = MessageResult<GetSnapshot>;

    fn handle(&mut self, _: GetSnapshot, _: &mut Self::Context) -> Self::Result {
        MessageResult(RoomSnapshot {
            board: self.room.board().clone(),
            participants: self.room.participant_count(),
            roles: self
                .sessions
                .keys()
                .map(|session| (*session, self.room.role_of(*session)))
                .collect(),
        })
    }
}
