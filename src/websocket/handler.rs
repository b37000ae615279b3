use actix::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use log::{info, warn};
use uuid::Uuid;

use crate::models::{ClientMessage, ServerMessage};
use crate::room::{ClientAction, GameRoomManager, Join, Leave, RoomActor, SessionId};

/// WebSocket session: one connection seated in one room.
pub struct ChessWebSocket {
    pub id: SessionId,
    pub room_id: String,
    pub room: Addr<RoomActor>,
}

impl ChessWebSocket {
    pub fn new(room_id: String, room: Addr<RoomActor>) -> Self {
        Self {
            id: Uuid::new_v4(),
            room_id,
            room,
        }
    }

    fn send(&self, message: &ServerMessage, ctx: &mut ws::WebsocketContext<Self>) {
        match serde_json::to_string(message) {
            Ok(text) => ctx.text(text),
            Err(e) => warn!("Error serializing message for {}: {}", self.id, e),
        }
    }

    fn handle_text(&self, text: &str, ctx: &mut ws::WebsocketContext<Self>) {
        match serde_json::from_str::<ClientMessage>(text) {
            Ok(message) => {
                info!("Session {} sent {:?}", self.id, message.message_type);
                self.room.do_send(ClientAction {
                    session: self.id,
                    message,
                });
            }
            Err(e) => {
                warn!("Error parsing client message from {}: {}", self.id, e);
                self.send(
                    &ServerMessage::error(format!("Invalid message format: {e}")),
                    ctx,
                );
            }
        }
    }
}

impl Actor for ChessWebSocket {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!("Session {} opened room {}", self.id, self.room_id);
        self.room.do_send(Join {
            session: self.id,
            recipient: ctx.address().recipient(),
        });
    }

    fn stopping(&mut self, _: &mut Self::Context) -> Running {
        self.room.do_send(Leave { session: self.id });
        info!("Session {} closed room {}", self.id, self.room_id);
        Running::Stop
    }
}

impl Handler<ServerMessage> for ChessWebSocket {
    type Result = ();

    fn handle(&mut self, msg: ServerMessage, ctx: &mut Self::Context) {
        self.send(&msg, ctx);
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for ChessWebSocket {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Text(text)) => self.handle_text(&text, ctx),
            Ok(ws::Message::Ping(msg)) => ctx.pong(&msg),
            Ok(ws::Message::Pong(_)) => {}
            Ok(ws::Message::Binary(_)) => {
                warn!("Binary messages are not supported");
                self.send(&ServerMessage::error("Binary messages are not supported"), ctx);
            }
            Ok(ws::Message::Close(reason)) => {
                info!("Connection {} closed: {:?}", self.id, reason);
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) | Ok(ws::Message::Nop) => {}
            Err(e) => {
                warn!("Error in session {} room {}: {}", self.id, self.room_id, e);
                ctx.stop();
            }
        }
    }
}

/// WebSocket upgrade for `/ws/chess/{room_id}`.
pub async fn ws_index(
    req: HttpRequest,
    stream: web::Payload,
    room_id: web::Path<String>,
    rooms: web::Data<GameRoomManager>,
) -> Result<HttpResponse, Error> {
    let room_id = room_id.into_inner();
    let room = rooms.get_room(&room_id);
    info!("New WebSocket connection for room {} ({} rooms live)", room_id, rooms.room_count());

    ws::start(ChessWebSocket::new(room_id, room), &req, stream)
}
