use actix::Message;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::game::{Color, WireBoard};

/// Action sent from client to server.
///
/// `type` selects the action; the other fields are read only by the actions
/// that need them.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientMessage {
    #[serde(rename = "type")]
    pub message_type: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub promotion: Option<String>,
}

/// The part a session plays in its room.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    White,
    Black,
    Spectator,
}

impl Role {
    pub fn color(self) -> Option<Color> {
        match self {
            Self::White => Some(Color::White),
            Self::Black => Some(Color::Black),
            Self::Spectator => None,
        }
    }
}

impl From<Color> for Role {
    fn from(color: Color) -> Self {
        match color {
            Color::White => Self::White,
            Color::Black => Self::Black,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::White => write!(f, "WHITE"),
            Self::Black => write!(f, "BLACK"),
            Self::Spectator => write!(f, "Spectator"),
        }
    }
}

/// Message sent from server to client; also the actor message a session
/// receives for delivery.
#[derive(Message, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[rtype(result = "()")]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerMessage {
    State {
        board: WireBoard,
        turn: Color,
        #[serde(rename = "self")]
        role: Role,
        message: String,
    },
    Info {
        message: String,
    },
    Error {
        message: String,
    },
}

impl ServerMessage {
    pub fn info(message: impl Into<String>) -> Self {
        Self::Info {
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::State { message, .. } | Self::Info { message } | Self::Error { message } => {
                message
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Board;
    use serde_json::json;

    #[test]
    fn client_message_optional_fields() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"move","from":"e2","to":"e4"}"#).unwrap();
        assert_eq!(msg.message_type, "move");
        assert_eq!(msg.from.as_deref(), Some("e2"));
        assert_eq!(msg.to.as_deref(), Some("e4"));
        assert_eq!(msg.promotion, None);
        assert_eq!(msg.name, None);

        assert!(serde_json::from_str::<ClientMessage>(r#"{"name":"x"}"#).is_err());
    }

    #[test]
    fn state_wire_shape() {
        let msg = ServerMessage::State {
            board: Board::initial().to_wire(),
            turn: Color::White,
            role: Role::Spectator,
            message: "hello".to_string(),
        };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "state");
        assert_eq!(value["turn"], "WHITE");
        assert_eq!(value["self"], "SPECTATOR");
        assert_eq!(value["message"], "hello");
        assert_eq!(value["board"][0][4], "wK");
        assert_eq!(value["board"][7][3], "bQ");
        assert_eq!(value["board"][3][3], serde_json::Value::Null);
    }

    #[test]
    fn info_and_error_wire_shape() {
        assert_eq!(
            serde_json::to_value(ServerMessage::info("joined")).unwrap(),
            json!({"type": "info", "message": "joined"})
        );
        assert_eq!(
            serde_json::to_value(ServerMessage::error("Not your turn.")).unwrap(),
            json!({"type": "error", "message": "Not your turn."})
        );
    }
}
