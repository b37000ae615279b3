//! Per-room turn arbitration and the registry of rooms.

pub mod actor;
pub mod game_room;
pub mod manager;

pub use actor::{ClientAction, GetSnapshot, Join, Leave, RoomActor, RoomSnapshot, SetName};
pub use game_room::{GameRoom, Outbound, SessionId};
pub use manager::GameRoomManager;
