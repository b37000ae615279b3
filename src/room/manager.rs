use actix::{Actor, Addr};
use log::info;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::room::{GameRoom, RoomActor};

/// Registry of live rooms, keyed by room id.
///
/// Built once at startup and shared with the HTTP layer. Rooms are started on
/// first reference and kept for the life of the process.
#[derive(Default)]
pub struct GameRoomManager {
    rooms: Mutex<HashMap<String, Addr<RoomActor>>>,
}

impl GameRoomManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Address of room `id`, starting it if this is the first reference.
    ///
    /// Must be called from inside an actix system.
    pub fn get_room(&self, id: &str) -> Addr<RoomActor> {
        let mut rooms = self.rooms.lock().unwrap_or_else(PoisonError::into_inner);
        rooms
            .entry(id.to_string())
            .or_insert_with(|| {
                info!("Creating room {}", id);
                RoomActor::new(GameRoom::new(id)).start()
            })
            .clone()
    }

    pub fn room_count(&self) -> usize {
        self.rooms
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
