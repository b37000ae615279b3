//! Two-player chess rooms over WebSocket: a move-legality engine plus
//! per-room turn arbitration that fans positions out to every participant.

pub mod config;
pub mod error;
pub mod game;
pub mod models;
pub mod room;
pub mod routes;
pub mod websocket;
