use actix_files as fs;
use actix_web::{web, HttpResponse, Responder};
use log::{info, warn};

use crate::config::ServerConfig;

/// HTTP handler for the index page
pub async fn index() -> impl Responder {
    HttpResponse::Ok().body("Chess rooms: connect a WebSocket to /ws/chess/{room_id}")
}

/// Configure the HTTP routes
pub fn configure_routes(cfg: &mut web::ServiceConfig, config: &ServerConfig) {
    cfg.service(
        web::resource("/ws/chess/{room_id}").route(web::get().to(crate::websocket::ws_index)),
    )
    .service(web::resource("/").route(web::get().to(index)));

    if config.static_dir.is_dir() {
        info!("Serving static files from {}", config.static_dir.display());
        cfg.service(fs::Files::new("/static", config.static_dir.clone()).index_file("index.html"));
    } else {
        warn!(
            "Static directory {} not found; /static is disabled",
            config.static_dir.display()
        );
    }
}
