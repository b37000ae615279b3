use actix_web::{web, App, HttpServer};
use log::info;

use chess_rooms::config::{ServerConfig, DEFAULT_LOG_FILTER, LOG_ENV};
use chess_rooms::room::GameRoomManager;
use chess_rooms::routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().filter_or(LOG_ENV, DEFAULT_LOG_FILTER));

    let config = ServerConfig::from_env();
    info!("Starting chess room server at http://{}", config.bind_addr);

    // One registry for the whole process, shared by every worker
    let rooms = web::Data::new(GameRoomManager::new());
    let bind_addr = config.bind_addr.clone();

    HttpServer::new(move || {
        let config = config.clone();
        App::new()
            .app_data(rooms.clone())
            .configure(move |cfg| routes::configure_routes(cfg, &config))
    })
    .bind(bind_addr)?
    .run()
    .await
}
