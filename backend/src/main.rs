mod config;
mod db;
mod docx;
mod error;
mod services;
mod store;

use actix_web::{web, App, HttpServer};
use env_logger::Env;
use log::info;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let settings = config::Settings::from_env();

    db::init_schema(&settings.db_path)
        .map_err(|e| std::io::Error::other(format!("database setup failed: {}", e)))?;
    std::fs::create_dir_all(&settings.storage_dir)?;

    let bind = (settings.host.clone(), settings.port);
    info!("Server running at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .app_data(
                web::JsonConfig::default()
                    .limit(settings.max_upload_bytes)
                    .error_handler(error::json_error_handler),
            )
            .app_data(web::Data::new(settings.clone()))
            .service(services::layouts::configure_routes())
            .service(services::drafts::configure_routes())
            .route("/api/health", web::get().to(services::health))
    })
    .bind(bind)?
    .run()
    .await
}
