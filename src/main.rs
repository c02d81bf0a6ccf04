use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use tasklite::{db, routes, AppError, Config};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(fatal)?;
    let pool = db::connect(&config.database_url, config.database_max_connections)
        .await
        .map_err(fatal)?;
    let pool = web::Data::new(pool);
    let auth_settings = web::Data::new(config.auth.clone());

    log::info!("Starting tasklite server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(pool.clone())
            .app_data(auth_settings.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}

fn fatal(err: AppError) -> std::io::Error {
    log::error!("{}", err);
    std::io::Error::new(std::io::ErrorKind::Other, err.to_string())
}
