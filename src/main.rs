use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use sqlx::PgPool;

use listkeeper::auth::{AuthMiddleware, TokenService};
use listkeeper::config::Config;
use listkeeper::mailer::EmailSender;
use listkeeper::routes::{self, health};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let pool = PgPool::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    let tokens = TokenService::new(config.jwt_secret.clone());
    let mailer = EmailSender::new(config.resend_api_key.clone(), config.mail_from.clone());

    let bind_addr = (config.server_host.clone(), config.server_port);
    log::info!("Starting listkeeper server at {}", config.server_url());

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(tokens.clone()))
            .app_data(web::Data::new(mailer.clone()))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .configure(routes::config),
            )
    })
    .bind(bind_addr)?
    .run()
    .await
}
