//! # Scribe API Server
//!
//! The main entry point for the Actix-web HTTP server.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

use scribe_core::ports::{PasswordService, TokenService};

mod config;
mod handlers;
mod middleware;
mod state;
mod telemetry;

use config::AppConfig;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Scribe API Server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(config.database.as_ref()).await;
    let (token_service, password_service) = auth_services();

    HttpServer::new(move || {
        let mut app = App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .app_data(handlers::json_config())
            .app_data(handlers::query_config())
            .configure(handlers::configure_routes);

        if let Some(tokens) = &token_service {
            app = app.app_data(web::Data::new(Arc::clone(tokens)));
        }
        if let Some(passwords) = &password_service {
            app = app.app_data(web::Data::new(Arc::clone(passwords)));
        }
        app
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}

type AuthServices = (
    Option<Arc<dyn TokenService>>,
    Option<Arc<dyn PasswordService>>,
);

#[cfg(feature = "auth")]
fn auth_services() -> AuthServices {
    use scribe_infra::auth::{Argon2PasswordService, JwtTokenService};

    let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::from_env());
    let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());
    (Some(tokens), Some(passwords))
}

#[cfg(not(feature = "auth"))]
fn auth_services() -> AuthServices {
    tracing::warn!("Built without auth feature - protected routes will reject every request");
    (None, None)
}
