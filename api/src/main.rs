use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use dotenv::dotenv;
use log::info;

mod dto;
mod handlers;
mod middleware;
mod routes;

use middleware::auth::JwtAuth;
use routes::auth::AppState;

use sentra_core::repositories::audit::NoopAuditSink;
use sentra_core::services::auth::{AuthService, MockCredentialVerifier, VerifiedIdentity};
use sentra_core::services::key::KeyManager;
use sentra_core::services::revocation::RevocationService;
use sentra_core::services::rotation::RotationEngine;
use sentra_core::services::token::{TokenIssuer, TokenPolicy};
use sentra_infra::{DatabasePool, MySqlSessionStore};
use sentra_shared::config::AppConfig;

type Store = MySqlSessionStore;
type Audit = NoopAuditSink;
type Verifier = MockCredentialVerifier;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting Sentra auth service");

    let config = AppConfig::from_env();
    let policy = TokenPolicy::from_env();

    // Storage backend
    let pool = DatabasePool::new(config.database.clone())
        .await
        .map_err(to_io_error)?;
    let store = Arc::new(MySqlSessionStore::new(&pool));

    // Audit events go to the external collaborator; without one wired,
    // the no-op sink logs and drops them.
    let audit = Arc::new(NoopAuditSink::new());

    // Key ring and token issuance
    let key_manager = Arc::new(KeyManager::new(policy.key_overlap_window()).map_err(to_io_error)?);
    let token_issuer = Arc::new(TokenIssuer::new(key_manager.clone(), policy.clone()));

    // Credential verification is an external collaborator. The in-memory
    // verifier stands in for it here; seed one account from the
    // environment for local development, otherwise every login is refused.
    let verifier = Arc::new(dev_verifier());

    let auth_service = Arc::new(AuthService::new(
        store.clone(),
        verifier,
        token_issuer.clone(),
        policy.clone(),
    ));
    let rotation_engine = Arc::new(RotationEngine::new(
        store.clone(),
        audit.clone(),
        token_issuer.clone(),
        policy.clone(),
    ));
    let revocation_service = Arc::new(RevocationService::new(store.clone(), audit.clone()));

    let state = web::Data::new(AppState::<Store, Audit, Verifier> {
        auth_service,
        rotation_engine,
        revocation_service,
        session_store: store,
        token_issuer: token_issuer.clone(),
        key_manager,
    });

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {bind_address}");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_methods(vec!["GET", "POST", "DELETE"])
            .allow_any_header()
            .max_age(config.server.cors.max_age);

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(state.clone())
            .service(
                web::scope("/api/v1/auth")
                    .route(
                        "/login",
                        web::post().to(routes::auth::login::login::<Store, Audit, Verifier>),
                    )
                    .route(
                        "/refresh",
                        web::post()
                            .to(routes::auth::refresh::refresh_token::<Store, Audit, Verifier>),
                    )
                    .route(
                        "/keys",
                        web::get().to(routes::keys::public_keys::<Store, Audit, Verifier>),
                    )
                    .service(
                        web::scope("")
                            .wrap(JwtAuth::new(token_issuer.clone()))
                            .route(
                                "/logout",
                                web::post()
                                    .to(routes::auth::logout::logout::<Store, Audit, Verifier>),
                            )
                            .route(
                                "/sessions",
                                web::get().to(
                                    routes::auth::sessions::list_sessions::<Store, Audit, Verifier>,
                                ),
                            )
                            .route(
                                "/sessions/{sid}",
                                web::delete().to(
                                    routes::auth::sessions::revoke_session::<
                                        Store,
                                        Audit,
                                        Verifier,
                                    >,
                                ),
                            ),
                    ),
            )
            .route("/health", web::get().to(health))
    })
    .bind(bind_address)?
    .run()
    .await
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "healthy" }))
}

/// In-memory stand-in for the external credential collaborator
fn dev_verifier() -> MockCredentialVerifier {
    let username = std::env::var("DEV_LOGIN_USERNAME").ok();
    let password = std::env::var("DEV_LOGIN_PASSWORD").ok();

    match (username, password) {
        (Some(username), Some(password)) => {
            info!("seeding development login account: {username}");
            MockCredentialVerifier::new().with_account(
                username,
                password,
                VerifiedIdentity {
                    user_id: uuid::Uuid::new_v4(),
                    scope: "session".to_string(),
                    roles: vec!["user".to_string()],
                },
            )
        }
        _ => MockCredentialVerifier::new(),
    }
}

fn to_io_error(error: sentra_core::errors::DomainError) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, error.to_string())
}
