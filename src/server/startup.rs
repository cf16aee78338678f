use sea_orm::DatabaseConnection;
use tower_sessions::{MemoryStore, SessionManagerLayer};

use crate::server::{
    config::Config, error::Error, model::app::AppState, service::cookie::IdentityCookieCodec,
};

/// Connect to the database and run migrations
pub async fn connect_to_database(config: &Config) -> Result<DatabaseConnection, Error> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Configure session management
///
/// Sessions live in process memory. A visitor whose session is lost on restart is logged back
/// in from their remember-me cookie.
pub fn connect_to_session() -> SessionManagerLayer<MemoryStore> {
    use time::Duration;
    use tower_sessions::{cookie::SameSite, Expiry};

    // Set secure based on build mode: in development (debug) use false, otherwise true.
    let development_mode = cfg!(debug_assertions);
    let secure_cookies = !development_mode;

    SessionManagerLayer::new(MemoryStore::default())
        .with_secure(secure_cookies)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(Duration::days(7)))
}

/// Build the shared application state
pub fn build_app_state(config: &Config, db: DatabaseConnection) -> AppState {
    AppState {
        db,
        auth: std::sync::Arc::new(config.auth.clone()),
        codec: IdentityCookieCodec::new(config.cookie_secret.as_bytes()),
    }
}
