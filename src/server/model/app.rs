use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::server::{config::AuthConfig, service::cookie::IdentityCookieCodec};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub auth: Arc<AuthConfig>,
    pub codec: IdentityCookieCodec,
}

/// Builds a state with the default [`AuthConfig`] from a connection and a cookie secret.
impl From<(DatabaseConnection, Vec<u8>)> for AppState {
    fn from((db, secret): (DatabaseConnection, Vec<u8>)) -> Self {
        Self {
            db,
            auth: Arc::new(AuthConfig::default()),
            codec: IdentityCookieCodec::new(secret),
        }
    }
}
