use sqlx::PgPool;

use crate::auth::{AuthConfig, JwtService};
use crate::config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    auth_config: AuthConfig,
    jwt_service: JwtService,
    server_config: ServerConfig,
}

impl AppState {
    pub fn new(db: PgPool) -> anyhow::Result<Self> {
        let auth_config = AuthConfig::from_env()?;
        let server_config = ServerConfig::from_env()?;
        Ok(Self::with_config(db, auth_config, server_config))
    }

    pub fn with_config(db: PgPool, auth_config: AuthConfig, server_config: ServerConfig) -> Self {
        let jwt_service = JwtService::new(&auth_config);

        Self {
            db,
            auth_config,
            jwt_service,
            server_config,
        }
    }

    pub fn auth_config(&self) -> &AuthConfig {
        &self.auth_config
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    pub fn server_config(&self) -> &ServerConfig {
        &self.server_config
    }
}
