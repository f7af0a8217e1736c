//! Server configuration loaded from the environment.

use jobgrid_db::DbConfig;

/// Process configuration.
///
/// Everything except the signing secret has a development default; the
/// secret is validated separately at startup and has none.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub environment: String,
    pub jwt_secret: String,
    pub db: DbConfig,
}

impl AppConfig {
    pub fn load() -> Self {
        Self {
            port: env_or("PORT", "8080").parse().unwrap_or(8080),
            environment: env_or("ENVIRONMENT", "development"),
            jwt_secret: env_or("JWT_SECRET", ""),
            db: DbConfig {
                url: env_or("DATABASE_URL", "127.0.0.1:8000"),
                namespace: env_or("DATABASE_NAMESPACE", "jobgrid"),
                database: env_or("DATABASE_NAME", "main"),
                username: env_or("DATABASE_USER", "root"),
                password: env_or("DATABASE_PASSWORD", "root"),
            },
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
