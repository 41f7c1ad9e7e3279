//! Server configuration, read from flags or `AFFILIATE_*` environment
//! variables.

use std::net::SocketAddr;

use affiliate_db::DbConfig;
use affiliate_service::ServiceConfig;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "affiliate-server", version, about = "Organization affiliation service")]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    #[arg(long, env = "AFFILIATE_BIND", default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,

    /// SurrealDB endpoint; `mem://` runs an embedded in-memory store.
    #[arg(long, env = "AFFILIATE_DB_URL", default_value = "ws://127.0.0.1:8000")]
    pub db_url: String,

    #[arg(long, env = "AFFILIATE_DB_NAMESPACE", default_value = "affiliate")]
    pub db_namespace: String,

    #[arg(long, env = "AFFILIATE_DB_DATABASE", default_value = "main")]
    pub db_database: String,

    #[arg(long, env = "AFFILIATE_DB_USERNAME", default_value = "root")]
    pub db_username: String,

    #[arg(
        long,
        env = "AFFILIATE_DB_PASSWORD",
        default_value = "root",
        hide_env_values = true
    )]
    pub db_password: String,

    /// Page size used when a listing asks for zero items.
    #[arg(long, env = "AFFILIATE_DEFAULT_PAGE_SIZE", default_value_t = 20)]
    pub default_page_size: u64,

    /// Largest page a listing may return.
    #[arg(long, env = "AFFILIATE_MAX_PAGE_SIZE", default_value_t = 100)]
    pub max_page_size: u64,
}

impl ServerConfig {
    pub fn db_config(&self) -> DbConfig {
        DbConfig {
            url: self.db_url.clone(),
            namespace: self.db_namespace.clone(),
            database: self.db_database.clone(),
            username: self.db_username.clone(),
            password: self.db_password.clone(),
        }
    }

    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            default_page_size: self.default_page_size,
            max_page_size: self.max_page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let config = ServerConfig::try_parse_from([
            "affiliate-server",
            "--bind",
            "127.0.0.1:9000",
            "--db-url",
            "mem://",
            "--max-page-size",
            "50",
        ])
        .unwrap();

        assert_eq!(config.bind.port(), 9000);
        assert!(config.db_config().is_embedded());
        assert_eq!(config.service_config().max_page_size, 50);
    }

    #[test]
    fn rejects_invalid_bind_address() {
        assert!(ServerConfig::try_parse_from(["affiliate-server", "--bind", "nowhere"]).is_err());
    }
}
