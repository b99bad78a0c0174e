use shopkeep_core::settings::StoreId;

/// Platform app credentials and auth requirements.
#[derive(Debug, Clone, Default)]
pub struct ShopifyConfig {
    /// Public API key handed to the embedded admin page.
    pub api_key: String,
    /// Scopes a session must grant to be considered active.
    pub scopes: Vec<String>,
    /// Extra shop domain accepted alongside `myshopify.com`.
    pub custom_shop_domain: Option<String>,
}

impl ShopifyConfig {
    /// | Env Var              | Default |
    /// |----------------------|---------|
    /// | `SHOPIFY_API_KEY`    | empty   |
    /// | `SCOPES`             | empty   |
    /// | `SHOP_CUSTOM_DOMAIN` | unset   |
    pub fn from_env() -> Self {
        let api_key = std::env::var("SHOPIFY_API_KEY").unwrap_or_default();

        let scopes = std::env::var("SCOPES")
            .map(|s| split_list(&s))
            .unwrap_or_default();

        let custom_shop_domain = std::env::var("SHOP_CUSTOM_DOMAIN")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Self {
            api_key,
            scopes,
            custom_shop_domain,
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// Everything except the primary database URL has a default suitable for
/// local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long in-flight requests may drain after a shutdown signal.
    pub shutdown_timeout_secs: u64,
    /// Database URL per configured store, primary first.
    pub database_urls: Vec<(StoreId, String)>,
    pub shopify: ShopifyConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                      |
    /// |------------------------|------------------------------|
    /// | `HOST`                 | `0.0.0.0`                    |
    /// | `PORT`                 | `3000`                       |
    /// | `CORS_ORIGINS`         | `https://admin.shopify.com`  |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                         |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                         |
    /// | `DATABASE_URL`         | required                     |
    /// | `DATABASE_URL_DB2`     | unset (database not bound)   |
    /// | `DATABASE_URL_DB3`     | unset (database not bound)   |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = split_list(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "https://admin.shopify.com".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let primary = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let mut database_urls = vec![(StoreId::Primary, primary)];
        for id in [StoreId::Secondary, StoreId::Tertiary] {
            if let Ok(url) = std::env::var(database_url_var(id)) {
                if !url.trim().is_empty() {
                    database_urls.push((id, url));
                }
            }
        }

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            database_urls,
            shopify: ShopifyConfig::from_env(),
        }
    }
}

/// Environment variable holding the URL of `id`'s database.
pub fn database_url_var(id: StoreId) -> String {
    match id {
        StoreId::Primary => "DATABASE_URL".to_string(),
        other => format!("DATABASE_URL_{}", other.key()),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_url_vars() {
        assert_eq!(database_url_var(StoreId::Primary), "DATABASE_URL");
        assert_eq!(database_url_var(StoreId::Secondary), "DATABASE_URL_DB2");
        assert_eq!(database_url_var(StoreId::Tertiary), "DATABASE_URL_DB3");
    }

    #[test]
    fn split_list_drops_blanks() {
        assert_eq!(
            split_list(" read_products, ,write_orders,"),
            vec!["read_products".to_string(), "write_orders".to_string()]
        );
    }
}
