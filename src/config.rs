//! Process configuration.

use std::net::SocketAddr;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Directory served as the fallback route (client bundle).
    pub static_dir: String,
}

impl ServerConfig {
    /// Load config from environment variables, falling back to defaults.
    /// `NIGHTFORAGE_ADDR` takes a full socket address, e.g. `0.0.0.0:4646`.
    pub fn from_env() -> Self {
        let bind_addr = std::env::var("NIGHTFORAGE_ADDR")
            .ok()
            .and_then(|raw| match raw.trim().parse() {
                Ok(addr) => Some(addr),
                Err(_) => {
                    tracing::warn!("Ignoring unparseable NIGHTFORAGE_ADDR {:?}", raw);
                    None
                }
            })
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 4646)));

        let static_dir = std::env::var("NIGHTFORAGE_STATIC_DIR")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "static".to_string());

        Self {
            bind_addr,
            static_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_defaults_without_env() {
        std::env::remove_var("NIGHTFORAGE_ADDR");
        std::env::remove_var("NIGHTFORAGE_STATIC_DIR");

        let config = ServerConfig::from_env();
        assert_eq!(config.bind_addr, SocketAddr::from(([0, 0, 0, 0], 4646)));
        assert_eq!(config.static_dir, "static");
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        std::env::set_var("NIGHTFORAGE_ADDR", "127.0.0.1:9000");
        std::env::set_var("NIGHTFORAGE_STATIC_DIR", "public");

        let config = ServerConfig::from_env();
        assert_eq!(config.bind_addr, SocketAddr::from(([127, 0, 0, 1], 9000)));
        assert_eq!(config.static_dir, "public");

        std::env::remove_var("NIGHTFORAGE_ADDR");
        std::env::remove_var("NIGHTFORAGE_STATIC_DIR");
    }

    #[test]
    #[serial]
    fn test_bad_addr_falls_back() {
        std::env::set_var("NIGHTFORAGE_ADDR", "not-an-addr");

        let config = ServerConfig::from_env();
        assert_eq!(config.bind_addr, SocketAddr::from(([0, 0, 0, 0], 4646)));

        std::env::remove_var("NIGHTFORAGE_ADDR");
    }
}
