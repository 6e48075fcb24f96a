use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Directory served for every path other than `/ws`.
    pub static_dir: PathBuf,
    /// Rooms older than this are dropped by the cleanup task.
    pub room_ttl: Duration,
    pub cleanup_interval: Duration,
    pub ai_depth: u8,
    /// JSON file of engine tuning; see `EngineConfig::load_from_json`.
    pub engine_config: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            static_dir: PathBuf::from("public"),
            room_ttl: Duration::from_secs(3 * 60 * 60),
            cleanup_interval: Duration::from_secs(10 * 60),
            ai_depth: 3,
            engine_config: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Unset or unparsable values fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default = Self::default();
        let parsed = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        Self {
            host: parse_or(lookup("HOST"), default.host),
            port: parse_or(lookup("PORT"), default.port),
            static_dir: lookup("STATIC_DIR").map_or(default.static_dir, PathBuf::from),
            room_ttl: parsed("ROOM_TTL_SECS").map_or(default.room_ttl, Duration::from_secs),
            cleanup_interval: parsed("CLEANUP_INTERVAL_SECS")
                .map_or(default.cleanup_interval, Duration::from_secs),
            ai_depth: parse_or(lookup("AI_DEPTH"), default.ai_depth),
            engine_config: lookup("ENGINE_CONFIG").map(PathBuf::from),
        }
    }

    pub const fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_unset() {
        let config = ServerConfig::from_lookup(|_| None);
        assert_eq!(config.addr(), SocketAddr::from(([127, 0, 0, 1], 3000)));
        assert_eq!(config.room_ttl, Duration::from_secs(10_800));
        assert_eq!(config.cleanup_interval, Duration::from_secs(600));
        assert_eq!(config.ai_depth, 3);
        assert_eq!(config.engine_config, None);
    }

    #[test]
    fn test_overrides_and_bad_values() {
        let env: HashMap<&str, &str> = [
            ("HOST", "0.0.0.0"),
            ("PORT", "8080"),
            ("STATIC_DIR", "dist"),
            ("ROOM_TTL_SECS", "60"),
            ("AI_DEPTH", "deep"),
            ("ENGINE_CONFIG", "engine.json"),
        ]
        .into_iter()
        .collect();
        let config = ServerConfig::from_lookup(|key| env.get(key).map(|v| (*v).to_string()));
        assert_eq!(config.addr(), SocketAddr::from(([0, 0, 0, 0], 8080)));
        assert_eq!(config.static_dir, PathBuf::from("dist"));
        assert_eq!(config.room_ttl, Duration::from_secs(60));
        assert_eq!(config.ai_depth, 3);
        assert_eq!(config.engine_config, Some(PathBuf::from("engine.json")));
    }
}
