use crate::constants::*;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub mapbox_api_key: String,
    /// Override for the directions endpoint (e.g. a local proxy)
    pub mapbox_directions_url: Option<String>,
    pub mapbox_geocoding_url: Option<String>,
    /// When set, vacations are stored in Redis; otherwise under `data_dir`
    pub redis_url: Option<String>,
    pub data_dir: String,
    pub draft_plan_ttl: u64,
    pub draft_plan_max_entries: u64,
    pub poi_search_limit: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenv::dotenv().ok();

        let poi_search_limit: u32 = env::var("POI_SEARCH_LIMIT")
            .unwrap_or_else(|_| DEFAULT_POI_SEARCH_LIMIT.to_string())
            .parse()
            .map_err(|_| "Invalid POI_SEARCH_LIMIT")?;

        if poi_search_limit == 0 || poi_search_limit > MAX_POI_SEARCH_LIMIT {
            return Err(format!(
                "POI_SEARCH_LIMIT must be between 1 and {}",
                MAX_POI_SEARCH_LIMIT
            ));
        }

        let draft_plan_ttl: u64 = env::var("DRAFT_PLAN_TTL")
            .unwrap_or_else(|_| DEFAULT_DRAFT_PLAN_TTL_SECONDS.to_string())
            .parse()
            .map_err(|_| "Invalid DRAFT_PLAN_TTL")?;

        if draft_plan_ttl == 0 {
            return Err("DRAFT_PLAN_TTL must be greater than 0".to_string());
        }

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| "Invalid PORT")?,
            mapbox_api_key: env::var("MAPBOX_API_KEY").map_err(|_| "MAPBOX_API_KEY must be set")?,
            mapbox_directions_url: env::var("MAPBOX_DIRECTIONS_URL").ok(),
            mapbox_geocoding_url: env::var("MAPBOX_GEOCODING_URL").ok(),
            redis_url: env::var("REDIS_URL").ok(),
            data_dir: env::var("DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string()),
            draft_plan_ttl,
            draft_plan_max_entries: env::var("DRAFT_PLAN_MAX_ENTRIES")
                .unwrap_or_else(|_| DEFAULT_DRAFT_PLAN_MAX_ENTRIES.to_string())
                .parse()
                .map_err(|_| "Invalid DRAFT_PLAN_MAX_ENTRIES")?,
            poi_search_limit,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "HOST",
            "PORT",
            "MAPBOX_API_KEY",
            "MAPBOX_DIRECTIONS_URL",
            "MAPBOX_GEOCODING_URL",
            "REDIS_URL",
            "DATA_DIR",
            "DRAFT_PLAN_TTL",
            "DRAFT_PLAN_MAX_ENTRIES",
            "POI_SEARCH_LIMIT",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_defaults_with_api_key() {
        clear_env();
        env::set_var("MAPBOX_API_KEY", "pk.test");

        let config = Config::from_env().unwrap();
        assert_eq!(config.server_address(), "0.0.0.0:3000");
        assert_eq!(config.data_dir, DEFAULT_DATA_DIR);
        assert_eq!(config.draft_plan_ttl, DEFAULT_DRAFT_PLAN_TTL_SECONDS);
        assert_eq!(config.poi_search_limit, DEFAULT_POI_SEARCH_LIMIT);
        assert!(config.redis_url.is_none());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_values_rejected() {
        clear_env();
        env::set_var("MAPBOX_API_KEY", "pk.test");

        env::set_var("PORT", "not-a-port");
        assert!(Config::from_env().is_err());
        env::remove_var("PORT");

        env::set_var("POI_SEARCH_LIMIT", "50");
        assert!(Config::from_env().is_err());
        env::remove_var("POI_SEARCH_LIMIT");

        env::set_var("DRAFT_PLAN_TTL", "0");
        assert!(Config::from_env().is_err());

        clear_env();
    }
}
