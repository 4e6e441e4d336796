use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_address: String,
    /// Frontend origins allowed by CORS, comma separated.
    pub allowed_origins: Vec<String>,
    /// Names the upstream dialer feed injects that are not agents
    /// (case-insensitive exact match, applied after aggregation).
    pub excluded_sync_names: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgresql://localhost/staffline".to_string()),
            bind_address: std::env::var("BIND_ADDRESS")
                .unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            allowed_origins: split_csv(
                &std::env::var("ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            ),
            excluded_sync_names: split_csv(
                &std::env::var("EXCLUDED_SYNC_NAMES").unwrap_or_default(),
            ),
        })
    }
}

fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_csv_trims_and_drops_empty() {
        assert_eq!(
            split_csv(" a, b ,,c "),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
        assert!(split_csv("").is_empty());
    }
}
