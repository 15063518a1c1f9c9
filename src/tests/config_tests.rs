#[cfg(test)]
mod tests {
    use crate::config::{self, AppConfig};
    use std::fs;
    use tempfile::NamedTempFile;

    fn write_temp_config(content: &str) -> NamedTempFile {
        let temp_file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        fs::write(temp_file.path(), content).unwrap();
        temp_file
    }

    fn path_of(file: &NamedTempFile) -> String {
        file.path().to_string_lossy().into_owned()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.url, "sqlite://data/anifriends.db");
        assert_eq!(config.cache.recruitment_count_key, "recruitment_count");
        assert_eq!(config.pagination.default_size, 10);
        assert_eq!(config.pagination.max_size, 100);
        assert!(config.security.is_none());
        assert!(config::validate(&config).is_ok());
    }

    #[test]
    fn test_config_from_file() {
        let file = write_temp_config(
            r#"
[server]
port = 9000

[cache]
capacity = 8

[security]
enable_hsts = true
csp = "default-src 'self'"
"#,
        );

        let config = config::load_from(Some(&path_of(&file))).unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.cache.capacity, 8);
        assert_eq!(config.cache.recruitment_count_key, "recruitment_count");
        let security = config.security.unwrap();
        assert_eq!(security.enable_hsts, Some(true));
        assert_eq!(security.csp.as_deref(), Some("default-src 'self'"));
    }

    #[test]
    fn test_zero_cache_capacity_is_rejected() {
        let file = write_temp_config("[cache]\ncapacity = 0\n");
        let err = config::load_from(Some(&path_of(&file))).unwrap_err();
        assert!(err.to_string().contains("cache.capacity"));
    }

    #[test]
    fn test_invalid_pagination_is_rejected() {
        let mut config = AppConfig::default();
        config.pagination.max_size = 5;
        assert!(config::validate(&config).is_err());

        let mut config = AppConfig::default();
        config.pagination.default_size = 0;
        assert!(config::validate(&config).is_err());
    }

    #[test]
    fn test_route_limits_must_be_positive() {
        let mut config = AppConfig::default();
        config.rate_limit.apply_per_minute = 0;
        let err = config::validate(&config).unwrap_err();
        assert!(err.to_string().contains("apply_per_minute"));
    }

    #[test]
    fn test_ensure_sqlite_parent_dir_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("anifriends.db");
        let url = format!("sqlite://{}", db_path.display());

        config::ensure_sqlite_parent_dir(&url).unwrap();
        assert!(dir.path().join("nested").is_dir());

        // Non-file URLs are left alone.
        assert!(config::ensure_sqlite_parent_dir("sqlite::memory:").is_ok());
    }
}
