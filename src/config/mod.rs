//! Configuration management

use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,

    /// Registrations with this email are granted the admin role.
    #[serde(default)]
    pub admin_email: Option<String>,
}

fn default_port() -> u16 {
    8090
}

/// Get data directory (SB_DATA_DIR, XDG dirs, or platform default)
pub fn get_data_dir() -> std::path::PathBuf {
    if let Ok(dir) = std::env::var("SB_DATA_DIR") {
        return std::path::PathBuf::from(dir);
    }

    #[cfg(target_os = "macos")]
    {
        if let Ok(home) = std::env::var("HOME") {
            return std::path::PathBuf::from(home).join("Library/Application Support/sports-buddy");
        }
    }

    #[cfg(target_os = "linux")]
    {
        if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
            return std::path::PathBuf::from(xdg).join("sports-buddy");
        }
        if let Ok(home) = std::env::var("HOME") {
            return std::path::PathBuf::from(home).join(".local/share/sports-buddy");
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(appdata) = std::env::var("LOCALAPPDATA") {
            return std::path::PathBuf::from(appdata).join("sports-buddy");
        }
    }

    // Fallback to ./data
    std::path::PathBuf::from("./data")
}

/// Get config directory (SB_CONFIG_DIR, XDG dirs, or platform default)
pub fn get_config_dir() -> std::path::PathBuf {
    if let Ok(dir) = std::env::var("SB_CONFIG_DIR") {
        return std::path::PathBuf::from(dir);
    }

    #[cfg(target_os = "macos")]
    {
        if let Ok(home) = std::env::var("HOME") {
            return std::path::PathBuf::from(home).join("Library/Application Support/sports-buddy");
        }
    }

    #[cfg(target_os = "linux")]
    {
        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            return std::path::PathBuf::from(xdg).join("sports-buddy");
        }
        if let Ok(home) = std::env::var("HOME") {
            return std::path::PathBuf::from(home).join(".config/sports-buddy");
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(appdata) = std::env::var("APPDATA") {
            return std::path::PathBuf::from(appdata).join("sports-buddy");
        }
    }

    // Fallback to current directory
    std::path::PathBuf::from(".")
}

pub fn load_config() -> Result<Config> {
    let config_dir = get_config_dir();

    let mut builder = ::config::Config::builder()
        // Start with defaults
        .set_default("port", 8090)?
        // Load from config file if it exists
        .add_source(
            ::config::File::with_name(&config_dir.join("config").to_string_lossy()).required(false),
        )
        // Override with environment variables (SB_PORT, SB_ADMIN_EMAIL, etc.)
        .add_source(
            ::config::Environment::with_prefix("SB")
                .separator("__")
                .try_parsing(true),
        );

    // Support PORT env vars with explicit precedence: SB_PORT > PORT > config > default
    if let Ok(port) = std::env::var("SB_PORT") {
        if let Ok(port_num) = port.parse::<u16>() {
            builder = builder.set_override("port", port_num as i64)?;
        }
    } else if let Ok(port) = std::env::var("PORT") {
        // Legacy PORT fallback (Docker, PaaS launchers)
        if let Ok(port_num) = port.parse::<u16>() {
            builder = builder.set_override("port", port_num as i64)?;
        }
    }

    if let Ok(email) = std::env::var("SB_ADMIN_EMAIL") {
        builder = builder.set_override("admin_email", email)?;
    }

    let config = builder.build()?;

    Ok(config.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    #[test]
    #[serial]
    fn test_port_env_fallback() {
        // PORT env var should work as fallback when SB_PORT is not set
        env::remove_var("SB_PORT");
        env::remove_var("PORT");
        env::set_var("SB_CONFIG_DIR", "/tmp/sb-test-nonexistent");

        env::set_var("PORT", "3000");

        let config = load_config().expect("config should load");

        env::remove_var("PORT");
        env::remove_var("SB_CONFIG_DIR");

        assert_eq!(config.port, 3000, "PORT env var should set config.port");
    }

    #[test]
    #[serial]
    fn test_sb_port_takes_precedence_over_port() {
        env::remove_var("SB_PORT");
        env::remove_var("PORT");
        env::set_var("SB_CONFIG_DIR", "/tmp/sb-test-nonexistent");

        env::set_var("SB_PORT", "5000");
        env::set_var("PORT", "3000");

        let config = load_config().expect("config should load");

        env::remove_var("SB_PORT");
        env::remove_var("PORT");
        env::remove_var("SB_CONFIG_DIR");

        assert_eq!(config.port, 5000, "SB_PORT should take precedence over PORT");
    }

    #[test]
    #[serial]
    fn test_invalid_port_uses_default() {
        env::remove_var("SB_PORT");
        env::remove_var("PORT");
        env::set_var("SB_CONFIG_DIR", "/tmp/sb-test-nonexistent");

        env::set_var("PORT", "not-a-number");

        let config = load_config().expect("config should load");

        env::remove_var("PORT");
        env::remove_var("SB_CONFIG_DIR");

        assert_eq!(config.port, 8090, "Invalid PORT should fall back to default");
    }

    #[test]
    #[serial]
    fn test_admin_email_env() {
        env::remove_var("SB_PORT");
        env::remove_var("PORT");
        env::set_var("SB_CONFIG_DIR", "/tmp/sb-test-nonexistent");
        env::set_var("SB_ADMIN_EMAIL", "admin@example.com");

        let config = load_config().expect("config should load");

        env::remove_var("SB_ADMIN_EMAIL");
        env::remove_var("SB_CONFIG_DIR");

        assert_eq!(config.admin_email.as_deref(), Some("admin@example.com"));
    }

    #[test]
    #[serial]
    fn test_admin_email_defaults_to_none() {
        env::remove_var("SB_ADMIN_EMAIL");
        env::remove_var("SB_PORT");
        env::remove_var("PORT");
        env::set_var("SB_CONFIG_DIR", "/tmp/sb-test-nonexistent");

        let config = load_config().expect("config should load");

        env::remove_var("SB_CONFIG_DIR");

        assert!(config.admin_email.is_none());
    }

    #[test]
    #[serial]
    fn test_data_dir_env_override() {
        let temp_dir = tempfile::tempdir().expect("create temp dir");
        env::set_var("SB_DATA_DIR", temp_dir.path());

        let dir = get_data_dir();

        env::remove_var("SB_DATA_DIR");

        assert_eq!(dir, temp_dir.path());
    }
}
