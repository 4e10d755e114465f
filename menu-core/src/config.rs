/// Configuration structures that can be tested independently
use serde::{Deserialize, Serialize};

use crate::error::MenuError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WifiCredentials {
    pub ssid: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "raspberrypi.local".to_string(),
            port: 3000,
        }
    }
}

/// Bounded retry budget for WiFi association.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub retry_delay_ms: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 20,
            retry_delay_ms: 1000,
        }
    }
}

/// Timing knobs for the screen and input loop, all in milliseconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct UiTiming {
    pub debounce_ms: u64,
    pub message_dwell_ms: u64,
    pub clock_tick_ms: u64,
}

impl Default for UiTiming {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            message_dwell_ms: 1500,
            clock_tick_ms: 60_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuConfig {
    pub wifi: WifiCredentials,
    pub server: ServerConfig,
    pub utc_offset_hours: i8,
    #[serde(default)]
    pub retry: RetryPolicy,
    #[serde(default)]
    pub timing: UiTiming,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            wifi: WifiCredentials {
                ssid: String::new(),
                password: String::new(),
            },
            server: ServerConfig::default(),
            utc_offset_hours: 0,
            retry: RetryPolicy::default(),
            timing: UiTiming::default(),
        }
    }
}

impl MenuConfig {
    /// Parse the raw build-time strings into a validated config.
    pub fn from_build_env(
        ssid: &str,
        password: &str,
        host: &str,
        port: &str,
        utc_offset_hours: &str,
    ) -> Result<Self, MenuError> {
        let port = port
            .trim()
            .parse::<u16>()
            .map_err(|_| MenuError::Config(format!("invalid server port '{}'", port)))?;
        let utc_offset_hours = utc_offset_hours
            .trim()
            .parse::<i8>()
            .map_err(|_| MenuError::Config(format!("invalid UTC offset '{}'", utc_offset_hours)))?;

        let config = Self {
            wifi: WifiCredentials {
                ssid: ssid.to_string(),
                password: password.to_string(),
            },
            server: ServerConfig {
                host: host.trim().to_string(),
                port,
            },
            utc_offset_hours,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), MenuError> {
        if self.wifi.ssid.is_empty() {
            return Err(MenuError::Config("WiFi SSID is empty".to_string()));
        }
        if self.server.host.is_empty() {
            return Err(MenuError::Config("server host is empty".to_string()));
        }
        if self.server.port == 0 {
            return Err(MenuError::Config("server port is 0".to_string()));
        }
        if !(-12..=14).contains(&self.utc_offset_hours) {
            return Err(MenuError::Config(format!(
                "UTC offset {} out of range",
                self.utc_offset_hours
            )));
        }
        if self.retry.max_attempts == 0 {
            return Err(MenuError::Config("retry budget is 0".to_string()));
        }
        Ok(())
    }
}
