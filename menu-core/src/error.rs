use thiserror::Error;

/// Failures of a single HTTP round trip to the menu server.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    #[error("WiFi not connected")]
    NotConnected,
    #[error("HTTP status {0}")]
    Status(u16),
    #[error("transport error: {0}")]
    Transport(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MenuError {
    #[error("WiFi association failed after {attempts} attempts")]
    Connection { attempts: u32 },

    #[error("menu server request failed: {0}")]
    Network(#[from] NetworkError),

    #[error("failed to parse menu data: {0}")]
    Parse(String),

    #[error("time sync failed: {0}")]
    TimeSync(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl MenuError {
    /// Short message shown on screen when this error replaces the menu.
    pub fn screen_message(&self) -> &'static str {
        match self {
            MenuError::Connection { .. } => "WiFi Connection Failed!",
            MenuError::Network(NetworkError::NotConnected) => "WiFi not connected",
            MenuError::Network(_) => "Failed to fetch menu",
            MenuError::Parse(_) => "Error parsing menu data",
            MenuError::TimeSync(_) => "Time sync failed",
            MenuError::Config(_) => "Invalid configuration",
        }
    }
}
