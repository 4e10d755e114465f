use embedded_hal::delay::DelayNs;
use log::{info, warn};

use crate::config::RetryPolicy;
use crate::error::MenuError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Failed,
}

impl ConnectionState {
    pub fn status_message(self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "WiFi disconnected",
            ConnectionState::Connecting => "Connecting to WiFi...",
            ConnectionState::Connected => "Connected to WiFi!",
            ConnectionState::Failed => "WiFi Connection Failed!",
        }
    }
}

/// Station-mode radio as seen by the connector.
pub trait WifiLink {
    /// Kick off association. Must not block until associated.
    fn begin(&mut self) -> Result<(), MenuError>;

    /// True once associated and holding an IP address.
    fn is_connected(&mut self) -> bool;
}

/// Owns the connection state and the bounded association retry loop.
pub struct NetworkConnector<L, D> {
    link: L,
    delay: D,
    policy: RetryPolicy,
    state: ConnectionState,
}

impl<L: WifiLink, D: DelayNs> NetworkConnector<L, D> {
    pub fn new(link: L, delay: D, policy: RetryPolicy) -> Self {
        Self {
            link,
            delay,
            policy,
            state: ConnectionState::Disconnected,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn max_attempts(&self) -> u32 {
        self.policy.max_attempts
    }

    /// Re-read the link. A previously connected link that dropped goes back
    /// to `Disconnected`.
    pub fn refresh_state(&mut self) -> ConnectionState {
        let connected = self.link.is_connected();
        self.state = match (self.state, connected) {
            (_, true) => ConnectionState::Connected,
            (ConnectionState::Connected, false) => {
                warn!("WiFi link lost");
                ConnectionState::Disconnected
            }
            (state, false) => state,
        };
        self.state
    }

    /// Associate, polling the link up to `max_attempts` times with
    /// `retry_delay_ms` between polls. Every transition goes to `on_state`.
    pub fn connect(&mut self, mut on_state: impl FnMut(ConnectionState)) -> ConnectionState {
        self.set_state(ConnectionState::Connecting, &mut on_state);

        if let Err(e) = self.link.begin() {
            warn!("WiFi start failed: {}", e);
            self.set_state(ConnectionState::Failed, &mut on_state);
            return self.state;
        }

        let mut attempts = 0;
        loop {
            if self.link.is_connected() {
                info!("Connected to WiFi after {} polls", attempts);
                self.set_state(ConnectionState::Connected, &mut on_state);
                break;
            }
            if attempts >= self.policy.max_attempts {
                warn!("Failed to connect to WiFi after {} attempts", attempts);
                self.set_state(ConnectionState::Failed, &mut on_state);
                break;
            }
            self.delay.delay_ms(self.policy.retry_delay_ms);
            attempts += 1;
            if attempts % 5 == 0 {
                info!("Still waiting for WiFi... ({}/{})", attempts, self.policy.max_attempts);
            }
        }

        self.state
    }

    /// Connect only if the link is not already up.
    pub fn ensure_connected(&mut self, on_state: impl FnMut(ConnectionState)) -> ConnectionState {
        if self.refresh_state() == ConnectionState::Connected {
            return self.state;
        }
        info!("WiFi not connected, reconnecting");
        self.connect(on_state)
    }

    fn set_state(&mut self, state: ConnectionState, on_state: &mut impl FnMut(ConnectionState)) {
        self.state = state;
        on_state(state);
    }
}
