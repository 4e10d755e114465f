use chrono::{DateTime, FixedOffset, Offset, Utc};
use log::{info, warn};

use crate::error::MenuError;

/// Network time client. Each call is one request.
pub trait TimeSource {
    /// Current Unix time in seconds.
    fn fetch_epoch(&mut self) -> Result<i64, MenuError>;
}

/// Formats the last synced time. No caching beyond that single value.
pub struct Clock<T> {
    source: T,
    offset: FixedOffset,
    last_epoch: Option<i64>,
}

impl<T: TimeSource> Clock<T> {
    pub fn new(source: T, utc_offset_hours: i8) -> Self {
        let offset = FixedOffset::east_opt(i32::from(utc_offset_hours) * 3600)
            .unwrap_or_else(|| Utc.fix());
        Self {
            source,
            offset,
            last_epoch: None,
        }
    }

    pub fn sync_time(&mut self) -> Result<(), MenuError> {
        match self.source.fetch_epoch() {
            Ok(epoch) => {
                self.last_epoch = Some(epoch);
                info!("Time synced: epoch {}", epoch);
                Ok(())
            }
            Err(e) => {
                warn!("Time sync failed: {}", e);
                Err(e)
            }
        }
    }

    fn local(&self) -> Option<DateTime<FixedOffset>> {
        let epoch = self.last_epoch?;
        DateTime::from_timestamp(epoch, 0).map(|utc| utc.with_timezone(&self.offset))
    }

    /// `YYYY-MM-DD` in local time.
    pub fn today(&self) -> Option<String> {
        self.local().map(|t| t.format("%Y-%m-%d").to_string())
    }

    /// `HH:MM`, 24-hour, local time.
    pub fn now_hhmm(&self) -> Option<String> {
        self.local().map(|t| t.format("%H:%M").to_string())
    }
}
