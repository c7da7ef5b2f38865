//! Error types for the notification monitor.

use notify_broker::ConnError;

/// Errors surfaced by the monitor's lifecycle operations.
///
/// Only startup failures reach the caller; everything after `start` returns
/// is handled inside the background task and logged.
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    /// Opening the broker connection failed
    #[error("Failed to connect cluster notification: {0}")]
    Connect(#[from] ConnError),

    /// A previous run is still active
    #[error("Notification monitor is already running")]
    AlreadyRunning,
}

/// Result type for monitor operations.
pub type Result<T> = std::result::Result<T, MonitorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monitor_error_display() {
        let error: MonitorError = ConnError::NotConnected.into();
        assert_eq!(
            error.to_string(),
            "Failed to connect cluster notification: Not connected"
        );

        assert_eq!(
            MonitorError::AlreadyRunning.to_string(),
            "Notification monitor is already running"
        );
    }
}
