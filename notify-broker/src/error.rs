//! Error types for the broker capability.

/// Errors from connection-level operations on the broker transport.
///
/// A `ConnError` is fatal to the current subscription run but never to the
/// process: the caller decides whether to retry a whole run.
#[derive(Debug, thiserror::Error)]
pub enum ConnError {
    /// Failed to open the transport connection
    #[error("Failed to connect to {address}: {reason}")]
    ConnectFailed {
        /// Broker address in `host:port` form
        address: String,
        /// Transport-reported reason
        reason: String,
    },

    /// Failed to close the transport connection
    #[error("Failed to disconnect: {0}")]
    DisconnectFailed(String),

    /// Operation attempted while the transport is not connected
    #[error("Not connected")]
    NotConnected,
}

/// Errors from subscription operations.
#[derive(Debug, thiserror::Error)]
pub enum SubError {
    /// Failed to register the handler against the topic
    #[error("Failed to subscribe to topic {topic}: {reason}")]
    SubscribeFailed {
        /// The topic the registration targeted
        topic: String,
        /// Broker-reported reason
        reason: String,
    },

    /// Failed to unsubscribe
    #[error("Unsubscribe failed: {0}")]
    UnsubscribeFailed(String),

    /// The subscription handle was already released
    #[error("Subscription already released")]
    AlreadyReleased,
}

/// Errors from endpoint configuration.
#[derive(Debug, thiserror::Error)]
pub enum EndpointError {
    /// The cluster API server URL could not be parsed
    #[error("Invalid server URL {url:?}: {source}")]
    InvalidUrl {
        /// The offending input
        url: String,
        /// Parser error
        #[source]
        source: url::ParseError,
    },

    /// The URL parsed but carries no host to derive the broker address from
    #[error("Server URL {0:?} has no host")]
    MissingHost(String),
}
