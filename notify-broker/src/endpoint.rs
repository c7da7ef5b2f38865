//! Broker endpoint configuration.

use url::Url;

use crate::error::EndpointError;

/// Default AMQP port used by the cluster message bus.
pub const DEFAULT_AMQP_PORT: u16 = 5672;

/// Default topic the notification producers publish to.
pub const DEFAULT_NOTIFICATION_TOPIC: &str = "notifications.info";

/// Connection endpoint for the cluster notification bus.
///
/// Derived from the cluster API server URL: the broker lives on the same
/// host, on the fixed AMQP port. Credentials default to `guest:guest` until
/// cluster metadata supplies real ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerEndpoint {
    /// Broker host (no port)
    pub host: String,
    /// Broker port
    pub port: u16,
    /// Credentials in `user:password` form
    pub credentials: String,
}

impl BrokerEndpoint {
    /// Create an endpoint from explicit host and port with default credentials.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            credentials: "guest:guest".to_string(),
        }
    }

    /// Derive the broker endpoint from the cluster API server URL.
    ///
    /// Takes the host from the URL and pairs it with the fixed AMQP port.
    /// Any port present in the URL belongs to the API server, not the broker,
    /// and is discarded.
    ///
    /// # Errors
    ///
    /// Returns `EndpointError::InvalidUrl` if the input does not parse and
    /// `EndpointError::MissingHost` if it parses but carries no host.
    pub fn from_server_url(server_url: &str) -> Result<Self, EndpointError> {
        let url = Url::parse(server_url).map_err(|source| EndpointError::InvalidUrl {
            url: server_url.to_string(),
            source,
        })?;

        let host = url
            .host_str()
            .ok_or_else(|| EndpointError::MissingHost(server_url.to_string()))?;

        Ok(Self::new(host, DEFAULT_AMQP_PORT))
    }

    /// Render the endpoint as a `host:port` address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
