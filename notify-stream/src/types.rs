//! Core types for the notify-stream crate.

/// Classification of a recognized event type.
///
/// One kind covers every created/updated/deleted variant of the same
/// resource; the routing table fans distinct event-type strings into a
/// single kind on purpose.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum ResourceKind {
    /// Identity project
    Project,
    /// Compute instance
    Instance,
    /// Block storage volume
    Volume,
    /// Volume snapshot
    Snapshot,
    /// Volume type
    VolumeType,
    /// Network
    Network,
    /// Subnet
    Subnet,
    /// Security group
    SecurityGroup,
    /// Security group rule
    SecurityGroupRule,
    /// Router
    Router,
    /// Floating IP
    FloatingIp,
}

impl ResourceKind {
    /// Stable string form, used in logs and handed to the sink.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Project => "project",
            ResourceKind::Instance => "instance",
            ResourceKind::Volume => "volume",
            ResourceKind::Snapshot => "snapshot",
            ResourceKind::VolumeType => "volume_type",
            ResourceKind::Network => "network",
            ResourceKind::Subnet => "subnet",
            ResourceKind::SecurityGroup => "security_group",
            ResourceKind::SecurityGroupRule => "security_group_rule",
            ResourceKind::Router => "router",
            ResourceKind::FloatingIp => "floating_ip",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of routing one notification message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// An identifier was extracted and forwarded to the sink
    Delivered {
        /// Resource classification
        kind: ResourceKind,
        /// Extracted identifier
        resource_id: String,
    },

    /// The event type is recognized but intentionally carries no extraction
    Acknowledged,

    /// The event type is not in the routing table
    Ignored,
}
