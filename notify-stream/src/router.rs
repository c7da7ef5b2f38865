//! Event-type routing and identifier extraction.
//!
//! The original consumer classified events with a long fall-through switch;
//! here the same knowledge lives in a static table from exact event-type
//! string to a routing rule. Recognized-but-extractionless types are
//! explicit [`Route::Acknowledge`] entries, so "known no-op" and "unknown"
//! stay distinguishable. Unknown event types are ignored: the table is
//! additive, and new producer event types are no-ops until an entry is
//! added.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use serde_json::{Map, Value};

use crate::error::ExtractionError;
use crate::message::NotificationMessage;
use crate::sink::Sink;
use crate::types::{Dispatch, ResourceKind};

/// Location of the resource identifier inside an event payload.
///
/// Paths are not uniform across resource kinds; each table entry pins the
/// exact shape its producer emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdPath {
    /// Identifier is a string directly under this payload key
    Field(&'static str),
    /// Identifier is a string member of a nested payload object
    Member(&'static str, &'static str),
}

impl IdPath {
    /// Dotted form for error context.
    fn describe(&self) -> String {
        match self {
            IdPath::Field(key) => (*key).to_string(),
            IdPath::Member(object, member) => format!("{object}.{member}"),
        }
    }
}

/// Routing rule for one event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Extract the identifier at `path` and classify it as `kind`
    Extract {
        /// Resource classification
        kind: ResourceKind,
        /// Where the identifier sits in the payload
        path: IdPath,
    },
    /// Recognized event type that deliberately produces no extraction
    Acknowledge,
}

/// The complete set of recognized event types.
///
/// Created/updated/deleted variants of one resource share a single rule;
/// the fan-in is deliberate.
const ROUTES: &[(&str, Route)] = &[
    (
        "identity.project.created",
        Route::Extract {
            kind: ResourceKind::Project,
            path: IdPath::Field("id"),
        },
    ),
    (
        "identity.project.updated",
        Route::Extract {
            kind: ResourceKind::Project,
            path: IdPath::Field("id"),
        },
    ),
    (
        "identity.project.deleted",
        Route::Extract {
            kind: ResourceKind::Project,
            path: IdPath::Field("id"),
        },
    ),
    (
        "compute.instance.create.end",
        Route::Extract {
            kind: ResourceKind::Instance,
            path: IdPath::Field("instance_id"),
        },
    ),
    (
        "compute.instance.update",
        Route::Extract {
            kind: ResourceKind::Instance,
            path: IdPath::Field("instance_id"),
        },
    ),
    (
        "compute.instance.delete.end",
        Route::Extract {
            kind: ResourceKind::Instance,
            path: IdPath::Field("instance_id"),
        },
    ),
    (
        "compute.instance.suspend.end",
        Route::Extract {
            kind: ResourceKind::Instance,
            path: IdPath::Field("instance_id"),
        },
    ),
    ("volume.attach.end", Route::Acknowledge),
    (
        "volume.create.end",
        Route::Extract {
            kind: ResourceKind::Volume,
            path: IdPath::Field("volume"),
        },
    ),
    (
        "volume.update.end",
        Route::Extract {
            kind: ResourceKind::Volume,
            path: IdPath::Field("volume"),
        },
    ),
    (
        "volume.delete.end",
        Route::Extract {
            kind: ResourceKind::Volume,
            path: IdPath::Field("volume"),
        },
    ),
    (
        "snapshot.create.end",
        Route::Extract {
            kind: ResourceKind::Snapshot,
            path: IdPath::Field("snapshot_id"),
        },
    ),
    (
        "snapshot.update.end",
        Route::Extract {
            kind: ResourceKind::Snapshot,
            path: IdPath::Field("snapshot_id"),
        },
    ),
    (
        "snapshot.delete.end",
        Route::Extract {
            kind: ResourceKind::Snapshot,
            path: IdPath::Field("snapshot_id"),
        },
    ),
    (
        "volume_type.create",
        Route::Extract {
            kind: ResourceKind::VolumeType,
            path: IdPath::Member("volume_types", "id"),
        },
    ),
    (
        "volume_type.update",
        Route::Extract {
            kind: ResourceKind::VolumeType,
            path: IdPath::Member("volume_types", "id"),
        },
    ),
    (
        "volume_type.delete",
        Route::Extract {
            kind: ResourceKind::VolumeType,
            path: IdPath::Member("volume_types", "id"),
        },
    ),
    ("volume_type_project.access.add", Route::Acknowledge),
    ("volume_type_extra_specs.create", Route::Acknowledge),
    ("volume_type_extra_specs.delete", Route::Acknowledge),
    (
        "network.create.end",
        Route::Extract {
            kind: ResourceKind::Network,
            path: IdPath::Member("network", "id"),
        },
    ),
    (
        "network.update.end",
        Route::Extract {
            kind: ResourceKind::Network,
            path: IdPath::Member("network", "id"),
        },
    ),
    (
        "network.delete.end",
        Route::Extract {
            kind: ResourceKind::Network,
            path: IdPath::Member("network", "id"),
        },
    ),
    (
        "subnet.create.end",
        Route::Extract {
            kind: ResourceKind::Subnet,
            path: IdPath::Member("subnet", "id"),
        },
    ),
    (
        "subnet.update.end",
        Route::Extract {
            kind: ResourceKind::Subnet,
            path: IdPath::Member("subnet", "id"),
        },
    ),
    (
        "security_group.create.end",
        Route::Extract {
            kind: ResourceKind::SecurityGroup,
            path: IdPath::Member("security_group", "id"),
        },
    ),
    (
        "security_group.update.end",
        Route::Extract {
            kind: ResourceKind::SecurityGroup,
            path: IdPath::Member("security_group", "id"),
        },
    ),
    (
        "security_group.delete.end",
        Route::Extract {
            kind: ResourceKind::SecurityGroup,
            path: IdPath::Member("security_group", "id"),
        },
    ),
    (
        "security_group_rule.create.end",
        Route::Extract {
            kind: ResourceKind::SecurityGroupRule,
            path: IdPath::Member("security_group_rule", "id"),
        },
    ),
    (
        "security_group_rule.update.end",
        Route::Extract {
            kind: ResourceKind::SecurityGroupRule,
            path: IdPath::Member("security_group_rule", "id"),
        },
    ),
    (
        "security_group_rule.delete.end",
        Route::Extract {
            kind: ResourceKind::SecurityGroupRule,
            path: IdPath::Member("security_group_rule", "id"),
        },
    ),
    (
        "router.create.end",
        Route::Extract {
            kind: ResourceKind::Router,
            path: IdPath::Member("router", "id"),
        },
    ),
    (
        "router.update.end",
        Route::Extract {
            kind: ResourceKind::Router,
            path: IdPath::Member("router", "id"),
        },
    ),
    (
        "router.delete.end",
        Route::Extract {
            kind: ResourceKind::Router,
            path: IdPath::Member("router", "id"),
        },
    ),
    ("router.interface.create", Route::Acknowledge),
    (
        "floatingip.create.end",
        Route::Extract {
            kind: ResourceKind::FloatingIp,
            path: IdPath::Member("floatingip", "id"),
        },
    ),
    (
        "floatingip.update.end",
        Route::Extract {
            kind: ResourceKind::FloatingIp,
            path: IdPath::Member("floatingip", "id"),
        },
    ),
    (
        "floatingip.delete.end",
        Route::Extract {
            kind: ResourceKind::FloatingIp,
            path: IdPath::Member("floatingip", "id"),
        },
    ),
];

static ROUTE_TABLE: LazyLock<HashMap<&'static str, Route>> =
    LazyLock::new(|| ROUTES.iter().copied().collect());

/// Look up the routing rule for an event type.
///
/// Returns `None` for event types not in the table.
pub fn route_for(event_type: &str) -> Option<Route> {
    ROUTE_TABLE.get(event_type).copied()
}

/// Pull the identifier out of a payload by checked lookups.
///
/// Every step verifies key presence and JSON type, so a shape mismatch
/// surfaces as a typed error rather than a panic.
fn extract_id(
    event_type: &str,
    path: IdPath,
    payload: &Map<String, Value>,
) -> Result<String, ExtractionError> {
    let field_missing = || ExtractionError::FieldMissing {
        event_type: event_type.to_string(),
        path: path.describe(),
    };
    let type_mismatch = || ExtractionError::TypeMismatch {
        event_type: event_type.to_string(),
        path: path.describe(),
    };

    let value = match path {
        IdPath::Field(key) => payload.get(key).ok_or_else(field_missing)?,
        IdPath::Member(object, member) => {
            let nested = payload.get(object).ok_or_else(field_missing)?;
            let nested = nested.as_object().ok_or_else(type_mismatch)?;
            nested.get(member).ok_or_else(field_missing)?
        }
    };

    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(type_mismatch)
}

/// Routes decoded notifications to the sink.
///
/// The table itself is static and read-only; the router only adds the sink
/// binding, so it is freely shareable across tasks.
pub struct EventRouter {
    sink: Arc<dyn Sink>,
}

impl EventRouter {
    /// Create a router delivering extracted identifiers to `sink`.
    pub fn new(sink: Arc<dyn Sink>) -> Self {
        Self { sink }
    }

    /// Classify one decoded message and deliver its identifier, if any.
    ///
    /// Unknown event types yield `Dispatch::Ignored`; recognized no-op
    /// types yield `Dispatch::Acknowledged`. A sink failure is logged and
    /// does not fail the dispatch.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError` when the payload does not have the shape
    /// the routing table expects for this event type.
    pub fn dispatch(&self, message: &NotificationMessage) -> Result<Dispatch, ExtractionError> {
        match route_for(&message.event_type) {
            None => {
                tracing::trace!("Ignoring unrecognized event type {}", message.event_type);
                Ok(Dispatch::Ignored)
            }
            Some(Route::Acknowledge) => {
                tracing::debug!("Acknowledged {} without extraction", message.event_type);
                Ok(Dispatch::Acknowledged)
            }
            Some(Route::Extract { kind, path }) => {
                let resource_id = extract_id(&message.event_type, path, &message.payload)?;

                tracing::debug!("{} notification {}", kind, resource_id);

                if let Err(e) = self.sink.apply(kind, &resource_id) {
                    tracing::warn!(
                        "Failed to sync cluster from {} notification {}: {}",
                        kind,
                        resource_id,
                        e
                    );
                }

                Ok(Dispatch::Delivered { kind, resource_id })
            }
        }
    }
}
