//! Generic miio device-adapter core.
//!
//! The miio appliance fleet (air purifiers, humidifiers, fans,
//! air-freshers) shares one control surface: a blocking vendor SDK with
//! `on`/`off`/`status`/`set_*` calls that either return a success token
//! or fail with a transport error. This crate consolidates what used to
//! be one adapter class per model into a single engine plus per-model
//! data tables:
//!
//! - **DriverRegistry**: maps a model id to a [`DriverDescriptor`]
//!   (capability flags, attribute table, preset vocabulary, quirks)
//! - **DeviceAdapter**: the polling entity: availability tracking with
//!   a bounded retry budget, optimistic skip-after-write, and
//!   capability-gated command setters with uniform failure semantics
//! - **FleetService**: owns the live adapters, runs one polling task
//!   per device and fans commands out across the fleet
//!
//! The wire protocol itself stays behind the [`MiioDevice`] /
//! [`DeviceConnector`] traits; this crate never touches a socket.

pub mod adapter;
pub mod capability;
pub mod device;
pub mod driver;
pub mod executor;
pub mod models;
pub mod projection;
pub mod registry;
pub mod service;

pub use adapter::{Availability, CommandOutcome, DeviceAdapter};
pub use capability::Capabilities;
pub use device::{
    CommandResult, DeviceCall, DeviceConnector, DeviceProbe, DeviceProperty, FieldKind,
    FieldSchema, FieldValue, MiioDevice, MoveDirection, StateSnapshot, TransportError,
};
pub use driver::{
    AttributeSpec, DriverDescriptor, DriverError, EnumDecoder, PresetCode, PresetMode, Protocol,
    Quirks,
};
pub use models::builtin_registry;
pub use projection::{project, ProjectionError};
pub use registry::{DriverRegistry, RegistryError};
pub use service::{FleetCommand, FleetResult, FleetService, SetupError};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
