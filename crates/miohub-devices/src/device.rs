//! The device boundary.
//!
//! Everything below this module is an opaque collaborator: a vendor SDK
//! exposing blocking `on`/`off`/`status`/`set_*` calls per model. The
//! [`MiioDevice`] trait is that surface, [`DeviceConnector`] produces
//! handles (and runs the lightweight `info()` probe used for model
//! auto-detection). Implementations do blocking network I/O and are
//! only ever driven through the executor offload boundary.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::driver::{PresetCode, Protocol};

/// Token list returned by a device command. The protocol acknowledges a
/// successful command with a canonical marker; anything else is a
/// device-side refusal.
pub type CommandResult = Vec<String>;

/// The canonical success token.
pub const SUCCESS: &[&str] = &["ok"];

/// Check a command result against the canonical success marker. Only an
/// exact match counts.
pub fn is_success(result: &CommandResult) -> bool {
    result.len() == SUCCESS.len() && result.iter().map(String::as_str).eq(SUCCESS.iter().copied())
}

/// A single value read off a device state snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Text(String),
    /// Enumerated SDK value carrying both its symbolic name and raw
    /// scalar; projection decides which representation is published.
    Enum { name: String, value: i64 },
    Null,
}

impl FieldValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Boolean(_) => "boolean",
            Self::Text(_) => "text",
            Self::Enum { .. } => "enum",
            Self::Null => "null",
        }
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

/// Declared type of a snapshot field. Drivers publish a schema so their
/// attribute tables can be checked at registration time instead of on
/// the first poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Integer,
    Float,
    Boolean,
    Text,
    Enum,
}

/// One field in a driver's declared snapshot schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    pub kind: FieldKind,
}

impl FieldSchema {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// State snapshot returned by `status()`: the power flag plus the named
/// fields the model reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    power: bool,
    fields: HashMap<String, FieldValue>,
}

impl StateSnapshot {
    pub fn new(power: bool) -> Self {
        Self {
            power,
            fields: HashMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn is_on(&self) -> bool {
        self.power
    }

    pub fn set_power(&mut self, on: bool) {
        self.power = on;
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }
}

/// Horizontal rotation direction of a fan head.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Left,
    Right,
}

impl MoveDirection {
    /// Parse the external direction vocabulary ("left"/"right").
    pub fn parse(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("left") {
            Some(Self::Left)
        } else if name.eq_ignore_ascii_case("right") {
            Some(Self::Right)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// A writable device property, one variant per feature setter.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceProperty {
    Buzzer(bool),
    Led(bool),
    LedBrightness(u8),
    ChildLock(bool),
    FavoriteLevel(u8),
    FanLevel(u8),
    /// Encoded operation mode from the driver's preset vocabulary.
    Mode(PresetCode),
    TargetHumidity(u8),
    OscillationAngle(u16),
    /// Delayed-off countdown in seconds.
    DelayOff(u32),
    NaturalMode(bool),
    Oscillate(bool),
    MoveDirection(MoveDirection),
    Dry(bool),
    Ptc(bool),
    Display(bool),
    WetProtection(bool),
    MotorSpeed(u16),
    Volume(u8),
    ExtraFeatures(u32),
    ResetFilter,
    AutoDetect(bool),
    LearnMode(bool),
}

/// A blocking call issued through the command executor.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCall {
    On,
    Off,
    Set(DeviceProperty),
}

/// Errors raised by the device transport. All of these are transient
/// operational conditions: they are logged, converted into a boolean
/// failure and an availability effect, and never propagate further.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    /// Device did not answer
    #[error("device unreachable: {0}")]
    Unreachable(String),

    /// Answer could not be decoded
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Token rejected by the device
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The bounded per-call timeout elapsed
    #[error("device call timed out after {0:?}")]
    Timeout(Duration),

    /// The offloaded task itself failed to complete
    #[error("blocking executor failure: {0}")]
    Executor(String),
}

/// Result of the lightweight `info()` probe used when no explicit model
/// is configured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceProbe {
    pub model: String,
    pub firmware_version: String,
    pub hardware_version: String,
    pub mac_address: String,
}

/// Blocking control surface of one physical device.
///
/// Exclusively owned by one adapter; calls against a single handle are
/// never issued concurrently (the transport cannot multiplex).
pub trait MiioDevice: Send {
    fn on(&mut self) -> Result<CommandResult, TransportError>;

    fn off(&mut self) -> Result<CommandResult, TransportError>;

    fn status(&mut self) -> Result<StateSnapshot, TransportError>;

    fn set_property(&mut self, property: DeviceProperty) -> Result<CommandResult, TransportError>;
}

/// Produces device handles for resolved models.
pub trait DeviceConnector: Send + Sync {
    /// Lightweight `info()` probe, used to auto-detect the model when
    /// the configuration does not name one.
    fn probe(&self, host: &str, token: &str) -> Result<DeviceProbe, TransportError>;

    /// Open a handle for a resolved model.
    fn connect(
        &self,
        model: &str,
        protocol: Protocol,
        host: &str,
        token: &str,
    ) -> Result<Box<dyn MiioDevice>, TransportError>;
}
