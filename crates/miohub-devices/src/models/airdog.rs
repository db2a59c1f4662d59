//! Airdog purifier tables.

use std::sync::Arc;

use crate::capability::Capabilities;
use crate::device::FieldKind;
use crate::driver::{
    AttributeSpec, DriverDescriptor, EnumDecoder, PresetCode, PresetMode, Protocol, Quirks,
};

/// airdog.airpurifier.x3 / x5 / x7sm.
///
/// Carries [`Quirks::REPEAT_MODE_WRITE`]: these units have been
/// observed to ignore the first mode write when switching from Night or
/// Auto to a manual speed.
pub(super) fn x_series() -> Arc<DriverDescriptor> {
    DriverDescriptor::new("airdog-airpurifier", Protocol::Miio)
        .with_capabilities(Capabilities::SET_BUZZER | Capabilities::SET_CHILD_LOCK)
        .with_quirks(Quirks::REPEAT_MODE_WRITE)
        .with_field("pm25", FieldKind::Integer)
        .with_field("mode", FieldKind::Enum)
        .with_field("speed", FieldKind::Integer)
        .with_field("child_lock", FieldKind::Boolean)
        .with_field("clean_filters", FieldKind::Boolean)
        .with_attribute(AttributeSpec::new("pm25", "pm25"))
        .with_attribute(AttributeSpec::new("mode", "mode").with_decoder(EnumDecoder::Name))
        .with_attribute(AttributeSpec::new("speed", "speed"))
        .with_attribute(AttributeSpec::new("child_lock", "child_lock"))
        .with_attribute(AttributeSpec::new("clean_filters", "clean_filters"))
        .with_preset(PresetMode::new("Auto", PresetCode::Text("auto".into())))
        .with_preset(PresetMode::new("Night", PresetCode::Text("sleep".into())))
        .with_preset(PresetMode::new("Speed 1", PresetCode::Int(1)))
        .with_preset(PresetMode::new("Speed 2", PresetCode::Int(2)))
        .with_preset(PresetMode::new("Speed 3", PresetCode::Int(3)))
        .with_preset(PresetMode::new("Speed 4", PresetCode::Int(4)))
        .shared()
}
