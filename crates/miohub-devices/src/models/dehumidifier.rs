//! Dehumidifier tables.

use std::sync::Arc;

use crate::capability::Capabilities;
use crate::device::FieldKind;
use crate::driver::{
    AttributeSpec, DriverDescriptor, EnumDecoder, PresetCode, PresetMode, Protocol,
};

/// Family descriptor for the nwt.derh. prefix (wdh318efw1).
pub(super) fn generic() -> Arc<DriverDescriptor> {
    DriverDescriptor::new("airdehumidifier", Protocol::Miio)
        .with_capabilities(
            Capabilities::SET_BUZZER
                | Capabilities::SET_CHILD_LOCK
                | Capabilities::SET_LED
                | Capabilities::SET_TARGET_HUMIDITY,
        )
        .with_field("temperature", FieldKind::Float)
        .with_field("humidity", FieldKind::Integer)
        .with_field("mode", FieldKind::Enum)
        .with_field("buzzer", FieldKind::Boolean)
        .with_field("child_lock", FieldKind::Boolean)
        .with_field("target_humidity", FieldKind::Integer)
        .with_field("led", FieldKind::Boolean)
        .with_field("fan_speed", FieldKind::Enum)
        .with_field("tank_full", FieldKind::Boolean)
        .with_field("compressor_status", FieldKind::Boolean)
        .with_field("defrost_status", FieldKind::Boolean)
        .with_field("alarm", FieldKind::Boolean)
        .with_attribute(AttributeSpec::new("temperature", "temperature"))
        .with_attribute(AttributeSpec::new("humidity", "humidity"))
        .with_attribute(AttributeSpec::new("mode", "mode").with_decoder(EnumDecoder::Name))
        .with_attribute(AttributeSpec::new("buzzer", "buzzer"))
        .with_attribute(AttributeSpec::new("child_lock", "child_lock"))
        .with_attribute(AttributeSpec::new("target_humidity", "target_humidity"))
        .with_attribute(AttributeSpec::new("led", "led"))
        .with_attribute(
            AttributeSpec::new("fan_speed", "fan_speed").with_decoder(EnumDecoder::Value),
        )
        .with_attribute(AttributeSpec::new("tank_full", "tank_full"))
        .with_attribute(AttributeSpec::new("compressor_status", "compressor_status"))
        .with_attribute(AttributeSpec::new("defrost_status", "defrost_status"))
        .with_attribute(AttributeSpec::new("alarm", "alarm"))
        .with_preset(PresetMode::new("On", PresetCode::Text("on".into())))
        .with_preset(PresetMode::new("Auto", PresetCode::Text("auto".into())))
        .with_preset(PresetMode::new(
            "Dry Cloth",
            PresetCode::Text("dry_cloth".into()),
        ))
        .shared()
}
