//! Pedestal fan tables.
//!
//! Fans expose speed levels instead of operation modes; the level
//! vocabulary maps each named level to a raw speed value, and the "Off"
//! level is the documented power-off preset.

use std::sync::Arc;

use crate::capability::Capabilities;
use crate::device::FieldKind;
use crate::driver::{
    AttributeSpec, DriverDescriptor, EnumDecoder, PresetCode, PresetMode, Protocol,
};

fn speed_levels(values: [i64; 4]) -> Vec<PresetMode> {
    let mut presets = vec![PresetMode::new("Off", PresetCode::Int(0))];
    for (i, value) in values.into_iter().enumerate() {
        presets.push(PresetMode::new(
            format!("Level {}", i + 1),
            PresetCode::Int(value),
        ));
    }
    presets
}

/// Family descriptor for the zhimi.fan. prefix (v2, v3, sa1, za1, za3,
/// za4).
pub(super) fn legacy() -> Arc<DriverDescriptor> {
    let mut descriptor = DriverDescriptor::new("fan", Protocol::Miio)
        .with_capabilities(
            Capabilities::SET_BUZZER
                | Capabilities::SET_CHILD_LOCK
                | Capabilities::SET_LED_BRIGHTNESS
                | Capabilities::SET_OSCILLATE
                | Capabilities::SET_OSCILLATION_ANGLE
                | Capabilities::SET_MOVE_DIRECTION
                | Capabilities::SET_NATURAL_MODE
                | Capabilities::SET_DELAY_OFF,
        )
        .with_field("angle", FieldKind::Integer)
        .with_field("speed", FieldKind::Integer)
        .with_field("delay_off_countdown", FieldKind::Integer)
        .with_field("ac_power", FieldKind::Boolean)
        .with_field("oscillate", FieldKind::Boolean)
        .with_field("direct_speed", FieldKind::Integer)
        .with_field("natural_speed", FieldKind::Integer)
        .with_field("child_lock", FieldKind::Boolean)
        .with_field("buzzer", FieldKind::Boolean)
        .with_field("led_brightness", FieldKind::Enum)
        .with_field("use_time", FieldKind::Integer)
        .with_attribute(AttributeSpec::new("angle", "angle"))
        .with_attribute(AttributeSpec::new("raw_speed", "speed"))
        .with_attribute(AttributeSpec::new(
            "delay_off_countdown",
            "delay_off_countdown",
        ))
        .with_attribute(AttributeSpec::new("ac_power", "ac_power"))
        .with_attribute(AttributeSpec::new("oscillate", "oscillate"))
        .with_attribute(AttributeSpec::new("direct_speed", "direct_speed"))
        .with_attribute(AttributeSpec::new("natural_speed", "natural_speed"))
        .with_attribute(AttributeSpec::new("child_lock", "child_lock"))
        .with_attribute(AttributeSpec::new("buzzer", "buzzer"))
        .with_attribute(
            AttributeSpec::new("led_brightness", "led_brightness")
                .with_decoder(EnumDecoder::Value),
        )
        .with_attribute(AttributeSpec::new("use_time", "use_time"))
        .with_power_off_preset("Off");
    for preset in speed_levels([1, 35, 74, 100]) {
        descriptor = descriptor.with_preset(preset);
    }
    descriptor.shared()
}

fn p5_like(family: &str, protocol: Protocol) -> DriverDescriptor {
    DriverDescriptor::new(family, protocol)
        .with_capabilities(
            Capabilities::SET_BUZZER
                | Capabilities::SET_CHILD_LOCK
                | Capabilities::SET_NATURAL_MODE
                | Capabilities::SET_OSCILLATE
                | Capabilities::SET_OSCILLATION_ANGLE
                | Capabilities::SET_MOVE_DIRECTION
                | Capabilities::SET_LED
                | Capabilities::SET_DELAY_OFF,
        )
        .with_field("mode", FieldKind::Enum)
        .with_field("oscillate", FieldKind::Boolean)
        .with_field("angle", FieldKind::Integer)
        .with_field("delay_off_countdown", FieldKind::Integer)
        .with_field("led", FieldKind::Boolean)
        .with_field("buzzer", FieldKind::Boolean)
        .with_field("child_lock", FieldKind::Boolean)
        .with_field("speed", FieldKind::Integer)
        .with_attribute(AttributeSpec::new("mode", "mode").with_decoder(EnumDecoder::Name))
        .with_attribute(AttributeSpec::new("oscillate", "oscillate"))
        .with_attribute(AttributeSpec::new("angle", "angle"))
        .with_attribute(AttributeSpec::new(
            "delay_off_countdown",
            "delay_off_countdown",
        ))
        .with_attribute(AttributeSpec::new("led", "led"))
        .with_attribute(AttributeSpec::new("buzzer", "buzzer"))
        .with_attribute(AttributeSpec::new("child_lock", "child_lock"))
        .with_attribute(AttributeSpec::new("raw_speed", "speed"))
        .with_power_off_preset("Off")
}

/// dmaker.fan.p5. The level-2/3 speed values differ from the legacy
/// fans.
pub(super) fn p5() -> Arc<DriverDescriptor> {
    let mut descriptor = p5_like("fan-p5", Protocol::Miio);
    for preset in speed_levels([1, 35, 70, 100]) {
        descriptor = descriptor.with_preset(preset);
    }
    descriptor.shared()
}

/// dmaker.fan.p9 / p10 / p11 (MiOT protocol), same shape as the p5.
pub(super) fn miot() -> Arc<DriverDescriptor> {
    let mut descriptor = p5_like("fan-miot", Protocol::Miot);
    for preset in speed_levels([1, 35, 70, 100]) {
        descriptor = descriptor.with_preset(preset);
    }
    descriptor.shared()
}
