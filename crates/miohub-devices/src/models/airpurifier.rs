//! zhimi air purifier tables.

use std::sync::Arc;

use crate::capability::Capabilities;
use crate::device::FieldKind;
use crate::driver::{
    AttributeSpec, DriverDescriptor, EnumDecoder, PresetCode, PresetMode, Protocol,
};

fn text_presets(names: &[&str]) -> Vec<PresetMode> {
    names
        .iter()
        .map(|name| PresetMode::new(*name, PresetCode::Text(name.to_ascii_lowercase())))
        .collect()
}

fn common(family: &str, protocol: Protocol) -> DriverDescriptor {
    DriverDescriptor::new(family, protocol)
        .with_field("temperature", FieldKind::Float)
        .with_field("humidity", FieldKind::Integer)
        .with_field("aqi", FieldKind::Integer)
        .with_field("average_aqi", FieldKind::Integer)
        .with_field("mode", FieldKind::Enum)
        .with_field("filter_hours_used", FieldKind::Integer)
        .with_field("filter_life_remaining", FieldKind::Integer)
        .with_field("favorite_level", FieldKind::Integer)
        .with_field("child_lock", FieldKind::Boolean)
        .with_field("led", FieldKind::Boolean)
        .with_field("motor_speed", FieldKind::Integer)
        .with_attribute(AttributeSpec::new("temperature", "temperature"))
        .with_attribute(AttributeSpec::new("humidity", "humidity"))
        .with_attribute(AttributeSpec::new("aqi", "aqi"))
        .with_attribute(AttributeSpec::new("average_aqi", "average_aqi"))
        .with_attribute(AttributeSpec::new("mode", "mode").with_decoder(EnumDecoder::Name))
        .with_attribute(AttributeSpec::new("filter_hours_used", "filter_hours_used"))
        .with_attribute(AttributeSpec::new(
            "filter_life_remaining",
            "filter_life_remaining",
        ))
        .with_attribute(AttributeSpec::new("favorite_level", "favorite_level"))
        .with_attribute(AttributeSpec::new("child_lock", "child_lock"))
        .with_attribute(AttributeSpec::new("led", "led"))
        .with_attribute(AttributeSpec::new("motor_speed", "motor_speed"))
}

/// Family descriptor for the zhimi.airpurifier. prefix (v1, v2, m1,
/// m2, ma1, ma2, sa1, sa2 and friends).
pub(super) fn generic() -> Arc<DriverDescriptor> {
    let mut descriptor = common("airpurifier", Protocol::Miio)
        .with_capabilities(
            Capabilities::SET_BUZZER
                | Capabilities::SET_CHILD_LOCK
                | Capabilities::SET_LED
                | Capabilities::SET_LED_BRIGHTNESS
                | Capabilities::SET_FAVORITE_LEVEL
                | Capabilities::SET_LEARN_MODE
                | Capabilities::RESET_FILTER
                | Capabilities::SET_EXTRA_FEATURES,
        )
        .with_field("buzzer", FieldKind::Boolean)
        .with_field("led_brightness", FieldKind::Enum)
        .with_field("purify_volume", FieldKind::Integer)
        .with_field("use_time", FieldKind::Integer)
        .with_attribute(AttributeSpec::new("buzzer", "buzzer"))
        .with_attribute(
            AttributeSpec::new("led_brightness", "led_brightness")
                .with_decoder(EnumDecoder::Value),
        )
        .with_attribute(AttributeSpec::new("purify_volume", "purify_volume"))
        .with_attribute(AttributeSpec::new("use_time", "use_time"));
    for preset in text_presets(&["Auto", "Silent", "Favorite", "Idle"]) {
        descriptor = descriptor.with_preset(preset);
    }
    descriptor.shared()
}

/// zhimi.airpurifier.v6 (Pro).
pub(super) fn pro() -> Arc<DriverDescriptor> {
    let mut descriptor = common("airpurifier-pro", Protocol::Miio)
        .with_capabilities(
            Capabilities::SET_CHILD_LOCK
                | Capabilities::SET_LED
                | Capabilities::SET_FAVORITE_LEVEL
                | Capabilities::SET_AUTO_DETECT
                | Capabilities::SET_VOLUME,
        )
        .with_field("illuminance", FieldKind::Integer)
        .with_field("motor2_speed", FieldKind::Integer)
        .with_field("volume", FieldKind::Integer)
        .with_attribute(AttributeSpec::new("illuminance", "illuminance"))
        .with_attribute(AttributeSpec::new("motor2_speed", "motor2_speed"))
        .with_attribute(AttributeSpec::new("volume", "volume"));
    for preset in text_presets(&["Auto", "Silent", "Favorite"]) {
        descriptor = descriptor.with_preset(preset);
    }
    descriptor.shared()
}

/// zhimi.airpurifier.v7 (Pro V7).
pub(super) fn pro_v7() -> Arc<DriverDescriptor> {
    let mut descriptor = common("airpurifier-pro-v7", Protocol::Miio)
        .with_capabilities(
            Capabilities::SET_CHILD_LOCK
                | Capabilities::SET_LED
                | Capabilities::SET_FAVORITE_LEVEL
                | Capabilities::SET_VOLUME,
        )
        .with_field("illuminance", FieldKind::Integer)
        .with_field("volume", FieldKind::Integer)
        .with_attribute(AttributeSpec::new("illuminance", "illuminance"))
        .with_attribute(AttributeSpec::new("volume", "volume"));
    for preset in text_presets(&["Auto", "Silent", "Favorite"]) {
        descriptor = descriptor.with_preset(preset);
    }
    descriptor.shared()
}

/// zhimi.airpurifier.mc1 (2S).
pub(super) fn two_s() -> Arc<DriverDescriptor> {
    let mut descriptor = common("airpurifier-2s", Protocol::Miio)
        .with_capabilities(
            Capabilities::SET_BUZZER
                | Capabilities::SET_CHILD_LOCK
                | Capabilities::SET_LED
                | Capabilities::SET_FAVORITE_LEVEL,
        )
        .with_field("buzzer", FieldKind::Boolean)
        .with_field("illuminance", FieldKind::Integer)
        .with_attribute(AttributeSpec::new("buzzer", "buzzer"))
        .with_attribute(AttributeSpec::new("illuminance", "illuminance"));
    for preset in text_presets(&["Auto", "Silent", "Favorite"]) {
        descriptor = descriptor.with_preset(preset);
    }
    descriptor.shared()
}

/// zhimi.airpurifier.v3, a very basic revision with its own table.
pub(super) fn v3() -> Arc<DriverDescriptor> {
    let mut descriptor = DriverDescriptor::new("airpurifier-v3", Protocol::Miio)
        .with_capabilities(
            Capabilities::SET_BUZZER | Capabilities::SET_CHILD_LOCK | Capabilities::SET_LED,
        )
        .with_field("aqi", FieldKind::Integer)
        .with_field("mode", FieldKind::Enum)
        .with_field("led", FieldKind::Boolean)
        .with_field("buzzer", FieldKind::Boolean)
        .with_field("child_lock", FieldKind::Boolean)
        .with_field("illuminance", FieldKind::Integer)
        .with_field("filter_hours_used", FieldKind::Integer)
        .with_field("filter_life_remaining", FieldKind::Integer)
        .with_field("motor_speed", FieldKind::Integer)
        .with_attribute(AttributeSpec::new("aqi", "aqi"))
        .with_attribute(AttributeSpec::new("mode", "mode").with_decoder(EnumDecoder::Name))
        .with_attribute(AttributeSpec::new("led", "led"))
        .with_attribute(AttributeSpec::new("buzzer", "buzzer"))
        .with_attribute(AttributeSpec::new("child_lock", "child_lock"))
        .with_attribute(AttributeSpec::new("illuminance", "illuminance"))
        .with_attribute(AttributeSpec::new("filter_hours_used", "filter_hours_used"))
        .with_attribute(AttributeSpec::new(
            "filter_life_remaining",
            "filter_life_remaining",
        ))
        .with_attribute(AttributeSpec::new("motor_speed", "motor_speed"));
    for preset in text_presets(&[
        "Auto", "Silent", "Favorite", "Idle", "Medium", "High", "Strong",
    ]) {
        descriptor = descriptor.with_preset(preset);
    }
    descriptor.shared()
}

/// zhimi.airpurifier.ma4 / mb3 (MiOT protocol).
pub(super) fn miot() -> Arc<DriverDescriptor> {
    common("airpurifier-miot", Protocol::Miot)
        .with_capabilities(
            Capabilities::SET_BUZZER
                | Capabilities::SET_CHILD_LOCK
                | Capabilities::SET_LED
                | Capabilities::SET_FAVORITE_LEVEL
                | Capabilities::SET_FAN_LEVEL
                | Capabilities::SET_LED_BRIGHTNESS,
        )
        .with_field("buzzer", FieldKind::Boolean)
        .with_field("led_brightness", FieldKind::Enum)
        .with_field("fan_level", FieldKind::Integer)
        .with_field("use_time", FieldKind::Integer)
        .with_attribute(AttributeSpec::new("buzzer", "buzzer"))
        .with_attribute(
            AttributeSpec::new("led_brightness", "led_brightness")
                .with_decoder(EnumDecoder::Value),
        )
        .with_attribute(AttributeSpec::new("fan_level", "fan_level"))
        .with_attribute(AttributeSpec::new("use_time", "use_time"))
        .with_preset(PresetMode::new("Auto", PresetCode::Int(0)))
        .with_preset(PresetMode::new("Silent", PresetCode::Int(1)))
        .with_preset(PresetMode::new("Favorite", PresetCode::Int(2)))
        .with_preset(PresetMode::new("Fan", PresetCode::Int(3)))
        .shared()
}
