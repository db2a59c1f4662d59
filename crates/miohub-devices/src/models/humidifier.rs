//! zhimi / deerma / shuii humidifier tables.

use std::sync::Arc;

use crate::capability::Capabilities;
use crate::device::FieldKind;
use crate::driver::{
    AttributeSpec, DriverDescriptor, EnumDecoder, PresetCode, PresetMode, Protocol,
};

fn common(family: &str, protocol: Protocol) -> DriverDescriptor {
    DriverDescriptor::new(family, protocol)
        .with_field("temperature", FieldKind::Float)
        .with_field("humidity", FieldKind::Integer)
        .with_field("mode", FieldKind::Enum)
        .with_field("buzzer", FieldKind::Boolean)
        .with_attribute(AttributeSpec::new("temperature", "temperature"))
        .with_attribute(AttributeSpec::new("humidity", "humidity"))
        .with_attribute(AttributeSpec::new("mode", "mode").with_decoder(EnumDecoder::Name))
        .with_attribute(AttributeSpec::new("buzzer", "buzzer"))
}

/// Family descriptor for the zhimi.humidifier. prefix (v1).
pub(super) fn generic() -> Arc<DriverDescriptor> {
    common("airhumidifier", Protocol::Miio)
        .with_capabilities(
            Capabilities::SET_BUZZER
                | Capabilities::SET_CHILD_LOCK
                | Capabilities::SET_LED
                | Capabilities::SET_LED_BRIGHTNESS
                | Capabilities::SET_TARGET_HUMIDITY,
        )
        .with_field("target_humidity", FieldKind::Integer)
        .with_field("trans_level", FieldKind::Integer)
        .with_field("child_lock", FieldKind::Boolean)
        .with_field("led_brightness", FieldKind::Enum)
        .with_field("use_time", FieldKind::Integer)
        .with_attribute(AttributeSpec::new("target_humidity", "target_humidity"))
        .with_attribute(AttributeSpec::new("trans_level", "trans_level"))
        .with_attribute(AttributeSpec::new("child_lock", "child_lock"))
        .with_attribute(
            AttributeSpec::new("led_brightness", "led_brightness")
                .with_decoder(EnumDecoder::Value),
        )
        .with_attribute(AttributeSpec::new("use_time", "use_time"))
        .with_preset(PresetMode::new("Silent", PresetCode::Text("silent".into())))
        .with_preset(PresetMode::new("Medium", PresetCode::Text("medium".into())))
        .with_preset(PresetMode::new("High", PresetCode::Text("high".into())))
        .shared()
}

/// zhimi.humidifier.ca1 / cb1, which add the dry mode.
pub(super) fn ca_cb() -> Arc<DriverDescriptor> {
    common("airhumidifier-ca-cb", Protocol::Miio)
        .with_capabilities(
            Capabilities::SET_BUZZER
                | Capabilities::SET_CHILD_LOCK
                | Capabilities::SET_LED
                | Capabilities::SET_LED_BRIGHTNESS
                | Capabilities::SET_TARGET_HUMIDITY
                | Capabilities::SET_DRY,
        )
        .with_field("target_humidity", FieldKind::Integer)
        .with_field("motor_speed", FieldKind::Integer)
        .with_field("depth", FieldKind::Integer)
        .with_field("dry", FieldKind::Boolean)
        .with_field("child_lock", FieldKind::Boolean)
        .with_field("led_brightness", FieldKind::Enum)
        .with_attribute(AttributeSpec::new("target_humidity", "target_humidity"))
        .with_attribute(AttributeSpec::new("motor_speed", "motor_speed"))
        .with_attribute(AttributeSpec::new("depth", "depth"))
        .with_attribute(AttributeSpec::new("dry", "dry"))
        .with_attribute(AttributeSpec::new("child_lock", "child_lock"))
        .with_attribute(
            AttributeSpec::new("led_brightness", "led_brightness")
                .with_decoder(EnumDecoder::Value),
        )
        .with_preset(PresetMode::new("Auto", PresetCode::Text("auto".into())))
        .with_preset(PresetMode::new("Silent", PresetCode::Text("silent".into())))
        .with_preset(PresetMode::new("Medium", PresetCode::Text("medium".into())))
        .with_preset(PresetMode::new("High", PresetCode::Text("high".into())))
        .shared()
}

/// zhimi.humidifier.ca4 (MiOT protocol).
pub(super) fn ca4() -> Arc<DriverDescriptor> {
    common("airhumidifier-miot", Protocol::Miot)
        .with_capabilities(
            Capabilities::SET_BUZZER
                | Capabilities::SET_CHILD_LOCK
                | Capabilities::SET_LED_BRIGHTNESS
                | Capabilities::SET_TARGET_HUMIDITY
                | Capabilities::SET_DRY
                | Capabilities::SET_MOTOR_SPEED,
        )
        .with_field("actual_speed", FieldKind::Integer)
        .with_field("motor_speed", FieldKind::Integer)
        .with_field("water_level", FieldKind::Integer)
        .with_field("dry", FieldKind::Boolean)
        .with_field("fahrenheit", FieldKind::Float)
        .with_attribute(AttributeSpec::new("actual_speed", "actual_speed"))
        .with_attribute(AttributeSpec::new("motor_speed", "motor_speed"))
        .with_attribute(AttributeSpec::new("water_level", "water_level"))
        .with_attribute(AttributeSpec::new("dry", "dry"))
        .with_attribute(AttributeSpec::new("fahrenheit", "fahrenheit"))
        .with_preset(PresetMode::new("Low", PresetCode::Int(1)))
        .with_preset(PresetMode::new("Medium", PresetCode::Int(2)))
        .with_preset(PresetMode::new("High", PresetCode::Int(3)))
        .shared()
}

/// deerma.humidifier.mjjsq / jsq1.
pub(super) fn mjjsq() -> Arc<DriverDescriptor> {
    common("airhumidifier-mjjsq", Protocol::Miio)
        .with_capabilities(
            Capabilities::SET_BUZZER
                | Capabilities::SET_LED
                | Capabilities::SET_TARGET_HUMIDITY
                | Capabilities::SET_WET_PROTECTION,
        )
        .with_field("led", FieldKind::Boolean)
        .with_field("no_water", FieldKind::Boolean)
        .with_field("water_tank_detached", FieldKind::Boolean)
        .with_attribute(AttributeSpec::new("led", "led"))
        .with_attribute(AttributeSpec::new("no_water", "no_water"))
        .with_attribute(AttributeSpec::new(
            "water_tank_detached",
            "water_tank_detached",
        ))
        .with_preset(PresetMode::new("Low", PresetCode::Int(1)))
        .with_preset(PresetMode::new("Medium", PresetCode::Int(2)))
        .with_preset(PresetMode::new("High", PresetCode::Int(3)))
        .with_preset(PresetMode::new("Humidity", PresetCode::Int(4)))
        .shared()
}

/// shuii.humidifier.jsq001.
pub(super) fn jsq() -> Arc<DriverDescriptor> {
    common("airhumidifier-jsq", Protocol::Miio)
        .with_capabilities(
            Capabilities::SET_BUZZER
                | Capabilities::SET_LED
                | Capabilities::SET_LED_BRIGHTNESS
                | Capabilities::SET_CHILD_LOCK,
        )
        .with_field("child_lock", FieldKind::Boolean)
        .with_field("led", FieldKind::Boolean)
        .with_field("led_brightness", FieldKind::Enum)
        .with_field("no_water", FieldKind::Boolean)
        .with_field("lid_opened", FieldKind::Boolean)
        .with_attribute(AttributeSpec::new("child_lock", "child_lock"))
        .with_attribute(AttributeSpec::new("led", "led"))
        .with_attribute(
            AttributeSpec::new("led_brightness", "led_brightness")
                .with_decoder(EnumDecoder::Value),
        )
        .with_attribute(AttributeSpec::new("no_water", "no_water"))
        .with_attribute(AttributeSpec::new("lid_opened", "lid_opened"))
        .with_preset(PresetMode::new("Intelligent", PresetCode::Int(1)))
        .with_preset(PresetMode::new("Level 1", PresetCode::Int(2)))
        .with_preset(PresetMode::new("Level 2", PresetCode::Int(3)))
        .with_preset(PresetMode::new("Level 3", PresetCode::Int(4)))
        .shared()
}
