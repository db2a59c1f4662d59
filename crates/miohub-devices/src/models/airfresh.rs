//! Air fresher (fresh air ventilator) tables.

use std::sync::Arc;

use crate::capability::Capabilities;
use crate::device::FieldKind;
use crate::driver::{
    AttributeSpec, DriverDescriptor, EnumDecoder, PresetCode, PresetMode, Protocol,
};

/// Family descriptor for the zhimi.airfresh. prefix (va2).
pub(super) fn va2() -> Arc<DriverDescriptor> {
    let mut descriptor = DriverDescriptor::new("airfresh", Protocol::Miio)
        .with_capabilities(
            Capabilities::SET_BUZZER
                | Capabilities::SET_CHILD_LOCK
                | Capabilities::SET_LED
                | Capabilities::SET_LED_BRIGHTNESS
                | Capabilities::RESET_FILTER
                | Capabilities::SET_EXTRA_FEATURES,
        )
        .with_field("temperature", FieldKind::Float)
        .with_field("aqi", FieldKind::Integer)
        .with_field("average_aqi", FieldKind::Integer)
        .with_field("co2", FieldKind::Integer)
        .with_field("humidity", FieldKind::Integer)
        .with_field("mode", FieldKind::Enum)
        .with_field("led", FieldKind::Boolean)
        .with_field("led_brightness", FieldKind::Enum)
        .with_field("buzzer", FieldKind::Boolean)
        .with_field("child_lock", FieldKind::Boolean)
        .with_field("filter_life_remaining", FieldKind::Integer)
        .with_field("filter_hours_used", FieldKind::Integer)
        .with_field("use_time", FieldKind::Integer)
        .with_field("motor_speed", FieldKind::Integer)
        .with_attribute(AttributeSpec::new("temperature", "temperature"))
        .with_attribute(AttributeSpec::new("aqi", "aqi"))
        .with_attribute(AttributeSpec::new("average_aqi", "average_aqi"))
        .with_attribute(AttributeSpec::new("co2", "co2"))
        .with_attribute(AttributeSpec::new("humidity", "humidity"))
        .with_attribute(AttributeSpec::new("mode", "mode").with_decoder(EnumDecoder::Name))
        .with_attribute(AttributeSpec::new("led", "led"))
        .with_attribute(
            AttributeSpec::new("led_brightness", "led_brightness")
                .with_decoder(EnumDecoder::Value),
        )
        .with_attribute(AttributeSpec::new("buzzer", "buzzer"))
        .with_attribute(AttributeSpec::new("child_lock", "child_lock"))
        .with_attribute(AttributeSpec::new(
            "filter_life_remaining",
            "filter_life_remaining",
        ))
        .with_attribute(AttributeSpec::new("filter_hours_used", "filter_hours_used"))
        .with_attribute(AttributeSpec::new("use_time", "use_time"))
        .with_attribute(AttributeSpec::new("motor_speed", "motor_speed"));
    for name in ["Auto", "Silent", "Interval", "Low", "Middle", "Strong"] {
        descriptor = descriptor.with_preset(PresetMode::new(
            name,
            PresetCode::Text(name.to_ascii_lowercase()),
        ));
    }
    descriptor.shared()
}

/// dmaker.airfresh.t2017, which adds the ptc heater and display.
pub(super) fn t2017() -> Arc<DriverDescriptor> {
    DriverDescriptor::new("airfresh-t2017", Protocol::Miio)
        .with_capabilities(
            Capabilities::SET_BUZZER
                | Capabilities::SET_CHILD_LOCK
                | Capabilities::SET_PTC
                | Capabilities::SET_DISPLAY
                | Capabilities::SET_MOTOR_SPEED
                | Capabilities::RESET_FILTER,
        )
        .with_field("pm25", FieldKind::Integer)
        .with_field("co2", FieldKind::Integer)
        .with_field("temperature_outside", FieldKind::Float)
        .with_field("mode", FieldKind::Enum)
        .with_field("favourite_speed", FieldKind::Integer)
        .with_field("control_speed", FieldKind::Integer)
        .with_field("ptc", FieldKind::Boolean)
        .with_field("display", FieldKind::Boolean)
        .with_field("child_lock", FieldKind::Boolean)
        .with_field("sound", FieldKind::Boolean)
        .with_attribute(AttributeSpec::new("pm25", "pm25"))
        .with_attribute(AttributeSpec::new("co2", "co2"))
        .with_attribute(AttributeSpec::new(
            "temperature_outside",
            "temperature_outside",
        ))
        .with_attribute(AttributeSpec::new("mode", "mode").with_decoder(EnumDecoder::Name))
        .with_attribute(AttributeSpec::new("favourite_speed", "favourite_speed"))
        .with_attribute(AttributeSpec::new("control_speed", "control_speed"))
        .with_attribute(AttributeSpec::new("ptc", "ptc"))
        .with_attribute(AttributeSpec::new("display", "display"))
        .with_attribute(AttributeSpec::new("child_lock", "child_lock"))
        .with_attribute(AttributeSpec::new("buzzer", "sound"))
        .with_preset(PresetMode::new("Auto", PresetCode::Text("auto".into())))
        .with_preset(PresetMode::new("Sleep", PresetCode::Text("sleep".into())))
        .with_preset(PresetMode::new(
            "Favourite",
            PresetCode::Text("favourite".into()),
        ))
        .shared()
}
