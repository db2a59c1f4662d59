//! Capability flags.
//!
//! Each bit marks an optional command a concrete model supports.
//! Setters check their bit and silently no-op when it is absent, so a
//! fleet-wide "set buzzer" can be issued uniformly across heterogeneous
//! units without knowing per-model support.

use bitflags::bitflags;

bitflags! {
    /// Optional-feature bitmask carried by every driver descriptor.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Capabilities: u32 {
        const SET_BUZZER = 1 << 0;
        const SET_LED = 1 << 1;
        const SET_CHILD_LOCK = 1 << 2;
        const SET_LED_BRIGHTNESS = 1 << 3;
        const SET_FAVORITE_LEVEL = 1 << 4;
        const SET_AUTO_DETECT = 1 << 5;
        const SET_LEARN_MODE = 1 << 6;
        const SET_VOLUME = 1 << 7;
        const RESET_FILTER = 1 << 8;
        const SET_EXTRA_FEATURES = 1 << 9;
        const SET_TARGET_HUMIDITY = 1 << 10;
        const SET_DRY = 1 << 11;
        const SET_OSCILLATION_ANGLE = 1 << 12;
        const SET_NATURAL_MODE = 1 << 13;
        const SET_FAN_LEVEL = 1 << 14;
        const SET_MOTOR_SPEED = 1 << 15;
        const SET_DELAY_OFF = 1 << 16;
        const SET_PTC = 1 << 17;
        const SET_DISPLAY = 1 << 18;
        const SET_WET_PROTECTION = 1 << 19;
        const SET_OSCILLATE = 1 << 20;
        const SET_MOVE_DIRECTION = 1 << 21;
    }
}
