//! The polling device adapter.
//!
//! One [`DeviceAdapter`] per physical device. It owns the device handle
//! exclusively, republishes snapshot state through the driver's
//! attribute table, tracks availability against a bounded retry budget
//! and exposes the capability-gated command facade. Transport failures
//! never escape an adapter: they are logged, turned into a
//! [`CommandOutcome`] and reflected in the availability flag.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use crate::capability::Capabilities;
use crate::device::{
    is_success, DeviceCall, DeviceProperty, FieldValue, MoveDirection, StateSnapshot,
};
use crate::driver::{DriverDescriptor, EnumDecoder, PresetCode, Quirks};
use crate::executor::{self, SharedDevice};
use crate::projection::{project, ProjectionError};

/// Snapshot field the operation mode is read from.
const MODE_FIELD: &str = "mode";

/// Snapshot field the oscillation state is read from.
const OSCILLATE_FIELD: &str = "oscillate";

/// Attribute name the configured model is published under.
const ATTR_MODEL: &str = "model";

/// Allowed oscillation angles in degrees.
pub const OSCILLATION_ANGLES: &[u16] = &[30, 60, 90, 120];

/// Allowed delayed-off countdowns in minutes.
pub const DELAY_OFF_MINUTES: &[u32] = &[0, 60, 120, 180, 240, 300, 360, 420, 480];

/// Availability of the adapter as seen by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    /// Before the first successful poll
    Unknown,
    /// Last poll succeeded
    Available,
    /// Retry budget exhausted (or a command transport failure)
    Unavailable,
}

/// Uniform result of a facade command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Device acknowledged with the canonical success token
    Applied,
    /// Capability bit absent; no device call was made
    Skipped,
    /// Argument rejected before any device call
    Rejected,
    /// Device call failed or returned a non-success token
    Failed,
}

impl CommandOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Polling entity bound to one physical device.
pub struct DeviceAdapter {
    name: String,
    model: String,
    driver: Arc<DriverDescriptor>,
    device: SharedDevice,
    timeout: Duration,
    poll_interval: Duration,
    retry_budget: u32,
    consecutive_failures: u32,
    availability: Availability,
    power: Option<bool>,
    current_preset: Option<String>,
    attributes: BTreeMap<String, FieldValue>,
    skip_next_poll: bool,
}

impl DeviceAdapter {
    pub fn new(
        name: impl Into<String>,
        model: impl Into<String>,
        driver: Arc<DriverDescriptor>,
        device: SharedDevice,
        retry_budget: u32,
        timeout: Duration,
        poll_interval: Duration,
    ) -> Self {
        let name = name.into();
        let model = model.into();
        // Attributes start as Null and keep their last-known value
        // across failed polls; consumers must treat them as stale while
        // the adapter is unavailable.
        let mut attributes = BTreeMap::new();
        attributes.insert(ATTR_MODEL.to_string(), FieldValue::Text(model.clone()));
        for spec in driver.attributes() {
            attributes.insert(spec.name.clone(), FieldValue::Null);
        }
        Self {
            name,
            model,
            driver,
            device,
            timeout,
            poll_interval,
            retry_budget,
            consecutive_failures: 0,
            availability: Availability::Unknown,
            power: None,
            current_preset: None,
            attributes,
            skip_next_poll: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn driver(&self) -> &DriverDescriptor {
        &self.driver
    }

    pub fn availability(&self) -> Availability {
        self.availability
    }

    pub fn is_available(&self) -> bool {
        self.availability == Availability::Available
    }

    /// Power state; `None` before the first successful poll.
    pub fn power_state(&self) -> Option<bool> {
        self.power
    }

    /// Currently active preset name, if the cached mode maps to one.
    pub fn preset(&self) -> Option<&str> {
        self.current_preset.as_deref()
    }

    /// Published attributes. Last-known values are kept while the
    /// device is unreachable.
    pub fn attributes(&self) -> &BTreeMap<String, FieldValue> {
        &self.attributes
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Execute a device call, translating any transport failure into a
    /// boolean plus a log line and an availability loss. Success means
    /// the device answered with the canonical token.
    async fn try_command(&mut self, description: &str, call: DeviceCall) -> bool {
        match executor::execute(Arc::clone(&self.device), call, self.timeout).await {
            Ok(result) => {
                tracing::debug!(device = %self.name, ?result, "response received");
                is_success(&result)
            }
            Err(err) => {
                tracing::error!(device = %self.name, error = %err, "{description}");
                self.availability = Availability::Unavailable;
                false
            }
        }
    }

    /// One poll tick: fetch status, project attributes, update
    /// availability.
    ///
    /// Returns an error only for a driver-table/snapshot mismatch,
    /// which is a data defect that must be surfaced, not masked.
    /// Transport failures are absorbed into the retry counter.
    pub async fn poll(&mut self) -> Result<(), ProjectionError> {
        // The device does not reflect a just-issued command yet; skip
        // exactly one fetch after a successful write.
        if self.skip_next_poll {
            self.skip_next_poll = false;
            return Ok(());
        }

        match executor::fetch_status(Arc::clone(&self.device), self.timeout).await {
            Ok(snapshot) => {
                tracing::debug!(device = %self.name, "got new state");
                let projected = project(&snapshot, self.driver.attributes())?;
                self.power = Some(snapshot.is_on());
                self.current_preset = self.derive_preset(&snapshot);
                self.attributes.extend(projected);
                self.consecutive_failures = 0;
                self.availability = Availability::Available;
                Ok(())
            }
            Err(err) => {
                self.consecutive_failures += 1;
                if self.consecutive_failures < self.retry_budget {
                    tracing::info!(
                        device = %self.name,
                        error = %err,
                        retry = self.consecutive_failures,
                        "fetching device state failed, retrying"
                    );
                } else {
                    self.availability = Availability::Unavailable;
                    tracing::error!(
                        device = %self.name,
                        error = %err,
                        retry = self.consecutive_failures,
                        "fetching device state failed, marking unavailable"
                    );
                }
                Ok(())
            }
        }
    }

    /// Cache a value under the public name the driver's table maps
    /// `field` to. No-op when the table carries no such row.
    fn cache_field(&mut self, field: &str, value: FieldValue) {
        let name = self
            .driver
            .attributes()
            .iter()
            .find(|spec| spec.field == field)
            .map(|spec| spec.name.clone());
        if let Some(name) = name {
            self.attributes.insert(name, value);
        }
    }

    /// The value a real poll would publish for the mode attribute after
    /// this preset took effect, per the table's decoder.
    fn mode_cache_value(&self, preset_name: &str, code: &PresetCode) -> Option<FieldValue> {
        let spec = self
            .driver
            .attributes()
            .iter()
            .find(|spec| spec.field == MODE_FIELD)?;
        Some(match (spec.decoder, code) {
            (Some(EnumDecoder::Name), PresetCode::Text(text)) => FieldValue::Text(text.clone()),
            // Integer-coded vocabularies report a symbolic name the
            // table cannot know ahead of the next poll; the preset name
            // is the closest stand-in and is corrected on that poll.
            (Some(EnumDecoder::Name), PresetCode::Int(_)) => {
                FieldValue::Text(preset_name.to_string())
            }
            _ => code.as_field_value(),
        })
    }

    fn is_oscillating(&self) -> bool {
        self.driver
            .attributes()
            .iter()
            .find(|spec| spec.field == OSCILLATE_FIELD)
            .and_then(|spec| self.attributes.get(&spec.name))
            .map_or(false, |value| *value == FieldValue::Boolean(true))
    }

    fn derive_preset(&self, snapshot: &StateSnapshot) -> Option<String> {
        match snapshot.field(MODE_FIELD)? {
            FieldValue::Enum { name, value } => self
                .driver
                .preset(name)
                .map(|p| p.name.clone())
                .or_else(|| {
                    self.driver
                        .preset_for_value(&FieldValue::Integer(*value))
                        .map(str::to_string)
                }),
            FieldValue::Text(text) => self.driver.preset(text).map(|p| p.name.clone()),
            other => self.driver.preset_for_value(other).map(str::to_string),
        }
    }

    /// Turn the device on. A preset argument delegates to
    /// [`set_preset`](Self::set_preset): setting a mode implies "on" on
    /// these devices.
    pub async fn turn_on(&mut self, preset: Option<&str>) -> CommandOutcome {
        if let Some(preset) = preset {
            return self.set_preset(preset).await;
        }
        if self
            .try_command("turning the device on failed", DeviceCall::On)
            .await
        {
            self.power = Some(true);
            self.skip_next_poll = true;
            CommandOutcome::Applied
        } else {
            CommandOutcome::Failed
        }
    }

    /// Turn the device off.
    pub async fn turn_off(&mut self) -> CommandOutcome {
        if self
            .try_command("turning the device off failed", DeviceCall::Off)
            .await
        {
            self.power = Some(false);
            self.skip_next_poll = true;
            CommandOutcome::Applied
        } else {
            CommandOutcome::Failed
        }
    }

    /// Set an operation mode from the driver's preset vocabulary.
    ///
    /// Unknown names are rejected without a device call. The preset a
    /// family documents as power-off is handled as `turn_off`.
    pub async fn set_preset(&mut self, name: &str) -> CommandOutcome {
        let Some(preset) = self.driver.preset(name) else {
            tracing::warn!(device = %self.name, preset = name, "unknown preset rejected");
            return CommandOutcome::Rejected;
        };
        let preset_name = preset.name.clone();
        let code = preset.code.clone();

        if self.driver.implies_power_off(&preset_name) {
            return self.turn_off().await;
        }

        tracing::debug!(device = %self.name, preset = %preset_name, "setting operation mode");

        let repeat = self.driver.quirks().contains(Quirks::REPEAT_MODE_WRITE)
            && self.current_preset.as_deref() != Some(preset_name.as_str());

        let mut ok = self
            .try_command(
                "setting the operation mode failed",
                DeviceCall::Set(DeviceProperty::Mode(code.clone())),
            )
            .await;

        if ok && repeat {
            // Affected firmwares drop the first write when switching
            // out of an automatic mode; the transition only counts once
            // the second write is acknowledged.
            ok = self
                .try_command(
                    "repeating the operation mode write failed",
                    DeviceCall::Set(DeviceProperty::Mode(code.clone())),
                )
                .await;
        }

        if ok {
            if let Some(value) = self.mode_cache_value(&preset_name, &code) {
                self.cache_field(MODE_FIELD, value);
            }
            self.current_preset = Some(preset_name);
            self.power = Some(true);
            self.skip_next_poll = true;
            CommandOutcome::Applied
        } else {
            CommandOutcome::Failed
        }
    }

    async fn gated_set(
        &mut self,
        capability: Capabilities,
        description: &str,
        property: DeviceProperty,
    ) -> CommandOutcome {
        if !self.driver.capabilities().contains(capability) {
            return CommandOutcome::Skipped;
        }
        if self
            .try_command(description, DeviceCall::Set(property))
            .await
        {
            CommandOutcome::Applied
        } else {
            CommandOutcome::Failed
        }
    }

    pub async fn set_buzzer(&mut self, on: bool) -> CommandOutcome {
        self.gated_set(
            Capabilities::SET_BUZZER,
            "setting the buzzer failed",
            DeviceProperty::Buzzer(on),
        )
        .await
    }

    pub async fn set_led(&mut self, on: bool) -> CommandOutcome {
        self.gated_set(
            Capabilities::SET_LED,
            "setting the led failed",
            DeviceProperty::Led(on),
        )
        .await
    }

    /// Brightness is clamped to 0..=2.
    pub async fn set_led_brightness(&mut self, brightness: u8) -> CommandOutcome {
        self.gated_set(
            Capabilities::SET_LED_BRIGHTNESS,
            "setting the led brightness failed",
            DeviceProperty::LedBrightness(brightness.min(2)),
        )
        .await
    }

    pub async fn set_child_lock(&mut self, on: bool) -> CommandOutcome {
        self.gated_set(
            Capabilities::SET_CHILD_LOCK,
            "setting the child lock failed",
            DeviceProperty::ChildLock(on),
        )
        .await
    }

    /// Level is clamped to 0..=17.
    pub async fn set_favorite_level(&mut self, level: u8) -> CommandOutcome {
        self.gated_set(
            Capabilities::SET_FAVORITE_LEVEL,
            "setting the favorite level failed",
            DeviceProperty::FavoriteLevel(level.min(17)),
        )
        .await
    }

    /// Level is clamped to 1..=3.
    pub async fn set_fan_level(&mut self, level: u8) -> CommandOutcome {
        self.gated_set(
            Capabilities::SET_FAN_LEVEL,
            "setting the fan level failed",
            DeviceProperty::FanLevel(level.clamp(1, 3)),
        )
        .await
    }

    pub async fn set_auto_detect(&mut self, on: bool) -> CommandOutcome {
        self.gated_set(
            Capabilities::SET_AUTO_DETECT,
            "setting auto detect failed",
            DeviceProperty::AutoDetect(on),
        )
        .await
    }

    pub async fn set_learn_mode(&mut self, on: bool) -> CommandOutcome {
        self.gated_set(
            Capabilities::SET_LEARN_MODE,
            "setting the learn mode failed",
            DeviceProperty::LearnMode(on),
        )
        .await
    }

    /// Volume is clamped to 0..=100.
    pub async fn set_volume(&mut self, volume: u8) -> CommandOutcome {
        self.gated_set(
            Capabilities::SET_VOLUME,
            "setting the sound volume failed",
            DeviceProperty::Volume(volume.min(100)),
        )
        .await
    }

    pub async fn set_extra_features(&mut self, features: u32) -> CommandOutcome {
        self.gated_set(
            Capabilities::SET_EXTRA_FEATURES,
            "setting the extra features failed",
            DeviceProperty::ExtraFeatures(features),
        )
        .await
    }

    /// Reset the filter lifetime and usage counters.
    pub async fn reset_filter(&mut self) -> CommandOutcome {
        self.gated_set(
            Capabilities::RESET_FILTER,
            "resetting the filter lifetime failed",
            DeviceProperty::ResetFilter,
        )
        .await
    }

    /// Humidity is clamped to 0..=99.
    pub async fn set_target_humidity(&mut self, humidity: u8) -> CommandOutcome {
        self.gated_set(
            Capabilities::SET_TARGET_HUMIDITY,
            "setting the target humidity failed",
            DeviceProperty::TargetHumidity(humidity.min(99)),
        )
        .await
    }

    pub async fn set_dry(&mut self, on: bool) -> CommandOutcome {
        self.gated_set(
            Capabilities::SET_DRY,
            "setting the dry mode failed",
            DeviceProperty::Dry(on),
        )
        .await
    }

    /// Speed is clamped to 200..=2000 rpm.
    pub async fn set_motor_speed(&mut self, speed: u16) -> CommandOutcome {
        self.gated_set(
            Capabilities::SET_MOTOR_SPEED,
            "setting the motor speed failed",
            DeviceProperty::MotorSpeed(speed.clamp(200, 2000)),
        )
        .await
    }

    /// Angle must be one of [`OSCILLATION_ANGLES`].
    pub async fn set_oscillation_angle(&mut self, angle: u16) -> CommandOutcome {
        if !OSCILLATION_ANGLES.contains(&angle) {
            tracing::warn!(device = %self.name, angle, "unsupported oscillation angle rejected");
            return CommandOutcome::Rejected;
        }
        self.gated_set(
            Capabilities::SET_OSCILLATION_ANGLE,
            "setting the oscillation angle failed",
            DeviceProperty::OscillationAngle(angle),
        )
        .await
    }

    /// Countdown must be one of [`DELAY_OFF_MINUTES`]; the device takes
    /// seconds.
    pub async fn set_delay_off(&mut self, minutes: u32) -> CommandOutcome {
        if !DELAY_OFF_MINUTES.contains(&minutes) {
            tracing::warn!(device = %self.name, minutes, "unsupported delay-off countdown rejected");
            return CommandOutcome::Rejected;
        }
        self.gated_set(
            Capabilities::SET_DELAY_OFF,
            "setting the delayed turn off failed",
            DeviceProperty::DelayOff(minutes * 60),
        )
        .await
    }

    pub async fn set_oscillate(&mut self, on: bool) -> CommandOutcome {
        let outcome = self
            .gated_set(
                Capabilities::SET_OSCILLATE,
                "setting oscillate failed",
                DeviceProperty::Oscillate(on),
            )
            .await;
        if outcome.is_applied() {
            self.cache_field(OSCILLATE_FIELD, FieldValue::Boolean(on));
        }
        outcome
    }

    /// Direction must be "left" or "right". An active oscillation is
    /// stopped first; these fans ignore a rotate command while
    /// oscillating.
    pub async fn set_move_direction(&mut self, direction: &str) -> CommandOutcome {
        let Some(direction) = MoveDirection::parse(direction) else {
            tracing::warn!(device = %self.name, direction, "unsupported move direction rejected");
            return CommandOutcome::Rejected;
        };
        if !self
            .driver
            .capabilities()
            .contains(Capabilities::SET_MOVE_DIRECTION)
        {
            return CommandOutcome::Skipped;
        }
        if self.is_oscillating() {
            if !self
                .try_command(
                    "stopping oscillation failed",
                    DeviceCall::Set(DeviceProperty::Oscillate(false)),
                )
                .await
            {
                return CommandOutcome::Failed;
            }
            self.cache_field(OSCILLATE_FIELD, FieldValue::Boolean(false));
        }
        if self
            .try_command(
                "setting the move direction failed",
                DeviceCall::Set(DeviceProperty::MoveDirection(direction)),
            )
            .await
        {
            CommandOutcome::Applied
        } else {
            CommandOutcome::Failed
        }
    }

    pub async fn set_natural_mode(&mut self, on: bool) -> CommandOutcome {
        self.gated_set(
            Capabilities::SET_NATURAL_MODE,
            "setting the natural mode failed",
            DeviceProperty::NaturalMode(on),
        )
        .await
    }

    pub async fn set_ptc(&mut self, on: bool) -> CommandOutcome {
        self.gated_set(
            Capabilities::SET_PTC,
            "setting the ptc heater failed",
            DeviceProperty::Ptc(on),
        )
        .await
    }

    pub async fn set_display(&mut self, on: bool) -> CommandOutcome {
        self.gated_set(
            Capabilities::SET_DISPLAY,
            "setting the display failed",
            DeviceProperty::Display(on),
        )
        .await
    }

    pub async fn set_wet_protection(&mut self, on: bool) -> CommandOutcome {
        self.gated_set(
            Capabilities::SET_WET_PROTECTION,
            "setting the wet protection failed",
            DeviceProperty::WetProtection(on),
        )
        .await
    }
}
