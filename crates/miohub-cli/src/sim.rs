//! Simulated device transport.
//!
//! Lets the daemon run end to end without hardware: every configured
//! device is backed by an in-memory state machine seeded from its
//! driver's declared snapshot schema. Commands mutate the state and
//! always acknowledge; polling reads it back.

use std::sync::Arc;

use miohub_devices::{
    CommandResult, DeviceConnector, DeviceProbe, DeviceProperty, DriverDescriptor, DriverRegistry,
    FieldKind, FieldValue, MiioDevice, PresetCode, Protocol, StateSnapshot, TransportError,
};

pub struct SimConnector {
    registry: Arc<DriverRegistry>,
}

impl SimConnector {
    pub fn new(registry: Arc<DriverRegistry>) -> Self {
        Self { registry }
    }
}

impl DeviceConnector for SimConnector {
    fn probe(&self, _host: &str, _token: &str) -> Result<DeviceProbe, TransportError> {
        // Simulated hardware always reports as a generic purifier.
        Ok(DeviceProbe {
            model: "zhimi.airpurifier.m1".to_string(),
            firmware_version: "1.2.4_sim".to_string(),
            hardware_version: "sim".to_string(),
            mac_address: "02:00:00:00:00:01".to_string(),
        })
    }

    fn connect(
        &self,
        model: &str,
        _protocol: Protocol,
        _host: &str,
        _token: &str,
    ) -> Result<Box<dyn MiioDevice>, TransportError> {
        let driver = self
            .registry
            .resolve(model)
            .map_err(|err| TransportError::Unreachable(err.to_string()))?;
        Ok(Box::new(SimDevice::new(&driver)))
    }
}

struct SimDevice {
    snapshot: StateSnapshot,
}

impl SimDevice {
    fn new(driver: &DriverDescriptor) -> Self {
        let mut snapshot = StateSnapshot::new(false);
        for field in driver.schema() {
            let value = match field.kind {
                FieldKind::Integer => FieldValue::Integer(0),
                FieldKind::Float => FieldValue::Float(0.0),
                FieldKind::Boolean => FieldValue::Boolean(false),
                FieldKind::Text => FieldValue::Text(String::new()),
                FieldKind::Enum => FieldValue::Enum {
                    name: "idle".to_string(),
                    value: 0,
                },
            };
            snapshot.set_field(field.name.clone(), value);
        }
        // Start in the first preset of the vocabulary, if any.
        if let Some(preset) = driver.presets().first() {
            snapshot.set_field("mode", mode_value(&preset.code));
        }
        Self { snapshot }
    }
}

fn mode_value(code: &PresetCode) -> FieldValue {
    match code {
        PresetCode::Int(value) => FieldValue::Enum {
            name: format!("mode{value}"),
            value: *value,
        },
        PresetCode::Text(name) => FieldValue::Enum {
            name: name.clone(),
            value: 0,
        },
    }
}

fn ack() -> Result<CommandResult, TransportError> {
    Ok(vec!["ok".to_string()])
}

impl MiioDevice for SimDevice {
    fn on(&mut self) -> Result<CommandResult, TransportError> {
        self.snapshot.set_power(true);
        ack()
    }

    fn off(&mut self) -> Result<CommandResult, TransportError> {
        self.snapshot.set_power(false);
        ack()
    }

    fn status(&mut self) -> Result<StateSnapshot, TransportError> {
        Ok(self.snapshot.clone())
    }

    fn set_property(&mut self, property: DeviceProperty) -> Result<CommandResult, TransportError> {
        match property {
            DeviceProperty::Mode(code) => self.snapshot.set_field("mode", mode_value(&code)),
            DeviceProperty::Buzzer(on) => self.snapshot.set_field("buzzer", on),
            DeviceProperty::Led(on) => self.snapshot.set_field("led", on),
            DeviceProperty::ChildLock(on) => self.snapshot.set_field("child_lock", on),
            DeviceProperty::TargetHumidity(pct) => {
                self.snapshot.set_field("target_humidity", pct as i64)
            }
            DeviceProperty::FavoriteLevel(level) => {
                self.snapshot.set_field("favorite_level", level as i64)
            }
            DeviceProperty::MotorSpeed(speed) => {
                self.snapshot.set_field("motor_speed", speed as i64)
            }
            DeviceProperty::OscillationAngle(angle) => {
                self.snapshot.set_field("angle", angle as i64)
            }
            DeviceProperty::Oscillate(on) => self.snapshot.set_field("oscillate", on),
            DeviceProperty::DelayOff(secs) => self
                .snapshot
                .set_field("delay_off_countdown", secs as i64),
            DeviceProperty::Dry(on) => self.snapshot.set_field("dry", on),
            DeviceProperty::Ptc(on) => self.snapshot.set_field("ptc", on),
            DeviceProperty::Display(on) => self.snapshot.set_field("display", on),
            // Everything else has no snapshot counterpart worth
            // simulating; it is still acknowledged.
            _ => {}
        }
        ack()
    }
}
