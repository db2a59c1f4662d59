//! Scripted mock transport shared by the integration tests.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use miohub_devices::executor;
use miohub_devices::{
    AttributeSpec, Capabilities, CommandResult, DeviceAdapter, DeviceCall, DeviceConnector,
    DeviceProbe, DeviceProperty, DriverDescriptor, EnumDecoder, FieldKind, MiioDevice, PresetCode,
    PresetMode, Protocol, StateSnapshot, TransportError,
};

pub const TOKEN: &str = "0123456789abcdef0123456789abcdef";

/// Scripted behavior plus a record of every call the adapter issued.
#[derive(Default)]
pub struct MockState {
    pub calls: Vec<DeviceCall>,
    pub command_results: VecDeque<Result<CommandResult, TransportError>>,
    pub status_results: VecDeque<Result<StateSnapshot, TransportError>>,
    pub status_calls: usize,
    pub default_status: Option<StateSnapshot>,
}

impl MockState {
    pub fn mode_writes(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, DeviceCall::Set(DeviceProperty::Mode(_))))
            .count()
    }
}

pub type SharedState = Arc<Mutex<MockState>>;

pub fn scripted() -> SharedState {
    Arc::new(Mutex::new(MockState::default()))
}

pub struct MockDevice {
    state: SharedState,
}

impl MockDevice {
    pub fn new(state: &SharedState) -> Self {
        Self {
            state: Arc::clone(state),
        }
    }

    fn command(&mut self, call: DeviceCall) -> Result<CommandResult, TransportError> {
        let mut state = self.state.lock();
        state.calls.push(call);
        state
            .command_results
            .pop_front()
            .unwrap_or_else(|| Ok(vec!["ok".to_string()]))
    }
}

impl MiioDevice for MockDevice {
    fn on(&mut self) -> Result<CommandResult, TransportError> {
        self.command(DeviceCall::On)
    }

    fn off(&mut self) -> Result<CommandResult, TransportError> {
        self.command(DeviceCall::Off)
    }

    fn status(&mut self) -> Result<StateSnapshot, TransportError> {
        let mut state = self.state.lock();
        state.status_calls += 1;
        if let Some(result) = state.status_results.pop_front() {
            return result;
        }
        state
            .default_status
            .clone()
            .ok_or_else(|| TransportError::Unreachable("no scripted status".to_string()))
    }

    fn set_property(&mut self, property: DeviceProperty) -> Result<CommandResult, TransportError> {
        self.command(DeviceCall::Set(property))
    }
}

/// Adapter wired to a scripted mock, with a short timeout and the given
/// retry budget.
pub fn adapter(
    driver: Arc<DriverDescriptor>,
    state: &SharedState,
    retry_budget: u32,
) -> DeviceAdapter {
    DeviceAdapter::new(
        "bedroom purifier",
        "test.purifier.v1",
        driver,
        executor::share(Box::new(MockDevice::new(state))),
        retry_budget,
        Duration::from_secs(1),
        Duration::from_secs(30),
    )
}

/// A small purifier-shaped driver: mode/buzzer/led table, text presets.
pub fn purifier_driver() -> Arc<DriverDescriptor> {
    DriverDescriptor::new("test-purifier", Protocol::Miio)
        .with_capabilities(
            Capabilities::SET_BUZZER | Capabilities::SET_LED | Capabilities::SET_CHILD_LOCK,
        )
        .with_field("mode", FieldKind::Enum)
        .with_field("buzzer", FieldKind::Boolean)
        .with_field("led", FieldKind::Boolean)
        .with_field("aqi", FieldKind::Integer)
        .with_attribute(AttributeSpec::new("mode", "mode").with_decoder(EnumDecoder::Name))
        .with_attribute(AttributeSpec::new("buzzer", "buzzer"))
        .with_attribute(AttributeSpec::new("led", "led"))
        .with_attribute(AttributeSpec::new("aqi", "aqi"))
        .with_preset(PresetMode::new("Auto", PresetCode::Text("auto".into())))
        .with_preset(PresetMode::new("Silent", PresetCode::Text("silent".into())))
        .shared()
}

/// A full snapshot for [`purifier_driver`].
pub fn purifier_status(on: bool, mode: &str, aqi: i64) -> StateSnapshot {
    StateSnapshot::new(on)
        .with_field(
            "mode",
            miohub_devices::FieldValue::Enum {
                name: mode.to_string(),
                value: 0,
            },
        )
        .with_field("buzzer", true)
        .with_field("led", true)
        .with_field("aqi", aqi)
}

/// In-memory log sink for asserting on emitted severities.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Connector handing out scripted mocks keyed by host.
pub struct MockConnector {
    probe_model: String,
    states: Mutex<HashMap<String, SharedState>>,
}

impl MockConnector {
    pub fn new(probe_model: &str) -> Self {
        Self {
            probe_model: probe_model.to_string(),
            states: Mutex::new(HashMap::new()),
        }
    }

    /// Register a host; the returned state scripts the device behind it.
    pub fn add_host(&self, host: &str) -> SharedState {
        let state = scripted();
        self.states
            .lock()
            .insert(host.to_string(), Arc::clone(&state));
        state
    }
}

impl DeviceConnector for MockConnector {
    fn probe(&self, host: &str, _token: &str) -> Result<DeviceProbe, TransportError> {
        if !self.states.lock().contains_key(host) {
            return Err(TransportError::Unreachable(host.to_string()));
        }
        Ok(DeviceProbe {
            model: self.probe_model.clone(),
            firmware_version: "1.2.4_16".to_string(),
            hardware_version: "MW300".to_string(),
            mac_address: "28:6C:07:AA:BB:CC".to_string(),
        })
    }

    fn connect(
        &self,
        _model: &str,
        _protocol: Protocol,
        host: &str,
        _token: &str,
    ) -> Result<Box<dyn MiioDevice>, TransportError> {
        let states = self.states.lock();
        let state = states
            .get(host)
            .ok_or_else(|| TransportError::Unreachable(host.to_string()))?;
        Ok(Box::new(MockDevice::new(state)))
    }
}
