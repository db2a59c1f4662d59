//! Fleet orchestration.
//!
//! The [`FleetService`] turns adapter configurations into live
//! [`DeviceAdapter`]s (probing the model over the network when the
//! configuration does not name one), runs one polling task per adapter
//! and fans commands out across the fleet. Fan-out failures are
//! independent: one unreachable device never prevents the command from
//! reaching the others.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use miohub_core::config::AdapterConfig;
use miohub_core::error::ConfigError;

use crate::adapter::{CommandOutcome, DeviceAdapter};
use crate::device::{DeviceConnector, TransportError};
use crate::executor;
use crate::registry::{DriverRegistry, RegistryError};

/// Errors raised while bringing a device adapter up. Unlike transport
/// failures during operation, these abort the affected device's setup.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The model auto-detect probe failed
    #[error("probing {host} for its model failed: {source}")]
    Probe {
        host: String,
        source: TransportError,
    },

    /// Opening the device handle failed
    #[error("connecting to {model} at {host} failed: {source}")]
    Connect {
        model: String,
        host: String,
        source: TransportError,
    },

    /// An adapter with this name is already running
    #[error("adapter name already in use: {0:?}")]
    DuplicateAdapter(String),
}

/// A command addressed to every adapter (or a named subset) at once.
#[derive(Debug, Clone, PartialEq)]
pub enum FleetCommand {
    TurnOn { preset: Option<String> },
    TurnOff,
    SetPreset(String),
    SetBuzzer(bool),
    SetLed(bool),
    SetLedBrightness(u8),
    SetChildLock(bool),
    SetFavoriteLevel(u8),
    SetFanLevel(u8),
    SetTargetHumidity(u8),
    SetOscillationAngle(u16),
    SetOscillate(bool),
    SetMoveDirection(String),
    SetDelayOff(u32),
    SetNaturalMode(bool),
    SetDry(bool),
    SetPtc(bool),
    SetDisplay(bool),
    SetWetProtection(bool),
    SetMotorSpeed(u16),
    SetVolume(u8),
    SetExtraFeatures(u32),
    ResetFilter,
    SetAutoDetect(bool),
    SetLearnMode(bool),
}

/// Per-device result of a fan-out.
#[derive(Debug, Clone, PartialEq)]
pub struct FleetResult {
    pub name: String,
    pub outcome: CommandOutcome,
}

/// Owns the live adapters and their polling tasks.
pub struct FleetService {
    registry: Arc<DriverRegistry>,
    connector: Arc<dyn DeviceConnector>,
    adapters: HashMap<String, Arc<Mutex<DeviceAdapter>>>,
    polling: HashSet<String>,
    tasks: Vec<JoinHandle<()>>,
}

impl FleetService {
    pub fn new(registry: Arc<DriverRegistry>, connector: Arc<dyn DeviceConnector>) -> Self {
        Self {
            registry,
            connector,
            adapters: HashMap::new(),
            polling: HashSet::new(),
            tasks: Vec::new(),
        }
    }

    /// Bring one configured device up: validate, resolve (probing the
    /// model when the config leaves it out), connect and register the
    /// adapter. Polling does not start until [`start`](Self::start).
    pub async fn setup(&mut self, config: &AdapterConfig) -> Result<(), SetupError> {
        config.validate()?;
        if self.adapters.contains_key(&config.name) {
            return Err(SetupError::DuplicateAdapter(config.name.clone()));
        }

        let timeout = Duration::from_secs(config.command_timeout_secs);
        let model = match &config.model {
            Some(model) => model.clone(),
            None => {
                let connector = Arc::clone(&self.connector);
                let host = config.host.clone();
                let token = config.token.clone();
                let probe = executor::offload(move || connector.probe(&host, &token), timeout)
                    .await
                    .map_err(|source| SetupError::Probe {
                        host: config.host.clone(),
                        source,
                    })?;
                tracing::info!(
                    host = %config.host,
                    model = %probe.model,
                    firmware = %probe.firmware_version,
                    "detected device model"
                );
                probe.model
            }
        };

        let driver = self.registry.resolve(&model)?;
        tracing::info!(
            device = %config.name,
            model = %model,
            family = %driver.family(),
            "initializing device adapter"
        );

        let connector = Arc::clone(&self.connector);
        let protocol = driver.protocol();
        let connect_model = model.clone();
        let host = config.host.clone();
        let token = config.token.clone();
        let device = executor::offload(
            move || connector.connect(&connect_model, protocol, &host, &token),
            timeout,
        )
        .await
        .map_err(|source| SetupError::Connect {
            model: model.clone(),
            host: config.host.clone(),
            source,
        })?;

        let adapter = DeviceAdapter::new(
            config.name.clone(),
            model,
            driver,
            executor::share(device),
            config.retry_budget,
            timeout,
            Duration::from_secs(config.poll_interval_secs),
        );
        self.adapters
            .insert(config.name.clone(), Arc::new(Mutex::new(adapter)));
        Ok(())
    }

    /// Spawn one polling task per adapter. Safe to call after adding
    /// more adapters; already running adapters are left alone.
    pub fn start(&mut self) {
        for (name, adapter) in &self.adapters {
            if !self.polling.insert(name.clone()) {
                continue;
            }
            let name = name.clone();
            let adapter = Arc::clone(adapter);
            self.tasks.push(tokio::spawn(async move {
                let interval = adapter.lock().await.poll_interval();
                let mut ticker = tokio::time::interval(interval);
                ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
                loop {
                    ticker.tick().await;
                    if let Err(err) = adapter.lock().await.poll().await {
                        // A projection error is a driver-table defect,
                        // not a transient transport condition.
                        tracing::error!(device = %name, error = %err, "state projection failed");
                    }
                }
            }));
        }
        tracing::info!(adapters = self.adapters.len(), "fleet polling started");
    }

    /// Abort all polling tasks.
    pub fn stop(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
        self.polling.clear();
        tracing::info!("fleet polling stopped");
    }

    pub fn adapter(&self, name: &str) -> Option<Arc<Mutex<DeviceAdapter>>> {
        self.adapters.get(name).map(Arc::clone)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.adapters.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    /// Fan a command out to every adapter, or to the named subset.
    /// Adapters execute concurrently and fail independently; the result
    /// list carries one entry per addressed adapter, in no particular
    /// order.
    pub async fn apply(
        &self,
        command: &FleetCommand,
        filter: Option<&[String]>,
    ) -> Vec<FleetResult> {
        let targets: Vec<_> = self
            .adapters
            .iter()
            .filter(|(name, _)| filter.map_or(true, |names| names.contains(name)))
            .map(|(name, adapter)| (name.clone(), Arc::clone(adapter)))
            .collect();

        join_all(targets.into_iter().map(|(name, adapter)| {
            let command = command.clone();
            async move {
                let outcome = dispatch(&mut *adapter.lock().await, &command).await;
                FleetResult { name, outcome }
            }
        }))
        .await
    }
}

impl Drop for FleetService {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

async fn dispatch(adapter: &mut DeviceAdapter, command: &FleetCommand) -> CommandOutcome {
    match command {
        FleetCommand::TurnOn { preset } => adapter.turn_on(preset.as_deref()).await,
        FleetCommand::TurnOff => adapter.turn_off().await,
        FleetCommand::SetPreset(name) => adapter.set_preset(name).await,
        FleetCommand::SetBuzzer(on) => adapter.set_buzzer(*on).await,
        FleetCommand::SetLed(on) => adapter.set_led(*on).await,
        FleetCommand::SetLedBrightness(level) => adapter.set_led_brightness(*level).await,
        FleetCommand::SetChildLock(on) => adapter.set_child_lock(*on).await,
        FleetCommand::SetFavoriteLevel(level) => adapter.set_favorite_level(*level).await,
        FleetCommand::SetFanLevel(level) => adapter.set_fan_level(*level).await,
        FleetCommand::SetTargetHumidity(pct) => adapter.set_target_humidity(*pct).await,
        FleetCommand::SetOscillationAngle(angle) => adapter.set_oscillation_angle(*angle).await,
        FleetCommand::SetOscillate(on) => adapter.set_oscillate(*on).await,
        FleetCommand::SetMoveDirection(direction) => adapter.set_move_direction(direction).await,
        FleetCommand::SetDelayOff(minutes) => adapter.set_delay_off(*minutes).await,
        FleetCommand::SetNaturalMode(on) => adapter.set_natural_mode(*on).await,
        FleetCommand::SetDry(on) => adapter.set_dry(*on).await,
        FleetCommand::SetPtc(on) => adapter.set_ptc(*on).await,
        FleetCommand::SetDisplay(on) => adapter.set_display(*on).await,
        FleetCommand::SetWetProtection(on) => adapter.set_wet_protection(*on).await,
        FleetCommand::SetMotorSpeed(speed) => adapter.set_motor_speed(*speed).await,
        FleetCommand::SetVolume(volume) => adapter.set_volume(*volume).await,
        FleetCommand::SetExtraFeatures(features) => adapter.set_extra_features(*features).await,
        FleetCommand::ResetFilter => adapter.reset_filter().await,
        FleetCommand::SetAutoDetect(on) => adapter.set_auto_detect(*on).await,
        FleetCommand::SetLearnMode(on) => adapter.set_learn_mode(*on).await,
    }
}
