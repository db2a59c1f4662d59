//! Fleet service: setup (with model auto-detection) and command
//! fan-out with independent per-device failures.

mod common;

use std::sync::Arc;

use miohub_core::config::AdapterConfig;
use miohub_devices::{
    builtin_registry, CommandOutcome, FleetCommand, FleetService, SetupError, TransportError,
};

use common::{purifier_status, MockConnector, TOKEN};

fn service_with(connector: MockConnector) -> FleetService {
    let registry = Arc::new(builtin_registry().unwrap());
    FleetService::new(registry, Arc::new(connector))
}

#[tokio::test]
async fn setup_probes_the_model_when_the_config_leaves_it_out() {
    let connector = MockConnector::new("zhimi.airpurifier.m1");
    connector.add_host("10.0.0.2");
    let mut service = service_with(connector);

    let config = AdapterConfig::new("10.0.0.2", TOKEN, "bedroom purifier");
    service.setup(&config).await.unwrap();

    let adapter = service.adapter("bedroom purifier").unwrap();
    let adapter = adapter.lock().await;
    assert_eq!(adapter.model(), "zhimi.airpurifier.m1");
    assert_eq!(adapter.driver().family(), "airpurifier");
}

#[tokio::test]
async fn setup_rejects_unsupported_models() {
    let connector = MockConnector::new("zhimi.airpurifier.m1");
    connector.add_host("10.0.0.2");
    let mut service = service_with(connector);

    let config =
        AdapterConfig::new("10.0.0.2", TOKEN, "mystery box").with_model("vendor.unknown.z9");
    assert!(matches!(
        service.setup(&config).await,
        Err(SetupError::Registry(_))
    ));
    assert!(service.is_empty());
}

#[tokio::test]
async fn setup_surfaces_probe_failures_with_the_host() {
    let connector = MockConnector::new("zhimi.airpurifier.m1");
    let mut service = service_with(connector);

    // Host never registered: the probe cannot reach it.
    let config = AdapterConfig::new("10.0.0.9", TOKEN, "ghost");
    assert!(matches!(
        service.setup(&config).await,
        Err(SetupError::Probe { .. })
    ));
}

#[tokio::test]
async fn setup_rejects_invalid_configs_before_touching_the_network() {
    let connector = MockConnector::new("zhimi.airpurifier.m1");
    let mut service = service_with(connector);

    let config = AdapterConfig::new("10.0.0.2", "not-a-token", "bedroom purifier");
    assert!(matches!(
        service.setup(&config).await,
        Err(SetupError::Config(_))
    ));
}

#[tokio::test]
async fn duplicate_adapter_names_are_rejected() {
    let connector = MockConnector::new("zhimi.airpurifier.m1");
    connector.add_host("10.0.0.2");
    connector.add_host("10.0.0.3");
    let mut service = service_with(connector);

    let first = AdapterConfig::new("10.0.0.2", TOKEN, "purifier");
    let second = AdapterConfig::new("10.0.0.3", TOKEN, "purifier");
    service.setup(&first).await.unwrap();
    assert!(matches!(
        service.setup(&second).await,
        Err(SetupError::DuplicateAdapter(_))
    ));
    assert_eq!(service.len(), 1);
}

#[tokio::test]
async fn fan_out_failures_stay_independent() {
    let connector = MockConnector::new("zhimi.airpurifier.m1");
    let healthy = connector.add_host("10.0.0.2");
    let broken = connector.add_host("10.0.0.3");
    healthy.lock().default_status = Some(purifier_status(true, "auto", 20));
    broken
        .lock()
        .command_results
        .push_back(Err(TransportError::Unreachable("down".into())));
    let mut service = service_with(connector);

    let model = "zhimi.airpurifier.v2";
    service
        .setup(&AdapterConfig::new("10.0.0.2", TOKEN, "living room").with_model(model))
        .await
        .unwrap();
    service
        .setup(&AdapterConfig::new("10.0.0.3", TOKEN, "hallway").with_model(model))
        .await
        .unwrap();

    let mut results = service.apply(&FleetCommand::TurnOff, None).await;
    results.sort_by(|a, b| a.name.cmp(&b.name));

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].name, "hallway");
    assert_eq!(results[0].outcome, CommandOutcome::Failed);
    assert_eq!(results[1].name, "living room");
    assert_eq!(results[1].outcome, CommandOutcome::Applied);
}

#[tokio::test]
async fn fan_out_respects_the_name_filter() {
    let connector = MockConnector::new("zhimi.airpurifier.m1");
    let targeted = connector.add_host("10.0.0.2");
    let untouched = connector.add_host("10.0.0.3");
    let mut service = service_with(connector);

    let model = "zhimi.airpurifier.v2";
    service
        .setup(&AdapterConfig::new("10.0.0.2", TOKEN, "living room").with_model(model))
        .await
        .unwrap();
    service
        .setup(&AdapterConfig::new("10.0.0.3", TOKEN, "hallway").with_model(model))
        .await
        .unwrap();

    let filter = vec!["living room".to_string()];
    let results = service
        .apply(&FleetCommand::SetBuzzer(false), Some(&filter))
        .await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "living room");
    assert_eq!(results[0].outcome, CommandOutcome::Applied);
    assert_eq!(targeted.lock().calls.len(), 1);
    assert!(untouched.lock().calls.is_empty());
}
