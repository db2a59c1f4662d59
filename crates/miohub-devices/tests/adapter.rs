//! Adapter behavior: polling, availability, skip-after-write and the
//! capability-gated command facade, driven against a scripted mock.

mod common;

use miohub_devices::{
    builtin_registry, Availability, Capabilities, CommandOutcome, DeviceCall, DeviceProperty,
    DriverRegistry, FieldValue, MoveDirection, TransportError,
};

use common::{adapter, purifier_driver, purifier_status, scripted, CapturedLogs};

#[tokio::test]
async fn retry_budget_flips_availability_exactly_at_the_limit() {
    let state = scripted();
    {
        let mut state = state.lock();
        state
            .status_results
            .push_back(Ok(purifier_status(true, "auto", 42)));
        for _ in 0..3 {
            state.status_results.push_back(Err(TransportError::Timeout(
                std::time::Duration::from_secs(1),
            )));
        }
        state
            .status_results
            .push_back(Ok(purifier_status(true, "auto", 40)));
    }
    let mut adapter = adapter(purifier_driver(), &state, 3);
    assert_eq!(adapter.availability(), Availability::Unknown);

    adapter.poll().await.unwrap();
    assert_eq!(adapter.availability(), Availability::Available);

    // Two failures stay below the budget of three.
    adapter.poll().await.unwrap();
    adapter.poll().await.unwrap();
    assert_eq!(adapter.availability(), Availability::Available);
    assert_eq!(adapter.consecutive_failures(), 2);

    // The third flips availability.
    adapter.poll().await.unwrap();
    assert_eq!(adapter.availability(), Availability::Unavailable);
    assert_eq!(adapter.consecutive_failures(), 3);

    // Any successful poll recovers and resets the counter.
    adapter.poll().await.unwrap();
    assert_eq!(adapter.availability(), Availability::Available);
    assert_eq!(adapter.consecutive_failures(), 0);
}

#[tokio::test]
async fn failed_polls_keep_last_known_attributes() {
    let state = scripted();
    {
        let mut state = state.lock();
        state
            .status_results
            .push_back(Ok(purifier_status(true, "silent", 17)));
        state
            .status_results
            .push_back(Err(TransportError::Unreachable("down".into())));
    }
    let mut adapter = adapter(purifier_driver(), &state, 1);

    adapter.poll().await.unwrap();
    assert_eq!(
        adapter.attributes().get("aqi"),
        Some(&FieldValue::Integer(17))
    );

    adapter.poll().await.unwrap();
    assert_eq!(adapter.availability(), Availability::Unavailable);
    // Stale but kept.
    assert_eq!(
        adapter.attributes().get("aqi"),
        Some(&FieldValue::Integer(17))
    );
}

#[tokio::test]
async fn skip_after_write_suppresses_exactly_one_poll() {
    let state = scripted();
    state.lock().default_status = Some(purifier_status(true, "auto", 42));
    let mut adapter = adapter(purifier_driver(), &state, 3);

    assert_eq!(adapter.turn_on(None).await, CommandOutcome::Applied);
    assert_eq!(adapter.power_state(), Some(true));
    let attributes = adapter.attributes().clone();

    // First poll after the write: no device call, nothing changes.
    adapter.poll().await.unwrap();
    assert_eq!(state.lock().status_calls, 0);
    assert_eq!(adapter.attributes(), &attributes);

    // Second poll fetches for real.
    adapter.poll().await.unwrap();
    assert_eq!(state.lock().status_calls, 1);
}

#[tokio::test]
async fn turn_off_is_idempotent_but_never_cached() {
    let state = scripted();
    let mut adapter = adapter(purifier_driver(), &state, 3);

    assert_eq!(adapter.turn_off().await, CommandOutcome::Applied);
    assert_eq!(adapter.power_state(), Some(false));
    assert_eq!(adapter.turn_off().await, CommandOutcome::Applied);
    assert_eq!(adapter.power_state(), Some(false));

    let calls = &state.lock().calls;
    assert_eq!(calls.as_slice(), &[DeviceCall::Off, DeviceCall::Off]);
}

#[tokio::test]
async fn gated_setter_without_capability_is_a_silent_no_op() {
    let state = scripted();
    let mut adapter = adapter(purifier_driver(), &state, 3);

    // The test driver has no SET_DRY or SET_PTC capability.
    assert_eq!(adapter.set_dry(true).await, CommandOutcome::Skipped);
    assert_eq!(adapter.set_ptc(true).await, CommandOutcome::Skipped);
    assert!(state.lock().calls.is_empty());
    assert_eq!(adapter.availability(), Availability::Unknown);
}

#[tokio::test]
async fn unknown_preset_is_rejected_before_any_device_call() {
    let state = scripted();
    let mut adapter = adapter(purifier_driver(), &state, 3);

    assert_eq!(adapter.set_preset("Turbo").await, CommandOutcome::Rejected);
    assert!(state.lock().calls.is_empty());
}

#[tokio::test]
async fn preset_names_are_matched_case_insensitively() {
    let state = scripted();
    let mut adapter = adapter(purifier_driver(), &state, 3);

    assert_eq!(adapter.set_preset("silent").await, CommandOutcome::Applied);
    assert_eq!(adapter.preset(), Some("Silent"));
    assert_eq!(adapter.power_state(), Some(true));
}

#[tokio::test]
async fn turn_on_with_preset_delegates_to_the_mode_write() {
    let state = scripted();
    let mut adapter = adapter(purifier_driver(), &state, 3);

    assert_eq!(
        adapter.turn_on(Some("Auto")).await,
        CommandOutcome::Applied
    );
    let state = state.lock();
    assert_eq!(state.calls.len(), 1);
    assert!(matches!(
        state.calls[0],
        DeviceCall::Set(DeviceProperty::Mode(_))
    ));
}

#[tokio::test]
async fn command_transport_failure_marks_the_adapter_unavailable() {
    let state = scripted();
    state
        .lock()
        .command_results
        .push_back(Err(TransportError::Unreachable("down".into())));
    let mut adapter = adapter(purifier_driver(), &state, 3);

    assert_eq!(adapter.set_buzzer(true).await, CommandOutcome::Failed);
    assert_eq!(adapter.availability(), Availability::Unavailable);
}

#[tokio::test]
async fn non_success_token_is_a_failure() {
    let state = scripted();
    state
        .lock()
        .command_results
        .push_back(Ok(vec!["error".to_string()]));
    let mut adapter = adapter(purifier_driver(), &state, 3);

    assert_eq!(adapter.set_led(true).await, CommandOutcome::Failed);
}

#[tokio::test]
async fn missing_table_field_surfaces_as_a_projection_error() {
    let state = scripted();
    // Snapshot without the "aqi" field the table maps.
    state.lock().default_status = Some(
        miohub_devices::StateSnapshot::new(true)
            .with_field(
                "mode",
                FieldValue::Enum {
                    name: "auto".into(),
                    value: 0,
                },
            )
            .with_field("buzzer", true)
            .with_field("led", true),
    );
    let mut adapter = adapter(purifier_driver(), &state, 3);

    assert!(adapter.poll().await.is_err());
}

#[tokio::test]
async fn purifier_without_brightness_gates_that_setter_only() {
    // zhimi.airpurifier.v1-shaped driver: LED and CHILD_LOCK but no
    // LED_BRIGHTNESS.
    let mut registry = DriverRegistry::new();
    registry
        .register_model("zhimi.airpurifier.v1", purifier_driver())
        .unwrap();
    let driver = registry.resolve("zhimi.airpurifier.v1").unwrap();
    assert!(driver.capabilities().contains(Capabilities::SET_LED));
    assert!(!driver
        .capabilities()
        .contains(Capabilities::SET_LED_BRIGHTNESS));

    let state = scripted();
    state.lock().default_status = Some(purifier_status(true, "auto", 10));
    let mut adapter = adapter(driver, &state, 3);
    adapter.poll().await.unwrap();
    assert_eq!(adapter.availability(), Availability::Available);

    assert_eq!(
        adapter.set_led_brightness(1).await,
        CommandOutcome::Skipped
    );
    assert!(state.lock().calls.is_empty());

    assert_eq!(adapter.set_led(true).await, CommandOutcome::Applied);
    assert_eq!(state.lock().calls.len(), 1);
    assert_eq!(adapter.availability(), Availability::Available);
}

#[tokio::test]
async fn fan_off_preset_powers_the_device_down() {
    let registry = builtin_registry().unwrap();
    let driver = registry.resolve("dmaker.fan.p5").unwrap();

    let state = scripted();
    let mut adapter = adapter(driver, &state, 3);

    assert_eq!(adapter.set_preset("Off").await, CommandOutcome::Applied);
    assert_eq!(adapter.power_state(), Some(false));
    assert_eq!(state.lock().calls.as_slice(), &[DeviceCall::Off]);
}

#[tokio::test]
async fn airdog_repeats_the_mode_write_on_transitions_only() {
    let registry = builtin_registry().unwrap();
    let driver = registry.resolve("airdog.airpurifier.x3").unwrap();

    let state = scripted();
    let mut adapter = adapter(driver, &state, 3);

    // Switching presets: the write goes out twice.
    assert_eq!(adapter.set_preset("Speed 2").await, CommandOutcome::Applied);
    assert_eq!(state.lock().mode_writes(), 2);

    // Re-asserting the current preset: a single write.
    assert_eq!(adapter.set_preset("Speed 2").await, CommandOutcome::Applied);
    assert_eq!(state.lock().mode_writes(), 3);
}

#[tokio::test]
async fn soft_retries_log_info_and_exhaustion_logs_error() {
    let state = scripted();
    {
        let mut state = state.lock();
        for _ in 0..3 {
            state
                .status_results
                .push_back(Err(TransportError::Unreachable("down".into())));
        }
    }

    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(logs.clone())
        .with_ansi(false)
        .without_time()
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let mut adapter = adapter(purifier_driver(), &state, 3);
    adapter.poll().await.unwrap();
    adapter.poll().await.unwrap();
    adapter.poll().await.unwrap();
    assert_eq!(adapter.availability(), Availability::Unavailable);

    let output = logs.contents();
    let soft_retries = output
        .lines()
        .filter(|line| line.contains("INFO") && line.contains("retrying"))
        .count();
    let exhaustions = output
        .lines()
        .filter(|line| line.contains("ERROR") && line.contains("marking unavailable"))
        .count();
    assert_eq!(soft_retries, 2);
    assert_eq!(exhaustions, 1);
}

#[tokio::test]
async fn oscillate_and_direction_are_capability_gated() {
    let state = scripted();
    // The purifier driver has neither fan capability.
    let mut adapter = adapter(purifier_driver(), &state, 3);

    assert_eq!(adapter.set_oscillate(true).await, CommandOutcome::Skipped);
    assert_eq!(
        adapter.set_move_direction("left").await,
        CommandOutcome::Skipped
    );
    assert!(state.lock().calls.is_empty());
}

#[tokio::test]
async fn invalid_move_direction_never_reaches_the_device() {
    let registry = builtin_registry().unwrap();
    let driver = registry.resolve("dmaker.fan.p5").unwrap();

    let state = scripted();
    let mut adapter = adapter(driver, &state, 3);

    assert_eq!(
        adapter.set_move_direction("up").await,
        CommandOutcome::Rejected
    );
    assert!(state.lock().calls.is_empty());
}

#[tokio::test]
async fn direction_write_stops_an_active_oscillation_first() {
    let registry = builtin_registry().unwrap();
    let driver = registry.resolve("dmaker.fan.p5").unwrap();

    let state = scripted();
    let mut adapter = adapter(driver, &state, 3);

    assert_eq!(adapter.set_oscillate(true).await, CommandOutcome::Applied);
    assert_eq!(
        adapter.attributes().get("oscillate"),
        Some(&FieldValue::Boolean(true))
    );

    // Rotating while oscillating: stop the sweep, then rotate.
    assert_eq!(
        adapter.set_move_direction("left").await,
        CommandOutcome::Applied
    );
    {
        let state = state.lock();
        assert_eq!(state.calls.len(), 3);
        assert_eq!(
            state.calls[1],
            DeviceCall::Set(DeviceProperty::Oscillate(false))
        );
        assert_eq!(
            state.calls[2],
            DeviceCall::Set(DeviceProperty::MoveDirection(MoveDirection::Left))
        );
    }

    // Not oscillating anymore: a single rotate call.
    assert_eq!(
        adapter.set_move_direction("Right").await,
        CommandOutcome::Applied
    );
    let state = state.lock();
    assert_eq!(state.calls.len(), 4);
    assert_eq!(
        state.calls[3],
        DeviceCall::Set(DeviceProperty::MoveDirection(MoveDirection::Right))
    );
}

#[tokio::test]
async fn mode_cache_matches_the_projected_representation() {
    // Name-decoded text vocabulary: the cache holds the text the next
    // poll would publish.
    let state = scripted();
    let mut adapter = adapter(purifier_driver(), &state, 3);
    assert_eq!(adapter.set_preset("Silent").await, CommandOutcome::Applied);
    assert_eq!(
        adapter.attributes().get("mode"),
        Some(&FieldValue::Text("silent".into()))
    );

    // Name-decoded integer vocabulary: the preset name stands in until
    // the next poll.
    let registry = builtin_registry().unwrap();
    let airdog = registry.resolve("airdog.airpurifier.x3").unwrap();
    let state = scripted();
    let mut adapter = common::adapter(airdog, &state, 3);
    assert_eq!(adapter.set_preset("Speed 2").await, CommandOutcome::Applied);
    assert_eq!(
        adapter.attributes().get("mode"),
        Some(&FieldValue::Text("Speed 2".into()))
    );

    // No mode row in the table: nothing is cached.
    let legacy = registry.resolve("zhimi.fan.v2").unwrap();
    let state = scripted();
    let mut adapter = common::adapter(legacy, &state, 3);
    assert_eq!(adapter.set_preset("Level 1").await, CommandOutcome::Applied);
    assert_eq!(adapter.attributes().get("mode"), None);
}

#[tokio::test]
async fn rejected_angles_and_countdowns_never_reach_the_device() {
    let registry = builtin_registry().unwrap();
    let driver = registry.resolve("dmaker.fan.p5").unwrap();

    let state = scripted();
    let mut adapter = adapter(driver, &state, 3);

    assert_eq!(
        adapter.set_oscillation_angle(45).await,
        CommandOutcome::Rejected
    );
    assert_eq!(adapter.set_delay_off(90).await, CommandOutcome::Rejected);
    assert!(state.lock().calls.is_empty());

    assert_eq!(
        adapter.set_oscillation_angle(90).await,
        CommandOutcome::Applied
    );
    assert_eq!(adapter.set_delay_off(120).await, CommandOutcome::Applied);
    let state = state.lock();
    assert_eq!(
        state.calls[0],
        DeviceCall::Set(DeviceProperty::OscillationAngle(90))
    );
    // Minutes are converted to seconds on the wire.
    assert_eq!(
        state.calls[1],
        DeviceCall::Set(DeviceProperty::DelayOff(7200))
    );
}
