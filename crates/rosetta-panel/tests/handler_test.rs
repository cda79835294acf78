use rosetta_communication::{
    DispatchConfig, DispatchState, MdiDispatcher, SimulatedBehavior, SimulatedController,
    TaskMode,
};
use rosetta_core::{Axis, Direction, IndexMode, IndexedAxis, LinearAxis, Sign, Spindle, Target};
use rosetta_panel::{PanelHandler, SpinValue};
use rosetta_settings::{Config, HelpResource};
use std::time::Duration;

fn panel_on(controller: &SimulatedController) -> PanelHandler {
    let (command, status) = controller.channels();
    let dispatcher = MdiDispatcher::new(
        Box::new(command),
        Box::new(status),
        DispatchConfig {
            mode_timeout: Duration::from_millis(100),
            command_timeout: Duration::from_millis(100),
        },
    );
    PanelHandler::new(dispatcher)
}

fn strings(commands: &[&str]) -> Vec<String> {
    commands.iter().map(|c| c.to_string()).collect()
}

#[test]
fn test_b_index_switches_to_mdi_and_counts() {
    let controller = SimulatedController::new(TaskMode::Manual);
    let mut panel = panel_on(&controller);

    panel.index_b(Direction::Forward).unwrap();
    panel.index_b(Direction::Forward).unwrap();
    panel.index_b(Direction::Reverse).unwrap();

    assert_eq!(controller.mode_requests(), vec![TaskMode::Mdi]);
    assert_eq!(
        controller.sent_commands(),
        strings(&["G0 B90.0 F10.0", "G0 B90.0 F10.0", "G0 B-90.0 F10.0"])
    );
    assert_eq!(panel.store().index_count(Target::Axis(Axis::B)), 1);
}

#[test]
fn test_linear_move_uses_widget_values() {
    let controller = SimulatedController::new(TaskMode::Mdi);
    let mut panel = panel_on(&controller);

    panel
        .on_index_distance_changed(Target::from(LinearAxis::Z), &SpinValue::new(0.5, 0.0, 10.0))
        .unwrap();
    panel.on_feed_rate_changed(Axis::Z, &25).unwrap();
    panel.move_linear(LinearAxis::Z, Sign::Minus).unwrap();

    assert_eq!(controller.sent_commands(), strings(&["G0 Z-0.5 F25.0"]));
    assert_eq!(panel.store().index_count(Target::from(LinearAxis::Z)), -1);
}

#[test]
fn test_spindle_start_sends_speeds_then_start() {
    let controller = SimulatedController::new(TaskMode::Mdi);
    let mut panel = panel_on(&controller);
    panel.on_speed_percent_changed(&50.0).unwrap();
    panel.on_primary_speed_changed(&1000.0).unwrap();
    controller.clear_history();

    panel.start_spindles(Direction::Reverse).unwrap();
    panel.stop_spindles().unwrap();

    assert_eq!(
        controller.sent_commands(),
        strings(&["S1000.0 $0", "S500.0 $1", "M4 $-1", "M5"])
    );
}

#[test]
fn test_percent_change_resends_secondary_speed_only() {
    let controller = SimulatedController::new(TaskMode::Mdi);
    let mut panel = panel_on(&controller);
    panel.on_primary_speed_changed(&200.0).unwrap();
    panel.on_speed_percent_changed(&75.0).unwrap();

    assert_eq!(
        controller.sent_commands(),
        strings(&["S200.0 $0", "S200.0 $1", "S150.0 $1"])
    );
}

#[test]
fn test_spindle_index_orients_both_spindles() {
    let controller = SimulatedController::new(TaskMode::Mdi);
    let mut panel = panel_on(&controller);
    panel.on_index_mode_toggled(IndexedAxis::Sp0).unwrap();
    panel
        .on_index_distance_changed(Target::Spindle(Spindle::Sp1), &8)
        .unwrap();

    panel.index_spindles(Direction::Reverse).unwrap();

    assert_eq!(
        controller.sent_commands(),
        strings(&[
            "S1.0 $0",
            "S1.0 $1",
            "M19 R4.0 Q10 P2 $0",
            "M19 R45.0 Q10 P2 $1",
        ])
    );
    assert_eq!(panel.store().index_count(Target::Spindle(Spindle::Sp0)), -1);
    assert_eq!(panel.store().index_count(Target::Spindle(Spindle::Sp1)), -1);
}

#[test]
fn test_unresolvable_secondary_index_sends_nothing() {
    let controller = SimulatedController::new(TaskMode::Mdi);
    let mut panel = panel_on(&controller);
    panel
        .on_index_distance_changed(Target::Spindle(Spindle::Sp1), &0.0)
        .unwrap();
    panel
        .on_index_mode_selected(IndexedAxis::Sp0, IndexMode::Divisions)
        .unwrap();

    let err = panel.index_spindles(Direction::Forward).unwrap_err();
    assert!(err.is_panel_error());
    assert!(controller.sent_commands().is_empty());
    assert_eq!(controller.poll_count(), 0);
}

#[test]
fn test_failed_move_is_not_counted() {
    let controller = SimulatedController::new(TaskMode::Mdi).with_behavior(SimulatedBehavior {
        stall_commands: true,
        ..Default::default()
    });
    let mut panel = panel_on(&controller);

    let err = panel.index_b(Direction::Forward).unwrap_err();
    assert!(err.is_timeout());
    assert_eq!(panel.dispatcher().state(), DispatchState::Sent);
    assert_eq!(panel.store().index_count(Target::Axis(Axis::B)), 0);
}

#[test]
fn test_rejected_index_leaves_spindle_counts() {
    let controller = SimulatedController::new(TaskMode::Mdi).with_behavior(SimulatedBehavior {
        reject_commands: Some("spindle not homed".to_string()),
        ..Default::default()
    });
    let mut panel = panel_on(&controller);

    assert!(panel.index_spindles(Direction::Forward).is_err());
    assert_eq!(controller.sent_commands(), strings(&["S1.0 $0"]));
    assert_eq!(panel.store().index_count(Target::Spindle(Spindle::Sp0)), 0);
}

#[test]
fn test_flags_and_hit_counter() {
    let controller = SimulatedController::new(TaskMode::Mdi);
    let mut panel = panel_on(&controller);

    assert!(panel.on_sync_toggled(Target::Axis(Axis::B)));
    assert!(panel.on_index_enabled_toggled(Spindle::Sp1));
    assert_eq!(panel.on_button_press(), "Hits: 1");
    assert_eq!(panel.on_button_press(), "Hits: 2");
    assert!(controller.sent_commands().is_empty());
}

#[test]
fn test_from_config_applies_defaults_and_links() {
    let mut config = Config::default();
    config.defaults.b.index_mode = IndexMode::Divisions;
    config.defaults.b.index_distance = 7.0;
    config.defaults.b.feed_rate = 4.0;
    config.links.library = "https://example.org/library".to_string();

    let controller = SimulatedController::new(TaskMode::Mdi);
    let (command, status) = controller.channels();
    let dispatcher = MdiDispatcher::new(
        Box::new(command),
        Box::new(status),
        PanelHandler::dispatch_config(&config.dispatch),
    );
    let mut panel = PanelHandler::from_config(&config, dispatcher).unwrap();

    assert_eq!(panel.help_link(HelpResource::Library), "https://example.org/library");
    assert_eq!(
        panel.dispatcher().config().command_timeout,
        Duration::from_secs(120)
    );

    panel.index_b(Direction::Forward).unwrap();
    assert_eq!(controller.sent_commands(), strings(&["G0 B51.4 F4.0"]));
}

#[test]
fn test_non_finite_speed_sends_nothing() {
    let controller = SimulatedController::new(TaskMode::Mdi);
    let mut panel = panel_on(&controller);

    let err = panel.on_primary_speed_changed(&f64::INFINITY).unwrap_err();
    assert!(err.is_panel_error());
    assert!(panel.on_feed_rate_changed(Axis::X, &f64::NAN).is_err());
    assert!(panel
        .on_index_distance_changed(Target::from(LinearAxis::X), &f64::NAN)
        .is_err());

    panel.move_linear(LinearAxis::X, Sign::Plus).unwrap();
    assert_eq!(controller.sent_commands(), strings(&["G0 X0.0 F1.0"]));
    assert_eq!(panel.store().primary_speed(), 1.0);
}

#[test]
fn test_overflowing_secondary_speed_is_not_dispatched() {
    let controller = SimulatedController::new(TaskMode::Mdi);
    let mut panel = panel_on(&controller);
    panel.on_speed_percent_changed(&400.0).unwrap();
    controller.clear_history();

    panel.start_spindles(Direction::Forward).unwrap();
    assert!(panel.on_primary_speed_changed(&f64::MAX).unwrap_err().is_panel_error());
    assert!(panel.start_spindles(Direction::Forward).unwrap_err().is_panel_error());

    assert_eq!(
        controller.sent_commands(),
        strings(&["S1.0 $0", "S4.0 $1", "M3 $-1"])
    );
}

#[test]
fn test_lost_link_is_a_channel_error() {
    let controller = SimulatedController::new(TaskMode::Mdi).with_behavior(SimulatedBehavior {
        disconnected: true,
        ..Default::default()
    });
    let mut panel = panel_on(&controller);

    let err = panel.index_b(Direction::Forward).unwrap_err();
    assert!(err.is_channel_error());
    assert_eq!(panel.store().index_count(Target::Axis(Axis::B)), 0);
    assert!(controller.sent_commands().is_empty());
}
