use rosetta_communication::{
    DispatchConfig, DispatchState, MdiDispatcher, SimulatedBehavior, SimulatedController,
    TaskMode,
};
use rosetta_core::{ControllerError, Error};
use std::time::Duration;

fn dispatcher_for(controller: &SimulatedController) -> MdiDispatcher {
    let (command, status) = controller.channels();
    MdiDispatcher::new(
        Box::new(command),
        Box::new(status),
        DispatchConfig {
            mode_timeout: Duration::from_millis(250),
            command_timeout: Duration::from_millis(1500),
        },
    )
}

#[test]
fn test_already_in_mdi_requests_no_mode_change() {
    let controller = SimulatedController::new(TaskMode::Mdi);
    let mut dispatcher = dispatcher_for(&controller);
    assert_eq!(dispatcher.state(), DispatchState::Unknown);

    dispatcher.dispatch("M5").unwrap();

    assert!(controller.mode_requests().is_empty());
    assert_eq!(controller.sent_commands(), vec!["M5".to_string()]);
    assert_eq!(dispatcher.state(), DispatchState::Completed);
}

#[test]
fn test_manual_mode_is_switched_once_per_batch() {
    let controller = SimulatedController::new(TaskMode::Manual);
    let mut dispatcher = dispatcher_for(&controller);

    dispatcher
        .dispatch_batch(&["S1000.0 $0", "S500.0 $1"])
        .unwrap();

    assert_eq!(controller.mode_requests(), vec![TaskMode::Mdi]);
    assert_eq!(controller.task_mode(), TaskMode::Mdi);
    assert_eq!(
        controller.sent_commands(),
        vec!["S1000.0 $0".to_string(), "S500.0 $1".to_string()]
    );
}

#[test]
fn test_mode_is_rechecked_on_every_dispatch() {
    let controller = SimulatedController::new(TaskMode::Mdi);
    let mut dispatcher = dispatcher_for(&controller);

    dispatcher.dispatch("M3 $-1").unwrap();
    controller.set_task_mode(TaskMode::Auto);
    dispatcher.dispatch("M5").unwrap();

    assert_eq!(controller.mode_requests(), vec![TaskMode::Mdi]);
    assert_eq!(controller.poll_count(), 3);
}

#[test]
fn test_stalled_mode_change_times_out() {
    let controller = SimulatedController::new(TaskMode::Manual).with_behavior(SimulatedBehavior {
        stall_mode_change: true,
        ..Default::default()
    });
    let mut dispatcher = dispatcher_for(&controller);

    let err = dispatcher.dispatch("G0 X1.0 F1.0").unwrap_err();

    assert!(err.is_timeout());
    assert!(matches!(
        err,
        Error::Controller(ControllerError::Timeout { timeout_ms: 250, .. })
    ));
    assert!(controller.sent_commands().is_empty());
    assert_eq!(dispatcher.state(), DispatchState::ModeChanging);
}

#[test]
fn test_ignored_mode_change_is_rejected() {
    let controller = SimulatedController::new(TaskMode::Auto).with_behavior(SimulatedBehavior {
        ignore_mode_change: true,
        ..Default::default()
    });
    let mut dispatcher = dispatcher_for(&controller);

    let err = dispatcher.dispatch("M5").unwrap_err();

    assert!(matches!(
        err,
        Error::Controller(ControllerError::ModeChangeRejected { .. })
    ));
    assert!(controller.sent_commands().is_empty());
}

#[test]
fn test_stalled_command_times_out_and_stops_batch() {
    let controller = SimulatedController::new(TaskMode::Mdi).with_behavior(SimulatedBehavior {
        stall_commands: true,
        ..Default::default()
    });
    let mut dispatcher = dispatcher_for(&controller);

    let err = dispatcher.dispatch_batch(&["M3 $-1", "M5"]).unwrap_err();

    assert!(matches!(
        err,
        Error::Controller(ControllerError::Timeout { timeout_ms: 1500, .. })
    ));
    assert_eq!(controller.sent_commands(), vec!["M3 $-1".to_string()]);
    assert_eq!(dispatcher.state(), DispatchState::Sent);
}

#[test]
fn test_rejected_command_reports_reason() {
    let controller = SimulatedController::new(TaskMode::Mdi).with_behavior(SimulatedBehavior {
        reject_commands: Some("machine off".to_string()),
        ..Default::default()
    });
    let mut dispatcher = dispatcher_for(&controller);

    let err = dispatcher.dispatch("M19 R90.0 Q10 P1 $0").unwrap_err();

    match err {
        Error::Controller(ControllerError::CommandRejected { command, reason }) => {
            assert_eq!(command, "M19 R90.0 Q10 P1 $0");
            assert_eq!(reason, "machine off");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_empty_batch_leaves_controller_alone() {
    let controller = SimulatedController::new(TaskMode::Manual);
    let mut dispatcher = dispatcher_for(&controller);

    dispatcher.dispatch_batch::<&str>(&[]).unwrap();

    assert_eq!(controller.poll_count(), 0);
    assert!(controller.mode_requests().is_empty());
    assert_eq!(dispatcher.state(), DispatchState::Unknown);
}

#[test]
fn test_lost_link_stops_at_polling() {
    let controller = SimulatedController::new(TaskMode::Mdi).with_behavior(SimulatedBehavior {
        disconnected: true,
        ..Default::default()
    });
    let mut dispatcher = dispatcher_for(&controller);

    let err = dispatcher.dispatch("M5").unwrap_err();

    assert!(matches!(
        err,
        Error::Controller(ControllerError::Channel { .. })
    ));
    assert_eq!(controller.poll_count(), 0);
    assert!(controller.sent_commands().is_empty());
    assert_eq!(dispatcher.state(), DispatchState::Polling);
}
