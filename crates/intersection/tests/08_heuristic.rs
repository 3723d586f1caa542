use intersection::{
    Approach, ControllerConfig, EpisodeController, HeuristicPolicy, ManualInput, NullReporter,
    TickOutcome,
};

#[test]
fn key_presses_map_to_actions() {
    let mut c = EpisodeController::new(ControllerConfig::default(), NullReporter).unwrap();
    c.begin_episode();
    c.vehicle_detected(Approach::North);

    let mut policy = HeuristicPolicy::new();
    policy.press(ManualInput::Down);
    assert!(matches!(c.tick_with(0.1, &mut policy), TickOutcome::DecisionRequested(_)));
    assert!(c.semaphore(Approach::South).is_green());

    policy.press(ManualInput::Up);
    let _ = c.apply_action(intersection::Policy::decide(&mut policy, &c.observe()));
    assert!(c.semaphore(Approach::North).is_green());
    assert!(!c.semaphore(Approach::South).is_green());
}

#[test]
fn no_key_leaves_lights_alone() {
    let mut c = EpisodeController::new(ControllerConfig::default(), NullReporter).unwrap();
    c.begin_episode();
    c.apply_action(1);
    c.vehicle_detected(Approach::North);

    let mut policy = HeuristicPolicy::new();
    assert!(matches!(c.tick_with(0.1, &mut policy), TickOutcome::DecisionRequested(_)));
    assert!(c.semaphore(Approach::South).is_green());
    assert!(!c.semaphore(Approach::North).is_green());
}

#[test]
fn key_press_is_consumed_once() {
    let observation = intersection::Observation {
        approaches: [intersection::ApproachObservation {
            is_green: false,
            cars_queued: 0,
            cars_passed_total: 0,
        }; 2],
    };
    let mut policy = HeuristicPolicy::new();
    policy.press(ManualInput::Up);
    assert_eq!(intersection::Policy::decide(&mut policy, &observation), 0);
    assert_eq!(
        intersection::Policy::decide(&mut policy, &observation),
        HeuristicPolicy::IDLE
    );
}
