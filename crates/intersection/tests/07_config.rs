use intersection::{ConfigError, ControllerConfig, RewardConfig, DEFAULT_MAX_TOTAL_VEHICLES};

#[test]
fn empty_document_uses_defaults() {
    let config = ControllerConfig::from_json_str("{}").unwrap();
    assert_eq!(config, ControllerConfig::default());
    assert_eq!(config.vehicle_cap(), DEFAULT_MAX_TOTAL_VEHICLES);
    assert_eq!(config.rewards, RewardConfig::default());
}

#[test]
fn partial_document_overrides_named_fields() {
    let json = r#"{
        "max_total_vehicles": 40,
        "decision_interval": 0.5,
        "rewards": { "accident_penalty": 1.0 }
    }"#;
    let config = ControllerConfig::from_json_str(json).unwrap();
    assert_eq!(config.vehicle_cap(), 40);
    assert_eq!(config.decision_interval, 0.5);
    assert_eq!(config.wait_timer_limit, 10.0);
    assert_eq!(config.rewards.accident_penalty, 1.0);
    assert_eq!(config.rewards.goal_bonus, 0.1);
}

#[test]
fn interval_bounds_are_inclusive() {
    for ok in [0.1, 1.0, 5.0] {
        assert!(ControllerConfig::default().with_decision_interval(ok).validate().is_ok());
    }
    for bad in [0.0, 0.05, 5.5, -1.0] {
        let err = ControllerConfig::default()
            .with_decision_interval(bad)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::DecisionInterval { .. }), "{bad}");
    }
}

#[test]
fn wait_timer_limit_must_be_positive() {
    for bad in [0.0, -2.0, f32::INFINITY] {
        let err = ControllerConfig::default()
            .with_wait_timer_limit(bad)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::WaitTimerLimit(_)));
    }
}

#[test]
fn negative_reward_weight_is_rejected() {
    let json = r#"{ "rewards": { "accident_penalty": -0.5 } }"#;
    let err = ControllerConfig::from_json_str(json).unwrap_err();
    assert!(matches!(err, ConfigError::RewardWeight("accident_penalty")));
    assert!(err.to_string().contains("non-negative"));

    let mut config = ControllerConfig::default();
    config.rewards.goal_bonus = f32::NAN;
    assert!(matches!(config.validate(), Err(ConfigError::RewardWeight("goal_bonus"))));

    config.rewards.goal_bonus = 0.0;
    assert!(config.validate().is_ok());
}

#[test]
fn malformed_json_is_a_parse_error() {
    let err = ControllerConfig::from_json_str("{ \"decision_interval\": ").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
    let err = ControllerConfig::from_json_str(r#"{"decision_interval": 9.0}"#).unwrap_err();
    assert!(err.to_string().contains("decision interval"));
}

#[test]
fn config_round_trips_through_json() {
    let config = ControllerConfig::default()
        .with_max_total_vehicles(12)
        .with_wait_timer_limit(3.0);
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(ControllerConfig::from_json_str(&json).unwrap(), config);
}
