#![allow(dead_code)]

use intersection::{Approach, ControllerConfig, EpisodeController, MemoryReporter};

pub const EPS: f32 = 1e-5;

pub fn controller(config: ControllerConfig) -> EpisodeController<MemoryReporter> {
    EpisodeController::new(config, MemoryReporter::new()).expect("valid config")
}

/// Spawns `n` vehicles and parks them at `approach`'s detector.
pub fn queue(controller: &mut EpisodeController<MemoryReporter>, approach: Approach, n: u32) {
    for _ in 0..n {
        controller.vehicle_spawned();
        controller.vehicle_detected(approach);
    }
}

/// Releases one queued vehicle and walks it through the zone to its goal.
pub fn cross(controller: &mut EpisodeController<MemoryReporter>, approach: Approach) {
    controller.vehicle_released(approach);
    controller.zone_mut().register_crossing(1.5, 2.0);
    controller.vehicle_reached_goal();
}

pub fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < EPS,
        "expected {expected}, got {actual}"
    );
}
