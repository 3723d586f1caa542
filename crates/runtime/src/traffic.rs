//! Headless stand-in for the vehicle simulation.
//!
//! Two generators, one per approach, spawn vehicles at jittered intervals.
//! Vehicles queue at the semaphore detector, leave one at a time while their
//! light is green and spend a fixed time inside the critical zone before
//! reaching their goal. Vehicles from both approaches inside the zone at the
//! same time count as a collision.
//!
//! A generator stops when it has spawned its share or when the controller's
//! vehicle cap is reached. Running out of its share is announced to the
//! controller as "generator finished".

use std::collections::VecDeque;

use intersection::{Approach, EpisodeController, EpisodeReporter, EpisodeStats, TrafficSource};

#[derive(Clone, Debug)]
pub struct TrafficConfig {
    /// Vehicles each generator spawns per episode.
    pub vehicles_per_generator: u64,
    /// Mean seconds between spawns of one generator.
    pub mean_spawn_interval: f32,
    /// Seconds between two vehicles leaving the same green light.
    pub release_interval: f32,
    /// Seconds a vehicle spends inside the critical zone.
    pub crossing_time: f32,
    pub seed: u64,
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            vehicles_per_generator: 20,
            mean_spawn_interval: 1.5,
            release_interval: 0.8,
            crossing_time: 1.2,
            seed: 7,
        }
    }
}

#[derive(Clone, Debug)]
struct Generator {
    approach: Approach,
    remaining: u64,
    next_spawn: f32,
    release_cooldown: f32,
    /// Seconds waited so far by each queued vehicle, head first.
    queue: VecDeque<f32>,
    announced: bool,
}

impl Generator {
    fn new(approach: Approach, vehicles: u64, first_spawn: f32) -> Self {
        Self {
            approach,
            remaining: vehicles,
            next_spawn: first_spawn,
            release_cooldown: 0.0,
            queue: VecDeque::new(),
            announced: false,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Crossing {
    approach: Approach,
    remaining: f32,
    waited: f32,
}

pub struct TrafficSim {
    config: TrafficConfig,
    rng: fastrand::Rng,
    generators: [Generator; 2],
    in_zone: Vec<Crossing>,
}

impl TrafficSim {
    #[must_use]
    pub fn new(config: TrafficConfig) -> Self {
        let rng = fastrand::Rng::with_seed(config.seed);
        let mut sim = Self {
            generators: Approach::ALL.map(|a| Generator::new(a, 0, 0.0)),
            in_zone: Vec::new(),
            rng,
            config,
        };
        sim.reset();
        sim
    }

    /// Seconds until the next spawn, uniformly within ±50% of the mean.
    fn spawn_gap(&mut self) -> f32 {
        self.config.mean_spawn_interval * (0.5 + self.rng.f32())
    }

    /// Vehicles queued or crossing.
    #[must_use]
    pub fn vehicles_in_flight(&self) -> usize {
        self.generators.iter().map(|g| g.queue.len()).sum::<usize>() + self.in_zone.len()
    }

    fn spawn<R: EpisodeReporter>(&mut self, i: usize, dt: f32, controller: &mut EpisodeController<R>) {
        if self.generators[i].remaining == 0
            || controller.vehicles_spawned() >= controller.config().vehicle_cap()
        {
            return;
        }
        self.generators[i].next_spawn -= dt;
        if self.generators[i].next_spawn > 0.0 {
            return;
        }
        let gap = self.spawn_gap();
        let generator = &mut self.generators[i];
        generator.next_spawn = gap;
        generator.remaining -= 1;
        generator.queue.push_back(0.0);
        controller.vehicle_spawned();
        controller.vehicle_detected(generator.approach);
    }

    fn release<R: EpisodeReporter>(&mut self, i: usize, dt: f32, controller: &mut EpisodeController<R>) {
        let crossing_time = self.config.crossing_time;
        let release_interval = self.config.release_interval;
        let generator = &mut self.generators[i];
        for waited in &mut generator.queue {
            *waited += dt;
        }
        generator.release_cooldown = (generator.release_cooldown - dt).max(0.0);
        if generator.release_cooldown > 0.0 || !controller.semaphore(generator.approach).is_green() {
            return;
        }
        if let Some(waited) = generator.queue.pop_front() {
            controller.vehicle_released(generator.approach);
            generator.release_cooldown = release_interval;
            self.in_zone.push(Crossing {
                approach: generator.approach,
                remaining: crossing_time,
                waited,
            });
        }
    }

    fn move_through_zone<R: EpisodeReporter>(&mut self, dt: f32, controller: &mut EpisodeController<R>) {
        for crossing in &mut self.in_zone {
            crossing.remaining -= dt;
        }

        let north = self.in_zone.iter().any(|c| c.approach == Approach::North);
        let south = self.in_zone.iter().any(|c| c.approach == Approach::South);
        if north && south && !controller.zone().accident_occurred() {
            tracing::debug!("vehicles from both approaches collided in the zone");
            controller.zone_mut().report_accident();
        }

        let crossing_time = self.config.crossing_time;
        self.in_zone.retain(|crossing| {
            if crossing.remaining > 0.0 {
                return true;
            }
            controller.zone_mut().register_crossing(crossing_time, crossing.waited);
            controller.vehicle_reached_goal();
            false
        });
    }
}

impl TrafficSource for TrafficSim {
    fn reset(&mut self) {
        let vehicles = self.config.vehicles_per_generator;
        for i in 0..self.generators.len() {
            let first_spawn = self.spawn_gap();
            self.generators[i] = Generator::new(Approach::ALL[i], vehicles, first_spawn);
        }
        self.in_zone.clear();
    }

    fn advance<R: EpisodeReporter>(
        &mut self,
        dt: f32,
        controller: &mut EpisodeController<R>,
    ) -> Option<EpisodeStats> {
        for i in 0..self.generators.len() {
            self.spawn(i, dt, controller);
            self.release(i, dt, controller);
        }
        self.move_through_zone(dt, controller);

        let mut ended = None;
        for generator in &mut self.generators {
            if generator.remaining == 0 && !generator.announced {
                generator.announced = true;
                tracing::debug!(approach = %generator.approach, "generator finished");
                if let Some(stats) = controller.generator_finished() {
                    ended = Some(stats);
                }
            }
        }
        ended
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intersection::{ControllerConfig, EpisodeOutcome, NullReporter};

    fn controller(cap: u64) -> EpisodeController<NullReporter> {
        let config = ControllerConfig::default().with_max_total_vehicles(cap);
        let mut controller = EpisodeController::new(config, NullReporter).unwrap();
        controller.begin_episode();
        controller
    }

    #[test]
    fn spawning_stops_at_vehicle_cap() {
        let mut controller = controller(3);
        let mut sim = TrafficSim::new(TrafficConfig {
            vehicles_per_generator: 10,
            mean_spawn_interval: 0.1,
            ..TrafficConfig::default()
        });
        for _ in 0..500 {
            sim.advance(0.05, &mut controller);
        }
        assert_eq!(controller.vehicles_spawned(), 3);
        assert_eq!(sim.vehicles_in_flight(), 3, "nobody released at red");
    }

    #[test]
    fn opposing_vehicles_in_zone_collide() {
        let mut controller = controller(0);
        let mut sim = TrafficSim::new(TrafficConfig {
            vehicles_per_generator: 100,
            mean_spawn_interval: 0.1,
            crossing_time: 5.0,
            ..TrafficConfig::default()
        });
        controller.apply_action(0);
        for _ in 0..40 {
            sim.advance(0.05, &mut controller);
        }
        assert!(!controller.zone().accident_occurred());

        controller.apply_action(1);
        for _ in 0..5 {
            sim.advance(0.05, &mut controller);
        }
        assert!(controller.zone().accident_occurred());
    }

    #[test]
    fn generators_end_episode_once_both_are_spent() {
        let mut controller = controller(0);
        let mut sim = TrafficSim::new(TrafficConfig {
            vehicles_per_generator: 2,
            mean_spawn_interval: 0.2,
            ..TrafficConfig::default()
        });
        let mut ended = None;
        for _ in 0..200 {
            if let Some(stats) = sim.advance(0.05, &mut controller) {
                ended = Some(stats);
                break;
            }
        }
        let stats = ended.expect("both generators finished");
        assert_eq!(stats.outcome, EpisodeOutcome::GeneratorsFinished);
        assert_eq!(stats.vehicles_spawned, 4);
    }
}
