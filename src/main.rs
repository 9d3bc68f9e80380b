//! Tumble - headless simulation runner
//!
//! Builds the configured scenario and steps it frame by frame, logging the
//! state a renderer would read after each tick.

use tumble::config::AppConfig;
use tumble::scenario::build_world;
use tumble_physics::{PhysicsWorld, StepReport};

fn log_frame(frame: u32, world: &PhysicsWorld, report: &StepReport) {
    for (index, (_key, body)) in world.bodies().enumerate() {
        let p = body.position;
        let v = body.velocity;
        log::info!(
            "frame {:4} body {:2}: pos ({:8.4}, {:8.4}, {:8.4}) vel ({:8.4}, {:8.4}, {:8.4}) ke {:.3}",
            frame, index, p.x, p.y, p.z, v.x, v.y, v.z, body.kinetic_energy()
        );
    }

    if let Some(cloth) = world.cloth() {
        let bounds = cloth.bounds();
        log::info!(
            "frame {:4} cloth: min ({:.4}, {:.4}, {:.4}) max ({:.4}, {:.4}, {:.4}), {} corrections, {} edge contacts",
            frame,
            bounds.min.x, bounds.min.y, bounds.min.z,
            bounds.max.x, bounds.max.y, bounds.max.z,
            report.particle_corrections,
            report.edge_contacts
        );
    }

    if report.ground_contacts > 0 || report.body_pairs > 0 {
        log::debug!(
            "frame {:4}: {} ground contacts, {} body pairs",
            frame, report.ground_contacts, report.body_pairs
        );
    }
}

fn main() {
    // Load configuration before logging so its level can seed the filter
    let loaded = AppConfig::load();
    let level = loaded
        .as_ref()
        .map(|config| config.simulation.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());

    // Initialize logging (RUST_LOG still wins)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = loaded.unwrap_or_else(|e| {
        log::warn!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });

    let sim = &config.simulation;
    log::info!(
        "Starting Tumble: scenario '{}', dt {}, {} frames, {} substeps",
        sim.scenario, sim.dt, sim.frames, sim.substeps
    );

    let mut world = match build_world(sim.scenario, &config) {
        Ok(world) => world,
        Err(e) => {
            log::error!("Failed to build scenario '{}': {}", sim.scenario, e);
            std::process::exit(1);
        }
    };

    for frame in 1..=sim.frames {
        let report = world.step(sim.dt);
        log_frame(frame, &world, &report);
    }

    log::info!("Finished {} frames", sim.frames);
}
