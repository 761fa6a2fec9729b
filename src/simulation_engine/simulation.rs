// simulation.rs
use crate::error::{IntersectionError, SimulationError};
use crate::intersection::admission::find_conflict;
use crate::intersection::controller::IntersectionController;
use crate::intersection::direction::Route;
use crate::simulation_engine::config::SimulationConfig;
use crate::simulation_engine::stats::{SimulationReport, VehicleRecord};
use crate::simulation_engine::vehicles::VehicleFactory;

use std::sync::Arc;
use std::thread;
use std::time::Instant;

/// What a single worker observed over its run.
#[derive(Debug, Default)]
struct WorkerOutcome {
    records: Vec<VehicleRecord>,
    violations: Vec<(Route, Route)>,
}

/// Sends each of one worker's vehicles through the intersection in turn.
///
/// Runs on a blocking thread: `enter` parks the OS thread until the route is
/// safe.
fn drive_worker(
    worker: usize,
    config: &SimulationConfig,
    controller: &IntersectionController,
) -> Result<WorkerOutcome, IntersectionError> {
    let mut factory = VehicleFactory::new(
        worker,
        config.traffic,
        config.seed,
        config.vehicle_threads as u64,
    );
    let mut outcome = WorkerOutcome::default();

    for _ in 0..config.vehicles_per_thread {
        thread::sleep(config.interarrival());
        let Some(vehicle) = factory.next_vehicle() else {
            break;
        };
        let route = vehicle.route;

        let arrived = Instant::now();
        let occupant = controller.enter(route.origin(), route.destination())?;
        let wait = arrived.elapsed();

        // Independent check of the monitor: nothing inside may conflict.
        let inside = controller.occupants()?;
        if let Some(pair) = find_conflict(&inside) {
            log::error!(
                "vehicle {} admitted with {} and {} inside together",
                vehicle.id,
                pair.0,
                pair.1
            );
            outcome.violations.push(pair);
        }
        log::debug!(
            "worker {} vehicle {} crossing {} after waiting {:?}",
            worker,
            vehicle.id,
            route,
            wait
        );
        outcome.records.push(VehicleRecord::new(
            vehicle.id,
            worker,
            route,
            wait,
            inside.len(),
        ));

        thread::sleep(config.crossing());
        controller.depart(occupant)?;
    }
    Ok(outcome)
}

/// Runs every vehicle worker to completion and collects their statistics.
pub async fn run_simulation(config: SimulationConfig) -> Result<SimulationReport, SimulationError> {
    config.validate()?;
    log::info!(
        "Starting simulation: {} workers x {} vehicles, {:?} traffic",
        config.vehicle_threads,
        config.vehicles_per_thread,
        config.traffic
    );

    let controller = Arc::new(IntersectionController::new(config.vehicle_threads)?);
    let config = Arc::new(config);
    let started = Instant::now();

    let workers: Vec<_> = (0..config.vehicle_threads)
        .map(|worker| {
            let controller = Arc::clone(&controller);
            let config = Arc::clone(&config);
            tokio::task::spawn_blocking(move || drive_worker(worker, &config, &controller))
        })
        .collect();

    // Join every worker before reporting any failure so the controller is
    // quiescent at teardown.
    let mut results = Vec::with_capacity(workers.len());
    for handle in workers {
        results.push(handle.await);
    }
    let elapsed = started.elapsed();

    let mut records = Vec::with_capacity(config.total_vehicles());
    let mut violations = Vec::new();
    for result in results {
        let outcome = result??;
        records.extend(outcome.records);
        violations.extend(outcome.violations);
    }

    match Arc::try_unwrap(controller) {
        Ok(controller) => controller.teardown()?,
        Err(_) => log::warn!("intersection still shared after all workers finished"),
    }

    let report = SimulationReport::from_records(records, violations, elapsed);
    log::info!(
        "Simulation finished: {} vehicles in {:.3}s",
        report.total_vehicles(),
        elapsed.as_secs_f64()
    );

    if let Some(path) = &config.csv_path {
        report.write_csv(path)?;
        log::info!("Wrote vehicle records to {}", path.display());
    }
    Ok(report)
}
