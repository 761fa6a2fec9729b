use crate::intersection::direction::{Direction, Route};
use crate::simulation_engine::config::TrafficPattern;
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;

/// A vehicle produced by one of the simulation workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vehicle {
    pub id: u64,
    pub worker: usize,
    pub route: Route,
}

/// Draws vehicles for a single worker.
pub struct VehicleFactory {
    worker: usize,
    routes: Vec<Route>,
    rng: SmallRng,
    produced: u64,
    id_stride: u64,
}

impl VehicleFactory {
    /// `id_stride` keeps ids unique across workers: worker `n` numbers its
    /// vehicles `n, n + stride, n + 2 * stride, ...`.
    pub fn new(worker: usize, pattern: TrafficPattern, seed: Option<u64>, id_stride: u64) -> Self {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed.wrapping_add(worker as u64)),
            None => SmallRng::from_rng(&mut rand::rng()),
        };
        Self {
            worker,
            routes: route_pool(pattern),
            rng,
            produced: 0,
            id_stride: id_stride.max(1),
        }
    }

    pub fn next_vehicle(&mut self) -> Option<Vehicle> {
        let route = *self.routes.choose(&mut self.rng)?;
        let id = self.worker as u64 + self.produced * self.id_stride;
        self.produced += 1;
        Some(Vehicle {
            id,
            worker: self.worker,
            route,
        })
    }
}

/// Every legal route, with routes leaving the heavy approach repeated
/// `weight` times. Destinations are uniform per origin.
fn route_pool(pattern: TrafficPattern) -> Vec<Route> {
    let copies = |origin: Direction| match pattern {
        TrafficPattern::Uniform => 1,
        TrafficPattern::Skewed {
            heavy_origin,
            weight,
        } if heavy_origin == origin => weight.max(1) as usize,
        TrafficPattern::Skewed { .. } => 1,
    };

    Direction::ALL
        .into_iter()
        .flat_map(|origin| {
            origin
                .others()
                .filter_map(move |destination| Route::new(origin, destination).ok())
                .flat_map(move |route| std::iter::repeat(route).take(copies(origin)))
        })
        .collect()
}
