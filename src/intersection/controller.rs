// controller.rs
//
// Monitor guarding the intersection: one mutex around the registry and one
// condition variable that vehicles wait on while their route is unsafe.

use crate::error::IntersectionError;
use crate::intersection::admission::can_enter;
use crate::intersection::direction::{Direction, Route};
use crate::intersection::registry::{OccupancyRegistry, OccupantId};
use std::sync::{Condvar, Mutex, MutexGuard};

#[derive(Debug)]
struct IntersectionState {
    registry: OccupancyRegistry,
    /// Vehicles currently parked on the condition variable.
    waiting: usize,
}

/// Arbitrates entry to a single intersection between many vehicle threads.
///
/// Share it through an `Arc`. Each vehicle calls [`enter`](Self::enter)
/// before crossing and [`exit`](Self::exit) (or [`depart`](Self::depart))
/// afterwards. Admission order among waiting vehicles is unspecified.
#[derive(Debug)]
pub struct IntersectionController {
    state: Mutex<IntersectionState>,
    vacancy: Condvar,
}

impl IntersectionController {
    /// Creates the monitor for at most `capacity` simultaneous vehicles.
    pub fn new(capacity: usize) -> Result<Self, IntersectionError> {
        if capacity == 0 {
            return Err(IntersectionError::ZeroCapacity);
        }
        Ok(Self {
            state: Mutex::new(IntersectionState {
                registry: OccupancyRegistry::with_capacity(capacity),
                waiting: 0,
            }),
            vacancy: Condvar::new(),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, IntersectionState>, IntersectionError> {
        self.state.lock().map_err(|_| IntersectionError::Poisoned)
    }

    /// Blocks until the vehicle can cross without colliding with anyone
    /// inside, then records it as an occupant.
    pub fn enter(
        &self,
        origin: Direction,
        destination: Direction,
    ) -> Result<OccupantId, IntersectionError> {
        let route = Route::new(origin, destination)?;
        let mut state = self.lock()?;

        // A wake-up only means the occupancy changed; re-check every time.
        while !can_enter(route, state.registry.routes()) {
            state.waiting += 1;
            log::trace!("{} waiting, {} inside", route, state.registry.len());
            let woken = self.vacancy.wait(state);
            state = woken.map_err(|_| IntersectionError::Poisoned)?;
            state.waiting -= 1;
        }

        let id = state.registry.add(route).inspect_err(|e| {
            log::error!("refusing {route}: {e}");
        })?;
        log::debug!(
            "vehicle {} entered {} ({} inside)",
            id,
            route,
            state.registry.len()
        );
        Ok(id)
    }

    /// Signals that a vehicle travelling `origin -> destination` has left.
    ///
    /// When several vehicles share that route, one of them is removed; which
    /// one is unspecified. Prefer [`depart`](Self::depart) when the identity
    /// returned by `enter` is available.
    pub fn exit(&self, origin: Direction, destination: Direction) -> Result<(), IntersectionError> {
        let route = Route::new(origin, destination)?;
        let mut state = self.lock()?;
        let occupant = state.registry.remove_route(route).inspect_err(|e| {
            log::error!("{e}");
        })?;
        log::debug!(
            "vehicle {} left {} ({} inside)",
            occupant.id,
            route,
            state.registry.len()
        );
        self.vacancy.notify_all();
        Ok(())
    }

    /// Signals that the vehicle admitted as `id` has left. Returns its route.
    pub fn depart(&self, id: OccupantId) -> Result<Route, IntersectionError> {
        let mut state = self.lock()?;
        let occupant = state.registry.remove(id).inspect_err(|e| {
            log::error!("{e}");
        })?;
        log::debug!(
            "vehicle {} left {} ({} inside)",
            id,
            occupant.route,
            state.registry.len()
        );
        // A single departure can unblock several distinct routes at once.
        self.vacancy.notify_all();
        Ok(occupant.route)
    }

    /// Releases the monitor. Taking `self` by value means no vehicle can
    /// still be inside `enter` or `exit`; vehicles that never left are
    /// reported.
    pub fn teardown(self) -> Result<(), IntersectionError> {
        let state = self
            .state
            .into_inner()
            .map_err(|_| IntersectionError::Poisoned)?;
        if !state.registry.is_empty() {
            return Err(IntersectionError::OccupantsRemaining {
                count: state.registry.len(),
            });
        }
        log::debug!("intersection torn down");
        Ok(())
    }

    pub fn capacity(&self) -> Result<usize, IntersectionError> {
        Ok(self.lock()?.registry.capacity())
    }

    /// Number of vehicles inside right now.
    pub fn occupancy(&self) -> Result<usize, IntersectionError> {
        Ok(self.lock()?.registry.len())
    }

    /// Number of vehicles blocked in `enter`.
    pub fn waiting(&self) -> Result<usize, IntersectionError> {
        Ok(self.lock()?.waiting)
    }

    /// Copy of the routes inside right now, taken under the lock.
    pub fn occupants(&self) -> Result<Vec<Route>, IntersectionError> {
        Ok(self.lock()?.registry.snapshot())
    }
}
