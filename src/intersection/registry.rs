use crate::error::IntersectionError;
use crate::intersection::direction::Route;
use std::fmt;

/// Identity handed to a vehicle when it is admitted. Distinguishes vehicles
/// that share an identical route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OccupantId(pub u64);

impl fmt::Display for OccupantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A vehicle currently inside the intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occupant {
    pub id: OccupantId,
    pub route: Route,
}

/// The set of vehicles inside the intersection, bounded by `capacity`.
/// Only the controller holds one, behind its lock.
#[derive(Debug)]
pub struct OccupancyRegistry {
    occupants: Vec<Occupant>,
    capacity: usize,
    next_id: u64,
}

impl OccupancyRegistry {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            occupants: Vec::with_capacity(capacity),
            capacity,
            next_id: 1,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.occupants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occupants.is_empty()
    }

    /// Records a newly admitted vehicle. Never grows past `capacity`.
    pub fn add(&mut self, route: Route) -> Result<OccupantId, IntersectionError> {
        if self.occupants.len() >= self.capacity {
            return Err(IntersectionError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        let id = OccupantId(self.next_id);
        self.next_id += 1;
        self.occupants.push(Occupant { id, route });
        Ok(id)
    }

    /// Removes exactly the occupant with this identity.
    pub fn remove(&mut self, id: OccupantId) -> Result<Occupant, IntersectionError> {
        let index = self
            .occupants
            .iter()
            .position(|o| o.id == id)
            .ok_or(IntersectionError::UnknownOccupant(id))?;
        Ok(self.occupants.swap_remove(index))
    }

    /// Removes one occupant travelling `route`. When several vehicles share
    /// the route, which one leaves is unspecified; use [`remove`](Self::remove)
    /// when the identity matters.
    pub fn remove_route(&mut self, route: Route) -> Result<Occupant, IntersectionError> {
        let index = self
            .occupants
            .iter()
            .position(|o| o.route == route)
            .ok_or(IntersectionError::UnmatchedExit { route })?;
        Ok(self.occupants.swap_remove(index))
    }

    pub fn routes(&self) -> impl Iterator<Item = Route> + '_ {
        self.occupants.iter().map(|o| o.route)
    }

    pub fn snapshot(&self) -> Vec<Route> {
        self.routes().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intersection::direction::Direction::*;

    #[test]
    fn add_and_remove_track_size() {
        let mut registry = OccupancyRegistry::with_capacity(3);
        let route = Route::new(North, East).unwrap();

        let a = registry.add(route).unwrap();
        let b = registry.add(route).unwrap();
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);

        assert_eq!(registry.remove(a).unwrap().id, a);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.snapshot(), vec![route]);
    }

    #[test]
    fn add_beyond_capacity_fails() {
        let mut registry = OccupancyRegistry::with_capacity(1);
        let route = Route::new(South, North).unwrap();
        registry.add(route).unwrap();

        assert_eq!(
            registry.add(route),
            Err(IntersectionError::CapacityExceeded { capacity: 1 })
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn remove_route_takes_one_match_only() {
        let mut registry = OccupancyRegistry::with_capacity(4);
        let shared = Route::new(East, West).unwrap();
        let other = Route::new(East, North).unwrap();
        registry.add(shared).unwrap();
        registry.add(other).unwrap();
        registry.add(shared).unwrap();

        assert_eq!(registry.remove_route(shared).unwrap().route, shared);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.routes().filter(|r| *r == shared).count(), 1);
    }

    #[test]
    fn unmatched_removals_are_reported() {
        let mut registry = OccupancyRegistry::with_capacity(2);
        let route = Route::new(West, East).unwrap();

        assert_eq!(
            registry.remove_route(route),
            Err(IntersectionError::UnmatchedExit { route })
        );
        assert_eq!(
            registry.remove(OccupantId(42)),
            Err(IntersectionError::UnknownOccupant(OccupantId(42)))
        );
    }

    #[test]
    fn identities_are_never_reused() {
        let mut registry = OccupancyRegistry::with_capacity(1);
        let route = Route::new(North, South).unwrap();
        let first = registry.add(route).unwrap();
        registry.remove(first).unwrap();
        let second = registry.add(route).unwrap();
        assert!(second > first);
    }
}
