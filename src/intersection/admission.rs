// admission.rs
//
// Collision rules for vehicles sharing the intersection. Two routes may be
// inside at the same time when any one of these holds:
//   - both vehicles arrived from the same approach,
//   - they travel the same road in opposite directions,
//   - at least one of them turns right and they leave by different approaches.

use crate::intersection::direction::Route;

/// Pairwise safety relation. Symmetric.
pub fn compatible(a: Route, b: Route) -> bool {
    let same_origin = a.origin() == b.origin();
    let opposite_pair = a.origin() == b.destination() && a.destination() == b.origin();
    let right_turn_clear =
        (a.is_right_turn() || b.is_right_turn()) && a.destination() != b.destination();

    same_origin || opposite_pair || right_turn_clear
}

/// Whether `candidate` can enter alongside every current occupant.
/// An empty intersection always admits.
pub fn can_enter<I>(candidate: Route, occupants: I) -> bool
where
    I: IntoIterator<Item = Route>,
{
    occupants
        .into_iter()
        .all(|occupant| compatible(candidate, occupant))
}

/// Returns the first pair of routes in `routes` that must never share the
/// intersection, if any.
pub fn find_conflict(routes: &[Route]) -> Option<(Route, Route)> {
    routes.iter().enumerate().find_map(|(i, &a)| {
        routes[i + 1..]
            .iter()
            .find(|&&b| !compatible(a, b))
            .map(|&b| (a, b))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intersection::direction::Direction::{self, *};

    fn route(origin: Direction, destination: Direction) -> Route {
        Route::new(origin, destination).unwrap()
    }

    fn all_routes() -> Vec<Route> {
        Direction::ALL
            .into_iter()
            .flat_map(|o| o.others().map(move |d| route(o, d)))
            .collect()
    }

    #[test]
    fn same_origin_is_compatible() {
        assert!(compatible(route(North, East), route(North, West)));
        assert!(compatible(route(North, South), route(North, East)));
    }

    #[test]
    fn opposite_straight_through_is_compatible() {
        assert!(compatible(route(North, South), route(South, North)));
        assert!(compatible(route(East, West), route(West, East)));
    }

    #[test]
    fn right_turn_with_different_destination_is_compatible() {
        // west->south turns right; north->east leaves elsewhere.
        assert!(compatible(route(West, South), route(North, East)));
    }

    #[test]
    fn right_turn_sharing_destination_conflicts() {
        assert!(!compatible(route(West, South), route(North, South)));
    }

    #[test]
    fn crossing_straight_routes_conflict() {
        assert!(!compatible(route(North, South), route(East, West)));
        assert!(!compatible(route(North, South), route(West, East)));
    }

    #[test]
    fn any_single_condition_is_enough() {
        // Same origin alone: neither opposite nor right-turn clause applies.
        let a = route(South, North);
        let b = route(South, West);
        assert!(!b.is_right_turn() && !a.is_right_turn());
        assert!(compatible(a, b));
    }

    #[test]
    fn relation_is_symmetric() {
        let routes = all_routes();
        for &a in &routes {
            for &b in &routes {
                assert_eq!(compatible(a, b), compatible(b, a), "{a} vs {b}");
            }
        }
    }

    #[test]
    fn empty_intersection_admits_everything() {
        for r in all_routes() {
            assert!(can_enter(r, std::iter::empty()));
        }
    }

    #[test]
    fn can_enter_requires_every_occupant_to_be_compatible() {
        let occupants = [route(West, South), route(North, South)];
        // north->west turns right clear of west->south and shares an origin
        // with north->south; east->south collides with both.
        assert!(can_enter(route(North, West), occupants));
        assert!(!can_enter(route(East, South), occupants));
    }

    #[test]
    fn find_conflict_reports_offending_pair() {
        let routes = [route(North, East), route(North, West), route(East, West)];
        let (a, b) = find_conflict(&routes).expect("conflict expected");
        assert!(!compatible(a, b));
        assert_eq!(find_conflict(&routes[..2]), None);
        assert_eq!(find_conflict(&[]), None);
    }
}
