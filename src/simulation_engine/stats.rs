// stats.rs
use crate::error::SimulationError;
use crate::intersection::direction::{Direction, Route};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// One vehicle's trip, as exported to CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VehicleRecord {
    pub vehicle_id: u64,
    pub worker: usize,
    pub origin: Direction,
    pub destination: Direction,
    pub right_turn: bool,
    pub wait_micros: u64,
    /// Vehicles inside, this one included, right after admission.
    pub occupancy_on_entry: usize,
}

impl VehicleRecord {
    pub fn new(
        vehicle_id: u64,
        worker: usize,
        route: Route,
        wait: Duration,
        occupancy_on_entry: usize,
    ) -> Self {
        Self {
            vehicle_id,
            worker,
            origin: route.origin(),
            destination: route.destination(),
            right_turn: route.is_right_turn(),
            wait_micros: wait.as_micros().try_into().unwrap_or(u64::MAX),
            occupancy_on_entry,
        }
    }
}

/// Wait times for vehicles arriving from one approach.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DirectionStats {
    pub vehicles: usize,
    pub total_wait: Duration,
    pub max_wait: Duration,
}

impl DirectionStats {
    fn record(&mut self, wait: Duration) {
        self.vehicles += 1;
        self.total_wait += wait;
        self.max_wait = self.max_wait.max(wait);
    }

    pub fn mean_wait(&self) -> Duration {
        if self.vehicles == 0 {
            return Duration::ZERO;
        }
        self.total_wait / self.vehicles as u32
    }
}

/// Outcome of a whole simulation run.
#[derive(Debug, Clone, Default)]
pub struct SimulationReport {
    pub records: Vec<VehicleRecord>,
    pub by_origin: HashMap<Direction, DirectionStats>,
    pub elapsed: Duration,
    pub peak_occupancy: usize,
    /// Conflicting pairs seen by the per-admission audit. Should stay empty.
    pub violations: Vec<(Route, Route)>,
}

impl SimulationReport {
    pub fn from_records(
        records: Vec<VehicleRecord>,
        violations: Vec<(Route, Route)>,
        elapsed: Duration,
    ) -> Self {
        let mut by_origin: HashMap<Direction, DirectionStats> = HashMap::new();
        for record in &records {
            by_origin
                .entry(record.origin)
                .or_default()
                .record(Duration::from_micros(record.wait_micros));
        }
        let peak_occupancy = records
            .iter()
            .map(|r| r.occupancy_on_entry)
            .max()
            .unwrap_or(0);

        Self {
            records,
            by_origin,
            elapsed,
            peak_occupancy,
            violations,
        }
    }

    pub fn total_vehicles(&self) -> usize {
        self.records.len()
    }

    /// Fails when the audit caught two conflicting vehicles inside together.
    pub fn ensure_safe(&self) -> Result<(), SimulationError> {
        match self.violations.first() {
            Some(&first) => Err(SimulationError::SafetyViolation {
                count: self.violations.len(),
                first,
            }),
            None => Ok(()),
        }
    }

    pub fn write_csv(&self, path: &Path) -> Result<(), SimulationError> {
        let mut writer = csv::Writer::from_path(path)?;
        for record in &self.records {
            writer.serialize(record)?;
        }
        writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} vehicles in {:.3}s, peak occupancy {}",
            self.total_vehicles(),
            self.elapsed.as_secs_f64(),
            self.peak_occupancy
        )?;
        for direction in Direction::ALL {
            let stats = self.by_origin.get(&direction).copied().unwrap_or_default();
            writeln!(
                f,
                "  from {:<5}: {:>5} vehicles, mean wait {:>9.3}ms, max wait {:>9.3}ms",
                direction.to_string(),
                stats.vehicles,
                stats.mean_wait().as_secs_f64() * 1000.0,
                stats.max_wait.as_secs_f64() * 1000.0
            )?;
        }
        write!(f, "  unsafe admissions: {}", self.violations.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Direction::*;

    fn record(
        id: u64,
        origin: Direction,
        destination: Direction,
        wait_ms: u64,
        occupancy: usize,
    ) -> VehicleRecord {
        VehicleRecord::new(
            id,
            0,
            Route::new(origin, destination).unwrap(),
            Duration::from_millis(wait_ms),
            occupancy,
        )
    }

    #[test]
    fn report_aggregates_per_origin() {
        let report = SimulationReport::from_records(
            vec![
                record(1, North, South, 2, 1),
                record(2, North, East, 6, 3),
                record(3, West, South, 0, 2),
            ],
            vec![],
            Duration::from_secs(1),
        );

        let north = report.by_origin[&North];
        assert_eq!(north.vehicles, 2);
        assert_eq!(north.max_wait, Duration::from_millis(6));
        assert_eq!(north.mean_wait(), Duration::from_millis(4));
        assert_eq!(report.by_origin[&West].vehicles, 1);
        assert!(!report.by_origin.contains_key(&East));
        assert_eq!(report.peak_occupancy, 3);
        assert_eq!(report.total_vehicles(), 3);
    }

    #[test]
    fn record_flags_right_turns() {
        assert!(record(1, West, South, 0, 1).right_turn);
        assert!(!record(2, West, East, 0, 1).right_turn);
    }

    #[test]
    fn summary_lists_every_approach() {
        let report =
            SimulationReport::from_records(vec![record(1, East, West, 1, 1)], vec![], Duration::ZERO);
        let text = report.to_string();
        for direction in Direction::ALL {
            assert!(text.contains(&format!("from {direction:<5}")), "{text}");
        }
        assert!(text.ends_with("unsafe admissions: 0"));
    }

    #[test]
    fn recorded_violation_fails_safety_check() {
        let pair = (
            Route::new(North, South).unwrap(),
            Route::new(East, West).unwrap(),
        );
        let report = SimulationReport::from_records(vec![], vec![pair], Duration::ZERO);
        assert!(matches!(
            report.ensure_safe(),
            Err(SimulationError::SafetyViolation { count: 1, first }) if first == pair
        ));
    }

    #[test]
    fn csv_has_header_and_one_row_per_vehicle() {
        let path =
            std::env::temp_dir().join(format!("intersection_sync_{}.csv", std::process::id()));
        let report = SimulationReport::from_records(
            vec![record(1, South, North, 3, 1), record(2, East, North, 0, 2)],
            vec![],
            Duration::ZERO,
        );
        report.write_csv(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(
            lines[0],
            "vehicle_id,worker,origin,destination,right_turn,wait_micros,occupancy_on_entry"
        );
        assert_eq!(lines[1], "1,0,south,north,false,3000,1");
        assert_eq!(lines[2], "2,0,east,north,true,0,2");
        assert_eq!(lines.len(), 3);
    }
}
