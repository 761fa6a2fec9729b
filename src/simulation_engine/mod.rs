// simulation_engine/mod.rs
pub mod config;
pub mod simulation;
pub mod stats;
pub mod vehicles;
