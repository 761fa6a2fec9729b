// intersection/mod.rs
pub mod admission;
pub mod controller;
pub mod direction;
pub mod registry;
