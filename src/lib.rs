//! Cell-population balancing and pattern editing for a cellular artificial
//! life simulation.

pub mod balancer;
pub mod config;
pub mod constants;
pub mod editor;
pub mod entities;
pub mod error;
pub mod selection;
pub mod simulation;
pub mod statistics;
pub mod store;
pub mod utils;
