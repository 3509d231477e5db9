//! Conway's Game of Life (B3/S23) on a fixed-size toroidal grid, advanced by
//! a small fixed set of worker threads that each own a band of rows.

pub mod config;
pub mod error;
pub mod grid;
pub mod implementations;

pub use config::SimulationConfig;
pub use error::LifeError;
pub use grid::{BoardId, Grid, GridDims};
pub use implementations::unsafe_impl::barrier_unsafe::{barrier_parallel, game_of_life};
