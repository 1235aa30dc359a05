//! Common, shared types.

pub mod ids;
pub mod layers;
pub mod rng;
pub mod state;
pub mod tunables;

#[cfg(test)]
pub mod test_utils;
