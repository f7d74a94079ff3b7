//! Minkley elasto-viscoplastic-damage model for rock salt
//!
//! This crate implements the local stress integration of the Minkley model: given
//! the state of a material point at time t, the new total strain at t + Δt, and the
//! material parameters, it solves the coupled nonlinear system (elastic/viscoplastic
//! split, overstress consistency, hardening) with a local Newton-Raphson method,
//! updates the isotropic damage, and returns the new stress, the new state, and the
//! consistent tangent modulus required by the global (finite element) solver.

/// Defines a type alias for the error type as a static string
pub type StrError = &'static str;

/// Defines a function of (x,t) where x is space and t is time
pub type FnSpaceTime = fn(&[f64], f64) -> f64;

pub mod base;
pub mod material;
pub mod prelude;
