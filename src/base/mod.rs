//! Implements the base structures for the local stress integration

mod config;
mod constants;
mod dimension;
mod newton_raphson;
mod parameters;
mod sample_params;
pub use crate::base::config::*;
pub use crate::base::constants::*;
pub use crate::base::dimension::*;
pub use crate::base::newton_raphson::*;
pub use crate::base::parameters::*;
pub use crate::base::sample_params::*;
