//! Implements the Minkley model and the drivers of the local stress integration

mod create_minkley;
mod damage_law;
mod invariants;
mod local_residual;
mod material_points;
mod material_properties;
mod path_plotter;
mod solid_minkley;
mod solid_model;
mod state_variables;
mod strain_path;
mod surface;
pub use crate::material::create_minkley::*;
pub use crate::material::damage_law::*;
pub use crate::material::invariants::*;
pub use crate::material::local_residual::*;
pub use crate::material::material_points::*;
pub use crate::material::material_properties::*;
pub use crate::material::path_plotter::*;
pub use crate::material::solid_minkley::*;
pub use crate::material::solid_model::*;
pub use crate::material::state_variables::*;
pub use crate::material::strain_path::*;
pub use crate::material::surface::*;
