//! Makes available common structures needed to integrate stresses
//!
//! You may write `use minkley::prelude::*` in your code and obtain
//! access to commonly used functionality.

pub use crate::base::{
    ConfigDamage, ConfigMinkley, ConfigNonlinearSolver, ConfigSolid, ConfigStation, ConfigStrainPath, Dim2, Dim3,
    Dimension, NewtonRaphsonParams, ParamId, Parameter, ParameterTable, SampleParams,
};
pub use crate::material::{
    create_minkley, new_solid_model, plot_strain_path, MaterialPoints, MaterialStateVariables, MinkleyStateVariables,
    PathRecord, SolidMinkley, SolidModel, StrainPath, StressUpdate,
};
pub use crate::StrError;
