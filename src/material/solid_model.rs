use super::{create_minkley, MaterialStateVariables};
use crate::base::{ConfigSolid, Dimension, ParameterTable};
use crate::StrError;
use russell_tensor::{Tensor2, Tensor4};
use std::sync::Arc;

/// Holds the results of a successful stress integration
#[derive(Debug)]
pub struct StressUpdate {
    /// New (damaged) stress σ at t + Δt
    pub sigma: Tensor2,

    /// New state variables (a fresh copy; the committed state of the caller is untouched)
    pub state: Box<dyn MaterialStateVariables>,

    /// Consistent tangent modulus dσ/dε
    pub tangent: Tensor4,

    /// Number of local Newton-Raphson iterations
    pub iterations: usize,
}

impl StressUpdate {
    /// Returns the new state variables as the concrete type T (if T matches)
    pub fn state_as<T: 'static>(&self) -> Option<&T> {
        self.state.as_any().downcast_ref::<T>()
    }
}

/// Defines the local stress integration of a solid constitutive model
pub trait SolidModel<D: Dimension>: Send + Sync {
    /// Allocates new (virgin) state variables of the kind required by this model
    fn create_material_state_variables(&self) -> Box<dyn MaterialStateVariables>;

    /// Integrates the stress over one time step
    ///
    /// # Input
    ///
    /// * `t` -- the time at the end of the step
    /// * `x` -- the position of the material point (to evaluate the parameters)
    /// * `dt` -- the time increment (must be > 0)
    /// * `eps_prev` -- the total strain at the beginning of the step
    /// * `eps` -- the total strain at the end of the step
    /// * `sigma_prev` -- the stress at the beginning of the step
    /// * `state` -- the committed state variables
    ///
    /// # Output
    ///
    /// Returns `Ok(None)` if the local solver does not converge. An error is returned if the
    /// input is inconsistent (e.g., wrong kind of state variables or dimension mismatch).
    fn integrate_stress(
        &self,
        t: f64,
        x: &[f64],
        dt: f64,
        eps_prev: &Tensor2,
        eps: &Tensor2,
        sigma_prev: &Tensor2,
        state: &dyn MaterialStateVariables,
    ) -> Result<Option<StressUpdate>, StrError>;
}

/// Allocates a new solid model according to the configuration
pub fn new_solid_model<D: Dimension>(
    table: &Arc<ParameterTable>,
    config: &ConfigSolid,
) -> Result<Box<dyn SolidModel<D>>, StrError> {
    let model: Box<dyn SolidModel<D>> = match config {
        ConfigSolid::Minkley(c) => Box::new(create_minkley::<D>(table, c)?),
    };
    Ok(model)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
