use super::{MaterialStateVariables, SolidModel, StressUpdate};
use crate::base::Dimension;
use crate::StrError;
use rayon::prelude::*;
use russell_tensor::{Tensor2, Tensor4};

/// Holds the data of a material (integration) point
pub struct MaterialPoint {
    /// Position (to evaluate the parameters)
    pub x: Vec<f64>,

    /// Committed total strain
    pub strain: Tensor2,

    /// Committed stress
    pub stress: Tensor2,

    /// Committed tangent modulus
    pub tangent: Tensor4,

    /// Committed state variables
    pub state: Box<dyn MaterialStateVariables>,

    /// Trial total strain
    strain_trial: Tensor2,

    /// Trial (not yet committed) update
    trial: Option<StressUpdate>,
}

impl MaterialPoint {
    /// Integrates the stress from the committed state to the trial strain
    fn integrate<D: Dimension>(
        &mut self,
        model: &dyn SolidModel<D>,
        t: f64,
        dt: f64,
        strain: &Tensor2,
    ) -> Result<bool, StrError> {
        if strain.mandel() != self.strain_trial.mandel() {
            return Err("the dimension of the strain is incompatible with the material point");
        }
        self.strain_trial.set_tensor(1.0, strain);
        self.trial = model.integrate_stress(t, &self.x, dt, &self.strain, strain, &self.stress, &*self.state)?;
        Ok(self.trial.is_some())
    }

    /// Accepts the trial update
    fn commit(&mut self) -> Result<(), StrError> {
        let update = self.trial.take().ok_or("there is no converged update to commit")?;
        self.state.assign_from(&*update.state)?;
        self.state.push_back_state();
        self.strain.set_tensor(1.0, &self.strain_trial);
        self.stress = update.sigma;
        self.tangent = update.tangent;
        Ok(())
    }
}

/// Holds a collection of material points sharing the same model
///
/// The points are integrated in parallel.
pub struct MaterialPoints<D: Dimension> {
    /// The constitutive model
    model: Box<dyn SolidModel<D>>,

    /// All points
    pub all: Vec<MaterialPoint>,
}

impl<D: Dimension> MaterialPoints<D> {
    /// Allocates a new instance with one point per position
    pub fn new(model: Box<dyn SolidModel<D>>, positions: &[Vec<f64>]) -> Self {
        let all = positions
            .iter()
            .map(|x| MaterialPoint {
                x: x.clone(),
                strain: Tensor2::new(D::MANDEL),
                stress: Tensor2::new(D::MANDEL),
                tangent: Tensor4::new(D::MANDEL),
                state: model.create_material_state_variables(),
                strain_trial: Tensor2::new(D::MANDEL),
                trial: None,
            })
            .collect();
        MaterialPoints { model, all }
    }

    /// Integrates the stresses at all points (in parallel)
    ///
    /// Returns false if the local solver failed at any point; then, the step must be
    /// repeated (e.g., with a smaller dt) and nothing should be committed.
    pub fn integrate_all(&mut self, t: f64, dt: f64, strains: &[Tensor2]) -> Result<bool, StrError> {
        if strains.len() != self.all.len() {
            return Err("the number of strains must equal the number of material points");
        }
        let model = &*self.model;
        let converged: Result<Vec<bool>, StrError> = self
            .all
            .par_iter_mut()
            .zip(strains.par_iter())
            .map(|(p, strain)| p.integrate(model, t, dt, strain))
            .collect();
        Ok(converged?.iter().all(|c| *c))
    }

    /// Commits the trial updates at all points
    ///
    /// Nothing is committed if any point lacks a converged update.
    pub fn commit_all(&mut self) -> Result<(), StrError> {
        if self.all.iter().any(|p| p.trial.is_none()) {
            return Err("there is no converged update to commit");
        }
        self.all.par_iter_mut().map(|p| p.commit()).collect()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
