use super::{calc_damage, DamageProperties, LocalResidual, MaterialProperties, MaterialStateVariables};
use super::{MinkleyStateVariables, SolidModel, StressUpdate};
use crate::base::{Dimension, NewtonOutcome, NewtonRaphson, NewtonRaphsonParams, ParameterTable};
use crate::StrError;
use russell_lab::{mat_inverse, mat_mat_mul, Matrix, Vector};
use russell_tensor::{LinElasticity, Tensor2, Tensor4};
use std::marker::PhantomData;
use std::sync::Arc;

/// Implements the Minkley elasto-viscoplastic-damage model for rock salt
///
/// The total strain is split into elastic and viscoplastic parts; the effective stress
/// follows from isotropic elasticity and the damaged stress is σ = (1 − D) σ_eff.
/// The viscoplastic flow is driven by the overstress F = S(σ) − κ (1 + h ε_p_eff)
/// according to η λ = ⟨F⟩ with direction dQ/dσ. See [LocalResidual] for the local system.
///
/// The damage is updated after the local system converges, from the increments of the
/// volumetric and equivalent plastic strains.
pub struct SolidMinkley<D: Dimension> {
    /// Parameter table (shared with the caller)
    table: Arc<ParameterTable>,

    /// Identifiers of the material parameters
    material_properties: MaterialProperties,

    /// Identifiers of the damage parameters (no damage if None)
    damage_properties: Option<DamageProperties>,

    /// Parameters of the local Newton-Raphson solver
    nonlinear_solver_params: NewtonRaphsonParams,

    /// Space dimension
    dimension: PhantomData<D>,
}

impl<D: Dimension> SolidMinkley<D> {
    /// Allocates a new instance
    pub fn new(
        table: Arc<ParameterTable>,
        material_properties: MaterialProperties,
        damage_properties: Option<DamageProperties>,
        nonlinear_solver_params: NewtonRaphsonParams,
    ) -> Self {
        SolidMinkley {
            table,
            material_properties,
            damage_properties,
            nonlinear_solver_params,
            dimension: PhantomData,
        }
    }

    /// Returns the parameters of the local Newton-Raphson solver
    pub fn nonlinear_solver_params(&self) -> &NewtonRaphsonParams {
        &self.nonlinear_solver_params
    }

    /// Indicates whether the damage evolution is enabled
    pub fn with_damage(&self) -> bool {
        self.damage_properties.is_some()
    }

    /// Integrates the stress over one time step
    ///
    /// See [SolidModel::integrate_stress]; this version requires the concrete state type.
    ///
    /// The returned tangent is `(1 − D) [J⁻¹]σσ Dₑ`. It is exact without damage; with
    /// damage it is only approximate because the term `−σ_eff ⊗ dD/dε` is not included.
    pub fn integrate(
        &self,
        t: f64,
        x: &[f64],
        dt: f64,
        eps: &Tensor2,
        state: &MinkleyStateVariables,
    ) -> Result<Option<StressUpdate>, StrError> {
        let n = D::KELVIN_SIZE;
        if eps.vector().dim() != n || state.eps_p_prev.dev.vector().dim() != n {
            return Err("the dimension of the tensors is incompatible with the model");
        }
        if !(dt > 0.0) {
            return Err("dt must be > 0.0");
        }
        let values = self.material_properties.resolve(&self.table, x, t);
        if !(values.viscosity > 0.0) {
            return Err("the viscosity must be > 0.0");
        }

        // fresh copy of the state
        let mut new_state = state.clone();
        new_state.set_initial_conditions();

        // solve the local system
        let mut eps_dev = Tensor2::new(D::MANDEL);
        eps.deviator(&mut eps_dev);
        let mut local = LocalResidual::new(values, dt, eps_dev, eps.trace(), new_state.eps_p_prev.clone());
        let mut xx = Vector::new(D::LOCAL_SIZE);
        local.initial_guess(&mut xx);
        let mut solver = NewtonRaphson::new(self.nonlinear_solver_params, D::LOCAL_SIZE);
        let iterations = match solver.solve(&mut xx, |rr, jj, x| local.calc(rr, jj, x))? {
            NewtonOutcome::Converged { iterations, .. } => iterations,
            NewtonOutcome::Diverged { .. } => return Ok(None),
        };

        // plastic strain
        let xs = xx.as_data();
        new_state.eps_p.dev.set_mandel_vector(1.0, &xs[n..2 * n]);
        new_state.eps_p.vol = xs[2 * n];
        new_state.eps_p.eff = xs[2 * n + 1];

        // damage
        if let Some(dp) = &self.damage_properties {
            let p = dp.resolve(&self.table, x, t);
            let delta_vol = new_state.eps_p.vol - new_state.eps_p_prev.vol;
            let delta_eff = new_state.eps_p.eff - new_state.eps_p_prev.eff;
            new_state.damage = calc_damage(delta_vol, delta_eff, &new_state.damage_prev, &p);
        }
        let reduction = 1.0 - new_state.damage.value();

        // stress
        let mut sigma = Tensor2::new(D::MANDEL);
        sigma.set_mandel_vector(reduction * values.gg, &xs[..n]);

        // consistent tangent: dσ/dε = (1 − D) [J⁻¹]σσ Dₑ
        let size = D::LOCAL_SIZE;
        let mut jj_inv = Matrix::new(size, size);
        if mat_inverse(&mut jj_inv, solver.jacobian()).is_err() {
            return Ok(None);
        }
        let mut jj_inv_ss = Matrix::new(n, n);
        for i in 0..n {
            for j in 0..n {
                jj_inv_ss.set(i, j, jj_inv.get(i, j));
            }
        }
        let mut elastic = LinElasticity::new(1.0, 0.0, D::TWO_DIM, false);
        elastic.set_bulk_shear(values.kk, values.gg);
        let mut tangent = Tensor4::new(D::MANDEL);
        mat_mat_mul(
            tangent.matrix_mut(),
            reduction,
            &jj_inv_ss,
            elastic.get_modulus().matrix(),
            0.0,
        )?;

        Ok(Some(StressUpdate {
            sigma,
            state: Box::new(new_state),
            tangent,
            iterations,
        }))
    }
}

impl<D: Dimension> SolidModel<D> for SolidMinkley<D> {
    fn create_material_state_variables(&self) -> Box<dyn MaterialStateVariables> {
        Box::new(MinkleyStateVariables::new(D::MANDEL))
    }

    fn integrate_stress(
        &self,
        t: f64,
        x: &[f64],
        dt: f64,
        eps_prev: &Tensor2,
        eps: &Tensor2,
        sigma_prev: &Tensor2,
        state: &dyn MaterialStateVariables,
    ) -> Result<Option<StressUpdate>, StrError> {
        let state = state
            .as_any()
            .downcast_ref::<MinkleyStateVariables>()
            .ok_or("the state variables are not of the Minkley kind")?;
        if eps_prev.vector().dim() != D::KELVIN_SIZE || sigma_prev.vector().dim() != D::KELVIN_SIZE {
            return Err("the dimension of the tensors is incompatible with the model");
        }
        self.integrate(t, x, dt, eps, state)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::SolidMinkley;
    use crate::base::{Dim2, Dim3, Dimension, SampleParams};
    use crate::material::{create_minkley, MaterialStateVariables, MinkleyStateVariables, SolidModel, StressUpdate};
    use crate::StrError;
    use russell_lab::approx_eq;
    use russell_tensor::{Mandel, Tensor2};
    use std::any::Any;
    use std::sync::Arc;

    fn sample_model<D: Dimension>(with_damage: bool) -> SolidMinkley<D> {
        let table = Arc::new(SampleParams::table_rock_salt());
        create_minkley::<D>(&table, &SampleParams::config_minkley(with_damage)).unwrap()
    }

    fn strain(mandel: Mandel, values: &[f64]) -> Tensor2 {
        let mut eps = Tensor2::new(mandel);
        eps.set_mandel_vector(1.0, values);
        eps
    }

    fn minkley_state(update: &StressUpdate) -> &MinkleyStateVariables {
        update.state_as::<MinkleyStateVariables>().unwrap()
    }

    #[test]
    fn elastic_step_works() {
        let (gg, kk) = (10_000.0, 16_000.0);
        for mandel in [Mandel::Symmetric2D, Mandel::Symmetric] {
            let n = mandel.dim();
            let eps_values = [-2e-5, 1e-5, 5e-6, 4e-6, -3e-6, 2e-6];
            let eps = strain(mandel, &eps_values[..n]);
            let zero = Tensor2::new(mandel);
            let state = MinkleyStateVariables::new(mandel);
            let res = if n == 4 {
                let model = sample_model::<Dim2>(true);
                model.integrate_stress(1.0, &[0.0, 0.0], 0.1, &zero, &eps, &zero, &state)
            } else {
                let model = sample_model::<Dim3>(true);
                model.integrate_stress(1.0, &[0.0, 0.0, 0.0], 0.1, &zero, &eps, &zero, &state)
            };
            let update = res.unwrap().unwrap();

            // σ = 2G dev(ε) + K tr(ε) I
            let tr = eps_values[0] + eps_values[1] + eps_values[2];
            for i in 0..n {
                let iso = if i < 3 { kk * tr + 2.0 * gg * (-tr / 3.0) } else { 0.0 };
                approx_eq(update.sigma.vector()[i], 2.0 * gg * eps_values[i] + iso, 1e-9);
            }

            // tangent = elastic modulus
            let tangent = update.tangent.matrix();
            approx_eq(tangent.get(0, 0), kk + 4.0 * gg / 3.0, 1e-8);
            approx_eq(tangent.get(0, 1), kk - 2.0 * gg / 3.0, 1e-8);
            approx_eq(tangent.get(3, 3), 2.0 * gg, 1e-8);
            approx_eq(tangent.get(3, 0), 0.0, 1e-8);

            // no plastic strain and no damage
            let new_state = minkley_state(&update);
            assert_eq!(new_state.eps_p.eff, 0.0);
            assert_eq!(new_state.eps_p.vol, 0.0);
            assert_eq!(new_state.damage.value(), 0.0);
            assert_eq!(update.iterations, 0);
        }
    }

    #[test]
    fn viscoplastic_step_works() {
        let model = sample_model::<Dim3>(true);
        let mandel = Mandel::Symmetric;
        let zero = Tensor2::new(mandel);
        let eps = strain(mandel, &[-4e-3, 1e-3, 1e-3, 0.0, 0.0, 0.0]);
        let state = MinkleyStateVariables::new(mandel);
        let update = model
            .integrate_stress(1.0, &[0.0, 0.0, 0.0], 1.0, &zero, &eps, &zero, &state)
            .unwrap()
            .unwrap();
        let new_state = minkley_state(&update);
        assert!(new_state.eps_p.eff > 0.0);
        assert!(new_state.damage.value() > 0.0);
        assert!(new_state.damage.value() < 1.0);
        // the committed state of the caller is untouched
        assert_eq!(state.eps_p.eff, 0.0);
        assert_eq!(new_state.eps_p_prev.eff, 0.0);
        // deviatoric plastic strain remains traceless
        let dev = new_state.eps_p.dev.vector();
        approx_eq(dev[0] + dev[1] + dev[2], 0.0, 1e-14);
        // axial stress is smaller (in magnitude) than the elastic trial
        let trial = 16_000.0 * (-2e-3) + 2.0 * 10_000.0 * (-4e-3 + 2e-3 / 3.0);
        assert!(update.sigma.vector()[0] > trial);
        assert!(update.sigma.vector()[0] < 0.0);
    }

    #[test]
    fn without_damage_the_damage_stays_zero() {
        let model = sample_model::<Dim2>(false);
        assert!(!model.with_damage());
        let mandel = Mandel::Symmetric2D;
        let eps = strain(mandel, &[-4e-3, 1e-3, 1e-3, 0.0]);
        let state = MinkleyStateVariables::new(mandel);
        let update = model.integrate(1.0, &[0.0, 0.0], 1.0, &eps, &state).unwrap().unwrap();
        let new_state = minkley_state(&update);
        assert!(new_state.eps_p.eff > 0.0);
        assert_eq!(new_state.damage.value(), 0.0);
        assert_eq!(new_state.damage.kappa_d(), 0.0);
    }

    #[test]
    fn small_time_step_approaches_elastic_response() {
        let model = sample_model::<Dim2>(true);
        let mandel = Mandel::Symmetric2D;
        let eps = strain(mandel, &[-4e-3, 1e-3, 1e-3, 0.0]);
        let state = MinkleyStateVariables::new(mandel);
        let trial = 16_000.0 * (-2e-3) + 2.0 * 10_000.0 * (-4e-3 + 2e-3 / 3.0);
        let update_big = model.integrate(1.0, &[0.0, 0.0], 1.0, &eps, &state).unwrap().unwrap();
        let update_small = model.integrate(1.0, &[0.0, 0.0], 1e-8, &eps, &state).unwrap().unwrap();
        let eff_big = minkley_state(&update_big).eps_p.eff;
        let eff_small = minkley_state(&update_small).eps_p.eff;
        assert!(eff_small < 1e-6 * eff_big);
        approx_eq(update_small.sigma.vector()[0], trial, 1e-3);
    }

    #[test]
    fn damage_is_monotonic_along_a_sequence_of_steps() {
        let model = sample_model::<Dim2>(true);
        let mandel = Mandel::Symmetric2D;
        let mut state = MinkleyStateVariables::new(mandel);
        let mut previous = 0.0;
        for k in 1..=5 {
            let a = k as f64 * 1e-3;
            let eps = strain(mandel, &[-a, 0.25 * a, 0.25 * a, 0.0]);
            let update = model.integrate(k as f64, &[0.0, 0.0], 1.0, &eps, &state).unwrap().unwrap();
            state.assign_from(&*update.state).unwrap();
            state.push_back_state();
            assert!(state.damage_prev.value() >= previous);
            previous = state.damage_prev.value();
        }
        assert!(previous > 0.0);
    }

    #[test]
    fn tangent_matches_numerical_derivative() {
        let model = sample_model::<Dim2>(false);
        let mandel = Mandel::Symmetric2D;
        let state = MinkleyStateVariables::new(mandel);
        let values = [-4e-3, 1e-3, 5e-4, 2e-4];
        let eps = strain(mandel, &values);
        let update = model.integrate(1.0, &[0.0, 0.0], 1.0, &eps, &state).unwrap().unwrap();
        let h = 1e-6;
        for j in 0..4 {
            let mut plus = values;
            let mut minus = values;
            plus[j] += h;
            minus[j] -= h;
            let up = model.integrate(1.0, &[0.0, 0.0], 1.0, &strain(mandel, &plus), &state).unwrap().unwrap();
            let um = model.integrate(1.0, &[0.0, 0.0], 1.0, &strain(mandel, &minus), &state).unwrap().unwrap();
            for i in 0..4 {
                let num = (up.sigma.vector()[i] - um.sigma.vector()[i]) / (2.0 * h);
                approx_eq(update.tangent.matrix().get(i, j), num, 0.5);
            }
        }
    }

    #[test]
    fn damaged_tangent_is_the_scaled_effective_tangent() {
        let mandel = Mandel::Symmetric2D;
        let state = MinkleyStateVariables::new(mandel);
        let eps = strain(mandel, &[-4e-3, 1e-3, 5e-4, 2e-4]);
        let intact = sample_model::<Dim2>(false)
            .integrate(1.0, &[0.0, 0.0], 1.0, &eps, &state)
            .unwrap()
            .unwrap();
        let damaged = sample_model::<Dim2>(true)
            .integrate(1.0, &[0.0, 0.0], 1.0, &eps, &state)
            .unwrap()
            .unwrap();
        let d = minkley_state(&damaged).damage.value();
        assert!(d > 0.0);
        // the damage is evaluated after the local solve; thus, σ and the tangent are scaled
        // by (1 − D) and dD/dε is not accounted for in the tangent
        for i in 0..4 {
            approx_eq(damaged.sigma.vector()[i], (1.0 - d) * intact.sigma.vector()[i], 1e-10);
            for j in 0..4 {
                let correct = (1.0 - d) * intact.tangent.matrix().get(i, j);
                approx_eq(damaged.tangent.matrix().get(i, j), correct, 1e-8);
            }
        }
    }

    #[test]
    fn zero_iterations_always_fail() {
        let table = Arc::new(SampleParams::table_rock_salt());
        let mut config = SampleParams::config_minkley(false);
        config.nonlinear_solver.maximum_iterations = 0;
        let model = create_minkley::<Dim2>(&table, &config).unwrap();
        assert_eq!(model.nonlinear_solver_params().maximum_iterations, 0);
        let mandel = Mandel::Symmetric2D;
        let zero = Tensor2::new(mandel);
        let state = MinkleyStateVariables::new(mandel);
        let res = model.integrate_stress(1.0, &[0.0, 0.0], 1.0, &zero, &zero, &zero, &state);
        assert!(res.unwrap().is_none());
    }

    #[derive(Debug)]
    struct Other;

    impl MaterialStateVariables for Other {
        fn set_initial_conditions(&mut self) {}
        fn push_back_state(&mut self) {}
        fn assign_from(&mut self, _: &dyn MaterialStateVariables) -> Result<(), StrError> {
            Ok(())
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn integrate_stress_captures_errors() {
        let model = sample_model::<Dim2>(true);
        let mandel = Mandel::Symmetric2D;
        let zero = Tensor2::new(mandel);
        let zero_3d = Tensor2::new(Mandel::Symmetric);
        let state = MinkleyStateVariables::new(mandel);
        assert_eq!(
            model
                .integrate_stress(1.0, &[0.0, 0.0], 1.0, &zero, &zero, &zero, &Other)
                .err(),
            Some("the state variables are not of the Minkley kind")
        );
        assert_eq!(
            model
                .integrate_stress(1.0, &[0.0, 0.0], 1.0, &zero, &zero_3d, &zero, &state)
                .err(),
            Some("the dimension of the tensors is incompatible with the model")
        );
        assert_eq!(
            model
                .integrate_stress(1.0, &[0.0, 0.0], 1.0, &zero_3d, &zero, &zero, &state)
                .err(),
            Some("the dimension of the tensors is incompatible with the model")
        );
        assert_eq!(
            model
                .integrate_stress(1.0, &[0.0, 0.0], 0.0, &zero, &zero, &zero, &state)
                .err(),
            Some("dt must be > 0.0")
        );
    }
}
