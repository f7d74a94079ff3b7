use super::{MaterialValues, PlasticStrain, StressInvariants, Surface};
use crate::base::TOL_SQRT_JJ2;
use crate::StrError;
use russell_lab::{Matrix, Vector};
use russell_tensor::{t2_add, t2_ddot_t4, t4_ddot_t4, Mandel, Tensor2, Tensor4, SQRT_2_BY_3};

/// Assembles the local residual vector and Jacobian matrix of the Minkley model
///
/// The vector of unknowns is (n is the size of the Mandel vector):
///
/// ```text
///       ⎧ σ_eff / G ⎫  n
///       │ ε_p_dev   │  n
/// x  =  ⎨ ε_p_vol   ⎬  1
///       │ ε_p_eff   │  1
///       ⎩ λ         ⎭  1
/// ```
///
/// and the residuals are:
///
/// ```text
/// r_σ   = σ/G − 2 (ε_dev − ε_p_dev) − K/G (ε_vol − ε_p_vol) I
/// r_dev = ε_p_dev − ε_p_dev_prev − Δt λ N_dev
/// r_vol = ε_p_vol − ε_p_vol_prev − Δt λ N_vol
/// r_eff = ε_p_eff − ε_p_eff_prev − Δt λ √(2/3) ‖N_dev‖
/// r_λ   = (⟨F⟩ − η λ) / G
/// ```
///
/// where N = dQ/dσ is the flow direction (Q is the viscoplastic potential) and
/// F = S(σ) − κ (1 + h ε_p_eff) is the overstress.
pub struct LocalResidual {
    /// Size of the Mandel vector
    n: usize,

    /// Material parameters
    values: MaterialValues,

    /// Time increment
    dt: f64,

    /// Deviatoric part of the (new) total strain
    eps_dev: Tensor2,

    /// Volumetric part of the (new) total strain
    eps_vol: f64,

    /// Committed plastic strain
    eps_p_prev: PlasticStrain,

    /// Effective stress σ = G x_σ
    sigma: Tensor2,

    /// Deviatoric plastic strain (from x)
    eps_p_dev: Tensor2,

    /// Stress invariants
    inv: StressInvariants,

    /// Overstress (yield) surface
    yield_surface: Surface,

    /// Viscoplastic potential
    potential: Surface,

    /// Second-order identity
    ii: Tensor2,

    /// Symmetric-deviatoric projector
    pp_symdev: Tensor4,

    /// Deviatoric flow direction N_dev = dev(dQ/dσ)
    n_dev: Tensor2,

    /// Derivative dN_dev/dσ = Psd : d²Q/(dσ⊗dσ)
    dn_dev: Tensor4,

    /// Derivative dN_vol/dσ = I : d²Q/(dσ⊗dσ)
    dn_vol: Tensor2,

    /// Derivative d‖N_dev‖/dσ
    d_norm_n_dev: Tensor2,

    /// Auxiliary tensor for the residuals of the tensor-valued unknowns
    aux: Tensor2,

    /// Overstress F at the last evaluation
    overstress: f64,
}

impl LocalResidual {
    /// Allocates a new instance
    ///
    /// * `values` -- the resolved material parameters
    /// * `dt` -- the time increment
    /// * `eps_dev` -- the deviatoric part of the new total strain
    /// * `eps_vol` -- the volumetric part of the new total strain
    /// * `eps_p_prev` -- the committed plastic strain
    pub fn new(values: MaterialValues, dt: f64, eps_dev: Tensor2, eps_vol: f64, eps_p_prev: PlasticStrain) -> Self {
        let mandel = eps_dev.mandel();
        let mut pp_symdev = Tensor4::new(mandel);
        pp_symdev.set_pp_symdev();
        LocalResidual {
            n: mandel.dim(),
            values,
            dt,
            eps_dev,
            eps_vol,
            eps_p_prev,
            sigma: Tensor2::new(mandel),
            eps_p_dev: Tensor2::new(mandel),
            inv: StressInvariants::new(mandel),
            yield_surface: Surface::new(mandel),
            potential: Surface::new(mandel),
            ii: Tensor2::identity(mandel),
            pp_symdev,
            n_dev: Tensor2::new(mandel),
            dn_dev: Tensor4::new(mandel),
            dn_vol: Tensor2::new(mandel),
            d_norm_n_dev: Tensor2::new(mandel),
            aux: Tensor2::new(mandel),
            overstress: 0.0,
        }
    }

    /// Returns the size of the local system
    pub fn size(&self) -> usize {
        2 * self.n + 3
    }

    /// Returns the Mandel representation of the tensors
    pub fn mandel(&self) -> Mandel {
        self.sigma.mandel()
    }

    /// Returns the overstress F at the last evaluation
    pub fn overstress(&self) -> f64 {
        self.overstress
    }

    /// Sets the elastic trial state as initial guess (no plastic increment, λ = 0)
    pub fn initial_guess(&mut self, x: &mut Vector) {
        let n = self.n;
        let (gg, kk) = (self.values.gg, self.values.kk);
        let prev = &self.eps_p_prev;
        t2_add(&mut self.aux, 2.0, &self.eps_dev, -2.0, &prev.dev);
        self.aux.update(kk / gg * (self.eps_vol - prev.vol), &self.ii);
        let data = x.as_mut_data();
        data[..n].copy_from_slice(self.aux.vector().as_data());
        data[n..2 * n].copy_from_slice(prev.dev.vector().as_data());
        data[2 * n] = prev.vol;
        data[2 * n + 1] = prev.eff;
        data[2 * n + 2] = 0.0;
    }

    /// Calculates the residual vector and the Jacobian matrix at x
    pub fn calc(&mut self, rr: &mut Vector, jj: &mut Matrix, x: &Vector) -> Result<(), StrError> {
        let n = self.n;
        if x.dim() != self.size() || rr.dim() != self.size() {
            return Err("the dimension of the local system is incorrect");
        }
        let p = &self.values;
        let (gg, kk, dt) = (p.gg, p.kk, self.dt);
        let (i_vol, i_eff, i_lam) = (2 * n, 2 * n + 1, 2 * n + 2);
        let xs = x.as_data();
        let eps_p_vol = xs[i_vol];
        let eps_p_eff = xs[i_eff];
        let lambda = xs[i_lam];
        self.sigma.set_mandel_vector(gg, &xs[..n]);
        self.eps_p_dev.set_mandel_vector(1.0, &xs[n..2 * n]);

        // invariants and surfaces
        let tol = TOL_SQRT_JJ2 * gg;
        self.inv.calc(&self.sigma, tol);
        self.yield_surface.calc(&p.yield_surface, &self.inv, tol, false);
        self.potential.calc(&p.potential, &self.inv, tol, true);
        let size = p.kappa * (1.0 + p.hardening_coefficient * eps_p_eff);
        self.overstress = self.yield_surface.value - size;
        let active = self.overstress > 0.0;

        // flow directions
        self.potential.grad.deviator(&mut self.n_dev);
        let norm_n_dev = self.n_dev.norm();
        let n_vol = self.potential.grad.trace();
        t4_ddot_t4(&mut self.dn_dev, 1.0, &self.pp_symdev, &self.potential.hess);
        t2_ddot_t4(&mut self.dn_vol, 1.0, &self.ii, &self.potential.hess);
        if norm_n_dev > 0.0 {
            t2_ddot_t4(&mut self.d_norm_n_dev, 1.0 / norm_n_dev, &self.n_dev, &self.dn_dev);
        } else {
            self.d_norm_n_dev.clear();
        }

        // residual
        let prev = &self.eps_p_prev;
        let res = rr.as_mut_data();
        t2_add(&mut self.aux, 1.0 / gg, &self.sigma, -2.0, &self.eps_dev);
        self.aux.update(2.0, &self.eps_p_dev);
        self.aux.update(-kk / gg * (self.eps_vol - eps_p_vol), &self.ii);
        res[..n].copy_from_slice(self.aux.vector().as_data());
        t2_add(&mut self.aux, 1.0, &self.eps_p_dev, -1.0, &prev.dev);
        self.aux.update(-dt * lambda, &self.n_dev);
        res[n..2 * n].copy_from_slice(self.aux.vector().as_data());
        res[i_vol] = eps_p_vol - prev.vol - dt * lambda * n_vol;
        res[i_eff] = eps_p_eff - prev.eff - dt * lambda * SQRT_2_BY_3 * norm_n_dev;
        res[i_lam] = (f64::max(self.overstress, 0.0) - p.viscosity * lambda) / gg;

        // Jacobian
        jj.fill(0.0);
        let ii = self.ii.vector();
        let dn_dev = self.dn_dev.matrix();
        for i in 0..n {
            // ∂r_σ/∂x
            jj.set(i, i, 1.0);
            jj.set(i, n + i, 2.0);
            jj.set(i, i_vol, kk / gg * ii[i]);

            // ∂r_dev/∂x
            for j in 0..n {
                jj.set(n + i, j, -dt * lambda * gg * dn_dev.get(i, j));
            }
            jj.set(n + i, n + i, 1.0);
            jj.set(n + i, i_lam, -dt * self.n_dev.vector()[i]);

            // ∂r_vol/∂x_σ and ∂r_eff/∂x_σ
            jj.set(i_vol, i, -dt * lambda * gg * self.dn_vol.vector()[i]);
            jj.set(i_eff, i, -dt * lambda * SQRT_2_BY_3 * gg * self.d_norm_n_dev.vector()[i]);

            // ∂r_λ/∂x_σ
            if active {
                jj.set(i_lam, i, self.yield_surface.grad.vector()[i]);
            }
        }
        jj.set(i_vol, i_vol, 1.0);
        jj.set(i_vol, i_lam, -dt * n_vol);
        jj.set(i_eff, i_eff, 1.0);
        jj.set(i_eff, i_lam, -dt * SQRT_2_BY_3 * norm_n_dev);
        if active {
            jj.set(i_lam, i_eff, -p.kappa * p.hardening_coefficient / gg);
        }
        jj.set(i_lam, i_lam, -p.viscosity / gg);
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::LocalResidual;
    use crate::base::SampleParams;
    use crate::material::{MaterialProperties, PlasticStrain};
    use russell_lab::{approx_eq, Matrix, Vector};
    use russell_tensor::{Mandel, Tensor2};

    fn sample_residual(mandel: Mandel) -> LocalResidual {
        let table = SampleParams::table_rock_salt();
        let config = SampleParams::config_minkley(false);
        let mp = MaterialProperties::new(&table, &config).unwrap();
        let values = mp.resolve(&table, &[0.0, 0.0, 0.0], 0.0);
        let mut eps = Tensor2::new(mandel);
        eps.vector_mut()[0] = -4e-3;
        eps.vector_mut()[1] = 1e-3;
        eps.vector_mut()[2] = 5e-4;
        eps.vector_mut()[3] = 3e-4;
        let mut eps_dev = Tensor2::new(mandel);
        eps.deviator(&mut eps_dev);
        let mut eps_p_prev = PlasticStrain::new(mandel);
        eps_p_prev.dev.vector_mut()[0] = -1e-4;
        eps_p_prev.dev.vector_mut()[1] = 5e-5;
        eps_p_prev.dev.vector_mut()[2] = 5e-5;
        eps_p_prev.vol = 2e-5;
        eps_p_prev.eff = 1e-4;
        LocalResidual::new(values, 0.1, eps_dev, eps.trace(), eps_p_prev)
    }

    #[test]
    fn initial_guess_gives_zero_stress_residual() {
        let mut local = sample_residual(Mandel::Symmetric2D);
        assert_eq!(local.mandel(), Mandel::Symmetric2D);
        let size = local.size();
        assert_eq!(size, 11);
        let mut x = Vector::new(size);
        local.initial_guess(&mut x);
        let mut rr = Vector::new(size);
        let mut jj = Matrix::new(size, size);
        local.calc(&mut rr, &mut jj, &x).unwrap();
        for i in 0..(size - 1) {
            approx_eq(rr[i], 0.0, 1e-15);
        }
        // the trial state is outside the overstress surface
        assert!(local.overstress() > 0.0);
        approx_eq(rr[size - 1], local.overstress() / 10_000.0, 1e-15);
    }

    #[test]
    fn calc_captures_errors() {
        let mut local = sample_residual(Mandel::Symmetric2D);
        let mut rr = Vector::new(11);
        let mut jj = Matrix::new(11, 11);
        let x = Vector::new(10);
        assert_eq!(
            local.calc(&mut rr, &mut jj, &x).err(),
            Some("the dimension of the local system is incorrect")
        );
    }

    #[test]
    fn jacobian_matches_numerical_derivatives() {
        for mandel in [Mandel::Symmetric2D, Mandel::Symmetric] {
            let mut local = sample_residual(mandel);
            let size = local.size();
            let mut x = Vector::new(size);
            local.initial_guess(&mut x);
            // move away from the trial state to activate all couplings
            let n = mandel.dim();
            x[n] -= 2e-4;
            x[n + 1] += 1e-4;
            x[n + 2] += 1e-4;
            x[2 * n] += 1e-5;
            x[2 * n + 1] += 2e-4;
            x[2 * n + 2] = 1e-3;
            let mut rr = Vector::new(size);
            let mut jj = Matrix::new(size, size);
            local.calc(&mut rr, &mut jj, &x).unwrap();
            assert!(local.overstress() > 0.0);

            let mut rr_p = Vector::new(size);
            let mut rr_m = Vector::new(size);
            let mut jj_tmp = Matrix::new(size, size);
            let mut xx = x.clone();
            for j in 0..size {
                let h = 1e-6 * f64::max(1.0, f64::abs(x[j]));
                xx[j] = x[j] + h;
                local.calc(&mut rr_p, &mut jj_tmp, &xx).unwrap();
                xx[j] = x[j] - h;
                local.calc(&mut rr_m, &mut jj_tmp, &xx).unwrap();
                xx[j] = x[j];
                for i in 0..size {
                    let num = (rr_p[i] - rr_m[i]) / (2.0 * h);
                    approx_eq(jj.get(i, j), num, 1e-6);
                }
            }
        }
    }
}
