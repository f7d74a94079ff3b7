use super::{StressInvariants, SurfaceValues};
use russell_tensor::{t2_add, t2_dyad_t2, t2_dyad_t2_update, Mandel, Tensor2, Tensor4};

/// Evaluates a surface of the Ehlers type and its derivatives with respect to σ
///
/// ```text
/// a(θ) = (1 + γ θ)^m
/// Φ    = J2 a + α/2 I1² + δ² I1⁴
/// S    = √Φ + β I1 + ε I1²
///
/// dΦ/dσ = a s + J2 a' dθ/dσ + (α I1 + 4 δ² I1³) I
/// dS/dσ = dΦ/dσ / (2 √Φ) + (β + 2 ε I1) I
/// ```
///
/// The same function serves as the overstress (yield) surface and, with the primed
/// coefficients, as the viscoplastic potential.
pub struct Surface {
    /// Value of the inner function Φ
    pub phi: f64,

    /// Value of S(σ)
    pub value: f64,

    /// First derivative dS/dσ
    pub grad: Tensor2,

    /// Second derivative d²S/(dσ⊗dσ) (only if requested)
    pub hess: Tensor4,

    /// Derivative dΦ/dσ
    d_phi: Tensor2,

    /// Second derivative d²Φ/(dσ⊗dσ)
    dd_phi: Tensor4,

    /// Second-order identity
    ii: Tensor2,

    /// Symmetric-deviatoric projector
    pp_symdev: Tensor4,
}

impl Surface {
    /// Allocates a new instance
    pub fn new(mandel: Mandel) -> Self {
        let mut pp_symdev = Tensor4::new(mandel);
        pp_symdev.set_pp_symdev();
        Surface {
            phi: 0.0,
            value: 0.0,
            grad: Tensor2::new(mandel),
            hess: Tensor4::new(mandel),
            d_phi: Tensor2::new(mandel),
            dd_phi: Tensor4::new(mandel),
            ii: Tensor2::identity(mandel),
            pp_symdev,
        }
    }

    /// Calculates the surface value and derivatives
    ///
    /// # Input
    ///
    /// * `p` -- the coefficients of the surface
    /// * `inv` -- the stress invariants (already computed)
    /// * `tol_sqrt_phi` -- absolute tolerance on √Φ below which the square-root terms are dropped
    /// * `with_hessian` -- also computes d²S/(dσ⊗dσ)
    pub fn calc(&mut self, p: &SurfaceValues, inv: &StressInvariants, tol_sqrt_phi: f64, with_hessian: bool) {
        let (i1, jj2) = (inv.i1, inv.jj2);

        // Lode-angle function and derivatives
        let base = 1.0 + p.gamma * inv.theta;
        let a = f64::powf(base, p.m);
        let da = p.m * p.gamma * f64::powf(base, p.m - 1.0);
        let dda = p.m * (p.m - 1.0) * p.gamma * p.gamma * f64::powf(base, p.m - 2.0);

        // inner function
        let c1 = p.alpha * i1 + 4.0 * p.delta * p.delta * i1 * i1 * i1;
        self.phi = jj2 * a + 0.5 * p.alpha * i1 * i1 + p.delta * p.delta * i1 * i1 * i1 * i1;
        t2_add(&mut self.d_phi, a, &inv.s, c1, &self.ii);
        if inv.with_lode {
            self.d_phi.update(jj2 * da, &inv.d_theta);
        }

        // surface
        let sqrt_phi = f64::sqrt(f64::max(self.phi, 0.0));
        let with_sqrt = sqrt_phi > tol_sqrt_phi;
        let c2 = p.beta + 2.0 * p.epsilon * i1;
        self.value = sqrt_phi + p.beta * i1 + p.epsilon * i1 * i1;
        self.grad.set_tensor(c2, &self.ii);
        if with_sqrt {
            self.grad.update(1.0 / (2.0 * sqrt_phi), &self.d_phi);
        }
        if !with_hessian {
            return;
        }

        // d²S/(dσ⊗dσ) = 2 ε I⊗I + d²Φ/(dσ⊗dσ) / (2 √Φ) − dΦ/dσ ⊗ dΦ/dσ / (4 Φ √Φ)
        t2_dyad_t2(&mut self.hess, 2.0 * p.epsilon, &self.ii, &self.ii);
        if !with_sqrt {
            return;
        }
        let c3 = p.alpha + 12.0 * p.delta * p.delta * i1 * i1;
        self.dd_phi.set_tensor(a, &self.pp_symdev);
        t2_dyad_t2_update(&mut self.dd_phi, c3, &self.ii, &self.ii);
        if inv.with_lode {
            t2_dyad_t2_update(&mut self.dd_phi, da, &inv.s, &inv.d_theta);
            t2_dyad_t2_update(&mut self.dd_phi, da, &inv.d_theta, &inv.s);
            t2_dyad_t2_update(&mut self.dd_phi, jj2 * dda, &inv.d_theta, &inv.d_theta);
            self.dd_phi.update(jj2 * da, &inv.d2_theta);
        }
        self.hess.update(1.0 / (2.0 * sqrt_phi), &self.dd_phi);
        t2_dyad_t2_update(&mut self.hess, -1.0 / (4.0 * self.phi * sqrt_phi), &self.d_phi, &self.d_phi);
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
