use russell_tensor::{deriv1_invariant_jj3, deriv2_invariant_jj3, t2_add, t2_dyad_t2_update, t4_add};
use russell_tensor::{AuxDeriv2InvariantJ3, Mandel, Tensor2, Tensor4};

/// Holds the stress invariants and the derivatives of the Lode-type invariant θ
///
/// ```text
/// I1 = tr(σ)
/// s  = dev(σ)
/// J2 = ½ s : s
/// J3 = det(s)
/// θ  = J3 / J2^(3/2)
/// ```
///
/// θ is the Lode invariant of russell_tensor scaled by 2/√27. If √J2 is smaller than
/// a tolerance (hydrostatic state), θ and its derivatives are set to zero.
pub struct StressInvariants {
    /// First invariant of the stress tensor
    pub i1: f64,

    /// Second invariant of the deviatoric stress tensor
    pub jj2: f64,

    /// Third invariant of the deviatoric stress tensor
    pub jj3: f64,

    /// Lode-type invariant θ = J3 / J2^(3/2) in [-2/√27, 2/√27]
    pub theta: f64,

    /// Indicates that θ and its derivatives are available (J2 is not too small)
    pub with_lode: bool,

    /// Deviatoric stress tensor s = dev(σ)
    pub s: Tensor2,

    /// First derivative dJ3/dσ = dev(s·s)
    pub d_jj3: Tensor2,

    /// First derivative dθ/dσ
    pub d_theta: Tensor2,

    /// Second derivative d²θ/(dσ⊗dσ)
    pub d2_theta: Tensor4,

    /// Second derivative d²J3/(dσ⊗dσ) (always Symmetric, i.e., 3D)
    d2_jj3_3d: Tensor4,

    /// Second derivative d²J3/(dσ⊗dσ) with the Mandel representation of σ
    d2_jj3: Tensor4,

    /// Symmetric-deviatoric projector Psd = d²J2/(dσ⊗dσ)
    pp_symdev: Tensor4,

    /// Workspace for the second derivative of J3
    aux: AuxDeriv2InvariantJ3,
}

impl StressInvariants {
    /// Allocates a new instance
    pub fn new(mandel: Mandel) -> Self {
        let mut pp_symdev = Tensor4::new(mandel);
        pp_symdev.set_pp_symdev();
        StressInvariants {
            i1: 0.0,
            jj2: 0.0,
            jj3: 0.0,
            theta: 0.0,
            with_lode: false,
            s: Tensor2::new(mandel),
            d_jj3: Tensor2::new(mandel),
            d_theta: Tensor2::new(mandel),
            d2_theta: Tensor4::new(mandel),
            d2_jj3_3d: Tensor4::new(Mandel::Symmetric),
            d2_jj3: Tensor4::new(mandel),
            pp_symdev,
            aux: AuxDeriv2InvariantJ3::new(),
        }
    }

    /// Calculates the invariants and the derivatives of θ
    ///
    /// * `sigma` -- the stress tensor
    /// * `tol_sqrt_jj2` -- absolute tolerance (stress units) on √J2 to enable the Lode dependence
    pub fn calc(&mut self, sigma: &Tensor2, tol_sqrt_jj2: f64) {
        self.i1 = sigma.trace();
        self.jj2 = sigma.invariant_jj2();
        self.jj3 = sigma.invariant_jj3();
        deriv1_invariant_jj3(&mut self.d_jj3, &mut self.s, sigma);
        self.d_theta.clear();
        self.d2_theta.matrix_mut().fill(0.0);
        self.theta = 0.0;
        self.with_lode = f64::sqrt(self.jj2) > tol_sqrt_jj2;
        if !self.with_lode {
            return;
        }

        // d²J3/(dσ⊗dσ); in 2D, the leading block of the 3D derivative
        deriv2_invariant_jj3(&mut self.d2_jj3_3d, &mut self.aux, sigma);
        let n = sigma.dim();
        let d2_3d = self.d2_jj3_3d.matrix();
        let d2 = self.d2_jj3.matrix_mut();
        for i in 0..n {
            for j in 0..n {
                d2.set(i, j, d2_3d.get(i, j));
            }
        }

        // θ and derivatives
        let (jj2, jj3) = (self.jj2, self.jj3);
        let p15 = f64::powf(jj2, 1.5);
        let p25 = jj2 * p15;
        let p35 = jj2 * p25;
        self.theta = jj3 / p15;
        t2_add(&mut self.d_theta, 1.0 / p15, &self.d_jj3, -1.5 * jj3 / p25, &self.s);
        t4_add(&mut self.d2_theta, 1.0 / p15, &self.d2_jj3, -1.5 * jj3 / p25, &self.pp_symdev);
        t2_dyad_t2_update(&mut self.d2_theta, -1.5 / p25, &self.d_jj3, &self.s);
        t2_dyad_t2_update(&mut self.d2_theta, -1.5 / p25, &self.s, &self.d_jj3);
        t2_dyad_t2_update(&mut self.d2_theta, 3.75 * jj3 / p35, &self.s, &self.s);
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
