use super::{Damage, DamageValues};
use crate::base::TOL_EPS_P_EFF_INCREMENT;

/// Calculates the brittleness factor xs as a function of the dilatancy ratio rs
///
/// ```text
///        ⎧ 1 + βd rs²                  if rs < αd
/// xs  =  ⎨
///        ⎩ 1 − βd αd² + 2 βd αd rs     otherwise
/// ```
///
/// The two branches match in value and slope at rs = αd.
pub fn brittleness_factor(rs: f64, alpha_d: f64, beta_d: f64) -> f64 {
    if rs < alpha_d {
        1.0 + beta_d * rs * rs
    } else {
        1.0 - beta_d * alpha_d * alpha_d + 2.0 * beta_d * alpha_d * rs
    }
}

/// Updates the damage from the plastic strain increments of the step
///
/// ```text
/// rs  = Δε_p_vol / Δε_p_eff   (zero if Δε_p_eff is negligible)
/// κd  = κd_prev + max(Δε_p_eff, 0) / xs(rs)
/// D   = 1 − exp(−κd / hd)
/// ```
///
/// The driving quantity κd never decreases; thus, D never decreases either.
pub fn calc_damage(delta_eps_p_vol: f64, delta_eps_p_eff: f64, previous: &Damage, p: &DamageValues) -> Damage {
    let rs = if delta_eps_p_eff > TOL_EPS_P_EFF_INCREMENT {
        delta_eps_p_vol / delta_eps_p_eff
    } else {
        0.0
    };
    let xs = brittleness_factor(rs, p.alpha_d, p.beta_d);
    let kappa_d = previous.kappa_d() + f64::max(delta_eps_p_eff, 0.0) / xs;
    let value = 1.0 - f64::exp(-kappa_d / p.h_d);
    Damage::new(kappa_d, value)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
