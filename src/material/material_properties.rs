use crate::base::{ConfigDamage, ConfigMinkley, ParamId, ParameterTable};
use crate::StrError;

/// Holds the resolved coefficients of a surface of the Ehlers type
///
/// ```text
/// Φ = J2 (1 + γ θ)^m + α/2 I1² + δ² I1⁴
/// S = √Φ + β I1 + ε I1²
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceValues {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    pub delta: f64,
    pub epsilon: f64,
    pub m: f64,
}

/// Holds the values of the Minkley parameters at a given position and time
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaterialValues {
    /// Shear modulus G
    pub gg: f64,

    /// Bulk modulus K
    pub kk: f64,

    /// Initial size of the overstress surface κ
    pub kappa: f64,

    /// Hardening modulus h such that k = κ (1 + h ε_p_eff)
    pub hardening_coefficient: f64,

    /// Viscosity η of the rate law η λ = ⟨F⟩
    pub viscosity: f64,

    /// Coefficients of the overstress (yield) surface
    pub yield_surface: SurfaceValues,

    /// Coefficients of the viscoplastic potential
    pub potential: SurfaceValues,
}

/// Holds the values of the damage parameters at a given position and time
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageValues {
    pub alpha_d: f64,
    pub beta_d: f64,
    pub h_d: f64,
}

/// Holds the identifiers of the Minkley parameters in the parameter table
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaterialProperties {
    pub shear_modulus: ParamId,
    pub bulk_modulus: ParamId,
    pub kappa: ParamId,
    pub beta: ParamId,
    pub gamma: ParamId,
    pub hardening_modulus: ParamId,
    pub alpha: ParamId,
    pub delta: ParamId,
    pub eps: ParamId,
    pub m: ParamId,
    pub alphap: ParamId,
    pub deltap: ParamId,
    pub epsp: ParamId,
    pub mp: ParamId,
    pub betap: ParamId,
    pub gammap: ParamId,
    pub viscosity: ParamId,
}

/// Holds the identifiers of the damage parameters in the parameter table
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageProperties {
    pub alpha_d: ParamId,
    pub beta_d: ParamId,
    pub h_d: ParamId,
}

impl MaterialProperties {
    /// Finds all parameters in the table
    ///
    /// Returns an error if any name cannot be found.
    pub fn new(table: &ParameterTable, config: &ConfigMinkley) -> Result<Self, StrError> {
        Ok(MaterialProperties {
            shear_modulus: table.find(&config.shear_modulus)?,
            bulk_modulus: table.find(&config.bulk_modulus)?,
            kappa: table.find(&config.kappa)?,
            beta: table.find(&config.beta)?,
            gamma: table.find(&config.gamma)?,
            hardening_modulus: table.find(&config.hardening_modulus)?,
            alpha: table.find(&config.alpha)?,
            delta: table.find(&config.delta)?,
            eps: table.find(&config.eps)?,
            m: table.find(&config.m)?,
            alphap: table.find(&config.alphap)?,
            deltap: table.find(&config.deltap)?,
            epsp: table.find(&config.epsp)?,
            mp: table.find(&config.mp)?,
            betap: table.find(&config.betap)?,
            gammap: table.find(&config.gammap)?,
            viscosity: table.find(&config.viscosity)?,
        })
    }

    /// Evaluates all parameters at the position x and time t
    pub fn resolve(&self, table: &ParameterTable, x: &[f64], t: f64) -> MaterialValues {
        let value = |id: ParamId| table.value(id, x, t);
        MaterialValues {
            gg: value(self.shear_modulus),
            kk: value(self.bulk_modulus),
            kappa: value(self.kappa),
            hardening_coefficient: value(self.hardening_modulus),
            viscosity: value(self.viscosity),
            yield_surface: SurfaceValues {
                alpha: value(self.alpha),
                beta: value(self.beta),
                gamma: value(self.gamma),
                delta: value(self.delta),
                epsilon: value(self.eps),
                m: value(self.m),
            },
            potential: SurfaceValues {
                alpha: value(self.alphap),
                beta: value(self.betap),
                gamma: value(self.gammap),
                delta: value(self.deltap),
                epsilon: value(self.epsp),
                m: value(self.mp),
            },
        }
    }
}

impl DamageProperties {
    /// Finds all damage parameters in the table
    pub fn new(table: &ParameterTable, config: &ConfigDamage) -> Result<Self, StrError> {
        Ok(DamageProperties {
            alpha_d: table.find(&config.alpha_d)?,
            beta_d: table.find(&config.beta_d)?,
            h_d: table.find(&config.h_d)?,
        })
    }

    /// Evaluates all damage parameters at the position x and time t
    pub fn resolve(&self, table: &ParameterTable, x: &[f64], t: f64) -> DamageValues {
        DamageValues {
            alpha_d: table.value(self.alpha_d, x, t),
            beta_d: table.value(self.beta_d, x, t),
            h_d: table.value(self.h_d, x, t),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
