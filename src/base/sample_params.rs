use super::{ConfigDamage, ConfigMinkley, ConfigNonlinearSolver, ParameterTable};

/// Holds samples of material parameters
///
/// The values correspond to a rock salt in MPa and seconds.
pub struct SampleParams {}

impl SampleParams {
    /// Returns a parameter table with constant rock salt parameters
    ///
    /// The names in the table match the names in [SampleParams::config_minkley].
    pub fn table_rock_salt() -> ParameterTable {
        let mut table = ParameterTable::new();
        let values = [
            ("G", 10_000.0),     // MPa
            ("K", 16_000.0),     // MPa
            ("kappa", 10.0),     // MPa
            ("beta", 0.1),       // [-]
            ("gamma", 0.5),      // [-]
            ("H", 5.0),          // [-]
            ("alpha", 0.02),     // [-]
            ("delta", 1e-4),     // 1/MPa
            ("eps", 1e-3),       // 1/MPa
            ("m", 0.5),          // [-]
            ("alphap", 0.01),    // [-]
            ("deltap", 1e-4),    // 1/MPa
            ("epsp", 5e-4),      // 1/MPa
            ("mp", 0.5),         // [-]
            ("betap", 0.05),     // [-]
            ("gammap", 0.5),     // [-]
            ("eta", 10_000.0),   // MPa·s
            ("alpha_d", 0.5),    // [-]
            ("beta_d", 2.0),     // [-]
            ("h_d", 0.01),       // [-]
        ];
        for (name, value) in values {
            table.add_constant(name, value).unwrap();
        }
        table
    }

    /// Returns the configuration of the local Newton-Raphson solver
    pub fn config_nonlinear_solver() -> ConfigNonlinearSolver {
        ConfigNonlinearSolver {
            maximum_iterations: 50,
            error_tolerance: 1e-12,
            verbose: false,
        }
    }

    /// Returns the configuration of the Minkley model referring to [SampleParams::table_rock_salt]
    pub fn config_minkley(with_damage: bool) -> ConfigMinkley {
        ConfigMinkley {
            shear_modulus: "G".to_string(),
            bulk_modulus: "K".to_string(),
            kappa: "kappa".to_string(),
            beta: "beta".to_string(),
            gamma: "gamma".to_string(),
            hardening_modulus: "H".to_string(),
            alpha: "alpha".to_string(),
            delta: "delta".to_string(),
            eps: "eps".to_string(),
            m: "m".to_string(),
            alphap: "alphap".to_string(),
            deltap: "deltap".to_string(),
            epsp: "epsp".to_string(),
            mp: "mp".to_string(),
            betap: "betap".to_string(),
            gammap: "gammap".to_string(),
            viscosity: "eta".to_string(),
            damage_properties: if with_damage {
                Some(ConfigDamage {
                    alpha_d: "alpha_d".to_string(),
                    beta_d: "beta_d".to_string(),
                    h_d: "h_d".to_string(),
                })
            } else {
                None
            },
            nonlinear_solver: SampleParams::config_nonlinear_solver(),
            verbose: false,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
