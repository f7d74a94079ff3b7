use crate::StrError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Holds the configuration of the local nonlinear (Newton-Raphson) solver
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfigNonlinearSolver {
    /// Maximum number of iterations per stress integration
    pub maximum_iterations: usize,

    /// Tolerance on the (Euclidean) norm of the local residual
    pub error_tolerance: f64,

    /// Prints the iterations
    #[serde(default)]
    pub verbose: bool,
}

/// Holds the names of the damage parameters in the parameter table
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfigDamage {
    /// Dilatancy ratio at which the brittleness factor switches from quadratic to linear
    pub alpha_d: String,

    /// Brittleness (confinement) coefficient
    pub beta_d: String,

    /// Characteristic damage-driving strain
    pub h_d: String,
}

/// Holds the names of the Minkley parameters in the parameter table
///
/// Each field holds the *name* of a parameter stored in the [crate::base::ParameterTable];
/// the values are only resolved during the stress integration.
///
/// The first sixteen fields form the classical Minkley parameter set. The `viscosity` η is
/// an addition to that set: it closes the rate law η λ = ⟨F⟩ and must also be present in
/// the table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfigMinkley {
    /// Shear modulus G
    pub shear_modulus: String,

    /// Bulk modulus K
    pub bulk_modulus: String,

    /// Initial size of the overstress surface κ
    pub kappa: String,

    /// Coefficient of the linear I1 term of the overstress surface
    pub beta: String,

    /// Lode-angle coefficient of the overstress surface
    pub gamma: String,

    /// Hardening modulus (relative to κ)
    pub hardening_modulus: String,

    /// Coefficient of the I1² term inside the square root of the overstress surface
    pub alpha: String,

    /// Coefficient of the I1⁴ term inside the square root of the overstress surface
    pub delta: String,

    /// Coefficient of the quadratic I1 term of the overstress surface
    pub eps: String,

    /// Lode-angle exponent of the overstress surface
    pub m: String,

    /// Coefficient of the I1² term of the viscoplastic potential
    pub alphap: String,

    /// Coefficient of the I1⁴ term of the viscoplastic potential
    pub deltap: String,

    /// Coefficient of the quadratic I1 term of the viscoplastic potential
    pub epsp: String,

    /// Lode-angle exponent of the viscoplastic potential
    pub mp: String,

    /// Coefficient of the linear I1 term of the viscoplastic potential
    pub betap: String,

    /// Lode-angle coefficient of the viscoplastic potential
    pub gammap: String,

    /// Viscosity η of the overstress rate law (η λ = ⟨F⟩)
    ///
    /// **Note:** This parameter is not part of the classical sixteen Minkley parameters.
    pub viscosity: String,

    /// Optional damage properties (no damage evolution if None)
    #[serde(default)]
    pub damage_properties: Option<ConfigDamage>,

    /// Local nonlinear solver configuration
    pub nonlinear_solver: ConfigNonlinearSolver,

    /// Prints messages during the construction of the model
    #[serde(default)]
    pub verbose: bool,
}

/// Holds the configuration of a solid constitutive model
///
/// The model is selected by the "type" key, e.g.:
///
/// ```text
/// { "type": "Minkley", "shear_modulus": "G", ... }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ConfigSolid {
    /// Minkley elasto-viscoplastic-damage model
    Minkley(ConfigMinkley),
}

/// Holds a station of a strain path
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfigStation {
    /// Time at the station
    pub t: f64,

    /// Strain at the station (Mandel components)
    pub strain: Vec<f64>,
}

/// Holds the input of a single-point simulation along a strain path
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfigStrainPath {
    /// Indicates 2D (plane-strain) instead of 3D
    pub two_dim: bool,

    /// Constant parameters (name → value)
    pub parameters: HashMap<String, f64>,

    /// Constitutive model
    pub model: ConfigSolid,

    /// Stations of the path (the path starts at t = 0 with zero strain)
    pub stations: Vec<ConfigStation>,

    /// Position of the material point
    #[serde(default)]
    pub position: Vec<f64>,

    /// Maximum time increment
    #[serde(default)]
    pub dt_max: Option<f64>,

    /// Maximum number of consecutive time step cuts
    #[serde(default = "default_max_step_cuts")]
    pub max_step_cuts: usize,

    /// Prints the time step cuts
    #[serde(default)]
    pub verbose: bool,
}

fn default_max_step_cuts() -> usize {
    10
}

/// Reads a JSON file
fn read_json_file<T, P>(full_path: &P) -> Result<T, StrError>
where
    T: DeserializeOwned,
    P: AsRef<OsStr> + ?Sized,
{
    let path = Path::new(full_path).to_path_buf();
    let input = File::open(path).map_err(|_| "cannot open file")?;
    let buffered = BufReader::new(input);
    let config = serde_json::from_reader(buffered).map_err(|_| "cannot parse JSON file")?;
    Ok(config)
}

impl ConfigSolid {
    /// Reads a JSON file containing the configuration
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn read_json<P>(full_path: &P) -> Result<Self, StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        read_json_file(full_path)
    }

    /// Parses a JSON string containing the configuration
    pub fn from_json_str(json: &str) -> Result<Self, StrError> {
        serde_json::from_str(json).map_err(|_| "cannot parse JSON string")
    }
}

impl ConfigStrainPath {
    /// Reads a JSON file containing the input
    pub fn read_json<P>(full_path: &P) -> Result<Self, StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        read_json_file(full_path)
    }

    /// Parses a JSON string containing the input
    pub fn from_json_str(json: &str) -> Result<Self, StrError> {
        serde_json::from_str(json).map_err(|_| "cannot parse JSON string")
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
