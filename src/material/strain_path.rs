use super::{MaterialStateVariables, MinkleyStateVariables, SolidModel};
use crate::base::{ConfigStrainPath, Dimension};
use crate::StrError;
use russell_tensor::{t2_add, Mandel, Tensor2};

/// Holds the results at one (accepted) step along a strain path
#[derive(Clone, Debug)]
pub struct PathRecord {
    /// Time
    pub t: f64,

    /// Total strain
    pub strain: Tensor2,

    /// Stress
    pub stress: Tensor2,

    /// Equivalent plastic strain
    pub eps_p_eff: f64,

    /// Accumulated damage-driving strain
    pub kappa_d: f64,

    /// Damage variable
    pub damage: f64,

    /// Number of local iterations
    pub iterations: usize,
}

impl PathRecord {
    /// Allocates a new instance (the state variables must be of the Minkley kind)
    fn new(
        t: f64,
        strain: &Tensor2,
        stress: &Tensor2,
        state: &dyn MaterialStateVariables,
        iterations: usize,
    ) -> Result<Self, StrError> {
        let minkley = state
            .as_any()
            .downcast_ref::<MinkleyStateVariables>()
            .ok_or("the state variables must be of the Minkley kind to be recorded")?;
        Ok(PathRecord {
            t,
            strain: strain.clone(),
            stress: stress.clone(),
            eps_p_eff: minkley.eps_p_prev.eff,
            kappa_d: minkley.damage_prev.kappa_d(),
            damage: minkley.damage_prev.value(),
            iterations,
        })
    }
}

/// Defines a piecewise-linear (in time) strain history applied to a single material point
///
/// The path starts at t = 0 with zero strain. Between two stations, the strain is
/// interpolated linearly in time. If the local solver fails, the time increment is halved;
/// after a successful step, the time increment returns to its nominal value.
pub struct StrainPath {
    /// Mandel representation
    mandel: Mandel,

    /// Times at the stations
    pub times: Vec<f64>,

    /// Strains at the stations
    pub strains: Vec<Tensor2>,

    /// Maximum number of consecutive time step cuts
    pub max_step_cuts: usize,

    /// Maximum time increment (the whole segment if None)
    pub dt_max: Option<f64>,

    /// Prints the time step cuts
    pub verbose: bool,
}

impl StrainPath {
    /// Allocates a new instance
    pub fn new(mandel: Mandel) -> Self {
        StrainPath {
            mandel,
            times: vec![0.0],
            strains: vec![Tensor2::new(mandel)],
            max_step_cuts: 10,
            dt_max: None,
            verbose: false,
        }
    }

    /// Allocates a new instance from the input configuration
    pub fn from_config(config: &ConfigStrainPath) -> Result<Self, StrError> {
        let mandel = if config.two_dim {
            Mandel::Symmetric2D
        } else {
            Mandel::Symmetric
        };
        let mut path = StrainPath::new(mandel);
        for station in &config.stations {
            path.push(station.t, &station.strain)?;
        }
        path.max_step_cuts = config.max_step_cuts;
        path.dt_max = config.dt_max;
        path.verbose = config.verbose;
        Ok(path)
    }

    /// Adds a station with the strain given by its Mandel components
    ///
    /// The time must be greater than the time at the last station.
    pub fn push(&mut self, t: f64, components: &[f64]) -> Result<&mut Self, StrError> {
        if components.len() != self.mandel.dim() {
            return Err("the number of strain components is incompatible with the path");
        }
        let last = self.times[self.times.len() - 1];
        if !(t > last) {
            return Err("the time at the new station must be greater than the previous one");
        }
        let mut eps = Tensor2::new(self.mandel);
        eps.set_mandel_vector(1.0, components);
        self.times.push(t);
        self.strains.push(eps);
        Ok(self)
    }

    /// Follows the path and returns the results at all accepted steps (including t = 0)
    pub fn follow<D: Dimension>(&self, model: &dyn SolidModel<D>, x: &[f64]) -> Result<Vec<PathRecord>, StrError> {
        let n = self.mandel.dim();
        if n != D::KELVIN_SIZE {
            return Err("the dimension of the path is incompatible with the model");
        }
        if let Some(dt_max) = self.dt_max {
            if !(dt_max > 0.0) {
                return Err("dt_max must be > 0.0");
            }
        }
        let mut state = model.create_material_state_variables();
        let mut sigma = Tensor2::new(self.mandel);
        let mut eps = self.strains[0].clone();
        let mut t = self.times[0];
        let mut records = vec![PathRecord::new(t, &eps, &sigma, &*state, 0)?];
        let mut eps_new = Tensor2::new(self.mandel);
        for k in 1..self.times.len() {
            let (t_ini, t_fin) = (self.times[k - 1], self.times[k]);
            let (eps_ini, eps_fin) = (&self.strains[k - 1], &self.strains[k]);
            let tol = 1e-14 * f64::max(1.0, f64::abs(t_fin));
            let dt_nominal = match self.dt_max {
                Some(dt_max) => f64::min(dt_max, t_fin - t_ini),
                None => t_fin - t_ini,
            };
            let mut dt = dt_nominal;
            let mut cuts = 0;
            while t_fin - t > tol {
                dt = f64::min(dt, t_fin - t);
                let t_new = t + dt;
                let alpha = (t_new - t_ini) / (t_fin - t_ini);
                t2_add(&mut eps_new, 1.0 - alpha, eps_ini, alpha, eps_fin);
                match model.integrate_stress(t_new, x, dt, &eps, &eps_new, &sigma, &*state)? {
                    Some(update) => {
                        state.assign_from(&*update.state)?;
                        state.push_back_state();
                        sigma = update.sigma;
                        eps.set_tensor(1.0, &eps_new);
                        t = t_new;
                        cuts = 0;
                        dt = dt_nominal;
                        records.push(PathRecord::new(t, &eps, &sigma, &*state, update.iterations)?);
                    }
                    None => {
                        cuts += 1;
                        if cuts > self.max_step_cuts {
                            return Err("the local solver failed after the maximum number of time step cuts");
                        }
                        dt *= 0.5;
                        if self.verbose {
                            println!("t = {:?}: local solver failed; new dt = {:?}", t, dt);
                        }
                    }
                }
            }
            t = t_fin;
        }
        Ok(records)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
