use crate::StrError;
use russell_tensor::{Mandel, Tensor2};
use std::any::Any;
use std::fmt;

/// Defines the internal (history) variables of a material point
///
/// Each variable exists in two versions: the *current* one (being computed within the
/// time step) and the *previous* one (committed at the end of the last accepted step).
pub trait MaterialStateVariables: Send + Sync + fmt::Debug {
    /// Resets the current values to the committed (previous) ones
    ///
    /// Called at the beginning of each time step; calling it twice is harmless.
    fn set_initial_conditions(&mut self);

    /// Commits the current values, i.e., previous ← current
    ///
    /// Called after the global step has been accepted.
    fn push_back_state(&mut self);

    /// Copies all values (current and previous) from another instance of the same kind
    fn assign_from(&mut self, other: &dyn MaterialStateVariables) -> Result<(), StrError>;

    /// Returns this instance as Any (to allow downcasting to the concrete type)
    fn as_any(&self) -> &dyn Any;
}

/// Holds the plastic strain split into deviatoric, volumetric, and equivalent parts
#[derive(Clone, Debug)]
pub struct PlasticStrain {
    /// Deviatoric plastic strain tensor (traceless)
    pub dev: Tensor2,

    /// Volumetric plastic strain (trace)
    pub vol: f64,

    /// Equivalent (effective) plastic strain
    pub eff: f64,
}

impl PlasticStrain {
    /// Allocates a new (zero) instance
    pub fn new(mandel: Mandel) -> Self {
        PlasticStrain {
            dev: Tensor2::new(mandel),
            vol: 0.0,
            eff: 0.0,
        }
    }

    /// Copies the values from another instance
    fn set(&mut self, other: &PlasticStrain) {
        self.dev.set_tensor(1.0, &other.dev);
        self.vol = other.vol;
        self.eff = other.eff;
    }
}

/// Holds the isotropic damage variable and its driving quantity
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Damage {
    /// Accumulated damage-driving strain κd
    kappa_d: f64,

    /// Damage variable D in [0, 1)
    value: f64,
}

impl Damage {
    /// Allocates a new instance
    pub fn new(kappa_d: f64, value: f64) -> Self {
        Damage { kappa_d, value }
    }

    /// Returns the accumulated damage-driving strain κd
    pub fn kappa_d(&self) -> f64 {
        self.kappa_d
    }

    /// Returns the damage variable D
    pub fn value(&self) -> f64 {
        self.value
    }
}

/// Holds the state variables of the Minkley model
#[derive(Clone, Debug)]
pub struct MinkleyStateVariables {
    /// Current plastic strain
    pub eps_p: PlasticStrain,

    /// Current damage
    pub damage: Damage,

    /// Committed plastic strain
    pub eps_p_prev: PlasticStrain,

    /// Committed damage
    pub damage_prev: Damage,
}

impl MinkleyStateVariables {
    /// Allocates a new (virgin) instance
    pub fn new(mandel: Mandel) -> Self {
        MinkleyStateVariables {
            eps_p: PlasticStrain::new(mandel),
            damage: Damage::default(),
            eps_p_prev: PlasticStrain::new(mandel),
            damage_prev: Damage::default(),
        }
    }
}

impl MaterialStateVariables for MinkleyStateVariables {
    fn set_initial_conditions(&mut self) {
        self.eps_p.set(&self.eps_p_prev);
        self.damage = self.damage_prev;
    }

    fn push_back_state(&mut self) {
        self.eps_p_prev.set(&self.eps_p);
        self.damage_prev = self.damage;
    }

    fn assign_from(&mut self, other: &dyn MaterialStateVariables) -> Result<(), StrError> {
        let other = other
            .as_any()
            .downcast_ref::<MinkleyStateVariables>()
            .ok_or("cannot assign state variables of a different kind")?;
        if other.eps_p.dev.vector().dim() != self.eps_p.dev.vector().dim() {
            return Err("cannot assign state variables with a different dimension");
        }
        self.eps_p.set(&other.eps_p);
        self.damage = other.damage;
        self.eps_p_prev.set(&other.eps_p_prev);
        self.damage_prev = other.damage_prev;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for MinkleyStateVariables {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "eps_p_dev = [")?;
        for (i, v) in self.eps_p.dev.vector().as_data().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:?}", v)?;
        }
        write!(f, "]\n")?;
        write!(f, "eps_p_vol = {:?}\n", self.eps_p.vol)?;
        write!(f, "eps_p_eff = {:?}\n", self.eps_p.eff)?;
        write!(f, "kappa_d = {:?}\n", self.damage.kappa_d)?;
        write!(f, "damage = {:?}", self.damage.value)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{Damage, MaterialStateVariables, MinkleyStateVariables};
    use crate::StrError;
    use russell_tensor::Mandel;
    use std::any::Any;

    fn sample_state() -> MinkleyStateVariables {
        let mut state = MinkleyStateVariables::new(Mandel::Symmetric2D);
        state.eps_p.dev.vector_mut()[0] = 1e-3;
        state.eps_p.dev.vector_mut()[1] = -1e-3;
        state.eps_p.vol = 2e-4;
        state.eps_p.eff = 3e-3;
        state.damage = Damage::new(0.5, 0.25);
        state
    }

    #[test]
    fn set_initial_conditions_works() {
        let mut state = sample_state();
        state.set_initial_conditions();
        assert_eq!(state.eps_p.vol, 0.0);
        assert_eq!(state.eps_p.eff, 0.0);
        assert_eq!(state.eps_p.dev.vector()[0], 0.0);
        assert_eq!(state.damage, Damage::default());
        // idempotent
        state.set_initial_conditions();
        assert_eq!(state.eps_p.eff, 0.0);
        assert_eq!(state.damage.value(), 0.0);
    }

    #[test]
    fn push_back_state_works() {
        let mut state = sample_state();
        state.push_back_state();
        assert_eq!(state.eps_p_prev.eff, 3e-3);
        assert_eq!(state.eps_p_prev.vol, 2e-4);
        assert_eq!(state.eps_p_prev.dev.vector()[1], -1e-3);
        assert_eq!(state.damage_prev.kappa_d(), 0.5);
        assert_eq!(state.damage_prev.value(), 0.25);
        // current values are retained after set_initial_conditions
        state.set_initial_conditions();
        assert_eq!(state.eps_p.eff, 3e-3);
        assert_eq!(state.damage.value(), 0.25);
    }

    #[test]
    fn assign_from_works() {
        let other = sample_state();
        let mut state = MinkleyStateVariables::new(Mandel::Symmetric2D);
        state.assign_from(&other).unwrap();
        for i in 0..4 {
            assert_eq!(state.eps_p.dev.vector()[i], other.eps_p.dev.vector()[i]);
        }
        assert_eq!(state.eps_p.eff, other.eps_p.eff);
        assert_eq!(state.damage, other.damage);
        let boxed: Box<dyn MaterialStateVariables> = Box::new(other.clone());
        let copy = boxed.as_any().downcast_ref::<MinkleyStateVariables>().unwrap();
        assert_eq!(copy.eps_p.vol, 2e-4);
        assert_eq!(
            format!("{}", other),
            "eps_p_dev = [0.001, -0.001, 0.0, 0.0]\n\
             eps_p_vol = 0.0002\n\
             eps_p_eff = 0.003\n\
             kappa_d = 0.5\n\
             damage = 0.25"
        );
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
    fn assign_from_captures_errors() {
        let mut state = MinkleyStateVariables::new(Mandel::Symmetric2D);
        assert_eq!(
            state.assign_from(&Other).err(),
            Some("cannot assign state variables of a different kind")
        );
        let other = MinkleyStateVariables::new(Mandel::Symmetric);
        assert_eq!(
            state.assign_from(&other).err(),
            Some("cannot assign state variables with a different dimension")
        );
    }
}
