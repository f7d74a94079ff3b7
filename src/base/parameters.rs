use crate::{FnSpaceTime, StrError};
use std::collections::HashMap;
use std::fmt;

/// Identifies a parameter stored in a [ParameterTable]
///
/// The identifier is a stable index into the table; thus, models hold identifiers
/// (not values or references) and resolve them on demand at a given position and time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ParamId(usize);

/// Defines a scalar parameter that may vary in space and time
#[derive(Clone, Copy)]
pub enum Parameter {
    /// Constant value
    Constant(f64),

    /// Function of the spatial position x and time t
    SpaceTime(FnSpaceTime),
}

impl Parameter {
    /// Evaluates the parameter at the position x and time t
    #[inline]
    pub fn value(&self, x: &[f64], t: f64) -> f64 {
        match self {
            Parameter::Constant(value) => *value,
            Parameter::SpaceTime(f) => f(x, t),
        }
    }
}

impl fmt::Debug for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parameter::Constant(value) => write!(f, "Constant({:?})", value),
            Parameter::SpaceTime(_) => write!(f, "SpaceTime(fn)"),
        }
    }
}

/// Holds a collection of named parameters
///
/// The table is owned by the caller (e.g., the simulation setup) and outlives the
/// material models, which only keep [ParamId] handles into it.
#[derive(Clone, Debug)]
pub struct ParameterTable {
    /// Holds all parameters
    all: Vec<Parameter>,

    /// Holds the names of the parameters
    names: Vec<String>,

    /// Maps names to the position in the table
    index: HashMap<String, usize>,
}

impl ParameterTable {
    /// Allocates a new (empty) instance
    pub fn new() -> Self {
        ParameterTable {
            all: Vec::new(),
            names: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Allocates a new instance with constant parameters
    pub fn from_constants(constants: &HashMap<String, f64>) -> Result<Self, StrError> {
        let mut table = ParameterTable::new();
        let mut keys: Vec<_> = constants.keys().collect();
        keys.sort();
        for key in keys {
            table.add(key, Parameter::Constant(constants[key]))?;
        }
        Ok(table)
    }

    /// Adds a new parameter
    ///
    /// Returns an error if the name is empty or already taken.
    pub fn add(&mut self, name: &str, parameter: Parameter) -> Result<ParamId, StrError> {
        if name.is_empty() {
            return Err("the parameter name must not be empty");
        }
        if self.index.contains_key(name) {
            return Err("a parameter with the same name already exists");
        }
        let id = self.all.len();
        self.all.push(parameter);
        self.names.push(name.to_string());
        self.index.insert(name.to_string(), id);
        Ok(ParamId(id))
    }

    /// Adds a new constant parameter
    pub fn add_constant(&mut self, name: &str, value: f64) -> Result<ParamId, StrError> {
        self.add(name, Parameter::Constant(value))
    }

    /// Replaces the parameter with the given name (e.g., to change a material field)
    pub fn replace(&mut self, name: &str, parameter: Parameter) -> Result<(), StrError> {
        let id = self.index.get(name).ok_or("cannot find parameter to replace")?;
        self.all[*id] = parameter;
        Ok(())
    }

    /// Finds a parameter by name
    pub fn find(&self, name: &str) -> Result<ParamId, StrError> {
        match self.index.get(name) {
            Some(id) => Ok(ParamId(*id)),
            None => Err("cannot find parameter in the table"),
        }
    }

    /// Returns the name of a parameter
    pub fn name(&self, id: ParamId) -> &str {
        &self.names[id.0]
    }

    /// Returns the number of parameters
    pub fn len(&self) -> usize {
        self.all.len()
    }

    /// Evaluates a parameter at the position x and time t
    ///
    /// # Panics
    ///
    /// A panic will occur if the id was not generated by this table.
    #[inline]
    pub fn value(&self, id: ParamId, x: &[f64], t: f64) -> f64 {
        self.all[id.0].value(x, t)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
