use super::{DamageProperties, MaterialProperties, SolidMinkley};
use crate::base::{ConfigMinkley, Dimension, NewtonRaphsonParams, ParameterTable};
use crate::StrError;
use std::sync::Arc;

/// Creates the Minkley model from the configuration
///
/// All parameter names given in the configuration must exist in the table; the
/// damage properties are optional and, if absent, the damage stays zero.
pub fn create_minkley<D: Dimension>(
    table: &Arc<ParameterTable>,
    config: &ConfigMinkley,
) -> Result<SolidMinkley<D>, StrError> {
    if config.verbose {
        println!("creating the Minkley model ({})", if D::TWO_DIM { "2D" } else { "3D" });
    }
    let material_properties = MaterialProperties::new(table, config)?;
    let damage_properties = match &config.damage_properties {
        Some(c) => Some(DamageProperties::new(table, c)?),
        None => None,
    };
    let nonlinear_solver_params = NewtonRaphsonParams::from_config(&config.nonlinear_solver)?;
    if config.verbose {
        let props = &material_properties;
        let names = [
            ("shear_modulus", props.shear_modulus),
            ("bulk_modulus", props.bulk_modulus),
            ("kappa", props.kappa),
            ("beta", props.beta),
            ("gamma", props.gamma),
            ("hardening_modulus", props.hardening_modulus),
            ("alpha", props.alpha),
            ("delta", props.delta),
            ("eps", props.eps),
            ("m", props.m),
            ("alphap", props.alphap),
            ("deltap", props.deltap),
            ("epsp", props.epsp),
            ("mp", props.mp),
            ("betap", props.betap),
            ("gammap", props.gammap),
            ("viscosity", props.viscosity),
        ];
        for (key, id) in names {
            println!("    {:<17} ← {}", key, table.name(id));
        }
        match &damage_properties {
            Some(dp) => {
                for (key, id) in [("alpha_d", dp.alpha_d), ("beta_d", dp.beta_d), ("h_d", dp.h_d)] {
                    println!("    {:<17} ← {}", key, table.name(id));
                }
            }
            None => println!("    damage: disabled"),
        }
        println!(
            "    nonlinear solver: maximum_iterations = {}, error_tolerance = {:?}",
            nonlinear_solver_params.maximum_iterations, nonlinear_solver_params.error_tolerance
        );
    }
    Ok(SolidMinkley::new(
        table.clone(),
        material_properties,
        damage_properties,
        nonlinear_solver_params,
    ))
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
