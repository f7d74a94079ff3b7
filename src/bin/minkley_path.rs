use minkley::base::DEFAULT_OUT_DIR;
use minkley::prelude::*;
use std::path::Path;
use std::sync::Arc;
use structopt::StructOpt;

/// Command line options
#[derive(StructOpt, Debug)]
#[structopt(
    name = "minkley_path",
    about = "Integrates the Minkley model along a strain path given in a JSON file"
)]
struct Options {
    /// Input JSON file
    input: String,

    /// Saves a figure with the results
    #[structopt(short, long)]
    plot: bool,

    /// Output directory for the figure (default is /tmp/minkley/results)
    #[structopt(short, long)]
    out_dir: Option<String>,

    /// Prints the local iterations and time step cuts
    #[structopt(short, long)]
    verbose: bool,
}

fn run<D: Dimension>(config: &ConfigStrainPath, table: &Arc<ParameterTable>) -> Result<Vec<PathRecord>, StrError> {
    let model = new_solid_model::<D>(table, &config.model)?;
    let path = StrainPath::from_config(config)?;
    let position = if config.position.is_empty() {
        vec![0.0; 3]
    } else {
        config.position.clone()
    };
    path.follow::<D>(&*model, &position)
}

fn main() -> Result<(), StrError> {
    // parse options
    let options = Options::from_args();

    // load data
    let mut config = ConfigStrainPath::read_json(&options.input)?;
    if options.verbose {
        config.verbose = true;
        let ConfigSolid::Minkley(minkley) = &mut config.model;
        minkley.verbose = true;
        minkley.nonlinear_solver.verbose = true;
    }
    let table = Arc::new(ParameterTable::from_constants(&config.parameters)?);

    // follow the path
    let records = if config.two_dim {
        run::<Dim2>(&config, &table)?
    } else {
        run::<Dim3>(&config, &table)?
    };

    // print results
    println!(
        "{:>13} {:>13} {:>13} {:>13} {:>13} {:>5}",
        "t", "eps_xx", "sig_xx", "eps_p_eff", "damage", "iter"
    );
    for r in &records {
        println!(
            "{:>13.6e} {:>13.6e} {:>13.6e} {:>13.6e} {:>13.6e} {:>5}",
            r.t,
            r.strain.vector()[0],
            r.stress.vector()[0],
            r.eps_p_eff,
            r.damage,
            r.iterations
        );
    }

    // save figure
    if options.plot {
        let stem = Path::new(&options.input)
            .file_stem()
            .ok_or("cannot get the stem of the input file")?
            .to_string_lossy();
        let out_dir = options.out_dir.as_deref().unwrap_or(DEFAULT_OUT_DIR);
        let figure = format!("{}/{}.svg", out_dir, stem);
        plot_strain_path(&records, &figure)?;
        println!("\nfigure saved to {}", figure);
    }
    Ok(())
}
