/////////////////////////////////////////////////////////////////////////////////////
//
// Outbreak model
//
// usage: outbreak <model_root> [log_level]
//
// reads <model_root>/parms.yaml, builds a toy population and writes the
// compartment counts of every timestep to the configured csv file
//
////////////////////////////////////////////////////////////////////////////////////

use log::{error, info, LevelFilter};
use outbreak::data_management::ModelDataStore;
use outbreak::error::Result;
use outbreak::simulation::Simulation;
use outbreak::stats::CsvCompartmentWriter;
use outbreak::sweep::default_sweeps;
use outbreak::utilities::{init_logging, parse_log_level, seeded_rng};
use std::env;
use std::process;
use std::rc::Rc;

fn main() {
    // process command line arguments: the model root directory and an optional log level
    let args: Vec<String> = env::args().collect();
    let level = match args.get(2).map(|l| parse_log_level(l)) {
        Some(Ok(level)) => level,
        Some(Err(e)) => {
            eprintln!("{}", e);
            process::exit(2);
        }
        None => LevelFilter::Info,
    };
    if let Err(e) = init_logging(level) {
        eprintln!("{}", e);
        process::exit(2);
    }
    let model_root = match args.get(1) {
        Some(root) => root,
        None => {
            error!("no model location specified");
            process::exit(2);
        }
    };

    if let Err(e) = run(model_root) {
        error!("{}", e);
        process::exit(1);
    }
}

fn run(model_root: &str) -> Result<()> {
    // the model data store handles all model inputs and outputs
    let model_data_store = ModelDataStore::new(model_root)?;
    let model_parms = model_data_store.get_model_parms()?;
    info!("--------------------Outbreak Model-----------------------");

    let mut rng = seeded_rng(model_parms.simulation.simulation_seed);
    let population = model_parms.population.make_pop(&mut rng)?;
    info!("{}", population);

    let (initial_sweeps, sweeps) = default_sweeps(Rc::new(model_parms.parameters))?;
    let output_file = model_data_store.create_output_file(&model_parms.simulation)?;
    let sink = Box::new(CsvCompartmentWriter::new(&output_file)?);

    let mut simulation = Simulation::configure(
        population,
        initial_sweeps,
        sweeps,
        model_parms.simulation,
        sink,
    )?;
    simulation.run_sweeps()?;
    info!("compartments written to {}", output_file.display());
    Ok(())
}
