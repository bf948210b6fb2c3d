/////////////////////////////////////////////////////////////////////////////////////
//
// Outbreak model
//
// simulation module
//
// the main loop: bind the sweeps, run the initial sweeps, then every step
// sweep at each timestep, writing compartment totals as it goes
//
////////////////////////////////////////////////////////////////////////////////////

use crate::error::{Result, SimError};
use crate::parameters::SimulationParams;
use crate::stats::OutputSink;
use crate::sweep::{InitialSweep, Sweep};
use crate::utilities::seeded_rng;
use crate::world::Population;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

pub struct Simulation {
    population: Population,
    initial_sweeps: Vec<InitialSweep>,
    sweeps: Vec<Sweep>,
    sim_params: SimulationParams,
    sink: Box<dyn OutputSink>,
    rng: StdRng,
}

impl Simulation {
    /// Binds every sweep to the population and seeds the rng if a seed is
    /// configured, otherwise from entropy.
    pub fn configure(
        population: Population,
        initial_sweeps: Vec<InitialSweep>,
        sweeps: Vec<Sweep>,
        sim_params: SimulationParams,
        sink: Box<dyn OutputSink>,
    ) -> Result<Simulation> {
        if !population.is_setup() {
            return Err(SimError::invariant(
                "population must be set up before configuring a simulation",
            ));
        }
        if sim_params.simulation_end_time < sim_params.simulation_start_time {
            return Err(SimError::validation(format!(
                "simulation ends at {} before it starts at {}",
                sim_params.simulation_end_time, sim_params.simulation_start_time
            )));
        }
        let rng = seeded_rng(sim_params.simulation_seed);
        let mut simulation = Simulation {
            population,
            initial_sweeps,
            sweeps,
            sim_params,
            sink,
            rng,
        };
        for sweep in simulation.initial_sweeps.iter_mut() {
            sweep.bind_population(&simulation.population)?;
        }
        for sweep in simulation.sweeps.iter_mut() {
            sweep.bind_population(&simulation.population)?;
        }
        Ok(simulation)
    }

    /// Reseeds the rng; runs with the same seed draw the same numbers.
    pub fn set_random_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn run_sweeps(&mut self) -> Result<()> {
        let start = self.sim_params.simulation_start_time;
        let end = self.sim_params.simulation_end_time;
        info!("running from t={} to t={}: {}", start, end, self.population);

        for sweep in self.initial_sweeps.iter_mut() {
            debug!("initial sweep {}", sweep.name());
            sweep.invoke(&mut self.population, &self.sim_params, &mut self.rng)?;
        }
        self.write_to_file(start)?;

        let mut time = start + 1.0;
        while time < end {
            for sweep in self.sweeps.iter_mut() {
                sweep.invoke(&mut self.population, time, &mut self.rng)?;
            }
            self.write_to_file(time)?;
            debug!(
                "t={} infectious={}",
                time,
                self.population.number_infectious()
            );
            time += 1.0;
        }
        info!("simulation finished at t={}", time - 1.0);
        Ok(())
    }

    pub fn write_to_file(&mut self, time: f64) -> Result<()> {
        let counts = self.population.compartment_totals();
        self.sink.write(time, &counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::Parameters;
    use crate::stats::{CompartmentRecord, MemorySink};
    use crate::sweep::default_sweeps;
    use crate::world::{InfectionStatus, ToyPopulation};
    use std::cell::RefCell;
    use std::collections::BTreeMap;
    use std::rc::Rc;

    // keeps the records reachable after the simulation takes the sink
    struct SharedSink(Rc<RefCell<Vec<CompartmentRecord>>>);

    impl OutputSink for SharedSink {
        fn write(&mut self, time: f64, counts: &BTreeMap<InfectionStatus, usize>) -> Result<()> {
            self.0.borrow_mut().push(CompartmentRecord::new(time, counts));
            Ok(())
        }
    }

    fn run(seed: u64) -> Vec<CompartmentRecord> {
        let params = Rc::new(Parameters::default());
        let toy = ToyPopulation {
            population_size: 300,
            cell_number: 4,
            microcell_per_cell: 2,
            household_number: 10,
            places_per_microcell: 1,
            if_households: true,
        };
        let mut rng = StdRng::seed_from_u64(seed);
        let population = toy.make_pop(&mut rng).unwrap();
        let (initial, sweeps) = default_sweeps(params).unwrap();
        let sim_params = SimulationParams {
            simulation_start_time: 0.0,
            simulation_end_time: 30.0,
            initial_infected_number: 5,
            simulation_seed: Some(seed),
            ..SimulationParams::default()
        };
        let records = Rc::new(RefCell::new(Vec::new()));
        let sink = Box::new(SharedSink(records.clone()));
        let mut simulation =
            Simulation::configure(population, initial, sweeps, sim_params, sink).unwrap();
        simulation.run_sweeps().unwrap();
        let out = records.borrow().clone();
        out
    }

    #[test]
    fn one_snapshot_per_step_and_people_are_conserved() {
        let records = run(12);
        assert_eq!(records.len(), 30);
        assert_eq!(records[0].time, 0.0);
        assert_eq!(records[29].time, 29.0);
        assert_eq!(records[0].infect_mild, 5);
        assert!(records.iter().all(|r| r.total() == 300));
    }

    #[test]
    fn same_seed_same_epidemic() {
        assert_eq!(run(5), run(5));
    }

    #[test]
    fn end_before_start_is_rejected() {
        let mut population = Population::new();
        population.setup();
        let sim_params = SimulationParams {
            simulation_start_time: 5.0,
            simulation_end_time: 1.0,
            ..SimulationParams::default()
        };
        let sink = Box::new(MemorySink::new());
        assert!(Simulation::configure(population, Vec::new(), Vec::new(), sim_params, sink).is_err());
    }
}
