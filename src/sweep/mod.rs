/////////////////////////////////////////////////////////////////////////////////////
//
// Outbreak model
//
// sweep module
//
// a sweep is one pass over the population doing one kind of update. The
// simulation runs the initial sweeps once, then every step sweep in order at
// each timestep. Infection sweeps only queue people on their cell; the queue
// sweep, last in the step, is what actually exposes them
//
////////////////////////////////////////////////////////////////////////////////////

mod host_progression;
mod household;
mod initial_infected;
mod initial_vaccine_queue;
mod intervention;
mod place;
mod queue;
mod spatial;

pub use host_progression::HostProgressionSweep;
pub use household::HouseholdSweep;
pub use initial_infected::InitialInfectedSweep;
pub use initial_vaccine_queue::InitialVaccineQueueSweep;
pub use intervention::InterventionSweep;
pub use place::PlaceSweep;
pub use queue::QueueSweep;
pub use spatial::SpatialSweep;

use crate::disease::HostProgression;
use crate::error::Result;
use crate::parameters::{Parameters, SimulationParams};
use crate::world::Population;
use rand::Rng;
use std::rc::Rc;

// Step sweeps ----------------------------------------------------------------------------------------------
#[derive(Debug)]
pub enum Sweep {
    Household(HouseholdSweep),
    Place(PlaceSweep),
    Spatial(SpatialSweep),
    Intervention(InterventionSweep),
    HostProgression(HostProgressionSweep),
    Queue(QueueSweep),
}

impl Sweep {
    pub fn name(&self) -> &'static str {
        match self {
            Sweep::Household(_) => "household",
            Sweep::Place(_) => "place",
            Sweep::Spatial(_) => "spatial",
            Sweep::Intervention(_) => "intervention",
            Sweep::HostProgression(_) => "host_progression",
            Sweep::Queue(_) => "queue",
        }
    }

    /// One time set up against the population the sweep will run on.
    pub fn bind_population(&mut self, population: &Population) -> Result<()> {
        match self {
            Sweep::Spatial(s) => s.bind_population(population),
            Sweep::Intervention(s) => s.bind_population(population),
            _ => Ok(()),
        }
    }

    pub fn invoke<R: Rng>(&mut self, population: &mut Population, time: f64, rng: &mut R) -> Result<()> {
        match self {
            Sweep::Household(s) => s.invoke(population, time, rng),
            Sweep::Place(s) => s.invoke(population, time, rng),
            Sweep::Spatial(s) => s.invoke(population, time, rng),
            Sweep::Intervention(s) => s.invoke(population, time, rng),
            Sweep::HostProgression(s) => s.invoke(population, time, rng),
            Sweep::Queue(s) => s.invoke(population, time, rng),
        }
    }
}

// Initial sweeps -------------------------------------------------------------------------------------------
#[derive(Debug)]
pub enum InitialSweep {
    InitialInfected(InitialInfectedSweep),
    InitialVaccineQueue(InitialVaccineQueueSweep),
}

impl InitialSweep {
    pub fn name(&self) -> &'static str {
        match self {
            InitialSweep::InitialInfected(_) => "initial_infected",
            InitialSweep::InitialVaccineQueue(_) => "initial_vaccine_queue",
        }
    }

    pub fn bind_population(&mut self, _population: &Population) -> Result<()> {
        Ok(())
    }

    pub fn invoke<R: Rng>(
        &mut self,
        population: &mut Population,
        sim_params: &SimulationParams,
        rng: &mut R,
    ) -> Result<()> {
        match self {
            InitialSweep::InitialInfected(s) => s.invoke(population, sim_params, rng),
            InitialSweep::InitialVaccineQueue(s) => s.invoke(population, rng),
        }
    }
}

/// The standard sweep line up: seeding and vaccine queue first, then per step
/// household, place, spatial, interventions, progression and queue.
pub fn default_sweeps(params: Rc<Parameters>) -> Result<(Vec<InitialSweep>, Vec<Sweep>)> {
    let progression = Rc::new(HostProgression::new(params.clone())?);
    let initial = vec![
        InitialSweep::InitialInfected(InitialInfectedSweep::new(progression.clone())),
        InitialSweep::InitialVaccineQueue(InitialVaccineQueueSweep::new(params.clone())),
    ];
    let sweeps = vec![
        Sweep::Household(HouseholdSweep::new(params.clone())),
        Sweep::Place(PlaceSweep::new(params.clone())),
        Sweep::Spatial(SpatialSweep::new(params.clone())),
        Sweep::Intervention(InterventionSweep::new(params)),
        Sweep::HostProgression(HostProgressionSweep::new(progression.clone())),
        Sweep::Queue(QueueSweep::new(progression)),
    ];
    Ok((initial, sweeps))
}
