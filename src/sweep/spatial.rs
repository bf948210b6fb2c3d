// Spatial sweep --------------------------------------------------------------------------------------------
//
// infection between cells. Each cell with infectious people draws a Poisson
// number of events; each event picks an infector, a target cell weighted by
// distance and a random person in it

use super::household::infectious_in_cell;
use crate::error::{Result, SimError};
use crate::infection::SpatialInfection;
use crate::parameters::Parameters;
use crate::world::{CellId, Population};
use log::trace;
use rand::distributions::WeightedIndex;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{Distribution, Poisson};
use std::rc::Rc;

#[derive(Debug, Clone)]
struct Neighbours {
    cells: Vec<CellId>,
    weights: WeightedIndex<f64>,
}

#[derive(Debug, Clone)]
pub struct SpatialSweep {
    params: Rc<Parameters>,
    infection: SpatialInfection,
    // per cell, the other cells within the infection radius
    neighbours: Option<Vec<Option<Neighbours>>>,
}

impl SpatialSweep {
    pub fn new(params: Rc<Parameters>) -> SpatialSweep {
        SpatialSweep {
            infection: SpatialInfection::new(params.clone()),
            params,
            neighbours: None,
        }
    }

    /// Precomputes the candidate target cells of every cell, weighted by
    /// 1 / (1 + distance).
    pub fn bind_population(&mut self, population: &Population) -> Result<()> {
        let cells = population.cells();
        let mut all = Vec::with_capacity(cells.len());
        for source in cells.iter() {
            let (sx, sy) = source.location();
            let mut targets = Vec::new();
            let mut weights = Vec::new();
            for target in cells.iter().filter(|c| c.id() != source.id()) {
                let (tx, ty) = target.location();
                let distance = ((sx - tx).powi(2) + (sy - ty).powi(2)).sqrt();
                if distance <= self.params.infection_radius && !target.persons().is_empty() {
                    targets.push(target.id());
                    weights.push(1.0 / (1.0 + distance));
                }
            }
            if targets.is_empty() {
                all.push(None);
            } else {
                let weights = WeightedIndex::new(weights)
                    .map_err(|e| SimError::invariant(format!("spatial weights: {}", e)))?;
                all.push(Some(Neighbours {
                    cells: targets,
                    weights,
                }));
            }
        }
        self.neighbours = Some(all);
        Ok(())
    }

    pub fn invoke<R: Rng + ?Sized>(
        &mut self,
        population: &mut Population,
        time: f64,
        rng: &mut R,
    ) -> Result<()> {
        let neighbours = self
            .neighbours
            .as_ref()
            .ok_or_else(|| SimError::invariant("spatial sweep invoked before binding"))?;
        for (c, targets) in neighbours.iter().enumerate() {
            let targets = match targets {
                Some(t) => t,
                None => continue,
            };
            let cell = CellId(c);
            let expected = self.infection.cell_infectiousness(population, cell);
            if expected <= 0.0 {
                continue;
            }
            let poisson = Poisson::new(expected)
                .map_err(|e| SimError::invariant(format!("cell infectiousness: {:?}", e)))?;
            let events: u64 = poisson.sample(rng);
            let infectors = infectious_in_cell(population, cell);

            for _ in 0..events {
                let infector = match infectors.choose(rng) {
                    Some(p) => *p,
                    None => break,
                };
                let target = targets.cells[targets.weights.sample(rng)];
                let infectee = match population.cell(target).persons().choose(rng) {
                    Some(p) => *p,
                    None => continue,
                };
                if !population.person(infectee).is_susceptible() {
                    continue;
                }
                let force = self
                    .infection
                    .force_of_infection(population, infector, infectee, time);
                if rng.gen::<f64>() < force {
                    trace!("t={} spatial: {:?} -> {:?}", time, infector, infectee);
                    population.enqueue_person(infectee);
                }
            }
        }
        Ok(())
    }
}
