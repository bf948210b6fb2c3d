// Toy population -------------------------------------------------------------------------------------------
//
// builds a synthetic population: cells on a square grid, people spread
// uniformly over the microcells, then grouped into households and places

use super::{CellId, MicrocellId, PersonId, PlaceType, Population};
use crate::error::{Result, SimError};
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

const MAX_AGE: f64 = 90.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ToyPopulation {
    pub population_size: usize,
    pub cell_number: usize,
    pub microcell_per_cell: usize,
    // households per microcell, only used when if_households is set
    pub household_number: usize,
    pub places_per_microcell: usize,
    pub if_households: bool,
}

impl Default for ToyPopulation {
    fn default() -> Self {
        ToyPopulation {
            population_size: 1000,
            cell_number: 4,
            microcell_per_cell: 4,
            household_number: 20,
            places_per_microcell: 1,
            if_households: true,
        }
    }
}

impl ToyPopulation {
    /// Creates the population and sets it up, ready for the initial sweeps.
    pub fn make_pop<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Population> {
        if self.cell_number == 0 || self.microcell_per_cell == 0 {
            return Err(SimError::validation(
                "a toy population needs at least one cell and one microcell per cell",
            ));
        }
        if self.if_households && self.household_number == 0 {
            return Err(SimError::validation(
                "household_number must be positive when households are enabled",
            ));
        }

        let mut population = Population::new();
        let side = (self.cell_number as f64).sqrt().ceil() as usize;
        let mut microcells: Vec<MicrocellId> = Vec::new();
        for i in 0..self.cell_number {
            let cell = population.add_cell_at(((i % side) as f64, (i / side) as f64))?;
            microcells.extend(population.add_microcells(cell, self.microcell_per_cell));
        }

        // equal-probability multinomial split of the people over the microcells
        let mut split = vec![0usize; microcells.len()];
        for _ in 0..self.population_size {
            split[rng.gen_range(0, microcells.len())] += 1;
        }
        for (microcell, count) in microcells.iter().zip(split.iter()) {
            for _ in 0..*count {
                let age = rng.gen_range(0.0, MAX_AGE);
                population.add_person(*microcell, age)?;
            }
        }

        for microcell in microcells.iter() {
            let persons: Vec<PersonId> = population.microcell(*microcell).persons().to_vec();
            if self.if_households {
                self.add_households(&mut population, *microcell, &persons, rng)?;
            } else {
                // one household each keeps the household sweep trivial
                for person in persons.iter() {
                    population.add_household(*microcell, &[*person])?;
                }
            }
            self.add_places(&mut population, *microcell, &persons, rng)?;
        }

        population.setup();
        debug!("toy population built: {}", population);
        Ok(population)
    }

    fn add_households<R: Rng + ?Sized>(
        &self,
        population: &mut Population,
        microcell: MicrocellId,
        persons: &[PersonId],
        rng: &mut R,
    ) -> Result<()> {
        let mut sizes = vec![0usize; self.household_number];
        for _ in 0..persons.len() {
            sizes[rng.gen_range(0, self.household_number)] += 1;
        }
        let mut next = 0;
        for size in sizes.into_iter().filter(|s| *s > 0) {
            population.add_household(microcell, &persons[next..next + size])?;
            next += size;
        }
        Ok(())
    }

    fn add_places<R: Rng + ?Sized>(
        &self,
        population: &mut Population,
        microcell: MicrocellId,
        persons: &[PersonId],
        rng: &mut R,
    ) -> Result<()> {
        let cell: CellId = microcell.cell;
        let location = population.cell(cell).location();
        for _ in 0..self.places_per_microcell {
            let place_type = *PlaceType::ALL
                .choose(rng)
                .ok_or_else(|| SimError::invariant("no place types defined"))?;
            let place = population.add_place(cell, microcell, location, place_type)?;
            let capacity = population.place(place).max_capacity;
            let members: Vec<PersonId> = persons
                .choose_multiple(rng, capacity.min(persons.len() / 2))
                .copied()
                .collect();
            for person in members {
                population.add_person_to_place(place, person);
            }
        }
        Ok(())
    }
}
