/////////////////////////////////////////////////////////////////////////////////////
//
// Outbreak model
//
// world module
//
// the world is a population of cells, each cell split into microcells.
// people live in a microcell, optionally share a household and visit places.
// the population owns every person, place and household; everything else
// refers to them through integer handles
//
////////////////////////////////////////////////////////////////////////////////////

mod cell;
mod compartment_counter;
mod household;
mod person;
mod place;
mod toy_population;

pub use cell::{Cell, Microcell};
pub use compartment_counter::CompartmentCounter;
pub use household::Household;
pub use person::{Person, AGE_GROUP_COUNT};
pub use place::{Place, PlaceType};
pub use toy_population::ToyPopulation;

use crate::error::{Result, SimError};
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::str::FromStr;

// Infection status -----------------------------------------------------------------------------------------
#[derive(Hash, Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Serialize)]
pub enum InfectionStatus {
    Susceptible,
    Exposed,
    InfectASympt,
    InfectMild,
    InfectGP,
    InfectHosp,
    InfectICU,
    InfectICURecov,
    Recovered,
    Dead,
}

impl InfectionStatus {
    pub const COUNT: usize = 10;
    pub const ALL: [InfectionStatus; InfectionStatus::COUNT] = [
        InfectionStatus::Susceptible,
        InfectionStatus::Exposed,
        InfectionStatus::InfectASympt,
        InfectionStatus::InfectMild,
        InfectionStatus::InfectGP,
        InfectionStatus::InfectHosp,
        InfectionStatus::InfectICU,
        InfectionStatus::InfectICURecov,
        InfectionStatus::Recovered,
        InfectionStatus::Dead,
    ];

    /// row / column used in the transition matrices
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_infectious(self) -> bool {
        matches!(
            self,
            InfectionStatus::InfectASympt
                | InfectionStatus::InfectMild
                | InfectionStatus::InfectGP
                | InfectionStatus::InfectHosp
                | InfectionStatus::InfectICU
                | InfectionStatus::InfectICURecov
        )
    }

    pub fn is_symptomatic(self) -> bool {
        self.is_infectious() && self != InfectionStatus::InfectASympt
    }

    // the statuses reached straight out of the latent period
    pub fn is_onset(self) -> bool {
        matches!(
            self,
            InfectionStatus::InfectASympt | InfectionStatus::InfectMild | InfectionStatus::InfectGP
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, InfectionStatus::Recovered | InfectionStatus::Dead)
    }
}

impl fmt::Display for InfectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl FromStr for InfectionStatus {
    type Err = SimError;

    fn from_str(s: &str) -> Result<InfectionStatus> {
        InfectionStatus::ALL
            .iter()
            .find(|status| status.to_string() == s)
            .copied()
            .ok_or_else(|| SimError::validation(format!("unknown infection status {}", s)))
    }
}

// Handles --------------------------------------------------------------------------------------------------
#[derive(Hash, Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub struct PersonId(pub usize);

#[derive(Hash, Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub struct CellId(pub usize);

#[derive(Hash, Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub struct MicrocellId {
    pub cell: CellId,
    pub index: usize,
}

#[derive(Hash, Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub struct PlaceId(pub usize);

#[derive(Hash, Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub struct HouseholdId(pub usize);

// Population -----------------------------------------------------------------------------------------------
#[derive(Debug, Default)]
pub struct Population {
    cells: Vec<Cell>,
    persons: Vec<Person>,
    places: Vec<Place>,
    households: Vec<Household>,
    // persons waiting for a vaccine, highest priority first
    vaccine_queue: VecDeque<PersonId>,
    is_setup: bool,
}

impl Population {
    pub fn new() -> Population {
        Population::default()
    }

    pub fn add_cells(&mut self, n: usize) -> Vec<CellId> {
        (0..n)
            .map(|_| {
                let id = CellId(self.cells.len());
                self.cells.push(Cell::new(id, (0.0, 0.0)));
                id
            })
            .collect()
    }

    pub fn add_cell_at(&mut self, location: (f64, f64)) -> Result<CellId> {
        cell::validate_location(location)?;
        let id = CellId(self.cells.len());
        self.cells.push(Cell::new(id, location));
        Ok(id)
    }

    pub fn add_microcells(&mut self, cell: CellId, n: usize) -> Vec<MicrocellId> {
        self.cells[cell.0].add_microcells(n)
    }

    pub fn add_people(&mut self, microcell: MicrocellId, n: usize) -> Result<Vec<PersonId>> {
        (0..n).map(|_| self.add_person(microcell, 0.0)).collect()
    }

    /// People can only be added before `setup` seeds the counters.
    pub fn add_person(&mut self, microcell: MicrocellId, age: f64) -> Result<PersonId> {
        if self.is_setup {
            return Err(SimError::invariant(
                "people must be added before the population is set up",
            ));
        }
        let id = PersonId(self.persons.len());
        self.persons.push(Person::new(id, microcell, age));
        self.cells[microcell.cell.0].register_person(microcell.index, id);
        Ok(id)
    }

    pub fn add_place(
        &mut self,
        cell: CellId,
        microcell: MicrocellId,
        location: (f64, f64),
        place_type: PlaceType,
    ) -> Result<PlaceId> {
        cell::validate_location(location)?;
        let id = PlaceId(self.places.len());
        let place = Place::new(id, location, place_type, cell, microcell)?;
        self.places.push(place);
        self.cells[cell.0].register_place(microcell.index, id);
        Ok(id)
    }

    pub fn add_person_to_place(&mut self, place: PlaceId, person: PersonId) {
        if self.places[place.0].add_person(person) {
            self.persons[person.0].places.push(place);
        }
    }

    pub fn remove_person_from_place(&mut self, place: PlaceId, person: PersonId) -> Result<()> {
        self.places[place.0].remove_person(person)?;
        self.persons[person.0].places.retain(|p| *p != place);
        Ok(())
    }

    pub fn empty_place(&mut self, place: PlaceId) -> Result<()> {
        while let Some(person) = self.places[place.0].persons.first().copied() {
            self.remove_person_from_place(place, person)?;
        }
        Ok(())
    }

    /// Groups `members` into a new household. Every member must live in
    /// `microcell` and not belong to another household yet.
    pub fn add_household(
        &mut self,
        microcell: MicrocellId,
        members: &[PersonId],
    ) -> Result<HouseholdId> {
        for member in members {
            let person = &self.persons[member.0];
            if person.microcell() != microcell {
                return Err(SimError::invariant(format!(
                    "person {:?} does not live in microcell {:?}",
                    member, microcell
                )));
            }
            if person.household.is_some() {
                return Err(SimError::validation(format!(
                    "person {:?} already belongs to a household",
                    member
                )));
            }
        }
        let id = HouseholdId(self.households.len());
        let mut household = Household::new(id, microcell);
        for member in members {
            household.persons.push(*member);
            self.persons[member.0].household = Some(id);
        }
        self.households.push(household);
        self.cells[microcell.cell.0].register_household(microcell.index, id);
        Ok(id)
    }

    /// Seeds every compartment counter. Must run once all people are added
    /// and before any status changes.
    pub fn setup(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.setup();
        }
        self.is_setup = true;
    }

    pub fn is_setup(&self) -> bool {
        self.is_setup
    }

    // accessors
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, id: CellId) -> &Cell {
        &self.cells[id.0]
    }

    pub fn cell_mut(&mut self, id: CellId) -> &mut Cell {
        &mut self.cells[id.0]
    }

    pub fn microcell(&self, id: MicrocellId) -> &Microcell {
        self.cells[id.cell.0].microcell(id.index)
    }

    pub fn microcell_mut(&mut self, id: MicrocellId) -> &mut Microcell {
        self.cells[id.cell.0].microcell_mut(id.index)
    }

    pub fn persons(&self) -> &[Person] {
        &self.persons
    }

    /// handles of every person, detached from the population borrow
    pub fn person_ids(&self) -> impl Iterator<Item = PersonId> {
        (0..self.persons.len()).map(PersonId)
    }

    pub fn microcell_ids(&self) -> Vec<MicrocellId> {
        self.cells
            .iter()
            .flat_map(|c| c.microcells().iter().map(|m| m.id()))
            .collect()
    }

    pub fn person(&self, id: PersonId) -> &Person {
        &self.persons[id.0]
    }

    pub fn person_mut(&mut self, id: PersonId) -> &mut Person {
        &mut self.persons[id.0]
    }

    pub fn places(&self) -> &[Place] {
        &self.places
    }

    pub fn place(&self, id: PlaceId) -> &Place {
        &self.places[id.0]
    }

    pub fn place_mut(&mut self, id: PlaceId) -> &mut Place {
        &mut self.places[id.0]
    }

    pub fn households(&self) -> &[Household] {
        &self.households
    }

    pub fn household(&self, id: HouseholdId) -> &Household {
        &self.households[id.0]
    }

    pub fn total_people(&self) -> usize {
        self.persons.len()
    }

    /// microcell of a person, which is where intervention state lives
    pub fn microcell_of(&self, person: PersonId) -> &Microcell {
        self.microcell(self.persons[person.0].microcell())
    }

    pub fn susceptible_household_members(&self, household: HouseholdId) -> Vec<PersonId> {
        self.households[household.0]
            .persons()
            .iter()
            .filter(|p| self.persons[p.0].is_susceptible())
            .copied()
            .collect()
    }

    /// Changes a person's status and moves them between compartments of
    /// their microcell, and through it their cell.
    pub fn update_status(&mut self, person: PersonId, new_status: InfectionStatus) -> Result<()> {
        if !self.is_setup {
            return Err(SimError::invariant(
                "population must be set up before statuses change",
            ));
        }
        let (old_status, microcell) = {
            let p = &self.persons[person.0];
            (p.infection_status, p.microcell())
        };
        self.cells[microcell.cell.0].notify_person_status_change(
            microcell.index,
            old_status,
            new_status,
        )?;
        self.persons[person.0].infection_status = new_status;
        Ok(())
    }

    /// Queues a person on their own cell for end of step processing.
    pub fn enqueue_person(&mut self, person: PersonId) {
        let cell = self.persons[person.0].microcell().cell;
        self.cells[cell.0].enqueue_person(person);
    }

    pub fn number_infectious(&self) -> usize {
        self.cells.iter().map(|c| c.number_infectious()).sum()
    }

    /// Population wide compartment counts, aggregated from the cell counters.
    pub fn compartment_totals(&self) -> BTreeMap<InfectionStatus, usize> {
        let mut totals: BTreeMap<InfectionStatus, usize> =
            InfectionStatus::ALL.iter().map(|s| (*s, 0)).collect();
        for cell in self.cells.iter() {
            for (status, count) in cell.compartment_counter().retrieve() {
                *totals.entry(status).or_insert(0) += count;
            }
        }
        totals
    }

    pub fn vaccine_queue(&self) -> &VecDeque<PersonId> {
        &self.vaccine_queue
    }

    pub fn vaccine_queue_mut(&mut self) -> &mut VecDeque<PersonId> {
        &mut self.vaccine_queue
    }
}

impl fmt::Display for Population {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Population with {} cells, {} people, {} places and {} households",
            self.cells.len(),
            self.persons.len(),
            self.places.len(),
            self.households.len()
        )
    }
}
