// Cell & Microcell -----------------------------------------------------------------------------------------
//
// a cell is the coarse spatial unit, split into microcells. Both keep a compartment
// counter; microcell reports cascade to the parent cell so the cell totals never
// need a rescan

use super::{CellId, CompartmentCounter, HouseholdId, InfectionStatus, MicrocellId, PersonId, PlaceId};
use crate::error::{Result, SimError};
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct Microcell {
    id: MicrocellId,
    pub(super) persons: Vec<PersonId>,
    pub(super) places: Vec<PlaceId>,
    pub(super) households: Vec<HouseholdId>,
    compartment_counter: CompartmentCounter,
    // intervention state
    pub closure_start_time: Option<f64>,
    pub distancing_start_time: Option<f64>,
}

impl Microcell {
    fn new(id: MicrocellId) -> Microcell {
        Microcell {
            id,
            persons: Vec::new(),
            places: Vec::new(),
            households: Vec::new(),
            compartment_counter: CompartmentCounter::new(),
            closure_start_time: None,
            distancing_start_time: None,
        }
    }

    pub fn id(&self) -> MicrocellId {
        self.id
    }

    /// the parent cell
    pub fn cell(&self) -> CellId {
        self.id.cell
    }

    pub fn persons(&self) -> &[PersonId] {
        &self.persons
    }

    pub fn places(&self) -> &[PlaceId] {
        &self.places
    }

    pub fn households(&self) -> &[HouseholdId] {
        &self.households
    }

    pub fn compartment_counter(&self) -> &CompartmentCounter {
        &self.compartment_counter
    }

    pub fn number_infectious(&self) -> usize {
        self.compartment_counter.number_infectious()
    }

    fn setup(&mut self) {
        self.compartment_counter.initialize(self.persons.len());
    }
}

#[derive(Debug, Clone)]
pub struct Cell {
    id: CellId,
    location: (f64, f64),
    microcells: Vec<Microcell>,
    // flat copies of everything in the microcells, for aggregate sweeps
    pub(super) persons: Vec<PersonId>,
    pub(super) places: Vec<PlaceId>,
    person_queue: VecDeque<PersonId>,
    compartment_counter: CompartmentCounter,
}

impl Cell {
    pub(super) fn new(id: CellId, location: (f64, f64)) -> Cell {
        Cell {
            id,
            location,
            microcells: Vec::new(),
            persons: Vec::new(),
            places: Vec::new(),
            person_queue: VecDeque::new(),
            compartment_counter: CompartmentCounter::new(),
        }
    }

    pub fn id(&self) -> CellId {
        self.id
    }

    pub fn location(&self) -> (f64, f64) {
        self.location
    }

    pub fn set_location(&mut self, location: (f64, f64)) -> Result<()> {
        validate_location(location)?;
        self.location = location;
        Ok(())
    }

    pub fn microcells(&self) -> &[Microcell] {
        &self.microcells
    }

    pub fn microcell(&self, index: usize) -> &Microcell {
        &self.microcells[index]
    }

    pub fn microcell_mut(&mut self, index: usize) -> &mut Microcell {
        &mut self.microcells[index]
    }

    pub fn persons(&self) -> &[PersonId] {
        &self.persons
    }

    pub fn places(&self) -> &[PlaceId] {
        &self.places
    }

    pub fn compartment_counter(&self) -> &CompartmentCounter {
        &self.compartment_counter
    }

    pub fn number_infectious(&self) -> usize {
        self.compartment_counter.number_infectious()
    }

    pub fn add_microcells(&mut self, n: usize) -> Vec<MicrocellId> {
        let mut ids = Vec::with_capacity(n);
        for _ in 0..n {
            let id = MicrocellId {
                cell: self.id,
                index: self.microcells.len(),
            };
            self.microcells.push(Microcell::new(id));
            ids.push(id);
        }
        ids
    }

    // add a person to end of step processing
    pub fn enqueue_person(&mut self, person: PersonId) {
        self.person_queue.push_back(person);
    }

    pub fn queue_len(&self) -> usize {
        self.person_queue.len()
    }

    pub fn dequeue_person(&mut self) -> Option<PersonId> {
        self.person_queue.pop_front()
    }

    pub(super) fn register_person(&mut self, microcell: usize, person: PersonId) {
        self.persons.push(person);
        self.microcells[microcell].persons.push(person);
    }

    pub(super) fn register_place(&mut self, microcell: usize, place: PlaceId) {
        self.places.push(place);
        self.microcells[microcell].places.push(place);
    }

    pub(super) fn register_household(&mut self, microcell: usize, household: HouseholdId) {
        self.microcells[microcell].households.push(household);
    }

    pub(super) fn setup(&mut self) {
        self.compartment_counter.initialize(self.persons.len());
        for microcell in self.microcells.iter_mut() {
            microcell.setup();
        }
    }

    // the only way the cell counter moves: through one of its microcells
    pub(super) fn notify_person_status_change(
        &mut self,
        microcell: usize,
        old_status: InfectionStatus,
        new_status: InfectionStatus,
    ) -> Result<()> {
        if self.compartment_counter.count(old_status) == 0 {
            return Err(SimError::invariant(format!(
                "cell {:?} has no {} person to change",
                self.id, old_status
            )));
        }
        self.microcells[microcell]
            .compartment_counter
            .report(old_status, new_status)?;
        self.compartment_counter.report(old_status, new_status)
    }
}

pub(super) fn validate_location(location: (f64, f64)) -> Result<()> {
    if location.0.is_finite() && location.1.is_finite() {
        Ok(())
    } else {
        Err(SimError::validation(format!(
            "location must be a pair of finite numbers, got {:?}",
            location
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell_with_people(microcells: usize, people_each: usize) -> Cell {
        let mut cell = Cell::new(CellId(0), (0.0, 0.0));
        cell.add_microcells(microcells);
        let mut next = 0;
        for m in 0..microcells {
            for _ in 0..people_each {
                cell.register_person(m, PersonId(next));
                next += 1;
            }
        }
        cell.setup();
        cell
    }

    #[test]
    fn microcells_know_their_cell() {
        let mut cell = Cell::new(CellId(4), (1.0, 2.0));
        let ids = cell.add_microcells(3);
        assert_eq!(ids.len(), 3);
        assert!(cell.microcells().iter().all(|m| m.cell() == CellId(4)));
        assert_eq!(cell.microcell(2).id().index, 2);
    }

    #[test]
    fn microcell_reports_cascade_to_cell() {
        let mut cell = cell_with_people(2, 3);
        cell.notify_person_status_change(1, InfectionStatus::Susceptible, InfectionStatus::Exposed)
            .unwrap();
        assert_eq!(cell.compartment_counter().count(InfectionStatus::Exposed), 1);
        assert_eq!(
            cell.microcell(1).compartment_counter().count(InfectionStatus::Exposed),
            1
        );
        assert_eq!(
            cell.microcell(0).compartment_counter().count(InfectionStatus::Exposed),
            0
        );
        assert_eq!(cell.compartment_counter().total(), 6);
    }

    #[test]
    fn failed_report_leaves_both_counters() {
        let mut cell = cell_with_people(1, 2);
        let result =
            cell.notify_person_status_change(0, InfectionStatus::InfectGP, InfectionStatus::Dead);
        assert!(result.is_err());
        assert_eq!(cell.compartment_counter().count(InfectionStatus::Susceptible), 2);
        assert_eq!(
            cell.microcell(0).compartment_counter().count(InfectionStatus::Susceptible),
            2
        );
    }

    #[test]
    fn queue_is_fifo() {
        let mut cell = cell_with_people(1, 0);
        cell.enqueue_person(PersonId(7));
        cell.enqueue_person(PersonId(2));
        assert_eq!(cell.queue_len(), 2);
        assert_eq!(cell.dequeue_person(), Some(PersonId(7)));
        assert_eq!(cell.dequeue_person(), Some(PersonId(2)));
        assert_eq!(cell.dequeue_person(), None);
    }

    #[test]
    fn malformed_location_is_rejected() {
        let mut cell = Cell::new(CellId(0), (0.0, 0.0));
        assert!(cell.set_location((f64::NAN, 1.0)).is_err());
        assert!(cell.set_location((2.0, f64::INFINITY)).is_err());
        cell.set_location((2.0, 3.0)).unwrap();
        assert_eq!(cell.location(), (2.0, 3.0));
    }
}
