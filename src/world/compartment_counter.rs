// Compartment counter ------------------------------------------------------------------------------
//
// live count of persons per infection status within one container (cell or microcell)

use super::InfectionStatus;
use crate::error::{Result, SimError};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompartmentCounter {
    counts: [usize; InfectionStatus::COUNT],
}

impl CompartmentCounter {
    pub fn new() -> CompartmentCounter {
        CompartmentCounter::default()
    }

    /// Every person starts out susceptible.
    pub fn initialize(&mut self, person_count: usize) {
        self.counts = [0; InfectionStatus::COUNT];
        self.counts[InfectionStatus::Susceptible.index()] = person_count;
    }

    /// Moves one person from `old` to `new`. Nothing changes when `old` is
    /// already empty.
    pub fn report(&mut self, old: InfectionStatus, new: InfectionStatus) -> Result<()> {
        if self.counts[old.index()] == 0 {
            return Err(SimError::invariant(format!(
                "no person left in compartment {} to move to {}",
                old, new
            )));
        }
        self.counts[old.index()] -= 1;
        self.counts[new.index()] += 1;
        Ok(())
    }

    pub fn count(&self, status: InfectionStatus) -> usize {
        self.counts[status.index()]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn number_infectious(&self) -> usize {
        InfectionStatus::ALL
            .iter()
            .filter(|s| s.is_infectious())
            .map(|s| self.count(*s))
            .sum()
    }

    /// Snapshot keyed in declaration order of the statuses.
    pub fn retrieve(&self) -> BTreeMap<InfectionStatus, usize> {
        InfectionStatus::ALL
            .iter()
            .map(|s| (*s, self.count(*s)))
            .collect()
    }
}
