// Household ------------------------------------------------------------------------------------------------

use super::{HouseholdId, MicrocellId, PersonId};

#[derive(Debug, Clone)]
pub struct Household {
    id: HouseholdId,
    microcell: MicrocellId,
    pub(super) persons: Vec<PersonId>,
}

impl Household {
    pub(super) fn new(id: HouseholdId, microcell: MicrocellId) -> Household {
        Household {
            id,
            microcell,
            persons: Vec::new(),
        }
    }

    pub fn id(&self) -> HouseholdId {
        self.id
    }

    pub fn microcell(&self) -> MicrocellId {
        self.microcell
    }

    pub fn persons(&self) -> &[PersonId] {
        &self.persons
    }

    pub fn len(&self) -> usize {
        self.persons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }
}
