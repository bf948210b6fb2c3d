// Place ----------------------------------------------------------------------------------------------------
//
// schools, workplaces, care homes ... where people meet outside their household

use super::{CellId, MicrocellId, PersonId, PlaceId};
use crate::error::{Result, SimError};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Hash, Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Serialize)]
pub enum PlaceType {
    PrimarySchool,
    SecondarySchool,
    University,
    Workplace,
    CareHome,
    Hotel,
}

impl PlaceType {
    pub const COUNT: usize = 6;
    pub const ALL: [PlaceType; PlaceType::COUNT] = [
        PlaceType::PrimarySchool,
        PlaceType::SecondarySchool,
        PlaceType::University,
        PlaceType::Workplace,
        PlaceType::CareHome,
        PlaceType::Hotel,
    ];

    /// position in place type indexed parameter tables
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for PlaceType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl FromStr for PlaceType {
    type Err = SimError;

    fn from_str(s: &str) -> Result<PlaceType> {
        PlaceType::ALL
            .iter()
            .find(|p| p.to_string() == s)
            .copied()
            .ok_or_else(|| SimError::validation(format!("unknown place type {}", s)))
    }
}

#[derive(Debug, Clone)]
pub struct Place {
    id: PlaceId,
    location: (f64, f64),
    place_type: PlaceType,
    cell: CellId,
    microcell: MicrocellId,
    pub max_capacity: usize,
    // baseline multipliers on transmission inside this place
    pub infectiousness: f64,
    pub susceptibility: f64,
    pub(super) persons: Vec<PersonId>,
}

impl Place {
    pub(super) fn new(
        id: PlaceId,
        location: (f64, f64),
        place_type: PlaceType,
        cell: CellId,
        microcell: MicrocellId,
    ) -> Result<Place> {
        if microcell.cell != cell {
            return Err(SimError::validation(format!(
                "microcell {:?} is not contained in cell {:?}",
                microcell, cell
            )));
        }
        Ok(Place {
            id,
            location,
            place_type,
            cell,
            microcell,
            max_capacity: 50,
            infectiousness: 1.0,
            susceptibility: 1.0,
            persons: Vec::new(),
        })
    }

    pub fn id(&self) -> PlaceId {
        self.id
    }

    pub fn location(&self) -> (f64, f64) {
        self.location
    }

    pub fn place_type(&self) -> PlaceType {
        self.place_type
    }

    pub fn cell(&self) -> CellId {
        self.cell
    }

    pub fn microcell(&self) -> MicrocellId {
        self.microcell
    }

    pub fn persons(&self) -> &[PersonId] {
        &self.persons
    }

    pub(super) fn add_person(&mut self, person: PersonId) -> bool {
        if self.persons.contains(&person) {
            return false;
        }
        self.persons.push(person);
        true
    }

    pub(super) fn remove_person(&mut self, person: PersonId) -> Result<()> {
        match self.persons.iter().position(|p| *p == person) {
            Some(index) => {
                self.persons.remove(index);
                Ok(())
            }
            None => Err(SimError::invariant(format!(
                "person {:?} not found in place {:?}",
                person, self.id
            ))),
        }
    }
}
