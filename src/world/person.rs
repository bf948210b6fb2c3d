// Person ---------------------------------------------------------------------------------------------------

use super::{HouseholdId, InfectionStatus, MicrocellId, PersonId, PlaceId};

/// number of five-year age bands, the last one being 80+
pub const AGE_GROUP_COUNT: usize = 17;

#[derive(Debug, Clone)]
pub struct Person {
    id: PersonId,
    microcell: MicrocellId,
    pub age: f64,
    pub susceptibility: f64,
    pub infectiousness: f64,
    // magnitude drawn at infectious onset, scaled each step by the profile
    pub initial_infectiousness: f64,
    pub(super) infection_status: InfectionStatus,
    pub next_infection_status: Option<InfectionStatus>,
    // None: susceptible and unscheduled, +inf: no further transition
    pub time_of_status_change: Option<f64>,
    pub infection_start_time: Option<f64>,
    pub(super) household: Option<HouseholdId>,
    pub(super) places: Vec<PlaceId>,
    pub care_home_resident: bool,
    // intervention state
    pub isolation_start_time: Option<f64>,
    pub quarantine_start_time: Option<f64>,
    pub distancing_enhanced: bool,
    pub date_vaccinated: Option<f64>,
}

impl Person {
    pub(super) fn new(id: PersonId, microcell: MicrocellId, age: f64) -> Person {
        Person {
            id,
            microcell,
            age,
            susceptibility: 1.0,
            infectiousness: 0.0,
            initial_infectiousness: 0.0,
            infection_status: InfectionStatus::Susceptible,
            next_infection_status: None,
            time_of_status_change: None,
            infection_start_time: None,
            household: None,
            places: Vec::new(),
            care_home_resident: false,
            isolation_start_time: None,
            quarantine_start_time: None,
            distancing_enhanced: false,
            date_vaccinated: None,
        }
    }

    pub fn id(&self) -> PersonId {
        self.id
    }

    pub fn microcell(&self) -> MicrocellId {
        self.microcell
    }

    pub fn household(&self) -> Option<HouseholdId> {
        self.household
    }

    pub fn places(&self) -> &[PlaceId] {
        &self.places
    }

    pub fn infection_status(&self) -> InfectionStatus {
        self.infection_status
    }

    pub fn is_susceptible(&self) -> bool {
        self.infection_status == InfectionStatus::Susceptible
    }

    pub fn is_infectious(&self) -> bool {
        self.infection_status.is_infectious()
    }

    pub fn is_symptomatic(&self) -> bool {
        self.infection_status.is_symptomatic()
    }

    /// Five-year band used to index age dependent tables.
    pub fn age_group(&self) -> usize {
        let group = (self.age.max(0.0) / 5.0).floor() as usize;
        group.min(AGE_GROUP_COUNT - 1)
    }
}
