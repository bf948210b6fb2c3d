// Host progression -----------------------------------------------------------------------------------------
//
// moves one person through the disease state machine. Each status change
// draws the next status, then the time it will be reached

use super::{InfectiousnessProfile, StateTransitionMatrix, TransitionTimeMatrix};
use crate::error::{Result, SimError};
use crate::parameters::Parameters;
use crate::world::{InfectionStatus, Person, PersonId, Population};
use log::trace;
use rand::Rng;
use rand_distr::{Distribution, Gamma};
use std::rc::Rc;

#[derive(Debug, Clone)]
pub struct HostProgression {
    params: Rc<Parameters>,
    state_transition: StateTransitionMatrix,
    transition_time: TransitionTimeMatrix,
    profile: InfectiousnessProfile,
    // symptom onset lag, in whole timesteps
    delay: f64,
    onset_gamma: Gamma<f64>,
}

impl HostProgression {
    pub fn new(params: Rc<Parameters>) -> Result<HostProgression> {
        let mut state_transition = StateTransitionMatrix::default();
        for (from, to, p) in params.state_transition.iter() {
            state_transition.update_probability(*from, *to, *p)?;
        }
        state_transition.validate()?;
        let transition_time = TransitionTimeMatrix::from_params(&params.transition_times)?;
        HostProgression::with_matrices(params, state_transition, transition_time)
    }

    pub fn with_matrices(
        params: Rc<Parameters>,
        state_transition: StateTransitionMatrix,
        transition_time: TransitionTimeMatrix,
    ) -> Result<HostProgression> {
        let profile = InfectiousnessProfile::new(
            &params.infectiousness_prof,
            params.asympt_infect_period,
            params.model_time_step(),
        )?;
        let delay = (params.latent_to_sympt_delay / params.model_time_step()).floor();
        let onset_gamma = Gamma::new(1.0, 1.0)
            .map_err(|e| SimError::invariant(format!("onset infectiousness: {:?}", e)))?;
        Ok(HostProgression {
            params,
            state_transition,
            transition_time,
            profile,
            delay,
            onset_gamma,
        })
    }

    pub fn state_transition(&self) -> &StateTransitionMatrix {
        &self.state_transition
    }

    /// Draws the infectiousness a person carries into an onset status and
    /// marks the start of their infection.
    pub fn set_infectiousness<R: Rng + ?Sized>(
        &self,
        person: &mut Person,
        time: f64,
        rng: &mut R,
    ) -> Result<()> {
        if time < 0.0 {
            return Err(SimError::invariant("infection start time cannot be negative"));
        }
        let baseline = match person.infection_status() {
            InfectionStatus::InfectASympt => self.params.asympt_infectiousness,
            InfectionStatus::InfectMild | InfectionStatus::InfectGP => {
                self.params.sympt_infectiousness
            }
            other => {
                return Err(SimError::invariant(format!(
                    "{} is not an infectious onset status",
                    other
                )))
            }
        };
        person.initial_infectiousness = self.onset_gamma.sample(rng) * baseline;
        person.infectiousness = person.initial_infectiousness;
        person.infection_start_time = Some(time);
        Ok(())
    }

    pub fn update_next_infection_status<R: Rng + ?Sized>(
        &self,
        person: &mut Person,
        rng: &mut R,
    ) -> Result<()> {
        person.next_infection_status = self
            .state_transition
            .next_status(person.infection_status(), rng)?;
        Ok(())
    }

    /// Schedules the departure from the current status. Terminal statuses
    /// never leave.
    pub fn update_time_status_change<R: Rng + ?Sized>(
        &self,
        person: &mut Person,
        time: f64,
        rng: &mut R,
    ) -> Result<()> {
        let status = person.infection_status();
        let transition = if status.is_terminal() {
            f64::INFINITY
        } else {
            let next = person.next_infection_status.ok_or_else(|| {
                SimError::invariant(format!("person {:?} has no next status", person.id()))
            })?;
            self.transition_time
                .get(status, next)
                .choose(self.params.time_steps_per_day, rng)?
        };
        let mut start = time;
        if status == InfectionStatus::InfectMild || status == InfectionStatus::InfectGP {
            start += self.delay;
        }
        person.time_of_status_change = Some(start + transition);
        Ok(())
    }

    /// Scales the onset infectiousness by the profile, or clears it once the
    /// infection is over.
    pub fn update_infectiousness(&self, person: &mut Person, time: f64) -> Result<()> {
        if person.is_infectious() {
            let start = person.infection_start_time.ok_or_else(|| {
                SimError::invariant(format!(
                    "infectious person {:?} has no infection start time",
                    person.id()
                ))
            })?;
            let steps = (time - start).max(0.0) as usize;
            person.infectiousness = person.initial_infectiousness * self.profile.scale(steps);
        } else if person.infection_status().is_terminal() {
            person.infectiousness = 0.0;
            person.infection_start_time = None;
        }
        Ok(())
    }

    /// Applies every transition of `id` that is due by `time`.
    pub fn advance<R: Rng + ?Sized>(
        &self,
        population: &mut Population,
        id: PersonId,
        time: f64,
        rng: &mut R,
    ) -> Result<()> {
        let person = population.person(id);
        match person.time_of_status_change {
            None if person.is_susceptible() => return Ok(()),
            None => {
                return Err(SimError::invariant(format!(
                    "person {:?} is {} but has no scheduled transition",
                    id,
                    person.infection_status()
                )))
            }
            Some(_) => (),
        }

        // a person visits each status at most once per step unless zero
        // length transitions form a cycle
        let mut transitions = 0;
        while population
            .person(id)
            .time_of_status_change
            .map_or(false, |t| t <= time)
        {
            if transitions >= InfectionStatus::COUNT {
                return Err(SimError::invariant(format!(
                    "person {:?} made {} transitions at t={}, zero length transitions form a cycle",
                    id, transitions, time
                )));
            }
            transitions += 1;
            let next = population.person(id).next_infection_status.ok_or_else(|| {
                SimError::invariant(format!("person {:?} is due but has no next status", id))
            })?;
            population.update_status(id, next)?;
            trace!("t={} person {:?} -> {}", time, id, next);
            let person = population.person_mut(id);
            if next.is_onset() {
                self.set_infectiousness(person, time, rng)?;
            }
            self.update_next_infection_status(person, rng)?;
            self.update_time_status_change(person, time, rng)?;
        }
        self.update_infectiousness(population.person_mut(id), time)
    }

    /// Susceptible -> Exposed, with the onset scheduled. Returns false if the
    /// person was no longer susceptible.
    pub fn expose<R: Rng + ?Sized>(
        &self,
        population: &mut Population,
        id: PersonId,
        time: f64,
        rng: &mut R,
    ) -> Result<bool> {
        if !population.person(id).is_susceptible() {
            return Ok(false);
        }
        population.update_status(id, InfectionStatus::Exposed)?;
        let person = population.person_mut(id);
        self.update_next_infection_status(person, rng)?;
        self.update_time_status_change(person, time, rng)?;
        Ok(true)
    }

    /// Puts a person straight into `status`, used to seed the epidemic.
    pub fn infect<R: Rng + ?Sized>(
        &self,
        population: &mut Population,
        id: PersonId,
        status: InfectionStatus,
        time: f64,
        rng: &mut R,
    ) -> Result<()> {
        population.update_status(id, status)?;
        let person = population.person_mut(id);
        if status.is_onset() {
            self.set_infectiousness(person, time, rng)?;
        }
        self.update_next_infection_status(person, rng)?;
        self.update_time_status_change(person, time, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::MicrocellId;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn population(n: usize) -> (Population, Vec<PersonId>) {
        let mut population = Population::new();
        let cell = population.add_cells(1)[0];
        let microcell: MicrocellId = population.add_microcells(cell, 1)[0];
        let persons = population.add_people(microcell, n).unwrap();
        population.setup();
        (population, persons)
    }

    fn delayed_params() -> Rc<Parameters> {
        Rc::new(Parameters {
            latent_to_sympt_delay: 1.0,
            ..Parameters::default()
        })
    }

    #[test]
    fn exposed_to_mild_gets_infectiousness_and_a_future_change() {
        let progression = HostProgression::new(delayed_params()).unwrap();
        let (mut population, persons) = population(1);
        let id = persons[0];
        let mut rng = StdRng::seed_from_u64(8);
        population.update_status(id, InfectionStatus::Exposed).unwrap();
        {
            let person = population.person_mut(id);
            person.next_infection_status = Some(InfectionStatus::InfectMild);
            person.time_of_status_change = Some(5.0);
        }
        progression.advance(&mut population, id, 5.0, &mut rng).unwrap();

        let person = population.person(id);
        assert_eq!(person.infection_status(), InfectionStatus::InfectMild);
        assert!(person.infectiousness > 0.0);
        assert_eq!(person.infection_start_time, Some(5.0));
        assert!(person.time_of_status_change.unwrap() > 5.0);
        assert_eq!(person.next_infection_status, Some(InfectionStatus::Recovered));
    }

    #[test]
    fn terminal_person_is_never_revisited() {
        let progression = HostProgression::new(delayed_params()).unwrap();
        let (mut population, persons) = population(1);
        let id = persons[0];
        let mut rng = StdRng::seed_from_u64(8);
        population.update_status(id, InfectionStatus::InfectASympt).unwrap();
        {
            let person = population.person_mut(id);
            person.infection_start_time = Some(0.0);
            person.initial_infectiousness = 1.0;
            person.next_infection_status = Some(InfectionStatus::Recovered);
            person.time_of_status_change = Some(2.0);
        }
        progression.advance(&mut population, id, 2.0, &mut rng).unwrap();
        {
            let person = population.person(id);
            assert_eq!(person.infection_status(), InfectionStatus::Recovered);
            assert_eq!(person.time_of_status_change, Some(f64::INFINITY));
            assert_eq!(person.next_infection_status, None);
            assert_eq!(person.infectiousness, 0.0);
            assert_eq!(person.infection_start_time, None);
        }
        for t in 3..50 {
            progression
                .advance(&mut population, id, t as f64, &mut rng)
                .unwrap();
            assert_eq!(
                population.person(id).infection_status(),
                InfectionStatus::Recovered
            );
        }
        assert_eq!(
            population
                .cell(population.cells()[0].id())
                .compartment_counter()
                .count(InfectionStatus::Recovered),
            1
        );
    }

    #[test]
    fn scheduled_times_never_go_backwards() {
        let progression = HostProgression::new(delayed_params()).unwrap();
        let (mut population, persons) = population(20);
        let mut rng = StdRng::seed_from_u64(21);
        for id in persons.iter() {
            progression
                .infect(&mut population, *id, InfectionStatus::InfectMild, 0.0, &mut rng)
                .unwrap();
        }
        let mut last: Vec<f64> = persons
            .iter()
            .map(|id| population.person(*id).time_of_status_change.unwrap())
            .collect();
        for t in 1..60 {
            for (i, id) in persons.iter().enumerate() {
                progression
                    .advance(&mut population, *id, t as f64, &mut rng)
                    .unwrap();
                let toc = population.person(*id).time_of_status_change.unwrap();
                assert!(toc >= last[i]);
                assert!(toc > t as f64);
                last[i] = toc;
            }
        }
    }

    #[test]
    fn unscheduled_infected_person_is_an_error() {
        let progression = HostProgression::new(delayed_params()).unwrap();
        let (mut population, persons) = population(2);
        let mut rng = StdRng::seed_from_u64(1);
        progression
            .advance(&mut population, persons[0], 1.0, &mut rng)
            .unwrap();
        population
            .update_status(persons[1], InfectionStatus::InfectGP)
            .unwrap();
        assert!(progression
            .advance(&mut population, persons[1], 1.0, &mut rng)
            .is_err());
    }

    #[test]
    fn expose_skips_people_already_infected() {
        let progression = HostProgression::new(delayed_params()).unwrap();
        let (mut population, persons) = population(1);
        let mut rng = StdRng::seed_from_u64(2);
        assert!(progression
            .expose(&mut population, persons[0], 3.0, &mut rng)
            .unwrap());
        assert!(!progression
            .expose(&mut population, persons[0], 3.0, &mut rng)
            .unwrap());
        let person = population.person(persons[0]);
        assert_eq!(person.infection_status(), InfectionStatus::Exposed);
        assert!(person.next_infection_status.unwrap().is_onset());
        assert!(person.time_of_status_change.unwrap() >= 3.0);
    }

    #[test]
    fn profile_scales_without_compounding() {
        let progression = HostProgression::new(delayed_params()).unwrap();
        let (mut population, persons) = population(1);
        let id = persons[0];
        population.update_status(id, InfectionStatus::InfectMild).unwrap();
        let person = population.person_mut(id);
        person.initial_infectiousness = 2.0;
        person.infection_start_time = Some(0.0);
        progression.update_infectiousness(person, 3.0).unwrap();
        let first = person.infectiousness;
        progression.update_infectiousness(person, 3.0).unwrap();
        assert_eq!(person.infectiousness, first);
        assert_eq!(first, 2.0 * progression.profile.scale(3));
    }

    #[test]
    fn zero_length_cycle_is_an_error_not_a_hang() {
        use InfectionStatus::*;
        let params = Rc::new(Parameters {
            latent_to_sympt_delay: 0.0,
            state_transition: vec![
                (InfectMild, Recovered, 0.0),
                (InfectMild, InfectGP, 1.0),
                (InfectGP, Recovered, 0.0),
                (InfectGP, InfectHosp, 0.0),
                (InfectGP, InfectMild, 1.0),
            ],
            ..Parameters::default()
        });
        let progression = HostProgression::new(params).unwrap();
        let (mut population, persons) = population(1);
        let id = persons[0];
        let mut rng = StdRng::seed_from_u64(3);
        progression
            .infect(&mut population, id, InfectMild, 0.0, &mut rng)
            .unwrap();
        assert_eq!(population.person(id).time_of_status_change, Some(0.0));
        match progression.advance(&mut population, id, 0.0, &mut rng) {
            Err(SimError::Invariant(_)) => (),
            other => panic!("expected an invariant error, got {:?}", other),
        }
    }
}
