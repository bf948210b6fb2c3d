// Transition time matrix -----------------------------------------------------------------------------------

use super::InverseCdf;
use crate::error::{Result, SimError};
use crate::parameters::TransitionTimeParams;
use crate::world::InfectionStatus;
use rand::Rng;

const N: usize = InfectionStatus::COUNT;

#[derive(Debug, Clone, PartialEq)]
pub enum TransitionTime {
    Zero,
    Icdf(InverseCdf),
}

impl TransitionTime {
    /// duration in timesteps
    pub fn choose<R: Rng + ?Sized>(&self, time_steps_per_day: usize, rng: &mut R) -> Result<f64> {
        match self {
            TransitionTime::Zero => Ok(0.0),
            TransitionTime::Icdf(icdf) => icdf.choose(time_steps_per_day, rng),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransitionTimeMatrix {
    matrix: Vec<Vec<TransitionTime>>,
}

impl TransitionTimeMatrix {
    /// all transitions instantaneous
    pub fn zero() -> TransitionTimeMatrix {
        TransitionTimeMatrix {
            matrix: vec![vec![TransitionTime::Zero; N]; N],
        }
    }

    pub fn from_params(params: &[TransitionTimeParams]) -> Result<TransitionTimeMatrix> {
        let mut matrix = TransitionTimeMatrix::zero();
        for entry in params.iter() {
            if entry.from.is_terminal() {
                return Err(SimError::validation(format!(
                    "{} has no outgoing transition time",
                    entry.from
                )));
            }
            matrix.set(
                entry.from,
                entry.to,
                TransitionTime::Icdf(InverseCdf::new(entry.mean, &entry.icdf)?),
            );
        }
        Ok(matrix)
    }

    pub fn set(&mut self, from: InfectionStatus, to: InfectionStatus, time: TransitionTime) {
        self.matrix[from.index()][to.index()] = time;
    }

    pub fn get(&self, from: InfectionStatus, to: InfectionStatus) -> &TransitionTime {
        &self.matrix[from.index()][to.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::{Parameters, LATENT_ICDF};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn susceptible_to_exposed_is_instantaneous() {
        let matrix = TransitionTimeMatrix::from_params(&Parameters::default().transition_times)
            .unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(
            matrix
                .get(InfectionStatus::Susceptible, InfectionStatus::Exposed)
                .choose(1, &mut rng)
                .unwrap(),
            0.0
        );
        match matrix.get(InfectionStatus::Exposed, InfectionStatus::InfectMild) {
            TransitionTime::Icdf(icdf) => assert_eq!(icdf.mean(), 4.59),
            TransitionTime::Zero => panic!("latent period must be sampled"),
        }
    }

    #[test]
    fn terminal_rows_cannot_be_timed() {
        let params = vec![TransitionTimeParams::new(
            InfectionStatus::Dead,
            InfectionStatus::Dead,
            1.0,
            &LATENT_ICDF,
        )];
        assert!(TransitionTimeMatrix::from_params(&params).is_err());
    }
}
