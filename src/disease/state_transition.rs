// State transition matrix ----------------------------------------------------------------------------------
//
// row = current status, column = next status. Recovered and Dead only route to
// themselves, which the progression reads as "no further transition"

use crate::error::{Result, SimError};
use crate::parameters::check_probability;
use crate::world::InfectionStatus;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

const N: usize = InfectionStatus::COUNT;
const ROW_SUM_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq)]
pub struct StateTransitionMatrix {
    matrix: [[f64; N]; N],
}

impl Default for StateTransitionMatrix {
    fn default() -> Self {
        use InfectionStatus::*;
        let mut m = StateTransitionMatrix {
            matrix: [[0.0; N]; N],
        };
        m.set(Susceptible, Exposed, 1.0);
        m.set(Exposed, InfectASympt, 0.34);
        m.set(Exposed, InfectMild, 0.42193467146028);
        m.set(Exposed, InfectGP, 0.23806532859080398);
        m.set(InfectASympt, Recovered, 1.0);
        m.set(InfectMild, Recovered, 1.0);
        m.set(InfectGP, Recovered, 0.8957406726555377);
        m.set(InfectGP, InfectHosp, 0.10425932734446226);
        m.set(InfectHosp, Recovered, 0.6078534557805789);
        m.set(InfectHosp, InfectICU, 0.19555352565087258);
        m.set(InfectHosp, Dead, 0.1965930185685483);
        m.set(InfectICU, InfectICURecov, 0.4765104);
        m.set(InfectICU, Dead, 0.5234896);
        m.set(InfectICURecov, Recovered, 1.0);
        m.set(Recovered, Recovered, 1.0);
        m.set(Dead, Dead, 1.0);
        m
    }
}

impl StateTransitionMatrix {
    /// Builds a matrix from explicit rows, one per status in declaration order.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<StateTransitionMatrix> {
        if rows.len() != N || rows.iter().any(|r| r.len() != N) {
            return Err(SimError::invariant(format!(
                "state transition matrix must be {} x {}",
                N, N
            )));
        }
        let mut matrix = [[0.0; N]; N];
        for (i, row) in rows.iter().enumerate() {
            for (j, p) in row.iter().enumerate() {
                check_probability("state transition", *p)?;
                matrix[i][j] = *p;
            }
        }
        Ok(StateTransitionMatrix { matrix })
    }

    fn set(&mut self, from: InfectionStatus, to: InfectionStatus, p: f64) {
        self.matrix[from.index()][to.index()] = p;
    }

    pub fn probability(&self, from: InfectionStatus, to: InfectionStatus) -> f64 {
        self.matrix[from.index()][to.index()]
    }

    pub fn row(&self, from: InfectionStatus) -> &[f64; N] {
        &self.matrix[from.index()]
    }

    /// Overwrites one entry. The row is not renormalised; `validate` checks it.
    pub fn update_probability(
        &mut self,
        from: InfectionStatus,
        to: InfectionStatus,
        p: f64,
    ) -> Result<()> {
        check_probability("transition probability", p)?;
        self.set(from, to, p);
        Ok(())
    }

    /// every non terminal row must be a probability distribution
    pub fn validate(&self) -> Result<()> {
        for status in InfectionStatus::ALL.iter() {
            let sum: f64 = self.row(*status).iter().sum();
            if (sum - 1.0).abs() > ROW_SUM_TOLERANCE {
                return Err(SimError::invariant(format!(
                    "transition probabilities out of {} sum to {}",
                    status, sum
                )));
            }
        }
        for status in [InfectionStatus::Recovered, InfectionStatus::Dead].iter() {
            if self.probability(*status, *status) != 1.0 {
                return Err(SimError::invariant(format!(
                    "{} must only transition to itself",
                    status
                )));
            }
        }
        Ok(())
    }

    /// Weighted draw of the status that follows `current`. Terminal statuses
    /// have none.
    pub fn next_status<R: Rng + ?Sized>(
        &self,
        current: InfectionStatus,
        rng: &mut R,
    ) -> Result<Option<InfectionStatus>> {
        if current.is_terminal() {
            return Ok(None);
        }
        let dist = WeightedIndex::new(self.row(current).iter()).map_err(|e| {
            SimError::invariant(format!("transition weights out of {}: {}", current, e))
        })?;
        Ok(Some(InfectionStatus::ALL[dist.sample(rng)]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn default_rows_sum_to_one() {
        let matrix = StateTransitionMatrix::default();
        matrix.validate().unwrap();
        for status in InfectionStatus::ALL.iter() {
            assert_relative_eq!(matrix.row(*status).iter().sum::<f64>(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn terminal_rows_route_to_themselves() {
        let matrix = StateTransitionMatrix::default();
        assert_eq!(
            matrix.probability(InfectionStatus::Dead, InfectionStatus::Dead),
            1.0
        );
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            matrix
                .next_status(InfectionStatus::Recovered, &mut rng)
                .unwrap(),
            None
        );
    }

    #[test]
    fn next_status_follows_nonzero_weights() {
        let matrix = StateTransitionMatrix::default();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            let next = matrix
                .next_status(InfectionStatus::Exposed, &mut rng)
                .unwrap()
                .unwrap();
            assert!(next.is_onset());
        }
        assert_eq!(
            matrix
                .next_status(InfectionStatus::Susceptible, &mut rng)
                .unwrap(),
            Some(InfectionStatus::Exposed)
        );
    }

    #[test]
    fn updates_are_validated() {
        let mut matrix = StateTransitionMatrix::default();
        assert!(matrix
            .update_probability(InfectionStatus::Exposed, InfectionStatus::Dead, 1.2)
            .is_err());
        matrix
            .update_probability(InfectionStatus::Exposed, InfectionStatus::Dead, 0.2)
            .unwrap();
        assert!(matrix.validate().is_err());
    }

    #[test]
    fn wrong_shape_is_rejected() {
        assert!(StateTransitionMatrix::from_rows(&[vec![1.0; N]]).is_err());
        let rows = vec![vec![0.0; N - 1]; N];
        assert!(StateTransitionMatrix::from_rows(&rows).is_err());
    }

    #[test]
    fn all_zero_row_cannot_be_sampled() {
        let mut rows = vec![vec![0.0; N]; N];
        rows[InfectionStatus::Recovered.index()][InfectionStatus::Recovered.index()] = 1.0;
        let matrix = StateTransitionMatrix::from_rows(&rows).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matrix
            .next_status(InfectionStatus::Exposed, &mut rng)
            .is_err());
    }
}
