use nalgebra::{DMatrix, DVector, RealField};
use rustc_hash::FxHashMap;

use crate::game::PlayerId;

/// Second-order expansion of one cost term about the nominal,
/// `0.5·zᵀ·hess·z + gradᵀ·z`.
#[derive(Debug, Clone)]
pub struct CostApproximation<T: RealField> {
    pub hess: DMatrix<T>,
    pub grad: DVector<T>,
}

impl<T: RealField + Copy> CostApproximation<T> {
    pub fn new(hess: DMatrix<T>, grad: DVector<T>) -> CostApproximation<T> {
        assert!(hess.is_square());
        assert_eq!(hess.nrows(), grad.len());
        CostApproximation { hess, grad }
    }

    pub fn zeros(dim: usize) -> CostApproximation<T> {
        CostApproximation {
            hess: DMatrix::zeros(dim, dim),
            grad: DVector::zeros(dim),
        }
    }

    pub fn evaluate(&self, z: &DVector<T>) -> T {
        let half = T::from_subset(&0.5);
        (&self.hess * (z * half) + &self.grad).dot(z)
    }
}

/// One player's quadratic stage cost: a state term plus control terms keyed
/// by the player whose control they penalise. Open-loop equilibria consume
/// only the own-control entry; cross entries may be present and are ignored
/// by the solver.
#[derive(Debug, Clone)]
pub struct QuadraticCost<T: RealField> {
    pub state: CostApproximation<T>,
    pub control: FxHashMap<PlayerId, CostApproximation<T>>,
}

impl<T: RealField + Copy> QuadraticCost<T> {
    pub fn new(state: CostApproximation<T>) -> QuadraticCost<T> {
        QuadraticCost {
            state,
            control: FxHashMap::default(),
        }
    }

    /// Total cost of this stage at the given state and per-player control
    /// perturbations.
    pub fn evaluate(&self, x: &DVector<T>, us: &[DVector<T>]) -> T {
        let mut cost = self.state.evaluate(x);
        for (player, term) in &self.control {
            cost += term.evaluate(&us[*player]);
        }
        cost
    }
}
