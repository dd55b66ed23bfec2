use nalgebra::{DMatrix, DVector, RealField};

/// Time-indexed affine strategy for one player. The realised control at step
/// `k` from state perturbation `δx` is `δu_k = −P_k·δx − α_k`. Open-loop
/// solvers leave every gain `P_k` zero and carry the whole trajectory in the
/// feedforward terms; feedback solvers populate both. Consumers can treat the
/// two shapes uniformly.
#[derive(Debug, Clone)]
pub struct Strategy<T: RealField> {
    pub ps: Vec<DMatrix<T>>,
    pub alphas: Vec<DVector<T>>,
}

impl<T: RealField + Copy> Strategy<T> {
    /// A zero strategy over `horizon` steps.
    pub fn new(horizon: usize, x_dim: usize, u_dim: usize) -> Strategy<T> {
        Strategy {
            ps: (0..horizon).map(|_| DMatrix::zeros(u_dim, x_dim)).collect(),
            alphas: (0..horizon).map(|_| DVector::zeros(u_dim)).collect(),
        }
    }

    pub fn horizon(&self) -> usize {
        self.alphas.len()
    }

    /// The control played at step `k` from state perturbation `δx`.
    pub fn control(&self, k: usize, dx: &DVector<T>) -> DVector<T> {
        -(&self.ps[k] * dx) - &self.alphas[k]
    }
}
