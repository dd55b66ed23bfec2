use nalgebra::{Cholesky, ColPivQR, DMatrix, DVector, Dyn, RealField};

use crate::game::GameDimensions;

/// Scratch storage for one solver instance, allocated at construction and
/// overwritten on every solve. Indexed by time step first, then by player.
///
/// The backward pass writes slot `k` strictly after slot `k + 1`; the forward
/// pass only reads.
pub(crate) struct Workspace<T: RealField> {
    /// Per-player value-function Hessians `M`.
    pub(crate) value_hess: Vec<Vec<DMatrix<T>>>,
    /// Per-player value-function gradients `m`.
    pub(crate) value_grad: Vec<Vec<DVector<T>>>,
    /// Cholesky factors of the own-control Hessians `R_ii`.
    pub(crate) chol_r: Vec<Vec<Option<Cholesky<T, Dyn>>>>,
    /// `R_ii⁻¹·B_iᵀ`.
    pub(crate) warped_b: Vec<Vec<DMatrix<T>>>,
    /// `R_ii⁻¹·r_ii`.
    pub(crate) warped_r: Vec<Vec<DVector<T>>>,
    /// Coupling matrices `Λ = I + Σ_i B_i·(R_ii⁻¹·B_iᵀ)·M_i`.
    pub(crate) lambda: Vec<DMatrix<T>>,
    /// Pivoted QR factorisations of `lambda`, shared by both passes.
    pub(crate) fac_lambda: Vec<Option<ColPivQR<T, Dyn, Dyn>>>,
}

impl<T: RealField + Copy> Workspace<T> {
    pub(crate) fn new(dims: &GameDimensions, num_time_steps: usize) -> Workspace<T> {
        let n = dims.x_dim();
        let players = dims.num_players();
        Workspace {
            value_hess: (0..num_time_steps)
                .map(|_| (0..players).map(|_| DMatrix::zeros(n, n)).collect())
                .collect(),
            value_grad: (0..num_time_steps)
                .map(|_| (0..players).map(|_| DVector::zeros(n)).collect())
                .collect(),
            chol_r: (0..num_time_steps)
                .map(|_| (0..players).map(|_| None).collect())
                .collect(),
            warped_b: (0..num_time_steps)
                .map(|_| {
                    (0..players)
                        .map(|i| DMatrix::zeros(dims.u_dim(i), n))
                        .collect()
                })
                .collect(),
            warped_r: (0..num_time_steps)
                .map(|_| (0..players).map(|i| DVector::zeros(dims.u_dim(i))).collect())
                .collect(),
            lambda: (0..num_time_steps)
                .map(|_| DMatrix::identity(n, n))
                .collect(),
            fac_lambda: (0..num_time_steps).map(|_| None).collect(),
        }
    }
}
