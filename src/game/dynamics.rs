use nalgebra::{DMatrix, DVector, RealField};

use crate::game::PlayerId;

/// Fixed dimensions of a game: one shared state vector, one control vector
/// per player.
#[derive(Debug, Clone)]
pub struct GameDimensions {
    x_dim: usize,
    u_dims: Vec<usize>,
}

impl GameDimensions {
    pub fn new(x_dim: usize, u_dims: Vec<usize>) -> GameDimensions {
        assert!(!u_dims.is_empty(), "a game needs at least one player");
        GameDimensions { x_dim, u_dims }
    }

    pub fn num_players(&self) -> usize {
        self.u_dims.len()
    }

    pub fn x_dim(&self) -> usize {
        self.x_dim
    }

    pub fn u_dim(&self, player: PlayerId) -> usize {
        self.u_dims[player]
    }
}

/// Linearised multi-player transition at one time step,
///
/// `δx_{k+1} = A·δx_k + Σ_i B_i·δu_{i,k}`
///
/// There is no additive drift term: these are perturbation dynamics about a
/// nominal trajectory.
#[derive(Debug, Clone)]
pub struct LinearDynamics<T: RealField> {
    pub a: DMatrix<T>,
    pub bs: Vec<DMatrix<T>>,
}

impl<T: RealField + Copy> LinearDynamics<T> {
    pub fn new(a: DMatrix<T>, bs: Vec<DMatrix<T>>) -> LinearDynamics<T> {
        assert!(a.is_square());
        for b in &bs {
            assert_eq!(b.nrows(), a.nrows());
        }
        LinearDynamics { a, bs }
    }

    /// Applies one transition to a state perturbation under the given
    /// per-player control perturbations.
    pub fn step(&self, x: &DVector<T>, us: &[DVector<T>]) -> DVector<T> {
        assert_eq!(us.len(), self.bs.len());
        let mut next = &self.a * x;
        for (b, u) in self.bs.iter().zip(us) {
            next += b * u;
        }
        next
    }
}
