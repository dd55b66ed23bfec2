use nalgebra::{Cholesky, DMatrix, DVector, RealField};

use crate::game::{GameDimensions, LinearDynamics, PlayerId, QuadraticCost, Strategy};
use crate::solver::workspace::Workspace;

#[derive(Debug, Clone)]
pub enum ErrorType {
    /// A player's own-control Hessian failed its Cholesky factorisation, so
    /// it is not symmetric positive definite. The caller can damp the control
    /// cost and retry.
    ControlCostNotPositiveDefinite { time_step: usize, player: PlayerId },
    /// The coupling matrix lost rank and cannot be inverted.
    SingularCouplingMatrix { time_step: usize },
}

#[derive(Debug)]
pub struct Error {
    error_type: ErrorType,
}

impl Error {
    pub fn kind(&self) -> &ErrorType {
        &self.error_type
    }
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self.error_type)
    }
}

/// Open-loop Nash solver for a time-varying, finite-horizon LQ game, after
/// Başar & Olsder ch. 6, adjusted for linear terms in the control penalty:
/// `penalty_i = 0.5·Σ_j δu_jᵀ·R_ij·(δu_j + 2·R_ij⁻¹·r_ij)`.
///
/// Dynamics are `δx_{k+1} = A_k·δx_k + Σ_i B_{i,k}·δu_{i,k}` with no drift
/// term, since everything is a perturbation about a nominal trajectory. The
/// returned strategies keep their gains at zero: the equilibrium trajectory
/// lives entirely in the feedforward terms.
pub struct OpenLoopSolver<T: RealField> {
    dims: GameDimensions,
    num_time_steps: usize,
    ws: Workspace<T>,
}

impl<T: RealField + Copy> OpenLoopSolver<T> {
    pub fn new(dims: GameDimensions, num_time_steps: usize) -> OpenLoopSolver<T> {
        assert!(num_time_steps >= 2, "need at least one transition");
        let ws = Workspace::new(&dims, num_time_steps);
        OpenLoopSolver {
            dims,
            num_time_steps,
            ws,
        }
    }

    /// Solves the game from the initial state perturbation `x0` and returns
    /// one strategy per player, each with `num_time_steps − 1` feedforward
    /// terms.
    ///
    /// An indefinite own-control Hessian or a singular coupling matrix is
    /// reported as an error; input shape mismatches are programmer errors and
    /// panic.
    #[tracing::instrument(skip_all, fields(
        time_steps = self.num_time_steps,
        players = self.dims.num_players(),
    ))]
    pub fn solve(
        &mut self,
        linearization: &[LinearDynamics<T>],
        quadraticization: &[Vec<QuadraticCost<T>>],
        x0: &DVector<T>,
    ) -> Result<Vec<Strategy<T>>, Error> {
        assert_eq!(linearization.len(), self.num_time_steps);
        assert_eq!(quadraticization.len(), self.num_time_steps);
        for quad in quadraticization {
            assert_eq!(quad.len(), self.dims.num_players());
        }
        assert_eq!(x0.len(), self.dims.x_dim());

        let mut strategies: Vec<Strategy<T>> = (0..self.dims.num_players())
            .map(|i| {
                Strategy::new(
                    self.num_time_steps - 1,
                    self.dims.x_dim(),
                    self.dims.u_dim(i),
                )
            })
            .collect();

        self.backward_pass(linearization, quadraticization)?;
        self.forward_pass(linearization, x0, &mut strategies)?;

        Ok(strategies)
    }

    /// Walks from the horizon down to the initial time, caching the warped
    /// control quantities, the coupling matrices and the value terms.
    fn backward_pass(
        &mut self,
        linearization: &[LinearDynamics<T>],
        quadraticization: &[Vec<QuadraticCost<T>>],
    ) -> Result<(), Error> {
        let n = self.dims.x_dim();
        let players = self.dims.num_players();
        let last = self.num_time_steps - 1;

        // The final entry is a pure terminal cost: its expansion already is
        // the value function at the horizon.
        for i in 0..players {
            self.ws.value_hess[last][i] = quadraticization[last][i].state.hess.clone();
            self.ws.value_grad[last][i] = quadraticization[last][i].state.grad.clone();
        }

        for k in (0..last).rev() {
            let lin = &linearization[k];
            let quad = &quadraticization[k];
            let next_quad = &quadraticization[k + 1];

            // Warp each player's B and r by R_ii⁻¹ and accumulate Λ.
            let mut lambda = DMatrix::identity(n, n);
            for i in 0..players {
                let control = quad[i]
                    .control
                    .get(&i)
                    .expect("every player carries its own control cost");

                let Some(chol) = Cholesky::new(control.hess.clone()) else {
                    return Err(Error {
                        error_type: ErrorType::ControlCostNotPositiveDefinite {
                            time_step: k,
                            player: i,
                        },
                    });
                };
                self.ws.warped_b[k][i] = chol.solve(&lin.bs[i].transpose());
                self.ws.warped_r[k][i] = chol.solve(&control.grad);
                self.ws.chol_r[k][i] = Some(chol);

                lambda += &lin.bs[i] * &self.ws.warped_b[k][i] * &self.ws.value_hess[k + 1][i];
            }

            // One factorisation of Λ serves the value updates below and the
            // forward sweep.
            let fac = lambda.clone().col_piv_qr();
            let Some(lambda_inv_a) = fac.solve(&lin.a) else {
                return Err(Error {
                    error_type: ErrorType::SingularCouplingMatrix { time_step: k },
                });
            };

            let a_t = lin.a.transpose();
            for i in 0..players {
                self.ws.value_hess[k][i] =
                    &quad[i].state.hess + &a_t * &self.ws.value_hess[k + 1][i] * &lambda_inv_a;

                // Joint best-response sum over every player's warped terms.
                let mut intermediary = DVector::zeros(n);
                for j in 0..players {
                    intermediary -= &lin.bs[j]
                        * (&self.ws.warped_b[k][j] * &self.ws.value_grad[k + 1][i]
                            + &self.ws.warped_r[k][j]);
                }
                let Some(lambda_inv_int) = fac.solve(&intermediary) else {
                    return Err(Error {
                        error_type: ErrorType::SingularCouplingMatrix { time_step: k },
                    });
                };

                // The state gradient enters from the next step, the state
                // Hessian from the current one.
                self.ws.value_grad[k][i] = &next_quad[i].state.grad
                    + &a_t
                        * (&self.ws.value_grad[k + 1][i]
                            + &self.ws.value_hess[k + 1][i] * &lambda_inv_int);
            }

            self.ws.lambda[k] = lambda;
            self.ws.fac_lambda[k] = Some(fac);
        }

        Ok(())
    }

    /// Rolls the equilibrium state forward from `x0` and emits each player's
    /// feedforward term from the cached backward-pass quantities.
    fn forward_pass(
        &self,
        linearization: &[LinearDynamics<T>],
        x0: &DVector<T>,
        strategies: &mut [Strategy<T>],
    ) -> Result<(), Error> {
        let players = self.dims.num_players();

        let mut x_star = x0.clone();
        for k in 0..self.num_time_steps - 1 {
            let lin = &linearization[k];

            // TODO: the value-gradient update builds almost the same sum;
            // cache the warped products there instead of rebuilding them.
            let mut intermediary = &lin.a * &x_star;
            for i in 0..players {
                intermediary -= &lin.bs[i]
                    * (&self.ws.warped_b[k][i] * &self.ws.value_grad[k + 1][i]
                        + &self.ws.warped_r[k][i]);
            }

            let fac = self.ws.fac_lambda[k]
                .as_ref()
                .expect("backward pass ran first");
            let Some(next) = fac.solve(&intermediary) else {
                return Err(Error {
                    error_type: ErrorType::SingularCouplingMatrix { time_step: k },
                });
            };
            x_star = next;

            // Optimal control, stored sign-flipped: the realised control is
            // δu = −α.
            for i in 0..players {
                strategies[i].alphas[k] = &self.ws.warped_b[k][i]
                    * (&self.ws.value_hess[k + 1][i] * &x_star + &self.ws.value_grad[k + 1][i])
                    + &self.ws.warped_r[k][i];
            }
        }

        Ok(())
    }
}
