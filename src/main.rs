use std::error::Error;

use nalgebra::{DMatrix, DVector};

use lq_games::game::{CostApproximation, GameDimensions, LinearDynamics, QuadraticCost};
use lq_games::solver::OpenLoopSolver;

/// Rendezvous between two unit masses on a line. Each player accelerates its
/// own mass, pays for the gap between the two and for its own effort, and the
/// open-loop equilibrium closes the gap from both sides.
fn main() -> Result<(), Box<dyn Error>> {
    let dt = 0.1;
    let steps = 31;
    let dims = GameDimensions::new(4, vec![1, 1]);

    // state [p0, v0, p1, v1]
    #[rustfmt::skip]
    let a = DMatrix::from_row_slice(4, 4, &[
        1.0,  dt, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 1.0,  dt,
        0.0, 0.0, 0.0, 1.0,
    ]);
    let b0 = DMatrix::from_column_slice(4, 1, &[0.0, dt, 0.0, 0.0]);
    let b1 = DMatrix::from_column_slice(4, 1, &[0.0, 0.0, 0.0, dt]);
    let lin: Vec<LinearDynamics<f64>> = (0..steps)
        .map(|_| LinearDynamics::new(a.clone(), vec![b0.clone(), b1.clone()]))
        .collect();

    // both players penalise the squared gap p0 − p1 plus a little of their
    // own velocity
    #[rustfmt::skip]
    let gap = DMatrix::from_row_slice(4, 4, &[
         1.0, 0.0, -1.0, 0.0,
         0.0, 0.0,  0.0, 0.0,
        -1.0, 0.0,  1.0, 0.0,
         0.0, 0.0,  0.0, 0.0,
    ]);
    let damp0 = DMatrix::from_diagonal(&DVector::from_vec(vec![0.0, 0.1, 0.0, 0.0]));
    let damp1 = DMatrix::from_diagonal(&DVector::from_vec(vec![0.0, 0.0, 0.0, 0.1]));

    let quad: Vec<Vec<QuadraticCost<f64>>> = (0..steps)
        .map(|k| {
            let terminal = k + 1 == steps;
            let weight = if terminal { 10.0 } else { 1.0 };
            vec![
                player_cost(&(&gap * weight + &damp0), 0, terminal),
                player_cost(&(&gap * weight + &damp1), 1, terminal),
            ]
        })
        .collect();

    let x0 = DVector::from_vec(vec![-1.0, 0.0, 1.0, 0.0]);
    let mut solver = OpenLoopSolver::new(dims, steps);
    let strategies = solver.solve(&lin, &quad, &x0)?;

    println!("{:>4} {:>8} {:>8} {:>8} {:>8}", "k", "p0", "p1", "u0", "u1");
    let mut x = x0;
    for k in 0..steps - 1 {
        let us: Vec<DVector<f64>> = strategies.iter().map(|s| s.control(k, &x)).collect();
        println!(
            "{:>4} {:>8.3} {:>8.3} {:>8.3} {:>8.3}",
            k, x[0], x[2], us[0][0], us[1][0]
        );
        x = lin[k].step(&x, &us);
    }
    println!(
        "{:>4} {:>8.3} {:>8.3} {:>8} {:>8}",
        steps - 1,
        x[0],
        x[2],
        "-",
        "-"
    );

    Ok(())
}

fn player_cost(q: &DMatrix<f64>, player: usize, terminal: bool) -> QuadraticCost<f64> {
    let mut cost = QuadraticCost::new(CostApproximation::new(q.clone(), DVector::zeros(4)));
    if !terminal {
        cost.control.insert(
            player,
            CostApproximation::new(DMatrix::from_element(1, 1, 0.5), DVector::zeros(1)),
        );
    }
    cost
}
