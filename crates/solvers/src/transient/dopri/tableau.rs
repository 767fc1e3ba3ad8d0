//! Butcher tableau for the Dormand–Prince 5(4) pair.
//!
//! Coefficients from Dormand & Prince (1980). `B` holds the fifth-order
//! weights used to advance the solution, `E` the difference between the
//! fifth- and fourth-order weights used for the local error estimate, and
//! `D` the weights of the fourth-order dense-output interpolant.

/// Number of stages, including the FSAL stage.
pub(super) const STAGES: usize = 7;

/// Nodes: the fraction of the step at which each stage is evaluated.
pub(super) const C: [f64; STAGES] = [
    0.0,
    1.0 / 5.0,
    3.0 / 10.0,
    4.0 / 5.0,
    8.0 / 9.0,
    1.0,
    1.0,
];

/// Stage coefficients. Row `i` weights stages `0..i` when forming the
/// argument of stage `i`.
pub(super) const A: [[f64; STAGES - 1]; STAGES] = [
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [1.0 / 5.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [3.0 / 40.0, 9.0 / 40.0, 0.0, 0.0, 0.0, 0.0],
    [44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0, 0.0, 0.0, 0.0],
    [
        19372.0 / 6561.0,
        -25360.0 / 2187.0,
        64448.0 / 6561.0,
        -212.0 / 729.0,
        0.0,
        0.0,
    ],
    [
        9017.0 / 3168.0,
        -355.0 / 33.0,
        46732.0 / 5247.0,
        49.0 / 176.0,
        -5103.0 / 18656.0,
        0.0,
    ],
    [
        35.0 / 384.0,
        0.0,
        500.0 / 1113.0,
        125.0 / 192.0,
        -2187.0 / 6784.0,
        11.0 / 84.0,
    ],
];

/// Fifth-order solution weights. The last entry is zero, which makes the
/// final stage of one step reusable as the first stage of the next (FSAL).
pub(super) const B: [f64; STAGES] = [
    35.0 / 384.0,
    0.0,
    500.0 / 1113.0,
    125.0 / 192.0,
    -2187.0 / 6784.0,
    11.0 / 84.0,
    0.0,
];

/// Error-estimate weights: fifth-order minus embedded fourth-order weights.
pub(super) const E: [f64; STAGES] = [
    71.0 / 57600.0,
    0.0,
    -71.0 / 16695.0,
    71.0 / 1920.0,
    -17253.0 / 339200.0,
    22.0 / 525.0,
    -1.0 / 40.0,
];

/// Dense-output weights for the θ⁴ term of the interpolant.
pub(super) const D: [f64; STAGES] = [
    -12715105075.0 / 11282082432.0,
    0.0,
    87487479700.0 / 32700410799.0,
    -10690763975.0 / 1880347072.0,
    701980252875.0 / 199316789632.0,
    -1453857185.0 / 822651844.0,
    69997945.0 / 29380423.0,
];

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn nodes_match_stage_row_sums() {
        for i in 0..STAGES {
            let row_sum: f64 = A[i].iter().sum();
            assert_relative_eq!(row_sum, C[i], epsilon = 1e-14);
        }
    }

    #[test]
    fn solution_weights_sum_to_one() {
        let sum: f64 = B.iter().sum();
        assert_relative_eq!(sum, 1.0, epsilon = 1e-14);
    }

    #[test]
    fn error_weights_sum_to_zero() {
        // Both embedded formulas have weights summing to one.
        let sum: f64 = E.iter().sum();
        assert!(sum.abs() < 1e-14);
    }

    #[test]
    fn dense_weights_sum_to_zero() {
        // Keeps the interpolant exact for constant-derivative solutions.
        let sum: f64 = D.iter().sum();
        assert!(sum.abs() < 1e-12);
    }

    #[test]
    fn last_stage_matches_solution_weights() {
        // The FSAL property: stage 7 is evaluated at the advanced solution.
        for i in 0..STAGES - 1 {
            assert_relative_eq!(A[STAGES - 1][i], B[i]);
        }
    }
}
