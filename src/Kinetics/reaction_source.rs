//! The reaction-source oracle contract.
//!
//! `react` returns dU/dt due to reactions for the whole conserved vector (same
//! length and ordering as `U`). `jacobian` returns ∂R_i/∂U_j restricted to the
//! given components; the default differentiates `react` numerically, one
//! column per component.
use crate::Hydro::conserved_state::{StateLayout, URHO};
use crate::errors::SolverError;
use nalgebra::{DMatrix, DVector};

/// relative perturbation of the one-sided finite differences
const JAC_EPS: f64 = 1.0e-7;

pub trait ReactionSource {
    fn layout(&self) -> &StateLayout;

    fn react(&self, u: &DVector<f64>) -> Result<DVector<f64>, SolverError>;

    /// ∂R_vars/∂U_vars, one-sided differences by default
    fn jacobian(&self, u: &DVector<f64>, vars: &[usize]) -> Result<DMatrix<f64>, SolverError> {
        let r0 = self.react(u)?;
        let n = vars.len();
        let mut jac = DMatrix::zeros(n, n);
        let mut up = u.clone();
        for (col, &j) in vars.iter().enumerate() {
            // species are perturbed relative to the density so trace species still move
            let scale = u[j].abs().max(JAC_EPS * u[URHO].abs()).max(f64::MIN_POSITIVE);
            let h = JAC_EPS * scale;
            up[j] = u[j] + h;
            let r1 = self.react(&up)?;
            up[j] = u[j];
            for (row, &i) in vars.iter().enumerate() {
                jac[(row, col)] = (r1[i] - r0[i]) / h;
            }
        }
        Ok(jac)
    }
}
