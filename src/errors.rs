//! # Error types
//!
//! Every fatal failure of the zone solvers has its own strongly typed error so a
//! caller (or a test) can tell an EOS failure from a hydrodynamic Riemann failure
//! from a reactive SDC failure. All public entry points return
//! `Result<_, SolverError>`.
use crate::Thermodynamics::eos::EosInput;
use std::io;
use thiserror::Error;

/// Failure of the equation of state oracle
#[derive(Debug, Clone, Error)]
#[allow(non_snake_case)]
pub enum EosError {
    #[error(
        "EOS got non-physical input in {mode:?} mode ({reason}): rho = {rho:.6e}, T = {T:.6e}, p = {p:.6e}, e = {e:.6e}, xn = {xn:?}"
    )]
    NonPhysicalInput {
        mode: EosInput,
        reason: String,
        rho: f64,
        T: f64,
        p: f64,
        e: f64,
        xn: Vec<f64>,
    },
    #[error(
        "EOS failed to converge in {mode:?} mode after {iterations} iterations: rho = {rho:.6e}, T = {T:.6e}, p = {p:.6e}, e = {e:.6e}, xn = {xn:?}"
    )]
    NotConverged {
        mode: EosInput,
        iterations: usize,
        rho: f64,
        T: f64,
        p: f64,
        e: f64,
        xn: Vec<f64>,
    },
}

/// one Newton iterate of the shock solver: (rhostar, W)
pub type ShockHistory = Vec<(f64, f64)>;

/// Failure of the hydrodynamic (Riemann) iterations
#[derive(Debug, Clone, Error)]
pub enum RiemannError {
    #[error(
        "hydro: shock did not converge for pstar = {pstar:.6e} (rho_s = {rho_s:.6e}, p_s = {p_s:.6e}) after {} iterations",
        .history.len()
    )]
    ShockNotConverged {
        pstar: f64,
        rho_s: f64,
        p_s: f64,
        history: ShockHistory,
    },
    #[error("hydro: two-shock star pressure did not converge after {iterations} iterations, last pstar = {pstar:.6e}")]
    StarPressureNotConverged { iterations: usize, pstar: f64 },
}

/// Outcome of a single implicit Newton solve of the reactive system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewtonStatus {
    Success,
    SingularMatrix,
    ConvergenceFailure,
    BadMassFractions,
}

/// Failure of the reactive SDC update
#[derive(Debug, Error)]
pub enum SdcError {
    #[error("reactive SDC: Newton solve failed with status {status:?} (dt = {dt:.6e}, sdc iteration {sdc_iteration})")]
    NewtonFailure {
        status: NewtonStatus,
        dt: f64,
        sdc_iteration: usize,
    },
    #[error("reactive SDC: stiff integrator gave up at t = {t:.6e} of dt = {dt:.6e} after {steps} steps")]
    IntegratorFailure { t: f64, dt: f64, steps: usize },
    #[error("reactive SDC: zone {zone} failed: {source}")]
    BlockFailure {
        zone: usize,
        #[source]
        source: Box<SolverError>,
    },
}

/// Umbrella error returned by the public API
#[derive(Debug, Error)]
pub enum SolverError {
    #[error(transparent)]
    Eos(#[from] EosError),
    #[error(transparent)]
    Riemann(#[from] RiemannError),
    #[error(transparent)]
    Sdc(#[from] SdcError),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
