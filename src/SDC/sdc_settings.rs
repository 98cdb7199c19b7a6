//! Runtime parameters of the reactive SDC update. They are plain values handed to
//! the zone solver, never process-wide state.
use crate::Hydro::conserved_state::{URHO, UTEMP};
use crate::errors::SolverError;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

/// How the implicit reactive system of one zone is solved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SdcSolverType {
    /// direct Newton iteration, subdividing the step on failure
    #[default]
    Newton,
    /// adaptive stiff integration of dU/dt = R(U) + C over the step
    StiffIntegrator,
    /// integrator prediction on the first SDC iteration, Newton refinement always
    Hybrid,
}

/// Stiff BDF integrator controls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegratorSettings {
    pub rtol: f64,
    pub atol: f64,
    /// cap on internal BDF steps
    pub max_steps: usize,
    /// first trial step as a fraction of dt
    pub initial_step_fraction: f64,
}

impl Default for IntegratorSettings {
    fn default() -> Self {
        Self {
            rtol: 1.0e-6,
            atol: 1.0e-10,
            max_steps: 10000,
            initial_step_fraction: 0.1,
        }
    }
}

/// Density/temperature window inside which a zone is allowed to burn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(non_snake_case)]
pub struct BurnScreening {
    pub react_rho_min: f64,
    pub react_rho_max: f64,
    pub react_T_min: f64,
    pub react_T_max: f64,
}

impl Default for BurnScreening {
    fn default() -> Self {
        Self {
            react_rho_min: 0.0,
            react_rho_max: 1.0e200,
            react_T_min: 0.0,
            react_T_max: 1.0e200,
        }
    }
}

impl BurnScreening {
    /// reads density and the stored temperature of the zone
    pub fn okay_to_burn(&self, u: &DVector<f64>) -> bool {
        let rho = u[URHO];
        let t = u[UTEMP];
        rho >= self.react_rho_min
            && rho <= self.react_rho_max
            && t >= self.react_T_min
            && t <= self.react_T_max
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SdcSettings {
    pub solver: SdcSolverType,
    /// relative Newton tolerance on species
    pub tol_spec: f64,
    /// relative Newton tolerance on internal energy
    pub tol_ener: f64,
    /// absolute floor of both Newton tolerances
    pub atol: f64,
    pub max_newton_iter: usize,
    /// largest number of sub-steps tried by the Newton subdivision
    pub max_newton_subdivide: usize,
    /// a species below -species_failure_tolerance * rho fails the Newton solve
    pub species_failure_tolerance: f64,
    #[serde(default)]
    pub integrator: IntegratorSettings,
    #[serde(default)]
    pub screening: BurnScreening,
    /// floor of the species renormalizer, as a mass fraction
    pub small_x: f64,
}

impl Default for SdcSettings {
    fn default() -> Self {
        Self {
            solver: SdcSolverType::Newton,
            tol_spec: 1.0e-6,
            tol_ener: 1.0e-6,
            atol: 1.0e-10,
            max_newton_iter: 100,
            max_newton_subdivide: 64,
            species_failure_tolerance: 1.0e-2,
            integrator: IntegratorSettings::default(),
            screening: BurnScreening::default(),
            small_x: 1.0e-30,
        }
    }
}

impl SdcSettings {
    pub fn validate(&self) -> Result<(), SolverError> {
        let positive = [
            ("tol_spec", self.tol_spec),
            ("tol_ener", self.tol_ener),
            ("integrator.rtol", self.integrator.rtol),
            ("integrator.initial_step_fraction", self.integrator.initial_step_fraction),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(SolverError::Config(format!("sdc.{} must be positive, got {}", name, value)));
            }
        }
        if self.atol < 0.0 || self.integrator.atol < 0.0 || self.species_failure_tolerance < 0.0 {
            return Err(SolverError::Config(
                "sdc absolute tolerances must not be negative".to_string(),
            ));
        }
        if self.integrator.initial_step_fraction > 1.0 {
            return Err(SolverError::Config(
                "sdc.integrator.initial_step_fraction must not exceed 1".to_string(),
            ));
        }
        if self.max_newton_iter == 0 || self.max_newton_subdivide == 0 || self.integrator.max_steps == 0 {
            return Err(SolverError::Config(
                "sdc iteration caps must be at least 1".to_string(),
            ));
        }
        let s = &self.screening;
        if s.react_rho_min > s.react_rho_max || s.react_T_min > s.react_T_max {
            return Err(SolverError::Config(format!("sdc.screening window is empty: {:?}", s)));
        }
        if !(0.0..1.0).contains(&self.small_x) {
            return Err(SolverError::Config(format!(
                "sdc.small_x must lie in [0, 1), got {}",
                self.small_x
            )));
        }
        Ok(())
    }
}
