//! # Equation of state interface
//!
//! The EOS is an oracle: given two of {rho, p, T, e} plus composition it
//! returns the remaining variables together with the partial derivatives the
//! Riemann and SDC solvers need. Implementations must be pure: no hidden state,
//! so one instance can be shared by every zone of a run.
//!
//! | Field | Meaning |
//! |-------|---------|
//! | `dpdr` | ∂p/∂ρ at constant T |
//! | `dpdT` | ∂p/∂T at constant ρ |
//! | `dedr` | ∂e/∂ρ at constant T |
//! | `dedT` | ∂e/∂T at constant ρ |
//! | `gam1` | first adiabatic index Γ1 |
use super::gamma_law::GammaLawEos;
use super::gas_radiation::GasRadiationEos;
use crate::errors::EosError;
use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};

/// which pair of thermodynamic variables is the input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EosInput {
    RhoP,
    RhoT,
    RhoE,
}

/// Thermodynamic scratch state of one zone
#[derive(Debug, Clone, Default, PartialEq)]
#[allow(non_snake_case)]
pub struct EosState {
    pub rho: f64,
    /// temperature; on input to the iterative modes it is only a guess
    pub T: f64,
    pub p: f64,
    /// specific internal energy
    pub e: f64,
    /// mass fractions
    pub xn: Vec<f64>,
    pub dpdr: f64,
    pub dpdT: f64,
    pub dedr: f64,
    pub dedT: f64,
    pub gam1: f64,
    /// adiabatic sound speed
    pub cs: f64,
}

#[allow(non_snake_case)]
impl EosState {
    pub fn new(rho: f64, T: f64, xn: &[f64]) -> Self {
        Self {
            rho,
            T,
            xn: xn.to_vec(),
            ..Default::default()
        }
    }

    /// state prepared for a rho-p call; `T_guess` seeds the iterative EOSes
    pub fn from_rho_p(rho: f64, p: f64, T_guess: f64, xn: &[f64]) -> Self {
        Self {
            rho,
            p,
            T: T_guess,
            xn: xn.to_vec(),
            ..Default::default()
        }
    }

    pub fn from_rho_e(rho: f64, e: f64, T_guess: f64, xn: &[f64]) -> Self {
        Self {
            rho,
            e,
            T: T_guess,
            xn: xn.to_vec(),
            ..Default::default()
        }
    }

    /// ∂e/∂ρ at constant pressure. Not returned by the EOS directly:
    /// de/dρ|_p = de/dρ|_T - de/dT * dp/dρ|_T / dp/dT|_ρ
    pub fn dedr_p(&self) -> f64 {
        self.dedr - self.dedT * self.dpdr / self.dpdT
    }

    /// Γ1 = (ρ/p) [dp/dρ|_T + T (dp/dT|_ρ)² / (ρ² de/dT|_ρ)], then cs = sqrt(Γ1 p / ρ)
    pub fn fill_gamma1(&mut self) {
        let cv = self.dedT;
        self.gam1 = (self.rho / self.p)
            * (self.dpdr + self.T * self.dpdT * self.dpdT / (self.rho * self.rho * cv));
        self.cs = (self.gam1 * self.p / self.rho).sqrt();
    }

    pub(crate) fn non_physical(&self, mode: EosInput, reason: &str) -> EosError {
        EosError::NonPhysicalInput {
            mode,
            reason: reason.to_string(),
            rho: self.rho,
            T: self.T,
            p: self.p,
            e: self.e,
            xn: self.xn.clone(),
        }
    }

    /// rejects inputs no EOS can make sense of
    pub(crate) fn check_input(&self, mode: EosInput) -> Result<(), EosError> {
        if !(self.rho.is_finite() && self.rho > 0.0) {
            return Err(self.non_physical(mode, "density must be positive"));
        }
        let (name, value) = match mode {
            EosInput::RhoT => ("temperature", self.T),
            EosInput::RhoP => ("pressure", self.p),
            EosInput::RhoE => ("internal energy", self.e),
        };
        if !(value.is_finite() && value > 0.0) {
            return Err(self.non_physical(mode, &format!("{} must be positive", name)));
        }
        Ok(())
    }
}

/// mean molecular weight: 1/μ = Σ X_k / A_k. Without species data μ = 1
pub fn mean_molecular_weight(xn: &[f64], aion: &[f64]) -> f64 {
    if aion.is_empty() || xn.is_empty() {
        return 1.0;
    }
    let inv: f64 = xn.iter().zip(aion.iter()).map(|(x, a)| x / a).sum();
    if inv > 0.0 { 1.0 / inv } else { 1.0 }
}

/// The EOS oracle contract
#[enum_dispatch]
pub trait EquationOfState {
    /// Complete `state` from the two input variables selected by `mode`
    fn eos(&self, mode: EosInput, state: &mut EosState) -> Result<(), EosError>;
    fn name(&self) -> &str;
}

/// EOS selectable from the run settings
#[enum_dispatch(EquationOfState)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EosModel {
    GammaLaw(GammaLawEos),
    GasRadiation(GasRadiationEos),
}

impl Default for EosModel {
    fn default() -> Self {
        EosModel::GammaLaw(GammaLawEos::default())
    }
}
