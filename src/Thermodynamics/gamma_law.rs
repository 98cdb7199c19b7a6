//! Gamma-law ideal gas: p = ρ R T / μ, e = p / ((γ - 1) ρ).
//! Analytic in every input mode.
use super::eos::{EosInput, EosState, EquationOfState, mean_molecular_weight};
use crate::errors::EosError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GammaLawEos {
    /// ratio of specific heats
    pub gamma: f64,
    /// gas constant per unit molecular weight
    pub gas_constant: f64,
    /// molecular weight of each species, empty means μ = 1
    #[serde(default)]
    pub aion: Vec<f64>,
}

impl Default for GammaLawEos {
    fn default() -> Self {
        Self {
            gamma: 5.0 / 3.0,
            gas_constant: 1.0,
            aion: Vec::new(),
        }
    }
}

impl GammaLawEos {
    pub fn new(gamma: f64, gas_constant: f64, aion: Vec<f64>) -> Self {
        Self {
            gamma,
            gas_constant,
            aion,
        }
    }
}

impl EquationOfState for GammaLawEos {
    #[allow(non_snake_case)]
    fn eos(&self, mode: EosInput, state: &mut EosState) -> Result<(), EosError> {
        state.check_input(mode)?;
        let mu = mean_molecular_weight(&state.xn, &self.aion);
        let R_mu = self.gas_constant / mu;
        let gm1 = self.gamma - 1.0;
        match mode {
            EosInput::RhoT => {
                state.p = state.rho * R_mu * state.T;
                state.e = state.p / (gm1 * state.rho);
            }
            EosInput::RhoP => {
                state.T = state.p / (state.rho * R_mu);
                state.e = state.p / (gm1 * state.rho);
            }
            EosInput::RhoE => {
                state.p = gm1 * state.rho * state.e;
                state.T = state.p / (state.rho * R_mu);
            }
        }
        state.dpdr = R_mu * state.T;
        state.dpdT = state.rho * R_mu;
        state.dedr = 0.0;
        state.dedT = R_mu / gm1;
        state.gam1 = self.gamma;
        state.cs = (self.gamma * state.p / state.rho).sqrt();
        Ok(())
    }

    fn name(&self) -> &str {
        "gamma_law"
    }
}
