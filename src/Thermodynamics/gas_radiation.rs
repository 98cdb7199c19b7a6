//! Ideal monatomic gas plus blackbody radiation
//!
//! p = ρ R T / μ + a T⁴ / 3
//! e = 3 R T / (2 μ) + a T⁴ / ρ
//!
//! The rho-p and rho-e modes have no closed form, so the temperature is found
//! by Newton iteration. Both p(T) and e(T) are convex and increasing, so the
//! iteration is started from the smaller of the pure-gas and pure-radiation
//! temperatures, which bounds the root from above and makes the iterates
//! decrease monotonically onto it.
use super::eos::{EosInput, EosState, EquationOfState, mean_molecular_weight};
use crate::errors::EosError;
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GasRadiationEos {
    pub gas_constant: f64,
    /// radiation constant
    pub a_rad: f64,
    #[serde(default)]
    pub aion: Vec<f64>,
    /// relative tolerance on the temperature iteration
    pub tolerance: f64,
    pub max_iter: usize,
}

impl Default for GasRadiationEos {
    fn default() -> Self {
        Self {
            gas_constant: 1.0,
            a_rad: 1.0,
            aion: Vec::new(),
            tolerance: 1e-12,
            max_iter: 100,
        }
    }
}

#[allow(non_snake_case)]
impl GasRadiationEos {
    pub fn new(gas_constant: f64, a_rad: f64, aion: Vec<f64>) -> Self {
        Self {
            gas_constant,
            a_rad,
            aion,
            ..Default::default()
        }
    }

    fn pressure(&self, rho: f64, T: f64, R_mu: f64) -> (f64, f64) {
        let p = rho * R_mu * T + self.a_rad * T.powi(4) / 3.0;
        let dpdT = rho * R_mu + 4.0 * self.a_rad * T.powi(3) / 3.0;
        (p, dpdT)
    }

    fn energy(&self, rho: f64, T: f64, R_mu: f64) -> (f64, f64) {
        let e = 1.5 * R_mu * T + self.a_rad * T.powi(4) / rho;
        let dedT = 1.5 * R_mu + 4.0 * self.a_rad * T.powi(3) / rho;
        (e, dedT)
    }

    /// Newton on T for target(T) = value, starting from above the root
    fn invert(
        &self,
        mode: EosInput,
        state: &EosState,
        T_start: f64,
        f: impl Fn(f64) -> (f64, f64),
        value: f64,
    ) -> Result<f64, EosError> {
        let mut T = T_start;
        for iter in 0..self.max_iter {
            let (g, dg) = f(T);
            let dT = (g - value) / dg;
            T = (T - dT).max(0.5 * T);
            if dT.abs() < self.tolerance * T {
                debug!("gas+radiation EOS converged in {} iterations, T = {:.6e}", iter + 1, T);
                return Ok(T);
            }
        }
        Err(EosError::NotConverged {
            mode,
            iterations: self.max_iter,
            rho: state.rho,
            T,
            p: state.p,
            e: state.e,
            xn: state.xn.clone(),
        })
    }
}

impl EquationOfState for GasRadiationEos {
    #[allow(non_snake_case)]
    fn eos(&self, mode: EosInput, state: &mut EosState) -> Result<(), EosError> {
        state.check_input(mode)?;
        let mu = mean_molecular_weight(&state.xn, &self.aion);
        let R_mu = self.gas_constant / mu;
        let rho = state.rho;
        match mode {
            EosInput::RhoT => {}
            EosInput::RhoP => {
                let T_gas = state.p / (rho * R_mu);
                let T_rad = if self.a_rad > 0.0 {
                    (3.0 * state.p / self.a_rad).powf(0.25)
                } else {
                    f64::INFINITY
                };
                state.T = self.invert(
                    mode,
                    state,
                    T_gas.min(T_rad),
                    |T| self.pressure(rho, T, R_mu),
                    state.p,
                )?;
            }
            EosInput::RhoE => {
                let T_gas = state.e / (1.5 * R_mu);
                let T_rad = if self.a_rad > 0.0 {
                    (state.e * rho / self.a_rad).powf(0.25)
                } else {
                    f64::INFINITY
                };
                state.T = self.invert(
                    mode,
                    state,
                    T_gas.min(T_rad),
                    |T| self.energy(rho, T, R_mu),
                    state.e,
                )?;
            }
        }
        let T = state.T;
        let (p, dpdT) = self.pressure(rho, T, R_mu);
        let (e, dedT) = self.energy(rho, T, R_mu);
        state.p = p;
        state.e = e;
        state.dpdT = dpdT;
        state.dedT = dedT;
        state.dpdr = R_mu * T;
        state.dedr = -self.a_rad * T.powi(4) / (rho * rho);
        state.fill_gamma1();
        Ok(())
    }

    fn name(&self) -> &str {
        "gas_radiation"
    }
}
