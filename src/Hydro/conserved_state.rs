//! # Conserved state layout
//!
//! A zone carries one `DVector<f64>` of conserved quantities ordered as
//!
//! | index | quantity |
//! |-------|----------|
//! | `URHO` | mass density ρ |
//! | `UMX`, `UMY`, `UMZ` | momentum density |
//! | `UEDEN` | total energy density ρE |
//! | `UEINT` | internal energy density ρe |
//! | `UTEMP` | temperature |
//! | `ufs()..ufs()+nspec` | species partial densities ρX_k |
//! | `ufx()..ufx()+naux` | auxiliary advected scalars |
//!
//! The layout is a small value type so both oracles and both solvers agree on it.
use crate::Thermodynamics::eos::{EosInput, EosState, EquationOfState};
use crate::errors::SolverError;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

pub const URHO: usize = 0;
pub const UMX: usize = 1;
pub const UMY: usize = 2;
pub const UMZ: usize = 3;
pub const UEDEN: usize = 4;
pub const UEINT: usize = 5;
pub const UTEMP: usize = 6;
const UFS: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateLayout {
    pub nspec: usize,
    #[serde(default)]
    pub naux: usize,
}

impl StateLayout {
    pub fn new(nspec: usize, naux: usize) -> Self {
        Self { nspec, naux }
    }

    /// first species index
    pub fn ufs(&self) -> usize {
        UFS
    }

    /// first auxiliary index
    pub fn ufx(&self) -> usize {
        UFS + self.nspec
    }

    /// length of the conserved vector
    pub fn nvar(&self) -> usize {
        UFS + self.nspec + self.naux
    }

    pub fn species(&self) -> std::ops::Range<usize> {
        UFS..UFS + self.nspec
    }

    /// components that reactions change implicitly: species and internal energy
    pub fn reacting_components(&self) -> Vec<usize> {
        let mut vars: Vec<usize> = self.species().collect();
        vars.push(UEINT);
        vars
    }

    pub fn zeros(&self) -> DVector<f64> {
        DVector::zeros(self.nvar())
    }

    /// mass fractions X_k = ρX_k / ρ
    pub fn mass_fractions(&self, u: &DVector<f64>) -> Vec<f64> {
        let rho = u[URHO];
        self.species().map(|n| u[n] / rho).collect()
    }

    /// EOS scratch state for a rho-e call; the stored temperature is the guess
    pub fn eos_state(&self, u: &DVector<f64>) -> EosState {
        let rho = u[URHO];
        EosState::from_rho_e(rho, u[UEINT] / rho, u[UTEMP], &self.mass_fractions(u))
    }

    /// Temperature consistent with (ρ, ρe, ρX) in `u`
    pub fn temperature<E: EquationOfState>(
        &self,
        u: &DVector<f64>,
        eos: &E,
    ) -> Result<f64, SolverError> {
        let mut state = self.eos_state(u);
        eos.eos(EosInput::RhoE, &mut state)?;
        Ok(state.T)
    }

    /// overwrite `UTEMP` with the EOS temperature
    pub fn update_temperature<E: EquationOfState>(
        &self,
        u: &mut DVector<f64>,
        eos: &E,
    ) -> Result<(), SolverError> {
        u[UTEMP] = self.temperature(u, eos)?;
        Ok(())
    }

    /// Build the conserved vector of a zone from density, velocity, temperature,
    /// mass fractions and auxiliaries
    #[allow(non_snake_case)]
    pub fn conserved_from_primitive<E: EquationOfState>(
        &self,
        rho: f64,
        vel: [f64; 3],
        T: f64,
        xn: &[f64],
        aux: &[f64],
        eos: &E,
    ) -> Result<DVector<f64>, SolverError> {
        if xn.len() != self.nspec || aux.len() != self.naux {
            return Err(SolverError::Config(format!(
                "expected {} mass fractions and {} auxiliaries, got {} and {}",
                self.nspec,
                self.naux,
                xn.len(),
                aux.len()
            )));
        }
        let mut state = EosState::new(rho, T, xn);
        eos.eos(EosInput::RhoT, &mut state)?;

        let mut u = self.zeros();
        let kinetic = 0.5 * rho * vel.iter().map(|v| v * v).sum::<f64>();
        u[URHO] = rho;
        u[UMX] = rho * vel[0];
        u[UMY] = rho * vel[1];
        u[UMZ] = rho * vel[2];
        u[UEINT] = rho * state.e;
        u[UEDEN] = rho * state.e + kinetic;
        u[UTEMP] = T;
        for (k, n) in self.species().enumerate() {
            u[n] = rho * xn[k];
        }
        for (k, x) in aux.iter().enumerate() {
            u[self.ufx() + k] = rho * x;
        }
        Ok(u)
    }
}
