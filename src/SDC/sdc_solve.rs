//! # Reactive SDC zone solver
//!
//! Advances one zone from `U_old` to `U_new` with
//! `U_new = U_old + dt R(U_new) + dt C`, where `C` carries advection and the
//! SDC correction terms and stays fixed during the solve.
//!
//! | entry point | role |
//! |-------------|------|
//! | `solve` | strategy dispatch (Newton, stiff integrator, hybrid) |
//! | `update_o2` | second-order update of `k_m` into `k_n`, returns the reaction rate used |
//! | `update_centers_o4` | fourth-order update on cell centers, `U_new` comes in as the guess |
//! | `instantaneous_react` | reaction source of a state, zero outside the burn window |
//!
//! Zones outside the density/temperature burn window skip the solve entirely and
//! take `U_new = U_old + dt C`.
use super::sdc_newton::sdc_newton_subdivide;
use super::sdc_settings::{SdcSettings, SdcSolverType};
use super::stiff_integrator::stiff_integrate;
use crate::Kinetics::reaction_source::ReactionSource;
use crate::Thermodynamics::eos::EquationOfState;
use crate::errors::{NewtonStatus, SdcError, SolverError};
use log::error;
use nalgebra::DVector;

/// Per-zone reactive solver. Holds only shared references, so one instance
/// serves every zone of a sweep.
pub struct SdcZoneSolver<'a, E: EquationOfState, N: ReactionSource> {
    pub settings: &'a SdcSettings,
    pub eos: &'a E,
    pub network: &'a N,
}

impl<'a, E: EquationOfState, N: ReactionSource> SdcZoneSolver<'a, E, N> {
    pub fn new(settings: &'a SdcSettings, eos: &'a E, network: &'a N) -> Self {
        Self {
            settings,
            eos,
            network,
        }
    }

    /// the single screening predicate every variant goes through
    pub fn okay_to_burn(&self, u: &DVector<f64>) -> bool {
        self.settings.screening.okay_to_burn(u)
    }

    fn newton(
        &self,
        dt: f64,
        u_old: &DVector<f64>,
        u_new: &mut DVector<f64>,
        c: &DVector<f64>,
        sdc_iteration: usize,
    ) -> Result<(), SolverError> {
        let status = sdc_newton_subdivide(
            dt,
            u_old,
            u_new,
            c,
            self.settings,
            self.eos,
            self.network,
        )?;
        if status != NewtonStatus::Success {
            error!(
                "reactive SDC Newton failed with {:?} after subdividing dt = {:.6e} (sdc iteration {})",
                status, dt, sdc_iteration
            );
            return Err(SdcError::NewtonFailure {
                status,
                dt,
                sdc_iteration,
            }
            .into());
        }
        Ok(())
    }

    /// Implicit reactive solve of one zone with the configured strategy.
    /// `u_new` comes in as the initial guess.
    pub fn solve(
        &self,
        dt: f64,
        u_old: &DVector<f64>,
        u_new: &mut DVector<f64>,
        c: &DVector<f64>,
        sdc_iteration: usize,
    ) -> Result<(), SolverError> {
        match self.settings.solver {
            SdcSolverType::Newton => self.newton(dt, u_old, u_new, c, sdc_iteration),
            SdcSolverType::StiffIntegrator => {
                stiff_integrate(dt, u_old, u_new, c, self.settings, self.eos, self.network)?;
                Ok(())
            }
            SdcSolverType::Hybrid => {
                if sdc_iteration == 0 {
                    stiff_integrate(dt, u_old, u_new, c, self.settings, self.eos, self.network)?;
                }
                self.newton(dt, u_old, u_new, c, sdc_iteration)
            }
        }
    }

    /// Second-order update of `k_m` into `k_n`. The guess is extrapolated with
    /// `A_m` and the old rate on the first SDC iteration and taken from `k_n`
    /// afterwards. The reactions are re-evaluated at the solution so the update
    /// is conservative; that rate is returned.
    #[allow(clippy::too_many_arguments)]
    pub fn update_o2(
        &self,
        k_m: &DVector<f64>,
        k_n: &mut DVector<f64>,
        a_m: &DVector<f64>,
        r_m_old: &DVector<f64>,
        c: &DVector<f64>,
        dt: f64,
        sdc_iteration: usize,
    ) -> Result<DVector<f64>, SolverError> {
        let r_full = if self.okay_to_burn(k_m) {
            let mut u_new = if sdc_iteration == 0 {
                k_m + a_m * dt + r_m_old * dt
            } else {
                k_n.clone()
            };
            self.solve(dt, k_m, &mut u_new, c, sdc_iteration)?;
            self.network.react(&u_new)?
        } else {
            self.network.layout().zeros()
        };

        for i in 0..k_n.len() {
            k_n[i] = k_m[i] + dt * r_full[i] + dt * c[i];
        }
        Ok(r_full)
    }

    /// Fourth-order update on cell centers; `u_new` comes in as the guess.
    pub fn update_centers_o4(
        &self,
        u_old: &DVector<f64>,
        u_new: &mut DVector<f64>,
        c: &DVector<f64>,
        dt: f64,
        sdc_iteration: usize,
    ) -> Result<(), SolverError> {
        if self.okay_to_burn(u_old) {
            self.solve(dt, u_old, u_new, c, sdc_iteration)
        } else {
            for i in 0..u_new.len() {
                u_new[i] = u_old[i] + dt * c[i];
            }
            Ok(())
        }
    }

    pub fn instantaneous_react(&self, u: &DVector<f64>) -> Result<DVector<f64>, SolverError> {
        if self.okay_to_burn(u) {
            self.network.react(u)
        } else {
            Ok(self.network.layout().zeros())
        }
    }
}
