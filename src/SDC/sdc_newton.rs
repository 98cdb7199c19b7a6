//! # Implicit Newton solve of one reactive zone
//!
//! Solves `U_new = U_old + dt R(U_new) + dt C` for the reacting components
//! w = (ρX_1 .. ρX_nspec, ρe):
//!
//! ```text
//! F(w) = w - w_old - dt C_w - dt R_w(U)
//! J    = I - dt ∂R_w/∂w
//! J δ  = -F,   w <- w + δ
//! ```
//!
//! Density, momenta and auxiliaries do not react and take `U_old + dt C`
//! directly. Total energy is rebuilt from the converged state and the
//! temperature is refreshed from the EOS.
use super::sdc_settings::SdcSettings;
use crate::Hydro::conserved_state::{UEDEN, UEINT, URHO, UTEMP};
use crate::Kinetics::reaction_source::ReactionSource;
use crate::Thermodynamics::eos::EquationOfState;
use crate::errors::{NewtonStatus, SolverError};
use log::{debug, warn};
use nalgebra::{DMatrix, DVector};

/// EOS failures on an intermediate Newton iterate fail the attempt instead of
/// the whole update, so subdivision still gets its chance
fn on_iterate<T>(result: Result<T, SolverError>, iter: usize) -> Result<Option<T>, SolverError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(SolverError::Eos(e)) => {
            warn!("reactive SDC Newton: EOS failed on iterate {}: {}", iter, e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// One Newton solve over the full step `dt`. `u_new` holds the initial guess on
/// entry and the solution on `NewtonStatus::Success`.
pub fn sdc_newton_solve<E: EquationOfState, N: ReactionSource>(
    dt: f64,
    u_old: &DVector<f64>,
    u_new: &mut DVector<f64>,
    c: &DVector<f64>,
    settings: &SdcSettings,
    eos: &E,
    network: &N,
) -> Result<NewtonStatus, SolverError> {
    let layout = *network.layout();
    let vars = layout.reacting_components();
    let nspec = layout.nspec;

    for i in 0..layout.nvar() {
        if i != UEDEN && i != UTEMP && !vars.contains(&i) {
            u_new[i] = u_old[i] + dt * c[i];
        }
    }
    let rho = u_new[URHO];

    let mut converged = false;
    for iter in 0..settings.max_newton_iter {
        let Some(r) = on_iterate(network.react(u_new), iter)? else {
            return Ok(NewtonStatus::ConvergenceFailure);
        };
        let Some(dr) = on_iterate(network.jacobian(u_new, &vars), iter)? else {
            return Ok(NewtonStatus::ConvergenceFailure);
        };

        let n = vars.len();
        let jac = DMatrix::<f64>::identity(n, n) - dr * dt;
        let f = DVector::from_iterator(
            n,
            vars.iter()
                .map(|&i| u_new[i] - u_old[i] - dt * c[i] - dt * r[i]),
        );
        let Some(delta) = jac.lu().solve(&(-f)) else {
            debug!("reactive SDC Newton: singular Jacobian at iteration {}", iter);
            return Ok(NewtonStatus::SingularMatrix);
        };

        for (k, &i) in vars.iter().enumerate() {
            u_new[i] += delta[k];
        }
        if !delta.iter().all(|d| d.is_finite()) {
            return Ok(NewtonStatus::ConvergenceFailure);
        }
        if vars[..nspec]
            .iter()
            .any(|&i| u_new[i] < -settings.species_failure_tolerance * rho)
        {
            debug!("reactive SDC Newton: bad mass fractions at iteration {}", iter);
            return Ok(NewtonStatus::BadMassFractions);
        }
        if on_iterate(layout.update_temperature(u_new, eos), iter)?.is_none() {
            return Ok(NewtonStatus::ConvergenceFailure);
        }

        let species_ok = vars[..nspec].iter().enumerate().all(|(k, &i)| {
            delta[k].abs() <= settings.tol_spec * (u_new[i].abs() + settings.atol * rho)
        });
        let energy_ok =
            delta[nspec].abs() <= settings.tol_ener * (u_new[UEINT].abs() + settings.atol);
        debug!(
            "reactive SDC Newton iteration {}: |delta| = {:.3e}",
            iter,
            delta.norm()
        );
        if species_ok && energy_ok {
            converged = true;
            break;
        }
    }
    if !converged {
        return Ok(NewtonStatus::ConvergenceFailure);
    }

    let Some(r) = on_iterate(network.react(u_new), settings.max_newton_iter)? else {
        return Ok(NewtonStatus::ConvergenceFailure);
    };
    u_new[UEDEN] = u_old[UEDEN] + dt * c[UEDEN] + dt * r[UEDEN];
    Ok(NewtonStatus::Success)
}

/// Newton solve that retries with 2, 4, ... equal sub-steps (same `C` in each)
/// up to `max_newton_subdivide`. The caller's guess seeds the single-step
/// attempt; a subdivided sub-step starts from the state it begins at. On failure
/// `u_new` is restored and the last status is returned.
pub fn sdc_newton_subdivide<E: EquationOfState, N: ReactionSource>(
    dt: f64,
    u_old: &DVector<f64>,
    u_new: &mut DVector<f64>,
    c: &DVector<f64>,
    settings: &SdcSettings,
    eos: &E,
    network: &N,
) -> Result<NewtonStatus, SolverError> {
    let guess = u_new.clone();
    let mut nsub = 1;
    let mut status = NewtonStatus::ConvergenceFailure;

    while nsub <= settings.max_newton_subdivide {
        let dt_sub = dt / nsub as f64;
        let mut u_begin = u_old.clone();
        for isub in 0..nsub {
            if nsub == 1 {
                u_new.copy_from(&guess);
            } else {
                u_new.copy_from(&u_begin);
            }
            status = sdc_newton_solve(dt_sub, &u_begin, u_new, c, settings, eos, network)?;
            if status != NewtonStatus::Success {
                debug!("reactive SDC Newton: sub-step {} of {} failed with {:?}", isub, nsub, status);
                break;
            }
            u_begin.copy_from(u_new);
        }
        if status == NewtonStatus::Success {
            if nsub > 1 {
                warn!("reactive SDC Newton converged after subdividing dt = {:.6e} into {} steps", dt, nsub);
            }
            return Ok(status);
        }
        nsub *= 2;
    }

    u_new.copy_from(&guess);
    Ok(status)
}
