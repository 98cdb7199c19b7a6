//! # Exact Riemann shock iterator
//!
//! For a trial star pressure `pstar` and the state `s` (left or right) that is
//! connected to the star region through a shock, find the shock mass flux `W_s`
//! that satisfies the Rankine-Hugoniot conditions with a general EOS
//! (Colella & Glaz 1985, Eqs. 12, 20, 23, 31, 34, 35).
//!
//! The energy jump condition W² [e] = ½ [p²] is zeroed with a Newton iteration:
//!
//! ```text
//! f(W)  = W² (e(pstar, ρ*(W)) - e_s) - ½ (pstar² - p_s²)
//! ρ*(W) = 1 / (1/ρ_s - (pstar - p_s)/W²)
//! f'(W) = 2W (e* - e_s) - 2 (∂e/∂ρ)_p (pstar - p_s) ρ*² / W
//! ```
//!
//! Each update is clamped to `[W/2, 2W]`. The converged `W_s` gives the
//! impedance `Z_s = W²/(W - dW/dpstar (pstar - p_s))` used by the enclosing
//! two-shock iteration.
use crate::Thermodynamics::eos::{EosInput, EosState, EquationOfState};
use crate::errors::{RiemannError, ShockHistory, SolverError};
use log::{debug, error};
use prettytable::{Table, row};
use serde::{Deserialize, Serialize};

/// Tolerances and caps of the Riemann iterations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(non_snake_case)]
pub struct RiemannShockParams {
    /// cap on the Newton iteration counter, which starts at 1; at most
    /// `riemann_shock_maxiter - 1` updates of W_s are taken
    pub riemann_shock_maxiter: usize,
    /// relative tolerance on W_s
    pub riemann_pstar_tol: f64,
    /// relative pressure jump below which the shock is treated as acoustic
    pub riemann_p_tol: f64,
    /// floor on the post-shock specific volume when the seed W_s is too small
    pub small_tau: f64,
    /// floor on the star pressure of the two-shock iteration
    pub small_pres: f64,
    /// temperature guess handed to the EOS in rho-p mode
    pub T_guess: f64,
    /// two-shock star pressure iteration cap and relative tolerance
    pub cg_maxiter: usize,
    pub cg_tol: f64,
}

impl Default for RiemannShockParams {
    fn default() -> Self {
        Self {
            riemann_shock_maxiter: 2000,
            riemann_pstar_tol: 1.0e-5,
            riemann_p_tol: 1.0e-8,
            small_tau: 1.0e-10,
            small_pres: 1.0e-200,
            T_guess: 1.0e8,
            cg_maxiter: 12,
            cg_tol: 1.0e-5,
        }
    }
}

/// State on one side of the interface
#[derive(Debug, Clone, PartialEq)]
pub struct PreShockState {
    pub rho: f64,
    pub u: f64,
    pub p: f64,
    pub xn: Vec<f64>,
}

impl PreShockState {
    pub fn new(rho: f64, u: f64, p: f64, xn: &[f64]) -> Self {
        Self {
            rho,
            u,
            p,
            xn: xn.to_vec(),
        }
    }
}

/// Shock-branch star state for one side
#[derive(Debug, Clone, PartialEq)]
#[allow(non_snake_case)]
pub struct ShockStar {
    /// shock mass flux
    pub W: f64,
    pub rhostar: f64,
    /// impedance handed back to the two-shock iteration
    pub Z: f64,
    /// sqrt(Γ1 pstar ρ*)
    pub C: f64,
    /// None in the acoustic limit, where the closed form is 0/0
    pub dW2dpstar: Option<f64>,
    pub dWdpstar: Option<f64>,
    /// Newton iterations spent, zero in the acoustic limit
    pub iterations: usize,
}

/// residual of the energy jump condition and its derivative at one W
#[derive(Debug, Clone, Copy)]
pub struct ShockResidual {
    pub rhostar: f64,
    pub f: f64,
    pub fprime: f64,
}

/// ρ* from the momentum and mass jump conditions (C&G Eq. 12)
#[allow(non_snake_case)]
pub fn rhostar_from_W(W_s: f64, pstar: f64, rho_s: f64, p_s: f64) -> f64 {
    // 1 / (1/ρ_s - (pstar - p_s)/W²), written so that pstar == p_s returns ρ_s exactly
    rho_s / (1.0 - rho_s * (pstar - p_s) / (W_s * W_s))
}

/// Evaluate f and f' at `W_s`. `eos_state` is left holding the EOS call at (ρ*, pstar).
#[allow(non_snake_case)]
pub fn shock_residual<E: EquationOfState>(
    W_s: f64,
    pstar: f64,
    side: &PreShockState,
    e_s: f64,
    T_guess: f64,
    eos: &E,
    eos_state: &mut EosState,
) -> Result<ShockResidual, SolverError> {
    let rhostar = rhostar_from_W(W_s, pstar, side.rho, side.p);

    *eos_state = EosState::from_rho_p(rhostar, pstar, T_guess, &side.xn);
    eos.eos(EosInput::RhoP, eos_state)?;

    let f = W_s * W_s * (eos_state.e - e_s) - 0.5 * (pstar * pstar - side.p * side.p);
    let dedrho_p = eos_state.dedr_p();
    let fprime = 2.0 * W_s * (eos_state.e - e_s)
        - 2.0 * dedrho_p * (pstar - side.p) * rhostar * rhostar / W_s;

    Ok(ShockResidual {
        rhostar,
        f,
        fprime,
    })
}

/// Newton iteration on W_s starting from the value passed in.
///
/// Every iterate `(ρ*, W)` is pushed to `history`. Returns whether the
/// iteration converged within `riemann_shock_maxiter`.
#[allow(non_snake_case)]
pub fn newton_shock<E: EquationOfState>(
    W_s: &mut f64,
    pstar: f64,
    side: &PreShockState,
    e_s: f64,
    params: &RiemannShockParams,
    eos: &E,
    history: &mut ShockHistory,
) -> Result<bool, SolverError> {
    let mut eos_state = EosState::default();
    let mut converged = false;

    let mut iter = 1;
    while !converged && iter < params.riemann_shock_maxiter {
        let res = shock_residual(*W_s, pstar, side, e_s, params.T_guess, eos, &mut eos_state)?;

        let dW = -res.f / res.fprime;
        if !dW.is_finite() {
            // f' vanished; leave the iterate as is and report non-convergence
            break;
        }
        if dW.abs() < params.riemann_pstar_tol * *W_s {
            converged = true;
        }

        *W_s = (*W_s + dW).clamp(0.5 * *W_s, 2.0 * *W_s);
        history.push((res.rhostar, *W_s));
        iter += 1;
    }
    Ok(converged)
}

fn dump_history(pstar: f64, history: &ShockHistory) {
    let mut table = Table::new();
    table.add_row(row!["iteration", "rhostar", "W_s"]);
    for (i, (rhostar, w)) in history.iter().enumerate() {
        table.add_row(row![i, format!("{:.10e}", rhostar), format!("{:.10e}", w)]);
    }
    error!("shock did not converge for pstar = {:.6e}\n{}", pstar, table);
}

/// Shock branch of the exact Riemann solver for one side.
///
/// `gammaE_bar` and `gammaC_bar` are the caller's interface averages of
/// γE = p/(ρe) + 1 and γC = Γ1, used only to seed W_s.
#[allow(non_snake_case)]
pub fn shock<E: EquationOfState>(
    pstar: f64,
    side: &PreShockState,
    gammaE_bar: f64,
    gammaC_bar: f64,
    params: &RiemannShockParams,
    eos: &E,
) -> Result<ShockStar, SolverError> {
    let rho_s = side.rho;
    let p_s = side.p;

    // pre-shock energy
    let mut eos_state = EosState::from_rho_p(rho_s, p_s, params.T_guess, &side.xn);
    eos.eos(EosInput::RhoP, &mut eos_state)?;
    let e_s = eos_state.e;
    let gam1_s = eos_state.gam1;

    let acoustic = (pstar - p_s).abs() < params.riemann_p_tol * p_s;

    // seed: C&G Eq. 35 for a vanishing jump, otherwise Eq. 34 with γE* from Eq. 31
    let mut W_s = if pstar - p_s < params.riemann_p_tol * p_s {
        (gam1_s * p_s * rho_s).sqrt()
    } else {
        let gammaE_s = p_s / (rho_s * e_s) + 1.0;
        let gammaE_star = gammaE_s
            + 2.0 * (1.0 - gammaE_bar / gammaC_bar) * (gammaE_bar - 1.0) * (pstar - p_s)
                / (pstar + p_s);
        ((pstar - p_s) * (pstar + 0.5 * (gammaE_star - 1.0) * (pstar + p_s))
            / (pstar / rho_s - (gammaE_star - 1.0) / (gammaE_s - 1.0) * p_s / rho_s))
            .sqrt()
    };
    if !(W_s.is_finite() && W_s > 0.0) {
        W_s = (gam1_s * p_s * rho_s).sqrt();
    }

    let taustar_s = 1.0 / rho_s - (pstar - p_s) / (W_s * W_s);
    if taustar_s < 0.0 {
        // the seed overshoots the compression: floor τ* and take W_s from the mass jump
        let taustar_floor = params.small_tau.min(0.5 / rho_s);
        W_s = ((pstar - p_s) / (1.0 / rho_s - taustar_floor)).sqrt();
        debug!(
            "shock seed gave negative specific volume, W_s reset to {:.6e}",
            W_s
        );
    }

    if acoustic {
        let rhostar = rhostar_from_W(W_s, pstar, rho_s, p_s);
        // sound speed of the star state, as on the shock branch
        let mut star_state = EosState::from_rho_p(rhostar, pstar, params.T_guess, &side.xn);
        eos.eos(EosInput::RhoP, &mut star_state)?;
        return Ok(ShockStar {
            W: W_s,
            rhostar,
            Z: W_s,
            C: (star_state.gam1 * pstar * rhostar).sqrt(),
            dW2dpstar: None,
            dWdpstar: None,
            iterations: 0,
        });
    }

    let mut history = ShockHistory::new();
    let converged = newton_shock(&mut W_s, pstar, side, e_s, params, eos, &mut history)?;
    if !converged {
        dump_history(pstar, &history);
        return Err(RiemannError::ShockNotConverged {
            pstar,
            rho_s,
            p_s,
            history,
        }
        .into());
    }

    let rhostar = rhostar_from_W(W_s, pstar, rho_s, p_s);
    let mut star_state = EosState::from_rho_p(rhostar, pstar, params.T_guess, &side.xn);
    eos.eos(EosInput::RhoP, &mut star_state)?;

    // dW²/dpstar from C&G Eq. 23, then dW/dpstar = dW²/dpstar / 2W
    let C = (star_state.gam1 * pstar * rhostar).sqrt();
    let p_e = star_state.dpdT / star_state.dedT;
    let p_rho = star_state.dpdr - star_state.dpdT * star_state.dedr / star_state.dedT;
    let p_tau = -rhostar * rhostar * p_rho;

    let dW2dpstar =
        (C * C - W_s * W_s) * W_s * W_s / ((0.5 * (pstar + p_s) * p_e - p_tau) * (pstar - p_s));
    let dWdpstar = 0.5 * dW2dpstar / W_s;
    let Z = W_s * W_s / (W_s - dWdpstar * (pstar - p_s));

    debug!(
        "shock converged in {} iterations: W_s = {:.6e}, rhostar = {:.6e}, Z = {:.6e}",
        history.len(),
        W_s,
        rhostar,
        Z
    );

    Ok(ShockStar {
        W: W_s,
        rhostar,
        Z,
        C,
        dW2dpstar: Some(dW2dpstar),
        dWdpstar: Some(dWdpstar),
        iterations: history.len(),
    })
}
