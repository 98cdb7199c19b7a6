//! Two-shock approximation of the star state (Colella & Glaz 1985).
//!
//! Both waves are treated as shocks and the star pressure is iterated with
//! the impedances returned by the shock branch:
//!
//! ```text
//! u*_l = u_l - (p* - p_l)/W_l
//! u*_r = u_r + (p* - p_r)/W_r
//! p*  <- p* - Z_l Z_r (u*_r - u*_l) / (Z_l + Z_r)
//! ```
use super::riemann_shock::{PreShockState, RiemannShockParams, ShockStar, shock};
use crate::Thermodynamics::eos::{EosInput, EosState, EquationOfState};
use crate::errors::{RiemannError, SolverError};
use log::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct TwoShockSolution {
    pub pstar: f64,
    pub ustar: f64,
    pub left: ShockStar,
    pub right: ShockStar,
    pub iterations: usize,
}

/// (γE, Γ1, Lagrangian sound speed) of one side
fn side_gammas<E: EquationOfState>(
    side: &PreShockState,
    params: &RiemannShockParams,
    eos: &E,
) -> Result<(f64, f64, f64), SolverError> {
    let mut state = EosState::from_rho_p(side.rho, side.p, params.T_guess, &side.xn);
    eos.eos(EosInput::RhoP, &mut state)?;
    let gammaE = side.p / (side.rho * state.e) + 1.0;
    let lagrangian_c = (state.gam1 * side.p * side.rho).sqrt();
    Ok((gammaE, state.gam1, lagrangian_c))
}

/// Iterate the star pressure with both sides connected through shocks
#[allow(non_snake_case)]
pub fn two_shock_star_state<E: EquationOfState>(
    left: &PreShockState,
    right: &PreShockState,
    params: &RiemannShockParams,
    eos: &E,
) -> Result<TwoShockSolution, SolverError> {
    let (gammaE_l, gammaC_l, C_l) = side_gammas(left, params, eos)?;
    let (gammaE_r, gammaC_r, C_r) = side_gammas(right, params, eos)?;
    let gammaE_bar = 0.5 * (gammaE_l + gammaE_r);
    let gammaC_bar = 0.5 * (gammaC_l + gammaC_r);

    // acoustic (linearized) estimate
    let mut pstar = ((C_r * left.p + C_l * right.p + C_l * C_r * (left.u - right.u)) / (C_l + C_r))
        .max(params.small_pres);

    for iter in 0..params.cg_maxiter {
        let l = shock(pstar, left, gammaE_bar, gammaC_bar, params, eos)?;
        let r = shock(pstar, right, gammaE_bar, gammaC_bar, params, eos)?;

        let ustar_l = left.u - (pstar - left.p) / l.W;
        let ustar_r = right.u + (pstar - right.p) / r.W;

        let pstar_new =
            (pstar - l.Z * r.Z * (ustar_r - ustar_l) / (l.Z + r.Z)).max(params.small_pres);
        let dp = (pstar_new - pstar).abs();
        debug!("two-shock iteration {}: pstar = {:.10e}, dp = {:.3e}", iter, pstar_new, dp);
        pstar = pstar_new;

        if dp < params.cg_tol * pstar {
            let l = shock(pstar, left, gammaE_bar, gammaC_bar, params, eos)?;
            let r = shock(pstar, right, gammaE_bar, gammaC_bar, params, eos)?;
            let ustar_l = left.u - (pstar - left.p) / l.W;
            let ustar_r = right.u + (pstar - right.p) / r.W;
            return Ok(TwoShockSolution {
                pstar,
                ustar: 0.5 * (ustar_l + ustar_r),
                left: l,
                right: r,
                iterations: iter + 1,
            });
        }
    }

    warn!(
        "two-shock star pressure did not converge in {} iterations",
        params.cg_maxiter
    );
    Err(RiemannError::StarPressureNotConverged {
        iterations: params.cg_maxiter,
        pstar,
    }
    .into())
}
