//! # Stiff integrator
//!
//! Integrates `dU/dt = R(U) + C` over `[0, dt]` with the variable-order BDF
//! solver of `diffsol`. The right-hand side is the reaction oracle plus the
//! frozen advective/SDC source; its Jacobian action is built from
//! `ReactionSource::jacobian` over the species and ρe, which are the only
//! components `R` moves.
//!
//! | setting | role |
//! |---------|------|
//! | `rtol`, `atol` | BDF error control, `atol` applied to every component |
//! | `initial_step_fraction` | first step `h0 = fraction * dt` |
//! | `max_steps` | cap on internal BDF steps before `IntegratorFailure` |
//!
//! The oracle cannot fail inside the solver, so an oracle error poisons the
//! right-hand side with NaN; the solver then gives up and the stored oracle
//! error is returned in place of the solver's own.
use super::sdc_settings::SdcSettings;
use crate::Kinetics::reaction_source::ReactionSource;
use crate::Thermodynamics::eos::EquationOfState;
use crate::errors::{SdcError, SolverError};
use diffsol::{
    NalgebraLU, NalgebraMat, NalgebraVec, OdeBuilder, OdeSolverMethod, OdeSolverStopReason,
    VectorHost,
};
use log::{debug, error};
use nalgebra::{DMatrix, DVector};
use std::cell::RefCell;

type M = NalgebraMat<f64>;
type LS = NalgebraLU<f64>;

/// statistics of one integration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntegratorStats {
    /// internal BDF steps taken
    pub steps: usize,
}

/// Wraps the reaction oracle as the right-hand side handed to the BDF solver.
struct ReactiveRhs<'a, N: ReactionSource> {
    network: &'a N,
    c: &'a DVector<f64>,
    vars: Vec<usize>,
    /// Jacobian of the last state it was asked for
    jac_cache: RefCell<Option<(DVector<f64>, DMatrix<f64>)>>,
    failure: RefCell<Option<SolverError>>,
}

impl<'a, N: ReactionSource> ReactiveRhs<'a, N> {
    fn new(network: &'a N, c: &'a DVector<f64>) -> Self {
        Self {
            network,
            c,
            vars: network.layout().reacting_components(),
            jac_cache: RefCell::new(None),
            failure: RefCell::new(None),
        }
    }

    fn record(&self, e: SolverError) {
        self.failure.borrow_mut().get_or_insert(e);
    }

    /// y = R(x) + C
    fn rhs(&self, x: &NalgebraVec<f64>, y: &mut NalgebraVec<f64>) {
        let u = DVector::from_column_slice(x.as_slice());
        match self.network.react(&u) {
            Ok(r) => {
                for (out, (ri, ci)) in y.as_mut_slice().iter_mut().zip(r.iter().zip(self.c.iter())) {
                    *out = ri + ci;
                }
            }
            Err(e) => {
                self.record(e);
                y.as_mut_slice().fill(f64::NAN);
            }
        }
    }

    /// y = J(x) v, with J nonzero only on the reacting components
    fn jac_mul(&self, x: &NalgebraVec<f64>, v: &NalgebraVec<f64>, y: &mut NalgebraVec<f64>) {
        let u = DVector::from_column_slice(x.as_slice());
        let mut cache = self.jac_cache.borrow_mut();
        let stale = !matches!(&*cache, Some((at, _)) if *at == u);
        if stale {
            match self.network.jacobian(&u, &self.vars) {
                Ok(jac) => *cache = Some((u, jac)),
                Err(e) => {
                    *cache = None;
                    self.record(e);
                    y.as_mut_slice().fill(f64::NAN);
                    return;
                }
            }
        }
        let y = y.as_mut_slice();
        y.fill(0.0);
        if let Some((_, jac)) = &*cache {
            let v = v.as_slice();
            for (row, &i) in self.vars.iter().enumerate() {
                y[i] = self
                    .vars
                    .iter()
                    .enumerate()
                    .map(|(col, &j)| jac[(row, col)] * v[j])
                    .sum();
            }
        }
    }
}

/// Integrate from `u_old` over `dt`; the end state is written to `u_new`.
pub fn stiff_integrate<E: EquationOfState, N: ReactionSource>(
    dt: f64,
    u_old: &DVector<f64>,
    u_new: &mut DVector<f64>,
    c: &DVector<f64>,
    settings: &SdcSettings,
    eos: &E,
    network: &N,
) -> Result<IntegratorStats, SolverError> {
    let layout = *network.layout();
    let opts = &settings.integrator;
    let nvar = u_old.len();
    let rhs = ReactiveRhs::new(network, c);

    let failure = |t: f64, steps: usize| -> SolverError {
        match rhs.failure.borrow_mut().take() {
            Some(e) => e,
            None => SdcError::IntegratorFailure { t, dt, steps }.into(),
        }
    };

    let problem = OdeBuilder::<M>::new()
        .rtol(opts.rtol)
        .atol(vec![opts.atol; nvar])
        .h0(dt * opts.initial_step_fraction)
        .rhs_implicit(
            |x, _p, _t, y| rhs.rhs(x, y),
            |x, _p, _t, v, y| rhs.jac_mul(x, v, y),
        )
        .init(|_p, _t, y| y.as_mut_slice().copy_from_slice(u_old.as_slice()), nvar)
        .build()
        .map_err(|e| SolverError::Config(format!("stiff integrator setup: {}", e)))?;

    let mut solver = problem.bdf::<LS>().map_err(|e| {
        error!("stiff integrator: BDF start failed: {}", e);
        failure(0.0, 0)
    })?;
    solver.set_stop_time(dt).map_err(|e| {
        error!("stiff integrator: cannot stop at dt = {:.6e}: {}", dt, e);
        failure(0.0, 0)
    })?;

    let mut stats = IntegratorStats::default();
    loop {
        if stats.steps >= opts.max_steps {
            let t = solver.state().t;
            error!(
                "stiff integrator: step cap {} reached at t = {:.6e} of dt = {:.6e}",
                opts.max_steps, t, dt
            );
            return Err(failure(t, stats.steps));
        }
        let reason = match solver.step() {
            Ok(reason) => reason,
            Err(e) => {
                let t = solver.state().t;
                error!("stiff integrator: BDF step failed at t = {:.6e}: {}", t, e);
                return Err(failure(t, stats.steps));
            }
        };
        stats.steps += 1;
        if let OdeSolverStopReason::TstopReached = reason {
            break;
        }
    }

    u_new.copy_from_slice(solver.state().y.as_slice());
    layout.update_temperature(u_new, eos)?;
    debug!("stiff integrator: dt = {:.6e} done in {} BDF steps", dt, stats.steps);
    Ok(stats)
}
