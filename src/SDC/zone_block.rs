//! Sweeps of the zone solver over a batch of independent zones.
//!
//! Zones share nothing but the read-only solver, so with the `parallel` feature
//! the sweep runs on the rayon pool. Results are gathered per zone and the error
//! of the lowest failing zone index is returned, whatever the scheduling.
use super::normalize_species::normalize_species;
use super::sdc_solve::SdcZoneSolver;
use crate::Hydro::conserved_state::StateLayout;
use crate::Kinetics::reaction_source::ReactionSource;
use crate::Thermodynamics::eos::EquationOfState;
use crate::errors::{SdcError, SolverError};
use log::info;
use nalgebra::DVector;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

fn first_failure(results: Vec<Result<(), SolverError>>) -> Result<(), SolverError> {
    for (zone, result) in results.into_iter().enumerate() {
        if let Err(e) = result {
            return Err(SdcError::BlockFailure {
                zone,
                source: Box::new(e),
            }
            .into());
        }
    }
    Ok(())
}

fn check_lengths(expected: usize, lengths: &[(&str, usize)]) -> Result<(), SolverError> {
    for (name, len) in lengths {
        if *len != expected {
            return Err(SolverError::Config(format!(
                "zone block: {} has {} zones, expected {}",
                name, len, expected
            )));
        }
    }
    Ok(())
}

/// `update_centers_o4` on every zone
pub fn update_block_o4<E, N>(
    solver: &SdcZoneSolver<'_, E, N>,
    u_old: &[DVector<f64>],
    u_new: &mut [DVector<f64>],
    c: &[DVector<f64>],
    dt: f64,
    sdc_iteration: usize,
) -> Result<(), SolverError>
where
    E: EquationOfState + Sync,
    N: ReactionSource + Sync,
{
    check_lengths(u_old.len(), &[("u_new", u_new.len()), ("C", c.len())])?;

    #[cfg(feature = "parallel")]
    let results: Vec<Result<(), SolverError>> = u_new
        .par_iter_mut()
        .zip(u_old.par_iter())
        .zip(c.par_iter())
        .map(|((new, old), c)| solver.update_centers_o4(old, new, c, dt, sdc_iteration))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let results: Vec<Result<(), SolverError>> = u_new
        .iter_mut()
        .zip(u_old.iter())
        .zip(c.iter())
        .map(|((new, old), c)| solver.update_centers_o4(old, new, c, dt, sdc_iteration))
        .collect();

    first_failure(results)?;
    info!("reactive SDC: updated {} zones (sdc iteration {})", u_old.len(), sdc_iteration);
    Ok(())
}

/// reaction sources of every zone
pub fn instantaneous_react_block<E, N>(
    solver: &SdcZoneSolver<'_, E, N>,
    states: &[DVector<f64>],
) -> Result<Vec<DVector<f64>>, SolverError>
where
    E: EquationOfState + Sync,
    N: ReactionSource + Sync,
{
    #[cfg(feature = "parallel")]
    let results: Vec<Result<DVector<f64>, SolverError>> = states
        .par_iter()
        .map(|u| solver.instantaneous_react(u))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let results: Vec<Result<DVector<f64>, SolverError>> =
        states.iter().map(|u| solver.instantaneous_react(u)).collect();

    let mut sources = Vec::with_capacity(results.len());
    for (zone, result) in results.into_iter().enumerate() {
        match result {
            Ok(r) => sources.push(r),
            Err(e) => {
                return Err(SdcError::BlockFailure {
                    zone,
                    source: Box::new(e),
                }
                .into());
            }
        }
    }
    Ok(sources)
}

/// species renormalization of every zone
pub fn normalize_block(states: &mut [DVector<f64>], layout: &StateLayout, small_x: f64) {
    #[cfg(feature = "parallel")]
    states
        .par_iter_mut()
        .for_each(|u| normalize_species(u, layout, small_x));
    #[cfg(not(feature = "parallel"))]
    states
        .iter_mut()
        .for_each(|u| normalize_species(u, layout, small_x));
}
