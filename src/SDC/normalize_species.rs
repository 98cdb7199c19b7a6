use crate::Hydro::conserved_state::{StateLayout, URHO};
use nalgebra::DVector;

/// Project the species partial densities of `u` onto `{ρX : small_x ρ <= ρX <= ρ, Σ ρX = ρ}`.
///
/// Species are clamped into the bounds, then the free ones are rescaled to
/// carry the mass the floored ones do not. A species pushed under the floor by
/// the rescale is pinned there and the rescale repeats, so the result honors
/// both the floor and the sum. A state already in the set is left bit-for-bit
/// unchanged. Density itself is never touched.
pub fn normalize_species(u: &mut DVector<f64>, layout: &StateLayout, small_x: f64) {
    let rho = u[URHO];
    let floor = small_x * rho;
    let species: Vec<usize> = layout.species().collect();
    for &n in &species {
        u[n] = u[n].min(rho).max(floor);
    }

    // sums within rounding of ρ count as normalized
    let sum_tol = 4.0 * species.len() as f64 * f64::EPSILON * rho.abs();
    let mut pinned = vec![false; species.len()];
    loop {
        let (mut fixed, mut free) = (0.0, 0.0);
        for (k, &n) in species.iter().enumerate() {
            if pinned[k] {
                fixed += u[n];
            } else {
                free += u[n];
            }
        }
        if !(free > 0.0) || (fixed + free - rho).abs() <= sum_tol {
            break;
        }

        // free species never exceed ρ - fixed after this, so only the floor can bind
        let factor = (rho - fixed) / free;
        let mut newly_pinned = false;
        for (k, &n) in species.iter().enumerate() {
            if pinned[k] {
                continue;
            }
            let scaled = u[n] * factor;
            if scaled < floor {
                u[n] = floor;
                pinned[k] = true;
                newly_pinned = true;
            } else {
                u[n] = scaled;
            }
        }
        if !newly_pinned {
            break;
        }
    }
}
