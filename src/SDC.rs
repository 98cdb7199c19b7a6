//! # SDC Module
//!
//! Reactive part of the spectral deferred correction update of a single zone.
//!
//! ## Components
//! - **`sdc_settings`**: solver choice, Newton and integrator tolerances, burn window
//! - **`sdc_newton`**: implicit Newton solve of species and internal energy, with step subdivision
//! - **`stiff_integrator`**: BDF integration of dU/dt = R(U) + C on `diffsol`
//! - **`sdc_solve`**: `SdcZoneSolver` with the second- and fourth-order updates
//! - **`normalize_species`**: project species partial densities onto the floor and the ρ sum
//! - **`zone_block`**: sweeps over batches of independent zones (rayon with `parallel`)
pub mod normalize_species;
pub mod sdc_newton;
pub mod sdc_settings;
pub mod sdc_solve;
pub mod stiff_integrator;
pub mod zone_block;
/// tests
mod sdc_tests;
