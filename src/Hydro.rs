//! # Hydro Module
//!
//! Zone/interface-local pieces of the hydrodynamics:
//!
//! - **`conserved_state`**: layout of the conserved vector and conversions to EOS scratch states
//! - **`riemann_shock`**: Newton iteration for the shock mass flux W_s of the exact Riemann solver
//! - **`two_shock`**: two-shock star pressure iteration built on the shock branch
pub mod conserved_state;
pub mod riemann_shock;
pub mod two_shock;
