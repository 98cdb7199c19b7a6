//! # Kinetics Module
//!
//! Reaction sources seen by the reactive SDC update:
//!
//! - **`reaction_source`**: the oracle contract `R(U)` and its Jacobian restricted to the reacting components
//! - **`arrhenius_network`**: first-order Arrhenius network `A => B` with heat release, used as the reference oracle
/// the `ReactionSource` trait: dU/dt due to reactions and its Jacobian
pub mod reaction_source;
/// first-order irreversible reactions with Arrhenius rate constants
pub mod arrhenius_network;
