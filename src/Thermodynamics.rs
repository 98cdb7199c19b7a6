/// the EOS oracle contract: input modes, scratch state, dispatch enum
pub mod eos;
/// gamma-law ideal gas, analytic in every mode
pub mod gamma_law;
/// ideal gas plus radiation, Newton-iterated temperature
pub mod gas_radiation;
/// tests
mod eos_tests;
