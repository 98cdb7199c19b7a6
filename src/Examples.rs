/// exact Riemann shock branch and two-shock star state
pub mod shock_examples;
/// reactive SDC zone updates
pub mod sdc_examples;
