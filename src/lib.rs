#[allow(non_snake_case)]
pub mod Examples;
#[allow(non_snake_case)]
pub mod Hydro;
#[allow(non_snake_case)]
pub mod Kinetics;
#[allow(non_snake_case)]
pub mod SDC;
#[allow(non_snake_case)]
pub mod Thermodynamics;
#[allow(non_snake_case)]
pub mod Utils;
pub mod errors;
pub mod settings;
