use crate::Hydro::riemann_shock::{PreShockState, RiemannShockParams, shock};
use crate::Hydro::two_shock::two_shock_star_state;
use crate::Thermodynamics::eos::{EosInput, EosModel, EosState, EquationOfState};
use crate::Thermodynamics::gamma_law::GammaLawEos;
use crate::Thermodynamics::gas_radiation::GasRadiationEos;
use crate::errors::SolverError;
use prettytable::{Table, row};

#[allow(non_snake_case)]
pub fn shock_examples(task: usize) -> Result<(), SolverError> {
    match task {
        0 => {
            // shock Hugoniot of a unit gamma-law state, pstar scanned over six decades
            let eos = EosModel::GammaLaw(GammaLawEos::default());
            let params = RiemannShockParams {
                T_guess: 1.0,
                ..Default::default()
            };
            let side = PreShockState::new(1.0, 0.0, 1.0, &[]);
            let mut table = Table::new();
            table.add_row(row!["pstar", "W_s", "rhostar", "Z_s", "iterations"]);
            for pstar in [1.0, 1.5, 2.0, 10.0, 1.0e3, 1.0e6] {
                let star = shock(pstar, &side, 5.0 / 3.0, 5.0 / 3.0, &params, &eos)?;
                table.add_row(row![
                    format!("{:.3e}", pstar),
                    format!("{:.8e}", star.W),
                    format!("{:.8e}", star.rhostar),
                    format!("{:.8e}", star.Z),
                    star.iterations
                ]);
            }
            table.printstd();
        }
        1 => {
            // colliding streams in a radiation-dominated gas
            let eos = EosModel::GasRadiation(GasRadiationEos::new(1.0, 1.0, vec![]));
            let params = RiemannShockParams {
                T_guess: 1.0,
                cg_maxiter: 50,
                cg_tol: 1e-10,
                ..Default::default()
            };
            let left = PreShockState::new(1.0, 2.0, 1.0, &[]);
            let right = PreShockState::new(0.5, -2.0, 0.8, &[]);
            let sol = two_shock_star_state(&left, &right, &params, &eos)?;
            println!(
                "{}: pstar = {:.8e}, ustar = {:.8e} after {} iterations",
                eos.name(),
                sol.pstar,
                sol.ustar,
                sol.iterations
            );

            let mut table = Table::new();
            table.add_row(row!["side", "rho_s", "rhostar", "T*", "W_s"]);
            for (name, side, star) in [("left", &left, &sol.left), ("right", &right, &sol.right)] {
                let mut post = EosState::from_rho_p(star.rhostar, sol.pstar, params.T_guess, &[]);
                eos.eos(EosInput::RhoP, &mut post)?;
                table.add_row(row![
                    name,
                    format!("{:.4e}", side.rho),
                    format!("{:.6e}", star.rhostar),
                    format!("{:.6e}", post.T),
                    format!("{:.6e}", star.W)
                ]);
            }
            table.printstd();
        }
        _ => {
            println!("no shock example with number {}", task);
        }
    }
    Ok(())
}
