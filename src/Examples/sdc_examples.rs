use crate::Hydro::conserved_state::{UEINT, UTEMP};
use crate::Kinetics::arrhenius_network::{ArrheniusNetwork, FastElemReact};
use crate::Kinetics::reaction_source::ReactionSource;
use crate::SDC::sdc_settings::{SdcSettings, SdcSolverType};
use crate::SDC::sdc_solve::SdcZoneSolver;
use crate::SDC::zone_block::{instantaneous_react_block, normalize_block, update_block_o4};
use crate::Thermodynamics::gamma_law::GammaLawEos;
use crate::errors::SolverError;
use nalgebra::DVector;
use prettytable::{Table, row};

/// two-step chain C => O => Si with Arrhenius rates in code units
fn chain_network() -> Result<ArrheniusNetwork<GammaLawEos>, SolverError> {
    ArrheniusNetwork::new(
        vec!["C".to_string(), "O".to_string(), "Si".to_string()],
        vec![
            FastElemReact::new("C => O", 5.0e6, 0.0, 8.314 * 5.0, 2.0),
            FastElemReact::new("O => Si", 1.0e5, 1.0, 8.314 * 20.0, 1.0),
        ],
        0,
        GammaLawEos::new(5.0 / 3.0, 1.0, vec![12.0, 16.0, 28.0]),
    )
}

pub fn sdc_examples(task: usize) -> Result<(), SolverError> {
    match task {
        0 => {
            // one burning zone with every strategy
            let net = chain_network()?;
            net.pretty_print();
            let layout = *net.layout();
            let u_old = layout.conserved_from_primitive(
                1.0,
                [0.0; 3],
                1.0,
                &[1.0, 0.0, 0.0],
                &[],
                &net.eos,
            )?;
            let c = layout.zeros();
            let dt = 1.0e-6;

            let mut table = Table::new();
            table.add_row(row!["solver", "rhoX_C", "rhoX_O", "rhoX_Si", "rhoe", "T"]);
            for solver_type in [
                SdcSolverType::Newton,
                SdcSolverType::StiffIntegrator,
                SdcSolverType::Hybrid,
            ] {
                let settings = SdcSettings {
                    solver: solver_type,
                    ..Default::default()
                };
                settings.validate()?;
                let solver = SdcZoneSolver::new(&settings, &net.eos, &net);
                let mut u_new = u_old.clone();
                solver.update_centers_o4(&u_old, &mut u_new, &c, dt, 0)?;
                let ufs = layout.ufs();
                table.add_row(row![
                    format!("{:?}", solver_type),
                    format!("{:.8e}", u_new[ufs]),
                    format!("{:.8e}", u_new[ufs + 1]),
                    format!("{:.8e}", u_new[ufs + 2]),
                    format!("{:.8e}", u_new[UEINT]),
                    format!("{:.8e}", u_new[UTEMP])
                ]);
            }
            table.printstd();
        }
        1 => {
            // a row of zones across the ignition temperature, three SDC iterations
            let net = chain_network()?;
            let layout = *net.layout();
            let mut settings = SdcSettings::default();
            settings.screening.react_T_min = 0.5;
            let solver = SdcZoneSolver::new(&settings, &net.eos, &net);

            let u_old = (0..8)
                .map(|k| {
                    let T = 0.2 + 0.2 * k as f64;
                    layout.conserved_from_primitive(1.0, [0.0; 3], T, &[0.9, 0.1, 0.0], &[], &net.eos)
                })
                .collect::<Result<Vec<DVector<f64>>, SolverError>>()?;
            let c = vec![layout.zeros(); u_old.len()];
            let dt = 1.0e-7;

            let mut u_new = u_old.clone();
            for sdc_iteration in 0..3 {
                update_block_o4(&solver, &u_old, &mut u_new, &c, dt, sdc_iteration)?;
            }
            normalize_block(&mut u_new, &layout, settings.small_x);
            let rates = instantaneous_react_block(&solver, &u_new)?;

            let mut table = Table::new();
            table.add_row(row!["zone", "T_old", "T_new", "X_C", "d(rhoX_C)/dt"]);
            for (k, (new, rate)) in u_new.iter().zip(rates.iter()).enumerate() {
                table.add_row(row![
                    k,
                    format!("{:.4e}", u_old[k][UTEMP]),
                    format!("{:.6e}", new[UTEMP]),
                    format!("{:.6e}", layout.mass_fractions(new)[0]),
                    format!("{:.6e}", rate[layout.ufs()])
                ]);
            }
            table.printstd();
        }
        _ => {
            println!("no SDC example with number {}", task);
        }
    }
    Ok(())
}
