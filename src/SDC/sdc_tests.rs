/////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// TESTS
//////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use crate::Hydro::conserved_state::{StateLayout, UEDEN, UEINT, UMX, URHO, UTEMP};
    use crate::Kinetics::arrhenius_network::{ArrheniusNetwork, FastElemReact};
    use crate::Kinetics::reaction_source::ReactionSource;
    use crate::SDC::normalize_species::normalize_species;
    use crate::SDC::sdc_newton::{sdc_newton_solve, sdc_newton_subdivide};
    use crate::SDC::sdc_settings::{SdcSettings, SdcSolverType};
    use crate::SDC::sdc_solve::SdcZoneSolver;
    use crate::SDC::stiff_integrator::stiff_integrate;
    use crate::SDC::zone_block::{instantaneous_react_block, normalize_block, update_block_o4};
    use crate::Thermodynamics::gamma_law::GammaLawEos;
    use crate::errors::{NewtonStatus, SdcError, SolverError};
    use approx::assert_relative_eq;
    use nalgebra::DVector;

    const DT: f64 = 1.0e-6;
    /// rate constant with k * DT = 1
    const K: f64 = 1.0e6;
    const Q: f64 = 10.0;

    /// fuel => ash with a temperature independent rate, so the implicit update is
    /// a linear problem with a closed-form answer
    fn network() -> ArrheniusNetwork<GammaLawEos> {
        ArrheniusNetwork::new(
            vec!["fuel".to_string(), "ash".to_string()],
            vec![FastElemReact::new("fuel => ash", K, 0.0, 0.0, Q)],
            1,
            GammaLawEos::new(5.0 / 3.0, 1.0, vec![1.0, 1.0]),
        )
        .unwrap()
    }

    fn zone(net: &ArrheniusNetwork<GammaLawEos>) -> DVector<f64> {
        net.layout()
            .conserved_from_primitive(1.0, [0.0; 3], 1.0, &[1.0, 0.0], &[0.3], &net.eos)
            .unwrap()
    }

    fn residual(
        net: &ArrheniusNetwork<GammaLawEos>,
        u_old: &DVector<f64>,
        u_new: &DVector<f64>,
        c: &DVector<f64>,
        dt: f64,
    ) -> f64 {
        let r = net.react(u_new).unwrap();
        net.layout()
            .reacting_components()
            .iter()
            .map(|&i| (u_new[i] - u_old[i] - dt * r[i] - dt * c[i]).abs())
            .fold(0.0, f64::max)
    }

    #[test]
    fn test_newton_matches_backward_euler() {
        let net = network();
        let settings = SdcSettings::default();
        let u_old = zone(&net);
        let c = net.layout().zeros();
        let mut u_new = u_old.clone();
        let status =
            sdc_newton_solve(DT, &u_old, &mut u_new, &c, &settings, &net.eos, &net).unwrap();
        assert_eq!(status, NewtonStatus::Success);

        let ufs = net.layout().ufs();
        // ρX_fuel = ρX_0 / (1 + k dt)
        assert_relative_eq!(u_new[ufs], 0.5, epsilon = 1e-10);
        assert_relative_eq!(u_new[ufs + 1], 0.5, epsilon = 1e-10);
        assert_relative_eq!(u_new[UEINT], 1.5 + Q * 0.5, epsilon = 1e-8);
        assert_relative_eq!(u_new[UEDEN], 1.5 + Q * 0.5, epsilon = 1e-8);
        // T = (γ - 1) e / R
        assert_relative_eq!(u_new[UTEMP], (2.0 / 3.0) * 6.5, epsilon = 1e-8);
        assert!(residual(&net, &u_old, &u_new, &c, DT) < 1e-9);
    }

    #[test]
    fn test_newton_non_reacting_components_follow_advection() {
        let net = network();
        let settings = SdcSettings::default();
        let u_old = zone(&net);
        let mut c = net.layout().zeros();
        c[URHO] = 0.5;
        c[UMX] = 3.0;
        c[net.layout().ufs()] = 0.25;
        c[net.layout().ufx()] = -2.0;
        c[UEINT] = 4.0;
        c[UEDEN] = 4.0;
        let mut u_new = u_old.clone();
        let status =
            sdc_newton_subdivide(DT, &u_old, &mut u_new, &c, &settings, &net.eos, &net).unwrap();
        assert_eq!(status, NewtonStatus::Success);

        for i in [URHO, UMX, net.layout().ufx()] {
            assert_eq!(u_new[i], u_old[i] + DT * c[i]);
        }
        assert!(residual(&net, &u_old, &u_new, &c, DT) < 1e-9);
        let r = net.react(&u_new).unwrap();
        assert_relative_eq!(
            u_new[UEDEN],
            u_old[UEDEN] + DT * c[UEDEN] + DT * r[UEDEN],
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_stiff_integrator_follows_exponential_decay() {
        let net = network();
        let mut settings = SdcSettings::default();
        settings.integrator.rtol = 1.0e-8;
        settings.integrator.atol = 1.0e-12;
        let u_old = zone(&net);
        let c = net.layout().zeros();
        let mut u_new = u_old.clone();
        let stats =
            stiff_integrate(DT, &u_old, &mut u_new, &c, &settings, &net.eos, &net).unwrap();
        assert!(stats.steps > 1);
        assert!(stats.steps < settings.integrator.max_steps);

        let ufs = net.layout().ufs();
        let fuel = (-1.0_f64).exp();
        assert_relative_eq!(u_new[ufs], fuel, epsilon = 1e-5);
        assert_relative_eq!(u_new[ufs] + u_new[ufs + 1], 1.0, epsilon = 1e-10);
        assert_relative_eq!(u_new[UEINT], 1.5 + Q * (1.0 - fuel), epsilon = 1e-4);
    }

    #[test]
    fn test_stiff_integrator_step_cap() {
        let net = network();
        let mut settings = SdcSettings::default();
        settings.integrator.max_steps = 1;
        let u_old = zone(&net);
        let c = net.layout().zeros();
        let mut u_new = u_old.clone();
        match stiff_integrate(DT, &u_old, &mut u_new, &c, &settings, &net.eos, &net) {
            Err(SolverError::Sdc(SdcError::IntegratorFailure { steps, dt, .. })) => {
                assert_eq!(steps, 1);
                assert_eq!(dt, DT);
            }
            other => panic!("expected IntegratorFailure, got {:?}", other),
        }
    }

    #[test]
    fn test_stiff_integrator_adds_frozen_source() {
        // no fuel, so R vanishes and the state moves linearly with C
        let net = network();
        let settings = SdcSettings::default();
        let u_old = net
            .layout()
            .conserved_from_primitive(1.0, [0.0; 3], 1.0, &[0.0, 1.0], &[0.3], &net.eos)
            .unwrap();
        let mut c = net.layout().zeros();
        c[UMX] = 2.0e5;
        c[UEINT] = 1.0e6;
        c[UEDEN] = 1.0e6;
        let mut u_new = u_old.clone();
        stiff_integrate(DT, &u_old, &mut u_new, &c, &settings, &net.eos, &net).unwrap();

        assert_relative_eq!(u_new[UMX], 0.2, epsilon = 1e-8);
        assert_relative_eq!(u_new[UEINT], u_old[UEINT] + 1.0, epsilon = 1e-8);
        assert_relative_eq!(u_new[URHO], 1.0, epsilon = 1e-12);
        // temperature follows the new internal energy
        assert_relative_eq!(u_new[UTEMP], (2.0 / 3.0) * (1.5 + 1.0), epsilon = 1e-8);
    }

    #[test]
    fn test_hybrid_equals_newton_seeded_by_integrator() {
        let net = network();
        let settings = SdcSettings {
            solver: SdcSolverType::Hybrid,
            ..Default::default()
        };
        let u_old = zone(&net);
        let mut c = net.layout().zeros();
        c[UEINT] = 1.0;
        c[UEDEN] = 1.0;

        let mut expected = u_old.clone();
        stiff_integrate(DT, &u_old, &mut expected, &c, &settings, &net.eos, &net).unwrap();
        let status =
            sdc_newton_subdivide(DT, &u_old, &mut expected, &c, &settings, &net.eos, &net)
                .unwrap();
        assert_eq!(status, NewtonStatus::Success);

        let solver = SdcZoneSolver::new(&settings, &net.eos, &net);
        let mut hybrid = u_old.clone();
        solver.solve(DT, &u_old, &mut hybrid, &c, 0).unwrap();
        assert_eq!(hybrid, expected);
    }

    #[test]
    fn test_hybrid_later_iterations_skip_integrator() {
        let net = network();
        let settings = SdcSettings {
            solver: SdcSolverType::Hybrid,
            ..Default::default()
        };
        let u_old = zone(&net);
        let c = net.layout().zeros();
        let mut guess = u_old.clone();
        guess[net.layout().ufs()] = 0.6;
        guess[net.layout().ufs() + 1] = 0.4;

        let mut expected = guess.clone();
        sdc_newton_subdivide(DT, &u_old, &mut expected, &c, &settings, &net.eos, &net).unwrap();
        let solver = SdcZoneSolver::new(&settings, &net.eos, &net);
        let mut hybrid = guess.clone();
        solver.solve(DT, &u_old, &mut hybrid, &c, 1).unwrap();
        assert_eq!(hybrid, expected);
    }

    #[test]
    fn test_newton_failure_is_typed() {
        let net = network();
        let settings = SdcSettings {
            max_newton_iter: 1,
            max_newton_subdivide: 4,
            ..Default::default()
        };
        let solver = SdcZoneSolver::new(&settings, &net.eos, &net);
        let u_old = zone(&net);
        let c = net.layout().zeros();
        let mut u_new = u_old.clone();
        match solver.update_centers_o4(&u_old, &mut u_new, &c, DT, 2) {
            Err(SolverError::Sdc(SdcError::NewtonFailure {
                status,
                sdc_iteration,
                ..
            })) => {
                assert_eq!(status, NewtonStatus::ConvergenceFailure);
                assert_eq!(sdc_iteration, 2);
            }
            other => panic!("expected NewtonFailure, got {:?}", other),
        }
        // the guess is handed back untouched
        assert_eq!(u_new, u_old);
    }

    #[test]
    fn test_no_burn_o4_is_pure_advection() {
        let net = network();
        let mut settings = SdcSettings::default();
        settings.screening.react_T_min = 10.0;
        let solver = SdcZoneSolver::new(&settings, &net.eos, &net);
        let u_old = zone(&net);
        assert!(!solver.okay_to_burn(&u_old));

        let c = DVector::from_fn(net.layout().nvar(), |i, _| 0.1 * i as f64 - 0.3);
        let mut u_new = u_old.clone();
        solver.update_centers_o4(&u_old, &mut u_new, &c, DT, 0).unwrap();
        for i in 0..u_old.len() {
            assert_eq!(u_new[i], u_old[i] + DT * c[i]);
        }
    }

    #[test]
    fn test_no_burn_o2_returns_zero_rate() {
        let net = network();
        let mut settings = SdcSettings::default();
        settings.screening.react_rho_max = 0.5;
        let solver = SdcZoneSolver::new(&settings, &net.eos, &net);
        let k_m = zone(&net);
        let a_m = DVector::from_element(k_m.len(), 7.0);
        let c = DVector::from_fn(k_m.len(), |i, _| 1.0 + i as f64);
        let mut k_n = k_m.clone();

        let r_full = solver
            .update_o2(&k_m, &mut k_n, &a_m, &a_m, &c, DT, 0)
            .unwrap();
        assert!(r_full.iter().all(|r| *r == 0.0));
        for i in 0..k_m.len() {
            assert_eq!(k_n[i], k_m[i] + DT * c[i]);
        }
    }

    #[test]
    fn test_o2_update_is_conservative_with_returned_rate() {
        let net = network();
        let settings = SdcSettings::default();
        let solver = SdcZoneSolver::new(&settings, &net.eos, &net);
        let k_m = zone(&net);
        let zero = net.layout().zeros();
        let r_m_old = net.react(&k_m).unwrap();
        let mut c = net.layout().zeros();
        c[UMX] = 2.0;
        let mut k_n = net.layout().zeros();

        let r_full = solver
            .update_o2(&k_m, &mut k_n, &zero, &r_m_old, &c, DT, 0)
            .unwrap();
        for i in 0..k_m.len() {
            assert_eq!(k_n[i], k_m[i] + DT * r_full[i] + DT * c[i]);
        }
        let ufs = net.layout().ufs();
        assert_relative_eq!(k_n[ufs], 0.5, epsilon = 1e-8);
        assert_relative_eq!(r_full[ufs], -0.5 * K, max_relative = 1e-8);
        assert_relative_eq!(r_full[UEINT], 0.5 * K * Q, max_relative = 1e-8);
    }

    #[test]
    fn test_instantaneous_react_respects_screening() {
        let net = network();
        let mut settings = SdcSettings::default();
        let u = zone(&net);
        {
            let solver = SdcZoneSolver::new(&settings, &net.eos, &net);
            assert_eq!(solver.instantaneous_react(&u).unwrap(), net.react(&u).unwrap());
        }
        settings.screening.react_T_max = 0.5;
        let solver = SdcZoneSolver::new(&settings, &net.eos, &net);
        assert_eq!(solver.instantaneous_react(&u).unwrap(), net.layout().zeros());
    }

    #[test]
    fn test_normalize_species_clamps_and_conserves_mass() {
        let layout = StateLayout::new(3, 0);
        let mut u = layout.zeros();
        u[URHO] = 2.0;
        u[layout.ufs()] = 1.4;
        u[layout.ufs() + 1] = 1.0;
        u[layout.ufs() + 2] = -0.2;
        normalize_species(&mut u, &layout, 1.0e-30);

        assert_eq!(u[URHO], 2.0);
        let sum: f64 = layout.species().map(|n| u[n]).sum();
        assert_relative_eq!(sum, 2.0, epsilon = 1e-14);
        assert!(layout.species().all(|n| u[n] > 0.0 && u[n] <= 2.0));
        assert_relative_eq!(u[layout.ufs()] / u[layout.ufs() + 1], 1.4, epsilon = 1e-14);

        let once = u.clone();
        normalize_species(&mut u, &layout, 1.0e-30);
        assert_eq!(u, once);
    }

    #[test]
    fn test_normalize_species_holds_floor_after_rescale() {
        let layout = StateLayout::new(3, 0);
        let ufs = layout.ufs();
        let mut u = layout.zeros();
        u[URHO] = 1.0;
        u[ufs] = 2.0;
        u[ufs + 1] = 2.0;
        u[ufs + 2] = 0.0;
        // a single clamp-and-rescale would leave the third species at 0.1 / 2.1
        normalize_species(&mut u, &layout, 0.1);

        assert_eq!(u[ufs + 2], 0.1);
        assert_relative_eq!(u[ufs], 0.45, epsilon = 1e-15);
        assert_relative_eq!(u[ufs + 1], 0.45, epsilon = 1e-15);
        let sum: f64 = layout.species().map(|n| u[n]).sum();
        assert_relative_eq!(sum, 1.0, epsilon = 1e-15);

        let once = u.clone();
        normalize_species(&mut u, &layout, 0.1);
        assert_eq!(u, once);
    }

    #[test]
    fn test_normalize_species_pins_several_species() {
        let layout = StateLayout::new(4, 0);
        let ufs = layout.ufs();
        let mut u = layout.zeros();
        u[URHO] = 2.0;
        u[ufs] = 3.0;
        u[ufs + 1] = 1.0;
        u[ufs + 2] = 0.01;
        u[ufs + 3] = -1.0;
        normalize_species(&mut u, &layout, 0.05);

        let floor = 0.05 * 2.0;
        assert!(layout.species().all(|n| u[n] >= floor && u[n] <= 2.0));
        assert_eq!(u[ufs + 2], floor);
        assert_eq!(u[ufs + 3], floor);
        assert_relative_eq!(u[ufs] + u[ufs + 1], 2.0 - 2.0 * floor, epsilon = 1e-14);
        assert_relative_eq!(u[ufs] / u[ufs + 1], 2.0, epsilon = 1e-14);
        assert_eq!(u[URHO], 2.0);

        let once = u.clone();
        normalize_species(&mut u, &layout, 0.05);
        assert_eq!(u, once);
    }

    #[test]
    fn test_block_o4_matches_zone_updates() {
        let net = network();
        let settings = SdcSettings::default();
        let solver = SdcZoneSolver::new(&settings, &net.eos, &net);
        let base = zone(&net);
        let u_old: Vec<DVector<f64>> = (0..3)
            .map(|k| {
                let mut u = base.clone();
                u[UMX] = k as f64;
                u
            })
            .collect();
        let c = vec![net.layout().zeros(); 3];
        let mut u_new = u_old.clone();
        update_block_o4(&solver, &u_old, &mut u_new, &c, DT, 0).unwrap();

        for k in 0..3 {
            let mut expected = u_old[k].clone();
            solver
                .update_centers_o4(&u_old[k], &mut expected, &c[k], DT, 0)
                .unwrap();
            assert_eq!(u_new[k], expected);
        }

        normalize_block(&mut u_new, net.layout(), settings.small_x);
        for u in &u_new {
            let sum: f64 = net.layout().species().map(|n| u[n]).sum();
            assert_relative_eq!(sum, u[URHO], epsilon = 1e-14);
        }
    }

    #[test]
    fn test_block_reports_failing_zone() {
        let net = network();
        let settings = SdcSettings::default();
        let solver = SdcZoneSolver::new(&settings, &net.eos, &net);
        let mut u_old = vec![zone(&net); 3];
        // negative internal energy: the EOS rejects the zone
        u_old[1][UEINT] = -1.0;
        let c = vec![net.layout().zeros(); 3];
        let mut u_new = u_old.clone();

        match update_block_o4(&solver, &u_old, &mut u_new, &c, DT, 0) {
            Err(SolverError::Sdc(SdcError::BlockFailure { zone, source })) => {
                assert_eq!(zone, 1);
                assert!(matches!(*source, SolverError::Sdc(SdcError::NewtonFailure { .. })));
            }
            other => panic!("expected BlockFailure, got {:?}", other),
        }
        match instantaneous_react_block(&solver, &u_old) {
            Err(SolverError::Sdc(SdcError::BlockFailure { zone, source })) => {
                assert_eq!(zone, 1);
                assert!(matches!(*source, SolverError::Eos(_)));
            }
            other => panic!("expected BlockFailure, got {:?}", other),
        }
    }

    #[test]
    fn test_block_length_mismatch_is_config_error() {
        let net = network();
        let settings = SdcSettings::default();
        let solver = SdcZoneSolver::new(&settings, &net.eos, &net);
        let u_old = vec![zone(&net); 2];
        let c = vec![net.layout().zeros(); 1];
        let mut u_new = u_old.clone();
        let result = update_block_o4(&solver, &u_old, &mut u_new, &c, DT, 0);
        assert!(matches!(result, Err(SolverError::Config(_))));
    }

    #[test]
    fn test_settings_validation() {
        assert!(SdcSettings::default().validate().is_ok());
        let mut settings = SdcSettings::default();
        settings.screening.react_T_min = 2.0;
        settings.screening.react_T_max = 1.0;
        assert!(matches!(settings.validate(), Err(SolverError::Config(_))));
        let settings = SdcSettings {
            max_newton_iter: 0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
        let settings = SdcSettings {
            small_x: 1.0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }
}
