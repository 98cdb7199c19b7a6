/////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// TESTS
//////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
#[allow(non_snake_case)]
mod tests {
    use crate::Thermodynamics::eos::{
        EosInput, EosModel, EosState, EquationOfState, mean_molecular_weight,
    };
    use crate::Thermodynamics::gamma_law::GammaLawEos;
    use crate::Thermodynamics::gas_radiation::GasRadiationEos;
    use crate::errors::EosError;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean_molecular_weight() {
        assert_relative_eq!(mean_molecular_weight(&[0.5, 0.5], &[1.0, 4.0]), 1.6, epsilon = 1e-12);
        assert_relative_eq!(mean_molecular_weight(&[1.0], &[]), 1.0);
    }

    #[test]
    fn test_gamma_law_modes_agree() {
        let eos = GammaLawEos::new(5.0 / 3.0, 1.0, vec![1.0, 4.0]);
        let xn = [0.3, 0.7];
        let mut by_T = EosState::new(2.0, 3.0, &xn);
        eos.eos(EosInput::RhoT, &mut by_T).unwrap();

        let mut by_p = EosState::from_rho_p(2.0, by_T.p, 1.0, &xn);
        eos.eos(EosInput::RhoP, &mut by_p).unwrap();
        assert_relative_eq!(by_p.T, 3.0, epsilon = 1e-12);
        assert_relative_eq!(by_p.e, by_T.e, epsilon = 1e-12);

        let mut by_e = EosState::from_rho_e(2.0, by_T.e, 1.0, &xn);
        eos.eos(EosInput::RhoE, &mut by_e).unwrap();
        assert_relative_eq!(by_e.p, by_T.p, epsilon = 1e-12);
        assert_relative_eq!(by_e.T, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_gamma_law_unit_state() {
        let eos = GammaLawEos::default();
        let mut state = EosState::from_rho_p(1.0, 1.0, 1.0, &[1.0]);
        eos.eos(EosInput::RhoP, &mut state).unwrap();
        assert_relative_eq!(state.e, 1.5, epsilon = 1e-14);
        assert_relative_eq!(state.gam1, 5.0 / 3.0, epsilon = 1e-14);
        // ideal gas: e does not depend on rho at constant p beyond e = p/((γ-1)ρ)
        assert_relative_eq!(state.dedr_p(), -state.e / state.rho, epsilon = 1e-12);
    }

    #[test]
    fn test_gamma1_identity_reproduces_gamma() {
        let eos = GammaLawEos::new(1.4, 2.0, vec![]);
        let mut state = EosState::new(0.7, 11.0, &[]);
        eos.eos(EosInput::RhoT, &mut state).unwrap();
        let gam1 = state.gam1;
        state.fill_gamma1();
        assert_relative_eq!(state.gam1, gam1, epsilon = 1e-12);
    }

    #[test]
    fn test_gas_radiation_inversions() {
        let eos = GasRadiationEos::new(1.0, 0.1, vec![]);
        let mut by_T = EosState::new(1.5, 4.0, &[]);
        eos.eos(EosInput::RhoT, &mut by_T).unwrap();

        let mut by_p = EosState::from_rho_p(1.5, by_T.p, 100.0, &[]);
        eos.eos(EosInput::RhoP, &mut by_p).unwrap();
        assert_relative_eq!(by_p.T, 4.0, epsilon = 1e-9);

        let mut by_e = EosState::from_rho_e(1.5, by_T.e, 100.0, &[]);
        eos.eos(EosInput::RhoE, &mut by_e).unwrap();
        assert_relative_eq!(by_e.T, 4.0, epsilon = 1e-9);
        assert_relative_eq!(by_e.p, by_T.p, epsilon = 1e-9);
    }

    #[test]
    fn test_gas_radiation_gamma1_between_limits() {
        // radiation-dominated matter is softer than a monatomic gas
        let eos = GasRadiationEos::new(1.0, 1.0, vec![]);
        let mut state = EosState::new(1.0, 2.0, &[]);
        eos.eos(EosInput::RhoT, &mut state).unwrap();
        assert!(state.gam1 > 4.0 / 3.0);
        assert!(state.gam1 < 5.0 / 3.0);
    }

    #[test]
    fn test_gas_radiation_not_converged() {
        let mut eos = GasRadiationEos::new(1.0, 1.0, vec![]);
        eos.max_iter = 1;
        eos.tolerance = 1e-300;
        let mut state = EosState::from_rho_p(1.0, 50.0, 1.0, &[]);
        match eos.eos(EosInput::RhoP, &mut state) {
            Err(EosError::NotConverged { mode, iterations, .. }) => {
                assert_eq!(mode, EosInput::RhoP);
                assert_eq!(iterations, 1);
            }
            other => panic!("expected NotConverged, got {:?}", other),
        }
    }

    #[test]
    fn test_non_physical_input() {
        let eos = GammaLawEos::default();
        let mut state = EosState::from_rho_p(-1.0, 1.0, 1.0, &[]);
        let err = eos.eos(EosInput::RhoP, &mut state).unwrap_err();
        assert!(matches!(err, EosError::NonPhysicalInput { .. }));
        let mut state = EosState::from_rho_e(1.0, 0.0, 1.0, &[]);
        assert!(eos.eos(EosInput::RhoE, &mut state).is_err());
    }

    #[test]
    fn test_eos_model_dispatch_and_serde() {
        let model: EosModel = GasRadiationEos::new(1.0, 0.5, vec![1.0]).into();
        assert_eq!(model.name(), "gas_radiation");
        let json = serde_json::to_string(&model).unwrap();
        assert!(json.contains("\"type\":\"GasRadiation\""));
        let back: EosModel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, model);

        let mut state = EosState::new(1.0, 1.0, &[1.0]);
        back.eos(EosInput::RhoT, &mut state).unwrap();
        assert!(state.p > 0.0);
    }
}
