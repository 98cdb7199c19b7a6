//! # Settings Module
//!
//! ## Purpose
//! One serializable value carrying every runtime parameter of a HydroBurn run.
//! Solvers never read global state: the parts of `RunSettings` they need are
//! passed to them explicitly.
//!
//! ## Layout
//! | Section | Type | Contents |
//! |---------|------|----------|
//! | `riemann` | `RiemannShockParams` | shock Newton and two-shock iteration caps and tolerances |
//! | `sdc` | `SdcSettings` | reactive solver choice, Newton/integrator tolerances, burn window |
//! | `eos` | `EosModel` | equation of state, tagged by `"type"` |
//! | `log_level` | `String` | `off`, `error`, `warn`, `info`, `debug` or `trace` |
//!
//! ## Usage Pattern
//! ```rust, ignore
//! use HydroBurn::settings::RunSettings;
//!
//! let settings = RunSettings::from_file("run.json")?;
//! settings.save_to_file("run_copy.json")?;
//! ```
use crate::Hydro::riemann_shock::RiemannShockParams;
use crate::SDC::sdc_settings::SdcSettings;
use crate::Thermodynamics::eos::EosModel;
use crate::errors::SolverError;
use log::{LevelFilter, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSettings {
    #[serde(default)]
    pub riemann: RiemannShockParams,
    #[serde(default)]
    pub sdc: SdcSettings,
    #[serde(default)]
    pub eos: EosModel,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            riemann: RiemannShockParams::default(),
            sdc: SdcSettings::default(),
            eos: EosModel::default(),
            log_level: default_log_level(),
        }
    }
}

impl RunSettings {
    /// Reads and validates settings from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SolverError> {
        let content = fs::read_to_string(path.as_ref())?;
        let settings: RunSettings = serde_json::from_str(&content)?;
        settings.validate()?;
        info!("run settings loaded from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Writes settings as pretty-printed JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), SolverError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), content)?;
        info!("run settings saved to {}", path.as_ref().display());
        Ok(())
    }

    pub fn level_filter(&self) -> Result<LevelFilter, SolverError> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| SolverError::Config(format!("unknown log level '{}'", self.log_level)))
    }

    pub fn validate(&self) -> Result<(), SolverError> {
        let r = &self.riemann;
        // the shock counter starts at 1, so a cap of 1 allows no Newton update
        if r.riemann_shock_maxiter < 2 {
            return Err(SolverError::Config(format!(
                "riemann.riemann_shock_maxiter must be at least 2, got {}",
                r.riemann_shock_maxiter
            )));
        }
        if r.cg_maxiter == 0 {
            return Err(SolverError::Config(
                "riemann.cg_maxiter must be at least 1".to_string(),
            ));
        }
        for (name, value) in [
            ("riemann_pstar_tol", r.riemann_pstar_tol),
            ("riemann_p_tol", r.riemann_p_tol),
            ("small_tau", r.small_tau),
            ("small_pres", r.small_pres),
            ("T_guess", r.T_guess),
            ("cg_tol", r.cg_tol),
        ] {
            if !(value > 0.0) {
                return Err(SolverError::Config(format!(
                    "riemann.{} must be positive, got {}",
                    name, value
                )));
            }
        }
        self.sdc.validate()?;
        self.level_filter()?;
        Ok(())
    }
}
