//! # Arrhenius reaction network
//!
//! Reference reaction-source oracle: a set of first-order irreversible
//! reactions `reactant => product`, each releasing `Q` per unit mass burned.
//!
//! Rate = A * T^n * exp(-E/(R*T)) * X_reactant
//!
//! Sources in conserved form:
//! - d(ρX_r)/dt = -ρω, d(ρX_p)/dt = +ρω
//! - d(ρe)/dt = d(ρE)/dt = ρωQ
//!
//! The temperature is not read from `UTEMP`: it is recovered from (ρ, e, X)
//! through the EOS, so the Jacobian sees the energy feedback.
use super::reaction_source::ReactionSource;
use crate::Hydro::conserved_state::{StateLayout, UEDEN, UEINT, URHO};
use crate::Thermodynamics::eos::EquationOfState;
use crate::errors::SolverError;
use nalgebra::DVector;
use prettytable::{Table, row};
use regex::Regex;

/// Universal gas constant in J/(mol·K)
pub const R_G: f64 = 8.314;

/// Simple structure for elementary chemical reactions with Arrhenius kinetics
#[derive(Debug, Clone, PartialEq)]
#[allow(non_snake_case)]
pub struct FastElemReact {
    /// Chemical equation (e.g., "A => B")
    pub eq: String,
    /// Pre-exponential factor (1/s)
    pub A: f64,
    /// Temperature exponent (dimensionless)
    pub n: f64,
    /// Activation energy (J/mol)
    pub E: f64,
    /// Heat of reaction (energy per unit mass)
    pub Q: f64,
}

#[allow(non_snake_case)]
impl FastElemReact {
    pub fn new(eq: &str, A: f64, n: f64, E: f64, Q: f64) -> Self {
        Self {
            eq: eq.to_string(),
            A,
            n,
            E,
            Q,
        }
    }

    /// k(T) = A T^n exp(-E/(R T))
    pub fn K_const(&self, T: f64) -> f64 {
        self.A * T.powf(self.n) * (-self.E / (R_G * T)).exp()
    }
}

/// split "A => B" (also "A -> B", "A = B") into reactant and product names
pub fn parse_equation(eq: &str) -> Option<(String, String)> {
    let re = Regex::new(r"^\s*([A-Za-z0-9_]+)\s*(?:=>|->|=)\s*([A-Za-z0-9_]+)\s*$").ok()?;
    let caps = re.captures(eq)?;
    Some((caps[1].to_string(), caps[2].to_string()))
}

#[derive(Debug, Clone)]
pub struct ArrheniusNetwork<E: EquationOfState> {
    pub species: Vec<String>,
    pub reactions: Vec<FastElemReact>,
    /// (reactant, product) species index of every reaction
    pairs: Vec<(usize, usize)>,
    pub eos: E,
    layout: StateLayout,
}

impl<E: EquationOfState> ArrheniusNetwork<E> {
    pub fn new(
        species: Vec<String>,
        reactions: Vec<FastElemReact>,
        naux: usize,
        eos: E,
    ) -> Result<Self, SolverError> {
        let position = |name: &str, eq: &str| {
            species.iter().position(|s| s == name).ok_or_else(|| {
                SolverError::Config(format!("reaction '{}' uses unknown species '{}'", eq, name))
            })
        };
        let mut pairs = Vec::with_capacity(reactions.len());
        for reaction in &reactions {
            let (reactant, product) = parse_equation(&reaction.eq).ok_or_else(|| {
                SolverError::Config(format!("cannot parse reaction '{}'", reaction.eq))
            })?;
            pairs.push((position(&reactant, &reaction.eq)?, position(&product, &reaction.eq)?));
        }
        let layout = StateLayout::new(species.len(), naux);
        Ok(Self {
            species,
            reactions,
            pairs,
            eos,
            layout,
        })
    }

    /// specific rates ω_j (1/s) at temperature T and mass fractions xn
    #[allow(non_snake_case)]
    pub fn rates(&self, T: f64, xn: &[f64]) -> Vec<f64> {
        self.reactions
            .iter()
            .zip(self.pairs.iter())
            .map(|(reaction, &(r, _))| reaction.K_const(T) * xn[r].max(0.0))
            .collect()
    }

    pub fn pretty_print(&self) {
        let mut table = Table::new();
        table.add_row(row!["equation", "A", "n", "E", "Q"]);
        for r in &self.reactions {
            table.add_row(row![
                r.eq,
                format!("{:.4e}", r.A),
                format!("{:.3}", r.n),
                format!("{:.4e}", r.E),
                format!("{:.4e}", r.Q)
            ]);
        }
        table.printstd();
    }
}

impl<E: EquationOfState> ReactionSource for ArrheniusNetwork<E> {
    fn layout(&self) -> &StateLayout {
        &self.layout
    }

    #[allow(non_snake_case)]
    fn react(&self, u: &DVector<f64>) -> Result<DVector<f64>, SolverError> {
        let layout = &self.layout;
        let rho = u[URHO];
        let T = layout.temperature(u, &self.eos)?;
        let xn = layout.mass_fractions(u);
        let ufs = layout.ufs();

        let mut r = layout.zeros();
        for ((reaction, &(reac, prod)), omega) in self
            .reactions
            .iter()
            .zip(self.pairs.iter())
            .zip(self.rates(T, &xn))
        {
            let burned = rho * omega;
            r[ufs + reac] -= burned;
            r[ufs + prod] += burned;
            r[UEINT] += burned * reaction.Q;
            r[UEDEN] += burned * reaction.Q;
        }
        Ok(r)
    }
}
