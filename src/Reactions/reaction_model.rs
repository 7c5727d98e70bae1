use super::reaction::Reaction;
use crate::Thermodynamics::species::Species;
use crate::errors::KiStatError;
use log::info;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Sparse species x reactions matrix of net stoichiometric coefficients,
/// stored as a map from (row, column) to the non-zero entry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StoichiometryMatrix {
    nrows: usize,
    ncols: usize,
    entries: BTreeMap<(usize, usize), f64>,
}

impl StoichiometryMatrix {
    pub fn new(nrows: usize, ncols: usize) -> Self {
        Self {
            nrows,
            ncols,
            entries: BTreeMap::new(),
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.entries.get(&(row, col)).copied().unwrap_or(0.0)
    }

    /// zero entries are not stored
    fn set(&mut self, row: usize, col: usize, value: f64) {
        if value == 0.0 {
            self.entries.remove(&(row, col));
        } else {
            self.entries.insert((row, col), value);
        }
    }

    pub fn mul_vec(&self, x: &[f64]) -> Result<Vec<f64>, KiStatError> {
        if x.len() != self.ncols {
            return Err(KiStatError::invalid_argument(
                "StoichiometryMatrix",
                format!("vector of length {} for {} columns", x.len(), self.ncols),
            ));
        }
        let mut y = vec![0.0; self.nrows];
        for (&(row, col), value) in &self.entries {
            y[row] += value * x[col];
        }
        Ok(y)
    }
}

/// A set of species and the reactions between them.
#[derive(Debug, Clone, Default)]
pub struct ReactionModel {
    pub species: Vec<Arc<Species>>,
    pub reactions: Vec<Reaction>,
    /// stale after any change of species, reactions or indices until regenerated
    stoichiometry: Option<StoichiometryMatrix>,
}

impl ReactionModel {
    pub fn new(species: Vec<Arc<Species>>, reactions: Vec<Reaction>) -> Self {
        Self {
            species,
            reactions,
            stoichiometry: None,
        }
    }

    pub fn stoichiometry(&self) -> Option<&StoichiometryMatrix> {
        self.stoichiometry.as_ref()
    }

    fn column(&self, reaction: &Reaction) -> Result<usize, KiStatError> {
        match reaction.index {
            Some(index) if index >= 1 && index <= self.reactions.len() => Ok(index - 1),
            other => Err(KiStatError::invalid_argument(
                format!("reaction {}", reaction),
                format!(
                    "index {:?} is not in 1..={}",
                    other,
                    self.reactions.len()
                ),
            )),
        }
    }

    /// column of every reaction, in order; two reactions may not share an index
    fn columns(&self) -> Result<Vec<usize>, KiStatError> {
        let mut taken = vec![false; self.reactions.len()];
        let mut columns = Vec::with_capacity(self.reactions.len());
        for reaction in &self.reactions {
            let col = self.column(reaction)?;
            if taken[col] {
                return Err(KiStatError::invalid_argument(
                    format!("reaction {}", reaction),
                    format!("reaction index {} is used twice", col + 1),
                ));
            }
            taken[col] = true;
            columns.push(col);
        }
        Ok(columns)
    }

    fn row(&self, species: &Species) -> Result<usize, KiStatError> {
        match species.index {
            Some(index) if index >= 1 && index <= self.species.len() => Ok(index - 1),
            other => Err(KiStatError::invalid_argument(
                format!("species {}", species.label),
                format!("index {:?} is not in 1..={}", other, self.species.len()),
            )),
        }
    }

    /// Rebuild the stoichiometry matrix from the current reactions: row = species index - 1,
    /// column = reaction index - 1.
    pub fn generate_stoichiometry_matrix(&mut self) -> Result<(), KiStatError> {
        let mut matrix = StoichiometryMatrix::new(self.species.len(), self.reactions.len());
        for (reaction, col) in self.reactions.iter().zip(self.columns()?) {
            for species in reaction.reactants.iter().chain(reaction.products.iter()) {
                let row = self.row(species)?;
                let nu = reaction.get_stoichiometric_coefficient(species);
                matrix.set(row, col, nu as f64);
            }
        }
        info!(
            "stoichiometry matrix {}x{} with {} non-zero entries",
            matrix.nrows,
            matrix.ncols,
            matrix.nnz()
        );
        self.stoichiometry = Some(matrix);
        Ok(())
    }

    /// Net rate of every reaction, at position reaction index - 1.
    pub fn get_reaction_rates(
        &self,
        T: f64,
        P: f64,
        conc: &HashMap<String, f64>,
    ) -> Result<Vec<f64>, KiStatError> {
        let mut rates = vec![0.0; self.reactions.len()];
        for (reaction, j) in self.reactions.iter().zip(self.columns()?) {
            rates[j] = reaction.get_rate(T, P, conc, None)?;
        }
        Ok(rates)
    }

    /// Net production rate of every species, at position species index - 1.
    pub fn get_net_production_rates(
        &self,
        T: f64,
        P: f64,
        conc: &HashMap<String, f64>,
    ) -> Result<Vec<f64>, KiStatError> {
        let matrix = self.stoichiometry.as_ref().ok_or_else(|| {
            KiStatError::invalid_argument(
                "ReactionModel",
                "stoichiometry matrix has not been generated",
            )
        })?;
        let rates = self.get_reaction_rates(T, P, conc)?;
        matrix.mul_vec(&rates)
    }
}
