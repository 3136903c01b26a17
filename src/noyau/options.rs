// src/noyau/options.rs

use serde::{Deserialize, Serialize};

use super::erreur::ErreurNoyau;

/// Précision par défaut (tolérance de recherche ET pas de quantification).
pub const PRECISION_DEFAUT: f64 = 1e-6;

/// Borne exclusive des dénominateurs essayés (1..63).
pub const FRACMAX_DEFAUT: u32 = 63;

/// Réglages communs aux trois opérations publiques.
///
/// Le multiplicateur littéral et l’exposant forcé restent des arguments d’appel
/// (ils ne servent qu’à la composition complexe).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    pub precision: f64,
    pub recherche: bool,
    pub fracmax: u32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            precision: PRECISION_DEFAUT,
            recherche: true,
            fracmax: FRACMAX_DEFAUT,
        }
    }
}

impl Options {
    pub fn avec_precision(mut self, precision: f64) -> Self {
        self.precision = precision;
        self
    }

    pub fn sans_recherche(mut self) -> Self {
        self.recherche = false;
        self
    }

    pub fn avec_fracmax(mut self, fracmax: u32) -> Self {
        self.fracmax = fracmax;
        self
    }

    /// Fail-fast : rien ne doit boucler sur une précision nulle ou un fracmax vide.
    pub fn valide(&self) -> Result<(), ErreurNoyau> {
        if !self.precision.is_finite() || self.precision <= 0.0 {
            return Err(ErreurNoyau::ArgumentInvalide(format!(
                "précision doit être finie et > 0 (reçu {})",
                self.precision
            )));
        }
        if self.fracmax == 0 {
            return Err(ErreurNoyau::ArgumentInvalide(
                "fracmax doit être >= 1".to_string(),
            ));
        }
        Ok(())
    }
}
