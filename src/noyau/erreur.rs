// src/noyau/erreur.rs

use thiserror::Error;

/// Erreurs du noyau.
///
/// - Domaine : la valeur elle-même n’est pas traitable (NaN, ±∞)
/// - ArgumentInvalide : contrat appelant violé (précision, fracmax, exposant forcé)
/// - Lecture : relecture d’un affichage impossible
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErreurNoyau {
    #[error("valeur hors domaine: {valeur} (NaN ou infini)")]
    Domaine { valeur: f64 },

    #[error("argument invalide: {0}")]
    ArgumentInvalide(String),

    #[error("lecture impossible: {0}")]
    Lecture(String),
}

impl ErreurNoyau {
    pub(crate) fn lecture(msg: impl Into<String>) -> Self {
        ErreurNoyau::Lecture(msg.into())
    }
}

/// Refuse NaN / ±∞ avant toute boucle.
pub(crate) fn exige_fini(valeur: f64) -> Result<f64, ErreurNoyau> {
    if valeur.is_finite() {
        Ok(valeur)
    } else {
        Err(ErreurNoyau::Domaine { valeur })
    }
}
