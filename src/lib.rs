// src/lib.rs
//
// Formes remarquables — point d’entrée bibliothèque
// -------------------------------------------------
// But:
// - réel      -> (valeur exacte, texte)   : n/p, n/p·π, n/p·√k ou décimal quantifié
// - complexe  -> (valeur exacte, texte)   : parties réelle/imaginaire synchronisées
// - paramètres -> "nom=valeur" joints par un séparateur
//
// Aucun état global, aucune E/S : tout est pur et réentrant.

pub mod noyau;

pub use noyau::complexe::simplifie_complexe;
pub use noyau::erreur::ErreurNoyau;
pub use noyau::eval::{eval_expression, resimplifie, Evaluation};
pub use noyau::expr::Expr;
pub use noyau::options::Options;
pub use noyau::parametres::{formate_parametres, ValeurParam};
pub use noyau::simple::{simplifie_reel, simplifie_reel_avec};
