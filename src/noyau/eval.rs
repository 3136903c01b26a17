//! Noyau — relecture d’un affichage (pipeline)
//!
//! tokenize -> RPN -> Expr -> simplify -> canon -> EXACT -> lecture décimale
//!
//! Sert à relire ce que produisent simplifie_reel / simplifie_complexe
//! ("3*sqrt(2)/4", "1.2345e-4", "1/2-I/2", …) et à re-simplifier une valeur exacte.

use num_complex::Complex64;
use tracing::debug;

use super::complexe::simplifie_complexe;
use super::erreur::ErreurNoyau;
use super::expr::Expr;
use super::format::format_exact;
use super::jetons::{format_tokens, tokenize};
use super::lecture::{approx, lecture_decimale};
use super::options::Options;
use super::rpn::{from_rpn, to_rpn};

/// Au-delà, la lecture exacte coûte plus qu’elle n’apporte.
const DIGITS_MAX: usize = 10_000;

#[derive(Default, Clone, Debug)]
pub struct DemarcheNoyau {
    pub jetons: String,
    pub rpn: String,
    pub avant: String,
    pub apres: String,
}

/// Résultat d’une relecture.
#[derive(Clone, Debug)]
pub struct Evaluation {
    /// Valeur exacte, forme canon.
    pub exact: Expr,
    /// Affichage exact de la forme canon.
    pub texte: String,
    /// Lecture décimale tronquée à `digits` chiffres.
    pub lecture: String,
    pub demarche: DemarcheNoyau,
}

/// API publique : relit un affichage et retourne la valeur exacte, son rendu canon,
/// sa lecture décimale et la démarche (jetons, rpn, avant/après).
pub fn eval_expression(expr_str: &str, digits: usize) -> Result<Evaluation, ErreurNoyau> {
    let s = expr_str.trim();
    if s.is_empty() {
        return Err(ErreurNoyau::lecture("entrée vide"));
    }
    if digits > DIGITS_MAX {
        return Err(ErreurNoyau::ArgumentInvalide(format!(
            "digits doit être <= {DIGITS_MAX} (reçu {digits})"
        )));
    }

    // 1) Jetons
    let jetons = tokenize(s)?;

    // 2) RPN
    let rpn = to_rpn(&jetons)?;

    // 3) AST (Expr)
    let expr0 = from_rpn(&rpn)?;

    // 4) simplify + canon
    let exact = expr0.clone().normalise();

    // 5) EXACT + lecture (refuse 1/0, √π, …)
    let texte = format_exact(&exact);
    let lecture = lecture_decimale(&exact, digits)?;

    debug!(entree = s, exact = %texte, "relecture");

    let demarche = DemarcheNoyau {
        jetons: format_tokens(&jetons),
        rpn: format_tokens(&rpn),
        avant: format_exact(&expr0),
        apres: texte.clone(),
    };

    Ok(Evaluation {
        exact,
        texte,
        lecture,
        demarche,
    })
}

/// Re-simplifie une valeur exacte : approximation flottante puis composition complexe.
/// Utile pour changer de précision (ou couper la recherche) après coup.
pub fn resimplifie(exact: &Expr, opts: &Options) -> Result<(Expr, String), ErreurNoyau> {
    let z: Complex64 = approx(exact)?;
    simplifie_complexe(z, opts)
}
