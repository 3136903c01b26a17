// src/noyau/simple.rs
//
// Simplification d’un réel
// ------------------------
// 1) recherche n/d · m, d ∈ [1, fracmax), m ∈ {1, π, √2, √3, √5, √6} (premier trouvé gagne)
// 2) sinon repli décimal : mise à l’échelle 10^e, quantification sur la grille `precision`,
//    suffixe "e-<e>" seulement si e > 3.
//
// La valeur exacte du repli est arrondie sur la grille en rationnels : le texte
// (15 chiffres significatifs) peut la tronquer, jamais l’inverse.

use std::cmp::Ordering;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{FromPrimitive, One, Zero};
use tracing::{debug, trace};

use super::erreur::{exige_fini, ErreurNoyau};
use super::expr::Expr;
use super::format::{format_decimal, format_exact};
use super::jetons::decimal_vers_rationnel;
use super::options::Options;
use super::remarquables::{candidats, Remarquable};

/// Au-delà, l’exposant est conservé et affiché ("e-4", "e-5", …).
const EXPOSANT_MAX_SILENCIEUX: u32 = 3;

/// API publique : simplifie un réel avec multiplicateur 1 et exposant calculé.
pub fn simplifie_reel(valeur: f64, opts: &Options) -> Result<(Expr, String), ErreurNoyau> {
    simplifie_reel_avec(valeur, opts, &Expr::un(), None)
}

/// Variante complète :
/// - `multiplicateur` : facteur exact ajouté au résultat (ex: I pour la partie imaginaire)
/// - `mult10` : exposant décimal imposé (synchronisation réel/imaginaire)
pub fn simplifie_reel_avec(
    valeur: f64,
    opts: &Options,
    multiplicateur: &Expr,
    mult10: Option<u32>,
) -> Result<(Expr, String), ErreurNoyau> {
    opts.valide()?;
    let valeur = exige_fini(valeur)?;

    // 1) signe
    let negatif = valeur < 0.0;
    let alpha = valeur.abs();

    // 2) recherche n/d · m
    if opts.recherche {
        if let Some((n, d, m)) = cherche_fraction(alpha, opts.precision, opts.fracmax) {
            trace!(valeur, n, d, ?m, "forme remarquable trouvée");
            let simple = forme_remarquable(negatif, n, d, m, multiplicateur)?;
            let texte = format_exact(&simple);
            return Ok((simple, texte));
        }
    }

    // 3) repli décimal
    repli_decimal(negatif, alpha, opts.precision, multiplicateur, mult10)
}

/// Balayage linéaire des candidats ; renvoie (n, d, m) au premier résidu < precision.
fn cherche_fraction(alpha: f64, precision: f64, fracmax: u32) -> Option<(f64, u32, Remarquable)> {
    candidats(fracmax).find_map(|(d, m)| {
        let v = alpha / m.valeur() * f64::from(d);
        let n = v.round_ties_even();
        ((v - n).abs() < precision).then_some((n, d, m))
    })
}

/// signe · (n/d) · multiplicateur · m, normalisé.
fn forme_remarquable(
    negatif: bool,
    n: f64,
    d: u32,
    m: Remarquable,
    multiplicateur: &Expr,
) -> Result<Expr, ErreurNoyau> {
    let num = BigInt::from_f64(n).ok_or(ErreurNoyau::Domaine { valeur: n })?;
    let mut coeff = BigRational::new(num, BigInt::from(d));
    if negatif {
        coeff = -coeff;
    }
    Ok(Expr::Rat(coeff)
        .fois(multiplicateur.clone())
        .fois(m.expr())
        .normalise())
}

fn repli_decimal(
    negatif: bool,
    mut alpha: f64,
    precision: f64,
    multiplicateur: &Expr,
    mult10: Option<u32>,
) -> Result<(Expr, String), ErreurNoyau> {
    // 3) exposant : calculé (zéro n’entre jamais dans la boucle) ou imposé
    let mut exposant = match mult10 {
        None => {
            let mut e = 0u32;
            while alpha != 0.0 && alpha < 1.0 {
                e += 1;
                alpha *= 10.0;
            }
            e
        }
        Some(e) => {
            for _ in 0..e {
                alpha *= 10.0;
            }
            e
        }
    };

    if !alpha.is_finite() {
        return Err(ErreurNoyau::ArgumentInvalide(format!(
            "exposant imposé {exposant} hors de portée des flottants"
        )));
    }

    // 4) petits exposants : on défait la mise à l’échelle
    if exposant <= EXPOSANT_MAX_SILENCIEUX {
        while exposant > 0 {
            alpha /= 10.0;
            exposant -= 1;
        }
    }

    // 5) grille de quantification (flottante pour le texte, exacte pour la valeur)
    let pas = pas_rationnel(precision)?;
    let alpha_exact = BigRational::from_float(alpha)
        .ok_or_else(|| ErreurNoyau::ArgumentInvalide(format!("magnitude non finie: {alpha}")))?;
    let crans = arrondi_pair(&(alpha_exact / &pas));
    alpha = (alpha / precision).round_ties_even() * precision;

    // 6) texte minimal
    let mantisse = format_decimal(alpha);

    // une partie nulle n’a ni signe, ni exposant, ni multiplicateur
    if crans.is_zero() || mantisse == "0" {
        debug!(exposant, "repli décimal nul");
        return Ok((Expr::zero(), "0".to_string()));
    }

    // 7) signe
    let mut texte = if negatif {
        format!("-{mantisse}")
    } else {
        mantisse
    };

    // 8) exposant
    if exposant != 0 {
        texte.push_str(&format!("e-{exposant}"));
    }

    // 9) multiplicateur littéral
    if !multiplicateur.est_un() {
        texte.push('*');
        texte.push_str(&format_exact(multiplicateur));
    }

    debug!(exposant, texte = %texte, "repli décimal");

    // 10) valeur exacte : signe · crans · pas · 10^-e · multiplicateur
    let mut coeff = BigRational::from_integer(crans) * pas;
    coeff /= BigRational::from_integer(BigInt::from(10).pow(exposant));
    if negatif {
        coeff = -coeff;
    }
    let exact = Expr::Rat(coeff).fois(multiplicateur.clone()).normalise();

    Ok((exact, texte))
}

/// Pas de la grille en rationnel : écriture décimale la plus courte (1e-6 -> 1/10^6).
fn pas_rationnel(precision: f64) -> Result<BigRational, ErreurNoyau> {
    decimal_vers_rationnel(&format!("{precision:e}"))
        .or_else(|| BigRational::from_float(precision))
        .ok_or_else(|| ErreurNoyau::ArgumentInvalide(format!("précision illisible: {precision}")))
}

/// Entier le plus proche, égalités vers le pair (comme round_ties_even).
fn arrondi_pair(r: &BigRational) -> BigInt {
    let bas = r.floor();
    let reste = r - &bas;
    let demi = BigRational::new(BigInt::one(), BigInt::from(2));
    let bas = bas.to_integer();
    match reste.cmp(&demi) {
        Ordering::Less => bas,
        Ordering::Greater => bas + 1,
        Ordering::Equal if (&bas % 2u32).is_zero() => bas,
        Ordering::Equal => bas + 1,
    }
}
