// src/noyau/format.rs
//
// Affichage EXACT (ASCII, lisible et relisible par jetons.rs) :
//   pi/2, -3*pi/4, sqrt(2)/2, 3*sqrt(6)/5, I/2, sqrt(2)*I/2, 1/2+I/2
// Affichage DÉCIMAL :
//   15 chiffres significatifs, notation positionnelle, zéros de queue retirés.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

use super::expr::Expr;

/// Chiffres significatifs du rendu décimal.
const CHIFFRES_SIGNIFICATIFS: usize = 15;

/* ------------------------ Helpers rationnels ------------------------ */

fn format_rat_pretty(r: &BigRational) -> String {
    let n = r.numer();
    let d = r.denom();
    if d.is_one() {
        format!("{n}")
    } else {
        format!("{n}/{d}")
    }
}

fn is_sum(e: &Expr) -> bool {
    matches!(e, Expr::Add(_, _) | Expr::Sub(_, _))
}

/// Aplatit un produit : coefficient rationnel + facteurs symboliques (ordre conservé).
/// Div(x, k) avec k rationnel est absorbé dans le coefficient.
fn collecte_produit<'a>(e: &'a Expr, coeff: &mut BigRational, facteurs: &mut Vec<&'a Expr>) {
    match e {
        Expr::Rat(r) => *coeff *= r.clone(),
        Expr::Mul(a, b) => {
            collecte_produit(a, coeff, facteurs);
            collecte_produit(b, coeff, facteurs);
        }
        Expr::Div(a, b) => match b.as_ref() {
            Expr::Rat(k) if !k.is_zero() => {
                collecte_produit(a, coeff, facteurs);
                *coeff /= k.clone();
            }
            _ => facteurs.push(e),
        },
        Expr::Sub(a, b) if a.est_zero() => {
            *coeff = -coeff.clone();
            collecte_produit(b, coeff, facteurs);
        }
        other => facteurs.push(other),
    }
}

fn format_facteur(e: &Expr) -> String {
    let s = format_exact(e);
    if is_sum(e) || matches!(e, Expr::Div(_, _)) {
        format!("({s})")
    } else {
        s
    }
}

/// (p/q)·f1·f2… -> [-][|p|*]f1*f2[/q]
fn format_produit(coeff: &BigRational, facteurs: &[&Expr]) -> String {
    if coeff.is_zero() {
        return "0".to_string();
    }
    if facteurs.is_empty() {
        return format_rat_pretty(coeff);
    }

    let p = coeff.numer().abs();
    let q = coeff.denom();

    let mut out = String::new();
    if coeff.is_negative() {
        out.push('-');
    }
    if !p.is_one() {
        out.push_str(&format!("{p}*"));
    }
    let corps: Vec<String> = facteurs.iter().map(|f| format_facteur(f)).collect();
    out.push_str(&corps.join("*"));
    if !q.is_one() {
        out.push_str(&format!("/{q}"));
    }
    out
}

/* ------------------------ Affichage EXACT ------------------------ */

/// Formate la valeur exacte.
/// Pensé pour la forme canon, mais tolère n’importe quel arbre.
pub fn format_exact(e: &Expr) -> String {
    use Expr::*;

    match e {
        Rat(r) => format_rat_pretty(r),
        Pi => "pi".to_string(),
        I => "I".to_string(),

        Sqrt(x) => format!("sqrt({})", format_exact(x)),

        Mul(_, _) | Div(_, _) => {
            let mut coeff = BigRational::one();
            let mut facteurs: Vec<&Expr> = Vec::new();
            collecte_produit(e, &mut coeff, &mut facteurs);

            // Div non absorbée : rendu a/b brut
            if let [Div(a, b)] = facteurs.as_slice() {
                if coeff.is_one() {
                    return format!("{}/{}", format_facteur(a), format_facteur(b));
                }
            }
            format_produit(&coeff, &facteurs)
        }

        Add(a, b) => {
            let sa = format_exact(a);
            let sb = format_exact(b);
            if sb.starts_with('-') {
                format!("{sa}{sb}")
            } else {
                format!("{sa}+{sb}")
            }
        }

        // 0 - x => -x
        Sub(a, b) => {
            let sb = if is_sum(b) {
                format!("({})", format_exact(b))
            } else {
                format_exact(b)
            };
            if a.est_zero() {
                if let Some(positif) = sb.strip_prefix('-') {
                    return positif.to_string();
                }
                format!("-{sb}")
            } else {
                format!("{}-{sb}", format_exact(a))
            }
        }
    }
}

/* ------------------------ Affichage DÉCIMAL ------------------------ */

/// Retire les zéros de queue après la virgule, puis une virgule orpheline.
/// Sans point décimal, le texte est rendu tel quel ("100" reste "100").
pub fn trim_zeros(s: &str) -> String {
    if !s.contains('.') {
        return s.to_string();
    }
    let t = s.trim_end_matches('0');
    t.strip_suffix('.').unwrap_or(t).to_string()
}

/// Rendu positionnel à 15 chiffres significatifs, zéros de queue retirés.
///
/// 0.1 -> "0.1", 1.2345 -> "1.2345", 3.0 -> "3", 0.001235 -> "0.001235".
/// Au-delà de 1e15, notation scientifique courte de Rust ("1e16").
pub fn format_decimal(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }

    let signe = if v < 0.0 { "-" } else { "" };
    let a = v.abs();

    // "d.dddddddddddddde<exp>" : l’arrondi à 15 chiffres est fait par le formateur
    let sci = format!("{:.*e}", CHIFFRES_SIGNIFICATIFS - 1, a);
    let (mantisse, exp_txt) = match sci.split_once('e') {
        Some(parts) => parts,
        None => return format!("{signe}{sci}"),
    };
    let exp: i32 = match exp_txt.parse() {
        Ok(x) => x,
        Err(_) => return format!("{signe}{sci}"),
    };

    if exp >= CHIFFRES_SIGNIFICATIFS as i32 {
        return format!("{signe}{a:e}");
    }

    let chiffres: String = mantisse.chars().filter(|c| c.is_ascii_digit()).collect();

    let positionnel = if exp < 0 {
        let zeros = "0".repeat((-exp - 1) as usize);
        format!("0.{zeros}{chiffres}")
    } else {
        let coupe = (exp + 1) as usize;
        let (ent, frac) = chiffres.split_at(coupe.min(chiffres.len()));
        format!("{ent}.{frac}")
    };

    format!("{signe}{}", trim_zeros(&positionnel))
}

/// Rendu exact d’un entier “scalé” (valeur = scaled × 10^-digits), tronqué,
/// zéros de queue retirés. Utilisé par la lecture décimale.
pub fn scaled_to_decimal(mut scaled: BigInt, digits: usize) -> String {
    let neg = scaled.is_negative();
    if neg {
        scaled = -scaled;
    }

    let scale = BigInt::from(10).pow(digits as u32);
    let int_part = &scaled / &scale;
    let frac_part = &scaled % &scale;

    let mut txt = if digits == 0 {
        format!("{int_part}")
    } else {
        let mut frac = frac_part.to_str_radix(10);
        while frac.len() < digits {
            frac.insert(0, '0');
        }
        trim_zeros(&format!("{int_part}.{frac}"))
    };

    if neg && txt != "0" {
        txt.insert(0, '-');
    }
    txt
}
