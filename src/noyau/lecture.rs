// src/noyau/lecture.rs
//
// Lecture décimale exacte d’une valeur (entiers “scalés”, zéro flottant)
// ---------------------------------------------------------------------
// - chaque nœud s’évalue en (re, im) × 10^digits, tronqué
// - π par Machin, calculé une fois par lecture (pas de cache global)
// - √ seulement sur argument rationnel (√ négatif => imaginaire)

use num_bigint::BigInt;
use num_complex::Complex64;
use num_rational::BigRational;
use num_traits::{Signed, Zero};

use super::erreur::ErreurNoyau;
use super::expr::{int_sqrt_floor, Expr};
use super::format::scaled_to_decimal;

/// Chiffres de garde (absorbent les troncatures intermédiaires).
const GARDE: usize = 10;

/// Première lecture pour approx (élargie si la valeur est petite).
const DIGITS_APPROX: usize = 20;

/// Chiffres utiles visés par approx (f64 en demande 17).
const CHIFFRES_SIGNIFICATIFS_APPROX: usize = 20;

/// Sous 10^-360, plus aucun f64 (même dénormalisé) : inutile de lire plus loin.
const DIGITS_APPROX_MAX: usize = 360;

fn pow10(n: usize) -> BigInt {
    BigInt::from(10).pow(n as u32)
}

/// Valeur complexe scalée : (re + im·i) × 10^digits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scaled {
    pub re: BigInt,
    pub im: BigInt,
}

impl Scaled {
    fn reel(re: BigInt) -> Self {
        Self {
            re,
            im: BigInt::zero(),
        }
    }
}

/* ------------------------ π (Machin) ------------------------ */

/// arctan(1/q) en entier scalé (troncature) via série:
/// atan(z) = z - z^3/3 + z^5/5 - ...
fn arctan_inv_q_scaled(q: i64, scale: &BigInt) -> BigInt {
    let q = BigInt::from(q);
    let q2 = &q * &q;

    let mut k: i64 = 0;
    let mut q_pow = q.clone(); // q^(2k+1)
    let mut sum = BigInt::zero();

    loop {
        let term = scale / (&q_pow * BigInt::from(2 * k + 1));
        if term.is_zero() {
            break;
        }
        if k % 2 == 0 {
            sum += &term;
        } else {
            sum -= &term;
        }
        q_pow *= &q2;
        k += 1;
    }

    sum
}

/// π × 10^digits (tronqué). Machin : π = 16·atan(1/5) − 4·atan(1/239)
fn pi_scaled(digits: usize) -> BigInt {
    let extra = 10usize;
    let scale = pow10(digits + extra);

    let a = arctan_inv_q_scaled(5, &scale);
    let b = arctan_inv_q_scaled(239, &scale);

    (BigInt::from(16) * a - BigInt::from(4) * b) / pow10(extra)
}

/* ------------------------ √ en lecture ------------------------ */

/// floor( sqrt(n/d) × 10^digits ), r >= 0
fn rational_sqrt_scaled(r: &BigRational, digits: usize) -> BigInt {
    // sqrt(n/d)·S = sqrt(n·S²/d)
    let cible = r.numer() * pow10(2 * digits) / r.denom();
    int_sqrt_floor(&cible)
}

/* ------------------------ Évaluation scalée ------------------------ */

struct Lecteur {
    digits: usize,
    scale: BigInt,
    pi: Option<BigInt>,
}

impl Lecteur {
    fn new(digits: usize) -> Self {
        Self {
            digits,
            scale: pow10(digits),
            pi: None,
        }
    }

    fn rational(&self, r: &BigRational) -> BigInt {
        (r.numer() * &self.scale) / r.denom()
    }

    fn pi(&mut self) -> BigInt {
        let digits = self.digits;
        self.pi.get_or_insert_with(|| pi_scaled(digits)).clone()
    }

    fn eval(&mut self, expr: &Expr) -> Result<Scaled, ErreurNoyau> {
        use Expr::*;

        match expr {
            Rat(r) => Ok(Scaled::reel(self.rational(r))),
            Pi => Ok(Scaled::reel(self.pi())),
            I => Ok(Scaled {
                re: BigInt::zero(),
                im: self.scale.clone(),
            }),

            Add(a, b) => {
                let (x, y) = (self.eval(a)?, self.eval(b)?);
                Ok(Scaled {
                    re: x.re + y.re,
                    im: x.im + y.im,
                })
            }
            Sub(a, b) => {
                let (x, y) = (self.eval(a)?, self.eval(b)?);
                Ok(Scaled {
                    re: x.re - y.re,
                    im: x.im - y.im,
                })
            }

            // (a+bi)(c+di) = (ac-bd) + (ad+bc)i
            Mul(a, b) => {
                let (x, y) = (self.eval(a)?, self.eval(b)?);
                let s = &self.scale;
                Ok(Scaled {
                    re: (&x.re * &y.re - &x.im * &y.im) / s,
                    im: (&x.re * &y.im + &x.im * &y.re) / s,
                })
            }

            // (a+bi)/(c+di) = ((ac+bd) + (bc-ad)i) / (c²+d²)
            Div(a, b) => {
                let (x, y) = (self.eval(a)?, self.eval(b)?);
                let denom = &y.re * &y.re + &y.im * &y.im;
                if denom.is_zero() {
                    return Err(ErreurNoyau::lecture("division par zéro"));
                }
                let s = &self.scale;
                Ok(Scaled {
                    re: (&x.re * &y.re + &x.im * &y.im) * s / &denom,
                    im: (&x.im * &y.re - &x.re * &y.im) * s / &denom,
                })
            }

            Sqrt(x) => {
                let r = match x.as_ref().clone().simplify() {
                    Rat(r) => r,
                    _ => return Err(ErreurNoyau::lecture("√ : argument non rationnel")),
                };
                let v = rational_sqrt_scaled(&r.abs(), self.digits);
                if r.is_negative() {
                    Ok(Scaled {
                        re: BigInt::zero(),
                        im: v,
                    })
                } else {
                    Ok(Scaled::reel(v))
                }
            }
        }
    }
}

/// Évalue une valeur en entiers “scalés” (×10^digits, tronqués).
pub fn eval_scaled(expr: &Expr, digits: usize) -> Result<Scaled, ErreurNoyau> {
    let mut l = Lecteur::new(digits + GARDE);
    let s = l.eval(expr)?;
    let garde = pow10(GARDE);
    Ok(Scaled {
        re: s.re / &garde,
        im: s.im / &garde,
    })
}

/// Lecture décimale : "0.7071067811", "0.5*I", "1.5-0.25*I".
pub fn lecture_decimale(expr: &Expr, digits: usize) -> Result<String, ErreurNoyau> {
    let s = eval_scaled(expr, digits)?;
    let re = scaled_to_decimal(s.re, digits);
    let im = scaled_to_decimal(s.im, digits);

    Ok(match (re == "0", im == "0") {
        (_, true) => re,
        (true, false) => format!("{im}*I"),
        (false, false) if im.starts_with('-') => format!("{re}{im}*I"),
        (false, false) => format!("{re}+{im}*I"),
    })
}

/// Valeur flottante (complexe) de l’expression exacte, en précision relative :
/// on élargit la lecture jusqu’à CHIFFRES_SIGNIFICATIFS_APPROX chiffres utiles.
pub fn approx(expr: &Expr) -> Result<Complex64, ErreurNoyau> {
    if expr.est_zero() {
        return Ok(Complex64::new(0.0, 0.0));
    }
    let mut digits = DIGITS_APPROX;
    let s = loop {
        let s = eval_scaled(expr, digits)?;
        let utiles = s.re.abs().max(s.im.abs()).to_string().len();
        if utiles >= CHIFFRES_SIGNIFICATIFS_APPROX || digits >= DIGITS_APPROX_MAX {
            break s;
        }
        // valeur nulle : "0" => un seul chiffre, on pousse jusqu’à la borne
        digits = (digits + CHIFFRES_SIGNIFICATIFS_APPROX - utiles + 1).min(DIGITS_APPROX_MAX);
    };

    // "<entier>e-<digits>" : conversion correctement arrondie, sans 10^digits flottant
    let vers_f64 = |x: &BigInt| {
        format!("{x}e-{digits}")
            .parse::<f64>()
            .map_err(|_| ErreurNoyau::lecture("valeur hors des flottants"))
    };
    Ok(Complex64::new(vers_f64(&s.re)?, vers_f64(&s.im)?))
}
