// src/noyau/expr.rs
//
// Valeur exacte (sans flottants).
// - Rat  : rationnel exact
// - Pi   : symbole π
// - I    : unité imaginaire (i² = -1)
// - Sqrt : racine carrée (en pratique √k, k entier sans facteur carré)
//
// Les résultats du simplificateur sont toujours passés par simplify() puis canon(),
// ce qui rend l’égalité structurelle (==) utilisable entre deux résultats.

use crate::noyau::canon::canon_expr;
use crate::noyau::format::format_exact;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    Rat(BigRational),
    Pi,
    I,

    Sqrt(Box<Expr>), // √(x)

    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
}

/* ------------------------ Constructeurs ------------------------ */

impl Expr {
    pub fn zero() -> Expr {
        Expr::Rat(BigRational::zero())
    }

    pub fn un() -> Expr {
        Expr::Rat(BigRational::one())
    }

    pub fn entier(n: i64) -> Expr {
        Expr::Rat(BigRational::from_integer(BigInt::from(n)))
    }

    /// n/d ; d != 0 est à la charge de l’appelant.
    pub fn rat(n: i64, d: i64) -> Expr {
        Expr::Rat(BigRational::new(BigInt::from(n), BigInt::from(d)))
    }

    /// √k (non simplifiée : canon() extrait les carrés parfaits).
    pub fn racine(k: u32) -> Expr {
        Expr::Sqrt(Box::new(Expr::Rat(BigRational::from_integer(BigInt::from(k)))))
    }

    pub fn fois(self, autre: Expr) -> Expr {
        Expr::Mul(Box::new(self), Box::new(autre))
    }

    pub fn plus(self, autre: Expr) -> Expr {
        Expr::Add(Box::new(self), Box::new(autre))
    }

    pub fn est_zero(&self) -> bool {
        matches!(self, Expr::Rat(r) if r.is_zero())
    }

    pub fn est_un(&self) -> bool {
        matches!(self, Expr::Rat(r) if r.is_one())
    }

    /// Simplify puis canon : forme normale utilisée partout en sortie.
    pub fn normalise(self) -> Expr {
        self.simplify().canon()
    }
}

impl Expr {
    /// Canonicalisation forte (déterminisme structurel).
    /// On garde la canonisation hors de l’AST pour éviter les règles cachées.
    pub fn canon(self) -> Expr {
        canon_expr(self)
    }

    /// Simplification locale, sans heuristiques.
    /// Objectif: réduire ce qui est strictement démontrable sans exploser l’arbre.
    pub fn simplify(self) -> Expr {
        use Expr::*;

        match self {
            Rat(_) | Pi | I => self,

            Add(a, b) => {
                let a = a.simplify();
                let b = b.simplify();
                match (&a, &b) {
                    (Rat(x), Rat(y)) => Rat(x + y),
                    (Rat(x), _) if x.is_zero() => b,
                    (_, Rat(y)) if y.is_zero() => a,
                    _ => Add(Box::new(a), Box::new(b)),
                }
            }

            Sub(a, b) => {
                let a = a.simplify();
                let b = b.simplify();

                // x - x => 0
                if a == b {
                    return Rat(BigRational::zero());
                }

                match (&a, &b) {
                    (Rat(x), Rat(y)) => Rat(x - y),
                    (_, Rat(y)) if y.is_zero() => a,
                    // 0 - b : on garde Sub(0,b) (forme “-b” reconnue par canon)
                    (Rat(x), _) if x.is_zero() => Sub(Box::new(Rat(BigRational::zero())), Box::new(b)),
                    _ => Sub(Box::new(a), Box::new(b)),
                }
            }

            Mul(a, b) => {
                let a = a.simplify();
                let b = b.simplify();

                // i * i => -1
                if matches!((&a, &b), (I, I)) {
                    return Rat(-BigRational::one());
                }

                // √x * √x => x
                if let (Sqrt(x), Sqrt(y)) = (&a, &b) {
                    if x.as_ref() == y.as_ref() {
                        return (*x.clone()).simplify();
                    }
                }

                // √u * √v => √(u*v) si u,v rationnels >= 0
                if let (Sqrt(u), Sqrt(v)) = (&a, &b) {
                    if let (Rat(ru), Rat(rv)) = (u.as_ref(), v.as_ref()) {
                        if !ru.is_negative() && !rv.is_negative() {
                            return Sqrt(Box::new(Rat(ru.clone() * rv.clone()))).simplify();
                        }
                    }
                }

                match (&a, &b) {
                    (Rat(x), Rat(y)) => Rat(x * y),
                    (Rat(x), _) if x.is_zero() => Rat(BigRational::zero()),
                    (_, Rat(y)) if y.is_zero() => Rat(BigRational::zero()),
                    (Rat(x), _) if x.is_one() => b,
                    (_, Rat(y)) if y.is_one() => a,
                    _ => Mul(Box::new(a), Box::new(b)),
                }
            }

            Div(a, b) => {
                let a = a.simplify();
                let b = b.simplify();

                // division par zéro : on garde symbolique (la lecture décimale refusera)
                if b.est_zero() {
                    return Div(Box::new(a), Box::new(b));
                }

                // x / x => 1
                if a == b {
                    return Rat(BigRational::one());
                }

                // 1/i = -i
                if matches!(b, I) {
                    return Mul(Box::new(Rat(-BigRational::one())), Box::new(Mul(Box::new(a), Box::new(I))))
                        .simplify();
                }

                // √u / √v => √(u/v) si u,v rationnels > 0
                if let (Sqrt(u), Sqrt(v)) = (&a, &b) {
                    if let (Rat(ru), Rat(rv)) = (u.as_ref(), v.as_ref()) {
                        if ru.is_positive() && rv.is_positive() {
                            return Sqrt(Box::new(Rat(ru.clone() / rv.clone()))).simplify();
                        }
                    }
                }

                match (&a, &b) {
                    (Rat(x), Rat(y)) => Rat(x / y),
                    (_, Rat(y)) if y.is_one() => a,

                    // x / (p/q) => (q/p) * x : garde les dénominateurs dans le coefficient
                    (_, Rat(y)) => Mul(Box::new(Rat(y.recip())), Box::new(a)).simplify(),

                    // (p/q) / √n  => (p/qn) * √n, si n entier > 0
                    (Rat(x), Sqrt(inner)) => {
                        if let Rat(rn) = &**inner {
                            if rn.is_positive() && rn.denom().is_one() {
                                let x_over_n = x.clone() / rn.clone();
                                return Mul(Box::new(Rat(x_over_n)), Box::new(Sqrt(Box::new(Rat(rn.clone())))))
                                    .simplify();
                            }
                        }
                        Div(Box::new(a), Box::new(b))
                    }

                    _ => Div(Box::new(a), Box::new(b)),
                }
            }

            Sqrt(x) => {
                let x = x.simplify();
                if let Rat(r) = &x {
                    if let Some(s) = rational_sqrt_exact(r) {
                        return Rat(s);
                    }
                    // √(-k) = i·√k
                    if r.is_negative() {
                        let pos = Sqrt(Box::new(Rat(-r.clone()))).simplify();
                        return Mul(Box::new(pos), Box::new(I)).simplify();
                    }
                }
                Sqrt(Box::new(x))
            }
        }
    }

    /// Vrai si l’expression ne mentionne pas l’unité imaginaire.
    pub fn est_reelle(&self) -> bool {
        use Expr::*;
        match self {
            I => false,
            Rat(_) | Pi => true,
            Sqrt(x) => x.est_reelle(),
            Add(a, b) | Sub(a, b) | Mul(a, b) | Div(a, b) => a.est_reelle() && b.est_reelle(),
        }
    }
}

/* ------------------------ Affichage ------------------------ */

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_exact(self))
    }
}

/* ------------------------ Outils rationnels (utilisés par simplify) ------------------------ */

fn rational_sqrt_exact(r: &BigRational) -> Option<BigRational> {
    if r.is_negative() {
        return None;
    }
    let sn = int_sqrt_exact(r.numer())?;
    let sd = int_sqrt_exact(r.denom())?;
    Some(BigRational::new(sn, sd))
}

fn int_sqrt_exact(x: &BigInt) -> Option<BigInt> {
    if x.is_negative() {
        return None;
    }
    let s = int_sqrt_floor(x);
    if &s * &s == *x {
        Some(s)
    } else {
        None
    }
}

/// ⌊√x⌋ par Newton entier (x >= 0).
pub(crate) fn int_sqrt_floor(x: &BigInt) -> BigInt {
    if x.is_zero() || x.is_negative() {
        return BigInt::zero();
    }

    let mut y = approx_sqrt_start(x);
    loop {
        let y_next = (&y + (x / &y)) >> 1;
        if y_next >= y {
            let mut z = y_next;
            while (&z + 1u32) * (&z + 1u32) <= *x {
                z += 1u32;
            }
            while &z * &z > *x {
                z -= 1u32;
            }
            return z;
        }
        y = y_next;
    }
}

fn approx_sqrt_start(x: &BigInt) -> BigInt {
    let bits = x.bits();
    let half = bits.div_ceil(2);
    BigInt::one() << half
}
