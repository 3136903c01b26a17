// src/noyau/canon.rs
//
// Canonicalisation forte (déterministe) :
// - aplatissement Add/Sub et Mul
// - suppression neutres (x+0, x*1, etc.)
// - extraction / remontée du signe (Sub(0,x) comme “-x” canon)
// - regroupement des rationnels, des racines entières et des puissances de i
// - tri déterministe des termes/facteurs (ordre total)
// - reconstruction “jolie” : utilise Sub quand le terme suivant est négatif
// - simplif √(n) -> a*√b (extraction des carrés parfaits) pour n entier ≥ 0
//
// Forme d’un produit canon : Rat (si ≠ 1) puis √k, i, π, toujours dans cet ordre.

use crate::noyau::expr::Expr;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use std::cmp::Ordering;

pub fn canon_expr(e: Expr) -> Expr {
    use Expr::*;

    match e {
        Rat(_) | Pi | I => e,

        Sqrt(x) => canon_sqrt(canon_expr(*x)),

        Add(a, b) => canon_addsub(Add(Box::new(canon_expr(*a)), Box::new(canon_expr(*b)))),
        Sub(a, b) => canon_addsub(Sub(Box::new(canon_expr(*a)), Box::new(canon_expr(*b)))),

        Mul(a, b) => canon_mul(Mul(Box::new(canon_expr(*a)), Box::new(canon_expr(*b)))),

        Div(a, b) => canon_div(Div(Box::new(canon_expr(*a)), Box::new(canon_expr(*b)))),
    }
}

/* ------------------------ utilitaires signe ------------------------ */

fn is_zero(e: &Expr) -> bool {
    matches!(e, Expr::Rat(r) if r.is_zero())
}

fn is_one(e: &Expr) -> bool {
    matches!(e, Expr::Rat(r) if r.is_one())
}

/// Renvoie (negatif?, valeur_absolue)
fn split_signe(e: Expr) -> (bool, Expr) {
    use Expr::*;
    match e {
        Rat(r) if r.is_negative() => (true, Rat(-r)),
        Sub(a, b) if is_zero(&a) => (true, *b),
        // produit canon : le signe vit dans le coefficient rationnel de tête
        Mul(a, b) if matches!(premier_facteur(&a), Rat(r) if r.is_negative()) => {
            (true, canon_mul(Mul(Box::new(Rat(-BigRational::one())), Box::new(Mul(a, b)))))
        }
        other => (false, other),
    }
}

fn premier_facteur(e: &Expr) -> &Expr {
    match e {
        Expr::Mul(a, _) => premier_facteur(a),
        other => other,
    }
}

fn neg(e: Expr) -> Expr {
    use Expr::*;
    match e {
        Rat(r) => Rat(-r),
        Mul(a, b) => canon_mul(Mul(Box::new(Rat(-BigRational::one())), Box::new(Mul(a, b)))),
        other => Sub(Box::new(Rat(BigRational::zero())), Box::new(other)),
    }
}

/* ------------------------ clef de tri déterministe ------------------------ */

fn rang(e: &Expr) -> u8 {
    use Expr::*;
    match e {
        Rat(_) => 0,
        Sqrt(_) => 2,
        I => 3,
        Pi => 4,
        Mul(_, _) | Div(_, _) => 6,
        Add(_, _) | Sub(_, _) => 7,
    }
}

fn key_string(e: &Expr) -> String {
    use Expr::*;
    match e {
        Rat(r) => {
            let n = r.numer().to_string();
            let d = r.denom().to_string();
            format!("R{n}/{d}")
        }
        Pi => "PI".to_string(),
        I => "I".to_string(),

        Sqrt(x) => format!("SQRT({})", key_string(x)),

        Add(a, b) => format!("ADD({},{})", key_string(a), key_string(b)),
        Sub(a, b) => format!("SUB({},{})", key_string(a), key_string(b)),
        Mul(a, b) => format!("MUL({},{})", key_string(a), key_string(b)),
        Div(a, b) => format!("DIV({},{})", key_string(a), key_string(b)),
    }
}

fn cmp_expr(a: &Expr, b: &Expr) -> Ordering {
    let ra = rang(a);
    let rb = rang(b);
    ra.cmp(&rb).then_with(|| key_string(a).cmp(&key_string(b)))
}

/// Dans une somme : termes réels d’abord, termes imaginaires ensuite.
fn cmp_terme(a: &Expr, b: &Expr) -> Ordering {
    (!a.est_reelle())
        .cmp(&!b.est_reelle())
        .then_with(|| cmp_expr(a, b))
}

/* ------------------------ Add/Sub : aplatissement + tri + reconstruction ------------------------ */

fn collect_addsub(e: Expr, out: &mut Vec<Expr>) {
    use Expr::*;
    match e {
        Add(a, b) => {
            collect_addsub(*a, out);
            collect_addsub(*b, out);
        }
        Sub(a, b) => {
            collect_addsub(*a, out);
            // -(x+y) : on redistribue le signe sur chaque terme
            let mut sous: Vec<Expr> = Vec::new();
            collect_addsub(*b, &mut sous);
            out.extend(sous.into_iter().map(neg));
        }
        other => out.push(other),
    }
}

fn canon_addsub(e: Expr) -> Expr {
    // On reçoit déjà des sous-termes canonisés (canon_expr).
    let mut termes: Vec<Expr> = Vec::new();
    collect_addsub(e, &mut termes);

    // Retirer les zéros + regrouper les rationnels.
    let mut somme_rat = BigRational::zero();
    let mut v: Vec<Expr> = Vec::with_capacity(termes.len());

    for t in termes {
        match t {
            Expr::Rat(r) => somme_rat += r,
            other => {
                if !is_zero(&other) {
                    v.push(other);
                }
            }
        }
    }

    if !somme_rat.is_zero() {
        v.push(Expr::Rat(somme_rat));
    }

    if v.is_empty() {
        return Expr::Rat(BigRational::zero());
    }

    // Tri déterministe
    v.sort_by(cmp_terme);

    // Reconstruction “jolie” : si le terme suivant est négatif, on utilise Sub(acc, abs).
    let mut acc = v[0].clone();
    for t in v.into_iter().skip(1) {
        let (negatif, abs) = split_signe(t);
        if negatif {
            acc = Expr::Sub(Box::new(acc), Box::new(abs));
        } else {
            acc = Expr::Add(Box::new(acc), Box::new(abs));
        }
    }
    acc
}

/* ------------------------ Mul : aplatissement + signe + tri + reconstruction ------------------------ */

fn collect_mul(e: Expr, out: &mut Vec<Expr>) {
    use Expr::*;
    match e {
        Mul(a, b) => {
            collect_mul(*a, out);
            collect_mul(*b, out);
        }
        other => out.push(other),
    }
}

/// Radicande entier > 0 si l’expression est √k.
fn radicande_entier(e: &Expr) -> Option<BigInt> {
    if let Expr::Sqrt(x) = e {
        if let Expr::Rat(r) = x.as_ref() {
            if r.is_positive() && r.denom().is_one() {
                return Some(r.numer().clone());
            }
        }
    }
    None
}

fn canon_mul(e: Expr) -> Expr {
    use Expr::*;

    let mut facteurs: Vec<Expr> = Vec::new();
    collect_mul(e, &mut facteurs);

    // Extraire signe global, regrouper rationnels / √k / i, retirer *1, court-circuit *0.
    let mut signe_neg = false;
    let mut prod_rat = BigRational::one();
    let mut radicande = BigInt::one();
    let mut puissance_i: u32 = 0;
    let mut v: Vec<Expr> = Vec::with_capacity(facteurs.len());

    for f in facteurs {
        // 0 * ... = 0
        if is_zero(&f) {
            return Rat(BigRational::zero());
        }

        let (neg_f, abs_f) = split_signe(f);
        if neg_f {
            signe_neg = !signe_neg;
        }

        if let Some(k) = radicande_entier(&abs_f) {
            radicande *= k;
            continue;
        }

        match abs_f {
            Rat(r) => prod_rat *= r,
            I => puissance_i += 1,
            other => {
                if !is_one(&other) {
                    v.push(other);
                }
            }
        }
    }

    // √a·√b = √(ab), puis extraction des carrés parfaits
    if !radicande.is_one() {
        let mut morceaux: Vec<Expr> = Vec::new();
        collect_mul(canon_sqrt(Rat(BigRational::from_integer(radicande))), &mut morceaux);
        for m in morceaux {
            match m {
                Rat(r) => prod_rat *= r,
                other => v.push(other),
            }
        }
    }

    // i^k, k mod 4
    match puissance_i % 4 {
        1 => v.push(I),
        2 => signe_neg = !signe_neg,
        3 => {
            v.push(I);
            signe_neg = !signe_neg;
        }
        _ => {}
    }

    // Pousser le signe dans prod_rat
    if signe_neg {
        prod_rat = -prod_rat;
    }

    // Si prod_rat != 1 : on le garde comme facteur.
    if !prod_rat.is_one() || v.is_empty() {
        v.push(Rat(prod_rat));
    }

    if v.len() == 1 {
        if let Some(seul) = v.pop() {
            return seul;
        }
    }

    // Tri déterministe des facteurs
    v.sort_by(cmp_expr);

    // Reconstruction left-assoc
    let mut acc = v[0].clone();
    for f in v.into_iter().skip(1) {
        acc = Mul(Box::new(acc), Box::new(f));
    }
    acc
}

/* ------------------------ Div : signe + cas simples ------------------------ */

fn canon_div(e: Expr) -> Expr {
    use Expr::*;

    let Div(a, b) = e else { return e };

    // a/1 => a
    if is_one(&b) {
        return *a;
    }

    // 0/b => 0 (même si b=0 : la lecture décimale signalera la division)
    if is_zero(&a) {
        return Rat(BigRational::zero());
    }

    // a/(p/q) => (q/p)*a
    if let Rat(r) = b.as_ref() {
        if !r.is_zero() {
            return canon_mul(Mul(Box::new(Rat(r.recip())), a));
        }
    }

    // Remonter le signe du dénominateur : a/(-b) => -(a/b)
    let (neg_b, abs_b) = split_signe(*b);
    let mut num = *a;

    if neg_b {
        num = neg(num);
    }

    Div(Box::new(num), Box::new(abs_b))
}

/* ------------------------ Sqrt ------------------------ */

fn canon_sqrt(x: Expr) -> Expr {
    use Expr::*;

    // √(rat) : si entier >= 0, on extrait les carrés parfaits : √(s²*t) = s*√t
    if let Rat(r) = &x {
        if r.is_zero() {
            return Rat(BigRational::zero());
        }
        if r.is_positive() && r.denom().is_one() {
            let n = r.numer().clone();
            let (s, t) = extrait_carre_parfait(&n);
            if t.is_one() {
                return Rat(BigRational::from_integer(s));
            }
            if !s.is_one() {
                return Mul(
                    Box::new(Rat(BigRational::from_integer(s))),
                    Box::new(Sqrt(Box::new(Rat(BigRational::from_integer(t))))),
                );
            }
            return Sqrt(Box::new(Rat(BigRational::from_integer(t))));
        }
    }

    Sqrt(Box::new(x))
}

/// Décompose n >= 0 en n = s^2 * t, avec t “sans facteur carré” (par essais).
fn extrait_carre_parfait(n: &BigInt) -> (BigInt, BigInt) {
    if n.is_zero() {
        return (BigInt::zero(), BigInt::zero());
    }
    if n.is_one() {
        return (BigInt::one(), BigInt::one());
    }

    let mut reste = n.clone();
    let mut s = BigInt::one();

    // Essai par p = 2 puis impairs. Suffisant pour nos petits radicandes (√8, √12, √18…)
    let mut p = BigInt::from(2);
    while &p * &p <= reste {
        let p2 = &p * &p;

        while (&reste % &p2).is_zero() {
            reste /= &p2;
            s *= &p;
        }

        if p == BigInt::from(2) {
            p = BigInt::from(3);
        } else {
            p += 2;
        }
    }

    (s, reste)
}
