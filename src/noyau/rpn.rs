// src/noyau/rpn.rs
//
// Shunting-yard -> RPN -> Expr
// Objectif:
// - Convertir une suite de Tok en RPN (postfix)
// - Puis reconstruire Expr
//
// Règles:
// - Sqrt est une fonction unaire (postfixée en RPN, sortie après sa parenthèse fermante)
// - Moins unaire : si '-' arrive quand on n’attend PAS une valeur, on injecte 0 : "-x" => "0 x -"
// - Plus unaire : ignoré
// - x^n : n entier borné, développé en produit (pas de nœud puissance dans Expr)

use num_rational::BigRational;
use num_traits::{One, ToPrimitive, Zero};

use super::erreur::ErreurNoyau;
use super::expr::Expr;
use super::jetons::Tok;

/// |n| maximal accepté pour x^n.
const PUISSANCE_MAX: i64 = 64;

fn precedence(t: &Tok) -> i32 {
    match t {
        Tok::Plus | Tok::Minus => 1,
        Tok::Star | Tok::Slash => 2,
        Tok::Caret => 3,
        _ => 0,
    }
}

fn is_right_associative(t: &Tok) -> bool {
    matches!(t, Tok::Caret)
}

/// Dépile les opérateurs qui doivent sortir avant `tok`.
fn depile_avant(tok: &Tok, ops: &mut Vec<Tok>, out: &mut Vec<Tok>) {
    while let Some(top) = ops.last() {
        // bloqué par '(' ou par une fonction (elle reste collée à son argument)
        if matches!(top, Tok::LPar | Tok::Sqrt) {
            break;
        }

        let p_top = precedence(top);
        let p_tok = precedence(tok);

        let doit_pop = if is_right_associative(tok) {
            p_top > p_tok
        } else {
            p_top >= p_tok
        };

        if !doit_pop {
            break;
        }
        if let Some(op) = ops.pop() {
            out.push(op);
        }
    }
}

/// Convertit une suite de jetons en RPN (notation polonaise inversée).
///
/// Exemple:
///   tokens: [Sqrt, LPar, Num(2), RPar, Slash, Num(2)]
///   rpn:    [Num(2), Sqrt, Num(2), Slash]
pub fn to_rpn(tokens: &[Tok]) -> Result<Vec<Tok>, ErreurNoyau> {
    let mut out: Vec<Tok> = Vec::new();
    let mut ops: Vec<Tok> = Vec::new();

    // “valeur” = un atome ou une expression fermée (sert à détecter les signes unaires)
    let mut prev_was_value = false;

    for tok in tokens.iter().cloned() {
        match tok {
            Tok::Num(_) | Tok::Pi | Tok::I => {
                out.push(tok);
                prev_was_value = true;
            }

            Tok::Sqrt | Tok::LPar => {
                ops.push(tok);
                prev_was_value = false;
            }

            Tok::RPar => {
                let mut ferme = false;
                while let Some(top) = ops.pop() {
                    if matches!(top, Tok::LPar) {
                        ferme = true;
                        break;
                    }
                    out.push(top);
                }
                if !ferme {
                    return Err(ErreurNoyau::lecture("parenthèse fermante sans ouvrante"));
                }

                // si une fonction est au sommet, on la sort aussi
                if matches!(ops.last(), Some(Tok::Sqrt)) {
                    if let Some(f) = ops.pop() {
                        out.push(f);
                    }
                }

                prev_was_value = true;
            }

            Tok::Plus if !prev_was_value => {}

            Tok::Minus if !prev_was_value => {
                // moins unaire : 0 - x ; rien n’est dépilé, le '-' s’applique à ce qui suit
                // ("2^-1" => 2^(0-1), "-2^2" => 0-(2^2))
                out.push(Tok::Num(BigRational::zero()));
                ops.push(tok);
            }

            Tok::Plus | Tok::Minus | Tok::Star | Tok::Slash | Tok::Caret => {
                depile_avant(&tok, &mut ops, &mut out);
                ops.push(tok);
                prev_was_value = false;
            }
        }
    }

    // vide la pile ops
    while let Some(op) = ops.pop() {
        if matches!(op, Tok::LPar) {
            return Err(ErreurNoyau::lecture("parenthèses non fermées"));
        }
        out.push(op);
    }

    Ok(out)
}

/// Construit une Expr à partir d’une RPN.
pub fn from_rpn(rpn: &[Tok]) -> Result<Expr, ErreurNoyau> {
    let invalide = || ErreurNoyau::lecture("expression invalide");
    let mut st: Vec<Expr> = Vec::new();

    for tok in rpn.iter().cloned() {
        match tok {
            Tok::Num(r) => st.push(Expr::Rat(r)),
            Tok::Pi => st.push(Expr::Pi),
            Tok::I => st.push(Expr::I),

            Tok::Sqrt => {
                let x = st.pop().ok_or_else(|| ErreurNoyau::lecture("sqrt sans argument"))?;
                st.push(Expr::Sqrt(Box::new(x)));
            }

            Tok::Plus | Tok::Minus | Tok::Star | Tok::Slash | Tok::Caret => {
                let b = st.pop().ok_or_else(invalide)?;
                let a = st.pop().ok_or_else(invalide)?;

                let e = match tok {
                    Tok::Plus => Expr::Add(Box::new(a), Box::new(b)),
                    Tok::Minus => Expr::Sub(Box::new(a), Box::new(b)),
                    Tok::Star => Expr::Mul(Box::new(a), Box::new(b)),
                    Tok::Slash => Expr::Div(Box::new(a), Box::new(b)),
                    _ => puissance_entiere(a, &b)?,
                };

                st.push(e);
            }

            Tok::LPar | Tok::RPar => {
                return Err(ErreurNoyau::lecture("parenthèse inattendue en RPN"))
            }
        }
    }

    match (st.pop(), st.is_empty()) {
        (Some(e), true) => Ok(e),
        _ => Err(invalide()),
    }
}

/// x^n, n entier : produit de n copies (1/… si n < 0).
fn puissance_entiere(base: Expr, exposant: &Expr) -> Result<Expr, ErreurNoyau> {
    let n = match exposant.clone().simplify() {
        Expr::Rat(r) if r.denom().is_one() => r
            .numer()
            .to_i64()
            .ok_or_else(|| ErreurNoyau::lecture("exposant trop grand"))?,
        _ => return Err(ErreurNoyau::lecture("exposant doit être entier")),
    };
    if n.abs() > PUISSANCE_MAX {
        return Err(ErreurNoyau::lecture(format!(
            "exposant hors borne (|n| <= {PUISSANCE_MAX})"
        )));
    }

    let mut acc = Expr::Rat(BigRational::one());
    for _ in 0..n.abs() {
        acc = acc.fois(base.clone());
    }
    if n < 0 {
        acc = Expr::Div(Box::new(Expr::un()), Box::new(acc));
    }
    Ok(acc)
}
