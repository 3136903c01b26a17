// src/noyau/remarquables.rs
//
// Multiplicateurs remarquables {1, π, √2, √3, √5, √6}
// ---------------------------------------------------
// L’ordre de la table EST la règle de départage : pour un dénominateur donné,
// le premier multiplicateur qui convient gagne.

use std::f64::consts::{PI, SQRT_2};

use super::expr::Expr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Remarquable {
    Un,
    Pi,
    Racine(u32),
}

/// Table figée, dans l’ordre de priorité.
pub static REMARQUABLES: [Remarquable; 6] = [
    Remarquable::Un,
    Remarquable::Pi,
    Remarquable::Racine(2),
    Remarquable::Racine(3),
    Remarquable::Racine(5),
    Remarquable::Racine(6),
];

impl Remarquable {
    pub fn valeur(self) -> f64 {
        match self {
            Remarquable::Un => 1.0,
            Remarquable::Pi => PI,
            Remarquable::Racine(2) => SQRT_2,
            Remarquable::Racine(k) => f64::from(k).sqrt(),
        }
    }

    pub fn expr(self) -> Expr {
        match self {
            Remarquable::Un => Expr::un(),
            Remarquable::Pi => Expr::Pi,
            Remarquable::Racine(k) => Expr::racine(k),
        }
    }
}

/// Candidats (dénominateur, multiplicateur) dans l’ordre de balayage :
/// dénominateur croissant 1..fracmax (exclu), puis table ci-dessus.
pub fn candidats(fracmax: u32) -> impl Iterator<Item = (u32, Remarquable)> {
    (1..fracmax).flat_map(|d| REMARQUABLES.iter().map(move |m| (d, *m)))
}
