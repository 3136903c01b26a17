//! Noyau exact des formes remarquables
//!
//! Organisation interne :
//! - expr.rs          : valeur exacte (AST) + simplify local
//! - canon.rs         : canonicalisation déterministe (égalité structurelle)
//! - format.rs        : affichage “sympy-like” (pi/2, 3*sqrt(2)/4, I/2) + décimal tronqué
//! - remarquables.rs  : table figée {1, π, √2, √3, √5, √6}
//! - options.rs       : précision, recherche, fracmax
//! - erreur.rs        : erreurs typées
//! - simple.rs        : simplification d’un réel (recherche puis repli décimal)
//! - complexe.rs      : composition réel + imaginaire
//! - parametres.rs    : "nom=valeur" joints
//! - jetons.rs        : tokenisation d’un affichage
//! - rpn.rs           : shunting-yard + construction Expr
//! - lecture.rs       : lecture décimale exacte (entiers scalés)
//! - eval.rs          : relecture complète + re-simplification

pub mod canon;
pub mod complexe;
pub mod erreur;
pub mod eval;
pub mod expr;
pub mod format;
pub mod jetons;
pub mod lecture;
pub mod options;
pub mod parametres;
pub mod remarquables;
pub mod rpn;
pub mod simple;

#[cfg(test)]
mod tests_scientifiques;

#[cfg(test)]
mod tests_fuzz_safe;
