//! Tests scientifiques (campagne) : invariants + scénarios + limites contrôlées.
//!
//! But : vérifier les propriétés annoncées sans faire chauffer la machine.
//! - budget temps global
//! - grilles petites (n, d, multiplicateur)
//! - digits limités pour la lecture décimale
//!
//! Notes :
//! - La tolérance de recherche porte sur le résidu |v - round(v)| avec v = |x|/m·d :
//!   l’écart réel |n/d·m - x| vaut résidu·m/d, donc au pire precision·π (d = 1, m = π).
//! - Le repli décimal arrondit sur la grille : écart <= precision/2 (au bruit flottant près).

use std::f64::consts::{E, PI, SQRT_2};
use std::time::{Duration, Instant};

use num_bigint::BigInt;
use num_complex::Complex64;
use num_rational::BigRational;

use super::complexe::simplifie_complexe;
use super::eval::{eval_expression, resimplifie};
use super::expr::Expr;
use super::lecture::approx;
use super::options::Options;
use super::parametres::{formate_parametres, ValeurParam};
use super::remarquables::REMARQUABLES;
use super::simple::simplifie_reel;

fn simple_ok(x: f64, o: &Options) -> (Expr, String) {
    simplifie_reel(x, o).unwrap_or_else(|e| panic!("x={x:?} err={e}"))
}

fn assert_texte(x: f64, attendu: &str) {
    let (_exact, texte) = simple_ok(x, &Options::default());
    assert_eq!(texte, attendu, "x={x:?}");
}

/// Budget global anti-gel.
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Scénarios ------------------------ */

#[test]
fn sci_scenarios_reels() {
    let (exact, texte) = simple_ok(PI / 2.0, &Options::default());
    assert_eq!(texte, "pi/2");
    assert_eq!(exact, Expr::rat(1, 2).fois(Expr::Pi).normalise());

    let sans = Options::default().sans_recherche();
    assert_eq!(simple_ok(0.1, &sans).1, "0.1");

    assert_texte(0.00012345, "1.2345e-4");
}

#[test]
fn sci_scenario_parametres() {
    let params: Vec<(&str, ValeurParam)> =
        vec![("theta", (PI / 2.0).into()), ("phi", "fixed".into())];
    let s = formate_parametres(params, &Options::default(), ", ").unwrap();
    assert_eq!(s, "theta=pi/2, phi=fixed");
}

/* ------------------------ Exactitude des formes closes ------------------------ */

#[test]
fn sci_formes_closes_grille() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);
    let o = Options::default();

    for m in REMARQUABLES {
        for d in 1..=7i64 {
            for n in (-6..=6i64).filter(|n| *n != 0) {
                budget(t0, max);

                let x = n as f64 / d as f64 * m.valeur();
                let (exact, texte) = simple_ok(x, &o);

                let q = BigRational::new(BigInt::from(n), BigInt::from(d));
                let attendu = Expr::Rat(q).fois(m.expr()).normalise();
                assert_eq!(exact, attendu, "n={n} d={d} m={m:?} texte={texte}");
            }
        }
    }
}

/* ------------------------ Borne de tolérance ------------------------ */

#[test]
fn sci_borne_de_tolerance() {
    let valeurs = [
        PI / 2.0,
        -3.0 * SQRT_2 / 7.0,
        E,
        -E / 1000.0,
        0.00012345,
        1234.56789,
        0.987654321,
        1e-9,
    ];

    for precision in [1e-3, 1e-6, 1e-9] {
        for recherche in [true, false] {
            let mut o = Options::default().avec_precision(precision);
            o.recherche = recherche;

            for x in valeurs {
                let (exact, texte) = simple_ok(x, &o);
                let v = approx(&exact).unwrap();
                assert_eq!(v.im, 0.0, "x={x} texte={texte}");

                let borne = if recherche { precision * PI } else { precision / 2.0 };
                let ecart = (v.re - x).abs();
                assert!(
                    ecart <= borne + 1e-12 * x.abs().max(1.0),
                    "x={x} precision={precision} recherche={recherche} texte={texte} ecart={ecart}"
                );
            }
        }
    }
}

#[test]
fn sci_repli_exact_au_dela_de_15_chiffres() {
    // le texte s’arrête à 15 chiffres significatifs, pas la valeur exacte
    for x in [1234567890.1234567, -98765432.123456789, 123456.7890123456] {
        for precision in [1e-6, 1e-3] {
            let o = Options::default().avec_precision(precision).sans_recherche();
            let (exact, texte) = simple_ok(x, &o);
            let ecart = (approx(&exact).unwrap().re - x).abs();
            assert!(
                ecart <= precision / 2.0 + f64::EPSILON * x.abs(),
                "x={x} precision={precision} texte={texte} ecart={ecart}"
            );
        }
    }

    let x = 1234567890.1234567;
    let (exact, texte) = simple_ok(x, &Options::default());
    assert_eq!(texte, "1234567890.12346");
    let ecart = (approx(&exact).unwrap().re - x).abs();
    assert!(ecart <= 5e-7 + f64::EPSILON * x, "ecart={ecart}");
}

/* ------------------------ Déterminisme + signe ------------------------ */

#[test]
fn sci_determinisme() {
    let o = Options::default();
    for x in [PI / 3.0, E, 0.00012345, -0.5, 3.0 * 6.0_f64.sqrt() / 5.0] {
        let a = simple_ok(x, &o);
        let b = simple_ok(x, &o);
        assert_eq!(a, b, "x={x}");
    }

    let z = Complex64::new(1e-5, -2e-5);
    let a = simplifie_complexe(z, &o).unwrap();
    let b = simplifie_complexe(z, &o).unwrap();
    assert_eq!(a, b);
}

#[test]
fn sci_signe() {
    for recherche in [true, false] {
        let mut o = Options::default();
        o.recherche = recherche;

        for x in [PI / 2.0, 0.75, SQRT_2 / 2.0, E, 0.00012345, 42.0, 1234.56789] {
            let (ep, tp) = simple_ok(x, &o);
            let (en, tn) = simple_ok(-x, &o);
            assert_eq!(tn, format!("-{tp}"), "x={x} recherche={recherche}");

            let (vp, vn) = (approx(&ep).unwrap(), approx(&en).unwrap());
            assert_eq!(vn.re, -vp.re, "x={x}");
        }
    }
}

/* ------------------------ Élision des zéros ------------------------ */

#[test]
fn sci_elision_des_zeros() {
    for recherche in [true, false] {
        let mut o = Options::default();
        o.recherche = recherche;

        assert_eq!(simplifie_complexe(Complex64::new(0.0, 0.0), &o).unwrap().1, "0");

        for r in [PI / 4.0, -0.1, E, 0.5, 1e-5] {
            assert_eq!(
                simplifie_complexe(Complex64::new(r, 0.0), &o).unwrap(),
                simple_ok(r, &o),
                "r={r} recherche={recherche}"
            );
        }

        for z in [0.5, -SQRT_2, 0.00012345] {
            let (_, t) = simplifie_complexe(Complex64::new(0.0, z), &o).unwrap();
            assert!(!t.starts_with('+'), "z={z} t={t}");
            assert!(t.contains('I'), "z={z} t={t}");
            assert!(!t.contains("0*I"), "z={z} t={t}");
        }
    }

    // partie réelle sous la grille une fois l’exposant partagé
    let sans = Options::default().sans_recherche();
    assert_eq!(simplifie_complexe(Complex64::new(1e-12, 2e-5), &sans).unwrap().1, "2e-5*I");
}

/* ------------------------ Idempotence (relecture) ------------------------ */

#[test]
fn sci_idempotence_reels() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    for recherche in [true, false] {
        let mut o = Options::default();
        o.recherche = recherche;

        for x in [
            PI / 2.0,
            -0.75,
            SQRT_2 / 2.0,
            3.0 * 6.0_f64.sqrt() / 5.0,
            E,
            0.00012345,
            0.1,
            0.123456789,
            1234.56789,
            1.23456789e-18,
            -2.5e-30,
            7.77e-21,
        ] {
            budget(t0, max);

            let (_, texte) = simple_ok(x, &o);
            let relu = eval_expression(&texte, 30)
                .unwrap_or_else(|e| panic!("texte={texte:?} err={e}"));
            let (_, texte2) = resimplifie(&relu.exact, &o).unwrap();
            assert_eq!(texte2, texte, "x={x} recherche={recherche}");
        }
    }
}

#[test]
fn sci_idempotence_complexes() {
    let o = Options::default();
    for z in [
        Complex64::new(0.5, -0.5),
        Complex64::new(0.0, PI),
        Complex64::new(SQRT_2 / 2.0, 0.25),
        Complex64::new(E, -E),
    ] {
        let (_, texte) = simplifie_complexe(z, &o).unwrap();
        let relu = eval_expression(&texte, 30).unwrap_or_else(|e| panic!("texte={texte:?} err={e}"));
        let (_, texte2) = resimplifie(&relu.exact, &o).unwrap();
        assert_eq!(texte2, texte, "z={z}");
    }
}

/* ------------------------ Stress contrôlé (sans brûler) ------------------------ */

#[test]
fn sci_stress_taille_somme_safe() {
    let t0 = Instant::now();
    let max = Duration::from_secs(2);

    // 80 termes : suffisant pour détecter une régression, sans exploser la pile
    let mut expr = String::new();
    for k in 0..80 {
        if k > 0 {
            expr.push_str(" + ");
        }
        expr.push_str("1/2");
        budget(t0, max);
    }

    let ev = eval_expression(&expr, 20).unwrap();
    assert_eq!(ev.texte, "40");
    assert_eq!(ev.lecture, "40");
}

#[test]
fn sci_stress_bigint_safe() {
    let t0 = Instant::now();
    let max = Duration::from_secs(2);

    // gros numérateur contrôlé (100 chiffres)
    let big = "9".repeat(100);
    let expr = format!("{big}/7 + 1/7");
    budget(t0, max);

    let ev = eval_expression(&expr, 20).unwrap();
    assert!(ev.texte.ends_with("/7"), "texte={}", ev.texte);
}

#[test]
fn sci_fracmax_borne_la_recherche() {
    // fracmax = 1 : aucun candidat, tout passe par le repli décimal
    let o = Options::default().avec_fracmax(1);
    assert_eq!(simple_ok(0.5, &o).1, "0.5");
    assert_eq!(simple_ok(PI, &o).1, "3.141593");

    // fracmax = 4 : 1/3 trouvé, 1/5 non
    let o = Options::default().avec_fracmax(4);
    assert_eq!(simple_ok(1.0 / 3.0, &o).1, "1/3");
    assert_eq!(simple_ok(0.2, &o).1, "0.2");
}
