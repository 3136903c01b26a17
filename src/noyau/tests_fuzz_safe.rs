//! Tests fuzz safe : robustesse + déterminisme + relecture.
//!
//! But : marteler les trois opérations sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - magnitudes bornées (1e-7 .. 1e6)
//! - budget temps global
//! - invariant clé : tout affichage produit est relisible par eval_expression

use std::f64::consts::PI;
use std::time::{Duration, Instant};

use num_complex::Complex64;

use super::complexe::simplifie_complexe;
use super::erreur::ErreurNoyau;
use super::eval::eval_expression;
use super::lecture::approx;
use super::options::Options;
use super::parametres::{formate_parametres, ValeurParam};
use super::remarquables::REMARQUABLES;
use super::simple::simplifie_reel;

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
    /// Uniforme dans [0, 1).
    fn unit(&mut self) -> f64 {
        f64::from(self.next_u32()) / 4_294_967_296.0
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Génération de valeurs (bornée) ------------------------ */

/// Forme close n/d·m, parfois bruitée sous la précision.
fn gen_forme_close(rng: &mut Rng) -> f64 {
    let n = rng.pick(40) as f64 + 1.0;
    let d = rng.pick(30) as f64 + 1.0;
    let m = REMARQUABLES[rng.pick(REMARQUABLES.len() as u32) as usize].valeur();
    let bruit = if rng.coin() { (rng.unit() - 0.5) * 1e-8 } else { 0.0 };
    let x = n / d * m + bruit;
    if rng.coin() {
        -x
    } else {
        x
    }
}

/// Mantisse dans [1, 10) · 10^k, k dans [-7, 5].
fn gen_quelconque(rng: &mut Rng) -> f64 {
    let mantisse = 1.0 + 9.0 * rng.unit();
    let k = rng.pick(13) as i32 - 7;
    let x = mantisse * 10f64.powi(k);
    if rng.coin() {
        -x
    } else {
        x
    }
}

fn gen_valeur(rng: &mut Rng) -> f64 {
    match rng.pick(5) {
        0 => 0.0,
        1 | 2 => gen_forme_close(rng),
        _ => gen_quelconque(rng),
    }
}

fn gen_options(rng: &mut Rng) -> Options {
    let precision = [1e-3, 1e-6, 1e-9][rng.pick(3) as usize];
    let mut o = Options::default().avec_precision(precision);
    o.recherche = rng.pick(4) != 0;
    o
}

/* ------------------------ Helpers ------------------------ */

/// Écart admissible entre x et la valeur exacte rendue.
fn borne(x: f64, o: &Options) -> f64 {
    o.precision * PI + 1e-12 * x.abs().max(1.0)
}

fn relit(texte: &str) -> Complex64 {
    let ev = eval_expression(texte, 30).unwrap_or_else(|e| panic!("relecture {texte:?} err={e}"));
    approx(&ev.exact).unwrap_or_else(|e| panic!("approx {texte:?} err={e}"))
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_reels_relisibles_et_proches() {
    let t0 = Instant::now();
    let max = Duration::from_secs(10);

    let mut rng = Rng::new(0xC0FFEE_u64);

    for _ in 0..300 {
        budget(t0, max);

        let x = gen_valeur(&mut rng);
        let o = gen_options(&mut rng);

        let (exact, texte) = simplifie_reel(x, &o).unwrap_or_else(|e| panic!("x={x} err={e}"));

        // valeur exacte dans la tolérance
        let v = approx(&exact).unwrap();
        assert!((v.re - x).abs() <= borne(x, &o), "x={x} texte={texte} v={v}");
        assert_eq!(v.im, 0.0);

        // le texte relu redonne la valeur exacte
        let relu = relit(&texte);
        assert!(
            (relu.re - v.re).abs() <= 1e-12 * v.re.abs().max(1.0),
            "x={x} texte={texte} relu={relu} v={v}"
        );
    }
}

#[test]
fn fuzz_safe_complexes_relisibles() {
    let t0 = Instant::now();
    let max = Duration::from_secs(10);

    let mut rng = Rng::new(0xBADC0DE_u64);

    for _ in 0..200 {
        budget(t0, max);

        let z = Complex64::new(gen_valeur(&mut rng), gen_valeur(&mut rng));
        let o = gen_options(&mut rng);

        let (exact, texte) =
            simplifie_complexe(z, &o).unwrap_or_else(|e| panic!("z={z} err={e}"));

        assert!(!texte.is_empty());
        assert!(!texte.starts_with('+'), "z={z} texte={texte}");
        if z.im == 0.0 {
            assert!(!texte.contains('I'), "z={z} texte={texte}");
        }

        let v = approx(&exact).unwrap();
        let relu = relit(&texte);
        assert!(
            (relu - v).norm() <= 1e-12 * v.norm().max(1.0),
            "z={z} texte={texte} relu={relu} v={v}"
        );
    }
}

#[test]
fn fuzz_safe_determinisme() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    // même seed => mêmes valeurs => mêmes sorties
    let mut a = Rng::new(42);
    let mut b = Rng::new(42);

    for _ in 0..150 {
        budget(t0, max);

        let (xa, xb) = (gen_valeur(&mut a), gen_valeur(&mut b));
        let (oa, ob) = (gen_options(&mut a), gen_options(&mut b));
        assert_eq!(simplifie_reel(xa, &oa), simplifie_reel(xb, &ob));
    }
}

#[test]
fn fuzz_safe_parametres() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    let mut rng = Rng::new(0x5EED_u64);
    let o = Options::default();

    for _ in 0..50 {
        budget(t0, max);

        let n = rng.pick(6) as usize;
        let params: Vec<(String, ValeurParam)> = (0..n)
            .map(|k| {
                let valeur = if rng.coin() {
                    ValeurParam::Nombre(gen_valeur(&mut rng))
                } else {
                    ValeurParam::Texte(format!("t{k}"))
                };
                (format!("p{}", rng.pick(3)), valeur)
            })
            .collect();

        let s = formate_parametres(params.clone(), &o, ";").unwrap();
        let morceaux: Vec<&str> = if s.is_empty() { Vec::new() } else { s.split(';').collect() };
        assert_eq!(morceaux.len(), n, "s={s:?}");

        for ((nom, valeur), morceau) in params.into_iter().zip(morceaux) {
            let attendu = match valeur {
                ValeurParam::Texte(t) => t,
                ValeurParam::Nombre(x) => simplifie_reel(x, &o).unwrap().1,
            };
            assert_eq!(morceau, format!("{nom}={attendu}"));
        }
    }
}

#[test]
fn fuzz_safe_entrees_hors_domaine() {
    let mut rng = Rng::new(7);
    for _ in 0..40 {
        let o = gen_options(&mut rng);
        let x = [f64::NAN, f64::INFINITY, f64::NEG_INFINITY][rng.pick(3) as usize];
        assert!(matches!(simplifie_reel(x, &o), Err(ErreurNoyau::Domaine { .. })));
        assert!(matches!(
            simplifie_complexe(Complex64::new(x, 1.0), &o),
            Err(ErreurNoyau::Domaine { .. })
        ));
    }
}
