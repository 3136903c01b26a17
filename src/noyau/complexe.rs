// src/noyau/complexe.rs
//
// Simplification d’un complexe r + z·i
// - exposant décimal partagé quand les deux parties sont non nulles
// - partie imaginaire simplifiée avec le multiplicateur littéral I
// - une partie qui s’affiche "0" disparaît

use num_complex::Complex64;
use tracing::debug;

use super::erreur::{exige_fini, ErreurNoyau};
use super::expr::Expr;
use super::options::Options;
use super::simple::simplifie_reel_avec;

pub fn simplifie_complexe(c: Complex64, opts: &Options) -> Result<(Expr, String), ErreurNoyau> {
    opts.valide()?;
    let r = exige_fini(c.re)?;
    let z = exige_fini(c.im)?;

    let exposant = exposant_partage(r, z);
    if let Some(e) = exposant {
        debug!(r, z, exposant = e, "exposant partagé");
    }

    let (re_exact, re_txt) = simplifie_reel_avec(r, opts, &Expr::un(), exposant)?;
    let (im_exact, im_txt) = simplifie_reel_avec(z, opts, &Expr::I, exposant)?;

    if im_txt == "0" {
        return Ok((re_exact, re_txt));
    }
    if re_txt == "0" {
        return Ok((im_exact, im_txt));
    }

    let exact = re_exact.plus(im_exact).normalise();
    let texte = if im_txt.starts_with('-') {
        format!("{re_txt}{im_txt}")
    } else {
        format!("{re_txt}+{im_txt}")
    };
    Ok((exact, texte))
}

/// Nombre de ×10 tant que |r| < 1 et |z| < 1 ; None si une partie est nulle.
fn exposant_partage(r: f64, z: f64) -> Option<u32> {
    if r == 0.0 || z == 0.0 {
        return None;
    }
    let (mut r, mut z) = (r.abs(), z.abs());
    let mut e = 0u32;
    while r < 1.0 && z < 1.0 {
        r *= 10.0;
        z *= 10.0;
        e += 1;
    }
    Some(e)
}
