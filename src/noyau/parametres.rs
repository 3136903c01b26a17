// src/noyau/parametres.rs
//
// Rendu "nom=valeur" d’une liste ordonnée de paramètres.
// Une valeur texte est reprise telle quelle ; une valeur numérique passe par simplifie_reel.

use super::erreur::ErreurNoyau;
use super::options::Options;
use super::simple::simplifie_reel;

/// Séparateur par défaut entre deux entrées.
pub const SEPARATEUR_DEFAUT: &str = "\n";

#[derive(Clone, Debug, PartialEq)]
pub enum ValeurParam {
    Nombre(f64),
    Texte(String),
}

impl From<f64> for ValeurParam {
    fn from(v: f64) -> Self {
        ValeurParam::Nombre(v)
    }
}

impl From<&str> for ValeurParam {
    fn from(s: &str) -> Self {
        ValeurParam::Texte(s.to_string())
    }
}

impl From<String> for ValeurParam {
    fn from(s: String) -> Self {
        ValeurParam::Texte(s)
    }
}

impl ValeurParam {
    fn rendu(self, opts: &Options) -> Result<String, ErreurNoyau> {
        match self {
            ValeurParam::Texte(s) => Ok(s),
            ValeurParam::Nombre(v) => simplifie_reel(v, opts).map(|(_, texte)| texte),
        }
    }
}

/// Rend chaque paramètre en "nom=valeur", dans l’ordre reçu, joints par `separateur`.
/// Les noms ne sont pas vérifiés ; un nom répété apparaît deux fois.
pub fn formate_parametres<I, K, V>(
    params: I,
    opts: &Options,
    separateur: &str,
) -> Result<String, ErreurNoyau>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<ValeurParam>,
{
    let entrees = params
        .into_iter()
        .map(|(nom, valeur)| {
            let valeur: ValeurParam = valeur.into();
            let texte = valeur.rendu(opts)?;
            Ok(format!("{}={texte}", nom.as_ref()))
        })
        .collect::<Result<Vec<String>, ErreurNoyau>>()?;

    Ok(entrees.join(separateur))
}
