// src/noyau/jetons.rs

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::One;

use super::erreur::ErreurNoyau;

/// Garde-fou : 10^k au-delà n’a rien à faire dans un affichage.
const EXPOSANT_LITTERAL_MAX: u32 = 4096;

#[derive(Clone, Debug, PartialEq)]
pub enum Tok {
    Num(BigRational),
    Pi,
    I,
    Sqrt,

    Plus,
    Minus,
    Star,
    Slash,
    Caret, // ^

    LPar,
    RPar,
}

/// Tokenize un affichage en jetons.
/// Supporte:
/// - entiers (12), décimaux (0.25), exposants (1.2345e-4, 2E+3)
/// - opérateurs + - * / ^
/// - parenthèses ( )
/// - π ou pi (insensible à la casse)
/// - I ou i (unité imaginaire)
/// - sqrt ou √
pub fn tokenize(s: &str) -> Result<Vec<Tok>, ErreurNoyau> {
    let mut out = Vec::new();
    let chars: Vec<char> = s.chars().collect();
    let mut i: usize = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let simple = match c {
            '(' => Some(Tok::LPar),
            ')' => Some(Tok::RPar),
            '+' => Some(Tok::Plus),
            '-' => Some(Tok::Minus),
            '*' => Some(Tok::Star),
            '/' => Some(Tok::Slash),
            '^' => Some(Tok::Caret),
            'π' => Some(Tok::Pi),
            '√' => Some(Tok::Sqrt),
            _ => None,
        };
        if let Some(t) = simple {
            out.push(t);
            i += 1;
            continue;
        }

        // Identifiants ASCII : [a-zA-Z_][a-zA-Z0-9_]*
        if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            i += 1;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            let t = match word.to_lowercase().as_str() {
                "pi" => Tok::Pi,
                "i" => Tok::I,
                "sqrt" => Tok::Sqrt,
                _ => return Err(ErreurNoyau::lecture(format!("identifiant inconnu: {word}"))),
            };
            out.push(t);
            continue;
        }

        // Nombre : chiffres [. chiffres] [e|E [+|-] chiffres]
        if c.is_ascii_digit() || c == '.' {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                i += 1;
            }
            // exposant seulement s’il est complet (sinon 'e' reste un identifiant)
            if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                let mut j = i + 1;
                if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                    j += 1;
                }
                if j < chars.len() && chars[j].is_ascii_digit() {
                    while j < chars.len() && chars[j].is_ascii_digit() {
                        j += 1;
                    }
                    i = j;
                }
            }
            let lit: String = chars[start..i].iter().collect();
            let r = decimal_vers_rationnel(&lit)
                .ok_or_else(|| ErreurNoyau::lecture(format!("nombre invalide: {lit}")))?;
            out.push(Tok::Num(r));
            continue;
        }

        return Err(ErreurNoyau::lecture(format!("caractère inattendu: '{c}'")));
    }

    Ok(out)
}

/// Littéral décimal -> rationnel exact.
///
/// "12" -> 12, "0.25" -> 1/4, "1.2345e-4" -> 12345/10^8, "-0.3" -> -3/10.
/// Refuse tout le reste (None).
pub fn decimal_vers_rationnel(txt: &str) -> Option<BigRational> {
    let (negatif, corps) = match txt.strip_prefix('-') {
        Some(reste) => (true, reste),
        None => (false, txt),
    };

    let (mantisse, exp) = match corps.find(['e', 'E']) {
        Some(k) => {
            let e: i32 = corps[k + 1..].parse().ok()?;
            (&corps[..k], e)
        }
        None => (corps, 0),
    };

    let (ent, frac) = match mantisse.split_once('.') {
        Some((a, b)) => (a, b),
        None => (mantisse, ""),
    };
    if ent.is_empty() && frac.is_empty() {
        return None;
    }
    if !ent.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let chiffres = format!("{ent}{frac}");
    let n = BigInt::parse_bytes(chiffres.as_bytes(), 10)?;

    // valeur = n · 10^(exp - len(frac))
    let decalage = exp.checked_sub(frac.len() as i32)?;
    if decalage.unsigned_abs() > EXPOSANT_LITTERAL_MAX {
        return None;
    }
    let puissance = BigInt::from(10).pow(decalage.unsigned_abs());
    let mut r = if decalage >= 0 {
        BigRational::from_integer(n * puissance)
    } else {
        BigRational::new(n, puissance)
    };
    if negatif {
        r = -r;
    }
    Some(r)
}

/// Format utilitaire (debug) : liste de jetons en texte.
pub fn format_tokens(tokens: &[Tok]) -> String {
    fn format_rat(r: &BigRational) -> String {
        if r.denom().is_one() {
            format!("{}", r.numer())
        } else {
            format!("{}/{}", r.numer(), r.denom())
        }
    }

    tokens
        .iter()
        .map(|t| match t {
            Tok::Num(r) => format_rat(r),
            Tok::Pi => "pi".to_string(),
            Tok::I => "I".to_string(),
            Tok::Sqrt => "sqrt".to_string(),

            Tok::Plus => "+".to_string(),
            Tok::Minus => "-".to_string(),
            Tok::Star => "*".to_string(),
            Tok::Slash => "/".to_string(),
            Tok::Caret => "^".to_string(),

            Tok::LPar => "(".to_string(),
            Tok::RPar => ")".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
