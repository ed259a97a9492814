//! Name generation utilities

use rand::Rng;

/// Generate a random colonist name. Repeats are possible.
pub fn generate_name(rng: &mut impl Rng) -> &'static str {
    COLONIST_NAMES[rng.gen_range(0..COLONIST_NAMES.len())]
}

/// Generate a name nobody in `taken` already has, falling back to a
/// repeat once the pool is used up.
pub fn generate_unique_name<S: AsRef<str>>(rng: &mut impl Rng, taken: &[S]) -> &'static str {
    let free: Vec<&'static str> = COLONIST_NAMES
        .iter()
        .copied()
        .filter(|name| !taken.iter().any(|t| t.as_ref() == *name))
        .collect();
    if free.is_empty() {
        generate_name(rng)
    } else {
        free[rng.gen_range(0..free.len())]
    }
}

pub static COLONIST_NAMES: &[&str] = &[
    "Nira", "Josk", "Val", "Bram", "Petra", "Kira", "Thom", "Alia", "Dex", "Yara", "Finn", "Mira",
    "Ryn", "Cade", "Lira",
];
