//! Payee display names derived from grantor legal names.

const SEPARATORS: [&str; 2] = [" and ", ", "];

/// Shortens a legal name to the part before the first `" and "` or `", "`
/// (case-insensitive). Names without either separator come back unchanged.
///
/// `"Acme LLC, a Delaware company"` becomes `"Acme LLC"`.
pub fn nickname_grantor(name: &str) -> String {
    // ASCII lowercasing keeps byte offsets aligned with `name`.
    let lowered = name.to_ascii_lowercase();
    let cut = SEPARATORS
        .iter()
        .filter_map(|sep| lowered.find(sep))
        .min();

    match cut {
        Some(idx) => name[..idx].to_string(),
        None => name.to_string(),
    }
}
