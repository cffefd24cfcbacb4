//! Escaping of text for LaTeX

/// Substitutions applied to text, in priority order
///
/// Backslash comes first: the backslashes introduced by later entries are
/// output, never input, of the same pass.
const SUBSTITUTIONS: [(char, &str); 10] = [
    ('\\', "\\\\"),
    ('$', "\\$"),
    ('[', "\\["),
    (']', "\\]"),
    ('{', "\\{"),
    ('}', "\\}"),
    ('%', "\\%"),
    ('_', "\\_"),
    ('^', "\\^"),
    ('#', "\\#"),
];

/// Escape LaTeX special characters in `text`
///
/// The input is scanned once, left to right; each character is either
/// copied or replaced by its entry in the substitution table.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());

    for c in text.chars() {
        match SUBSTITUTIONS.iter().find(|(special, _)| *special == c) {
            Some((_, replacement)) => out.push_str(replacement),
            None => out.push(c),
        }
    }

    out
}
