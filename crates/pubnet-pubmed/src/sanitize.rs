//! Text normalization for values written to tab-separated tables

/// Literal markup escapes left in PubMed text, each replaced by a space.
const MARKUP_ESCAPES: [&str; 7] = [
    "&lt;/br&gt;&lt;/br&gt;",
    "&lt;b&gt;",
    "&lt;/b&gt;",
    "&lt;br&gt;",
    "&lt;sup&gt;",
    "&lt;/sup&gt;",
    "&quot;",
];

/// Normalize an extracted text fragment.
///
/// Removes `[` and `]`, replaces markup escapes, newlines and tabs with a
/// space, then collapses runs of spaces. The result never contains a tab,
/// newline, bracket or double space, and `sanitize(sanitize(x)) == sanitize(x)`.
/// Leading and trailing single spaces are kept.
pub fn sanitize(text: &str) -> String {
    // brackets first: dropping one must not be able to form a new escape
    let mut cleaned: String = text.chars().filter(|c| !matches!(c, '[' | ']')).collect();

    for escape in MARKUP_ESCAPES {
        if cleaned.contains(escape) {
            cleaned = cleaned.replace(escape, " ");
        }
    }

    let mut out = String::with_capacity(cleaned.len());
    let mut prev_space = false;
    for c in cleaned.chars() {
        let c = if matches!(c, '\n' | '\t' | '\r') { ' ' } else { c };
        if c == ' ' {
            if prev_space {
                continue;
            }
            prev_space = true;
        } else {
            prev_space = false;
        }
        out.push(c);
    }
    out
}
