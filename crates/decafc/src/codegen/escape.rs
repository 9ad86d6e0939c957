//! String-literal unescaping.

/// Strip the surrounding quotes from a scanned string literal and expand its
/// escape sequences in one left-to-right pass, so each escape is expanded
/// exactly once: `\\n` becomes a backslash followed by `n`, never a newline.
/// Escapes outside the supported set are kept verbatim.
pub(crate) fn unescape(raw: &str) -> String {
    let inner = raw
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(raw);

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('v') => out.push('\x0b'),
            Some('b') => out.push('\x08'),
            Some('a') => out.push('\x07'),
            Some('f') => out.push('\x0c'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            // Trailing lone backslash; the scanner should not produce this.
            None => out.push('\\'),
        }
    }
    out
}
