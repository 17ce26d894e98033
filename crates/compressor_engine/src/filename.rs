const FALLBACK_NAME: &str = "compressed.pdf";
const MAX_STEM_LEN: usize = 120;

/// Turn a server-supplied filename into a safe local one.
///
/// Path components are dropped, forbidden characters become `_`, runs of `_`
/// collapse, and the result always ends in `.pdf`.
pub fn sanitize_filename(name: &str) -> String {
    let base = name
        .rsplit(&['/', '\\'][..])
        .next()
        .unwrap_or_default()
        .trim();
    let stem = match base.len().checked_sub(4) {
        Some(split) if base.is_char_boundary(split) && base[split..].eq_ignore_ascii_case(".pdf") => {
            &base[..split]
        }
        _ => base,
    };

    let mut cleaned = String::with_capacity(stem.len());
    let mut prev_underscore = false;
    for c in stem.chars() {
        let c = if is_forbidden(c) { '_' } else { c };
        if c == '_' && prev_underscore {
            continue;
        }
        prev_underscore = c == '_';
        cleaned.push(c);
    }
    let mut cleaned = cleaned.trim_matches(&['_', ' ', '.'][..]).to_string();
    if cleaned.is_empty() {
        return FALLBACK_NAME.to_string();
    }
    if cleaned.len() > MAX_STEM_LEN {
        let mut cut = MAX_STEM_LEN;
        while !cleaned.is_char_boundary(cut) {
            cut -= 1;
        }
        cleaned.truncate(cut);
    }
    if is_reserved_windows_name(&cleaned) {
        cleaned.push('_');
    }
    format!("{cleaned}.pdf")
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}
