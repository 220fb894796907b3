//! LaTeX escaping for untrusted résumé text.
//!
//! Everything that came out of an uploaded file or an LLM response goes
//! through [`escape`] exactly once, at the leaf, before it is spliced into
//! the document. The function is total: any input maps to some safe output.
//!
//! The scan is a single character-wise pass. Ordering inside the pass
//! mirrors the importance order of the substitutions — the escape character
//! itself first, then the Unicode punctuation table, then the remaining
//! reserved characters — and because each input character is consumed
//! exactly once, substitution output (which contains backslashes and braces)
//! can never be re-escaped.

/// Unicode punctuation and symbols commonly found in extracted résumé text,
/// mapped to ASCII or to brace-terminated LaTeX commands. Brace termination
/// keeps a following letter from merging into the command name.
const UNICODE_SUBSTITUTIONS: &[(char, &str)] = &[
    ('○', "\\textbullet{}"),
    ('●', "\\textbullet{}"),
    ('•', "\\textbullet{}"),
    ('◦', "\\textbullet{}"),
    ('▪', "\\textbullet{}"),
    ('▫', "\\textbullet{}"),
    ('–', "--"),
    ('—', "---"),
    ('\u{2018}', "'"),
    ('\u{2019}', "'"),
    ('\u{201C}', "\""),
    ('\u{201D}', "\""),
    ('…', "..."),
    ('°', "\\textdegree{}"),
    ('±', "\\textpm{}"),
    ('×', "\\texttimes{}"),
    ('÷', "\\textdiv{}"),
    ('€', "\\texteuro{}"),
    ('£', "\\textsterling{}"),
    ('¥', "\\textyen{}"),
    ('©', "\\textcopyright{}"),
    ('®', "\\textregistered{}"),
    ('™', "\\texttrademark{}"),
];

/// Characters with syntactic meaning to LaTeX, escaped to their safe forms.
const RESERVED: &[(char, &str)] = &[
    ('&', "\\&"),
    ('%', "\\%"),
    ('$', "\\$"),
    ('#', "\\#"),
    ('^', "\\textasciicircum{}"),
    ('_', "\\_"),
    ('{', "\\{"),
    ('}', "\\}"),
    ('~', "\\textasciitilde{}"),
];

/// Converts arbitrary text into a LaTeX-safe fragment.
///
/// Empty input yields an empty string, not the escaped form of "empty".
pub fn escape(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if c == '\\' {
            out.push_str("\\textbackslash{}");
        } else if let Some((_, sub)) = UNICODE_SUBSTITUTIONS.iter().find(|(ch, _)| *ch == c) {
            out.push_str(sub);
        } else if let Some((_, esc)) = RESERVED.iter().find(|(ch, _)| *ch == c) {
            out.push_str(esc);
        } else {
            out.push(c);
        }
    }
    out
}

/// Element-wise [`escape`] for list-shaped values, preserving order.
pub fn escape_all(items: &[String]) -> Vec<String> {
    items.iter().map(|item| escape(item)).collect()
}
