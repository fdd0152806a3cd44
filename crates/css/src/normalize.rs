use memchr::{memchr, memchr_iter};

/// Compacts generated CSS text.
///
/// input:  "\n  color: red;\n  background:  blue\n"
/// output: "color:red;background:blue"
///
/// A whitespace run becomes `\n` when it contains a newline and a single
/// space otherwise; whitespace following `:`, `{` or `;` is dropped.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run: Option<bool> = None; // Some(saw_newline) while inside a whitespace run
    for ch in text.trim().chars() {
        if ch.is_whitespace() {
            let newline = ch == '\n';
            run = Some(run.unwrap_or(false) || newline);
            continue;
        }
        if let Some(newline) = run.take() {
            let after_delimiter = matches!(out.chars().last(), Some(':' | '{' | ';'));
            if !after_delimiter {
                out.push(if newline { '\n' } else { ' ' });
            }
        }
        out.push(ch);
    }
    out
}

/// Whether the text already spells out one or more full rules.
pub fn is_nested(text: &str) -> bool {
    memchr(b'{', text.as_bytes()).is_some()
}

/// Replaces every `&` placeholder with `.name`.
pub fn scope(text: &str, name: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len() + name.len() * 2);
    let mut last = 0;
    for pos in memchr_iter(b'&', bytes) {
        out.push_str(&text[last..pos]);
        out.push('.');
        out.push_str(name);
        last = pos + 1;
    }
    out.push_str(&text[last..]);
    out
}
