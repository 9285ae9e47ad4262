// src/core/escaper.rs

/// Inserts `escape_char` in front of every occurrence of `delimiter` that is
/// not already escaped, in a single left-to-right pass.
///
/// "Already escaped" means the character immediately before the delimiter
/// *in the input* is `escape_char`. The pass does not chase escape chains:
/// a delimiter preceded by one escape character is left untouched even when
/// that escape character is itself escaped, and double escaping from earlier
/// runs is never normalized away.
///
/// Returns the escaped content together with the number of escape characters
/// inserted.
pub fn escape_unescaped(content: &str, delimiter: char, escape_char: char) -> (String, usize) {
    let mut escaped = String::with_capacity(content.len() + 16);
    let mut inserted = 0usize;
    let mut previous: Option<char> = None;

    for ch in content.chars() {
        if ch == delimiter && previous != Some(escape_char) {
            escaped.push(escape_char);
            inserted += 1;
        }
        escaped.push(ch);
        previous = Some(ch);
    }

    log::debug!(
        "Escape pass inserted {} escape char(s) over {} bytes of content.",
        inserted,
        content.len()
    );
    (escaped, inserted)
}

/// Counts the delimiters in `content` whose immediately preceding character
/// is not `escape_char`. This is exactly the number of insertions
/// [`escape_unescaped`] would perform on the same input.
pub fn count_unescaped(content: &str, delimiter: char, escape_char: char) -> usize {
    let mut count = 0usize;
    let mut previous: Option<char> = None;

    for ch in content.chars() {
        if ch == delimiter && previous != Some(escape_char) {
            count += 1;
        }
        previous = Some(ch);
    }
    count
}

// MARK: --- UNIT TESTS ---
