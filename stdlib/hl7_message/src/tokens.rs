//! Split-and-pad routine shared by the field and component levels.

/// Splits `data` on `separator` and drops every trailing empty token.
///
/// Text containing no separator is returned as its own single token, even
/// when it is empty. Leading and inner empty tokens are kept.
pub(crate) fn split_tokens(data: &str, separator: char) -> Vec<&str> {
    if !data.contains(separator) {
        return vec![data];
    }
    let mut tokens: Vec<&str> = data.split(separator).collect();
    while tokens.last().is_some_and(|t| t.is_empty()) {
        tokens.pop();
    }
    tokens
}

/// Token at `index`, if it exists and is non-empty.
pub(crate) fn token_at(data: &str, separator: char, index: usize) -> Option<&str> {
    split_tokens(data, separator)
        .get(index)
        .copied()
        .filter(|token| !token.is_empty())
}

/// Rebuilds `data` with the token at `index` replaced by `replacement`.
///
/// The result holds `max(token_count, index + 1)` tokens; positions that did
/// not exist before are filled with empty tokens. Returns `None` when the
/// padded text would not fit in a `String`.
pub(crate) fn splice_token(
    data: &str,
    separator: char,
    index: usize,
    replacement: &str,
) -> Option<String> {
    let tokens = split_tokens(data, separator);
    let width = tokens.len().max(index.checked_add(1)?);
    let capacity = data
        .len()
        .checked_add(replacement.len())?
        .checked_add(width)?;
    if capacity > isize::MAX as usize {
        return None;
    }
    let mut out = String::with_capacity(capacity);
    for i in 0..width {
        if i > 0 {
            out.push(separator);
        }
        if i == index {
            out.push_str(replacement);
        } else {
            out.push_str(tokens.get(i).copied().unwrap_or(""));
        }
    }
    Some(out)
}
