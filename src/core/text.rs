/// Split free text into comparison tokens
///
/// Lowercases, splits on every run of characters outside `[A-Za-z0-9_]` and
/// keeps tokens longer than three characters. Order and repeats are kept.
pub fn tokenize_thoughts(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|token| token.len() > 3)
        .map(str::to_string)
        .collect()
}
