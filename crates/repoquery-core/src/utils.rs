/// Upper-case the first character, leaving the rest untouched.
///
/// This is how an attribute is spelled inside a method name.
///
/// # Examples
/// ```
/// use repoquery_core::utils::capitalize;
/// assert_eq!(capitalize("yearHired"), "YearHired");
/// assert_eq!(capitalize("URL"), "URL");
/// ```
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}
