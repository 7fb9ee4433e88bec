use crate::utils::capitalize;

#[test]
fn capitalize_first_letter_only() {
    assert_eq!(capitalize("yearHired"), "YearHired");
    assert_eq!(capitalize("a"), "A");
    assert_eq!(capitalize(""), "");
}

#[test]
fn capitalize_idempotent() {
    assert_eq!(capitalize("Name"), "Name");
    assert_eq!(capitalize("URL"), "URL");
}
