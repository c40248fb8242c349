//! String transformation utilities for document generation

/// Upper-cases the first character and leaves the rest untouched.
///
/// # Examples
/// ```
/// use curl2openapi::generation::utils::capitalize;
///
/// assert_eq!(capitalize("post_users"), "Post_users");
/// assert_eq!(capitalize("userId"), "UserId");
/// assert_eq!(capitalize(""), "");
/// ```
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

/// Converts a property key into a segment usable inside a component name.
///
/// Component names may only contain `A-Z a-z 0-9 . - _`; anything else is
/// dropped and the result is capitalized. Keys with nothing usable left become
/// `Property`.
///
/// # Examples
/// ```
/// use curl2openapi::generation::utils::schema_name_segment;
///
/// assert_eq!(schema_name_segment("address"), "Address");
/// assert_eq!(schema_name_segment("billing address"), "Billingaddress");
/// assert_eq!(schema_name_segment("@@"), "Property");
/// ```
pub fn schema_name_segment(key: &str) -> String {
    let cleaned: String = key
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();
    if cleaned.is_empty() {
        "Property".to_string()
    } else {
        capitalize(&cleaned)
    }
}
