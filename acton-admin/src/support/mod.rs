//! String helpers shared by fields, resources, and query tags

/// URL slug of a label: transliterated lowercase ASCII words joined by `-`
///
/// ```rust
/// use acton_admin::support::slug;
///
/// assert_eq!(slug("Active Users"), "active-users");
/// assert_eq!(slug("  Paid / Unpaid  "), "paid-unpaid");
/// assert_eq!(slug("Café Owners"), "cafe-owners");
/// ```
#[must_use]
pub fn slug(text: &str) -> String {
    slug::slugify(text)
}

/// Column-style name of a label: slug words joined by `_`
///
/// ```rust
/// use acton_admin::support::snake_case;
///
/// assert_eq!(snake_case("Published At"), "published_at");
/// ```
#[must_use]
pub fn snake_case(text: &str) -> String {
    slug::slugify(text).replace('-', "_")
}
