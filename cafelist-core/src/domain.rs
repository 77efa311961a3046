//! Validated domain newtypes
//!
//! Length limits mirror the database column widths so a value that
//! constructs here will also insert cleanly.

use crate::validation::ValidationError;

/// Maximum length for café titles
const MAX_TITLE_LEN: usize = 255;

/// Maximum length for city names
const MAX_CITY_LEN: usize = 100;

/// Maximum length for category names
const MAX_CATEGORY_LEN: usize = 50;

/// Maximum length for image URLs
const MAX_IMAGE_URL_LEN: usize = 500;

fn validate(s: &str, field: &'static str, max: usize) -> Result<(), ValidationError> {
    if s.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if s.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

macro_rules! string_newtype {
    ($(#[$doc:meta])* $name:ident, $field:literal, $max:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl $name {
            pub fn new(s: &str) -> Result<Self, ValidationError> {
                validate(s, $field, $max)?;
                Ok(Self(s.to_owned()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_newtype!(
    /// Café title (non-empty, max 255 chars)
    CafeTitle,
    "title",
    MAX_TITLE_LEN
);

string_newtype!(
    /// City name (non-empty, max 100 chars)
    CityName,
    "city",
    MAX_CITY_LEN
);

string_newtype!(
    /// Category name (non-empty, max 50 chars)
    CategoryName,
    "category name",
    MAX_CATEGORY_LEN
);

string_newtype!(
    /// Image URL (non-empty, max 500 chars; cafés store it as optional)
    ImageUrl,
    "image_url",
    MAX_IMAGE_URL_LEN
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_normal_values() {
        assert!(CafeTitle::new("Cozy Corner").is_ok());
        assert!(CityName::new("Paris").is_ok());
        assert!(CategoryName::new("wifi").is_ok());
        assert!(ImageUrl::new("https://example.com/a.jpg").is_ok());
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(
            CafeTitle::new("").unwrap_err(),
            ValidationError::Empty { field: "title" }
        );
        assert_eq!(
            CityName::new("   ").unwrap_err(),
            ValidationError::Empty { field: "city" }
        );
    }

    #[test]
    fn rejects_over_length() {
        let long = "x".repeat(256);
        assert_eq!(
            CafeTitle::new(&long).unwrap_err(),
            ValidationError::TooLong {
                field: "title",
                max: 255
            }
        );

        let long = "x".repeat(51);
        assert!(matches!(
            CategoryName::new(&long).unwrap_err(),
            ValidationError::TooLong { max: 50, .. }
        ));
    }

    #[test]
    fn boundary_length_ok() {
        let exactly = "x".repeat(255);
        assert!(CafeTitle::new(&exactly).is_ok());
        let exactly = "x".repeat(100);
        assert!(CityName::new(&exactly).is_ok());
    }

    #[test]
    fn image_url_validates_like_other_newtypes() {
        let long = "x".repeat(501);
        assert_eq!(
            ImageUrl::new(&long).unwrap_err(),
            ValidationError::TooLong {
                field: "image_url",
                max: 500
            }
        );
        assert_eq!(
            ImageUrl::new("  ").unwrap_err(),
            ValidationError::Empty { field: "image_url" }
        );

        let url = ImageUrl::new("https://example.com/a.jpg").unwrap();
        assert_eq!(url.as_str(), "https://example.com/a.jpg");
        assert_eq!(url.to_string(), "https://example.com/a.jpg");
    }

    #[test]
    fn counts_chars_not_bytes() {
        // 100 multibyte chars is within the city limit even at 200 bytes
        let city = "é".repeat(100);
        assert!(CityName::new(&city).is_ok());
    }
}
