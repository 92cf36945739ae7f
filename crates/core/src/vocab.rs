//! String-backed enum vocabularies.
//!
//! Every enum column in the schema is stored as `TEXT` holding the
//! SCREAMING_SNAKE_CASE value. [`define_str_enum!`] generates the Rust side:
//! the enum itself, `as_str` / `from_str_value` conversions, the list of
//! accepted values and serde support using the same strings.

/// Define a string-backed enum.
///
/// ```ignore
/// define_str_enum! {
///     /// Client lifecycle status.
///     ClientStatus("client status") {
///         Active = "ACTIVE",
///         Archived = "ARCHIVED",
///     }
/// }
/// ```
#[macro_export]
macro_rules! define_str_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($label:literal) {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $val)] $variant ),+
        }

        impl $name {
            /// Every accepted database value, in declaration order.
            pub const VALUES: &'static [&'static str] = &[$($val),+];

            /// Convert to the database string value.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $val ),+
                }
            }

            /// Convert from a database string value.
            pub fn from_str_value(s: &str) -> Result<Self, $crate::error::CoreError> {
                match s {
                    $( $val => Ok($name::$variant), )+
                    _ => Err($crate::error::CoreError::Validation(format!(
                        "Invalid {} '{}'. Must be one of: {}",
                        $label,
                        s,
                        Self::VALUES.join(", ")
                    ))),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// Validate an optional vocabulary value, returning the canonical string.
///
/// `None` resolves to `default`. Used by handlers so that create DTOs can
/// omit enum fields.
pub fn resolve_or_default<T: Copy>(
    value: Option<&str>,
    default: T,
    parse: fn(&str) -> Result<T, crate::error::CoreError>,
) -> Result<T, crate::error::CoreError> {
    match value {
        Some(v) => parse(v),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use crate::error::CoreError;

    define_str_enum! {
        /// Test vocabulary.
        Shade("shade") {
            Light = "LIGHT",
            DarkGrey = "DARK_GREY",
        }
    }

    #[test]
    fn round_trips_through_strings() {
        assert_eq!(Shade::DarkGrey.as_str(), "DARK_GREY");
        assert_eq!(Shade::from_str_value("LIGHT").unwrap(), Shade::Light);
        assert_eq!(Shade::DarkGrey.to_string(), "DARK_GREY");
    }

    #[test]
    fn rejects_unknown_value_and_lists_accepted_ones() {
        let err = Shade::from_str_value("light").unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("LIGHT, DARK_GREY"));
    }

    #[test]
    fn serde_uses_database_strings() {
        let json = serde_json::to_string(&Shade::DarkGrey).unwrap();
        assert_eq!(json, "\"DARK_GREY\"");
        let back: Shade = serde_json::from_str("\"LIGHT\"").unwrap();
        assert_eq!(back, Shade::Light);
    }

    #[test]
    fn resolve_or_default_falls_back() {
        let shade = super::resolve_or_default(None, Shade::Light, Shade::from_str_value).unwrap();
        assert_eq!(shade, Shade::Light);
        assert!(super::resolve_or_default(Some("NOPE"), Shade::Light, Shade::from_str_value).is_err());
    }
}
