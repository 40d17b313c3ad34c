//! Macro for implementing Display and FromStr for label enums
//!
//! Storage scopes and token kinds show up in log fields and configuration
//! values. This macro gives them a single lowercase label used for both
//! directions, with case-insensitive parsing.
//!
//! # Example
//!
//! ```rust
//! use labgate_domain::impl_label_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Lifetime {
//!     Durable,
//!     Session,
//! }
//!
//! impl_label_conversions!(Lifetime {
//!     Durable => "durable",
//!     Session => "session",
//! });
//! ```

/// Implements Display and FromStr traits for label enums
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their lowercase label
#[macro_export]
macro_rules! impl_label_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Lifetime {
        Durable,
        Session,
    }

    impl_label_conversions!(Lifetime {
        Durable => "durable",
        Session => "session",
    });

    #[test]
    fn test_display_conversion() {
        assert_eq!(Lifetime::Durable.to_string(), "durable");
        assert_eq!(Lifetime::Session.to_string(), "session");
    }

    #[test]
    fn test_fromstr_mixed_case() {
        assert_eq!(Lifetime::from_str("DURABLE").unwrap(), Lifetime::Durable);
        assert_eq!(Lifetime::from_str("Session").unwrap(), Lifetime::Session);
    }

    #[test]
    fn test_fromstr_invalid() {
        let result = Lifetime::from_str("forever");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Invalid Lifetime: forever"));
    }
}
