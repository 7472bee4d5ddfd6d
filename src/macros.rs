//! Macros to reduce boilerplate in the codebase

/// Macro to generate Display and FromStr implementations for string-backed enums.
///
/// Parsing is case-insensitive and ignores surrounding whitespace.
///
/// # Usage
///
/// ```rust,ignore
/// enum_display_fromstr!(
///     SortOrder,
///     CatalogueError::invalid_sort_order,
///     {
///         Asc => "asc",
///         Desc => "desc",
///     }
/// );
/// ```
#[macro_export]
macro_rules! enum_display_fromstr {
    (
        $enum_name:ident,
        $error_ctor:path,
        { $($variant:ident => $str:expr),+ $(,)? }
    ) => {
        impl $enum_name {
            /// All valid string representations of this enum.
            pub const ALL_STRINGS: &[&str] = &[$($str),+];

            /// The wire/CLI string for this value.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($enum_name::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = $crate::error::CatalogueError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok($enum_name::$variant),)+
                    _ => Err($error_ctor(s.to_string())),
                }
            }
        }
    };
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use crate::error::CatalogueError;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum TestEnum {
        A,
        B,
    }

    enum_display_fromstr!(TestEnum, CatalogueError::Other, { A => "a", B => "b" });

    #[test]
    fn test_display() {
        assert_eq!(TestEnum::A.to_string(), "a");
        assert_eq!(TestEnum::B.to_string(), "b");
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!(TestEnum::from_str("A").unwrap(), TestEnum::A);
        assert_eq!(TestEnum::from_str(" b ").unwrap(), TestEnum::B);
        assert!(TestEnum::from_str("c").is_err());
    }

    #[test]
    fn test_all_strings() {
        assert_eq!(TestEnum::ALL_STRINGS, &["a", "b"]);
    }
}
