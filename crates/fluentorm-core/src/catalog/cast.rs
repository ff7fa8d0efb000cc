//! Explicit cast declarations.

/// An explicit cast declared on a property.
///
/// Each declaration resolves to the type tag installed in the model's cast
/// configuration. Parameterized declarations join their parts with `:` and
/// leave out absent parameters, so `AsDecimal { places: Some(2) }` resolves to
/// `"decimal:2"` and `AsDate { modifier: None }` to `"datetime"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CastDecl {
    /// Cast to an arbitrary type tag.
    Cast {
        /// The type tag, used verbatim.
        type_tag: String,
    },
    /// Cast to a date-time, optionally with a format modifier.
    AsDate {
        /// Format modifier appended to the tag.
        modifier: Option<String>,
    },
    /// Cast to a decimal with a number of places.
    AsDecimal {
        /// Digits after the decimal point.
        places: Option<u32>,
    },
}

impl CastDecl {
    /// Tag name of date casts.
    pub const DATE_TYPE_NAME: &'static str = "datetime";

    /// Tag name of decimal casts.
    pub const DECIMAL_TYPE_NAME: &'static str = "decimal";

    /// Decimal places used when none are given.
    pub const DEFAULT_DECIMAL_PLACES: u32 = 2;

    /// Separator between tag parts.
    pub const SEPARATOR: &'static str = ":";

    /// Cast to an explicit type tag.
    pub fn cast(type_tag: impl Into<String>) -> Self {
        CastDecl::Cast {
            type_tag: type_tag.into(),
        }
    }

    /// Cast to a date-time without a modifier.
    pub fn as_date() -> Self {
        CastDecl::AsDate { modifier: None }
    }

    /// Cast to a date-time with a format modifier.
    pub fn as_date_with(modifier: impl Into<String>) -> Self {
        CastDecl::AsDate {
            modifier: Some(modifier.into()),
        }
    }

    /// Cast to a decimal with the default number of places.
    pub fn as_decimal() -> Self {
        CastDecl::AsDecimal {
            places: Some(Self::DEFAULT_DECIMAL_PLACES),
        }
    }

    /// Cast to a decimal with the given number of places.
    pub fn as_decimal_places(places: u32) -> Self {
        CastDecl::AsDecimal {
            places: Some(places),
        }
    }

    /// Resolve the declaration to its type tag.
    ///
    /// Returns the reason on failure.
    pub fn resolve(&self) -> Result<String, String> {
        match self {
            CastDecl::Cast { type_tag } => {
                if type_tag.trim().is_empty() {
                    return Err("cast type tag is empty".to_string());
                }
                Ok(type_tag.clone())
            }
            CastDecl::AsDate { modifier } => {
                if modifier.as_deref().is_some_and(|m| m.trim().is_empty()) {
                    return Err("date modifier is empty".to_string());
                }
                Ok(join_parts([
                    Some(Self::DATE_TYPE_NAME.to_string()),
                    modifier.clone(),
                ]))
            }
            CastDecl::AsDecimal { places } => Ok(join_parts([
                Some(Self::DECIMAL_TYPE_NAME.to_string()),
                places.map(|p| p.to_string()),
            ])),
        }
    }
}

fn join_parts<const N: usize>(parts: [Option<String>; N]) -> String {
    parts
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(CastDecl::SEPARATOR)
}
