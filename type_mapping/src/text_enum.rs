//! TEXT-backed enums
//!
//! `text_enum!` declares a fieldless enum whose variants each carry a display string. The
//! string is the wire form in JSON and the stored value in a PostgreSQL TEXT column.

use thiserror::Error;

/// A string that names none of an enum's variants
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {type_name} \"{value}\", expected one of: {}", .expected.join(", "))]
pub struct UnknownVariant {
    pub type_name: &'static str,
    pub value: String,
    pub expected: &'static [&'static str],
}

impl UnknownVariant {
    pub fn new(type_name: &'static str, value: &str, expected: &'static [&'static str]) -> Self {
        Self {
            type_name,
            value: value.to_string(),
            expected,
        }
    }
}

/// Declare an enum stored as TEXT and serialized as its display string
///
/// ```rust
/// type_mapping::text_enum! {
///     /// Listing state of a property
///     pub enum ListingStatus {
///         ForSale => "For Sale",
///         Sold => "Sold",
///     }
/// }
///
/// assert_eq!(ListingStatus::ForSale.as_str(), "For Sale");
/// assert_eq!("Sold".parse::<ListingStatus>().unwrap(), ListingStatus::Sold);
/// ```
#[macro_export]
macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every variant in declaration order
            pub const ALL: &'static [$name] = &[ $( $name::$variant ),+ ];

            const TEXTS: &'static [&'static str] = &[ $( $text ),+ ];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $text ),+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::UnknownVariant;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s {
                    $( $text => Ok($name::$variant), )+
                    other => Err($crate::UnknownVariant::new(stringify!($name), other, $name::TEXTS)),
                }
            }
        }

        impl $crate::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: $crate::serde::Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> $crate::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: $crate::serde::Deserializer<'de>,
            {
                let text = <::std::string::String as $crate::serde::Deserialize>::deserialize(deserializer)?;
                text.parse().map_err(<D::Error as $crate::serde::de::Error>::custom)
            }
        }

        impl $crate::sqlx::Type<$crate::sqlx::Postgres> for $name {
            fn type_info() -> $crate::sqlx::postgres::PgTypeInfo {
                <&str as $crate::sqlx::Type<$crate::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &$crate::sqlx::postgres::PgTypeInfo) -> bool {
                <&str as $crate::sqlx::Type<$crate::sqlx::Postgres>>::compatible(ty)
            }
        }

        impl<'q> $crate::sqlx::Encode<'q, $crate::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut $crate::sqlx::postgres::PgArgumentBuffer,
            ) -> ::std::result::Result<$crate::sqlx::encode::IsNull, $crate::sqlx::error::BoxDynError> {
                <&str as $crate::sqlx::Encode<'q, $crate::sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
            }
        }

        impl<'r> $crate::sqlx::Decode<'r, $crate::sqlx::Postgres> for $name {
            fn decode(
                value: $crate::sqlx::postgres::PgValueRef<'r>,
            ) -> ::std::result::Result<Self, $crate::sqlx::error::BoxDynError> {
                let text = <&str as $crate::sqlx::Decode<'r, $crate::sqlx::Postgres>>::decode(value)?;
                Ok(text.parse::<$name>()?)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    crate::text_enum! {
        enum Stage {
            Draft => "Draft",
            ForSale => "For Sale",
        }
    }

    #[test]
    fn test_round_trip_through_text() {
        assert_eq!(Stage::ForSale.to_string(), "For Sale");
        assert_eq!("Draft".parse::<Stage>().unwrap(), Stage::Draft);
        assert_eq!(Stage::ALL, &[Stage::Draft, Stage::ForSale]);
    }

    #[test]
    fn test_unknown_value_lists_expected() {
        let err = "Archived".parse::<Stage>().unwrap_err();
        assert_eq!(err.value, "Archived");
        assert_eq!(
            err.to_string(),
            "invalid Stage \"Archived\", expected one of: Draft, For Sale"
        );
    }

    #[test]
    fn test_serde_uses_display_string() {
        let json = serde_json::to_string(&Stage::ForSale).unwrap();
        assert_eq!(json, "\"For Sale\"");

        let parsed: Stage = serde_json::from_str("\"Draft\"").unwrap();
        assert_eq!(parsed, Stage::Draft);

        let err = serde_json::from_str::<Stage>("\"draft\"").unwrap_err();
        assert!(err.to_string().contains("expected one of"));
    }
}
