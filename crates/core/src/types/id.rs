//! Record IDs assigned by the store.
//!
//! Products and carts are keyed by `SERIAL` columns, so IDs are positive
//! `i32`s. Each record kind gets its own newtype so a cart ID cannot be
//! passed where a product ID is expected.

use thiserror::Error;

/// Error parsing a record ID from text (CLI arguments, shop commands).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("IDs start at 1, got {0}")]
    NotPositive(i32),
}

fn parse_positive(s: &str) -> Result<i32, IdError> {
    let s = s.trim();
    let id = s
        .parse::<i32>()
        .map_err(|_| IdError::NotANumber(s.to_owned()))?;
    if id < 1 {
        return Err(IdError::NotPositive(id));
    }
    Ok(id)
}

/// Declares an `i32` record ID newtype.
///
/// Serializes as a bare number. With the `postgres` feature it maps to
/// `INTEGER` through `sqlx(transparent)`.
macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        #[cfg_attr(feature = "postgres", derive(::sqlx::Type), sqlx(transparent))]
        pub struct $name(i32);

        impl $name {
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            #[must_use]
            pub const fn as_i32(self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_positive(s).map(Self)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

record_id!(
    /// A catalog product.
    ProductId
);
record_id!(
    /// A user's cart record.
    CartId
);
