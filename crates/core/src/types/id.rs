//! Newtype IDs for type-safe references to remote store entities.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally passing a variation ID where a product ID is expected.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `u64` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_u64()`
/// - `Display`, `From<u64>` and `Into<u64>` implementations
///
/// # Example
///
/// ```rust
/// # use pwacommerce_core::define_id;
/// define_id!(ProductId);
/// define_id!(VariationId);
///
/// let product_id = ProductId::new(12);
/// let variation_id = VariationId::new(12);
///
/// // These are different types, so this won't compile:
/// // let _: ProductId = variation_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Create a new ID from a u64 value.
            #[must_use]
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// Get the underlying u64 value.
            #[must_use]
            pub const fn as_u64(&self) -> u64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(ProductId);
define_id!(VariationId);
define_id!(CategoryId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display_is_bare_number() {
        assert_eq!(ProductId::new(42).to_string(), "42");
        assert_eq!(CategoryId::from(7).to_string(), "7");
    }

    #[test]
    fn test_id_serializes_transparently() {
        let json = serde_json::to_string(&VariationId::new(9)).ok();
        assert_eq!(json.as_deref(), Some("9"));
    }
}
