//! Macro for the snapshot identifier newtypes.
//!
//! Entity and period identifiers are both non-empty labels read straight from
//! CSV cells. They get identical trait surfaces so they can be used as map keys,
//! looked up by `&str`, and serialized as plain JSON strings.

/// Define a non-empty identifier newtype.
///
/// Generates the struct (`Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord,
/// Serialize`), a `Deserialize` impl that rejects empty strings, `new()`
/// (panics on empty), `try_new()`, `as_str()`, plus `Display`, `AsRef<str>`,
/// `Deref<Target = str>`, `Borrow<str>` and `PartialEq<&str>`.
macro_rules! define_identifier {
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
        #[serde(transparent)]
        $vis struct $Name(String);

        impl<'de> serde::Deserialize<'de> for $Name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                $Name::try_new(s).ok_or_else(|| {
                    serde::de::Error::custom(concat!(stringify!($Name), " must not be empty"))
                })
            }
        }

        impl $Name {
            /// Create an identifier, panicking if the label is empty.
            ///
            /// Use [`try_new`](Self::try_new) for values read from input files.
            pub fn new(label: impl Into<String>) -> Self {
                let s = label.into();
                assert!(!s.is_empty(), concat!(stringify!($Name), " must not be empty"));
                Self(s)
            }

            /// Create an identifier, returning `None` for an empty label.
            pub fn try_new(label: impl Into<String>) -> Option<Self> {
                let s = label.into();
                if s.is_empty() {
                    None
                } else {
                    Some(Self(s))
                }
            }

            /// The identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $Name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $Name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::ops::Deref for $Name {
            type Target = str;
            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl std::borrow::Borrow<str> for $Name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<&str> for $Name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

pub(crate) use define_identifier;
