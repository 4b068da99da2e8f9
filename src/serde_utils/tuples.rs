// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

/// Implement conversions for a wrapper around a signed integer type like i32 or i64.
///
/// # Example
///
/// `pub struct MyWrapper(pub i64);`
/// `impl_wrapper_int!(MyWrapper, i64);
#[macro_export]
macro_rules! impl_wrapper_int {
    ($typ:ty, $si:ty) => {
        impl From<$si> for $typ {
            fn from(n: $si) -> Self {
                Self(n)
            }
        }

        impl From<$typ> for $si {
            fn from(wrapper: $typ) -> Self {
                wrapper.0
            }
        }
    };
}

/// Implement various string methods like `as_str()`, `len()` etc.
/// for string wrapper tuples.
///
/// # Example
///
/// `pub struct MyWrapper(pub String);`
/// `impl_wrapper_str!(MyWrapper);
#[macro_export]
macro_rules! impl_wrapper_str {
    ($typ:ty) => {
        impl $typ {
            /// Returns `as_str()` of the inner string.
            #[allow(unused)]
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }

            /// Returns `is_empty()` of the inner string.
            #[allow(unused)]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            /// Returns `len()` of the inner string.
            #[allow(unused)]
            pub fn len(&self) -> usize {
                self.0.len()
            }
        }

        impl AsRef<str> for $typ {
            fn as_ref(&self) -> &str {
                self.0.as_ref()
            }
        }

        impl std::ops::Deref for $typ {
            type Target = str;
            fn deref(&self) -> &Self::Target {
                &*self.0
            }
        }

        impl std::fmt::Display for $typ {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }

        impl PartialEq<str> for $typ {
            fn eq(&self, other: &str) -> bool {
                self.0.as_str() == other
            }
        }

        impl PartialEq<&str> for $typ {
            fn eq(&self, other: &&str) -> bool {
                self.0.as_str() == *other
            }
        }
    };
}
