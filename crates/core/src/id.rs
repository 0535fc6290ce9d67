// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identifier newtypes for mailbox items and export runs

use chrono::{DateTime, Utc};

/// Returns a string slice truncated to at most `n` characters.
pub fn short(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

/// Define a string newtype ID backed by `SmolStr`.
///
/// IDs here are assigned by someone else (the remote mailbox, the wall
/// clock), so unlike generated IDs there is no `new()`; values come in
/// through `from_string()` or the `From` impls.
///
/// ```ignore
/// define_id! {
///     /// Doc comment for the ID type.
///     pub struct ItemId;
/// }
/// ```
#[macro_export]
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        pub struct $name:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub smol_str::SmolStr);

        impl $name {
            pub fn from_string(id: impl Into<smol_str::SmolStr>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::from_string(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::from_string(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            fn deref(&self) -> &str {
                &self.0
            }
        }
    };
}

crate::define_id! {
    /// Identifier of one item in the remote mailbox, as returned by the
    /// listing API.
    pub struct ItemId;
}

crate::define_id! {
    /// Identifier of one export run.
    ///
    /// A UTC timestamp (`20260116_093000`) taken when the run first starts.
    /// Every persisted item key and every batch fingerprint embeds it, so a
    /// resumed run must reuse the original value.
    pub struct RunId;
}

/// Timestamp layout used for run IDs.
pub const RUN_ID_FORMAT: &str = "%Y%m%d_%H%M%S";

impl RunId {
    /// Build a run ID from a wall-clock time in epoch milliseconds.
    pub fn from_epoch_ms(epoch_ms: u64) -> Self {
        let at = DateTime::<Utc>::from_timestamp_millis(epoch_ms as i64).unwrap_or_default();
        Self::from_string(at.format(RUN_ID_FORMAT).to_string())
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
