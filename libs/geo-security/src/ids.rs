//! Typed identifiers for the three geographic levels.
//!
//! The registry stores plain integer keys; wrapping them keeps a region id
//! from ever being compared against a department id by accident.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! geo_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            #[inline]
            #[must_use]
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// The raw storage key.
            #[inline]
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            #[inline]
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for i64 {
            #[inline]
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

geo_id!(
    /// Identifier of a region (top level below the nation).
    RegionId
);
geo_id!(
    /// Identifier of a department.
    DepartmentId
);
geo_id!(
    /// Identifier of an arrondissement, the attachment point of leaf resources.
    ArrondissementId
);
