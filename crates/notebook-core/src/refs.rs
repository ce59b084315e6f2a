//! Opaque reference identifiers for store entities.
//!
//! Every addressable entity (a content document, a kernel, a host, a
//! kernelspec catalog) is identified by a generated token, never by a
//! natural key like a filepath. The indirection lets a document be renamed
//! or reloaded without invalidating references held by in-flight actions.
//!
//! The only property these tokens guarantee is uniqueness within a process
//! lifetime; they are UUID v4 values behind newtype constructors.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! define_ref {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a fresh, process-unique reference.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

define_ref!(
    /// Identifies one content document (notebook, file, or directory).
    ContentRef
);
define_ref!(
    /// Identifies one live or launching kernel.
    KernelRef
);
define_ref!(
    /// Identifies one connection target (a Jupyter server or the local host).
    HostRef
);
define_ref!(
    /// Identifies one fetched kernelspec catalog.
    KernelspecsRef
);
define_ref!(
    /// Identifies one cell within a notebook document.
    CellId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refs_are_unique() {
        let a = ContentRef::new();
        let b = ContentRef::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_refs_are_copyable_map_keys() {
        let mut map = std::collections::HashMap::new();
        let r = KernelRef::new();
        map.insert(r, "kernel");
        assert_eq!(map.get(&r), Some(&"kernel"));
    }

    #[test]
    fn test_refs_serialize_as_uuid_strings() {
        let r = CellId::new();
        let json = serde_json::to_value(r).unwrap();
        assert_eq!(json.as_str().unwrap(), r.to_string());
    }

    #[test]
    fn test_refs_roundtrip_through_serde() {
        let r = KernelspecsRef::new();
        let json = serde_json::to_string(&r).unwrap();
        let back: KernelspecsRef = serde_json::from_str(&json).unwrap();
        assert_eq!(r, back);
    }
}
