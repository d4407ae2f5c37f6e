//! Opaque credentials.

use serde::{Serialize, Serializer};
use std::fmt;

const MASK: &str = "**********";

/// A credential or credential-bearing endpoint.
///
/// `Debug`, `Display` and `Serialize` all render a fixed mask, so a secret
/// can sit inside any config that gets logged or reported. The raw value is
/// only reachable through [`Secret::expose`], which adapters call at the
/// point of use.
///
/// Not `PartialEq`: nothing branches on a secret's value.
#[derive(Clone)]
pub struct Secret(String);

impl Secret {
    /// Wrap a raw value.
    pub fn new(value: impl Into<String>) -> Self {
        Secret(value.into())
    }

    /// The raw value, for handing to a transport.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret({})", MASK)
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(MASK)
    }
}

impl Serialize for Secret {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(MASK)
    }
}
