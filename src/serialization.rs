//! Binary encoding of fitted parameters.
//!
//! Every persisted parameter type goes through the same bincode configuration:
//! fixed-width integers, a hard size limit so a corrupt length prefix cannot
//! trigger a huge allocation, and rejection of trailing bytes so a file with
//! garbage appended is not mistaken for a valid one.

use bincode::Options;
use serde::{de::DeserializeOwned, Serialize};

/// Upper bound on any encoded parameter blob.
pub const MAX_ENCODED_BYTES: u64 = 16 * 1024 * 1024;

fn codec() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_limit(MAX_ENCODED_BYTES)
        .reject_trailing_bytes()
}

/// A parameter representation that can be turned into bytes and back.
///
/// Implementors should contain only plain numerical data and names
/// (`Vec<f64>`, `String`, scalars), never live numeric containers.
pub trait SerializableParams: Sized {
    /// Serialize the parameters into a byte buffer.
    fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error>;

    /// Deserialize the parameters from a byte buffer.
    fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::Error>;
}

impl<T> SerializableParams for T
where
    T: Serialize + DeserializeOwned,
{
    fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        codec().serialize(self)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::Error> {
        codec().deserialize(bytes)
    }
}
