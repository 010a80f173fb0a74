//! Codec and transformer capability traits.
//!
//! These two traits are the only surface a codec adapter implements:
//! - [`Codec`] — bytes to/from a codec-native representation
//! - [`Transformer`] — canonical domain object to/from that representation
//!
//! Both are required to be safe for concurrent *independent* invocation
//! (`Send + Sync`, no mutable state); nothing in the harness shares a
//! mid-pipeline value between workers.

use crate::error::{CodecFailure, TransformFailure};

/// A serialization codec: encodes its native representation to bytes and
/// decodes bytes back.
///
/// No codec is required to validate its input beyond what the underlying
/// format naturally enforces; the verifier assumes nothing about cross-codec
/// validation.
pub trait Codec: Send + Sync {
    /// The representation this codec consumes and produces. For
    /// databind-style codecs this is the domain type itself; manual-tree
    /// codecs use a dedicated tree/builder type.
    type Native;

    /// Stable, human-readable identifier used in all diagnostics.
    /// Must not change across calls.
    fn name(&self) -> &str;

    /// Encode the native representation to a byte sequence.
    fn serialize(&self, native: &Self::Native) -> Result<Vec<u8>, CodecFailure>;

    /// Decode a byte sequence back into the native representation.
    fn deserialize(&self, bytes: &[u8]) -> Result<Self::Native, CodecFailure>;
}

/// Converts between the canonical domain object and a codec's native
/// representation.
///
/// Implementations must be stateless and reentrant, and must satisfy the
/// round-trip law `reverse(forward(v)) == v` for every value in the
/// supported domain subset — the verifier checks this law transitively
/// through serialize/deserialize.
pub trait Transformer: Send + Sync {
    /// The canonical domain type.
    type Domain;

    /// The codec-native representation.
    type Native;

    /// Produce the codec-native representation of a domain value.
    fn forward(&self, value: &Self::Domain) -> Result<Self::Native, TransformFailure>;

    /// Recover the domain value from a codec-native representation.
    fn reverse(&self, native: Self::Native) -> Result<Self::Domain, TransformFailure>;
}

/// Identity transformer for codecs that consume the domain object directly.
///
/// Databind-style codecs (serde derive) have `Native == Domain`; their
/// forward/reverse transforms are a clone and a move.
pub struct Direct<J>(std::marker::PhantomData<fn() -> J>);

impl<J> Direct<J> {
    pub fn new() -> Self {
        Direct(std::marker::PhantomData)
    }
}

impl<J> Default for Direct<J> {
    fn default() -> Self {
        Self::new()
    }
}

impl<J: Clone + Send + Sync> Transformer for Direct<J> {
    type Domain = J;
    type Native = J;

    fn forward(&self, value: &J) -> Result<J, TransformFailure> {
        Ok(value.clone())
    }

    fn reverse(&self, native: J) -> Result<J, TransformFailure> {
        Ok(native)
    }
}
