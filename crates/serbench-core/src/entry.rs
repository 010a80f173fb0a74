//! Named (codec, transformer) pairings and native-type erasure.
//!
//! A [`CodecEntry`] pins a [`Codec`] to the [`Transformer`] that feeds it and
//! erases their shared native type behind an object-safe surface, so entries
//! over mutually incompatible third-party libraries can live in one table.

use std::fmt;

use crate::codec::{Codec, Transformer};
use crate::error::StageFailure;
use crate::verify::VerificationOutcome;

/// Object-safe view over a typed (codec, transformer) pair.
///
/// `run_verification` drives the full staged round trip; the two `*_once`
/// hooks expose half-pipelines for the driver's sizing and timing loops.
trait EntryOps<J>: Send + Sync {
    fn run_verification(&self, sample: &J) -> VerificationOutcome;
    fn serialize_once(&self, sample: &J) -> Result<Vec<u8>, StageFailure>;
    fn deserialize_once(&self, bytes: &[u8]) -> Result<J, StageFailure>;
}

struct Typed<C, T> {
    name: String,
    codec: C,
    transformer: T,
}

impl<C, T> EntryOps<T::Domain> for Typed<C, T>
where
    C: Codec + 'static,
    T: Transformer<Native = C::Native> + 'static,
    T::Domain: PartialEq + fmt::Debug,
{
    fn run_verification(&self, sample: &T::Domain) -> VerificationOutcome {
        crate::verify::run_round_trip(&self.name, &self.transformer, &self.codec, sample)
    }

    fn serialize_once(&self, sample: &T::Domain) -> Result<Vec<u8>, StageFailure> {
        let native = self.transformer.forward(sample)?;
        Ok(self.codec.serialize(&native)?)
    }

    fn deserialize_once(&self, bytes: &[u8]) -> Result<T::Domain, StageFailure> {
        let native = self.codec.deserialize(bytes)?;
        Ok(self.transformer.reverse(native)?)
    }
}

/// A named codec/transformer pairing under test.
///
/// Identity is the name; uniqueness within a run is a caller obligation
/// (the registry builder warns on collisions but keeps both entries).
/// Created at registration time and never mutated.
pub struct CodecEntry<J> {
    name: String,
    ops: Box<dyn EntryOps<J>>,
}

impl<J> CodecEntry<J> {
    /// Pair a codec with a transformer, taking the entry name from
    /// [`Codec::name`].
    pub fn new<C, T>(codec: C, transformer: T) -> Self
    where
        C: Codec + 'static,
        T: Transformer<Domain = J, Native = C::Native> + 'static,
        J: PartialEq + fmt::Debug,
    {
        let name = codec.name().to_string();
        Self::named(name, codec, transformer)
    }

    /// Pair a codec with a transformer under an explicit display name
    /// (used when one backend is registered in several variants).
    pub fn named<C, T>(name: impl Into<String>, codec: C, transformer: T) -> Self
    where
        C: Codec + 'static,
        T: Transformer<Domain = J, Native = C::Native> + 'static,
        J: PartialEq + fmt::Debug,
    {
        let name = name.into();
        Self {
            ops: Box::new(Typed {
                name: name.clone(),
                codec,
                transformer,
            }),
            name,
        }
    }

    /// Display name used in all diagnostics and reports.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn run_verification(&self, sample: &J) -> VerificationOutcome {
        self.ops.run_verification(sample)
    }

    /// Forward-transform and serialize the sample once. Used by the driver
    /// for serialized-size measurement and serialization timing.
    pub fn serialize_once(&self, sample: &J) -> Result<Vec<u8>, StageFailure> {
        self.ops.serialize_once(sample)
    }

    /// Deserialize and reverse-transform a byte sequence once. Used by the
    /// driver for deserialization timing.
    pub fn deserialize_once(&self, bytes: &[u8]) -> Result<J, StageFailure> {
        self.ops.deserialize_once(bytes)
    }
}

impl<J> fmt::Debug for CodecEntry<J> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecEntry").field("name", &self.name).finish()
    }
}
