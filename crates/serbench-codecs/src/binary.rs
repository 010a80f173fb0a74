//! Generic binary formats: bincode and postcard.
//!
//! Both are databind-style serde backends, so their native representation is
//! the domain type itself and they pair with the identity transformer.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use serbench_core::{Codec, CodecEntry, CodecFailure, Direct, MediaContent, RegistryBuilder};

/// Fixed-width little-endian binary via `bincode`.
pub struct BincodeCodec<T>(PhantomData<fn() -> T>);

impl<T> BincodeCodec<T> {
    pub fn new() -> Self {
        BincodeCodec(PhantomData)
    }
}

impl<T> Default for BincodeCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Serialize + DeserializeOwned> Codec for BincodeCodec<T> {
    type Native = T;

    fn name(&self) -> &str {
        "binary/bincode"
    }

    fn serialize(&self, native: &T) -> Result<Vec<u8>, CodecFailure> {
        bincode::serialize(native).map_err(CodecFailure::library)
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<T, CodecFailure> {
        bincode::deserialize(bytes).map_err(CodecFailure::library)
    }
}

/// Varint-packed wire-oriented binary via `postcard`.
pub struct PostcardCodec<T>(PhantomData<fn() -> T>);

impl<T> PostcardCodec<T> {
    pub fn new() -> Self {
        PostcardCodec(PhantomData)
    }
}

impl<T> Default for PostcardCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Serialize + DeserializeOwned> Codec for PostcardCodec<T> {
    type Native = T;

    fn name(&self) -> &str {
        "binary/postcard"
    }

    fn serialize(&self, native: &T) -> Result<Vec<u8>, CodecFailure> {
        postcard::to_allocvec(native).map_err(CodecFailure::library)
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<T, CodecFailure> {
        postcard::from_bytes(bytes).map_err(CodecFailure::library)
    }
}

/// Register the generic-binary family.
pub fn register(builder: &mut RegistryBuilder<MediaContent>) {
    builder.register(
        "binary",
        vec![
            CodecEntry::new(BincodeCodec::new(), Direct::new()),
            CodecEntry::new(PostcardCodec::new(), Direct::new()),
        ],
    );
}
