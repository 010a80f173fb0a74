//! Binary JSON-like formats: MessagePack via `rmp-serde`.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use serbench_core::{Codec, CodecEntry, CodecFailure, Direct, MediaContent, RegistryBuilder};

/// MessagePack with map (field-name) encoding, the self-describing variant
/// comparable to the JSON entries.
pub struct MsgPackCodec<T>(PhantomData<fn() -> T>);

impl<T> MsgPackCodec<T> {
    pub fn new() -> Self {
        MsgPackCodec(PhantomData)
    }
}

impl<T> Default for MsgPackCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Serialize + DeserializeOwned> Codec for MsgPackCodec<T> {
    type Native = T;

    fn name(&self) -> &str {
        "msgpack/rmp-serde"
    }

    fn serialize(&self, native: &T) -> Result<Vec<u8>, CodecFailure> {
        rmp_serde::to_vec_named(native).map_err(CodecFailure::library)
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<T, CodecFailure> {
        rmp_serde::from_slice(bytes).map_err(CodecFailure::library)
    }
}

/// Register the binary JSON-like family.
pub fn register(builder: &mut RegistryBuilder<MediaContent>) {
    builder.register(
        "json-binary",
        vec![CodecEntry::new(MsgPackCodec::new(), Direct::new())],
    );
}
