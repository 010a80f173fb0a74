//! Textual non-JSON formats: YAML via `serde_yaml`.
//!
//! TOML is deliberately absent: its serializer rejects bare `None` values,
//! and the canonical media model carries optional fields.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use serbench_core::{Codec, CodecEntry, CodecFailure, Direct, MediaContent, RegistryBuilder};

/// UTF-8 YAML text via serde derive.
pub struct YamlCodec<T>(PhantomData<fn() -> T>);

impl<T> YamlCodec<T> {
    pub fn new() -> Self {
        YamlCodec(PhantomData)
    }
}

impl<T> Default for YamlCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Serialize + DeserializeOwned> Codec for YamlCodec<T> {
    type Native = T;

    fn name(&self) -> &str {
        "text/yaml"
    }

    fn serialize(&self, native: &T) -> Result<Vec<u8>, CodecFailure> {
        serde_yaml::to_string(native)
            .map(String::into_bytes)
            .map_err(CodecFailure::library)
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<T, CodecFailure> {
        serde_yaml::from_slice(bytes).map_err(CodecFailure::library)
    }
}

/// Register the textual family.
pub fn register(builder: &mut RegistryBuilder<MediaContent>) {
    builder.register(
        "text",
        vec![CodecEntry::new(YamlCodec::new(), Direct::new())],
    );
}
