//! serbench codec adapters.
//!
//! One module per format family, each exposing a `register` function that
//! appends its entries to the table. [`register_all`] applies every family
//! in a fixed order; that order (and nothing else) determines report layout.
//!
//! Adding a codec means implementing the two core traits and appending one
//! entry in the right family module — the verifier and driver never change.

pub mod binary;
pub mod json;
pub mod msgpack;
pub mod text;

pub use binary::{BincodeCodec, PostcardCodec};
pub use json::{JsonCodec, JsonTreeCodec, MediaTreeTransformer};
pub use msgpack::MsgPackCodec;
pub use text::YamlCodec;

use serbench_core::{MediaContent, Registry, RegistryBuilder};

/// Register every shipped codec family, in report order.
pub fn register_all(builder: &mut RegistryBuilder<MediaContent>) {
    // Binary formats, generic
    binary::register(builder);

    // JSON
    json::register(builder);

    // Binary JSON-like
    msgpack::register(builder);

    // Textual non-JSON
    text::register(builder);
}

/// Build and freeze the full default table.
pub fn default_registry() -> Registry<MediaContent> {
    let mut builder = RegistryBuilder::new();
    register_all(&mut builder);
    builder.freeze()
}
