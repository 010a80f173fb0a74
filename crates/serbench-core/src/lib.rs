//! serbench Core Library
//!
//! Contracts and machinery for the serialization benchmark harness:
//! - [`Codec`] / [`Transformer`] capability traits that codec adapters implement
//! - [`CodecEntry`] and the grouped, init-then-freeze registration table
//! - The five-stage round-trip verifier with per-stage failure isolation
//! - The canonical [`MediaContent`] data model used as ground truth

pub mod codec;
pub mod entry;
pub mod error;
pub mod media;
pub mod metrics;
pub mod obs;
pub mod registry;
pub mod telemetry;
pub mod verify;

pub use codec::{Codec, Direct, Transformer};
pub use entry::CodecEntry;
pub use error::{CodecFailure, StageFailure, TransformFailure};
pub use media::{Image, Media, MediaContent, Player, Size};
pub use registry::{Group, Registry, RegistryBuilder};
pub use verify::{verify, verify_all, verify_parallel, Stage, VerificationOutcome};

pub use metrics::METRICS;
pub use obs::{
    emit_entry_timed, emit_entry_verified, emit_sweep_finished, emit_sweep_started, VerifySpan,
};
pub use telemetry::init_tracing;

/// serbench version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
