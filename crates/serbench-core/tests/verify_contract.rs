//! Contract tests for the round-trip verifier: failure isolation, stage
//! attribution, idempotence, and ordering guarantees.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use serbench_core::{
    verify, verify_all, verify_parallel, Codec, CodecEntry, CodecFailure, Direct, RegistryBuilder,
    Stage, TransformFailure, Transformer,
};

/// Minimal record type exercised alongside the media model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
struct Record {
    id: u32,
    name: String,
    tags: Vec<String>,
}

fn sample() -> Record {
    Record {
        id: 42,
        name: "abc".to_string(),
        tags: vec!["x".to_string(), "y".to_string()],
    }
}

// ---------------------------------------------------------------------------
// Stub codecs and transformers
// ---------------------------------------------------------------------------

/// Well-behaved JSON-style codec over the record.
struct JsonCodec(&'static str);

impl Codec for JsonCodec {
    type Native = Record;

    fn name(&self) -> &str {
        self.0
    }

    fn serialize(&self, native: &Record) -> Result<Vec<u8>, CodecFailure> {
        serde_json::to_vec(native).map_err(CodecFailure::library)
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<Record, CodecFailure> {
        serde_json::from_slice(bytes).map_err(CodecFailure::library)
    }
}

/// Codec whose serialize always fails.
struct BrokenSerialize;

impl Codec for BrokenSerialize {
    type Native = Record;

    fn name(&self) -> &str {
        "broken-serialize"
    }

    fn serialize(&self, _native: &Record) -> Result<Vec<u8>, CodecFailure> {
        Err(CodecFailure::Library("writer buffer poisoned".to_string()))
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<Record, CodecFailure> {
        serde_json::from_slice(bytes).map_err(CodecFailure::library)
    }
}

/// Codec whose deserialize panics instead of returning an error.
struct PanickingDeserialize;

impl Codec for PanickingDeserialize {
    type Native = Record;

    fn name(&self) -> &str {
        "panicking-deserialize"
    }

    fn serialize(&self, native: &Record) -> Result<Vec<u8>, CodecFailure> {
        serde_json::to_vec(native).map_err(CodecFailure::library)
    }

    fn deserialize(&self, _bytes: &[u8]) -> Result<Record, CodecFailure> {
        panic!("index out of range in third-party parser")
    }
}

/// Codec that silently corrupts the record in flight.
struct NameMangler;

impl Codec for NameMangler {
    type Native = Record;

    fn name(&self) -> &str {
        "name-mangler"
    }

    fn serialize(&self, native: &Record) -> Result<Vec<u8>, CodecFailure> {
        serde_json::to_vec(native).map_err(CodecFailure::library)
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<Record, CodecFailure> {
        let mut record: Record = serde_json::from_slice(bytes).map_err(CodecFailure::library)?;
        record.name = record.name.to_uppercase();
        Ok(record)
    }
}

/// Transformer whose forward conversion rejects every value.
struct RejectingForward;

impl Transformer for RejectingForward {
    type Domain = Record;
    type Native = Record;

    fn forward(&self, _value: &Record) -> Result<Record, TransformFailure> {
        Err(TransformFailure::Unsupported("tags not representable".to_string()))
    }

    fn reverse(&self, native: Record) -> Result<Record, TransformFailure> {
        Ok(native)
    }
}

/// Transformer whose reverse conversion fails after a clean wire trip.
struct FailingReverse;

impl Transformer for FailingReverse {
    type Domain = Record;
    type Native = Record;

    fn forward(&self, value: &Record) -> Result<Record, TransformFailure> {
        Ok(value.clone())
    }

    fn reverse(&self, _native: Record) -> Result<Record, TransformFailure> {
        Err(TransformFailure::InvalidField("tags".to_string()))
    }
}

/// Transformer whose reverse drops the `tags` field.
struct TagDroppingReverse;

impl Transformer for TagDroppingReverse {
    type Domain = Record;
    type Native = Record;

    fn forward(&self, value: &Record) -> Result<Record, TransformFailure> {
        Ok(value.clone())
    }

    fn reverse(&self, mut native: Record) -> Result<Record, TransformFailure> {
        native.tags.clear();
        Ok(native)
    }
}

// ---------------------------------------------------------------------------
// Stage attribution
// ---------------------------------------------------------------------------

#[test]
fn test_correct_entry_reaches_success() {
    let entry = CodecEntry::new(JsonCodec("json"), Direct::new());
    let outcome = verify(&entry, &sample());
    assert!(outcome.passed(), "outcome: {outcome:?}");
    assert_eq!(outcome.stage, Stage::Success);
    assert!(outcome.detail.is_none());
}

#[test]
fn test_forward_failure_is_attributed_to_forward() {
    let entry = CodecEntry::named("no-forward", JsonCodec("json"), RejectingForward);
    let outcome = verify(&entry, &sample());
    assert_eq!(outcome.stage, Stage::Forward);
    assert!(outcome.failed);
    let detail = outcome.detail.expect("forward detail");
    assert!(detail.contains("tags not representable"), "detail: {detail}");
}

#[test]
fn test_serialize_failure_is_attributed_to_serialize() {
    let entry = CodecEntry::new(BrokenSerialize, Direct::new());
    let outcome = verify(&entry, &sample());
    assert_eq!(outcome.stage, Stage::Serialize);
    assert!(outcome.failed);
}

#[test]
fn test_reverse_failure_is_attributed_to_reverse() {
    // Serialize and deserialize both succeed; only the reverse transform
    // fails — attribution must not blame the codec.
    let entry = CodecEntry::named("no-reverse", JsonCodec("json"), FailingReverse);
    let outcome = verify(&entry, &sample());
    assert_eq!(outcome.stage, Stage::Reverse);
    assert!(outcome.failed);
}

#[test]
fn test_silent_corruption_is_attributed_to_compare() {
    let entry = CodecEntry::new(NameMangler, Direct::new());
    let outcome = verify(&entry, &sample());
    assert_eq!(outcome.stage, Stage::Compare);
    let detail = outcome.detail.expect("compare detail");
    assert!(detail.contains("abc"), "original value in detail: {detail}");
    assert!(detail.contains("ABC"), "round-tripped value in detail: {detail}");
}

#[test]
fn test_panic_in_codec_is_contained_at_its_stage() {
    let entry = CodecEntry::new(PanickingDeserialize, Direct::new());
    let outcome = verify(&entry, &sample());
    assert_eq!(outcome.stage, Stage::Deserialize);
    let detail = outcome.detail.expect("panic detail");
    assert!(detail.contains("panicked"), "detail: {detail}");
    assert!(detail.contains("third-party parser"), "detail: {detail}");
}

// ---------------------------------------------------------------------------
// Silent data loss in a reverse transform is caught by the compare stage
// ---------------------------------------------------------------------------

#[test]
fn test_dropped_tags_field_shows_both_values_in_detail() {
    let entry = CodecEntry::named("drops-tags", JsonCodec("json"), TagDroppingReverse);
    let outcome = verify(&entry, &sample());
    assert_eq!(outcome.stage, Stage::Compare);
    let detail = outcome.detail.expect("compare detail");
    assert!(
        detail.contains(r#"["x", "y"]"#),
        "original tags visible in detail: {detail}"
    );
    assert!(detail.contains("[]"), "empty round-tripped tags visible: {detail}");
}

// ---------------------------------------------------------------------------
// Isolation and idempotence
// ---------------------------------------------------------------------------

fn mixed_registry() -> serbench_core::Registry<Record> {
    let mut builder = RegistryBuilder::new();
    builder.register(
        "json",
        vec![
            CodecEntry::new(JsonCodec("json/a"), Direct::new()),
            CodecEntry::new(BrokenSerialize, Direct::new()),
            CodecEntry::new(JsonCodec("json/b"), Direct::new()),
            CodecEntry::new(JsonCodec("json/c"), Direct::new()),
        ],
    );
    builder.freeze()
}

#[test]
fn test_one_broken_entry_yields_exactly_one_failure() {
    let registry = mixed_registry();
    let outcomes = verify_all(&registry, &[sample()]);

    assert_eq!(outcomes.len(), 4, "one outcome per (entry, sample) pair");
    let failed: Vec<_> = outcomes.iter().filter(|o| o.failed).collect();
    assert_eq!(failed.len(), 1, "exactly one failing outcome");
    assert_eq!(failed[0].entry_name, "broken-serialize");
    assert_eq!(failed[0].stage, Stage::Serialize);
    assert_eq!(outcomes.iter().filter(|o| o.passed()).count(), 3);
}

#[test]
fn test_verification_is_idempotent_for_stateless_entries() {
    let entry = CodecEntry::new(BrokenSerialize, Direct::new());
    let first = verify(&entry, &sample());
    let second = verify(&entry, &sample());
    assert_eq!(first.failed, second.failed);
    assert_eq!(first.stage, second.stage);
}

#[test]
fn test_outcome_order_matches_registration_order() {
    let registry = mixed_registry();
    let samples = vec![sample(), Record { id: 1, name: "d".into(), tags: vec![] }];
    let outcomes = verify_all(&registry, &samples);

    let names: Vec<_> = outcomes.iter().map(|o| o.entry_name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "json/a", "json/a", "broken-serialize", "broken-serialize", "json/b", "json/b",
            "json/c", "json/c",
        ],
        "entry-major ordering, samples inner"
    );
}

// ---------------------------------------------------------------------------
// Parallel sweep equivalence
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_parallel_sweep_matches_sequential_sweep() {
    let registry = Arc::new(mixed_registry());
    let samples = Arc::new(vec![sample(), Record { id: 7, name: "z".into(), tags: vec![] }]);

    let sequential = verify_all(&registry, &samples);
    let parallel = verify_parallel(Arc::clone(&registry), Arc::clone(&samples), 3).await;

    assert_eq!(parallel, sequential, "same outcomes in the same order");
}

#[tokio::test]
async fn test_parallel_sweep_with_more_workers_than_jobs() {
    let registry = Arc::new(mixed_registry());
    let samples = Arc::new(vec![sample()]);

    let outcomes = verify_parallel(Arc::clone(&registry), samples, 64).await;
    assert_eq!(outcomes.len(), 4);
    assert_eq!(outcomes.iter().filter(|o| o.failed).count(), 1);
}
