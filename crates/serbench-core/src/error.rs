//! Error taxonomy for the verification pipeline.
//!
//! All three failure kinds are terminal-but-local: they end evaluation of one
//! (entry, sample) pair and are captured into a
//! [`VerificationOutcome`](crate::verify::VerificationOutcome). None of them
//! propagate past the verifier boundary — a round-trip mismatch is reported
//! as a `Compare`-stage outcome, not as an error value.

/// A domain value could not be converted to or from a codec-native
/// representation.
#[derive(Debug, thiserror::Error)]
pub enum TransformFailure {
    /// The value lies outside the subset this transformer supports
    /// (e.g. a nested structure a manual-tree transformer cannot express).
    #[error("value outside supported domain: {0}")]
    Unsupported(String),

    /// The native representation is missing or mistypes a required field.
    #[error("missing or invalid field: {0}")]
    InvalidField(String),

    /// Any other conversion failure.
    #[error("{0}")]
    Message(String),
}

/// A codec failed to serialize or deserialize.
#[derive(Debug, thiserror::Error)]
pub enum CodecFailure {
    /// The byte sequence is malformed or truncated for this format.
    #[error("malformed input: {0}")]
    Malformed(String),

    /// The underlying serialization library reported an internal error.
    #[error("codec library error: {0}")]
    Library(String),
}

impl CodecFailure {
    /// Wrap an arbitrary library error. Codecs are not required to
    /// distinguish malformed input from internal errors; this is the
    /// catch-all they reach for.
    pub fn library(err: impl std::fmt::Display) -> Self {
        CodecFailure::Library(err.to_string())
    }
}

/// A failure from either half of a pipeline stage pair, as surfaced by the
/// driver-facing `serialize_once`/`deserialize_once` hooks.
#[derive(Debug, thiserror::Error)]
pub enum StageFailure {
    #[error("transform failed: {0}")]
    Transform(#[from] TransformFailure),

    #[error("codec failed: {0}")]
    Codec(#[from] CodecFailure),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_failure_display() {
        let err = TransformFailure::Unsupported("recursive image list".to_string());
        assert!(err.to_string().contains("outside supported domain"));

        let err = TransformFailure::InvalidField("media.uri".to_string());
        assert!(err.to_string().contains("media.uri"));
    }

    #[test]
    fn test_codec_failure_library_wraps_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "truncated");
        let err = CodecFailure::library(io_err);
        assert!(err.to_string().contains("codec library error"));
        assert!(err.to_string().contains("truncated"));
    }

    #[test]
    fn test_stage_failure_wraps_both_halves() {
        let err: StageFailure = TransformFailure::InvalidField("tags".to_string()).into();
        assert!(err.to_string().contains("transform failed"));

        let err: StageFailure = CodecFailure::Malformed("short read".to_string()).into();
        assert!(err.to_string().contains("codec failed"));
    }
}
