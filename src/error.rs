pub type Result<T> = std::result::Result<T, SungearError>;

/// Failures the layout core can report before the relaxation loop starts.
/// The loop itself cannot fail; numerical edge cases are handled by
/// explicit branches in the sizing and solver code.
#[derive(Debug, thiserror::Error)]
pub enum SungearError {
    /// No stored input exists for the requested identifier. Maps to a
    /// not-found response at the boundary; never retried here.
    #[error("no stored input found for request")]
    SourceUnavailable,

    /// Fewer than 2 loaded lists carry any gene. User-correctable.
    #[error("sungear needs at least 2 analyses")]
    InsufficientInput,

    /// The gene filter excluded every gene in the universe.
    #[error("gene filter excludes every gene")]
    EmptyUniverse,
}
