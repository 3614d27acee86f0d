use arcstr::ArcStr;

/// Source of globally unique opaque tokens, used for participant, payment-set
/// and debt-entry ids. Injected so tests and embedders can substitute a
/// deterministic implementation.
pub trait IdSource: Send + Sync {
    fn next_token(&self) -> ArcStr;
}
