use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    /// A consumer looked up a context with no provider above it.
    #[error("{context} context not found. Ensure this component is inside a {provider}.")]
    Missing {
        context: &'static str,
        provider: &'static str,
    },
}
