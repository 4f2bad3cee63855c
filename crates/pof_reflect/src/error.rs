use thiserror::Error;

// -----------------------------------------------------------------------------
// Error

/// Failures of the reflection surface.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ReflectError {
    #[error("class `{class}` declares no accessor complementing `{method}`")]
    MissingAccessor {
        class: &'static str,
        method: &'static str,
    },

    #[error("method `{method}` of `{class}` is not a get/is/set accessor")]
    NotAnAccessor {
        class: &'static str,
        method: &'static str,
    },

    #[error("method `{method}` of `{class}` cannot be used for this access")]
    WrongAccessorKind {
        class: &'static str,
        method: &'static str,
    },

    #[error("expected a container of type `{class}`, found `{actual:?}`")]
    ContainerMismatch {
        class: &'static str,
        actual: core::any::TypeId,
    },

    #[error("method `{method}` expects a value of type `{expected}`")]
    ValueMismatch {
        method: &'static str,
        expected: &'static str,
    },

    #[error("class `{class}` has no constructor")]
    NotInstantiable { class: &'static str },
}
