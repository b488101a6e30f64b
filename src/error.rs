//! Kernel error taxonomy.

/// Errors surfaced by the arithmetic kernel.
///
/// Every fallible entry point returns [`Result`]; callers short-circuit on
/// the first failure with `?`. On error the destination is left in a valid
/// (possibly zero) state and scratch storage has been released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Growing a limb buffer failed.
    #[error("out of memory while growing a limb buffer")]
    OutOfMemory,

    /// The divisor was zero.
    #[error("division by zero")]
    DivisionByZero,

    /// A parameter was out of range, or an operand carried an unsupported
    /// mode flag (`Inf`, `NegInf`, `NaN`).
    #[error("invalid argument")]
    InvalidArgument,

    /// The operation is undefined for the operand's value.
    #[error("math domain error")]
    MathDomainError,

    /// The destination is flagged immutable.
    #[error("assignment to immutable integer")]
    AssignmentToImmutable,

    /// An iterative approximation did not converge within its bound.
    #[error("maximum iteration count reached")]
    MaxIterationsReached,
}

/// Convenience alias used throughout the kernel.
pub type Result<T> = core::result::Result<T, Error>;
