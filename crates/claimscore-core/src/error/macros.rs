//! Error macros for claimscore

/// Macro for creating invalid value errors
#[macro_export]
macro_rules! bail_invalid {
    ($context:expr, $value:expr) => {
        return Err($crate::error::EvalError::invalid_value($context, $value))
    };
}

/// Macro for creating malformed input errors
#[macro_export]
macro_rules! bail_malformed {
    ($path:expr, $reason:expr) => {
        return Err($crate::error::EvalError::malformed($path, $reason))
    };
}
