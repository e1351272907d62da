//! Error macros for prodbench

/// Macro for creating invalid value errors
#[macro_export]
macro_rules! bail_invalid {
    ($context:expr, $value:expr) => {
        return Err($crate::error::BenchError::invalid_value($context, $value))
    };
}

/// Macro for mapping store errors inside a transaction
#[macro_export]
macro_rules! map_store_err {
    ($op:expr, $error:expr) => {
        $crate::error::BenchError::transaction($op, $error)
    };
}
