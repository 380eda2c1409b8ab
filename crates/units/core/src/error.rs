//! Common error infrastructure for units-core.
//!
//! This module provides shared types and traits used across all error types in units-core.
//! Domain-specific errors (`OracleError`, `ExpandError`, `ViewError`) are defined in their
//! respective modules alongside the operations that raise them.
//!
//! # Design Principles
//!
//! - **Type Safety**: Each failure family has its own error type with specific variants
//! - **Severity Classification**: Errors are categorized so callers can tell corrupt
//!   data apart from engine bugs
//! - **No Recovery Inside the Engine**: A failing stage aborts the whole expansion

/// Severity level of an error, used for categorization and handling strategies.
///
/// - **Validation**: Invalid query input, e.g. asking for a skill the unit lacks
/// - **Internal**: Unexpected state inconsistencies that require investigation
/// - **Fatal**: Unrecoverable errors indicating corrupted or mismatched static data
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: total of a skill the unit does not have
    Validation,

    /// Internal error - unexpected state inconsistency.
    ///
    /// Examples: unit missing from its own stack, experience matching no level.
    /// These indicate caller bugs and should be investigated.
    Internal,

    /// Fatal error - static data corrupted, cannot continue.
    ///
    /// Examples: missing skill definition, cyclic skill grants
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error indicates an internal bug or corrupt data.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all units-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on the cause, not the impact
pub trait EngineError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// This is useful for error categorization, logging, and testing.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
