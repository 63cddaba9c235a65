//! Reporting of record getter failures.
//!
//! By default an object row-set reads a failing getter as null and reports
//! the failure to a [`DiagnosticSink`]. [`InvocationPolicy::Propagate`]
//! surfaces the failure to the caller instead.

use tracing::warn;

use super::AccessError;

/// What an object row-set does when a getter fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvocationPolicy {
    /// Report to the sink and read the field as null.
    #[default]
    LogAndNull,
    /// Return `CursorError::Invocation` from the accessor.
    Propagate,
}

/// Receives getter failures swallowed under [`InvocationPolicy::LogAndNull`].
pub trait DiagnosticSink: Send + Sync {
    fn invocation_failed(&self, field: &str, error: &AccessError);
}

/// Sink that emits a `tracing` warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn invocation_failed(&self, field: &str, error: &AccessError) {
        warn!(field, error = %error, "record getter failed, reading field as null");
    }
}

impl<F> DiagnosticSink for F
where
    F: Fn(&str, &AccessError) + Send + Sync,
{
    fn invocation_failed(&self, field: &str, error: &AccessError) {
        self(field, error)
    }
}
