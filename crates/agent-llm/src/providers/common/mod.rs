//! Shared helpers for provider implementations.

pub mod openai_compat;

/// A finish reason other than a natural stop, e.g. `length`, `MAX_TOKENS`
/// or `SAFETY`. The reply is still returned, possibly cut short.
pub fn unusual_finish_reason(reason: Option<&str>) -> Option<&str> {
    reason.filter(|reason| !reason.eq_ignore_ascii_case("stop"))
}
