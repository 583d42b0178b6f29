//! Update semantics shared by the recipe and tag driving ports.

/// How an update treats omitted required fields.
///
/// `PATCH` maps to [`UpdateMode::Partial`] and `PUT` to [`UpdateMode::Full`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    /// Only supplied fields change.
    Partial,
    /// Required fields must all be supplied.
    Full,
}
