use thiserror::Error;

/// Failure modes of the formula library.
///
/// The formulas are pure math: they never panic for inputs inside their
/// documented domains, and they never try to recover. Callers validate at
/// the boundary and decide what an error looks like to the user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    /// An input falls outside the formula's domain, e.g. a non-positive
    /// duration that would end up as a divisor or a fractional-power base
    /// that would go negative.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// A zero rate was requested on an operation whose naive closed form
    /// divides by the rate and has no defined limit to fall back on.
    #[error("degenerate rate: {0}")]
    DegenerateRate(&'static str),
}
