//! Precondition checking for span operations.
//!
//! Every checked operation in this crate reports a failed precondition here.
//! What happens next is decided by the process-wide
//! [`ViolationPolicy`], which is resolved exactly once:
//!
//! - [`ViolationPolicy::Terminate`] (the default) logs the violation and aborts
//!   the process.
//! - [`ViolationPolicy::Throw`] unwinds with the [`ContractViolation`] as the
//!   panic payload. Use [`catch`] to turn that unwind back into a `Result`.
//!
//! ```
//! use span_rs::{Span, contract::{self, ViolationPolicy}};
//!
//! contract::set_violation_policy(ViolationPolicy::Throw).unwrap();
//!
//! let values = [1, 2, 3];
//! let span = Span::from_array(&values);
//! let violation = contract::catch(|| span.first(4)).unwrap_err();
//! assert_eq!(violation.condition(), "count must not exceed the span length");
//! ```

use std::{
    panic::{self, Location, UnwindSafe},
    process,
    sync::OnceLock,
};
use thiserror::Error;

/// What to do when a precondition does not hold.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ViolationPolicy {
    /// Log the violation and abort the process.
    #[default]
    Terminate,
    /// Unwind with the [`ContractViolation`] as the panic payload.
    Throw,
}

static POLICY: OnceLock<ViolationPolicy> = OnceLock::new();

/// A precondition of a span operation did not hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
#[error("contract violation at {location}: {condition}")]
pub struct ContractViolation {
    condition: &'static str,
    location: &'static Location<'static>,
}

impl ContractViolation {
    #[track_caller]
    pub(crate) fn new(condition: &'static str) -> Self {
        Self {
            condition,
            location: Location::caller(),
        }
    }

    /// The precondition that failed.
    pub fn condition(&self) -> &'static str {
        self.condition
    }

    /// Where the failing operation was called from.
    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }
}

/// Returned when the policy was already resolved to something else.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
#[error("contract violation policy is already {0:?}")]
pub struct PolicyAlreadySet(pub ViolationPolicy);

/// Selects the violation policy for the rest of the process.
///
/// The policy can only be resolved once. Installing the policy that is
/// already in effect succeeds; asking for a different one fails. The first
/// violation reported before any call to this function locks in
/// [`ViolationPolicy::Terminate`].
pub fn set_violation_policy(policy: ViolationPolicy) -> Result<(), PolicyAlreadySet> {
    let mut installed = false;
    let current = *POLICY.get_or_init(|| {
        installed = true;
        policy
    });
    if installed {
        tracing::debug!(?policy, "contract violation policy installed");
    }
    if current == policy {
        Ok(())
    } else {
        Err(PolicyAlreadySet(current))
    }
}

/// The policy in effect, resolving it to the default if nothing was set.
pub fn violation_policy() -> ViolationPolicy {
    *POLICY.get_or_init(ViolationPolicy::default)
}

/// Runs `f`, converting a contract violation raised under
/// [`ViolationPolicy::Throw`] into an `Err`.
///
/// Panics that do not carry a [`ContractViolation`] are resumed unchanged.
/// Under [`ViolationPolicy::Terminate`] a violation aborts before this
/// function can observe it.
pub fn catch<F, R>(f: F) -> Result<R, ContractViolation>
where
    F: FnOnce() -> R + UnwindSafe,
{
    panic::catch_unwind(f).map_err(|payload| match payload.downcast::<ContractViolation>() {
        Ok(violation) => *violation,
        Err(other) => panic::resume_unwind(other),
    })
}

/// Checks a precondition, reporting `condition` at the caller's location if
/// it does not hold.
#[track_caller]
#[inline]
pub(crate) fn expects(holds: bool, condition: &'static str) {
    if !holds {
        violated(ContractViolation::new(condition));
    }
}

#[cold]
#[inline(never)]
pub(crate) fn violated(violation: ContractViolation) -> ! {
    tracing::error!(
        condition = violation.condition,
        location = %violation.location,
        "span precondition failed"
    );
    match violation_policy() {
        ViolationPolicy::Terminate => process::abort(),
        ViolationPolicy::Throw => panic::panic_any(violation),
    }
}
