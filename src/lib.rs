//! Bounds-checked, non-owning views over contiguous memory.
//!
//! [`Span`] and [`SpanMut`] are the read-only and mutable views. Each carries
//! an [`Extent`]: either [`Fixed<N>`], where the length is part of the type
//! and the span is a single pointer wide, or [`Dynamic`], where the length is
//! stored alongside the pointer.
//!
//! ```
//! use span_rs::{Fixed, Span};
//!
//! fn checksum(bytes: Span<u8>) -> u32 {
//!     bytes.as_slice().iter().map(|&b| u32::from(b)).sum()
//! }
//!
//! let header: [u8; 4] = [0xde, 0xad, 0xbe, 0xef];
//! let fixed: Span<u8, Fixed<4>> = Span::from_array(&header);
//! let magic = fixed.first_fixed::<2>();
//! assert_eq!(magic.as_array(), &[0xde, 0xad]);
//! assert_eq!(checksum(fixed.into()), 0x338);
//! ```
//!
//! Spans can be built from raw parts, pointer ranges, arrays, slices, and
//! any [`Contiguous`] container. Element types convert along the rules of
//! [`CastElement`]: same-width integers, pointer coercions, and byte views.
//! Byte views are bounded on `bytemuck`: any [`NoUninit`] element can be
//! read as bytes, and [`Pod`] elements can also be written as bytes.
//!
//! [`NoUninit`]: bytemuck::NoUninit
//! [`Pod`]: bytemuck::Pod
//!
//! Every operation checks its preconditions. A failed check is a
//! [`ContractViolation`], handled according to the process-wide
//! [`ViolationPolicy`]. See [`contract`] for details.
//!
//! # Features
//!
//! - `serde`: implements `Serialize` for [`Span`] and [`SpanMut`].

extern crate self as span_rs;

pub mod contract;
pub use contract::{ContractViolation, ViolationPolicy};

mod extent;
pub use extent::{DYNAMIC_EXTENT, Dynamic, Extent, Fixed};

mod storage;

mod contiguous;
pub use contiguous::{Contiguous, ContiguousMut};

mod element;
pub use element::{CastElement, CastElementMut, ElementClass, ElementInfo, conversion_allowed};

#[macro_use]
mod macros;

mod span;
pub use span::Span;

mod span_mut;
pub use span_mut::SpanMut;

mod index;
pub use index::SpanIndex;

#[cfg(feature = "serde")]
mod serde;


pub use span_rs_derive::Contiguous;

#[cfg(test)]
pub(crate) mod test_utils {
    use crate::contract::{self, ViolationPolicy};
    use tracing_subscriber::{EnvFilter, fmt};

    /// Installs a test log writer and makes contract violations catchable.
    pub fn init() {
        let _ = fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
        contract::set_violation_policy(ViolationPolicy::Throw)
            .expect("tests run with the Throw policy");
    }
}
