use crate::contract::{ContractViolation, expects};
use std::{fmt::Debug, hash::Hash};

/// The extent of a span whose length is only known at run time.
///
/// [`Dynamic`] spans report this value from [`Extent::EXTENT`], and
/// [`Span::subspan`] accepts it as a count meaning "everything after the
/// offset".
///
/// [`Span::subspan`]: crate::Span::subspan
pub const DYNAMIC_EXTENT: usize = usize::MAX;

mod private {
    pub trait Sealed {}
}

/// The number of elements in a span, either fixed by the type or stored per
/// value.
///
/// This trait is sealed. The only implementors are [`Fixed`] and [`Dynamic`].
pub trait Extent: private::Sealed + Copy + Debug + Eq + Hash {
    /// `N` for [`Fixed<N>`] and [`DYNAMIC_EXTENT`] for [`Dynamic`].
    const EXTENT: usize;

    /// Creates the extent for `len` elements.
    ///
    /// Reports a contract violation if `len` cannot be represented, that is,
    /// if it differs from `N` for [`Fixed<N>`] or equals [`DYNAMIC_EXTENT`] for
    /// [`Dynamic`].
    #[track_caller]
    fn with_len(len: usize) -> Self;

    /// Like [`Extent::with_len`], but returns the violation instead of
    /// reporting it.
    #[track_caller]
    fn try_with_len(len: usize) -> Result<Self, ContractViolation>;

    /// The number of elements.
    fn len(&self) -> usize;

    /// Whether there are no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `Some(N)` for `Fixed<N>`, `None` for [`Dynamic`].
pub(crate) fn fixed_extent<E: Extent>() -> Option<usize> {
    (E::EXTENT != DYNAMIC_EXTENT).then_some(E::EXTENT)
}

/// Whether `count` elements from `offset` can lie within extent `E`. Always
/// true for [`Dynamic`], which is checked at run time instead.
pub(crate) const fn fits<E: Extent>(offset: usize, count: usize) -> bool {
    E::EXTENT == DYNAMIC_EXTENT || (offset <= E::EXTENT && count <= E::EXTENT - offset)
}

/// An extent of exactly `N` elements, known at compile time.
///
/// `Fixed` is zero-sized, so a fixed-extent span is a single pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fixed<const N: usize>;

impl<const N: usize> Fixed<N> {
    const VALID: () = assert!(
        N != DYNAMIC_EXTENT,
        "a fixed extent cannot be the dynamic extent sentinel"
    );

    /// Creates the extent.
    ///
    /// `Fixed<DYNAMIC_EXTENT>` is rejected at compile time.
    ///
    /// ```compile_fail
    /// use span_rs::{Fixed, DYNAMIC_EXTENT};
    /// let _ = Fixed::<DYNAMIC_EXTENT>::new();
    /// ```
    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID;
        Self
    }
}

impl<const N: usize> private::Sealed for Fixed<N> {}

impl<const N: usize> Extent for Fixed<N> {
    const EXTENT: usize = N;

    #[inline]
    fn with_len(len: usize) -> Self {
        expects(len == N, "length must equal the fixed extent");
        Self::new()
    }

    fn try_with_len(len: usize) -> Result<Self, ContractViolation> {
        if len == N {
            Ok(Self::new())
        } else {
            Err(ContractViolation::new("length must equal the fixed extent"))
        }
    }

    #[inline]
    fn len(&self) -> usize {
        N
    }
}

/// An extent whose length is stored at run time.
///
/// Any length except [`DYNAMIC_EXTENT`] (`usize::MAX`) can be stored, since
/// that value marks the extent itself as dynamic. Spans of `usize::MAX`
/// elements can only exist for zero-sized types, so viewing something like
/// `vec![(); usize::MAX]` reports a contract violation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Dynamic(pub(crate) usize);

impl private::Sealed for Dynamic {}

impl Extent for Dynamic {
    const EXTENT: usize = DYNAMIC_EXTENT;

    #[inline]
    fn with_len(len: usize) -> Self {
        expects(
            len != DYNAMIC_EXTENT,
            "length cannot be the dynamic extent sentinel",
        );
        Self(len)
    }

    fn try_with_len(len: usize) -> Result<Self, ContractViolation> {
        if len != DYNAMIC_EXTENT {
            Ok(Self(len))
        } else {
            Err(ContractViolation::new(
                "length cannot be the dynamic extent sentinel",
            ))
        }
    }

    #[inline]
    fn len(&self) -> usize {
        self.0
    }
}

impl<const N: usize> From<Fixed<N>> for Dynamic {
    fn from(_: Fixed<N>) -> Self {
        Self(N)
    }
}

impl<const N: usize> TryFrom<Dynamic> for Fixed<N> {
    type Error = ContractViolation;

    #[track_caller]
    fn try_from(extent: Dynamic) -> Result<Self, Self::Error> {
        Self::try_with_len(extent.0)
    }
}
