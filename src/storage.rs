use crate::{
    DYNAMIC_EXTENT, Dynamic, Extent, Fixed,
    contract::{ContractViolation, expects},
};
use std::{ptr::NonNull, slice};

/// A data pointer paired with an extent.
///
/// This is the shared representation of [`Span`] and [`SpanMut`]. It checks
/// the construction and sub-view preconditions but knows nothing about
/// borrowing, which the wrappers express with their lifetimes.
///
/// The pointer is null only for empty storage. With a [`Fixed`] extent the
/// storage is a single pointer wide.
///
/// [`Span`]: crate::Span
/// [`SpanMut`]: crate::SpanMut
pub(crate) struct Storage<T, E>
where
    E: Extent,
{
    data: *const T,
    extent: E,
}

impl<T, E> Clone for Storage<T, E>
where
    E: Extent,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, E> Copy for Storage<T, E> where E: Extent {}

impl<T> Storage<T, Dynamic> {
    pub(crate) const EMPTY: Self = Self {
        data: std::ptr::null(),
        extent: Dynamic(0),
    };
}

impl<T, E> Storage<T, E>
where
    E: Extent,
{
    /// Storage for `len` elements at `data`, checking that a null pointer
    /// comes with a zero length and that `len` fits the extent.
    #[track_caller]
    #[inline]
    pub(crate) fn new(data: *const T, len: usize) -> Self {
        expects(
            !data.is_null() || len == 0,
            "a null pointer requires a zero count",
        );
        Self {
            data,
            extent: E::with_len(len),
        }
    }

    #[track_caller]
    pub(crate) fn try_new(data: *const T, len: usize) -> Result<Self, ContractViolation> {
        if data.is_null() && len != 0 {
            return Err(ContractViolation::new("a null pointer requires a zero count"));
        }
        Ok(Self {
            data,
            extent: E::try_with_len(len)?,
        })
    }

    /// Storage covering `[first, last)`.
    #[track_caller]
    pub(crate) fn from_range(first: *const T, last: *const T) -> Self {
        let bytes = (last.addr() as isize).wrapping_sub(first.addr() as isize);
        expects(bytes >= 0, "the end pointer must not precede the start pointer");
        let len = match size_of::<T>() {
            0 => 0,
            size => {
                expects(
                    bytes as usize % size == 0,
                    "the pointer range must cover whole elements",
                );
                bytes as usize / size
            }
        };
        Self::new(first, len)
    }

    /// Storage for a slice, which always satisfies the pointer invariant.
    #[track_caller]
    #[inline]
    pub(crate) fn from_slice(slice: &[T]) -> Self {
        Self {
            data: slice.as_ptr(),
            extent: E::with_len(slice.len()),
        }
    }

    pub(crate) const fn data(&self) -> *const T {
        self.data
    }

    /// A non-null pointer suitable for building a slice. Dangling when the
    /// storage is empty and null.
    #[inline]
    pub(crate) fn non_null(&self) -> NonNull<T> {
        NonNull::new(self.data.cast_mut()).unwrap_or(NonNull::dangling())
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.extent.len()
    }

    pub(crate) fn size_bytes(&self) -> usize {
        self.len() * size_of::<T>()
    }

    /// The same memory with a different extent type.
    #[track_caller]
    pub(crate) fn with_extent<F: Extent>(self) -> Storage<T, F> {
        Storage {
            data: self.data,
            extent: F::with_len(self.len()),
        }
    }

    #[track_caller]
    pub(crate) fn try_with_extent<F: Extent>(self) -> Result<Storage<T, F>, ContractViolation> {
        Ok(Storage {
            data: self.data,
            extent: F::try_with_len(self.len())?,
        })
    }

    /// Forgets the static length. Never fails.
    #[inline]
    pub(crate) fn erase(self) -> Storage<T, Dynamic> {
        Storage {
            data: self.data,
            extent: Dynamic(self.len()),
        }
    }

    /// The same memory viewed as elements of type `U`, keeping the count.
    #[track_caller]
    pub(crate) fn cast<U>(self) -> Storage<U, Dynamic> {
        let len = self.len();
        let data = self.data.cast::<U>();
        expects(
            len.checked_mul(size_of::<U>())
                .is_some_and(|bytes| bytes <= self.size_bytes()),
            "the converted span must not cover more bytes than the source",
        );
        expects(
            data.is_aligned(),
            "the data pointer must be aligned for the converted element type",
        );
        Storage {
            data,
            extent: Dynamic(len),
        }
    }

    /// Creates `len` elements starting `offset` elements in. The caller has
    /// checked the bounds.
    #[track_caller]
    #[inline]
    fn sub<F: Extent>(self, offset: usize, len: usize) -> Storage<T, F> {
        Storage {
            data: self.data.wrapping_add(offset),
            extent: F::with_len(len),
        }
    }

    #[track_caller]
    pub(crate) fn first<F: Extent>(self, count: usize) -> Storage<T, F> {
        expects(
            count <= self.len(),
            "count must not exceed the span length",
        );
        self.sub(0, count)
    }

    #[track_caller]
    pub(crate) fn last<F: Extent>(self, count: usize) -> Storage<T, F> {
        expects(
            count <= self.len(),
            "count must not exceed the span length",
        );
        // An empty suffix keeps the original pointer.
        let offset = if count == 0 { 0 } else { self.len() - count };
        self.sub(offset, count)
    }

    #[track_caller]
    pub(crate) fn subspan<F: Extent>(self, offset: usize, count: usize) -> Storage<T, F> {
        let len = self.len();
        expects(offset <= len, "offset must not exceed the span length");
        expects(
            count == DYNAMIC_EXTENT || count <= len - offset,
            "offset plus count must not exceed the span length",
        );
        let count = if count == DYNAMIC_EXTENT {
            len - offset
        } else {
            count
        };
        self.sub(offset, count)
    }

    #[track_caller]
    pub(crate) fn try_first(self, count: usize) -> Result<Storage<T, Dynamic>, ContractViolation> {
        if count <= self.len() {
            Ok(self.sub(0, count))
        } else {
            Err(ContractViolation::new("count must not exceed the span length"))
        }
    }

    #[track_caller]
    pub(crate) fn try_last(self, count: usize) -> Result<Storage<T, Dynamic>, ContractViolation> {
        if count <= self.len() {
            let offset = if count == 0 { 0 } else { self.len() - count };
            Ok(self.sub(offset, count))
        } else {
            Err(ContractViolation::new("count must not exceed the span length"))
        }
    }

    #[track_caller]
    pub(crate) fn try_subspan(
        self,
        offset: usize,
        count: usize,
    ) -> Result<Storage<T, Dynamic>, ContractViolation> {
        let len = self.len();
        if offset > len {
            return Err(ContractViolation::new(
                "offset must not exceed the span length",
            ));
        }
        match count {
            DYNAMIC_EXTENT => Ok(self.sub(offset, len - offset)),
            count if count <= len - offset => Ok(self.sub(offset, count)),
            _ => Err(ContractViolation::new(
                "offset plus count must not exceed the span length",
            )),
        }
    }

    /// A pointer to the element at `index`, if it is in bounds.
    #[inline]
    pub(crate) fn get(self, index: usize) -> Option<*const T> {
        (index < self.len()).then(|| self.data.wrapping_add(index))
    }

    /// A pointer to the element at `index`, reporting a violation if it is out
    /// of bounds.
    #[track_caller]
    #[inline]
    pub(crate) fn at(self, index: usize) -> *const T {
        expects(index < self.len(), "index must be less than the span length");
        self.data.wrapping_add(index)
    }

    /// Returns the storage as a slice.
    ///
    /// # Safety
    ///
    /// The storage must describe initialized memory that is valid for reads
    /// for `'a` and not mutated during `'a`.
    #[inline]
    pub(crate) unsafe fn as_slice<'a>(self) -> &'a [T] {
        // SAFETY: The caller upholds validity. The pointer is non-null and
        // aligned, being either real or dangling for an empty span.
        unsafe { slice::from_raw_parts(self.non_null().as_ptr(), self.len()) }
    }

    /// Returns the storage as a mutable slice.
    ///
    /// # Safety
    ///
    /// As for [`Storage::as_slice`], and additionally the memory must be
    /// valid for writes and not otherwise accessed during `'a`.
    #[inline]
    pub(crate) unsafe fn as_mut_slice<'a>(self) -> &'a mut [T] {
        // SAFETY: See above.
        unsafe { slice::from_raw_parts_mut(self.non_null().as_ptr(), self.len()) }
    }
}

impl<T, const N: usize> Storage<T, Fixed<N>> {
    /// Storage for an array, whose length is the fixed extent.
    pub(crate) const fn from_array(array: &[T; N]) -> Self {
        Self {
            data: array.as_ptr(),
            extent: Fixed::new(),
        }
    }
}

static_assertions::assert_eq_size!(Storage<u64, Fixed<16>>, *const u64);
static_assertions::assert_eq_size!(Storage<u64, Dynamic>, &[u64]);
