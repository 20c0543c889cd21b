use crate::{
    Contiguous, Dynamic, Extent, Fixed, SpanMut, contract::ContractViolation, index::SpanIndex,
    storage::Storage,
};
use std::{marker::PhantomData, ptr};

/// A read-only, bounds-checked view over a contiguous run of `T`.
///
/// `Span` is to `&'a [T]` what `Span<'a, T, Fixed<N>>` is to `&'a [T; N]`:
/// the extent parameter `E` records the length either in the type
/// ([`Fixed`]) or in the value ([`Dynamic`], the default). A span never owns
/// its elements. It is `Copy`, and sub-views share the same memory.
///
/// Every precondition is checked when the operation is called and reported
/// through [`contract`](crate::contract).
///
/// ```
/// use span_rs::{Fixed, Span};
///
/// let values = [10, 20, 30, 40, 50];
/// let span: Span<i32> = Span::from_slice(&values);
/// assert_eq!(span.len(), 5);
/// assert_eq!(span.first(2).as_slice(), [10, 20]);
/// assert_eq!(span.last(2).as_slice(), [40, 50]);
/// assert_eq!(span.subspan(1, 3).as_slice(), [20, 30, 40]);
///
/// let middle: Span<i32, Fixed<3>> = span.subspan_fixed::<1, 3>();
/// assert_eq!(middle.as_array(), &[20, 30, 40]);
/// ```
pub struct Span<'a, T, E = Dynamic>
where
    E: Extent,
{
    pub(crate) storage: Storage<T, E>,
    pub(crate) marker: PhantomData<&'a [T]>,
}

// SAFETY: A span is a shared borrow of its elements.
unsafe impl<T, E> Send for Span<'_, T, E>
where
    T: Sync,
    E: Extent,
{
}

// SAFETY: A span is a shared borrow of its elements.
unsafe impl<T, E> Sync for Span<'_, T, E>
where
    T: Sync,
    E: Extent,
{
}

impl<T, E> Clone for Span<'_, T, E>
where
    E: Extent,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, E> Copy for Span<'_, T, E> where E: Extent {}

impl<'a, T, E> Span<'a, T, E>
where
    E: Extent,
{
    pub(crate) const fn with_storage(storage: Storage<T, E>) -> Self {
        Self {
            storage,
            marker: PhantomData,
        }
    }

    /// Creates an empty span with a null data pointer.
    ///
    /// Only [`Dynamic`] and `Fixed<0>` spans can be empty:
    ///
    /// ```compile_fail
    /// use span_rs::{Fixed, Span};
    /// let span = Span::<u8, Fixed<4>>::empty();
    /// ```
    pub fn empty() -> Self {
        const {
            assert!(
                E::EXTENT == 0 || E::EXTENT == crate::DYNAMIC_EXTENT,
                "only a dynamic or zero extent can be empty"
            )
        };
        Self::with_storage(Storage::new(ptr::null(), 0))
    }

    /// Same as [`Span::empty`].
    pub fn null() -> Self {
        Self::empty()
    }

    /// Creates a span over `len` elements starting at `data`.
    ///
    /// Reports a contract violation if `data` is null and `len` is not zero,
    /// or if `len` does not match a fixed extent.
    ///
    /// # Safety
    ///
    /// Unless `len` is zero, `data` must point to `len` initialized, properly
    /// aligned elements that are valid for reads and not mutated for `'a`.
    #[track_caller]
    pub unsafe fn from_raw_parts(data: *const T, len: usize) -> Self {
        Self::with_storage(Storage::new(data, len))
    }

    /// Like [`Span::from_raw_parts`], returning the violation instead of
    /// reporting it.
    ///
    /// # Safety
    ///
    /// As for [`Span::from_raw_parts`].
    #[track_caller]
    pub unsafe fn try_from_raw_parts(
        data: *const T,
        len: usize,
    ) -> Result<Self, ContractViolation> {
        Storage::try_new(data, len).map(Self::with_storage)
    }

    /// Creates a span over `[first, last)`.
    ///
    /// Reports a contract violation if `last` precedes `first`, if the range
    /// is not a whole number of elements, or if its length does not match a
    /// fixed extent.
    ///
    /// # Safety
    ///
    /// Both pointers must belong to the same allocation, and the range must
    /// satisfy the requirements of [`Span::from_raw_parts`].
    #[track_caller]
    pub unsafe fn from_ptr_range(first: *const T, last: *const T) -> Self {
        Self::with_storage(Storage::from_range(first, last))
    }

    /// Creates a span over a slice.
    ///
    /// Reports a contract violation if the slice length does not match a
    /// fixed extent.
    #[track_caller]
    pub fn from_slice(slice: &'a [T]) -> Self {
        Self::with_storage(Storage::from_slice(slice))
    }

    /// Returns the elements as a slice.
    #[inline]
    pub fn as_slice(&self) -> &'a [T] {
        // SAFETY: Guaranteed by the constructors.
        unsafe { self.storage.as_slice() }
    }

    /// Returns a reference to the element at `index`.
    ///
    /// Reports a contract violation if `index` is out of bounds.
    #[track_caller]
    #[inline]
    pub fn at(&self, index: usize) -> &'a T {
        // SAFETY: The index was checked and the elements live for 'a.
        unsafe { &*self.storage.at(index) }
    }

    /// Returns an element or sub-span, or `None` if out of bounds.
    ///
    /// ```
    /// use span_rs::Span;
    ///
    /// let span: Span<char> = Span::from_slice(&['a', 'b', 'c']);
    /// assert_eq!(span.get(1), Some(&'b'));
    /// assert_eq!(span.get(1..).map(|s| s.len()), Some(2));
    /// assert!(span.get(3).is_none());
    /// assert!(span.get(..4).is_none());
    /// ```
    pub fn get<I>(&self, index: I) -> Option<I::Output>
    where
        I: SpanIndex<'a, T>,
    {
        index.get(Span::with_storage(self.storage.erase()))
    }
}

span_views!(Span);

impl<'a, T, const N: usize> Span<'a, T, Fixed<N>> {
    /// Creates a fixed-extent span over an array.
    ///
    /// `Span::from(&array)` also works, but only where the target type is
    /// written out: an array is a [`Contiguous`] container as well, so the
    /// extent cannot be inferred.
    ///
    /// ```
    /// use span_rs::{Fixed, Span};
    ///
    /// let values = [1, 2, 3];
    /// let fixed = Span::from_array(&values);
    /// let annotated: Span<i32, Fixed<3>> = Span::from(&values);
    /// assert_eq!(fixed.as_ptr(), annotated.as_ptr());
    /// ```
    pub const fn from_array(array: &'a [T; N]) -> Self {
        Self::with_storage(Storage::from_array(array))
    }

    /// Returns the elements as an array.
    pub fn as_array(&self) -> &'a [T; N] {
        // SAFETY: A `Fixed<N>` span has exactly `N` elements, and the pointer
        // is non-null and aligned.
        unsafe { &*self.storage.non_null().as_ptr().cast::<[T; N]>() }
    }
}

impl<'a, T> Span<'a, T> {
    /// Creates a span over the elements of a contiguous container.
    #[track_caller]
    pub fn from_container<C>(container: &'a C) -> Self
    where
        C: Contiguous<Item = T> + ?Sized,
    {
        Self::with_storage(Storage::new(container.as_ptr(), container.len()))
    }
}

impl<T> Default for Span<'_, T, Dynamic> {
    fn default() -> Self {
        Self::with_storage(Storage::EMPTY)
    }
}

impl<T> Default for Span<'_, T, Fixed<0>> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Needs the target type spelled out. See [`Span::from_array`].
impl<'a, T, const N: usize> From<&'a [T; N]> for Span<'a, T, Fixed<N>> {
    fn from(array: &'a [T; N]) -> Self {
        Self::from_array(array)
    }
}

impl<'a, C> From<&'a C> for Span<'a, C::Item>
where
    C: Contiguous + ?Sized,
{
    #[track_caller]
    fn from(container: &'a C) -> Self {
        Self::from_container(container)
    }
}

impl<'a, T, E> From<SpanMut<'a, T, E>> for Span<'a, T, E>
where
    E: Extent,
{
    fn from(span: SpanMut<'a, T, E>) -> Self {
        span.into_span()
    }
}

static_assertions::assert_eq_size!(Span<'static, u32, Fixed<4>>, *const u32);
static_assertions::assert_eq_size!(Span<'static, u32>, &'static [u32]);
static_assertions::assert_impl_all!(Span<'static, u32>: Copy, Send, Sync);
static_assertions::assert_not_impl_any!(Span<'static, std::cell::Cell<u32>>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DYNAMIC_EXTENT, contract::catch, test_utils};

    const VALUES: [i32; 5] = [10, 20, 30, 40, 50];

    fn dynamic(values: &[i32]) -> Span<'_, i32> {
        Span::from_slice(values)
    }

    #[test]
    fn raw_parts_keep_pointer_and_length() {
        for n in 0..=VALUES.len() {
            let buffer = &VALUES[..n];
            let span: Span<i32> = unsafe { Span::from_raw_parts(buffer.as_ptr(), n) };
            assert_eq!(span.len(), n);
            assert_eq!(span.as_ptr(), buffer.as_ptr());
            assert_eq!(span.is_empty(), n == 0);
        }
    }

    #[test]
    fn null_pointer_needs_zero_count() {
        test_utils::init();
        let span: Span<i32> = unsafe { Span::from_raw_parts(ptr::null(), 0) };
        assert_eq!(span.len(), 0);
        assert!(span.as_ptr().is_null());
        assert!(span.as_slice().is_empty());

        let violation =
            catch(|| unsafe { Span::<i32>::from_raw_parts(ptr::null(), 3) }).unwrap_err();
        assert_eq!(violation.condition(), "a null pointer requires a zero count");

        let fallible = unsafe { Span::<i32>::try_from_raw_parts(ptr::null(), 3) };
        assert!(fallible.is_err());
        let fixed = unsafe { Span::<i32, Fixed<2>>::try_from_raw_parts(VALUES.as_ptr(), 3) };
        assert_eq!(
            fixed.unwrap_err().condition(),
            "length must equal the fixed extent"
        );
    }

    #[test]
    fn empty_and_null_spans() {
        let empty = Span::<u8>::empty();
        let null = Span::<u8>::null();
        let default = Span::<u8>::default();
        let fixed = Span::<u8, Fixed<0>>::default();
        for span in [empty, null, default] {
            assert_eq!(span.len(), 0);
            assert!(span.as_ptr().is_null());
        }
        assert_eq!(fixed.len(), 0);
        assert!(fixed.as_ptr().is_null());
    }

    #[test]
    fn pointer_range() {
        test_utils::init();
        let range = VALUES.as_ptr_range();
        let span: Span<i32> = unsafe { Span::from_ptr_range(range.start, range.end) };
        assert_eq!(span.as_slice(), VALUES);

        let empty: Span<i32> = unsafe { Span::from_ptr_range(range.end, range.end) };
        assert!(empty.is_empty());

        let backwards = catch(|| unsafe { Span::<i32>::from_ptr_range(range.end, range.start) });
        assert!(backwards.is_err());
    }

    #[test]
    fn pointer_range_covers_whole_elements() {
        test_utils::init();
        let start = VALUES.as_ptr();
        let ragged = start.cast::<u8>().wrapping_add(1).cast::<i32>();
        let violation = catch(|| unsafe { Span::<i32>::from_ptr_range(start, ragged) }).unwrap_err();
        assert_eq!(violation.condition(), "the pointer range must cover whole elements");
    }

    #[test]
    fn pointer_range_matches_fixed_extent() {
        test_utils::init();
        let range = VALUES.as_ptr_range();
        let violation =
            catch(|| unsafe { Span::<i32, Fixed<4>>::from_ptr_range(range.start, range.end) })
                .unwrap_err();
        assert_eq!(violation.condition(), "length must equal the fixed extent");

        let fixed = unsafe { Span::<i32, Fixed<5>>::from_ptr_range(range.start, range.end) };
        assert_eq!(fixed.as_array(), &VALUES);
    }

    #[test]
    fn pointer_range_of_zero_sized_elements() {
        let units = [(); 8];
        let range = units.as_ptr_range();
        let span: Span<()> = unsafe { Span::from_ptr_range(range.start, range.end) };
        assert_eq!(span.len(), 0);
        assert_eq!(span.as_ptr(), units.as_ptr());
    }

    #[test]
    fn sentinel_length_is_rejected() {
        test_utils::init();
        // SAFETY: Zero-sized elements occupy no memory at any length.
        let units: &[()] = unsafe { std::slice::from_raw_parts(ptr::dangling(), usize::MAX) };
        let violation = catch(|| Span::from(units).len()).unwrap_err();
        assert_eq!(violation.condition(), "length cannot be the dynamic extent sentinel");
        assert!(unsafe { Span::<()>::try_from_raw_parts(units.as_ptr(), usize::MAX) }.is_err());

        let fits = &units[1..];
        assert_eq!(Span::from(fits).len(), usize::MAX - 1);
    }

    #[test]
    fn indexing() {
        test_utils::init();
        let span = dynamic(&VALUES);
        for (i, value) in VALUES.iter().enumerate() {
            assert_eq!(span[i], *value);
            assert_eq!(span.at(i), value);
        }
        let violation = catch(|| span[5]).unwrap_err();
        assert_eq!(violation.condition(), "index must be less than the span length");
        assert!(catch(|| *span.at(usize::MAX)).is_err());
    }

    #[test]
    fn scenario() {
        test_utils::init();
        let span = dynamic(&VALUES);
        assert_eq!(span.len(), 5);
        assert_eq!(span.size_bytes(), 20);
        assert_eq!(span.first(2).as_slice(), [10, 20]);
        assert_eq!(span.last(2).as_slice(), [40, 50]);
        assert_eq!(span.subspan(1, 3).as_slice(), [20, 30, 40]);
        assert!(catch(|| span[5]).is_err());
        assert!(catch(|| span.subspan(0, 6)).is_err());
    }

    #[test]
    fn first_reproduces_prefix() {
        let span = dynamic(&VALUES);
        for k in 0..=span.len() {
            let first = span.first(k);
            assert_eq!(first.as_slice(), &VALUES[..k]);
            assert_eq!(first.as_ptr(), span.as_ptr());
        }
        assert_eq!(span.first(span.len()).as_slice(), span.as_slice());
    }

    #[test]
    fn last_reproduces_suffix() {
        let span = dynamic(&VALUES);
        for k in 0..=span.len() {
            assert_eq!(span.last(k).as_slice(), &VALUES[VALUES.len() - k..]);
        }
        assert_eq!(span.last(0).as_ptr(), span.as_ptr());
        assert_eq!(span.last_fixed::<0>().as_ptr(), span.as_ptr());
    }

    #[test]
    fn subspan_bounds() {
        test_utils::init();
        let span = dynamic(&VALUES);
        assert_eq!(span.subspan(5, 0).len(), 0);
        assert_eq!(span.subspan(2, DYNAMIC_EXTENT).as_slice(), [30, 40, 50]);
        assert_eq!(span.subspan_from(5).len(), 0);
        assert!(catch(|| span.subspan(6, 0)).is_err());
        assert!(catch(|| span.subspan(3, 3)).is_err());
        assert!(catch(|| span.subspan(usize::MAX - 1, 2)).is_err());
        assert!(catch(|| span.first(6)).is_err());
        assert!(catch(|| span.last(6)).is_err());
    }

    #[test]
    fn subspan_composes_to_identity() {
        let span = dynamic(&VALUES);
        for offset in 0..=span.len() {
            for count in 0..=span.len() - offset {
                let sub = span.subspan(offset, count);
                let whole = sub.subspan(0, sub.len());
                assert_eq!(whole.as_slice(), sub.as_slice());
                assert_eq!(whole.as_ptr(), sub.as_ptr());
                assert_eq!(sub.as_slice(), &VALUES[offset..offset + count]);
            }
        }
    }

    #[test]
    fn fixed_sub_views() {
        test_utils::init();
        let span = dynamic(&VALUES);
        let first: Span<i32, Fixed<2>> = span.first_fixed();
        let last: Span<i32, Fixed<2>> = span.last_fixed();
        let middle: Span<i32, Fixed<3>> = span.subspan_fixed::<1, 3>();
        assert_eq!(first.as_array(), &[10, 20]);
        assert_eq!(last.as_array(), &[40, 50]);
        assert_eq!(middle.as_array(), &[20, 30, 40]);
        assert!(catch(|| span.first_fixed::<6>()).is_err());
        assert!(catch(|| span.subspan_fixed::<4, 2>()).is_err());
    }

    #[test]
    fn constant_offset_sub_views() {
        test_utils::init();
        let span = dynamic(&VALUES);
        assert_eq!(span.subspan_offset::<2>().as_slice(), [30, 40, 50]);
        assert!(span.subspan_offset::<5>().is_empty());
        assert!(catch(|| span.subspan_offset::<6>()).is_err());

        let fixed = Span::from_array(&VALUES);
        let rest: Span<i32> = fixed.subspan_offset::<1>();
        assert_eq!(rest.as_ptr(), VALUES[1..].as_ptr());
        assert_eq!(rest.len(), 4);
        assert_eq!(fixed.last_fixed::<5>().as_array(), &VALUES);
    }

    #[test]
    fn split_shares_memory() {
        test_utils::init();
        let span = dynamic(&VALUES);
        let (left, right) = span.split_at(2);
        assert_eq!(left.as_slice(), [10, 20]);
        assert_eq!(right.as_slice(), [30, 40, 50]);
        assert_eq!(right.as_ptr(), VALUES[2..].as_ptr());
        assert!(catch(|| span.split_at(6)).is_err());
    }

    #[test]
    fn byte_size() {
        let span = dynamic(&VALUES);
        assert_eq!(span.size_bytes(), 20);
        assert_eq!(span.length_bytes(), span.size_bytes());
        assert_eq!(Span::<u64>::empty().length_bytes(), 0);
    }

    #[test]
    fn array_round_trip() {
        let fixed = Span::from_array(&VALUES);
        let dynamic: Span<i32> = fixed.into();
        assert_eq!(dynamic.len(), VALUES.len());
        assert_eq!(dynamic.as_ptr(), VALUES.as_ptr());

        let back: Span<i32, Fixed<5>> = dynamic.try_into().unwrap();
        assert_eq!(back.as_ptr(), VALUES.as_ptr());
        let wrong: Result<Span<i32, Fixed<4>>, _> = dynamic.try_into();
        assert!(wrong.is_err());
    }

    #[test]
    fn fixed_extent_is_checked_on_construction() {
        test_utils::init();
        let violation = catch(|| Span::<i32, Fixed<4>>::from_slice(&VALUES)).unwrap_err();
        assert_eq!(violation.condition(), "length must equal the fixed extent");
        assert!(catch(|| dynamic(&VALUES).into_fixed::<3>()).is_err());
        assert_eq!(dynamic(&VALUES).into_fixed::<5>().len(), 5);
    }

    #[test]
    fn containers() {
        let vec = vec![1u16, 2, 3];
        let boxed: Box<[u16]> = vec.clone().into_boxed_slice();
        let from_vec = Span::from(&vec);
        let from_box = Span::from(&boxed);
        let from_slice = Span::from(vec.as_slice());
        assert_eq!(from_vec.as_ptr(), vec.as_ptr());
        assert_eq!(from_box.as_slice(), [1, 2, 3]);
        assert_eq!(from_slice.len(), 3);

        let text = String::from("span");
        let bytes = Span::from(&text);
        assert_eq!(bytes.as_slice(), b"span");
        assert_eq!(Span::from_container("ok").len(), 2);
    }

    #[test]
    fn integer_cast_keeps_pointer_and_length() {
        let span = dynamic(&VALUES);
        let unsigned = span.cast::<u32>();
        assert_eq!(unsigned.len(), span.len());
        assert_eq!(unsigned.as_ptr().cast::<i32>(), span.as_ptr());
        assert_eq!(unsigned[4], 50);
    }

    #[test]
    fn byte_cast_keeps_element_count() {
        let words = [0x0102_0304u32, 0x0506_0708];
        let bytes = Span::from_array(&words).cast::<u8>();
        assert_eq!(bytes.len(), 2);
        assert_eq!(bytes.as_ptr().cast::<u32>(), words.as_ptr());
    }

    #[test]
    fn zero_sized_byte_cast_is_rejected() {
        test_utils::init();
        let empty = [[0u8; 0]; 4];
        let span = Span::from_array(&empty);
        assert!(catch(|| span.cast::<u8>()).is_err());
    }

    #[test]
    fn pointer_cast() {
        let mut a = 1;
        let mut b = 2;
        let pointers = [&mut a as *mut i32, &mut b as *mut i32];
        let span = Span::from_array(&pointers).cast::<*const i32>();
        assert_eq!(span[1], &b as *const i32);
    }

    #[test]
    fn get_with_ranges() {
        let span = dynamic(&VALUES);
        assert_eq!(span.get(0), Some(&10));
        assert_eq!(span.get(5), None);
        assert_eq!(span.get(..).map(|s| s.len()), Some(5));
        assert_eq!(span.get(1..3).map(|s| s.as_slice()), Some(&VALUES[1..3]));
        assert_eq!(span.get(3..).map(|s| s.as_slice()), Some(&VALUES[3..]));
        assert_eq!(span.get(..=1).map(|s| s.as_slice()), Some(&VALUES[..=1]));
        assert_eq!(span.get(4..=4).map(|s| s.len()), Some(1));
        assert!(span.get(3..2).is_none());
        assert!(span.get(..=5).is_none());
    }

    #[test]
    fn try_sub_views() {
        let span = dynamic(&VALUES);
        assert_eq!(span.try_first(2).map(|s| s.len()), Ok(2));
        assert_eq!(span.try_last(0).map(|s| s.as_ptr()), Ok(span.as_ptr()));
        assert_eq!(
            span.try_subspan(1, DYNAMIC_EXTENT).map(|s| s.len()),
            Ok(4)
        );
        assert_eq!(
            span.try_first(6).unwrap_err().condition(),
            "count must not exceed the span length"
        );
        assert!(span.try_last(6).is_err());
        assert!(span.try_subspan(6, 0).is_err());
        assert!(span.try_subspan(2, 4).is_err());
    }

    #[test]
    fn debug_shows_shape() {
        let span = Span::from_array(&[1u8, 2]);
        let debug = format!("{span:?}");
        assert!(debug.starts_with("Span { data: 0x"));
        assert!(debug.ends_with("len: 2, extent: Some(2) }"));
        let dynamic = format!("{:?}", span.into_dynamic());
        assert!(dynamic.ends_with("extent: None }"));
    }
}
