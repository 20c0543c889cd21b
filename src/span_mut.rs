use crate::{
    ContiguousMut, Dynamic, Extent, Fixed, Span, contract::ContractViolation,
    element::CastElementMut, index::SpanIndex, storage::Storage,
};
use std::{marker::PhantomData, ops::IndexMut, ptr};

/// A mutable, bounds-checked view over a contiguous run of `T`.
///
/// `SpanMut` applies the same borrowing rules as `&'a mut [T]`: it is not
/// `Copy`, and the sub-view operations consume it. Use
/// [`SpanMut::reborrow`] to take a sub-view while keeping the original, and
/// [`SpanMut::as_span`] for a read-only view.
///
/// ```
/// use span_rs::SpanMut;
///
/// let mut values = [1, 2, 3, 4];
/// let mut span: SpanMut<i32> = SpanMut::from_mut_slice(&mut values);
/// span[0] = 10;
/// span.reborrow().last(2).as_mut_slice().fill(0);
/// assert_eq!(span.as_slice(), [10, 2, 0, 0]);
/// ```
pub struct SpanMut<'a, T, E = Dynamic>
where
    E: Extent,
{
    pub(crate) storage: Storage<T, E>,
    pub(crate) marker: PhantomData<&'a mut [T]>,
}

// SAFETY: A mutable span is an exclusive borrow of its elements.
unsafe impl<T, E> Send for SpanMut<'_, T, E>
where
    T: Send,
    E: Extent,
{
}

// SAFETY: A mutable span is an exclusive borrow of its elements.
unsafe impl<T, E> Sync for SpanMut<'_, T, E>
where
    T: Sync,
    E: Extent,
{
}

impl<'a, T, E> SpanMut<'a, T, E>
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
    /// Only [`Dynamic`] and `Fixed<0>` spans can be empty.
    pub fn empty() -> Self {
        const {
            assert!(
                E::EXTENT == 0 || E::EXTENT == crate::DYNAMIC_EXTENT,
                "only a dynamic or zero extent can be empty"
            )
        };
        Self::with_storage(Storage::new(ptr::null(), 0))
    }

    /// Same as [`SpanMut::empty`].
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
    /// aligned elements that are valid for reads and writes and not accessed
    /// through any other pointer for `'a`.
    #[track_caller]
    pub unsafe fn from_raw_parts(data: *mut T, len: usize) -> Self {
        Self::with_storage(Storage::new(data.cast_const(), len))
    }

    /// Like [`SpanMut::from_raw_parts`], returning the violation instead of
    /// reporting it.
    ///
    /// # Safety
    ///
    /// As for [`SpanMut::from_raw_parts`].
    #[track_caller]
    pub unsafe fn try_from_raw_parts(data: *mut T, len: usize) -> Result<Self, ContractViolation> {
        Storage::try_new(data.cast_const(), len).map(Self::with_storage)
    }

    /// Creates a span over `[first, last)`.
    ///
    /// # Safety
    ///
    /// Both pointers must belong to the same allocation, and the range must
    /// satisfy the requirements of [`SpanMut::from_raw_parts`].
    #[track_caller]
    pub unsafe fn from_ptr_range(first: *mut T, last: *mut T) -> Self {
        Self::with_storage(Storage::from_range(first.cast_const(), last.cast_const()))
    }

    /// Creates a span over a mutable slice.
    ///
    /// Reports a contract violation if the slice length does not match a
    /// fixed extent.
    #[track_caller]
    pub fn from_mut_slice(slice: &'a mut [T]) -> Self {
        Self::with_storage(Storage::new(slice.as_mut_ptr().cast_const(), slice.len()))
    }

    /// Returns the data pointer for writing, which is null for
    /// [`SpanMut::empty`].
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.storage.data().cast_mut()
    }

    /// Returns the elements as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: Guaranteed by the constructors, and the shared borrow of
        // self prevents writes.
        unsafe { self.storage.as_slice() }
    }

    /// Returns the elements as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: Guaranteed by the constructors, and the borrow of self is
        // exclusive.
        unsafe { self.storage.as_mut_slice() }
    }

    /// Converts into a mutable slice for the whole lifetime `'a`.
    pub fn into_mut_slice(self) -> &'a mut [T] {
        // SAFETY: Guaranteed by the constructors, and self is consumed.
        unsafe { self.storage.as_mut_slice() }
    }

    /// A read-only view of the same elements.
    pub fn as_span(&self) -> Span<'_, T, E> {
        Span::with_storage(self.storage)
    }

    /// Converts into a read-only view for the whole lifetime `'a`.
    pub fn into_span(self) -> Span<'a, T, E> {
        Span::with_storage(self.storage)
    }

    /// A mutable view of the same elements that borrows from `self`.
    pub fn reborrow(&mut self) -> SpanMut<'_, T, E> {
        SpanMut::with_storage(self.storage)
    }

    /// Returns a reference to the element at `index`.
    ///
    /// Reports a contract violation if `index` is out of bounds.
    #[track_caller]
    #[inline]
    pub fn at(&self, index: usize) -> &T {
        // SAFETY: The index was checked.
        unsafe { &*self.storage.at(index) }
    }

    /// Returns a mutable reference to the element at `index`.
    ///
    /// Reports a contract violation if `index` is out of bounds.
    #[track_caller]
    #[inline]
    pub fn at_mut(&mut self, index: usize) -> &mut T {
        // SAFETY: The index was checked, and the borrow of self is exclusive.
        unsafe { &mut *self.storage.at(index).cast_mut() }
    }

    /// Returns an element or sub-span, or `None` if out of bounds.
    pub fn get<'b, I>(&'b self, index: I) -> Option<I::Output>
    where
        I: SpanIndex<'b, T>,
    {
        index.get(self.as_span().into_dynamic())
    }

    /// Returns a mutable element or sub-span, or `None` if out of bounds.
    ///
    /// ```
    /// use span_rs::SpanMut;
    ///
    /// let mut values = [1, 2, 3];
    /// let mut span = SpanMut::from_container(&mut values);
    /// if let Some(tail) = span.get_mut(1..) {
    ///     tail.into_mut_slice().reverse();
    /// }
    /// assert_eq!(values, [1, 3, 2]);
    /// ```
    pub fn get_mut<'b, I>(&'b mut self, index: I) -> Option<I::OutputMut>
    where
        I: SpanIndex<'b, T>,
    {
        index.get_mut(self.reborrow().into_dynamic())
    }

    /// Views the elements as another element type that can be written back.
    ///
    /// ```
    /// use span_rs::SpanMut;
    ///
    /// let mut values = [0u32; 2];
    /// SpanMut::from_container(&mut values).cast_mut::<i32>()[1] = -1;
    /// assert_eq!(values, [0, u32::MAX]);
    /// ```
    ///
    /// Writable byte views need elements for which every byte pattern is
    /// valid, which rules out `bool`:
    ///
    /// ```compile_fail
    /// use span_rs::SpanMut;
    ///
    /// let mut flags = [true, false];
    /// let bytes = SpanMut::from_container(&mut flags).cast_mut::<u8>();
    /// ```
    #[track_caller]
    pub fn cast_mut<U>(self) -> SpanMut<'a, U>
    where
        T: CastElementMut<U>,
    {
        SpanMut::with_storage(self.storage.cast())
    }
}

span_views!(SpanMut);

impl<'a, T, const N: usize> SpanMut<'a, T, Fixed<N>> {
    /// Creates a fixed-extent span over an array.
    pub fn from_array(array: &'a mut [T; N]) -> Self {
        Self::with_storage(Storage::new(array.as_mut_ptr().cast_const(), N))
    }

    /// Returns the elements as an array.
    pub fn as_array(&self) -> &[T; N] {
        // SAFETY: A `Fixed<N>` span has exactly `N` elements.
        unsafe { &*self.storage.non_null().as_ptr().cast::<[T; N]>() }
    }

    /// Returns the elements as a mutable array.
    pub fn as_mut_array(&mut self) -> &mut [T; N] {
        // SAFETY: As above, and the borrow of self is exclusive.
        unsafe { &mut *self.storage.non_null().as_ptr().cast::<[T; N]>() }
    }

    /// Converts into a mutable array for the whole lifetime `'a`.
    pub fn into_mut_array(self) -> &'a mut [T; N] {
        // SAFETY: As above, and self is consumed.
        unsafe { &mut *self.storage.non_null().as_ptr().cast::<[T; N]>() }
    }
}

impl<'a, T> SpanMut<'a, T> {
    /// Creates a span over the elements of a mutable contiguous container.
    #[track_caller]
    pub fn from_container<C>(container: &'a mut C) -> Self
    where
        C: ContiguousMut<Item = T> + ?Sized,
    {
        let len = container.len();
        Self::with_storage(Storage::new(container.as_mut_ptr().cast_const(), len))
    }
}

impl<T> Default for SpanMut<'_, T, Dynamic> {
    fn default() -> Self {
        Self::with_storage(Storage::EMPTY)
    }
}

impl<T> Default for SpanMut<'_, T, Fixed<0>> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<'a, T, const N: usize> From<&'a mut [T; N]> for SpanMut<'a, T, Fixed<N>> {
    fn from(array: &'a mut [T; N]) -> Self {
        Self::from_array(array)
    }
}

impl<'a, C> From<&'a mut C> for SpanMut<'a, C::Item>
where
    C: ContiguousMut + ?Sized,
{
    #[track_caller]
    fn from(container: &'a mut C) -> Self {
        Self::from_container(container)
    }
}

impl<T, E> IndexMut<usize> for SpanMut<'_, T, E>
where
    E: Extent,
{
    #[track_caller]
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        self.at_mut(index)
    }
}

static_assertions::assert_eq_size!(SpanMut<'static, u32, Fixed<4>>, *mut u32);
static_assertions::assert_eq_size!(SpanMut<'static, u32>, &'static mut [u32]);
static_assertions::assert_impl_all!(SpanMut<'static, u32>: Send, Sync);
static_assertions::assert_not_impl_any!(SpanMut<'static, u32>: Clone, Copy);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{contract::catch, test_utils};
    use std::panic::AssertUnwindSafe;

    #[test]
    fn writes_through_sub_views() {
        let mut values = [10, 20, 30, 40, 50];
        let mut span = SpanMut::from_container(&mut values);
        span.reborrow().first(2).as_mut_slice().fill(1);
        span.reborrow().subspan(2, 1)[0] = 2;
        *span.reborrow().last(1).at_mut(0) = 3;
        assert_eq!(span.as_slice(), [1, 1, 2, 40, 3]);
        assert_eq!(values, [1, 1, 2, 40, 3]);
    }

    #[test]
    fn read_only_views_share_memory() {
        let mut values = [1u8, 2, 3];
        let span = SpanMut::from_container(&mut values);
        let pointer = span.as_ptr();
        assert_eq!(span.as_span().as_ptr(), pointer);
        let read_only: Span<u8> = span.into();
        assert_eq!(read_only.as_ptr(), pointer);
        assert_eq!(read_only.as_slice(), [1, 2, 3]);
    }

    #[test]
    fn bounds_are_checked() {
        test_utils::init();
        let mut values = [0; 4];
        let mut span = SpanMut::from_container(&mut values);
        let violation = catch(AssertUnwindSafe(|| span[4] = 1)).unwrap_err();
        assert_eq!(violation.condition(), "index must be less than the span length");
        assert!(catch(AssertUnwindSafe(|| span.reborrow().first(5).len())).is_err());
        assert!(catch(AssertUnwindSafe(|| span.reborrow().subspan(2, 3).len())).is_err());
        assert!(span.reborrow().try_last(5).is_err());
        assert_eq!(span.len(), 4);
    }

    #[test]
    fn fixed_extent() {
        let mut values = [1, 2, 3, 4];
        let mut fixed = SpanMut::from_array(&mut values);
        fixed.as_mut_array()[3] = 0;
        let middle = fixed.reborrow().subspan_fixed::<1, 2>();
        middle.into_mut_array().swap(0, 1);
        let dynamic: SpanMut<i32> = fixed.into();
        let back: SpanMut<i32, Fixed<4>> = dynamic.try_into().unwrap();
        assert_eq!(back.as_array(), &[1, 3, 2, 0]);
    }

    #[test]
    fn get_mut_with_ranges() {
        let mut values = [1, 2, 3, 4];
        let mut span = SpanMut::from_container(&mut values);
        *span.get_mut(0).unwrap() = 5;
        span.get_mut(2..).unwrap().as_mut_slice().fill(0);
        assert!(span.get_mut(4).is_none());
        assert!(span.get_mut(..5).is_none());
        assert_eq!(span.get(..2).map(|s| s.as_slice()), Some(&[5, 2][..]));
        assert_eq!(values, [5, 2, 0, 0]);
    }

    #[test]
    fn split_at_edges() {
        test_utils::init();
        let mut values = [1, 2, 3];
        let (left, right) = SpanMut::from_container(&mut values).split_at(3);
        assert_eq!(left.len(), 3);
        assert!(right.is_empty());

        let mut values = [1, 2, 3];
        let span = SpanMut::from_container(&mut values);
        assert!(catch(AssertUnwindSafe(|| span.split_at(4).0.len())).is_err());
    }

    #[test]
    fn casts() {
        let mut values = [-1i16, 1];
        let mut span = SpanMut::from_container(&mut values);
        span.reborrow().cast_mut::<u16>()[0] = 7;
        let read: Span<u16> = span.reborrow().cast::<u16>();
        assert_eq!(read.as_slice(), [7, 1]);
        let bytes = span.cast_mut::<u8>();
        assert_eq!(bytes.len(), 2);
    }

    #[test]
    fn empty_spans() {
        let empty = SpanMut::<u8>::empty();
        assert!(empty.as_ptr().is_null());
        assert!(empty.into_mut_slice().is_empty());
        assert!(SpanMut::<u8>::default().is_empty());
        assert!(SpanMut::<u8, Fixed<0>>::null().as_array().is_empty());
        let raw = unsafe { SpanMut::<u8>::from_raw_parts(ptr::null_mut(), 0) };
        assert_eq!(raw.size_bytes(), 0);
    }

    #[test]
    fn constant_offset_writes_through() {
        let mut values = [1u16, 2, 3, 4];
        let mut fixed = SpanMut::from_array(&mut values);
        assert_eq!(fixed.length_bytes(), 8);
        fixed.reborrow().subspan_offset::<2>().as_mut_slice().fill(0);
        let (head, tail) = fixed.split_at(1);
        assert_eq!(head.as_slice(), [1]);
        assert_eq!(tail.as_slice(), [2, 0, 0]);
        assert_eq!(values, [1, 2, 0, 0]);
    }

    #[test]
    fn debug_shows_shape() {
        let mut values = [0u64; 3];
        let debug = format!("{:?}", SpanMut::from_container(&mut values));
        assert!(debug.starts_with("SpanMut { data: 0x"));
        assert!(debug.ends_with("len: 3, extent: None }"));
    }
}
