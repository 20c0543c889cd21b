use crate::{Span, SpanMut};
use std::ops::{
    Bound, Range, RangeBounds, RangeFrom, RangeFull, RangeInclusive, RangeTo, RangeToInclusive,
};

/// A helper trait for the non-panicking [`Span::get`] and
/// [`SpanMut::get_mut`].
///
/// Implemented for `usize`, which selects one element, and for the standard
/// range types, which select a sub-span.
pub trait SpanIndex<'a, T> {
    /// The output type returned by [`SpanIndex::get`].
    type Output;

    /// The output type returned by [`SpanIndex::get_mut`].
    type OutputMut;

    /// Returns the output at this location, if in bounds.
    fn get(self, span: Span<'a, T>) -> Option<Self::Output>;

    /// Returns the mutable output at this location, if in bounds.
    fn get_mut(self, span: SpanMut<'a, T>) -> Option<Self::OutputMut>;
}

impl<'a, T> SpanIndex<'a, T> for usize
where
    T: 'a,
{
    type Output = &'a T;

    type OutputMut = &'a mut T;

    fn get(self, span: Span<'a, T>) -> Option<Self::Output> {
        // SAFETY: The index is in bounds and the elements live for 'a.
        span.storage.get(self).map(|element| unsafe { &*element })
    }

    fn get_mut(self, span: SpanMut<'a, T>) -> Option<Self::OutputMut> {
        // SAFETY: As above, and the span was an exclusive borrow.
        span.storage
            .get(self)
            .map(|element| unsafe { &mut *element.cast_mut() })
    }
}

/// Resolves a range against `len`, returning the offset and count.
fn resolve<R>(range: R, len: usize) -> Option<(usize, usize)>
where
    R: RangeBounds<usize>,
{
    let start = match range.start_bound() {
        Bound::Included(&start) => start,
        Bound::Excluded(&start) => start.checked_add(1)?,
        Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        Bound::Included(&end) => end.checked_add(1)?,
        Bound::Excluded(&end) => end,
        Bound::Unbounded => len,
    };
    (start <= end && end <= len).then(|| (start, end - start))
}

macro_rules! range_index {
    ($($range:ty),* $(,)?) => {
        $(
        impl<'a, T> SpanIndex<'a, T> for $range
        where
            T: 'a,
        {
            type Output = Span<'a, T>;

            type OutputMut = SpanMut<'a, T>;

            fn get(self, span: Span<'a, T>) -> Option<Self::Output> {
                let (offset, count) = resolve(self, span.len())?;
                span.storage
                    .try_subspan(offset, count)
                    .ok()
                    .map(Span::with_storage)
            }

            fn get_mut(self, span: SpanMut<'a, T>) -> Option<Self::OutputMut> {
                let (offset, count) = resolve(self, span.len())?;
                span.storage
                    .try_subspan(offset, count)
                    .ok()
                    .map(SpanMut::with_storage)
            }
        }
        )*
    };
}

range_index!(
    RangeFull,
    Range<usize>,
    RangeFrom<usize>,
    RangeTo<usize>,
    RangeInclusive<usize>,
    RangeToInclusive<usize>,
    (Bound<usize>, Bound<usize>),
);
