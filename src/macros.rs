/// Queries, sub-views, extent and element conversions, and the `From`,
/// `TryFrom`, `Index` and `Debug` impls that `Span` and `SpanMut` share.
///
/// The sub-views take `self`, so a `Span` is copied and a `SpanMut` is
/// consumed.
macro_rules! span_views {
    ($span:ident) => {
        impl<'a, T, E> $span<'a, T, E>
        where
            E: crate::Extent,
        {
            /// Returns the number of elements.
            #[doc(alias = "size")]
            #[doc(alias = "length")]
            #[inline]
            pub fn len(&self) -> usize {
                self.storage.len()
            }

            /// Returns `true` if the span has no elements.
            #[inline]
            pub fn is_empty(&self) -> bool {
                self.len() == 0
            }

            /// Returns the number of bytes the elements occupy.
            pub fn size_bytes(&self) -> usize {
                self.storage.size_bytes()
            }

            /// Same as `size_bytes`.
            pub fn length_bytes(&self) -> usize {
                self.size_bytes()
            }

            /// Returns the data pointer, which is null for an `empty` span.
            #[inline]
            pub fn as_ptr(&self) -> *const T {
                self.storage.data()
            }

            /// Returns the first `count` elements.
            ///
            /// Reports a contract violation if `count` exceeds the length.
            #[track_caller]
            pub fn first(self, count: usize) -> $span<'a, T> {
                $span::with_storage(self.storage.first(count))
            }

            /// Returns the last `count` elements.
            ///
            /// Reports a contract violation if `count` exceeds the length. The
            /// data pointer of an empty suffix is the data pointer of `self`.
            #[track_caller]
            pub fn last(self, count: usize) -> $span<'a, T> {
                $span::with_storage(self.storage.last(count))
            }

            /// Returns `count` elements starting at `offset`, or every element
            /// from `offset` on if `count` is [`DYNAMIC_EXTENT`].
            ///
            /// Reports a contract violation if the range is out of bounds.
            ///
            /// [`DYNAMIC_EXTENT`]: crate::DYNAMIC_EXTENT
            #[track_caller]
            pub fn subspan(self, offset: usize, count: usize) -> $span<'a, T> {
                $span::with_storage(self.storage.subspan(offset, count))
            }

            /// Returns every element from `offset` on.
            #[track_caller]
            pub fn subspan_from(self, offset: usize) -> $span<'a, T> {
                self.subspan(offset, crate::DYNAMIC_EXTENT)
            }

            /// Returns the first `N` elements as a fixed-extent span.
            ///
            /// On a fixed-extent span, `N` larger than the extent is a
            /// compile-time error.
            #[track_caller]
            pub fn first_fixed<const N: usize>(self) -> $span<'a, T, crate::Fixed<N>> {
                const {
                    assert!(
                        crate::extent::fits::<E>(0, N),
                        "count must not exceed the fixed extent"
                    )
                };
                $span::with_storage(self.storage.first(N))
            }

            /// Returns the last `N` elements as a fixed-extent span.
            ///
            /// On a fixed-extent span, `N` larger than the extent is a
            /// compile-time error.
            #[track_caller]
            pub fn last_fixed<const N: usize>(self) -> $span<'a, T, crate::Fixed<N>> {
                const {
                    assert!(
                        crate::extent::fits::<E>(0, N),
                        "count must not exceed the fixed extent"
                    )
                };
                $span::with_storage(self.storage.last(N))
            }

            /// Returns `COUNT` elements starting at `OFFSET` as a fixed-extent
            /// span.
            ///
            /// On a fixed-extent span, a range past the extent is a
            /// compile-time error.
            #[track_caller]
            pub fn subspan_fixed<const OFFSET: usize, const COUNT: usize>(
                self,
            ) -> $span<'a, T, crate::Fixed<COUNT>> {
                const {
                    assert!(
                        crate::extent::fits::<E>(OFFSET, COUNT),
                        "offset plus count must not exceed the fixed extent"
                    )
                };
                $span::with_storage(self.storage.subspan(OFFSET, COUNT))
            }

            /// Returns every element from the constant `OFFSET` on, with a
            /// dynamic extent.
            ///
            /// On a fixed-extent span, `OFFSET` past the extent is a
            /// compile-time error.
            #[track_caller]
            pub fn subspan_offset<const OFFSET: usize>(self) -> $span<'a, T> {
                const {
                    assert!(
                        crate::extent::fits::<E>(OFFSET, 0),
                        "offset must not exceed the fixed extent"
                    )
                };
                self.subspan(OFFSET, crate::DYNAMIC_EXTENT)
            }

            /// Like `first`, returning the violation instead of reporting it.
            #[track_caller]
            pub fn try_first(
                self,
                count: usize,
            ) -> Result<$span<'a, T>, crate::ContractViolation> {
                self.storage.try_first(count).map($span::with_storage)
            }

            /// Like `last`, returning the violation instead of reporting it.
            #[track_caller]
            pub fn try_last(
                self,
                count: usize,
            ) -> Result<$span<'a, T>, crate::ContractViolation> {
                self.storage.try_last(count).map($span::with_storage)
            }

            /// Like `subspan`, returning the violation instead of reporting
            /// it.
            #[track_caller]
            pub fn try_subspan(
                self,
                offset: usize,
                count: usize,
            ) -> Result<$span<'a, T>, crate::ContractViolation> {
                self.storage.try_subspan(offset, count).map($span::with_storage)
            }

            /// Splits into the elements before `mid` and the elements from
            /// `mid` on.
            ///
            /// Reports a contract violation if `mid` exceeds the length.
            #[track_caller]
            pub fn split_at(self, mid: usize) -> ($span<'a, T>, $span<'a, T>) {
                let left = self.storage.first(mid);
                let right = self.storage.subspan(mid, crate::DYNAMIC_EXTENT);
                ($span::with_storage(left), $span::with_storage(right))
            }

            /// Returns the same elements with a different extent type.
            ///
            /// Converting to [`Dynamic`](crate::Dynamic) always succeeds.
            /// Converting to `Fixed<N>` reports a contract violation unless
            /// the length is `N`.
            #[track_caller]
            pub fn with_extent<F>(self) -> $span<'a, T, F>
            where
                F: crate::Extent,
            {
                $span::with_storage(self.storage.with_extent())
            }

            /// Returns the same elements as a `Fixed<N>` span.
            ///
            /// Reports a contract violation unless the length is `N`.
            #[track_caller]
            pub fn into_fixed<const N: usize>(self) -> $span<'a, T, crate::Fixed<N>> {
                self.with_extent()
            }

            /// Returns the same elements with a dynamic extent.
            pub fn into_dynamic(self) -> $span<'a, T> {
                $span::with_storage(self.storage.erase())
            }

            /// Views the elements as another element type, read-only.
            ///
            /// The conversion must be permitted by
            /// [`CastElement`](crate::CastElement). The data pointer and the
            /// element count are kept.
            #[track_caller]
            pub fn cast<U>(self) -> crate::Span<'a, U>
            where
                T: crate::CastElement<U>,
            {
                crate::Span::with_storage(self.storage.cast())
            }
        }

        impl<'a, T, const N: usize> From<$span<'a, T, crate::Fixed<N>>> for $span<'a, T> {
            fn from(span: $span<'a, T, crate::Fixed<N>>) -> Self {
                span.into_dynamic()
            }
        }

        impl<'a, T, const N: usize> TryFrom<$span<'a, T>> for $span<'a, T, crate::Fixed<N>> {
            type Error = crate::ContractViolation;

            #[track_caller]
            fn try_from(span: $span<'a, T>) -> Result<Self, Self::Error> {
                span.storage.try_with_extent().map($span::with_storage)
            }
        }

        impl<T, E> ::std::ops::Index<usize> for $span<'_, T, E>
        where
            E: crate::Extent,
        {
            type Output = T;

            #[track_caller]
            #[inline]
            fn index(&self, index: usize) -> &Self::Output {
                self.at(index)
            }
        }

        impl<T, E> ::std::fmt::Debug for $span<'_, T, E>
        where
            E: crate::Extent,
        {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.debug_struct(stringify!($span))
                    .field("data", &self.as_ptr())
                    .field("len", &self.len())
                    .field("extent", &crate::extent::fixed_extent::<E>())
                    .finish()
            }
        }
    };
}
