/// A type that stores its elements back to back in memory.
///
/// Any `Contiguous` container can be viewed as a [`Span`] with
/// [`Span::from_container`] or `Span::from(&container)`. Implement it for your
/// own buffers with `#[derive(Contiguous)]`, which delegates to the only field
/// or to the field marked `#[contiguous]`:
///
/// ```
/// use span_rs::{Contiguous, Span};
///
/// #[derive(Contiguous)]
/// struct Samples {
///     rate: u32,
///     #[contiguous]
///     data: Vec<i16>,
/// }
///
/// let samples = Samples { rate: 44_100, data: vec![3, -1, 4] };
/// let span = Span::from(&samples);
/// assert_eq!(span.len(), 3);
/// assert_eq!(span[2], 4);
/// ```
///
/// # Safety
///
/// [`as_ptr`] must return a pointer to [`len`] initialized elements that stay
/// valid and unmoved for as long as `self` is borrowed. The pointer may be
/// null only when `len` returns zero.
///
/// [`Span`]: crate::Span
/// [`Span::from_container`]: crate::Span::from_container
/// [`as_ptr`]: Contiguous::as_ptr
/// [`len`]: Contiguous::len
pub unsafe trait Contiguous {
    /// The element type.
    type Item;

    /// Returns a pointer to the first element.
    fn as_ptr(&self) -> *const Self::Item;

    /// Returns the number of elements.
    fn len(&self) -> usize;

    /// Returns `true` if there are no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A [`Contiguous`] container that hands out mutable access to its elements.
///
/// # Safety
///
/// [`as_mut_ptr`] must satisfy the requirements of [`Contiguous::as_ptr`] and
/// additionally be valid for writes for as long as `self` is mutably borrowed.
///
/// [`as_mut_ptr`]: ContiguousMut::as_mut_ptr
pub unsafe trait ContiguousMut: Contiguous {
    /// Returns a mutable pointer to the first element.
    fn as_mut_ptr(&mut self) -> *mut Self::Item;
}

unsafe impl<T> Contiguous for [T] {
    type Item = T;

    #[inline]
    fn as_ptr(&self) -> *const T {
        <[T]>::as_ptr(self)
    }

    #[inline]
    fn len(&self) -> usize {
        <[T]>::len(self)
    }
}

unsafe impl<T> ContiguousMut for [T] {
    #[inline]
    fn as_mut_ptr(&mut self) -> *mut T {
        <[T]>::as_mut_ptr(self)
    }
}

unsafe impl<T, const N: usize> Contiguous for [T; N] {
    type Item = T;

    #[inline]
    fn as_ptr(&self) -> *const T {
        self.as_slice().as_ptr()
    }

    #[inline]
    fn len(&self) -> usize {
        N
    }
}

unsafe impl<T, const N: usize> ContiguousMut for [T; N] {
    #[inline]
    fn as_mut_ptr(&mut self) -> *mut T {
        self.as_mut_slice().as_mut_ptr()
    }
}

unsafe impl<T> Contiguous for Vec<T> {
    type Item = T;

    #[inline]
    fn as_ptr(&self) -> *const T {
        Vec::as_ptr(self)
    }

    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }
}

unsafe impl<T> ContiguousMut for Vec<T> {
    #[inline]
    fn as_mut_ptr(&mut self) -> *mut T {
        Vec::as_mut_ptr(self)
    }
}

unsafe impl<T> Contiguous for Box<[T]> {
    type Item = T;

    #[inline]
    fn as_ptr(&self) -> *const T {
        <[T]>::as_ptr(self)
    }

    #[inline]
    fn len(&self) -> usize {
        <[T]>::len(self)
    }
}

unsafe impl<T> ContiguousMut for Box<[T]> {
    #[inline]
    fn as_mut_ptr(&mut self) -> *mut T {
        <[T]>::as_mut_ptr(self)
    }
}

// Strings are read-only: writing arbitrary bytes could break UTF-8.

unsafe impl Contiguous for str {
    type Item = u8;

    #[inline]
    fn as_ptr(&self) -> *const u8 {
        str::as_ptr(self)
    }

    #[inline]
    fn len(&self) -> usize {
        str::len(self)
    }
}

unsafe impl Contiguous for String {
    type Item = u8;

    #[inline]
    fn as_ptr(&self) -> *const u8 {
        str::as_ptr(self)
    }

    #[inline]
    fn len(&self) -> usize {
        String::len(self)
    }
}
