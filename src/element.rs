//! Which element types a span may be converted between.
//!
//! The rules are enforced at compile time by [`CastElement`] and
//! [`CastElementMut`], and described independently of any concrete type by
//! [`conversion_allowed`].

use bytemuck::{NoUninit, Pod};
use std::ptr::NonNull;

/// Marks that a span of `Self` may be read as a span of `To`.
///
/// ```
/// use span_rs::Span;
///
/// let signed = [-1i32, 2];
/// let unsigned = Span::from_array(&signed).cast::<u32>();
/// assert_eq!(unsigned.as_slice(), [u32::MAX, 2]);
/// ```
///
/// Any [`NoUninit`] element can be read as bytes, including `bool` and
/// `char`. Derive it with `bytemuck` for a struct without padding:
///
/// ```
/// use bytemuck::NoUninit;
/// use span_rs::Span;
///
/// #[derive(NoUninit, Clone, Copy)]
/// #[repr(C)]
/// struct Rgba {
///     r: u8,
///     g: u8,
///     b: u8,
///     a: u8,
/// }
///
/// let pixels = [Rgba { r: 1, g: 2, b: 3, a: 4 }];
/// let bytes = Span::from_array(&pixels).cast::<u8>();
/// assert_eq!(bytes.as_slice(), [1]);
/// ```
///
/// Padding bytes are uninitialized, so padded structs have no byte view:
///
/// ```compile_fail
/// use bytemuck::NoUninit;
///
/// #[derive(NoUninit, Clone, Copy)]
/// #[repr(C)]
/// struct Padded {
///     tag: u8,
///     value: u32,
/// }
/// ```
///
/// # Safety
///
/// `To` must have the same size as `Self`, or be `u8`, with alignment no
/// greater than that of `Self`, and every value of `Self` must be a valid
/// value of `To`.
pub unsafe trait CastElement<To> {}

/// Marks that a mutable span of `Self` may be viewed as a mutable span of
/// `To`.
///
/// Writable byte views need [`Pod`] elements, for which every byte pattern is
/// a valid value.
///
/// # Safety
///
/// As for [`CastElement`], and additionally every value of `To` written
/// through the converted span must be a valid value of `Self`.
pub unsafe trait CastElementMut<To>: CastElement<To> {}

// Same-width integers. `i8 -> u8` is covered by the byte view below.
macro_rules! same_width {
    ($($from:ty => $to:ty),* $(,)?) => {
        $(
        const _: () = assert!(conversion_allowed(
            ElementInfo::integer::<$from>(),
            ElementInfo::integer::<$to>(),
            false,
            true,
        ));
        unsafe impl CastElement<$to> for $from {}
        unsafe impl CastElementMut<$to> for $from {}
        )*
    };
}

same_width!(
    u8 => i8,
    u16 => i16,
    i16 => u16,
    u32 => i32,
    i32 => u32,
    u64 => i64,
    i64 => u64,
    u128 => i128,
    i128 => u128,
    usize => isize,
    isize => usize,
);

#[cfg(target_pointer_width = "64")]
same_width!(
    usize => u64,
    usize => i64,
    isize => u64,
    isize => i64,
    u64 => usize,
    u64 => isize,
    i64 => usize,
    i64 => isize,
);

#[cfg(target_pointer_width = "32")]
same_width!(
    usize => u32,
    usize => i32,
    isize => u32,
    isize => i32,
    u32 => usize,
    u32 => isize,
    i32 => usize,
    i32 => isize,
);

// Byte views.
unsafe impl<T> CastElement<u8> for T where T: NoUninit {}
unsafe impl<T> CastElementMut<u8> for T where T: Pod {}

// Pointer coercions. Only `*mut T -> *const T` can be written back.
unsafe impl<T: ?Sized> CastElement<*const T> for *mut T {}
unsafe impl<T: ?Sized> CastElementMut<*const T> for *mut T {}
unsafe impl<T: ?Sized> CastElement<*const T> for &T {}
unsafe impl<T: ?Sized> CastElement<*mut T> for &mut T {}
unsafe impl<T: ?Sized> CastElement<*const T> for NonNull<T> {}
unsafe impl<T: ?Sized> CastElement<*mut T> for NonNull<T> {}

/// The broad category of an element type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementClass {
    /// A primitive integer.
    Integer,
    /// A raw pointer or reference.
    Pointer,
    /// Anything else.
    Other,
}

/// The properties of an element type that decide span conversions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ElementInfo {
    /// The category of the type.
    pub class: ElementClass,
    /// `size_of` the type.
    pub size: usize,
    /// `align_of` the type.
    pub align: usize,
    /// Whether the elements are read-only, as in a [`Span`] rather than a
    /// [`SpanMut`].
    ///
    /// [`Span`]: crate::Span
    /// [`SpanMut`]: crate::SpanMut
    pub is_const: bool,
}

impl ElementInfo {
    const fn of<T>(class: ElementClass) -> Self {
        Self {
            class,
            size: size_of::<T>(),
            align: align_of::<T>(),
            is_const: false,
        }
    }

    /// Describes a mutable integer element.
    pub const fn integer<T>() -> Self {
        Self::of::<T>(ElementClass::Integer)
    }

    /// Describes a mutable pointer element.
    pub const fn pointer<T>() -> Self {
        Self::of::<T>(ElementClass::Pointer)
    }

    /// Describes a mutable element of any other type.
    pub const fn other<T>() -> Self {
        Self::of::<T>(ElementClass::Other)
    }

    /// The same element, read-only.
    pub const fn into_const(self) -> Self {
        Self {
            is_const: true,
            ..self
        }
    }

    /// Whether this is the single-byte type that byte views use.
    pub const fn is_byte(&self) -> bool {
        matches!(self.class, ElementClass::Integer) && self.size == 1 && self.align == 1
    }
}

/// Whether a span of `from` elements may be converted into a span of `to`
/// elements.
///
/// `same_type` tells whether both describe the same type apart from
/// const-ness, and `implicit` whether a `from` value converts to `to` without
/// a cast.
///
/// 1. The same type may gain const-ness, never lose it.
/// 2. Pointers convert when the pointer itself converts implicitly.
/// 3. Integers convert when they have identical size and alignment and
///    convert implicitly.
/// 4. A read-only byte span accepts any element; a mutable byte span accepts
///    any mutable element.
///
/// Rules 2 and 3 also never drop const-ness.
///
/// ```
/// use span_rs::{ElementInfo, conversion_allowed};
///
/// let int = ElementInfo::integer::<i32>();
/// let uint = ElementInfo::integer::<u32>();
/// let float = ElementInfo::other::<f32>();
/// assert!(conversion_allowed(int, uint, false, true));
/// assert!(!conversion_allowed(int, float, false, true));
/// assert!(!conversion_allowed(int.into_const(), uint, false, true));
/// ```
pub const fn conversion_allowed(
    from: ElementInfo,
    to: ElementInfo,
    same_type: bool,
    implicit: bool,
) -> bool {
    if to.is_byte() && !same_type {
        return to.is_const || !from.is_const;
    }
    let keeps_const = to.is_const || !from.is_const;
    if same_type {
        return keeps_const;
    }
    let pointers = matches!(from.class, ElementClass::Pointer)
        && matches!(to.class, ElementClass::Pointer);
    let integers = matches!(from.class, ElementClass::Integer)
        && matches!(to.class, ElementClass::Integer)
        && from.size == to.size
        && from.align == to.align;
    keeps_const && implicit && (pointers || integers)
}
