use crate::{Extent, Span, SpanMut};
use serde::ser::{Serialize, SerializeSeq, Serializer};

fn serialize_elements<T, S>(elements: &[T], serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    let mut seq = serializer.serialize_seq(Some(elements.len()))?;
    for el in elements {
        seq.serialize_element(el)?;
    }
    seq.end()
}

impl<T, E> Serialize for Span<'_, T, E>
where
    T: Serialize,
    E: Extent,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serialize_elements(self.as_slice(), serializer)
    }
}

impl<T, E> Serialize for SpanMut<'_, T, E>
where
    T: Serialize,
    E: Extent,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serialize_elements(self.as_slice(), serializer)
    }
}
