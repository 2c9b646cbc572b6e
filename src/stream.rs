use crate::Tag;

#[derive(Clone, Debug)]
/// A readable stream of binary data.
pub struct Reader<'a> {
    /// The underlying data of the reader.
    data: &'a [u8],
    /// The current offset in bytes. Is not guaranteed to be in range.
    offset: usize,
}

impl<'a> Reader<'a> {
    /// Create a new readable stream of binary data.
    #[inline]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Create a new readable stream of binary data at a specific position.
    #[inline]
    pub fn new_at(data: &'a [u8], offset: usize) -> Self {
        Self { data, offset }
    }

    /// Returns the current offset.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Try to read `T` from the data.
    #[inline]
    pub fn read<T: Readable<'a>>(&mut self) -> Option<T> {
        T::read(self)
    }

    /// Read a certain number of bytes.
    #[inline]
    pub fn read_bytes(&mut self, len: usize) -> Option<&'a [u8]> {
        let end = self.offset.checked_add(len)?;
        let v = self.data.get(self.offset..end)?;
        self.offset = end;
        Some(v)
    }

    /// Try to read a vector of `count` values of `T`.
    pub fn read_vector<T: Readable<'a>>(&mut self, count: usize) -> Option<Vec<T>> {
        // Check the bounds first so that a bogus count cannot trigger a
        // huge allocation.
        if self.data.len().saturating_sub(self.offset) < count.checked_mul(T::SIZE)? {
            return None;
        }

        let mut res = Vec::with_capacity(count);
        for _ in 0..count {
            res.push(self.read::<T>()?);
        }

        Some(res)
    }

    /// Skip the next `n` bytes from the stream. Returns `None` if that would
    /// move past the end of the data.
    #[inline]
    pub fn skip_bytes(&mut self, n: usize) -> Option<()> {
        self.read_bytes(n).map(|_| ())
    }

    /// Check whether the reader is at the end of the buffer.
    #[inline]
    pub fn at_end(&self) -> bool {
        self.offset >= self.data.len()
    }
}

/// Trait for an object that can be read from a byte stream with a fixed size.
pub trait Readable<'a>: Sized {
    const SIZE: usize;

    fn read(r: &mut Reader<'a>) -> Option<Self>;

    /// Read `Self` at a specific offset in `data`.
    fn read_at(data: &'a [u8], offset: usize) -> Option<Self> {
        Reader::new_at(data, offset).read::<Self>()
    }
}

/// A writable stream of binary data.
pub struct Writer(Vec<u8>);

impl Writer {
    /// Create a new writable stream of binary data.
    #[inline]
    pub fn new() -> Self {
        Self(Vec::with_capacity(1024))
    }

    /// Write `T` into the data.
    #[inline]
    pub fn write<T: Writeable>(&mut self, data: T) {
        data.write(self);
    }

    /// Write every element of a slice.
    #[inline]
    pub fn write_slice<T: Writeable>(&mut self, data: &[T]) {
        for el in data {
            el.write(self);
        }
    }

    /// Give bytes into the writer.
    #[inline]
    pub fn extend(&mut self, bytes: &[u8]) {
        self.0.extend_from_slice(bytes);
    }

    /// Align the contents to a byte boundary.
    #[inline]
    pub fn align(&mut self, to: usize) {
        while self.0.len() % to != 0 {
            self.0.push(0);
        }
    }

    /// The number of written bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return the written bytes.
    #[inline]
    pub fn finish(self) -> Vec<u8> {
        self.0
    }
}

/// Trait for an object that can be written into a byte stream.
pub trait Writeable {
    fn write(&self, w: &mut Writer);
}

impl<T: Writeable + ?Sized> Writeable for &T {
    fn write(&self, w: &mut Writer) {
        T::write(self, w)
    }
}

impl<const N: usize> Readable<'_> for [u8; N] {
    const SIZE: usize = N;

    fn read(r: &mut Reader) -> Option<Self> {
        r.read_bytes(N)?.try_into().ok()
    }
}

impl<const N: usize> Writeable for [u8; N] {
    fn write(&self, w: &mut Writer) {
        w.extend(self)
    }
}

macro_rules! impl_number {
    ($($ty:ty),*) => {
        $(
            impl Readable<'_> for $ty {
                const SIZE: usize = core::mem::size_of::<$ty>();

                #[inline]
                fn read(r: &mut Reader) -> Option<Self> {
                    r.read::<[u8; core::mem::size_of::<$ty>()]>().map(Self::from_be_bytes)
                }
            }

            impl Writeable for $ty {
                #[inline]
                fn write(&self, w: &mut Writer) {
                    w.extend(&self.to_be_bytes());
                }
            }
        )*
    };
}

impl_number!(u8, i8, u16, i16, u32, i32, i64);

impl Readable<'_> for Tag {
    const SIZE: usize = 4;

    fn read(r: &mut Reader) -> Option<Self> {
        r.read::<[u8; 4]>().map(Self)
    }
}

impl Writeable for Tag {
    fn write(&self, w: &mut Writer) {
        w.write::<[u8; 4]>(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_big_endian_numbers() {
        let data = [0x01, 0x02, 0xFF, 0xFE, 0x00, 0x00, 0x00, 0x2A];
        let mut r = Reader::new(&data);
        assert_eq!(r.read::<u16>(), Some(0x0102));
        assert_eq!(r.read::<i16>(), Some(-2));
        assert_eq!(r.read::<u32>(), Some(42));
        assert!(r.at_end());
        assert_eq!(r.read::<u8>(), None);
    }

    #[test]
    fn read_vector_rejects_oversized_counts() {
        let data = [0u8; 6];
        let mut r = Reader::new(&data);
        assert_eq!(r.read_vector::<u16>(4), None);
        assert_eq!(r.offset(), 0);
        assert_eq!(r.read_vector::<u16>(3), Some(vec![0, 0, 0]));
    }

    #[test]
    fn writer_aligns_with_zeros() {
        let mut w = Writer::new();
        w.write::<u8>(7);
        w.write::<i16>(-1);
        w.align(4);
        assert_eq!(w.finish(), vec![7, 0xFF, 0xFF, 0]);
    }
}
