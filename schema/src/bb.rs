use std::borrow::Cow;

/// An Avro byte buffer meant for reading.
///
/// Example usage:
///
/// ```
/// use std::borrow::Cow;
/// let mut bb = avro_csv_schema::ByteBuffer::new(&[8, 240, 159, 141, 149, 3]);
/// assert_eq!(bb.read_string(), Ok(Cow::Borrowed("🍕")));
/// assert_eq!(bb.read_var_long(), Ok(-2));
/// ```
///
pub struct ByteBuffer<'a> {
    data: &'a [u8],
    index: usize,
}

impl<'a> ByteBuffer<'a> {
    /// Create a new ByteBuffer that wraps the provided byte slice. The lifetime
    /// of the returned ByteBuffer must not outlive the lifetime of the byte
    /// slice.
    pub fn new(data: &'a [u8]) -> ByteBuffer<'a> {
        ByteBuffer { data, index: 0 }
    }

    /// Retrieves the underlying byte slice.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Retrieves the current index into the underlying byte slice. This starts
    /// off as 0 and ends up as `self.data().len()` when everything has been
    /// read.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of bytes left to read.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.index
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Try to read a boolean value starting at the current index.
    pub fn read_bool(&mut self) -> Result<bool, ()> {
        match self.read_byte() {
            Ok(0) => Ok(false),
            Ok(1) => Ok(true),
            _ => Err(()),
        }
    }

    /// Try to read a byte starting at the current index.
    pub fn read_byte(&mut self) -> Result<u8, ()> {
        if self.index >= self.data.len() {
            Err(())
        } else {
            let value = self.data[self.index];
            self.index += 1;
            Ok(value)
        }
    }

    /// Try to read `len` raw bytes starting at the current index.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], ()> {
        if len > self.remaining() {
            Err(())
        } else {
            let value = &self.data[self.index..self.index + len];
            self.index += len;
            Ok(value)
        }
    }

    /// Try to read a zigzag-encoded variable-length signed 32-bit integer
    /// starting at the current index. Avro `int` values use this encoding.
    pub fn read_var_int(&mut self) -> Result<i32, ()> {
        let value = self.read_var_long()?;
        i32::try_from(value).map_err(|_| ())
    }

    /// Try to read a zigzag-encoded variable-length signed 64-bit integer
    /// starting at the current index. Avro `long` values, lengths and block
    /// counts use this encoding.
    pub fn read_var_long(&mut self) -> Result<i64, ()> {
        let value = self.read_var_ulong()?;
        Ok((if (value & 1) != 0 {
            !(value >> 1)
        } else {
            value >> 1
        }) as i64)
    }

    /// Try to read a variable-length unsigned 64-bit integer starting at the
    /// current index. At most ten bytes are consumed, and the tenth may only
    /// carry the single bit that is left.
    pub fn read_var_ulong(&mut self) -> Result<u64, ()> {
        let mut shift: u32 = 0;
        let mut result: u64 = 0;

        loop {
            if shift >= 64 {
                return Err(());
            }
            let byte = self.read_byte()?;
            if shift == 63 && byte > 1 {
                return Err(());
            }
            result |= ((byte & 127) as u64) << shift;
            shift += 7;

            if (byte & 128) == 0 {
                break;
            }
        }

        Ok(result)
    }

    /// Try to read a little-endian 32-bit floating-point number starting at
    /// the current index.
    pub fn read_float(&mut self) -> Result<f32, ()> {
        let bytes = self.read_bytes(4)?;
        let mut raw = [0u8; 4];
        raw.copy_from_slice(bytes);
        Ok(f32::from_le_bytes(raw))
    }

    /// Try to read a little-endian 64-bit floating-point number starting at
    /// the current index.
    pub fn read_double(&mut self) -> Result<f64, ()> {
        let bytes = self.read_bytes(8)?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(bytes);
        Ok(f64::from_le_bytes(raw))
    }

    /// Try to read a length-prefixed byte sequence starting at the current
    /// index. The returned slice aliases the underlying memory.
    pub fn read_len_bytes(&mut self) -> Result<&'a [u8], ()> {
        let len = self.read_var_long()?;
        if len < 0 {
            return Err(());
        }
        self.read_bytes(usize::try_from(len).map_err(|_| ())?)
    }

    /// Try to read a length-prefixed UTF-8 string starting at the current
    /// index. Invalid sequences become U+FFFD, so the result only allocates
    /// when the input is not valid UTF-8. Use `read_len_bytes` for the raw
    /// bytes.
    pub fn read_string(&mut self) -> Result<Cow<'a, str>, ()> {
        let bytes = self.read_len_bytes()?;
        Ok(String::from_utf8_lossy(bytes))
    }
}

#[test]
fn read_bool() {
    let read = |bytes| ByteBuffer::new(bytes).read_bool();
    assert_eq!(read(&[]), Err(()));
    assert_eq!(read(&[0]), Ok(false));
    assert_eq!(read(&[1]), Ok(true));
    assert_eq!(read(&[2]), Err(()));
}

#[test]
fn read_byte() {
    let read = |bytes| ByteBuffer::new(bytes).read_byte();
    assert_eq!(read(&[]), Err(()));
    assert_eq!(read(&[0]), Ok(0));
    assert_eq!(read(&[1]), Ok(1));
    assert_eq!(read(&[254]), Ok(254));
    assert_eq!(read(&[255]), Ok(255));
}

#[test]
fn read_bytes() {
    let read = |bytes, len| ByteBuffer::new(bytes).read_bytes(len);
    assert_eq!(read(&[], 0), Ok(vec![].as_slice()));
    assert_eq!(read(&[], 1), Err(()));
    assert_eq!(read(&[0], 0), Ok(vec![].as_slice()));
    assert_eq!(read(&[0], 1), Ok(vec![0].as_slice()));
    assert_eq!(read(&[0], 2), Err(()));
    assert_eq!(read(&[0], usize::MAX), Err(()));

    let mut bb = ByteBuffer::new(&[1, 2, 3, 4, 5]);
    assert_eq!(bb.read_bytes(3), Ok(vec![1, 2, 3].as_slice()));
    assert_eq!(bb.remaining(), 2);
    assert_eq!(bb.read_bytes(2), Ok(vec![4, 5].as_slice()));
    assert!(bb.is_empty());
    assert_eq!(bb.read_bytes(1), Err(()));
}

#[test]
fn read_var_int() {
    let read = |bytes| ByteBuffer::new(bytes).read_var_int();
    assert_eq!(read(&[]), Err(()));
    assert_eq!(read(&[0]), Ok(0));
    assert_eq!(read(&[1]), Ok(-1));
    assert_eq!(read(&[2]), Ok(1));
    assert_eq!(read(&[3]), Ok(-2));
    assert_eq!(read(&[4]), Ok(2));
    assert_eq!(read(&[127]), Ok(-64));
    assert_eq!(read(&[128]), Err(()));
    assert_eq!(read(&[128, 1]), Ok(64));
    assert_eq!(read(&[253, 255, 7]), Ok(-65535));
    assert_eq!(read(&[254, 255, 7]), Ok(65535));
    assert_eq!(read(&[254, 255, 255, 255, 15]), Ok(2147483647));
    assert_eq!(read(&[255, 255, 255, 255, 15]), Ok(-2147483648));
    assert_eq!(read(&[128, 128, 128, 128, 16]), Err(()));
}

#[test]
fn read_var_long() {
    let read = |bytes| ByteBuffer::new(bytes).read_var_long();
    assert_eq!(read(&[]), Err(()));
    assert_eq!(read(&[0]), Ok(0));
    assert_eq!(read(&[1]), Ok(-1));
    assert_eq!(read(&[2]), Ok(1));
    assert_eq!(read(&[83]), Ok(-42));
    assert_eq!(read(&[127]), Ok(-64));
    assert_eq!(read(&[128]), Err(()));
    assert_eq!(read(&[128, 1]), Ok(64));
    assert_eq!(read(&[129, 1]), Ok(-65));
    assert_eq!(read(&[128, 128, 128, 128, 16]), Ok(2147483648));
    assert_eq!(
        read(&[0xFE, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01]),
        Ok(i64::MAX)
    );
    assert_eq!(
        read(&[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01]),
        Ok(i64::MIN)
    );
    assert_eq!(
        read(&[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01]),
        Err(())
    );
    // bits past the 64th are never dropped silently
    assert_eq!(
        read(&[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x7F]),
        Err(())
    );
    assert_eq!(
        read(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x02]),
        Err(())
    );
}

#[test]
fn read_floats() {
    let mut bb = ByteBuffer::new(&[0, 0, 192, 63, 0, 0, 0, 0, 0, 0, 248, 63, 0, 0, 0, 0, 0, 0, 0, 192]);
    assert_eq!(bb.read_float(), Ok(1.5));
    assert_eq!(bb.read_double(), Ok(1.5));
    assert_eq!(bb.read_double(), Ok(-2.0));
    assert_eq!(bb.read_double(), Err(()));
}

#[test]
fn read_string() {
    let read = |bytes| ByteBuffer::new(bytes).read_string();
    assert_eq!(read(&[]), Err(()));
    assert_eq!(read(&[0]), Ok(Cow::Borrowed("")));
    assert_eq!(read(&[2]), Err(()));
    assert_eq!(read(&[1, 97]), Err(()));
    assert_eq!(read(&[2, 97]), Ok(Cow::Borrowed("a")));
    assert_eq!(read(&[6, 97, 98, 99]), Ok(Cow::Borrowed("abc")));
    assert_eq!(read(&[8, 240, 159, 141, 149]), Ok(Cow::Borrowed("🍕")));
    assert_eq!(
        read(&[10, 97, 237, 160, 188, 99]),
        Ok(Cow::Owned("a\u{FFFD}\u{FFFD}\u{FFFD}c".to_owned()))
    );
}

#[test]
fn read_sequence() {
    let mut bb = ByteBuffer::new(&[2, 4, 104, 105, 1, 0, 0, 0, 0, 0, 0, 248, 63]);
    assert_eq!(bb.read_var_long(), Ok(1));
    assert_eq!(bb.read_string(), Ok(Cow::Borrowed("hi")));
    assert_eq!(bb.read_bool(), Ok(true));
    assert_eq!(bb.read_double(), Ok(1.5));
    assert_eq!(bb.index(), bb.data().len());
}
