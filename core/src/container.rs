//! Reader for Avro object container files.
//!
//! A container is laid out as:
//!
//! ```text
//! "Obj" 0x01 | metadata map<bytes> | sync[16] | block*
//! block = count:long | size:long | payload[size] | sync[16]
//! ```
//!
//! The payload holds `count` records, compressed with the codec named by the
//! `avro.codec` metadata key. Only one block is held in memory at a time.

use std::collections::HashMap;
use std::io::{self, BufRead, BufReader, Read};

use avro_csv_schema::ByteBuffer;

use crate::{
    error::ExportError,
    parser::parse_schema,
    record::Record,
    types::Schema,
    utils::quote,
};

pub const MAGIC: [u8; 4] = [b'O', b'b', b'j', 1];
pub const SYNC_SIZE: usize = 16;
pub const SCHEMA_KEY: &str = "avro.schema";
pub const CODEC_KEY: &str = "avro.codec";

/// Size of the big-endian CRC32 that trails every snappy block.
const SNAPPY_CRC_SIZE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    Null,
    Deflate,
    Snappy,
    Zstandard,
}

impl Codec {
    pub fn from_name(name: &str) -> Result<Codec, ExportError> {
        match name {
            "null" => Ok(Codec::Null),
            "deflate" => Ok(Codec::Deflate),
            "snappy" => Ok(Codec::Snappy),
            "zstandard" => Ok(Codec::Zstandard),
            other => Err(ExportError::Container(format!("unsupported codec {}", quote(other)))),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Codec::Null => "null",
            Codec::Deflate => "deflate",
            Codec::Snappy => "snappy",
            Codec::Zstandard => "zstandard",
        }
    }

    fn decompress(self, payload: Vec<u8>) -> Result<Vec<u8>, ExportError> {
        let failed = |msg: String| {
            ExportError::Container(format!("unable to decompress {} block: {}", self.name(), msg))
        };

        match self {
            Codec::Null => Ok(payload),
            // Raw deflate, without zlib or gzip framing.
            Codec::Deflate => {
                let mut out = Vec::new();
                flate2::read::DeflateDecoder::new(payload.as_slice())
                    .read_to_end(&mut out)
                    .map_err(|e| failed(e.to_string()))?;
                Ok(out)
            }
            Codec::Snappy => {
                if payload.len() < SNAPPY_CRC_SIZE {
                    return Err(failed("missing checksum".to_owned()));
                }
                let (data, crc) = payload.split_at(payload.len() - SNAPPY_CRC_SIZE);
                let out = snap::raw::Decoder::new()
                    .decompress_vec(data)
                    .map_err(|e| failed(e.to_string()))?;
                let expected = u32::from_be_bytes([crc[0], crc[1], crc[2], crc[3]]);
                if crc32fast::hash(&out) != expected {
                    return Err(failed("checksum mismatch".to_owned()));
                }
                Ok(out)
            }
            Codec::Zstandard => {
                zstd::stream::decode_all(payload.as_slice()).map_err(|e| failed(e.to_string()))
            }
        }
    }
}

/// The parsed file header.
#[derive(Debug, Clone)]
pub struct Header {
    pub metadata: HashMap<String, Vec<u8>>,
    pub sync:     [u8; SYNC_SIZE],
    pub codec:    Codec,
}

impl Header {
    fn read<R: Read>(input: &mut R) -> Result<Header, ExportError> {
        let mut magic = [0u8; MAGIC.len()];
        input.read_exact(&mut magic).map_err(framing("header (magic)"))?;
        if magic != MAGIC {
            return Err(ExportError::Container("not an avro object container file".to_owned()));
        }

        let mut metadata = HashMap::new();
        loop {
            let count = read_count(input).map_err(framing("header (metadata)"))?;
            if count == 0 {
                break;
            }
            for _ in 0..count {
                let key = read_len_bytes(input).map_err(framing("header (metadata key)"))?;
                let value = read_len_bytes(input).map_err(framing("header (metadata value)"))?;
                metadata.insert(String::from_utf8_lossy(&key).into_owned(), value);
            }
        }

        let mut sync = [0u8; SYNC_SIZE];
        input.read_exact(&mut sync).map_err(framing("header (sync marker)"))?;

        let codec = match metadata.get(CODEC_KEY) {
            Some(name) => Codec::from_name(&String::from_utf8_lossy(name))?,
            None => Codec::Null,
        };

        Ok(Header { metadata, sync, codec })
    }
}

/// Maps a failed framing read: running out of input is a truncated file,
/// malformed lengths are invalid, anything else comes from the reader.
fn framing(what: &'static str) -> impl Fn(io::Error) -> ExportError {
    move |e| match e.kind() {
        io::ErrorKind::UnexpectedEof => ExportError::Container(format!("truncated {}", what)),
        io::ErrorKind::InvalidData => ExportError::Container(format!("invalid {}", what)),
        _ => ExportError::Io(e),
    }
}

fn invalid(msg: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg)
}

/// Reads one zigzag varint `long` straight off the stream.
fn read_long<R: Read>(input: &mut R) -> io::Result<i64> {
    let mut shift: u32 = 0;
    let mut result: u64 = 0;

    loop {
        let mut byte = [0u8; 1];
        input.read_exact(&mut byte)?;
        let byte = byte[0];
        if shift == 63 && byte > 1 {
            return Err(invalid("varint overflows 64 bits"));
        }
        result |= ((byte & 127) as u64) << shift;
        if (byte & 128) == 0 {
            break;
        }
        shift += 7;
        if shift >= 64 {
            return Err(invalid("varint overflows 64 bits"));
        }
    }

    Ok((if (result & 1) != 0 { !(result >> 1) } else { result >> 1 }) as i64)
}

/// Reads a non-negative length.
fn read_len<R: Read>(input: &mut R) -> io::Result<u64> {
    let len = read_long(input)?;
    u64::try_from(len).map_err(|_| invalid("negative length"))
}

/// Reads exactly `len` bytes. The buffer grows with the data actually read,
/// so a corrupt length cannot force a huge allocation up front.
fn read_exact_vec<R: Read>(input: &mut R, len: u64) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    input.take(len).read_to_end(&mut buf)?;
    if (buf.len() as u64) < len {
        return Err(io::ErrorKind::UnexpectedEof.into());
    }
    Ok(buf)
}

fn read_len_bytes<R: Read>(input: &mut R) -> io::Result<Vec<u8>> {
    let len = read_len(input)?;
    read_exact_vec(input, len)
}

/// Reads a map block count. Negative counts are followed by the block's
/// byte size, which a sequential reader can ignore.
fn read_count<R: Read>(input: &mut R) -> io::Result<u64> {
    let count = read_long(input)?;
    if count < 0 {
        read_long(input)?;
    }
    Ok(count.unsigned_abs())
}

/// Pull-based reader over a container file.
///
/// The schema is parsed once when the reader is created; every record after
/// that is decoded against it. Blocks are read from `input` only when the
/// previous one is used up.
pub struct ContainerReader<R: Read> {
    input:     BufReader<R>,
    header:    Header,
    schema:    Schema,
    block:     Vec<u8>,
    position:  usize,
    remaining: u64,
    index:     u64,
    done:      bool,
}

impl<R: Read> ContainerReader<R> {
    pub fn new(input: R) -> Result<ContainerReader<R>, ExportError> {
        let mut input = BufReader::new(input);
        let header = Header::read(&mut input)?;
        let raw = header
            .metadata
            .get(SCHEMA_KEY)
            .ok_or_else(|| ExportError::Container(format!("missing {} metadata", quote(SCHEMA_KEY))))?;
        let schema = parse_schema(raw)?;

        Ok(ContainerReader {
            input,
            header,
            schema,
            block: Vec::new(),
            position: 0,
            remaining: 0,
            index: 0,
            done: false,
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The schema JSON exactly as stored in the header.
    pub fn raw_schema(&self) -> &[u8] {
        self.header
            .metadata
            .get(SCHEMA_KEY)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn codec(&self) -> Codec {
        self.header.codec
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn metadata(&self, key: &str) -> Option<&[u8]> {
        self.header.metadata.get(key).map(Vec::as_slice)
    }

    /// Number of records returned so far.
    pub fn records_read(&self) -> u64 {
        self.index
    }

    /// Returns the next record, or `Ok(None)` once the file is exhausted.
    pub fn next_record(&mut self) -> Result<Option<Record>, ExportError> {
        while self.remaining == 0 {
            if self.position != self.block.len() {
                return Err(ExportError::Container(format!(
                    "block has {} trailing bytes",
                    self.block.len() - self.position
                )));
            }
            if self.input.fill_buf()?.is_empty() {
                return Ok(None);
            }
            self.read_block()?;
        }

        let mut bb = ByteBuffer::new(&self.block[self.position..]);
        let record = Record::decode_bb(&self.schema, &mut bb)
            .map_err(|msg| ExportError::Decode { index: self.index, msg })?;
        self.position += bb.index();
        self.remaining -= 1;
        self.index += 1;
        Ok(Some(record))
    }

    fn read_block(&mut self) -> Result<(), ExportError> {
        let count = read_long(&mut self.input).map_err(framing("block"))?;
        if count < 0 {
            return Err(ExportError::Container(format!("negative block count {}", count)));
        }
        let size = read_long(&mut self.input).map_err(framing("block"))?;
        if size < 0 {
            return Err(ExportError::Container(format!("negative block size {}", size)));
        }
        let payload = read_exact_vec(&mut self.input, size as u64).map_err(framing("block"))?;

        let mut sync = [0u8; SYNC_SIZE];
        self.input.read_exact(&mut sync).map_err(framing("block"))?;
        if sync != self.header.sync {
            return Err(ExportError::Container("sync marker mismatch".to_owned()));
        }

        self.block = self.header.codec.decompress(payload)?;
        self.position = 0;
        self.remaining = count as u64;
        Ok(())
    }
}

impl<R: Read> Iterator for ContainerReader<R> {
    type Item = Result<Record, ExportError>;

    /// Stops after the first error.
    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
