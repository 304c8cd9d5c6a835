//! Hand-encodes small container files for the integration tests.

#![allow(dead_code)]

use std::io::Write;

pub const SYNC: [u8; 16] = *b"0123456789abcdef";

pub fn write_long(buf: &mut Vec<u8>, value: i64) {
    let mut n = ((value << 1) ^ (value >> 63)) as u64;
    loop {
        if n & !0x7f == 0 {
            buf.push(n as u8);
            return;
        }
        buf.push((n & 0x7f) as u8 | 0x80);
        n >>= 7;
    }
}

pub fn write_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    write_long(buf, bytes.len() as i64);
    buf.extend_from_slice(bytes);
}

pub fn write_string(buf: &mut Vec<u8>, text: &str) {
    write_bytes(buf, text.as_bytes());
}

pub fn write_double(buf: &mut Vec<u8>, value: f64) {
    buf.extend_from_slice(&value.to_le_bytes());
}

pub fn write_bool(buf: &mut Vec<u8>, value: bool) {
    buf.push(value as u8);
}

/// Builds one record body with a closure over the output buffer.
pub fn record(build: impl FnOnce(&mut Vec<u8>)) -> Vec<u8> {
    let mut buf = Vec::new();
    build(&mut buf);
    buf
}

pub struct OcfBuilder {
    schema: String,
    codec:  Option<String>,
    sync:   [u8; 16],
    blocks: Vec<Vec<Vec<u8>>>,
}

impl OcfBuilder {
    pub fn new(schema: &str) -> OcfBuilder {
        OcfBuilder {
            schema: schema.to_owned(),
            codec:  None,
            sync:   SYNC,
            blocks: Vec::new(),
        }
    }

    pub fn codec(mut self, codec: &str) -> OcfBuilder {
        self.codec = Some(codec.to_owned());
        self
    }

    pub fn block(mut self, records: Vec<Vec<u8>>) -> OcfBuilder {
        self.blocks.push(records);
        self
    }

    pub fn header(&self) -> Vec<u8> {
        let mut buf = b"Obj\x01".to_vec();
        let entries = if self.codec.is_some() { 2 } else { 1 };
        write_long(&mut buf, entries);
        write_string(&mut buf, "avro.schema");
        write_bytes(&mut buf, self.schema.as_bytes());
        if let Some(codec) = &self.codec {
            write_string(&mut buf, "avro.codec");
            write_bytes(&mut buf, codec.as_bytes());
        }
        write_long(&mut buf, 0);
        buf.extend_from_slice(&self.sync);
        buf
    }

    pub fn build(&self) -> Vec<u8> {
        let mut buf = self.header();
        for records in &self.blocks {
            let payload: Vec<u8> = records.concat();
            let payload = compress(self.codec.as_deref(), payload);
            write_long(&mut buf, records.len() as i64);
            write_long(&mut buf, payload.len() as i64);
            buf.extend_from_slice(&payload);
            buf.extend_from_slice(&self.sync);
        }
        buf
    }
}

/// Compresses a block payload the way each codec stores it on disk.
pub fn compress(codec: Option<&str>, payload: Vec<u8>) -> Vec<u8> {
    match codec {
        Some("deflate") => {
            let mut encoder =
                flate2::write::DeflateEncoder::new(Vec::new(), flate2::Compression::default());
            encoder.write_all(&payload).unwrap();
            encoder.finish().unwrap()
        }
        Some("snappy") => {
            let mut out = snap::raw::Encoder::new().compress_vec(&payload).unwrap();
            out.extend_from_slice(&crc32fast::hash(&payload).to_be_bytes());
            out
        }
        Some("zstandard") => zstd::stream::encode_all(payload.as_slice(), 0).unwrap(),
        _ => payload,
    }
}

pub const ID_NOTE_SCHEMA: &str = r#"{
    "type": "record",
    "name": "Note",
    "namespace": "com.example",
    "fields": [
        {"name": "id", "type": ["long"]},
        {"name": "note", "type": ["null", "string"]}
    ]
}"#;

/// `{id: 1, note: "hi"}` and `{id: 2, note: null}` under `ID_NOTE_SCHEMA`.
pub fn id_note_records() -> Vec<Vec<u8>> {
    vec![
        record(|b| {
            write_long(b, 0);
            write_long(b, 1);
            write_long(b, 1);
            write_string(b, "hi");
        }),
        record(|b| {
            write_long(b, 0);
            write_long(b, 2);
            write_long(b, 0);
        }),
    ]
}
