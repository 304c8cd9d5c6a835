//! This is a Rust library with helper routines for reading data in the Avro
//! binary encoding. See [https://avro.apache.org/docs/current/specification/](https://avro.apache.org/docs/current/specification/)
//! for documentation about the format.
//!
//! ```
//! use avro_csv_schema::*;
//!
//! let mut bb = ByteBuffer::new(&[2, 84, 4, 104, 105]);
//! assert_eq!(bb.read_var_long(), Ok(1));
//! assert_eq!(Value::decode_bb(Primitive::Long, &mut bb), Ok(Value::Long(42)));
//! assert_eq!(format!("{:?}", Value::decode_bb(Primitive::String, &mut bb).unwrap()), "\"hi\"");
//! ```

pub mod bb;
pub mod primitive;
pub mod value;

pub use bb::*;
pub use primitive::*;
pub use value::*;
