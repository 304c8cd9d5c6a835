use crate::{bb::ByteBuffer, primitive::Primitive};

use std::fmt;

/// This type holds one decoded Avro primitive.
///
/// Every value the container reader produces is one of these variants, so
/// consumers match on the variant instead of inspecting type names at runtime.
#[derive(Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Bytes(Vec<u8>),
    String(String),
}

impl Value {
    /// The primitive this value was decoded as.
    pub fn primitive(&self) -> Primitive {
        match *self {
            Value::Null => Primitive::Null,
            Value::Boolean(_) => Primitive::Boolean,
            Value::Int(_) => Primitive::Int,
            Value::Long(_) => Primitive::Long,
            Value::Float(_) => Primitive::Float,
            Value::Double(_) => Primitive::Double,
            Value::Bytes(_) => Primitive::Bytes,
            Value::String(_) => Primitive::String,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(*self, Value::Null)
    }

    /// A convenience method to extract the value out of a [Boolean](#variant.Boolean).
    /// Returns `false` for other value kinds.
    pub fn as_bool(&self) -> bool {
        match *self {
            Value::Boolean(value) => value,
            _ => false,
        }
    }

    /// A convenience method to extract the value out of a [Long](#variant.Long)
    /// or an [Int](#variant.Int). Returns `0` for other value kinds.
    pub fn as_long(&self) -> i64 {
        match *self {
            Value::Long(value) => value,
            Value::Int(value) => value as i64,
            _ => 0,
        }
    }

    /// A convenience method to extract the value out of a [Double](#variant.Double)
    /// or a [Float](#variant.Float). Returns `0.0` for other value kinds.
    pub fn as_double(&self) -> f64 {
        match *self {
            Value::Double(value) => value,
            Value::Float(value) => value as f64,
            _ => 0.0,
        }
    }

    /// A convenience method to extract the value out of a [String](#variant.String).
    /// Returns `""` for other value kinds.
    pub fn as_string(&self) -> &str {
        match *self {
            Value::String(ref value) => value.as_str(),
            _ => "",
        }
    }

    /// Decodes a single value of type `primitive` from `bb` starting at the
    /// current index. After this function returns, the current index will be
    /// advanced past the value.
    pub fn decode_bb(primitive: Primitive, bb: &mut ByteBuffer) -> Result<Value, ()> {
        match primitive {
            Primitive::Null => Ok(Value::Null),
            Primitive::Boolean => Ok(Value::Boolean(bb.read_bool()?)),
            Primitive::Int => Ok(Value::Int(bb.read_var_int()?)),
            Primitive::Long => Ok(Value::Long(bb.read_var_long()?)),
            Primitive::Float => Ok(Value::Float(bb.read_float()?)),
            Primitive::Double => Ok(Value::Double(bb.read_double()?)),
            Primitive::Bytes => Ok(Value::Bytes(bb.read_len_bytes()?.to_vec())),
            Primitive::String => Ok(Value::String(bb.read_string()?.into_owned())),
        }
    }

    /// Decodes a value of type `primitive` from `bytes`.
    pub fn decode(primitive: Primitive, bytes: &[u8]) -> Result<Value, ()> {
        Value::decode_bb(primitive, &mut ByteBuffer::new(bytes))
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match *self {
            Value::Null => write!(f, "null"),
            Value::Boolean(value) => value.fmt(f),
            Value::Int(value) => value.fmt(f),
            Value::Long(value) => value.fmt(f),
            Value::Float(value) => value.fmt(f),
            Value::Double(value) => value.fmt(f),
            Value::Bytes(ref value) => value.fmt(f),
            Value::String(ref value) => value.fmt(f),
        }
    }
}
