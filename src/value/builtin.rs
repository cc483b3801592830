//! Built-in value kinds
//!
//! Pre-registered in every [`TypeRegistry`](super::TypeRegistry). Integer,
//! boolean and text values are ordered and can serve as vertex ids.

use super::{read_serde, write_serde, TypedValue};
use crate::error::CodecError;
use std::fmt;

/// The "no value" sentinel. Edges typed with it carry no value at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NullValue;

impl TypedValue for NullValue {
    const TYPE_NAME: &'static str = "vertrace.null";

    fn write_bytes(&self, _out: &mut Vec<u8>) -> Result<(), CodecError> {
        Ok(())
    }

    fn read_bytes(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        if bytes.is_empty() {
            Ok(())
        } else {
            Err(CodecError::Malformed {
                type_name: Self::TYPE_NAME.to_string(),
                reason: format!("expected no bytes, found {}", bytes.len()),
            })
        }
    }
}

impl fmt::Display for NullValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("null")
    }
}

macro_rules! serde_value {
    ($name:ident, $inner:ty, $type_name:literal) => {
        impl TypedValue for $name {
            const TYPE_NAME: &'static str = $type_name;

            fn write_bytes(&self, out: &mut Vec<u8>) -> Result<(), CodecError> {
                write_serde(&self.0, Self::TYPE_NAME, out)
            }

            fn read_bytes(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
                self.0 = read_serde::<$inner>(bytes, Self::TYPE_NAME)?;
                Ok(())
            }
        }

        impl From<$inner> for $name {
            fn from(value: $inner) -> Self {
                $name(value)
            }
        }
    };
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BoolValue(pub bool);
serde_value!(BoolValue, bool, "vertrace.bool");

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IntValue(pub i32);
serde_value!(IntValue, i32, "vertrace.int");

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LongValue(pub i64);
serde_value!(LongValue, i64, "vertrace.long");

#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct FloatValue(pub f32);
serde_value!(FloatValue, f32, "vertrace.float");

#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct DoubleValue(pub f64);
serde_value!(DoubleValue, f64, "vertrace.double");

#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextValue(pub String);
serde_value!(TextValue, String, "vertrace.text");

/// Ordered list of longs, e.g. candidate ids collected by a vertex.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LongListValue(pub Vec<i64>);
serde_value!(LongListValue, Vec<i64>, "vertrace.long_list");

impl fmt::Display for BoolValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for IntValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for LongValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for FloatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for DoubleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for TextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for LongListValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items: Vec<String> = self.0.iter().map(|v| v.to_string()).collect();
        write!(f, "[{}]", items.join(", "))
    }
}
