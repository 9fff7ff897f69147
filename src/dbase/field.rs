use std::fmt::{self, Display, Formatter};

use chrono::NaiveDate;

/// dBASE III column type, stored as one ASCII letter in the field descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DbaseFieldType {
    Character,
    Numeric,
    Float,
    Logical,
    Date,
    /// Any other type letter (memo, binary, ...). Decoding such a field fails.
    Other(char),
}

impl DbaseFieldType {
    pub fn from_char(c: char) -> Self {
        match c.to_ascii_uppercase() {
            'C' => DbaseFieldType::Character,
            'N' => DbaseFieldType::Numeric,
            'F' => DbaseFieldType::Float,
            'L' => DbaseFieldType::Logical,
            'D' => DbaseFieldType::Date,
            _ => DbaseFieldType::Other(c),
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            DbaseFieldType::Character => 'C',
            DbaseFieldType::Numeric => 'N',
            DbaseFieldType::Float => 'F',
            DbaseFieldType::Logical => 'L',
            DbaseFieldType::Date => 'D',
            DbaseFieldType::Other(c) => *c,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, DbaseFieldType::Numeric | DbaseFieldType::Float)
    }
}

impl Display for DbaseFieldType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// One column of a DBF table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DbaseFieldDescriptor {
    pub name: String,
    pub field_type: DbaseFieldType,
    pub length: u8,
    pub decimal_count: u8,
}

impl DbaseFieldDescriptor {
    pub fn new(name: &str, field_type: DbaseFieldType, length: u8, decimal_count: u8) -> Self {
        DbaseFieldDescriptor {
            name: name.to_string(),
            field_type,
            length,
            decimal_count,
        }
    }
}

/// Value of one DBF cell.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    IntegerValue(i32),
    RealValue(f64),
    StringValue(String),
    LogicalValue(bool),
    DateValue(NaiveDate),
    Null,
}

impl FieldValue {
    /// Interpret the value as `String`. Returns `None` if the value is something else.
    pub fn into_string(self) -> Option<String> {
        match self {
            FieldValue::StringValue(rv) => Some(rv),
            _ => None,
        }
    }

    /// Interpret the value as `f64`. Integers are widened.
    pub fn into_real(self) -> Option<f64> {
        match self {
            FieldValue::RealValue(rv) => Some(rv),
            FieldValue::IntegerValue(rv) => Some(rv as f64),
            _ => None,
        }
    }

    /// Interpret the value as `i32`. Returns `None` if the value is something else.
    pub fn into_int(self) -> Option<i32> {
        match self {
            FieldValue::IntegerValue(rv) => Some(rv),
            _ => None,
        }
    }

    pub fn into_bool(self) -> Option<bool> {
        match self {
            FieldValue::LogicalValue(rv) => Some(rv),
            _ => None,
        }
    }

    pub fn into_date(self) -> Option<NaiveDate> {
        match self {
            FieldValue::DateValue(rv) => Some(rv),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

macro_rules! impl_from_value {
    ($t:ty, $variant:ident) => {
        impl From<$t> for FieldValue {
            fn from(v: $t) -> Self {
                FieldValue::$variant(v.into())
            }
        }
    };
}

impl_from_value!(i32, IntegerValue);
impl_from_value!(f64, RealValue);
impl_from_value!(String, StringValue);
impl_from_value!(&str, StringValue);
impl_from_value!(bool, LogicalValue);
impl_from_value!(NaiveDate, DateValue);
