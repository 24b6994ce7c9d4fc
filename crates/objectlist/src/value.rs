//! Aspect values: what a column extracts from a model object.
//!
//! [`AspectValue`] is a tagged optional: [`AspectValue::Null`] stands for both
//! "no object along the path" and "the member holds no value", so there are
//! no sentinel objects anywhere in the engine. The same type doubles as the
//! group key, which is why it implements `Eq` and `Hash` (floats compare and
//! hash by bit pattern).

use std::any::Any;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};

/// A value read from, or written to, a model object's aspect.
#[derive(Debug, Clone, Default)]
pub enum AspectValue {
    /// No value.
    #[default]
    Null,
    /// Boolean data.
    Bool(bool),
    /// Signed integer data.
    Int(i64),
    /// Unsigned integer data.
    UInt(u64),
    /// Floating point data.
    Float(f64),
    /// String data.
    Text(String),
    /// Date and time data.
    DateTime(NaiveDateTime),
}

impl AspectValue {
    /// Whether this is [`AspectValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, AspectValue::Null)
    }

    /// Short name of the variant, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            AspectValue::Null => "null",
            AspectValue::Bool(_) => "bool",
            AspectValue::Int(_) => "i64",
            AspectValue::UInt(_) => "u64",
            AspectValue::Float(_) => "f64",
            AspectValue::Text(_) => "String",
            AspectValue::DateTime(_) => "NaiveDateTime",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AspectValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AspectValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The value as a signed integer, if it is one (or fits in one).
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AspectValue::Int(n) => Some(*n),
            AspectValue::UInt(n) => i64::try_from(*n).ok(),
            _ => None,
        }
    }

    /// The value as a float, for any numeric variant.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AspectValue::Int(n) => Some(*n as f64),
            AspectValue::UInt(n) => Some(*n as f64),
            AspectValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Natural ordering between two values, if they are mutually orderable.
    ///
    /// Strings compare case-insensitively. Numeric variants compare exactly
    /// across each other. Null, NaN and mismatched variants have no ordering.
    pub fn natural_cmp(&self, other: &AspectValue) -> Option<Ordering> {
        use AspectValue::*;
        match (self, other) {
            (Text(a), Text(b)) => Some(compare_ignore_case(a, b)),
            (Bool(a), Bool(b)) => Some(a.cmp(b)),
            (DateTime(a), DateTime(b)) => Some(a.cmp(b)),
            _ => {
                let (a, b) = (self.as_number()?, other.as_number()?);
                if a.is_nan() || b.is_nan() {
                    return None;
                }
                Some(a.cmp(b))
            }
        }
    }

    /// A total order over every value, for sorting.
    ///
    /// Agrees with [`natural_cmp`](Self::natural_cmp) wherever that has an
    /// answer. NaN sorts after every other number. Values of unrelated
    /// variants order by variant: null, bool, number, date, text.
    pub fn total_cmp(&self, other: &AspectValue) -> Ordering {
        use AspectValue::*;
        match (self, other) {
            (Text(a), Text(b)) => compare_ignore_case(a, b),
            (Bool(a), Bool(b)) => a.cmp(b),
            (DateTime(a), DateTime(b)) => a.cmp(b),
            _ => match (self.as_number(), other.as_number()) {
                (Some(a), Some(b)) => a.cmp(b),
                _ => self.rank().cmp(&other.rank()),
            },
        }
    }

    fn as_number(&self) -> Option<Number> {
        match self {
            AspectValue::Int(n) => Some(Number::Int(i128::from(*n))),
            AspectValue::UInt(n) => Some(Number::Int(i128::from(*n))),
            AspectValue::Float(f) => Some(Number::Float(*f)),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            AspectValue::Null => 0,
            AspectValue::Bool(_) => 1,
            AspectValue::Int(_) | AspectValue::UInt(_) | AspectValue::Float(_) => 2,
            AspectValue::DateTime(_) => 3,
            AspectValue::Text(_) => 4,
        }
    }
}

/// Every numeric variant on one line. `i128` holds all of `i64` and `u64`.
#[derive(Debug, Clone, Copy)]
enum Number {
    Int(i128),
    Float(f64),
}

impl Number {
    fn is_nan(self) -> bool {
        matches!(self, Number::Float(f) if f.is_nan())
    }

    fn cmp(self, other: Number) -> Ordering {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a.cmp(&b),
            (Number::Float(a), Number::Float(b)) => compare_floats(a, b),
            (Number::Int(a), Number::Float(b)) => compare_int_float(a, b),
            (Number::Float(a), Number::Int(b)) => compare_int_float(b, a).reverse(),
        }
    }
}

fn compare_floats(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Exact comparison, without rounding the integer to a float.
fn compare_int_float(int: i128, float: f64) -> Ordering {
    const LIMIT: f64 = i128::MAX as f64;
    if float.is_nan() || float >= LIMIT {
        return Ordering::Less;
    }
    if float < -LIMIT {
        return Ordering::Greater;
    }
    let whole = float.trunc();
    match int.cmp(&(whole as i128)) {
        Ordering::Equal => 0.0_f64.partial_cmp(&(float - whole)).unwrap_or(Ordering::Equal),
        unequal => unequal,
    }
}

/// Case-insensitive string comparison used for sorting and group titles.
pub fn compare_ignore_case(a: &str, b: &str) -> Ordering {
    let lower = a.chars().flat_map(char::to_lowercase);
    lower.cmp(b.chars().flat_map(char::to_lowercase))
}

impl fmt::Display for AspectValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AspectValue::Null => Ok(()),
            AspectValue::Bool(b) => write!(f, "{b}"),
            AspectValue::Int(n) => write!(f, "{n}"),
            AspectValue::UInt(n) => write!(f, "{n}"),
            AspectValue::Float(n) => write!(f, "{n}"),
            AspectValue::Text(s) => f.write_str(s),
            AspectValue::DateTime(dt) => write!(f, "{dt}"),
        }
    }
}

impl PartialEq for AspectValue {
    fn eq(&self, other: &Self) -> bool {
        use AspectValue::*;
        match (self, other) {
            (Null, Null) => true,
            (Bool(a), Bool(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (UInt(a), UInt(b)) => a == b,
            (Float(a), Float(b)) => a.to_bits() == b.to_bits(),
            (Text(a), Text(b)) => a == b,
            (DateTime(a), DateTime(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for AspectValue {}

impl Hash for AspectValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            AspectValue::Null => {}
            AspectValue::Bool(b) => b.hash(state),
            AspectValue::Int(n) => n.hash(state),
            AspectValue::UInt(n) => n.hash(state),
            AspectValue::Float(n) => n.to_bits().hash(state),
            AspectValue::Text(s) => s.hash(state),
            AspectValue::DateTime(dt) => dt.hash(state),
        }
    }
}

impl From<bool> for AspectValue {
    fn from(v: bool) -> Self {
        AspectValue::Bool(v)
    }
}

impl From<i32> for AspectValue {
    fn from(v: i32) -> Self {
        AspectValue::Int(i64::from(v))
    }
}

impl From<i64> for AspectValue {
    fn from(v: i64) -> Self {
        AspectValue::Int(v)
    }
}

impl From<u32> for AspectValue {
    fn from(v: u32) -> Self {
        AspectValue::UInt(u64::from(v))
    }
}

impl From<u64> for AspectValue {
    fn from(v: u64) -> Self {
        AspectValue::UInt(v)
    }
}

impl From<f32> for AspectValue {
    fn from(v: f32) -> Self {
        AspectValue::Float(f64::from(v))
    }
}

impl From<f64> for AspectValue {
    fn from(v: f64) -> Self {
        AspectValue::Float(v)
    }
}

impl From<&str> for AspectValue {
    fn from(v: &str) -> Self {
        AspectValue::Text(v.to_owned())
    }
}

impl From<String> for AspectValue {
    fn from(v: String) -> Self {
        AspectValue::Text(v)
    }
}

impl From<&String> for AspectValue {
    fn from(v: &String) -> Self {
        AspectValue::Text(v.clone())
    }
}

impl From<NaiveDateTime> for AspectValue {
    fn from(v: NaiveDateTime) -> Self {
        AspectValue::DateTime(v)
    }
}

impl From<NaiveDate> for AspectValue {
    fn from(v: NaiveDate) -> Self {
        AspectValue::DateTime(v.and_time(chrono::NaiveTime::MIN))
    }
}

impl<V: Into<AspectValue>> From<Option<V>> for AspectValue {
    fn from(v: Option<V>) -> Self {
        v.map_or(AspectValue::Null, Into::into)
    }
}

/// Checkbox state of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CheckState {
    #[default]
    Unchecked,
    Checked,
    /// Partially checked, for rows whose model has mixed state.
    Indeterminate,
}

impl CheckState {
    /// Map an optional boolean onto the tri-state flag.
    pub fn from_option(value: Option<bool>) -> Self {
        match value {
            Some(true) => CheckState::Checked,
            Some(false) => CheckState::Unchecked,
            None => CheckState::Indeterminate,
        }
    }

    /// The state a click on the checkbox moves to.
    pub fn toggled(self) -> Self {
        match self {
            CheckState::Checked => CheckState::Unchecked,
            CheckState::Unchecked | CheckState::Indeterminate => CheckState::Checked,
        }
    }
}

/// Which image a cell shows. Resolving indices and keys into pixels is the
/// host's job.
#[derive(Clone, Default)]
pub enum ImageSelector {
    #[default]
    None,
    /// Index into the host's image registry.
    Index(usize),
    /// Key into the host's image registry.
    Key(String),
    /// An image the host understands directly.
    Handle(Arc<dyn Any + Send + Sync>),
}

impl ImageSelector {
    pub fn is_none(&self) -> bool {
        matches!(self, ImageSelector::None)
    }
}

impl fmt::Debug for ImageSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSelector::None => f.write_str("None"),
            ImageSelector::Index(i) => f.debug_tuple("Index").field(i).finish(),
            ImageSelector::Key(k) => f.debug_tuple("Key").field(k).finish(),
            ImageSelector::Handle(_) => f.write_str("Handle(..)"),
        }
    }
}

impl PartialEq for ImageSelector {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ImageSelector::None, ImageSelector::None) => true,
            (ImageSelector::Index(a), ImageSelector::Index(b)) => a == b,
            (ImageSelector::Key(a), ImageSelector::Key(b)) => a == b,
            (ImageSelector::Handle(a), ImageSelector::Handle(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}
