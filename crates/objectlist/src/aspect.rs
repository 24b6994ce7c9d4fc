//! Aspect access: resolving dotted member paths against model objects.
//!
//! Model types opt in by implementing [`Reflect`], which is an explicit
//! table of named members. A column parses its aspect name into an
//! [`AspectPath`] once, when it is configured, and then walks it for every
//! row.
//!
//! Reading never fails from the caller's point of view. A segment the target
//! does not have produces the diagnostic text
//! `Cannot invoke '<segment>' on a <type>` as the cell value, and a null
//! along the way yields [`AspectValue::Null`]. Writing goes to every segment
//! but the last, then assigns the last one; failed writes are reported as
//! [`AspectError`] for the caller to log and drop.
//!
//! # Example
//!
//! ```
//! use objectlist::{AspectError, AspectPath, AspectValue, Member, Reflect};
//!
//! struct Address {
//!     postcode: String,
//! }
//!
//! struct Person {
//!     name: String,
//!     address: Option<Address>,
//! }
//!
//! impl Reflect for Address {
//!     fn member(&self, name: &str) -> Option<Member<'_>> {
//!         match name {
//!             "Postcode" => Some(Member::Value(self.postcode.clone().into())),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! impl Reflect for Person {
//!     fn member(&self, name: &str) -> Option<Member<'_>> {
//!         match name {
//!             "Name" => Some(Member::Value(self.name.clone().into())),
//!             "Address" => Some(Member::object(self.address.as_ref())),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let person = Person {
//!     name: "Ann".into(),
//!     address: Some(Address { postcode: "4000".into() }),
//! };
//! let path = AspectPath::parse("Address.Postcode").unwrap();
//! assert_eq!(path.get(&person), AspectValue::from("4000"));
//!
//! let bad = AspectPath::parse("Address.Zip").unwrap();
//! assert_eq!(bad.get(&person), AspectValue::from("Cannot invoke 'Zip' on a Address"));
//! ```

use std::fmt;

use objectlist_core::logging::targets;

use crate::error::AspectError;
use crate::value::AspectValue;

/// The result of looking up one member on a model object.
pub enum Member<'a> {
    /// A leaf value.
    Value(AspectValue),
    /// A nested object that further segments can be resolved against.
    Object(&'a dyn Reflect),
}

impl<'a> Member<'a> {
    /// Wrap an optional nested object, mapping `None` to a null value.
    pub fn object<R: Reflect>(object: Option<&'a R>) -> Self {
        match object {
            Some(r) => Member::Object(r),
            None => Member::Value(AspectValue::Null),
        }
    }
}

impl fmt::Debug for Member<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Member::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Member::Object(o) => f.debug_tuple("Object").field(&o.type_name()).finish(),
        }
    }
}

/// Named-member access to a model object.
///
/// Only [`member`](Reflect::member) is required. Types whose cells can be
/// edited also implement [`set_member`](Reflect::set_member), and types with
/// editable nested objects implement [`member_mut`](Reflect::member_mut).
pub trait Reflect {
    /// Look up a readable member. `None` means the type has no such member.
    fn member(&self, name: &str) -> Option<Member<'_>>;

    /// Look up a nested object for writing through.
    fn member_mut(&mut self, _name: &str) -> Option<&mut dyn Reflect> {
        None
    }

    /// Assign a member.
    fn set_member(&mut self, name: &str, _value: AspectValue) -> Result<(), AspectError> {
        match self.member(name) {
            Some(_) => Err(AspectError::read_only(name, self.type_name())),
            None => Err(AspectError::missing_member(name, self.type_name())),
        }
    }

    /// Short type name used in diagnostics.
    fn type_name(&self) -> &str {
        short_type_name(std::any::type_name::<Self>())
    }
}

/// Strip the module path from a fully qualified type name.
fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    match base.rfind("::") {
        Some(pos) => &full[pos + 2..],
        None => full,
    }
}

/// A parsed dotted member path such as `Owner.Address.Postcode`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AspectPath {
    segments: Vec<String>,
}

impl AspectPath {
    /// Parse a dotted path. Whitespace around segments is trimmed.
    pub fn parse(path: &str) -> Result<Self, AspectError> {
        let path = path.trim();
        if path.is_empty() {
            return Err(AspectError::EmptyPath);
        }
        Ok(Self {
            segments: path.split('.').map(|s| s.trim().to_owned()).collect(),
        })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Resolve the path, reporting the first segment that cannot be found.
    pub fn resolve(&self, model: &dyn Reflect) -> Result<AspectValue, AspectError> {
        let mut target = model;
        let last = self.segments.len() - 1;
        for (i, segment) in self.segments.iter().enumerate() {
            match target.member(segment) {
                None => return Err(AspectError::missing_member(segment, target.type_name())),
                Some(Member::Object(next)) if i < last => target = next,
                Some(Member::Object(object)) => {
                    return Ok(AspectValue::Text(object.type_name().to_owned()));
                }
                Some(Member::Value(AspectValue::Null)) => return Ok(AspectValue::Null),
                Some(Member::Value(value)) if i == last => return Ok(value),
                Some(Member::Value(value)) => {
                    return Err(AspectError::missing_member(
                        &self.segments[i + 1],
                        value.type_name(),
                    ));
                }
            }
        }
        Ok(AspectValue::Null)
    }

    /// Resolve the path, turning failures into the diagnostic text.
    pub fn get(&self, model: &dyn Reflect) -> AspectValue {
        match self.resolve(model) {
            Ok(value) => value,
            Err(err) => {
                tracing::debug!(target: targets::ASPECT, path = %self, error = %err, "aspect lookup failed");
                AspectValue::Text(err.to_string())
            }
        }
    }

    /// Assign the value to the last segment.
    pub fn put(&self, model: &mut dyn Reflect, value: AspectValue) -> Result<(), AspectError> {
        let (last, parents) = self
            .segments
            .split_last()
            .ok_or(AspectError::EmptyPath)?;
        let mut target = model;
        for segment in parents {
            let type_name = target.type_name().to_owned();
            let is_null = matches!(
                target.member(segment),
                Some(Member::Value(AspectValue::Null))
            );
            target = match target.member_mut(segment) {
                Some(next) => next,
                None if is_null => return Err(AspectError::NullIntermediate {
                    segment: segment.clone(),
                }),
                None => return Err(AspectError::missing_member(segment, type_name)),
            };
        }
        target.set_member(last, value)
    }
}

impl fmt::Display for AspectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl std::str::FromStr for AspectPath {
    type Err = AspectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Address {
        postcode: String,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Owner {
        address: Option<Address>,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Pet {
        name: String,
        legs: u32,
        owner: Owner,
    }

    impl Reflect for Address {
        fn member(&self, name: &str) -> Option<Member<'_>> {
            match name {
                "Postcode" => Some(Member::Value(self.postcode.clone().into())),
                _ => None,
            }
        }

        fn set_member(&mut self, name: &str, value: AspectValue) -> Result<(), AspectError> {
            match (name, value) {
                ("Postcode", AspectValue::Text(s)) => {
                    self.postcode = s;
                    Ok(())
                }
                ("Postcode", other) => Err(AspectError::type_mismatch(
                    name,
                    "String",
                    other.type_name(),
                )),
                _ => Err(AspectError::missing_member(name, self.type_name())),
            }
        }
    }

    impl Reflect for Owner {
        fn member(&self, name: &str) -> Option<Member<'_>> {
            match name {
                "Address" => Some(Member::object(self.address.as_ref())),
                _ => None,
            }
        }

        fn member_mut(&mut self, name: &str) -> Option<&mut dyn Reflect> {
            match name {
                "Address" => self.address.as_mut().map(|a| a as &mut dyn Reflect),
                _ => None,
            }
        }
    }

    impl Reflect for Pet {
        fn member(&self, name: &str) -> Option<Member<'_>> {
            match name {
                "Name" => Some(Member::Value(self.name.clone().into())),
                "Legs" => Some(Member::Value(self.legs.into())),
                "Owner" => Some(Member::Object(&self.owner)),
                _ => None,
            }
        }

        fn member_mut(&mut self, name: &str) -> Option<&mut dyn Reflect> {
            match name {
                "Owner" => Some(&mut self.owner),
                _ => None,
            }
        }
    }

    fn pet() -> Pet {
        Pet {
            name: "Rex".into(),
            legs: 4,
            owner: Owner {
                address: Some(Address {
                    postcode: "4000".into(),
                }),
            },
        }
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(pet().type_name(), "Pet");
        assert_eq!(short_type_name("a::b::Wrapper<c::D>"), "Wrapper<c::D>");
        assert_eq!(short_type_name("u8"), "u8");
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert_eq!(AspectPath::parse("  "), Err(AspectError::EmptyPath));
        let path: AspectPath = "Owner . Address".parse().unwrap();
        assert_eq!(path.segments(), ["Owner", "Address"]);
        assert_eq!(path.to_string(), "Owner.Address");
    }

    #[test]
    fn test_resolve_nested_path() {
        let path = AspectPath::parse("Owner.Address.Postcode").unwrap();
        assert_eq!(path.get(&pet()), AspectValue::from("4000"));
        assert_eq!(
            AspectPath::parse("Legs").unwrap().get(&pet()),
            AspectValue::UInt(4)
        );
    }

    #[test]
    fn test_null_intermediate_yields_null() {
        let mut p = pet();
        p.owner.address = None;
        let path = AspectPath::parse("Owner.Address.Postcode").unwrap();
        assert_eq!(path.get(&p), AspectValue::Null);
    }

    #[test]
    fn test_missing_member_yields_diagnostic() {
        let path = AspectPath::parse("Owner.Phone").unwrap();
        assert_eq!(
            path.get(&pet()),
            AspectValue::from("Cannot invoke 'Phone' on a Owner")
        );
    }

    #[test]
    fn test_segment_past_a_leaf_yields_diagnostic() {
        let path = AspectPath::parse("Name.Length").unwrap();
        assert_eq!(
            path.get(&pet()),
            AspectValue::from("Cannot invoke 'Length' on a String")
        );
    }

    #[test]
    fn test_put_nested_path() {
        let mut p = pet();
        let path = AspectPath::parse("Owner.Address.Postcode").unwrap();
        path.put(&mut p, AspectValue::from("2000")).unwrap();
        assert_eq!(p.owner.address.unwrap().postcode, "2000");
    }

    #[test]
    fn test_put_failures() {
        let mut p = pet();
        let read_only = AspectPath::parse("Name").unwrap();
        assert_eq!(
            read_only.put(&mut p, AspectValue::from("Max")),
            Err(AspectError::read_only("Name", "Pet"))
        );

        let mismatch = AspectPath::parse("Owner.Address.Postcode").unwrap();
        assert!(matches!(
            mismatch.put(&mut p, AspectValue::Int(1)),
            Err(AspectError::TypeMismatch { .. })
        ));

        p.owner.address = None;
        assert!(matches!(
            mismatch.put(&mut p, AspectValue::from("1")),
            Err(AspectError::NullIntermediate { .. })
        ));
        assert_eq!(p.name, "Rex");
    }
}
