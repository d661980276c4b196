//! Conversions between member values and JSON.
//!
//! [`Element`] covers the things that may appear alone, in a list or as a map
//! value: scalars from the allow-list and [`Ref`] handles. [`Member`] covers
//! everything a member may be declared as, and is what decides a member's
//! [`Shape`]. Nested collections and non-string map keys have no `Member`
//! impl and cannot be declared.

use crate::{ElementKind, Entity, ModelError, ModelResult, Ref, ScalarKind, Shape};
use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use serde_json::{Map, Number, Value};
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use tagweave_types::{EntityId, Tag, TypeKey};
use uuid::Uuid;

/// Turns tags read from a document into live references.
///
/// Implemented by the load session, which routes each request to the
/// registry of the target type.
pub trait Resolver {
    /// Returns the identifier of the entity tagged `tag`, creating a
    /// placeholder when the tag has not been seen.
    fn resolve_or_create(&mut self, target: TypeKey, tag: &Tag) -> ModelResult<EntityId>;
}

/// A value that can stand alone, sit in a list, or be a map value.
pub trait Element: Sized {
    fn element_kind() -> ElementKind;

    fn encode_element(&self) -> ModelResult<Value>;

    fn decode_element(value: &Value, resolver: &mut dyn Resolver) -> ModelResult<Self>;
}

/// A value that can be declared as an entity member.
pub trait Member: Sized {
    fn shape() -> Shape;

    fn encode_member(&self) -> ModelResult<Value>;

    fn decode_member(value: &Value, resolver: &mut dyn Resolver) -> ModelResult<Self>;
}

// ── Scalars ──────────────────────────────────────────────────────

trait Scalar: Sized {
    const KIND: ScalarKind;

    fn to_json(&self) -> ModelResult<Value>;

    fn from_json(value: &Value) -> ModelResult<Self>;
}

fn invalid(kind: ScalarKind, detail: impl ToString) -> ModelError {
    ModelError::InvalidScalar {
        kind,
        detail: detail.to_string(),
    }
}

fn integer<I: TryFrom<i128>>(value: &Value) -> ModelResult<I> {
    let raw = match value {
        Value::Number(n) => n
            .as_i64()
            .map(i128::from)
            .or_else(|| n.as_u64().map(i128::from))
            .ok_or_else(|| ModelError::mismatch("integer", value))?,
        other => return Err(ModelError::mismatch("integer", other)),
    };
    I::try_from(raw).map_err(|_| invalid(ScalarKind::Integer, format!("{raw} out of range")))
}

fn decimal(value: &Value) -> ModelResult<f64> {
    value
        .as_f64()
        .ok_or_else(|| ModelError::mismatch("decimal", value))
}

fn string(value: &Value) -> ModelResult<&str> {
    value
        .as_str()
        .ok_or_else(|| ModelError::mismatch("string", value))
}

impl Scalar for bool {
    const KIND: ScalarKind = ScalarKind::Boolean;

    fn to_json(&self) -> ModelResult<Value> {
        Ok(Value::Bool(*self))
    }

    fn from_json(value: &Value) -> ModelResult<Self> {
        value
            .as_bool()
            .ok_or_else(|| ModelError::mismatch("boolean", value))
    }
}

impl Scalar for char {
    const KIND: ScalarKind = ScalarKind::Character;

    fn to_json(&self) -> ModelResult<Value> {
        Ok(Value::String(self.to_string()))
    }

    fn from_json(value: &Value) -> ModelResult<Self> {
        let s = string(value)?;
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(invalid(Self::KIND, format!("{s:?} is not a single character"))),
        }
    }
}

macro_rules! integer_scalar {
    ($($ty:ty),*) => {$(
        impl Scalar for $ty {
            const KIND: ScalarKind = ScalarKind::Integer;

            fn to_json(&self) -> ModelResult<Value> {
                Ok(Value::from(*self))
            }

            fn from_json(value: &Value) -> ModelResult<Self> {
                integer(value)
            }
        }
    )*};
}

integer_scalar!(i32, i64, u32, u64);

impl Scalar for f64 {
    const KIND: ScalarKind = ScalarKind::Decimal;

    fn to_json(&self) -> ModelResult<Value> {
        Number::from_f64(*self)
            .map(Value::Number)
            .ok_or_else(|| invalid(Self::KIND, format!("{self} is not finite")))
    }

    fn from_json(value: &Value) -> ModelResult<Self> {
        decimal(value)
    }
}

impl Scalar for f32 {
    const KIND: ScalarKind = ScalarKind::Decimal;

    fn to_json(&self) -> ModelResult<Value> {
        f64::from(*self).to_json()
    }

    fn from_json(value: &Value) -> ModelResult<Self> {
        let wide = decimal(value)?;
        if wide.abs() > f64::from(f32::MAX) {
            return Err(invalid(Self::KIND, format!("{wide} out of range")));
        }
        Ok(wide as f32)
    }
}

impl Scalar for String {
    const KIND: ScalarKind = ScalarKind::String;

    fn to_json(&self) -> ModelResult<Value> {
        Ok(Value::String(self.clone()))
    }

    fn from_json(value: &Value) -> ModelResult<Self> {
        string(value).map(str::to_owned)
    }
}

impl Scalar for DateTime<Utc> {
    const KIND: ScalarKind = ScalarKind::DateTime;

    fn to_json(&self) -> ModelResult<Value> {
        Ok(Value::String(self.to_rfc3339_opts(SecondsFormat::AutoSi, true)))
    }

    /// Accepts the signed extended year written for dates past 9999.
    fn from_json(value: &Value) -> ModelResult<Self> {
        string(value)?
            .parse::<DateTime<Utc>>()
            .map_err(|e| invalid(Self::KIND, e))
    }
}

/// Time spans travel as whole nanoseconds.
impl Scalar for TimeDelta {
    const KIND: ScalarKind = ScalarKind::TimeSpan;

    fn to_json(&self) -> ModelResult<Value> {
        self.num_nanoseconds()
            .map(Value::from)
            .ok_or_else(|| invalid(Self::KIND, "too large for nanosecond precision"))
    }

    fn from_json(value: &Value) -> ModelResult<Self> {
        integer::<i64>(value).map(TimeDelta::nanoseconds)
    }
}

impl Scalar for Uuid {
    const KIND: ScalarKind = ScalarKind::Identifier;

    fn to_json(&self) -> ModelResult<Value> {
        Ok(Value::String(self.to_string()))
    }

    fn from_json(value: &Value) -> ModelResult<Self> {
        Uuid::parse_str(string(value)?).map_err(|e| invalid(Self::KIND, e))
    }
}

impl Scalar for EntityId {
    const KIND: ScalarKind = ScalarKind::Identifier;

    fn to_json(&self) -> ModelResult<Value> {
        Ok(Value::String(self.to_string()))
    }

    fn from_json(value: &Value) -> ModelResult<Self> {
        EntityId::parse(string(value)?).map_err(|e| invalid(Self::KIND, e))
    }
}

macro_rules! scalar_member {
    ($($ty:ty),*) => {$(
        impl Element for $ty {
            fn element_kind() -> ElementKind {
                ElementKind::Scalar(<$ty as Scalar>::KIND)
            }

            fn encode_element(&self) -> ModelResult<Value> {
                Scalar::to_json(self)
            }

            fn decode_element(value: &Value, _resolver: &mut dyn Resolver) -> ModelResult<Self> {
                <$ty as Scalar>::from_json(value)
            }
        }

        impl Member for $ty {
            fn shape() -> Shape {
                Shape::Scalar(<$ty as Scalar>::KIND)
            }

            fn encode_member(&self) -> ModelResult<Value> {
                Scalar::to_json(self)
            }

            fn decode_member(value: &Value, _resolver: &mut dyn Resolver) -> ModelResult<Self> {
                if value.is_null() {
                    return Err(ModelError::UnexpectedNull);
                }
                <$ty as Scalar>::from_json(value)
            }
        }
    )*};
}

scalar_member!(
    bool,
    char,
    i32,
    i64,
    u32,
    u64,
    f32,
    f64,
    String,
    DateTime<Utc>,
    TimeDelta,
    Uuid,
    EntityId
);

// ── References ───────────────────────────────────────────────────

impl<T: Entity> Element for Ref<T> {
    fn element_kind() -> ElementKind {
        ElementKind::Reference(T::type_key())
    }

    fn encode_element(&self) -> ModelResult<Value> {
        if self.is_unset() {
            return Err(ModelError::UnsetReference {
                type_name: T::TYPE_NAME,
            });
        }
        Ok(Value::String(self.tag().as_str().to_owned()))
    }

    fn decode_element(value: &Value, resolver: &mut dyn Resolver) -> ModelResult<Self> {
        let tag = Tag::new(
            value
                .as_str()
                .ok_or_else(|| ModelError::mismatch("tag string", value))?,
        )?;
        let id = resolver.resolve_or_create(T::type_key(), &tag)?;
        Ok(Ref::new(id, tag))
    }
}

impl<T: Entity> Member for Ref<T> {
    fn shape() -> Shape {
        Shape::single(Self::element_kind())
    }

    fn encode_member(&self) -> ModelResult<Value> {
        self.encode_element()
    }

    fn decode_member(value: &Value, resolver: &mut dyn Resolver) -> ModelResult<Self> {
        if value.is_null() {
            return Err(ModelError::UnexpectedNull);
        }
        Self::decode_element(value, resolver)
    }
}

// ── Nullable, list and map members ───────────────────────────────

impl<E: Element> Member for Option<E> {
    fn shape() -> Shape {
        Shape::nullable(E::element_kind())
    }

    fn encode_member(&self) -> ModelResult<Value> {
        match self {
            Some(inner) => inner.encode_element(),
            None => Ok(Value::Null),
        }
    }

    fn decode_member(value: &Value, resolver: &mut dyn Resolver) -> ModelResult<Self> {
        if value.is_null() {
            return Ok(None);
        }
        E::decode_element(value, resolver).map(Some)
    }
}

impl<E: Element> Member for Vec<E> {
    fn shape() -> Shape {
        Shape::list(E::element_kind())
    }

    fn encode_member(&self) -> ModelResult<Value> {
        self.iter()
            .map(Element::encode_element)
            .collect::<ModelResult<Vec<_>>>()
            .map(Value::Array)
    }

    fn decode_member(value: &Value, resolver: &mut dyn Resolver) -> ModelResult<Self> {
        value
            .as_array()
            .ok_or_else(|| ModelError::mismatch("array", value))?
            .iter()
            .map(|item| E::decode_element(item, resolver))
            .collect()
    }
}

fn encode_entries<'a, E: Element + 'a>(
    entries: impl Iterator<Item = (&'a String, &'a E)>,
) -> ModelResult<Value> {
    let mut sorted: Vec<_> = entries.collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let mut object = Map::with_capacity(sorted.len());
    for (key, item) in sorted {
        object.insert(key.clone(), item.encode_element()?);
    }
    Ok(Value::Object(object))
}

fn decode_entries<E: Element, C: FromIterator<(String, E)>>(
    value: &Value,
    resolver: &mut dyn Resolver,
) -> ModelResult<C> {
    value
        .as_object()
        .ok_or_else(|| ModelError::mismatch("object", value))?
        .iter()
        .map(|(key, item)| E::decode_element(item, resolver).map(|decoded| (key.clone(), decoded)))
        .collect()
}

impl<E: Element, S: BuildHasher + Default> Member for HashMap<String, E, S> {
    fn shape() -> Shape {
        Shape::map(E::element_kind())
    }

    fn encode_member(&self) -> ModelResult<Value> {
        encode_entries(self.iter())
    }

    fn decode_member(value: &Value, resolver: &mut dyn Resolver) -> ModelResult<Self> {
        decode_entries(value, resolver)
    }
}

impl<E: Element> Member for BTreeMap<String, E> {
    fn shape() -> Shape {
        Shape::map(E::element_kind())
    }

    fn encode_member(&self) -> ModelResult<Value> {
        encode_entries(self.iter())
    }

    fn decode_member(value: &Value, resolver: &mut dyn Resolver) -> ModelResult<Self> {
        decode_entries(value, resolver)
    }
}
