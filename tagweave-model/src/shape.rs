use serde::{Deserialize, Serialize};
use std::fmt;
use tagweave_types::TypeKey;

/// The fixed allow-list of scalar value kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    Boolean,
    Character,
    Integer,
    Decimal,
    DateTime,
    TimeSpan,
    Identifier,
    String,
}

impl ScalarKind {
    /// Lower-case name used in messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Character => "character",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::DateTime => "date/time",
            Self::TimeSpan => "time span",
            Self::Identifier => "identifier",
            Self::String => "string",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a single value, list element or map value is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Scalar(ScalarKind),
    /// A reference to an entity of the given type, encoded as its tag.
    Reference(TypeKey),
}

/// The classification of one entity member.
///
/// Every member falls in exactly one shape. `Unsupported` members are
/// skipped by both encoder and decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Scalar(ScalarKind),
    NullableScalar(ScalarKind),
    Reference(TypeKey),
    NullableReference(TypeKey),
    ScalarList(ScalarKind),
    RefList(TypeKey),
    ScalarMap(ScalarKind),
    RefMap(TypeKey),
    Unsupported,
}

impl Shape {
    /// Shape of a required single value.
    #[must_use]
    pub const fn single(element: ElementKind) -> Self {
        match element {
            ElementKind::Scalar(kind) => Self::Scalar(kind),
            ElementKind::Reference(key) => Self::Reference(key),
        }
    }

    /// Shape of an optional single value.
    #[must_use]
    pub const fn nullable(element: ElementKind) -> Self {
        match element {
            ElementKind::Scalar(kind) => Self::NullableScalar(kind),
            ElementKind::Reference(key) => Self::NullableReference(key),
        }
    }

    /// Shape of an ordered sequence.
    #[must_use]
    pub const fn list(element: ElementKind) -> Self {
        match element {
            ElementKind::Scalar(kind) => Self::ScalarList(kind),
            ElementKind::Reference(key) => Self::RefList(key),
        }
    }

    /// Shape of a string-keyed map.
    #[must_use]
    pub const fn map(element: ElementKind) -> Self {
        match element {
            ElementKind::Scalar(kind) => Self::ScalarMap(kind),
            ElementKind::Reference(key) => Self::RefMap(key),
        }
    }

    /// The element (or value) type, if the member is supported.
    #[must_use]
    pub const fn element(&self) -> Option<ElementKind> {
        match *self {
            Self::Scalar(kind)
            | Self::NullableScalar(kind)
            | Self::ScalarList(kind)
            | Self::ScalarMap(kind) => Some(ElementKind::Scalar(kind)),
            Self::Reference(key)
            | Self::NullableReference(key)
            | Self::RefList(key)
            | Self::RefMap(key) => Some(ElementKind::Reference(key)),
            Self::Unsupported => None,
        }
    }

    /// The referenced entity type, for reference-bearing shapes.
    #[must_use]
    pub const fn target(&self) -> Option<TypeKey> {
        match self.element() {
            Some(ElementKind::Reference(key)) => Some(key),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported)
    }

    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        matches!(self, Self::NullableScalar(_) | Self::NullableReference(_))
    }

    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, Self::ScalarList(_) | Self::RefList(_))
    }

    #[must_use]
    pub const fn is_map(&self) -> bool {
        matches!(self, Self::ScalarMap(_) | Self::RefMap(_))
    }
}
