//! Shared fixtures for registry tests.

#![allow(dead_code)]

use std::sync::OnceLock;
use tagweave_model::{Entity, EntityId, Tag, TypeDescriptor};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arch {
    pub id: EntityId,
    pub tag: Tag,
    pub int_value: i32,
    pub string_value: String,
}

impl Arch {
    pub fn new(int_value: i32, string_value: &str, tag: &str) -> Self {
        Self {
            id: EntityId::new(),
            tag: Tag::new(tag).unwrap(),
            int_value,
            string_value: string_value.to_string(),
        }
    }
}

impl Entity for Arch {
    const TYPE_NAME: &'static str = "Arch";

    fn descriptor() -> &'static TypeDescriptor<Self> {
        static DESCRIPTOR: OnceLock<TypeDescriptor<Arch>> = OnceLock::new();
        DESCRIPTOR.get_or_init(|| {
            TypeDescriptor::<Self>::builder()
                .member("IntValue", |a| &a.int_value, |a| &mut a.int_value)
                .member("StringValue", |a| &a.string_value, |a| &mut a.string_value)
                .build()
        })
    }

    fn id(&self) -> EntityId {
        self.id
    }

    fn tag(&self) -> &Tag {
        &self.tag
    }

    fn assign_key(&mut self, id: EntityId, tag: Tag) {
        self.id = id;
        self.tag = tag;
    }
}

pub fn tag(s: &str) -> Tag {
    Tag::new(s).unwrap()
}
