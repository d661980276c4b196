#![allow(dead_code)]

use chrono::{DateTime, TimeDelta, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;
use tagweave_codec::LoadSession;
use tagweave_model::{Entity, EntityId, Ref, Tag, TypeDescriptor};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

macro_rules! keyed {
    () => {
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
    };
}

/// Archetype: scalars only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arch {
    pub id: EntityId,
    pub tag: Tag,
    pub int_value: i32,
    pub string_value: String,
}

impl Arch {
    pub fn new(tag_str: &str, int_value: i32, string_value: &str) -> Self {
        Self {
            id: EntityId::new(),
            tag: tag(tag_str),
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

    keyed!();
}

/// Instance of an archetype, with one required and one optional reference.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Instance {
    pub id: EntityId,
    pub tag: Tag,
    pub archetype: Ref<Arch>,
    pub archetype_two: Option<Ref<Arch>>,
    pub instance_int_value: i32,
    pub instance_string_value: String,
}

impl Instance {
    pub fn new(tag_str: &str, archetype: &Arch) -> Self {
        Self {
            id: EntityId::new(),
            tag: tag(tag_str),
            archetype: archetype.to_ref(),
            ..Self::default()
        }
    }
}

impl Entity for Instance {
    const TYPE_NAME: &'static str = "Instance";

    fn descriptor() -> &'static TypeDescriptor<Self> {
        static DESCRIPTOR: OnceLock<TypeDescriptor<Instance>> = OnceLock::new();
        DESCRIPTOR.get_or_init(|| {
            TypeDescriptor::<Self>::builder()
                .member("Archetype", |i| &i.archetype, |i| &mut i.archetype)
                .member("ArchetypeTwo", |i| &i.archetype_two, |i| &mut i.archetype_two)
                .member(
                    "InstanceIntValue",
                    |i| &i.instance_int_value,
                    |i| &mut i.instance_int_value,
                )
                .member(
                    "InstanceStringValue",
                    |i| &i.instance_string_value,
                    |i| &mut i.instance_string_value,
                )
                .build()
        })
    }

    keyed!();
}

/// Every collection shape over both scalars and references.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Complex {
    pub id: EntityId,
    pub tag: Tag,
    pub archetype_a: Ref<Arch>,
    pub instance_a: Ref<Instance>,
    pub archetype_nullable_a: Option<Ref<Arch>>,
    pub instance_nullable_a: Option<Ref<Instance>>,
    pub list_archetypes_b: Vec<Ref<Arch>>,
    pub list_instances_b: Vec<Ref<Instance>>,
    pub dictionary_archetypes_c: HashMap<String, Ref<Arch>>,
    pub dictionary_instances_c: BTreeMap<String, Ref<Instance>>,
    pub list_of_ints: Vec<i32>,
    pub list_of_strings: Vec<String>,
    pub dictionary_of_ints: HashMap<String, i32>,
    pub dictionary_of_strings: HashMap<String, String>,
}

impl Entity for Complex {
    const TYPE_NAME: &'static str = "Complex";

    fn descriptor() -> &'static TypeDescriptor<Self> {
        static DESCRIPTOR: OnceLock<TypeDescriptor<Complex>> = OnceLock::new();
        DESCRIPTOR.get_or_init(|| {
            TypeDescriptor::<Self>::builder()
                .member("ArchetypeA", |c| &c.archetype_a, |c| &mut c.archetype_a)
                .member("InstanceA", |c| &c.instance_a, |c| &mut c.instance_a)
                .member(
                    "ArchetypeNullableA",
                    |c| &c.archetype_nullable_a,
                    |c| &mut c.archetype_nullable_a,
                )
                .member(
                    "InstanceNullableA",
                    |c| &c.instance_nullable_a,
                    |c| &mut c.instance_nullable_a,
                )
                .member(
                    "ListArchetypesB",
                    |c| &c.list_archetypes_b,
                    |c| &mut c.list_archetypes_b,
                )
                .member(
                    "ListInstancesB",
                    |c| &c.list_instances_b,
                    |c| &mut c.list_instances_b,
                )
                .member(
                    "DictionaryArchetypesC",
                    |c| &c.dictionary_archetypes_c,
                    |c| &mut c.dictionary_archetypes_c,
                )
                .member(
                    "DictionaryInstancesC",
                    |c| &c.dictionary_instances_c,
                    |c| &mut c.dictionary_instances_c,
                )
                .member("ListOfInts", |c| &c.list_of_ints, |c| &mut c.list_of_ints)
                .member("ListOfStrings", |c| &c.list_of_strings, |c| &mut c.list_of_strings)
                .member(
                    "DictionaryOfInts",
                    |c| &c.dictionary_of_ints,
                    |c| &mut c.dictionary_of_ints,
                )
                .member(
                    "DictionaryOfStrings",
                    |c| &c.dictionary_of_strings,
                    |c| &mut c.dictionary_of_strings,
                )
                .build()
        })
    }

    keyed!();
}

/// Self-referencing type for cycles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    pub id: EntityId,
    pub tag: Tag,
    pub label: String,
    pub next: Option<Ref<Node>>,
    pub peers: Vec<Ref<Node>>,
    pub seen: Option<DateTime<Utc>>,
    pub scratch: Vec<u8>,
}

impl Node {
    pub fn new(tag_str: &str, label: &str) -> Self {
        Self {
            id: EntityId::new(),
            tag: tag(tag_str),
            label: label.to_string(),
            ..Self::default()
        }
    }
}

impl Entity for Node {
    const TYPE_NAME: &'static str = "Node";

    fn descriptor() -> &'static TypeDescriptor<Self> {
        static DESCRIPTOR: OnceLock<TypeDescriptor<Node>> = OnceLock::new();
        DESCRIPTOR.get_or_init(|| {
            TypeDescriptor::<Self>::builder()
                .member("Label", |n| &n.label, |n| &mut n.label)
                .member("Next", |n| &n.next, |n| &mut n.next)
                .member("Peers", |n| &n.peers, |n| &mut n.peers)
                .member("Seen", |n| &n.seen, |n| &mut n.seen)
                .unsupported("Scratch")
                .build()
        })
    }

    keyed!();
}

/// Scalars whose wire form is easy to get subtly wrong.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Gauge {
    pub id: EntityId,
    pub tag: Tag,
    pub reading: f64,
    pub grade: char,
    pub window: TimeDelta,
    pub serial: Uuid,
    pub calibrated: Option<DateTime<Utc>>,
}

impl Entity for Gauge {
    const TYPE_NAME: &'static str = "Gauge";

    fn descriptor() -> &'static TypeDescriptor<Self> {
        static DESCRIPTOR: OnceLock<TypeDescriptor<Gauge>> = OnceLock::new();
        DESCRIPTOR.get_or_init(|| {
            TypeDescriptor::<Self>::builder()
                .member("Reading", |g| &g.reading, |g| &mut g.reading)
                .member("Grade", |g| &g.grade, |g| &mut g.grade)
                .member("Window", |g| &g.window, |g| &mut g.window)
                .member("Serial", |g| &g.serial, |g| &mut g.serial)
                .member("Calibrated", |g| &g.calibrated, |g| &mut g.calibrated)
                .build()
        })
    }

    keyed!();
}

// ── Helpers ──────────────────────────────────────────────────────

pub fn tag(s: &str) -> Tag {
    Tag::new(s).unwrap()
}

/// A session with every fixture type registered.
pub fn session() -> LoadSession {
    init_tracing();
    let mut session = LoadSession::new();
    session.register_type::<Arch>().unwrap();
    session.register_type::<Instance>().unwrap();
    session.register_type::<Complex>().unwrap();
    session.register_type::<Node>().unwrap();
    session.register_type::<Gauge>().unwrap();
    session
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
