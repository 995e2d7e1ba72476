//! Static schema: how domain classes map onto the graph
//!
//! One table, total over the known domain classes, consulted by the loader
//! (which reference fields to resolve) and by the mapper/writer (how to
//! serialize). An unknown class tag in the source is a configuration error
//! surfaced once at startup, never per record.

pub mod mapping;

pub use mapping::map_object;

use std::fmt;

/// The closed set of domain classes the importer understands.
///
/// Discriminants index into [`SCHEMA`]; the two must stay in the same order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainClass {
    Pathway,
    Reaction,
    Complex,
    EntityWithAccessionedSequence,
    SimpleEntity,
    ReferenceEntity,
}

impl DomainClass {
    /// Resolve a relational class tag, if it is a known domain class.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "Pathway" => Some(DomainClass::Pathway),
            "Reaction" => Some(DomainClass::Reaction),
            "Complex" => Some(DomainClass::Complex),
            "EntityWithAccessionedSequence" => Some(DomainClass::EntityWithAccessionedSequence),
            "SimpleEntity" => Some(DomainClass::SimpleEntity),
            "ReferenceEntity" => Some(DomainClass::ReferenceEntity),
            _ => None,
        }
    }

    /// The relational class tag.
    pub fn tag(&self) -> &'static str {
        class_spec(*self).tag
    }
}

impl fmt::Display for DomainClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Scalar fields a class copies onto its node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyField {
    DisplayName,
    StableId,
    Species,
    Identifier,
    DatabaseName,
}

impl PropertyField {
    /// Property name used in the target graph.
    pub fn graph_key(&self) -> &'static str {
        match self {
            PropertyField::DisplayName => "displayName",
            PropertyField::StableId => "stId",
            PropertyField::Species => "speciesName",
            PropertyField::Identifier => "identifier",
            PropertyField::DatabaseName => "databaseName",
        }
    }
}

/// Which way the relationship points relative to the owning object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// owner -[type]-> target
    Outgoing,
    /// target -[type]-> owner
    Incoming,
}

/// Whether a reference field holds one target or a fan-out of targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    One,
    Many,
}

/// How one reference field of a class becomes relationships.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceSpec {
    /// Field name in the relational reference table
    pub field: &'static str,
    /// Relationship type written to the graph
    pub rel_type: &'static str,
    pub direction: Direction,
    pub cardinality: Cardinality,
}

/// Complete mapping for one domain class.
#[derive(Debug, Clone, Copy)]
pub struct ClassSpec {
    pub class: DomainClass,
    /// Relational class tag
    pub tag: &'static str,
    /// Node label in the target graph
    pub label: &'static str,
    /// Scalar fields copied as node properties, in order
    pub properties: &'static [PropertyField],
    /// Reference fields and their relationship mapping, in order
    pub references: &'static [ReferenceSpec],
}

const EVENT_PROPERTIES: &[PropertyField] = &[
    PropertyField::DisplayName,
    PropertyField::StableId,
    PropertyField::Species,
];

const REFERENCE_PROPERTIES: &[PropertyField] = &[
    PropertyField::DisplayName,
    PropertyField::Identifier,
    PropertyField::DatabaseName,
];

/// The full schema, ordered to match [`DomainClass`] discriminants.
pub static SCHEMA: &[ClassSpec] = &[
    ClassSpec {
        class: DomainClass::Pathway,
        tag: "Pathway",
        label: "Pathway",
        properties: EVENT_PROPERTIES,
        references: &[ReferenceSpec {
            field: "hasEvent",
            rel_type: "HAS_EVENT",
            direction: Direction::Outgoing,
            cardinality: Cardinality::Many,
        }],
    },
    ClassSpec {
        class: DomainClass::Reaction,
        tag: "Reaction",
        label: "Reaction",
        properties: EVENT_PROPERTIES,
        references: &[
            ReferenceSpec {
                field: "input",
                rel_type: "INPUT",
                direction: Direction::Outgoing,
                cardinality: Cardinality::Many,
            },
            ReferenceSpec {
                field: "output",
                rel_type: "OUTPUT",
                direction: Direction::Outgoing,
                cardinality: Cardinality::Many,
            },
            ReferenceSpec {
                field: "catalyst",
                rel_type: "CATALYST",
                direction: Direction::Outgoing,
                cardinality: Cardinality::One,
            },
            ReferenceSpec {
                field: "precedingEvent",
                rel_type: "PRECEDING_EVENT",
                direction: Direction::Outgoing,
                cardinality: Cardinality::Many,
            },
        ],
    },
    ClassSpec {
        class: DomainClass::Complex,
        tag: "Complex",
        label: "Complex",
        properties: EVENT_PROPERTIES,
        references: &[ReferenceSpec {
            field: "hasComponent",
            rel_type: "HAS_COMPONENT",
            direction: Direction::Outgoing,
            cardinality: Cardinality::Many,
        }],
    },
    ClassSpec {
        class: DomainClass::EntityWithAccessionedSequence,
        tag: "EntityWithAccessionedSequence",
        label: "EntityWithAccessionedSequence",
        properties: EVENT_PROPERTIES,
        references: &[ReferenceSpec {
            field: "referenceEntity",
            rel_type: "REFERENCE_ENTITY",
            direction: Direction::Outgoing,
            cardinality: Cardinality::One,
        }],
    },
    ClassSpec {
        class: DomainClass::SimpleEntity,
        tag: "SimpleEntity",
        label: "SimpleEntity",
        properties: EVENT_PROPERTIES,
        references: &[ReferenceSpec {
            field: "referenceEntity",
            rel_type: "REFERENCE_ENTITY",
            direction: Direction::Outgoing,
            cardinality: Cardinality::One,
        }],
    },
    ClassSpec {
        class: DomainClass::ReferenceEntity,
        tag: "ReferenceEntity",
        label: "ReferenceEntity",
        properties: REFERENCE_PROPERTIES,
        references: &[],
    },
];

/// Look up the spec for a class. Total: every variant has an entry.
pub fn class_spec(class: DomainClass) -> &'static ClassSpec {
    &SCHEMA[class as usize]
}

/// Look up the spec for a relational class tag.
pub fn spec_for_tag(tag: &str) -> Option<&'static ClassSpec> {
    DomainClass::from_tag(tag).map(class_spec)
}

/// Find the reference spec for a field of a class, if the schema knows it.
pub fn reference_spec(spec: &ClassSpec, field: &str) -> Option<&'static ReferenceSpec> {
    class_spec(spec.class)
        .references
        .iter()
        .find(|r| r.field == field)
}

/// Return the class tags the schema does not cover, for startup validation.
pub fn unknown_classes(tags: &[String]) -> Vec<String> {
    tags.iter()
        .filter(|t| DomainClass::from_tag(t).is_none())
        .cloned()
        .collect()
}
