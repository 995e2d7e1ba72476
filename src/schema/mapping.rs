//! Mapping from domain objects to graph nodes and relationships

use super::{class_spec, Cardinality, Direction, PropertyField, ReferenceSpec};
use crate::graph::{DbId, GraphNode, GraphRelationship};
use crate::source::record::DomainObject;
use rustc_hash::FxHashMap;

/// Map one domain object onto its node and the relationships its reference
/// fields produce.
///
/// Multi-valued fields aggregate repeated targets into a single relationship
/// carrying `order` (rank of the first occurrence) and `stoichiometry`
/// (number of occurrences), so a reaction consuming two ATP yields one
/// `INPUT` edge with stoichiometry 2 rather than a duplicate edge.
pub fn map_object(obj: &DomainObject) -> (GraphNode, Vec<GraphRelationship>) {
    let spec = class_spec(obj.class);

    let mut node = GraphNode::new(obj.db_id, spec.label);
    for field in spec.properties {
        let key = field.graph_key();
        match field {
            PropertyField::DisplayName => node.set_property(key, obj.display_name.clone()),
            PropertyField::StableId => {
                if let Some(v) = &obj.stable_id {
                    node.set_property(key, v.clone());
                }
            }
            PropertyField::Species => {
                if let Some(v) = &obj.species {
                    node.set_property(key, v.clone());
                }
            }
            PropertyField::Identifier => {
                if let Some(v) = &obj.identifier {
                    node.set_property(key, v.clone());
                }
            }
            PropertyField::DatabaseName => {
                if let Some(v) = &obj.database_name {
                    node.set_property(key, v.clone());
                }
            }
        }
    }

    let mut rels = Vec::new();
    for rspec in spec.references {
        map_reference_field(obj, rspec, &mut rels);
    }

    (node, rels)
}

fn map_reference_field(
    obj: &DomainObject,
    rspec: &'static ReferenceSpec,
    rels: &mut Vec<GraphRelationship>,
) {
    match rspec.cardinality {
        Cardinality::One => {
            // First occurrence wins; further ranks of a single-valued field
            // were already flagged upstream.
            if let Some(r) = obj.refs.iter().find(|r| r.field == rspec.field) {
                rels.push(make_rel(obj.db_id, r.target, rspec));
            }
        }
        Cardinality::Many => {
            // Aggregate repeated targets: (first rank, occurrence count).
            let mut seen: FxHashMap<DbId, usize> = FxHashMap::default();
            let mut aggregated: Vec<(DbId, i32, i64)> = Vec::new();
            for r in obj.refs.iter().filter(|r| r.field == rspec.field) {
                match seen.get(&r.target) {
                    Some(&idx) => aggregated[idx].2 += 1,
                    None => {
                        seen.insert(r.target, aggregated.len());
                        aggregated.push((r.target, r.rank, 1));
                    }
                }
            }
            for (target, rank, count) in aggregated {
                let mut rel = make_rel(obj.db_id, target, rspec);
                rel.set_property("order", rank as i64);
                rel.set_property("stoichiometry", count);
                rels.push(rel);
            }
        }
    }
}

fn make_rel(owner: DbId, target: DbId, rspec: &'static ReferenceSpec) -> GraphRelationship {
    match rspec.direction {
        Direction::Outgoing => GraphRelationship::new(owner, target, rspec.rel_type),
        Direction::Incoming => GraphRelationship::new(target, owner, rspec.rel_type),
    }
}
