//! Relation member resolution.

use log::warn;
use osmgraph_core::{EdgeEvent, EntityRef, Properties};

/// A `<member>` element as read, before resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberDescriptor {
    /// Declared `type` attribute.
    pub kind: Option<String>,
    /// Declared `ref` attribute.
    pub reference: Option<String>,
    /// Declared `role` attribute.
    pub role: Option<String>,
}

impl MemberDescriptor {
    /// Descriptor from raw attribute values.
    #[must_use]
    pub fn new(kind: Option<&str>, reference: Option<&str>, role: Option<&str>) -> Self {
        Self {
            kind: kind.map(str::to_owned),
            reference: reference.map(str::to_owned),
            role: role.map(str::to_owned),
        }
    }
}

/// A member that survived resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Resolved member entity.
    pub entity: EntityRef,
    /// Non-empty role.
    pub role: Option<String>,
}

/// A relation with its members resolved.
///
/// Members with a missing or unknown `type`, a `ref` that is not an integer,
/// a reference to the relation itself, or that repeat the preceding member
/// are skipped with a warning. The relation is kept even when no member
/// survives.
///
/// # Examples
/// ```
/// use osmgraph_core::{EntityRef, Properties};
/// use osmgraph_data::{MemberDescriptor, RelationPlan};
///
/// let members = [
///     MemberDescriptor::new(Some("way"), Some("10"), Some("outer")),
///     MemberDescriptor::new(Some("way"), Some("10"), Some("outer")),
///     MemberDescriptor::new(Some("relation"), Some("4"), None),
///     MemberDescriptor::new(Some("area"), Some("11"), None),
/// ];
/// let plan = RelationPlan::resolve(4, Properties::new(), &members);
///
/// assert_eq!(plan.members().len(), 1);
/// assert_eq!(plan.members()[0].entity, EntityRef::Way(10));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RelationPlan {
    osm_id: i64,
    properties: Properties,
    members: Vec<Member>,
}

impl RelationPlan {
    /// Resolve `descriptors` for relation `osm_id`.
    #[must_use]
    pub fn resolve(osm_id: i64, properties: Properties, descriptors: &[MemberDescriptor]) -> Self {
        let mut members: Vec<Member> = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            let Some(entity) = resolve_entity(osm_id, descriptor) else {
                continue;
            };
            if entity == EntityRef::Relation(osm_id) {
                warn!("relation {osm_id} lists itself as a member; skipped");
                continue;
            }
            let role = descriptor
                .role
                .as_deref()
                .filter(|role| !role.is_empty())
                .map(str::to_owned);
            let member = Member { entity, role };
            if members.last() == Some(&member) {
                warn!(
                    "relation {osm_id} repeats member {} consecutively; skipped",
                    member.entity
                );
                continue;
            }
            members.push(member);
        }
        Self {
            osm_id,
            properties,
            members,
        }
    }

    /// OSM id of the relation.
    #[must_use]
    pub const fn osm_id(&self) -> i64 {
        self.osm_id
    }

    /// Coerced attributes.
    #[must_use]
    pub const fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Surviving members in document order.
    #[must_use]
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Attributes, consuming the plan.
    #[must_use]
    pub fn into_properties(self) -> Properties {
        self.properties
    }

    /// One `MEMBER` edge per surviving member.
    pub fn edge_events(&self) -> impl Iterator<Item = EdgeEvent> + '_ {
        self.members.iter().map(|member| EdgeEvent::Member {
            relation_id: self.osm_id,
            member: member.entity.clone(),
            role: member.role.clone(),
        })
    }
}

fn resolve_entity(osm_id: i64, descriptor: &MemberDescriptor) -> Option<EntityRef> {
    let Some(reference) = descriptor.reference.as_deref() else {
        warn!("relation {osm_id} has a member without ref; skipped");
        return None;
    };
    let Ok(id) = reference.trim().parse::<i64>() else {
        warn!("relation {osm_id} member ref `{reference}` is not an integer; skipped");
        return None;
    };
    match descriptor.kind.as_deref() {
        Some("node") => Some(EntityRef::Node(id)),
        Some("way") => Some(EntityRef::Way(id)),
        Some("relation") => Some(EntityRef::Relation(id)),
        Some(other) => {
            warn!("relation {osm_id} member {reference} has unknown type `{other}`; skipped");
            None
        }
        None => {
            warn!("relation {osm_id} member {reference} has no type; skipped");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn member(kind: &str, reference: &str, role: &str) -> MemberDescriptor {
        MemberDescriptor::new(Some(kind), Some(reference), Some(role))
    }

    #[rstest]
    fn roles_are_carried_only_when_non_empty() {
        let plan = RelationPlan::resolve(
            1,
            Properties::new(),
            &[member("node", "5", ""), member("way", "6", "inner")],
        );
        let edges: Vec<_> = plan.edge_events().collect();
        assert_eq!(edges.len(), 2);
        assert!(edges.first().is_some_and(|edge| edge.properties().is_empty()));
        assert_eq!(
            edges.get(1).and_then(|edge| edge.properties().get_str("role").map(str::to_owned)),
            Some("inner".to_owned())
        );
    }

    #[rstest]
    fn same_ref_with_other_role_is_not_a_duplicate() {
        let plan = RelationPlan::resolve(
            1,
            Properties::new(),
            &[member("way", "6", "outer"), member("way", "6", "inner")],
        );
        assert_eq!(plan.members().len(), 2);
    }

    #[rstest]
    fn non_adjacent_repeat_is_kept() {
        let plan = RelationPlan::resolve(
            1,
            Properties::new(),
            &[
                member("node", "5", ""),
                member("node", "6", ""),
                member("node", "5", ""),
            ],
        );
        assert_eq!(plan.members().len(), 3);
    }

    #[rstest]
    #[case(MemberDescriptor::new(None, Some("5"), None))]
    #[case(MemberDescriptor::new(Some("changeset"), Some("5"), None))]
    #[case(MemberDescriptor::new(Some("node"), Some("five"), None))]
    #[case(MemberDescriptor::new(Some("node"), None, None))]
    #[case(MemberDescriptor::new(Some("relation"), Some("1"), None))]
    fn invalid_members_are_skipped(#[case] descriptor: MemberDescriptor) {
        let plan = RelationPlan::resolve(1, Properties::new(), &[descriptor]);
        assert!(plan.members().is_empty());
        assert_eq!(plan.osm_id(), 1);
    }

    #[rstest]
    fn dangling_member_still_yields_an_edge() {
        let plan = RelationPlan::resolve(1, Properties::new(), &[member("node", "999999", "")]);
        let edges: Vec<_> = plan.edge_events().collect();
        assert_eq!(
            edges,
            [EdgeEvent::Member {
                relation_id: 1,
                member: EntityRef::Node(999_999),
                role: None,
            }]
        );
    }
}
