use host_event_system::{BuildingGrade, EntityKind};

/// Whether destroying this entity counts as someone breaking into a base.
///
/// Doors always count. Building blocks count once they have been upgraded
/// past twigs, since twig frames are routinely knocked down by their owners.
pub fn is_raid_entity(kind: &EntityKind) -> bool {
    match kind {
        EntityKind::Door => true,
        EntityKind::BuildingBlock { grade } => *grade > BuildingGrade::Twigs,
        EntityKind::Other => false,
    }
}
