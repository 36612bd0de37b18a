use rapier3d::prelude::*;

/// Collision groups for filtering bodies and ray queries
///
/// The character proxy lives in its own group so that probes cast from
/// inside it (grounding) can mask it out, and the camera probe only ever
/// sees level geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionGroups {
    /// The character's compound capsule
    Character = 0b0000_0001,

    /// Static level geometry: floors, walls, props
    Environment = 0b0000_0010,
}

impl CollisionGroups {
    pub const fn bits(self) -> u32 {
        self as u32
    }

    /// Ray mask matching every group except this one
    pub const fn excluded_mask(self) -> u32 {
        u32::MAX & !(self as u32)
    }

    /// Convert to rapier3d's InteractionGroups
    pub fn to_interaction_groups(self) -> InteractionGroups {
        let memberships = Group::from_bits_truncate(self.bits());

        let filter = match self {
            // Characters only collide with the level
            CollisionGroups::Character => {
                Group::from_bits_truncate(CollisionGroups::Environment.bits())
            }

            // Level geometry blocks everything
            CollisionGroups::Environment => Group::ALL,
        };

        InteractionGroups::new(memberships, filter)
    }
}

/// Interaction groups used by a ray query that should hit colliders in `mask`
pub fn ray_groups(mask: u32) -> InteractionGroups {
    InteractionGroups::new(Group::ALL, Group::from_bits_truncate(mask))
}
