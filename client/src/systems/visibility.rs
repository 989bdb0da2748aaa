//! Distance culling
//!
//! Runs after movement so the decision uses this frame's avatar position.
//! Entities are hidden, never despawned. Kinds without a render distance
//! (the sky) always pass.

use bevy::prelude::*;
use shared::{is_visible, Avatar, CameraHolder, WalkConfig, WorldKind};

pub fn cull_far_entities(
    config: Res<WalkConfig>,
    avatars: Query<&Avatar, With<CameraHolder>>,
    mut entities: Query<(&WorldKind, &Transform, &mut Visibility)>,
) {
    let Ok(avatar) = avatars.single() else {
        return;
    };

    for (kind, transform, mut visibility) in entities.iter_mut() {
        let target = if is_visible(*kind, transform.translation, avatar.position, &config.render) {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
        visibility.set_if_neq(target);
    }
}
