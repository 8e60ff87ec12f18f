use bevy::prelude::*;
use std::time::Duration;

use crate::{
    camera::{GameCamera, MainCamera},
    game::session::{PuzzleSession, SessionResult},
    input::{PointerEvent, PointerEventType, PointerId},
    puzzle::TileId,
    visual::layout::BoardLayout,
};

/// The tile currently held by the player, if any
#[derive(Resource, Default, Debug)]
pub struct DragState {
    /// Tile being dragged
    pub dragging: Option<TileId>,
    /// Pointer that picked it up; other pointers are ignored meanwhile
    pub pointer_id: Option<PointerId>,
    /// Tile centre minus pointer at pick-up, so the tile doesn't jump
    pub grab_offset: Vec2,
    /// Latest pointer position in world space
    pub pointer_world: Vec2,
}

impl DragState {
    /// Where a dragged tile should be drawn; `None` if `tile` isn't held
    pub fn dragged_position(&self, tile: TileId) -> Option<Vec2> {
        (self.dragging == Some(tile)).then_some(self.pointer_world + self.grab_offset)
    }

    pub fn clear(&mut self) {
        *self = DragState::default();
    }
}

/// System: turn pointer gestures into session commands.
///
/// Down on a movable tile picks it up, moving over another slot swaps the
/// held tile into it, and release commits the placement.
pub fn handle_pointer_input(
    mut pointer_events: MessageReader<PointerEvent>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    game_camera: Res<GameCamera>,
    layout: Res<BoardLayout>,
    time: Res<Time<Real>>,
    mut session: ResMut<PuzzleSession>,
    mut drag_state: ResMut<DragState>,
) {
    let camera = camera_query.single().ok();

    for event in pointer_events.read() {
        let world_pos = camera
            .and_then(|(camera, transform)| event.to_world_position(camera, transform))
            .map(|pos| game_camera.bounds.clamp(pos));

        // Rejected moves leave the session untouched, so only flag real changes
        let changed = apply_pointer_event(
            event,
            world_pos,
            &layout,
            time.elapsed(),
            session.bypass_change_detection(),
            &mut drag_state,
        );
        if changed {
            session.set_changed();
        }
    }
}

/// Apply one pointer event. Returns true if the session was modified.
///
/// `world_pos` is only needed to pick up and move; a release commits even when
/// the pointer can't be mapped into the world.
pub fn apply_pointer_event(
    event: &PointerEvent,
    world_pos: Option<Vec2>,
    layout: &BoardLayout,
    now: Duration,
    session: &mut PuzzleSession,
    drag_state: &mut DragState,
) -> bool {
    if drag_state
        .pointer_id
        .is_some_and(|held_by| held_by != event.id)
    {
        return false;
    }

    match event.event_type {
        PointerEventType::Down => {
            let Some(world_pos) = world_pos else {
                return false;
            };
            let Some(slot) = layout.slot_at(world_pos) else {
                return false;
            };
            let Some(tile_id) = session.tile_at(slot).map(|t| t.correct_position()) else {
                return false;
            };

            match session.can_drag(tile_id) {
                Ok(_) => {
                    debug!("Picked up tile {} from slot {}", tile_id, slot);
                    *drag_state = DragState {
                        dragging: Some(tile_id),
                        pointer_id: Some(event.id),
                        grab_offset: layout.slot_center(slot) - world_pos,
                        pointer_world: world_pos,
                    };
                }
                Err(err) => debug!("Tile {} not movable: {}", tile_id, err),
            }
            false
        }

        PointerEventType::Move => {
            let (Some(tile_id), Some(world_pos)) = (drag_state.dragging, world_pos) else {
                return false;
            };
            drag_state.pointer_world = world_pos;

            // Swap into whichever slot the pointer is over
            let Some(target) = layout.slot_at(world_pos) else {
                return false;
            };
            if session.slot_of(tile_id) == Some(target) {
                return false;
            }
            match session.try_reorder(tile_id, target) {
                Ok(swap) => {
                    debug!("Tile {} moved {} -> {}", tile_id, swap.from, swap.to);
                    true
                }
                Err(err) => {
                    debug!("Reorder rejected: {}", err);
                    false
                }
            }
        }

        PointerEventType::Up => {
            let Some(tile_id) = drag_state.dragging else {
                return false;
            };
            drag_state.clear();

            match session.commit_placement(tile_id, now) {
                SessionResult::Misplaced { slot } => {
                    debug!("Tile {} dropped in slot {}", tile_id, slot);
                    false
                }
                SessionResult::TileFixed { slot } => {
                    info!("Tile {} locked into slot {}", tile_id, slot);
                    true
                }
                SessionResult::Complete { elapsed, new_best } => {
                    info!("🎉 Puzzle complete in {}s", elapsed);
                    if new_best {
                        info!("New best time: {}s", elapsed);
                    }
                    true
                }
                SessionResult::Ignored => false,
            }
        }
    }
}
