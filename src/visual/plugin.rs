use crate::game::{config::GameConfig, session::PuzzleSession};
use crate::input::collect_pointer_events;
use crate::storage::default_store;
use crate::visual::interactions::{DragState, handle_pointer_input};
use crate::visual::tiles::{apply_tile_face, setup_board, sync_tile_sprites, watch_image_load};
use crate::visual::ui::{HudState, handle_reset_input, spawn_hud, tick_session_timer, update_hud};
use bevy::prelude::*;

pub struct PuzzlePlugin;

impl Plugin for PuzzlePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DragState>()
            .init_resource::<HudState>()
            // Session first: the board and HUD are drawn from it
            .add_systems(Startup, (setup_session, setup_board, spawn_hud).chain())
            .add_systems(
                Update,
                (
                    // Commands from the player
                    handle_pointer_input.after(collect_pointer_events),
                    handle_reset_input,
                    // Clock
                    tick_session_timer,
                    // Projection of the session onto the screen
                    watch_image_load,
                    apply_tile_face,
                    sync_tile_sprites,
                    update_hud,
                )
                    .chain(),
            );
    }
}

/// System: create the session with the platform store, clock starting now
fn setup_session(mut commands: Commands, config: Res<GameConfig>, time: Res<Time<Real>>) {
    let session = PuzzleSession::new(&config, default_store(), time.elapsed());

    info!(
        "✓ Puzzle session ready: {} tiles, best time {}",
        session.arrangement().len(),
        session.best_time().label()
    );
    debug!("Starting arrangement:\n{}", session.arrangement());

    commands.insert_resource(session);
}
