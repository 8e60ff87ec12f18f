//! HUD: elapsed time, best time, success banner and the reset button.
//!
//! Text is re-rendered from `PuzzleSession::hud_snapshot` whenever the session
//! changes or the clock reaches a new second.

use bevy::prelude::*;

use crate::{
    game::session::{HudSnapshot, PuzzleSession},
    visual::interactions::DragState,
};

const TEXT_COLOR: Color = Color::srgb(0.92, 0.92, 0.95);
const SUCCESS_COLOR: Color = Color::srgb(0.45, 0.9, 0.5);
const BUTTON_IDLE: Color = Color::srgb(0.25, 0.25, 0.3);
const BUTTON_HOVER: Color = Color::srgb(0.33, 0.33, 0.4);
const BUTTON_PRESSED: Color = Color::srgb(0.2, 0.45, 0.3);

#[derive(Component)]
pub struct TimerText;

#[derive(Component)]
pub struct BestTimeText;

#[derive(Component)]
pub struct SuccessBanner;

#[derive(Component)]
pub struct ResetButton;

/// Last snapshot written to the HUD
#[derive(Resource, Default)]
pub struct HudState {
    pub shown: Option<HudSnapshot>,
}

pub fn timer_label(elapsed_seconds: u64) -> String {
    format!("Time: {}", elapsed_seconds)
}

pub fn best_time_label(label: &str) -> String {
    format!("Best: {}", label)
}

/// Spawn the HUD overlay
pub fn spawn_hud(mut commands: Commands, time: Res<Time<Real>>, session: Res<PuzzleSession>) {
    let snapshot = session.hud_snapshot(time.elapsed());
    let font = |size: f32| TextFont {
        font_size: size,
        ..default()
    };

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(16.0),
                left: Val::Px(0.0),
                right: Val::Px(0.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                row_gap: Val::Px(8.0),
                ..default()
            },
            Name::new("HUD"),
        ))
        .with_children(|hud| {
            hud.spawn(Node {
                column_gap: Val::Px(32.0),
                ..default()
            })
            .with_children(|row| {
                row.spawn((
                    Text::new(timer_label(snapshot.elapsed_seconds)),
                    font(26.0),
                    TextColor(TEXT_COLOR),
                    TimerText,
                ));
                row.spawn((
                    Text::new(best_time_label(&snapshot.best_time_label)),
                    font(26.0),
                    TextColor(TEXT_COLOR),
                    BestTimeText,
                ));
            });

            hud.spawn((
                Text::new("Puzzle solved!"),
                font(30.0),
                TextColor(SUCCESS_COLOR),
                Node {
                    display: Display::None,
                    ..default()
                },
                SuccessBanner,
            ));

            hud.spawn((
                Button,
                Node {
                    padding: UiRect::axes(Val::Px(18.0), Val::Px(8.0)),
                    ..default()
                },
                BackgroundColor(BUTTON_IDLE),
                ResetButton,
            ))
            .with_children(|button| {
                button.spawn((Text::new("Reset"), font(22.0), TextColor(TEXT_COLOR)));
            });
        });

    info!("HUD spawned");
}

/// System: advance the clock display once per second
pub fn tick_session_timer(
    time: Res<Time<Real>>,
    mut session: ResMut<PuzzleSession>,
    mut hud_state: ResMut<HudState>,
    mut timer_text: Query<&mut Text, With<TimerText>>,
) {
    // Ticking alone shouldn't look like a board change to other systems
    let Some(elapsed) = session.bypass_change_detection().tick(time.elapsed()) else {
        return;
    };
    for mut text in &mut timer_text {
        text.0 = timer_label(elapsed);
    }
    // Keep the record of what is on screen honest for `update_hud`
    if let Some(shown) = hud_state.shown.as_mut() {
        shown.elapsed_seconds = elapsed;
    }
}

/// System: redraw the HUD when the session changes
pub fn update_hud(
    time: Res<Time<Real>>,
    session: Res<PuzzleSession>,
    mut hud_state: ResMut<HudState>,
    mut timer_text: Query<&mut Text, (With<TimerText>, Without<BestTimeText>)>,
    mut best_text: Query<&mut Text, (With<BestTimeText>, Without<TimerText>)>,
    mut banner: Query<&mut Node, With<SuccessBanner>>,
) {
    if !session.is_changed() {
        return;
    }

    let snapshot = session.hud_snapshot(time.elapsed());
    if hud_state.shown.as_ref() == Some(&snapshot) {
        return;
    }

    for mut text in &mut timer_text {
        text.0 = timer_label(snapshot.elapsed_seconds);
    }
    for mut text in &mut best_text {
        text.0 = best_time_label(&snapshot.best_time_label);
    }
    for mut node in &mut banner {
        node.display = if snapshot.completion_visible {
            Display::Flex
        } else {
            Display::None
        };
    }

    if snapshot.completion_visible {
        info!(
            "HUD: solved in {}s (best {})",
            snapshot.elapsed_seconds, snapshot.best_time_label
        );
    }
    hud_state.shown = Some(snapshot);
}

/// System: reset on button press or the R key
pub fn handle_reset_input(
    time: Res<Time<Real>>,
    keys: Res<ButtonInput<KeyCode>>,
    mut buttons: Query<
        (&Interaction, &mut BackgroundColor),
        (Changed<Interaction>, With<ResetButton>),
    >,
    mut session: ResMut<PuzzleSession>,
    mut drag_state: ResMut<DragState>,
) {
    let mut reset_requested = keys.just_pressed(KeyCode::KeyR);

    for (interaction, mut background) in &mut buttons {
        background.0 = match interaction {
            Interaction::Pressed => {
                reset_requested = true;
                BUTTON_PRESSED
            }
            Interaction::Hovered => BUTTON_HOVER,
            Interaction::None => BUTTON_IDLE,
        };
    }

    if reset_requested {
        drag_state.clear();
        session.reset(time.elapsed());
        info!("🔄 Puzzle reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::config::GameConfig;
    use crate::storage::MemoryStore;
    use bevy::ecs::system::RunSystemOnce;
    use std::time::Duration;

    fn hud_world() -> World {
        let mut world = World::new();
        world.init_resource::<Time<Real>>();
        world.init_resource::<ButtonInput<KeyCode>>();
        world.init_resource::<HudState>();
        world.init_resource::<DragState>();
        world.insert_resource(PuzzleSession::new(
            &GameConfig::default(),
            Box::new(MemoryStore::new()),
            Duration::ZERO,
        ));
        world.spawn((Text::new(timer_label(0)), TimerText));
        world.spawn((Text::new(best_time_label("--")), BestTimeText));
        world.spawn((
            Node {
                display: Display::None,
                ..default()
            },
            SuccessBanner,
        ));
        world
    }

    fn advance_to(world: &mut World, millis: u64) {
        world
            .resource_mut::<Time<Real>>()
            .advance_to(Duration::from_millis(millis));
    }

    fn run(world: &mut World) {
        world.run_system_once(handle_reset_input).unwrap();
        world.run_system_once(tick_session_timer).unwrap();
        world.run_system_once(update_hud).unwrap();
    }

    fn timer_text(world: &mut World) -> String {
        let mut query = world.query_filtered::<&Text, With<TimerText>>();
        query.single(world).unwrap().0.clone()
    }

    fn press_reset(world: &mut World) {
        let mut keys = world.resource_mut::<ButtonInput<KeyCode>>();
        keys.press(KeyCode::KeyR);
    }

    fn release_reset(world: &mut World) {
        let mut keys = world.resource_mut::<ButtonInput<KeyCode>>();
        keys.release(KeyCode::KeyR);
        keys.clear();
    }

    #[test]
    fn test_labels() {
        assert_eq!(timer_label(0), "Time: 0");
        assert_eq!(timer_label(42), "Time: 42");
        assert_eq!(best_time_label("--"), "Best: --");
        assert_eq!(best_time_label("17"), "Best: 17");
    }

    #[test]
    fn test_clock_ticks_into_text() {
        let mut world = hud_world();
        run(&mut world);
        assert_eq!(timer_text(&mut world), "Time: 0");

        advance_to(&mut world, 2_500);
        run(&mut world);
        assert_eq!(timer_text(&mut world), "Time: 2");
    }

    #[test]
    fn test_reset_shows_zero_right_away() {
        let mut world = hud_world();
        run(&mut world);

        advance_to(&mut world, 10_000);
        run(&mut world);
        assert_eq!(timer_text(&mut world), "Time: 10");

        advance_to(&mut world, 10_200);
        press_reset(&mut world);
        run(&mut world);
        release_reset(&mut world);
        assert_eq!(timer_text(&mut world), "Time: 0");

        // A second reset straight after, once the clock has moved on again
        advance_to(&mut world, 12_400);
        run(&mut world);
        assert_eq!(timer_text(&mut world), "Time: 2");
        press_reset(&mut world);
        run(&mut world);
        release_reset(&mut world);
        assert_eq!(timer_text(&mut world), "Time: 0");
    }

    #[test]
    fn test_reset_clears_drag() {
        let mut world = hud_world();
        world.insert_resource(DragState {
            dragging: Some(crate::puzzle::TileId(4)),
            pointer_id: Some(crate::input::PointerId::Mouse),
            ..default()
        });

        advance_to(&mut world, 5_000);
        press_reset(&mut world);
        run(&mut world);

        assert!(world.resource::<DragState>().dragging.is_none());
        assert!(world.resource::<DragState>().pointer_id.is_none());
        let session = world.resource::<PuzzleSession>();
        assert_eq!(session.elapsed_secs(Duration::from_millis(5_000)), 0);
        assert!(session.arrangement().tiles().iter().all(|t| !t.is_fixed()));
    }
}
