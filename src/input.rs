use bevy::input::touch::{TouchInput, TouchPhase};
use bevy::prelude::*;
use bevy::window::CursorMoved;

pub struct InputPlugin;
impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CursorPos>()
            .add_message::<PointerEvent>()
            .add_systems(Update, collect_pointer_events);
    }
}

/// One mouse or touch gesture step
#[derive(Message, Debug, Clone)]
pub struct PointerEvent {
    /// Window (logical) coordinates: pixels from top-left
    pub position: Vec2,
    pub event_type: PointerEventType,
    pub id: PointerId,
}

/// Which pointer produced an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerId {
    Mouse,
    /// Platform touch id
    Touch(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventType {
    Down,
    Move,
    Up,
}

impl PointerEvent {
    /// Convert window coords to 2D world space using a camera
    pub fn to_world_position(
        &self,
        camera: &Camera,
        camera_transform: &GlobalTransform,
    ) -> Option<Vec2> {
        camera
            .viewport_to_world_2d(camera_transform, self.position)
            .ok()
    }
}

#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct CursorPos(Option<Vec2>);

/// Merge mouse buttons, cursor motion and touches into `PointerEvent`s.
/// Mouse `Move` is only sent when the cursor actually moved with the button held.
pub fn collect_pointer_events(
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut cursor: ResMut<CursorPos>,
    mut cursor_moves: MessageReader<CursorMoved>,
    mut touch_events: MessageReader<TouchInput>,
    mut out: MessageWriter<PointerEvent>,
) {
    let moved_to = cursor_moves.read().last().map(|e| e.position);
    if moved_to.is_some() {
        cursor.0 = moved_to;
    }

    if let Some(position) = cursor.0 {
        let mouse = |event_type| PointerEvent {
            position,
            event_type,
            id: PointerId::Mouse,
        };

        if mouse_buttons.just_pressed(MouseButton::Left) {
            out.write(mouse(PointerEventType::Down));
        } else if moved_to.is_some() && mouse_buttons.pressed(MouseButton::Left) {
            out.write(mouse(PointerEventType::Move));
        }
        if mouse_buttons.just_released(MouseButton::Left) {
            out.write(mouse(PointerEventType::Up));
        }
    }

    for ev in touch_events.read() {
        let event_type = match ev.phase {
            TouchPhase::Started => PointerEventType::Down,
            TouchPhase::Moved => PointerEventType::Move,
            TouchPhase::Ended | TouchPhase::Canceled => PointerEventType::Up,
        };
        out.write(PointerEvent {
            position: ev.position,
            event_type,
            id: PointerId::Touch(ev.id),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::message::Messages;
    use bevy::ecs::system::RunSystemOnce;

    fn input_world() -> World {
        let mut world = World::new();
        world.init_resource::<ButtonInput<MouseButton>>();
        world.init_resource::<CursorPos>();
        world.init_resource::<Messages<CursorMoved>>();
        world.init_resource::<Messages<TouchInput>>();
        world.init_resource::<Messages<PointerEvent>>();
        world
    }

    /// Run the collector once and take what it wrote, clearing consumed input
    fn collect(world: &mut World) -> Vec<PointerEvent> {
        world.run_system_once(collect_pointer_events).unwrap();
        world.resource_mut::<Messages<CursorMoved>>().clear();
        world.resource_mut::<Messages<TouchInput>>().clear();
        world.resource_mut::<ButtonInput<MouseButton>>().clear();
        world.resource_mut::<Messages<PointerEvent>>().drain().collect()
    }

    fn cursor_to(world: &mut World, x: f32, y: f32) {
        world.write_message(CursorMoved {
            window: Entity::PLACEHOLDER,
            position: Vec2::new(x, y),
            delta: None,
        });
    }

    #[test]
    fn test_touch_ids_keep_their_own_space() {
        let mut world = input_world();
        for (id, phase) in [(0, TouchPhase::Started), (u64::MAX, TouchPhase::Canceled)] {
            world.write_message(TouchInput {
                phase,
                position: Vec2::new(10.0, 20.0),
                window: Entity::PLACEHOLDER,
                force: None,
                id,
            });
        }

        let events = collect(&mut world);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].id, PointerId::Touch(0));
        assert_eq!(events[0].event_type, PointerEventType::Down);
        assert_eq!(events[1].id, PointerId::Touch(u64::MAX));
        assert_eq!(events[1].event_type, PointerEventType::Up);
    }

    #[test]
    fn test_mouse_moves_only_while_held() {
        let mut world = input_world();

        cursor_to(&mut world, 5.0, 5.0);
        assert!(collect(&mut world).is_empty());

        world
            .resource_mut::<ButtonInput<MouseButton>>()
            .press(MouseButton::Left);
        let events = collect(&mut world);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, PointerEventType::Down);
        assert_eq!(events[0].position, Vec2::new(5.0, 5.0));
        assert_eq!(events[0].id, PointerId::Mouse);

        // Held but still: nothing to report
        assert!(collect(&mut world).is_empty());

        cursor_to(&mut world, 8.0, 9.0);
        let events = collect(&mut world);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, PointerEventType::Move);
        assert_eq!(events[0].position, Vec2::new(8.0, 9.0));

        world
            .resource_mut::<ButtonInput<MouseButton>>()
            .release(MouseButton::Left);
        let events = collect(&mut world);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, PointerEventType::Up);
    }
}
