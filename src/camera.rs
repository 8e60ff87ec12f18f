use bevy::camera::ScalingMode;
use bevy::prelude::*;

use crate::game::config::GameConfig;

/// Visible height as a multiple of the board edge
const VIEW_MARGIN: f32 = 1.6;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GameCamera>()
            .insert_resource(ClearColor(Color::srgb(0.11, 0.11, 0.13)))
            .add_systems(Startup, setup_camera)
            .add_systems(Update, update_camera_resource);
    }
}

#[derive(Resource)]
pub struct GameCamera {
    pub scale: f32,
    pub aspect_ratio: f32,
    pub bounds: CameraBounds,
}

#[derive(Debug, Clone)]
pub struct CameraBounds {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
}

impl Default for GameCamera {
    fn default() -> Self {
        let scale = 480.0;
        let aspect_ratio = 4.0 / 5.0;

        Self {
            scale,
            aspect_ratio,
            bounds: CameraBounds::from_scale_and_aspect(scale, aspect_ratio),
        }
    }
}

impl CameraBounds {
    pub fn from_scale_and_aspect(scale: f32, aspect_ratio: f32) -> Self {
        // For orthographic, scale determines the vertical view
        let half_height = scale * 0.5;
        let half_width = half_height * aspect_ratio;

        Self {
            left: -half_width,
            right: half_width,
            bottom: -half_height,
            top: half_height,
        }
    }

    /// Keep a point inside the visible area
    pub fn clamp(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            point.x.clamp(self.left, self.right),
            point.y.clamp(self.bottom, self.top),
        )
    }
}

#[derive(Component)]
pub struct MainCamera;

/// Orthographic 2D camera centred on the board; world units are image pixels
fn setup_camera(
    mut commands: Commands,
    mut game_camera: ResMut<GameCamera>,
    config: Res<GameConfig>,
) {
    game_camera.scale = config.board_extent() * VIEW_MARGIN;
    game_camera.bounds =
        CameraBounds::from_scale_and_aspect(game_camera.scale, game_camera.aspect_ratio);

    let projection = Projection::Orthographic(OrthographicProjection {
        scaling_mode: ScalingMode::FixedVertical {
            viewport_height: game_camera.scale,
        },
        ..OrthographicProjection::default_2d()
    });
    commands.spawn((Camera2d, projection, MainCamera));
}

/// Update camera resource when window is resized
fn update_camera_resource(mut game_camera: ResMut<GameCamera>, windows: Query<&Window>) {
    if let Ok(window) = windows.single() {
        let new_aspect = window.width() / window.height();

        // Only update if aspect ratio changed
        if (new_aspect - game_camera.aspect_ratio).abs() > 0.01 {
            game_camera.aspect_ratio = new_aspect;

            game_camera.bounds =
                CameraBounds::from_scale_and_aspect(game_camera.scale, game_camera.aspect_ratio);

            debug!("Camera bounds updated: {:?}", game_camera.bounds);
        }
    }
}
