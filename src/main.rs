use bevy::prelude::*;

mod camera;
mod game;
mod input;
mod puzzle;
mod storage;
mod visual;

use bevy::asset::io::web::WebAssetPlugin;
use bevy::window::WindowResolution;
use camera::CameraPlugin;
use game::config::GameConfig;
use input::InputPlugin;

use crate::visual::plugin::PuzzlePlugin;

fn main() {
    let config = match GameConfig::load() {
        Ok(config) => config,
        Err(e) => panic!("Cannot start without a valid puzzle config: {}", e),
    };

    let mut app = App::new();

    app.insert_resource(config)
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Tile Shuffle".into(),
                        resolution: WindowResolution::new(720, 900),
                        resizable: true,
                        ..default()
                    }),
                    ..default()
                })
                // The only web source is the image URL from the embedded config
                .set(WebAssetPlugin {
                    silence_startup_warning: true,
                }),
        )
        .add_plugins(CameraPlugin)
        .add_plugins(InputPlugin)
        .add_plugins(PuzzlePlugin);

    app.run();
}
