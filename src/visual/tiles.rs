//! Tile sprites: a projection of the session's arrangement.
//!
//! Every frame each sprite is moved to the centre of the slot its tile
//! occupies (or follows the pointer while dragged), so the picture on screen
//! never drifts from the session state.

use bevy::asset::LoadState;
use bevy::color::Alpha;
use bevy::prelude::*;

use crate::{
    game::{config::GameConfig, session::PuzzleSession},
    puzzle::{TileId, crop_offset},
    visual::{interactions::DragState, layout::BoardLayout},
};

/// z for resting tiles; the dragged tile floats above them
const TILE_Z: f32 = 0.0;
const DRAG_Z: f32 = 10.0;

/// Frame drawn behind locked tiles, as extra width per side
const FRAME_WIDTH: f32 = 3.0;

const FIXED_TINT: Color = Color::srgb(0.82, 1.0, 0.82);
const DRAG_ALPHA: f32 = 0.7;

#[derive(Component, Debug)]
pub struct TileSprite {
    pub tile_id: TileId,
}

/// Outline shown once a tile is locked
#[derive(Component, Debug)]
pub struct TileFrame(pub TileId);

/// Tile number, shown when there is no picture
#[derive(Component, Debug)]
pub struct TileLabel;

#[derive(Resource, Debug)]
pub struct PuzzleImage {
    pub handle: Handle<Image>,
    /// Next image to try if this one fails
    pub fallback: Option<String>,
}

/// What the tiles show
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TileFace {
    /// Image still loading: plain tiles
    #[default]
    Pending,
    /// Cropped picture
    Image,
    /// Picture failed to load: coloured numbered tiles
    Fallback,
}

/// System: load the picture and spawn one sprite per tile
pub fn setup_board(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    config: Res<GameConfig>,
    session: Res<PuzzleSession>,
) {
    let layout = BoardLayout::from_config(&config);
    let (source, fallback) = config.image_sources();
    let handle: Handle<Image> = asset_server.load(source.to_string());
    info!("Loading puzzle image '{}'", source);

    commands.insert_resource(PuzzleImage {
        handle,
        fallback: fallback.map(str::to_string),
    });
    commands.insert_resource(TileFace::default());

    // Backdrop so empty gaps read as a board
    let backdrop = layout.extent() + FRAME_WIDTH * 4.0;
    commands.spawn((
        Sprite::from_color(Color::srgb(0.2, 0.2, 0.24), Vec2::splat(backdrop)),
        Transform::from_xyz(0.0, 0.0, TILE_Z - 1.0),
        Name::new("Board Backdrop"),
    ));

    for (slot, tile) in session.arrangement().tiles().iter().enumerate() {
        let tile_id = tile.correct_position();
        let center = layout.slot_center(slot);

        commands
            .spawn((
                Sprite::from_color(Color::WHITE, Vec2::splat(layout.piece_size)),
                Transform::from_xyz(center.x, center.y, TILE_Z),
                TileSprite { tile_id },
                Name::new(format!("Tile {}", tile_id)),
            ))
            .with_children(|parent| {
                parent.spawn((
                    Sprite::from_color(
                        Color::srgb(0.35, 0.85, 0.45),
                        Vec2::splat(layout.piece_size + FRAME_WIDTH * 2.0),
                    ),
                    Transform::from_xyz(0.0, 0.0, -0.5),
                    Visibility::Hidden,
                    TileFrame(tile_id),
                ));
                parent.spawn((
                    Text2d::new(tile_id.label().to_string()),
                    TextFont {
                        font_size: layout.piece_size * 0.4,
                        ..default()
                    },
                    TextColor(Color::WHITE),
                    Transform::from_xyz(0.0, 0.0, 0.5),
                    Visibility::Hidden,
                    TileLabel,
                ));
            });
    }

    info!(
        "Board ready: {} tiles ({}x{}), {}px each",
        config.tile_count(),
        layout.grid_size,
        layout.grid_size,
        config.piece_size
    );
    commands.insert_resource(layout);
}

/// System: settle `TileFace` once the picture finishes loading, or once
/// every source has failed
pub fn watch_image_load(
    asset_server: Res<AssetServer>,
    mut image: ResMut<PuzzleImage>,
    mut face: ResMut<TileFace>,
) {
    if *face != TileFace::Pending {
        return;
    }

    match asset_server.load_state(image.handle.id()) {
        LoadState::Loaded => {
            info!("Puzzle image loaded");
            *face = TileFace::Image;
        }
        LoadState::Failed(err) => match image.fallback.take() {
            Some(path) => {
                warn!("Puzzle image failed to load ({}); trying '{}'", err, path);
                image.handle = asset_server.load(path);
            }
            None => {
                warn!("Puzzle image failed to load ({}); using numbered tiles", err);
                *face = TileFace::Fallback;
            }
        },
        _ => {}
    }
}

/// System: switch sprite contents when the face changes
pub fn apply_tile_face(
    face: Res<TileFace>,
    image: Res<PuzzleImage>,
    config: Res<GameConfig>,
    mut tiles: Query<(&TileSprite, &mut Sprite)>,
    mut labels: Query<&mut Visibility, With<TileLabel>>,
) {
    if !face.is_changed() {
        return;
    }

    for (tile, mut sprite) in &mut tiles {
        match *face {
            TileFace::Image => {
                let (x, y) = crop_offset(tile.tile_id, config.grid_size, config.piece_size);
                let (x, y, size) = (x as f32, y as f32, config.piece_size as f32);
                sprite.image = image.handle.clone();
                sprite.rect = Some(Rect::new(x, y, x + size, y + size));
            }
            TileFace::Pending | TileFace::Fallback => {
                sprite.image = Handle::default();
                sprite.rect = None;
            }
        }
    }

    let label_visibility = if *face == TileFace::Fallback {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    };
    for mut visibility in &mut labels {
        *visibility = label_visibility;
    }
}

/// Base colour of a tile before fixed/drag styling
fn face_color(face: TileFace, tile_id: TileId, tile_count: usize) -> Color {
    match face {
        TileFace::Image => Color::WHITE,
        TileFace::Pending => Color::srgb(0.4, 0.4, 0.45),
        TileFace::Fallback => {
            let hue = 360.0 * tile_id.index() as f32 / tile_count.max(1) as f32;
            Color::hsl(hue, 0.45, 0.5)
        }
    }
}

/// System: place and colour every tile from the session state
pub fn sync_tile_sprites(
    session: Res<PuzzleSession>,
    layout: Res<BoardLayout>,
    drag: Res<DragState>,
    face: Res<TileFace>,
    mut tiles: Query<(&TileSprite, &mut Transform, &mut Sprite)>,
    mut frames: Query<(&TileFrame, &mut Visibility)>,
) {
    let tile_count = session.arrangement().len();

    for (tile, mut transform, mut sprite) in &mut tiles {
        let Some(slot) = session.slot_of(tile.tile_id) else {
            continue;
        };
        let fixed = session.tile(tile.tile_id).is_some_and(|t| t.is_fixed());

        let (position, z) = match drag.dragged_position(tile.tile_id) {
            Some(pointer) => (pointer, DRAG_Z),
            None => (layout.slot_center(slot), TILE_Z),
        };
        let target = position.extend(z);
        if transform.translation != target {
            transform.translation = target;
        }

        let mut color = face_color(*face, tile.tile_id, tile_count);
        if fixed {
            color = tint(color, FIXED_TINT);
        }
        if z == DRAG_Z {
            color.set_alpha(DRAG_ALPHA);
        }
        if sprite.color != color {
            sprite.color = color;
        }
    }

    for (frame, mut visibility) in &mut frames {
        let fixed = session.tile(frame.0).is_some_and(|t| t.is_fixed());
        let wanted = if fixed {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
        if *visibility != wanted {
            *visibility = wanted;
        }
    }
}

/// Multiply two colours channel-wise
fn tint(base: Color, by: Color) -> Color {
    let a = base.to_srgba();
    let b = by.to_srgba();
    Color::srgba(a.red * b.red, a.green * b.green, a.blue * b.blue, a.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_colors_differ() {
        let a = face_color(TileFace::Fallback, TileId(0), 9);
        let b = face_color(TileFace::Fallback, TileId(4), 9);
        assert_ne!(a, b);
        assert_eq!(face_color(TileFace::Image, TileId(3), 9), Color::WHITE);
    }

    #[test]
    fn test_tint_keeps_alpha() {
        let tinted = tint(Color::srgba(1.0, 1.0, 1.0, 0.5), FIXED_TINT).to_srgba();
        assert_eq!(tinted.alpha, 0.5);
        assert!(tinted.red < 1.0);
        assert_eq!(tinted.green, 1.0);
    }
}
