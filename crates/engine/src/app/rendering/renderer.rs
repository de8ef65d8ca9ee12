use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::ImageReader;
use pixels::{Error, Pixels, SurfaceTexture, TextureError};
use tracing::warn;
use winit::window::Window;

use crate::app::SceneWorld;
use crate::sim::{
    Bullet, CombatWorld, Explosion, Grenade, Hazard, RoleEntity, Team, Tile, TileKind,
    SCREEN_HEIGHT, SCREEN_WIDTH,
};
use crate::sprite_keys::{self, validate_sprite_key};

use super::text;

const CLEAR_COLOR_SKY: [u8; 4] = [92, 148, 252, 255];
const TILE_FALLBACK_GRASS_COLOR: [u8; 4] = [74, 112, 56, 255];
const TILE_FALLBACK_DIRT_COLOR: [u8; 4] = [112, 83, 58, 255];
const TILE_FALLBACK_PLATFORM_COLOR: [u8; 4] = [134, 134, 146, 255];
const PLAYER_FALLBACK_COLOR: [u8; 4] = [56, 120, 188, 255];
const ENEMY_FALLBACK_COLOR: [u8; 4] = [188, 60, 48, 255];
const BULLET_FALLBACK_COLOR: [u8; 4] = [255, 236, 120, 255];
const GRENADE_FALLBACK_COLOR: [u8; 4] = [62, 78, 50, 255];
const EXPLOSION_FALLBACK_COLOR: [u8; 4] = [255, 150, 40, 255];

const HEALTH_BAR_LEFT: i32 = 10;
const HEALTH_BAR_TOP: i32 = 10;
const HEALTH_BAR_WIDTH: i32 = 150;
const HEALTH_BAR_HEIGHT: i32 = 20;
const HEALTH_BAR_BACK_COLOR: [u8; 4] = [172, 32, 28, 255];
const HEALTH_BAR_FILL_COLOR: [u8; 4] = [244, 208, 44, 255];
const HEALTH_BAR_BORDER_COLOR: [u8; 4] = [20, 22, 28, 255];
const GRENADE_PIP_TOP: i32 = 40;
const GRENADE_PIP_SIZE: i32 = 12;
const GRENADE_PIP_GAP: i32 = 6;
const GRENADE_PIP_COLOR: [u8; 4] = [120, 140, 96, 255];

const ALERT_MARGIN_PX: i32 = 4;
const ALERT_TEXT_SCALE: i32 = 3;
const ALERT_COLOR: [u8; 4] = [255, 64, 48, 255];

const GAME_OVER_TEXT: &str = "MISSION FAILED";
const RESTART_HINT_TEXT: &str = "PRESS R TO RESTART";
const BANNER_TEXT_SCALE: i32 = 6;
const HINT_TEXT_SCALE: i32 = 3;
const BANNER_LINE_GAP_PX: i32 = 18;
const BANNER_PANEL_INSET_X: i32 = 24;
const BANNER_PANEL_INSET_Y: i32 = 18;
const BANNER_TEXT_COLOR: [u8; 4] = [244, 248, 252, 255];
const HINT_TEXT_COLOR: [u8; 4] = [176, 198, 220, 255];
const BANNER_PANEL_BG_COLOR: [u8; 4] = [10, 12, 16, 210];
const BANNER_PANEL_BORDER_COLOR: [u8; 4] = [92, 106, 126, 255];

/// OS window surface size in physical pixels. The pixel buffer itself stays at
/// the fixed logical size and is scaled onto this surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

struct LoadedSprite {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

pub struct Renderer {
    pixels: Pixels<'static>,
    surface_size: Viewport,
    asset_root: PathBuf,
    sprite_cache: HashMap<String, Option<LoadedSprite>>,
    warned_missing_sprite_keys: HashSet<String>,
}

impl Renderer {
    pub fn new(window: Arc<Window>, asset_root: PathBuf) -> Result<Self, Error> {
        let size = window.inner_size();
        let surface = SurfaceTexture::new(size.width.max(1), size.height.max(1), window);
        let pixels = Pixels::new(SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32, surface)?;
        Ok(Self {
            pixels,
            surface_size: Viewport {
                width: size.width,
                height: size.height,
            },
            asset_root,
            sprite_cache: HashMap::new(),
            warned_missing_sprite_keys: HashSet::new(),
        })
    }

    /// Follows the OS window. Only the presentation surface changes size; the
    /// logical pixel buffer never does.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), TextureError> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels.resize_surface(width, height)?;
        self.surface_size = Viewport { width, height };
        Ok(())
    }

    pub(crate) fn render_world(&mut self, world: &SceneWorld) -> Result<(), Error> {
        if self.surface_size.width == 0 || self.surface_size.height == 0 {
            return Ok(());
        }

        let width = SCREEN_WIDTH as u32;
        let height = SCREEN_HEIGHT as u32;
        let asset_root = self.asset_root.as_path();
        let sprite_cache = &mut self.sprite_cache;
        let warned_missing_sprite_keys = &mut self.warned_missing_sprite_keys;
        let frame = self.pixels.frame_mut();

        for chunk in frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&CLEAR_COLOR_SKY);
        }

        if let Some(combat) = world.combat() {
            let shake = combat.shake.offset();
            draw_tiles(
                frame,
                width,
                height,
                &combat.tiles,
                shake,
                sprite_cache,
                warned_missing_sprite_keys,
                asset_root,
            );
            draw_role(
                frame,
                width,
                height,
                &combat.player,
                sprite_cache,
                warned_missing_sprite_keys,
                asset_root,
            );
            for enemy in &combat.enemies {
                draw_role(
                    frame,
                    width,
                    height,
                    enemy,
                    sprite_cache,
                    warned_missing_sprite_keys,
                    asset_root,
                );
            }
            draw_hazards(
                frame,
                width,
                height,
                &combat.hazards,
                sprite_cache,
                warned_missing_sprite_keys,
                asset_root,
            );
            draw_alert_markers(
                frame,
                width,
                height,
                &combat.enemies,
                sprite_cache,
                warned_missing_sprite_keys,
                asset_root,
            );
            draw_hud(frame, width, height, combat);
            if combat.game_over {
                draw_game_over_banner(frame, width, height);
            }
        }

        self.pixels.render()
    }
}

/// The terrain layer is the only layer the screen shake moves. Everything on
/// top of it stays put so gameplay reads stay stable during the rumble.
#[allow(clippy::too_many_arguments)]
fn draw_tiles(
    frame: &mut [u8],
    width: u32,
    height: u32,
    tiles: &[Tile],
    shake: (i32, i32),
    sprite_cache: &mut HashMap<String, Option<LoadedSprite>>,
    warned_missing_sprite_keys: &mut HashSet<String>,
    asset_root: &Path,
) {
    for tile in tiles {
        let left = tile.rect.x.round() as i32 + shake.0;
        let top = tile.rect.y.round() as i32 + shake.1;
        if let Some(sprite) = resolve_cached_sprite(
            sprite_cache,
            warned_missing_sprite_keys,
            asset_root,
            tile.kind.sprite_key(),
        ) {
            draw_sheet_frame(frame, width, height, left, top, sprite, 0, sprite.width, false);
            continue;
        }
        draw_filled_rect(
            frame,
            width,
            height,
            left,
            top,
            tile.rect.width.round() as i32,
            tile.rect.height.round() as i32,
            tile_fallback_color(tile.kind),
        );
    }
}

fn draw_role(
    frame: &mut [u8],
    width: u32,
    height: u32,
    role: &RoleEntity,
    sprite_cache: &mut HashMap<String, Option<LoadedSprite>>,
    warned_missing_sprite_keys: &mut HashSet<String>,
    asset_root: &Path,
) {
    let left = role.rect.x.round() as i32;
    let top = role.rect.y.round() as i32;
    if let Some(clip) = role.clips.clip(role.action) {
        if let Some(sprite) = resolve_cached_sprite(
            sprite_cache,
            warned_missing_sprite_keys,
            asset_root,
            &clip.sheet,
        ) {
            let src_left = role.anim.frame().saturating_mul(clip.frame_width);
            if src_left.saturating_add(clip.frame_width) <= sprite.width {
                draw_sheet_frame(
                    frame,
                    width,
                    height,
                    left,
                    top,
                    sprite,
                    src_left,
                    clip.frame_width,
                    role.flip,
                );
                return;
            }
        }
    }
    draw_filled_rect(
        frame,
        width,
        height,
        left,
        top,
        role.rect.width.round() as i32,
        role.rect.height.round() as i32,
        role_fallback_color(role.team),
    );
}

fn draw_hazards(
    frame: &mut [u8],
    width: u32,
    height: u32,
    hazards: &[Hazard],
    sprite_cache: &mut HashMap<String, Option<LoadedSprite>>,
    warned_missing_sprite_keys: &mut HashSet<String>,
    asset_root: &Path,
) {
    for hazard in hazards {
        match hazard {
            Hazard::Bullet(bullet) => draw_bullet(
                frame,
                width,
                height,
                bullet,
                sprite_cache,
                warned_missing_sprite_keys,
                asset_root,
            ),
            Hazard::Grenade(grenade) => draw_grenade(
                frame,
                width,
                height,
                grenade,
                sprite_cache,
                warned_missing_sprite_keys,
                asset_root,
            ),
            Hazard::Explosion(explosion) => draw_explosion(
                frame,
                width,
                height,
                explosion,
                sprite_cache,
                warned_missing_sprite_keys,
                asset_root,
            ),
        }
    }
}

fn draw_bullet(
    frame: &mut [u8],
    width: u32,
    height: u32,
    bullet: &Bullet,
    sprite_cache: &mut HashMap<String, Option<LoadedSprite>>,
    warned_missing_sprite_keys: &mut HashSet<String>,
    asset_root: &Path,
) {
    let left = bullet.rect.x.round() as i32;
    let top = bullet.rect.y.round() as i32;
    if let Some(sprite) = resolve_cached_sprite(
        sprite_cache,
        warned_missing_sprite_keys,
        asset_root,
        sprite_keys::BULLET,
    ) {
        let mirror = bullet.direction < 0.0;
        draw_sheet_frame(frame, width, height, left, top, sprite, 0, sprite.width, mirror);
        return;
    }
    draw_filled_rect(
        frame,
        width,
        height,
        left,
        top,
        bullet.rect.width.round() as i32,
        bullet.rect.height.round() as i32,
        BULLET_FALLBACK_COLOR,
    );
}

fn draw_grenade(
    frame: &mut [u8],
    width: u32,
    height: u32,
    grenade: &Grenade,
    sprite_cache: &mut HashMap<String, Option<LoadedSprite>>,
    warned_missing_sprite_keys: &mut HashSet<String>,
    asset_root: &Path,
) {
    let left = grenade.rect.x.round() as i32;
    let top = grenade.rect.y.round() as i32;
    if let Some(sprite) = resolve_cached_sprite(
        sprite_cache,
        warned_missing_sprite_keys,
        asset_root,
        sprite_keys::GRENADE,
    ) {
        draw_sheet_frame(frame, width, height, left, top, sprite, 0, sprite.width, false);
        return;
    }
    draw_filled_rect(
        frame,
        width,
        height,
        left,
        top,
        grenade.rect.width.round() as i32,
        grenade.rect.height.round() as i32,
        GRENADE_FALLBACK_COLOR,
    );
}

fn draw_explosion(
    frame: &mut [u8],
    width: u32,
    height: u32,
    explosion: &Explosion,
    sprite_cache: &mut HashMap<String, Option<LoadedSprite>>,
    warned_missing_sprite_keys: &mut HashSet<String>,
    asset_root: &Path,
) {
    let left = explosion.rect.x.round() as i32;
    let top = explosion.rect.y.round() as i32;
    if let Some(sprite) = resolve_cached_sprite(
        sprite_cache,
        warned_missing_sprite_keys,
        asset_root,
        &explosion.clip.sheet,
    ) {
        let src_left = explosion.anim.frame().saturating_mul(explosion.clip.frame_width);
        if src_left.saturating_add(explosion.clip.frame_width) <= sprite.width {
            draw_sheet_frame(
                frame,
                width,
                height,
                left,
                top,
                sprite,
                src_left,
                explosion.clip.frame_width,
                false,
            );
            return;
        }
    }
    draw_filled_rect(
        frame,
        width,
        height,
        left,
        top,
        explosion.rect.width.round() as i32,
        explosion.rect.height.round() as i32,
        EXPLOSION_FALLBACK_COLOR,
    );
}

fn draw_alert_markers(
    frame: &mut [u8],
    width: u32,
    height: u32,
    enemies: &[RoleEntity],
    sprite_cache: &mut HashMap<String, Option<LoadedSprite>>,
    warned_missing_sprite_keys: &mut HashSet<String>,
    asset_root: &Path,
) {
    for enemy in enemies {
        let Some(ai) = enemy.controller.as_enemy() else {
            continue;
        };
        if !ai.engaged || enemy.is_dead() {
            continue;
        }
        let center_x = enemy.rect.center_x().round() as i32;
        if let Some(sprite) = resolve_cached_sprite(
            sprite_cache,
            warned_missing_sprite_keys,
            asset_root,
            sprite_keys::ALERT,
        ) {
            let left = center_x - sprite.width as i32 / 2;
            let top = enemy.rect.y.round() as i32 - sprite.height as i32 - ALERT_MARGIN_PX;
            draw_sheet_frame(frame, width, height, left, top, sprite, 0, sprite.width, false);
            continue;
        }
        let left = center_x - text::glyph_advance(ALERT_TEXT_SCALE) / 2;
        let top =
            enemy.rect.y.round() as i32 - text::text_height_px(ALERT_TEXT_SCALE) - ALERT_MARGIN_PX;
        text::draw_text_clipped(frame, width, height, left, top, "!", ALERT_TEXT_SCALE, ALERT_COLOR);
    }
}

fn draw_hud(frame: &mut [u8], width: u32, height: u32, combat: &CombatWorld) {
    draw_filled_rect(
        frame,
        width,
        height,
        HEALTH_BAR_LEFT,
        HEALTH_BAR_TOP,
        HEALTH_BAR_WIDTH,
        HEALTH_BAR_HEIGHT,
        HEALTH_BAR_BACK_COLOR,
    );
    let fill = health_bar_fill_width(
        combat.player.health,
        combat.player.max_health,
        HEALTH_BAR_WIDTH,
    );
    if fill > 0 {
        draw_filled_rect(
            frame,
            width,
            height,
            HEALTH_BAR_LEFT,
            HEALTH_BAR_TOP,
            fill,
            HEALTH_BAR_HEIGHT,
            HEALTH_BAR_FILL_COLOR,
        );
    }
    draw_rect_outline(
        frame,
        width,
        height,
        HEALTH_BAR_LEFT,
        HEALTH_BAR_TOP,
        HEALTH_BAR_WIDTH,
        HEALTH_BAR_HEIGHT,
        HEALTH_BAR_BORDER_COLOR,
    );

    for pip in 0..combat.player.controller.grenades_left() {
        let left = HEALTH_BAR_LEFT + pip as i32 * (GRENADE_PIP_SIZE + GRENADE_PIP_GAP);
        draw_filled_rect(
            frame,
            width,
            height,
            left,
            GRENADE_PIP_TOP,
            GRENADE_PIP_SIZE,
            GRENADE_PIP_SIZE,
            GRENADE_PIP_COLOR,
        );
    }
}

fn health_bar_fill_width(health: i32, max_health: i32, bar_width: i32) -> i32 {
    if max_health <= 0 {
        return 0;
    }
    let ratio = (health.max(0) as f32 / max_health as f32).clamp(0.0, 1.0);
    (ratio * bar_width as f32).round() as i32
}

fn draw_game_over_banner(frame: &mut [u8], width: u32, height: u32) {
    let banner_width = text::text_width_px(GAME_OVER_TEXT, BANNER_TEXT_SCALE);
    let hint_width = text::text_width_px(RESTART_HINT_TEXT, HINT_TEXT_SCALE);
    let banner_height = text::text_height_px(BANNER_TEXT_SCALE);
    let hint_height = text::text_height_px(HINT_TEXT_SCALE);

    let content_width = banner_width.max(hint_width);
    let content_height = banner_height + BANNER_LINE_GAP_PX + hint_height;
    let content_left = (width as i32 - content_width) / 2;
    let content_top = (height as i32 - content_height) / 2;

    draw_filled_rect(
        frame,
        width,
        height,
        content_left - BANNER_PANEL_INSET_X,
        content_top - BANNER_PANEL_INSET_Y,
        content_width + BANNER_PANEL_INSET_X * 2,
        content_height + BANNER_PANEL_INSET_Y * 2,
        BANNER_PANEL_BG_COLOR,
    );
    draw_rect_outline(
        frame,
        width,
        height,
        content_left - BANNER_PANEL_INSET_X,
        content_top - BANNER_PANEL_INSET_Y,
        content_width + BANNER_PANEL_INSET_X * 2,
        content_height + BANNER_PANEL_INSET_Y * 2,
        BANNER_PANEL_BORDER_COLOR,
    );

    text::draw_text_clipped(
        frame,
        width,
        height,
        (width as i32 - banner_width) / 2,
        content_top,
        GAME_OVER_TEXT,
        BANNER_TEXT_SCALE,
        BANNER_TEXT_COLOR,
    );
    text::draw_text_clipped(
        frame,
        width,
        height,
        (width as i32 - hint_width) / 2,
        content_top + banner_height + BANNER_LINE_GAP_PX,
        RESTART_HINT_TEXT,
        HINT_TEXT_SCALE,
        HINT_TEXT_COLOR,
    );
}

fn tile_fallback_color(kind: TileKind) -> [u8; 4] {
    match kind {
        TileKind::Grass => TILE_FALLBACK_GRASS_COLOR,
        TileKind::Dirt => TILE_FALLBACK_DIRT_COLOR,
        TileKind::Platform => TILE_FALLBACK_PLATFORM_COLOR,
    }
}

fn role_fallback_color(team: Team) -> [u8; 4] {
    match team {
        Team::Player => PLAYER_FALLBACK_COLOR,
        Team::Enemy => ENEMY_FALLBACK_COLOR,
    }
}

fn resolve_cached_sprite<'a>(
    cache: &'a mut HashMap<String, Option<LoadedSprite>>,
    warned_missing_sprite_keys: &mut HashSet<String>,
    asset_root: &Path,
    key: &str,
) -> Option<&'a LoadedSprite> {
    if !cache.contains_key(key) {
        let sprite = match resolve_sprite_image_path(asset_root, key) {
            Ok(path) => match load_sprite_rgba(&path) {
                Ok(sprite) => Some(sprite),
                Err(reason) => {
                    warn_sprite_load_once(
                        warned_missing_sprite_keys,
                        key,
                        Some(path.as_path()),
                        reason.as_str(),
                    );
                    None
                }
            },
            Err(reason) => {
                warn_sprite_load_once(warned_missing_sprite_keys, key, None, reason.as_str());
                None
            }
        };
        cache.insert(key.to_string(), sprite);
    }
    cache.get(key).and_then(Option::as_ref)
}

fn resolve_sprite_image_path(asset_root: &Path, key: &str) -> Result<PathBuf, String> {
    validate_sprite_key(key).map_err(|error| format!("invalid_key:{error}"))?;
    Ok(asset_root.join("sprites").join(format!("{key}.png")))
}

fn load_sprite_rgba(path: &Path) -> Result<LoadedSprite, String> {
    let reader = ImageReader::open(path).map_err(|error| format!("file_open_failed:{error}"))?;
    let decoded = reader
        .decode()
        .map_err(|error| format!("decode_failed:{error}"))?;
    let image = decoded.to_rgba8();
    Ok(LoadedSprite {
        width: image.width(),
        height: image.height(),
        rgba: image.into_raw(),
    })
}

fn warn_sprite_load_once(
    warned_keys: &mut HashSet<String>,
    key: &str,
    resolved_path: Option<&Path>,
    reason: &str,
) {
    if !warned_keys.insert(key.to_string()) {
        return;
    }
    let path_display = resolved_path
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "<unresolved>".to_string());
    warn!(
        sprite_key = key,
        path = %path_display,
        reason = reason,
        "renderer_sprite_load_failed_using_fallback"
    );
}

/// Copies one animation frame out of a horizontal sheet, clipped to the
/// buffer. `mirror_x` flips the frame for left-facing roles; sheets are
/// authored facing right. Zero-alpha texels are skipped, everything else is
/// copied opaque.
#[allow(clippy::too_many_arguments)]
fn draw_sheet_frame(
    frame: &mut [u8],
    width: u32,
    height: u32,
    left: i32,
    top: i32,
    sprite: &LoadedSprite,
    src_left: u32,
    src_width: u32,
    mirror_x: bool,
) {
    if src_width == 0 || sprite.height == 0 || width == 0 || height == 0 {
        return;
    }
    let src_right = match src_left.checked_add(src_width) {
        Some(right) if right <= sprite.width => right,
        _ => return,
    };
    let expected_rgba_len = sprite.width as usize * sprite.height as usize * 4;
    if sprite.rgba.len() < expected_rgba_len {
        return;
    }

    let right = left + src_width as i32;
    let bottom = top + sprite.height as i32;
    let draw_left = left.max(0);
    let draw_top = top.max(0);
    let draw_right = right.min(width as i32);
    let draw_bottom = bottom.min(height as i32);
    if draw_left >= draw_right || draw_top >= draw_bottom {
        return;
    }

    let frame_width = width as usize;
    let sprite_width = sprite.width as usize;

    for out_y in draw_top..draw_bottom {
        let src_y = (out_y - top) as usize;
        let src_row_offset = src_y * sprite_width * 4;
        let dst_row_offset = out_y as usize * frame_width * 4;

        for out_x in draw_left..draw_right {
            let dx = (out_x - left) as u32;
            let src_x = if mirror_x {
                src_right - 1 - dx
            } else {
                src_left + dx
            };
            let src_offset = src_row_offset + src_x as usize * 4;
            let alpha = sprite.rgba[src_offset + 3];
            if alpha == 0 {
                continue;
            }
            let dst_offset = dst_row_offset + out_x as usize * 4;
            frame[dst_offset] = sprite.rgba[src_offset];
            frame[dst_offset + 1] = sprite.rgba[src_offset + 1];
            frame[dst_offset + 2] = sprite.rgba[src_offset + 2];
            frame[dst_offset + 3] = alpha;
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_filled_rect(
    frame: &mut [u8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    rect_width: i32,
    rect_height: i32,
    color: [u8; 4],
) {
    let start_x = x.max(0);
    let start_y = y.max(0);
    let end_x = (x + rect_width).min(width as i32);
    let end_y = (y + rect_height).min(height as i32);
    if end_x <= start_x || end_y <= start_y {
        return;
    }

    let width_usize = width as usize;
    for py in start_y..end_y {
        for px in start_x..end_x {
            write_pixel_rgba(frame, width_usize, px as usize, py as usize, color);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_rect_outline(
    frame: &mut [u8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    rect_width: i32,
    rect_height: i32,
    color: [u8; 4],
) {
    if rect_width <= 1 || rect_height <= 1 {
        return;
    }
    draw_filled_rect(frame, width, height, x, y, rect_width, 1, color);
    draw_filled_rect(
        frame,
        width,
        height,
        x,
        y + rect_height - 1,
        rect_width,
        1,
        color,
    );
    draw_filled_rect(frame, width, height, x, y, 1, rect_height, color);
    draw_filled_rect(
        frame,
        width,
        height,
        x + rect_width - 1,
        y,
        1,
        rect_height,
        color,
    );
}

fn write_pixel_rgba(frame: &mut [u8], width: usize, x: usize, y: usize, color: [u8; 4]) {
    let Some(pixel_offset) = y.checked_mul(width).and_then(|row| row.checked_add(x)) else {
        return;
    };
    let Some(byte_offset) = pixel_offset.checked_mul(4) else {
        return;
    };
    let Some(end) = byte_offset.checked_add(4) else {
        return;
    };
    if end > frame.len() {
        return;
    }

    frame[byte_offset..end].copy_from_slice(&color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{
        spawn_player, ActionClip, ClipSet, ControllerKind, EntityId, PlayerState, Vec2,
        ANIM_CADENCE_DEFAULT,
    };
    use tempfile::TempDir;

    fn clip(sheet: &str, frame_width: u32, frame_height: u32) -> ActionClip {
        ActionClip {
            sheet: sheet.to_string(),
            frame_width,
            frame_height,
            frame_count: 2,
            cadence: ANIM_CADENCE_DEFAULT,
            looped: true,
        }
    }

    fn clip_set(frame_width: u32, frame_height: u32) -> ClipSet {
        ClipSet {
            idle: clip("soldier_idle", frame_width, frame_height),
            run: clip("soldier_run", frame_width, frame_height),
            jump: clip("soldier_jump", frame_width, frame_height),
            death: clip("soldier_death", frame_width, frame_height),
            idle_hit: None,
            run_hit: None,
        }
    }

    fn sprite_from_pixels(width: u32, height: u32, pixels: &[[u8; 4]]) -> LoadedSprite {
        assert_eq!(pixels.len(), (width * height) as usize);
        let mut rgba = Vec::with_capacity(pixels.len() * 4);
        for pixel in pixels {
            rgba.extend_from_slice(pixel);
        }
        LoadedSprite {
            width,
            height,
            rgba,
        }
    }

    fn pixel_at(frame: &[u8], width: u32, x: i32, y: i32) -> [u8; 4] {
        let offset = (y as usize * width as usize + x as usize) * 4;
        [
            frame[offset],
            frame[offset + 1],
            frame[offset + 2],
            frame[offset + 3],
        ]
    }

    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];
    const CLEAR: [u8; 4] = [0, 0, 0, 0];

    #[test]
    fn renderer_type_is_non_generic() {
        let _renderer: Option<Renderer> = None;
    }

    #[test]
    fn health_bar_fill_is_proportional_and_clamped() {
        assert_eq!(health_bar_fill_width(100, 100, 150), 150);
        assert_eq!(health_bar_fill_width(50, 100, 150), 75);
        assert_eq!(health_bar_fill_width(0, 100, 150), 0);
        assert_eq!(health_bar_fill_width(-20, 100, 150), 0);
        assert_eq!(health_bar_fill_width(150, 100, 150), 150);
        assert_eq!(health_bar_fill_width(10, 0, 150), 0);
    }

    #[test]
    fn sheet_frame_draw_selects_the_requested_frame() {
        let sprite = sprite_from_pixels(4, 1, &[RED, RED, BLUE, BLUE]);
        let mut frame = vec![0u8; 4 * 4 * 4];

        draw_sheet_frame(&mut frame, 4, 4, 0, 0, &sprite, 2, 2, false);

        assert_eq!(pixel_at(&frame, 4, 0, 0), BLUE);
        assert_eq!(pixel_at(&frame, 4, 1, 0), BLUE);
        assert_eq!(pixel_at(&frame, 4, 2, 0), CLEAR);
    }

    #[test]
    fn sheet_frame_draw_mirrors_horizontally() {
        let sprite = sprite_from_pixels(2, 1, &[RED, BLUE]);
        let mut frame = vec![0u8; 4 * 4 * 4];

        draw_sheet_frame(&mut frame, 4, 4, 0, 0, &sprite, 0, 2, true);

        assert_eq!(pixel_at(&frame, 4, 0, 0), BLUE);
        assert_eq!(pixel_at(&frame, 4, 1, 0), RED);
    }

    #[test]
    fn sheet_frame_draw_skips_transparent_texels() {
        let sprite = sprite_from_pixels(2, 1, &[[255, 0, 0, 0], BLUE]);
        let mut frame = vec![0u8; 4 * 4 * 4];

        draw_sheet_frame(&mut frame, 4, 4, 0, 0, &sprite, 0, 2, false);

        assert_eq!(pixel_at(&frame, 4, 0, 0), CLEAR);
        assert_eq!(pixel_at(&frame, 4, 1, 0), BLUE);
    }

    #[test]
    fn sheet_frame_draw_rejects_frames_outside_the_sheet() {
        let sprite = sprite_from_pixels(4, 1, &[RED, RED, BLUE, BLUE]);
        let mut frame = vec![0u8; 4 * 4 * 4];

        draw_sheet_frame(&mut frame, 4, 4, 0, 0, &sprite, 4, 2, false);
        draw_sheet_frame(&mut frame, 4, 4, 0, 0, &sprite, u32::MAX, 2, false);

        assert!(frame.iter().all(|byte| *byte == 0));
    }

    #[test]
    fn sheet_frame_draw_clips_negative_origins_safely() {
        let sprite = sprite_from_pixels(2, 2, &[RED, BLUE, BLUE, RED]);
        let mut frame = vec![0u8; 2 * 2 * 4];

        draw_sheet_frame(&mut frame, 2, 2, -1, -1, &sprite, 0, 2, false);

        // Only the sprite's bottom-right texel lands inside the buffer.
        assert_eq!(pixel_at(&frame, 2, 0, 0), RED);
        assert_eq!(pixel_at(&frame, 2, 1, 0), CLEAR);
        assert_eq!(pixel_at(&frame, 2, 0, 1), CLEAR);
    }

    #[test]
    fn sprite_path_resolution_and_missing_asset_behavior() {
        let temp = TempDir::new().expect("temp");
        let asset_root = temp.path();

        assert!(resolve_sprite_image_path(asset_root, r"bad\key").is_err());

        let valid_path = resolve_sprite_image_path(asset_root, "soldier_idle").expect("path");
        assert_eq!(
            valid_path,
            asset_root.join("sprites").join("soldier_idle.png")
        );
        assert!(load_sprite_rgba(&valid_path).is_err());
    }

    #[test]
    fn missing_sprite_is_cached_and_warned_once() {
        let temp = TempDir::new().expect("temp");
        let mut cache = HashMap::new();
        let mut warned = HashSet::new();

        assert!(resolve_cached_sprite(&mut cache, &mut warned, temp.path(), "bullet").is_none());
        assert!(resolve_cached_sprite(&mut cache, &mut warned, temp.path(), "bullet").is_none());

        assert_eq!(cache.len(), 1);
        assert_eq!(warned.len(), 1);
        assert!(warned.contains("bullet"));
    }

    #[test]
    fn role_draw_falls_back_to_team_color_when_sheet_is_missing() {
        let temp = TempDir::new().expect("temp");
        let player = spawn_player(
            EntityId(0),
            Vec2::new(2.0, 2.0),
            clip_set(4, 4),
            clip("explosion", 4, 4),
        );
        let mut cache = HashMap::new();
        let mut warned = HashSet::new();
        let mut frame = vec![0u8; 16 * 16 * 4];

        draw_role(&mut frame, 16, 16, &player, &mut cache, &mut warned, temp.path());

        assert_eq!(pixel_at(&frame, 16, 3, 3), PLAYER_FALLBACK_COLOR);
        assert_eq!(pixel_at(&frame, 16, 0, 0), CLEAR);
    }

    #[test]
    fn hud_health_bar_shows_fill_over_backdrop() {
        let player = spawn_player(
            EntityId(0),
            Vec2::new(100.0, 400.0),
            clip_set(4, 4),
            clip("explosion", 4, 4),
        );
        let mut combat = CombatWorld::new(player, Vec::new(), Vec::new(), 3200.0);

        let mut frame = vec![0u8; 200 * 64 * 4];
        draw_hud(&mut frame, 200, 64, &combat);
        assert_eq!(
            pixel_at(&frame, 200, HEALTH_BAR_LEFT + 2, HEALTH_BAR_TOP + 2),
            HEALTH_BAR_FILL_COLOR
        );

        combat.player.health = 0;
        let mut frame = vec![0u8; 200 * 64 * 4];
        draw_hud(&mut frame, 200, 64, &combat);
        assert_eq!(
            pixel_at(&frame, 200, HEALTH_BAR_LEFT + 2, HEALTH_BAR_TOP + 2),
            HEALTH_BAR_BACK_COLOR
        );
    }

    #[test]
    fn hud_grenade_pips_match_remaining_inventory() {
        let player = spawn_player(
            EntityId(0),
            Vec2::new(100.0, 400.0),
            clip_set(4, 4),
            clip("explosion", 4, 4),
        );
        let mut combat = CombatWorld::new(player, Vec::new(), Vec::new(), 3200.0);
        combat.player.controller = ControllerKind::Player(PlayerState { grenades_left: 2 });

        let mut frame = vec![0u8; 200 * 64 * 4];
        draw_hud(&mut frame, 200, 64, &combat);

        let pip_x = |index: i32| HEALTH_BAR_LEFT + index * (GRENADE_PIP_SIZE + GRENADE_PIP_GAP) + 1;
        assert_eq!(
            pixel_at(&frame, 200, pip_x(0), GRENADE_PIP_TOP + 1),
            GRENADE_PIP_COLOR
        );
        assert_eq!(
            pixel_at(&frame, 200, pip_x(1), GRENADE_PIP_TOP + 1),
            GRENADE_PIP_COLOR
        );
        assert_eq!(pixel_at(&frame, 200, pip_x(2), GRENADE_PIP_TOP + 1), CLEAR);
    }

    #[test]
    fn tiles_draw_shifted_by_the_shake_offset() {
        let temp = TempDir::new().expect("temp");
        let tiles = vec![Tile::at_cell(TileKind::Grass, 0, 0, true)];
        let mut cache = HashMap::new();
        let mut warned = HashSet::new();

        let mut still = vec![0u8; 64 * 64 * 4];
        draw_tiles(
            &mut still,
            64,
            64,
            &tiles,
            (0, 0),
            &mut cache,
            &mut warned,
            temp.path(),
        );
        assert_eq!(pixel_at(&still, 64, 0, 0), TILE_FALLBACK_GRASS_COLOR);

        let mut shaken = vec![0u8; 64 * 64 * 4];
        draw_tiles(
            &mut shaken,
            64,
            64,
            &tiles,
            (4, 2),
            &mut cache,
            &mut warned,
            temp.path(),
        );
        assert_eq!(pixel_at(&shaken, 64, 0, 0), CLEAR);
        assert_eq!(pixel_at(&shaken, 64, 4, 2), TILE_FALLBACK_GRASS_COLOR);
    }

    #[test]
    fn game_over_banner_draws_panel_and_text() {
        let width = SCREEN_WIDTH as u32;
        let height = SCREEN_HEIGHT as u32;
        let mut frame = vec![0u8; (width * height * 4) as usize];

        draw_game_over_banner(&mut frame, width, height);

        let has_panel = frame
            .chunks_exact(4)
            .any(|chunk| chunk == BANNER_PANEL_BG_COLOR);
        let has_text = frame
            .chunks_exact(4)
            .any(|chunk| chunk == BANNER_TEXT_COLOR);
        assert!(has_panel);
        assert!(has_text);
    }

    #[test]
    fn rect_primitives_clip_out_of_bounds_coordinates() {
        let mut frame = vec![0u8; 8 * 8 * 4];
        draw_filled_rect(&mut frame, 8, 8, -4, -4, 2, 2, RED);
        draw_filled_rect(&mut frame, 8, 8, 64, 64, 4, 4, RED);
        draw_rect_outline(&mut frame, 8, 8, -100, -100, 4, 4, RED);
        assert!(frame.iter().all(|byte| *byte == 0));
    }
}
