use std::sync::Arc;

use bevy_ecs::prelude::*;
use raylib::prelude::*;

use crate::components::animation::AnimationTrack;
use crate::components::part::{Part, ZIndex};
use crate::resources::displaylist::DisplayList;
use crate::resources::messages::MessageQueue;
use crate::resources::overlay::{OverlaySpace, Pointing};
use crate::resources::presentation::PresentationController;
use crate::resources::texturestore::TextureStore;

const MESSAGE_FONT_SIZE: i32 = 16;
const MESSAGE_LINE_HEIGHT: f32 = 20.0;
const MESSAGE_COLORS: [Color; 6] = [
    Color::DARKBLUE,
    Color::DARKGREEN,
    Color::MAROON,
    Color::DARKPURPLE,
    Color::DARKBROWN,
    Color::DARKGRAY,
];

/// Draw the attached frame of every part, back to front, then the overlays.
///
/// Every frame texture covers the full canvas; the crop and the reserved top
/// band are applied by offsetting the destination rectangle.
pub fn render_pass(world: &mut World, d: &mut RaylibDrawHandle) {
    let controller = world.resource::<PresentationController>();
    let t = controller.transform();
    let ratio = t.scale_ratio();
    let crop = t.crop();
    let origin_x = -crop.left * ratio;
    let origin_y = t.extra_top() - crop.top * ratio;
    let window = t.position();
    let window_w = t.width();
    let placements = controller.placements();

    // Query: (Part, ZIndex, AnimationTrack)
    // We'll collect the current frame id, sort by z, then draw.
    let mut to_draw: Vec<(ZIndex, Arc<str>, Arc<str>)> = {
        let mut q = world.query::<(&Part, &ZIndex, &AnimationTrack)>();
        q.iter(world)
            .filter_map(|(part, z, track)| {
                track
                    .current_frame()
                    .map(|frame| (*z, part.name.clone(), frame.clone()))
            })
            .collect()
    };
    let display = world.resource::<DisplayList>();
    to_draw.retain(|(_, part, _)| display.is_attached(part));
    to_draw.sort_by_key(|(z, _, _)| *z);

    let textures = world.resource::<TextureStore>();
    for (_z, _part, frame) in to_draw.iter() {
        if let Some(tex) = textures.get(frame) {
            let src = Rectangle {
                x: 0.0,
                y: 0.0,
                width: tex.width as f32,
                height: tex.height as f32,
            };
            let dest = Rectangle {
                x: origin_x,
                y: origin_y,
                width: tex.width as f32 * ratio,
                height: tex.height as f32 * ratio,
            };
            d.draw_texture_pro(tex, src, dest, Vector2 { x: 0.0, y: 0.0 }, 0.0, Color::WHITE);
        }
    }

    let messages = world.resource::<MessageQueue>();
    for placement in placements.iter().filter(|p| p.visible) {
        match (placement.name, placement.space) {
            ("message_panel", OverlaySpace::Screen) => {
                if messages.shown().next().is_none() {
                    continue;
                }
                // Only the part of the panel inside the window can be drawn.
                let mut x = placement.rect.x - window.x;
                x = x.clamp(0.0, (window_w - placement.rect.width).max(0.0));
                let mut y = placement.rect.y - window.y;
                for message in messages.shown() {
                    let color =
                        MESSAGE_COLORS[(message.color_hash % MESSAGE_COLORS.len() as u64) as usize];
                    let text_x = match placement.pointing {
                        Some(Pointing::Right) => {
                            x + placement.rect.width
                                - raylib::core::text::measure_text(&message.text, MESSAGE_FONT_SIZE) as f32
                        }
                        _ => x,
                    };
                    d.draw_text(
                        &message.text,
                        text_x as i32,
                        y as i32,
                        MESSAGE_FONT_SIZE,
                        color,
                    );
                    y += MESSAGE_LINE_HEIGHT;
                }
            }
            (_, OverlaySpace::Scene) => {
                d.draw_rectangle_rounded(placement.rect, 0.5, 4, Color::new(0, 0, 0, 96));
                d.draw_rectangle_lines_ex(placement.rect, 1.0, Color::RAYWHITE);
            }
            _ => {}
        }
    }
}
