use raylib::prelude::*;
use twin_slider::{Priority, Rect, Slider, Track, TrackFrame};

use crate::viewer::page::Geometry;

const BACKGROUND: Color = Color::new(18, 18, 22, 255);
const PANEL: Color = Color::new(34, 34, 42, 255);
const FADE_IN_MS: f32 = 300.0;

fn rectangle(r: Rect) -> Rectangle {
    Rectangle::new(r.x, r.y, r.width, r.height)
}

/// Native slots visible around a track position.
fn visible_slots(frame: &TrackFrame) -> impl Iterator<Item = usize> + '_ {
    let first = frame.position.floor() as isize - 1;
    let last = frame.position.ceil() as isize + 1;
    (first.max(0)..=last)
        .filter(move |&k| (k as usize) < frame.native_len)
        .map(|k| k as usize)
}

pub struct Scene {
    textures: Vec<Texture2D>,
    captions: Vec<String>,
}

impl Scene {
    pub fn new(textures: Vec<Texture2D>, captions: Vec<String>) -> Self {
        Self { textures, captions }
    }

    pub fn draw(
        &self,
        d: &mut RaylibDrawHandle,
        slider: &Slider,
        geometry: &Geometry,
        status: Option<&(Priority, String)>,
        entrance: f32,
    ) {
        d.clear_background(BACKGROUND);

        if slider.slide_count() == 0 {
            d.draw_text("No slides", 24, 24, 24, Color::LIGHTGRAY);
        } else {
            self.draw_image_track(d, slider, geometry);
            self.draw_content_track(d, slider, geometry, entrance);
            Self::mask_outside(d, geometry);
            Self::draw_badge(d, slider, geometry);
            Self::draw_controls(d, slider, geometry);
        }
        Self::draw_spacer(d, geometry);
        Self::draw_status(d, geometry, status);
    }

    fn draw_image_track(&self, d: &mut RaylibDrawHandle, slider: &Slider, geometry: &Geometry) {
        let area = geometry.image_area();
        d.draw_rectangle_rec(rectangle(area), PANEL);
        let Some(frame) = slider.track(Track::Image).frame() else {
            self.draw_texture(d, 0, area);
            return;
        };
        for native in visible_slots(&frame) {
            let shift = (native as f32 - frame.position) * area.width;
            let slot = Rect::new(area.x + shift, area.y, area.width, area.height);
            self.draw_texture(d, frame.logical(native), slot);
        }
    }

    // Letterboxed into `slot`, aspect ratio kept.
    fn draw_texture(&self, d: &mut RaylibDrawHandle, index: usize, slot: Rect) {
        let Some(texture) = self.textures.get(index) else {
            return;
        };
        let (tw, th) = (texture.width() as f32, texture.height() as f32);
        if tw <= 0.0 || th <= 0.0 {
            return;
        }
        let scale = (slot.width / tw).min(slot.height / th);
        let (w, h) = (tw * scale, th * scale);
        d.draw_texture_pro(
            texture,
            Rectangle::new(0.0, 0.0, tw, th),
            Rectangle::new(slot.x + (slot.width - w) / 2.0, slot.y + (slot.height - h) / 2.0, w, h),
            Vector2::new(0.0, 0.0),
            0.0,
            Color::WHITE,
        );
    }

    fn draw_content_track(
        &self,
        d: &mut RaylibDrawHandle,
        slider: &Slider,
        geometry: &Geometry,
        entrance: f32,
    ) {
        let area = geometry.content_area();
        let (frame, current) = match slider.track(Track::Content).frame() {
            Some(frame) => (frame, slider.current()),
            None => {
                self.draw_caption(d, slider, 0, area, 1.0);
                return;
            }
        };
        for native in visible_slots(&frame) {
            let shift = (native as f32 - frame.position) * area.width;
            let slot = Rect::new(area.x + shift, area.y, area.width, area.height);
            let logical = frame.logical(native);
            let alpha = if Some(logical) == current { entrance } else { 1.0 };
            self.draw_caption(d, slider, logical, slot, alpha);
        }
    }

    fn draw_caption(
        &self,
        d: &mut RaylibDrawHandle,
        slider: &Slider,
        index: usize,
        slot: Rect,
        alpha: f32,
    ) {
        d.draw_rectangle_rec(rectangle(slot), PANEL);
        let color = Color::RAYWHITE.fade(alpha.clamp(0.0, 1.0));
        let caption = self.captions.get(index).map_or("", String::as_str);
        let x = slot.x as i32 + 16;
        d.draw_text(caption, x, slot.y as i32 + 16, 24, color);
        let aria = slider.slide_aria(index);
        d.draw_text(&aria.label, x, slot.y as i32 + 52, 18, Color::GRAY);
    }

    // The tracks slide under the page background on both sides.
    fn mask_outside(d: &mut RaylibDrawHandle, geometry: &Geometry) {
        let container = geometry.container();
        d.draw_rectangle_rec(
            Rectangle::new(0.0, container.y, container.x, container.height),
            BACKGROUND,
        );
        let right = container.x + container.width;
        d.draw_rectangle_rec(
            Rectangle::new(right, container.y, geometry.screen_width - right, container.height),
            BACKGROUND,
        );
    }

    fn draw_badge(d: &mut RaylibDrawHandle, slider: &Slider, geometry: &Geometry) {
        let Some((rect, color)) = slider.current().and_then(|i| geometry.badge(i)) else {
            return;
        };
        d.draw_rectangle_rec(rectangle(rect), color);
    }

    fn draw_controls(d: &mut RaylibDrawHandle, slider: &Slider, geometry: &Geometry) {
        let controls = slider.controls();
        if !controls.navigation_enabled {
            return;
        }
        let mut hints = vec![
            format!("[Left] {}", controls.previous_label),
            format!("[Right] {}", controls.next_label),
        ];
        if controls.playback_visible {
            hints.push(format!("[Space] {}", controls.play_pause_label));
            hints.push(format!("[S] {}", controls.stop_label));
        }
        let y = geometry.image_area().y as i32 + 8;
        d.draw_text(&hints.join("   "), 36, y, 16, Color::LIGHTGRAY);
    }

    fn draw_spacer(d: &mut RaylibDrawHandle, geometry: &Geometry) {
        let container = geometry.container();
        let spacer = Rect::new(container.x, container.bottom(), container.width, geometry.spacer);
        if spacer.height > 0.0 {
            d.draw_rectangle_lines_ex(rectangle(spacer), 1.0, Color::DARKGRAY);
        }
        d.draw_text(
            "Page content continues here",
            container.x as i32,
            (spacer.bottom() + 8.0) as i32,
            18,
            Color::GRAY,
        );
    }

    fn draw_status(
        d: &mut RaylibDrawHandle,
        geometry: &Geometry,
        status: Option<&(Priority, String)>,
    ) {
        let area = geometry.status_area();
        d.draw_rectangle_rec(rectangle(area), PANEL);
        if let Some((priority, text)) = status {
            let color = match priority {
                Priority::Polite => Color::LIGHTGRAY,
                Priority::Assertive => Color::ORANGE,
            };
            d.draw_text(text, 12, area.y as i32 + 6, 16, color);
        }
    }
}

/// Fade-in progress of a slide that became active `elapsed_ms` ago.
pub fn entrance_progress(elapsed_ms: u64) -> f32 {
    (elapsed_ms as f32 / FADE_IN_MS).min(1.0)
}
