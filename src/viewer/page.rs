//! The window seen as a page: where the two tracks sit, the decorations that
//! hang below them, and the status line standing in for a live region.

use std::cell::RefCell;
use std::rc::Rc;

use rand::Rng;
use raylib::prelude::Color;
use twin_slider::{LayoutProbe, LiveRegionSink, Priority, Rect};

const MARGIN: f32 = 24.0;
const GAP: f32 = 12.0;
const CONTENT_HEIGHT: f32 = 96.0;
const STATUS_HEIGHT: f32 = 28.0;

/// A decorative badge pinned to the bottom-left of the caption box.
#[derive(Debug, Clone, Copy)]
pub struct Badge {
    pub inset: f32,
    pub width: f32,
    /// How far the badge reaches below the caption box.
    pub overhang: f32,
    pub color: Color,
}

impl Badge {
    pub fn random(rng: &mut impl Rng) -> Self {
        Self {
            inset: rng.random_range(16.0..160.0),
            width: rng.random_range(60.0..140.0),
            overhang: if rng.random_bool(0.5) {
                rng.random_range(8.0..64.0)
            } else {
                0.0
            },
            color: Color::new(
                rng.random_range(90..=230),
                rng.random_range(90..=230),
                rng.random_range(90..=230),
                255,
            ),
        }
    }
}

#[derive(Debug, Default)]
pub struct Geometry {
    pub screen_width: f32,
    pub screen_height: f32,
    pub badges: Vec<Badge>,
    pub spacer: f32,
}

impl Geometry {
    pub fn image_area(&self) -> Rect {
        let free = self.screen_height - CONTENT_HEIGHT - STATUS_HEIGHT - 2.0 * MARGIN - GAP;
        let height = free * 0.7;
        Rect::new(MARGIN, MARGIN, self.screen_width - 2.0 * MARGIN, height.max(0.0))
    }

    pub fn content_area(&self) -> Rect {
        let image = self.image_area();
        Rect::new(image.x, image.bottom() + GAP, image.width, CONTENT_HEIGHT)
    }

    /// Both tracks; the spacer goes right below it.
    pub fn container(&self) -> Rect {
        let image = self.image_area();
        Rect::new(image.x, image.y, image.width, self.content_area().bottom() - image.y)
    }

    pub fn badge(&self, index: usize) -> Option<(Rect, Color)> {
        let badge = self.badges.get(index)?;
        let content = self.content_area();
        let height = 24.0 + badge.overhang;
        Some((
            Rect::new(content.x + badge.inset, content.bottom() - 24.0, badge.width, height),
            badge.color,
        ))
    }

    pub fn status_area(&self) -> Rect {
        Rect::new(
            0.0,
            self.screen_height - STATUS_HEIGHT,
            self.screen_width,
            STATUS_HEIGHT,
        )
    }
}

pub type SharedGeometry = Rc<RefCell<Geometry>>;

/// Layout probe over the window geometry.
pub struct WindowPage {
    geometry: SharedGeometry,
}

impl WindowPage {
    pub fn new(geometry: &SharedGeometry) -> Self {
        Self {
            geometry: Rc::clone(geometry),
        }
    }
}

impl LayoutProbe for WindowPage {
    fn container(&self) -> Option<Rect> {
        let geometry = self.geometry.borrow();
        (geometry.screen_width > 0.0).then(|| geometry.container())
    }

    fn slide_bounds(&self, _index: usize) -> Option<Rect> {
        Some(self.geometry.borrow().image_area())
    }

    fn decorations(&self, index: usize) -> Vec<Rect> {
        self.geometry
            .borrow()
            .badge(index)
            .map(|(rect, _)| rect)
            .into_iter()
            .collect()
    }

    fn set_spacer_height(&mut self, height: f32) {
        self.geometry.borrow_mut().spacer = height;
    }
}

pub type SharedStatus = Rc<RefCell<Option<(Priority, String)>>>;

/// Live region drawn as a status line at the bottom of the window.
pub struct StatusLine {
    text: SharedStatus,
}

impl StatusLine {
    pub fn new(text: &SharedStatus) -> Self {
        Self {
            text: Rc::clone(text),
        }
    }
}

impl LiveRegionSink for StatusLine {
    fn write(&mut self, priority: Priority, message: &str) {
        *self.text.borrow_mut() = Some((priority, message.to_string()));
    }

    fn clear(&mut self) {
        *self.text.borrow_mut() = None;
    }
}
