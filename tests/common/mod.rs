#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use twin_slider::{
    BoxedEngine, Engine, EngineEvent, Environment, LayoutProbe, LiveRegion, MemorySink, Rect,
    SharedLiveRegion, Slider, SliderConfig, StripEngine,
};

/// Layout probe over a fixed page; every spacer write is recorded.
#[derive(Clone, Default)]
pub struct FakePage {
    pub overflow: Vec<f32>,
    pub spacer_writes: Rc<RefCell<Vec<f32>>>,
}

impl LayoutProbe for FakePage {
    fn container(&self) -> Option<Rect> {
        Some(Rect::new(0.0, 0.0, 800.0, 400.0))
    }

    fn slide_bounds(&self, _index: usize) -> Option<Rect> {
        Some(Rect::new(0.0, 0.0, 800.0, 400.0))
    }

    fn decorations(&self, index: usize) -> Vec<Rect> {
        let overflow = self.overflow.get(index).copied().unwrap_or(0.0);
        vec![Rect::new(40.0, 300.0, 120.0, 100.0 + overflow)]
    }

    fn set_spacer_height(&mut self, height: f32) {
        self.spacer_writes.borrow_mut().push(height);
    }
}

pub struct Harness {
    pub slider: Slider,
    pub region: SharedLiveRegion,
    pub sink: MemorySink,
    pub page: FakePage,
}

pub fn engine(count: usize, looped: bool) -> twin_slider::error::Result<BoxedEngine> {
    StripEngine::new(count, looped).map(|e| Box::new(e) as BoxedEngine)
}

pub fn labels(count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("Caption {i}")).collect()
}

pub fn mount(count: usize, config: SliderConfig) -> Harness {
    mount_with(count, config, Environment::default())
}

pub fn mount_with(count: usize, config: SliderConfig, environment: Environment) -> Harness {
    let looped = config.loop_enabled;
    mount_engines(
        count,
        config,
        environment,
        engine(count, looped),
        engine(count, looped),
    )
}

pub fn mount_engines(
    count: usize,
    config: SliderConfig,
    environment: Environment,
    image: twin_slider::error::Result<BoxedEngine>,
    content: twin_slider::error::Result<BoxedEngine>,
) -> Harness {
    let sink = MemorySink::default();
    let region = LiveRegion::new(Box::new(sink.clone())).shared();
    let page = FakePage {
        overflow: (0..count).map(|i| (i % 2) as f32 * 30.0).collect(),
        ..FakePage::default()
    };
    let slider = Slider::mount(
        config,
        environment,
        image,
        content,
        labels(count),
        &region,
        Box::new(page.clone()),
    );
    Harness {
        slider,
        region,
        sink,
        page,
    }
}

pub fn manual() -> SliderConfig {
    SliderConfig {
        autoplay: false,
        ..SliderConfig::default()
    }
}

/// Engine handle kept by the test while the slider drives the same engine,
/// so gestures can land on it directly.
pub struct Shared<E>(pub Rc<RefCell<E>>);

impl<E: Engine> Engine for Shared<E> {
    fn slide_count(&self) -> usize {
        self.0.borrow().slide_count()
    }
    fn loop_offset(&self) -> usize {
        self.0.borrow().loop_offset()
    }
    fn native_len(&self) -> usize {
        self.0.borrow().native_len()
    }
    fn native_index(&self) -> usize {
        self.0.borrow().native_index()
    }
    fn is_transitioning(&self) -> bool {
        self.0.borrow().is_transitioning()
    }
    fn position(&self) -> f32 {
        self.0.borrow().position()
    }
    fn slide_to(&mut self, native: usize, duration_ms: u64, animate: bool) {
        self.0.borrow_mut().slide_to(native, duration_ms, animate);
    }
    fn set_navigation_enabled(&mut self, enabled: bool) {
        self.0.borrow_mut().set_navigation_enabled(enabled);
    }
    fn update(&mut self, dt_ms: u64) {
        self.0.borrow_mut().update(dt_ms);
    }
    fn poll_event(&mut self) -> Option<EngineEvent> {
        self.0.borrow_mut().poll_event()
    }
}

pub struct SharedHarness<E> {
    pub h: Harness,
    pub image: Rc<RefCell<E>>,
    pub content: Rc<RefCell<E>>,
}

pub fn mount_shared<E: Engine + 'static>(
    count: usize,
    config: SliderConfig,
    image: E,
    content: E,
) -> SharedHarness<E> {
    let image = Rc::new(RefCell::new(image));
    let content = Rc::new(RefCell::new(content));
    let h = mount_engines(
        count,
        config,
        Environment::default(),
        Ok(Box::new(Shared(image.clone())) as BoxedEngine),
        Ok(Box::new(Shared(content.clone())) as BoxedEngine),
    );
    SharedHarness { h, image, content }
}

/// Looping engine that always settles in the middle band, whichever copy
/// it was asked for. Moves land instantly.
pub struct Recentring {
    count: usize,
    active: usize,
    events: Vec<EngineEvent>,
}

impl Recentring {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            active: count,
            events: Vec::new(),
        }
    }
}

impl Engine for Recentring {
    fn slide_count(&self) -> usize {
        self.count
    }
    fn loop_offset(&self) -> usize {
        self.count
    }
    fn native_len(&self) -> usize {
        3 * self.count
    }
    fn native_index(&self) -> usize {
        self.active
    }
    fn is_transitioning(&self) -> bool {
        false
    }
    fn slide_to(&mut self, native: usize, _duration_ms: u64, _animate: bool) {
        let landed = self.count + native % self.count;
        if landed != self.active {
            self.active = landed;
            self.events.push(EngineEvent::SlideChange { native: landed });
        }
    }
    fn set_navigation_enabled(&mut self, _enabled: bool) {}
    fn update(&mut self, _dt_ms: u64) {}
    fn poll_event(&mut self) -> Option<EngineEvent> {
        (!self.events.is_empty()).then(|| self.events.remove(0))
    }
}
