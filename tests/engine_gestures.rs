//! Gestures that land on an engine directly, outside the slider's own
//! `swipe_track`, mixed with navigation in the same frame.

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use twin_slider::{ChangeOrigin, Direction, Slider, StripEngine, Track};

use common::{manual, mount_shared, Recentring};

fn record(slider: &mut Slider) -> Rc<RefCell<Vec<(usize, ChangeOrigin)>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    slider.on_change(Box::new(move |c| sink.borrow_mut().push((c.index, c.origin))));
    seen
}

fn positions(slider: &Slider) -> (Option<usize>, Option<usize>) {
    (
        slider.track(Track::Image).logical_position(),
        slider.track(Track::Content).logical_position(),
    )
}

fn strips(count: usize) -> (StripEngine, StripEngine) {
    (
        StripEngine::new(count, true).unwrap(),
        StripEngine::new(count, true).unwrap(),
    )
}

#[test]
fn test_swipe_on_image_engine_during_navigation() {
    let (image, content) = strips(5);
    let mut s = mount_shared(5, manual(), image, content);
    let seen = record(&mut s.h.slider);

    s.h.slider.advance(1);
    s.image.borrow_mut().swipe(Direction::Forward);
    s.h.slider.update(0);

    assert_eq!(s.h.slider.current(), Some(2));
    assert_eq!(positions(&s.h.slider), (Some(2), Some(2)));
    for now in (16..1_000).step_by(16) {
        s.h.slider.update(now);
    }
    assert_eq!(
        *seen.borrow(),
        vec![
            (1, ChangeOrigin::Navigation),
            (2, ChangeOrigin::Gesture(Track::Image))
        ]
    );
    assert_eq!(positions(&s.h.slider), (Some(2), Some(2)));
}

#[test]
fn test_swipe_on_content_engine_during_navigation() {
    let (image, content) = strips(5);
    let mut s = mount_shared(5, manual(), image, content);
    let seen = record(&mut s.h.slider);

    s.h.slider.advance(1);
    s.content.borrow_mut().swipe(Direction::Forward);
    s.h.slider.update(0);

    assert_eq!(s.h.slider.current(), Some(2));
    assert_eq!(positions(&s.h.slider), (Some(2), Some(2)));
    for now in (16..1_000).step_by(16) {
        s.h.slider.update(now);
    }
    assert_eq!(
        *seen.borrow(),
        vec![
            (1, ChangeOrigin::Navigation),
            (2, ChangeOrigin::Gesture(Track::Content))
        ]
    );
    assert_eq!(positions(&s.h.slider), (Some(2), Some(2)));
}

#[test]
fn test_idle_engine_swipe_is_adopted_and_announced() {
    let (image, content) = strips(4);
    let mut s = mount_shared(4, manual(), image, content);
    let seen = record(&mut s.h.slider);

    s.image.borrow_mut().swipe(Direction::Forward);
    for now in (0..1_000).step_by(16) {
        s.h.slider.update(now);
    }
    assert_eq!(s.h.slider.current(), Some(1));
    assert_eq!(positions(&s.h.slider), (Some(1), Some(1)));
    assert_eq!(*seen.borrow(), vec![(1, ChangeOrigin::Gesture(Track::Image))]);
    assert_eq!(s.h.sink.writes(), vec!["Slide 2 of 4: Caption 2"]);
}

#[test]
fn test_engine_settling_on_another_copy_is_still_an_echo() {
    let mut s = mount_shared(3, manual(), Recentring::new(3), Recentring::new(3));
    let seen = record(&mut s.h.slider);

    s.h.slider.prev();
    s.h.slider.update(0);
    s.h.slider.go_to(1);
    s.h.slider.go_to(0);
    s.h.slider.update(16);
    s.h.slider.update(32);

    assert_eq!(
        *seen.borrow(),
        vec![
            (2, ChangeOrigin::Navigation),
            (1, ChangeOrigin::Navigation),
            (0, ChangeOrigin::Navigation)
        ]
    );
    assert_eq!(s.h.slider.current(), Some(0));
    assert_eq!(positions(&s.h.slider), (Some(0), Some(0)));
}
