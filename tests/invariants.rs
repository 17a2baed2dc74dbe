mod common;

use proptest::prelude::*;
use twin_slider::{Direction, PlaybackState, SliderConfig, Track};

use common::{manual, mount};

#[derive(Debug, Clone)]
enum Op {
    Advance(isize),
    GoTo(isize),
    Swipe(Track, Direction),
    Tick(u64),
}

fn op() -> impl Strategy<Value = Op> {
    let track = prop_oneof![Just(Track::Image), Just(Track::Content)];
    let direction = prop_oneof![Just(Direction::Forward), Just(Direction::Backward)];
    prop_oneof![
        (-3isize..=3).prop_map(Op::Advance),
        (-8isize..=8).prop_map(Op::GoTo),
        (track, direction).prop_map(|(t, d)| Op::Swipe(t, d)),
        (0u64..400).prop_map(Op::Tick),
    ]
}

fn passive() -> impl Strategy<Value = u8> {
    0u8..6
}

proptest! {
    #[test]
    fn tracks_follow_the_authority(
        count in 1usize..7,
        looped in any::<bool>(),
        ops in prop::collection::vec(op(), 1..40),
    ) {
        let config = SliderConfig { loop_enabled: looped, ..manual() };
        let mut h = mount(count, config);
        let mut now = 0;
        let mut last_token = 0;
        let changes = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let sink = changes.clone();
        h.slider.on_change(Box::new(move |c| sink.borrow_mut().push(c.token.0)));

        for op in ops {
            match op {
                Op::Advance(delta) => { h.slider.advance(delta); }
                Op::GoTo(index) => { h.slider.go_to(index); }
                Op::Swipe(track, direction) => h.slider.swipe_track(track, direction),
                Op::Tick(dt) => now += dt,
            }
            h.slider.update(now);

            let current = h.slider.current();
            prop_assert!(current.is_some_and(|i| i < count));
            prop_assert_eq!(h.slider.track(Track::Image).logical_position(), current);
            prop_assert_eq!(h.slider.track(Track::Content).logical_position(), current);
        }

        // Tokens only ever grow.
        for token in changes.borrow().iter() {
            prop_assert!(*token > last_token);
            last_token = *token;
        }
    }

    #[test]
    fn stop_survives_passive_signals(signals in prop::collection::vec(passive(), 0..30)) {
        let mut h = mount(3, SliderConfig::default());
        h.slider.stop();
        let mut now = 0;
        for signal in signals {
            match signal {
                0 => h.slider.pointer_enter(),
                1 => h.slider.pointer_leave(),
                2 => h.slider.focus_in(),
                3 => h.slider.focus_out(),
                4 => h.slider.visibility_change(false, now),
                _ => h.slider.visibility_change(true, now),
            }
            now += 150;
            h.slider.update(now);
            prop_assert_eq!(h.slider.playback_state(), PlaybackState::Stopped);
        }
    }

    #[test]
    fn spacer_matches_active_overflow(steps in prop::collection::vec(-2isize..=2, 0..20)) {
        let mut h = mount(5, manual());
        for step in steps {
            h.slider.advance(step);
            let expected = match h.slider.current() {
                Some(i) => (i % 2) as f32 * 30.0,
                None => 0.0,
            };
            prop_assert_eq!(h.slider.spacer_height(), expected);
        }
    }
}
