use std::cell::Cell;
use std::rc::Rc;

use super::*;

#[derive(Default)]
struct SinkState {
    playing: Cell<bool>,
    stopped: Cell<bool>,
    drained: Cell<bool>,
    position: Cell<Duration>,
}

#[derive(Clone, Default)]
struct FakeSink(Rc<SinkState>);

impl SinkHandle for FakeSink {
    fn play(&self) {
        self.0.playing.set(true);
    }

    fn pause(&self) {
        self.0.playing.set(false);
    }

    fn stop(&self) {
        self.0.stopped.set(true);
        self.0.playing.set(false);
    }

    fn set_volume(&self, _volume: f32) {}

    fn is_drained(&self) -> bool {
        self.0.drained.get()
    }

    fn position(&self) -> Duration {
        self.0.position.get()
    }

    fn seek_to(&self, position: Duration) -> bool {
        self.0.position.set(position);
        true
    }
}

fn id(s: &str) -> TrackId {
    TrackId::from(s)
}

fn loading(track: &str, generation: u64) -> Slot<FakeSink> {
    let mut slot = Slot::new();
    slot.begin_load(&id(track), Some(PathBuf::from(format!("/music/{track}.mp3"))));
    slot.generation = generation;
    slot
}

fn decode_error() -> TransportError {
    TransportError::Decode {
        path: PathBuf::from("/music/A.mp3"),
        reason: "bad frame".into(),
    }
}

#[test]
fn superseded_load_is_stopped_and_silent() {
    let mut slot = loading("B", 2);
    let stale = FakeSink::default();

    let event = slot.complete_load(1, id("A"), Ok((stale.clone(), None)));

    assert_eq!(event, None);
    assert!(stale.0.stopped.get());
    assert!(slot.sink.is_none());
    assert_eq!(slot.track, Some(id("B")));
}

#[test]
fn superseded_failure_is_silent() {
    let mut slot = loading("B", 2);

    assert_eq!(slot.complete_load(1, id("A"), Err(decode_error())), None);
    assert!(!slot.failed);
}

#[test]
fn current_load_installs_and_reports_ready() {
    let mut slot = loading("A", 1);
    let sink = FakeSink::default();
    let length = Duration::from_secs(200);

    let event = slot.complete_load(1, id("A"), Ok((sink.clone(), Some(length))));

    assert_eq!(
        event,
        Some(TransportEvent::Ready {
            track: id("A"),
            duration: Some(length),
        })
    );
    assert!(slot.sink.is_some());
    assert_eq!(slot.duration, Some(length));
    assert!(!sink.0.playing.get());
}

#[test]
fn play_requested_during_decode_starts_installed_sink() {
    let mut slot = loading("A", 1);
    slot.request_play().unwrap();
    let sink = FakeSink::default();

    slot.complete_load(1, id("A"), Ok((sink.clone(), None)));

    assert!(sink.0.playing.get());
}

#[test]
fn failed_load_refuses_play_until_next_load() {
    let mut slot = loading("A", 1);

    let event = slot.complete_load(1, id("A"), Err(decode_error()));
    assert!(matches!(event, Some(TransportEvent::Failed { ref track, .. }) if *track == id("A")));

    let err = slot.request_play().unwrap_err();
    assert!(matches!(err, TransportError::LoadFailed(ref t) if *t == id("A")));
    assert!(!slot.want_play);

    slot.begin_load(&id("B"), Some(PathBuf::from("/music/B.mp3")));
    assert!(slot.request_play().is_ok());
}

#[test]
fn unsupported_locator_replaces_previous_track() {
    let mut slot = loading("A", 1);
    let old = FakeSink::default();
    slot.complete_load(1, id("A"), Ok((old.clone(), None)));

    slot.begin_load(&id("B"), None);

    assert!(old.0.stopped.get());
    assert!(slot.sink.is_none());
    assert_eq!(slot.track, Some(id("B")));
    assert!(matches!(slot.request_play(), Err(TransportError::LoadFailed(_))));
}

#[test]
fn play_with_nothing_loaded() {
    let mut slot: Slot<FakeSink> = Slot::new();
    assert!(matches!(slot.request_play(), Err(TransportError::NothingLoaded)));
}

#[test]
fn ticks_carry_offset_and_ended_fires_once() {
    let mut slot = loading("A", 1);
    let sink = FakeSink::default();
    slot.complete_load(1, id("A"), Ok((sink.clone(), None)));

    // Paused sinks stay quiet.
    assert_eq!(slot.tick(), None);

    slot.request_play().unwrap();
    slot.offset = Duration::from_secs(30);
    sink.0.position.set(Duration::from_secs(2));
    assert_eq!(
        slot.tick(),
        Some(TransportEvent::Tick {
            track: id("A"),
            position: Duration::from_secs(32),
        })
    );

    sink.0.drained.set(true);
    assert_eq!(slot.tick(), Some(TransportEvent::Ended { track: id("A") }));
    assert_eq!(slot.tick(), None);
    assert_eq!(slot.tick(), None);
}
