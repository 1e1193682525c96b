//! The scripted swipe: press, slide up, lift.
//!
//! [`TouchSequencer`] owns the touch points and walks them through
//! `Created -> Down -> Moving -> Up`, injecting each state through a
//! [`TouchSink`].  Every step is synchronous and the first failure aborts
//! the script; nothing is retried.
//!
//! # Flag transitions
//!
//! | Step | unset | set |
//! |------|-------|-----|
//! | down | `up`, `update` | `in-range`, `in-contact`, `down` |
//! | move | `down` | `update` |
//! | up | `in-range`, `in-contact`, `down`, `update` | `up` |

use std::time::Duration;

use serde::Serialize;

use crate::errors::{Step, TouchError};
use crate::flags::{PointerFlag, PointerFlags};
use crate::point::{build_points, set_target, Position, TouchPoint, WindowHandle};
use crate::sink::{Backend, Pacer, TouchSink};

// ---------------------------------------------------------------------------
// Script
// ---------------------------------------------------------------------------

/// The hardcoded gesture.  Not read from anywhere; `Default` is the script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GestureScript {
    pub max_contacts: u32,
    /// Where the point is built.
    pub start: Position,
    /// Where the finger lands before the animation.
    pub origin: Position,
    /// Total upward travel of the animation.
    pub travel_pixels: i32,
    pub steps: u32,
    pub step_delay: Duration,
}

impl Default for GestureScript {
    fn default() -> Self {
        Self {
            max_contacts: 1,
            start: Position::new(640, 480),
            origin: Position::new(957, 1077),
            travel_pixels: 100,
            steps: 10,
            step_delay: Duration::from_millis(100),
        }
    }
}

impl GestureScript {
    /// Injections a full run performs: initial, down, origin, one per step, up.
    pub fn expected_injections(&self) -> usize {
        4 + self.steps as usize
    }
}

/// Per-step travel; the remainder of the division is dropped.
pub fn step_pixels(pixels: i32, steps: u32) -> i32 {
    if steps == 0 {
        return 0;
    }
    pixels / steps as i32
}

/// The y coordinate after each animation step, starting from `origin_y`.
pub fn move_up_positions(origin_y: i32, pixels: i32, steps: u32) -> Vec<i32> {
    let step = step_pixels(pixels, steps);
    (1..=steps as i32).map(|k| origin_y - k * step).collect()
}

// ---------------------------------------------------------------------------
// Flag transitions
// ---------------------------------------------------------------------------

/// A finger is down.
pub fn apply_down(point: &mut TouchPoint) {
    point.unset_flags(PointerFlag::Up | PointerFlag::Update);
    point.set_flags(PointerFlags::PRESSED);
}

/// The finger slides to `(x, y)` while staying in contact.
pub fn apply_move(point: &mut TouchPoint, x: i32, y: i32) {
    point.unset_flags(PointerFlag::Down);
    point.set_flags(PointerFlag::Update);
    point.move_to(x, y);
}

/// A finger is up.
pub fn apply_up(point: &mut TouchPoint) {
    point.unset_flags(PointerFlags::PRESSED | PointerFlag::Update);
    point.set_flags(PointerFlag::Up);
}

// ---------------------------------------------------------------------------
// Sequencer
// ---------------------------------------------------------------------------

/// Where the primary point is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Created,
    Down,
    Moving,
    Up,
}

/// Milestones reported to the caller of [`TouchSequencer::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Initialized,
    Started,
    Moved { step: u32, position: Position },
    Released,
}

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub backend: Backend,
    pub target: WindowHandle,
    pub injections: usize,
    pub final_flags: PointerFlags,
    pub final_position: Position,
    /// Position after each animation step.
    pub trail: Vec<Position>,
}

pub struct TouchSequencer<S: TouchSink, P: Pacer> {
    sink: S,
    pacer: P,
    script: GestureScript,
    points: Vec<TouchPoint>,
    phase: Phase,
    injections: usize,
    trail: Vec<Position>,
}

impl<S: TouchSink, P: Pacer> TouchSequencer<S, P> {
    /// Create a sequencer with its points already built.
    pub fn new(sink: S, pacer: P, script: GestureScript) -> Self {
        let mut sequencer = Self {
            sink,
            pacer,
            script,
            points: Vec::new(),
            phase: Phase::Created,
            injections: 0,
            trail: Vec::new(),
        };
        sequencer.build();
        sequencer
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn points(&self) -> &[TouchPoint] {
        &self.points
    }

    /// Successful injections so far; a failed attempt is not counted.
    pub fn injections(&self) -> usize {
        self.injections
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn pacer(&self) -> &P {
        &self.pacer
    }

    pub fn into_parts(self) -> (S, P) {
        (self.sink, self.pacer)
    }

    fn primary(&mut self) -> &mut TouchPoint {
        &mut self.points[0]
    }

    /// Register with the OS as a touch injector.
    pub fn initialize(&mut self) -> Result<(), TouchError> {
        self.sink.initialize(self.script.max_contacts.max(1))?;
        log::info!("{} initialized", self.sink.backend().name());
        Ok(())
    }

    /// (Re)build the points at the script start with the backend defaults.
    pub fn build(&mut self) {
        let defaults = self.sink.backend().point_defaults();
        self.points = build_points(self.script.max_contacts.max(1), self.script.start, defaults);
        self.phase = Phase::Created;
        self.trail.clear();
    }

    /// Capture the foreground window once and aim every point at it.
    pub fn bind_target(&mut self) -> WindowHandle {
        let target = self.sink.foreground_window();
        if target.is_null() {
            log::warn!("no foreground window; injecting without a target");
        } else {
            log::info!("bound target window 0x{:X}", target.0);
        }
        set_target(&mut self.points, target);
        target
    }

    /// Inject the current state of every point.
    pub fn emit(&mut self, step: Step) -> Result<(), TouchError> {
        debug_assert!(self.points.iter().all(TouchPoint::is_consistent));
        if let Some(p) = self.points.first() {
            log::debug!(
                "emit {step}: ({}, {}) flags={}",
                p.position.x,
                p.position.y,
                p.flags
            );
        }
        self.sink.inject(step, &self.points)?;
        self.injections += 1;
        Ok(())
    }

    /// Down step.
    pub fn start_touch(&mut self) -> Result<(), TouchError> {
        apply_down(self.primary());
        self.phase = Phase::Down;
        self.emit(Step::Down)
    }

    /// Move step: slide the primary point to `(x, y)`.
    pub fn move_touch(&mut self, step: Step, x: i32, y: i32) -> Result<(), TouchError> {
        apply_move(self.primary(), x, y);
        self.phase = Phase::Moving;
        self.emit(step)
    }

    /// Move to the script origin ahead of the animation.
    pub fn set_origin(&mut self) -> Result<(), TouchError> {
        let origin = self.script.origin;
        self.move_touch(Step::Origin, origin.x, origin.y)
    }

    /// Slide up `pixels` from the origin in `steps` paced moves.
    pub fn move_up<F>(&mut self, pixels: i32, observer: &mut F) -> Result<(), TouchError>
    where
        F: FnMut(Progress),
    {
        let x = self.script.origin.x;
        let ys = move_up_positions(self.script.origin.y, pixels, self.script.steps);
        for (i, y) in ys.into_iter().enumerate() {
            self.pacer.pause(self.script.step_delay);
            self.move_touch(Step::Move, x, y)?;
            let position = Position::new(x, y);
            self.trail.push(position);
            observer(Progress::Moved {
                step: i as u32 + 1,
                position,
            });
        }
        Ok(())
    }

    /// Up step.  Terminal: the point is not reused afterwards.
    pub fn release_touch(&mut self) -> Result<(), TouchError> {
        apply_up(self.primary());
        self.phase = Phase::Up;
        self.emit(Step::Up)
    }

    /// Play the whole script.
    ///
    /// initialize, bind, initial emit, down, origin, animation, optional
    /// hold, up.  Frees the sink's OS resources after a successful release.
    pub fn run<F>(&mut self, mut observer: F) -> Result<RunReport, TouchError>
    where
        F: FnMut(Progress),
    {
        self.initialize()?;
        observer(Progress::Initialized);

        let target = self.bind_target();
        self.emit(Step::Initial)?;

        self.start_touch()?;
        observer(Progress::Started);

        self.set_origin()?;
        self.move_up(self.script.travel_pixels, &mut observer)?;

        if let Some(hold) = self.sink.backend().hold_before_release() {
            log::info!("holding for {} ms before release", hold.as_millis());
            self.pacer.pause(hold);
        }

        self.release_touch()?;
        observer(Progress::Released);
        self.sink.release();
        log::info!("touch released after {} injections", self.injections);

        let last = &self.points[0];
        Ok(RunReport {
            backend: self.sink.backend(),
            target,
            injections: self.injections,
            final_flags: last.flags,
            final_position: last.position,
            trail: self.trail.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::ContactRect;
    use crate::sink::{RecordingPacer, RecordingSink};
    use pretty_assertions::assert_eq;

    fn sequencer(sink: RecordingSink) -> TouchSequencer<RecordingSink, RecordingPacer> {
        TouchSequencer::new(sink, RecordingPacer::default(), GestureScript::default())
    }

    fn point() -> TouchPoint {
        TouchPoint::new(0, Position::new(640, 480), Backend::Legacy.point_defaults())
    }

    #[test]
    fn test_step_pixels_truncates() {
        assert_eq!(step_pixels(100, 10), 10);
        assert_eq!(step_pixels(105, 10), 10);
        assert_eq!(step_pixels(5, 10), 0);
        assert_eq!(step_pixels(100, 0), 0);
    }

    #[test]
    fn test_move_up_positions_exact() {
        let ys = move_up_positions(1077, 100, 10);
        assert_eq!(
            ys,
            vec![1067, 1057, 1047, 1037, 1027, 1017, 1007, 997, 987, 977]
        );
    }

    #[test]
    fn test_move_up_positions_below_step_count() {
        let ys = move_up_positions(1077, 5, 10);
        assert_eq!(ys, vec![1077; 10]);
    }

    #[test]
    fn test_down_from_any_state() {
        let mut p = point();
        p.set_flags(PointerFlag::Up | PointerFlag::Update);
        p.unset_flags(PointerFlag::InRange);
        apply_down(&mut p);
        assert_eq!(p.flags, PointerFlags::PRESSED);
    }

    #[test]
    fn test_move_preserves_contact_and_sets_update() {
        let mut p = point();
        apply_down(&mut p);
        apply_move(&mut p, 957, 1077);
        assert_eq!(p.flags, PointerFlags::CONTACT | PointerFlag::Update);
        assert!(!p.flags.contains(PointerFlag::Up));
        assert!(!p.flags.contains(PointerFlag::Down));
    }

    #[test]
    fn test_up_from_any_state() {
        let mut p = point();
        p.set_flags(PointerFlag::Update);
        apply_up(&mut p);
        assert_eq!(p.flags, PointerFlags::only(PointerFlag::Up));
    }

    #[test]
    fn test_end_to_end_legacy() {
        let mut seq = sequencer(RecordingSink::new(Backend::Legacy));
        let mut events = Vec::new();
        let report = seq.run(|p| events.push(p)).unwrap();

        assert_eq!(report.injections, 14);
        assert_eq!(report.injections, GestureScript::default().expected_injections());
        assert_eq!(report.final_flags, PointerFlags::only(PointerFlag::Up));
        assert_eq!(report.final_position, Position::new(957, 977));
        assert_eq!(report.trail.len(), 10);
        assert_eq!(seq.phase(), Phase::Up);

        let (sink, pacer) = seq.into_parts();
        assert!(sink.initialized);
        assert_eq!(sink.released, 1);
        assert_eq!(sink.calls(), 14);
        assert_eq!(pacer.pauses, vec![Duration::from_millis(100); 10]);
        assert_eq!(pacer.total(), Duration::from_secs(1));

        let steps: Vec<Step> = sink.injections.iter().map(|i| i.step).collect();
        let mut expected = vec![Step::Initial, Step::Down, Step::Origin];
        expected.extend(std::iter::repeat(Step::Move).take(10));
        expected.push(Step::Up);
        assert_eq!(steps, expected);

        assert_eq!(events.first(), Some(&Progress::Initialized));
        assert_eq!(events.get(1), Some(&Progress::Started));
        assert_eq!(events.last(), Some(&Progress::Released));
    }

    #[test]
    fn test_end_to_end_synthetic_holds_before_release() {
        let mut seq = sequencer(RecordingSink::new(Backend::Synthetic));
        let report = seq.run(|_| {}).unwrap();
        assert_eq!(report.injections, 14);

        let (_, pacer) = seq.into_parts();
        assert_eq!(pacer.pauses.len(), 11);
        assert_eq!(pacer.pauses.last(), Some(&Duration::from_secs(5)));
    }

    #[test]
    fn test_recorded_flag_states() {
        let mut seq = sequencer(RecordingSink::new(Backend::Legacy));
        seq.run(|_| {}).unwrap();
        let sink = seq.sink();

        let flags: Vec<PointerFlags> = sink
            .injections
            .iter()
            .map(|i| i.points[0].flags)
            .collect();
        assert_eq!(flags[0], PointerFlags::PRESSED);
        assert_eq!(flags[1], PointerFlags::PRESSED);
        assert_eq!(flags.len(), 14);
        for f in &flags[2..13] {
            assert_eq!(*f, PointerFlags::CONTACT | PointerFlag::Update);
        }
        assert_eq!(flags[13], PointerFlags::only(PointerFlag::Up));
        assert_eq!(
            sink.last_point().map(|p| p.flags),
            Some(PointerFlags::only(PointerFlag::Up))
        );
        assert_eq!(seq.points()[0].flags, PointerFlags::only(PointerFlag::Up));
        assert!(sink
            .injections
            .iter()
            .all(|i| i.points.iter().all(TouchPoint::is_consistent)));
    }

    #[test]
    fn test_run_injects_points_built_by_new() {
        let mut seq = sequencer(RecordingSink::new(Backend::Legacy));
        let mut built = seq.points()[0].clone();
        assert_eq!(seq.phase(), Phase::Created);
        seq.run(|_| {}).unwrap();

        built.target = seq.sink().injections[0].points[0].target;
        assert_eq!(seq.sink().injections[0].points[0], built);
        assert_eq!(seq.sink().injections[0].step, Step::Initial);
    }

    #[test]
    fn test_contact_follows_position() {
        let mut seq = sequencer(RecordingSink::new(Backend::Legacy));
        seq.run(|_| {}).unwrap();
        for injection in &seq.sink().injections {
            let p = &injection.points[0];
            assert_eq!(p.contact, ContactRect::centered_on(p.position));
        }
    }

    #[test]
    fn test_target_bound_once() {
        let sink = RecordingSink::new(Backend::Legacy)
            .with_foreground(WindowHandle(0xBEEF))
            .with_shifting_foreground();
        let mut seq = sequencer(sink);
        let report = seq.run(|_| {}).unwrap();
        assert_eq!(report.target, WindowHandle(0xBEEF));
        assert_eq!(seq.sink().foreground_queries, 1);

        let targets: Vec<WindowHandle> = seq
            .sink()
            .injections
            .iter()
            .map(|i| i.points[0].target)
            .collect();
        assert_eq!(targets, vec![WindowHandle(0xBEEF); 14]);
    }

    #[test]
    fn test_failure_stops_sequence() {
        for fail_at in 1..=14 {
            let mut seq = sequencer(RecordingSink::new(Backend::Legacy).failing_on(fail_at, 87));
            let err = seq.run(|_| {}).unwrap_err();
            assert!(matches!(err, TouchError::InjectionFailure { .. }));
            assert_eq!(seq.sink().calls(), fail_at);
            assert_eq!(seq.injections(), fail_at - 1);
            assert_eq!(seq.sink().released, 0);
        }
    }

    #[test]
    fn test_failure_reports_step() {
        let mut seq = sequencer(RecordingSink::new(Backend::Legacy).failing_on(4, 87));
        let err = seq.run(|_| {}).unwrap_err();
        assert_eq!(err.step(), Some(Step::Move));
        assert_eq!(seq.pacer().pauses.len(), 1);
        assert_eq!(seq.injections(), 3);
    }

    #[test]
    fn test_initialize_failure_injects_nothing() {
        let mut seq = sequencer(RecordingSink::new(Backend::Legacy).failing_initialize(5));
        let mut events = Vec::new();
        let err = seq.run(|p| events.push(p)).unwrap_err();
        assert_eq!(err.step(), Some(Step::Initialize));
        assert_eq!(seq.sink().calls(), 0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_small_travel_does_not_move() {
        let script = GestureScript {
            travel_pixels: 5,
            ..GestureScript::default()
        };
        let mut seq = TouchSequencer::new(
            RecordingSink::new(Backend::Legacy),
            RecordingPacer::default(),
            script,
        );
        let report = seq.run(|_| {}).unwrap();
        assert!(report.trail.iter().all(|p| *p == Position::new(957, 1077)));
        assert_eq!(report.injections, 14);
    }

    #[test]
    fn test_report_serialization() {
        let mut seq = sequencer(RecordingSink::new(Backend::Legacy));
        let report = seq.run(|_| {}).unwrap();
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"injections\":14"));
        assert!(json.contains("\"final_flags\":[\"up\"]"));
        assert!(json.contains("\"backend\":\"legacy\""));
    }
}
