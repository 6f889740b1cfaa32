//! Phase state machine
//!
//! Drives the fishing loop: READY → CASTING → FISHING → BITE → HIT/MISS →
//! READY, with an auto-miss path from BITE back to FISHING. The only inputs
//! are the primary action, presentation commands and the virtual clock; the
//! only outputs are queued `GameEvent`s.
//!
//! Every timer is tagged with the phase it was scheduled under and is dropped
//! if the phase has moved on by the time it fires.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::hit::{evaluate, matching_window};
use super::keyframe::{DriftDirection, MotionCurve, cast_in_curve, generate, sink_curve};
use super::mirror::reflect;
use super::pattern::{BitePattern, PatternCatalog};
use super::scheduler::{FiredTimer, TimerSlot};
use super::state::{GameEvent, MotionKind, MotionUpdate, Phase, SessionState, VisualState};
use crate::floats::{FloatCatalog, FloatModel};
use crate::settings::{Settings, TimingSettings};

/// Sample a bite wait from the configured half-open range
pub fn wait_delay_ms<R: Rng + ?Sized>(rng: &mut R, timing: &TimingSettings) -> u64 {
    rng.random_range(timing.wait_range())
}

/// The fishing game engine
#[derive(Debug, Clone)]
pub struct FishingGame {
    settings: Settings,
    catalog: PatternCatalog,
    floats: FloatCatalog,
    selected_float: usize,
    session: SessionState,
    rng: Pcg32,
    /// 1-based pattern number forced by the debug input
    debug_override: Option<i64>,
    surface_attached: bool,
    visual: VisualState,
    current_motion: Option<u64>,
    next_motion_id: u64,
    events: Vec<GameEvent>,
}

impl FishingGame {
    /// Create a game with default settings and the built-in catalogs
    pub fn new(seed: u64) -> Self {
        Self::with_settings(seed, Settings::default())
    }

    pub fn with_settings(seed: u64, settings: Settings) -> Self {
        Self {
            settings: settings.sanitized(),
            catalog: PatternCatalog::builtin(),
            floats: FloatCatalog::builtin(),
            selected_float: 0,
            session: SessionState::new(),
            rng: Pcg32::seed_from_u64(seed),
            debug_override: None,
            surface_attached: true,
            visual: VisualState::Idle,
            current_motion: None,
            next_motion_id: 1,
            events: Vec::new(),
        }
    }

    /// Replace the bite table (e.g. one loaded from JSON)
    pub fn with_catalog(mut self, catalog: PatternCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    // === Queries ===

    pub fn phase(&self) -> Phase {
        self.session.phase
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn catalog(&self) -> &PatternCatalog {
        &self.catalog
    }

    pub fn now_ms(&self) -> u64 {
        self.session.timers.now_ms()
    }

    pub fn visual_state(&self) -> VisualState {
        self.visual
    }

    pub fn selected_float(&self) -> &FloatModel {
        self.floats.get(self.selected_float)
    }

    pub fn debug_override(&self) -> Option<i64> {
        self.debug_override
    }

    pub fn is_surface_attached(&self) -> bool {
        self.surface_attached
    }

    /// Pattern currently biting (or just resolved)
    pub fn active_pattern(&self) -> Option<&BitePattern> {
        self.session.active_pattern.map(|i| self.catalog.get(i))
    }

    /// Milliseconds until the timer in `slot` fires
    pub fn time_until(&self, slot: TimerSlot) -> Option<u64> {
        self.session
            .timers
            .due_ms(slot)
            .map(|due| due.saturating_sub(self.now_ms()))
    }

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Inputs ===

    /// Force a 1-based pattern number for upcoming bites; out-of-range values
    /// fall back to random selection
    pub fn set_debug_override(&mut self, value: Option<i64>) {
        self.debug_override = value;
    }

    /// The presentation surface exists and can play motion
    pub fn attach_surface(&mut self) {
        self.surface_attached = true;
    }

    /// The presentation surface is gone; commands become no-ops
    pub fn detach_surface(&mut self) {
        self.surface_attached = false;
        self.current_motion = None;
        self.visual = VisualState::Idle;
    }

    /// The single player action: cast in cast mode, hook otherwise
    pub fn primary_action(&mut self) {
        match self.session.phase {
            Phase::Ready | Phase::Hit | Phase::Miss | Phase::Broken => {
                self.begin_cast();
            }
            Phase::Casting => {
                log::debug!("Primary action ignored while casting");
            }
            Phase::Fishing => {
                log::info!("Struck before any bite");
                self.session.timers.cancel(TimerSlot::Wait);
                self.emit_sink();
                self.resolve(Phase::Miss);
            }
            Phase::Bite => self.hook(),
        }
    }

    /// Advance the clock by `dt_ms`, firing due timers in order
    pub fn advance(&mut self, dt_ms: u64) {
        let target = self.now_ms().saturating_add(dt_ms);
        self.advance_to(target);
    }

    /// Advance the clock to `target_ms`, firing due timers in order
    ///
    /// Each timer is fully handled before the next is popped, so a transition
    /// that cancels another timer due in the same step keeps it from firing.
    pub fn advance_to(&mut self, target_ms: u64) {
        while let Some(fired) = self.session.timers.pop_due(target_ms) {
            self.on_timer(fired);
        }
        self.session.timers.advance_clock(target_ms);
    }

    // === Presentation commands ===

    /// Start a bite immediately, optionally with a specific catalog index
    pub fn play_bite(&mut self, pattern_index: Option<usize>) -> Option<MotionUpdate> {
        if !self.surface_attached {
            return None;
        }
        self.session.timers.cancel_all();
        let index = match pattern_index {
            Some(i) => self.catalog.clamp_index(i),
            None => self.select_pattern(),
        };
        self.start_bite(index)
    }

    /// Cast the float and start the casting → fishing pipeline
    pub fn cast_in(&mut self) -> Option<MotionUpdate> {
        if !self.surface_attached {
            return None;
        }
        self.begin_cast()
    }

    /// Short dip of the float, without touching the phase
    pub fn sink(&mut self) -> Option<MotionUpdate> {
        if !self.surface_attached {
            return None;
        }
        self.emit_sink()
    }

    /// Cancel everything and return to READY
    pub fn reset(&mut self) {
        self.session.reset();
        self.current_motion = None;
        self.visual = VisualState::Idle;
        self.set_phase(Phase::Ready);
    }

    /// Select a float; clamped, never affects the phase
    pub fn change_float(&mut self, index: usize) -> &FloatModel {
        self.selected_float = self.floats.clamp_index(index);
        let float = self.floats.get(self.selected_float);
        log::info!("Float changed to {}", float.name);
        float
    }

    /// The presentation layer finished playing motion `id`
    ///
    /// Returns false for superseded or unknown motions.
    pub fn curve_finished(&mut self, id: u64) -> bool {
        if self.current_motion != Some(id) {
            log::trace!("Ignoring completion of stale motion #{}", id);
            return false;
        }
        self.current_motion = None;
        self.visual = VisualState::Bobbing;
        true
    }

    // === Transitions ===

    fn set_phase(&mut self, phase: Phase) {
        log::info!("Phase {} -> {}", self.session.phase.as_str(), phase.as_str());
        self.session.phase = phase;
        self.events.push(GameEvent::PhaseChanged {
            phase,
            message: phase.message(),
        });
    }

    fn begin_cast(&mut self) -> Option<MotionUpdate> {
        self.session.timers.cancel_all();
        self.session.clear_bite();
        self.set_phase(Phase::Casting);

        let duration_ms = self.settings.timing.cast_transition_ms;
        self.session
            .timers
            .schedule(TimerSlot::CastTransition, duration_ms, Phase::Casting);

        let curve = cast_in_curve(self.settings.resting_offset, duration_ms as f32);
        self.emit_motion(MotionKind::CastIn, curve, None)
    }

    fn arm_wait(&mut self) {
        let delay = wait_delay_ms(&mut self.rng, &self.settings.timing);
        self.session.timers.schedule(TimerSlot::Wait, delay, Phase::Fishing);
    }

    fn select_pattern(&mut self) -> usize {
        match self.debug_override {
            Some(n) if n >= 1 && (n as u64) <= self.catalog.len() as u64 => (n - 1) as usize,
            _ => self.catalog.random_index(&mut self.rng),
        }
    }

    fn start_bite(&mut self, index: usize) -> Option<MotionUpdate> {
        let now = self.now_ms();
        let pattern = self.catalog.get(index);
        let auto_miss_ms =
            pattern.duration_ms() as u64 + self.settings.timing.auto_miss_grace_ms;
        log::info!("Bite: {} at {} ms", pattern.name, now);

        self.session.bite_start_ms = Some(now);
        self.session.active_pattern = Some(index);
        self.session
            .timers
            .schedule(TimerSlot::AutoMiss, auto_miss_ms, Phase::Bite);
        self.set_phase(Phase::Bite);

        let direction = DriftDirection::random(&mut self.rng);
        let curve = generate(self.catalog.get(index), self.settings.resting_offset, direction);
        self.emit_motion(MotionKind::Bite, curve, Some(index))
    }

    fn hook(&mut self) {
        self.session.timers.cancel(TimerSlot::AutoMiss);
        self.emit_sink();

        let (Some(index), Some(elapsed)) =
            (self.session.active_pattern, self.session.bite_elapsed_ms())
        else {
            self.resolve(Phase::Miss);
            return;
        };

        let pattern = self.catalog.get(index);
        let hit = evaluate(pattern, elapsed);
        match matching_window(pattern, elapsed) {
            Some(w) => log::info!(
                "Hooked {} at {} ms (window {}..={})",
                pattern.name,
                elapsed,
                w.start_ms,
                w.end_ms
            ),
            None => log::info!("Missed {} at {} ms", pattern.name, elapsed),
        }
        self.resolve(if hit { Phase::Hit } else { Phase::Miss });
    }

    fn resolve(&mut self, result: Phase) {
        self.set_phase(result);
        let delay = self.settings.timing.result_display_ms;
        self.session.timers.schedule(TimerSlot::Result, delay, result);
    }

    fn on_timer(&mut self, fired: FiredTimer<Phase>) {
        let slot = fired.token.slot;
        if fired.payload != self.session.phase {
            log::trace!(
                "Dropping stale {} timer #{} (scheduled in {}, now {})",
                slot.as_str(),
                fired.token.id,
                fired.payload.as_str(),
                self.session.phase.as_str()
            );
            return;
        }

        match slot {
            TimerSlot::CastTransition => {
                self.set_phase(Phase::Fishing);
                self.arm_wait();
            }
            TimerSlot::Wait => {
                let index = self.select_pattern();
                self.start_bite(index);
            }
            TimerSlot::AutoMiss => {
                // The fish got away; keep fishing without a result screen
                log::info!("Bite expired, waiting for the next one");
                self.session.clear_bite();
                self.set_phase(Phase::Fishing);
                self.arm_wait();
            }
            TimerSlot::Result => {
                self.session.clear_bite();
                self.set_phase(Phase::Ready);
            }
        }
    }

    // === Motion output ===

    fn emit_sink(&mut self) -> Option<MotionUpdate> {
        let curve = sink_curve(self.settings.resting_offset, self.settings.sink_depth);
        self.emit_motion(MotionKind::Sink, curve, None)
    }

    /// Pair a float curve with its reflection and queue it
    fn emit_motion(
        &mut self,
        kind: MotionKind,
        float: MotionCurve,
        pattern_index: Option<usize>,
    ) -> Option<MotionUpdate> {
        if !self.surface_attached {
            return None;
        }

        let id = self.next_motion_id;
        self.next_motion_id += 1;

        let update = MotionUpdate {
            id,
            kind,
            reflection: reflect(&float, self.settings.mirror_line),
            float,
            pattern_index,
        };
        self.current_motion = Some(id);
        self.visual = VisualState::Animating(kind);
        self.events.push(GameEvent::Motion(update.clone()));
        Some(update)
    }
}
