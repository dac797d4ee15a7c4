// Game session - round state machine
//
// Owns the mutable round state and applies every transition atomically
// relative to its caller (one logic thread). All timing is passed in as
// `Instant`s and all delays go through the TransitionScheduler, so the
// session never blocks, never sleeps, and tests drive the clock.

use std::time::Instant;

use log::{debug, info};

use crate::config::Config;
use crate::dsp::{RecordingWindow, closest_pitch_class};
use crate::melody::{Melody, MelodyGenerator, MelodyPlayer, playback_duration};
use crate::music::PitchClass;

use super::difficulty::Difficulty;
use super::logic::{MatchVerdict, calculate_score, check_melody_match};
use super::scheduler::{SessionEvent, TransitionScheduler};
use super::stats::GameStats;

/// Session state (idle / playing back / listening)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameState {
    #[default]
    Idle,
    Playing,
    Listening,
}

impl GameState {
    pub fn is_idle(&self) -> bool {
        matches!(self, GameState::Idle)
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, GameState::Playing)
    }

    pub fn is_listening(&self) -> bool {
        matches!(self, GameState::Listening)
    }
}

/// Transient user-facing message. A side channel with a bounded display
/// duration, not a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Success,
    TryAgain,
    NoAttemptsLeft,
    MicrophoneError,
}

impl Feedback {
    pub fn text(self) -> &'static str {
        match self {
            Feedback::Success => "Success!",
            Feedback::TryAgain => "Try again!",
            Feedback::NoAttemptsLeft => "No attempts left!",
            Feedback::MicrophoneError => "Microphone error",
        }
    }
}

impl std::fmt::Display for Feedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}

/// Read-only projection of session state for the UI surface.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    pub state: GameState,
    pub difficulty: Difficulty,
    pub melody: Option<Vec<PitchClass>>,
    pub matched_indices: Vec<usize>,
    pub feedback: Option<&'static str>,
    pub detected_pitch: Option<f32>,
    pub detected_note: Option<PitchClass>,
    pub score: f64,
    pub streak: u32,
    pub attempts_left: u8,
}

pub struct GameSession {
    config: Config,
    state: GameState,
    difficulty: Difficulty,
    generator: MelodyGenerator,

    current_melody: Option<Melody>,
    user_input: Vec<PitchClass>,
    matched_indices: Vec<usize>,
    attempts_left: u8,
    stats: GameStats,
    feedback: Option<Feedback>,

    // Most recent raw estimate, for display only
    detected_pitch: Option<f32>,
    detected_note: Option<PitchClass>,

    // At most one in-flight resolution: while set, incoming pitch samples
    // are ignored and no window is open
    awaiting_resolution: bool,
    window: Option<RecordingWindow>,

    scheduler: TransitionScheduler,
}

impl GameSession {
    pub fn new(difficulty: Difficulty, config: Config) -> Self {
        Self::with_generator(difficulty, config, MelodyGenerator::new())
    }

    /// Construct with an explicit generator (seeded in tests).
    pub fn with_generator(difficulty: Difficulty, config: Config, generator: MelodyGenerator) -> Self {
        let attempts = config.game.max_attempts;
        Self {
            config,
            state: GameState::Idle,
            difficulty,
            generator,
            current_melody: None,
            user_input: Vec::new(),
            matched_indices: Vec::new(),
            attempts_left: attempts,
            stats: GameStats::new(),
            feedback: None,
            detected_pitch: None,
            detected_note: None,
            awaiting_resolution: false,
            window: None,
            scheduler: TransitionScheduler::new(),
        }
    }

    /// Start a new round: generate a melody, hand it to the playback
    /// collaborator, and schedule the switch to listening once playback
    /// has run its course. Resets input, feedback and attempts.
    pub fn play_melody(&mut self, player: &mut dyn MelodyPlayer, now: Instant) {
        self.reset_round();
        self.state = GameState::Playing;
        self.attempts_left = self.config.game.max_attempts;

        let melody = self.generator.generate(self.difficulty);
        info!("new {} melody [{melody}]", self.difficulty);
        player.schedule(&melody);

        let duration = playback_duration(melody.len(), self.config.audio.note_interval());
        self.current_melody = Some(melody);
        self.scheduler
            .schedule(now + duration, SessionEvent::BeginListening);
    }

    /// Re-trigger playback of the current melody without touching match
    /// progress. No-op when idle or between melodies.
    pub fn replay(&mut self, player: &mut dyn MelodyPlayer, _now: Instant) {
        if self.state.is_idle() {
            return;
        }
        if let Some(melody) = &self.current_melody {
            player.schedule(melody);
        }
    }

    /// Explicit cancellation: cancel every pending transition, tear down
    /// the recording window, drop the melody and clear transient state.
    /// Safe to call in any state.
    pub fn stop(&mut self) {
        self.scheduler.cancel_all();
        self.window = None;
        self.awaiting_resolution = false;
        self.state = GameState::Idle;
        self.current_melody = None;
        self.user_input.clear();
        self.matched_indices.clear();
        self.feedback = None;
        self.detected_pitch = None;
        self.detected_note = None;
        debug!("session stopped");
    }

    /// Capture-boundary failure: surface as feedback and return to a safe
    /// idle state. The next play_melody retries capture from scratch.
    pub fn microphone_error(&mut self, now: Instant) {
        self.stop();
        self.feedback = Some(Feedback::MicrophoneError);
        self.scheduler.schedule(
            now + self.config.game.error_feedback_duration(),
            SessionEvent::ClearFeedback,
        );
    }

    /// Apply every scheduled transition that has come due.
    pub fn tick(&mut self, player: &mut dyn MelodyPlayer, now: Instant) {
        for event in self.scheduler.take_due(now) {
            match event {
                SessionEvent::BeginListening => {
                    if self.state.is_playing() {
                        self.state = GameState::Listening;
                        self.awaiting_resolution = false;
                        self.open_window(now);
                        debug!("listening");
                    }
                }
                SessionEvent::ClearFeedback => {
                    self.feedback = None;
                }
                SessionEvent::StopListening => {
                    self.stop();
                }
                SessionEvent::ReplayMelody => {
                    if let Some(melody) = &self.current_melody {
                        player.schedule(melody);
                    }
                }
                SessionEvent::EndCooldown => {
                    self.awaiting_resolution = false;
                    if self.state.is_listening() {
                        self.open_window(now);
                    }
                }
            }
        }
    }

    /// Feed one per-callback pitch estimate (None = no pitch in that
    /// buffer). Estimates accumulate in the recording window; when the
    /// window closes they resolve to at most one note for the match
    /// engine. Ignored outside listening and during the cooldown.
    pub fn process_pitch(&mut self, frequency: Option<f32>, now: Instant) {
        if !self.state.is_listening() {
            return;
        }

        self.detected_pitch = frequency;
        self.detected_note = frequency.and_then(|f| closest_pitch_class(f as f64));

        if self.awaiting_resolution || self.current_melody.is_none() {
            return;
        }

        let mut window = match self.window.take() {
            Some(window) => window,
            None => RecordingWindow::open(now, self.config.audio.recording_window()),
        };

        if let Some(freq) = frequency {
            window.push(freq);
        }

        if window.is_due(now) {
            match window.resolve() {
                Some(note) => self.note_detected(note, now),
                // Nothing usable this window; start over
                None => self.open_window(now),
            }
        } else {
            self.window = Some(window);
        }
    }

    /// Advance the match engine by one resolved note.
    pub fn note_detected(&mut self, note: PitchClass, now: Instant) {
        if !self.state.is_listening() {
            return;
        }
        let Some(melody) = self.current_melody.clone() else {
            return;
        };

        self.detected_note = Some(note);
        self.user_input.push(note);

        match check_melody_match(&self.user_input, &melody) {
            MatchVerdict::Mismatch => {
                debug!("wrong note {note}, attempts left {}", self.attempts_left.saturating_sub(1));
                self.stats.reset_streak();
                self.attempts_left = self.attempts_left.saturating_sub(1);
                self.user_input.clear();
                self.matched_indices.clear();

                let delay = self.config.game.error_feedback_duration();
                if self.attempts_left == 0 {
                    self.feedback = Some(Feedback::NoAttemptsLeft);
                    self.scheduler.schedule(now + delay, SessionEvent::ClearFeedback);
                    self.scheduler.schedule(now + delay, SessionEvent::StopListening);
                } else {
                    self.feedback = Some(Feedback::TryAgain);
                    self.scheduler.schedule(now + delay, SessionEvent::ClearFeedback);
                    self.scheduler.schedule(now + delay, SessionEvent::ReplayMelody);
                }
                self.begin_cooldown(now);
            }
            MatchVerdict::Prefix { matched } => {
                self.matched_indices = (0..matched).collect();
                self.begin_cooldown(now);
            }
            MatchVerdict::Complete => {
                let delta = calculate_score(
                    melody.len(),
                    self.stats.streak(),
                    self.config.game.score_multiplier,
                );
                self.stats.add_score(delta);
                self.stats.increment_streak();
                self.matched_indices = (0..melody.len()).collect();
                self.feedback = Some(Feedback::Success);
                self.attempts_left = self.config.game.max_attempts;
                info!(
                    "melody complete, +{delta:.1} points, streak {}",
                    self.stats.streak()
                );

                self.scheduler.schedule(
                    now + self.config.game.feedback_duration(),
                    SessionEvent::ClearFeedback,
                );
                self.scheduler.schedule(
                    now + self.config.game.success_delay(),
                    SessionEvent::StopListening,
                );
                self.begin_cooldown(now);
            }
        }
    }

    /// Takes effect at the next round; the current melody is unaffected.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn current_melody(&self) -> Option<&Melody> {
        self.current_melody.as_ref()
    }

    pub fn attempts_left(&self) -> u8 {
        self.attempts_left
    }

    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    pub fn feedback(&self) -> Option<Feedback> {
        self.feedback
    }

    pub fn user_input(&self) -> &[PitchClass] {
        &self.user_input
    }

    pub fn matched_indices(&self) -> &[usize] {
        &self.matched_indices
    }

    pub fn awaiting_resolution(&self) -> bool {
        self.awaiting_resolution
    }

    pub fn generator_mut(&mut self) -> &mut MelodyGenerator {
        &mut self.generator
    }

    /// Earliest pending transition, for callers that sleep between ticks.
    pub fn next_transition(&self) -> Option<Instant> {
        self.scheduler.next_due()
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            state: self.state,
            difficulty: self.difficulty,
            melody: self
                .current_melody
                .as_ref()
                .map(|m| m.notes().to_vec()),
            matched_indices: self.matched_indices.clone(),
            feedback: self.feedback.map(Feedback::text),
            detected_pitch: self.detected_pitch,
            detected_note: self.detected_note,
            score: self.stats.score(),
            streak: self.stats.streak(),
            attempts_left: self.attempts_left,
        }
    }

    fn reset_round(&mut self) {
        self.scheduler.cancel_all();
        self.window = None;
        self.awaiting_resolution = false;
        self.current_melody = None;
        self.user_input.clear();
        self.matched_indices.clear();
        self.feedback = None;
        self.detected_pitch = None;
        self.detected_note = None;
    }

    fn open_window(&mut self, now: Instant) {
        self.window = Some(RecordingWindow::open(
            now,
            self.config.audio.recording_window(),
        ));
    }

    fn begin_cooldown(&mut self, now: Instant) {
        self.awaiting_resolution = true;
        self.window = None;
        self.scheduler.schedule(
            now + self.config.game.resolution_cooldown(),
            SessionEvent::EndCooldown,
        );
    }
}
