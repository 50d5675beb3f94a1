//! # swara_synth
//!
//! Converts resolved swaras into frequencies and renders them through a
//! polyphonic voice mixer, alongside an independently managed two-note
//! tanpura drone (Sa + Pa in a low register).
//!
//! The synthesis boundary is the [`Synth`] trait — attack, bounded
//! attack-release, group release, and group volume.  Two backends are
//! provided:
//!
//! * [`CpalSynth`] — one cpal output stream mixing sine voices with a
//!   linear attack/release envelope.
//! * [`NullSynth`] — records every call; used by the tests and as a
//!   fallback when no audio device exists.
//!
//! [`SwaraEngine`] sits above the backend: it gates all triggering on an
//! explicit, re-invokable [`SwaraEngine::initialize`] step, applies the
//! frequency law `base_pitch × ratio(swara) × 2^(octave−4)`, enforces a
//! per-resolved-note cooldown, and keeps the drone start/stop idempotent.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use log::{debug, warn};
use thiserror::Error;

use swara_scale::{ratio, Swara};

// ════════════════════════════════════════════════════════════════════════════
// Constants
// ════════════════════════════════════════════════════════════════════════════

/// Sa of the default register, in Hz (middle C).
pub const DEFAULT_BASE_PITCH: f64 = 261.63;

/// Minimum interval between two acceptances of the same resolved swara,
/// regardless of which finger produced it.
pub const NOTE_COOLDOWN: Duration = Duration::from_millis(250);

/// Envelope length of a melodic trigger.
pub const NOTE_DURATION: Duration = Duration::from_millis(400);

/// Octave the drone sounds in.
pub const DRONE_OCTAVE: i32 = 3;

/// Offset between the drone's Sa and Pa onsets, so the two voices do not
/// share a transient.
pub const DRONE_STAGGER: Duration = Duration::from_millis(100);

const MELODY_GAIN: f32 = 0.25;
const DRONE_GAIN: f32 = 0.18;
const DEFAULT_DRONE_LEVEL: f32 = 0.8;

// ════════════════════════════════════════════════════════════════════════════
// Errors
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no audio output device available")]
    NoDevice,
    #[error("no usable output config: {0}")]
    Config(String),
    #[error("failed to build output stream: {0}")]
    Stream(String),
}

// ════════════════════════════════════════════════════════════════════════════
// Synth trait — the synthesis boundary
// ════════════════════════════════════════════════════════════════════════════

/// Logical voice groups the engine addresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoiceGroup {
    Melody,
    Drone,
}

impl VoiceGroup {
    fn idx(self) -> usize {
        match self {
            VoiceGroup::Melody => 0,
            VoiceGroup::Drone => 1,
        }
    }
}

/// The attack/release/volume contract with the synthesis backend.  The
/// engine never inspects synthesis internals through this.
pub trait Synth {
    /// Trigger a bounded voice: envelope completes after `dur`.
    fn attack_release(&mut self, freq_hz: f64, dur: Duration, gain: f32);
    /// Trigger a sustained voice in `group`, with its onset delayed by
    /// `delay` relative to now.
    fn attack(&mut self, group: VoiceGroup, freq_hz: f64, gain: f32, delay: Duration);
    /// Release every voice in `group`.
    fn release(&mut self, group: VoiceGroup);
    /// Group volume, applied to live voices and retained for future ones.
    fn set_volume(&mut self, group: VoiceGroup, level: f32);
}

// ════════════════════════════════════════════════════════════════════════════
// NullSynth — recording backend for tests
// ════════════════════════════════════════════════════════════════════════════

/// Every call the engine made, in order per category.
#[derive(Debug, Default)]
pub struct CallLog {
    pub one_shots: Vec<f64>,
    pub attacks:   Vec<(VoiceGroup, f64)>,
    pub releases:  Vec<VoiceGroup>,
    pub volumes:   Vec<(VoiceGroup, f32)>,
}

/// Backend that makes no sound and records what it was asked to do.
pub struct NullSynth {
    log: Arc<Mutex<CallLog>>,
}

impl NullSynth {
    pub fn new() -> (NullSynth, Arc<Mutex<CallLog>>) {
        let log = Arc::new(Mutex::new(CallLog::default()));
        (NullSynth { log: log.clone() }, log)
    }
}

impl Synth for NullSynth {
    fn attack_release(&mut self, freq_hz: f64, _dur: Duration, _gain: f32) {
        self.log.lock().unwrap().one_shots.push(freq_hz);
    }
    fn attack(&mut self, group: VoiceGroup, freq_hz: f64, _gain: f32, _delay: Duration) {
        self.log.lock().unwrap().attacks.push((group, freq_hz));
    }
    fn release(&mut self, group: VoiceGroup) {
        self.log.lock().unwrap().releases.push(group);
    }
    fn set_volume(&mut self, group: VoiceGroup, level: f32) {
        self.log.lock().unwrap().volumes.push((group, level));
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Mixer — shared voice table rendered in the stream callback
// ════════════════════════════════════════════════════════════════════════════

const ATTACK_SECS: f64 = 0.010;
const RELEASE_SECS: f64 = 0.150;
const MAX_VOICES: usize = 24;

struct Voice {
    group: VoiceGroup,
    freq:  f64,
    gain:  f32,
    phase: f64,
    /// Samples remaining before onset.
    delay: u64,
    /// Samples since onset.
    age:   u64,
    /// Samples to sound before auto-release; `None` = until `release()`.
    hold:  Option<u64>,
    /// Samples since release began; `None` while sounding.
    fade:  Option<u64>,
}

struct Mixer {
    sample_rate: f64,
    group_level: [f32; 2],
    voices:      Vec<Voice>,
}

impl Mixer {
    fn new(sample_rate: f64) -> Mixer {
        Mixer {
            sample_rate,
            group_level: [1.0, DEFAULT_DRONE_LEVEL],
            voices: Vec::new(),
        }
    }

    fn push_voice(&mut self, voice: Voice) {
        if self.voices.len() >= MAX_VOICES {
            // Steal the oldest melodic voice rather than refusing the new one.
            if let Some(i) = self
                .voices
                .iter()
                .position(|v| v.group == VoiceGroup::Melody)
            {
                self.voices.remove(i);
            } else {
                return;
            }
        }
        self.voices.push(voice);
    }

    fn release_group(&mut self, group: VoiceGroup) {
        for v in self.voices.iter_mut().filter(|v| v.group == group) {
            if v.fade.is_none() {
                v.fade = Some(0);
            }
        }
    }

    fn render(&mut self, out: &mut [f32], channels: usize) {
        let attack = (ATTACK_SECS * self.sample_rate) as u64;
        let release = (RELEASE_SECS * self.sample_rate).max(1.0) as u64;
        let frames = out.len() / channels;

        for frame in 0..frames {
            let mut sample = 0.0f32;
            for v in self.voices.iter_mut() {
                if v.delay > 0 {
                    v.delay -= 1;
                    continue;
                }
                let rise = if attack == 0 {
                    1.0
                } else {
                    (v.age as f32 / attack as f32).min(1.0)
                };
                let fall = match v.fade {
                    Some(f) => 1.0 - (f as f32 / release as f32).min(1.0),
                    None => 1.0,
                };
                sample += (v.phase * std::f64::consts::TAU).sin() as f32
                    * v.gain
                    * rise
                    * fall
                    * self.group_level[v.group.idx()];

                v.phase = (v.phase + v.freq / self.sample_rate).fract();
                v.age += 1;
                match (v.fade, v.hold) {
                    (Some(f), _) => v.fade = Some(f + 1),
                    (None, Some(h)) if v.age >= h => v.fade = Some(0),
                    _ => {}
                }
            }
            let sample = sample.clamp(-1.0, 1.0);
            for ch in 0..channels {
                out[frame * channels + ch] = sample;
            }
        }

        self.voices
            .retain(|v| v.fade.map(|f| f < release).unwrap_or(true));
    }
}

// ════════════════════════════════════════════════════════════════════════════
// CpalSynth — real audio output
// ════════════════════════════════════════════════════════════════════════════

/// Sine-voice mixer over a single cpal output stream.  Dropping it stops
/// the stream and frees the device.
pub struct CpalSynth {
    _stream: cpal::Stream,
    mixer:   Arc<Mutex<Mixer>>,
}

impl CpalSynth {
    pub fn new() -> Result<CpalSynth, EngineError> {
        use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(EngineError::NoDevice)?;
        let supported = device
            .default_output_config()
            .map_err(|e| EngineError::Config(e.to_string()))?;
        if supported.sample_format() != cpal::SampleFormat::F32 {
            return Err(EngineError::Config(format!(
                "unsupported sample format {:?}",
                supported.sample_format()
            )));
        }
        let config: cpal::StreamConfig = supported.config();
        let channels = config.channels as usize;

        let mixer = Arc::new(Mutex::new(Mixer::new(config.sample_rate.0 as f64)));
        let shared = mixer.clone();

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    shared.lock().unwrap().render(data, channels);
                },
                |err| warn!("output stream error: {err}"),
                None,
            )
            .map_err(|e| EngineError::Stream(e.to_string()))?;
        stream
            .play()
            .map_err(|e| EngineError::Stream(e.to_string()))?;

        Ok(CpalSynth {
            _stream: stream,
            mixer,
        })
    }

    fn delay_samples(&self, delay: Duration) -> u64 {
        let sr = self.mixer.lock().unwrap().sample_rate;
        (delay.as_secs_f64() * sr) as u64
    }
}

impl Synth for CpalSynth {
    fn attack_release(&mut self, freq_hz: f64, dur: Duration, gain: f32) {
        let mut m = self.mixer.lock().unwrap();
        let hold = (dur.as_secs_f64() * m.sample_rate) as u64;
        m.push_voice(Voice {
            group: VoiceGroup::Melody,
            freq: freq_hz,
            gain,
            phase: 0.0,
            delay: 0,
            age: 0,
            hold: Some(hold),
            fade: None,
        });
    }

    fn attack(&mut self, group: VoiceGroup, freq_hz: f64, gain: f32, delay: Duration) {
        let delay = self.delay_samples(delay);
        let mut m = self.mixer.lock().unwrap();
        m.push_voice(Voice {
            group,
            freq: freq_hz,
            gain,
            phase: 0.0,
            delay,
            age: 0,
            hold: None,
            fade: None,
        });
    }

    fn release(&mut self, group: VoiceGroup) {
        self.mixer.lock().unwrap().release_group(group);
    }

    fn set_volume(&mut self, group: VoiceGroup, level: f32) {
        self.mixer.lock().unwrap().group_level[group.idx()] = level.clamp(0.0, 1.0);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SwaraEngine
// ════════════════════════════════════════════════════════════════════════════

/// Frequency of a swara in a given octave: `base_pitch × ratio × 2^(octave−4)`.
/// `None` for a spelling outside the swarasthana table.
pub fn frequency(base_pitch: f64, swara: Swara, octave: i32) -> Option<f64> {
    Some(base_pitch * ratio(swara)? * 2f64.powi(octave - 4))
}

/// The audio engine: trigger gating, note cooldown, and drone management
/// over a pluggable [`Synth`] backend.
///
/// Until [`initialize`](SwaraEngine::initialize) succeeds, every trigger
/// is dropped — not queued.  Initialization may be retried after failure.
pub struct SwaraEngine {
    backend:     Option<Box<dyn Synth>>,
    base_pitch:  f64,
    note_ledger: HashMap<Swara, Instant>,
    drone_on:    bool,
    drone_level: f32,
}

impl SwaraEngine {
    /// An engine with no backend yet; call `initialize` before playing.
    pub fn new() -> SwaraEngine {
        SwaraEngine {
            backend:     None,
            base_pitch:  DEFAULT_BASE_PITCH,
            note_ledger: HashMap::new(),
            drone_on:    false,
            drone_level: DEFAULT_DRONE_LEVEL,
        }
    }

    /// An engine over a caller-supplied backend, already initialized.
    pub fn with_backend(backend: Box<dyn Synth>) -> SwaraEngine {
        let mut engine = SwaraEngine::new();
        engine.backend = Some(backend);
        engine
    }

    pub fn is_initialized(&self) -> bool {
        self.backend.is_some()
    }

    /// One-time backend construction.  Idempotent on success; safe to
    /// re-invoke after a failure.
    pub fn initialize(&mut self) -> Result<(), EngineError> {
        if self.backend.is_some() {
            return Ok(());
        }
        let synth = CpalSynth::new()?;
        self.backend = Some(Box::new(synth));
        Ok(())
    }

    /// Trigger a melodic voice for `swara` in `octave`.  Returns whether
    /// a voice actually sounded; a drop (uninitialized, invalid spelling,
    /// or cooldown) returns `false`.
    pub fn play_note(&mut self, swara: Swara, octave: i32, now: Instant) -> bool {
        let Some(backend) = self.backend.as_mut() else {
            debug!("dropping {swara}: engine not initialized");
            return false;
        };
        let Some(freq) = frequency(self.base_pitch, swara, octave) else {
            warn!("dropping {swara}: not a swarasthana");
            return false;
        };
        if let Some(&last) = self.note_ledger.get(&swara) {
            if now.duration_since(last) <= NOTE_COOLDOWN {
                debug!("suppressing {swara}: within note cooldown");
                return false;
            }
        }
        backend.attack_release(freq, NOTE_DURATION, MELODY_GAIN);
        self.note_ledger.insert(swara, now);
        true
    }

    /// Start the Sa+Pa drone.  No-op when already running or when the
    /// engine is uninitialized.
    pub fn start_drone(&mut self) {
        if self.drone_on {
            return;
        }
        let Some(backend) = self.backend.as_mut() else {
            debug!("dropping drone start: engine not initialized");
            return;
        };
        let sa = frequency(self.base_pitch, swara_scale::swara::SA, DRONE_OCTAVE);
        let pa = frequency(self.base_pitch, swara_scale::swara::PA, DRONE_OCTAVE);
        let (Some(sa), Some(pa)) = (sa, pa) else {
            return;
        };
        backend.set_volume(VoiceGroup::Drone, self.drone_level);
        backend.attack(VoiceGroup::Drone, sa, DRONE_GAIN, Duration::ZERO);
        backend.attack(VoiceGroup::Drone, pa, DRONE_GAIN, DRONE_STAGGER);
        self.drone_on = true;
    }

    /// Release the drone.  No-op when already stopped.
    pub fn stop_drone(&mut self) {
        if !self.drone_on {
            return;
        }
        if let Some(backend) = self.backend.as_mut() {
            backend.release(VoiceGroup::Drone);
        }
        self.drone_on = false;
    }

    pub fn drone_playing(&self) -> bool {
        self.drone_on
    }

    /// Drone level in [0,1]: applied to live drone voices immediately and
    /// retained for future starts.
    pub fn set_drone_volume(&mut self, level: f32) {
        self.drone_level = level.clamp(0.0, 1.0);
        if let Some(backend) = self.backend.as_mut() {
            backend.set_volume(VoiceGroup::Drone, self.drone_level);
        }
    }

    pub fn drone_volume(&self) -> f32 {
        self.drone_level
    }

    /// Release everything and drop the backend.  Safe before or without
    /// successful initialization; runs on every teardown path via `Drop`.
    pub fn shutdown(&mut self) {
        if let Some(backend) = self.backend.as_mut() {
            backend.release(VoiceGroup::Melody);
            backend.release(VoiceGroup::Drone);
        }
        self.backend = None;
        self.drone_on = false;
    }
}

impl Default for SwaraEngine {
    fn default() -> Self {
        SwaraEngine::new()
    }
}

impl Drop for SwaraEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use swara_scale::swara::{GA3, PA, SA};

    fn engine() -> (SwaraEngine, Arc<Mutex<CallLog>>) {
        let (synth, log) = NullSynth::new();
        (SwaraEngine::with_backend(Box::new(synth)), log)
    }

    #[test]
    fn frequency_law() {
        // Sa in the default octave is the base pitch itself.
        assert_eq!(frequency(DEFAULT_BASE_PITCH, SA, 4), Some(DEFAULT_BASE_PITCH));
        // One octave up doubles; one down halves.
        assert_eq!(
            frequency(DEFAULT_BASE_PITCH, SA, 5),
            Some(DEFAULT_BASE_PITCH * 2.0)
        );
        assert_eq!(
            frequency(DEFAULT_BASE_PITCH, PA, 3),
            Some(DEFAULT_BASE_PITCH * 1.5 / 2.0)
        );
    }

    #[test]
    fn uninitialized_engine_drops_triggers() {
        let mut engine = SwaraEngine::new();
        assert!(!engine.play_note(SA, 4, Instant::now()));
        engine.start_drone();
        assert!(!engine.drone_playing());
    }

    #[test]
    fn note_sounds_and_stamps_ledger() {
        let (mut engine, log) = engine();
        let t0 = Instant::now();
        assert!(engine.play_note(SA, 4, t0));
        assert_eq!(log.lock().unwrap().one_shots.len(), 1);
    }

    #[test]
    fn identical_note_suppressed_within_cooldown() {
        let (mut engine, log) = engine();
        let t0 = Instant::now();
        assert!(engine.play_note(GA3, 4, t0));
        assert!(!engine.play_note(GA3, 4, t0 + Duration::from_millis(100)));
        assert!(engine.play_note(GA3, 4, t0 + Duration::from_millis(260)));
        assert_eq!(log.lock().unwrap().one_shots.len(), 2);
    }

    #[test]
    fn different_notes_do_not_share_cooldown() {
        let (mut engine, log) = engine();
        let t0 = Instant::now();
        assert!(engine.play_note(SA, 4, t0));
        assert!(engine.play_note(PA, 4, t0 + Duration::from_millis(10)));
        assert_eq!(log.lock().unwrap().one_shots.len(), 2);
    }

    #[test]
    fn drone_start_is_idempotent() {
        let (mut engine, log) = engine();
        engine.start_drone();
        engine.start_drone();
        // Exactly two sustained voices: Sa and Pa, not four.
        assert_eq!(log.lock().unwrap().attacks.len(), 2);
        assert!(engine.drone_playing());
    }

    #[test]
    fn drone_voices_are_sa_and_pa_low_register() {
        let (mut engine, log) = engine();
        engine.start_drone();
        let log = log.lock().unwrap();
        let freqs: Vec<f64> = log.attacks.iter().map(|&(_, f)| f).collect();
        assert_eq!(freqs[0], DEFAULT_BASE_PITCH / 2.0);
        assert_eq!(freqs[1], DEFAULT_BASE_PITCH * 0.75);
        assert!(log.attacks.iter().all(|&(g, _)| g == VoiceGroup::Drone));
    }

    #[test]
    fn drone_stop_is_idempotent() {
        let (mut engine, log) = engine();
        engine.start_drone();
        engine.stop_drone();
        engine.stop_drone();
        assert_eq!(log.lock().unwrap().releases, vec![VoiceGroup::Drone]);
        assert!(!engine.drone_playing());
    }

    #[test]
    fn drone_volume_applies_live_and_is_retained() {
        let (mut engine, log) = engine();
        engine.set_drone_volume(0.4);
        engine.start_drone();
        let volumes = log.lock().unwrap().volumes.clone();
        // Applied immediately, then re-applied on start from the retained value.
        assert_eq!(volumes.last(), Some(&(VoiceGroup::Drone, 0.4)));
        assert_eq!(engine.drone_volume(), 0.4);
    }

    #[test]
    fn drone_volume_is_clamped() {
        let (mut engine, _log) = engine();
        engine.set_drone_volume(3.0);
        assert_eq!(engine.drone_volume(), 1.0);
        engine.set_drone_volume(-1.0);
        assert_eq!(engine.drone_volume(), 0.0);
    }

    #[test]
    fn shutdown_releases_all_groups() {
        let (mut engine, log) = engine();
        engine.start_drone();
        engine.shutdown();
        let releases = log.lock().unwrap().releases.clone();
        assert!(releases.contains(&VoiceGroup::Melody));
        assert!(releases.contains(&VoiceGroup::Drone));
        assert!(!engine.is_initialized());
    }

    #[test]
    fn shutdown_safe_without_initialization() {
        let mut engine = SwaraEngine::new();
        engine.shutdown();
        assert!(!engine.is_initialized());
    }

    // ── mixer unit tests (no device required) ────────────────────────────

    #[test]
    fn mixer_removes_finished_voices() {
        let mut m = Mixer::new(1000.0);
        m.push_voice(Voice {
            group: VoiceGroup::Melody,
            freq:  100.0,
            gain:  0.5,
            phase: 0.0,
            delay: 0,
            age:   0,
            hold:  Some(10),
            fade:  None,
        });
        // 10 samples hold + 150 samples release at 1 kHz, then gone.
        let mut out = vec![0.0f32; 400];
        m.render(&mut out, 1);
        assert!(m.voices.is_empty());
    }

    #[test]
    fn mixer_delayed_voice_stays_silent_until_onset() {
        let mut m = Mixer::new(1000.0);
        m.push_voice(Voice {
            group: VoiceGroup::Drone,
            freq:  100.0,
            gain:  0.5,
            phase: 0.0,
            delay: 50,
            age:   0,
            hold:  None,
            fade:  None,
        });
        let mut out = vec![0.0f32; 40];
        m.render(&mut out, 1);
        assert!(out.iter().all(|&s| s == 0.0));
        assert_eq!(m.voices.len(), 1);
    }

    #[test]
    fn mixer_steals_oldest_melody_voice_when_full() {
        let mut m = Mixer::new(1000.0);
        for i in 0..MAX_VOICES {
            m.push_voice(Voice {
                group: VoiceGroup::Melody,
                freq:  100.0 + i as f64,
                gain:  0.1,
                phase: 0.0,
                delay: 0,
                age:   0,
                hold:  None,
                fade:  None,
            });
        }
        m.push_voice(Voice {
            group: VoiceGroup::Melody,
            freq:  999.0,
            gain:  0.1,
            phase: 0.0,
            delay: 0,
            age:   0,
            hold:  None,
            fade:  None,
        });
        assert_eq!(m.voices.len(), MAX_VOICES);
        assert!(m.voices.iter().any(|v| v.freq == 999.0));
        assert!(!m.voices.iter().any(|v| v.freq == 100.0));
    }
}
