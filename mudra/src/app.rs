//! Session state and the interactive console loop.
//!
//! [`AppState`] ties the pipeline together: hand frames go through the
//! gesture detector, raw swaras are resolved against the selected raga,
//! and accepted notes drive the audio engine while the tala clock keeps
//! the beat.  Console commands mutate the session between frames, so a
//! raga or layout change can never interleave with half of a frame.

use std::io::{self, Write as _};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use log::{debug, info, warn};

use swara_scale::{raga, resolve, tala, Raga, Swara, Tala};
use swara_synth::{NullSynth, SwaraEngine};

use crate::gesture::GestureDetector;
use crate::hand::{Finger, HandFrame, Handedness};
use crate::mapping::{HandMapping, HandMappingDirection};
use crate::sim::{spawn_hand_source, SimHandSource, SimPinch};
use crate::tala_clock::CycleCounter;

// ════════════════════════════════════════════════════════════════════════════
// Constants
// ════════════════════════════════════════════════════════════════════════════

/// How long a triggered swara stays on the status display.
pub const SWARA_DISPLAY: Duration = Duration::from_millis(800);

/// Playable melodic register.
pub const OCTAVE_MIN: i32 = 2;
pub const OCTAVE_MAX: i32 = 6;

const LOOP_SLEEP: Duration = Duration::from_millis(16);

// ════════════════════════════════════════════════════════════════════════════
// AppConfig / Command
// ════════════════════════════════════════════════════════════════════════════

/// Session parameters chosen before the loop starts.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub raga_key:  String,
    pub tala_key:  String,
    pub direction: HandMappingDirection,
    pub octave:    i32,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            raga_key:  "mayamalavagowla".to_string(),
            tala_key:  "adi".to_string(),
            direction: HandMappingDirection::LeftToRight,
            octave:    4,
        }
    }
}

/// One console-issued session mutation.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    SetRaga(String),
    SetTala(String),
    CycleDirection,
    OctaveUp,
    OctaveDown,
    ToggleDrone,
    SetDroneVolume(f32),
    ResetGestures,
    Start,
    Stop,
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    mapping:       HandMapping,
    detector:      GestureDetector,
    engine:        SwaraEngine,
    counter:       CycleCounter,
    raga:          &'static Raga,
    tala:          &'static Tala,
    octave:        i32,
    current_swara: Option<(Swara, Instant)>,
    active:        bool,
}

impl AppState {
    /// Build a session from the config over a ready engine.  Unknown raga
    /// or tala keys are configuration errors, not runtime conditions.
    pub fn new(cfg: &AppConfig, engine: SwaraEngine, now: Instant) -> Result<AppState> {
        let raga = raga(&cfg.raga_key)
            .ok_or_else(|| anyhow!("unknown raga '{}'", cfg.raga_key))?;
        let tala = tala(&cfg.tala_key)
            .ok_or_else(|| anyhow!("unknown tala '{}'", cfg.tala_key))?;
        Ok(AppState {
            mapping: HandMapping::new(cfg.direction),
            detector: GestureDetector::new(),
            engine,
            counter: CycleCounter::new(tala.beats, now),
            raga,
            tala,
            octave: cfg.octave.clamp(OCTAVE_MIN, OCTAVE_MAX),
            current_swara: None,
            active: true,
        })
    }

    pub fn raga(&self) -> &'static Raga {
        self.raga
    }

    pub fn tala(&self) -> &'static Tala {
        self.tala
    }

    pub fn octave(&self) -> i32 {
        self.octave
    }

    pub fn beat(&self) -> usize {
        self.counter.index()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Swara currently on display, if its window has not lapsed.
    pub fn current_swara(&self) -> Option<Swara> {
        self.current_swara.map(|(s, _)| s)
    }

    /// Run one hand frame through detection, raga resolution, and the
    /// engine.  `now` is a single snapshot shared by every stage.
    pub fn handle_frame(&mut self, frame: &HandFrame, now: Instant) {
        if !self.active {
            return;
        }
        let events = self.detector.process_frame(frame, &self.mapping, now);
        for ev in events {
            let Some(swara) = resolve(ev.swara, self.raga.swaras) else {
                debug!("{} has no {} degree", self.raga.key, ev.swara);
                continue;
            };
            // The display follows the accepted gesture even when the
            // engine's note cooldown keeps it silent.
            self.engine.play_note(swara, self.octave, now);
            self.current_swara = Some((swara, now));
        }
    }

    /// Advance time-driven state.  Returns true when the beat moved, so
    /// the caller knows to redraw.
    pub fn tick(&mut self, now: Instant) -> bool {
        if let Some((_, since)) = self.current_swara {
            if now.duration_since(since) >= SWARA_DISPLAY {
                self.current_swara = None;
            }
        }
        if !self.active {
            return false;
        }
        self.counter.poll(now)
    }

    pub fn handle_command(&mut self, cmd: Command, now: Instant) {
        match cmd {
            Command::SetRaga(key) => match raga(&key) {
                Some(r) => {
                    self.raga = r;
                    info!("raga set to {}", r.name);
                }
                None => warn!("unknown raga '{key}'"),
            },
            Command::SetTala(key) => match tala(&key) {
                Some(t) => {
                    self.tala = t;
                    self.counter.restart(t.beats, now);
                    info!("tala set to {} ({} beats)", t.name, t.beats);
                }
                None => warn!("unknown tala '{key}'"),
            },
            Command::CycleDirection => {
                let next = match self.mapping.direction() {
                    HandMappingDirection::LeftToRight => HandMappingDirection::RightToLeft,
                    HandMappingDirection::RightToLeft => HandMappingDirection::Cyclic,
                    HandMappingDirection::Cyclic => HandMappingDirection::LeftToRight,
                };
                self.mapping.set_direction(next);
                info!("mapping layout: {}", next.as_str());
            }
            Command::OctaveUp => {
                self.octave = (self.octave + 1).min(OCTAVE_MAX);
                info!("octave {}", self.octave);
            }
            Command::OctaveDown => {
                self.octave = (self.octave - 1).max(OCTAVE_MIN);
                info!("octave {}", self.octave);
            }
            Command::ToggleDrone => {
                if self.engine.drone_playing() {
                    self.engine.stop_drone();
                    info!("drone off");
                } else {
                    self.engine.start_drone();
                    info!("drone on");
                }
            }
            Command::SetDroneVolume(level) => {
                self.engine.set_drone_volume(level);
                info!("drone volume {:.2}", self.engine.drone_volume());
            }
            Command::ResetGestures => {
                self.detector.reset();
                info!("gesture state cleared");
            }
            Command::Start => self.start(now),
            Command::Stop => self.stop(),
        }
    }

    /// Resume triggering.  Re-initializes the engine if a stop tore it
    /// down; a failed re-init leaves a silent but responsive session.
    pub fn start(&mut self, now: Instant) {
        if self.active {
            return;
        }
        if !self.engine.is_initialized() {
            if let Err(e) = self.engine.initialize() {
                warn!("audio unavailable, continuing silent: {e}");
            }
        }
        self.counter.restart(self.tala.beats, now);
        self.active = true;
        info!("session resumed");
    }

    /// Halt triggering and release the audio device.  Gesture latches
    /// survive so a later start picks up mid-gesture correctly.
    pub fn stop(&mut self) {
        if !self.active {
            return;
        }
        self.engine.shutdown();
        self.current_swara = None;
        self.active = false;
        info!("session stopped");
    }

    fn status_line(&self) -> String {
        let swara = self
            .current_swara()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        let accent = if self.tala.is_accented(self.counter.index()) {
            "*"
        } else {
            " "
        };
        format!(
            "{} | {} beat {:>2}/{}{} | {} | oct {} | drone {} | swara {}",
            self.raga.name,
            self.tala.name,
            self.counter.index() + 1,
            self.tala.beats,
            accent,
            self.mapping.direction().as_str(),
            self.octave,
            if self.engine.drone_playing() { "on" } else { "off" },
            swara,
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Console parsing
// ════════════════════════════════════════════════════════════════════════════

/// What one console line asks for.
#[derive(Debug, PartialEq)]
enum Input {
    Pinch(SimPinch),
    Cmd(Command),
    Status,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

fn parse_line(line: &str) -> Input {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    let mut parts = line.split_whitespace();
    let head = parts.next().unwrap_or("");
    let arg = parts.next();

    // "l1".."l4" / "r1".."r4": pinch finger N of that hand.
    if let Some(pinch) = parse_pinch(head) {
        return Input::Pinch(pinch);
    }

    match (head, arg) {
        ("raga", Some(key)) => Input::Cmd(Command::SetRaga(key.to_string())),
        ("tala", Some(key)) => Input::Cmd(Command::SetTala(key.to_string())),
        ("dir", None) => Input::Cmd(Command::CycleDirection),
        ("oct+", None) => Input::Cmd(Command::OctaveUp),
        ("oct-", None) => Input::Cmd(Command::OctaveDown),
        ("drone", None) => Input::Cmd(Command::ToggleDrone),
        ("vol", Some(v)) => match v.parse::<f32>() {
            Ok(level) => Input::Cmd(Command::SetDroneVolume(level)),
            Err(_) => Input::Unknown(line.to_string()),
        },
        ("reset", None) => Input::Cmd(Command::ResetGestures),
        ("start", None) => Input::Cmd(Command::Start),
        ("stop", None) => Input::Cmd(Command::Stop),
        ("status", None) => Input::Status,
        ("help", None) => Input::Help,
        ("quit", None) | ("q", None) => Input::Quit,
        _ => Input::Unknown(line.to_string()),
    }
}

fn parse_pinch(token: &str) -> Option<SimPinch> {
    let mut chars = token.chars();
    let hand = match chars.next()? {
        'l' => Handedness::Left,
        'r' => Handedness::Right,
        _ => return None,
    };
    let finger = match chars.next()? {
        '1' => Finger::Index,
        '2' => Finger::Middle,
        '3' => Finger::Ring,
        '4' => Finger::Pinky,
        _ => return None,
    };
    chars.next().is_none().then_some(SimPinch { hand, finger })
}

fn print_help() {
    println!("  l1..l4 / r1..r4   pinch that finger (1=index .. 4=pinky)");
    println!("  raga <key>        select raga (e.g. mohanam)");
    println!("  tala <key>        select tala (e.g. rupaka)");
    println!("  dir               cycle the hand-mapping layout");
    println!("  oct+ / oct-       shift the melodic octave");
    println!("  drone             toggle the tanpura drone");
    println!("  vol <0..1>        set drone volume");
    println!("  reset             clear gesture latches and cooldowns");
    println!("  stop / start      halt and resume the session");
    println!("  status            show the session line");
    println!("  quit              exit");
}

// ════════════════════════════════════════════════════════════════════════════
// run
// ════════════════════════════════════════════════════════════════════════════

fn spawn_stdin_reader() -> Receiver<Input> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut line = String::new();
        loop {
            line.clear();
            match io::stdin().read_line(&mut line) {
                Ok(0) => {
                    let _ = tx.send(Input::Quit);
                    break;
                }
                Ok(_) => {
                    if tx.send(parse_line(&line)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("stdin error: {e}");
                    let _ = tx.send(Input::Quit);
                    break;
                }
            }
        }
    });
    rx
}

/// The interactive session loop over the simulated hand source.
pub fn run(cfg: &AppConfig) -> Result<()> {
    let mut engine = SwaraEngine::new();
    if let Err(e) = engine.initialize() {
        warn!("audio unavailable, running silent: {e}");
        let (null, _log) = NullSynth::new();
        engine = SwaraEngine::with_backend(Box::new(null));
    }

    let mut state = AppState::new(cfg, engine, Instant::now())?;

    let (pinch_tx, pinch_rx) = mpsc::channel();
    let (frame_tx, frame_rx) = mpsc::channel();
    spawn_hand_source(Box::new(SimHandSource::new(pinch_rx)), frame_tx);
    let input_rx = spawn_stdin_reader();

    info!(
        "session: {} / {} / {}",
        state.raga().name,
        state.tala().name,
        cfg.direction.as_str()
    );
    print_help();

    loop {
        let now = Instant::now();

        loop {
            match frame_rx.try_recv() {
                Ok(frame) => state.handle_frame(&frame, now),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    return Err(anyhow!("hand source disconnected"));
                }
            }
        }

        let mut quit = false;
        loop {
            match input_rx.try_recv() {
                Ok(Input::Pinch(p)) => {
                    if pinch_tx.send(p).is_err() {
                        return Err(anyhow!("hand source disconnected"));
                    }
                }
                Ok(Input::Cmd(cmd)) => state.handle_command(cmd, now),
                Ok(Input::Status) => println!("{}", state.status_line()),
                Ok(Input::Help) => print_help(),
                Ok(Input::Quit) => {
                    quit = true;
                    break;
                }
                Ok(Input::Empty) => {}
                Ok(Input::Unknown(line)) => {
                    println!("unrecognized: '{line}' (try 'help')")
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    quit = true;
                    break;
                }
            }
        }
        if quit {
            break;
        }

        if state.tick(now) {
            print!("\r{}          ", state.status_line());
            let _ = io::stdout().flush();
        }

        thread::sleep(LOOP_SLEEP);
    }

    state.stop();
    println!();
    info!("goodbye");
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
