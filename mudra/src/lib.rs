//! # mudra
//!
//! Hand-gesture raga instrument: per-frame hand landmarks become
//! raga-constrained note events driving a polyphonic swara engine, with
//! a tanpura drone and a tala cycle counter underneath.
//!
//! ## Gesture → Sound mapping
//!
//! | Gesture | Action |
//! |---|---|
//! | Pinch (fingertip to thumb, either hand) | Trigger the swara mapped to that finger |
//! | Release + re-pinch | Trigger again (after the cooldown window) |
//! | Hold a pinch | Nothing further; one event per press |
//!
//! Each non-thumb finger carries one of the seven base swaras per the
//! selected layout; the selected raga decides which variant actually
//! sounds, and drops degrees it does not use.
//!
//! ## Console commands (simulation mode)
//!
//! | Command | Action |
//! |---|---|
//! | `l1`…`l4`, `r1`…`r4` | Pinch that finger (1=index … 4=pinky) |
//! | `raga <key>` / `tala <key>` | Select scale / cycle |
//! | `dir` | Cycle the hand-mapping layout |
//! | `oct+` / `oct-` | Shift the melodic octave |
//! | `drone` / `vol <0..1>` | Toggle / level the tanpura drone |
//! | `reset` | Clear gesture latches and cooldowns |
//! | `stop` / `start` | Halt and resume the session |
//! | `quit` | Exit |

pub mod app;
pub mod gesture;
pub mod hand;
pub mod mapping;
pub mod sim;
pub mod tala_clock;
