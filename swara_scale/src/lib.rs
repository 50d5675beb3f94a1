//! # swara_scale
//!
//! Static Carnatic music tables and pure resolution functions:
//!
//! * [`SwaraBase`] — the seven base scale-degree symbols (Sa…Ni).
//! * [`Swara`] — a concrete swarasthana spelling (base + variant), with a
//!   fixed just-intonation [`ratio`] table for all sixteen positions.
//! * [`Raga`] — a named scale: an ordered subset of swarasthanas, at most
//!   one variant per base degree.
//! * [`Tala`] — a named rhythmic cycle: a fixed-length accent pattern.
//! * [`resolve`] — map a base degree to the variant a raga actually uses.
//!
//! Everything here is immutable constant data plus deterministic lookups.
//! Unknown names resolve to `None`; nothing in this crate panics or
//! allocates.
//!
//! ## Quick start
//!
//! ```rust
//! use swara_scale::{raga, resolve, ratio, SwaraBase, swara::SA};
//!
//! let maya = raga("mayamalavagowla").unwrap();
//! let ri = resolve(SwaraBase::Ri, maya.swaras).unwrap();
//! assert_eq!(ri.to_string(), "Ri1");
//! assert_eq!(ratio(SA), Some(1.0));
//! ```

pub mod raga;
pub mod resolve;
pub mod swara;
pub mod tala;

pub use raga::{raga, ragas, Raga};
pub use resolve::{resolve, resolve_swara};
pub use swara::{ratio, Swara, SwaraBase};
pub use tala::{tala, talas, Tala};
