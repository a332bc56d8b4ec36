//! Platform-independent effect logic.
//!
//! Everything under `core` is plain Rust: particle systems and audio graph
//! wiring draw and play through the [`Surface`] and [`AudioBackend`] traits,
//! and time is supplied through [`FrameClock`] and [`Timer`]. The wasm-only
//! modules at the crate root bind those traits to `web-sys`.

pub mod activation;
pub mod audio;
pub mod config;
pub mod constants;
pub mod cursor;
pub mod error;
pub mod ice;
pub mod konami;
pub mod parallax;
pub mod schedule;
pub mod stars;
pub mod surface;
pub mod warp;

pub use activation::*;
pub use audio::*;
pub use config::*;
pub use cursor::*;
pub use error::*;
pub use ice::*;
pub use konami::*;
pub use parallax::*;
pub use schedule::*;
pub use stars::*;
pub use surface::*;
pub use warp::*;
