//! Procedural ambience for a space-themed site: a twinkling starfield with
//! shooting stars, a warp-speed streak field, a gesture-activated ship
//! ambience soundscape, UI sound effects, a spring-follow cursor, scroll
//! parallax and a Konami-code ice shower.
//!
//! [`core`] is platform independent and tested natively; everything else binds
//! it to the browser and only builds for `wasm32`.

pub mod core;

#[cfg(target_arch = "wasm32")]
mod audio;
#[cfg(target_arch = "wasm32")]
mod canvas;
#[cfg(target_arch = "wasm32")]
mod constants;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod entry;
#[cfg(target_arch = "wasm32")]
mod events;
#[cfg(target_arch = "wasm32")]
mod frame;
#[cfg(target_arch = "wasm32")]
mod overlay;
#[cfg(target_arch = "wasm32")]
mod samples;

#[cfg(target_arch = "wasm32")]
pub use entry::{mount_all, start, unmount_all, SoundEffects};
