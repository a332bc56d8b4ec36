pub mod keyboard;
pub mod pointer;

pub use keyboard::{wire_gesture_activation, wire_konami, WebAmbience};
pub use pointer::{mount_parallax, wire_cursor_pointer};
