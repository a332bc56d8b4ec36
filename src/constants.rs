//! DOM hooks the effects mount onto.

pub const STARFIELD_CANVAS_ID: &str = "starfield-canvas";
pub const WARP_CANVAS_ID: &str = "warp-canvas";
pub const CURSOR_ID: &str = "cosmic-cursor";
pub const ICE_BANNER_ID: &str = "ice-giant-banner";
pub const CONFIG_SCRIPT_ID: &str = "nebula-fx-config";

pub const AMBIENCE_SELECTOR: &str = "[data-ship-ambience]";
pub const PARALLAX_SELECTOR: &str = "[data-parallax-speed]";
pub const PARALLAX_SPEED_ATTR: &str = "data-parallax-speed";

/// Class toggled on `<body>` while the ice shower runs.
pub const ICE_BODY_CLASS: &str = "ice-giant-mode";
pub const HIDDEN_CLASS: &str = "hidden";

pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";
