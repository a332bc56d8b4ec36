use super::constants::KONAMI_RESET_MS;
use std::collections::VecDeque;

/// `KeyboardEvent.code` values of the Konami code.
pub const KONAMI_CODE: [&str; 10] = [
    "ArrowUp",
    "ArrowUp",
    "ArrowDown",
    "ArrowDown",
    "ArrowLeft",
    "ArrowRight",
    "ArrowLeft",
    "ArrowRight",
    "KeyB",
    "KeyA",
];

/// Rolling match of the last few key codes against a fixed sequence.
#[derive(Debug)]
pub struct KonamiDetector {
    window: VecDeque<String>,
    last_key_ms: Option<f64>,
    reset_ms: f64,
}

impl Default for KonamiDetector {
    fn default() -> Self {
        Self::new(KONAMI_RESET_MS)
    }
}

impl KonamiDetector {
    pub fn new(reset_ms: f64) -> Self {
        Self {
            window: VecDeque::with_capacity(KONAMI_CODE.len()),
            last_key_ms: None,
            reset_ms,
        }
    }

    /// Number of keys currently buffered.
    pub fn progress(&self) -> usize {
        self.window.len()
    }

    /// Feed one key press. Returns `true` when it completes the sequence;
    /// the buffer is cleared on a match and after `reset_ms` of inactivity.
    pub fn push(&mut self, code: &str, now_ms: f64) -> bool {
        if let Some(last) = self.last_key_ms {
            if now_ms - last > self.reset_ms {
                self.window.clear();
            }
        }
        self.last_key_ms = Some(now_ms);

        if self.window.len() == KONAMI_CODE.len() {
            self.window.pop_front();
        }
        self.window.push_back(code.to_owned());

        let matched = self.window.len() == KONAMI_CODE.len()
            && self.window.iter().zip(KONAMI_CODE).all(|(a, b)| a == b);
        if matched {
            self.window.clear();
        }
        matched
    }
}
