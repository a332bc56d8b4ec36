use super::{AudioBackend, AudioHost, Param, Ramp};
use crate::core::error::{AudioError, AudioResult};

/// An owned audio context plus the master gain every layer routes through.
///
/// Whoever opens a session owns it and is the only one who closes it;
/// components that need audio borrow it.
pub struct AudioSession<B: AudioBackend> {
    backend: B,
    master: B::Node,
    master_level: f32,
    closed: bool,
}

impl<B: AudioBackend> AudioSession<B> {
    /// Create the context and master gain. Fails with
    /// [`AudioError::Unsupported`] when the host has no audio.
    pub fn open<H: AudioHost<Backend = B>>(host: &H, master_level: f32) -> AudioResult<Self> {
        if !host.supports_audio() {
            return Err(AudioError::Unsupported);
        }
        let backend = host.create_context()?;
        let master = match backend
            .gain(master_level)
            .and_then(|m| backend.connect(&m, &backend.destination()).map(|_| m))
        {
            Ok(m) => m,
            Err(e) => {
                _ = backend.close();
                return Err(e);
            }
        };
        let session = Self {
            backend,
            master,
            master_level,
            closed: false,
        };
        session.resume_if_suspended();
        log::info!("[audio] session opened (master {:.2})", master_level);
        Ok(session)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn master(&self) -> &B::Node {
        &self.master
    }

    pub fn master_level(&self) -> f32 {
        self.master_level
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Autoplay policies start contexts suspended until a gesture.
    pub fn resume_if_suspended(&self) {
        if self.closed || !self.backend.is_suspended() {
            return;
        }
        if let Err(e) = self.backend.resume() {
            log::warn!("[audio] resume failed: {}", e);
        }
    }

    /// Glide the master gain to `level` over `seconds`.
    pub fn ramp_master(&self, level: f32, seconds: f64) -> AudioResult<()> {
        if self.closed {
            return Err(AudioError::Closed);
        }
        let end = self.backend.current_time() + seconds;
        self.backend
            .automate(&self.master, Param::Gain, Ramp::LinearTo(level, end))
    }

    /// Disconnect the master and close the context. Idempotent.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.backend.disconnect(&self.master);
        match self.backend.close() {
            Ok(()) => log::info!("[audio] session closed"),
            Err(e) => log::warn!("[audio] close failed: {}", e),
        }
    }
}

impl<B: AudioBackend> Drop for AudioSession<B> {
    fn drop(&mut self) {
        self.close();
    }
}
