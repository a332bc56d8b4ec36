//! Frame loops and cancellable repeating timers.
//!
//! Hosts provide [`FrameClock`] (`requestAnimationFrame`) and [`Timer`]
//! (`setTimeout`). Callbacks that are already queued when a loop or task is
//! cancelled still fire, but they observe the cancellation and do nothing.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

/// Host source of animation frames.
pub trait FrameClock: Clone + 'static {
    /// Queue `callback` for the next frame; it receives a timestamp in
    /// milliseconds. Returns a handle for [`cancel_frame`](Self::cancel_frame)
    /// or `None` if the host refused the request.
    fn request_frame(&self, callback: Box<dyn FnOnce(f64)>) -> Option<i32>;
    fn cancel_frame(&self, handle: i32);
}

/// Host one-shot timer.
pub trait Timer: Clone + 'static {
    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>);
}

/// Shared cancellation flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

struct LoopState {
    token: CancelToken,
    pending: Cell<Option<i32>>,
    body: RefCell<Box<dyn FnMut(f64)>>,
}

/// A callback re-registered for every animation frame until cancelled.
///
/// Dropping the loop cancels it.
pub struct FrameLoop<C: FrameClock> {
    clock: C,
    state: Rc<LoopState>,
}

impl<C: FrameClock> FrameLoop<C> {
    pub fn start(clock: C, body: impl FnMut(f64) + 'static) -> Self {
        let state = Rc::new(LoopState {
            token: CancelToken::new(),
            pending: Cell::new(None),
            body: RefCell::new(Box::new(body)),
        });
        request_next(&clock, &state);
        Self { clock, state }
    }

    pub fn is_running(&self) -> bool {
        !self.state.token.is_cancelled()
    }

    /// Stop immediately. The body never runs again, even for a frame the
    /// host had already queued.
    pub fn cancel(&self) {
        if self.state.token.is_cancelled() {
            return;
        }
        self.state.token.cancel();
        if let Some(handle) = self.state.pending.take() {
            self.clock.cancel_frame(handle);
        }
    }
}

impl<C: FrameClock> Drop for FrameLoop<C> {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn request_next<C: FrameClock>(clock: &C, state: &Rc<LoopState>) {
    let clock_next = clock.clone();
    let state_next = Rc::clone(state);
    let handle = clock.request_frame(Box::new(move |timestamp_ms| {
        state_next.pending.set(None);
        if state_next.token.is_cancelled() {
            return;
        }
        (state_next.body.borrow_mut().as_mut())(timestamp_ms);
        if !state_next.token.is_cancelled() {
            request_next(&clock_next, &state_next);
        }
    }));
    if handle.is_none() {
        log::warn!("[frame] host refused an animation frame; loop stopped");
        state.token.cancel();
    }
    state.pending.set(handle);
}

struct TaskState {
    body: Box<dyn FnMut()>,
    next_delay: Box<dyn FnMut() -> Duration>,
}

/// Body that runs now and then re-arms itself after a freshly computed delay
/// until cancelled. The token is checked before each run and each re-arm.
pub struct RepeatingTask {
    token: CancelToken,
}

impl RepeatingTask {
    pub fn spawn<T: Timer>(
        timer: &T,
        mut body: impl FnMut() + 'static,
        next_delay: impl FnMut() -> Duration + 'static,
    ) -> Self {
        let token = CancelToken::new();
        body();
        let state = Rc::new(RefCell::new(TaskState {
            body: Box::new(body),
            next_delay: Box::new(next_delay),
        }));
        arm(timer, token.clone(), state);
        Self { token }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

fn arm<T: Timer>(timer: &T, token: CancelToken, state: Rc<RefCell<TaskState>>) {
    if token.is_cancelled() {
        return;
    }
    let delay = (state.borrow_mut().next_delay.as_mut())();
    let timer_next = timer.clone();
    timer.set_timeout(
        delay,
        Box::new(move || {
            if token.is_cancelled() {
                return;
            }
            (state.borrow_mut().body.as_mut())();
            arm(&timer_next, token, state);
        }),
    );
}
