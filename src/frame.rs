use crate::canvas::CanvasSurface;
use crate::core::{
    FrameClock, FrameLoop, FxConfig, IceShower, SpringCursor, StarField, Timer, WarpField,
};
use crate::dom::{self, ListenerGuard};
use crate::overlay;
use fnv::FnvHashMap;
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

type FrameClosure = Closure<dyn FnMut(f64)>;

thread_local! {
    /// Closures for frames that are requested but not yet delivered, keyed by
    /// rAF handle. Removing an entry frees its callback.
    static PENDING_FRAMES: RefCell<FnvHashMap<i32, FrameClosure>> = RefCell::new(FnvHashMap::default());
}

/// `requestAnimationFrame` as a [`FrameClock`].
#[derive(Clone, Copy, Debug, Default)]
pub struct RafClock;

impl FrameClock for RafClock {
    fn request_frame(&self, callback: Box<dyn FnOnce(f64)>) -> Option<i32> {
        let window = web::window()?;
        let handle = Rc::new(Cell::new(None::<i32>));
        let own_handle = Rc::clone(&handle);
        let mut callback = Some(callback);
        let closure: FrameClosure = Closure::wrap(Box::new(move |ts: f64| {
            // A closure cannot be dropped while it runs; release it afterwards.
            if let Some(done) = own_handle
                .get()
                .and_then(|h| PENDING_FRAMES.with(|p| p.borrow_mut().remove(&h)))
            {
                spawn_local(async move { drop(done) });
            }
            if let Some(cb) = callback.take() {
                cb(ts);
            }
        }) as Box<dyn FnMut(f64)>);
        let id = window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .ok()?;
        handle.set(Some(id));
        PENDING_FRAMES.with(|p| p.borrow_mut().insert(id, closure));
        Some(id)
    }

    fn cancel_frame(&self, handle: i32) {
        if let Some(window) = web::window() {
            _ = window.cancel_animation_frame(handle);
        }
        let cancelled = PENDING_FRAMES.with(|p| p.borrow_mut().remove(&handle));
        drop(cancelled);
    }
}

/// `setTimeout` as a [`Timer`].
#[derive(Clone, Copy, Debug, Default)]
pub struct WindowTimer;

impl Timer for WindowTimer {
    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) {
        let Some(window) = web::window() else {
            return;
        };
        let js = Closure::once_into_js(move || callback());
        if let Err(e) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            js.unchecked_ref(),
            delay.as_millis().min(i32::MAX as u128) as i32,
        ) {
            log::warn!("[frame] setTimeout failed: {:?}", e);
        }
    }
}

/// A mounted visual effect: its frame loop and listeners live exactly as long
/// as this handle.
pub struct Effect {
    pub name: &'static str,
    frame: Option<FrameLoop<RafClock>>,
    listeners: Vec<ListenerGuard>,
}

impl Effect {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            frame: None,
            listeners: Vec::new(),
        }
    }

    pub fn with_frame(mut self, frame: FrameLoop<RafClock>) -> Self {
        self.frame = Some(frame);
        self
    }

    pub fn listen(mut self, guard: Option<ListenerGuard>) -> Self {
        self.listeners.extend(guard);
        self
    }
}

impl Drop for Effect {
    fn drop(&mut self) {
        if let Some(frame) = self.frame.take() {
            frame.cancel();
        }
        self.listeners.clear();
        log::info!("[{}] unmounted", self.name);
    }
}

fn elapsed_sec(last: &mut Instant) -> f32 {
    let now = Instant::now();
    let dt = now - *last;
    *last = now;
    dt.as_secs_f32()
}

/// Twinkling background, shooting stars and the ice shower overlay.
pub fn mount_starfield(
    document: &web::Document,
    canvas_id: &str,
    config: &FxConfig,
    ice: Rc<RefCell<IceShower>>,
    seed: u64,
) -> Option<Effect> {
    let Some(canvas) = dom::canvas_by_id(document, canvas_id) else {
        log::warn!("[starfield] #{} is not a canvas", canvas_id);
        return None;
    };
    let Some(mut surface) = CanvasSurface::from_canvas(&canvas) else {
        log::warn!("[starfield] no 2d context on #{}", canvas_id);
        return None;
    };
    let field = Rc::new(RefCell::new(StarField::new(config.starfield.clone(), seed)));
    let (w, h) = dom::fit_canvas_to_window(&canvas);
    field.borrow_mut().initialize(w, h);

    let resize = {
        let (field, canvas) = (Rc::clone(&field), canvas.clone());
        ListenerGuard::on_window("resize", move |_| {
            let (w, h) = dom::fit_canvas_to_window(&canvas);
            field.borrow_mut().resize(w, h);
        })
    };

    let doc = document.clone();
    let mut last = Instant::now();
    let frame = FrameLoop::start(RafClock, move |_ts| {
        let dt = elapsed_sec(&mut last);
        let mut field = field.borrow_mut();
        field.frame(&mut surface);
        let mut ice = ice.borrow_mut();
        if ice.advance(dt) {
            overlay::hide_ice_banner(&doc);
        }
        let (w, h) = field.size();
        ice.draw(&mut surface, w, h);
    });
    log::info!("[starfield] mounted on #{} ({}x{})", canvas_id, w, h);
    Some(Effect::new("starfield").with_frame(frame).listen(resize))
}

/// Hyperspace streaks.
pub fn mount_warp(document: &web::Document, canvas_id: &str, config: &FxConfig, seed: u64) -> Option<Effect> {
    let canvas = dom::canvas_by_id(document, canvas_id)?;
    let Some(mut surface) = CanvasSurface::from_canvas(&canvas) else {
        log::warn!("[warp] no 2d context on #{}", canvas_id);
        return None;
    };
    let field = Rc::new(RefCell::new(WarpField::new(config.warp.clone(), seed)));
    let (w, h) = dom::fit_canvas_to_window(&canvas);
    field.borrow_mut().resize(w, h);

    let resize = {
        let (field, canvas) = (Rc::clone(&field), canvas.clone());
        ListenerGuard::on_window("resize", move |_| {
            let (w, h) = dom::fit_canvas_to_window(&canvas);
            field.borrow_mut().resize(w, h);
        })
    };
    let frame = FrameLoop::start(RafClock, move |_ts| {
        field.borrow_mut().frame(&mut surface);
    });
    log::info!("[warp] mounted on #{}", canvas_id);
    Some(Effect::new("warp").with_frame(frame).listen(resize))
}

/// Spring-follow cursor sprite. Pointer input is wired by the caller.
pub fn mount_cursor(element: web::HtmlElement, cursor: Rc<RefCell<SpringCursor>>) -> Effect {
    let mut last = Instant::now();
    let frame = FrameLoop::start(RafClock, move |_ts| {
        let dt = elapsed_sec(&mut last);
        let mut cursor = cursor.borrow_mut();
        cursor.step(dt);
        _ = element.style().set_property("transform", &cursor.transform());
    });
    log::info!("[cursor] mounted");
    Effect::new("cursor").with_frame(frame)
}
