use crate::constants::{PARALLAX_SPEED_ATTR, REDUCED_MOTION_QUERY};
use crate::core::{FrameClock, ParallaxConfig, ParallaxTracker, SpringCursor};
use crate::dom::{self, ListenerGuard};
use crate::frame::{Effect, RafClock};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn wire_cursor_pointer(cursor: Rc<RefCell<SpringCursor>>) -> Option<ListenerGuard> {
    ListenerGuard::on_window("mousemove", move |ev| {
        if let Some(ev) = ev.dyn_ref::<web::MouseEvent>() {
            cursor
                .borrow_mut()
                .pointer_moved(ev.client_x() as f32, ev.client_y() as f32);
        }
    })
}

struct ParallaxLayer {
    element: web::HtmlElement,
    tracker: ParallaxTracker,
}

fn apply_offsets(layers: &RefCell<Vec<ParallaxLayer>>, now_ms: f64) {
    let scroll_y = web::window()
        .and_then(|w| w.scroll_y().ok())
        .unwrap_or(0.0) as f32;
    for layer in layers.borrow_mut().iter_mut() {
        if let Some(offset) = layer.tracker.update(scroll_y, now_ms) {
            _ = layer
                .element
                .style()
                .set_property("transform", &format!("translate3d(0, {:.2}px, 0)", offset));
        }
    }
}

/// Scroll-linked offsets for every element matching `selector`. Scroll events
/// are coalesced to at most one pending animation frame.
pub fn mount_parallax(document: &web::Document, selector: &str, config: &ParallaxConfig) -> Option<Effect> {
    let reduced = dom::prefers_reduced_motion(REDUCED_MOTION_QUERY);
    let viewport = dom::viewport_width();
    if !ParallaxTracker::enabled(config, reduced, viewport) {
        log::info!("[parallax] disabled (reduced motion: {}, viewport {}px)", reduced, viewport);
        return None;
    }
    let layers: Vec<ParallaxLayer> = dom::query_all(document, selector)
        .into_iter()
        .map(|element| {
            let speed = element
                .get_attribute(PARALLAX_SPEED_ATTR)
                .and_then(|s| s.trim().parse::<f32>().ok())
                .unwrap_or(config.speed);
            ParallaxLayer {
                element,
                tracker: ParallaxTracker::with_speed(config, speed),
            }
        })
        .collect();
    if layers.is_empty() {
        return None;
    }
    let count = layers.len();
    let layers = Rc::new(RefCell::new(layers));
    let pending = Rc::new(Cell::new(false));

    let scroll = ListenerGuard::on_window("scroll", move |_| {
        if pending.replace(true) {
            return;
        }
        let (layers, pending) = (Rc::downgrade(&layers), Rc::clone(&pending));
        let queued = RafClock.request_frame(Box::new(move |ts| {
            pending.set(false);
            if let Some(layers) = layers.upgrade() {
                apply_offsets(&layers, ts);
            }
        }));
        if queued.is_none() {
            pending.set(false);
        }
    });
    log::info!("[parallax] mounted on {} layers", count);
    Some(Effect::new("parallax").listen(scroll))
}
