use crate::audio::WebAudioHost;
use crate::core::{IceShower, KonamiDetector, ShipAmbience, GESTURE_EVENTS};
use crate::dom::ListenerGuard;
use crate::frame::WindowTimer;
use crate::overlay;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

pub type WebAmbience = ShipAmbience<WebAudioHost, WindowTimer>;

/// One-shot gesture listeners that start the ship ambience. The listeners
/// remove themselves after the first gesture.
pub fn wire_gesture_activation(
    document: &web::Document,
    ambience: Rc<RefCell<WebAmbience>>,
) -> Rc<RefCell<Vec<ListenerGuard>>> {
    let guards: Rc<RefCell<Vec<ListenerGuard>>> = Rc::new(RefCell::new(Vec::new()));
    for event in GESTURE_EVENTS {
        let ambience = Rc::downgrade(&ambience);
        let guards_weak: Weak<RefCell<Vec<ListenerGuard>>> = Rc::downgrade(&guards);
        let guard = ListenerGuard::new(document.as_ref(), event, move |_| {
            let Some(ambience) = ambience.upgrade() else {
                return;
            };
            let fired = ambience.borrow_mut().on_gesture();
            if !fired {
                return;
            }
            log::info!("[ambience] activated by {}", event);
            // Listeners cannot be removed while one of them is running.
            let guards = guards_weak.clone();
            spawn_local(async move {
                if let Some(guards) = guards.upgrade() {
                    guards.borrow_mut().clear();
                }
            });
        });
        guards.borrow_mut().extend(guard);
    }
    guards
}

/// Watch for the Konami code and start the ice shower when it completes.
pub fn wire_konami(
    document: &web::Document,
    ice: Rc<RefCell<IceShower>>,
    reset_ms: f64,
) -> Option<ListenerGuard> {
    let detector = RefCell::new(KonamiDetector::new(reset_ms));
    let doc = document.clone();
    ListenerGuard::on_window("keydown", move |ev| {
        let Some(ev) = ev.dyn_ref::<web::KeyboardEvent>() else {
            return;
        };
        if detector.borrow_mut().push(&ev.code(), ev.time_stamp()) {
            log::info!("[konami] code entered");
            ice.borrow_mut().activate();
            overlay::show_ice_banner(&doc);
        }
    })
}
