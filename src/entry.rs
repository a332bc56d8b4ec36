use crate::audio::WebAudioHost;
use crate::constants::*;
use crate::core::{
    AmbienceSource, FxConfig, IceShower, ShipAmbience, SoundBoard, SpringCursor, Waveform,
};
use crate::dom::{self, ListenerGuard};
use crate::events::{self, WebAmbience};
use crate::frame::{self, Effect, WindowTimer};
use crate::samples::SampleCache;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::future_to_promise;
use web_sys as web;

#[derive(Default)]
struct Mounted {
    effects: Vec<Effect>,
    ambience: Option<Rc<RefCell<WebAmbience>>>,
    gestures: Option<Rc<RefCell<Vec<ListenerGuard>>>>,
}

impl Mounted {
    fn unmount(&mut self) {
        if let Some(gestures) = self.gestures.take() {
            gestures.borrow_mut().clear();
        }
        if let Some(ambience) = self.ambience.take() {
            ambience.borrow_mut().unmount();
        }
        self.effects.clear();
    }
}

thread_local! {
    static MOUNTED: RefCell<Option<Mounted>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("nebula-fx starting");

    if let Err(e) = mount_effects() {
        log::error!("init error: {:?}", e);
    }
    Ok(())
}

/// Mount every effect whose DOM hook is present. Re-mounting first unmounts
/// whatever is already running.
#[wasm_bindgen]
pub fn mount_all() {
    if let Err(e) = mount_effects() {
        log::error!("mount error: {:?}", e);
    }
}

/// Stop every loop, remove every listener and close the ambience session.
#[wasm_bindgen]
pub fn unmount_all() {
    let mounted = MOUNTED.with(|m| m.borrow_mut().take());
    if let Some(mut mounted) = mounted {
        mounted.unmount();
        log::info!("all effects unmounted");
    }
}

fn load_config(document: &web::Document) -> FxConfig {
    let Some(text) = document
        .get_element_by_id(CONFIG_SCRIPT_ID)
        .and_then(|el| el.text_content())
    else {
        return FxConfig::default();
    };
    match FxConfig::from_json(&text) {
        Ok(config) => {
            log::info!("[config] loaded overrides from #{}", CONFIG_SCRIPT_ID);
            config
        }
        Err(e) => {
            log::warn!("[config] {}; using defaults", e);
            FxConfig::default()
        }
    }
}

fn mount_effects() -> anyhow::Result<()> {
    unmount_all();
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let config = load_config(&document);
    let mut mounted = Mounted::default();

    if document.get_element_by_id(STARFIELD_CANVAS_ID).is_some() {
        let ice = Rc::new(RefCell::new(IceShower::new(config.ice.clone(), rand::random())));
        if let Some(effect) = frame::mount_starfield(
            &document,
            STARFIELD_CANVAS_ID,
            &config,
            Rc::clone(&ice),
            rand::random(),
        ) {
            let konami = events::wire_konami(&document, ice, config.ice.konami_reset_ms);
            mounted.effects.push(effect.listen(konami));
        }
    }

    if let Some(effect) = frame::mount_warp(&document, WARP_CANVAS_ID, &config, rand::random()) {
        mounted.effects.push(effect);
    }

    if let Ok(Some(_)) = document.query_selector(AMBIENCE_SELECTOR) {
        let ambience = Rc::new(RefCell::new(ShipAmbience::new(
            WebAudioHost,
            WindowTimer,
            config.ambience.clone(),
            rand::random(),
        )));
        mounted.gestures = Some(events::wire_gesture_activation(&document, Rc::clone(&ambience)));
        mounted.ambience = Some(ambience);
        log::info!("[ambience] waiting for a gesture");
    }

    if let Some(element) = document
        .get_element_by_id(CURSOR_ID)
        .and_then(|el| el.dyn_into::<web::HtmlElement>().ok())
    {
        let cursor = Rc::new(RefCell::new(SpringCursor::new(&config.cursor)));
        let pointer = events::wire_cursor_pointer(Rc::clone(&cursor));
        mounted
            .effects
            .push(frame::mount_cursor(element, cursor).listen(pointer));
    }

    if let Some(effect) = events::mount_parallax(&document, PARALLAX_SELECTOR, &config.parallax) {
        mounted.effects.push(effect);
    }

    log::info!(
        "mounted {} effects{}",
        mounted.effects.len(),
        if mounted.ambience.is_some() { " + ambience" } else { "" }
    );
    MOUNTED.with(|m| *m.borrow_mut() = Some(mounted));
    Ok(())
}

/// UI sound effects for page scripts.
#[wasm_bindgen]
pub struct SoundEffects {
    board: Rc<RefCell<SoundBoard<WebAudioHost>>>,
    samples: SampleCache,
}

#[wasm_bindgen]
impl SoundEffects {
    #[wasm_bindgen(constructor)]
    pub fn new() -> SoundEffects {
        let config = dom::window_document()
            .map(|d| load_config(&d))
            .unwrap_or_default();
        SoundEffects {
            board: Rc::new(RefCell::new(SoundBoard::new(
                WebAudioHost,
                config.sfx,
                rand::random(),
            ))),
            samples: SampleCache::default(),
        }
    }

    /// Call from a user gesture to open or resume the audio context.
    pub fn unlock(&self) -> bool {
        self.board.borrow_mut().unlock()
    }

    #[wasm_bindgen(js_name = playTone)]
    pub fn play_tone(&self, frequency: f32, waveform: &str, duration: f64, volume: f32) {
        let waveform = Waveform::from_name(waveform).unwrap_or_else(|| {
            log::warn!("[sfx] unknown waveform {:?}; using sine", waveform);
            Waveform::Sine
        });
        self.board
            .borrow_mut()
            .play_tone(frequency, waveform, duration, volume);
    }

    #[wasm_bindgen(js_name = playHover)]
    pub fn play_hover(&self) {
        self.board.borrow_mut().play_hover();
    }

    #[wasm_bindgen(js_name = playClick)]
    pub fn play_click(&self) {
        self.board.borrow_mut().play_click();
    }

    #[wasm_bindgen(js_name = playError)]
    pub fn play_error(&self) {
        self.board.borrow_mut().play_error();
    }

    #[wasm_bindgen(js_name = playSuccess)]
    pub fn play_success(&self) {
        self.board.borrow_mut().play_success();
    }

    #[wasm_bindgen(js_name = playTyping)]
    pub fn play_typing(&self) {
        self.board.borrow_mut().play_typing();
    }

    /// Fetch (once), decode and play the sample at `url`.
    #[wasm_bindgen(js_name = playSample)]
    pub fn play_sample(&self, url: String, volume: f32) -> js_sys::Promise {
        let (board, samples) = (Rc::clone(&self.board), self.samples.clone());
        future_to_promise(async move {
            let Some(buffer) = load_sample(&board, &samples, &url).await else {
                return Ok(JsValue::FALSE);
            };
            board.borrow_mut().play_sample(&buffer, volume);
            Ok(JsValue::TRUE)
        })
    }

    /// Cross-fade to a looping ambience: the built-in synth when `url` is
    /// absent, otherwise the sample at `url`.
    #[wasm_bindgen(js_name = playAmbience)]
    pub fn play_ambience(&self, url: Option<String>, volume: f32) -> js_sys::Promise {
        let (board, samples) = (Rc::clone(&self.board), self.samples.clone());
        future_to_promise(async move {
            let source = match url {
                None => AmbienceSource::Synth,
                Some(url) => match load_sample(&board, &samples, &url).await {
                    Some(buffer) => AmbienceSource::Buffer(buffer),
                    None => return Ok(JsValue::FALSE),
                },
            };
            board.borrow_mut().play_ambience(source, volume);
            Ok(JsValue::TRUE)
        })
    }

    #[wasm_bindgen(js_name = stopAmbience)]
    pub fn stop_ambience(&self) {
        self.board.borrow_mut().stop_ambience();
    }

    /// Returns the new mute state.
    #[wasm_bindgen(js_name = toggleMute)]
    pub fn toggle_mute(&self) -> bool {
        self.board.borrow_mut().toggle_mute()
    }

    #[wasm_bindgen(getter, js_name = isMuted)]
    pub fn is_muted(&self) -> bool {
        self.board.borrow().is_muted()
    }

    pub fn close(&self) {
        self.board.borrow_mut().close();
    }
}

impl Default for SoundEffects {
    fn default() -> Self {
        Self::new()
    }
}

async fn load_sample(
    board: &Rc<RefCell<SoundBoard<WebAudioHost>>>,
    samples: &SampleCache,
    url: &str,
) -> Option<web::AudioBuffer> {
    let ctx = {
        let mut board = board.borrow_mut();
        if !board.unlock() {
            return None;
        }
        board.session().map(|s| s.backend().context().clone())?
    };
    match samples.load(&ctx, url).await {
        Ok(buffer) => Some(buffer),
        Err(e) => {
            log::warn!("[sfx] {:#}", e);
            None
        }
    }
}
