use anyhow::{anyhow, Context};
use fnv::FnvHashMap;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

/// Decoded sample buffers keyed by URL.
#[derive(Clone, Default)]
pub struct SampleCache {
    buffers: Rc<RefCell<FnvHashMap<String, web::AudioBuffer>>>,
}

impl SampleCache {
    pub fn get(&self, url: &str) -> Option<web::AudioBuffer> {
        self.buffers.borrow().get(url).cloned()
    }

    /// Fetch and decode `url` once; later calls hit the cache.
    pub async fn load(&self, ctx: &web::AudioContext, url: &str) -> anyhow::Result<web::AudioBuffer> {
        if let Some(buffer) = self.get(url) {
            return Ok(buffer);
        }
        let buffer = fetch_and_decode(ctx, url).await?;
        self.buffers
            .borrow_mut()
            .insert(url.to_string(), buffer.clone());
        log::info!("[sfx] cached sample {}", url);
        Ok(buffer)
    }
}

async fn fetch_and_decode(ctx: &web::AudioContext, url: &str) -> anyhow::Result<web::AudioBuffer> {
    let window = web::window().ok_or_else(|| anyhow!("no window"))?;
    let response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| anyhow!("fetch {}: {:?}", url, e))?
        .dyn_into::<web::Response>()
        .map_err(|e| anyhow!("fetch {}: not a response: {:?}", url, e))?;
    if !response.ok() {
        return Err(anyhow!("fetch {}: HTTP {}", url, response.status()));
    }
    let bytes = response
        .array_buffer()
        .map_err(|e| anyhow!("{:?}", e))
        .with_context(|| format!("reading {}", url))?;
    let bytes = JsFuture::from(bytes)
        .await
        .map_err(|e| anyhow!("reading {}: {:?}", url, e))?
        .dyn_into::<js_sys::ArrayBuffer>()
        .map_err(|e| anyhow!("reading {}: {:?}", url, e))?;
    let decoded = ctx
        .decode_audio_data(&bytes)
        .map_err(|e| anyhow!("decode {}: {:?}", url, e))?;
    JsFuture::from(decoded)
        .await
        .map_err(|e| anyhow!("decode {}: {:?}", url, e))?
        .dyn_into::<web::AudioBuffer>()
        .map_err(|e| anyhow!("decode {}: {:?}", url, e))
}
