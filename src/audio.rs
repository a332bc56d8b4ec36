use crate::core::{
    AudioBackend, AudioError, AudioHost, AudioResult, FilterKind, Param, Ramp, Waveform,
};
use wasm_bindgen::JsValue;
use web_sys as web;

fn reason(e: JsValue) -> String {
    format!("{:?}", e)
}

/// The node kinds the effects create.
#[derive(Clone, Debug)]
pub enum WebNode {
    Oscillator(web::OscillatorNode),
    BufferSource(web::AudioBufferSourceNode),
    Gain(web::GainNode),
    Filter(web::BiquadFilterNode),
    Destination(web::AudioDestinationNode),
}

impl WebNode {
    fn audio_node(&self) -> &web::AudioNode {
        match self {
            WebNode::Oscillator(n) => n.as_ref(),
            WebNode::BufferSource(n) => n.as_ref(),
            WebNode::Gain(n) => n.as_ref(),
            WebNode::Filter(n) => n.as_ref(),
            WebNode::Destination(n) => n.as_ref(),
        }
    }

    fn scheduled(&self) -> AudioResult<&web::AudioScheduledSourceNode> {
        match self {
            WebNode::Oscillator(n) => Ok(n.as_ref()),
            WebNode::BufferSource(n) => Ok(n.as_ref()),
            _ => Err(AudioError::Schedule("not a source node".into())),
        }
    }

    fn param(&self, param: Param) -> AudioResult<web::AudioParam> {
        match (self, param) {
            (WebNode::Gain(n), Param::Gain) => Ok(n.gain()),
            (WebNode::Oscillator(n), Param::Frequency) => Ok(n.frequency()),
            (WebNode::Filter(n), Param::Frequency) => Ok(n.frequency()),
            _ => Err(AudioError::Connect(format!("{:?} has no {:?} param", self, param))),
        }
    }
}

fn oscillator_type(waveform: Waveform) -> web::OscillatorType {
    match waveform {
        Waveform::Sine => web::OscillatorType::Sine,
        Waveform::Square => web::OscillatorType::Square,
        Waveform::Sawtooth => web::OscillatorType::Sawtooth,
        Waveform::Triangle => web::OscillatorType::Triangle,
    }
}

fn filter_type(kind: FilterKind) -> web::BiquadFilterType {
    match kind {
        FilterKind::Lowpass => web::BiquadFilterType::Lowpass,
        FilterKind::Bandpass => web::BiquadFilterType::Bandpass,
    }
}

/// `AudioContext` handle implementing [`AudioBackend`].
#[derive(Clone)]
pub struct WebAudioBackend {
    ctx: web::AudioContext,
}

impl WebAudioBackend {
    pub fn context(&self) -> &web::AudioContext {
        &self.ctx
    }
}

impl AudioBackend for WebAudioBackend {
    type Node = WebNode;
    type Buffer = web::AudioBuffer;

    fn current_time(&self) -> f64 {
        self.ctx.current_time()
    }

    fn sample_rate(&self) -> f32 {
        self.ctx.sample_rate()
    }

    fn destination(&self) -> WebNode {
        WebNode::Destination(self.ctx.destination())
    }

    fn is_suspended(&self) -> bool {
        self.ctx.state() == web::AudioContextState::Suspended
    }

    fn resume(&self) -> AudioResult<()> {
        self.ctx
            .resume()
            .map(|_| ())
            .map_err(|e| AudioError::Playback(reason(e)))
    }

    fn close(&self) -> AudioResult<()> {
        if self.ctx.state() == web::AudioContextState::Closed {
            return Ok(());
        }
        self.ctx
            .close()
            .map(|_| ())
            .map_err(|e| AudioError::Playback(reason(e)))
    }

    fn oscillator(&self, waveform: Waveform, frequency_hz: f32) -> AudioResult<WebNode> {
        let osc = self
            .ctx
            .create_oscillator()
            .map_err(|e| AudioError::create("OscillatorNode", reason(e)))?;
        osc.set_type(oscillator_type(waveform));
        osc.frequency().set_value(frequency_hz);
        Ok(WebNode::Oscillator(osc))
    }

    fn buffer(&self, samples: &[f32]) -> AudioResult<web::AudioBuffer> {
        let buffer = self
            .ctx
            .create_buffer(1, samples.len().max(1) as u32, self.ctx.sample_rate())
            .map_err(|e| AudioError::create("AudioBuffer", reason(e)))?;
        let mut data = samples.to_vec();
        buffer
            .copy_to_channel(&mut data, 0)
            .map_err(|e| AudioError::create("AudioBuffer", reason(e)))?;
        Ok(buffer)
    }

    fn buffer_source(&self, buffer: &web::AudioBuffer, looping: bool) -> AudioResult<WebNode> {
        let src = self
            .ctx
            .create_buffer_source()
            .map_err(|e| AudioError::create("AudioBufferSourceNode", reason(e)))?;
        src.set_buffer(Some(buffer));
        src.set_loop(looping);
        Ok(WebNode::BufferSource(src))
    }

    fn gain(&self, level: f32) -> AudioResult<WebNode> {
        let gain = self
            .ctx
            .create_gain()
            .map_err(|e| AudioError::create("GainNode", reason(e)))?;
        gain.gain().set_value(level);
        Ok(WebNode::Gain(gain))
    }

    fn filter(&self, kind: FilterKind, frequency_hz: f32, q: f32) -> AudioResult<WebNode> {
        let filter = self
            .ctx
            .create_biquad_filter()
            .map_err(|e| AudioError::create("BiquadFilterNode", reason(e)))?;
        filter.set_type(filter_type(kind));
        filter.frequency().set_value(frequency_hz);
        filter.q().set_value(q);
        Ok(WebNode::Filter(filter))
    }

    fn connect(&self, from: &WebNode, to: &WebNode) -> AudioResult<()> {
        from.audio_node()
            .connect_with_audio_node(to.audio_node())
            .map(|_| ())
            .map_err(|e| AudioError::Connect(reason(e)))
    }

    fn modulate(&self, from: &WebNode, target: &WebNode, param: Param) -> AudioResult<()> {
        let param = target.param(param)?;
        from.audio_node()
            .connect_with_audio_param(&param)
            .map_err(|e| AudioError::Connect(reason(e)))
    }

    fn automate(&self, node: &WebNode, param: Param, ramp: Ramp) -> AudioResult<()> {
        let p = node.param(param)?;
        let scheduled = match ramp {
            Ramp::SetAt(v, t) => p.set_value_at_time(v, t),
            Ramp::LinearTo(v, t) => p.linear_ramp_to_value_at_time(v, t),
            Ramp::ExponentialTo(v, t) => p.exponential_ramp_to_value_at_time(v, t),
        };
        scheduled
            .map(|_| ())
            .map_err(|e| AudioError::Schedule(reason(e)))
    }

    fn start(&self, source: &WebNode, at: f64) -> AudioResult<()> {
        source
            .scheduled()?
            .start_with_when(at)
            .map_err(|e| AudioError::Playback(reason(e)))
    }

    fn stop(&self, source: &WebNode, at: Option<f64>) -> AudioResult<()> {
        let node = source.scheduled()?;
        match at {
            Some(t) => node.stop_with_when(t),
            None => node.stop(),
        }
        .map_err(|e| AudioError::Playback(reason(e)))
    }

    fn disconnect(&self, node: &WebNode) {
        _ = node.audio_node().disconnect();
    }
}

/// Creates `AudioContext`s on demand.
#[derive(Clone, Copy, Debug, Default)]
pub struct WebAudioHost;

impl AudioHost for WebAudioHost {
    type Backend = WebAudioBackend;

    fn supports_audio(&self) -> bool {
        web::window()
            .map(|w| js_sys::Reflect::has(&w, &JsValue::from_str("AudioContext")).unwrap_or(false))
            .unwrap_or(false)
    }

    fn create_context(&self) -> AudioResult<WebAudioBackend> {
        let ctx = web::AudioContext::new()
            .map_err(|e| AudioError::create("AudioContext", reason(e)))?;
        Ok(WebAudioBackend { ctx })
    }
}
