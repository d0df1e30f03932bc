use pulse_engine::{
    names, DeviceProbe, Event, FrameworkContext, Game, InputEvent, MemoryProbe, Receiver,
    SettingsWire, ViewportTrigger, SETTINGS_FLOATS,
};

/// Streams forwarded to the TypeScript side every frame.
const FORWARDED: &[&str] = &[
    names::QUALITY_CHANGED,
    names::DEVICE_CHANGED,
    names::VIEWPORT_CHANGED,
    names::NOTIFICATION,
    names::MODAL,
];

const FORWARDED_GESTURES: &[&str] = &["tap", "double_tap", "long_press", "swipe", "pinch", "rotate"];

/// Generic game runner that wires the framework services to a game.
///
/// Each concrete game creates a `thread_local!` GameRunner and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export
/// generic structs directly.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: FrameworkContext,
    memory: Box<dyn MemoryProbe>,
    forwarded: Vec<(String, Receiver<Event>)>,
    settings: SettingsWire,
    last_tick: Option<f64>,
    initialized: bool,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G, probe: &DeviceProbe, memory: Box<dyn MemoryProbe>) -> Self {
        let ctx = FrameworkContext::new(game.config(), probe);
        let settings = ctx.settings();
        Self {
            game,
            ctx,
            memory,
            forwarded: Vec::new(),
            settings,
            last_tick: None,
            initialized: false,
        }
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) {
        let gesture_names = FORWARDED_GESTURES.iter().map(|kind| names::gesture(kind));
        let stream_names = FORWARDED.iter().map(|name| name.to_string());
        for name in stream_names.chain(gesture_names) {
            let rx = self.ctx.bus.stream(&name);
            self.forwarded.push((name, rx));
        }

        self.game.init(&mut self.ctx);
        self.ctx.announce_ready();
        self.settings = self.ctx.settings();
        self.initialized = true;
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.ctx.push_input(event);
    }

    /// Run one animation frame. `now` is the rAF timestamp in milliseconds.
    pub fn tick(&mut self, now: f64) {
        if !self.initialized {
            return;
        }
        let dt = self
            .last_tick
            .map_or(0.0, |last| ((now - last).max(0.0) / 1_000.0) as f32);
        self.last_tick = Some(now);

        self.ctx.frame(now, self.memory.as_ref());
        self.game.update(&mut self.ctx, dt);
        self.flush_quality_changes();
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.ctx.set_visible(visible);
        if visible {
            // The rAF clock jumps while hidden.
            self.last_tick = None;
        }
        self.flush_quality_changes();
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.ctx.set_focused(focused);
        self.flush_quality_changes();
    }

    pub fn viewport_changed(&mut self, trigger: ViewportTrigger, probe: DeviceProbe, now: f64) {
        self.ctx.notify_viewport(trigger, probe, now);
    }

    pub fn embed_message(&mut self, origin: &str, json: &str, now: f64) {
        if self.ctx.receive_embed(origin, json, now).is_some() {
            self.flush_quality_changes();
        }
    }

    /// Forwarded events since the last call, as a JSON array of
    /// `{ "stream": <name>, "event": <event> }`.
    pub fn take_events_json(&mut self) -> String {
        let mut out = Vec::new();
        for (name, rx) in &self.forwarded {
            for event in rx.drain() {
                out.push(serde_json::json!({ "stream": name, "event": event }));
            }
        }
        serde_json::Value::Array(out).to_string()
    }

    /// Messages for the parent page as a JSON array.
    pub fn take_embed_outbox(&mut self) -> String {
        format!("[{}]", self.ctx.embed.drain_outbox().join(","))
    }

    /// Pointer to the flat settings record for direct memory reads.
    pub fn settings_ptr(&self) -> *const f32 {
        self.settings.as_floats().as_ptr()
    }

    pub fn settings_floats(&self) -> u32 {
        SETTINGS_FLOATS as u32
    }

    pub fn teardown(&mut self) {
        self.ctx.teardown();
        self.forwarded.clear();
        self.initialized = false;
    }

    pub fn context(&self) -> &FrameworkContext {
        &self.ctx
    }

    fn flush_quality_changes(&mut self) {
        for change in self.ctx.take_quality_changes() {
            self.game.on_quality_change(&mut self.ctx, &change);
        }
        self.settings = self.ctx.settings();
    }
}
