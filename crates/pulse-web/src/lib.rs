pub mod memory;
pub mod probe;
pub mod runner;
pub mod storage;

pub use memory::PerformanceMemory;
pub use probe::probe_device;
pub use runner::GameRunner;
pub use storage::{local_saves, LocalStorageStore};

/// Map the numeric trigger code used by the JS host.
pub fn viewport_trigger(code: u32) -> pulse_engine::ViewportTrigger {
    match code {
        1 => pulse_engine::ViewportTrigger::OrientationChange,
        2 => pulse_engine::ViewportTrigger::FullscreenChange,
        _ => pulse_engine::ViewportTrigger::Resize,
    }
}

/// Generate all `#[wasm_bindgen]` exports for a game.
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
/// use pulse_engine::*;
///
/// mod game;
/// use game::MyGame;
///
/// pulse_web::export_game!(MyGame, "my-game");
/// ```
///
/// - `$game_type`: a type implementing `pulse_engine::Game` with a `new()` constructor
/// - `$game_name`: a string literal used in log messages
#[macro_export]
macro_rules! export_game {
    ($game_type:ty, $game_name:literal) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::GameRunner<$game_type>>> = RefCell::new(None);
        }

        fn with_runner<R: Default>(f: impl FnOnce(&mut $crate::GameRunner<$game_type>) -> R) -> R {
            RUNNER.with(|cell| match cell.borrow_mut().as_mut() {
                Some(runner) => f(runner),
                None => {
                    log::warn!("{}: call game_init() first", $game_name);
                    R::default()
                }
            })
        }

        #[wasm_bindgen]
        pub fn game_init() {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            let probe = $crate::probe_device();
            let runner = $crate::GameRunner::new(
                <$game_type>::new(),
                &probe,
                Box::new($crate::PerformanceMemory),
            );
            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });

            with_runner(|r| r.init());
            log::info!("{}: initialized", $game_name);
        }

        #[wasm_bindgen]
        pub fn game_tick(now: f64) {
            with_runner(|r| r.tick(now));
        }

        #[wasm_bindgen]
        pub fn game_teardown() {
            with_runner(|r| r.teardown());
            RUNNER.with(|cell| cell.borrow_mut().take());
        }

        // ---- Touch input ----

        #[wasm_bindgen]
        pub fn touch_start(id: u32, x: f32, y: f32, time: f64) {
            with_runner(|r| r.push_input(InputEvent::TouchStart { id, x, y, time }));
        }

        #[wasm_bindgen]
        pub fn touch_move(id: u32, x: f32, y: f32, time: f64) {
            with_runner(|r| r.push_input(InputEvent::TouchMove { id, x, y, time }));
        }

        #[wasm_bindgen]
        pub fn touch_end(id: u32, x: f32, y: f32, time: f64) {
            with_runner(|r| r.push_input(InputEvent::TouchEnd { id, x, y, time }));
        }

        #[wasm_bindgen]
        pub fn touch_cancel(id: u32, time: f64) {
            with_runner(|r| r.push_input(InputEvent::TouchCancel { id, time }));
        }

        // ---- Host notifications ----

        /// `trigger`: 0 resize, 1 orientation change, 2 fullscreen change.
        #[wasm_bindgen]
        pub fn viewport_changed(trigger: u32, now: f64) {
            let probe = $crate::probe_device();
            with_runner(|r| r.viewport_changed($crate::viewport_trigger(trigger), probe, now));
        }

        #[wasm_bindgen]
        pub fn set_visibility(visible: bool) {
            with_runner(|r| r.set_visible(visible));
        }

        #[wasm_bindgen]
        pub fn set_focus(focused: bool) {
            with_runner(|r| r.set_focused(focused));
        }

        #[wasm_bindgen]
        pub fn embed_message(origin: &str, json: &str, now: f64) {
            with_runner(|r| r.embed_message(origin, json, now));
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn take_events_json() -> String {
            with_runner(|r| r.take_events_json())
        }

        #[wasm_bindgen]
        pub fn take_embed_outbox() -> String {
            with_runner(|r| r.take_embed_outbox())
        }

        #[wasm_bindgen]
        pub fn get_settings_ptr() -> *const f32 {
            RUNNER.with(|cell| {
                cell.borrow()
                    .as_ref()
                    .map_or(std::ptr::null(), |r| r.settings_ptr())
            })
        }

        #[wasm_bindgen]
        pub fn get_settings_floats() -> u32 {
            with_runner(|r| r.settings_floats())
        }
    };
}
