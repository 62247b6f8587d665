pub mod runner;

pub use runner::ViewerRunner;

// Re-exported so the macro expands without extra imports in the viewer crate.
pub use glam;
pub use js_sys;
pub use terra_engine;

/// Generate all `#[wasm_bindgen]` exports for a viewer.
///
/// Generates:
/// - `thread_local!` storage for the ViewerRunner
/// - `with_runner()` helper function (creates the runner on first use)
/// - All wasm-bindgen exports (viewer_init, viewer_frame, time controls,
///   texture callbacks, frame buffer accessors)
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
///
/// mod view;
/// use view::MyViewer;
///
/// terra_web::export_viewer!(MyViewer, "my-viewer");
/// ```
///
/// # Arguments
///
/// - `$viewer_type`: a type implementing `terra_engine::Viewer` with a `new()` constructor
/// - `$viewer_name`: a string literal used in log messages
#[macro_export]
macro_rules! export_viewer {
    ($viewer_type:ty, $viewer_name:literal) => {
        use std::cell::RefCell;
        use $crate::terra_engine::{InputEvent, FlightTarget, SpeedPreset, ControlError};

        thread_local! {
            static RUNNER: RefCell<Option<$crate::ViewerRunner<$viewer_type>>> = RefCell::new(None);
        }

        fn install_hooks() {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);
        }

        // Controls may arrive before `viewer_init`; the runner is created on
        // first use and ignores frames until initialized.
        fn with_runner<R>(f: impl FnOnce(&mut $crate::ViewerRunner<$viewer_type>) -> R) -> R {
            RUNNER.with(|cell| {
                let mut slot = cell.borrow_mut();
                let runner =
                    slot.get_or_insert_with(|| $crate::ViewerRunner::new(<$viewer_type>::new()));
                f(runner)
            })
        }

        fn push_checked(result: Result<InputEvent, ControlError>) {
            with_runner(|r| match result {
                Ok(event) => r.push_input(event),
                Err(err) => r.reject(&err),
            });
        }

        /// Replace the default configuration. Must run before `viewer_init`.
        /// Returns false (and logs) when the JSON is rejected.
        #[wasm_bindgen]
        pub fn viewer_configure(json: &str) -> bool {
            install_hooks();
            with_runner(|r| match r.configure(json) {
                Ok(()) => true,
                Err(err) => {
                    log::warn!("{}: {}", $viewer_name, err);
                    false
                }
            })
        }

        #[wasm_bindgen]
        pub fn viewer_init() {
            install_hooks();
            let now = $crate::terra_engine::timestamp_from_f64($crate::js_sys::Date::now()).unwrap_or(0);
            with_runner(|r| r.init(now));
            log::info!("{}: initialized", $viewer_name);
        }

        /// Call once per `requestAnimationFrame` with its timestamp.
        #[wasm_bindgen]
        pub fn viewer_frame(now_ms: f64) {
            with_runner(|r| r.frame(now_ms));
        }

        // ---- Time controls ----

        #[wasm_bindgen]
        pub fn viewer_set_time(epoch_ms: f64) {
            push_checked($crate::terra_engine::timestamp_from_f64(epoch_ms).map(InputEvent::SetTime));
        }

        /// Date-picker value, e.g. `2024-06-21` or `2024-06-21T12:30`.
        #[wasm_bindgen]
        pub fn viewer_set_date(value: &str) {
            push_checked($crate::terra_engine::parse_date_input(value).map(InputEvent::SetTime));
        }

        #[wasm_bindgen]
        pub fn viewer_step_hours(hours: i32) {
            with_runner(|r| r.push_input(InputEvent::StepHours(hours as i64)));
        }

        #[wasm_bindgen]
        pub fn viewer_pause() {
            with_runner(|r| r.push_input(InputEvent::Pause));
        }

        #[wasm_bindgen]
        pub fn viewer_play() {
            with_runner(|r| r.push_input(InputEvent::Play));
        }

        #[wasm_bindgen]
        pub fn viewer_toggle_pause() {
            with_runner(|r| r.push_input(InputEvent::TogglePause));
        }

        /// 0 = pause, 1 = 1x, 2 = 10x, 3 = 100x.
        #[wasm_bindgen]
        pub fn viewer_preset(index: u32) {
            match SpeedPreset::from_index(index) {
                Some(preset) => with_runner(|r| r.push_input(InputEvent::Preset(preset))),
                None => log::warn!("{}: unknown speed preset {}", $viewer_name, index),
            }
        }

        #[wasm_bindgen]
        pub fn viewer_set_multiplier(multiplier: f64) {
            with_runner(|r| r.push_input(InputEvent::SetMultiplier(multiplier)));
        }

        #[wasm_bindgen]
        pub fn viewer_reset_now() {
            push_checked(
                $crate::terra_engine::timestamp_from_f64($crate::js_sys::Date::now())
                    .map(InputEvent::ResetToNow),
            );
        }

        // ---- Camera ----

        #[wasm_bindgen]
        pub fn viewer_fly_to_earth() {
            with_runner(|r| r.push_input(InputEvent::FlyTo(FlightTarget::Earth)));
        }

        /// 0 = Moon, then satellites in catalog order.
        #[wasm_bindgen]
        pub fn viewer_fly_to_body(index: u32) {
            with_runner(|r| r.push_input(InputEvent::FlyTo(FlightTarget::Body(index as usize))));
        }

        #[wasm_bindgen]
        pub fn viewer_resize(width: f32, height: f32) {
            with_runner(|r| r.push_input(InputEvent::Resize { width, height }));
        }

        /// The host's orbit controls changed the camera.
        #[wasm_bindgen]
        pub fn viewer_camera_moved(px: f32, py: f32, pz: f32, tx: f32, ty: f32, tz: f32) {
            with_runner(|r| {
                r.push_input(InputEvent::CameraMoved {
                    position: $crate::glam::Vec3::new(px, py, pz),
                    target: $crate::glam::Vec3::new(tx, ty, tz),
                })
            });
        }

        // ---- Texture callbacks ----

        #[wasm_bindgen]
        pub fn viewer_texture_loaded(name: &str) {
            with_runner(|r| r.texture_loaded(name));
        }

        #[wasm_bindgen]
        pub fn viewer_texture_failed(name: &str) {
            with_runner(|r| r.texture_failed(name));
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn get_frame_ptr() -> *const f32 {
            with_runner(|r| r.frame_ptr())
        }

        #[wasm_bindgen]
        pub fn get_frame_len() -> u32 {
            with_runner(|r| r.frame_len())
        }

        #[wasm_bindgen]
        pub fn get_pose_ptr() -> *const f32 {
            with_runner(|r| r.pose_ptr())
        }

        #[wasm_bindgen]
        pub fn get_pose_count() -> u32 {
            with_runner(|r| r.pose_count())
        }

        #[wasm_bindgen]
        pub fn get_sim_time_ms() -> f64 {
            with_runner(|r| r.sim_time_ms())
        }

        #[wasm_bindgen]
        pub fn get_light_direction() -> Vec<f32> {
            with_runner(|r| r.light_direction().to_vec())
        }

        #[wasm_bindgen]
        pub fn get_sun_position() -> Vec<f32> {
            with_runner(|r| r.sun_position().to_vec())
        }

        #[wasm_bindgen]
        pub fn get_flight_active() -> bool {
            with_runner(|r| r.flight_active())
        }

        #[wasm_bindgen]
        pub fn get_scene_json() -> String {
            with_runner(|r| r.scene_json())
        }

        #[wasm_bindgen]
        pub fn get_attribution() -> String {
            with_runner(|r| r.attribution())
        }

        #[wasm_bindgen]
        pub fn get_earth_vertex_shader() -> String {
            with_runner(|r| r.earth_vertex_shader().to_string())
        }

        #[wasm_bindgen]
        pub fn get_earth_fragment_shader() -> String {
            with_runner(|r| r.earth_fragment_shader().to_string())
        }

        // ---- Capacity accessors ----

        #[wasm_bindgen]
        pub fn get_max_poses() -> u32 {
            with_runner(|r| r.max_poses())
        }

        #[wasm_bindgen]
        pub fn get_max_events() -> u32 {
            with_runner(|r| r.max_events())
        }

        #[wasm_bindgen]
        pub fn get_buffer_total_floats() -> u32 {
            with_runner(|r| r.buffer_total_floats())
        }
    };
}
