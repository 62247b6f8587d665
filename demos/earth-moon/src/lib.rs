use wasm_bindgen::prelude::*;

pub mod bodies;
pub mod view;
use view::EarthMoonView;

terra_web::export_viewer!(EarthMoonView, "earth-moon");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controls_before_init_do_not_trap() {
        viewer_pause();
        viewer_step_hours(3);
        viewer_set_date("not a date");
        viewer_fly_to_body(0);
        viewer_texture_loaded("moon");
        viewer_frame(16.0);

        assert!(!get_flight_active());
        assert_eq!(get_pose_count(), 0);
        assert_eq!(get_max_poses(), 16);
        RUNNER.with(|cell| {
            let slot = cell.borrow();
            let runner = slot.as_ref().unwrap();
            assert!(!runner.is_initialized());
            assert!(!runner.is_ready());
        });
    }

    #[test]
    fn default_shaders_are_view_space() {
        assert!(get_earth_vertex_shader().contains("normalMatrix"));
        assert!(get_earth_fragment_shader().contains("vViewPosition"));
    }
}
