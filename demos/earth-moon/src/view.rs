//! Earth-Moon viewer: clock, pose mapping, day/night shading and camera
//! flights on top of the catalog in `bodies`.

use glam::Vec3;
use terra_engine::api::types::*;
use terra_engine::sim::ephemeris::body_pose;
use terra_engine::sim::shading::light_direction_for_shading;
use terra_engine::*;

use crate::bodies::{self, SceneIds};

pub struct EarthMoonView {
    clock: SimulationClock,
    flights: FlightController,
    orbits: Vec<OrbitParams>,
    ids: Option<SceneIds>,
}

impl EarthMoonView {
    pub fn new() -> Self {
        Self {
            clock: SimulationClock::default(),
            flights: FlightController::new(),
            orbits: bodies::orbits(),
            ids: None,
        }
    }

    pub fn scene_ids(&self) -> Option<&SceneIds> {
        self.ids.as_ref()
    }

    fn handle(&mut self, ctx: &mut EngineContext, event: InputEvent) -> Result<(), ControlError> {
        match event {
            InputEvent::SetTime(t) => self.clock.set_time_ms(t),
            InputEvent::StepHours(hours) => self.clock.step_hours(hours),
            InputEvent::Pause => self.clock.pause(),
            InputEvent::Play => self.clock.play(),
            InputEvent::TogglePause => self.clock.toggle_pause(),
            InputEvent::Preset(preset) => self.clock.apply_preset(preset),
            InputEvent::SetMultiplier(m) => self.clock.set_multiplier(m)?,
            InputEvent::ResetToNow(now) => {
                self.clock.set_time_ms(now);
                self.clock.apply_preset(SpeedPreset::RealTime);
            }
            InputEvent::FlyTo(target) => {
                let focus = match target {
                    FlightTarget::Earth => Vec3::ZERO,
                    FlightTarget::Body(index) => {
                        let orbit = self
                            .orbits
                            .get(index)
                            .ok_or(ControlError::UnknownBody(index))?;
                        body_pose(self.clock.simulated_time_ms(), orbit).position.as_vec3()
                    }
                };
                let config = &ctx.config;
                self.flights.start(CameraFlight::towards(
                    target,
                    &ctx.camera,
                    focus,
                    config.fly_offset(),
                    config.fly_duration_s,
                    config.fly_easing,
                ));
            }
            InputEvent::Resize { width, height } => ctx.camera.resize(width, height),
            InputEvent::CameraMoved { position, target } => {
                if let Some(cancelled) = self.flights.cancel() {
                    log::debug!("flight to {cancelled:?} cancelled by camera input");
                }
                ctx.camera.set_pose(position, target);
                let limits = &ctx.config.camera;
                ctx.camera.clamp_distance(limits.min_distance, limits.max_distance);
            }
        }
        Ok(())
    }

    /// Pose the scene for the clock's current time and aim the lights.
    fn pose_scene(&self, ctx: &mut EngineContext) -> FramePoses {
        let poses = compute_poses(
            self.clock.simulated_time_ms(),
            &ctx.config.ephemeris,
            &self.orbits,
        );
        apply_poses(&mut ctx.scene, &poses);
        ctx.sun.point_along(poses.sun_direction);
        poses
    }

    fn update_shading(&self, ctx: &mut EngineContext, poses: &FramePoses) {
        let config = &ctx.config;
        let light = light_direction_for_shading(
            poses.sun_direction,
            config.light_space,
            &ctx.camera.view_matrix(),
            poses.earth.spin,
        );
        ctx.earth_uniforms = EarthUniforms::new(light, config.shininess, config.terminator);
    }

    fn publish_status(&self, ctx: &mut EngineContext) {
        let t = self.clock.simulated_time_ms();
        ctx.status = ViewerStatus {
            sim_time_ms: t,
            time_multiplier: self.clock.time_multiplier(),
            paused: self.clock.is_paused(),
            flight_active: self.flights.is_active(),
        };

        let seconds_of_day = t.rem_euclid(terra_engine::sim::clock::MS_PER_DAY) as f32 / 1000.0;
        ctx.emit_event(ViewerEvent::new(
            EVENT_TIME_INFO,
            self.clock.time_multiplier() as f32,
            if self.clock.is_paused() { 1.0 } else { 0.0 },
            seconds_of_day,
        ));
        if let Some(date) = CalendarDate::from_epoch_ms(t) {
            ctx.emit_event(ViewerEvent::new(
                EVENT_DATE_INFO,
                date.year as f32,
                date.month as f32,
                date.day as f32,
            ));
            ctx.emit_event(ViewerEvent::new(
                EVENT_CLOCK_INFO,
                date.hour as f32,
                date.minute as f32,
                date.second as f32,
            ));
        }
    }
}

impl Default for EarthMoonView {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewer for EarthMoonView {
    fn init(&mut self, ctx: &mut EngineContext, start_time_ms: i64) {
        self.clock = SimulationClock::new(start_time_ms, ctx.config.max_multiplier);
        self.ids = Some(bodies::spawn_scene(ctx));
        let poses = self.pose_scene(ctx);
        self.update_shading(ctx, &poses);
        self.publish_status(ctx);
        log::info!("earth-moon: {} orbiting bodies", self.orbits.len());
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue, real_dt_ms: f64) {
        for &event in input.iter() {
            if let Err(err) = self.handle(ctx, event) {
                log::warn!("input rejected: {err}");
                ctx.emit_event(ViewerEvent::new(EVENT_COMMAND_REJECTED, err.code(), 0.0, 0.0));
            }
        }

        self.clock.advance(real_dt_ms);
        let poses = self.pose_scene(ctx);

        if let Some(target) = self.flights.tick((real_dt_ms / 1000.0) as f32, &mut ctx.camera) {
            ctx.emit_event(ViewerEvent::new(EVENT_FLIGHT_COMPLETE, target.event_code(), 0.0, 0.0));
        }

        self.update_shading(ctx, &poses);
        self.publish_status(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;
    use terra_engine::bridge::protocol::*;
    use terra_web::ViewerRunner;
    use terra_engine::sim::shading::{to_shading_space, EARTH_OBJECT_VERTEX_SHADER};

    /// 2024-06-21 12:00:00 UTC.
    const SOLSTICE_NOON: i64 = 1_718_971_200_000;

    fn ready_runner(start_ms: i64) -> ViewerRunner<EarthMoonView> {
        let mut runner = ViewerRunner::new(EarthMoonView::new());
        runner.init(start_ms);
        for slot in TextureSlot::ALL {
            runner.texture_loaded(slot.name());
        }
        runner.frame(0.0);
        runner
    }

    fn events(runner: &ViewerRunner<EarthMoonView>) -> Vec<ViewerEvent> {
        let layout = runner.layout();
        let count = runner.frame_data()[HEADER_EVENT_COUNT] as usize;
        let start = layout.event_data_offset;
        let floats = &runner.frame_data()[start..start + count * EVENT_FLOATS];
        bytemuck::cast_slice(floats).to_vec()
    }

    fn moon_pos(runner: &ViewerRunner<EarthMoonView>) -> Vec3 {
        let ids = runner.viewer().scene_ids().unwrap();
        runner.context().scene.get(ids.bodies[bodies::MOON]).unwrap().pos
    }

    #[test]
    fn epoch_start_has_zero_spin_and_moon_on_x() {
        let runner = ready_runner(0);
        let ctx = runner.context();
        let earth = ctx.scene.find_by_tag("earth").unwrap();
        assert_eq!(earth.rotation.y, 0.0);
        assert!((moon_pos(&runner) - Vec3::new(5.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn half_day_spins_earth_half_turn() {
        let mut runner = ready_runner(0);
        runner.frame(43_200_000.0);
        let earth = runner.context().scene.find_by_tag("earth").unwrap();
        // Frame deltas are capped at one second.
        assert!((earth.rotation.y - 1000.0 / 86_400_000.0 * 2.0 * PI).abs() < 1e-6);

        let mut runner = ready_runner(43_200_000);
        runner.frame(0.0);
        let earth = runner.context().scene.find_by_tag("earth").unwrap();
        assert!((earth.rotation.y - PI).abs() < 1e-5);
    }

    #[test]
    fn quarter_moon_period_moves_moon_to_z() {
        let runner = ready_runner(bodies::MOON_PERIOD_MS / 4);
        assert!((moon_pos(&runner) - Vec3::new(0.0, 0.0, 5.0)).length() < 1e-4);
    }

    #[test]
    fn paused_clock_freezes_poses() {
        let mut runner = ready_runner(SOLSTICE_NOON);
        runner.push_input(InputEvent::Pause);
        runner.frame(16.0);
        let frozen = moon_pos(&runner);
        let t = runner.sim_time_ms();
        for i in 2..10 {
            runner.frame(i as f64 * 16.0);
        }
        assert_eq!(moon_pos(&runner), frozen);
        assert_eq!(runner.sim_time_ms(), t);
        assert_eq!(runner.frame_data()[HEADER_PAUSED], 1.0);
    }

    #[test]
    fn multiplier_scales_simulated_time() {
        let mut runner = ready_runner(0);
        runner.push_input(InputEvent::Preset(SpeedPreset::Faster));
        runner.frame(100.0);
        assert_eq!(runner.sim_time_ms(), 10_000.0);
        runner.push_input(InputEvent::SetMultiplier(5_000.0));
        runner.frame(200.0);
        assert_eq!(runner.sim_time_ms(), 110_000.0);
        assert_eq!(runner.frame_data()[HEADER_TIME_MULTIPLIER], 1000.0);
    }

    #[test]
    fn date_events_follow_the_clock() {
        let mut runner = ready_runner(0);
        runner.push_input(InputEvent::SetTime(SOLSTICE_NOON));
        runner.push_input(InputEvent::StepHours(2));
        runner.frame(16.0);
        let events = events(&runner);
        let date = events.iter().find(|e| e.kind == EVENT_DATE_INFO).unwrap();
        assert_eq!((date.a, date.b, date.c), (2024.0, 6.0, 21.0));
        let clock = events.iter().find(|e| e.kind == EVENT_CLOCK_INFO).unwrap();
        assert_eq!((clock.a, clock.b), (14.0, 0.0));
    }

    #[test]
    fn bad_inputs_are_rejected_without_side_effects() {
        let mut runner = ready_runner(SOLSTICE_NOON);
        runner.push_input(InputEvent::Pause);
        runner.frame(16.0);
        let t = runner.sim_time_ms();

        runner.push_input(InputEvent::SetMultiplier(f64::NAN));
        runner.push_input(InputEvent::FlyTo(FlightTarget::Body(9)));
        runner.frame(32.0);

        let rejected: Vec<f32> = events(&runner)
            .iter()
            .filter(|e| e.kind == EVENT_COMMAND_REJECTED)
            .map(|e| e.a)
            .collect();
        assert_eq!(rejected, vec![2.0, 3.0]);
        assert_eq!(runner.sim_time_ms(), t);
        assert!(!runner.flight_active());
    }

    #[test]
    fn fly_to_moon_completes_after_duration() {
        let mut runner = ready_runner(0);
        runner.push_input(InputEvent::Pause);
        runner.push_input(InputEvent::FlyTo(FlightTarget::Body(bodies::MOON)));
        runner.frame(500.0);
        assert!(runner.flight_active());

        let mut now = 500.0;
        let mut completed = None;
        while now < 3_000.0 && completed.is_none() {
            now += 500.0;
            runner.frame(now);
            completed = events(&runner)
                .into_iter()
                .find(|e| e.kind == EVENT_FLIGHT_COMPLETE);
        }
        let done = completed.expect("flight never completed");
        assert_eq!(done.a, bodies::MOON as f32);
        assert!(!runner.flight_active());

        let camera = &runner.context().camera;
        let moon = moon_pos(&runner);
        assert!((camera.position - (moon + Vec3::new(0.0, 0.5, 2.0))).length() < 1e-5);
        assert!((camera.target - moon).length() < 1e-5);
    }

    #[test]
    fn camera_input_cancels_flight() {
        let mut runner = ready_runner(0);
        runner.push_input(InputEvent::FlyTo(FlightTarget::Earth));
        runner.frame(100.0);
        assert!(runner.flight_active());

        let manual = Vec3::new(3.0, 1.0, 3.0);
        runner.push_input(InputEvent::CameraMoved { position: manual, target: Vec3::ZERO });
        runner.frame(200.0);
        assert!(!runner.flight_active());
        assert_eq!(runner.context().camera.position, manual);
    }

    #[test]
    fn camera_input_is_held_within_orbit_limits() {
        let mut runner = ready_runner(0);
        runner.push_input(InputEvent::CameraMoved {
            position: Vec3::new(0.0, 0.0, 0.2),
            target: Vec3::ZERO,
        });
        runner.frame(100.0);
        let near = runner.context().camera.distance_to_target();
        assert!((near - 1.5).abs() < 1e-5, "near = {near}");

        runner.push_input(InputEvent::CameraMoved {
            position: Vec3::new(0.0, 200.0, 0.0),
            target: Vec3::ZERO,
        });
        runner.frame(200.0);
        assert!((runner.context().camera.position.y - 50.0).abs() < 1e-4);
    }

    #[test]
    fn light_direction_is_unit_and_sun_follows_poses() {
        let runner = ready_runner(SOLSTICE_NOON);
        let light = Vec3::from_array(runner.light_direction());
        assert!((light.length() - 1.0).abs() < 1e-5);

        let sun = Vec3::from_array(runner.sun_position());
        assert!((sun.length() - 5.0).abs() < 1e-4);
        // June solstice: the sun sits north of the equator.
        assert!(sun.y > 0.0);
    }

    #[test]
    fn object_space_light_ignores_camera() {
        let mut runner = ViewerRunner::new(EarthMoonView::new());
        runner.configure(r#"{ "light_space": "object" }"#).unwrap();
        runner.init(SOLSTICE_NOON);
        for slot in TextureSlot::ALL {
            runner.texture_loaded(slot.name());
        }
        runner.frame(0.0);
        let before = runner.light_direction();

        runner.push_input(InputEvent::Pause);
        runner.push_input(InputEvent::CameraMoved {
            position: Vec3::new(0.0, 4.0, 0.1),
            target: Vec3::ZERO,
        });
        runner.frame(16.0);
        let after = runner.light_direction();
        for i in 0..3 {
            assert!((before[i] - after[i]).abs() < 1e-4);
        }
    }

    #[test]
    fn object_space_shader_lights_the_subsolar_point() {
        let mut runner = ViewerRunner::new(EarthMoonView::new());
        runner.configure(r#"{ "light_space": "object" }"#).unwrap();
        runner.init(SOLSTICE_NOON + 3_600_000);
        for slot in TextureSlot::ALL {
            runner.texture_loaded(slot.name());
        }
        runner.push_input(InputEvent::CameraMoved {
            position: Vec3::new(0.0, 4.0, 0.1),
            target: Vec3::ZERO,
        });
        runner.frame(0.0);
        assert_eq!(runner.earth_vertex_shader(), EARTH_OBJECT_VERTEX_SHADER);

        let ctx = runner.context();
        let earth_id = runner.viewer().scene_ids().unwrap().earth;
        let spin = ctx.scene.get(earth_id).unwrap().rotation.y as f64;
        assert!(spin > 0.1);

        let subsolar = Vec3::from_array(runner.sun_position()).normalize();
        let normal =
            to_shading_space(subsolar, LightSpace::Object, &ctx.camera.view_matrix(), spin);
        let light = Vec3::from_array(runner.light_direction());
        assert!((normal.dot(light) - 1.0).abs() < 1e-4, "N·L = {}", normal.dot(light));
    }

    #[test]
    fn moon_texture_failure_still_reaches_first_render() {
        let mut runner = ViewerRunner::new(EarthMoonView::new());
        runner.init(SOLSTICE_NOON);
        for slot in TextureSlot::ALL {
            if slot == TextureSlot::Moon {
                runner.texture_failed(slot.name());
            } else {
                runner.texture_loaded(slot.name());
            }
        }
        runner.frame(1_000.0);

        assert!(runner.is_ready());
        assert_eq!(runner.frame_data()[HEADER_FRAME_COUNTER], 1.0);
        assert_eq!(runner.frame_data()[HEADER_POSE_COUNT], 7.0);
        assert_eq!(
            runner.context().textures.state(TextureSlot::Moon),
            TextureState::Fallback([0.55, 0.55, 0.55, 1.0])
        );
        let kinds: Vec<f32> = events(&runner).iter().map(|e| e.kind).collect();
        assert_eq!(&kinds[..2], &[EVENT_TEXTURE_FALLBACK, EVENT_RESOURCES_READY]);
    }

    #[test]
    fn reset_to_now_resumes_real_time() {
        let mut runner = ready_runner(0);
        runner.push_input(InputEvent::Pause);
        runner.frame(16.0);
        runner.push_input(InputEvent::ResetToNow(SOLSTICE_NOON));
        runner.frame(32.0);
        assert_eq!(runner.sim_time_ms(), (SOLSTICE_NOON + 16) as f64);
        assert_eq!(runner.frame_data()[HEADER_PAUSED], 0.0);
    }
}
