use terra_engine::api::types::{
    ViewerEvent, EVENT_COMMAND_REJECTED, EVENT_RESOURCES_READY, EVENT_TEXTURE_FALLBACK,
};
use terra_engine::bridge::protocol::*;
use terra_engine::sim::clock::MS_PER_DAY;
use terra_engine::sim::shading::EARTH_FRAGMENT_SHADER;
use terra_engine::{
    sync_scene, ConfigError, ControlError, EngineContext, FrameTimer, InputEvent, InputQueue,
    PoseBuffer, ProtocolLayout, SceneBackend, Viewer, ViewerConfig,
};

/// Generic viewer runner that wires up the frame loop.
///
/// Each concrete viewer (e.g., `earth-moon`) creates a `thread_local!`
/// ViewerRunner and exports free functions via `#[wasm_bindgen]`, because
/// wasm-bindgen cannot export generic structs directly.
pub struct ViewerRunner<V: Viewer> {
    viewer: V,
    ctx: EngineContext,
    input: InputQueue,
    poses: PoseBuffer,
    timer: FrameTimer,
    layout: ProtocolLayout,
    /// Flat frame buffer read by the host.
    frame: Vec<f32>,
    /// Events raised between frames (rejected bridge input).
    pending_events: Vec<ViewerEvent>,
    initialized: bool,
    ready: bool,
    first_frame_ms: Option<f64>,
}

impl<V: Viewer> ViewerRunner<V> {
    pub fn new(viewer: V) -> Self {
        let config = viewer.config();
        let layout = ProtocolLayout::from_config(&config);

        Self {
            viewer,
            input: InputQueue::new(),
            poses: PoseBuffer::with_capacity(config.max_poses),
            timer: FrameTimer::new(config.max_frame_ms),
            frame: vec![0.0; layout.buffer_total_floats],
            layout,
            ctx: EngineContext::new(config),
            pending_events: Vec::new(),
            initialized: false,
            ready: false,
            first_frame_ms: None,
        }
    }

    /// Replace the configuration with a (partial) JSON object. Only allowed
    /// before `init`.
    pub fn configure(&mut self, json: &str) -> Result<(), ConfigError> {
        if self.initialized {
            return Err(ConfigError::Invalid {
                field: "config",
                reason: "viewer already initialized".to_string(),
            });
        }
        let config = ViewerConfig::from_json(json)?;
        self.layout = ProtocolLayout::from_config(&config);
        self.poses = PoseBuffer::with_capacity(config.max_poses);
        self.timer = FrameTimer::new(config.max_frame_ms);
        self.frame = vec![0.0; self.layout.buffer_total_floats];
        self.ctx = EngineContext::new(config);
        Ok(())
    }

    /// Initialize the viewer. Call once after construction.
    pub fn init(&mut self, start_time_ms: i64) {
        if self.initialized {
            log::warn!("init called twice; ignoring");
            return;
        }
        self.viewer.init(&mut self.ctx, start_time_ms);
        self.initialized = true;
        self.write_frame();
        log::info!(
            "scene built: {} entities, waiting for {} textures",
            self.ctx.scene.len(),
            self.ctx.textures.pending_count()
        );
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Drop a bridge input that failed validation.
    pub fn reject(&mut self, err: &ControlError) {
        log::warn!("input rejected: {err}");
        self.pending_events
            .push(ViewerEvent::new(EVENT_COMMAND_REJECTED, err.code(), 0.0, 0.0));
    }

    pub fn texture_loaded(&mut self, name: &str) {
        if let Err(err) = self.ctx.textures.mark_loaded(name) {
            log::warn!("{err}");
        }
    }

    pub fn texture_failed(&mut self, name: &str) {
        if let Err(err) = self.ctx.textures.mark_failed(name) {
            log::warn!("{err}");
        }
    }

    /// Run one frame at host time `now_ms`: resolve textures, then update the
    /// viewer, sync the scene and publish the frame buffer.
    pub fn frame(&mut self, now_ms: f64) {
        if !self.initialized {
            return;
        }

        // Clear per-frame transient data
        self.ctx.clear_frame_data();
        self.ctx.events.append(&mut self.pending_events);

        if !self.ready {
            let first = *self.first_frame_ms.get_or_insert(now_ms);
            self.ctx
                .textures
                .expire(now_ms - first, self.ctx.config.texture_timeout_ms);
        }
        let fallbacks: Vec<_> = self.ctx.textures.drain_fallbacks().collect();
        for slot in fallbacks {
            self.ctx.emit_event(ViewerEvent::new(
                EVENT_TEXTURE_FALLBACK,
                slot.index() as f32,
                0.0,
                0.0,
            ));
        }

        if !self.ready {
            if !self.ctx.textures.is_ready() {
                self.write_frame();
                return;
            }
            self.ready = true;
            self.timer.reset();
            self.ctx
                .emit_event(ViewerEvent::new(EVENT_RESOURCES_READY, 0.0, 0.0, 0.0));
            log::info!("all textures resolved; starting frame loop");
        }

        let dt = self.timer.tick(now_ms);
        self.viewer.update(&mut self.ctx, &self.input, dt);

        // Drain input after update
        self.input.drain();

        sync_scene(self.ctx.scene.iter(), &self.ctx.earth_uniforms, &mut self.poses);
        self.poses.render(&self.ctx.camera, &self.ctx.sun);

        self.write_frame();
    }

    fn write_frame(&mut self) {
        let layout = &self.layout;
        let frame = &mut self.frame;

        let instances = self.poses.instances();
        let pose_count = instances.len().min(layout.max_poses);
        let pose_floats: &[f32] = bytemuck::cast_slice(&instances[..pose_count]);
        let start = layout.pose_data_offset;
        frame[start..start + pose_floats.len()].copy_from_slice(pose_floats);

        let uniforms = self
            .poses
            .earth_uniforms()
            .copied()
            .unwrap_or(self.ctx.earth_uniforms);
        let start = layout.uniform_offset;
        frame[start..start + UNIFORM_FLOATS]
            .copy_from_slice(bytemuck::cast_slice(std::slice::from_ref(&uniforms)));

        let start = layout.camera_offset;
        frame[start..start + CAMERA_FLOATS]
            .copy_from_slice(bytemuck::cast_slice(std::slice::from_ref(self.poses.camera())));

        let start = layout.sun_offset;
        frame[start..start + SUN_FLOATS]
            .copy_from_slice(bytemuck::cast_slice(std::slice::from_ref(self.poses.sun())));

        let events = &self.ctx.events;
        if events.len() > layout.max_events {
            log::warn!("{} events this frame, keeping {}", events.len(), layout.max_events);
        }
        let event_count = events.len().min(layout.max_events);
        let event_floats: &[f32] = bytemuck::cast_slice(&events[..event_count]);
        let start = layout.event_data_offset;
        frame[start..start + event_floats.len()].copy_from_slice(event_floats);

        let status = &self.ctx.status;
        let header = &mut frame[..HEADER_FLOATS];
        header[HEADER_READY] = if self.ready { 1.0 } else { 0.0 };
        header[HEADER_FRAME_COUNTER] = self.poses.frame_counter() as f32;
        header[HEADER_MAX_POSES] = layout.max_poses as f32;
        header[HEADER_POSE_COUNT] = pose_count as f32;
        header[HEADER_MAX_EVENTS] = layout.max_events as f32;
        header[HEADER_EVENT_COUNT] = event_count as f32;
        header[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        header[HEADER_SIM_DAY] = status.sim_time_ms.div_euclid(MS_PER_DAY) as f32;
        header[HEADER_SIM_SECONDS_OF_DAY] =
            (status.sim_time_ms.rem_euclid(MS_PER_DAY) as f64 / 1000.0) as f32;
        header[HEADER_TIME_MULTIPLIER] = status.time_multiplier as f32;
        header[HEADER_PAUSED] = if status.paused { 1.0 } else { 0.0 };
        header[HEADER_FLIGHT_ACTIVE] = if status.flight_active { 1.0 } else { 0.0 };
        header[HEADER_PENDING_TEXTURES] = self.ctx.textures.pending_count() as f32;
        header[HEADER_EARTH_ID] = self.poses.earth_id().map_or(-1.0, |id| id.0 as f32);
    }

    // ---- Accessors for host reads ----

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn frame_data(&self) -> &[f32] {
        &self.frame
    }

    pub fn frame_ptr(&self) -> *const f32 {
        self.frame.as_ptr()
    }

    pub fn frame_len(&self) -> u32 {
        self.frame.len() as u32
    }

    pub fn layout(&self) -> &ProtocolLayout {
        &self.layout
    }

    pub fn poses(&self) -> &PoseBuffer {
        &self.poses
    }

    pub fn pose_ptr(&self) -> *const f32 {
        self.poses.instances_ptr()
    }

    pub fn pose_count(&self) -> u32 {
        self.poses.instance_count()
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    pub fn viewer(&self) -> &V {
        &self.viewer
    }

    /// Simulated time as a JS number (exact up to 2^53 ms).
    pub fn sim_time_ms(&self) -> f64 {
        self.ctx.status.sim_time_ms as f64
    }

    pub fn light_direction(&self) -> [f32; 3] {
        self.ctx.earth_uniforms.light_direction
    }

    pub fn sun_position(&self) -> [f32; 3] {
        self.ctx.sun.position().to_array()
    }

    pub fn flight_active(&self) -> bool {
        self.ctx.status.flight_active
    }

    pub fn attribution(&self) -> String {
        self.ctx.config.textures.attribution.clone()
    }

    /// Earth vertex shader matching the configured light space.
    pub fn earth_vertex_shader(&self) -> &'static str {
        self.ctx.config.light_space.vertex_shader()
    }

    pub fn earth_fragment_shader(&self) -> &'static str {
        EARTH_FRAGMENT_SHADER
    }

    /// Scene description JSON; empty object on serialization failure.
    pub fn scene_json(&self) -> String {
        match self.ctx.describe_json() {
            Ok(json) => json,
            Err(err) => {
                log::warn!("scene description failed: {err}");
                "{}".to_string()
            }
        }
    }

    pub fn max_poses(&self) -> u32 {
        self.layout.max_poses as u32
    }

    pub fn max_events(&self) -> u32 {
        self.layout.max_events as u32
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }
}
