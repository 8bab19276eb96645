//! Per-activation orchestration: profile, surface, context, scene, listeners
//! and the frame loop, torn down in the reverse order.

use crate::backend::{FrameView, Host, ListenerKind};
use crate::camera::CameraState;
use crate::error::EngineError;
use crate::input::{InputTracker, Viewport};
use crate::profile::{profile_device, DeviceHints, DeviceProfile};
use crate::registry::{ResourceKind, ResourceRegistry};
use crate::scene::{Scene, SceneAssetBuilder};
use crate::scheduler::{FrameScheduler, SchedulerState};
use instant::Instant;
use rand::Rng;

/// Outcome of [`Engine::activate`]. None of these is an error for the page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Activation {
    Running,
    /// The mount container was missing; nothing was allocated.
    NoContainer,
    /// The surface is attached but nothing will be drawn.
    Blank,
}

/// All state owned by one activation.
#[derive(Debug)]
pub struct EngineContext {
    pub profile: DeviceProfile,
    pub registry: ResourceRegistry,
    pub scheduler: FrameScheduler,
    pub camera: CameraState,
    pub input: InputTracker,
    pub scene: Option<Scene>,
    mounted: bool,
}

impl EngineContext {
    fn new(profile: DeviceProfile) -> Self {
        Self {
            profile,
            registry: ResourceRegistry::new(),
            scheduler: FrameScheduler::new(),
            camera: CameraState::default(),
            input: InputTracker::new(Viewport::new(1, 1)),
            scene: None,
            mounted: false,
        }
    }
}

pub struct Engine<H: Host> {
    ctx: EngineContext,
    host: H,
}

impl<H: Host> Engine<H> {
    pub fn new(host: H, hints: &DeviceHints) -> Self {
        let profile = profile_device(hints);
        log::info!(
            "[engine] tier={} pixel_ratio_cap={:.2} detail={} shadows={}",
            profile.tier.as_str(),
            profile.pixel_ratio_cap,
            profile.geometry_detail,
            profile.shadows_enabled
        );
        Self {
            ctx: EngineContext::new(profile),
            host,
        }
    }

    /// Mount and start in one go. Failures are logged and reported through
    /// the returned [`Activation`]; they never propagate.
    pub fn activate<R: Rng + ?Sized>(&mut self, rng: &mut R, now: Instant) -> Activation {
        match self.mount() {
            Ok(()) => {}
            Err(EngineError::MissingContainer) => {
                log::warn!("[engine] mount container missing; backdrop disabled");
                return Activation::NoContainer;
            }
            Err(e) => {
                log::warn!("[engine] mount failed: {}", e);
                return Activation::Blank;
            }
        }
        if let Err(e) = self.start(rng, now) {
            log::warn!("[engine] {}; background left blank", e);
        }
        if self.is_running() {
            Activation::Running
        } else {
            Activation::Blank
        }
    }

    /// Attach the drawing surface. The surface is registered so release
    /// detaches it. Does nothing once the engine has been stopped.
    pub fn mount(&mut self) -> Result<(), EngineError> {
        if self.ctx.mounted || self.ctx.scheduler.state() == SchedulerState::Stopped {
            return Ok(());
        }
        let host = &mut self.host;
        let mut viewport = Viewport::new(1, 1);
        self.ctx.registry.allocate(ResourceKind::Surface, |h| {
            viewport = host.attach_surface(h)?;
            Ok(())
        })?;
        self.ctx.input = InputTracker::new(viewport);
        self.ctx.mounted = true;
        Ok(())
    }

    /// Create the rendering context, build the scene, register the listeners
    /// and start the frame loop. Requires a prior successful [`Engine::mount`].
    /// Whatever was allocated before a failure stays registered for release.
    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R, now: Instant) -> Result<(), EngineError> {
        if !self.ctx.mounted {
            return Err(EngineError::MissingContainer);
        }
        if self.ctx.scheduler.state() != SchedulerState::Idle || self.ctx.scene.is_some() {
            return Ok(());
        }

        let profile = &self.ctx.profile;
        let host = &mut self.host;
        self.ctx
            .registry
            .allocate(ResourceKind::RenderContext, |h| host.create_context(h, profile))?;
        host.resize(self.ctx.input.viewport(), profile.pixel_ratio_cap);

        let scene = SceneAssetBuilder::new(profile, &mut self.ctx.registry, &mut *host).build(rng)?;
        self.ctx.scene = Some(scene);

        for kind in ListenerKind::ALL {
            self.ctx
                .registry
                .allocate(ResourceKind::Listener, |h| host.add_listener(h, kind))?;
        }

        self.ctx.scheduler.start(&mut *host, now)?;
        log::info!(
            "[engine] started with {} resources",
            self.ctx.registry.len()
        );
        Ok(())
    }

    /// Entry point of the display-refresh callback. Returns `false` if the
    /// callback arrived after stop and was ignored.
    pub fn frame(&mut self, now: Instant) -> bool {
        if self.ctx.scheduler.begin_frame(now).is_none() {
            return false;
        }
        self.tick(now);
        if let Err(e) = self.ctx.scheduler.resubmit(&mut self.host) {
            log::error!("[frame] {}", e);
        }
        true
    }

    fn tick(&mut self, now: Instant) {
        self.host.pump_input(&mut self.ctx.input);
        if let Some(viewport) = self.ctx.input.poll_resize(now) {
            self.host.resize(viewport, self.ctx.profile.pixel_ratio_cap);
        }
        self.ctx.camera.update(self.ctx.input.target());

        let time = self.ctx.scheduler.time();
        let Some(scene) = self.ctx.scene.as_mut() else {
            return;
        };
        scene.advance(time);
        let view = FrameView {
            scene,
            camera: self.ctx.camera.camera(self.ctx.input.aspect()),
            time,
            profile: &self.ctx.profile,
        };
        if let Err(e) = self.host.render(&view) {
            log::error!("[frame] {}", e);
        }
    }

    /// Stop the loop, then release every registered resource. Idempotent.
    /// Returns the number of resources released by this call.
    pub fn deactivate(&mut self) -> usize {
        let stopped = self.ctx.scheduler.stop(&mut self.host);
        let released = self.ctx.registry.release(&mut self.host);
        self.ctx.scene = None;
        self.ctx.mounted = false;
        if stopped {
            log::info!("[engine] deactivated; released {} resources", released);
        }
        released
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.ctx.input.pointer_moved(x, y);
    }

    pub fn resized(&mut self, width: u32, height: u32) {
        self.ctx.input.resized(width, height);
    }

    pub fn is_running(&self) -> bool {
        self.ctx.scheduler.is_running()
    }

    pub fn is_mounted(&self) -> bool {
        self.ctx.mounted
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    pub fn profile(&self) -> &DeviceProfile {
        &self.ctx.profile
    }

    pub fn registry(&self) -> &ResourceRegistry {
        &self.ctx.registry
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.ctx.scheduler
    }

    pub fn camera(&self) -> &CameraState {
        &self.ctx.camera
    }

    pub fn input(&self) -> &InputTracker {
        &self.ctx.input
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.ctx.scene.as_ref()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}
