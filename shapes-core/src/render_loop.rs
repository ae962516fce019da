/// Frame loop shared by every front end
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::app::AppContext;
use crate::projection::Camera;
use crate::scene::Scene;

/// Something that can draw the scene once
pub trait Renderer {
    type Error;

    fn draw(&mut self, scene: &Scene, camera: &Camera) -> Result<(), Self::Error>;
}

/// Cloneable flag that ends a [`RenderLoop`]
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Drives update-then-draw ticks until its stop signal is raised.
///
/// The host decides when a tick happens (an animation frame callback, a
/// timed terminal loop); every tick performs exactly one controls update and
/// one draw.
#[derive(Debug, Default)]
pub struct RenderLoop {
    stop: StopSignal,
    frames: u64,
}

impl RenderLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.stop.is_stopped()
    }

    /// Frames drawn so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn tick<R: Renderer>(
        &mut self,
        ctx: &mut AppContext,
        renderer: &mut R,
        now_ms: f64,
    ) -> Result<(), R::Error> {
        ctx.controls.update(&mut ctx.camera);
        renderer.draw(&ctx.scene, &ctx.camera)?;
        ctx.stats.record(now_ms);
        self.frames += 1;
        Ok(())
    }
}
