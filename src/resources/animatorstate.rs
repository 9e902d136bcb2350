//! Animator session state.
//!
//! [`AnimatorState`] holds the active flag, the handle of the pending frame
//! request, the spawn-order counter and running [`EffectStats`]. The frame
//! request is held exactly while the animator is active or something is
//! still on screen; [`AnimatorState::sync_frame_request`] enforces that after
//! every tick.

use bevy_ecs::prelude::Resource;

/// Identifier of a scheduled frame callback, unique within one animator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Running counters, mostly for logs and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EffectStats {
    /// Particles created since the animator was built.
    pub particles_spawned: u64,
    /// Particles dropped by the keep-alive filter.
    pub particles_evicted: u64,
    /// Spawn events emitted by rain spawners.
    pub rain_events: u64,
    /// Reactions created.
    pub reactions_spawned: u64,
    /// Sequence steps that fired.
    pub steps_fired: u64,
    /// Effects skipped because no drawing surface was available.
    pub effects_skipped: u64,
    /// Frames rendered.
    pub frames: u64,
}

#[derive(Resource, Debug, Default)]
pub struct AnimatorState {
    /// True while an effect producer (rain, pending steps) is running or an
    /// effect was just started.
    pub active: bool,
    /// Pending frame request; `None` once the render loop has terminated.
    pub frame: Option<FrameHandle>,
    next_frame: u64,
    next_order: u64,
    pub stats: EffectStats,
}

impl AnimatorState {
    /// Next value for [`SpawnOrder`](crate::components::particle::SpawnOrder).
    pub fn next_order(&mut self) -> u64 {
        let order = self.next_order;
        self.next_order += 1;
        order
    }

    /// Make sure a frame is requested; returns the pending handle.
    pub fn request_frame(&mut self) -> FrameHandle {
        if let Some(handle) = self.frame {
            return handle;
        }
        self.next_frame += 1;
        let handle = FrameHandle(self.next_frame);
        self.frame = Some(handle);
        handle
    }

    /// Release the frame request.
    pub fn cancel_frame(&mut self) -> Option<FrameHandle> {
        self.frame.take()
    }

    /// Reschedule or terminate the render loop after a frame.
    ///
    /// Returns true when another frame is requested.
    pub fn sync_frame_request(&mut self, live_items: usize) -> bool {
        if self.active || live_items > 0 {
            self.frame = None;
            self.request_frame();
            true
        } else {
            self.cancel_frame();
            false
        }
    }
}
