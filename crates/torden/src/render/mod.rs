//! GPU context and per-frame pass orchestration.

pub mod gpu;
pub mod pass;

pub use gpu::GpuContext;
pub use pass::{begin_frame, ClearColor, FrameContext};
