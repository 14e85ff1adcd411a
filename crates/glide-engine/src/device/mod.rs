//! GPU device + surface management.
//!
//! - creates the wgpu Instance/Adapter/Device/Queue for one window
//! - configures the surface and reconfigures it on resize
//! - acquires frames for the scene backend in `render`

mod context;
mod error;
mod frame;
mod init;
mod surface;

pub use context::Gpu;
pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use init::GpuInit;
