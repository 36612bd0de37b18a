// Third-person orbit camera
//
// - `options`: rig configuration and defaults
// - `orbit`: spherical state, limits, collision-aware pose
// - `pointer`: drag, touch, wheel and pointer-lock handling

mod options;
mod orbit;
mod pointer;

pub use options::CameraOptions;
pub use orbit::{CameraOperation, CameraPose, OrbitCamera, COLLISION_MARGIN, ZOOM_BASE};
pub use pointer::{CAMERA_KEY, POINTER_LOCK_RECHECK};

/// Window side effect the camera needs the host to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformRequest {
    RequestPointerLock,
    ExitPointerLock,
    HideCursor,
    RestoreCursor,
    /// Route all events of this pointer to the surface
    CapturePointer(u64),
    ReleasePointer(u64),
    /// Keep the platform's context menu from opening
    SuppressContextMenu,
}
