pub mod geometry;
pub mod hole;
pub mod logging;
pub mod overlay;
pub mod platform;
pub mod process;
pub mod settings;
pub mod underlay;

pub use geometry::{Point, Rect};
pub use hole::{DragState, Hole};
pub use platform::{Surface, WindowId, WindowSystem};
pub use underlay::{TrackerError, UnderlayTracker};
