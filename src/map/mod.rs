pub mod scene;
pub mod viewport;

pub use scene::{Framing, Overlay, Scene};
pub use viewport::Projection;
