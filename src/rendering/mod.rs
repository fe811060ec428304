pub mod camera;
pub mod sprites;
pub mod surface;
