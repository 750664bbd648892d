mod altitude;
mod coordinate;
mod course;
pub mod geodesy;

pub use altitude::Altitude;
pub use coordinate::Coordinate;
pub use course::Course;
