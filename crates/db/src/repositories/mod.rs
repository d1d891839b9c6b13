//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod sensor_reading_repo;

pub use sensor_reading_repo::SensorReadingRepo;
