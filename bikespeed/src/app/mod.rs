pub mod clean;
pub mod speed;
pub mod stops;
