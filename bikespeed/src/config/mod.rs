mod clean;

pub use clean::CleanConfiguration;
