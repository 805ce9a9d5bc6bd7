mod join;

pub use join::JoinConfiguration;
