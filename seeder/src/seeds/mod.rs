pub mod attendance;
pub mod registry;
