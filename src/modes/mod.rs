pub mod autopilot;
pub mod demo;
pub mod human;
pub mod terminal;

pub use autopilot::Autopilot;
pub use demo::DemoMode;
pub use human::HumanMode;
