pub mod attendance;
pub mod bus;
pub mod class_schedule;
pub mod report;
pub mod student;
