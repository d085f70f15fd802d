pub mod bus;
pub mod report;
pub mod scan;
pub mod schedule;
