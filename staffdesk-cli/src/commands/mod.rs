pub mod calendar;
pub mod staff;
pub mod tasks;
