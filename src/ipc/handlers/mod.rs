pub mod classes;
pub mod core;
pub mod entries;
pub mod reports;
pub mod setup;
pub mod subjects;
pub mod teachers;
pub mod timeslots;
pub mod timetable;
