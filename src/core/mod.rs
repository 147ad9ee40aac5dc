pub mod api;
pub mod collection;
pub mod deletion;
pub mod detail;
pub mod expansion;
pub mod export;
pub mod jobs;
pub mod lifecycle;
pub mod listing;
pub mod logging;
pub mod records;
pub mod rows;
