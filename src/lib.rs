pub mod achievements;
pub mod analytics;
pub mod cache;
pub mod cli;
pub mod clock;
pub mod error;
pub mod git;
pub mod language;
pub mod logging;
pub mod model;
pub mod report;
pub mod scan;
pub mod util;
