//! Giving module containing batch management, contribution entry and reports

pub mod batch;
pub mod contribution;
pub mod report;

pub use batch::*;
pub use contribution::*;
pub use report::*;
