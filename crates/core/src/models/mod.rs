pub mod holding;
pub mod portfolio;
pub mod refresh;
pub mod settings;
pub mod valuation;
