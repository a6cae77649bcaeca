pub mod currency_service;
pub mod portfolio_service;
pub mod quote_service;
#[cfg(not(target_arch = "wasm32"))]
pub mod refresh_service;
pub mod valuation_service;
