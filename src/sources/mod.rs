pub mod base;
pub mod finnhub;
pub mod lenient;
pub mod yahoo;
