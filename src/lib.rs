//! Till
//!
//! A grocery store till: a catalog of items, a live basket, and three kinds of
//! discount (bundle, progressive and bulk). At checkout every application order of the
//! active discounts is tried and the cheapest priced basket wins.

pub mod basket;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod discounts;
pub mod engine;
pub mod fixtures;
pub mod items;
pub mod logging;
pub mod prelude;
pub mod pricing;
pub mod receipt;
pub mod system;
pub mod validation;
