//! External data collaborators for the stock insights dashboard.
//!
//! - [`providers`]: daily OHLC bars behind the [`providers::DataProvider`] trait.
//! - [`news`]: headline search behind the [`news::NewsProvider`] trait.
//!
//! Both traits return vendor-agnostic [`models`] and share one error type,
//! [`providers::ProviderError`].

pub mod models;
pub mod news;
pub mod providers;
