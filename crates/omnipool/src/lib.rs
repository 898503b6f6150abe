//! View-level computations of the omnipool front-end: pool capacity, bond
//! pricing, farm membership and fee currencies, together with the cached
//! query layer feeding them with chain data.

pub mod domain;
pub mod infra;
#[cfg(test)]
mod tests;
pub mod views;

pub use views::Views;
