//! Foundational types: currencies and money values.

pub mod currency;
pub mod iso;
pub mod money;
