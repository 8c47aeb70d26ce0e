// HTTP routes
pub mod compare;
pub mod comparison;
pub mod health;
pub mod recent;
pub mod trending;

pub use compare::*;
pub use comparison::*;
pub use health::*;
pub use recent::*;
pub use trending::*;
