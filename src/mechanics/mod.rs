pub mod category;
pub mod energy;
pub mod linear;
pub mod quadratic;
pub mod reward;
pub mod stoch;
pub mod titles;

pub use category::*;
pub use energy::*;
pub use reward::*;
pub use stoch::*;
pub use titles::*;
