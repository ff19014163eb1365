pub mod clock;
pub mod incident;
pub mod store;
pub mod uploads;

pub use clock::*;
pub use incident::*;
pub use store::*;
pub use uploads::*;
