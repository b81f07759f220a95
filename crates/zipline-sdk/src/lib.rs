mod amounts;
mod compressed_token;
mod light_system;
mod programs;
mod transaction_builders;

pub use amounts::*;
pub use compressed_token::*;
pub use light_system::*;
pub use programs::*;
pub use transaction_builders::*;
