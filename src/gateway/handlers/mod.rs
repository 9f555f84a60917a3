pub mod health;
pub mod wallet;

pub use health::health_check;
pub use wallet::{create_transfer, get_balance, get_transactions};
