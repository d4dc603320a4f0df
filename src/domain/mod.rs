pub mod listing;
pub mod booking;
pub mod review;
pub mod payment;

pub use listing::*;
pub use booking::*;
pub use review::*;
pub use payment::*;
