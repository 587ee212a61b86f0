pub mod busy;
pub mod capture;
pub mod constants;
pub mod digits;
pub mod error;
pub mod format;
pub mod framer;
pub mod mode;
pub mod packet;
pub mod reading;
pub mod segment;
pub mod status;
pub mod units;

// Re-export the decoder entry points for easy access
pub use digits::get_digits;
pub use mode::get_mode;
pub use packet::Packet;
pub use reading::DecodedReading;
pub use status::merge_units;
pub use units::{Charset, get_units};
