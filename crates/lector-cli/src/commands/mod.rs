//! Command implementations.

pub mod analyze;
pub mod cite;
pub mod segment;

pub use self::analyze::execute_analyze;
pub use self::cite::execute_cite;
pub use self::segment::execute_segment;
