mod dispatch;
mod error_details;
mod factory;

pub use self::dispatch::Logger;
pub use self::error_details::ErrorDetails;
pub use self::factory::LogFactory;
