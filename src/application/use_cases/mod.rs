mod authenticate;
mod filter_prompt;
mod manage_products;
mod manage_users;
mod sanitize_response;
mod search_products;
mod validate_filter;

pub use authenticate::*;
pub use filter_prompt::*;
pub use manage_products::*;
pub use manage_users::*;
pub use sanitize_response::*;
pub use search_products::*;
pub use validate_filter::*;
