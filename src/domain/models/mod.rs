mod catalog_schema;
mod chat;
mod filter_spec;
mod product;
mod search;
mod user;

pub use catalog_schema::*;
pub use chat::*;
pub use filter_spec::*;
pub use product::*;
pub use search::*;
pub use user::*;
