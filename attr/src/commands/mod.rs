pub mod create;
pub mod json;
pub mod list;
pub mod validate;

pub use create::run as create;
pub use json::run as json;
pub use list::run as list;
pub use validate::run as validate;
