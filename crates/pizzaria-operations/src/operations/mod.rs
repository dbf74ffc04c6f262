mod login;
pub mod option_groups;
mod products;

pub use login::{LoginInput, LoginOperation};
pub use products::{CreateProductOperation, ListProductsOperation};
