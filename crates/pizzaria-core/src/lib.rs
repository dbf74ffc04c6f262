mod error;
mod types;
mod validate;

pub use error::{ValidationError, ValidationErrors};
pub use types::{
    GroupDraft, GroupWithItems, ItemDraft, OptionGroup, OptionItem, Product, ProductDraft,
    SelectionMode,
};
pub use validate::{validate_group_payload, validate_product_payload};
