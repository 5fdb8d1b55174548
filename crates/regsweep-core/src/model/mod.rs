//! Registry data model: roots, typed values and the immutable records a
//! query session accumulates.

pub mod items;
pub mod root_key;
pub mod value;

pub use items::{ErrorItem, FilterItem, QueryItem, ResultItem};
pub use root_key::{root_keys, RootKeyType};
pub use value::{RegistryValue, ValueKind};
