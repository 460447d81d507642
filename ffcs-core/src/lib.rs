pub mod cursor;
pub mod error;
pub mod identifier;
pub mod model;
pub mod normalize;
pub mod outcome;
pub mod timestamp;
pub mod value;

pub use cursor::{Cursor, SortDirection};
pub use identifier::ObjectId;
pub use value::{Document, Value};
