mod object_id;
mod secret;
mod zar;

pub mod helpers;
pub mod op;

pub use object_id::{ObjectId, ObjectIdError, MAX_OBJECT_ID_LEN};
pub use secret::Secret;
pub use zar::{Zar, ZarConversionError, ZAR_CURRENCY_CODE};
