pub mod email;
pub mod schedule;
pub mod slug;

pub use email::normalize_email;
pub use schedule::{normalize_date, normalize_time};
pub use slug::slugify;
