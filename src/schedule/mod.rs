pub mod dates;
pub mod reconcile;

pub use dates::generate_recurring_dates;
pub use reconcile::{add_specific_date, reconcile, remove_specific_date};
