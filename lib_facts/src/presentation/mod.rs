pub mod fact_list;

pub use fact_list::{FactItem, FactListModel, ERROR_TITLE, SCREEN_TITLE};
