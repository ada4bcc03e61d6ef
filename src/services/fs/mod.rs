pub mod file_list;
pub mod listing;
pub mod natural;
