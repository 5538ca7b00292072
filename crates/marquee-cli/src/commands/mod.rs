pub mod check_layout;
pub mod list;
pub mod run;
