pub mod home;
pub mod panels;
pub mod table;
