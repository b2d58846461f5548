pub mod check;
pub mod optimize;
