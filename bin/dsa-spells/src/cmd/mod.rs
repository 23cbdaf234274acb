pub mod encode;
pub mod position;
pub mod status;
pub mod transfers;
