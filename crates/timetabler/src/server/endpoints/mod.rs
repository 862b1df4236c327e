pub mod generate;
pub mod reference;
pub mod status;
