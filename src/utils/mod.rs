pub mod imaging;
pub mod validation;
