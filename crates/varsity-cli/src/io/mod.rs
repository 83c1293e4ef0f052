pub mod keyfile;
pub mod schools;
