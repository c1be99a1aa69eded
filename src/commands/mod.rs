pub mod generate;
pub mod grade;
pub mod quiz;
