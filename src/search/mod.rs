pub mod knowledge;
pub mod titles;
pub mod vector;
