pub mod imports;
pub mod languages;
