mod csv;
mod error;

pub use csv::CsvOutput;
pub use error::OutputError;
