// Presentation of computed tables: CSV rows and C array initializers

pub mod c_array;
pub mod csv;

pub use c_array::CArrayFormat;
pub use csv::{save_csv, write_csv};
