pub mod csv_file;

pub use csv_file::save_or_log;
