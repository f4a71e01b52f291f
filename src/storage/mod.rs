mod atomic;
mod csv_store;

pub(crate) use atomic::write_atomically;
pub(crate) use csv_store::CsvStore;
