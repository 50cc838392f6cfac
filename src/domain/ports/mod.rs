pub mod clock;
pub mod price_source;
pub mod price_store;
pub mod reference_data;
