pub mod price_record;
pub mod reference;
