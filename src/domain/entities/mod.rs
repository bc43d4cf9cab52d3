pub mod record;
pub mod search_spec;
