pub mod coordinate_mapper;
pub mod infrastructure;
