pub mod filters;
pub mod object_service;
pub mod objecttypes;
