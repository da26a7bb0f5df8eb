//! Core data models for the objects API.
//!
//! Records serialize as camelCase JSON with `type` carrying the object type
//! URL; incoming writes arrive as an [`object::ObjectPatch`].

pub mod object;
pub mod object_type;
