//! Mutator operation implementations.
//!
//! Each relationship shape is implemented in its own module:
//! - `reference` - to-one fields (plain, ManyToOne, OneToOne)
//! - `collection` - Set-valued fields (plain, OneToMany)
//! - `initialize` - post-construction fix-up per field

mod collection;
mod initialize;
mod reference;

pub use collection::{add_member, remove_member, set_collection};
pub use initialize::{initialize_collection, initialize_ref};
pub use reference::{link_partner, previous_partner, set_ref};
