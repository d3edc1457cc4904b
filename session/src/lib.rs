//! Relink Session
//!
//! Runtime surface of the relationship engine.
//!
//! Responsibilities:
//! - Track construction per thread (guard)
//! - Route field writes through the mutators (interceptor)
//! - Accessor methods and bound mutator handles (session)
//! - Process-wide registry initialization (global)

mod error;
mod global;
mod guard;
mod interceptor;
mod session;

pub use error::{InitError, InitResult};
pub use global::{init, init_from_manifest, is_initialized, registry};
pub use guard::{
    construction_depth, enter_construction, exit_construction, is_inside_construction,
    ConstructionScope,
};
pub use interceptor::Interceptor;
pub use session::{CollectionHandle, RefHandle, Session};
