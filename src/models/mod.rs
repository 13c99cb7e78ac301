//! Square-root (Ratkowsky-type) secondary growth models.
//!
//! Models are implemented as small, pure functions so that the growth engine
//! can stay generic over whichever published parameterization it is given.

pub mod model;
pub mod normalize;

pub use model::*;
pub use normalize::*;
