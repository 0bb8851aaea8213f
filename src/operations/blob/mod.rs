mod add_particle;
mod connect;
mod remove;
mod seed_layout;
mod smooth_near;
mod stamp;

pub use add_particle::AddParticle;
pub use remove::{RemoveNear, RemoveParticle};
pub use seed_layout::{SeedLayout, SeedParams};
pub use smooth_near::SmoothNear;
pub use stamp::{Pattern, PatternShape, Stamp, StampParams, StampShape};
