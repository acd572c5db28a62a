//! Port traits decoupling the decision engine from its collaborators.

pub mod config_port;
pub mod price_port;
pub mod model_port;
pub mod notify_port;
