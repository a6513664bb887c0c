// brandsync Models
// Data structures shared by the services

mod theme;
mod preset;
mod organization;
mod settings;

pub use theme::*;
pub use preset::*;
pub use organization::*;
pub use settings::*;
