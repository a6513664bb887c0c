// brandsync Commands
// Entry points the CLI dispatches to

mod brand;

pub use brand::*;
