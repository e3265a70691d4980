//! Entry points behind the command line

mod browse;

pub use browse::cmd_browse;
