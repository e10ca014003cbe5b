pub mod descriptor;
pub mod io;

pub use descriptor::{DEFAULT_FD_LINK_DIR, FdResolver, ResolveError};
pub use io::atomic_write_str;
