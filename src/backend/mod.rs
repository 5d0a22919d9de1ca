mod dry_run;
mod host_fs;

pub use dry_run::{DryRun, Op};
pub use host_fs::HostFS;
