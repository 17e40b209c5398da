pub mod files;
pub mod snapshot;

pub use files::{
    atomic_write, ensure_store_dir, get_store_dir, load_snapshot, load_stats, save_snapshot,
    save_stats, snapshot_file, stats_file,
};
pub use snapshot::Snapshot;
