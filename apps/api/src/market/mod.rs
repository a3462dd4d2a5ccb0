pub mod aggregate;
pub mod cache;
pub mod fallback;
pub mod source;
pub mod store;

pub use cache::SnapshotCache;
pub use source::{HttpJobDataSource, JobDataSource, NoJobDataSource};
pub use store::{MemorySnapshotStore, RedisSnapshotStore, SnapshotStore};
