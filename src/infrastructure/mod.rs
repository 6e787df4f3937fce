pub mod alignment;
pub mod audio;
pub mod model_lock;
pub mod observability;
pub mod storage;

pub use model_lock::ModelLock;
