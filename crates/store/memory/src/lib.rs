pub mod store;

pub use store::MemoryBoxStore;
