pub mod fixtures;
pub mod memory;

#[allow(unused_imports)]
pub use fixtures::{booking, day, row};
#[allow(unused_imports)]
pub use memory::MemoryStore;
