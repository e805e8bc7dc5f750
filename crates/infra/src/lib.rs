//! Infrastructure layer: storage backends, queue transport, seed data.

pub mod seed;
pub mod store;

#[cfg(feature = "redis")]
pub mod queue;


pub use store::{InMemoryStore, PostgresStore};

#[cfg(feature = "redis")]
pub use queue::RedisQueueSender;
