pub mod client_store_memory;

pub use client_store_memory::InMemoryClientStore;
