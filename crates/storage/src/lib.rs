#![forbid(unsafe_code)]

mod store;

pub use store::{
    BATCH_CHUNK_ROWS, DeleteOutcome, LogStore, PAGE_SIZE, StoreError, StoreLocation,
};
