pub mod annotator;
pub mod fetcher;
pub mod ledger;
pub mod pipeline;
pub mod store;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;
