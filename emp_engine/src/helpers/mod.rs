mod bid_key;

pub use bid_key::bid_dedupe_key;
