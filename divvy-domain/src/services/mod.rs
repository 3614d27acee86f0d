pub mod settlement_engine;

pub use settlement_engine::suggest_payments;
