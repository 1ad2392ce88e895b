pub mod clipboard;
pub mod codegen;
pub mod coerce;
pub mod export;
pub mod lint;
