//! Prelude module - common imports for formulaforge users
//!
//! ```rust
//! use formulaforge::prelude::*;
//! ```

pub use crate::{
    // Session types
    CalculationSession,
    // Main types
    Calculator,
    CalculatorDraft,
    // I/O types
    CalculatorReader,
    CalculatorStore,
    CalculatorUpdate,
    CalculatorWriter,
    // Error types
    Error,
    EvaluationScope,
    ExportFormat,
    FormulaError,
    InputField,
    InputUpdate,
    OutputField,
    OutputUpdate,
    PassOutcome,
    ReadOptions,
    Result,
    SessionOptions,
    StoreConfig,
    ValueType,
    WriteOptions,
};
