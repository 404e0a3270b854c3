//! Whitelisted functions and constants
//!
//! Formulas may call these names without declaring them as inputs. Anything
//! else must resolve through the evaluation scope.

pub mod math;

use std::collections::HashMap;
use std::sync::OnceLock;

/// Function implementation signature
///
/// Arity is checked by the evaluator before the call, so implementations may
/// index their arguments directly. Non-finite results are handled by rounding.
pub type FunctionImpl = fn(&[f64]) -> f64;

/// Function definition
pub struct FunctionDef {
    /// Function name as written in formulas
    pub name: &'static str,
    /// Minimum arguments
    pub min_args: usize,
    /// Maximum arguments
    pub max_args: usize,
    /// Implementation
    pub implementation: FunctionImpl,
}

impl FunctionDef {
    /// Human readable arity, e.g. `1` or `1-2`
    pub fn arity(&self) -> String {
        if self.min_args == self.max_args {
            self.min_args.to_string()
        } else {
            format!("{}-{}", self.min_args, self.max_args)
        }
    }
}

/// Named constants usable in formulas
pub const CONSTANTS: &[(&str, f64)] = &[("pi", std::f64::consts::PI), ("e", std::f64::consts::E)];

/// Global function registry (lazily initialized)
static FUNCTION_REGISTRY: OnceLock<FunctionRegistry> = OnceLock::new();

/// Function registry
pub struct FunctionRegistry {
    functions: HashMap<&'static str, FunctionDef>,
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionRegistry {
    /// Create a new registry with all whitelisted functions
    pub fn new() -> Self {
        let mut registry = Self {
            functions: HashMap::new(),
        };

        registry.register(FunctionDef {
            name: "sqrt",
            min_args: 1,
            max_args: 1,
            implementation: math::fn_sqrt,
        });
        // log(x) is the natural log, log(x, base) any base
        registry.register(FunctionDef {
            name: "log",
            min_args: 1,
            max_args: 2,
            implementation: math::fn_log,
        });
        registry.register(FunctionDef {
            name: "sin",
            min_args: 1,
            max_args: 1,
            implementation: math::fn_sin,
        });
        registry.register(FunctionDef {
            name: "cos",
            min_args: 1,
            max_args: 1,
            implementation: math::fn_cos,
        });
        registry.register(FunctionDef {
            name: "tan",
            min_args: 1,
            max_args: 1,
            implementation: math::fn_tan,
        });
        registry.register(FunctionDef {
            name: "pow",
            min_args: 2,
            max_args: 2,
            implementation: math::fn_pow,
        });
        registry.register(FunctionDef {
            name: "abs",
            min_args: 1,
            max_args: 1,
            implementation: math::fn_abs,
        });
        registry.register(FunctionDef {
            name: "floor",
            min_args: 1,
            max_args: 1,
            implementation: math::fn_floor,
        });
        registry.register(FunctionDef {
            name: "ceil",
            min_args: 1,
            max_args: 1,
            implementation: math::fn_ceil,
        });

        registry
    }

    /// Shared registry instance
    pub fn global() -> &'static FunctionRegistry {
        FUNCTION_REGISTRY.get_or_init(FunctionRegistry::new)
    }

    /// Look up a function by name
    pub fn get(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(name)
    }

    /// Register a function
    pub fn register(&mut self, def: FunctionDef) {
        self.functions.insert(def.name, def);
    }

    /// Look up a named constant
    pub fn constant(&self, name: &str) -> Option<f64> {
        CONSTANTS
            .iter()
            .find(|(constant, _)| *constant == name)
            .map(|(_, value)| *value)
    }

    /// Whether `name` may appear in a formula without being declared
    pub fn is_whitelisted(&self, name: &str) -> bool {
        self.functions.contains_key(name) || self.constant(name).is_some()
    }
}
