//! Language conventions the resolver relies on, and the pluggable naming
//! classifier used to split dotted dependency ids into module and symbol.

use std::collections::HashSet;

use docorder_core::config::ResolutionConfig;
use docorder_core::module_path::leading_segment;

/// Names exposed by Python's `builtins` module. References to them never
/// become dependencies.
pub const PYTHON_BUILTINS: &[&str] = &[
    "ArithmeticError", "AssertionError", "AttributeError", "BaseException",
    "BaseExceptionGroup", "BlockingIOError", "BrokenPipeError", "BufferError",
    "BytesWarning", "ChildProcessError", "ConnectionAbortedError", "ConnectionError",
    "ConnectionRefusedError", "ConnectionResetError", "DeprecationWarning", "EOFError",
    "Ellipsis", "EncodingWarning", "EnvironmentError", "Exception", "ExceptionGroup",
    "False", "FileExistsError", "FileNotFoundError", "FloatingPointError", "FutureWarning",
    "GeneratorExit", "IOError", "ImportError", "ImportWarning", "IndentationError",
    "IndexError", "InterruptedError", "IsADirectoryError", "KeyError", "KeyboardInterrupt",
    "LookupError", "MemoryError", "ModuleNotFoundError", "NameError", "None",
    "NotADirectoryError", "NotImplemented", "NotImplementedError", "OSError",
    "OverflowError", "PendingDeprecationWarning", "PermissionError", "ProcessLookupError",
    "RecursionError", "ReferenceError", "ResourceWarning", "RuntimeError", "RuntimeWarning",
    "StopAsyncIteration", "StopIteration", "SyntaxError", "SyntaxWarning", "SystemError",
    "SystemExit", "TabError", "TimeoutError", "True", "TypeError", "UnboundLocalError",
    "UnicodeDecodeError", "UnicodeEncodeError", "UnicodeError", "UnicodeTranslateError",
    "UnicodeWarning", "UserWarning", "ValueError", "Warning", "ZeroDivisionError",
    "__build_class__", "__debug__", "__doc__", "__import__", "__loader__", "__name__",
    "__package__", "__spec__", "abs", "aiter", "all", "anext", "any", "ascii", "bin",
    "bool", "breakpoint", "bytearray", "bytes", "callable", "chr", "classmethod", "compile",
    "complex", "copyright", "credits", "delattr", "dict", "dir", "divmod", "enumerate",
    "eval", "exec", "exit", "filter", "float", "format", "frozenset", "getattr", "globals",
    "hasattr", "hash", "help", "hex", "id", "input", "int", "isinstance", "issubclass",
    "iter", "len", "license", "list", "locals", "map", "max", "memoryview", "min", "next",
    "object", "oct", "open", "ord", "pow", "print", "property", "quit", "range", "repr",
    "reversed", "round", "set", "setattr", "slice", "sorted", "staticmethod", "str", "sum",
    "super", "tuple", "type", "vars", "zip",
];

/// Standard-library modules whose imports never produce edges.
pub const STANDARD_MODULES: &[&str] = &[
    "abc", "argparse", "array", "asyncio", "base64", "collections", "copy", "csv",
    "datetime", "enum", "functools", "glob", "io", "itertools", "json", "logging", "math",
    "os", "pathlib", "random", "re", "shutil", "string", "sys", "time", "typing", "uuid",
    "warnings", "xml",
];

/// Exclusion sets and naming rules for one source language.
#[derive(Debug, Clone)]
pub struct Conventions {
    builtins: HashSet<String>,
    standard_modules: HashSet<String>,
    receivers: HashSet<String>,
    constructor: String,
}

impl Conventions {
    /// Python defaults: its builtins, common standard modules, `self`/`cls`
    /// receivers and `__init__` as the constructor.
    pub fn python() -> Self {
        Self::from_config(&ResolutionConfig::default())
    }

    pub fn from_config(config: &ResolutionConfig) -> Self {
        let builtins = PYTHON_BUILTINS
            .iter()
            .map(|s| s.to_string())
            .chain(config.extra_builtins.iter().cloned())
            .collect();
        let standard_modules = STANDARD_MODULES
            .iter()
            .map(|s| s.to_string())
            .chain(config.extra_standard_modules.iter().cloned())
            .collect();
        Self {
            builtins,
            standard_modules,
            receivers: config.receivers.iter().cloned().collect(),
            constructor: config.constructor.clone(),
        }
    }

    pub fn is_builtin(&self, name: &str) -> bool {
        self.builtins.contains(name)
    }

    /// Whether `module` (or the package it belongs to) is a standard module.
    pub fn is_standard_module(&self, module: &str) -> bool {
        self.standard_modules.contains(module)
            || self.standard_modules.contains(leading_segment(module))
    }

    /// Whether `name` is an implicit receiver such as `self` or `cls`.
    pub fn is_receiver(&self, name: &str) -> bool {
        self.receivers.contains(name)
    }

    /// Name of the constructor-equivalent method.
    pub fn constructor(&self) -> &str {
        &self.constructor
    }
}

impl Default for Conventions {
    fn default() -> Self {
        Self::python()
    }
}

/// What a dotted dependency id is taken to denote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolShape {
    Class,
    Function,
    Method,
}

/// A dotted id split into the module that defines it and the symbol inside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolPath {
    pub module: String,
    /// Defining class, for methods.
    pub class: Option<String>,
    pub name: String,
    pub shape: SymbolShape,
}

/// Decides which trailing segments of a dotted id form the symbol.
pub trait NameClassifier: Send + Sync {
    fn classify(&self, dotted: &str) -> Option<SymbolPath>;
}

/// Capitalized names are classes, everything else is a function or method:
/// `m.Class.method` is a method, `m.Class` a class, `m.func` a function.
#[derive(Debug, Default, Clone, Copy)]
pub struct CaseConvention;

fn starts_uppercase(segment: &str) -> bool {
    segment.chars().next().is_some_and(char::is_uppercase)
}

impl NameClassifier for CaseConvention {
    fn classify(&self, dotted: &str) -> Option<SymbolPath> {
        let parts: Vec<&str> = dotted.split('.').collect();
        if parts.len() < 2 || parts.iter().any(|p| p.is_empty()) {
            return None;
        }
        let n = parts.len();
        let last = parts[n - 1];
        if n >= 3 && !starts_uppercase(last) && starts_uppercase(parts[n - 2]) {
            return Some(SymbolPath {
                module: parts[..n - 2].join("."),
                class: Some(parts[n - 2].to_string()),
                name: last.to_string(),
                shape: SymbolShape::Method,
            });
        }
        let shape = if starts_uppercase(last) {
            SymbolShape::Class
        } else {
            SymbolShape::Function
        };
        Some(SymbolPath {
            module: parts[..n - 1].join("."),
            class: None,
            name: last.to_string(),
            shape,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn python_defaults() {
        let c = Conventions::python();
        assert!(c.is_builtin("print"));
        assert!(c.is_builtin("ValueError"));
        assert!(!c.is_builtin("Product"));
        assert!(c.is_receiver("self"));
        assert!(c.is_receiver("cls"));
        assert_eq!(c.constructor(), "__init__");
    }

    #[test]
    fn standard_module_matches_submodules() {
        let c = Conventions::python();
        assert!(c.is_standard_module("os"));
        assert!(c.is_standard_module("os.path"));
        assert!(!c.is_standard_module("models.product"));
    }

    #[test]
    fn config_extends_the_defaults() {
        let config = ResolutionConfig {
            extra_standard_modules: vec!["numpy".to_string()],
            extra_builtins: vec!["reveal_type".to_string()],
            ..ResolutionConfig::default()
        };
        let c = Conventions::from_config(&config);
        assert!(c.is_standard_module("numpy.linalg"));
        assert!(c.is_builtin("reveal_type"));
        assert!(c.is_builtin("len"));
    }

    #[test]
    fn case_convention_shapes() {
        let classify = |s: &str| CaseConvention.classify(s).unwrap();

        let method = classify("payment.processor.PaymentProcessor.process");
        assert_eq!(method.shape, SymbolShape::Method);
        assert_eq!(method.module, "payment.processor");
        assert_eq!(method.class.as_deref(), Some("PaymentProcessor"));
        assert_eq!(method.name, "process");

        let ctor = classify("models.product.Product.__init__");
        assert_eq!(ctor.shape, SymbolShape::Method);

        let class = classify("models.product.Product");
        assert_eq!(class.shape, SymbolShape::Class);
        assert_eq!(class.module, "models.product");

        let function = classify("helper.util");
        assert_eq!(function.shape, SymbolShape::Function);
        assert_eq!(function.module, "helper");
    }

    #[test]
    fn case_convention_rejects_undotted() {
        assert_eq!(CaseConvention.classify("main"), None);
        assert_eq!(CaseConvention.classify("a..b"), None);
    }
}
