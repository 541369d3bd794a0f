pub mod module_scanner;

pub use module_scanner::{ModuleScanner, ScannedModule};
