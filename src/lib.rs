//! carve rewrites a generated project according to directive comments left
//! in its template: lines, blocks and whole files can be removed, wrapped
//! components unwrapped, or the directives stripped to keep every variant.

/// Command-line interface module for the carve application
pub mod cli;

/// Configuration handling
/// Supports JSON and YAML formats (carve.json, carve.yml, carve.yaml)
pub mod config;

/// Directive kinds, markers and detection
pub mod directive;

/// File discovery under the target root
pub mod discover;

/// Error types and handling for the carve application
pub mod error;

/// Run orchestration across the discovered files
pub mod processor;

/// User confirmation handling
pub mod prompt;

/// Line, block and observer rewriters
pub mod rewrite;

/// Directive stripping for sanitize mode
pub mod sanitize;
