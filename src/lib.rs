//! zoptable - Z-machine opcode table compiler
//!
//! This library compiles the opcode table of the Z-machine standards
//! document into flat, version-aware dispatch tables for an interpreter.
//! The documentation table is an AsciiDoc pipe table with row-spanning
//! cells and hand-written version tokens (`5/3`, `6/*`, ...); the output
//! is two 256-slot array literals, one for standard opcodes and one for
//! extended (`0xBE`-prefixed) opcodes.
//!
//! # Architecture
//!
//! The compilation pipeline lives in the [`opcodes`] module:
//!
//! 1. **Row parsing** (`opcodes::parser`)
//!    - Recognizes the four row shapes produced by row spans
//!    - Inherits blank cells from the row above
//!    - Maps version and operand tokens through closed vocabularies
//!
//! 2. **Grouping and resolution** (`opcodes::grouping`, `opcodes::resolver`)
//!    - Splits definitions into the standard and extended namespaces
//!    - Picks one authoritative definition per byte and VM version
//!
//! 3. **Emission** (`opcodes::emitter`)
//!    - Lays timelines out on 256 slots and renders them
//!
//! # Example
//!
//! ```rust
//! use zoptable::{compile_tables, GeneratorConfig, EMBEDDED_TABLE};
//!
//! let tables = compile_tables(EMBEDDED_TABLE).unwrap();
//!
//! // quit (0OP:10) exists unchanged in every version
//! let quit = tables.standard.lookup(186, 3).unwrap();
//! assert_eq!(quit.definition.raw_mnemonic, "quit");
//!
//! let text = zoptable::generate(EMBEDDED_TABLE, &GeneratorConfig::default()).unwrap();
//! assert!(text.starts_with("STD_OPCODE_TABLE = ["));
//! ```
//!
//! # Errors
//!
//! Parsing is all-or-nothing: the first malformed row aborts with a
//! [`TableError`] naming its line, and no table is produced.

pub mod config;
pub mod opcodes;

pub use config::{ConfigError, GeneratorConfig};
pub use opcodes::{
    compile_tables, CompiledTables, Namespace, OpcodeDefinition, OpcodeTable, RenderOptions,
    ResolvedEntry, TableError, TableResult, Timeline,
};

/// Opcode table transcribed from the Z-machine standards document
pub const EMBEDDED_TABLE: &str = include_str!("../data/zmachine_opcodes.adoc");

/// Compile `source` and render both tables, standard first
pub fn generate(source: &str, config: &GeneratorConfig) -> TableResult<String> {
    let tables = compile_tables(source)?;
    Ok(render_tables(&tables, config))
}

/// Render compiled tables with the names and options of `config`
pub fn render_tables(tables: &CompiledTables, config: &GeneratorConfig) -> String {
    let options = config.render_options();
    format!(
        "{}\n{}\n",
        tables.standard.render(&config.standard_table_name, options),
        tables.extended.render(&config.extended_table_name, options)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_embedded_table() {
        let result = compile_tables(EMBEDDED_TABLE);
        assert!(result.is_ok(), "{:?}", result.err());
    }

    #[test]
    fn test_generate_renders_both_tables() {
        let text = generate(EMBEDDED_TABLE, &GeneratorConfig::default()).unwrap();
        assert!(text.starts_with("STD_OPCODE_TABLE = [\n"));
        assert!(text.contains("]\nEXT_OPCODE_TABLE = [\n"));
        assert!(text.ends_with("]\n"));
    }

    #[test]
    fn test_generate_uses_configured_names() {
        let config = GeneratorConfig {
            standard_table_name: "OPS".to_string(),
            extended_table_name: "EXT_OPS".to_string(),
            ..GeneratorConfig::default()
        };
        let text = generate(EMBEDDED_TABLE, &config).unwrap();
        assert!(text.starts_with("OPS = ["));
        assert!(text.contains("\nEXT_OPS = ["));
    }

    #[test]
    fn test_generate_fails_without_partial_output() {
        let source = format!("{}\n|0OP | 1 | 177", EMBEDDED_TABLE);
        let err = generate(&source, &GeneratorConfig::default()).unwrap_err();
        assert!(matches!(err, TableError::UnexpectedColumnCount { count: 4, .. }));
    }

    #[test]
    fn test_empty_source_gives_empty_tables() {
        let tables = compile_tables("").unwrap();
        assert_eq!(tables.populated_slots(), (0, 0));
    }
}
