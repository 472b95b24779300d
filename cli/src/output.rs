//! Terminal output for the driver: styled diagnostics, the stderr logger and
//! the symbol table view.

use std::io::{self, Write};

use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use console::Style;
use gsm_core::error::{GsmErrorExt, Level, generate_error_report};
use gsm_core::ir::{IrModule, SymbolTable};
use log::{LevelFilter, Metadata, Record};
use serde::Serialize;

/// Styles for the different kinds of output lines.
#[derive(Debug, Clone)]
pub struct FormatStyle {
    pub title: Style,
    pub info: Style,
    pub warning: Style,
    pub error: Style,
    pub critical: Style,
    pub trace: Style,
}

impl Default for FormatStyle {
    fn default() -> Self {
        FormatStyle {
            title: Style::new().bold().for_stderr(),
            info: Style::new().cyan().for_stderr(),
            warning: Style::new().yellow().for_stderr(),
            error: Style::new().red().bold().for_stderr(),
            critical: Style::new().red().bold().underlined().for_stderr(),
            trace: Style::new().dim().for_stderr(),
        }
    }
}

impl FormatStyle {
    /// Plain styles; nothing is coloured.
    pub fn plain() -> Self {
        FormatStyle {
            title: Style::new(),
            info: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            critical: Style::new(),
            trace: Style::new(),
        }
    }

    pub fn for_level(&self, level: Level) -> &Style {
        match level {
            Level::Info => &self.info,
            Level::Warning => &self.warning,
            Level::Error => &self.error,
            Level::Critical => &self.critical,
        }
    }
}

/// Writes one report line per error into any `Write`.
pub struct DiagnosticPrinter<T: Write> {
    out: T,
    formatting: FormatStyle,
    reported: usize,
}

impl<T: Write> DiagnosticPrinter<T> {
    pub fn new(out: T) -> Self {
        DiagnosticPrinter { out, formatting: FormatStyle::default(), reported: 0 }
    }

    pub fn with_formatting(mut self, formatting: FormatStyle) -> Self {
        self.formatting = formatting;
        self
    }

    pub fn reported(&self) -> usize {
        self.reported
    }

    pub fn report<E: GsmErrorExt + ?Sized>(&mut self, error: &E) -> io::Result<()> {
        let line = generate_error_report(error);
        let style = self.formatting.for_level(error.level()).clone();
        self.reported += 1;
        writeln!(self.out, "{}", style.apply_to(line))
    }

    /// A driver-level failure that has no `GsmErrorExt` behind it.
    pub fn failure(&mut self, message: &str) -> io::Result<()> {
        let style = self.formatting.error.clone();
        self.reported += 1;
        writeln!(self.out, "{}", style.apply_to(format!("GSM | {} | {}", Level::Error, message)))
    }

    pub fn into_inner(self) -> T {
        self.out
    }
}

/// `log` backend writing `[LEVEL] message` lines to stderr.
pub struct ConsoleLogger {
    level: LevelFilter,
    formatting: FormatStyle,
}

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let style = match record.level() {
            log::Level::Error => &self.formatting.error,
            log::Level::Warn => &self.formatting.warning,
            log::Level::Info => &self.formatting.info,
            log::Level::Debug => &self.formatting.title,
            log::Level::Trace => &self.formatting.trace,
        };
        eprintln!("{} {}", style.apply_to(format!("[{:<5}]", record.level())), record.args());
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}

pub fn level_for(verbosity: u8, trace: bool) -> LevelFilter {
    match (verbosity, trace) {
        (_, true) | (2.., _) => LevelFilter::Trace,
        (1, _) => LevelFilter::Debug,
        _ => LevelFilter::Warn,
    }
}

pub fn init_logger(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    log::set_boxed_logger(Box::new(ConsoleLogger { level, formatting: FormatStyle::default() }))
        .map(|()| log::set_max_level(level))
}

/// Every declaration in program order with the slot it received. A name
/// declared twice appears twice; only the later row is still bound.
pub fn symbols_table(symbols: &SymbolTable, module: &IrModule) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Name", "Slot", "Allocated as", "Bound"]);

    for (name, slot) in symbols.declarations() {
        let allocated = module.routine.slot_name(*slot).unwrap_or("?");
        let bound = if symbols.lookup(name) == Some(*slot) { "yes" } else { "no" };
        table.add_row(vec![name.clone(), slot.to_string(), allocated.to_string(), bound.to_string()]);
    }
    table.to_string()
}

#[derive(Debug, Serialize)]
pub struct SymbolRow<'a> {
    pub name: &'a str,
    pub slot: usize,
    pub bound: bool,
}

pub fn symbol_rows(symbols: &SymbolTable) -> Vec<SymbolRow<'_>> {
    symbols
        .declarations()
        .iter()
        .map(|(name, slot)| SymbolRow {
            name,
            slot: slot.0,
            bound: symbols.lookup(name) == Some(*slot),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gsm_core::ir::lower::lower_with_context;
    use gsm_core::{LowerOptions, Script, generate_ast_from_source};

    fn lowered(src: &str) -> (IrModule, SymbolTable) {
        let ast = generate_ast_from_source(&Script::from_source("out.gsm", src)).expect("parse");
        lower_with_context(&ast, &LowerOptions::default()).expect("lower")
    }

    #[test]
    fn printer_writes_one_line_per_report() {
        let script = Script::from_source("p.gsm", "x = ;");
        let err = generate_ast_from_source(&script).expect_err("must fail");

        let mut printer = DiagnosticPrinter::new(Vec::new()).with_formatting(FormatStyle::plain());
        printer.report(err.as_ref()).expect("write");
        printer.failure("could not write out.ll").expect("write");
        assert_eq!(printer.reported(), 2);

        let text = String::from_utf8(printer.into_inner()).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("GSM | ERROR | p.gsm:1:5 | Unexpected: ;"), "{}", lines[0]);
        assert_eq!(lines[1], "GSM | ERROR | could not write out.ll");
    }

    #[test]
    fn verbosity_maps_to_log_levels() {
        assert_eq!(level_for(0, false), LevelFilter::Warn);
        assert_eq!(level_for(1, false), LevelFilter::Debug);
        assert_eq!(level_for(3, false), LevelFilter::Trace);
        assert_eq!(level_for(0, true), LevelFilter::Trace);
    }

    #[test]
    fn symbol_table_lists_rebinds() {
        let (module, symbols) = lowered("int a, b; int a;");
        let table = symbols_table(&symbols, &module);
        assert!(table.contains("%slot0"));
        assert!(table.contains("%slot2"));

        let json = serde_json::to_value(symbol_rows(&symbols)).expect("json");
        let rows = json.as_array().expect("array");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["name"], "a");
        assert_eq!(rows[0]["bound"], false);
        assert_eq!(rows[2]["slot"], 2);
        assert_eq!(rows[2]["bound"], true);
    }
}
