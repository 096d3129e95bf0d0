//! Indented tree printing

use crate::error::Result;
use crate::transform::Transform;
use exprkit_core::{Expr, Value};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Tree printer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintOptions {
    /// Spaces per nesting level
    pub indent: usize,

    /// Annotate terminals with their payload type
    pub show_types: bool,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            indent: 4,
            show_types: true,
        }
    }
}

/// Writes one line per node into a buffer
#[derive(Debug)]
pub struct TreePrinter<'a> {
    options: &'a PrintOptions,
    level: usize,
    out: String,
}

impl<'a> TreePrinter<'a> {
    pub fn new(options: &'a PrintOptions) -> Self {
        Self {
            options,
            level: 0,
            out: String::new(),
        }
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn line(&mut self, args: std::fmt::Arguments<'_>) {
        let width = self.level * self.options.indent;
        // writing into a String cannot fail
        let _ = writeln!(self.out, "{:width$}{}", "", args, width = width);
    }
}

impl Transform for TreePrinter<'_> {
    type Output = ();

    fn placeholder(&mut self, _expr: &Expr, index: u32) -> Result<()> {
        self.line(format_args!("placeholder<{}>", index));
        Ok(())
    }

    fn terminal(&mut self, _expr: &Expr, value: &Value) -> Result<()> {
        if self.options.show_types {
            self.line(format_args!("term<{}>[={}]", value.type_name(), value));
        } else {
            self.line(format_args!("term[={}]", value));
        }
        Ok(())
    }

    fn compound(&mut self, expr: &Expr) -> Result<()> {
        self.line(format_args!("expr<{}>", expr.kind()));
        self.level += 1;
        for child in expr.children() {
            self.transform(child)?;
        }
        self.level -= 1;
        Ok(())
    }
}

/// Render `expr` as an indented tree, one node per line
pub fn print_tree(expr: &Expr, options: &PrintOptions) -> Result<String> {
    let mut printer = TreePrinter::new(options);
    printer.transform(expr)?;
    Ok(printer.finish())
}

#[cfg(test)]
#[path = "print_tests.rs"]
mod tests;
