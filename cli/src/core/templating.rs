//! # CI Config Template System
//!
//! File: cli/src/core/templating.rs
//!
//! ## Overview
//!
//! This module renders text configuration templates (the nginx config for
//! `ci nginx`) against a small serializable context. Templates reference
//! context fields with the dotted placeholder syntax used across the team's
//! existing config files:
//!
//! ```text
//! server_name {{ .Project }}.dev.tera-online.ru;
//! proxy_pass  http://{{ .Web }}:80;
//! ```
//!
//! ## Architecture
//!
//! Rendering uses the Tera templating engine:
//! 1. The template source is read and dotted placeholders inside `{{ ... }}`
//!    are translated to plain Tera variables (`{{ .Web }}` → `{{ Web }}`).
//! 2. The translated source is compiled once (`ConfigTemplate::parse`), so
//!    syntax errors surface before any data is gathered.
//! 3. `ConfigTemplate::render` executes it against any `serde::Serialize`
//!    context. A field missing from the context is an execution error.
//!
//! Other Tera syntax inside the delimiters (filters, expressions) passes through.
//! Outside them text is literal, including `{%` and `{#`.
//!
use crate::core::error::{CiError, Result};
use anyhow::{anyhow, Context};
use serde::Serialize;
use std::error::Error as StdError;
use std::fs;
use std::path::Path;
use tera::Tera;
use tracing::debug;

const TEMPLATE_NAME: &str = "config";

/// A compiled configuration template.
pub struct ConfigTemplate {
    tera: Tera,
    origin: String,
}

impl ConfigTemplate {
    /// Reads and compiles the template at `path`.
    ///
    /// # Errors
    ///
    /// `CiError::TemplateParse` if the file cannot be read or does not compile.
    pub fn from_file(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path).map_err(|e| {
            anyhow!(CiError::TemplateParse {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
        })?;
        Self::parse(&source, &path.display().to_string())
    }

    /// Compiles template `source`; `origin` names it in error messages.
    pub fn parse(source: &str, origin: &str) -> Result<Self> {
        let translated = translate_placeholders(source);
        debug!("Translated template '{}':\n{}", origin, translated);
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        tera.add_raw_template(TEMPLATE_NAME, &translated)
            .map_err(|e| {
                anyhow!(CiError::TemplateParse {
                    path: origin.to_string(),
                    reason: describe_tera_error(&e),
                })
            })?;
        Ok(Self {
            tera,
            origin: origin.to_string(),
        })
    }

    /// Executes the template against `data`, returning the rendered text.
    ///
    /// # Errors
    ///
    /// `CiError::TemplateExec` if the template references a field `data` lacks.
    pub fn render<T: Serialize>(&self, data: &T) -> Result<String> {
        let context = tera::Context::from_serialize(data)
            .map_err(|e| {
                anyhow!(CiError::TemplateExec {
                    reason: describe_tera_error(&e),
                })
            })
            .context("Failed to build template context")?;
        self.tera.render(TEMPLATE_NAME, &context).map_err(|e| {
            anyhow!(CiError::TemplateExec {
                reason: format!("{} ({})", describe_tera_error(&e), self.origin),
            })
        })
    }
}

/// Rewrites `{{ .Field }}` placeholders into Tera's `{{ Field }}` form.
///
/// Only a `.` that starts a field path is dropped: one at the start of the
/// expression or after whitespace, `(`, `-`, `|` or `,`, and followed by a
/// letter or `_`. Text outside `{{ }}` renders verbatim: Tera's `{%` and `{#`
/// openers there are emitted as string literals. An unterminated `{{` is left
/// untouched.
pub fn translate_placeholders(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;
    while let Some(start) = rest.find("{{") {
        let (literal, tail) = rest.split_at(start);
        push_literal(&mut out, literal);
        let body = &tail[2..];
        match body.find("}}") {
            Some(end) => {
                out.push_str("{{");
                out.push_str(&strip_field_dots(&body[..end]));
                out.push_str("}}");
                rest = &body[end + 2..];
            }
            None => {
                out.push_str(tail);
                rest = "";
            }
        }
    }
    push_literal(&mut out, rest);
    out
}

/// Appends plain text, quoting the block and comment openers Tera would parse.
fn push_literal(out: &mut String, text: &str) {
    let mut rest = text;
    while let Some(start) = rest.find('{') {
        let (before, tail) = rest.split_at(start);
        out.push_str(before);
        if tail.starts_with("{%") || tail.starts_with("{#") {
            out.push_str("{{ \"");
            out.push_str(&tail[..2]);
            out.push_str("\" }}");
            rest = &tail[2..];
        } else {
            out.push('{');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
}

fn strip_field_dots(expr: &str) -> String {
    let mut out = String::with_capacity(expr.len());
    let mut prev: Option<char> = None;
    let mut chars = expr.chars().peekable();
    while let Some(c) = chars.next() {
        let starts_field = c == '.'
            && prev.map_or(true, |p| {
                p.is_whitespace() || matches!(p, '(' | '-' | '|' | ',')
            })
            && chars
                .peek()
                .is_some_and(|next| next.is_ascii_alphabetic() || *next == '_');
        if !starts_field {
            out.push(c);
        }
        prev = Some(c);
    }
    out
}

/// Flattens a Tera error and its sources into one line; Tera keeps the
/// useful detail (line, column, missing variable) in the source chain.
fn describe_tera_error(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
