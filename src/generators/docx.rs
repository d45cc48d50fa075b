//! Word (`.docx`) template engine.
//!
//! A `.docx` file is a ZIP package of XML parts. Commands such as `{name}` are
//! located in the text of each paragraph, even when Word has split them across
//! several `<w:t>` runs, and replaced in the run where they start. Every other
//! package entry is copied through byte for byte.
//!
//! Supported commands: `{path}`, `{a.b.c}`, `{INS path}`, `{= path}` and the
//! bracket form `{prefix[a.b]}`.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::common::{display_value, escape_xml, lookup};
use super::placeholder::resolve_bracket_path;
use super::traits::TemplateEngine;
use super::GeneratorError;
use crate::codec::{looks_like_zip, WORD_DOCUMENT_MIME};

const MAIN_PART: &str = "word/document.xml";
const LINE_BREAK: &str = "</w:t><w:br/><w:t xml:space=\"preserve\">";

lazy_static! {
    static ref TEMPLATED_PART: Regex =
        Regex::new(r"^word/(document|header\d*|footer\d*|footnotes|endnotes)\.xml$")
            .expect("templated part pattern");
    static ref PARAGRAPH_TAG: Regex =
        Regex::new(r"<w:p(?:\s[^>]*?)?(/)?>|</w:p>").expect("paragraph tag pattern");
    static ref TEXT_RUN: Regex =
        Regex::new(r"<w:t(?:\s[^>]*)?>([^<]*)</w:t>").expect("text run pattern");
}

/// Command delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiters {
    pub open: char,
    pub close: char,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            open: '{',
            close: '}',
        }
    }
}

/// Binary engine for Word documents.
#[derive(Debug, Default, Clone)]
pub struct DocxEngine {
    delimiters: Delimiters,
}

impl DocxEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiters(delimiters: Delimiters) -> Self {
        Self { delimiters }
    }

    pub fn delimiters(&self) -> Delimiters {
        self.delimiters
    }

    /// Render one XML part, paragraph by paragraph.
    ///
    /// Each `<w:t>` run belongs to its innermost enclosing paragraph, so text
    /// boxes nested inside a paragraph are rendered on their own and the
    /// outer paragraph keeps the runs on both sides of them.
    pub fn render_part(&self, xml: &str, data: &Value) -> Result<String, GeneratorError> {
        let runs: Vec<TextRun> = TEXT_RUN
            .captures_iter(xml)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                Some(TextRun {
                    start: whole.start(),
                    end: whole.end(),
                    text: caps.get(1)?.as_str(),
                })
            })
            .collect();
        if runs.is_empty() {
            return Ok(xml.to_string());
        }

        let mut paragraphs: Vec<Vec<usize>> = Vec::new();
        let mut open: Vec<usize> = Vec::new();
        let mut tags = PARAGRAPH_TAG.captures_iter(xml).peekable();
        for (index, run) in runs.iter().enumerate() {
            while let Some(tag) =
                tags.next_if(|tag| tag.get(0).is_some_and(|m| m.start() < run.start))
            {
                if tag.get(0).is_some_and(|m| m.as_str().starts_with("</")) {
                    open.pop();
                } else if tag.get(1).is_none() {
                    paragraphs.push(Vec::new());
                    open.push(paragraphs.len() - 1);
                }
            }
            if let Some(&paragraph) = open.last() {
                paragraphs[paragraph].push(index);
            }
        }

        let mut rewritten: Vec<Option<String>> = vec![None; runs.len()];
        for members in &paragraphs {
            let texts: Vec<&str> = members.iter().map(|&i| runs[i].text).collect();
            let Some(rendered) = self.render_runs(&texts, data)? else {
                continue;
            };
            for (&i, text) in members.iter().zip(rendered) {
                if text != runs[i].text {
                    rewritten[i] = Some(text);
                }
            }
        }

        let mut out = String::with_capacity(xml.len());
        let mut last = 0;
        for (run, text) in runs.iter().zip(&rewritten) {
            let Some(text) = text else { continue };
            out.push_str(&xml[last..run.start]);
            out.push_str("<w:t xml:space=\"preserve\">");
            out.push_str(text);
            out.push_str("</w:t>");
            last = run.end;
        }
        out.push_str(&xml[last..]);
        Ok(out)
    }

    /// Replace commands in the joined text of one paragraph's runs.
    ///
    /// Returns the new text of every run, or `None` when there is no command.
    fn render_runs(
        &self,
        texts: &[&str],
        data: &Value,
    ) -> Result<Option<Vec<String>>, GeneratorError> {
        let joined = texts.concat();
        if !joined.contains(self.delimiters.open) {
            return Ok(None);
        }

        // Byte offset in `joined` -> index of the run that holds it.
        let mut owners = Vec::with_capacity(joined.len());
        for (index, text) in texts.iter().enumerate() {
            owners.extend(std::iter::repeat(index).take(text.len()));
        }

        let mut rewritten = vec![String::new(); texts.len()];
        let open = self.delimiters.open;
        let close = self.delimiters.close;
        let mut pos = 0;
        while pos < joined.len() {
            let Some(offset) = joined[pos..].find(open) else {
                copy_span(&joined, pos, joined.len(), &owners, &mut rewritten);
                break;
            };
            let start = pos + offset;
            copy_span(&joined, pos, start, &owners, &mut rewritten);

            let body_start = start + open.len_utf8();
            let end = joined[body_start..]
                .find(close)
                .map(|e| body_start + e)
                .ok_or_else(|| {
                    GeneratorError::UnterminatedCommand(joined[start..].chars().take(40).collect())
                })?;
            let value = self.evaluate(&joined[body_start..end], data)?;
            rewritten[owners[start]].push_str(&value);
            pos = end + close.len_utf8();
        }
        Ok(Some(rewritten))
    }

    /// Evaluate a command body into escaped run text.
    fn evaluate(&self, command: &str, data: &Value) -> Result<String, GeneratorError> {
        let expr = command.trim();
        let expr = expr
            .strip_prefix("INS ")
            .or_else(|| expr.strip_prefix('='))
            .unwrap_or(expr)
            .trim();
        if expr.is_empty() {
            return Err(GeneratorError::EmptyCommand);
        }

        let value = if expr.contains('[') {
            resolve_bracket_path(expr, data)
        } else {
            let parts: Vec<&str> = expr.split('.').map(str::trim).collect();
            lookup(data, &parts)
        };

        match value {
            None => Err(GeneratorError::UnresolvedReference(expr.to_string())),
            Some(Value::Null) => Ok(String::new()),
            Some(value) => Ok(escape_xml(&display_value(&value)).replace('\n', LINE_BREAK)),
        }
    }
}

struct TextRun<'a> {
    start: usize,
    end: usize,
    text: &'a str,
}

fn copy_span(joined: &str, from: usize, to: usize, owners: &[usize], rewritten: &mut [String]) {
    for (offset, ch) in joined[from..to].char_indices() {
        rewritten[owners[from + offset]].push(ch);
    }
}

impl TemplateEngine for DocxEngine {
    fn generate(&self, template: &[u8], data: &Value) -> Result<Vec<u8>, GeneratorError> {
        if !looks_like_zip(template) {
            return Err(GeneratorError::NotAPackage);
        }

        let mut archive = ZipArchive::new(Cursor::new(template))?;
        if archive.by_name(MAIN_PART).is_err() {
            return Err(GeneratorError::MissingPart(MAIN_PART.to_string()));
        }

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for index in 0..archive.len() {
            let name = archive.by_index_raw(index)?.name().to_string();
            if TEMPLATED_PART.is_match(&name) {
                let mut xml = String::new();
                archive.by_index(index)?.read_to_string(&mut xml)?;
                let rendered = self.render_part(&xml, data)?;
                writer.start_file(name.as_str(), options)?;
                writer.write_all(rendered.as_bytes())?;
            } else {
                writer.raw_copy_file(archive.by_index_raw(index)?)?;
            }
        }

        Ok(writer.finish()?.into_inner())
    }

    fn content_type(&self) -> &'static str {
        WORD_DOCUMENT_MIME
    }
}
