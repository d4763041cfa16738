use std::io::Read;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};

use crate::matrix::model::Matrix;

/// Builds matrices from row vectors, JSON and the bracketed text form
/// `{ { 0 1 } { -1 0 } }`.
#[derive(Debug, Default)]
pub struct MatrixLoader;

impl MatrixLoader {
    pub fn from_rows(rows: Vec<Vec<i32>>) -> Result<Matrix> {
        let size = rows.len();
        let mut data = Vec::with_capacity(size * size);
        for (idx, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                bail!(
                    "Row {} has {} entries but the matrix has {} rows",
                    idx,
                    row.len(),
                    size
                );
            }
            data.extend(row);
        }
        Ok(Matrix::from_parts(size, data))
    }

    pub fn from_row_major(size: usize, data: Vec<i32>) -> Result<Matrix> {
        if data.len() != size * size {
            bail!(
                "Expected {} entries for a {size}x{size} matrix, found {}",
                size * size,
                data.len()
            );
        }
        Ok(Matrix::from_parts(size, data))
    }

    /// Parse a JSON array of rows, e.g. `[[0, 1], [-1, 0]]`.
    pub fn from_json_str(json: &str) -> Result<Matrix> {
        let rows: Vec<Vec<i32>> = serde_json::from_str(json).context("parse matrix rows")?;
        Self::from_rows(rows)
    }

    pub fn from_text(text: &str) -> Result<Matrix> {
        let rows = parse_braced(text).with_context(|| format!("parse matrix {:?}", text.trim()))?;
        Self::from_rows(rows)
    }

    /// Accepts either representation, picked by the first non-blank character.
    pub fn parse(input: &str) -> Result<Matrix> {
        match input.trim_start().chars().next() {
            Some('[') => Self::from_json_str(input),
            Some('{') => Self::from_text(input),
            Some(other) => Err(anyhow!("Unexpected leading character '{other}' in matrix")),
            None => Err(anyhow!("Empty matrix description")),
        }
    }

    pub fn from_reader<R: Read>(mut reader: R) -> Result<Matrix> {
        let mut buf = String::new();
        reader.read_to_string(&mut buf)?;
        Self::parse(&buf)
    }
}

impl FromStr for Matrix {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        MatrixLoader::from_text(s)
    }
}

#[derive(Debug, PartialEq)]
enum Token {
    Open,
    Close,
    Number(i32),
}

fn tokenize(text: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();
    while let Some((start, ch)) = chars.next() {
        match ch {
            '{' => tokens.push(Token::Open),
            '}' => tokens.push(Token::Close),
            c if c.is_whitespace() => {}
            c if c == '-' || c == '+' || c.is_ascii_digit() => {
                let mut end = start + c.len_utf8();
                while let Some(&(idx, next)) = chars.peek() {
                    if next.is_ascii_digit() {
                        end = idx + next.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                let literal = &text[start..end];
                let value = literal
                    .parse::<i32>()
                    .with_context(|| format!("invalid integer '{literal}' at offset {start}"))?;
                tokens.push(Token::Number(value));
            }
            other => bail!("unexpected character '{other}' at offset {start}"),
        }
    }
    Ok(tokens)
}

fn parse_braced(text: &str) -> Result<Vec<Vec<i32>>> {
    let tokens = tokenize(text)?;
    let mut iter = tokens.into_iter();
    if iter.next() != Some(Token::Open) {
        bail!("matrix must start with '{{'");
    }

    let mut rows = Vec::new();
    loop {
        match iter.next() {
            Some(Token::Open) => {
                let mut row = Vec::new();
                loop {
                    match iter.next() {
                        Some(Token::Number(value)) => row.push(value),
                        Some(Token::Close) => break,
                        Some(Token::Open) => bail!("nested '{{' inside row {}", rows.len()),
                        None => bail!("unterminated row {}", rows.len()),
                    }
                }
                rows.push(row);
            }
            Some(Token::Close) => break,
            Some(Token::Number(value)) => bail!("entry {value} outside of any row"),
            None => bail!("missing closing '}}'"),
        }
    }

    if let Some(extra) = iter.next() {
        bail!("trailing input after matrix: {extra:?}");
    }
    Ok(rows)
}
