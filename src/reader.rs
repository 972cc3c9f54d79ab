//! Reading and writing the `.csp` textual instance format.
//!
//! The format is line-oriented: `//` starts a comment, blank lines are
//! ignored. The first significant line is the variable count, followed by
//! one `lb, ub` line per variable (inclusive bounds), followed by constraint
//! blocks: a `c(first, second)` header and one `v1, v2` line per allowed
//! tuple.

use std::{fmt::Write as _, fs, path::Path};

use crate::{
    error::{Error, Result},
    solver::instance::{BinaryConstraint, Instance, Tuple, VariableId},
};

/// A constraint as written in a `.csp` document: a directed variable pair
/// and its full list of allowed tuples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintSpec {
    pub first: VariableId,
    pub second: VariableId,
    pub tuples: Vec<Tuple>,
}

/// A parsed (or generated) `.csp` document, not yet validated as an
/// instance. [`CspDocument::build`] performs the instance validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CspDocument {
    pub bounds: Vec<(i64, i64)>,
    pub constraints: Vec<ConstraintSpec>,
}

impl CspDocument {
    pub fn from_path(path: &Path) -> Result<Self> {
        Self::parse(&fs::read_to_string(path)?)
    }

    pub fn parse(input: &str) -> Result<Self> {
        // Significant lines with their 1-based line numbers.
        let lines: Vec<(usize, &str)> = input
            .lines()
            .enumerate()
            .map(|(index, line)| (index + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty() && !line.starts_with("//"))
            .collect();
        let mut cursor = lines.into_iter().peekable();

        let (line, text) = cursor
            .next()
            .ok_or_else(|| parse_error(0, "expected a variable count"))?;
        let count: usize = text
            .parse()
            .map_err(|_| parse_error(line, "expected a variable count"))?;

        let mut bounds = Vec::with_capacity(count);
        for _ in 0..count {
            let (line, text) = cursor
                .next()
                .ok_or_else(|| parse_error(0, "expected a domain bounds line"))?;
            bounds.push(parse_pair(line, text, "expected domain bounds `lb, ub`")?);
        }

        let mut constraints = Vec::new();
        while let Some((line, text)) = cursor.next() {
            let (first, second) = parse_header(line, text)?;
            let mut tuples = Vec::new();
            while let Some(&(_, next)) = cursor.peek() {
                if next.starts_with("c(") {
                    break;
                }
                let (line, text) = cursor.next().expect("peeked line");
                let (v1, v2) = parse_pair(line, text, "expected a tuple `v1, v2`")?;
                tuples.push((v1, v2));
            }
            constraints.push(ConstraintSpec {
                first,
                second,
                tuples,
            });
        }

        Ok(Self {
            bounds,
            constraints,
        })
    }

    /// Validates the document into a solvable [`Instance`].
    pub fn build(&self) -> Result<Instance> {
        let constraints = self
            .constraints
            .iter()
            .map(|spec| BinaryConstraint::new(spec.first, spec.second, spec.tuples.iter().copied()))
            .collect();
        Instance::new(&self.bounds, constraints)
    }

    /// Serialises the document back to the `.csp` format.
    pub fn to_csp(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "// Number of variables:\n{}", self.bounds.len());
        let _ = writeln!(out, "\n// Domains of the variables (inclusive):");
        for (lower, upper) in &self.bounds {
            let _ = writeln!(out, "{lower}, {upper}");
        }
        let _ = writeln!(out, "\n// Constraints (vars indexed from 0, allowed tuples):");
        for spec in &self.constraints {
            let _ = writeln!(out, "c({}, {})", spec.first, spec.second);
            for (v1, v2) in &spec.tuples {
                let _ = writeln!(out, "{v1}, {v2}");
            }
            out.push('\n');
        }
        out
    }
}

fn parse_header(line: usize, text: &str) -> Result<(VariableId, VariableId)> {
    let inner = text
        .strip_prefix("c(")
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(|| parse_error(line, "expected a constraint header `c(first, second)`"))?;
    let (first, second) = parse_pair(line, inner, "expected a constraint header `c(first, second)`")?;
    let to_var = |value: i64| -> Result<VariableId> {
        usize::try_from(value)
            .map_err(|_| parse_error(line, "constraint variables must be non-negative"))
    };
    Ok((to_var(first)?, to_var(second)?))
}

fn parse_pair(line: usize, text: &str, message: &str) -> Result<(i64, i64)> {
    let mut parts = text.split(',').map(str::trim);
    let pair = match (parts.next(), parts.next(), parts.next()) {
        (Some(a), Some(b), None) => a.parse::<i64>().ok().zip(b.parse::<i64>().ok()),
        _ => None,
    };
    pair.ok_or_else(|| parse_error(line, message))
}

fn parse_error(line: usize, message: &str) -> Error {
    Error::Parse {
        line,
        message: message.to_string(),
    }
}
