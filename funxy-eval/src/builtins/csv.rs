//! `csv` package: RFC 4180-ish parsing/stringification over `List<List<String>>`.

use super::{def, expect_list, expect_string, native};
use crate::env::Env;
use crate::value::Value;
use std::sync::Arc;

fn parse_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut chars = line.chars().peekable();
    let mut in_quotes = false;
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut field));
            }
            other => field.push(other),
        }
    }
    fields.push(field);
    fields
}

fn quote_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

pub fn install(env: &Env) {
    def(env, "csv.parse", native("csv.parse", 1, Arc::new(|_ev, args| {
        let text = expect_string(&args[0])?;
        let rows = text
            .lines()
            .map(|line| Value::list(parse_line(line).iter().map(|f| Value::string(f)).collect()))
            .collect();
        Ok(Value::list(rows))
    })));

    def(env, "csv.stringify", native("csv.stringify", 1, Arc::new(|_ev, args| {
        let rows = expect_list(&args[0])?;
        let mut out = String::new();
        for row in rows {
            let fields = expect_list(&row)?;
            let strs: Result<Vec<String>, _> = fields.iter().map(super::expect_string).collect();
            out.push_str(&strs?.iter().map(|f| quote_field(f)).collect::<Vec<_>>().join(","));
            out.push('\n');
        }
        Ok(Value::string(&out))
    })));
}
