//! `regex` package. Parse/compile failures surface as
//! `ErrorKind::ParseFailure`, matching `json`'s treatment of malformed
//! input.

use super::{def, expect_string, native, some, zero};
use crate::env::Env;
use crate::value::Value;
use std::sync::Arc;

#[cfg(feature = "regex")]
mod imp {
    use crate::error::{ErrorKind, EvalError};
    use crate::value::Value;
    use regex::Regex;

    pub fn compile(pattern: &str) -> Result<Regex, EvalError> {
        Regex::new(pattern).map_err(|e| EvalError::new(ErrorKind::ParseFailure(e.to_string())))
    }

    pub fn is_match(pattern: &str, text: &str) -> Result<bool, EvalError> {
        Ok(compile(pattern)?.is_match(text))
    }

    pub fn find(pattern: &str, text: &str) -> Result<Option<String>, EvalError> {
        Ok(compile(pattern)?.find(text).map(|m| m.as_str().to_string()))
    }

    pub fn find_all(pattern: &str, text: &str) -> Result<Vec<String>, EvalError> {
        Ok(compile(pattern)?.find_iter(text).map(|m| m.as_str().to_string()).collect())
    }

    pub fn captures(pattern: &str, text: &str) -> Result<Option<Vec<Value>>, EvalError> {
        let re = compile(pattern)?;
        Ok(re.captures(text).map(|caps| {
            caps.iter()
                .map(|m| match m {
                    Some(m) => Value::string(m.as_str()),
                    None => Value::Nil,
                })
                .collect()
        }))
    }

    pub fn replace_all(pattern: &str, text: &str, replacement: &str) -> Result<String, EvalError> {
        Ok(compile(pattern)?.replace_all(text, replacement).into_owned())
    }

    pub fn split(pattern: &str, text: &str) -> Result<Vec<String>, EvalError> {
        Ok(compile(pattern)?.split(text).map(|s| s.to_string()).collect())
    }
}

#[cfg(not(feature = "regex"))]
fn disabled() -> crate::error::EvalError {
    crate::error::EvalError::new(crate::error::ErrorKind::Io(
        "regex support not compiled in (feature `regex` disabled)".to_string(),
    ))
}

pub fn install(env: &Env) {
    def(env, "regex.isMatch", native("regex.isMatch", 2, Arc::new(|_ev, args| {
        let pattern = expect_string(&args[0])?;
        let text = expect_string(&args[1])?;
        #[cfg(feature = "regex")]
        {
            Ok(Value::Bool(imp::is_match(&pattern, &text)?))
        }
        #[cfg(not(feature = "regex"))]
        {
            let _ = (&pattern, &text);
            Err(disabled())
        }
    })));

    def(env, "regex.find", native("regex.find", 2, Arc::new(|_ev, args| {
        let pattern = expect_string(&args[0])?;
        let text = expect_string(&args[1])?;
        #[cfg(feature = "regex")]
        {
            Ok(match imp::find(&pattern, &text)? {
                Some(s) => some(Value::string(&s)),
                None => zero(),
            })
        }
        #[cfg(not(feature = "regex"))]
        {
            let _ = (&pattern, &text);
            Err(disabled())
        }
    })));

    def(env, "regex.findAll", native("regex.findAll", 2, Arc::new(|_ev, args| {
        let pattern = expect_string(&args[0])?;
        let text = expect_string(&args[1])?;
        #[cfg(feature = "regex")]
        {
            Ok(Value::list(imp::find_all(&pattern, &text)?.iter().map(|s| Value::string(s)).collect()))
        }
        #[cfg(not(feature = "regex"))]
        {
            let _ = (&pattern, &text);
            Err(disabled())
        }
    })));

    def(env, "regex.captures", native("regex.captures", 2, Arc::new(|_ev, args| {
        let pattern = expect_string(&args[0])?;
        let text = expect_string(&args[1])?;
        #[cfg(feature = "regex")]
        {
            Ok(match imp::captures(&pattern, &text)? {
                Some(groups) => some(Value::list(groups)),
                None => zero(),
            })
        }
        #[cfg(not(feature = "regex"))]
        {
            let _ = (&pattern, &text);
            Err(disabled())
        }
    })));

    def(env, "regex.replaceAll", native("regex.replaceAll", 3, Arc::new(|_ev, args| {
        let pattern = expect_string(&args[0])?;
        let text = expect_string(&args[1])?;
        let replacement = expect_string(&args[2])?;
        #[cfg(feature = "regex")]
        {
            Ok(Value::string(&imp::replace_all(&pattern, &text, &replacement)?))
        }
        #[cfg(not(feature = "regex"))]
        {
            let _ = (&pattern, &text, &replacement);
            Err(disabled())
        }
    })));

    def(env, "regex.split", native("regex.split", 2, Arc::new(|_ev, args| {
        let pattern = expect_string(&args[0])?;
        let text = expect_string(&args[1])?;
        #[cfg(feature = "regex")]
        {
            Ok(Value::list(imp::split(&pattern, &text)?.iter().map(|s| Value::string(s)).collect()))
        }
        #[cfg(not(feature = "regex"))]
        {
            let _ = (&pattern, &text);
            Err(disabled())
        }
    })));
}
