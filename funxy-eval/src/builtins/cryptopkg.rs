//! `crypto` package: hashing over `Bytes`. Only the contract, not full
//! domain depth, is specified here; `sha2` backs the one digest family
//! the evaluator's own semantics never needs to introspect.

use super::{def, expect_bytes, native};
use crate::env::Env;
use crate::value::{BytesValue, Value};
use std::sync::Arc;

#[cfg(feature = "crypto")]
mod imp {
    use sha2::{Digest, Sha256};

    pub fn sha256(data: &[u8]) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(data);
        hasher.finalize().to_vec()
    }
}

#[cfg(not(feature = "crypto"))]
fn disabled() -> crate::error::EvalError {
    crate::error::EvalError::new(crate::error::ErrorKind::Io(
        "crypto support not compiled in (feature `crypto` disabled)".to_string(),
    ))
}

pub fn install(env: &Env) {
    def(env, "crypto.sha256", native("crypto.sha256", 1, Arc::new(|_ev, args| {
        let b = expect_bytes(&args[0])?;
        #[cfg(feature = "crypto")]
        {
            Ok(Value::Bytes(BytesValue::new(imp::sha256(&b.data))))
        }
        #[cfg(not(feature = "crypto"))]
        {
            let _ = &b;
            Err(disabled())
        }
    })));
}
