//! Text forms of values.
//!
//! [`dump`] is the one-level form shown in diagrams and assertion messages:
//! containers show their direct members and elide anything deeper with a
//! `#Kind#` marker. [`to_display_string`] is the host language's string
//! conversion, used by `+`, `String()` and template-free concatenation.

use pa_ir::format_number;

use crate::value::{Settled, Value};

/// One-level stringification.
pub fn dump(value: &Value) -> String {
    dump_at(value, 0)
}

fn dump_at(value: &Value, depth: usize) -> String {
    let nested = depth > 0;
    match value {
        Value::Undefined => "undefined".to_string(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(*n),
        Value::Str(s) => quote_json(s),
        Value::Function(_) | Value::Native(_) => "#function#".to_string(),
        Value::Array(_) if nested => "#Array#".to_string(),
        Value::Array(items) => {
            let items: Vec<String> = items.borrow().iter().map(|v| dump_at(v, depth + 1)).collect();
            format!("[{}]", items.join(","))
        }
        Value::Object(_) | Value::Recorded(_) if nested => "#Object#".to_string(),
        Value::Object(object) => {
            let entries: Vec<String> = object
                .borrow()
                .iter()
                .map(|(key, v)| format!("{key}:{}", dump_at(v, depth + 1)))
                .collect();
            format!("Object{{{}}}", entries.join(","))
        }
        Value::Error(_) if nested => "#Error#".to_string(),
        Value::Error(err) => format!("{}{{message:{}}}", err.name, quote_json(&err.message())),
        Value::RegExp(re) => format!("/{}/{}", re.source, re.flags),
        Value::Promise(_) if nested => "#Promise#".to_string(),
        Value::Promise(settled) => match &**settled {
            Settled::Fulfilled(v) => format!("Promise{{fulfilled:{}}}", dump_at(v, depth + 1)),
            Settled::Rejected(v) => format!("Promise{{rejected:{}}}", dump_at(v, depth + 1)),
        },
        Value::Recorder(_) => "#Recorder#".to_string(),
        Value::Recorded(_) => "#Object#".to_string(),
    }
}

/// String conversion as performed by `String(value)`.
pub fn to_display_string(value: &Value) -> String {
    match value {
        Value::Undefined => "undefined".to_string(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(*n),
        Value::Str(s) => s.to_string(),
        Value::Array(items) => {
            let parts: Vec<String> = items
                .borrow()
                .iter()
                .map(|v| {
                    if v.is_nullish() {
                        String::new()
                    } else {
                        to_display_string(v)
                    }
                })
                .collect();
            parts.join(",")
        }
        Value::Function(closure) => {
            let name = closure.func.name.as_deref().unwrap_or("");
            format!("function {name}() {{ [code] }}")
        }
        Value::Native(native) => format!("function {}() {{ [native code] }}", native.name),
        Value::Error(err) => {
            let message = err.message();
            if message.is_empty() {
                err.name.to_string()
            } else {
                format!("{}: {message}", err.name)
            }
        }
        Value::RegExp(re) => format!("/{}/{}", re.source, re.flags),
        Value::Promise(_) => "[object Promise]".to_string(),
        Value::Object(_) | Value::Recorder(_) | Value::Recorded(_) => {
            "[object Object]".to_string()
        }
    }
}

/// `console.log` form: strings bare, everything else dumped.
pub fn to_log_string(value: &Value) -> String {
    match value {
        Value::Str(s) => s.to_string(),
        Value::Error(_) => to_display_string(value),
        _ => dump(value),
    }
}

/// Double-quoted JSON string literal.
pub fn quote_json(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if u32::from(c) < 0x20 => out.push_str(&format!("\\u{:04x}", u32::from(c))),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests;
