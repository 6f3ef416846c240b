//! Iterative release of nested values.
//!
//! Dropping the last reference to an array or object releases its children,
//! and the children release theirs. Left to the compiler's drop glue this is
//! one stack frame per nesting level, which overflows on deeply nested input.
//! Instead, container buffers hand their children to [`release_all`], which
//! works through a pending list: any child container whose buffer is freed by
//! this release contributes its own children to the list instead of
//! recursing.

use crate::Value;

/// Release every value in `pending`, flattening nested containers.
pub(crate) fn release_all(mut pending: Vec<Value>) {
    while let Some(value) = pending.pop() {
        match value {
            Value::Array(array) => array.release_into(&mut pending),
            Value::Object(object) => object.release_into(&mut pending),
            Value::Null | Value::False | Value::True | Value::Number(_) | Value::String(_) => {}
        }
    }
}
