use pretty_assertions::assert_eq;

use super::{assemble, ArgumentRecord, AssembleError};
use crate::{CaptureEvent, RecordedArgument, SourceSnippet};

fn snippet(content: &str) -> SourceSnippet {
    SourceSnippet {
        content: content.into(),
        filepath: "/tmp/a.test.js".into(),
        line: 3,
        is_async: true,
        is_generator: false,
    }
}

fn recorded(value: i32, path: &str, content: &str) -> RecordedArgument<i32> {
    RecordedArgument {
        value,
        captures: vec![CaptureEvent {
            value,
            path: path.into(),
        }],
        snippet: snippet(content),
    }
}

#[test]
fn keeps_argument_order_and_first_snippet() {
    let ctx = assemble(vec![
        recorded(1, "arguments/0", "equal(x, 2);"),
        recorded(2, "arguments/1", "ignored"),
    ])
    .unwrap();

    assert_eq!(ctx.source, snippet("equal(x, 2);"));
    assert_eq!(
        ctx.args,
        vec![
            ArgumentRecord {
                value: 1,
                events: vec![CaptureEvent {
                    value: 1,
                    path: "arguments/0".into()
                }],
            },
            ArgumentRecord {
                value: 2,
                events: vec![CaptureEvent {
                    value: 2,
                    path: "arguments/1".into()
                }],
            },
        ]
    );
    assert_eq!(ctx.values().copied().collect::<Vec<_>>(), vec![1, 2]);
}

#[test]
fn zero_arguments_is_an_error() {
    let err = assemble(Vec::<RecordedArgument<i32>>::new()).unwrap_err();
    assert_eq!(err, AssembleError::NoArguments);
}
