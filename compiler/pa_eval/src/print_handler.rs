//! Destination of `console.log` output.
//!
//! The CLI prints straight to stdout. Tests and the parallel runner use a
//! buffer so each file's output can be collected and shown with its results.

use std::cell::RefCell;

/// Print handler, dispatched by enum.
#[derive(Default)]
pub enum PrintHandler {
    #[default]
    Stdout,
    Buffer(RefCell<String>),
    /// Discards everything.
    Silent,
}

impl PrintHandler {
    pub fn buffer() -> Self {
        PrintHandler::Buffer(RefCell::new(String::new()))
    }

    /// Print a line (with newline).
    pub fn println(&self, msg: &str) {
        match self {
            PrintHandler::Stdout => println!("{msg}"),
            PrintHandler::Buffer(buf) => {
                let mut buf = buf.borrow_mut();
                buf.push_str(msg);
                buf.push('\n');
            }
            PrintHandler::Silent => {}
        }
    }

    /// Everything captured so far. Empty for handlers that do not capture.
    pub fn output(&self) -> String {
        match self {
            PrintHandler::Buffer(buf) => buf.borrow().clone(),
            PrintHandler::Stdout | PrintHandler::Silent => String::new(),
        }
    }

    pub fn clear(&self) {
        if let PrintHandler::Buffer(buf) = self {
            buf.borrow_mut().clear();
        }
    }
}
