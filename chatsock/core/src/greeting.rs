//! Greeting and arithmetic demo printed before the socket is opened.

use std::io::{self, Write};

/// First line written by every run
pub const GREETING: &str = "Hello, chatsock!";

/// Operands of the demo addition
pub const DEMO_OPERANDS: (i32, i32) = (2, 5);

/// Add two integers
#[must_use]
pub fn add_numbers(a: i32, b: i32) -> i32 {
    a + b
}

/// Write the greeting line followed by the demo sum
pub fn write_intro<W: Write>(out: &mut W) -> io::Result<()> {
    let (a, b) = DEMO_OPERANDS;
    writeln!(out, "{GREETING}")?;
    writeln!(out, "{a} + {b} = {}", add_numbers(a, b))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_add_numbers() {
        assert_eq!(add_numbers(2, 5), 7);
        assert_eq!(add_numbers(-3, 3), 0);
        assert_eq!(add_numbers(0, 0), 0);
        assert_eq!(add_numbers(-100, -23), -123);
        assert_eq!(add_numbers(1_000_000, 234_567), 1_234_567);
    }

    #[test]
    fn test_write_intro() {
        let mut out = Vec::new();
        write_intro(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Hello, chatsock!\n2 + 5 = 7\n"
        );
    }
}
