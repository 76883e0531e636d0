//! User interface module - terminal output of the commands.

use std::io::{self, Write};

pub mod formatter;

pub use formatter::{check_mark, display_error, dot_graph, next_mark};

/// Write each item on its own line, skipping empty ones.
pub fn write_lines<I, S>(out: &mut dyn Write, items: I) -> io::Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for item in items {
        let item = item.as_ref();
        if !item.is_empty() {
            writeln!(out, "{}", item)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_lines_skips_empty() {
        let mut buf = Vec::new();
        write_lines(&mut buf, ["a@v1.0.0", "", "b@main"]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "a@v1.0.0\nb@main\n");
    }
}
