//! JSON layout used for conference payloads
//!
//! Objects are indented by two spaces with `"key" : value` separators, while
//! arrays stay on one line as `[ a, b ]`. Empty containers print as `{ }` and
//! `[ ]`.

use serde::Serialize;
use serde_json::ser::Formatter;
use std::io;

/// `serde_json` formatter producing the conference payload layout
#[derive(Debug, Default)]
pub struct PayloadFormatter {
    level: usize,
    has_value: bool,
}

impl PayloadFormatter {
    pub fn new() -> Self {
        Self::default()
    }
}

fn indent<W>(writer: &mut W, level: usize) -> io::Result<()>
where
    W: ?Sized + io::Write,
{
    for _ in 0..level {
        writer.write_all(b"  ")?;
    }
    Ok(())
}

impl Formatter for PayloadFormatter {
    fn begin_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b"[")
    }

    fn end_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b" ]")
    }

    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(if first { b" ".as_slice() } else { b", ".as_slice() })
    }

    fn end_array_value<W>(&mut self, _writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        Ok(())
    }

    fn begin_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.level += 1;
        self.has_value = false;
        writer.write_all(b"{")
    }

    fn end_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.level -= 1;
        if self.has_value {
            writer.write_all(b"\n")?;
            indent(writer, self.level)?;
            writer.write_all(b"}")
        } else {
            writer.write_all(b" }")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(if first { b"\n".as_slice() } else { b",\n".as_slice() })?;
        indent(writer, self.level)
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b" : ")
    }

    fn end_object_value<W>(&mut self, _writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.has_value = true;
        Ok(())
    }
}

/// Serialize a value with [`PayloadFormatter`]
pub fn to_string_pretty<T>(value: &T) -> Result<String, serde_json::Error>
where
    T: ?Sized + Serialize,
{
    let mut buf = Vec::with_capacity(128);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PayloadFormatter::new());
    value.serialize(&mut ser)?;
    String::from_utf8(buf)
        .map_err(|e| serde_json::Error::io(io::Error::new(io::ErrorKind::InvalidData, e)))
}
