//! JSON output.

use std::io::Write;

use serde::Serialize;

use crate::error::Result;

/// Render vectors as two-space indented JSON without a trailing newline.
pub fn to_json_pretty<T: Serialize + ?Sized>(vectors: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(vectors)?)
}

/// Write vectors to `writer` as [`to_json_pretty`] renders them.
pub fn write_json<W: Write, T: Serialize + ?Sized>(mut writer: W, vectors: &T) -> Result<()> {
    let json = to_json_pretty(vectors)?;
    writer.write_all(json.as_bytes())?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_two_space_indent_no_trailing_newline() {
        let mut item = BTreeMap::new();
        item.insert("kind", "x");
        let mut out = Vec::new();
        write_json(&mut out, &[item]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "[\n  {\n    \"kind\": \"x\"\n  }\n]");
    }

    #[test]
    fn test_empty_list() {
        let empty: Vec<u8> = Vec::new();
        assert_eq!(to_json_pretty(&empty).unwrap(), "[]");
    }
}
