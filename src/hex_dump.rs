use std::fmt::Write;

/// Render wire bytes as lowercase hex, grouped four bytes to a cluster.
/// Conformance tests compare encoded buffers through this, so the format is
/// part of the crate's stable surface.
pub fn to_hex_string(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2 + bytes.len() / 4);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 && i % 4 == 0 {
            out.push(' ');
        }
        // writing into a String cannot fail
        let _ = write!(out, "{:02x}", b);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_four_bytes_per_cluster() {
        assert_eq!(
            to_hex_string(&[0x04, 0x0f, 0x08, 0x90, 0x00, 0x00, 0x00, 0x2a, 0xff]),
            "040f0890 0000002a ff"
        );
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert_eq!(to_hex_string(&[]), "");
    }
}
