//! Program images: plain text, one byte per line, written out in binary.
//!
//! ```text
//! 10000010 # LDI R0,8
//! 00000000
//! 00001000
//! 01000111 # PRN R0
//! 00000000
//! 00000001 # HLT
//! ```
//!
//! Anything after a `#` is a comment. Blank lines and comment-only lines
//! don't take up an address.

use thiserror::Error;

use crate::MEMORY_SIZE;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImageError {
    #[error("line {line}: {text:?} is not an 8-bit binary number")]
    InvalidLiteral { line: usize, text: String },
    #[error("program is {len} bytes long, but memory only holds {}", MEMORY_SIZE)]
    TooLarge { len: usize },
}

/// Turn the text of a program image into the bytes that go into memory,
/// starting at address 0.
pub fn parse(text: &str) -> Result<Vec<u8>, ImageError> {
    let mut image = Vec::new();
    for (number, line) in text.lines().enumerate() {
        let literal = line.split_once('#').map_or(line, |(code, _)| code).trim();
        if literal.is_empty() {
            continue;
        }
        image.push(parse_literal(literal).ok_or_else(|| ImageError::InvalidLiteral {
            line: number + 1,
            text: literal.to_string(),
        })?);
    }
    if image.len() > MEMORY_SIZE {
        return Err(ImageError::TooLarge { len: image.len() });
    }
    Ok(image)
}

fn parse_literal(literal: &str) -> Option<u8> {
    if literal.len() > 8 {
        return None;
    }
    literal.bytes().try_fold(0u8, |acc, digit| match digit {
        b'0' => Some(acc << 1),
        b'1' => Some((acc << 1) | 1),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print8() {
        let text = "\
# print8.ls8
10000010 # LDI R0,8
00000000
00001000
01000111 # PRN R0
00000000
00000001 # HLT
";
        assert_eq!(
            parse(text).unwrap(),
            vec![0b1000_0010, 0, 8, 0b0100_0111, 0, 1]
        );
    }

    #[test]
    fn blank_and_comment_lines_take_no_space() {
        let text = "\n   \n# nothing here\n00000001\n\n\t# still nothing\n  11111111  \r\n";
        assert_eq!(parse(text).unwrap(), vec![0x01, 0xFF]);
    }

    #[test]
    fn short_literals_are_fine() {
        assert_eq!(parse("1\n10\n0").unwrap(), vec![1, 2, 0]);
    }

    #[test]
    fn rejects_things_that_are_not_bytes() {
        for (text, bad) in [
            ("00000001\n00000002\n", "00000002"),
            ("100000000", "100000000"),
            ("+1010", "+1010"),
            ("LDI R0,8 # oops", "LDI R0,8"),
            ("1010 1010", "1010 1010"),
        ] {
            let line = if text.starts_with("00000001") { 2 } else { 1 };
            assert_eq!(
                parse(text),
                Err(ImageError::InvalidLiteral {
                    line,
                    text: bad.to_string()
                })
            );
        }
    }

    #[test]
    fn rejects_images_that_do_not_fit() {
        let fits = "00000000\n".repeat(MEMORY_SIZE);
        assert_eq!(parse(&fits).unwrap().len(), MEMORY_SIZE);
        let too_big = "00000000\n".repeat(MEMORY_SIZE + 1);
        assert_eq!(
            parse(&too_big),
            Err(ImageError::TooLarge {
                len: MEMORY_SIZE + 1
            })
        );
    }
}
