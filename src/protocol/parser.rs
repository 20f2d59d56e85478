//! Control message parsing
//!
//! Pure functions turning raw control messages into typed values. Nothing here
//! touches the network.

use crate::protocol::commands::{CommandKind, ParsedCommand};
use crate::protocol::responses::{GET_TOKEN, INVALID_COMMAND, LIST_TOKEN};

/// Validates a raw command message.
///
/// Only the exact tokens `-l` and `-g` are accepted. The message is compared as
/// received: no trimming, no case folding, no prefix matching.
pub fn parse_command(raw: &[u8]) -> ParsedCommand {
    if raw == LIST_TOKEN.as_bytes() {
        ParsedCommand::Valid(CommandKind::List)
    } else if raw == GET_TOKEN.as_bytes() {
        ParsedCommand::Valid(CommandKind::Get)
    } else {
        ParsedCommand::Invalid(INVALID_COMMAND)
    }
}

/// Parses the data port message with `atoi` semantics.
///
/// Leading ASCII whitespace and a single `+` are skipped, then the leading run of
/// decimal digits is read. A message without digits, a negative number, or a value
/// outside the `u16` range yields port 0, which fails later at connect time.
pub fn parse_data_port(raw: &[u8]) -> u16 {
    let start = raw
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(raw.len());
    let rest = &raw[start..];
    let rest = rest.strip_prefix(b"+").unwrap_or(rest);

    let digits = rest.iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return 0;
    }

    std::str::from_utf8(&rest[..digits])
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(0)
}
