//! Channel protocol: JSON commands in, JSON responses and notifications out,
//! plus the binary cursor payload carried inside image notifications.

pub mod codec;
pub mod command;
pub mod notification;
pub mod response;

pub use codec::{decode_cursor_payload, encode_cursor_payload, CodecError, CursorPayload};
pub use command::{decode_command, decode_command_str, Command};
pub use notification::Notification;
pub use response::{encode_response, CommandReply, ReplyValue};
