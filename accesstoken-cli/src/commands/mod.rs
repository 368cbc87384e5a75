mod decode;
mod issue;

pub use decode::{handle_decode_command, handle_header_command};
pub use issue::{handle_issue_command, IssueArgs};
