pub mod card_cmd;
pub mod init;
pub mod preview;
