pub mod apply;
pub mod changeset;
pub mod init;
