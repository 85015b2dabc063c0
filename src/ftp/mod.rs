//! FTP sessions for the benchmark, on top of `suppaftp`'s async client.
//! Every client call is bounded by the operation's [`Deadline`].
mod credentials;
mod deadline;
mod session;

pub use credentials::Credentials;
pub use deadline::Deadline;
pub use session::FtpSession;
