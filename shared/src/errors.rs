//! Shared error types for the roster balancing system

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SharedError {
    #[error("Unknown role: {input}")]
    UnknownRole { input: String },

    #[error("Message protocol error: {message}")]
    ProtocolError { message: String },
}
