//! Types for errors that can occur while reading and decoding IEX-TP
//! captures.
use std::io;

/// An error that can occur while reading or decoding an IEX-TP capture.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A decode operation was invoked without an attached packet source.
    #[error("no packet source has been attached to the decoder")]
    NotInitialized,
    /// The packet source failed to produce the next packet.
    #[error("I/O error: {source} while {context}")]
    Io {
        /// The original error.
        #[source]
        source: io::Error,
        /// The operation being attempted when the error occurred.
        context: String,
    },
    /// The packet payload is missing or cannot frame a transport segment.
    #[error("malformed packet: {0}")]
    MalformedPacket(String),
    /// The segment header declares a transport version this decoder doesn't
    /// speak.
    #[error("unsupported IEX-TP version {0}")]
    UnsupportedVersion(u8),
    /// A block's declared length runs past the end of the segment payload.
    #[error("block of {length} bytes overruns the remaining {remaining} bytes of segment payload")]
    TruncatedBlock {
        /// The declared block length.
        length: usize,
        /// The payload bytes that remained for the block.
        remaining: usize,
    },
    /// A block with a length of zero, or whose message data is too small for
    /// the fields of its message type.
    #[error("malformed block: {0}")]
    MalformedBlock(String),
    /// The 1-byte message tag is outside the known TOPS/DEEP set.
    #[error("unknown message type {0:#04x}")]
    UnknownMessageType(u8),
    /// A decoded timestamp falls outside the plausible range for an IEX
    /// capture.
    #[error("implausible timestamp {0}")]
    ImplausibleTimestamp(u64),
    /// Message data was handed to the decoder for a different message type.
    #[error("message data tagged {actual:#04x} where {expected:#04x} was expected")]
    TagMismatch {
        /// The tag the decoder expected.
        expected: u8,
        /// The tag found at the start of the message data.
        actual: u8,
    },
    /// A raw coded field doesn't correspond to any known value.
    #[error("couldn't convert {input} to {desired}")]
    Conversion {
        /// The raw input.
        input: String,
        /// The desired type.
        desired: &'static str,
    },
}

/// An alias for a `Result` with [`enum@Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates a new I/O [`enum@Error`] with the given `context`.
    pub fn io(error: io::Error, context: impl ToString) -> Self {
        Self::Io {
            source: error,
            context: context.to_string(),
        }
    }

    /// Creates a new conversion [`enum@Error`] for a raw value that doesn't
    /// correspond to any variant of `T`.
    pub fn conversion<T>(input: impl ToString) -> Self {
        Self::Conversion {
            input: input.to_string(),
            desired: std::any::type_name::<T>(),
        }
    }

    /// Creates a new malformed-block [`enum@Error`].
    pub fn malformed_block(msg: impl ToString) -> Self {
        Self::MalformedBlock(msg.to_string())
    }
}
