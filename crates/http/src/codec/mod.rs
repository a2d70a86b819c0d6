//! Protocol decoding implementation
//!
//! The decoder side is split in two:
//!
//! - [`ParseBuffer`]: a growable read buffer with an explicit consumed
//!   cursor, so the read loop can retain unconsumed bytes across reads
//! - [`RequestDecoder`]: the incremental state machine that frames a
//!   request line and header section out of whatever the buffer holds
//!
//! Byte streams deliver data in transport-chosen chunk sizes unrelated to
//! message boundaries, so both halves are built to be re-entrant across
//! partial reads: offering half a line consumes nothing, and the next offer
//! sees the same bytes plus whatever arrived since.

pub mod parse_buffer;
pub mod request_decoder;

pub use parse_buffer::ParseBuffer;
pub use request_decoder::RequestDecoder;
