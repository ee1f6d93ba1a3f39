//! Session table building blocks.
//!
//! Every in-flight request occupies one slot in the session table,
//! keyed either by the gateway-issued 16-bit session id (for commands
//! that carry one) or by the request command id (which enforces at most
//! one outstanding instance per non-session command).
//!
//! The dispatcher resolves slots through a pair of completion handles:
//! one fires when the confirmation arrives, the other delivers the
//! terminal outcome (scalar result, accumulated stream, or error).

use tokio::sync::oneshot;

use crate::commands::registry::CommandDescriptor;
use crate::commands::types::CommandData;
use crate::error::Error;

/// Key identifying one entry in the session table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKey {
    /// Keyed by request command id (non-session commands).
    Command(u16),
    /// Keyed by the 16-bit session id.
    Session(u16),
}

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionKey::Command(id) => write!(f, "0x{id:04X}"),
            SessionKey::Session(id) => write!(f, "s{id}"),
        }
    }
}

/// Identity of an in-flight request, attached to events.
#[derive(Debug, Clone)]
pub struct RequestInfo {
    /// Monotonically increasing local request id.
    pub id: u32,
    /// Numeric command id.
    pub command: u16,
    /// Registry command name.
    pub name: &'static str,
    /// Session id, when the command carries one.
    pub session_id: Option<u16>,
}

/// Collects decoded payloads for one session.
///
/// Decoders either append streamed items, set a single scalar result,
/// or flag the stream as finished (for streams that terminate through a
/// payload field rather than a dedicated frame).
#[derive(Debug, Default)]
pub struct Accumulator {
    items: Vec<CommandData>,
    result: Option<CommandData>,
    finished: bool,
}

impl Accumulator {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one streamed item.
    pub fn push(&mut self, item: CommandData) {
        self.items.push(item);
    }

    /// Set the scalar result.
    pub fn set_result(&mut self, result: CommandData) {
        self.result = Some(result);
    }

    /// Mark the stream as complete.
    pub fn finish(&mut self) {
        self.finished = true;
    }

    /// Whether a decoder has flagged the stream as complete.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Number of accumulated items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing has been accumulated yet.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.result.is_none()
    }

    /// Consume the accumulator into the request outcome.
    ///
    /// A scalar result wins; otherwise streaming requests resolve to
    /// the item list (possibly empty) and plain requests to nothing.
    pub fn into_outcome(self, streamed: bool) -> Option<CommandData> {
        if let Some(result) = self.result {
            return Some(result);
        }
        if streamed || !self.items.is_empty() {
            return Some(CommandData::List(self.items));
        }
        None
    }
}

/// Terminal outcome delivered to the awaiting caller.
pub(crate) type Outcome = Result<Option<CommandData>, Error>;

/// One in-flight request registered in the session table.
pub(crate) struct SessionSlot {
    /// Identity attached to events.
    pub req: RequestInfo,
    /// Descriptor of the originating request command.
    pub descriptor: &'static CommandDescriptor,
    /// Streamed payload accumulator.
    pub acc: Accumulator,
    /// Fires once when the confirmation arrives.
    pub cfm_tx: Option<oneshot::Sender<()>>,
    /// Delivers the terminal outcome.
    pub done_tx: Option<oneshot::Sender<Outcome>>,
}

impl SessionSlot {
    /// Signal that the confirmation arrived.
    pub fn confirm(&mut self) {
        if let Some(tx) = self.cfm_tx.take() {
            let _ = tx.send(());
        }
    }

    /// Resolve the slot with its terminal outcome.
    pub fn resolve(mut self, outcome: Outcome) {
        if let Some(tx) = self.done_tx.take() {
            let _ = tx.send(outcome);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::types::{CommandData, GatewayState};

    fn state(n: u8) -> CommandData {
        CommandData::State(GatewayState {
            state: n,
            sub_state: 0,
        })
    }

    #[test]
    fn test_session_key_display() {
        assert_eq!(SessionKey::Command(0x0300).to_string(), "0x0300");
        assert_eq!(SessionKey::Session(0x42).to_string(), "s66");
    }

    #[test]
    fn test_accumulator_scalar_result() {
        let mut acc = Accumulator::new();
        acc.set_result(state(1));
        assert_eq!(acc.into_outcome(false), Some(state(1)));
    }

    #[test]
    fn test_accumulator_streamed_items_in_order() {
        let mut acc = Accumulator::new();
        acc.push(state(1));
        acc.push(state(2));
        acc.push(state(3));

        let outcome = acc.into_outcome(true).unwrap();
        assert_eq!(
            outcome,
            CommandData::List(vec![state(1), state(2), state(3)])
        );
    }

    #[test]
    fn test_accumulator_empty_stream_resolves_to_empty_list() {
        let acc = Accumulator::new();
        assert_eq!(acc.into_outcome(true), Some(CommandData::List(vec![])));
    }

    #[test]
    fn test_accumulator_plain_request_without_result() {
        let acc = Accumulator::new();
        assert_eq!(acc.into_outcome(false), None);
    }

    #[test]
    fn test_accumulator_finished_flag() {
        let mut acc = Accumulator::new();
        assert!(!acc.is_finished());
        acc.finish();
        assert!(acc.is_finished());
    }
}
